//! Borrowing endpoints

use crate::error::AppResult;
use crate::models::borrowing::{Borrowing, CreateBorrowing, UpdateBorrowing};

use super::{ApiClient, PageData, PageQuery};

#[derive(Clone)]
pub struct BorrowingsApi {
    client: ApiClient,
}

impl BorrowingsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List borrowings, one server page at a time
    pub async fn list(&self, query: &PageQuery) -> AppResult<PageData<Borrowing>> {
        self.client.get_page("/borrowing", query).await
    }

    /// Get borrowing by ID
    pub async fn get(&self, id: i64) -> AppResult<Borrowing> {
        self.client.get(&format!("/borrowing/{}", id)).await
    }

    /// Create the parent borrowing record. Line items are submitted
    /// separately once the server has assigned the id.
    pub async fn create(&self, payload: &CreateBorrowing) -> AppResult<Borrowing> {
        self.client.post("/borrowing", payload).await
    }

    /// Update a borrowing
    pub async fn update(&self, id: i64, payload: &UpdateBorrowing) -> AppResult<Borrowing> {
        self.client.put(&format!("/borrowing/{}", id), payload).await
    }

    /// Delete a borrowing
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.client.delete(&format!("/borrowing/{}", id)).await
    }

    /// Mark a borrowing as returned
    pub async fn mark_returned(&self, id: i64) -> AppResult<Borrowing> {
        self.client.patch(&format!("/borrowing/{}/return", id)).await
    }
}
