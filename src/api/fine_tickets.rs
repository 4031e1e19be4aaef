//! Fine ticket endpoints

use crate::error::AppResult;
use crate::models::fine_ticket::{CreateFineTicket, FineTicket, UpdateFineTicket};

use super::{ApiClient, PageData, PageQuery};

#[derive(Clone)]
pub struct FineTicketsApi {
    client: ApiClient,
}

impl FineTicketsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List fine tickets, one server page at a time
    pub async fn list(&self, query: &PageQuery) -> AppResult<PageData<FineTicket>> {
        self.client.get_page("/fine-ticket", query).await
    }

    /// Get fine ticket by ID
    pub async fn get(&self, id: i64) -> AppResult<FineTicket> {
        self.client.get(&format!("/fine-ticket/{}", id)).await
    }

    /// Create a new fine ticket
    pub async fn create(&self, payload: &CreateFineTicket) -> AppResult<FineTicket> {
        self.client.post("/fine-ticket", payload).await
    }

    /// Update a fine ticket
    pub async fn update(&self, id: i64, payload: &UpdateFineTicket) -> AppResult<FineTicket> {
        self.client.put(&format!("/fine-ticket/{}", id), payload).await
    }

    /// Delete a fine ticket
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.client.delete(&format!("/fine-ticket/{}", id)).await
    }
}
