//! Book endpoints

use crate::error::AppResult;
use crate::models::book::{Book, CreateBook, UpdateBook};

use super::{ApiClient, PageData, PageQuery};

#[derive(Clone)]
pub struct BooksApi {
    client: ApiClient,
}

impl BooksApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List books, one server page at a time
    pub async fn list(&self, query: &PageQuery) -> AppResult<PageData<Book>> {
        self.client.get_page("/book", query).await
    }

    /// Get book by ID, with embedded genre/publisher/author details
    pub async fn get(&self, id: i64) -> AppResult<Book> {
        self.client.get(&format!("/book/{}", id)).await
    }

    /// Create a new book
    pub async fn create(&self, payload: &CreateBook) -> AppResult<Book> {
        self.client.post("/book", payload).await
    }

    /// Update a book
    pub async fn update(&self, id: i64, payload: &UpdateBook) -> AppResult<Book> {
        self.client.put(&format!("/book/{}", id), payload).await
    }

    /// Delete a book
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.client.delete(&format!("/book/{}", id)).await
    }
}
