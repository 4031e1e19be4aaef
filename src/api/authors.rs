//! Author endpoints

use crate::error::AppResult;
use crate::models::author::{Author, CreateAuthor, UpdateAuthor};

use super::{ApiClient, PageData, PageQuery};

#[derive(Clone)]
pub struct AuthorsApi {
    client: ApiClient,
}

impl AuthorsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List authors, one server page at a time
    pub async fn list(&self, query: &PageQuery) -> AppResult<PageData<Author>> {
        self.client.get_page("/author", query).await
    }

    /// Get author by ID
    pub async fn get(&self, id: i64) -> AppResult<Author> {
        self.client.get(&format!("/author/{}", id)).await
    }

    /// Search authors by name fragment
    pub async fn search(&self, q: &str) -> AppResult<Vec<Author>> {
        self.client
            .get_with_query("/author/search", &[("q", q.to_string())])
            .await
    }

    /// Create a new author
    pub async fn create(&self, payload: &CreateAuthor) -> AppResult<Author> {
        self.client.post("/author", payload).await
    }

    /// Update an author
    pub async fn update(&self, id: i64, payload: &UpdateAuthor) -> AppResult<Author> {
        self.client.put(&format!("/author/{}", id), payload).await
    }

    /// Delete an author
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.client.delete(&format!("/author/{}", id)).await
    }
}
