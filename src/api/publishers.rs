//! Publisher endpoints

use crate::error::AppResult;
use crate::models::publisher::{CreatePublisher, Publisher, UpdatePublisher};

use super::{ApiClient, PageData, PageQuery};

#[derive(Clone)]
pub struct PublishersApi {
    client: ApiClient,
}

impl PublishersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List publishers, one server page at a time
    pub async fn list(&self, query: &PageQuery) -> AppResult<PageData<Publisher>> {
        self.client.get_page("/publisher", query).await
    }

    /// Get publisher by ID
    pub async fn get(&self, id: i64) -> AppResult<Publisher> {
        self.client.get(&format!("/publisher/{}", id)).await
    }

    /// Create a new publisher
    pub async fn create(&self, payload: &CreatePublisher) -> AppResult<Publisher> {
        self.client.post("/publisher", payload).await
    }

    /// Update a publisher
    pub async fn update(&self, id: i64, payload: &UpdatePublisher) -> AppResult<Publisher> {
        self.client.put(&format!("/publisher/{}", id), payload).await
    }

    /// Delete a publisher
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.client.delete(&format!("/publisher/{}", id)).await
    }
}
