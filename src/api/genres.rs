//! Genre endpoints

use crate::error::AppResult;
use crate::models::genre::{CreateGenre, Genre, UpdateGenre};

use super::{ApiClient, PageData, PageQuery};

#[derive(Clone)]
pub struct GenresApi {
    client: ApiClient,
}

impl GenresApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List genres, one server page at a time
    pub async fn list(&self, query: &PageQuery) -> AppResult<PageData<Genre>> {
        self.client.get_page("/genre", query).await
    }

    /// Get genre by ID
    pub async fn get(&self, id: i64) -> AppResult<Genre> {
        self.client.get(&format!("/genre/{}", id)).await
    }

    /// Create a new genre
    pub async fn create(&self, payload: &CreateGenre) -> AppResult<Genre> {
        self.client.post("/genre", payload).await
    }

    /// Update a genre
    pub async fn update(&self, id: i64, payload: &UpdateGenre) -> AppResult<Genre> {
        self.client.put(&format!("/genre/{}", id), payload).await
    }

    /// Delete a genre
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.client.delete(&format!("/genre/{}", id)).await
    }
}
