//! Member endpoints

use crate::error::AppResult;
use crate::models::member::{CreateMember, Member, UpdateMember};

use super::{ApiClient, PageData, PageQuery};

#[derive(Clone)]
pub struct MembersApi {
    client: ApiClient,
}

impl MembersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List members, one server page at a time
    pub async fn list(&self, query: &PageQuery) -> AppResult<PageData<Member>> {
        self.client.get_page("/member", query).await
    }

    /// Get member by ID
    pub async fn get(&self, id: i64) -> AppResult<Member> {
        self.client.get(&format!("/member/{}", id)).await
    }

    /// Create a new member
    pub async fn create(&self, payload: &CreateMember) -> AppResult<Member> {
        self.client.post("/member", payload).await
    }

    /// Update a member
    pub async fn update(&self, id: i64, payload: &UpdateMember) -> AppResult<Member> {
        self.client.put(&format!("/member/{}", id), payload).await
    }

    /// Delete a member
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.client.delete(&format!("/member/{}", id)).await
    }
}
