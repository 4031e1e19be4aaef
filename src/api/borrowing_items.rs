//! Borrowing line-item endpoints
//!
//! Items are always written in bulk, tagged with their parent borrowing id.
//! The bulk update is replace-style: the server swaps the full item list, it
//! does not diff.

use serde::Serialize;

use crate::error::AppResult;
use crate::models::borrowing::{BorrowingItem, CreateBorrowingItem};

use super::{ApiClient, PageData, PageQuery};

#[derive(Debug, Serialize)]
struct BulkItemsPayload<'a> {
    borrowing_id: i64,
    items: &'a [CreateBorrowingItem],
}

#[derive(Clone)]
pub struct BorrowingItemsApi {
    client: ApiClient,
}

impl BorrowingItemsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List items across all borrowings, one server page at a time
    pub async fn list(&self, query: &PageQuery) -> AppResult<PageData<BorrowingItem>> {
        self.client.get_page("/borrowing/items", query).await
    }

    /// Items belonging to one borrowing
    pub async fn for_borrowing(&self, borrowing_id: i64) -> AppResult<Vec<BorrowingItem>> {
        self.client
            .get(&format!("/borrowing/{}/items", borrowing_id))
            .await
    }

    /// Bulk-create items under an existing borrowing
    pub async fn bulk_create(
        &self,
        borrowing_id: i64,
        items: &[CreateBorrowingItem],
    ) -> AppResult<Vec<BorrowingItem>> {
        let payload = BulkItemsPayload {
            borrowing_id,
            items,
        };
        self.client
            .post("/borrowing/items/bulk-create", &payload)
            .await
    }

    /// Replace the item list of an existing borrowing
    pub async fn bulk_update(
        &self,
        borrowing_id: i64,
        items: &[CreateBorrowingItem],
    ) -> AppResult<Vec<BorrowingItem>> {
        let payload = BulkItemsPayload {
            borrowing_id,
            items,
        };
        self.client
            .put(
                &format!("/borrowing/{}/items/bulk-update", borrowing_id),
                &payload,
            )
            .await
    }

    /// Delete all items of a borrowing
    pub async fn delete_for_borrowing(&self, borrowing_id: i64) -> AppResult<()> {
        self.client
            .delete(&format!("/borrowing/{}/items", borrowing_id))
            .await
    }
}
