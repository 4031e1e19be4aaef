//! Borrowing submission workflow
//!
//! The one multi-step flow in the console. Parent record and line items are
//! persisted by two separate endpoints, and the children's foreign key is the
//! server-assigned parent id, so the two writes are strictly serialized:
//! parent first, items second, never concurrently. A child failure after a
//! successful parent write is reported as a partial success; the parent is
//! kept (no compensating delete).

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::borrowing_items::BorrowingItemsApi;
use crate::api::borrowings::BorrowingsApi;
use crate::error::{AppError, AppResult};
use crate::models::borrowing::{
    Borrowing, BorrowingItem, CreateBorrowing, CreateBorrowingItem, UpdateBorrowing,
};

/// Parent-record operations the workflow needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowingStore: Send + Sync {
    async fn create_borrowing(&self, payload: CreateBorrowing) -> AppResult<Borrowing>;
    async fn update_borrowing(&self, id: i64, payload: UpdateBorrowing) -> AppResult<Borrowing>;
}

/// Line-item operations the workflow needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowingItemStore: Send + Sync {
    async fn bulk_create(
        &self,
        borrowing_id: i64,
        items: Vec<CreateBorrowingItem>,
    ) -> AppResult<Vec<BorrowingItem>>;

    async fn bulk_update(
        &self,
        borrowing_id: i64,
        items: Vec<CreateBorrowingItem>,
    ) -> AppResult<Vec<BorrowingItem>>;
}

#[async_trait]
impl BorrowingStore for BorrowingsApi {
    async fn create_borrowing(&self, payload: CreateBorrowing) -> AppResult<Borrowing> {
        self.create(&payload).await
    }

    async fn update_borrowing(&self, id: i64, payload: UpdateBorrowing) -> AppResult<Borrowing> {
        self.update(id, &payload).await
    }
}

#[async_trait]
impl BorrowingItemStore for BorrowingItemsApi {
    async fn bulk_create(
        &self,
        borrowing_id: i64,
        items: Vec<CreateBorrowingItem>,
    ) -> AppResult<Vec<BorrowingItem>> {
        BorrowingItemsApi::bulk_create(self, borrowing_id, &items).await
    }

    async fn bulk_update(
        &self,
        borrowing_id: i64,
        items: Vec<CreateBorrowingItem>,
    ) -> AppResult<Vec<BorrowingItem>> {
        BorrowingItemsApi::bulk_update(self, borrowing_id, &items).await
    }
}

/// How a borrowing submission ended
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Parent and item batch both persisted
    Success { borrowing: Borrowing },
    /// The parent persisted but the item batch did not. The parent is a
    /// valid, durable record and is kept as-is.
    PartialSuccess { borrowing: Borrowing, detail: String },
    /// The server declined the parent write; nothing was persisted
    Rejected { message: String },
}

/// Two-phase create/update of a borrowing and its line items
#[derive(Clone)]
pub struct BorrowingWorkflow {
    borrowings: Arc<dyn BorrowingStore>,
    items: Arc<dyn BorrowingItemStore>,
}

impl BorrowingWorkflow {
    pub fn new(borrowings: Arc<dyn BorrowingStore>, items: Arc<dyn BorrowingItemStore>) -> Self {
        Self { borrowings, items }
    }

    /// Shape-check the working item list before anything touches the network.
    /// Rejecting here keeps an invalid batch from ever creating a parent.
    fn check_items(items: &[CreateBorrowingItem]) -> AppResult<()> {
        if items.is_empty() {
            return Err(AppError::Validation(
                "Add at least one book to the borrowing".to_string(),
            ));
        }
        if !items.iter().all(CreateBorrowingItem::is_structurally_valid) {
            return Err(AppError::Validation(
                "Every book line needs a quantity above zero and a non-negative price".to_string(),
            ));
        }
        Ok(())
    }

    fn tag_items(items: Vec<CreateBorrowingItem>, borrowing_id: i64) -> Vec<CreateBorrowingItem> {
        items
            .into_iter()
            .map(|mut item| {
                item.borrowing_id = Some(borrowing_id);
                item
            })
            .collect()
    }

    /// Create a borrowing and its items.
    ///
    /// A rejected parent comes back as [`SubmitOutcome::Rejected`] (the form
    /// stays up); a transport failure propagates as `Err`. An item-batch
    /// failure after a persisted parent is a [`SubmitOutcome::PartialSuccess`]
    /// and callers still leave the form, because the parent exists.
    pub async fn submit_new(
        &self,
        borrowing: CreateBorrowing,
        items: Vec<CreateBorrowingItem>,
    ) -> AppResult<SubmitOutcome> {
        Self::check_items(&items)?;

        let created = match self.borrowings.create_borrowing(borrowing).await {
            Ok(borrowing) => borrowing,
            Err(err) if err.is_rejection() => {
                return Ok(SubmitOutcome::Rejected {
                    message: err.user_message(),
                })
            }
            Err(err) => return Err(err),
        };

        let tagged = Self::tag_items(items, created.id);
        match self.items.bulk_create(created.id, tagged).await {
            Ok(_) => Ok(SubmitOutcome::Success { borrowing: created }),
            Err(err) => {
                tracing::warn!(
                    borrowing_id = created.id,
                    "borrowing created but item batch failed: {}",
                    err
                );
                Ok(SubmitOutcome::PartialSuccess {
                    borrowing: created,
                    detail: err.user_message(),
                })
            }
        }
    }

    /// Update a borrowing, then replace its item list.
    ///
    /// Same shape as [`BorrowingWorkflow::submit_new`], except a partial
    /// success does not force navigation: the parent update stuck, so the
    /// caller may stay on the form and retry the items.
    pub async fn submit_update(
        &self,
        id: i64,
        borrowing: UpdateBorrowing,
        items: Vec<CreateBorrowingItem>,
    ) -> AppResult<SubmitOutcome> {
        Self::check_items(&items)?;

        let updated = match self.borrowings.update_borrowing(id, borrowing).await {
            Ok(borrowing) => borrowing,
            Err(err) if err.is_rejection() => {
                return Ok(SubmitOutcome::Rejected {
                    message: err.user_message(),
                })
            }
            Err(err) => return Err(err),
        };

        let tagged = Self::tag_items(items, id);
        match self.items.bulk_update(id, tagged).await {
            Ok(_) => Ok(SubmitOutcome::Success { borrowing: updated }),
            Err(err) => {
                tracing::warn!(
                    borrowing_id = id,
                    "borrowing updated but item batch failed: {}",
                    err
                );
                Ok(SubmitOutcome::PartialSuccess {
                    borrowing: updated,
                    detail: err.user_message(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::models::enums::BorrowingStatus;

    fn parent_payload() -> CreateBorrowing {
        CreateBorrowing {
            member_id: 7,
            status: BorrowingStatus::Borrowing,
            borrowing_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 16).unwrap(),
            returned_date: None,
            created_by: "admin".to_string(),
        }
    }

    fn update_payload() -> UpdateBorrowing {
        UpdateBorrowing {
            member_id: None,
            status: Some(BorrowingStatus::Returned),
            borrowing_date: None,
            due_date: None,
            returned_date: Some(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()),
            updated_by: Some("admin".to_string()),
        }
    }

    fn item(book_id: i64, quantity: u32) -> CreateBorrowingItem {
        CreateBorrowingItem {
            borrowing_id: None,
            book_id,
            quantity,
            price: Decimal::new(9_90, 2),
            returned_date: None,
        }
    }

    fn persisted(id: i64) -> Borrowing {
        Borrowing {
            id,
            member_id: 7,
            status: BorrowingStatus::Borrowing,
            borrowing_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 3, 16).unwrap(),
            returned_date: None,
            created_by: Some("admin".to_string()),
            updated_by: None,
            member: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn rejection(message: &str) -> AppError {
        AppError::Api {
            message: message.to_string(),
        }
    }

    fn workflow(
        borrowings: MockBorrowingStore,
        items: MockBorrowingItemStore,
    ) -> BorrowingWorkflow {
        BorrowingWorkflow::new(Arc::new(borrowings), Arc::new(items))
    }

    #[tokio::test]
    async fn test_empty_item_list_never_posts_parent() {
        let mut borrowings = MockBorrowingStore::new();
        borrowings.expect_create_borrowing().times(0);
        let mut items = MockBorrowingItemStore::new();
        items.expect_bulk_create().times(0);

        let result = workflow(borrowings, items)
            .submit_new(parent_payload(), Vec::new())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_shape_invalid_item_never_posts_parent() {
        let mut borrowings = MockBorrowingStore::new();
        borrowings.expect_create_borrowing().times(0);
        let items = MockBorrowingItemStore::new();

        let result = workflow(borrowings, items)
            .submit_new(parent_payload(), vec![item(3, 0)])
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rejected_parent_skips_item_batch() {
        let mut borrowings = MockBorrowingStore::new();
        borrowings
            .expect_create_borrowing()
            .times(1)
            .returning(|_| Err(rejection("Member has unpaid fines")));
        let mut items = MockBorrowingItemStore::new();
        items.expect_bulk_create().times(0);

        let outcome = workflow(borrowings, items)
            .submit_new(parent_payload(), vec![item(3, 1)])
            .await
            .unwrap();

        match outcome {
            SubmitOutcome::Rejected { message } => {
                assert_eq!(message, "Member has unpaid fines")
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_on_parent_propagates() {
        let mut borrowings = MockBorrowingStore::new();
        borrowings
            .expect_create_borrowing()
            .times(1)
            .returning(|_| Err(AppError::Decode(serde_json::from_str::<i64>("<html>").unwrap_err())));
        let mut items = MockBorrowingItemStore::new();
        items.expect_bulk_create().times(0);

        let result = workflow(borrowings, items)
            .submit_new(parent_payload(), vec![item(3, 1)])
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_item_batch_failure_is_partial_success() {
        let mut borrowings = MockBorrowingStore::new();
        borrowings
            .expect_create_borrowing()
            .times(1)
            .returning(|_| Ok(persisted(42)));
        let mut items = MockBorrowingItemStore::new();
        items
            .expect_bulk_create()
            .times(1)
            .returning(|_, _| Err(rejection("book 3 is out of stock")));

        let outcome = workflow(borrowings, items)
            .submit_new(parent_payload(), vec![item(3, 1)])
            .await
            .unwrap();

        match outcome {
            SubmitOutcome::PartialSuccess { borrowing, detail } => {
                assert_eq!(borrowing.id, 42);
                assert_eq!(detail, "book 3 is out of stock");
            }
            other => panic!("expected partial success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_items_are_tagged_with_parent_id() {
        let mut borrowings = MockBorrowingStore::new();
        borrowings
            .expect_create_borrowing()
            .times(1)
            .returning(|_| Ok(persisted(42)));
        let mut items = MockBorrowingItemStore::new();
        items
            .expect_bulk_create()
            .withf(|borrowing_id, items| {
                *borrowing_id == 42 && items.iter().all(|i| i.borrowing_id == Some(42))
            })
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let outcome = workflow(borrowings, items)
            .submit_new(parent_payload(), vec![item(3, 1), item(5, 2)])
            .await
            .unwrap();

        assert!(matches!(outcome, SubmitOutcome::Success { borrowing } if borrowing.id == 42));
    }

    #[tokio::test]
    async fn test_edit_updates_parent_then_replaces_items() {
        let mut borrowings = MockBorrowingStore::new();
        borrowings
            .expect_update_borrowing()
            .withf(|id, _| *id == 42)
            .times(1)
            .returning(|_, _| Ok(persisted(42)));
        let mut items = MockBorrowingItemStore::new();
        items
            .expect_bulk_update()
            .withf(|borrowing_id, _| *borrowing_id == 42)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let outcome = workflow(borrowings, items)
            .submit_update(42, update_payload(), vec![item(3, 1)])
            .await
            .unwrap();

        assert!(matches!(outcome, SubmitOutcome::Success { .. }));
    }

    #[tokio::test]
    async fn test_edit_rejected_parent_skips_item_replace() {
        let mut borrowings = MockBorrowingStore::new();
        borrowings
            .expect_update_borrowing()
            .times(1)
            .returning(|_, _| Err(rejection("borrowing already closed")));
        let mut items = MockBorrowingItemStore::new();
        items.expect_bulk_update().times(0);

        let outcome = workflow(borrowings, items)
            .submit_update(42, update_payload(), vec![item(3, 1)])
            .await
            .unwrap();

        assert!(matches!(outcome, SubmitOutcome::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_edit_item_failure_keeps_parent_update() {
        let mut borrowings = MockBorrowingStore::new();
        borrowings
            .expect_update_borrowing()
            .times(1)
            .returning(|_, _| Ok(persisted(42)));
        let mut items = MockBorrowingItemStore::new();
        items
            .expect_bulk_update()
            .times(1)
            .returning(|_, _| Err(rejection("stale item list")));

        let outcome = workflow(borrowings, items)
            .submit_update(42, update_payload(), vec![item(3, 1)])
            .await
            .unwrap();

        assert!(matches!(outcome, SubmitOutcome::PartialSuccess { .. }));
    }
}
