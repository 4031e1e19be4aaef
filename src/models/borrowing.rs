//! Borrowing transaction model and its line items

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::book::Book;
use super::enums::BorrowingStatus;
use super::member::Member;

/// One lending transaction for a member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Borrowing {
    pub id: i64,
    pub member_id: i64,
    pub status: BorrowingStatus,
    pub borrowing_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub returned_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub member: Option<Member>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One book line within a borrowing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowingItem {
    pub id: i64,
    pub borrowing_id: i64,
    pub book_id: i64,
    pub quantity: u32,
    /// Book price captured at borrowing time
    pub price: Decimal,
    #[serde(default)]
    pub returned_date: Option<NaiveDate>,
    #[serde(default)]
    pub book: Option<Book>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create borrowing request (the parent record; items go separately once the
/// server has assigned the id)
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateBorrowing {
    pub member_id: i64,
    pub status: BorrowingStatus,
    pub borrowing_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned_date: Option<NaiveDate>,
    #[validate(length(min = 1, message = "Created-by must not be empty"))]
    pub created_by: String,
}

/// Update borrowing request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpdateBorrowing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BorrowingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrowing_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned_date: Option<NaiveDate>,
    #[validate(length(min = 1, message = "Updated-by must not be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// One line of a bulk create/update of borrowing items
///
/// `borrowing_id` is filled in by the workflow once the parent exists; the
/// form assembles these with it unset.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateBorrowingItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrowing_id: Option<i64>,
    pub book_id: i64,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: u32,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned_date: Option<NaiveDate>,
}

impl CreateBorrowingItem {
    /// Shape check used before any network call: a line must point at a book,
    /// carry a positive quantity and a non-negative price
    pub fn is_structurally_valid(&self) -> bool {
        self.book_id > 0 && self.quantity > 0 && self.price >= Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(book_id: i64, quantity: u32, price: Decimal) -> CreateBorrowingItem {
        CreateBorrowingItem {
            borrowing_id: None,
            book_id,
            quantity,
            price,
            returned_date: None,
        }
    }

    #[test]
    fn test_item_shape_check() {
        assert!(item(1, 1, Decimal::ZERO).is_structurally_valid());
        assert!(item(1, 2, Decimal::new(10_00, 2)).is_structurally_valid());
        assert!(!item(0, 1, Decimal::ZERO).is_structurally_valid());
        assert!(!item(1, 0, Decimal::ZERO).is_structurally_valid());
        assert!(!item(1, 1, Decimal::new(-1, 0)).is_structurally_valid());
    }
}
