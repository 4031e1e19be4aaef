//! Book model and related types

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::author::Author;
use super::genre::Genre;
use super::publisher::Publisher;

/// ISBN-10/13, digits with optional separators
static ISBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d[\- ]?){9}(?:\d|X)$|^(?:\d[\- ]?){12}\d$").unwrap());

/// Check an ISBN against the accepted 10/13 digit shapes
pub fn is_valid_isbn(raw: &str) -> bool {
    ISBN_RE.is_match(raw.trim())
}

/// Join row linking a book to one of its authors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAuthorItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub book_id: i64,
    pub author_id: i64,
}

/// Full book model from the API
///
/// `genre`, `publisher` and `author_details` are only populated by the detail
/// endpoint; listing responses carry the reference ids alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    pub price: Decimal,
    pub quantity: u32,
    pub total_page: u32,
    #[serde(default)]
    pub publish_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub genre_id: i64,
    pub publisher_id: i64,
    #[serde(default)]
    pub authors: Vec<BookAuthorItem>,
    #[serde(default)]
    pub genre: Option<Genre>,
    #[serde(default)]
    pub publisher: Option<Publisher>,
    #[serde(default)]
    pub author_details: Vec<Author>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create book request
///
/// The 1..=3 author bound is an application-level business rule enforced here
/// and in the form's multi-select, not by the server schema.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[serde(rename = "ISBN")]
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    pub price: Decimal,
    #[validate(range(min = 1, max = 1000, message = "Quantity must be between 1 and 1000"))]
    pub quantity: u32,
    #[validate(range(min = 1, max = 1000, message = "Page count must be between 1 and 1000"))]
    pub total_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub genre_id: i64,
    pub publisher_id: i64,
    #[validate(length(min = 1, max = 3, message = "A book needs between one and three authors"))]
    pub author_ids: Vec<i64>,
}

/// Update book request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "ISBN", skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher_id: Option<i64>,
    #[validate(length(min = 1, max = 3, message = "A book needs between one and three authors"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_ids: Option<Vec<i64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn payload(author_ids: Vec<i64>) -> CreateBook {
        CreateBook {
            title: "The Left Hand of Darkness".to_string(),
            isbn: "9780441478125".to_string(),
            price: Decimal::new(12_50, 2),
            quantity: 3,
            total_page: 304,
            publish_date: None,
            description: None,
            image_url: None,
            genre_id: 1,
            publisher_id: 1,
            author_ids,
        }
    }

    #[test]
    fn test_isbn_shapes() {
        assert!(is_valid_isbn("9780441478125"));
        assert!(is_valid_isbn("978-0-441-47812-5"));
        assert!(is_valid_isbn("044147812X"));
        assert!(!is_valid_isbn("not-an-isbn"));
        assert!(!is_valid_isbn("12345"));
    }

    #[test]
    fn test_author_bounds() {
        assert!(payload(vec![1]).validate().is_ok());
        assert!(payload(vec![1, 2, 3]).validate().is_ok());
        assert!(payload(vec![]).validate().is_err());
        assert!(payload(vec![1, 2, 3, 4]).validate().is_err());
    }

    #[test]
    fn test_isbn_wire_name() {
        let json = serde_json::to_string(&payload(vec![1])).unwrap();
        assert!(json.contains("\"ISBN\":\"9780441478125\""));
    }
}
