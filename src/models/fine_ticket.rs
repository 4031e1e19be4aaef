//! Fine ticket model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::borrowing::Borrowing;
use super::enums::{FineTicketStatus, PaymentMethod};

/// Fine ticket raised against a borrowing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FineTicket {
    pub id: i64,
    pub borrowing_id: i64,
    pub total_fine_amount: Decimal,
    pub status: FineTicketStatus,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub borrowing: Option<Borrowing>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create fine ticket request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateFineTicket {
    pub borrowing_id: i64,
    pub total_fine_amount: Decimal,
    pub status: FineTicketStatus,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
}

/// Update fine ticket request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpdateFineTicket {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrowing_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_fine_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FineTicketStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
}
