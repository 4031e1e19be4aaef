//! Member model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::MemberType;

/// Member model from the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub member_type: MemberType,
    pub enrollment_date: NaiveDate,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Member {
    /// Label used in selection dropdowns
    pub fn select_label(&self) -> String {
        format!("{} ({} - {})", self.name, self.email, self.member_type)
    }
}

/// Create member request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateMember {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number must not be empty"))]
    pub phone_number: String,
    #[validate(length(min = 1, message = "Address must not be empty"))]
    pub address: String,
    pub member_type: MemberType,
    pub enrollment_date: NaiveDate,
}

/// Update member request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpdateMember {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(email(message = "Email is not valid"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_type: Option<MemberType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_date: Option<NaiveDate>,
}
