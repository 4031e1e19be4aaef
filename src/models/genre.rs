//! Genre model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Genre model from the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create genre request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateGenre {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
}

/// Update genre request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpdateGenre {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
