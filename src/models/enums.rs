//! Shared domain enums (wire format: SCREAMING_SNAKE_CASE strings)

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BorrowingStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a borrowing transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BorrowingStatus {
    Borrowing,
    Returned,
    Overdue,
    Cancelled,
    Pending,
    Lost,
    Compensated,
    PaidFine,
}

impl BorrowingStatus {
    /// All statuses, in selection order
    pub fn all() -> &'static [BorrowingStatus] {
        &[
            BorrowingStatus::Borrowing,
            BorrowingStatus::Returned,
            BorrowingStatus::Overdue,
            BorrowingStatus::Cancelled,
            BorrowingStatus::Pending,
            BorrowingStatus::Lost,
            BorrowingStatus::Compensated,
            BorrowingStatus::PaidFine,
        ]
    }
}

impl std::fmt::Display for BorrowingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BorrowingStatus::Borrowing => "Borrowing",
            BorrowingStatus::Returned => "Returned",
            BorrowingStatus::Overdue => "Overdue",
            BorrowingStatus::Cancelled => "Cancelled",
            BorrowingStatus::Pending => "Pending",
            BorrowingStatus::Lost => "Lost",
            BorrowingStatus::Compensated => "Compensated",
            BorrowingStatus::PaidFine => "Fine paid",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// MemberType
// ---------------------------------------------------------------------------

/// Member category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberType {
    UndergraduateStudent,
    PostgraduateStudent,
    LibraryStaff,
}

impl MemberType {
    pub fn all() -> &'static [MemberType] {
        &[
            MemberType::UndergraduateStudent,
            MemberType::PostgraduateStudent,
            MemberType::LibraryStaff,
        ]
    }
}

impl std::fmt::Display for MemberType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MemberType::UndergraduateStudent => "Undergraduate student",
            MemberType::PostgraduateStudent => "Postgraduate student",
            MemberType::LibraryStaff => "Library staff",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// FineTicketStatus
// ---------------------------------------------------------------------------

/// Payment status of a fine ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FineTicketStatus {
    Unpaid,
    Paid,
}

impl FineTicketStatus {
    pub fn all() -> &'static [FineTicketStatus] {
        &[FineTicketStatus::Unpaid, FineTicketStatus::Paid]
    }
}

impl std::fmt::Display for FineTicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FineTicketStatus::Unpaid => "Unpaid",
            FineTicketStatus::Paid => "Paid",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// PaymentMethod
// ---------------------------------------------------------------------------

/// How a fine was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
}

impl PaymentMethod {
    pub fn all() -> &'static [PaymentMethod] {
        &[PaymentMethod::Cash, PaymentMethod::BankTransfer]
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::BankTransfer => "Bank transfer",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&BorrowingStatus::PaidFine).unwrap();
        assert_eq!(json, "\"PAID_FINE\"");
        let back: BorrowingStatus = serde_json::from_str("\"OVERDUE\"").unwrap();
        assert_eq!(back, BorrowingStatus::Overdue);
    }

    #[test]
    fn test_member_type_wire_format() {
        let json = serde_json::to_string(&MemberType::UndergraduateStudent).unwrap();
        assert_eq!(json, "\"UNDERGRADUATE_STUDENT\"");
    }
}
