//! Data models for the Biblio admin console

pub mod author;
pub mod book;
pub mod borrowing;
pub mod enums;
pub mod fine_ticket;
pub mod genre;
pub mod member;
pub mod publisher;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookAuthorItem};
pub use borrowing::{Borrowing, BorrowingItem};
pub use enums::{BorrowingStatus, FineTicketStatus, MemberType, PaymentMethod};
pub use fine_ticket::FineTicket;
pub use genre::Genre;
pub use member::Member;
pub use publisher::Publisher;
