//! Biblio Library Management Admin Console
//!
//! A terminal client for a library-management REST API: CRUD screens for
//! books, authors, genres, publishers, members, borrowings and fine tickets,
//! backed by typed API façades and a two-phase borrowing workflow.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod services;
pub mod ui;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
