//! Collection totals and recent activity for the dashboard screen

use crate::api::{Api, PageQuery};
use crate::error::AppResult;
use crate::models::Borrowing;

/// Everything the dashboard renders
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub total_books: u64,
    pub total_authors: u64,
    pub total_members: u64,
    pub total_borrowings: u64,
    pub total_fine_tickets: u64,
    pub recent_borrowings: Vec<Borrowing>,
}

#[derive(Clone)]
pub struct DashboardService {
    api: Api,
}

impl DashboardService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// Fetch the totals in parallel. Totals come from the listing envelope's
    /// `total_items`, so a one-row page per collection is enough.
    pub async fn summary(&self) -> AppResult<DashboardSummary> {
        let probe = PageQuery::new(1, 1);
        let recent = PageQuery::new(1, 5);

        let (books, authors, members, borrowings, fine_tickets) = tokio::try_join!(
            self.api.books.list(&probe),
            self.api.authors.list(&probe),
            self.api.members.list(&probe),
            self.api.borrowings.list(&recent),
            self.api.fine_tickets.list(&probe),
        )?;

        Ok(DashboardSummary {
            total_books: books.total_items,
            total_authors: authors.total_items,
            total_members: members.total_items,
            total_borrowings: borrowings.total_items,
            total_fine_tickets: fine_tickets.total_items,
            recent_borrowings: borrowings.data,
        })
    }
}
