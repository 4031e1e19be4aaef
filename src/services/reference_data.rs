//! Reference collections for form dropdowns
//!
//! Forms with relational fields load the referenced collections on entry.
//! Independent collections are fetched in parallel; each call is a plain
//! listing with a page size large enough for selection lists.

use crate::api::{Api, PageQuery};
use crate::error::AppResult;
use crate::models::{Author, Book, Borrowing, Genre, Member, Publisher};

/// Page size used when a collection backs a dropdown rather than a table
const SELECT_PAGE_LIMIT: u32 = 200;

/// Collections the book form needs
#[derive(Debug, Clone)]
pub struct BookFormOptions {
    pub genres: Vec<Genre>,
    pub authors: Vec<Author>,
    pub publishers: Vec<Publisher>,
}

#[derive(Clone)]
pub struct ReferenceDataService {
    api: Api,
}

impl ReferenceDataService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    fn select_query() -> PageQuery {
        PageQuery::new(1, SELECT_PAGE_LIMIT)
    }

    /// Genres, authors and publishers for the book form, fetched in parallel
    pub async fn book_form_options(&self) -> AppResult<BookFormOptions> {
        let query = Self::select_query();
        let (genres, authors, publishers) = tokio::try_join!(
            self.api.genres.list(&query),
            self.api.authors.list(&query),
            self.api.publishers.list(&query),
        )?;

        Ok(BookFormOptions {
            genres: genres.data,
            authors: authors.data,
            publishers: publishers.data,
        })
    }

    /// Members for the borrowing form
    pub async fn members(&self) -> AppResult<Vec<Member>> {
        Ok(self.api.members.list(&Self::select_query()).await?.data)
    }

    /// Books for the borrowing item lines
    pub async fn books(&self) -> AppResult<Vec<Book>> {
        Ok(self.api.books.list(&Self::select_query()).await?.data)
    }

    /// Members and books together, for the borrowing form
    pub async fn borrowing_form_options(&self) -> AppResult<(Vec<Member>, Vec<Book>)> {
        let query = Self::select_query();
        let (members, books) =
            tokio::try_join!(self.api.members.list(&query), self.api.books.list(&query))?;
        Ok((members.data, books.data))
    }

    /// Borrowings for the fine ticket form
    pub async fn borrowings(&self) -> AppResult<Vec<Borrowing>> {
        Ok(self.api.borrowings.list(&Self::select_query()).await?.data)
    }
}
