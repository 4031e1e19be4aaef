//! Typed façades over the library management REST API
//!
//! Every endpoint wraps its payload in the same envelope; the envelope's
//! `results` flag, not the HTTP status, signals whether the server accepted
//! the operation. The envelope is decoded exactly once here and callers get
//! an `AppResult` to pattern-match on. Façades hold no state beyond the
//! shared client: no caching, no retries, no local mutation.

pub mod authors;
pub mod books;
pub mod borrowing_items;
pub mod borrowings;
pub mod fine_tickets;
pub mod genres;
pub mod members;
pub mod publishers;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};

/// Uniform response envelope: `results == "1"` is success, anything else is a
/// handled server-side rejection described by `error` / `errorMessage`
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct Envelope<T> {
    pub results: String,
    #[serde(rename = "dataPart", default)]
    pub data_part: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(rename = "errorMessage", default)]
    pub error_message: Option<Vec<String>>,
}

impl<T> Envelope<T> {
    fn rejection_message(error: Option<String>, error_message: Option<Vec<String>>) -> String {
        error
            .filter(|m| !m.is_empty())
            .or_else(|| error_message.and_then(|mut ms| if ms.is_empty() { None } else { Some(ms.remove(0)) }))
            .unwrap_or_else(|| "The server rejected the operation".to_string())
    }

    /// Unwrap the payload, turning `results != "1"` into [`AppError::Api`]
    pub fn into_result(self) -> AppResult<T> {
        if self.results == "1" {
            self.data_part.ok_or(AppError::Api {
                message: "Response was missing its data part".to_string(),
            })
        } else {
            Err(AppError::Api {
                message: Self::rejection_message(self.error, self.error_message),
            })
        }
    }

    /// Like [`Envelope::into_result`] but for operations whose payload the
    /// caller does not use (deletes)
    pub fn into_ack(self) -> AppResult<()> {
        if self.results == "1" {
            Ok(())
        } else {
            Err(AppError::Api {
                message: Self::rejection_message(self.error, self.error_message),
            })
        }
    }
}

/// Paginated data part of a listing response
#[derive(Debug, Clone, Deserialize)]
pub struct PageData<T> {
    pub data: Vec<T>,
    pub limit: u32,
    pub current_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

/// Query parameters for listing endpoints
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
}

impl PageQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }
}

/// Shared HTTP client for all façades
///
/// Requests carry no timeout: a hung request keeps the caller suspended and
/// the screen in its loading state.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<Envelope<T>> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::decode(response).await?.into_result()
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self.http.get(self.url(path)).query(query).send().await?;
        Self::decode(response).await?.into_result()
    }

    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &PageQuery,
    ) -> AppResult<PageData<T>> {
        let response = self.http.get(self.url(path)).query(query).send().await?;
        Self::decode(response).await?.into_result()
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await?.into_result()
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.http.put(self.url(path)).json(body).send().await?;
        Self::decode(response).await?.into_result()
    }

    pub async fn patch<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.http.patch(self.url(path)).send().await?;
        Self::decode(response).await?.into_result()
    }

    pub async fn delete(&self, path: &str) -> AppResult<()> {
        let response = self.http.delete(self.url(path)).send().await?;
        Self::decode::<serde_json::Value>(response).await?.into_ack()
    }
}

/// Container for all entity façades
#[derive(Clone)]
pub struct Api {
    pub authors: authors::AuthorsApi,
    pub books: books::BooksApi,
    pub genres: genres::GenresApi,
    pub publishers: publishers::PublishersApi,
    pub members: members::MembersApi,
    pub borrowings: borrowings::BorrowingsApi,
    pub borrowing_items: borrowing_items::BorrowingItemsApi,
    pub fine_tickets: fine_tickets::FineTicketsApi,
}

impl Api {
    /// Create all façades over one shared client
    pub fn new(client: ApiClient) -> Self {
        Self {
            authors: authors::AuthorsApi::new(client.clone()),
            books: books::BooksApi::new(client.clone()),
            genres: genres::GenresApi::new(client.clone()),
            publishers: publishers::PublishersApi::new(client.clone()),
            members: members::MembersApi::new(client.clone()),
            borrowings: borrowings::BorrowingsApi::new(client.clone()),
            borrowing_items: borrowing_items::BorrowingItemsApi::new(client.clone()),
            fine_tickets: fine_tickets::FineTicketsApi::new(client),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_unwraps_data_part() {
        let envelope: Envelope<i64> =
            serde_json::from_str(r#"{"results":"1","dataPart":42}"#).unwrap();
        assert_eq!(envelope.into_result().unwrap(), 42);
    }

    #[test]
    fn test_rejection_carries_error_field() {
        let envelope: Envelope<i64> =
            serde_json::from_str(r#"{"results":"0","error":"Title already exists"}"#).unwrap();
        let err = envelope.into_result().unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(err.user_message(), "Title already exists");
    }

    #[test]
    fn test_rejection_falls_back_to_error_message_list() {
        let envelope: Envelope<i64> =
            serde_json::from_str(r#"{"results":"0","errorMessage":["quantity is required"]}"#)
                .unwrap();
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.user_message(), "quantity is required");
    }

    #[test]
    fn test_rejection_generic_fallback() {
        let envelope: Envelope<i64> = serde_json::from_str(r#"{"results":"0"}"#).unwrap();
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.user_message(), "The server rejected the operation");
    }

    #[test]
    fn test_page_envelope_shape() {
        let raw = r#"{
            "results": "1",
            "dataPart": {
                "data": [1, 2, 3],
                "limit": 10,
                "current_page": 1,
                "total_items": 25,
                "total_pages": 3
            }
        }"#;
        let envelope: Envelope<PageData<i64>> = serde_json::from_str(raw).unwrap();
        let page = envelope.into_result().unwrap();
        assert_eq!(page.data, vec![1, 2, 3]);
        assert_eq!(page.total_items, 25);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_ack_ignores_missing_data_part() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"results":"1"}"#).unwrap();
        assert!(envelope.into_ack().is_ok());
    }
}
