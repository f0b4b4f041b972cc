use std::time::Duration;

use okreads_core::{Book, ReadingListItem};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{ApiError, FailureKind};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// The backend calls the core depends on.
#[async_trait::async_trait]
pub trait BooksApi: Send + Sync {
    async fn fetch_reading_list(&self) -> Result<Vec<ReadingListItem>, ApiError>;

    async fn create_reading_list_item(&self, book: &Book) -> Result<(), ApiError>;

    async fn delete_reading_list_item(&self, book_id: &str) -> Result<(), ApiError>;

    async fn search_catalog(&self, term: &str) -> Result<Vec<Book>, ApiError>;
}

/// HTTP client for the okreads backend (`/api/reading-list`, `/api/books/search`).
#[derive(Debug, Clone)]
pub struct ReqwestBooksApi {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestBooksApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            error_message(&body).unwrap_or_else(|| status.to_string()),
        ))
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl BooksApi for ReqwestBooksApi {
    async fn fetch_reading_list(&self) -> Result<Vec<ReadingListItem>, ApiError> {
        let url = self.endpoint(&["api", "reading-list"])?;
        let response = self.send(self.client.get(url)).await?;
        Self::read_json(response).await
    }

    async fn create_reading_list_item(&self, book: &Book) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "reading-list"])?;
        let body = serde_json::to_vec(book)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        let request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        self.send(request).await?;
        Ok(())
    }

    async fn delete_reading_list_item(&self, book_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "reading-list", book_id])?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn search_catalog(&self, term: &str) -> Result<Vec<Book>, ApiError> {
        let mut url = self.endpoint(&["api", "books", "search"])?;
        url.query_pairs_mut().append_pair("q", term);
        let response = self.send(self.client.get(url)).await?;
        Self::read_json(response).await
    }
}

/// Pulls the `message` field out of a JSON error body, if there is one.
fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(message) => Some(message.clone()),
        serde_json::Value::Array(parts) => {
            let joined = parts
                .iter()
                .filter_map(serde_json::Value::as_str)
                .collect::<Vec<_>>()
                .join("; ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
