//! HTTP/JSON boundary with the library backend
//!
//! Every endpoint answers with the same envelope (`{status, message, data, meta, errors}`);
//! this module turns transport failures, HTTP statuses and envelope statuses into [`AppError`]
//! so that services only deal with typed payloads.

use std::sync::RwLock;

use reqwest::{header, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
    models::{ApiEnvelope, PageMeta, Paginated},
};

/// Query parameter names of a paginated endpoint.
///
/// Older endpoints take `limit`/`keyword`, newer ones `per_page`/`search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: &'static str,
    pub per_page: &'static str,
    pub search: &'static str,
}

impl PageParams {
    pub const LIMIT_KEYWORD: PageParams = PageParams {
        page: "page",
        per_page: "limit",
        search: "keyword",
    };

    pub const PER_PAGE_SEARCH: PageParams = PageParams {
        page: "page",
        per_page: "per_page",
        search: "search",
    };

    /// Build the base pagination parameters; an empty search is omitted
    pub fn build(&self, page: u32, per_page: u32, search: &str) -> Vec<(String, String)> {
        let mut params = vec![
            (self.page.to_string(), page.to_string()),
            (self.per_page.to_string(), per_page.to_string()),
        ];
        let search = search.trim();
        if !search.is_empty() {
            params.push((self.search.to_string(), search.to_string()));
        }
        params
    }
}

/// `data` of a list response: either a bare array or a nested paginator object
#[derive(Deserialize)]
#[serde(untagged)]
enum PageData<T> {
    List(Vec<T>),
    Nested {
        data: Vec<T>,
        #[serde(flatten)]
        meta: Option<PageMeta>,
    },
}

/// REST client holding the bearer token of the current session
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.into());
    }

    pub fn clear_token(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    pub fn has_token(&self) -> bool {
        self.current_token().is_some()
    }

    fn current_token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, self.url(path))
            .header(header::ACCEPT, "application/json");

        match self.current_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<ApiEnvelope<T>> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        decode_envelope(status, &body)
    }

    /// GET a single payload
    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(String, String)]) -> AppResult<T> {
        tracing::debug!("GET {} {:?}", path, params);
        let envelope = self.execute(self.request(Method::GET, path).query(params)).await?;
        require_data(envelope)
    }

    /// GET one page of a list endpoint
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> AppResult<Paginated<T>> {
        tracing::debug!("GET {} {:?}", path, params);
        let envelope: ApiEnvelope<PageData<T>> =
            self.execute(self.request(Method::GET, path).query(params)).await?;
        Ok(into_page(envelope))
    }

    /// POST a JSON body and decode the returned payload
    pub async fn post<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("POST {}", path);
        let envelope = self.execute(self.request(Method::POST, path).json(body)).await?;
        require_data(envelope)
    }

    /// POST a JSON body when only the outcome matters; returns the server message
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> AppResult<Option<String>>
    where
        B: Serialize + ?Sized,
    {
        tracing::debug!("POST {}", path);
        let envelope: ApiEnvelope<serde_json::Value> =
            self.execute(self.request(Method::POST, path).json(body)).await?;
        Ok(envelope.message)
    }

    /// PUT a JSON body and decode the returned payload
    pub async fn put<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("PUT {}", path);
        let envelope = self.execute(self.request(Method::PUT, path).json(body)).await?;
        require_data(envelope)
    }

    pub async fn delete(&self, path: &str) -> AppResult<()> {
        tracing::debug!("DELETE {}", path);
        let _: ApiEnvelope<serde_json::Value> =
            self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

fn require_data<T>(envelope: ApiEnvelope<T>) -> AppResult<T> {
    envelope
        .data
        .ok_or_else(|| AppError::api("Response did not contain any data"))
}

fn into_page<T>(envelope: ApiEnvelope<PageData<T>>) -> Paginated<T> {
    let outer_meta = envelope.meta;
    let (rows, nested_meta) = match envelope.data {
        Some(PageData::List(rows)) => (rows, None),
        Some(PageData::Nested { data, meta }) => (data, meta),
        None => (Vec::new(), None),
    };

    let meta = outer_meta.or(nested_meta).unwrap_or_else(|| PageMeta {
        page: 1,
        per_page: rows.len() as u32,
        total: rows.len() as u64,
        last_page: 1,
    });

    Paginated { rows, meta }
}

/// Map an HTTP status and body to an envelope or an error
pub(crate) fn decode_envelope<T: DeserializeOwned>(status: u16, body: &[u8]) -> AppResult<ApiEnvelope<T>> {
    if !(200..300).contains(&status) {
        return Err(error_from_body(status, body));
    }

    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(ApiEnvelope {
            status: None,
            message: None,
            data: None,
            meta: None,
            errors: None,
        });
    }

    let envelope: ApiEnvelope<T> = serde_json::from_slice(body)?;
    if envelope.is_success() {
        return Ok(envelope);
    }

    match envelope.errors {
        Some(errors) if !errors.is_empty() => Err(AppError::Validation(errors)),
        _ => Err(AppError::Api {
            status: Some(status),
            message: envelope.message.unwrap_or_default(),
        }),
    }
}

fn error_from_body(status: u16, body: &[u8]) -> AppError {
    let envelope = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(body).ok();
    let message = envelope
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_default();
    let errors = envelope.and_then(|e| e.errors).filter(|e| !e.is_empty());

    if let Some(errors) = errors {
        return AppError::Validation(errors);
    }

    match status {
        401 => AppError::Unauthorized(message),
        404 => AppError::NotFound(message),
        _ => {
            tracing::warn!("Request failed with status {}: {}", status, message);
            AppError::Api {
                status: Some(status),
                message,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_page_params_skip_blank_search() {
        let params = PageParams::LIMIT_KEYWORD.build(2, 10, "  ");
        assert_eq!(
            params,
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "10".to_string())
            ]
        );

        let params = PageParams::PER_PAGE_SEARCH.build(1, 25, " dune ");
        assert_eq!(params[2], ("search".to_string(), "dune".to_string()));
    }

    #[test]
    fn test_decode_failure_status() {
        let body = br#"{"status": "error", "message": "Item is not available"}"#;
        let err = decode_envelope::<serde_json::Value>(200, body).unwrap_err();
        match err {
            AppError::Api { status, message } => {
                assert_eq!(status, Some(200));
                assert_eq!(message, "Item is not available");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_validation_errors() {
        let body = br#"{"status": "error", "message": "Invalid", "errors": {"name": ["Taken"]}}"#;
        let err = decode_envelope::<serde_json::Value>(422, body).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e.len() == 1));
    }

    #[test]
    fn test_decode_http_statuses() {
        assert!(matches!(
            decode_envelope::<serde_json::Value>(401, b"{}").unwrap_err(),
            AppError::Unauthorized(_)
        ));
        assert!(matches!(
            decode_envelope::<serde_json::Value>(404, b"not json").unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            decode_envelope::<serde_json::Value>(500, b"").unwrap_err(),
            AppError::Api { status: Some(500), .. }
        ));
    }

    #[test]
    fn test_nested_paginator() {
        let body = br#"{"status": "success", "data": {"data": [{"id": 1, "name": "Fiction"}],
            "current_page": 2, "per_page": 1, "total": 3, "last_page": 3}}"#;
        let envelope = decode_envelope::<PageData<Category>>(200, body).unwrap();
        let page = into_page(envelope);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.meta.page, 2);
        assert!(page.has_more());
    }

    #[test]
    fn test_flat_list_with_meta() {
        let body = br#"{"status": "success", "data": [{"id": 1, "name": "Fiction"}, {"id": 2, "name": "Poetry"}],
            "meta": {"page": 1, "per_page": 2, "total": 2, "last_page": 1}}"#;
        let page = into_page(decode_envelope::<PageData<Category>>(200, body).unwrap());
        assert_eq!(page.rows[1].name, "Poetry");
        assert!(!page.has_more());
    }
}
