//! Buffered HTTP responses handed back to callers untouched

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::{ClientError, Result};

/// A complete backend response: status, headers, final URL and raw body
///
/// Operations that return the "full response" hand this back without
/// looking at the body. Decoding is left to the caller.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub url: String,
    pub body: Bytes,
}

impl ApiResponse {
    /// Read the whole body of a successful response
    ///
    /// Non-success statuses are turned into [`ClientError::Status`] with the
    /// body text attached.
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let url = response.url().to_string();
        let headers = response.headers().clone();

        let body = response.bytes().await.map_err(|source| ClientError::HttpRequest {
            url: url.clone(),
            source,
        })?;

        debug!(%url, %status, size = body.len(), "Visualizer API response");

        if !status.is_success() {
            return Err(ClientError::Status {
                url,
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(Self {
            status,
            headers,
            url,
            body,
        })
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|source| ClientError::Decode {
            url: self.url.clone(),
            source,
        })
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }
}
