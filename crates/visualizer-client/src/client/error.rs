//! Error types for the visualizer API client
//!
//! Every failure is forwarded to the caller as-is. Nothing here retries or
//! recovers; the variants only attach the context (URL, path, status) that
//! the underlying error lacks.

use std::path::PathBuf;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`crate::VisualizerApi`] operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure or failure reading the response body
    #[error("HTTP request to '{url}' failed")]
    HttpRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status
    #[error("Request to '{url}' returned {status}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// The response payload was not the expected JSON
    #[error("Failed to decode response from '{url}'")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request payload could not be serialized
    #[error("Failed to encode request payload")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    /// File system errors while staging a download
    #[error("File operation failed on '{path}' ({operation})")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    /// The base URL or an endpoint could not be parsed
    #[error("Invalid URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Configuration errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
        suggestion: Option<String>,
    },
}

/// Types of file operations for error context
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    Read,
    Write,
    Create,
    Move,
    CreateDir,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Create => write!(f, "creating"),
            FileOperation::Move => write!(f, "moving"),
            FileOperation::CreateDir => write!(f, "creating directory"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ClientError::HttpRequest { .. } => "http_request",
            ClientError::Status { .. } => "status",
            ClientError::Decode { .. } => "decode",
            ClientError::Encode { .. } => "encode",
            ClientError::FileSystem { .. } => "file_system",
            ClientError::InvalidUrl { .. } => "invalid_url",
            ClientError::Configuration { .. } => "configuration",
        }
    }

    /// HTTP status attached to the error, if the backend answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::HttpRequest { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Get user-facing suggestion for resolving the error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ClientError::HttpRequest { source, .. } if source.is_connect() => {
                Some("Check that the visualizer backend is running and reachable")
            }
            ClientError::Configuration { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn file_system(path: impl Into<PathBuf>, operation: FileOperation, source: std::io::Error) -> Self {
        ClientError::FileSystem {
            path: path.into(),
            operation,
            source,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        let url = error.url().map(|u| u.to_string()).unwrap_or_else(|| "<unknown>".to_string());
        ClientError::HttpRequest { url, source: error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_exposes_status() {
        let error = ClientError::Status {
            url: "http://127.0.0.1:8000/generate-video".to_string(),
            status: StatusCode::BAD_REQUEST,
            body: r#"{"error":"videoURL is required"}"#.to_string(),
        };

        assert_eq!(error.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(error.category(), "status");
        assert_eq!(
            error.to_string(),
            "Request to 'http://127.0.0.1:8000/generate-video' returned 400 Bad Request"
        );
    }

    #[test]
    fn test_file_system_error_message() {
        let error = ClientError::file_system(
            "/tmp/out/clip.mp4.part",
            FileOperation::Write,
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );

        assert_eq!(error.category(), "file_system");
        assert!(error.status().is_none());
        assert!(error.to_string().contains("clip.mp4.part"));
        assert!(error.to_string().contains("writing"));
    }

    #[test]
    fn test_configuration_suggestion() {
        let error = ClientError::Configuration {
            message: "timeout must be a number of seconds".to_string(),
            field: Some("VISUALIZER_TIMEOUT_SECS".to_string()),
            suggestion: Some("Set VISUALIZER_TIMEOUT_SECS to e.g. 300".to_string()),
        };

        assert_eq!(error.suggestion(), Some("Set VISUALIZER_TIMEOUT_SECS to e.g. 300"));
    }
}
