//! Visualizer API client module
//!
//! Configuration, error types, payload models and the client itself.

pub mod api;
pub mod config;
pub mod download;
pub mod error;
pub mod models;
pub mod response;
pub mod upload;

// Re-export main types for convenience
pub use api::{VisualizerApi, endpoints};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use download::{DownloadedVideo, ProgressCallback, ProgressEvent, VIDEO_CONTENT_TYPE};
pub use error::{ClientError, FileOperation, Result};
pub use models::{GeneratedVideo, Style, StyleVariant, UploadStatus, VideoMetadata, Visualization, VisualizerSettings};
pub use response::ApiResponse;
pub use upload::AudioUpload;
