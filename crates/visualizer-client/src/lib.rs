//! Visualizer Client Library
//!
//! Async client for the audio visualizer backend: fetch video metadata,
//! upload audio, render preview frames and videos, and download the result.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use visualizer_client::{ClientConfig, GeneratedVideo, VisualizerApi, VisualizerSettings};
//! use std::path::Path;
//!
//! # async fn example() -> visualizer_client::Result<()> {
//! let api = VisualizerApi::new(ClientConfig::new("http://127.0.0.1:8000")?)?;
//!
//! let metadata = api
//!     .fetch_video_metadata("https://www.youtube.com/watch?v=wXhTHyIgQ_U")
//!     .await?;
//! println!("Title: {:?}", metadata.title);
//!
//! api.upload_audio_from_url("wXhTHyIgQ_U").await?;
//!
//! let settings = VisualizerSettings {
//!     file_name: "circles".to_string(),
//!     ..Default::default()
//! };
//! let rendered: GeneratedVideo = api
//!     .generate_video("wXhTHyIgQ_U.mp3", &settings)
//!     .await?
//!     .json()?;
//!
//! if let Some(filename) = rendered.filename() {
//!     let saved = api.download_video(&filename, Path::new(".")).await?;
//!     println!("Saved {} ({} bytes)", saved.path.display(), saved.size);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Failures are never retried or reinterpreted: transport errors,
//! non-success statuses and malformed payloads come back as [`ClientError`].

pub mod client;

// Re-export commonly used types for convenience
pub use client::{
    ApiResponse, AudioUpload, ClientConfig, ClientError, DownloadedVideo, GeneratedVideo,
    ProgressCallback, ProgressEvent, Result, UploadStatus, VideoMetadata, VisualizerApi,
    VisualizerSettings,
};
