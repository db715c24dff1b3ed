//! Visualizer backend API client
//!
//! One async method per backend endpoint. Each call sends exactly one
//! request to the configured origin and hands back the backend's answer:
//! - no retries, caching or request coalescing
//! - non-success statuses and transport failures surface as [`ClientError`]
//! - `&self` methods, so any number of calls can be in flight at once

use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::json;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

use super::config::ClientConfig;
use super::download::{self, DownloadedVideo, ProgressCallback, VIDEO_CONTENT_TYPE};
use super::error::{ClientError, Result};
use super::models::VideoMetadata;
use super::response::ApiResponse;
use super::upload::AudioUpload;

/// Backend endpoint paths
pub mod endpoints {
    pub const VIDEO_METADATA: &str = "get-yt-meta-data";
    pub const UPLOAD_AUDIO: &str = "upload-audio";
    pub const UPLOAD_AUDIO_FROM_URL: &str = "upload-audio-from-url";
    pub const GENERATE_PREVIEW_IMAGE: &str = "generate-preview-image";
    pub const GENERATE_VIDEO: &str = "generate-video";
    pub const DOWNLOAD_VIDEO: &str = "download-video";
}

/// Client for the visualizer backend
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct VisualizerApi {
    client: Client,
    config: ClientConfig,
}

impl VisualizerApi {
    /// Create a client for the configured origin
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|source| ClientError::HttpRequest {
                url: config.base_url.to_string(),
                source,
            })?;

        Ok(Self::with_client(client, config))
    }

    /// Create a client from the environment (see [`ClientConfig::from_env`])
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Use an existing `reqwest` client, e.g. one shared with other services
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Fetch title, uploader, duration and thumbnail for a video URL
    pub async fn fetch_video_metadata(&self, video_url: &str) -> Result<VideoMetadata> {
        let request = self
            .request(Method::POST, &[endpoints::VIDEO_METADATA])?
            .json(&json!({ "videoURL": video_url }));

        let response = self.execute(request).await?;
        let metadata: VideoMetadata = response.json()?;

        debug!("Fetched metadata for {}: {:?}", video_url, metadata.title);
        Ok(metadata)
    }

    /// Upload an audio file as multipart form data
    pub async fn upload_audio(&self, upload: AudioUpload) -> Result<ApiResponse> {
        let request = self
            .request(Method::POST, &[endpoints::UPLOAD_AUDIO])?
            .multipart(upload.into_form());

        self.execute(request).await
    }

    /// Ask the backend to fetch the audio of a video by its URL or id
    pub async fn upload_audio_from_url(&self, audio_url_id: &str) -> Result<ApiResponse> {
        let request = self
            .request(Method::POST, &[endpoints::UPLOAD_AUDIO_FROM_URL])?
            .json(&json!({ "audioURLId": audio_url_id }));

        self.execute(request).await
    }

    /// Render a single frame with the given settings
    ///
    /// The body of the returned response is the raw image.
    pub async fn generate_preview_image<S>(&self, settings: &S) -> Result<ApiResponse>
    where
        S: Serialize + ?Sized,
    {
        let body = json!({ "settings": to_value(settings)? });
        let request = self
            .request(Method::POST, &[endpoints::GENERATE_PREVIEW_IMAGE])?
            .json(&body);

        self.execute(request).await
    }

    /// Render a video for a previously uploaded audio file
    pub async fn generate_video<S>(&self, filename: &str, settings: &S) -> Result<ApiResponse>
    where
        S: Serialize + ?Sized,
    {
        let body = json!({ "filename": filename, "settings": to_value(settings)? });
        let request = self
            .request(Method::POST, &[endpoints::GENERATE_VIDEO])?
            .json(&body);

        self.execute(request).await
    }

    /// Download a rendered video into `dest_dir`, saved under `filename`
    pub async fn download_video(&self, filename: &str, dest_dir: &Path) -> Result<DownloadedVideo> {
        self.download_video_with_progress(filename, dest_dir, None).await
    }

    /// Like [`Self::download_video`], reporting progress to `progress_callback`
    pub async fn download_video_with_progress(
        &self,
        filename: &str,
        dest_dir: &Path,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<DownloadedVideo> {
        let local_name = download::local_file_name(filename)?;
        let dest_path = dest_dir.join(local_name);

        let request = self.request(Method::GET, &[endpoints::DOWNLOAD_VIDEO, filename])?;
        let response = self.send(request).await?;
        let response = ensure_success(response).await?;

        let size = download::save_response(response, &dest_path, progress_callback).await?;
        info!("Saved {} ({} bytes)", dest_path.display(), size);

        Ok(DownloadedVideo {
            path: dest_path,
            size,
            content_type: VIDEO_CONTENT_TYPE,
        })
    }

    /// Build a request for the endpoint made of `segments`
    ///
    /// Each segment is percent-encoded, so a filename always stays a single
    /// path segment.
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!("Visualizer API request: {} {}", method, url);
        Ok(self.client.request(method, url))
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Configuration {
                message: format!("'{}' cannot be used as a base URL", self.config.base_url),
                field: Some("base_url".to_string()),
                suggestion: None,
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        Ok(request.send().await?)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<ApiResponse> {
        let response = self.send(request).await?;
        ApiResponse::read(response).await
    }
}

fn to_value<S: Serialize + ?Sized>(settings: &S) -> Result<serde_json::Value> {
    serde_json::to_value(settings).map_err(|source| ClientError::Encode { source })
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            debug!("Failed to read error body from {}: {}", url, e);
            String::new()
        }
    };
    Err(ClientError::Status { url, status, body })
}
