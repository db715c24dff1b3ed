//! Saving rendered videos to disk
//!
//! The response body is written to a uniquely named `.part` file next to
//! the destination and renamed into place once complete. [`PartFile`] owns
//! the temporary file and deletes it when dropped without being persisted,
//! so an error anywhere between creation and rename leaves nothing behind.

use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tempfile::TempPath;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::error::{ClientError, FileOperation, Result};

/// Content type downloaded videos are tagged with
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Progress callback for video downloads
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Events emitted while a video is downloaded
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    DownloadStarted {
        url: String,
        total_size: Option<u64>,
    },
    DownloadProgress {
        url: String,
        downloaded: u64,
        total: Option<u64>,
        speed_bps: f64,
    },
    DownloadComplete {
        url: String,
        final_size: u64,
    },
}

/// A video saved by [`crate::VisualizerApi::download_video`]
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedVideo {
    pub path: PathBuf,
    pub size: u64,
    pub content_type: &'static str,
}

/// Temporary download file, removed on drop unless persisted
///
/// Each download stages into its own uniquely named file next to the
/// destination, so concurrent downloads of the same name never share one.
pub(crate) struct PartFile {
    file: Option<fs::File>,
    temp_path: Option<TempPath>,
    dest_path: PathBuf,
}

impl PartFile {
    pub(crate) async fn create(dest_path: &Path) -> Result<Self> {
        let parent = match dest_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ClientError::file_system(parent, FileOperation::CreateDir, e))?;

        let prefix = match dest_path.file_name() {
            Some(name) => format!(".{}.", name.to_string_lossy()),
            None => ".download.".to_string(),
        };
        let named = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".part")
            .tempfile_in(parent)
            .map_err(|e| ClientError::file_system(parent, FileOperation::Create, e))?;
        let (file, temp_path) = named.into_parts();

        Ok(Self {
            file: Some(fs::File::from_std(file)),
            temp_path: Some(temp_path),
            dest_path: dest_path.to_path_buf(),
        })
    }

    pub(crate) fn temp_path(&self) -> &Path {
        self.temp_path.as_deref().unwrap_or(&self.dest_path)
    }

    pub(crate) async fn write(&mut self, chunk: &[u8]) -> Result<()> {
        let temp_path = self.temp_path.as_deref().unwrap_or(&self.dest_path);
        let Some(file) = self.file.as_mut() else {
            return Err(ClientError::file_system(
                temp_path,
                FileOperation::Write,
                std::io::Error::new(std::io::ErrorKind::Other, "part file already closed"),
            ));
        };

        file.write_all(chunk)
            .await
            .map_err(|e| ClientError::file_system(temp_path, FileOperation::Write, e))
    }

    /// Flush, sync and rename the file to its destination
    pub(crate) async fn persist(mut self) -> Result<PathBuf> {
        if let Some(mut file) = self.file.take() {
            file.flush()
                .await
                .map_err(|e| ClientError::file_system(self.temp_path(), FileOperation::Write, e))?;
            file.sync_all()
                .await
                .map_err(|e| ClientError::file_system(self.temp_path(), FileOperation::Write, e))?;
        }

        if let Some(temp_path) = self.temp_path.take() {
            let staged = temp_path.to_path_buf();
            // On failure the returned TempPath is dropped, which removes the file
            temp_path
                .persist(&self.dest_path)
                .map_err(|e| ClientError::file_system(&staged, FileOperation::Move, e.error))?;
            debug!("Renamed {} to {}", staged.display(), self.dest_path.display());
        }

        Ok(self.dest_path.clone())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        // Close the handle before unlinking
        self.file.take();

        let Some(temp_path) = self.temp_path.take() else {
            return;
        };
        let staged = temp_path.to_path_buf();
        match temp_path.close() {
            Ok(()) => debug!("Removed incomplete download {}", staged.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {}", staged.display(), e),
        }
    }
}

/// File name a download is saved under inside the destination directory
///
/// Only the final path component is used, so a name can never escape the
/// destination directory.
pub(crate) fn local_file_name(filename: &str) -> Result<&str> {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| *name == filename)
        .ok_or_else(|| ClientError::Configuration {
            message: format!("'{}' is not a plain file name", filename),
            field: Some("filename".to_string()),
            suggestion: Some("Pass the name returned by generate-video, e.g. video.mp4".to_string()),
        })
}

/// Stream a successful response body into `dest_path`
pub(crate) async fn save_response(
    response: reqwest::Response,
    dest_path: &Path,
    progress_callback: Option<ProgressCallback>,
) -> Result<u64> {
    let url = response.url().to_string();
    let total_size = response.content_length();

    if let Some(ref callback) = progress_callback {
        callback(ProgressEvent::DownloadStarted {
            url: url.clone(),
            total_size,
        });
    }

    let mut part = PartFile::create(dest_path).await?;
    debug!("Streaming {} into {}", url, part.temp_path().display());

    let mut stream = response.bytes_stream();
    let mut downloaded = 0u64;
    let start_time = Instant::now();
    let mut last_progress_time = start_time;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|source| ClientError::HttpRequest {
            url: url.clone(),
            source,
        })?;

        part.write(&chunk).await?;
        downloaded += chunk.len() as u64;

        // Report progress at most every 100ms
        let now = Instant::now();
        if now.duration_since(last_progress_time).as_millis() >= 100 {
            if let Some(ref callback) = progress_callback {
                let elapsed = start_time.elapsed().as_secs_f64();
                let speed_bps = if elapsed > 0.0 { downloaded as f64 / elapsed } else { 0.0 };
                callback(ProgressEvent::DownloadProgress {
                    url: url.clone(),
                    downloaded,
                    total: total_size,
                    speed_bps,
                });
            }
            last_progress_time = now;
        }
    }

    part.persist().await?;

    if let Some(ref callback) = progress_callback {
        callback(ProgressEvent::DownloadComplete {
            url,
            final_size: downloaded,
        });
    }

    Ok(downloaded)
}
