//! Multipart payloads for the audio upload endpoint

use reqwest::multipart::{Form, Part};
use std::path::Path;
use tokio::fs;

use super::error::{ClientError, FileOperation, Result};

/// Form field the backend reads the audio file from
pub const AUDIO_FIELD: &str = "file";

/// Multipart form sent to `/upload-audio`
///
/// The form is opaque to the client: any [`Form`] can be wrapped with
/// [`AudioUpload::from_form`]. The other constructors build the single
/// `file` part the backend expects.
#[derive(Debug)]
pub struct AudioUpload {
    form: Form,
}

impl AudioUpload {
    pub fn from_form(form: Form) -> Self {
        Self { form }
    }

    /// Upload in-memory audio under the given file name
    pub fn from_bytes<S: Into<String>>(file_name: S, data: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name).first_or_octet_stream();

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(mime.essence_str())
            .map_err(|source| ClientError::HttpRequest {
                url: "<multipart>".to_string(),
                source,
            })?;

        Ok(Self::from_form(Form::new().part(AUDIO_FIELD, part)))
    }

    /// Read an audio file from disk; its file name is sent along with it
    pub async fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ClientError::Configuration {
                message: format!("'{}' has no usable file name", path.display()),
                field: None,
                suggestion: Some("Pass a path to an audio file such as song.mp3".to_string()),
            })?
            .to_string();

        let data = fs::read(path)
            .await
            .map_err(|e| ClientError::file_system(path, FileOperation::Read, e))?;

        Self::from_bytes(file_name, data)
    }

    pub(crate) fn into_form(self) -> Form {
        self.form
    }
}

impl From<Form> for AudioUpload {
    fn from(form: Form) -> Self {
        Self::from_form(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.mp3");

        let err = AudioUpload::from_path(&missing).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::FileSystem { operation: FileOperation::Read, .. }
        ));
    }

    #[tokio::test]
    async fn test_from_path_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Circles.mp3");
        tokio::fs::write(&path, b"ID3fake").await.unwrap();

        let upload = AudioUpload::from_path(&path).await.unwrap();
        // Boundary is random, so only check the form is non-trivial
        assert!(!upload.into_form().boundary().is_empty());
    }
}
