//! Request and response payloads exchanged with the visualizer backend
//!
//! Unknown fields are kept in a flattened `extra` map on every type so a
//! payload survives a decode/encode cycle unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata the backend extracts for a video URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub uploader: Option<String>,
    /// Length in seconds
    pub duration: Option<f64>,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body returned by the upload endpoints
///
/// The backend reports some failures with a success status and an `error`
/// field. The client never interprets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadStatus {
    pub message: Option<String>,
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UploadStatus {
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Body returned by the video generation endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedVideo {
    pub video_url: Option<String>,
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GeneratedVideo {
    /// Name of the rendered file, taken from the last path segment of `video_url`
    ///
    /// This is the name [`crate::VisualizerApi::download_video`] expects.
    pub fn filename(&self) -> Option<String> {
        let url = url::Url::parse(self.video_url.as_deref()?).ok()?;
        let segment = url.path_segments()?.next_back()?;
        if segment.is_empty() {
            return None;
        }
        urlencoding::decode(segment).ok().map(|name| name.into_owned())
    }
}

/// What the visualizer renders from the audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visualization {
    /// A circle whose radius follows loudness
    Volume,
    /// Frequency bins drawn per frame
    Spectrum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Bar,
    Point,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleVariant {
    Simple,
    Lcd,
    Circle,
    Square,
    Donut,
    Filled,
}

/// Rendering settings for previews and videos
///
/// Field names follow the backend's camelCase keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizerSettings {
    pub visualization: Visualization,
    pub style: Style,
    pub style_variant: StyleVariant,
    /// Output name without extension; the backend falls back to "video"
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub framerate: u32,
    /// Audio window in seconds
    pub start_end: [f64; 2],
    pub smoothing: bool,
    pub anti_aliasing: bool,
    pub polar_warp: bool,
    pub bins: u32,
    /// Fraction of each bin's width that is drawn
    pub bin_width: f64,
    pub line_thickness: u32,
    /// Frequency window in Hz
    pub min_max_frequency: [f64; 2],
    /// `#rrggbb`
    pub color: String,
    /// `#rrggbb`
    pub background_color: String,
    /// Radii as fractions of half the shortest side
    pub inner_outer_radius: [f64; 2],
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            visualization: Visualization::Spectrum,
            style: Style::Line,
            style_variant: StyleVariant::Filled,
            file_name: "video".to_string(),
            width: 854,
            height: 480,
            framerate: 30,
            start_end: [0.0, 15.0],
            smoothing: true,
            anti_aliasing: true,
            polar_warp: false,
            bins: 64,
            bin_width: 0.75,
            line_thickness: 10,
            min_max_frequency: [0.0, 2000.0],
            color: "#ff0000".to_string(),
            background_color: "#010204".to_string(),
            inner_outer_radius: [0.0, 1.0],
            extra: Map::new(),
        }
    }
}
