use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use visualizer_client::{
    ApiResponse, AudioUpload, ClientConfig, ProgressCallback, ProgressEvent, VisualizerApi,
    VisualizerSettings,
};

/// Command line front end for the audio visualizer backend
#[derive(Debug, Parser)]
#[command(name = "visualizer", version, about, long_about = None)]
struct Cli {
    /// Backend origin
    #[arg(long, env = "VISUALIZER_API_URL", default_value = visualizer_client::client::DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "VISUALIZER_TIMEOUT_SECS", default_value_t = 300)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show metadata for a video URL
    Metadata { video_url: String },
    /// Upload a local audio file
    Upload { path: PathBuf },
    /// Have the backend fetch audio for a video URL or id
    UploadUrl { audio_url_id: String },
    /// Render a single preview frame
    Preview {
        /// JSON settings file; defaults are used when omitted
        #[arg(short, long)]
        settings: Option<PathBuf>,
        #[arg(short, long, default_value = "preview.png")]
        out: PathBuf,
    },
    /// Render a video for an uploaded audio file
    Generate {
        filename: String,
        /// JSON settings file; defaults are used when omitted
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
    /// Download a rendered video
    Download {
        filename: String,
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::new(&cli.base_url)?.with_timeout(Duration::from_secs(cli.timeout));
    let api = VisualizerApi::new(config)?;

    match cli.command {
        Command::Metadata { video_url } => {
            let metadata = api.fetch_video_metadata(&video_url).await?;
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        Command::Upload { path } => {
            let upload = AudioUpload::from_path(&path).await?;
            print_json(&api.upload_audio(upload).await?);
        }
        Command::UploadUrl { audio_url_id } => {
            print_json(&api.upload_audio_from_url(&audio_url_id).await?);
        }
        Command::Preview { settings, out } => {
            let settings = load_settings(settings.as_deref()).await?;
            let response = api.generate_preview_image(&settings).await?;
            tokio::fs::write(&out, response.into_bytes())
                .await
                .with_context(|| format!("writing preview to {}", out.display()))?;
            info!("Preview written to {}", out.display());
        }
        Command::Generate { filename, settings } => {
            let settings = load_settings(settings.as_deref()).await?;
            print_json(&api.generate_video(&filename, &settings).await?);
        }
        Command::Download { filename, dir } => {
            let saved = api
                .download_video_with_progress(&filename, &dir, Some(console_progress()))
                .await?;
            println!("{}", saved.path.display());
        }
    }

    Ok(())
}

async fn load_settings(path: Option<&Path>) -> Result<VisualizerSettings> {
    let Some(path) = path else {
        return Ok(VisualizerSettings::default());
    };

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading settings from {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing settings in {}", path.display()))
}

/// Pretty-print a JSON body, falling back to raw text
fn print_json(response: &ApiResponse) {
    match response.json::<serde_json::Value>() {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{}", response.text()),
        },
        Err(_) => println!("{}", response.text()),
    }
}

fn console_progress() -> ProgressCallback {
    Arc::new(|event| match event {
        ProgressEvent::DownloadStarted { url, total_size } => match total_size {
            Some(size) => info!("Downloading {} ({} bytes)", url, size),
            None => info!("Downloading {}", url),
        },
        ProgressEvent::DownloadProgress { downloaded, total: Some(total), speed_bps, .. } if total > 0 => {
            let percent = (downloaded as f64 / total as f64) * 100.0;
            info!("{:.1}% ({:.1} MB/s)", percent, speed_bps / 1_000_000.0);
        }
        ProgressEvent::DownloadProgress { downloaded, .. } => info!("{} bytes downloaded", downloaded),
        ProgressEvent::DownloadComplete { final_size, .. } => info!("Download complete ({} bytes)", final_size),
    })
}
