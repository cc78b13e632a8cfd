// src/cli/mod.rs
// Command-line harness around the generation core

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::EnvConfig;
use crate::http::create_shared_client;
use crate::llm::{FallbackInvoker, GeminiClient, InlineMedia};

pub mod ancillary;
pub mod plan;
pub mod video;

pub use ancillary::{run_ask, run_quiz};
pub use plan::run_plan;
pub use video::run_video;

#[derive(Parser)]
#[command(name = "studyforge")]
#[command(about = "Turn a topic into a research-backed study package")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Research a topic and write a study plan and notes
    Plan {
        /// Topic to study (may be empty when --media is given)
        #[arg(index = 1, default_value = "")]
        topic: String,

        /// Image or video to analyse alongside the topic
        #[arg(short, long)]
        media: Option<PathBuf>,

        /// Also build the interactive simulator
        #[arg(long)]
        simulator: bool,

        /// Directory to write plan.md, notes.md and simulator.html into
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Generate a five question quiz from a notes file
    Quiz {
        /// Markdown notes file
        #[arg(index = 1)]
        notes: PathBuf,
    },

    /// Ask follow-up questions about a notes file
    Ask {
        /// Markdown notes file
        #[arg(index = 1)]
        notes: PathBuf,

        /// Questions, asked in order within one conversation
        #[arg(index = 2, required = true)]
        questions: Vec<String>,
    },

    /// Generate a short explainer video
    Video {
        /// What the video should show
        #[arg(index = 1, default_value = "")]
        prompt: String,

        /// Reference image to start from
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Aspect ratio: 16:9 or 9:16
        #[arg(long, default_value = "16:9")]
        aspect: String,
    },

    /// Show configuration status
    Check,
}

/// Load configuration and fail early on errors
pub fn load_config() -> Result<EnvConfig> {
    let config = EnvConfig::load();
    let validation = config.validate();
    if !validation.warnings.is_empty() || !validation.is_valid() {
        eprintln!("{}", validation.report());
    }
    if !validation.is_valid() {
        bail!("invalid configuration");
    }
    Ok(config)
}

/// Gemini client for the configured key
pub fn gemini_client(config: &EnvConfig) -> Result<Arc<GeminiClient>> {
    let api_key = config
        .api_keys
        .gemini
        .clone()
        .context("GEMINI_API_KEY is not set")?;
    Ok(Arc::new(GeminiClient::with_http_client(
        api_key,
        create_shared_client(),
    )))
}

pub fn invoker(config: &EnvConfig) -> Result<FallbackInvoker> {
    Ok(FallbackInvoker::new(
        gemini_client(config)?,
        config.models.clone(),
    ))
}

/// Read a media file, guessing its MIME type from the extension
pub fn read_media(path: &Path) -> Result<InlineMedia> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if !matches!(mime.type_().as_str(), "image" | "video") {
        bail!(
            "{} is not an image or video (guessed {})",
            path.display(),
            mime.essence_str()
        );
    }
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(InlineMedia {
        mime_type: mime.essence_str().to_string(),
        data,
    })
}

pub fn run_check() -> Result<()> {
    let config = EnvConfig::load();
    println!("{}", config.validate().report());
    println!();
    println!("Primary model:   {}", config.models.primary);
    println!("Secondary model: {}", config.models.secondary);
    println!("Fast model:      {}", config.models.fast);
    println!("Video model:     {}", config.models.video);
    println!("Video poll:      {:?}", config.poll_interval);
    match config.video_deadline {
        Some(deadline) => println!("Video deadline:  {:?}", deadline),
        None => println!("Video deadline:  none"),
    }
    Ok(())
}
