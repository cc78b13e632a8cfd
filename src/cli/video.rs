// src/cli/video.rs
// `studyforge video`: submit a video job and wait for it, Ctrl-C cancels

use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::llm::{AspectRatio, VideoJob};
use crate::video::{PollPolicy, VideoGenerator};

pub async fn run_video(prompt: String, image: Option<PathBuf>, aspect: &str) -> Result<()> {
    let aspect_ratio = AspectRatio::parse(aspect)
        .with_context(|| format!("unsupported aspect ratio '{}'", aspect))?;
    let image = image.as_deref().map(super::read_media).transpose()?;

    let config = super::load_config()?;
    let generator = VideoGenerator::new(super::gemini_client(&config)?, config.models.video.clone())
        .with_policy(PollPolicy::from_config(&config));

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received");
            on_interrupt.cancel();
        }
    });

    let job = VideoJob {
        prompt,
        image,
        aspect_ratio,
    };
    eprintln!("Video job submitted; this usually takes a few minutes...");
    match generator.start_video_job(&job, &cancel).await {
        Ok(locator) => {
            println!("{}", locator);
            Ok(())
        }
        Err(e) => bail!(e.user_message()),
    }
}
