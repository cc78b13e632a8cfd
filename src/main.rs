// src/main.rs
// studyforge - topic to study package from the command line

use anyhow::Result;
use clap::Parser;
use studyforge::cli::{Cli, Commands, run_ask, run_check, run_plan, run_quiz, run_video};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("studyforge=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Plan {
            topic,
            media,
            simulator,
            out,
        } => run_plan(topic, media, simulator, out).await,
        Commands::Quiz { notes } => run_quiz(&notes).await,
        Commands::Ask { notes, questions } => run_ask(&notes, &questions).await,
        Commands::Video {
            prompt,
            image,
            aspect,
        } => run_video(prompt, image, &aspect).await,
        Commands::Check => run_check(),
    }
}
