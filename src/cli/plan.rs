// src/cli/plan.rs
// `studyforge plan`: run the study pipeline for one topic

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

use crate::pipeline::{MediaAttachment, StudySession, TopicInput};
use crate::utils::truncate;

pub async fn run_plan(
    topic: String,
    media: Option<PathBuf>,
    simulator: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let config = super::load_config()?;
    let invoker = super::invoker(&config)?;

    let mut input = TopicInput::text(topic);
    if let Some(path) = media {
        let media = super::read_media(&path)?;
        input = input.with_media(MediaAttachment::from_mime(media.mime_type, media.data));
    }

    let mut session = StudySession::new(invoker, input)?;
    if let Err(e) = session.run().await {
        bail!(e.user_message());
    }

    if simulator {
        match session.synthesize_simulator().await {
            Ok(Some(_)) => {}
            Ok(None) => eprintln!("The model produced no simulator code; try again."),
            Err(e) => eprintln!("{}", e.user_message()),
        }
    }

    let (Some(plan), Some(package)) = (session.plan(), session.package()) else {
        bail!("pipeline finished without a study package");
    };

    match out {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            write(&dir, "plan.md", &plan.narrative)?;
            write(&dir, "notes.md", &package.notes_markdown)?;
            if let Some(html) = &package.simulator_source {
                write(&dir, "simulator.html", html)?;
            }
        }
        None => {
            println!("{}\n", plan.narrative);
            println!("{}", package.notes_markdown);
            if let Some(html) = &package.simulator_source {
                println!("\n[simulator: {}]", truncate(html, 80));
            }
        }
    }

    if !plan.citations.is_empty() {
        println!("\nSources:");
        for citation in &plan.citations {
            println!("  - {} <{}>", citation.title, citation.uri);
        }
    }
    Ok(())
}

fn write(dir: &Path, name: &str, contents: &str) -> Result<()> {
    let path = dir.join(name);
    std::fs::write(&path, contents)?;
    println!("Wrote {}", path.display());
    Ok(())
}
