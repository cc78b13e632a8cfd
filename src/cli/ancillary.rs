// src/cli/ancillary.rs
// `studyforge quiz` and `studyforge ask`

use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::quiz::generate_quiz;
use crate::tutor::DeepDiveSession;

fn read_notes(path: &Path) -> Result<String> {
    let notes =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if notes.trim().is_empty() {
        bail!("{} is empty", path.display());
    }
    Ok(notes)
}

pub async fn run_quiz(notes: &Path) -> Result<()> {
    let notes = read_notes(notes)?;
    let config = super::load_config()?;
    let invoker = super::invoker(&config)?;

    let items = generate_quiz(&invoker, &notes)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    if items.is_empty() {
        println!("No quiz could be generated for these notes.");
        return Ok(());
    }

    for item in &items {
        println!("{}. {}", item.id, item.prompt);
        for (idx, option) in item.options.iter().enumerate() {
            let marker = if idx == item.correct_index { '*' } else { ' ' };
            println!("   {} {}) {}", marker, (b'a' + idx as u8) as char, option);
        }
        println!("   {}\n", item.rationale);
    }
    Ok(())
}

pub async fn run_ask(notes: &Path, questions: &[String]) -> Result<()> {
    let notes = read_notes(notes)?;
    let config = super::load_config()?;
    let mut session = DeepDiveSession::new(super::invoker(&config)?, notes);

    for question in questions {
        println!("> {}\n", question);
        match session.ask(question).await {
            Ok(reply) => println!("{}\n", reply),
            Err(e) => bail!(e.user_message()),
        }
    }
    Ok(())
}
