// src/extract.rs
// Structured payload extraction from free-form model output
//
// Syntactic only: nothing extracted here is ever evaluated.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::{Result, StudioError};

/// Opening fence line: a run of three or more backticks or tildes at the
/// start of the line, then an optional language tag.
static OPENER: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[ \t]*(`{3,}|~{3,})[ \t]*([A-Za-z0-9_+.\-]*)").unwrap()
});

/// A fenced block found in model output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    /// Language tag as written (may be empty)
    pub language: &'a str,
    pub body: &'a str,
}

/// The marker run that opened a block
#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    /// Parse an opening line into its fence and language tag
    fn open(line: &str) -> Option<(Fence, &str)> {
        let caps = OPENER.captures(line)?;
        let run = caps.get(1)?.as_str();
        let marker = run.chars().next()?;
        let rest = &line[caps.get(0)?.end()..];
        // a backtick in the info string means inline code, not a fence
        if marker == '`' && rest.contains('`') {
            return None;
        }
        Some((
            Fence {
                marker,
                len: run.len(),
            },
            caps.get(2)?.as_str(),
        ))
    }

    /// A closing line holds only the same marker, at least as many times
    fn closes(&self, line: &str) -> bool {
        let run = line.trim_matches([' ', '\t']);
        run.len() >= self.len && run.chars().all(|c| c == self.marker)
    }
}

/// All complete fenced blocks, in order of appearance.
///
/// Fences open and close only on their own lines, so fence markers quoted
/// inline in prose or inside a block body are treated as text.
pub fn fenced_blocks(raw: &str) -> Vec<FencedBlock<'_>> {
    let mut blocks = Vec::new();
    let mut open: Option<(Fence, &str, usize)> = None;
    let mut offset = 0;

    for line in raw.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let content = line.trim_end_matches(['\n', '\r']);

        match open {
            Some((fence, language, body_start)) if fence.closes(content) => {
                let body = &raw[body_start..line_start];
                let body = body
                    .strip_suffix('\n')
                    .map(|b| b.strip_suffix('\r').unwrap_or(b))
                    .unwrap_or(body);
                blocks.push(FencedBlock { language, body });
                open = None;
            }
            Some(_) => {}
            None => {
                open = Fence::open(content).map(|(fence, language)| (fence, language, offset));
            }
        }
    }
    blocks
}

/// Inner content of the first fence tagged with `language` (case-insensitive).
///
/// Returns `None` when no complete fence with that tag exists, including when
/// the output was cut off before the closing fence.
pub fn extract_fenced_block(raw: &str, language: &str) -> Option<String> {
    fenced_blocks(raw)
        .into_iter()
        .find(|block| block.language.eq_ignore_ascii_case(language))
        .map(|block| block.body.to_string())
}

/// Unwrap a JSON payload: a `json` fence first, then an unlabeled fence, then
/// the whole trimmed text.
pub fn json_payload(raw: &str) -> &str {
    let blocks = fenced_blocks(raw);
    blocks
        .iter()
        .find(|b| b.language.eq_ignore_ascii_case("json"))
        .or_else(|| blocks.iter().find(|b| b.language.is_empty()))
        .map(|b| b.body.trim())
        .unwrap_or_else(|| raw.trim())
}

/// Strictly parse the unwrapped JSON payload into `T`.
///
/// Failures are `UnusableContent`; callers decide on a typed default.
pub fn extract_json<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let payload = json_payload(raw);
    if payload.is_empty() {
        return Err(StudioError::UnusableContent("empty JSON payload".into()));
    }
    serde_json::from_str(payload)
        .map_err(|e| StudioError::UnusableContent(format!("malformed JSON payload: {}", e)))
}

/// Untyped variant of [`extract_json`]
pub fn extract_json_value(raw: &str) -> Result<serde_json::Value> {
    extract_json(raw)
}
