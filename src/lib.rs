// src/lib.rs
// studyforge - generation orchestration for topic-to-study-package learning

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod llm;
pub mod pipeline;
pub mod quiz;
pub mod tutor;
pub mod utils;
pub mod video;

pub use error::{ErrorKind, Result, StudioError};
