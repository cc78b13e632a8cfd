// src/video.rs
// Video generation: submit a long-running job and poll it to completion

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::{DEFAULT_POLL_INTERVAL, EnvConfig};
use crate::llm::{FailureClass, OperationBackend, VideoJob, classify};
use crate::{Result, StudioError};

/// How often to poll and when to give up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls until done or cancelled
    pub deadline: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            deadline: None,
        }
    }
}

impl PollPolicy {
    pub fn from_config(config: &EnvConfig) -> Self {
        Self {
            interval: config.poll_interval,
            deadline: config.video_deadline,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Drives one video job per call. The video capability has no fallback tier,
/// so an unavailable model surfaces as `CapabilityUnavailable`.
pub struct VideoGenerator {
    backend: Arc<dyn OperationBackend>,
    model: String,
    policy: PollPolicy,
}

impl VideoGenerator {
    pub fn new(backend: Arc<dyn OperationBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
            policy: PollPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Submit the job and wait for its result locator.
    ///
    /// The locator never carries the credential; fetching the bytes is left
    /// to the caller.
    #[instrument(skip(self, job, cancel), fields(model = %self.model, aspect = job.aspect_ratio.as_str()))]
    pub async fn start_video_job(
        &self,
        job: &VideoJob,
        cancel: &CancellationToken,
    ) -> Result<String> {
        if job.prompt.trim().is_empty() && job.image.is_none() {
            return Err(StudioError::InvalidInput(
                "a video prompt or reference image is required".into(),
            ));
        }

        let started = Instant::now();
        let mut operation = match self.backend.submit(&self.model, job).await {
            Ok(op) => op,
            Err(e) if classify(&e) == FailureClass::NotFoundOrUnsupported => {
                warn!(error = %e, "Video model unavailable");
                return Err(StudioError::CapabilityUnavailable(format!(
                    "video model '{}' is not available",
                    self.model
                )));
            }
            Err(e) => return Err(e),
        };

        if !operation.is_done() && operation.id.trim().is_empty() {
            return Err(StudioError::UnusableContent(
                "video job was accepted without an operation id".into(),
            ));
        }
        info!(operation = %operation.id, "Video job submitted");

        let operation_id = operation.id.clone();
        let mut polls: u32 = 0;
        while !operation.is_done() {
            let wait = match self.policy.deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_sub(started.elapsed());
                    if remaining.is_zero() {
                        warn!(polls, "Video job exceeded its deadline");
                        return Err(StudioError::DeadlineExceeded(deadline));
                    }
                    remaining.min(self.policy.interval)
                }
                None => self.policy.interval,
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(polls, "Video job cancelled");
                    return Err(StudioError::Cancelled);
                }
                _ = tokio::time::sleep(wait) => {}
            }

            let polled = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(polls, "Video job cancelled");
                    return Err(StudioError::Cancelled);
                }
                polled = self.backend.fetch(&operation_id) => polled?,
            };
            polls += 1;
            debug!(polls, status = ?polled.status, "Video job polled");
            operation.advance(polled);
        }

        let locator = operation.result_locator.ok_or_else(|| {
            StudioError::UnusableContent("operation completed without a usable result".into())
        })?;
        info!(
            polls,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Video job finished"
        );
        Ok(locator)
    }
}
