// src/llm/fallback.rs
// Tier fallback: Primary -> Secondary on capability-unavailable errors

use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::classify::{FailureClass, classify};
use super::provider::{GenerationBackend, ModelRoster};
use super::types::{GenerationRequest, GenerationResponse, ModelTier};
use crate::{Result, StudioError};

/// Issues generation calls, retrying once on the secondary tier when the
/// primary model is unavailable. Holds no mutable state.
#[derive(Clone)]
pub struct FallbackInvoker {
    backend: Arc<dyn GenerationBackend>,
    roster: ModelRoster,
}

impl FallbackInvoker {
    pub fn new(backend: Arc<dyn GenerationBackend>, roster: ModelRoster) -> Self {
        Self { backend, roster }
    }

    pub fn roster(&self) -> &ModelRoster {
        &self.roster
    }

    #[instrument(skip(self, request), fields(backend = self.backend.name(), tier = %request.tier))]
    pub async fn invoke(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let model = self.roster.model_for(request.tier);
        let err = match self.backend.generate(model, request).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        if request.tier != ModelTier::Primary
            || classify(&err) != FailureClass::NotFoundOrUnsupported
        {
            return Err(surface(model, err));
        }

        warn!(
            primary = %model,
            secondary = %self.roster.secondary,
            error = %err,
            "Primary model unavailable, falling back to secondary tier"
        );
        let secondary = &self.roster.secondary;
        let response = self
            .backend
            .generate(secondary, request)
            .await
            .map_err(|e| surface(secondary, e))?;
        debug!(model = %secondary, "Secondary tier answered");
        Ok(response)
    }
}

/// Unavailability with nowhere left to fall back to becomes a capability error
fn surface(model: &str, err: StudioError) -> StudioError {
    if classify(&err) == FailureClass::Fatal || matches!(err, StudioError::CapabilityUnavailable(_))
    {
        return err;
    }
    StudioError::CapabilityUnavailable(format!("model '{}': {}", model, err))
}
