//! Inference request assembly.

use napire_backend::{InferenceRequest, ModelDefinition};

use crate::config::InferenceSettings;
use crate::domain::EvidenceSet;

/// Combine the model and the current evidence into a submittable request.
///
/// Inputs are copied, never mutated; identical inputs still yield a fresh
/// request per call.
pub fn build_request(
    model: &ModelDefinition,
    evidence: &EvidenceSet,
    settings: &InferenceSettings,
) -> InferenceRequest {
    InferenceRequest {
        model: model.clone(),
        evidence: evidence.as_map().clone(),
        inference_method: settings.method.clone(),
        plot: settings.plot,
        timeout: settings.timeout,
    }
}
