//! Catalog loading with fallback.
//!
//! Descriptions are fetched first, then items; both are sent the model
//! definition. Either request may be recovered from [`FallbackData`]. The
//! loader holds no state and can be re-run on every model selection.

use std::time::Duration;

use napire_backend::{InferenceBackend, ItemsReply};
use tracing::instrument;

use crate::domain::{Catalog, ModelEntry, NapireError, Result};
use crate::fallback::FallbackData;
use crate::metrics::METRICS;

/// Fetch and post-process the catalog of `entry`.
///
/// Returns [`NapireError::CatalogUnavailable`] when a request fails and no
/// fallback covers its endpoint. No partial catalog is ever returned.
#[instrument(skip_all, fields(dataset = %entry.definition.dataset))]
pub async fn load_catalog(
    backend: &dyn InferenceBackend,
    entry: &ModelEntry,
    fallback: &FallbackData,
    fallback_delay: Duration,
) -> Result<Catalog> {
    let descriptions = match backend.descriptions(&entry.definition).await {
        Ok(descriptions) => descriptions,
        Err(e) => fallback
            .recover(e, fallback_delay)
            .await
            .map_err(NapireError::CatalogUnavailable)?,
    };

    let items: ItemsReply = match backend.items(&entry.definition).await {
        Ok(items) => items,
        Err(e) => fallback
            .recover(e, fallback_delay)
            .await
            .map_err(NapireError::CatalogUnavailable)?,
    };

    METRICS.inc_catalog_loads();
    Ok(Catalog::assemble(
        descriptions,
        items.items,
        &entry.generic_categories,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelRegistry;
    use napire_backend::fakes::ScriptedBackend;
    use napire_backend::{endpoints, BackendError};
    use serde_json::json;

    fn entry() -> ModelEntry {
        ModelRegistry::bundled()
            .unwrap()
            .get("Cause analyzer")
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn test_load_merges_generic_labels() {
        let backend = ScriptedBackend::new();
        backend.set_descriptions(Ok([("EFFECTS_CODE_01".to_string(), "Delays".to_string())]
            .into_iter()
            .collect()));
        backend.set_items(Ok([(
            "EFFECTS_CODE".to_string(),
            vec!["EFFECTS_CODE_01".to_string()],
        )]
        .into_iter()
        .collect()));

        let catalog = load_catalog(&backend, &entry(), &FallbackData::none(), Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(catalog.describe("EFFECTS_CODE"), Some("Observed Effects"));
        assert_eq!(catalog.describe("PROBLEMS_CODE"), Some("Observed Problems"));
        assert_eq!(catalog.items_in("EFFECTS_CODE"), ["EFFECTS_CODE_01".to_string()]);
    }

    #[tokio::test]
    async fn test_items_failure_without_fallback_is_unavailable() {
        let backend = ScriptedBackend::new();
        backend.set_descriptions(Ok(Default::default()));
        backend.set_items(Err(BackendError::status(endpoints::ITEMS, 500)));

        let err = load_catalog(&backend, &entry(), &FallbackData::none(), Duration::ZERO)
            .await
            .unwrap_err();

        assert!(matches!(err, NapireError::CatalogUnavailable(_)));
        assert_eq!(err.backend().and_then(|e| e.endpoint()), Some(endpoints::ITEMS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_both_endpoints_recovered_from_fallback() {
        let backend = ScriptedBackend::new();
        let fallback = FallbackData::none()
            .with(
                endpoints::DESCRIPTIONS,
                json!({ "CONTEXT_SIZE_01": "1-10", "CONTEXT_SIZE_02": "11-50" }),
            )
            .with(
                endpoints::ITEMS,
                json!({ "items": { "CONTEXT_SIZE": ["CONTEXT_SIZE_02", "CONTEXT_SIZE_01"] }, "edges": [] }),
            );

        let catalog = load_catalog(&backend, &entry(), &fallback, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(
            catalog.items_in("CONTEXT_SIZE"),
            ["CONTEXT_SIZE_01".to_string(), "CONTEXT_SIZE_02".to_string()]
        );
        assert_eq!(backend.calls(endpoints::DESCRIPTIONS), 1);
        assert_eq!(backend.calls(endpoints::ITEMS), 1);
    }
}
