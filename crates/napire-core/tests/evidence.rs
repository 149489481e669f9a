//! Evidence editing against a loaded catalog.

mod common;

use common::{Harness, MODEL};
use napire_core::AbsentValue;

async fn loaded() -> Harness {
    let h = Harness::strict();
    h.orch.select_model(Some(MODEL)).await.unwrap();
    h
}

#[tokio::test]
async fn exclusive_choice_moves_between_siblings() {
    let h = loaded().await;

    h.orch
        .set_exclusive_evidence("EFFECTS_CODE", "EFFECTS_CODE_01", AbsentValue::False);
    h.orch
        .set_exclusive_evidence("EFFECTS_CODE", "EFFECTS_CODE_02", AbsentValue::False);

    let evidence = h.orch.evidence();
    assert_eq!(evidence.get("EFFECTS_CODE_01"), Some(false));
    assert_eq!(evidence.get("EFFECTS_CODE_02"), Some(true));
}

#[tokio::test]
async fn unset_choice_leaves_siblings_unknown() {
    let h = loaded().await;
    h.orch.set_evidence("PROBLEMS_CODE_01", true);

    h.orch
        .set_exclusive_evidence("PROBLEMS_CODE", "PROBLEMS_CODE_03", AbsentValue::Unset);

    let evidence = h.orch.evidence();
    assert_eq!(evidence.get("PROBLEMS_CODE_03"), Some(true));
    assert_eq!(evidence.get("PROBLEMS_CODE_01"), None);
    assert_eq!(evidence.len(), 1);
}

#[tokio::test]
async fn unknown_category_is_ignored() {
    let h = loaded().await;
    h.orch
        .set_exclusive_evidence("NO_SUCH_CATEGORY", "NO_SUCH_CATEGORY_01", AbsentValue::False);
    assert!(h.orch.evidence().is_empty());
}

#[tokio::test]
async fn slider_asserts_one_size_and_negative_clears() {
    let h = loaded().await;

    h.orch.set_slider_evidence(2);
    let evidence = h.orch.evidence();
    assert_eq!(evidence.get("CONTEXT_SIZE_02"), Some(true));
    assert_eq!(evidence.get("CONTEXT_SIZE_01"), Some(false));
    assert_eq!(evidence.get("CONTEXT_SIZE_03"), Some(false));

    h.orch.set_slider_evidence(-1);
    let evidence = h.orch.evidence();
    assert!(evidence
        .as_map()
        .keys()
        .all(|item| !item.starts_with("CONTEXT_SIZE")));
}

#[tokio::test]
async fn slider_label_uses_catalog_descriptions() {
    let h = loaded().await;
    assert_eq!(h.orch.slider_label(3), "51+");
    assert_eq!(h.orch.slider_label(9), "CONTEXT_SIZE_09");
    assert_eq!(h.orch.slider_label(-1), "?");
}

#[tokio::test]
async fn evidence_survives_a_model_switch() {
    let h = loaded().await;
    h.orch.set_evidence("PROBLEMS_CODE_01", true);

    h.orch.select_model(Some("Trouble predictor")).await.unwrap();

    assert_eq!(h.orch.evidence().get("PROBLEMS_CODE_01"), Some(true));
}
