//! Description and item catalogs for a loaded model.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};
use napire_backend::{Descriptions, ItemLists};
use serde::Serialize;
use tracing::debug;

use super::model::GenericCategoryMap;

/// Description marking an item as non-selectable.
pub const NOT_CODABLE: &str = "NotCodable";

/// Labels and selectable items of one model, post-processed for display.
///
/// Invariants after [`Catalog::assemble`]:
/// - generic categories contain only items with a description other than
///   [`NOT_CODABLE`], ordered by description;
/// - every other category is ordered by raw identifier and is not filtered;
/// - every generic category code maps to its display label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    pub descriptions: Descriptions,
    pub items: ItemLists,
}

impl Catalog {
    pub fn assemble(
        mut descriptions: Descriptions,
        mut items: ItemLists,
        generic: &GenericCategoryMap,
    ) -> Self {
        for (category, label) in generic {
            descriptions.insert(category.clone(), label.clone());
        }

        for (category, list) in items.iter_mut() {
            if generic.contains_key(category) {
                let before = list.len();
                list.retain(|item| {
                    descriptions
                        .get(item)
                        .is_some_and(|label| label != NOT_CODABLE)
                });
                if list.len() != before {
                    debug!(category = %category, dropped = before - list.len(), "filtered non-codable items");
                }
                list.sort_by(|a, b| locale_cmp(&descriptions[a], &descriptions[b]));
            } else {
                list.sort_by(|a, b| locale_cmp(a, b));
            }
        }

        Catalog {
            descriptions,
            items,
        }
    }

    /// Items of `category`, empty when the category is unknown.
    pub fn items_in(&self, category: &str) -> &[String] {
        self.items.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn describe(&self, item: &str) -> Option<&str> {
        self.descriptions.get(item).map(String::as_str)
    }
}

thread_local! {
    static COLLATOR: Option<Collator> =
        Collator::try_new(&Default::default(), CollatorOptions::new()).ok();
}

/// Unicode (CLDR root) collation of two labels.
///
/// Accents and case are secondary and tertiary differences, punctuation
/// sorts before digits and digits before letters. Lowercase sorts first
/// when only case differs.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a.cmp(b),
    })
}
