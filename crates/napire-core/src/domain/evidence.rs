//! User-asserted observations fed into an inference request.

use napire_backend::Evidence;
use serde::Serialize;

/// What siblings of the chosen item become in an exclusive update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentValue {
    /// Sibling is asserted `false`.
    False,
    /// Sibling is removed from the evidence entirely (unknown).
    Unset,
}

/// Item identifier → `true | false`, absent meaning unknown.
///
/// Both mutations are total: items are written without checking the
/// catalog, and unknown categories leave the set untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EvidenceSet(Evidence);

impl EvidenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assert `item` when `value` is true, otherwise forget it.
    pub fn set(&mut self, item: &str, value: bool) {
        if value {
            self.0.insert(item.to_string(), true);
        } else {
            self.0.remove(item);
        }
    }

    /// Assert `chosen` among `siblings`, setting every other sibling to `absent`.
    ///
    /// With an empty `chosen` and [`AbsentValue::Unset`] the whole category
    /// is cleared.
    pub fn set_exclusive(&mut self, siblings: &[String], chosen: &str, absent: AbsentValue) {
        for item in siblings {
            if item == chosen {
                self.0.insert(item.clone(), true);
            } else {
                match absent {
                    AbsentValue::False => {
                        self.0.insert(item.clone(), false);
                    }
                    AbsentValue::Unset => {
                        self.0.remove(item);
                    }
                }
            }
        }
    }

    pub fn get(&self, item: &str) -> Option<bool> {
        self.0.get(item).copied()
    }

    pub fn as_map(&self) -> &Evidence {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
