//! Domain models for napire orchestration.
//!
//! - `ModelRegistry` / `ModelEntry`: selectable models and generic categories
//! - `Catalog`: descriptions and items, filtered and ordered for display
//! - `EvidenceSet`: user observations with exclusive-category updates
//! - `JobState`: lifecycle of the tracked inference job
//! - `Ranking`: labelled, ordered outcome list

pub mod catalog;
pub mod error;
pub mod evidence;
pub mod job;
pub mod model;
pub mod ranking;

pub use catalog::{locale_cmp, Catalog, NOT_CODABLE};
pub use error::{NapireError, Result};
pub use evidence::{AbsentValue, EvidenceSet};
pub use job::JobState;
pub use model::{GenericCategoryMap, ModelEntry, ModelRegistry};
pub use ranking::{project, RankedEntry, Ranking};
