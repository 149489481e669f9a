//! JSON payloads exchanged with the inference service.
//!
//! These mirror the service's request and reply bodies one-to-one. Domain
//! interpretation (job states, rankings) lives in `napire-core`.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Endpoint paths, also used as fallback payload keys.
pub mod endpoints {
    pub const DESCRIPTIONS: &str = "/descriptions";
    pub const ITEMS: &str = "/items";
    pub const INFER: &str = "/infer";
    pub const TASKS: &str = "/tasks";
}

/// Item identifier → human label.
pub type Descriptions = BTreeMap<String, String>;

/// Category code → selectable item identifiers.
pub type ItemLists = BTreeMap<String, Vec<String>>;

/// Item identifier → asserted observation. Absent items are unknown.
pub type Evidence = BTreeMap<String, bool>;

/// One node type of the Bayesian network and how it is filtered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub node_type: String,
    pub filter: f64,
    pub weighted_filter: bool,
    pub absent_is_unknown: bool,
}

/// A connection between two node types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
    pub filter: f64,
    pub weighted_filter: bool,
}

/// Immutable description of the network to build and the items to query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub dataset: String,
    pub nodes: Vec<NodeSpec>,
    #[serde(rename = "connect")]
    pub edges: Vec<EdgeSpec>,
    pub query: Vec<String>,
}

/// Body of `POST /infer`: the model plus evidence and inference settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRequest {
    #[serde(flatten)]
    pub model: ModelDefinition,
    pub evidence: Evidence,
    pub inference_method: String,
    pub plot: bool,
    pub timeout: f64,
}

/// Reply of `POST /items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemsReply {
    pub items: ItemLists,
    /// Edge list computed by the service; carried through untouched.
    #[serde(default)]
    pub edges: serde_json::Value,
}

/// Opaque job identifier assigned by the service.
///
/// The service answers `POST /infer` with either a JSON string or a JSON
/// number; both decode to the same textual id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        JobId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        JobId(s.to_string())
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        JobId(s)
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawJobId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawJobId::deserialize(deserializer)? {
            RawJobId::Text(s) => JobId(s),
            RawJobId::Number(n) => JobId(n.to_string()),
        })
    }
}

/// Outcome identifier → posterior probability, in the order the service sent them.
///
/// Order matters: rankings break probability ties by this order, so the
/// JSON object is decoded into a vector rather than a sorted map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutcomeDistribution(Vec<(String, f64)>);

impl OutcomeDistribution {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        OutcomeDistribution(entries)
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for OutcomeDistribution {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        OutcomeDistribution(iter.into_iter().map(|(k, p)| (k.into(), p)).collect())
    }
}

impl Serialize for OutcomeDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (outcome, probability) in &self.0 {
            map.serialize_entry(outcome, probability)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for OutcomeDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DistributionVisitor;

        impl<'de> Visitor<'de> for DistributionVisitor {
            type Value = OutcomeDistribution;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of outcome identifiers to probabilities")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((outcome, probability)) = access.next_entry::<String, f64>()? {
                    entries.push((outcome, probability));
                }
                Ok(OutcomeDistribution(entries))
            }
        }

        deserializer.deserialize_map(DistributionVisitor)
    }
}

/// Result payload of a finished job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub data: OutcomeDistribution,
    /// Rendered network diagram as a data URI.
    #[serde(default)]
    pub plot: String,
}

/// Reply of `GET /tasks?printresult=true&id=<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskReply {
    pub state: String,
    #[serde(default)]
    pub result: Option<TaskResult>,
}

impl TaskReply {
    pub const RUNNING: &'static str = "RUNNING";
    pub const FAILED: &'static str = "FAILED";

    pub fn is_running(&self) -> bool {
        self.state == Self::RUNNING
    }
}
