//! Ranked, labelled view of a finished job's outcome distribution.

use std::cmp::Ordering;

use napire_backend::{Descriptions, OutcomeDistribution};
use serde::Serialize;

/// One line of the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    /// 1-based position.
    pub rank: usize,
    pub label: String,
    /// Probability in whole percent.
    pub percentage: u32,
}

impl RankedEntry {
    pub fn new(rank: usize, label: impl Into<String>, percentage: u32) -> Self {
        Self {
            rank,
            label: label.into(),
            percentage,
        }
    }
}

/// Full ranking plus its head.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ranking {
    pub full: Vec<RankedEntry>,
    pub short: Vec<RankedEntry>,
}

impl Ranking {
    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }
}

/// Rank `distribution` by descending probability.
///
/// Ties keep the order the service sent them in. Outcomes without a
/// description are labelled by their identifier.
pub fn project(
    distribution: &OutcomeDistribution,
    descriptions: &Descriptions,
    short_len: usize,
) -> Ranking {
    let mut ordered: Vec<&(String, f64)> = distribution.entries().iter().collect();
    ordered.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let full: Vec<RankedEntry> = ordered
        .into_iter()
        .enumerate()
        .map(|(i, (outcome, probability))| {
            let label = descriptions.get(outcome).unwrap_or(outcome);
            RankedEntry::new(i + 1, label.as_str(), to_percentage(*probability))
        })
        .collect();
    let short = full.iter().take(short_len).cloned().collect();

    Ranking { full, short }
}

fn to_percentage(probability: f64) -> u32 {
    (probability * 100.0).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptions(pairs: &[(&str, &str)]) -> Descriptions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_project_known_causes() {
        let dist: OutcomeDistribution =
            [("CAUSES_CODE_06", 0.068), ("CAUSES_CODE_48", 0.154)].into_iter().collect();
        let labels = descriptions(&[
            ("CAUSES_CODE_06", "Complexity of project"),
            ("CAUSES_CODE_48", "Lack of time"),
        ]);

        let ranking = project(&dist, &labels, 5);

        assert_eq!(
            ranking.full,
            vec![
                RankedEntry::new(1, "Lack of time", 15),
                RankedEntry::new(2, "Complexity of project", 7),
            ]
        );
        assert_eq!(ranking.short, ranking.full);
    }

    #[test]
    fn test_project_ties_keep_input_order() {
        let dist: OutcomeDistribution =
            [("A", 0.15), ("B", 0.3), ("C", 0.3)].into_iter().collect();
        let ranking = project(&dist, &Descriptions::new(), 5);

        let labels: Vec<&str> = ranking.full.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "C", "A"]);
        let ranks: Vec<usize> = ranking.full.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_project_truncates_short_view() {
        let dist: OutcomeDistribution = (0..8)
            .map(|i| (format!("CAUSES_CODE_{i:02}"), 0.1 * f64::from(i)))
            .collect();
        let ranking = project(&dist, &Descriptions::new(), 5);

        assert_eq!(ranking.full.len(), 8);
        assert_eq!(ranking.short.len(), 5);
        assert_eq!(ranking.short[..], ranking.full[..5]);
        assert_eq!(ranking.full[0].label, "CAUSES_CODE_07");
    }

    #[test]
    fn test_project_empty_distribution() {
        let ranking = project(&OutcomeDistribution::default(), &Descriptions::new(), 5);
        assert!(ranking.is_empty());
        assert!(ranking.short.is_empty());
    }
}
