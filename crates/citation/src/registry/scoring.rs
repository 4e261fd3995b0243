//! AIC-IF impact scoring
//!
//! A tunable heuristic combining citation volume, contribution, recency and
//! AI-model diversity. The weights are a policy, not a validated metric.

use aicif_common::CitationRecord;
pub use aicif_common::config::ImpactScoreConfig;
use chrono::NaiveDateTime;
use std::collections::HashSet;

/// Scores a DOI from its citation list
#[derive(Debug, Clone, Default)]
pub struct ImpactScorer {
    config: ImpactScoreConfig,
}

impl ImpactScorer {
    /// Create a new scorer
    pub fn new(config: ImpactScoreConfig) -> Self {
        Self { config }
    }

    /// Score a citation list as of `now`, rounded to two decimals
    ///
    /// An empty list scores exactly 0.0.
    pub fn score(&self, citations: &[&CitationRecord], now: NaiveDateTime) -> f64 {
        if citations.is_empty() {
            return 0.0;
        }

        let cfg = &self.config;
        let count = citations.len() as f64;

        let avg_contribution = citations
            .iter()
            .map(|c| c.contribution_score.unwrap_or(cfg.default_contribution))
            .sum::<f64>()
            / count;

        let avg_recency = citations
            .iter()
            .map(|c| self.recency_weight(c, now))
            .sum::<f64>()
            / count;

        let models: HashSet<&str> = citations.iter().map(|c| c.ai_model.as_str()).collect();
        let diversity = (models.len() as f64 / cfg.diversity_cap.max(1) as f64).min(1.0);

        let score = (count * cfg.count_weight
            + avg_contribution * cfg.contribution_weight
            + avg_recency * cfg.recency_weight
            + diversity * cfg.diversity_weight)
            * cfg.scale;

        round2(score)
    }

    /// `1 / max(1, whole days since the citation)`
    pub fn recency_weight(&self, citation: &CitationRecord, now: NaiveDateTime) -> f64 {
        match citation.parsed_timestamp() {
            Some(at) => {
                let days = (now - at).num_days().max(1);
                1.0 / days as f64
            }
            None => self.config.default_recency,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
