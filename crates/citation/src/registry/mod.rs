//! Citation registry
//!
//! Append-only log of citation events with counters derived at insertion
//! time. Records are never updated or removed; everything lives in memory
//! and is gone on restart.

mod scoring;

pub use scoring::{ImpactScoreConfig, ImpactScorer};

use aicif_common::{
    errors::{AppError, Result},
    models::parse_timestamp,
    CitationRecord, NewCitation, SourceType,
};
use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Filters for citation log queries
///
/// Absent (or empty) filters impose no constraint. Date bounds are
/// inclusive.
#[derive(Debug, Clone)]
pub struct CitationQuery {
    pub doi: Option<String>,
    pub ai_model: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: usize,
}

impl Default for CitationQuery {
    fn default() -> Self {
        Self {
            doi: None,
            ai_model: None,
            start_date: None,
            end_date: None,
            limit: 50,
        }
    }
}

impl CitationQuery {
    pub fn for_doi(doi: impl Into<String>) -> Self {
        Self {
            doi: Some(doi.into()),
            ..Default::default()
        }
    }
}

/// One entry of the top-cited ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCited {
    pub doi: String,
    pub title: String,
    pub authors: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub citation_count: usize,
    pub aicif_score: f64,
}

/// Dashboard summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_citations: usize,
    pub unique_sources: usize,
    pub ai_models: Vec<String>,
    pub source_types: BTreeMap<String, usize>,
    pub total_authors: usize,
}

/// In-memory citation registry
#[derive(Debug, Default)]
pub struct CitationRegistry {
    /// Event log in insertion order
    citations: Vec<CitationRecord>,

    /// DOI -> positions in `citations`
    by_doi: HashMap<String, Vec<usize>>,

    /// Raw `authors` string -> citation count
    author_counts: HashMap<String, usize>,

    scorer: ImpactScorer,
}

impl CitationRegistry {
    /// Create an empty registry with the default impact score policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with a custom impact score policy
    pub fn with_scorer(scorer: ImpactScorer) -> Self {
        Self {
            scorer,
            ..Default::default()
        }
    }

    /// Log a new citation event, returning its id
    ///
    /// The id and timestamp are generated when the caller left them out.
    /// Optional fields are stored as received.
    pub fn add_citation(&mut self, citation: NewCitation) -> String {
        self.insert(citation.complete())
    }

    /// Append an already completed record, returning its id
    pub fn insert(&mut self, record: CitationRecord) -> String {
        let position = self.citations.len();

        self.by_doi
            .entry(record.doi.clone())
            .or_default()
            .push(position);

        if let Some(authors) = &record.authors {
            *self.author_counts.entry(authors.clone()).or_default() += 1;
        }

        debug!(
            citation_id = %record.citation_id,
            doi = %record.doi,
            ai_model = %record.ai_model,
            "Citation appended to registry"
        );

        let id = record.citation_id.clone();
        self.citations.push(record);
        id
    }

    /// Query the log, newest first
    ///
    /// Fails with `InvalidTimestamp` when a date bound does not parse, or
    /// when a date bound is active and a candidate record's own timestamp
    /// does not parse.
    pub fn get_citations(&self, query: &CitationQuery) -> Result<Vec<CitationRecord>> {
        let doi = non_empty(query.doi.as_deref());
        let ai_model = non_empty(query.ai_model.as_deref());
        let start = parse_bound(query.start_date.as_deref(), "start_date")?;
        let end = parse_bound(query.end_date.as_deref(), "end_date")?;

        let mut matched = Vec::new();
        for record in &self.citations {
            if doi.is_some_and(|d| record.doi != d) {
                continue;
            }
            if ai_model.is_some_and(|m| record.ai_model != m) {
                continue;
            }
            if start.is_some() || end.is_some() {
                let at = record
                    .parsed_timestamp()
                    .ok_or_else(|| AppError::InvalidTimestamp {
                        value: record.timestamp.clone(),
                        context: format!("citation {}", record.citation_id),
                    })?;
                if start.is_some_and(|s| at < s) || end.is_some_and(|e| at > e) {
                    continue;
                }
            }
            matched.push(record);
        }

        Ok(newest_first(matched, query.limit))
    }

    /// DOIs ranked by citation count, optionally restricted to one AI model
    ///
    /// Ties keep the order in which the DOIs were first cited. Title,
    /// authors and type come from the first record for each DOI; the score
    /// always covers every citation of the DOI.
    pub fn get_top_cited(&self, ai_model: Option<&str>, limit: usize) -> Vec<TopCited> {
        let ai_model = non_empty(ai_model);

        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();
        for record in &self.citations {
            if ai_model.is_some_and(|m| record.ai_model != m) {
                continue;
            }
            match slots.get(record.doi.as_str()) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    slots.insert(record.doi.as_str(), counts.len());
                    counts.push((record.doi.as_str(), 1));
                }
            }
        }

        // Stable, so equal counts stay in first-seen order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(limit);

        let now = Utc::now().naive_utc();
        counts
            .into_iter()
            .filter_map(|(doi, citation_count)| {
                let first = self.first_for(doi)?;
                Some(TopCited {
                    doi: doi.to_string(),
                    title: first
                        .source_title
                        .clone()
                        .unwrap_or_else(|| "Unknown".to_string()),
                    authors: first
                        .authors
                        .clone()
                        .unwrap_or_else(|| "Unknown".to_string()),
                    source_type: first.source_type.unwrap_or(SourceType::JournalArticle),
                    citation_count,
                    aicif_score: self.score_at(doi, now),
                })
            })
            .collect()
    }

    /// Most recent citation events
    pub fn get_recent_citations(&self, limit: usize) -> Vec<CitationRecord> {
        newest_first(self.citations.iter().collect(), limit)
    }

    /// Totals for the dashboard
    pub fn get_summary_stats(&self) -> SummaryStats {
        let ai_models: BTreeSet<&str> = self.citations.iter().map(|c| c.ai_model.as_str()).collect();

        let mut source_types = BTreeMap::new();
        for record in &self.citations {
            let key = record
                .source_type
                .map(|t| t.as_str())
                .unwrap_or("unknown");
            *source_types.entry(key.to_string()).or_insert(0) += 1;
        }

        SummaryStats {
            total_citations: self.citations.len(),
            unique_sources: self.by_doi.len(),
            ai_models: ai_models.into_iter().map(str::to_string).collect(),
            source_types,
            total_authors: self.author_counts.len(),
        }
    }

    /// AIC-IF score for a DOI as of now; 0.0 for an uncited DOI
    pub fn aicif_score(&self, doi: &str) -> f64 {
        self.score_at(doi, Utc::now().naive_utc())
    }

    /// Number of citations recorded for a DOI
    pub fn citation_count(&self, doi: &str) -> usize {
        self.by_doi.get(doi).map(Vec::len).unwrap_or(0)
    }

    /// Look up a record by id
    pub fn get(&self, citation_id: &str) -> Option<&CitationRecord> {
        self.citations.iter().find(|c| c.citation_id == citation_id)
    }

    pub fn len(&self) -> usize {
        self.citations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }

    fn score_at(&self, doi: &str, now: NaiveDateTime) -> f64 {
        let citations: Vec<&CitationRecord> = self
            .by_doi
            .get(doi)
            .map(|positions| positions.iter().map(|&p| &self.citations[p]).collect())
            .unwrap_or_default();
        self.scorer.score(&citations, now)
    }

    fn first_for(&self, doi: &str) -> Option<&CitationRecord> {
        let &position = self.by_doi.get(doi)?.first()?;
        self.citations.get(position)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_bound(value: Option<&str>, field: &str) -> Result<Option<NaiveDateTime>> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| AppError::InvalidTimestamp {
                value: raw.to_string(),
                context: field.to_string(),
            }),
    }
}

/// Sort by parsed timestamp descending; unparseable timestamps go last and
/// equal timestamps keep insertion order.
fn newest_first(mut records: Vec<&CitationRecord>, limit: usize) -> Vec<CitationRecord> {
    records.sort_by_cached_key(|r| Reverse(r.parsed_timestamp()));
    records.into_iter().take(limit).cloned().collect()
}
