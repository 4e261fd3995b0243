//! Citation event model
//!
//! A citation event records an AI model using a scientific source at a point
//! in time. `NewCitation` is the partial record accepted from callers;
//! `CitationRecord` is what the registry stores once the identifier and
//! timestamp have been filled in.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of cited work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    JournalArticle,
    Paper,
    Dataset,
    Code,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::JournalArticle => "journal_article",
            SourceType::Paper => "paper",
            SourceType::Dataset => "dataset",
            SourceType::Code => "code",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial citation supplied by a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCitation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_id: Option<String>,
    pub doi: String,
    pub ai_model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    /// Ampersand-delimited author list, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl NewCitation {
    /// Start a citation with only the required fields set
    pub fn new(doi: impl Into<String>, ai_model: impl Into<String>) -> Self {
        Self {
            doi: doi.into(),
            ai_model: ai_model.into(),
            ..Default::default()
        }
    }

    /// Fill in the generated fields, producing a storable record
    pub fn complete(self) -> CitationRecord {
        CitationRecord {
            citation_id: self
                .citation_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            doi: self.doi,
            ai_model: self.ai_model,
            source_title: self.source_title,
            source_type: self.source_type,
            authors: self.authors,
            contribution_score: self.contribution_score,
            user_id: self.user_id,
            context: self.context,
            timestamp: self
                .timestamp
                .unwrap_or_else(|| format_timestamp(Utc::now().naive_utc())),
        }
    }
}

/// Stored citation event
///
/// `citation_id`, `doi`, `ai_model` and `timestamp` are always populated.
/// The timestamp is kept as received; it is only parsed when a query or the
/// impact score needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationRecord {
    pub citation_id: String,
    pub doi: String,
    pub ai_model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contribution_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub timestamp: String,
}

impl CitationRecord {
    /// Parsed timestamp, `None` when the stored string is not ISO-8601
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }

    /// Individual author names from the ampersand-delimited list
    pub fn author_names(&self) -> impl Iterator<Item = &str> {
        self.authors
            .as_deref()
            .unwrap_or_default()
            .split('&')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Render a UTC instant the way generated timestamps are stored
pub fn format_timestamp(instant: NaiveDateTime) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Parse an ISO-8601 timestamp into naive UTC
///
/// Accepts RFC 3339 with `Z` or an explicit offset, a naive
/// `YYYY-MM-DDTHH:MM:SS[.fraction]` (assumed UTC), or a bare date.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_complete_fills_generated_fields() {
        let record = NewCitation::new("10.1/x", "GPT-4").complete();

        assert_eq!(record.doi, "10.1/x");
        assert_eq!(record.ai_model, "GPT-4");
        assert!(Uuid::parse_str(&record.citation_id).is_ok());
        assert!(record.parsed_timestamp().is_some());
        assert!(record.source_title.is_none());
    }

    #[test]
    fn test_complete_keeps_supplied_fields() {
        let citation = NewCitation {
            citation_id: Some("c-1".into()),
            timestamp: Some("2025-04-01T10:15:30".into()),
            ..NewCitation::new("10.1/x", "GPT-4")
        };
        let record = citation.complete();

        assert_eq!(record.citation_id, "c-1");
        assert_eq!(record.timestamp, "2025-04-01T10:15:30");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let naive = parse_timestamp("2025-04-01T10:15:30").unwrap();
        assert_eq!(naive.hour(), 10);

        let zulu = parse_timestamp("2025-04-01T10:15:30Z").unwrap();
        assert_eq!(zulu, naive);

        let offset = parse_timestamp("2025-04-01T12:15:30+02:00").unwrap();
        assert_eq!(offset, naive);

        let fractional = parse_timestamp("2025-04-01T10:15:30.123456").unwrap();
        assert_eq!(fractional.with_nanosecond(0).unwrap(), naive);

        let date = parse_timestamp("2025-04-01").unwrap();
        assert_eq!(date.hour(), 0);

        assert!(parse_timestamp("last tuesday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_generated_timestamp_round_trips() {
        let now = Utc::now().naive_utc();
        let parsed = parse_timestamp(&format_timestamp(now)).unwrap();
        assert_eq!(parsed.and_utc().timestamp_micros(), now.and_utc().timestamp_micros());
    }

    #[test]
    fn test_author_names_split_on_ampersand() {
        let record = NewCitation {
            authors: Some("Johnson & Williams & ".into()),
            ..NewCitation::new("10.1/x", "GPT-4")
        }
        .complete();

        let names: Vec<&str> = record.author_names().collect();
        assert_eq!(names, vec!["Johnson", "Williams"]);

        let anonymous = NewCitation::new("10.1/y", "GPT-4").complete();
        assert_eq!(anonymous.author_names().count(), 0);
    }

    #[test]
    fn test_source_type_wire_names() {
        let json = serde_json::to_string(&SourceType::JournalArticle).unwrap();
        assert_eq!(json, "\"journal_article\"");
        let parsed: SourceType = serde_json::from_str("\"dataset\"").unwrap();
        assert_eq!(parsed, SourceType::Dataset);
        assert!(serde_json::from_str::<SourceType>("\"podcast\"").is_err());
    }
}
