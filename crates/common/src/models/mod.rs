//! Domain models shared by the components and the gateway

mod citation;

pub use citation::{format_timestamp, parse_timestamp, CitationRecord, NewCitation, SourceType};
