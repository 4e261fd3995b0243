//! AIC-IF citation components
//!
//! The three in-memory components behind the gateway:
//! - `registry`: append-only citation event log with counters and the
//!   AIC-IF impact score
//! - `graph`: directed multi-relationship graph of sources, authors and AI
//!   models mirroring the same events
//! - `interpreter`: simulated SHAP/LIME attribution over a static catalog
//!
//! None of the components synchronize internally; the composition root
//! owns each one behind its own lock.

pub mod graph;
pub mod interpreter;
pub mod registry;
pub mod seed;

pub use graph::KnowledgeGraph;
pub use interpreter::{ExplanationMethod, ModelInterpreter};
pub use registry::{CitationQuery, CitationRegistry};
