//! Demo data
//!
//! Sample citations, a small starting graph and the generator behind the
//! citation simulation endpoint.

use crate::graph::{KnowledgeGraph, NodeKind, Relationship, SOURCE_SIZE};
use crate::registry::CitationRegistry;
use aicif_common::{NewCitation, SourceType};
use rand::Rng;
use tracing::info;

/// Size of dataset nodes in the sample graph
const DATASET_SIZE: u32 = 8;

/// A publication the simulator cycles through
#[derive(Debug, Clone, Copy)]
pub struct Publication {
    pub doi: &'static str,
    pub title: &'static str,
    pub authors: &'static str,
}

pub const SAMPLE_PUBLICATIONS: [Publication; 5] = [
    Publication {
        doi: "10.1038/s41586-023-06792-0",
        title: "Climate change impact on marine ecosystems",
        authors: "Smith et al.",
    },
    Publication {
        doi: "10.1126/science.abd4896",
        title: "Ocean acidification and coral reefs",
        authors: "Johnson & Williams",
    },
    Publication {
        doi: "10.1073/pnas.2023152118",
        title: "Biodiversity loss in tropical forests",
        authors: "Lee et al.",
    },
    Publication {
        doi: "10.1016/j.ocecoaman.2022.12.007",
        title: "Coastal management strategies",
        authors: "Wong & Chen",
    },
    Publication {
        doi: "10.1029/2021GL094771",
        title: "Sea level rise prediction models",
        authors: "Garcia et al.",
    },
];

pub const SAMPLE_CONTEXTS: [&str; 5] = [
    "Climate change research",
    "Marine ecology query",
    "Biodiversity assessment",
    "Conservation planning",
    "Environmental policy development",
];

/// Simulated contribution scores are drawn uniformly from this range
pub const SIMULATED_SCORE_RANGE: (f64, f64) = (0.3, 0.95);

/// Citations preloaded into the registry
pub fn sample_citations() -> Vec<NewCitation> {
    vec![
        NewCitation {
            source_title: Some("Climate change impact on marine ecosystems".into()),
            source_type: Some(SourceType::JournalArticle),
            authors: Some("Smith et al.".into()),
            contribution_score: Some(0.89),
            user_id: Some("user_123".into()),
            context: Some("Climate change research".into()),
            timestamp: Some("2025-04-01T10:15:30".into()),
            ..NewCitation::new("10.1038/s41586-023-06792-0", "GPT-4")
        },
        NewCitation {
            source_title: Some("Ocean acidification and coral reefs".into()),
            source_type: Some(SourceType::JournalArticle),
            authors: Some("Johnson & Williams".into()),
            contribution_score: Some(0.76),
            user_id: Some("user_456".into()),
            context: Some("Marine ecology query".into()),
            timestamp: Some("2025-04-02T15:22:45".into()),
            ..NewCitation::new("10.1126/science.abd4896", "GPT-4")
        },
        NewCitation {
            source_title: Some("Biodiversity loss in tropical forests".into()),
            source_type: Some(SourceType::Dataset),
            authors: Some("Lee et al.".into()),
            contribution_score: Some(0.92),
            user_id: Some("user_789".into()),
            context: Some("Biodiversity assessment".into()),
            timestamp: Some("2025-04-03T09:11:05".into()),
            ..NewCitation::new("10.1073/pnas.2023152118", "Claude-3")
        },
    ]
}

pub fn seed_registry(registry: &mut CitationRegistry) {
    for citation in sample_citations() {
        registry.add_citation(citation);
    }
    info!(citations = registry.len(), "Seeded citation registry");
}

/// Papers with their authors, datasets with their creators, and the
/// relationships between them
pub fn seed_graph(graph: &mut KnowledgeGraph) {
    let papers: [(&str, &str, &[&str]); 3] = [
        (
            "10.1038/s41586-023-06792-0",
            "Climate change impact on marine ecosystems",
            &["Smith, J.", "Anderson, T.", "Wilson, M."],
        ),
        (
            "10.1126/science.abd4896",
            "Ocean acidification and coral reefs",
            &["Johnson, K.", "Williams, P."],
        ),
        (
            "10.1073/pnas.2023152118",
            "Biodiversity loss in tropical forests",
            &["Lee, S.", "Brown, R.", "Martinez, D."],
        ),
    ];

    let datasets: [(&str, &str, &[&str]); 2] = [
        (
            "10.5061/dryad.1234",
            "Global sea temperature data 2000-2022",
            &["NOAA", "Smith, J."],
        ),
        (
            "10.5061/dryad.5678",
            "Coral reef health indicators",
            &["Johnson, K.", "Marine Biology Institute"],
        ),
    ];

    for (doi, title, authors) in papers {
        graph.add_source(doi, title, NodeKind::Paper, SOURCE_SIZE);
        for author in authors {
            graph.add_author(author);
            graph.connect(author, doi, Relationship::Authored, 1, None);
        }
    }

    for (doi, title, creators) in datasets {
        graph.add_source(doi, title, NodeKind::Dataset, DATASET_SIZE);
        for creator in creators {
            graph.add_author(creator);
            graph.connect(creator, doi, Relationship::Created, 1, None);
        }
    }

    graph.connect("10.1038/s41586-023-06792-0", "10.5061/dryad.1234", Relationship::Uses, 2, None);
    graph.connect("10.1126/science.abd4896", "10.5061/dryad.5678", Relationship::Uses, 2, None);

    graph.add_ai_model("GPT-4");
    graph.connect(
        "GPT-4",
        "10.1038/s41586-023-06792-0",
        Relationship::Cites,
        3,
        Some("2025-04-01T10:15:30"),
    );
    graph.connect(
        "GPT-4",
        "10.1126/science.abd4896",
        Relationship::Cites,
        2,
        Some("2025-04-02T15:22:45"),
    );

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Seeded knowledge graph"
    );
}

/// `count` journal-article citations by `ai_model`, cycling through the
/// sample publications and contexts
///
/// Timestamps are left unset so they are stamped when logged.
pub fn simulated_citations<R: Rng + ?Sized>(count: usize, ai_model: &str, rng: &mut R) -> Vec<NewCitation> {
    let (low, high) = SIMULATED_SCORE_RANGE;

    (0..count)
        .map(|i| {
            let publication = SAMPLE_PUBLICATIONS[i % SAMPLE_PUBLICATIONS.len()];
            let score: f64 = rng.gen_range(low..high);
            NewCitation {
                source_title: Some(publication.title.to_string()),
                source_type: Some(SourceType::JournalArticle),
                authors: Some(publication.authors.to_string()),
                contribution_score: Some((score * 100.0).round() / 100.0),
                user_id: Some(format!("demo_user_{}", i % 5 + 1)),
                context: Some(SAMPLE_CONTEXTS[i % SAMPLE_CONTEXTS.len()].to_string()),
                ..NewCitation::new(publication.doi, ai_model)
            }
        })
        .collect()
}
