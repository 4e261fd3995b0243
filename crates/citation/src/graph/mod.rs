//! Knowledge graph representation
//!
//! Directed multi-relationship graph over sources (DOIs), authors and AI
//! models. Node ids share one namespace: an author named like a DOI is the
//! same node.

mod paths;

pub use paths::PathStep;

use aicif_common::{CitationRecord, SourceType};
use serde::Serialize;
use std::collections::HashMap;

pub const PAPER_COLOR: &str = "#3498db";
pub const DATASET_COLOR: &str = "#2ecc71";
pub const CODE_COLOR: &str = "#f39c12";
pub const AUTHOR_COLOR: &str = "#e74c3c";
pub const AI_MODEL_COLOR: &str = "#9b59b6";

pub const SOURCE_SIZE: u32 = 10;
pub const AUTHOR_SIZE: u32 = 7;
pub const AI_MODEL_SIZE: u32 = 12;

/// Weight of a CITES edge added for a citation event
pub const CITATION_WEIGHT: u32 = 2;

/// Node type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Paper,
    JournalArticle,
    Dataset,
    Code,
    Author,
    AiModel,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Paper => "paper",
            NodeKind::JournalArticle => "journal_article",
            NodeKind::Dataset => "dataset",
            NodeKind::Code => "code",
            NodeKind::Author => "author",
            NodeKind::AiModel => "ai_model",
        }
    }

    /// Display color used when a node of this kind is created
    pub fn color(&self) -> &'static str {
        match self {
            NodeKind::Dataset => DATASET_COLOR,
            NodeKind::Code => CODE_COLOR,
            NodeKind::Author => AUTHOR_COLOR,
            NodeKind::AiModel => AI_MODEL_COLOR,
            NodeKind::Paper | NodeKind::JournalArticle => PAPER_COLOR,
        }
    }
}

impl From<SourceType> for NodeKind {
    fn from(source_type: SourceType) -> Self {
        match source_type {
            SourceType::JournalArticle => NodeKind::JournalArticle,
            SourceType::Paper => NodeKind::Paper,
            SourceType::Dataset => NodeKind::Dataset,
            SourceType::Code => NodeKind::Code,
        }
    }
}

/// Edge relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relationship {
    Cites,
    Authored,
    Created,
    Uses,
}

/// Node attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub size: u32,
    pub color: &'static str,
}

impl Node {
    /// Title when present, otherwise the id
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// Edge in the knowledge graph
#[derive(Debug, Clone)]
pub struct Edge {
    /// Source node index
    pub source: usize,

    /// Target node index
    pub target: usize,

    pub relationship: Relationship,

    pub weight: u32,

    pub timestamp: Option<String>,
}

/// Full graph for external rendering
#[derive(Debug, Clone, Serialize)]
pub struct GraphData {
    pub nodes: Vec<VisNode>,
    pub edges: Vec<VisEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub size: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisEdge {
    pub source: String,
    pub target: String,
    pub label: Relationship,
    pub weight: u32,
}

/// Direct neighborhood of one entity
#[derive(Debug, Clone, Serialize)]
pub struct EntityConnections {
    pub entity: EntityInfo,
    pub incoming: Vec<Connection>,
    pub outgoing: Vec<Connection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityInfo {
    pub id: String,
    pub data: Node,
}

/// A neighbor with every edge between it and the entity
#[derive(Debug, Clone, Serialize)]
pub struct Connection {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub edges: Vec<ConnectionEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionEdge {
    pub relationship: Relationship,
    pub weight: u32,
    pub timestamp: Option<String>,
}

/// In-memory knowledge graph
#[derive(Debug, Default)]
pub struct KnowledgeGraph {
    /// Node table in insertion order
    nodes: Vec<Node>,

    /// Node id -> index into `nodes`
    index: HashMap<String, usize>,

    /// Edge list in insertion order
    edges: Vec<Edge>,

    /// Per node: indices of edges leaving it
    outgoing: Vec<Vec<usize>>,

    /// Per node: indices of edges entering it
    incoming: Vec<Vec<usize>>,
}

impl KnowledgeGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror a citation event into the graph
    ///
    /// Ensures the source and AI model nodes exist, adds a CITES edge from
    /// model to source (repeated citations add parallel edges), and links
    /// each listed author to the source with an AUTHORED edge unless the
    /// author already has an edge of any kind to it.
    pub fn add_citation(&mut self, record: &CitationRecord) {
        let kind = record
            .source_type
            .map(NodeKind::from)
            .unwrap_or(NodeKind::Paper);
        let title = record.source_title.as_deref().unwrap_or("Unknown");

        let source = self.ensure_node(&record.doi, Some(title), kind, SOURCE_SIZE);
        let model = self.add_ai_model(&record.ai_model);

        self.add_edge(
            model,
            source,
            Relationship::Cites,
            CITATION_WEIGHT,
            Some(record.timestamp.clone()),
        );

        for author in record.author_names() {
            let author = self.add_author(author);
            if !self.has_edge(author, source) {
                self.add_edge(author, source, Relationship::Authored, 1, None);
            }
        }
    }

    /// Ensure a source node exists, returning its index
    pub fn add_source(&mut self, id: &str, title: &str, kind: NodeKind, size: u32) -> usize {
        self.ensure_node(id, Some(title), kind, size)
    }

    /// Ensure an author node exists, returning its index
    pub fn add_author(&mut self, name: &str) -> usize {
        self.ensure_node(name, None, NodeKind::Author, AUTHOR_SIZE)
    }

    /// Ensure an AI model node exists, returning its index
    pub fn add_ai_model(&mut self, name: &str) -> usize {
        self.ensure_node(name, None, NodeKind::AiModel, AI_MODEL_SIZE)
    }

    /// Add an edge between two existing nodes by id
    ///
    /// Returns false, adding nothing, when either node is missing.
    pub fn connect(
        &mut self,
        source_id: &str,
        target_id: &str,
        relationship: Relationship,
        weight: u32,
        timestamp: Option<&str>,
    ) -> bool {
        match (self.index.get(source_id), self.index.get(target_id)) {
            (Some(&source), Some(&target)) => {
                self.add_edge(source, target, relationship, weight, timestamp.map(str::to_string));
                true
            }
            _ => false,
        }
    }

    /// Every node and edge, in insertion order
    pub fn get_visualization_data(&self) -> GraphData {
        let nodes = self
            .nodes
            .iter()
            .map(|node| VisNode {
                id: node.id.clone(),
                label: node.label().to_string(),
                kind: node.kind,
                size: node.size,
                color: node.color,
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .map(|edge| VisEdge {
                source: self.nodes[edge.source].id.clone(),
                target: self.nodes[edge.target].id.clone(),
                label: edge.relationship,
                weight: edge.weight,
            })
            .collect();

        GraphData { nodes, edges }
    }

    /// Incoming and outgoing neighbors of an entity, `None` when unknown
    pub fn get_entity_connections(&self, entity_id: &str) -> Option<EntityConnections> {
        let &idx = self.index.get(entity_id)?;

        Some(EntityConnections {
            entity: EntityInfo {
                id: entity_id.to_string(),
                data: self.nodes[idx].clone(),
            },
            incoming: self.group_by_neighbor(&self.incoming[idx], |edge| edge.source),
            outgoing: self.group_by_neighbor(&self.outgoing[idx], |edge| edge.target),
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Existing nodes keep their attributes
    fn ensure_node(&mut self, id: &str, title: Option<&str>, kind: NodeKind, size: u32) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }

        let idx = self.nodes.len();
        self.nodes.push(Node {
            id: id.to_string(),
            title: title.map(str::to_string),
            kind,
            size,
            color: kind.color(),
        });
        self.index.insert(id.to_string(), idx);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        idx
    }

    fn add_edge(
        &mut self,
        source: usize,
        target: usize,
        relationship: Relationship,
        weight: u32,
        timestamp: Option<String>,
    ) {
        let edge_idx = self.edges.len();
        self.edges.push(Edge {
            source,
            target,
            relationship,
            weight,
            timestamp,
        });
        self.outgoing[source].push(edge_idx);
        self.incoming[target].push(edge_idx);
    }

    /// Whether any edge, of any relationship, runs from `source` to `target`
    fn has_edge(&self, source: usize, target: usize) -> bool {
        self.outgoing[source]
            .iter()
            .any(|&e| self.edges[e].target == target)
    }

    fn group_by_neighbor(&self, edge_ids: &[usize], neighbor: impl Fn(&Edge) -> usize) -> Vec<Connection> {
        let mut connections: Vec<Connection> = Vec::new();
        let mut slots: HashMap<usize, usize> = HashMap::new();

        for &e in edge_ids {
            let edge = &self.edges[e];
            let other = neighbor(edge);
            let slot = *slots.entry(other).or_insert_with(|| {
                let node = &self.nodes[other];
                connections.push(Connection {
                    id: node.id.clone(),
                    label: node.label().to_string(),
                    kind: node.kind,
                    edges: Vec::new(),
                });
                connections.len() - 1
            });
            connections[slot].edges.push(ConnectionEdge {
                relationship: edge.relationship,
                weight: edge.weight,
                timestamp: edge.timestamp.clone(),
            });
        }

        connections
    }
}
