//! Depth-bounded simple path enumeration

use super::{KnowledgeGraph, NodeKind, Relationship};
use serde::Serialize;

/// One hop of a path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStep {
    pub source: String,
    pub source_type: NodeKind,
    pub target: String,
    pub target_type: NodeKind,
    pub relationship: Relationship,
    pub timestamp: Option<String>,
}

impl KnowledgeGraph {
    /// All simple directed paths from `source_id` to `target_id` with at
    /// most `max_depth` edges
    ///
    /// No node repeats within a path, except that a path may close back on
    /// its start when `source_id == target_id` (a true cycle). Missing
    /// endpoints yield no paths. When parallel edges join two nodes, the
    /// most recently added one describes the hop.
    pub fn get_citation_path(&self, source_id: &str, target_id: &str, max_depth: usize) -> Vec<Vec<PathStep>> {
        let (Some(&start), Some(&goal)) = (self.index.get(source_id), self.index.get(target_id)) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        let mut stack = vec![start];
        let mut on_path = vec![false; self.nodes.len()];
        on_path[start] = true;

        self.walk(start, goal, max_depth, &mut stack, &mut on_path, &mut found);

        found.iter().map(|nodes| self.describe(nodes)).collect()
    }

    fn walk(
        &self,
        current: usize,
        goal: usize,
        remaining: usize,
        stack: &mut Vec<usize>,
        on_path: &mut [bool],
        found: &mut Vec<Vec<usize>>,
    ) {
        if remaining == 0 {
            return;
        }

        for next in self.successors(current) {
            if next == goal {
                let mut path = stack.clone();
                path.push(goal);
                found.push(path);
                continue;
            }
            if on_path[next] {
                continue;
            }

            stack.push(next);
            on_path[next] = true;
            self.walk(next, goal, remaining - 1, stack, on_path, found);
            on_path[next] = false;
            stack.pop();
        }
    }

    /// Distinct successors in order of their first edge
    fn successors(&self, node: usize) -> Vec<usize> {
        let mut out: Vec<usize> = Vec::new();
        for &e in &self.outgoing[node] {
            let target = self.edges[e].target;
            if !out.contains(&target) {
                out.push(target);
            }
        }
        out
    }

    fn describe(&self, nodes: &[usize]) -> Vec<PathStep> {
        nodes
            .windows(2)
            .filter_map(|hop| {
                let (from, to) = (hop[0], hop[1]);
                let edge = self.outgoing[from]
                    .iter()
                    .rev()
                    .map(|&e| &self.edges[e])
                    .find(|edge| edge.target == to)?;
                Some(PathStep {
                    source: self.nodes[from].id.clone(),
                    source_type: self.nodes[from].kind,
                    target: self.nodes[to].id.clone(),
                    target_type: self.nodes[to].kind,
                    relationship: edge.relationship,
                    timestamp: edge.timestamp.clone(),
                })
            })
            .collect()
    }
}
