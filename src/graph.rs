use log::{debug, trace};
use petgraph::graph::{DiGraph, NodeIndex};

/// A single workflow stage: a display label plus the level (column rank)
/// the stage belongs to in the leveled layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub name: String,
    pub level: u32,
}

impl Stage {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

/// Records whether an edge was part of the declared link list or produced
/// by the adjacent-level generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrigin {
    Declared,
    Generated,
}

/// A directed workflow graph whose stages are partitioned into levels.
///
/// The graph is built once, optionally mutated by [`generate_level_links`],
/// and consumed read-only by the layout engine. Node indices are stable
/// insertion positions, so declared links can reference stages by their
/// declaration order.
///
/// [`generate_level_links`]: WorkflowGraph::generate_level_links
#[derive(Debug, Clone)]
pub struct WorkflowGraph {
    graph: DiGraph<Stage, EdgeOrigin>,
    levels: Vec<u32>,
    all_to_all: Vec<u32>,
}

impl WorkflowGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The ordered list of level values this graph lays out, left to right.
    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    pub fn stage(&self, idx: NodeIndex) -> &Stage {
        self.graph
            .node_weight(idx)
            .expect("Node index should exist")
    }

    /// Iterates over all stages with their indices, in insertion order.
    pub fn stages_with_indices(&self) -> impl Iterator<Item = (NodeIndex, &Stage)> {
        self.graph.node_indices().map(|idx| (idx, self.stage(idx)))
    }

    /// Iterates over the stage indices belonging to a single level,
    /// preserving insertion order.
    pub fn stage_indices_at_level(&self, level: u32) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .node_indices()
            .filter(move |&idx| self.stage(idx).level == level)
    }

    /// Iterates over all edges as (source, target, origin) triples.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, EdgeOrigin)> + '_ {
        self.graph.edge_indices().map(|edge_idx| {
            let (source, target) = self
                .graph
                .edge_endpoints(edge_idx)
                .expect("Edge index should exist");
            let origin = *self
                .graph
                .edge_weight(edge_idx)
                .expect("Edge index should exist");
            (source, target, origin)
        })
    }

    /// Connects every stage at an all-to-all level to every stage at the
    /// next level.
    ///
    /// For each stage whose level is in the all-to-all policy set, a
    /// directed edge is added to every stage whose level is exactly one
    /// greater. Quadratic over stages, which is fine at the sizes workflows
    /// reach. Edge insertion follows stage iteration order.
    pub fn generate_level_links(&mut self) {
        let mut pairs = Vec::new();

        for (source_idx, source) in self.stages_with_indices() {
            if !self.all_to_all.contains(&source.level) {
                continue;
            }
            for (target_idx, target) in self.stages_with_indices() {
                if target.level == source.level + 1 {
                    pairs.push((source_idx, target_idx));
                }
            }
        }

        debug!(generated = pairs.len(); "Generated adjacent-level links");

        for (source, target) in pairs {
            self.graph.add_edge(source, target, EdgeOrigin::Generated);
        }
    }
}

/// Builder for [`WorkflowGraph`].
///
/// Stages are declared in order; links reference stages by declaration
/// position. No validation is performed: links referencing positions that
/// were never declared are dropped, and levels missing from the level list
/// simply never receive a position during layout.
#[derive(Debug, Default)]
pub struct WorkflowBuilder {
    stages: Vec<Stage>,
    links: Vec<(usize, usize)>,
    levels: Vec<u32>,
    all_to_all: Vec<u32>,
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a stage with the given label and level.
    pub fn stage(mut self, name: impl Into<String>, level: u32) -> Self {
        self.stages.push(Stage::new(name, level));
        self
    }

    /// Declares an explicit directed link between two stage positions.
    pub fn link(mut self, source: usize, target: usize) -> Self {
        self.links.push((source, target));
        self
    }

    /// Sets the ordered list of levels the layout will place, left to right.
    pub fn levels(mut self, levels: impl IntoIterator<Item = u32>) -> Self {
        self.levels = levels.into_iter().collect();
        self
    }

    /// Sets the levels at which every stage connects to every stage at the
    /// next level during link generation.
    pub fn all_to_all(mut self, levels: impl IntoIterator<Item = u32>) -> Self {
        self.all_to_all = levels.into_iter().collect();
        self
    }

    pub fn build(self) -> WorkflowGraph {
        let mut graph = DiGraph::new();

        let indices: Vec<NodeIndex> = self
            .stages
            .into_iter()
            .map(|stage| graph.add_node(stage))
            .collect();

        for (source, target) in self.links {
            match (indices.get(source), indices.get(target)) {
                (Some(&source_idx), Some(&target_idx)) => {
                    graph.add_edge(source_idx, target_idx, EdgeOrigin::Declared);
                }
                _ => {
                    // Out-of-range positions yield incomplete output, not a failure
                    debug!(source, target; "Dropping link to undeclared stage");
                }
            }
        }

        let workflow = WorkflowGraph {
            graph,
            levels: self.levels,
            all_to_all: self.all_to_all,
        };

        trace!(
            nodes = workflow.node_count(),
            edges = workflow.edge_count();
            "Built workflow graph"
        );

        workflow
    }
}
