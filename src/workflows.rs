//! Built-in workflow catalog.
//!
//! Three fixed research-workflow graphs, declared stage by stage. Each
//! constructor runs the adjacent-level link generation pass so the returned
//! graph is ready for layout.

use crate::graph::{WorkflowBuilder, WorkflowGraph};

/// Names of every built-in workflow, in catalog order.
pub const NAMES: [&str; 3] = ["simple", "advanced", "toolchain"];

/// Looks up a built-in workflow by name.
pub fn by_name(name: &str) -> Option<WorkflowGraph> {
    match name {
        "simple" => Some(simple()),
        "advanced" => Some(advanced()),
        "toolchain" => Some(toolchain()),
        _ => None,
    }
}

/// A seven-stage pipeline with one branch: every level is all-to-all, so
/// all links come from generation.
pub fn simple() -> WorkflowGraph {
    let mut workflow = WorkflowBuilder::new()
        .stage("Hypothesis", 0)
        .stage("Experiment", 1)
        .stage("Simulation", 1)
        .stage("Data", 2)
        .stage("Plots", 3)
        .stage("Figures", 4)
        .stage("Paper", 5)
        .levels(0..6)
        .all_to_all(0..6)
        .build();
    workflow.generate_level_links();
    workflow
}

/// The wide 19-stage workflow with an explicit link list.
///
/// Only levels 0 and 6 are all-to-all; everything in between is wired by
/// hand so parallel analysis tracks stay separate.
pub fn advanced() -> WorkflowGraph {
    let mut workflow = WorkflowBuilder::new()
        .stage("Hypothesis", 0) // 0
        .stage("Experiment", 1) // 1
        .stage("Simulation", 1)
        .stage("Data", 2) // 3
        .stage("Data", 2)
        .stage("Data", 2)
        .stage("Data", 2)
        .stage("Analysis", 3) // 7
        .stage("Analysis", 3)
        .stage("Analysis", 3)
        .stage("Analysis", 3)
        .stage("Meta-analysis", 4) // 11
        .stage("Meta-analysis", 4)
        .stage("Plot", 5) // 13
        .stage("Plot", 5)
        .stage("Plot", 5)
        .stage("Figure", 6) // 16
        .stage("Figure", 6)
        .stage("Paper", 7) // 18
        .link(1, 3)
        .link(1, 4)
        .link(2, 5)
        .link(2, 6)
        .link(3, 7)
        .link(4, 8)
        .link(5, 9)
        .link(6, 10)
        .link(7, 11)
        .link(7, 13)
        .link(8, 12)
        .link(9, 11)
        .link(9, 12)
        .link(10, 15)
        .link(11, 13)
        .link(11, 14)
        .link(12, 15)
        .link(13, 16)
        .link(14, 16)
        .link(14, 17)
        .link(15, 17)
        .levels(0..8)
        .all_to_all([0, 6])
        .build();
    workflow.generate_level_links();
    workflow
}

/// A single-chain workflow naming the concrete tools behind each stage.
pub fn toolchain() -> WorkflowGraph {
    let mut workflow = WorkflowBuilder::new()
        .stage("ACC function", 0)
        .stage("Experiment", 1)
        .stage("Nengo", 1)
        .stage("NEO", 2)
        .stage("NumPy, SciPy", 3)
        .stage("matplotlib", 4)
        .stage("SVGUtil", 5)
        .stage("LaTeX", 6)
        .levels(0..7)
        .all_to_all(0..7)
        .build();
    workflow.generate_level_links();
    workflow
}
