//! Leveled layout engine
//!
//! Positions workflow stages in level columns: stages sharing a level form
//! a vertical stack centered on the canvas midline, and columns are spread
//! evenly across the canvas width. A two-pass scheme is required because
//! box sizes depend on measured label text.

use log::debug;

use crate::{
    geometry::{Point, Size},
    graph::WorkflowGraph,
    layout::text::{TextMeasure, TextMeasurer},
};

/// Default font size for stage labels, in points.
pub const DEFAULT_FONT_SIZE: usize = 22;

/// Default padding between a label and its box edge.
pub const DEFAULT_PADDING: f32 = 3.0;

/// Default vertical gap between stacked boxes in one column.
pub const DEFAULT_NODE_GAP: f32 = 15.0;

/// A positioned stage box. `origin` is the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBox {
    pub label: String,
    pub level: u32,
    pub origin: Point,
    pub size: Size,
}

impl NodeBox {
    /// The connector attachment point on the right edge, vertically centered.
    pub fn right_middle(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width,
            self.origin.y + self.size.height * 0.5,
        )
    }

    /// The connector attachment point on the left edge, vertically centered.
    pub fn left_middle(&self) -> Point {
        Point::new(self.origin.x, self.origin.y + self.size.height * 0.5)
    }
}

/// A drawable straight connector between two boxes, arrowhead at `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub source: usize,
    pub target: usize,
    pub from: Point,
    pub to: Point,
}

/// The computed layout for one diagram: positioned boxes (parallel to the
/// graph's stage order) and the drawable connector list.
#[derive(Debug, Clone)]
pub struct Layout {
    pub boxes: Vec<NodeBox>,
    pub connectors: Vec<Connector>,
    pub canvas: Size,
}

/// Leveled layout engine.
///
/// A pure function of (graph, canvas, font size, padding): recomputing with
/// unchanged inputs reproduces identical positions.
pub struct Engine<M = TextMeasurer> {
    font_size: usize,
    padding: f32,
    node_gap: f32,
    measurer: M,
}

impl Default for Engine<TextMeasurer> {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine<TextMeasurer> {
    /// Create an engine measuring text with the system font stack.
    pub fn new() -> Self {
        Self::with_measurer(TextMeasurer::new())
    }
}

impl<M: TextMeasure> Engine<M> {
    /// Create an engine with a caller-supplied text measurer.
    pub fn with_measurer(measurer: M) -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            padding: DEFAULT_PADDING,
            node_gap: DEFAULT_NODE_GAP,
            measurer,
        }
    }

    /// Set the label font size in points.
    pub fn set_font_size(&mut self, font_size: usize) -> &mut Self {
        self.font_size = font_size;
        self
    }

    /// Set the padding between a label and its box edge.
    pub fn set_padding(&mut self, padding: f32) -> &mut Self {
        self.padding = padding;
        self
    }

    /// Set the vertical gap between stacked boxes.
    pub fn set_node_gap(&mut self, node_gap: f32) -> &mut Self {
        self.node_gap = node_gap;
        self
    }

    /// Calculate the layout for a workflow on the given canvas.
    pub fn calculate(&self, workflow: &WorkflowGraph, canvas: Size) -> Layout {
        // Measurement pass: box = label bounds plus padding on every side.
        // Stages on levels missing from the level list keep the default
        // origin; that is accepted incomplete output, not an error.
        let mut boxes: Vec<NodeBox> = workflow
            .stages_with_indices()
            .map(|(_, stage)| NodeBox {
                label: stage.name.clone(),
                level: stage.level,
                origin: Point::default(),
                size: self
                    .measurer
                    .measure(&stage.name, self.font_size)
                    .add_padding(self.padding),
            })
            .collect();

        let levels = workflow.levels();

        // Column width is the widest box at that level; an empty level
        // contributes zero.
        let column_widths: Vec<f32> = levels
            .iter()
            .map(|&level| {
                boxes
                    .iter()
                    .filter(|b| b.level == level)
                    .map(|b| b.size.width)
                    .fold(0.0, f32::max)
            })
            .collect();

        // Spread the remaining width evenly into the gaps between columns
        let used_width: f32 = column_widths.iter().sum();
        let column_gap = if levels.len() > 1 {
            (canvas.width - used_width) / (levels.len() - 1) as f32
        } else {
            0.0
        };

        // Stack height per level, one trailing gap removed
        let stack_heights: Vec<f32> = levels
            .iter()
            .map(|&level| {
                let total: f32 = boxes
                    .iter()
                    .filter(|b| b.level == level)
                    .map(|b| b.size.height + self.node_gap)
                    .sum();
                (total - self.node_gap).max(0.0)
            })
            .collect();

        debug!(
            columns = levels.len(),
            used_width,
            column_gap;
            "Calculated column metrics"
        );

        let middle = canvas.height * 0.5;
        let mut column_x = 0.0;

        for (column, &level) in levels.iter().enumerate() {
            let column_width = column_widths[column];
            let mut y = middle - stack_heights[column] * 0.5;

            for node_box in boxes.iter_mut().filter(|b| b.level == level) {
                // Center each box within its column; the widest box gets
                // zero offset
                node_box.origin.x = column_x + (column_width - node_box.size.width) * 0.5;
                node_box.origin.y = y;
                y += node_box.size.height + self.node_gap;
            }

            column_x += column_width + column_gap;
        }

        let connectors: Vec<Connector> = workflow
            .edges()
            .map(|(source, target, _)| {
                let from = boxes[source.index()].right_middle();
                let to = boxes[target.index()].left_middle();
                Connector {
                    source: source.index(),
                    target: target.index(),
                    from,
                    to,
                }
            })
            .collect();

        Layout {
            boxes,
            connectors,
            canvas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WorkflowBuilder;
    use float_cmp::assert_approx_eq;

    /// Deterministic measurement: 10 units per character, 20 units tall.
    struct FixedMeasure;

    impl TextMeasure for FixedMeasure {
        fn measure(&self, text: &str, _font_size: usize) -> Size {
            Size::new(text.chars().count() as f32 * 10.0, 20.0)
        }
    }

    fn engine() -> Engine<FixedMeasure> {
        Engine::with_measurer(FixedMeasure)
    }

    fn chain_workflow() -> WorkflowGraph {
        let mut workflow = WorkflowBuilder::new()
            .stage("Start", 0)
            .stage("Mid", 1)
            .stage("Also", 1)
            .stage("End", 2)
            .levels(0..3)
            .all_to_all(0..3)
            .build();
        workflow.generate_level_links();
        workflow
    }

    #[test]
    fn test_exact_packing() {
        let workflow = chain_workflow();
        let canvas = Size::new(960.0, 140.0);
        let layout = engine().calculate(&workflow, canvas);

        // Rightmost column must end exactly at the canvas edge: the last
        // column starts at sum(widths[..last]) + (L-1) * gap and the widest
        // box in it spans the column width.
        let right_edge = layout
            .boxes
            .iter()
            .map(|b| b.origin.x + b.size.width)
            .fold(0.0, f32::max);
        assert_approx_eq!(f32, right_edge, canvas.width, epsilon = 1e-3);
    }

    #[test]
    fn test_stacks_center_on_canvas_midline() {
        let workflow = chain_workflow();
        let canvas = Size::new(960.0, 200.0);
        let layout = engine().calculate(&workflow, canvas);

        for &level in workflow.levels() {
            let level_boxes: Vec<_> = layout.boxes.iter().filter(|b| b.level == level).collect();
            let top = level_boxes
                .iter()
                .map(|b| b.origin.y)
                .fold(f32::INFINITY, f32::min);
            let bottom = level_boxes
                .iter()
                .map(|b| b.origin.y + b.size.height)
                .fold(f32::NEG_INFINITY, f32::max);
            assert_approx_eq!(
                f32,
                (top + bottom) * 0.5,
                canvas.height * 0.5,
                epsilon = 1e-3
            );
        }
    }

    #[test]
    fn test_stacked_boxes_keep_fixed_gap() {
        let workflow = chain_workflow();
        let layout = engine().calculate(&workflow, Size::new(960.0, 200.0));

        let level_one: Vec<_> = layout.boxes.iter().filter(|b| b.level == 1).collect();
        assert_eq!(level_one.len(), 2);
        let gap = level_one[1].origin.y - (level_one[0].origin.y + level_one[0].size.height);
        assert_approx_eq!(f32, gap, DEFAULT_NODE_GAP, epsilon = 1e-3);
    }

    #[test]
    fn test_boxes_center_within_their_column() {
        let workflow = chain_workflow();
        let layout = engine().calculate(&workflow, Size::new(960.0, 140.0));

        // Level 1 holds "Mid" (30 wide + padding) and "Also" (40 wide +
        // padding); the narrower box is inset by half the difference.
        let mid = layout.boxes.iter().find(|b| b.label == "Mid").unwrap();
        let also = layout.boxes.iter().find(|b| b.label == "Also").unwrap();
        assert_approx_eq!(
            f32,
            mid.origin.x,
            also.origin.x + (also.size.width - mid.size.width) * 0.5,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_single_level_has_no_gap_division() {
        let workflow = WorkflowBuilder::new()
            .stage("Lonely", 0)
            .levels(0..1)
            .build();
        let layout = engine().calculate(&workflow, Size::new(500.0, 100.0));

        assert_eq!(layout.boxes[0].origin.x, 0.0);
    }

    #[test]
    fn test_empty_level_contributes_nothing() {
        // Level 1 is listed but has no stages
        let workflow = WorkflowBuilder::new()
            .stage("A", 0)
            .stage("B", 2)
            .levels(0..3)
            .build();
        let canvas = Size::new(300.0, 100.0);
        let layout = engine().calculate(&workflow, canvas);

        let b = layout.boxes.iter().find(|b| b.label == "B").unwrap();
        assert_approx_eq!(
            f32,
            b.origin.x + b.size.width,
            canvas.width,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_uncovered_level_keeps_default_origin() {
        // Stage at level 5 is never mentioned in the level list
        let workflow = WorkflowBuilder::new()
            .stage("A", 0)
            .stage("Stray", 5)
            .levels(0..1)
            .build();
        let layout = engine().calculate(&workflow, Size::new(300.0, 100.0));

        let stray = layout.boxes.iter().find(|b| b.label == "Stray").unwrap();
        assert_eq!(stray.origin, Point::default());
    }

    #[test]
    fn test_connectors_attach_to_box_edges() {
        let workflow = chain_workflow();
        let layout = engine().calculate(&workflow, Size::new(960.0, 140.0));

        for connector in &layout.connectors {
            let source = &layout.boxes[connector.source];
            let target = &layout.boxes[connector.target];
            assert_eq!(connector.from, source.right_middle());
            assert_eq!(connector.to, target.left_middle());
        }
        assert_eq!(layout.connectors.len(), 4);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let workflow = chain_workflow();
        let canvas = Size::new(960.0, 140.0);
        let engine = engine();

        let first = engine.calculate(&workflow, canvas);
        let second = engine.calculate(&workflow, canvas);

        assert_eq!(first.boxes, second.boxes);
        assert_eq!(first.connectors, second.connectors);
    }

    #[test]
    fn test_padding_grows_boxes() {
        let workflow = WorkflowBuilder::new()
            .stage("AB", 0)
            .levels(0..1)
            .build();
        let mut engine = engine();
        engine.set_padding(10.0);
        let layout = engine.calculate(&workflow, Size::new(100.0, 100.0));

        assert_eq!(layout.boxes[0].size, Size::new(40.0, 40.0));
    }
}
