//! Slide-deck integration.
//!
//! Diagrams live on slides and are laid out lazily: a slide-visible
//! notification renders every diagram on that slide at most once per deck
//! lifetime. Each diagram carries an explicit `rendered` flag guarding an
//! idempotent render call, and all state is owned by the [`Deck`].

use log::{debug, info};
use svg::Document;

use crate::{
    export,
    export::svg::{overlay_ellipse, render_document},
    geometry::{Point, Size},
    graph::WorkflowGraph,
    layout::{
        Engine, Layout, TextMeasure, TextMeasurer,
        leveled::{DEFAULT_FONT_SIZE, DEFAULT_PADDING},
    },
    workflows,
};

/// The single toggle affordance: an ellipse highlight a diagram can show
/// or hide.
#[derive(Debug, Clone)]
pub struct HighlightOverlay {
    pub center: Point,
    pub radius_x: f32,
    pub radius_y: f32,
    visible: bool,
}

impl HighlightOverlay {
    /// Creates a hidden overlay at the given center.
    pub fn new(center: Point, radius_x: f32, radius_y: f32) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
            visible: false,
        }
    }

    /// Flips visibility, returning the new state.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// One diagram: a workflow graph bound to a container anchor, its canvas
/// and typography options, and its render state.
pub struct Diagram {
    anchor: String,
    graph: WorkflowGraph,
    canvas: Size,
    font_size: usize,
    padding: f32,
    rendered: bool,
    layout: Option<Layout>,
    overlay: Option<HighlightOverlay>,
}

impl Diagram {
    pub fn new(anchor: impl Into<String>, graph: WorkflowGraph, canvas: Size) -> Self {
        Self {
            anchor: anchor.into(),
            graph,
            canvas,
            font_size: DEFAULT_FONT_SIZE,
            padding: DEFAULT_PADDING,
            rendered: false,
            layout: None,
            overlay: None,
        }
    }

    pub fn with_font_size(mut self, font_size: usize) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_overlay(mut self, overlay: HighlightOverlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// Flips the highlight overlay, if this diagram has one. Returns the
    /// new visibility.
    pub fn toggle_overlay(&mut self) -> bool {
        match &mut self.overlay {
            Some(overlay) => overlay.toggle(),
            None => false,
        }
    }

    /// Computes this diagram's layout unless it already has one.
    ///
    /// Returns true when a layout was computed, false for the no-op repeat
    /// calls.
    pub fn render_once<M: TextMeasure>(&mut self, engine: &mut Engine<M>) -> bool {
        if self.rendered {
            debug!(anchor = self.anchor; "Diagram already rendered, skipping");
            return false;
        }

        engine
            .set_font_size(self.font_size)
            .set_padding(self.padding);
        self.layout = Some(engine.calculate(&self.graph, self.canvas));
        self.rendered = true;
        true
    }

    /// Builds the SVG document for this diagram, including the overlay when
    /// it is toggled visible.
    pub fn document(&self) -> Result<Document, export::Error> {
        let layout = self.layout.as_ref().ok_or_else(|| {
            export::Error::Render(format!(
                "diagram '{}' has not been rendered yet",
                self.anchor
            ))
        })?;

        let mut doc = render_document(layout, &self.anchor, self.font_size);
        if let Some(overlay) = self.overlay.as_ref().filter(|o| o.is_visible()) {
            doc = doc.add(overlay_ellipse(
                overlay.center,
                overlay.radius_x,
                overlay.radius_y,
            ));
        }

        Ok(doc)
    }
}

/// A slide is just an identity plus the diagram anchors it hosts.
#[derive(Debug, Clone)]
pub struct Slide {
    id: String,
    anchors: Vec<String>,
}

/// A deck owns its slides, diagrams, and the layout engine; the hosting
/// presentation only delivers [`slide_visible`] notifications.
///
/// [`slide_visible`]: Deck::slide_visible
pub struct Deck<M = TextMeasurer> {
    slides: Vec<Slide>,
    diagrams: Vec<Diagram>,
    engine: Engine<M>,
}

impl Default for Deck<TextMeasurer> {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck<TextMeasurer> {
    pub fn new() -> Self {
        Self::with_engine(Engine::new())
    }
}

impl<M: TextMeasure> Deck<M> {
    pub fn with_engine(engine: Engine<M>) -> Self {
        Self {
            slides: Vec::new(),
            diagrams: Vec::new(),
            engine,
        }
    }

    pub fn add_slide(&mut self, id: impl Into<String>, anchors: &[&str]) {
        self.slides.push(Slide {
            id: id.into(),
            anchors: anchors.iter().map(|a| a.to_string()).collect(),
        });
    }

    pub fn add_diagram(&mut self, diagram: Diagram) {
        self.diagrams.push(diagram);
    }

    pub fn diagram(&self, anchor: &str) -> Option<&Diagram> {
        self.diagrams.iter().find(|d| d.anchor == anchor)
    }

    pub fn diagram_mut(&mut self, anchor: &str) -> Option<&mut Diagram> {
        self.diagrams.iter_mut().find(|d| d.anchor == anchor)
    }

    /// Handles a slide-visible notification.
    ///
    /// Lays out every not-yet-rendered diagram on that slide and returns
    /// the anchors that were rendered by this call. Repeat notifications
    /// for the same slide render nothing.
    pub fn slide_visible(&mut self, slide_id: &str) -> Vec<String> {
        let Some(slide) = self.slides.iter().find(|s| s.id == slide_id) else {
            debug!(slide_id; "No slide with this id, ignoring notification");
            return Vec::new();
        };
        let anchors = slide.anchors.clone();

        let mut rendered = Vec::new();
        for anchor in anchors {
            if let Some(diagram) = self.diagrams.iter_mut().find(|d| d.anchor == anchor) {
                if diagram.render_once(&mut self.engine) {
                    info!(slide_id, anchor; "Rendered diagram on first display");
                    rendered.push(anchor);
                }
            }
        }

        rendered
    }
}

/// The demo presentation: a simple workflow on the overview slide and the
/// advanced workflow, with its highlight overlay, on the deep-dive slide.
pub fn demo_deck() -> Deck {
    let mut deck = Deck::new();

    deck.add_diagram(
        Diagram::new("workflow-1", workflows::simple(), Size::new(960.0, 140.0))
            .with_font_size(34),
    );
    deck.add_diagram(
        Diagram::new("workflow-2", workflows::advanced(), Size::new(960.0, 200.0)).with_overlay(
            HighlightOverlay::new(Point::new(380.0, 100.0), 60.0, 90.0),
        ),
    );

    deck.add_slide("overview", &["workflow-1"]);
    deck.add_slide("deep-dive", &["workflow-2"]);

    deck
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WorkflowBuilder;

    struct FixedMeasure;

    impl TextMeasure for FixedMeasure {
        fn measure(&self, text: &str, _font_size: usize) -> Size {
            Size::new(text.chars().count() as f32 * 10.0, 20.0)
        }
    }

    fn test_deck() -> Deck<FixedMeasure> {
        let mut workflow = WorkflowBuilder::new()
            .stage("A", 0)
            .stage("B", 1)
            .levels(0..2)
            .all_to_all(0..2)
            .build();
        workflow.generate_level_links();

        let mut deck = Deck::with_engine(Engine::with_measurer(FixedMeasure));
        deck.add_diagram(Diagram::new("workflow-1", workflow, Size::new(300.0, 100.0)));
        deck.add_slide("intro", &["workflow-1"]);
        deck
    }

    #[test]
    fn test_first_notification_renders_once() {
        let mut deck = test_deck();

        assert_eq!(deck.slide_visible("intro"), vec!["workflow-1".to_string()]);
        assert!(deck.diagram("workflow-1").unwrap().is_rendered());

        // Second notification for the same slide is a no-op
        assert!(deck.slide_visible("intro").is_empty());
    }

    #[test]
    fn test_unknown_slide_is_ignored() {
        let mut deck = test_deck();
        assert!(deck.slide_visible("missing").is_empty());
        assert!(!deck.diagram("workflow-1").unwrap().is_rendered());
    }

    #[test]
    fn test_document_requires_render() {
        let mut deck = test_deck();

        assert!(deck.diagram("workflow-1").unwrap().document().is_err());

        deck.slide_visible("intro");
        let doc = deck.diagram("workflow-1").unwrap().document().unwrap();
        assert!(doc.to_string().contains("<rect"));
    }

    #[test]
    fn test_layout_survives_repeat_notifications() {
        let mut deck = test_deck();
        deck.slide_visible("intro");
        let first = deck.diagram("workflow-1").unwrap().layout().unwrap().boxes[0].clone();

        deck.slide_visible("intro");
        let second = &deck.diagram("workflow-1").unwrap().layout().unwrap().boxes[0];
        assert_eq!(&first, second);
    }

    #[test]
    fn test_overlay_toggle_changes_document() {
        let mut deck = test_deck();
        let overlay = HighlightOverlay::new(Point::new(380.0, 100.0), 60.0, 90.0);
        let diagram = deck.diagram_mut("workflow-1").unwrap();
        diagram.overlay = Some(overlay);

        deck.slide_visible("intro");

        let without = deck.diagram("workflow-1").unwrap().document().unwrap();
        assert!(!without.to_string().contains("<ellipse"));

        assert!(deck.diagram_mut("workflow-1").unwrap().toggle_overlay());
        let with = deck.diagram("workflow-1").unwrap().document().unwrap();
        assert!(with.to_string().contains("<ellipse"));

        assert!(!deck.diagram_mut("workflow-1").unwrap().toggle_overlay());
    }

    #[test]
    fn test_toggle_without_overlay_is_noop() {
        let mut deck = test_deck();
        assert!(!deck.diagram_mut("workflow-1").unwrap().toggle_overlay());
    }

    #[test]
    fn test_demo_deck_wiring() {
        let deck = demo_deck();
        assert!(deck.diagram("workflow-1").is_some());
        assert!(deck.diagram("workflow-2").is_some());
        assert!(!deck.diagram("workflow-2").unwrap().is_rendered());
    }
}
