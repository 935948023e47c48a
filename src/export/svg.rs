use crate::{
    export,
    geometry::Point,
    layout::{Connector, Layout, NodeBox},
};
use log::{debug, error, info};
use std::{fs::File, io::Write};
use svg::{
    Document,
    node::element::{Definitions, Ellipse, Group, Line, Marker, Path, Rectangle, Text},
};

/// SVG exporter writing one document per diagram
pub struct Svg {
    pub file_name: String,
}

impl Svg {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
        }
    }

    /// Render a workflow layout and write it to the output file
    pub fn export_workflow(
        &self,
        layout: &Layout,
        anchor: &str,
        font_size: usize,
    ) -> Result<(), export::Error> {
        let doc = render_document(layout, anchor, font_size);
        debug!("SVG document rendered");

        self.write_document(doc)
    }

    /// Writes an SVG document to the specified file
    pub fn write_document(&self, doc: Document) -> Result<(), export::Error> {
        info!(file_name = self.file_name; "Creating SVG file");
        let f = match File::create(&self.file_name) {
            Ok(file) => file,
            Err(err) => {
                error!(file_name = self.file_name, err:err; "Failed to create SVG file");
                return Err(export::Error::Io(err));
            }
        };

        if let Err(err) = write!(&f, "{doc}") {
            error!(file_name = self.file_name, err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }
}

/// Marker id for a diagram's arrowhead, suffixed with the diagram anchor so
/// several diagrams can share one host document without id collisions.
pub fn arrow_marker_id(anchor: &str) -> String {
    format!("arrow-{anchor}")
}

/// Creates the arrowhead marker definition for one diagram
fn create_marker_definitions(anchor: &str) -> Definitions {
    let arrowhead = Marker::new()
        .set("id", arrow_marker_id(anchor))
        .set("viewBox", "0 -5 10 10")
        .set("refX", 10)
        .set("refY", 0)
        .set("markerWidth", 6)
        .set("markerHeight", 10)
        .set("orient", "auto")
        .add(Path::new().set("d", "M0,-5L10,0L0,5Z").set("fill", "#000"));

    Definitions::new().add(arrowhead)
}

/// Renders one stage box as a rounded rectangle with a centered label
fn render_node(node_box: &NodeBox, font_size: usize) -> Group {
    let rect = Rectangle::new()
        .set("rx", 5)
        .set("ry", 5)
        .set("width", node_box.size.width)
        .set("height", node_box.size.height)
        .set("fill", "white")
        .set("stroke", "black");

    let text = Text::new(node_box.label.clone())
        .set("x", node_box.size.width / 2.0)
        .set("y", node_box.size.height / 2.0)
        .set("text-anchor", "middle")
        .set("dominant-baseline", "middle")
        .set("font-family", "Arial")
        .set("font-size", font_size);

    Group::new()
        .set(
            "transform",
            format!("translate({},{})", node_box.origin.x, node_box.origin.y),
        )
        .add(rect)
        .add(text)
}

/// Renders one connector as a straight line with an arrowhead at the target
fn render_connector(connector: &Connector, anchor: &str) -> Line {
    Line::new()
        .set("x1", connector.from.x)
        .set("y1", connector.from.y)
        .set("x2", connector.to.x)
        .set("y2", connector.to.y)
        .set("stroke", "black")
        .set("marker-end", format!("url(#{})", arrow_marker_id(anchor)))
}

/// An ellipse overlay element for the highlight toggle
pub fn overlay_ellipse(center: Point, radius_x: f32, radius_y: f32) -> Ellipse {
    Ellipse::new()
        .set("cx", center.x)
        .set("cy", center.y)
        .set("rx", radius_x)
        .set("ry", radius_y)
        .set("fill", "#000")
        .set("fill-opacity", 0.15)
}

/// Assembles the SVG document for one laid-out diagram
pub fn render_document(layout: &Layout, anchor: &str, font_size: usize) -> Document {
    let mut doc = Document::new()
        .set(
            "viewBox",
            format!("0 0 {} {}", layout.canvas.width, layout.canvas.height),
        )
        .set("width", layout.canvas.width)
        .set("height", layout.canvas.height)
        .add(create_marker_definitions(anchor));

    for node_box in &layout.boxes {
        doc = doc.add(render_node(node_box, font_size));
    }

    for connector in &layout.connectors {
        doc = doc.add(render_connector(connector, anchor));
    }

    doc
}
