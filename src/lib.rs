//! Leveled workflow diagrams rendered to SVG for slide decks.
//!
//! A workflow is a small directed graph whose stages are tagged with a
//! level; the layout engine turns levels into evenly spaced columns of
//! vertically centered boxes and routes straight arrowed connectors
//! between them. Diagrams can be rendered directly (the CLI path) or
//! attached to a [`deck::Deck`] that lays each one out lazily on its
//! first slide-visible notification.

pub mod config;
pub mod deck;
pub mod export;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod workflows;

mod error;

pub use error::{ConfigError, FlowdeckError};

use clap::Parser;
use geometry::Size;
use log::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Name of the built-in workflow to render
    #[arg(default_value = "simple")]
    pub workflow: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 960.0)]
    pub width: f32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 200.0)]
    pub height: f32,

    /// Label font size in points (overrides the config file)
    #[arg(long)]
    pub font_size: Option<usize>,

    /// Box padding (overrides the config file)
    #[arg(long)]
    pub padding: Option<f32>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// List the built-in workflows and exit
    #[arg(long)]
    pub list: bool,
}

pub fn run(cfg: &Config) -> Result<(), FlowdeckError> {
    if cfg.list {
        for name in workflows::NAMES {
            println!("{name}");
        }
        return Ok(());
    }

    info!(
        workflow = cfg.workflow,
        output_path = cfg.output;
        "Rendering workflow diagram"
    );

    // Load configuration
    let app_config = match &cfg.config {
        Some(path) => config::AppConfig::load(path)?,
        None => config::AppConfig::default(),
    };

    // Build the workflow graph (links included)
    let workflow = workflows::by_name(&cfg.workflow)
        .ok_or_else(|| FlowdeckError::Workflow(cfg.workflow.clone()))?;
    debug!(
        nodes_count = workflow.node_count(),
        edges_count = workflow.edge_count();
        "Built workflow graph"
    );

    // CLI flags take precedence over the config file
    let font_size = cfg.font_size.unwrap_or(app_config.layout.font_size);
    let padding = cfg.padding.unwrap_or(app_config.layout.padding);

    // Calculate the leveled layout
    info!("Calculating leveled layout");
    let mut engine = layout::Engine::new();
    engine
        .set_font_size(font_size)
        .set_padding(padding)
        .set_node_gap(app_config.layout.node_gap);
    let layout = engine.calculate(&workflow, Size::new(cfg.width, cfg.height));
    debug!(
        boxes_len = layout.boxes.len(),
        connectors_len = layout.connectors.len();
        "Layout calculated"
    );

    // Export the diagram
    info!("Exporting workflow diagram to SVG");
    let exporter = export::svg::Svg::new(&cfg.output);
    exporter.export_workflow(&layout, &cfg.workflow, font_size)?;

    info!(output_file = cfg.output; "SVG exported successfully");

    Ok(())
}
