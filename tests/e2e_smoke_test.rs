use std::fs;

use tempfile::tempdir;

use flowdeck::{Config, FlowdeckError, workflows};

fn render_config(workflow: &str, output: String) -> Config {
    Config {
        workflow: workflow.to_string(),
        output,
        width: 960.0,
        height: 200.0,
        font_size: None,
        padding: None,
        config: None,
        log_level: "off".to_string(),
        list: false,
    }
}

#[test]
fn e2e_smoke_test_builtin_workflows() {
    // Create a temporary directory for test outputs
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let mut failed_workflows = Vec::new();

    for name in workflows::NAMES {
        let output_path = temp_dir.path().join(format!("{name}.svg"));
        let cfg = render_config(name, output_path.to_string_lossy().to_string());

        if let Err(e) = flowdeck::run(&cfg) {
            failed_workflows.push((name, e));
            continue;
        }

        let content = fs::read_to_string(&output_path).expect("Output SVG should exist");
        assert!(content.contains("<svg"), "{name}: output is not an SVG");
        assert!(content.contains("<rect"), "{name}: output has no stage boxes");
        assert!(content.contains("<line"), "{name}: output has no connectors");
    }

    if !failed_workflows.is_empty() {
        eprintln!("\nBuilt-in workflows that failed:");
        for (name, error) in &failed_workflows {
            eprintln!("  {name}: {error}");
        }
        panic!("{} built-in workflow(s) failed to render", failed_workflows.len());
    }
}

#[test]
fn e2e_unknown_workflow_is_an_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("unknown.svg");
    let cfg = render_config("no-such-workflow", output_path.to_string_lossy().to_string());

    match flowdeck::run(&cfg) {
        Err(FlowdeckError::Workflow(name)) => assert_eq!(name, "no-such-workflow"),
        other => panic!("Expected a workflow error, got {other:?}"),
    }
    assert!(!output_path.exists());
}

#[test]
fn e2e_config_file_overrides_layout_defaults() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let config_path = temp_dir.path().join("flowdeck.toml");
    fs::write(&config_path, "[layout]\nfont_size = 34\npadding = 6.0\n").unwrap();

    let output_path = temp_dir.path().join("simple.svg");
    let mut cfg = render_config("simple", output_path.to_string_lossy().to_string());
    cfg.config = Some(config_path.to_string_lossy().to_string());

    flowdeck::run(&cfg).expect("Render with config file should succeed");

    let content = fs::read_to_string(&output_path).unwrap();
    assert!(content.contains("font-size=\"34\""));
}

#[test]
fn e2e_list_mode_renders_nothing() {
    let mut cfg = render_config("simple", "unused.svg".to_string());
    cfg.list = true;

    flowdeck::run(&cfg).expect("List mode should succeed");
    assert!(!std::path::Path::new("unused.svg").exists());
}
