use anyhow::Context as _;
use plate_marker::{
    Document, EditorApi, InlineTool, Marker, MarkerConfig, MemoryEditor, Node, Point, Range,
    ToolRegistry,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn load_config() -> anyhow::Result<MarkerConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return MarkerConfig::from_json_value(serde_json::json!({
            "defaultColors": ["#ffeb3b", "#a5d6a7", "#1e3a8a"]
        }))
        .context("invalid default marker config");
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read marker config from {path}"))?;
    MarkerConfig::from_json_str(&raw).context("invalid marker config")
}

fn sample_document() -> Document {
    Document::new(vec![
        Node::paragraph(vec![
            Node::text("The quick "),
            Node::inline("B", vec![Node::text("brown fox")]),
            Node::text(" jumps over the lazy dog."),
        ]),
        Node::paragraph(vec![Node::text("Nothing to see here.")]),
    ])
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = load_config()?;
    let mut editor = MemoryEditor::new(sample_document());

    let mut marker = Marker::new(&editor, config);
    let button = serde_json::to_string(marker.render())?;
    info!(%button, "rendered toolbar button");
    info!(actions = %marker.render_actions().to_html(), "rendered color panel");

    // "quick brown"
    editor.select(Range::new(
        Point::new(vec![0, 0], 4),
        Point::new(vec![0, 1, 0], 5),
    ))?;
    let range = editor.current_range();
    marker.surround(&mut editor, range.as_ref())?;
    info!(html = %editor.doc().to_html(), selected = ?editor.selected_text()?, "wrapped");

    for index in 0..marker.config().default_colors().len() {
        if marker.click_swatch(&mut editor, index) {
            info!(index, html = %editor.doc().to_html(), "applied swatch");
        }
    }
    info!(html = %editor.save(&Marker::sanitize()), "saved");

    let range = editor.current_range();
    marker.surround(&mut editor, range.as_ref())?;
    info!(html = %editor.doc().normalized().to_html(), "unwrapped");
    info!(
        actions = %marker.actions().map(|a| a.to_html()).unwrap_or_default(),
        "color panel after unwrap"
    );

    // The same tool driven through a toolbar registry.
    let mut toolbar = ToolRegistry::new(vec![
        Box::new(Marker::new(&editor, MarkerConfig::default())) as Box<dyn InlineTool>,
    ])?;
    editor.select(Range::new(
        Point::new(vec![1, 0], 12),
        Point::new(vec![1, 0], 16),
    ))?;
    toolbar.activate(Marker::NAME, &mut editor)?;
    info!(state = ?toolbar.check_state(&editor), "toolbar state");
    info!(html = %editor.save(&toolbar.sanitize_config()), "saved");

    Ok(())
}
