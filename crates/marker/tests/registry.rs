use plate_marker::{
    Document, EditorApi, ElementNode, InlineTool, Marker, MarkerConfig, MarkerError,
    MemoryEditor, Node, Point, Range, ToolRegistry,
};

fn editor() -> MemoryEditor {
    MemoryEditor::new(Document::new(vec![Node::paragraph(vec![
        Node::text("plain "),
        Node::inline("B", vec![Node::text("bold")]),
        Node::text(" text"),
    ])]))
}

#[test]
fn sanitize_rule_allows_marker_class_and_style() {
    let value = serde_json::to_value(Marker::sanitize()).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "mark": { "class": "cdx-marker", "style": true } })
    );
}

#[test]
fn save_keeps_marker_attributes_and_strips_unknown_markup() {
    let mut editor = editor();
    editor
        .select(Range::new(
            Point::new(vec![0, 1, 0], 0),
            Point::new(vec![0, 1, 0], 4),
        ))
        .unwrap();
    let config = MarkerConfig::from_colors(["#ffeb3b"]).unwrap();
    let mut marker = Marker::new(&editor, config);
    marker.render_actions();

    let range = editor.current_range();
    marker.surround(&mut editor, range.as_ref()).unwrap();
    assert!(marker.click_swatch(&mut editor, 0));

    assert_eq!(
        editor.save(&Marker::sanitize()),
        "<p>plain <mark class=\"cdx-marker\" style=\"background-color: #ffeb3b; color: black\">bold</mark> text</p>"
    );
}

#[test]
fn neighbouring_highlights_save_as_separate_marks() {
    let mut editor = MemoryEditor::new(Document::new(vec![Node::paragraph(vec![Node::text(
        "ab",
    )])]));
    let mut marker = Marker::new(&editor, MarkerConfig::default());

    editor
        .select(Range::new(
            Point::new(vec![0, 0], 0),
            Point::new(vec![0, 0], 1),
        ))
        .unwrap();
    let range = editor.current_range();
    marker.surround(&mut editor, range.as_ref()).unwrap();

    // "b" now sits in the text node after the first mark.
    editor
        .select(Range::new(
            Point::new(vec![0, 2], 0),
            Point::new(vec![0, 2], 1),
        ))
        .unwrap();
    let range = editor.current_range();
    marker.surround(&mut editor, range.as_ref()).unwrap();

    let expected =
        "<p><mark class=\"cdx-marker\">a</mark><mark class=\"cdx-marker\">b</mark></p>";
    assert_eq!(editor.doc().to_html(), expected);
    assert_eq!(editor.save(&Marker::sanitize()), expected);
}

#[test]
fn sanitizer_drops_foreign_classes_on_marks() {
    let mark = ElementNode::new("mark")
        .with_class("cdx-marker")
        .with_class("injected");
    let editor = MemoryEditor::new(Document::new(vec![Node::paragraph(vec![Node::Element(
        mark.with_children(vec![Node::text("x")]),
    )])]));

    assert_eq!(
        editor.save(&Marker::sanitize()),
        "<p><mark class=\"cdx-marker\">x</mark></p>"
    );
}

#[test]
fn registry_rejects_duplicate_tool_names() {
    let editor = editor();
    let first = Marker::new(&editor, MarkerConfig::default());
    let second = Marker::new(&editor, MarkerConfig::default());

    let err = ToolRegistry::new(vec![
        Box::new(first) as Box<dyn InlineTool>,
        Box::new(second) as Box<dyn InlineTool>,
    ])
    .err()
    .expect("duplicate names must be rejected");
    assert!(matches!(err, MarkerError::DuplicateTool(name) if name == "marker"));
}

#[test]
fn registry_routes_activation_and_selection_changes() {
    let mut editor = editor();
    editor
        .select(Range::new(
            Point::new(vec![0, 0], 0),
            Point::new(vec![0, 0], 5),
        ))
        .unwrap();
    let marker = Marker::new(&editor, MarkerConfig::default());
    let mut registry = ToolRegistry::new(vec![Box::new(marker) as Box<dyn InlineTool>]).unwrap();

    let buttons = registry.render();
    assert_eq!(buttons.len(), 1);
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["marker"]);
    assert!(registry.tool("marker").is_some_and(|tool| tool.is_inline()));
    assert!(registry.tool("bold").is_none());

    registry.activate("marker", &mut editor).unwrap();
    assert_eq!(
        editor.doc().to_html(),
        "<p><mark class=\"cdx-marker\">plain</mark> <b>bold</b> text</p>"
    );
    assert_eq!(registry.check_state(&editor).get("marker"), Some(&true));

    editor.clear_selection();
    assert_eq!(editor.current_range(), None);
    registry.activate("marker", &mut editor).unwrap();
    assert_eq!(registry.check_state(&editor).get("marker"), Some(&false));

    assert!(matches!(
        registry.activate("bold", &mut editor),
        Err(MarkerError::UnknownTool(_))
    ));
    assert_eq!(registry.sanitize_config(), Marker::sanitize());
}
