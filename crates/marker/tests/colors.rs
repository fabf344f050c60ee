use plate_marker::{
    Document, EditorApi, ElementNode, HexColor, Marker, MarkerConfig, MemoryEditor, Node, Point,
    Range, TextColor, is_light,
};

const YELLOW: &str = "#ffeb3b";
const NAVY: &str = "#1e3a8a";

fn marked_editor() -> (MemoryEditor, Marker) {
    let mut editor = MemoryEditor::new(Document::new(vec![Node::paragraph(vec![Node::text(
        "hello world",
    )])]));
    editor
        .select(Range::new(
            Point::new(vec![0, 0], 6),
            Point::new(vec![0, 0], 11),
        ))
        .unwrap();

    let config = MarkerConfig::from_json_value(serde_json::json!({
        "defaultColors": [YELLOW, NAVY]
    }))
    .unwrap();
    let mut marker = Marker::new(&editor, config);
    marker.render();
    marker.render_actions();

    let range = editor.current_range();
    marker.surround(&mut editor, range.as_ref()).unwrap();
    (editor, marker)
}

#[test]
fn luminance_classification_boundaries() {
    assert_eq!(is_light("#808080"), Some(true));
    assert_eq!(is_light("#000000"), Some(false));
    assert_eq!(is_light("#ffffff"), Some(true));
    assert_eq!(is_light("FFFFFF"), Some(true));
    assert_eq!(is_light("not-a-color"), None);
    assert_eq!(is_light("#fff"), None);
}

#[test]
fn contrast_text_follows_luminance() {
    let yellow: HexColor = YELLOW.parse().unwrap();
    let navy: HexColor = NAVY.parse().unwrap();
    assert_eq!(yellow.contrast_text(), TextColor::Black);
    assert_eq!(navy.contrast_text(), TextColor::White);
}

#[test]
fn panel_lists_one_swatch_per_color_and_starts_hidden() {
    let editor = MemoryEditor::new(Document::default());
    let config = MarkerConfig::from_colors([YELLOW, NAVY]).unwrap();
    let mut marker = Marker::new(&editor, config);

    let panel = marker.render_actions();
    assert!(panel.is_hidden());
    assert_eq!(panel.label(), Some("Marker Color"));
    let colors: Vec<String> = panel
        .swatches()
        .iter()
        .map(|s| s.color().to_string())
        .collect();
    assert_eq!(colors, vec![YELLOW.to_string(), NAVY.to_string()]);
    assert!(panel.swatches().iter().all(|s| s.size() == ("25px", "25px")));
}

#[test]
fn check_state_reveals_panel_bound_to_the_mark() {
    let (editor, marker) = marked_editor();
    assert!(marker.is_marked());

    let panel = marker.actions().unwrap();
    assert!(!panel.is_hidden());
    assert_eq!(panel.target(), Some(&[0usize, 1][..]));
    assert!(editor.element(&[0, 1]).unwrap().is_tag("mark"));
}

#[test]
fn swatch_click_sets_background_and_legible_text() {
    let (mut editor, mut marker) = marked_editor();

    assert!(marker.click_swatch(&mut editor, 0));
    let mark = editor.element(&[0, 1]).unwrap();
    assert_eq!(mark.style("background-color"), Some(YELLOW));
    assert_eq!(mark.style("color"), Some("black"));

    assert!(marker.click_swatch(&mut editor, 1));
    let mark = editor.element(&[0, 1]).unwrap();
    assert_eq!(mark.style("background-color"), Some(NAVY));
    assert_eq!(mark.style("color"), Some("white"));

    assert_eq!(
        editor.doc().to_html(),
        "<p>hello <mark class=\"cdx-marker\" style=\"background-color: #1e3a8a; color: white\">world</mark></p>"
    );
}

#[test]
fn out_of_range_swatch_changes_nothing() {
    let (mut editor, mut marker) = marked_editor();
    let before = editor.doc().clone();

    assert!(!marker.click_swatch(&mut editor, 7));
    assert_eq!(editor.doc(), &before);
}

#[test]
fn leaving_the_mark_hides_and_unbinds_the_panel() {
    let (mut editor, mut marker) = marked_editor();

    editor
        .select(Range::collapsed(Point::new(vec![0, 0], 2)))
        .unwrap();
    assert!(!marker.check_state(&editor));

    let panel = marker.actions().unwrap();
    assert!(panel.is_hidden());
    assert_eq!(panel.target(), None);
    assert!(!marker.click_swatch(&mut editor, 0));
}

#[test]
fn unwrapping_hides_the_panel_without_a_separate_check() {
    let (mut editor, mut marker) = marked_editor();

    let range = editor.current_range();
    marker.surround(&mut editor, range.as_ref()).unwrap();

    assert!(!marker.is_marked());
    assert!(marker.actions().unwrap().is_hidden());
}

#[test]
fn stale_target_hides_the_panel() {
    let (mut editor, mut marker) = marked_editor();

    // The host drops the mark behind the tool's back.
    editor.remove_node(&[0, 1]).unwrap();

    assert!(!marker.click_swatch(&mut editor, 0));
    assert!(marker.actions().unwrap().is_hidden());
}

#[test]
fn click_after_restructure_does_not_recolor_the_wrong_highlight() {
    let (mut editor, mut marker) = marked_editor();
    assert_eq!(marker.actions().unwrap().target(), Some(&[0usize, 1][..]));

    // The host puts another highlight where the bound one used to be and
    // moves the caret into the original, without a state check.
    let other = ElementNode::new("MARK")
        .with_class("cdx-marker")
        .with_children(vec![Node::text("new")]);
    editor
        .insert_fragment(
            &Point::new(vec![0], 0),
            vec![Node::text("> "), Node::Element(other)],
        )
        .unwrap();
    editor
        .select(Range::collapsed(Point::new(vec![0, 3, 0], 1)))
        .unwrap();

    assert!(!marker.click_swatch(&mut editor, 0));
    assert!(marker.actions().unwrap().is_hidden());
    assert_eq!(editor.element(&[0, 1]).unwrap().style("background-color"), None);
    assert_eq!(editor.element(&[0, 3]).unwrap().style("background-color"), None);
}
