use serde::{Deserialize, Serialize};

use crate::document::{ElementNode, Node, Path, Point, Range};
use crate::error::MarkerError;

/// Style classes the host toolbar hands to inline tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolStyles {
    pub inline_tool_button: String,
    pub inline_tool_button_active: String,
}

impl Default for ToolStyles {
    fn default() -> Self {
        Self {
            inline_tool_button: "cdx-inline-tool-button".to_string(),
            inline_tool_button_active: "cdx-inline-tool-button--active".to_string(),
        }
    }
}

/// What an inline tool may ask of the editor hosting it.
///
/// The host owns the document and the selection; tools only borrow them for
/// the length of one event. Node handles are paths, valid until the next
/// structural change: a host that restructures the document must move the
/// selection accordingly and let tools re-run `check_state` before routing
/// further clicks to them.
pub trait EditorApi {
    fn styles(&self) -> &ToolStyles;

    fn current_range(&self) -> Option<Range>;

    fn set_selection(&mut self, range: Range);

    /// Nearest element with `tag` and `class` enclosing the selection,
    /// searched from the anchor side first, then the focus side.
    fn find_parent_tag(&self, tag: &str, class: &str) -> Option<Path>;

    /// Selects the whole contents of the element at `element`.
    fn expand_to_tag(&mut self, element: &[usize]) -> Result<(), MarkerError>;

    fn extract_contents(&mut self, range: &Range) -> Result<(Vec<Node>, Point), MarkerError>;

    fn insert_fragment(&mut self, at: &Point, nodes: Vec<Node>) -> Result<Range, MarkerError>;

    fn remove_node(&mut self, path: &[usize]) -> Result<(Node, Point), MarkerError>;

    fn element(&self, path: &[usize]) -> Option<&ElementNode>;

    fn element_mut(&mut self, path: &[usize]) -> Option<&mut ElementNode>;
}
