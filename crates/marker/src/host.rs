use tracing::debug;

use crate::api::{EditorApi, ToolStyles};
use crate::document::{Document, ElementNode, Node, Path, Point, Range};
use crate::error::MarkerError;
use crate::sanitize::SanitizeConfig;

/// How many ancestors `find_parent_tag` inspects per boundary.
pub const PARENT_SEARCH_DEPTH: usize = 10;

/// An editor host that keeps its document and selection in memory.
#[derive(Debug, Clone)]
pub struct MemoryEditor {
    doc: Document,
    selection: Option<Range>,
    styles: ToolStyles,
}

impl MemoryEditor {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            selection: None,
            styles: ToolStyles::default(),
        }
    }

    pub fn with_styles(mut self, styles: ToolStyles) -> Self {
        self.styles = styles;
        self
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> Option<&Range> {
        self.selection.as_ref()
    }

    /// Sets the selection after checking both points resolve.
    pub fn select(&mut self, range: Range) -> Result<(), MarkerError> {
        self.doc.validate_point(&range.start)?;
        self.doc.validate_point(&range.end)?;
        self.selection = Some(range);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selected_text(&self) -> Result<String, MarkerError> {
        match &self.selection {
            Some(range) => self.doc.text_in_range(range),
            None => Ok(String::new()),
        }
    }

    /// Serialized content the way the host would store it. The live tree is
    /// written as is: neighbouring highlights stay separate elements.
    pub fn save(&self, sanitize: &SanitizeConfig) -> String {
        sanitize.clean(&self.doc).to_html()
    }
}

impl EditorApi for MemoryEditor {
    fn styles(&self) -> &ToolStyles {
        &self.styles
    }

    fn current_range(&self) -> Option<Range> {
        self.selection.clone()
    }

    fn set_selection(&mut self, range: Range) {
        self.selection = Some(range);
    }

    fn find_parent_tag(&self, tag: &str, class: &str) -> Option<Path> {
        let range = self.selection.as_ref()?;
        let matches = |el: &ElementNode| el.is_tag(tag) && el.has_class(class);
        self.doc
            .closest_element(&range.start.path, PARENT_SEARCH_DEPTH, matches)
            .or_else(|| {
                self.doc
                    .closest_element(&range.end.path, PARENT_SEARCH_DEPTH, matches)
            })
    }

    fn expand_to_tag(&mut self, element: &[usize]) -> Result<(), MarkerError> {
        let len = self
            .doc
            .element(element)
            .ok_or_else(|| MarkerError::NotAnElement(element.to_vec()))?
            .children
            .len();
        debug!(path = ?element, "expanding selection to element");
        self.selection = Some(Range::new(
            Point::new(element.to_vec(), 0),
            Point::new(element.to_vec(), len),
        ));
        Ok(())
    }

    fn extract_contents(&mut self, range: &Range) -> Result<(Vec<Node>, Point), MarkerError> {
        let (fragment, collapse) = self.doc.extract_contents(range)?;
        self.selection = Some(Range::collapsed(collapse.clone()));
        Ok((fragment, collapse))
    }

    fn insert_fragment(&mut self, at: &Point, nodes: Vec<Node>) -> Result<Range, MarkerError> {
        self.doc.insert_fragment(at, nodes)
    }

    fn remove_node(&mut self, path: &[usize]) -> Result<(Node, Point), MarkerError> {
        self.doc.remove_node(path)
    }

    fn element(&self, path: &[usize]) -> Option<&ElementNode> {
        self.doc.element(path)
    }

    fn element_mut(&mut self, path: &[usize]) -> Option<&mut ElementNode> {
        self.doc.element_mut(path)
    }
}
