use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::MarkerError;

pub type Path = Vec<usize>;
pub type Styles = BTreeMap<String, String>;

/// Tags that render inline. Adjacent twins of these are merged by
/// [`Document::normalized`]; block elements never are.
const INLINE_TAGS: &[&str] = &[
    "a", "b", "code", "em", "i", "mark", "s", "small", "span", "strong", "sub", "sup", "u",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Document {
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(TextNode { text: text.into() })
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Element(ElementNode::new("P").with_children(children))
    }

    pub fn inline(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element(ElementNode::new(tag).with_children(children))
    }

    pub fn text_content(&self) -> String {
        match self {
            Node::Text(t) => t.text.clone(),
            Node::Element(el) => el.text_content(),
        }
    }
}

impl From<ElementNode> for Node {
    fn from(value: ElementNode) -> Self {
        Node::Element(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub style: Styles,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl ElementNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            style: Styles::new(),
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Tag names compare ASCII case-insensitively, the way the DOM reports
    /// `tagName` in upper case regardless of how the element was authored.
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn set_style(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.style.insert(property.into(), value.into());
    }

    pub fn style_attr(&self) -> String {
        self.style
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    pub(crate) fn shallow_clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            classes: self.classes.clone(),
            style: self.style.clone(),
            children: Vec::new(),
        }
    }

    fn same_shape(&self, other: &ElementNode) -> bool {
        self.is_tag(&other.tag) && self.classes == other.classes && self.style == other.style
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
}

/// A boundary point. When `path` names a text node `offset` is a byte offset
/// into its text; otherwise it is a child index of the element at `path`
/// (the empty path is the document root).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Point,
    pub end: Point,
}

impl Range {
    /// Builds a range from two boundary points in either order.
    pub fn new(a: Point, b: Point) -> Self {
        if compare_points(&a, &b) == Ordering::Greater {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            start: point.clone(),
            end: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Orders two boundary points in document order without consulting the tree.
pub fn compare_points(a: &Point, b: &Point) -> Ordering {
    if a.path == b.path {
        return a.offset.cmp(&b.offset);
    }
    if b.path.starts_with(&a.path) {
        let child = b.path[a.path.len()];
        return if a.offset <= child {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    if a.path.starts_with(&b.path) {
        return compare_points(b, a).reverse();
    }
    a.path.cmp(&b.path)
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.get(*first)?;
        for &ix in rest {
            node = match node {
                Node::Element(el) => el.children.get(ix)?,
                Node::Text(_) => return None,
            };
        }
        Some(node)
    }

    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.get_mut(*first)?;
        for &ix in rest {
            node = match node {
                Node::Element(el) => el.children.get_mut(ix)?,
                Node::Text(_) => return None,
            };
        }
        Some(node)
    }

    pub fn element(&self, path: &[usize]) -> Option<&ElementNode> {
        match self.node(path)? {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, path: &[usize]) -> Option<&mut ElementNode> {
        match self.node_mut(path)? {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    fn children_mut(&mut self, path: &[usize]) -> Result<&mut Vec<Node>, MarkerError> {
        if path.is_empty() {
            return Ok(&mut self.children);
        }
        match self.node_mut(path) {
            Some(Node::Element(el)) => Ok(&mut el.children),
            Some(Node::Text(_)) => Err(MarkerError::NotAnElement(path.to_vec())),
            None => Err(MarkerError::invalid_path(path, "no node at path")),
        }
    }

    pub fn validate_point(&self, point: &Point) -> Result<(), MarkerError> {
        let len = if point.path.is_empty() {
            self.children.len()
        } else {
            match self.node(&point.path) {
                Some(Node::Text(t)) => t.text.len(),
                Some(Node::Element(el)) => el.children.len(),
                None => return Err(MarkerError::invalid_path(&point.path, "no node at path")),
            }
        };
        if point.offset > len {
            return Err(MarkerError::OffsetOutOfBounds {
                path: point.path.clone(),
                offset: point.offset,
                len,
            });
        }
        Ok(())
    }

    /// Walks from `from` towards the root, at most `max_depth` nodes, and
    /// returns the first element accepted by `pred`. The node at `from` is
    /// itself a candidate.
    pub fn closest_element(
        &self,
        from: &[usize],
        max_depth: usize,
        pred: impl Fn(&ElementNode) -> bool,
    ) -> Option<Path> {
        let mut path = from.to_vec();
        for _ in 0..max_depth {
            if path.is_empty() {
                return None;
            }
            if let Some(Node::Element(el)) = self.node(&path) {
                if pred(el) {
                    return Some(path);
                }
            }
            path.pop();
        }
        None
    }

    /// Moves everything inside `range` out of the tree.
    ///
    /// Text nodes cut by a boundary are split; elements cut by a boundary
    /// stay in the tree holding their unselected part while a shallow clone
    /// holding the selected part goes into the fragment. Returns the fragment
    /// and the point the range collapses to, which is where the fragment
    /// would have to be inserted to put the content back.
    pub fn extract_contents(&mut self, range: &Range) -> Result<(Vec<Node>, Point), MarkerError> {
        self.validate_point(&range.start)?;
        self.validate_point(&range.end)?;
        if compare_points(&range.start, &range.end) == Ordering::Greater {
            return Err(MarkerError::InvalidRange(format!(
                "start {:?} is after end {:?}",
                range.start, range.end
            )));
        }

        let start = Bound {
            path: &range.start.path,
            offset: range.start.offset,
        };
        let end = Bound {
            path: &range.end.path,
            offset: range.end.offset,
        };
        let mut base = Path::new();
        let (fragment, collapse) =
            extract_children(&mut self.children, &mut base, Some(start), Some(end))?;
        trace!(
            nodes = fragment.len(),
            collapse = ?collapse,
            "extracted range contents"
        );
        Ok((fragment, collapse))
    }

    /// Inserts `nodes` at `at`, splitting a text node when `at` points into
    /// one. Returns the range spanning exactly the inserted nodes.
    pub fn insert_fragment(&mut self, at: &Point, nodes: Vec<Node>) -> Result<Range, MarkerError> {
        self.validate_point(at)?;

        let tail = match self.node_mut(&at.path) {
            Some(Node::Text(text)) => {
                let split = clamp_to_char_boundary(&text.text, at.offset);
                Some(text.text.split_off(split))
            }
            _ => None,
        };

        let (parent, index) = match tail {
            Some(tail) => {
                let Some((&ix, parent)) = at.path.split_last() else {
                    return Err(MarkerError::invalid_path(&at.path, "text at document root"));
                };
                let parent = parent.to_vec();
                self.children_mut(&parent)?.insert(ix + 1, Node::text(tail));
                (parent, ix + 1)
            }
            None => (at.path.clone(), at.offset),
        };

        let count = nodes.len();
        let children = self.children_mut(&parent)?;
        for (i, node) in nodes.into_iter().enumerate() {
            children.insert(index + i, node);
        }
        trace!(parent = ?parent, index, count, "inserted fragment");

        Ok(Range::new(
            Point::new(parent.clone(), index),
            Point::new(parent, index + count),
        ))
    }

    /// Detaches the node at `path` and returns it with the point it used to
    /// occupy.
    pub fn remove_node(&mut self, path: &[usize]) -> Result<(Node, Point), MarkerError> {
        let Some((&ix, parent)) = path.split_last() else {
            return Err(MarkerError::invalid_path(path, "cannot remove the document root"));
        };
        let children = self.children_mut(parent)?;
        if ix >= children.len() {
            return Err(MarkerError::OffsetOutOfBounds {
                path: parent.to_vec(),
                offset: ix,
                len: children.len(),
            });
        }
        let node = children.remove(ix);
        Ok((node, Point::new(parent.to_vec(), ix)))
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    /// Text a range covers, computed on a scratch copy of the tree.
    pub fn text_in_range(&self, range: &Range) -> Result<String, MarkerError> {
        let mut scratch = self.clone();
        let (fragment, _) = scratch.extract_contents(range)?;
        Ok(fragment.iter().map(Node::text_content).collect())
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            write_html(&mut out, node);
        }
        out
    }

    /// Copy of the tree with adjacent text merged, empty text dropped and
    /// adjacent identical inline elements merged. Splitting and re-joining a
    /// range leaves fragments behind; this folds them back together.
    pub fn normalized(&self) -> Document {
        Document {
            children: normalize_nodes(&self.children),
        }
    }
}

#[derive(Clone, Copy)]
struct Bound<'a> {
    path: &'a [usize],
    offset: usize,
}

fn split_bound<'a>(bound: Option<Bound<'a>>, default_ix: usize) -> (usize, Option<Bound<'a>>) {
    match bound {
        None => (default_ix, None),
        Some(Bound { path, offset }) => match path.split_first() {
            None => (offset, None),
            Some((&ix, rest)) => (ix, Some(Bound { path: rest, offset })),
        },
    }
}

fn extract_children(
    children: &mut Vec<Node>,
    base: &mut Path,
    start: Option<Bound<'_>>,
    end: Option<Bound<'_>>,
) -> Result<(Vec<Node>, Point), MarkerError> {
    let (start_ix, start_inner) = split_bound(start, 0);
    let (end_ix, end_inner) = split_bound(end, children.len());

    // Both boundaries inside the same child: that child is (or contains) the
    // common ancestor, so nothing at this level is cloned.
    if let (Some(s), Some(e)) = (start_inner, end_inner) {
        if start_ix == end_ix {
            base.push(start_ix);
            let result = match children.get_mut(start_ix) {
                Some(Node::Text(text)) => extract_text(text, base, s, e),
                Some(Node::Element(el)) => {
                    extract_children(&mut el.children, base, Some(s), Some(e))
                }
                None => Err(MarkerError::invalid_path(base, "no node at path")),
            };
            base.pop();
            return result;
        }
    }

    let len = children.len();
    let first_full = if start_inner.is_some() {
        start_ix + 1
    } else {
        start_ix
    };
    if end_ix > len || (end_inner.is_some() && end_ix >= len) {
        return Err(MarkerError::OffsetOutOfBounds {
            path: base.clone(),
            offset: end_ix,
            len,
        });
    }
    if first_full > end_ix {
        return Err(MarkerError::InvalidRange(format!(
            "boundaries cross under {base:?}: {start_ix} > {end_ix}"
        )));
    }

    let mut fragment: Vec<Node> = Vec::new();
    if let Some(s) = start_inner {
        base.push(start_ix);
        let part = extract_tail(&mut children[start_ix], base, s);
        base.pop();
        fragment.push(part?);
    }
    let end_part = match end_inner {
        Some(e) => {
            base.push(end_ix);
            let part = extract_head(&mut children[end_ix], base, e);
            base.pop();
            Some(part?)
        }
        None => None,
    };
    fragment.extend(children.drain(first_full..end_ix));
    fragment.extend(end_part);

    Ok((fragment, Point::new(base.clone(), first_full)))
}

fn extract_text(
    text: &mut TextNode,
    path: &Path,
    start: Bound<'_>,
    end: Bound<'_>,
) -> Result<(Vec<Node>, Point), MarkerError> {
    if !start.path.is_empty() || !end.path.is_empty() {
        return Err(MarkerError::invalid_path(path, "text nodes have no children"));
    }
    let from = clamp_to_char_boundary(&text.text, start.offset);
    let to = clamp_to_char_boundary(&text.text, end.offset).max(from);
    let removed: String = text.text.drain(from..to).collect();
    let fragment = if removed.is_empty() {
        Vec::new()
    } else {
        vec![Node::text(removed)]
    };
    Ok((fragment, Point::new(path.clone(), from)))
}

/// Selected part of a node whose start boundary lies inside it.
fn extract_tail(node: &mut Node, path: &mut Path, bound: Bound<'_>) -> Result<Node, MarkerError> {
    match node {
        Node::Text(text) => {
            if !bound.path.is_empty() {
                return Err(MarkerError::invalid_path(path, "text nodes have no children"));
            }
            let at = clamp_to_char_boundary(&text.text, bound.offset);
            Ok(Node::text(text.text.split_off(at)))
        }
        Node::Element(el) => {
            let (children, _) = extract_children(&mut el.children, path, Some(bound), None)?;
            Ok(Node::Element(el.shallow_clone().with_children(children)))
        }
    }
}

/// Selected part of a node whose end boundary lies inside it.
fn extract_head(node: &mut Node, path: &mut Path, bound: Bound<'_>) -> Result<Node, MarkerError> {
    match node {
        Node::Text(text) => {
            if !bound.path.is_empty() {
                return Err(MarkerError::invalid_path(path, "text nodes have no children"));
            }
            let at = clamp_to_char_boundary(&text.text, bound.offset);
            let tail = text.text.split_off(at);
            let head = std::mem::replace(&mut text.text, tail);
            Ok(Node::text(head))
        }
        Node::Element(el) => {
            let (children, _) = extract_children(&mut el.children, path, None, Some(bound))?;
            Ok(Node::Element(el.shallow_clone().with_children(children)))
        }
    }
}

fn clamp_to_char_boundary(s: &str, mut ix: usize) -> usize {
    ix = ix.min(s.len());
    while ix > 0 && !s.is_char_boundary(ix) {
        ix -= 1;
    }
    ix
}

fn normalize_nodes(nodes: &[Node]) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        let node = match node {
            Node::Text(t) if t.text.is_empty() => continue,
            Node::Text(t) => Node::Text(t.clone()),
            Node::Element(el) => Node::Element(
                el.shallow_clone()
                    .with_children(normalize_nodes(&el.children)),
            ),
        };
        if let Some(last) = out.last_mut() {
            if merge_into(last, &node) {
                continue;
            }
        }
        out.push(node);
    }
    out
}

fn merge_into(prev: &mut Node, next: &Node) -> bool {
    match (prev, next) {
        (Node::Text(prev), Node::Text(next)) => {
            prev.text.push_str(&next.text);
            true
        }
        (Node::Element(prev), Node::Element(next))
            if is_inline_tag(&prev.tag) && prev.same_shape(next) =>
        {
            prev.children.extend(next.children.iter().cloned());
            prev.children = normalize_nodes(&prev.children);
            true
        }
        _ => false,
    }
}

fn is_inline_tag(tag: &str) -> bool {
    INLINE_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

fn write_html(out: &mut String, node: &Node) {
    match node {
        Node::Text(t) => escape_into(out, &t.text, false),
        Node::Element(el) => {
            let tag = el.tag.to_ascii_lowercase();
            out.push('<');
            out.push_str(&tag);
            if !el.classes.is_empty() {
                out.push_str(" class=\"");
                escape_into(out, &el.classes.join(" "), true);
                out.push('"');
            }
            if !el.style.is_empty() {
                out.push_str(" style=\"");
                escape_into(out, &el.style_attr(), true);
                out.push('"');
            }
            out.push('>');
            for child in &el.children {
                write_html(out, child);
            }
            out.push_str("</");
            out.push_str(&tag);
            out.push('>');
        }
    }
}

fn escape_into(out: &mut String, s: &str, attr: bool) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_points_orders_ancestor_offsets_against_descendants() {
        let container = Point::new(vec![0], 1);
        let before = Point::new(vec![0, 0], 3);
        let after = Point::new(vec![0, 1], 0);

        assert_eq!(compare_points(&before, &container), Ordering::Less);
        assert_eq!(compare_points(&container, &after), Ordering::Less);
        assert_eq!(compare_points(&after, &container), Ordering::Greater);
        assert_eq!(compare_points(&container, &container), Ordering::Equal);
    }

    #[test]
    fn range_new_swaps_backwards_points() {
        let range = Range::new(Point::new(vec![0, 0], 4), Point::new(vec![0, 0], 1));
        assert_eq!(range.start.offset, 1);
        assert_eq!(range.end.offset, 4);
        assert!(!range.is_collapsed());
    }

    #[test]
    fn clamp_respects_char_boundaries() {
        assert_eq!(clamp_to_char_boundary("héllo", 2), 1);
        assert_eq!(clamp_to_char_boundary("abc", 10), 3);
    }

    #[test]
    fn extraction_fails_before_mutating_on_bad_offsets() {
        let mut doc = Document::new(vec![Node::paragraph(vec![Node::text("abc")])]);
        let before = doc.clone();
        let range = Range::new(Point::new(vec![0, 0], 1), Point::new(vec![0, 0], 9));
        assert!(doc.extract_contents(&range).is_err());
        assert_eq!(doc, before);
    }

    #[test]
    fn normalized_keeps_adjacent_paragraphs_apart() {
        let doc = Document::new(vec![
            Node::paragraph(vec![Node::text("a"), Node::text(""), Node::text("b")]),
            Node::paragraph(vec![Node::text("c")]),
        ]);
        assert_eq!(doc.normalized().to_html(), "<p>ab</p><p>c</p>");
    }
}
