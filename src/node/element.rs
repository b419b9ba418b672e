//! Element type - markup elements with ordered children
//!
//! The core building block of the document tree.

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::attr::{Attrs, AttrsExt};
use crate::error::{DiffError, DiffResult};

use super::{Children, Marker, Node, Text};

// =============================================================================
// Element
// =============================================================================

/// Markup element with attributes and children
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Tag name
    pub tag: CompactString,
    /// Element attributes, in document order
    pub attrs: Attrs,
    /// Child nodes
    pub children: Children,
}

impl Element {
    /// Create an element with no attributes and no children
    pub fn new(tag: impl Into<CompactString>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: SmallVec::new(),
        }
    }

    /// Create an element with the given children
    pub fn with_children(tag: impl Into<CompactString>, children: impl IntoIterator<Item = Node>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: children.into_iter().collect(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder
    // ─────────────────────────────────────────────────────────────────────────

    /// Add an attribute (builder style)
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set the `class` attribute (builder style)
    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Append a child element (builder style)
    pub fn child(mut self, child: Element) -> Self {
        self.push_elem(child);
        self
    }

    /// Append a text child (builder style)
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.push_text(content);
        self
    }

    /// Append a child element
    pub fn push_elem(&mut self, child: Element) {
        self.children.push(Node::Element(Box::new(child)));
    }

    /// Append a text child
    pub fn push_text(&mut self, content: impl Into<String>) {
        self.children.push(Node::Text(Text::new(content)));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attribute access
    // ─────────────────────────────────────────────────────────────────────────

    /// Get attribute value by name
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get_attr(name)
    }

    /// Set attribute value (update if exists, add if not)
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.set_attr(name, value);
    }

    /// Remove attribute by name, returning the old value if it existed
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.remove_attr(name)
    }

    /// Check if attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.has_attr(name)
    }

    /// Get the `class` attribute
    pub fn class(&self) -> Option<&str> {
        self.get_attr("class")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Classification
    // ─────────────────────────────────────────────────────────────────────────

    /// Check the tag name
    #[inline]
    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Check the tag name against a set of names
    #[inline]
    pub fn is_any(&self, tags: &[&str]) -> bool {
        tags.contains(&self.tag.as_str())
    }

    /// The change marker this element represents, if any
    #[inline]
    pub fn marker(&self) -> Option<Marker> {
        Marker::from_tag(&self.tag)
    }

    /// Check if this element is an `ins` or `del` marker
    #[inline]
    pub fn is_marker(&self) -> bool {
        self.marker().is_some()
    }

    /// Check if this is a void element (`br`, `img`, ...), which never has content
    #[inline]
    pub fn is_void(&self) -> bool {
        crate::render::is_void_element(&self.tag)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Children
    // ─────────────────────────────────────────────────────────────────────────

    /// Check if element has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of direct children (all node types)
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Get the first child if it is an element
    pub fn first_child(&self) -> Option<&Element> {
        self.children.first().and_then(Node::as_element)
    }

    /// Iterate over child element references
    pub fn children_elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Check whether any direct child is an element with one of `tags`
    pub fn has_child_tag(&self, tags: &[&str]) -> bool {
        self.children_elements().any(|e| e.is_any(tags))
    }

    /// The single child of this element, if it has exactly one
    pub fn only_child(&self) -> Option<&Node> {
        match self.children.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Get text content of this element (concatenated from all text nodes)
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => buf.push_str(&t.content),
                Node::Element(e) => e.collect_text(buf),
                Node::Comment(_) | Node::Other(_) => {}
            }
        }
    }

    /// Merge adjacent text nodes and drop empty ones, recursively
    pub fn normalize(&mut self) {
        let children = std::mem::take(&mut self.children);
        for child in children {
            match child {
                Node::Text(t) if t.is_empty() => {}
                Node::Text(t) => match self.children.last_mut() {
                    Some(Node::Text(prev)) => prev.content.push_str(&t.content),
                    _ => self.children.push(Node::Text(t)),
                },
                Node::Element(mut e) => {
                    e.normalize();
                    self.children.push(Node::Element(e));
                }
                other => self.children.push(other),
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Location paths
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve a path of child indices, starting below this element
    pub fn locate(&self, path: &[usize]) -> DiffResult<&Node> {
        let (&first, rest) = path.split_first().ok_or(DiffError::EmptyPath)?;
        let mut node = self
            .children
            .get(first)
            .ok_or_else(|| DiffError::not_found(path, 0))?;
        for (depth, &index) in rest.iter().enumerate() {
            node = node
                .as_element()
                .and_then(|e| e.children.get(index))
                .ok_or_else(|| DiffError::not_found(path, depth + 1))?;
        }
        Ok(node)
    }

    /// Resolve a path of child indices (mutable)
    pub fn locate_mut(&mut self, path: &[usize]) -> DiffResult<&mut Node> {
        let (&first, rest) = path.split_first().ok_or(DiffError::EmptyPath)?;
        let mut node = self
            .children
            .get_mut(first)
            .ok_or_else(|| DiffError::not_found(path, 0))?;
        for (depth, &index) in rest.iter().enumerate() {
            node = match node {
                Node::Element(e) => e.children.get_mut(index),
                _ => None,
            }
            .ok_or_else(|| DiffError::not_found(path, depth + 1))?;
        }
        Ok(node)
    }

    /// Resolve the parent element of `path` and the child index within it
    pub fn locate_parent_mut(&mut self, path: &[usize]) -> DiffResult<(&mut Element, usize)> {
        let (&index, parent_path) = path.split_last().ok_or(DiffError::EmptyPath)?;
        let parent = if parent_path.is_empty() {
            self
        } else {
            match self.locate_mut(parent_path)? {
                Node::Element(e) => e.as_mut(),
                _ => return Err(DiffError::not_found(path, parent_path.len())),
            }
        };
        if index >= parent.children.len() {
            return Err(DiffError::not_found(path, parent_path.len()));
        }
        Ok((parent, index))
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.attrs.same_attrs(&other.attrs)
            && self.children == other.children
    }
}

impl Eq for Element {}
