//! Document type and related utilities
//!
//! The root container for document trees, with query and traversal APIs.

use crate::error::DiffResult;

use super::{tags, Element, Marker, Node};

// =============================================================================
// Document
// =============================================================================

/// Root document container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Root element (`html > body` for parsed markup)
    pub root: Element,
}

impl Document {
    /// Create a new document with a root element
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// The `body` element: the root itself, or the single `body` below it
    pub fn body(&self) -> Option<&Element> {
        if self.root.is(tags::BODY) {
            return Some(&self.root);
        }
        match self.find_all(|e| e.is(tags::BODY)).as_slice() {
            [body] => Some(body),
            _ => None,
        }
    }

    /// The `body` element if present, otherwise the root
    pub fn content_root(&self) -> &Element {
        self.body().unwrap_or(&self.root)
    }

    /// Resolve a path of child indices below the root element
    pub fn locate(&self, path: &[usize]) -> DiffResult<&Node> {
        self.root.locate(path)
    }

    /// Resolve a path of child indices below the root element (mutable)
    pub fn locate_mut(&mut self, path: &[usize]) -> DiffResult<&mut Node> {
        self.root.locate_mut(path)
    }

    /// Get text content of the whole document
    pub fn text_content(&self) -> String {
        self.root.text_content()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query API
    // ─────────────────────────────────────────────────────────────────────────

    /// Find first element matching predicate (depth-first search)
    pub fn find_element<F>(&self, predicate: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.iter_elements().find(|e| predicate(e))
    }

    /// Find all elements matching predicate
    pub fn find_all<F>(&self, predicate: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        let mut results = Vec::new();
        Self::collect_elements(&self.root, &predicate, &mut results);
        results
    }

    fn collect_elements<'a, F>(elem: &'a Element, predicate: &F, results: &mut Vec<&'a Element>)
    where
        F: Fn(&Element) -> bool,
    {
        if predicate(elem) {
            results.push(elem);
        }
        for child in elem.children_elements() {
            Self::collect_elements(child, predicate, results);
        }
    }

    /// Check if any element matches predicate
    pub fn has_element<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Element) -> bool,
    {
        self.find_element(predicate).is_some()
    }

    /// Count total elements in document
    pub fn element_count(&self) -> usize {
        self.iter_elements().count()
    }

    /// Iterate over all elements (depth-first)
    pub fn iter_elements(&self) -> ElementIterator<'_> {
        ElementIterator::new(&self.root)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Closure-based traversal API
    // ─────────────────────────────────────────────────────────────────────────

    /// Visit all elements with a closure (mutable, pre-order)
    pub fn for_each_element_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Element),
    {
        Self::visit_elements_mut_recursive(&mut self.root, &mut f);
    }

    fn visit_elements_mut_recursive<F>(elem: &mut Element, f: &mut F)
    where
        F: FnMut(&mut Element),
    {
        f(elem);
        for child in &mut elem.children {
            if let Some(child_elem) = child.as_element_mut() {
                Self::visit_elements_mut_recursive(child_elem, f);
            }
        }
    }

    /// Collect statistics about the document
    pub fn collect_stats(&self) -> Stats {
        let mut stats = Stats::default();
        Self::collect_stats_recursive(&self.root, &mut stats);
        stats
    }

    fn collect_stats_recursive(elem: &Element, stats: &mut Stats) {
        stats.element_count += 1;

        match elem.marker() {
            Some(Marker::Insert) => stats.insert_count += 1,
            Some(Marker::Delete) => stats.delete_count += 1,
            None => {}
        }

        for child in &elem.children {
            match child {
                Node::Element(e) => Self::collect_stats_recursive(e, stats),
                Node::Text(_) => stats.text_count += 1,
                Node::Comment(_) => stats.comment_count += 1,
                Node::Other(_) => {}
            }
        }
    }
}

impl From<Element> for Document {
    fn from(root: Element) -> Self {
        Self::new(root)
    }
}

// =============================================================================
// ElementIterator - depth-first element traversal
// =============================================================================

/// Depth-first iterator over elements
pub struct ElementIterator<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> ElementIterator<'a> {
    fn new(root: &'a Element) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for ElementIterator<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let elem = self.stack.pop()?;
        // Push children in reverse order so they're visited left-to-right
        self.stack.extend(elem.children_elements().rev());
        Some(elem)
    }
}

// =============================================================================
// Stats - document statistics
// =============================================================================

/// Document statistics collected from traversal
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    pub element_count: usize,
    pub text_count: usize,
    pub comment_count: usize,
    pub insert_count: usize,
    pub delete_count: usize,
}

impl Stats {
    /// Check if the document carries any change markers
    pub fn has_changes(&self) -> bool {
        self.marker_count() > 0
    }

    /// Total `ins` + `del` elements
    pub fn marker_count(&self) -> usize {
        self.insert_count + self.delete_count
    }
}
