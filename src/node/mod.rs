//! Document tree types.
//!
//! This module provides `Element`, `Node`, `Text`, and `Document`. A tree is
//! an owned value: every element exclusively owns its children, and the diff
//! engine builds fresh trees instead of mutating its inputs.
//!
//! # Change markers
//!
//! Inserted and deleted content is wrapped in `ins` and `del` elements. The
//! [`Marker`] enum names the two kinds and builds wrappers for them.

mod document;
mod element;
mod text;

pub use document::{Document, ElementIterator, Stats};
pub use element::Element;
pub use text::Text;

use smallvec::SmallVec;

/// Node in a document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Box<Element>),
    Text(Text),
    /// Comment body, without the `<!--`/`-->` delimiters
    Comment(String),
    /// Any other markup (processing instructions), kept verbatim
    Other(String),
}

impl Node {
    crate::impl_enum_accessors!(element, text);

    /// Create an element node
    pub fn elem(element: Element) -> Self {
        Node::Element(Box::new(element))
    }

    /// Create a text node
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(Text::new(content))
    }

    /// Check if this is a comment node.
    #[inline]
    pub fn is_comment(&self) -> bool {
        matches!(self, Node::Comment(_))
    }

    /// Check if this is an element with the given tag.
    #[inline]
    pub fn is_tag(&self, tag: &str) -> bool {
        self.as_element().is_some_and(|e| e.is(tag))
    }

    /// The marker kind, if this node is an `ins` or `del` element.
    #[inline]
    pub fn marker(&self) -> Option<Marker> {
        self.as_element().and_then(Element::marker)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::elem(element)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

/// Type alias for children collection.
pub type Children = SmallVec<[Node; 8]>;

// =============================================================================
// Markers
// =============================================================================

/// Tag name of the insertion marker
pub const INS_TAG: &str = "ins";
/// Tag name of the deletion marker
pub const DEL_TAG: &str = "del";
/// Class given to list items whose whole content was deleted
pub const DEL_LI_CLASS: &str = "del-li";

/// Kind of change marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Insert,
    Delete,
}

impl Marker {
    /// Tag name used for this marker
    #[inline]
    pub const fn tag(self) -> &'static str {
        match self {
            Marker::Insert => INS_TAG,
            Marker::Delete => DEL_TAG,
        }
    }

    /// Recognize a marker tag name
    #[inline]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            INS_TAG => Some(Marker::Insert),
            DEL_TAG => Some(Marker::Delete),
            _ => None,
        }
    }

    /// Wrap `children` in a new marker element
    pub fn wrap(self, children: impl IntoIterator<Item = Node>) -> Element {
        Element::with_children(self.tag(), children)
    }
}

/// Structurally significant tag names
pub mod tags {
    pub const HTML: &str = "html";
    pub const HEAD: &str = "head";
    pub const BODY: &str = "body";
    pub const DIV: &str = "div";
    pub const P: &str = "p";
    pub const LI: &str = "li";
    pub const TABLE: &str = "table";
    pub const THEAD: &str = "thead";
    pub const TBODY: &str = "tbody";
    pub const TFOOT: &str = "tfoot";
    pub const TR: &str = "tr";
    pub const TD: &str = "td";
    pub const TH: &str = "th";

    /// Cell tags
    pub const CELLS: &[&str] = &[TD, TH];
    /// Containers where change markers are not allowed as direct children
    pub const TABLE_CONTAINERS: &[&str] = &[TABLE, THEAD, TBODY, TFOOT, TR];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_accessors() {
        let mut node = Node::elem(Element::new("p").text("hi"));
        assert!(node.is_element());
        assert!(!node.is_text());
        assert!(node.is_tag("p"));
        assert_eq!(node.as_element().map(|e| e.tag.as_str()), Some("p"));

        if let Some(e) = node.as_element_mut() {
            e.set_attr("class", "x");
        }
        assert_eq!(node.as_element().and_then(|e| e.class()), Some("x"));

        let text = Node::text("hello");
        assert!(text.is_text());
        assert_eq!(text.as_text().map(|t| t.content.as_str()), Some("hello"));

        assert!(Node::Comment("c".into()).is_comment());
        assert!(Element::new("br").is_void());
        assert!(!Element::new("li").is_void());
    }

    #[test]
    fn test_marker_tags() {
        assert_eq!(Marker::Insert.tag(), "ins");
        assert_eq!(Marker::Delete.tag(), "del");
        assert_eq!(Marker::from_tag("ins"), Some(Marker::Insert));
        assert_eq!(Marker::from_tag("del"), Some(Marker::Delete));
        assert_eq!(Marker::from_tag("span"), None);
    }

    #[test]
    fn test_marker_wrap() {
        let ins = Marker::Insert.wrap([Node::text("new")]);
        assert!(ins.is_marker());
        assert_eq!(ins.marker(), Some(Marker::Insert));
        assert_eq!(ins.text_content(), "new");
        assert_eq!(Node::from(ins).marker(), Some(Marker::Insert));
    }
}
