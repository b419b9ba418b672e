//! Markup rendering
//!
//! Renders documents and node lists to strings, either compact (exactly the
//! tree's text) or indented one node per line.

use crate::attr::Attrs;
use crate::node::{Document, Element, Node};

// =============================================================================
// RenderConfig
// =============================================================================

/// Configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Put every tag and text node on its own indented line.
    pub pretty: bool,
    /// Spaces per nesting level when `pretty` is set.
    pub indent: usize,
}

impl RenderConfig {
    /// Compact output, text kept exactly.
    pub const COMPACT: Self = Self {
        pretty: false,
        indent: 0,
    };

    /// Indented output, two spaces per level.
    pub const PRETTY: Self = Self {
        pretty: true,
        indent: 2,
    };

    /// Pick a preset.
    pub fn new(pretty: bool) -> Self {
        if pretty { Self::PRETTY } else { Self::COMPACT }
    }

    /// Set the indentation width.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::COMPACT
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Render a whole document, root element included.
pub fn render_document(doc: &Document, config: &RenderConfig) -> String {
    let mut out = Output::new(config);
    out.element(&doc.root, 0);
    out.finish()
}

/// Render the children of `elem`, without the element itself.
pub fn render_children(elem: &Element, config: &RenderConfig) -> String {
    render_nodes(&elem.children, config)
}

/// Render a list of sibling nodes.
pub fn render_nodes(nodes: &[Node], config: &RenderConfig) -> String {
    let mut out = Output::new(config);
    for node in nodes {
        out.node(node, 0);
    }
    out.finish()
}

/// Render a single node.
pub fn render_node(node: &Node, config: &RenderConfig) -> String {
    render_nodes(std::slice::from_ref(node), config)
}

// =============================================================================
// Writer
// =============================================================================

struct Output<'c> {
    config: &'c RenderConfig,
    buf: String,
}

impl<'c> Output<'c> {
    fn new(config: &'c RenderConfig) -> Self {
        Self {
            config,
            buf: String::new(),
        }
    }

    fn finish(self) -> String {
        self.buf
    }

    /// Start a new line at `depth` (pretty mode only)
    fn line(&mut self, depth: usize) {
        if !self.config.pretty {
            return;
        }
        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
        self.buf.extend(std::iter::repeat_n(' ', depth * self.config.indent));
    }

    fn node(&mut self, node: &Node, depth: usize) {
        match node {
            Node::Element(elem) => self.element(elem, depth),
            Node::Text(text) => {
                if self.config.pretty {
                    let trimmed = text.trimmed();
                    if !trimmed.is_empty() {
                        self.line(depth);
                        escape_html(trimmed, &mut self.buf);
                    }
                } else {
                    escape_html(&text.content, &mut self.buf);
                }
            }
            Node::Comment(body) => {
                self.line(depth);
                self.buf.push_str("<!--");
                self.buf.push_str(body);
                self.buf.push_str("-->");
            }
            Node::Other(raw) => {
                self.line(depth);
                self.buf.push_str(raw);
            }
        }
    }

    fn element(&mut self, elem: &Element, depth: usize) {
        self.line(depth);
        self.buf.push('<');
        self.buf.push_str(&elem.tag);
        render_attrs(&elem.attrs, &mut self.buf);

        if elem.is_empty() {
            if is_void_element(&elem.tag) {
                self.buf.push_str(" />");
            } else {
                self.buf.push_str("></");
                self.buf.push_str(&elem.tag);
                self.buf.push('>');
            }
            return;
        }

        self.buf.push('>');
        for child in &elem.children {
            self.node(child, depth + 1);
        }
        self.line(depth);
        self.buf.push_str("</");
        self.buf.push_str(&elem.tag);
        self.buf.push('>');
    }
}

/// Render attributes in stored order
fn render_attrs(attrs: &Attrs, output: &mut String) {
    for (name, value) in attrs.iter() {
        output.push(' ');
        output.push_str(name);
        output.push_str("=\"");
        escape_attr(value, output);
        output.push('"');
    }
}

/// Escape text content.
pub fn escape_html(s: &str, output: &mut String) {
    for c in s.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Escape an attribute value.
pub fn escape_attr(s: &str, output: &mut String) {
    for c in s.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Check if element is a void element (no content, no end tag).
pub(crate) fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
