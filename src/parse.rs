//! Permissive markup reader.
//!
//! Builds a [`Document`] from HTML-ish markup using quick-xml's streaming
//! reader. Real-world pages are rarely well-formed XML, so the reader is
//! configured to accept mismatched and unmatched end tags, HTML attribute
//! syntax and void elements written without a closing tag. Input that the
//! reader still cannot make sense of is kept as literal text.
//!
//! After reading, insignificant whitespace is removed (see
//! [`remove_insignificant_text_nodes`]) so that indentation in the source
//! does not show up as changes.

use std::borrow::Cow;

use compact_str::CompactString;
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use tracing::warn;

use crate::algo::tokens::entity_len;
use crate::error::{DiffError, DiffResult};
use crate::node::{tags, Children, Document, Element, Node, Text};
use crate::render::is_void_element;

// =============================================================================
// Configuration
// =============================================================================

/// Containers whose whitespace-only text children carry no meaning
const STRUCTURAL_CONTAINERS: &[&str] = &[
    "html", "head", "table", "thead", "tbody", "tfoot", "tr", "ul", "ol", "dl",
];

/// Reader configuration.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Keep comment nodes in the tree
    pub keep_comments: bool,
    /// Elements removed together with their content
    pub strip_tags: Vec<CompactString>,
    /// Elements replaced by their content
    pub unwrap_tags: Vec<CompactString>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            keep_comments: false,
            strip_tags: vec!["style".into(), "script".into()],
            unwrap_tags: vec!["font".into()],
        }
    }
}

impl ParseConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep comments in the tree.
    pub fn keep_comments(mut self) -> Self {
        self.keep_comments = true;
        self
    }

    fn strips(&self, tag: &str) -> bool {
        self.strip_tags.iter().any(|t| t.as_str() == tag)
    }

    fn unwraps(&self, tag: &str) -> bool {
        self.unwrap_tags.iter().any(|t| t.as_str() == tag)
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Parse markup with the default configuration.
pub fn parse_html(input: &str) -> DiffResult<Document> {
    parse_html_with(input, &ParseConfig::default())
}

/// Parse markup.
///
/// The returned document always has an `html` root with a `body` child, so
/// fragments and full documents line up when diffed.
pub fn parse_html_with(input: &str, config: &ParseConfig) -> DiffResult<Document> {
    let source = sanitize(input);
    let mut builder = TreeBuilder::new(config);

    let mut reader = Reader::from_str(&source);
    let reader_config = reader.config_mut();
    reader_config.trim_text_start = false;
    reader_config.trim_text_end = false;
    reader_config.check_end_names = false;
    reader_config.allow_unmatched_ends = true;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let elem = read_element(&e)?;
                builder.open(elem);
            }
            Ok(Event::Empty(e)) => {
                let elem = read_element(&e)?;
                builder.empty(elem);
            }
            Ok(Event::End(e)) => {
                let name = decode(e.name().as_ref())?.to_ascii_lowercase();
                builder.close(&name);
            }
            Ok(Event::Text(e)) => builder.text(decode(&e)?),
            Ok(Event::CData(e)) => builder.text(&String::from_utf8_lossy(&e)),
            Ok(Event::GeneralRef(e)) => {
                let name = decode(&e)?;
                builder.text(&resolve_entity(name));
            }
            Ok(Event::Comment(e)) => builder.comment(String::from_utf8_lossy(&e).into_owned()),
            Ok(Event::PI(e)) => builder.other(format!("<?{}?>", String::from_utf8_lossy(&e))),
            Ok(Event::Decl(_)) | Ok(Event::DocType(_)) => {}
            Ok(Event::Eof) => break,
            Err(err) => {
                let position = usize::try_from(reader.buffer_position()).unwrap_or(source.len());
                warn!(%err, position, "malformed markup, keeping the rest as text");
                if let Some(rest) = source.get(position..) {
                    builder.text(rest);
                }
                break;
            }
        }
    }

    let mut root = builder.finish();
    remove_insignificant_text_nodes(&mut root);
    Ok(Document::new(root))
}

/// Wrap raw text in a document, without reading any markup.
pub fn parse_text(text: &str) -> Document {
    let mut body = Element::new(tags::BODY);
    if !text.is_empty() {
        body.push_text(text);
    }
    Document::new(Element::new(tags::HTML).child(body))
}

// =============================================================================
// Tree builder
// =============================================================================

/// Stack of open elements; the bottom entry is the synthetic `body` root
struct TreeBuilder<'c> {
    config: &'c ParseConfig,
    stack: Vec<Element>,
    /// Tag and nesting depth of a stripped element being skipped
    skipping: Option<(String, usize)>,
}

impl<'c> TreeBuilder<'c> {
    fn new(config: &'c ParseConfig) -> Self {
        Self {
            config,
            stack: vec![Element::new(tags::BODY)],
            skipping: None,
        }
    }

    fn current(&mut self) -> &mut Element {
        // The root is never popped
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn open(&mut self, elem: Element) {
        if let Some((tag, depth)) = &mut self.skipping {
            if tag.as_str() == elem.tag.as_str() {
                *depth += 1;
            }
            return;
        }
        if self.config.strips(&elem.tag) {
            self.skipping = Some((elem.tag.to_string(), 0));
        } else if is_void_element(&elem.tag) {
            self.current().push_elem(elem);
        } else if !self.config.unwraps(&elem.tag) {
            self.stack.push(elem);
        }
    }

    fn empty(&mut self, elem: Element) {
        if self.skipping.is_some() || self.config.strips(&elem.tag) || self.config.unwraps(&elem.tag) {
            return;
        }
        self.current().push_elem(elem);
    }

    fn close(&mut self, name: &str) {
        if let Some((tag, depth)) = &mut self.skipping {
            if tag.as_str() == name {
                if *depth == 0 {
                    self.skipping = None;
                } else {
                    *depth -= 1;
                }
            }
            return;
        }
        // Unmatched end tags are ignored; a matched one closes everything
        // opened after it.
        let Some(index) = self.stack.iter().rposition(|e| e.is(name)) else {
            return;
        };
        if index == 0 {
            return;
        }
        while self.stack.len() > index {
            self.pop();
        }
    }

    fn pop(&mut self) {
        if self.stack.len() > 1 {
            if let Some(done) = self.stack.pop() {
                self.current().push_elem(done);
            }
        }
    }

    fn text(&mut self, content: &str) {
        if self.skipping.is_some() || content.is_empty() {
            return;
        }
        let parent = self.current();
        match parent.children.last_mut() {
            Some(Node::Text(prev)) => prev.content.push_str(content),
            _ => parent.children.push(Node::Text(Text::new(content))),
        }
    }

    fn comment(&mut self, content: String) {
        if self.skipping.is_none() && self.config.keep_comments {
            self.current().children.push(Node::Comment(content));
        }
    }

    fn other(&mut self, content: String) {
        if self.skipping.is_none() {
            self.current().children.push(Node::Other(content));
        }
    }

    /// Close all open elements and pick the document root
    fn finish(mut self) -> Element {
        while self.stack.len() > 1 {
            self.pop();
        }
        let top = self.stack.pop().unwrap_or_else(|| Element::new(tags::BODY));
        canonical_root(top)
    }
}

/// Shape every parse as `html > body`, keeping a `head` when there is one
fn canonical_root(top: Element) -> Element {
    let mut html = match take_lone(top, tags::HTML) {
        Ok(html) => html,
        Err(top) => {
            let body = take_lone(top, tags::BODY).unwrap_or_else(|top| top);
            return Element::new(tags::HTML).child(body);
        }
    };
    if !html.has_child_tag(&[tags::BODY]) {
        let (head, rest): (Children, Children) = std::mem::take(&mut html.children)
            .into_iter()
            .partition(|node| node.is_tag(tags::HEAD));
        html.children = head;
        html.push_elem(Element::with_children(tags::BODY, rest));
    }
    html
}

/// Take the only significant child of `parent` if it is a `tag` element
fn take_lone(mut parent: Element, tag: &str) -> Result<Element, Element> {
    let mut significant = parent
        .children
        .iter()
        .enumerate()
        .filter(|(_, n)| !n.as_text().is_some_and(is_blank));
    let index = match (significant.next(), significant.next()) {
        (Some((i, node)), None) if node.is_tag(tag) => i,
        _ => return Err(parent),
    };
    match parent.children.remove(index) {
        Node::Element(found) => Ok(*found),
        other => {
            parent.children.insert(index, other);
            Err(parent)
        }
    }
}

fn read_element(start: &BytesStart<'_>) -> DiffResult<Element> {
    let tag = decode(start.name().as_ref())?.to_ascii_lowercase();
    let mut elem = Element::new(tag);
    for attr in start.html_attributes().with_checks(false).flatten() {
        let name = decode(attr.key.as_ref())?.to_ascii_lowercase();
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        elem.set_attr(name, value);
    }
    Ok(elem)
}

fn decode(bytes: &[u8]) -> DiffResult<&str> {
    std::str::from_utf8(bytes).map_err(DiffError::parse)
}

/// Text for the entity reference `&name;`
fn resolve_entity(name: &str) -> Cow<'static, str> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => num.parse().ok(),
        };
        return match code.and_then(char::from_u32) {
            Some(c) => Cow::Owned(c.to_string()),
            None => Cow::Owned(format!("&{name};")),
        };
    }
    let named = resolve_predefined_entity(name).or(match name {
        "nbsp" => Some("\u{a0}"),
        "copy" => Some("\u{a9}"),
        "reg" => Some("\u{ae}"),
        "trade" => Some("\u{2122}"),
        "hellip" => Some("\u{2026}"),
        "mdash" => Some("\u{2014}"),
        "ndash" => Some("\u{2013}"),
        "lsquo" => Some("\u{2018}"),
        "rsquo" => Some("\u{2019}"),
        "ldquo" => Some("\u{201c}"),
        "rdquo" => Some("\u{201d}"),
        "laquo" => Some("\u{ab}"),
        "raquo" => Some("\u{bb}"),
        "middot" => Some("\u{b7}"),
        "bull" => Some("\u{2022}"),
        "deg" => Some("\u{b0}"),
        "times" => Some("\u{d7}"),
        "euro" => Some("\u{20ac}"),
        _ => None,
    });
    match named {
        Some(text) => Cow::Borrowed(text),
        None => Cow::Owned(format!("&{name};")),
    }
}

// =============================================================================
// Input sanitation
// =============================================================================

/// Replace control characters with spaces and escape `&`/`<` that cannot
/// start an entity or a tag.
fn sanitize(input: &str) -> Cow<'_, str> {
    let clean = |(i, c): (usize, char)| match c {
        '&' => entity_len(&input[i..]).is_some(),
        '<' => starts_markup(&input[i + 1..]),
        c => !is_stray_control(c),
    };
    if input.char_indices().all(clean) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for (i, c) in input.char_indices() {
        match c {
            '&' if entity_len(&input[i..]).is_none() => out.push_str("&amp;"),
            '<' if !starts_markup(&input[i + 1..]) => out.push_str("&lt;"),
            c if is_stray_control(c) => out.push(' '),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn starts_markup(rest: &str) -> bool {
    rest.starts_with(|c: char| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

fn is_stray_control(c: char) -> bool {
    c.is_control() && !matches!(c, '\t' | '\n' | '\r')
}

// =============================================================================
// Whitespace
// =============================================================================

/// Collapse whitespace runs and drop whitespace that carries no meaning.
///
/// Every run of whitespace becomes one space (non-breaking spaces are kept).
/// Whitespace-only text is dropped inside structural containers (`html`,
/// `head`, tables, lists) and at the start and end of the root and `body`.
/// Applying this twice gives the same tree.
pub fn remove_insignificant_text_nodes(root: &mut Element) {
    clean_children(root, true);
}

fn clean_children(elem: &mut Element, trim_edges: bool) {
    let structural = elem.is_any(STRUCTURAL_CONTAINERS);
    let trim_edges = trim_edges || elem.is(tags::BODY);

    let children = std::mem::take(&mut elem.children);
    let mut kept = Children::with_capacity(children.len());
    for child in children {
        match child {
            Node::Text(mut text) => {
                collapse_whitespace(&mut text.content);
                if !(structural && is_blank(&text)) && !text.is_empty() {
                    kept.push(Node::Text(text));
                }
            }
            Node::Element(mut child) => {
                clean_children(&mut child, false);
                kept.push(Node::Element(child));
            }
            other => kept.push(other),
        }
    }
    if trim_edges {
        while kept.first().and_then(Node::as_text).is_some_and(is_blank) {
            kept.remove(0);
        }
        while kept.last().and_then(Node::as_text).is_some_and(is_blank) {
            kept.pop();
        }
    }
    elem.children = kept;
}

fn collapse_whitespace(content: &mut String) {
    if !content.chars().any(is_collapsible) {
        return;
    }
    let mut out = String::with_capacity(content.len());
    let mut in_run = false;
    for c in content.chars() {
        if is_collapsible(c) {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    *content = out;
}

/// Only collapsible whitespace (or nothing)
fn is_blank(text: &Text) -> bool {
    text.content.chars().all(is_collapsible)
}

fn is_collapsible(c: char) -> bool {
    c.is_whitespace() && c != '\u{a0}'
}
