//! Markup internalization
//!
//! A `del` holding one structural element, directly followed by an `ins`
//! holding one element of the same kind, is read as "this item changed":
//!
//! ```text
//! <del><li>AAA</li></del><ins><li class="new">BBB</li></ins>
//!   => <li class="new"><del>AAA</del><ins>BBB</ins></li>
//! ```
//!
//! Anything else (more children, text, a different tag, another node in
//! between) leaves both markers as they are.

use crate::node::{Children, Element, Marker, Node};

/// Merge adjacent `del`/`ins` pairs around a single element tagged with one
/// of `tags`.
pub fn internalize(children: Children, tags: &[&str]) -> Children {
    let mut out = Children::with_capacity(children.len());
    let mut iter = children.into_iter().peekable();
    while let Some(node) = iter.next() {
        let Node::Element(mut del) = node else {
            out.push(node);
            continue;
        };
        let Some(old) = take_single(&mut del, Marker::Delete, tags) else {
            out.push(Node::Element(del));
            continue;
        };
        let new = iter
            .peek_mut()
            .and_then(Node::as_element_mut)
            .and_then(|ins| take_single(ins, Marker::Insert, tags));
        match new {
            Some(new) => {
                // Drop the emptied `ins`
                iter.next();
                out.push(Node::elem(merge(old, new)));
            }
            None => {
                del.push_elem(old);
                out.push(Node::Element(del));
            }
        }
    }
    out
}

/// Pop the only child of a `kind` marker, if it is an element in `tags`
fn take_single(marker: &mut Element, kind: Marker, tags: &[&str]) -> Option<Element> {
    let single = marker.marker() == Some(kind)
        && marker.only_child().and_then(Node::as_element).is_some_and(|e| e.is_any(tags));
    if !single {
        return None;
    }
    match marker.children.pop() {
        Some(Node::Element(elem)) => Some(*elem),
        other => {
            marker.children.extend(other);
            None
        }
    }
}

/// New element's tag and attributes, old and new content as markers
fn merge(old: Element, new: Element) -> Element {
    let Element { tag, attrs, children } = new;
    let mut merged = Element {
        tag,
        attrs,
        children: Children::new(),
    };
    merged.push_elem(Marker::Delete.wrap(old.children));
    merged.push_elem(Marker::Insert.wrap(children));
    merged
}
