//! Change distribution
//!
//! A marker spanning several block children is pushed down so that each
//! child carries its own copy of the marker around its content:
//!
//! ```text
//! <ins><li>A</li><li><em>B</em></li></ins>
//!   => <li><ins>A</ins></li><li><ins><em>B</em></ins></li>
//! ```

use smallvec::smallvec;

use crate::error::DiffResult;
use crate::node::{Children, Element, Node};

/// Distribute `marker` over its children.
///
/// Returns the nodes that replace the marker in its parent. Every child
/// element that can hold content keeps its place and gets its content wrapped
/// in a copy of the marker, even when that content is empty. Each run of
/// other children (text, void elements, nested markers) is wrapped in one
/// copy. A marker without such a child comes back unchanged, so applying
/// this to its own output changes nothing.
pub fn distribute(marker: Element) -> Children {
    if !marker.children.iter().any(takes_marker) {
        return smallvec![Node::elem(marker)];
    }

    let template = Element {
        tag: marker.tag,
        attrs: marker.attrs,
        children: Children::new(),
    };
    let mut out = Children::new();
    let mut run = Children::new();
    for child in marker.children {
        match child {
            Node::Element(mut elem) if !elem.is_void() && !elem.is_marker() => {
                flush_run(&template, &mut run, &mut out);
                wrap_inner(&mut elem, &template);
                out.push(Node::Element(elem));
            }
            other => run.push(other),
        }
    }
    flush_run(&template, &mut run, &mut out);
    out
}

/// Element that gets its own copy of the marker inside it
fn takes_marker(node: &Node) -> bool {
    node.as_element().is_some_and(|e| !e.is_void() && !e.is_marker())
}

/// Distribute the marker found at `path` below `root`, in place.
///
/// Paths that do not name a marker element leave the tree untouched.
pub fn distribute_at(root: &mut Element, path: &[usize]) -> DiffResult<()> {
    let (parent, index) = root.locate_parent_mut(path)?;
    if parent.children[index].marker().is_none() {
        return Ok(());
    }
    match parent.children.remove(index) {
        Node::Element(marker) => parent.children.insert_many(index, distribute(*marker)),
        other => parent.children.insert(index, other),
    }
    Ok(())
}

/// Move the content of `elem` into a copy of `template`.
pub(crate) fn wrap_inner(elem: &mut Element, template: &Element) {
    let inner = std::mem::take(&mut elem.children);
    elem.children.push(Node::elem(copy_of(template, inner)));
}

/// Wrap the pending run in a copy of `template`
pub(crate) fn flush_run(template: &Element, run: &mut Children, out: &mut Children) {
    if !run.is_empty() {
        out.push(Node::elem(copy_of(template, std::mem::take(run))));
    }
}

fn copy_of(template: &Element, children: Children) -> Element {
    Element {
        tag: template.tag.clone(),
        attrs: template.attrs.clone(),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Marker;

    fn li(text: &str) -> Element {
        Element::new("li").text(text)
    }

    #[test]
    fn test_distribute_list_items() {
        let marker = Element::new("ins")
            .child(li("A"))
            .child(Element::new("li").child(Element::new("em").text("B")));

        let out = distribute(marker);
        let expected: Children = smallvec![
            Node::elem(Element::new("li").child(Element::new("ins").text("A"))),
            Node::elem(
                Element::new("li").child(Element::new("ins").child(Element::new("em").text("B")))
            ),
        ];
        assert_eq!(out, expected);
    }

    #[test]
    fn test_distribute_wraps_runs() {
        let marker = Element::new("del")
            .text("lead ")
            .child(Element::new("br"))
            .child(li("A"))
            .text("tail");

        let out = distribute(marker);
        assert_eq!(out.len(), 3);
        assert_eq!(
            out[0],
            Node::elem(Element::new("del").text("lead ").child(Element::new("br")))
        );
        assert_eq!(out[1], Node::elem(Element::new("li").child(Element::new("del").text("A"))));
        assert_eq!(out[2], Node::elem(Element::new("del").text("tail")));
    }

    #[test]
    fn test_distribute_copies_marker_attrs() {
        let marker = Element::new("ins").with_class("x").child(li("A"));
        let out = distribute(marker);
        let inner = out[0].as_element().and_then(Element::first_child).unwrap();
        assert_eq!(inner.class(), Some("x"));
    }

    #[test]
    fn test_distribute_leaves_flat_marker() {
        let marker = Element::new("ins").text("just text").child(Element::new("br"));
        let out = distribute(marker.clone());
        assert_eq!(out.as_slice(), &[Node::elem(marker)]);
    }

    #[test]
    fn test_distribute_empty_elements() {
        let marker = Element::new("ins").child(Element::new("td")).child(Element::new("td").text("c"));
        let out = distribute(marker);
        let expected: Children = smallvec![
            Node::elem(Element::new("td").child(Element::new("ins"))),
            Node::elem(Element::new("td").child(Element::new("ins").text("c"))),
        ];
        assert_eq!(out, expected);

        let out = distribute(Element::new("ins").child(Element::new("li")));
        assert_eq!(out.as_slice(), &[Node::elem(Element::new("li").child(Element::new("ins")))]);
    }

    #[test]
    fn test_distribute_keeps_nested_markers_in_runs() {
        let marker = Element::new("del").child(Element::new("ins").text("x")).child(li("A"));
        let out = distribute(marker);
        assert_eq!(out[0], Node::elem(Element::new("del").child(Element::new("ins").text("x"))));
        assert_eq!(out[1], Node::elem(Element::new("li").child(Element::new("del").text("A"))));

        // A marker holding only another marker is left alone
        let nested = Element::new("del").child(Element::new("ins").child(li("A")));
        assert_eq!(distribute(nested.clone()).as_slice(), &[Node::elem(nested)]);
    }

    #[test]
    fn test_distribute_idempotent() {
        let marker = Element::new("ins").child(li("A")).text("t").child(Element::new("li"));
        let once = distribute(marker);
        let twice: Children = once
            .iter()
            .cloned()
            .flat_map(|node| match node {
                Node::Element(e) if e.is_marker() => distribute(*e),
                other => smallvec![other],
            })
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_distribute_at() {
        let mut root = Element::new("body").child(
            Element::new("ins")
                .child(li("A"))
                .child(Element::new("li").child(Element::new("em").text("B"))),
        );
        distribute_at(&mut root, &[0]).unwrap();

        assert_eq!(root.child_count(), 2);
        assert!(root.children.iter().all(|n| n.is_tag("li")));
        let first = root.first_child().and_then(Element::first_child).unwrap();
        assert_eq!(first.marker(), Some(Marker::Insert));
    }

    #[test]
    fn test_distribute_at_errors() {
        let mut root = Element::new("body").child(Element::new("ins").child(li("A")));
        assert!(distribute_at(&mut root, &[10]).is_err());
        assert!(distribute_at(&mut root, &[]).is_err());

        // Not a marker: untouched
        let mut plain = Element::new("body").child(Element::new("p").child(li("A")));
        let before = plain.clone();
        distribute_at(&mut plain, &[0]).unwrap();
        assert_eq!(plain, before);
    }
}
