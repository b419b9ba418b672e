//! List fixups
//!
//! `ins` and `del` may not sit between `ol`/`ul` and their items, and a
//! wrapped deleted item would break the numbering. This pass moves markers
//! inside the items:
//!
//! - `<del><li>A</li></del><ins><li>B</li></ins>` becomes one item holding
//!   both changes
//! - `<ins><li>A</li></ins>` becomes `<li><ins>A</ins></li>`
//! - `<del><li>A</li></del>` becomes `<li class="del-li"><del>A</del></li>`

use crate::node::{tags, Children, Document, Element, Marker, Node, DEL_LI_CLASS};

use super::distribute::{distribute, flush_run, wrap_inner};
use super::internalize::internalize;
use super::{rewrite_children, Transform};

/// Fix list markup in place.
pub fn fix_lists(root: &mut Element) {
    rewrite_children(root, &mut |_, children| fix_list_children(children));
}

/// [`fix_lists`] as a pipeline step.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixLists;

impl Transform for FixLists {
    fn transform(self, mut doc: Document) -> Document {
        fix_lists(&mut doc.root);
        doc
    }
}

fn fix_list_children(children: Children) -> Children {
    let mut out = Children::with_capacity(children.len());
    for node in internalize(children, &[tags::LI]) {
        match node {
            Node::Element(marker) if marker.has_child_tag(&[tags::LI]) => match marker.marker() {
                Some(Marker::Insert) => out.extend(distribute(*marker)),
                Some(Marker::Delete) => out.extend(unwrap_deleted_items(*marker)),
                None => out.push(Node::Element(marker)),
            },
            other => out.push(other),
        }
    }
    out
}

/// Free the items of a `del`: each item is classed `del-li` and its content
/// (possibly empty) deleted; runs of other children stay deleted.
fn unwrap_deleted_items(del: Element) -> Children {
    let template = Element {
        tag: del.tag,
        attrs: del.attrs,
        children: Children::new(),
    };
    let mut out = Children::new();
    let mut run = Children::new();
    for child in del.children {
        match child {
            Node::Element(mut item) if item.is(tags::LI) => {
                flush_run(&template, &mut run, &mut out);
                item.set_attr("class", DEL_LI_CLASS);
                wrap_inner(&mut item, &template);
                out.push(Node::Element(item));
            }
            other => run.push(other),
        }
    }
    flush_run(&template, &mut run, &mut out);
    out
}
