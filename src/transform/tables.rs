//! Table fixups
//!
//! Markers may only live inside cells. Row and cell changes are pushed down
//! into the cells; whatever is left between table sections is dropped.

use crate::node::{tags, Children, Document, Element, Node};

use super::distribute::distribute;
use super::internalize::internalize;
use super::{rewrite_children, Transform};

/// Fix table markup in place.
pub fn fix_tables(root: &mut Element) {
    rewrite_children(root, &mut |parent, children| {
        let children = internalize(children, tags::CELLS);
        let children = distribute_wrapping(children, &[tags::TR]);
        let children = distribute_wrapping(children, tags::CELLS);
        if tags::TABLE_CONTAINERS.contains(&parent) {
            drop_markers(children)
        } else {
            children
        }
    });
}

/// [`fix_tables`] as a pipeline step.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixTables;

impl Transform for FixTables {
    fn transform(self, mut doc: Document) -> Document {
        fix_tables(&mut doc.root);
        doc
    }
}

/// Distribute every marker that has a direct child tagged with one of `tags`
fn distribute_wrapping(children: Children, tags: &[&str]) -> Children {
    let mut out = Children::with_capacity(children.len());
    for node in children {
        match node {
            Node::Element(marker) if marker.is_marker() && marker.has_child_tag(tags) => {
                out.extend(distribute(*marker));
            }
            other => out.push(other),
        }
    }
    out
}

fn drop_markers(children: Children) -> Children {
    children.into_iter().filter(|node| node.marker().is_none()).collect()
}
