//! Document transforms applied around the tree diff.
//!
//! # Module Structure
//!
//! - `Transform` - Core trait for document rewrites
//! - `Pipeline` - Synchronous document processing pipeline
//! - `distribute` - Push a marker down over its children
//! - `FixLists` / `FixTables` - Move markers to valid positions in lists and tables
//! - `DivsToParagraphs` - Rename `div` to `p` before diffing
//!
//! # Example
//!
//! ```ignore
//! use html_tree_diff::transform::{FixLists, FixTables, Pipeline};
//!
//! let doc = Pipeline::new(merged)
//!     .pipe_if(!plaintext, FixLists)
//!     .pipe_if(!plaintext, FixTables)
//!     .into_inner();
//! ```

mod core;
mod distribute;
mod divs;
mod internalize;
mod lists;
mod pipeline;
mod tables;

pub use core::{IdentityTransform, Transform};
pub use distribute::{distribute, distribute_at};
pub use divs::{divs_to_paragraphs, DivsToParagraphs};
pub use internalize::internalize;
pub use lists::{fix_lists, FixLists};
pub use pipeline::Pipeline;
pub use tables::{fix_tables, FixTables};

use crate::node::{Children, Element};

/// Rebuild every child list below `elem`, top-down.
///
/// `f` receives the parent's tag and its children, and returns the new
/// children. Recursion then continues into the rebuilt children, so nodes a
/// pass moves further down are visited too.
pub(crate) fn rewrite_children<F>(elem: &mut Element, f: &mut F)
where
    F: FnMut(&str, Children) -> Children,
{
    let children = std::mem::take(&mut elem.children);
    elem.children = f(elem.tag.as_str(), children);
    for child in &mut elem.children {
        if let Some(child) = child.as_element_mut() {
            rewrite_children(child, f);
        }
    }
}
