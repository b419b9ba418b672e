//! html-tree-diff - Structure-aware diff for HTML/XML documents
//!
//! ## Core Concepts
//!
//! Two documents are aligned as trees, level by level. The result is a new
//! tree in which removed content is wrapped in `<del>` and added content in
//! `<ins>`. Changed text is diffed word by word, and markers are then moved
//! to positions that keep lists and tables valid.
//!
//! ## Modules
//! - `node`: Node/Element/Text/Document types
//! - `algo`: Tokenizer, LCS aligner, text diff, tree diff, similarity gate
//! - `transform`: Marker distribution, list/table fixups, `Pipeline`
//! - `parse` / `render`: Markup reader and writer
//! - `diff`: The `diff` entry point
//!
//! ## Usage
//!
//! ```ignore
//! use html_tree_diff::{diff, DiffOptions};
//!
//! let html = diff("<p>one two</p>", "<p>one three</p>", &DiffOptions::new())?;
//! assert_eq!(html, "<p>one <del>two</del><ins>three</ins></p>");
//! ```

// =============================================================================
// Modules
// =============================================================================

/// Node types: Document, Element, Node, Text
pub mod node;

/// Algorithms: tokenizer, aligners, text and tree diff, similarity
pub mod algo;

/// Document transforms: distribute, list/table fixups, Pipeline
pub mod transform;

/// Attribute types
pub mod attr;

/// Subtree fingerprints
pub mod hash;

/// Accessor macros
pub mod macros;

/// Markup reader
pub mod parse;

/// Markup rendering
pub mod render;

/// Diff entry point
pub mod diff;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Node types
pub use node::{Children, Document, Element, Marker, Node, Text};

// Transform
pub use transform::{distribute, fix_lists, fix_tables, Pipeline, Transform};

// Attribute types
pub use attr::{Attrs, AttrsExt};

// Algorithms
pub use algo::{dom_diff, split_text, DiffConfig, DiffStats, TextChange};
pub use hash::StableHasher;

// Entry points
pub use diff::{diff, html_equal, DiffOptions};
pub use parse::{parse_html, parse_text, ParseConfig};
pub use render::RenderConfig;

// Error types
pub use error::{DiffError, DiffResult};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Document: Send, Sync, Clone);
    assert_impl_all!(Node: Send, Sync);
    assert_impl_all!(DiffError: Send, Sync, std::error::Error);
    assert_impl_all!(DiffOptions: Send, Sync, Copy);

    #[test]
    fn test_crate_level_usage() {
        let html = diff("<p>one two</p>", "<p>one three</p>", &DiffOptions::new()).unwrap();
        assert_eq!(html, "<p>one <del>two</del><ins>three</ins></p>");
    }
}
