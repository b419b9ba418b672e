//! Prelude module for common imports.
//!
//! ```ignore
//! use html_tree_diff::prelude::*;
//! ```

// Node types
pub use crate::node::{tags, Children, Document, Element, Marker, Node, Stats, Text};

// Transform
pub use crate::transform::{
    distribute, distribute_at, fix_lists, fix_tables, DivsToParagraphs, FixLists, FixTables,
    IdentityTransform, Pipeline, Transform,
};

// Attributes
pub use crate::attr::{Attrs, AttrsExt};

// Algorithms
pub use crate::algo::{
    check_similarity, diff_text, diff_tokens, dom_diff, dom_diff_with_config, similarity_ratio,
    split_text, DiffConfig, DiffOutput, DiffStats, Edit, TextChange, Token, TokenKind,
};
pub use crate::hash::StableHasher;

// Entry points
pub use crate::diff::{diff, html_equal, DiffOptions, TOO_LARGE};
pub use crate::parse::{parse_html, parse_html_with, parse_text, ParseConfig};
pub use crate::render::{render_children, render_document, RenderConfig};

// Error
pub use crate::error::{DiffError, DiffResult};
