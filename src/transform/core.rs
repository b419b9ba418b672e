//! Core transform trait.

use crate::node::Document;

/// Rewrite a document into another document.
pub trait Transform: Sized {
    /// Transform the document.
    fn transform(self, doc: Document) -> Document;
}

// =============================================================================
// IdentityTransform
// =============================================================================

/// Identity transform that returns the document unchanged.
///
/// Stands in for a skipped step in [`Pipeline::pipe_if`](super::Pipeline::pipe_if).
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl Transform for IdentityTransform {
    #[inline]
    fn transform(self, doc: Document) -> Document {
        doc
    }
}

/// Any `FnOnce(&mut Document)` is an in-place transform.
impl<F> Transform for F
where
    F: FnOnce(&mut Document),
{
    #[inline]
    fn transform(self, mut doc: Document) -> Document {
        self(&mut doc);
        doc
    }
}
