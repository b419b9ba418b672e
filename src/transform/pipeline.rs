//! Document processing pipeline.

use crate::node::Document;

use super::{IdentityTransform, Transform};

// =============================================================================
// Pipeline
// =============================================================================

/// Synchronous pipeline for document processing.
///
/// Wraps a `Document` and provides a fluent API for transformations.
///
/// # Example
///
/// ```ignore
/// use html_tree_diff::transform::{FixLists, FixTables, Pipeline};
///
/// let fixed = Pipeline::new(merged)
///     .pipe(FixLists)
///     .pipe(FixTables)
///     .into_inner();
/// ```
pub struct Pipeline {
    doc: Document,
}

impl Pipeline {
    /// Create a new pipeline from a document.
    #[inline]
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    /// Apply a transform to the document.
    #[inline]
    pub fn pipe<T: Transform>(self, transform: T) -> Self {
        Self {
            doc: transform.transform(self.doc),
        }
    }

    /// Conditionally apply a transform.
    ///
    /// Only applies the transform if `condition` is true.
    ///
    /// # Example
    ///
    /// ```ignore
    /// Pipeline::new(doc)
    ///     .pipe_if(!plaintext, FixLists)
    ///     .into_inner()
    /// ```
    #[inline]
    pub fn pipe_if<T: Transform>(self, condition: bool, transform: T) -> Self {
        if condition {
            self.pipe(transform)
        } else {
            self.pipe(IdentityTransform)
        }
    }

    /// Inspect the document without consuming the pipeline.
    ///
    /// Useful for logging or debugging intermediate state.
    #[inline]
    pub fn inspect<F>(self, f: F) -> Self
    where
        F: FnOnce(&Document),
    {
        f(&self.doc);
        self
    }

    /// Get a reference to the underlying document.
    #[inline]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Consume the pipeline and return the document.
    #[inline]
    pub fn into_inner(self) -> Document {
        self.doc
    }
}

impl From<Document> for Pipeline {
    #[inline]
    fn from(doc: Document) -> Self {
        Self::new(doc)
    }
}

impl From<Pipeline> for Document {
    #[inline]
    fn from(pipeline: Pipeline) -> Self {
        pipeline.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Element;

    fn rename(tag: &'static str) -> impl FnOnce(&mut Document) {
        move |doc: &mut Document| doc.root.tag = tag.into()
    }

    #[test]
    fn test_pipe_order() {
        let doc = Pipeline::new(Document::new(Element::new("a")))
            .pipe(rename("b"))
            .pipe(rename("c"))
            .into_inner();
        assert_eq!(doc.root.tag, "c");
    }

    #[test]
    fn test_pipe_if() {
        let doc = Pipeline::new(Document::new(Element::new("a")))
            .pipe_if(false, rename("skipped"))
            .pipe_if(true, rename("then"))
            .into_inner();
        assert_eq!(doc.root.tag, "then");
    }

    #[test]
    fn test_inspect() {
        let mut count = 0;
        let pipeline = Pipeline::from(Document::new(Element::new("body").child(Element::new("p"))))
            .inspect(|doc| count = doc.element_count());
        assert_eq!(count, 2);
        assert_eq!(pipeline.document().root.tag, "body");
        assert_eq!(Document::from(pipeline).root.tag, "body");
    }
}
