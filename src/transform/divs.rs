use crate::node::{tags, Document, Element};

use super::Transform;

/// Rename every `div` in `doc` to `p`.
pub fn divs_to_paragraphs(doc: &mut Document) {
    doc.for_each_element_mut(|elem: &mut Element| {
        if elem.is(tags::DIV) {
            elem.tag = tags::P.into();
        }
    });
}

/// [`divs_to_paragraphs`] as a pipeline step.
#[derive(Debug, Clone, Copy, Default)]
pub struct DivsToParagraphs;

impl Transform for DivsToParagraphs {
    fn transform(self, mut doc: Document) -> Document {
        divs_to_paragraphs(&mut doc);
        doc
    }
}
