//! Similarity gate
//!
//! A coarse check run before the tree diff: when the flattened texts of two
//! documents share too few words, the diff is replaced by a fixed notice.

use rustc_hash::FxHashMap;

use super::lcs::{align, LcsStats};
use super::tokens;
use super::tree::DiffConfig;
use crate::node::{Document, Element, Node};

// =============================================================================
// WordBag
// =============================================================================

/// Multiset of the non-whitespace tokens of a subtree
#[derive(Debug, Clone, Default)]
pub struct WordBag<'a> {
    counts: FxHashMap<&'a str, u32>,
    len: usize,
}

impl<'a> WordBag<'a> {
    /// Words of a single node (text nodes of a subtree, tokenized one by one)
    pub fn of_node(node: &'a Node) -> Self {
        let mut bag = Self::default();
        bag.add_node(node);
        bag
    }

    /// Words of an element subtree
    pub fn of_element(elem: &'a Element) -> Self {
        let mut bag = Self::default();
        bag.add_children(elem);
        bag
    }

    fn add_node(&mut self, node: &'a Node) {
        match node {
            Node::Text(t) => {
                for word in tokens::words(&t.content) {
                    *self.counts.entry(word).or_insert(0) += 1;
                    self.len += 1;
                }
            }
            Node::Element(e) => self.add_children(e),
            Node::Comment(_) | Node::Other(_) => {}
        }
    }

    fn add_children(&mut self, elem: &'a Element) {
        for child in &elem.children {
            self.add_node(child);
        }
    }

    /// Number of words, counting repeats
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Multiset overlap ratio: `2 * |common| / (len_a + len_b)`, `1.0` when
    /// both are empty
    pub fn overlap(&self, other: &Self) -> f64 {
        let total = self.len + other.len;
        if total == 0 {
            return 1.0;
        }
        let (small, large) = if self.counts.len() <= other.counts.len() {
            (self, other)
        } else {
            (other, self)
        };
        let common: u32 = small
            .counts
            .iter()
            .map(|(word, &n)| n.min(large.counts.get(word).copied().unwrap_or(0)))
            .sum();
        2.0 * f64::from(common) / total as f64
    }
}

// =============================================================================
// Ratio and gate
// =============================================================================

/// Similarity of two word sequences: `2 * LCS / (len_a + len_b)`.
///
/// Falls back to the multiset overlap when the alignment table would
/// exceed `config.max_alignment_cells`.
pub fn similarity_ratio(old: &Document, new: &Document, config: &DiffConfig) -> f64 {
    let old_words = document_words(&old.root);
    let new_words = document_words(&new.root);
    let total = old_words.len() + new_words.len();
    if total == 0 {
        return 1.0;
    }
    if old_words.len().saturating_mul(new_words.len()) > config.max_alignment_cells {
        return WordBag::of_element(&old.root).overlap(&WordBag::of_element(&new.root));
    }
    let common = LcsStats::of(&align(&old_words, &new_words, usize::MAX)).kept;
    2.0 * common as f64 / total as f64
}

/// Gate the diff: `true` when the documents are similar enough to diff.
///
/// A cutoff of `0.0` or less disables the gate.
pub fn check_similarity(old: &Document, new: &Document, cutoff: f64) -> bool {
    check_similarity_with(old, new, cutoff, &DiffConfig::default())
}

/// [`check_similarity`] with an explicit alignment budget.
pub fn check_similarity_with(old: &Document, new: &Document, cutoff: f64, config: &DiffConfig) -> bool {
    if cutoff <= 0.0 {
        return true;
    }
    let ratio = similarity_ratio(old, new, config);
    tracing::debug!(ratio, cutoff, "similarity gate");
    ratio >= cutoff
}

/// Non-whitespace tokens of every text node, in document order
fn document_words(root: &Element) -> Vec<&str> {
    fn walk<'a>(elem: &'a Element, out: &mut Vec<&'a str>) {
        for child in &elem.children {
            match child {
                Node::Text(t) => out.extend(tokens::words(&t.content)),
                Node::Element(e) => walk(e, out),
                Node::Comment(_) | Node::Other(_) => {}
            }
        }
    }
    let mut out = Vec::new();
    walk(root, &mut out);
    out
}
