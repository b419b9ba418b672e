//! Deterministic hashing utilities for document trees
//!
//! Provides cross-process deterministic hashing using blake3. Subtree
//! fingerprints are the "shape signatures" the tree aligner uses to spot
//! identical siblings without a deep comparison.

use crate::attr;
use crate::node::{Element, Node};

// =============================================================================
// StableHasher - Builder Pattern
// =============================================================================

/// A deterministic hasher using blake3
///
/// Unlike `std::hash::Hasher`, this produces the same output across
/// process restarts for the same input.
pub struct StableHasher {
    inner: blake3::Hasher,
}

impl StableHasher {
    /// Create a new StableHasher
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    /// Update with raw bytes
    #[inline]
    pub fn update(mut self, data: &[u8]) -> Self {
        self.inner.update(data);
        self
    }

    /// Update with a length-prefixed string
    #[inline]
    pub fn update_str(self, s: &str) -> Self {
        self.update_usize(s.len()).update(s.as_bytes())
    }

    /// Update with a u64 value (little-endian)
    #[inline]
    pub fn update_u64(self, v: u64) -> Self {
        self.update(&v.to_le_bytes())
    }

    /// Update with a usize value (little-endian, widened to 64 bits)
    #[inline]
    pub fn update_usize(self, v: usize) -> Self {
        self.update_u64(v as u64)
    }

    /// Finish and return the hash as u64
    ///
    /// Takes the first 8 bytes of blake3 output as little-endian u64.
    #[inline]
    pub fn finish(self) -> u64 {
        let hash = self.inner.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }
}

impl Default for StableHasher {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Subtree fingerprints
// =============================================================================

const KIND_ELEMENT: u8 = 0;
const KIND_TEXT: u8 = 1;
const KIND_COMMENT: u8 = 2;
const KIND_OTHER: u8 = 3;

/// Fingerprint of a whole subtree.
///
/// Equal subtrees (attribute order ignored) have equal fingerprints.
pub fn fingerprint(node: &Node) -> u64 {
    hash_node(StableHasher::new(), node).finish()
}

/// Fingerprint of an element subtree.
pub fn fingerprint_element(elem: &Element) -> u64 {
    hash_element(StableHasher::new(), elem).finish()
}

fn hash_node(hasher: StableHasher, node: &Node) -> StableHasher {
    match node {
        Node::Element(e) => hash_element(hasher, e),
        Node::Text(t) => hasher.update(&[KIND_TEXT]).update_str(&t.content),
        Node::Comment(c) => hasher.update(&[KIND_COMMENT]).update_str(c),
        Node::Other(o) => hasher.update(&[KIND_OTHER]).update_str(o),
    }
}

fn hash_element(hasher: StableHasher, elem: &Element) -> StableHasher {
    let mut hasher = hasher
        .update(&[KIND_ELEMENT])
        .update_str(&elem.tag)
        .update_usize(elem.attrs.len());
    for (name, value) in attr::sorted(&elem.attrs) {
        hasher = hasher.update_str(name).update_str(value);
    }
    hasher = hasher.update_usize(elem.children.len());
    for child in &elem.children {
        hasher = hash_node(hasher, child);
    }
    hasher
}
