//! Tree diff engine
//!
//! Aligns two document trees level by level and builds a new merged tree in
//! which removed content sits inside `del` markers and added content inside
//! `ins` markers. The inputs are never modified.
//!
//! # Algorithm
//!
//! For each pair of matched parents:
//!
//! 1. Profile every child: a blake3 fingerprint of its subtree and, on
//!    demand, the multiset of its words.
//! 2. Align the two child lists with a weighted LCS. Elements with the same
//!    tag and any two text nodes are candidates; comments and other nodes
//!    only pair with an identical twin. The alignment keeps as many pairs as
//!    possible and then prefers the most similar ones.
//! 3. Identical pairs are copied from the new tree. Other element pairs take
//!    the new tag and attributes and recurse. Text pairs go through the
//!    word-level diff.
//! 4. Each run of unpaired siblings becomes one `del` marker holding the old
//!    nodes followed by one `ins` marker holding the new ones.
//!
//! With the `parallel` feature, step 3 runs on rayon for the pairs of one
//! level.

use std::cell::OnceCell;

use tracing::trace;

use super::lcs::{align_weighted, Edit};
use super::similarity::WordBag;
use super::text::{diff_text_with, TextChange};
use crate::hash::fingerprint;
use crate::node::{Children, Document, Element, Marker, Node};

/// Default upper bound on alignment table cells.
pub const DEFAULT_MAX_ALIGNMENT_CELLS: usize = 4_000_000;

// =============================================================================
// Public Types
// =============================================================================

/// Configuration for diff algorithm limits.
///
/// Use this to tune diff behavior for specific document types:
/// - Increase the budget for long flat documents (big tables, long lists)
/// - Decrease it to bound memory on untrusted input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffConfig {
    /// Largest LCS table (`old_len * new_len`) the aligners will allocate.
    /// Beyond it the middle of the sequences is replaced wholesale.
    /// Default: 4 000 000
    pub max_alignment_cells: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_alignment_cells: DEFAULT_MAX_ALIGNMENT_CELLS,
        }
    }
}

impl DiffConfig {
    /// Create config with a custom alignment budget.
    pub fn new(max_alignment_cells: usize) -> Self {
        Self { max_alignment_cells }
    }

    /// Create config for large documents (higher limits).
    pub fn large() -> Self {
        Self::new(64_000_000)
    }

    /// Create config for small documents (lower limits, earlier fallback).
    pub fn small() -> Self {
        Self::new(250_000)
    }
}

/// Statistics from diff operation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct DiffStats {
    /// Number of element pairs compared
    pub elements_compared: usize,
    /// Number of text node pairs compared
    pub text_nodes_compared: usize,
    /// Number of paired nodes copied unchanged
    pub nodes_kept: usize,
    /// Number of nodes wrapped in `ins`
    pub nodes_inserted: usize,
    /// Number of nodes wrapped in `del`
    pub nodes_deleted: usize,
    /// Number of text pairs diffed word by word
    pub text_diffs: usize,
}

impl DiffStats {
    /// Check whether the diff found any change
    pub fn has_changes(&self) -> bool {
        self.nodes_inserted + self.nodes_deleted + self.text_diffs > 0
    }
}

impl std::ops::AddAssign for DiffStats {
    fn add_assign(&mut self, other: Self) {
        self.elements_compared += other.elements_compared;
        self.text_nodes_compared += other.text_nodes_compared;
        self.nodes_kept += other.nodes_kept;
        self.nodes_inserted += other.nodes_inserted;
        self.nodes_deleted += other.nodes_deleted;
        self.text_diffs += other.text_diffs;
    }
}

/// Merged document plus statistics
#[derive(Debug, Clone)]
pub struct DiffOutput {
    pub document: Document,
    pub stats: DiffStats,
}

// =============================================================================
// Main API
// =============================================================================

/// Diff two documents into a merged, marker-annotated document.
pub fn dom_diff(old: &Document, new: &Document) -> Document {
    dom_diff_with_config(old, new, &DiffConfig::default()).document
}

/// Diff two documents with custom configuration.
///
/// The two roots are always paired, whatever their tags.
pub fn dom_diff_with_config(old: &Document, new: &Document, config: &DiffConfig) -> DiffOutput {
    let differ = TreeDiffer { config };
    let mut stats = DiffStats::default();
    let root = differ.merge_elements(&old.root, &new.root, &mut stats);
    trace!(?stats, "tree diff finished");
    DiffOutput {
        document: Document::new(root),
        stats,
    }
}

// =============================================================================
// Internal Context
// =============================================================================

struct TreeDiffer<'c> {
    config: &'c DiffConfig,
}

/// Alignment data for one child
struct Profile<'a> {
    node: &'a Node,
    fingerprint: u64,
    words: OnceCell<WordBag<'a>>,
}

impl<'a> Profile<'a> {
    fn new(node: &'a Node) -> Self {
        Self {
            node,
            fingerprint: fingerprint(node),
            words: OnceCell::new(),
        }
    }

    fn words(&self) -> &WordBag<'a> {
        self.words.get_or_init(|| WordBag::of_node(self.node))
    }
}

/// One piece of the merged child list
enum Segment<'a> {
    Deleted(Vec<&'a Node>),
    Inserted(Vec<&'a Node>),
    Paired { old: &'a Node, new: &'a Node, identical: bool },
}

/// Match candidacy
fn is_candidate(old: &Node, new: &Node) -> bool {
    match (old, new) {
        (Node::Element(a), Node::Element(b)) => a.tag == b.tag,
        (Node::Text(_), Node::Text(_)) => true,
        (Node::Comment(a), Node::Comment(b)) | (Node::Other(a), Node::Other(b)) => a == b,
        _ => false,
    }
}

impl TreeDiffer<'_> {
    fn merge_elements(&self, old: &Element, new: &Element, stats: &mut DiffStats) -> Element {
        stats.elements_compared += 1;
        Element {
            tag: new.tag.clone(),
            attrs: new.attrs.clone(),
            children: self.merge_children(&old.children, &new.children, stats),
        }
    }

    fn merge_children(&self, old: &[Node], new: &[Node], stats: &mut DiffStats) -> Children {
        trace!(old = old.len(), new = new.len(), "aligning children");
        let segments = self.segments(old, new);
        self.emit_all(&segments, stats)
    }

    /// Align two child lists into segments
    fn segments<'a>(&self, old: &'a [Node], new: &'a [Node]) -> Vec<Segment<'a>> {
        let old_profiles: Vec<Profile<'a>> = old.iter().map(Profile::new).collect();
        let new_profiles: Vec<Profile<'a>> = new.iter().map(Profile::new).collect();

        let score = |i: usize, j: usize| {
            let (a, b) = (&old_profiles[i], &new_profiles[j]);
            if !is_candidate(a.node, b.node) {
                return None;
            }
            if a.fingerprint == b.fingerprint {
                return Some(1.0);
            }
            Some(a.words().overlap(b.words()))
        };
        let edits = align_weighted(old.len(), new.len(), score, self.config.max_alignment_cells);

        let mut segments = Vec::new();
        let mut deleted = Vec::new();
        let mut inserted = Vec::new();
        for edit in edits {
            match edit {
                Edit::Delete { old_idx } => deleted.push(&old[old_idx]),
                Edit::Insert { new_idx } => inserted.push(&new[new_idx]),
                Edit::Keep { old_idx, new_idx } => {
                    flush(&mut segments, &mut deleted, &mut inserted);
                    segments.push(Segment::Paired {
                        old: &old[old_idx],
                        new: &new[new_idx],
                        identical: old_profiles[old_idx].fingerprint == new_profiles[new_idx].fingerprint,
                    });
                }
            }
        }
        flush(&mut segments, &mut deleted, &mut inserted);
        segments
    }

    #[cfg(not(feature = "parallel"))]
    fn emit_all(&self, segments: &[Segment<'_>], stats: &mut DiffStats) -> Children {
        let mut children = Children::new();
        for segment in segments {
            self.emit(segment, &mut children, stats);
        }
        children
    }

    #[cfg(feature = "parallel")]
    fn emit_all(&self, segments: &[Segment<'_>], stats: &mut DiffStats) -> Children {
        use rayon::prelude::*;

        let parts: Vec<(Children, DiffStats)> = segments
            .par_iter()
            .map(|segment| {
                let mut local = DiffStats::default();
                let mut nodes = Children::new();
                self.emit(segment, &mut nodes, &mut local);
                (nodes, local)
            })
            .collect();

        let mut children = Children::new();
        for (nodes, local) in parts {
            *stats += local;
            children.extend(nodes);
        }
        children
    }

    fn emit(&self, segment: &Segment<'_>, out: &mut Children, stats: &mut DiffStats) {
        match segment {
            Segment::Deleted(nodes) => {
                stats.nodes_deleted += nodes.len();
                out.push(Node::elem(Marker::Delete.wrap(nodes.iter().map(|&n| n.clone()))));
            }
            Segment::Inserted(nodes) => {
                stats.nodes_inserted += nodes.len();
                out.push(Node::elem(Marker::Insert.wrap(nodes.iter().map(|&n| n.clone()))));
            }
            Segment::Paired { new, identical: true, .. } => {
                if new.is_text() {
                    stats.text_nodes_compared += 1;
                }
                stats.nodes_kept += 1;
                out.push((*new).clone());
            }
            Segment::Paired { old, new, identical: false } => match (old, new) {
                (Node::Element(a), Node::Element(b)) => {
                    out.push(Node::elem(self.merge_elements(a, b, stats)));
                }
                (Node::Text(a), Node::Text(b)) => {
                    stats.text_nodes_compared += 1;
                    stats.text_diffs += 1;
                    self.merge_text(&a.content, &b.content, out);
                }
                // Candidacy only pairs non-identical elements and texts
                _ => out.push((*new).clone()),
            },
        }
    }

    fn merge_text(&self, old: &str, new: &str, out: &mut Children) {
        for change in diff_text_with(old, new, self.config) {
            out.push(match change {
                TextChange::Equal(s) => Node::text(s),
                TextChange::Delete(s) => Node::elem(Marker::Delete.wrap([Node::text(s)])),
                TextChange::Insert(s) => Node::elem(Marker::Insert.wrap([Node::text(s)])),
            });
        }
    }
}

/// Close a change region: deletions first, then insertions
fn flush<'a>(segments: &mut Vec<Segment<'a>>, deleted: &mut Vec<&'a Node>, inserted: &mut Vec<&'a Node>) {
    if !deleted.is_empty() {
        segments.push(Segment::Deleted(std::mem::take(deleted)));
    }
    if !inserted.is_empty() {
        segments.push(Segment::Inserted(std::mem::take(inserted)));
    }
}
