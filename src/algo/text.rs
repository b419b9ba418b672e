//! Word-level text diff
//!
//! Aligns two token sequences and cleans the raw LCS script up for display:
//!
//! 1. whitespace-only matches squeezed between two changes are folded into
//!    one change
//! 2. every change region lists its deletions before its insertions
//! 3. tokens common to the start or end of both halves of a region are
//!    matched again
//!
//! The result is grouped into [`TextChange`] spans for the tree engine.

use std::ops::Range;

use rustc_hash::FxHashMap;

use super::lcs::{align, Edit};
use super::tokens::{split_text, Token};
use super::tree::DiffConfig;

// =============================================================================
// Public API
// =============================================================================

/// A span of text in a word-level diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextChange {
    Equal(String),
    Delete(String),
    Insert(String),
}

impl TextChange {
    pub fn text(&self) -> &str {
        match self {
            TextChange::Equal(s) | TextChange::Delete(s) | TextChange::Insert(s) => s,
        }
    }

    pub fn is_equal(&self) -> bool {
        matches!(self, TextChange::Equal(_))
    }

    fn text_mut(&mut self) -> &mut String {
        match self {
            TextChange::Equal(s) | TextChange::Delete(s) | TextChange::Insert(s) => s,
        }
    }

    fn same_kind(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Token-level edit script between two token sequences.
pub fn diff_tokens(old: &[Token<'_>], new: &[Token<'_>]) -> Vec<Edit> {
    diff_tokens_with(old, new, &DiffConfig::default())
}

/// [`diff_tokens`] with an explicit alignment budget.
pub fn diff_tokens_with(old: &[Token<'_>], new: &[Token<'_>], config: &DiffConfig) -> Vec<Edit> {
    let hunks = hunks(old, new, config);
    let mut edits = Vec::with_capacity(old.len().max(new.len()));
    for hunk in hunks {
        match hunk {
            Hunk::Equal { old, new } => {
                edits.extend(old.zip(new).map(|(old_idx, new_idx)| Edit::Keep { old_idx, new_idx }));
            }
            Hunk::Change { old, new } => {
                edits.extend(old.map(|old_idx| Edit::Delete { old_idx }));
                edits.extend(new.map(|new_idx| Edit::Insert { new_idx }));
            }
        }
    }
    edits
}

/// Word-level diff of two strings.
pub fn diff_text(old: &str, new: &str) -> Vec<TextChange> {
    diff_text_with(old, new, &DiffConfig::default())
}

/// [`diff_text`] with an explicit alignment budget.
pub fn diff_text_with(old: &str, new: &str, config: &DiffConfig) -> Vec<TextChange> {
    let old_tokens = split_text(old);
    let new_tokens = split_text(new);

    let mut changes: Vec<TextChange> = Vec::new();
    for hunk in hunks(&old_tokens, &new_tokens, config) {
        match hunk {
            Hunk::Equal { new, .. } => push_change(&mut changes, TextChange::Equal(concat(&new_tokens[new]))),
            Hunk::Change { old, new } => {
                push_change(&mut changes, TextChange::Delete(concat(&old_tokens[old])));
                push_change(&mut changes, TextChange::Insert(concat(&new_tokens[new])));
            }
        }
    }
    changes
}

fn concat(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(|t| t.text).collect()
}

/// Append a span, merging with the previous span of the same kind
fn push_change(changes: &mut Vec<TextChange>, change: TextChange) {
    if change.text().is_empty() {
        return;
    }
    match changes.last_mut() {
        Some(last) if last.same_kind(&change) => last.text_mut().push_str(change.text()),
        _ => changes.push(change),
    }
}

// =============================================================================
// Hunks
// =============================================================================

/// Run of the script: matched tokens, or one change region
#[derive(Debug, Clone, PartialEq, Eq)]
enum Hunk {
    Equal { old: Range<usize>, new: Range<usize> },
    Change { old: Range<usize>, new: Range<usize> },
}

fn hunks(old: &[Token<'_>], new: &[Token<'_>], config: &DiffConfig) -> Vec<Hunk> {
    let (old_ids, new_ids) = intern(old, new);
    let edits = align(&old_ids, &new_ids, config.max_alignment_cells);
    let hunks = group(&edits, old.len(), new.len());
    let hunks = absorb_whitespace(hunks, old);
    let hunks = trim_regions(hunks, old, new);
    slide_regions(hunks, old, new)
}

/// Map tokens to integer ids so the aligner compares integers
fn intern<'a>(old: &[Token<'a>], new: &[Token<'a>]) -> (Vec<u32>, Vec<u32>) {
    let mut ids: FxHashMap<&'a str, u32> = FxHashMap::default();
    let mut id_of = |token: &Token<'a>| {
        let next = ids.len() as u32;
        *ids.entry(token.text).or_insert(next)
    };
    let old_ids = old.iter().map(&mut id_of).collect();
    let new_ids = new.iter().map(&mut id_of).collect();
    (old_ids, new_ids)
}

/// Group a monotone edit script into alternating equal/change hunks.
fn group(edits: &[Edit], old_len: usize, new_len: usize) -> Vec<Hunk> {
    let mut hunks = Vec::new();
    let (mut oi, mut ni) = (0, 0);
    let mut iter = edits.iter().peekable();
    while iter.peek().is_some() {
        let (o0, n0) = (oi, ni);
        if iter.peek().is_some_and(|e| e.is_keep()) {
            while iter.next_if(|e| e.is_keep()).is_some() {
                oi += 1;
                ni += 1;
            }
            hunks.push(Hunk::Equal { old: o0..oi, new: n0..ni });
        } else {
            while let Some(edit) = iter.next_if(|e| e.is_change()) {
                match edit {
                    Edit::Delete { .. } => oi += 1,
                    _ => ni += 1,
                }
            }
            hunks.push(Hunk::Change { old: o0..oi, new: n0..ni });
        }
    }
    debug_assert_eq!((oi, ni), (old_len, new_len));
    hunks
}

/// Fold `change, whitespace-only equal, change` into a single change.
fn absorb_whitespace(hunks: Vec<Hunk>, old: &[Token<'_>]) -> Vec<Hunk> {
    let mut out: Vec<Hunk> = Vec::with_capacity(hunks.len());
    let mut iter = hunks.into_iter().peekable();
    while let Some(hunk) = iter.next() {
        match hunk {
            Hunk::Change { old: o, new: n } => match out.last_mut() {
                Some(Hunk::Change { old: po, new: pn }) => {
                    po.end = o.end;
                    pn.end = n.end;
                }
                _ => out.push(Hunk::Change { old: o, new: n }),
            },
            Hunk::Equal { old: o, new: n } => {
                let between_changes = matches!(out.last(), Some(Hunk::Change { .. }))
                    && matches!(iter.peek(), Some(Hunk::Change { .. }));
                let whitespace = old[o.clone()].iter().all(Token::is_whitespace);
                match out.last_mut() {
                    Some(Hunk::Change { old: po, new: pn }) if between_changes && whitespace => {
                        po.end = o.end;
                        pn.end = n.end;
                    }
                    _ => out.push(Hunk::Equal { old: o, new: n }),
                }
            }
        }
    }
    out
}

/// Move tokens shared by both ends of a change region back into matches.
fn trim_regions(hunks: Vec<Hunk>, old: &[Token<'_>], new: &[Token<'_>]) -> Vec<Hunk> {
    let mut out = Vec::with_capacity(hunks.len());
    for hunk in hunks {
        let (mut o, mut n) = match hunk {
            Hunk::Change { old, new } => (old, new),
            equal => {
                out.push(equal);
                continue;
            }
        };
        let (o_start, n_start) = (o.start, n.start);
        while !o.is_empty() && !n.is_empty() && old[o.start] == new[n.start] {
            o.start += 1;
            n.start += 1;
        }
        let (o_end, n_end) = (o.end, n.end);
        while !o.is_empty() && !n.is_empty() && old[o.end - 1] == new[n.end - 1] {
            o.end -= 1;
            n.end -= 1;
        }
        if o.start > o_start {
            out.push(Hunk::Equal { old: o_start..o.start, new: n_start..n.start });
        }
        if !o.is_empty() || !n.is_empty() {
            out.push(Hunk::Change { old: o.clone(), new: n.clone() });
        }
        if o_end > o.end {
            out.push(Hunk::Equal { old: o.end..o_end, new: n.end..n_end });
        }
    }
    out
}

/// Slide one-sided regions forward past the tokens they repeat, so an
/// insertion reads `five ` rather than ` five`.
fn slide_regions(hunks: Vec<Hunk>, old: &[Token<'_>], new: &[Token<'_>]) -> Vec<Hunk> {
    let mut out: Vec<Hunk> = Vec::with_capacity(hunks.len() + 1);
    let mut iter = hunks.into_iter().peekable();
    while let Some(hunk) = iter.next() {
        let (o, n) = match hunk {
            Hunk::Change { old, new } => (old, new),
            Hunk::Equal { old, new } => {
                push_equal(&mut out, old, new);
                continue;
            }
        };
        let (region, seq) = if o.is_empty() { (&n, new) } else { (&o, old) };
        let shift = match iter.peek_mut() {
            Some(Hunk::Equal { old: eo, new: en }) if o.is_empty() || n.is_empty() => {
                let mut shift = 0;
                // Leave one matched token so the region never touches the next change
                while shift + 1 < eo.len() && seq[region.start + shift] == seq[region.end + shift] {
                    shift += 1;
                }
                eo.start += shift;
                en.start += shift;
                shift
            }
            _ => 0,
        };
        push_equal(&mut out, o.start..o.start + shift, n.start..n.start + shift);
        out.push(Hunk::Change {
            old: o.start + shift..o.end + shift,
            new: n.start + shift..n.end + shift,
        });
    }
    out
}

/// Append an equal run, merging with a preceding one
fn push_equal(out: &mut Vec<Hunk>, old: Range<usize>, new: Range<usize>) {
    if old.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(Hunk::Equal { old: po, new: pn }) => {
            po.end = old.end;
            pn.end = new.end;
        }
        _ => out.push(Hunk::Equal { old, new }),
    }
}
