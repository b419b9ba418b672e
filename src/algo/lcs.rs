//! Longest-common-subsequence aligners
//!
//! Two flavours share one edit script type:
//!
//! - [`align`]: plain LCS over `Eq` items (text tokens)
//! - [`align_weighted`]: LCS over a match-candidacy predicate that also
//!   carries a similarity weight (sibling nodes)
//!
//! Both build a suffix table and walk it forward, so on ties the earliest
//! pairs win and deletions are emitted before insertions.
//!
//! # Complexity
//!
//! - Time: O(n * m) after stripping the common prefix and suffix
//! - Space: O(n * m) table, bounded by `max_cells`
//!
//! When the table would exceed `max_cells`, the middle is reported as a
//! single delete-everything, insert-everything region.

// =============================================================================
// Public Types
// =============================================================================

/// Edit operation in an alignment script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Item at old_idx corresponds to item at new_idx
    Keep { old_idx: usize, new_idx: usize },
    /// Insert new item at new_idx
    Insert { new_idx: usize },
    /// Delete old item at old_idx
    Delete { old_idx: usize },
}

impl Edit {
    pub fn is_keep(&self) -> bool {
        matches!(self, Edit::Keep { .. })
    }

    pub fn is_change(&self) -> bool {
        !self.is_keep()
    }
}

/// Statistics of an edit script
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LcsStats {
    pub kept: usize,
    pub inserted: usize,
    pub deleted: usize,
}

impl LcsStats {
    /// Count the operations of `edits`
    pub fn of(edits: &[Edit]) -> Self {
        let mut stats = Self::default();
        for edit in edits {
            match edit {
                Edit::Keep { .. } => stats.kept += 1,
                Edit::Insert { .. } => stats.inserted += 1,
                Edit::Delete { .. } => stats.deleted += 1,
            }
        }
        stats
    }

    pub fn edit_count(&self) -> usize {
        self.inserted + self.deleted
    }

    pub fn is_empty(&self) -> bool {
        self.edit_count() == 0
    }
}

// =============================================================================
// Unweighted LCS
// =============================================================================

/// Align two sequences, keeping a longest common subsequence.
pub fn align<T: Eq>(old: &[T], new: &[T], max_cells: usize) -> Vec<Edit> {
    let n = old.len();
    let m = new.len();

    let mut prefix = 0;
    while prefix < n && prefix < m && old[prefix] == new[prefix] {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < n - prefix && suffix < m - prefix && old[n - 1 - suffix] == new[m - 1 - suffix] {
        suffix += 1;
    }

    let mut edits = Vec::with_capacity(n.max(m));
    edits.extend((0..prefix).map(|i| Edit::Keep { old_idx: i, new_idx: i }));

    let old_mid = &old[prefix..n - suffix];
    let new_mid = &new[prefix..m - suffix];
    let cells = old_mid.len().saturating_mul(new_mid.len());
    if cells > max_cells {
        tracing::debug!(cells, max_cells, "alignment table too large, replacing middle");
        push_replacement(&mut edits, prefix..n - suffix, prefix..m - suffix);
    } else {
        for edit in lcs_middle(old_mid, new_mid) {
            edits.push(shift(edit, prefix, prefix));
        }
    }

    edits.extend((0..suffix).map(|i| Edit::Keep {
        old_idx: n - suffix + i,
        new_idx: m - suffix + i,
    }));
    edits
}

fn lcs_middle<T: Eq>(old: &[T], new: &[T]) -> Vec<Edit> {
    let n = old.len();
    let m = new.len();
    let width = m + 1;

    // table[i * width + j] = LCS length of old[i..] and new[j..]
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if old[i] == new[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut edits = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            edits.push(Edit::Keep { old_idx: i, new_idx: j });
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            edits.push(Edit::Delete { old_idx: i });
            i += 1;
        } else {
            edits.push(Edit::Insert { new_idx: j });
            j += 1;
        }
    }
    edits.extend((i..n).map(|old_idx| Edit::Delete { old_idx }));
    edits.extend((j..m).map(|new_idx| Edit::Insert { new_idx }));
    edits
}

// =============================================================================
// Weighted LCS
// =============================================================================

/// Alignment score: matched pairs first, then summed similarity.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
struct Score {
    matches: u32,
    similarity: f64,
}

impl Score {
    fn with_pair(self, similarity: f64) -> Self {
        Self {
            matches: self.matches + 1,
            similarity: self.similarity + similarity,
        }
    }

    fn max(self, other: Self) -> Self {
        if other > self { other } else { self }
    }
}

/// Align two sequences of length `n` and `m` under a candidacy predicate.
///
/// `score(i, j)` returns `None` when old item `i` may not pair with new item
/// `j`, or `Some(similarity)` in `[0, 1]` when it may. The alignment
/// maximizes the number of pairs, then the summed similarity.
///
/// Over `max_cells`, only leading and trailing pairs of similarity `1.0` are
/// kept and the middle is replaced.
pub fn align_weighted<F>(n: usize, m: usize, score: F, max_cells: usize) -> Vec<Edit>
where
    F: Fn(usize, usize) -> Option<f64>,
{
    if n.saturating_mul(m) > max_cells {
        tracing::debug!(n, m, max_cells, "weighted alignment too large, matching ends only");
        let identical = |i, j| score(i, j).is_some_and(|s| s >= 1.0);
        let mut prefix = 0;
        while prefix < n && prefix < m && identical(prefix, prefix) {
            prefix += 1;
        }
        let mut suffix = 0;
        while suffix < n - prefix && suffix < m - prefix && identical(n - 1 - suffix, m - 1 - suffix) {
            suffix += 1;
        }
        let mut edits: Vec<Edit> = (0..prefix).map(|i| Edit::Keep { old_idx: i, new_idx: i }).collect();
        push_replacement(&mut edits, prefix..n - suffix, prefix..m - suffix);
        edits.extend((0..suffix).map(|i| Edit::Keep {
            old_idx: n - suffix + i,
            new_idx: m - suffix + i,
        }));
        return edits;
    }

    let width = m + 1;
    // Pair weights, computed once; negative marks a non-candidate
    let mut weights = vec![-1.0f64; n * m];
    for i in 0..n {
        for j in 0..m {
            if let Some(s) = score(i, j) {
                weights[i * m + j] = s.clamp(0.0, 1.0);
            }
        }
    }
    let pair = |i: usize, j: usize| {
        let w = weights[i * m + j];
        (w >= 0.0).then_some(w)
    };

    let mut table = vec![Score::default(); (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            let skip = table[(i + 1) * width + j].max(table[i * width + j + 1]);
            table[i * width + j] = match pair(i, j) {
                Some(w) => skip.max(table[(i + 1) * width + j + 1].with_pair(w)),
                None => skip,
            };
        }
    }

    let mut edits = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        let delete = table[(i + 1) * width + j];
        let insert = table[i * width + j + 1];
        let take = pair(i, j)
            .map(|w| table[(i + 1) * width + j + 1].with_pair(w))
            .is_some_and(|matched| matched >= delete && matched >= insert);
        if take {
            edits.push(Edit::Keep { old_idx: i, new_idx: j });
            i += 1;
            j += 1;
        } else if delete >= insert {
            edits.push(Edit::Delete { old_idx: i });
            i += 1;
        } else {
            edits.push(Edit::Insert { new_idx: j });
            j += 1;
        }
    }
    edits.extend((i..n).map(|old_idx| Edit::Delete { old_idx }));
    edits.extend((j..m).map(|new_idx| Edit::Insert { new_idx }));
    edits
}

// =============================================================================
// Helpers
// =============================================================================

fn push_replacement(edits: &mut Vec<Edit>, old: std::ops::Range<usize>, new: std::ops::Range<usize>) {
    edits.extend(old.map(|old_idx| Edit::Delete { old_idx }));
    edits.extend(new.map(|new_idx| Edit::Insert { new_idx }));
}

fn shift(edit: Edit, old_offset: usize, new_offset: usize) -> Edit {
    match edit {
        Edit::Keep { old_idx, new_idx } => Edit::Keep {
            old_idx: old_idx + old_offset,
            new_idx: new_idx + new_offset,
        },
        Edit::Insert { new_idx } => Edit::Insert {
            new_idx: new_idx + new_offset,
        },
        Edit::Delete { old_idx } => Edit::Delete {
            old_idx: old_idx + old_offset,
        },
    }
}
