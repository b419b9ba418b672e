//! Diff algorithms.
//!
//! - `tokens`: text tokenizer
//! - `lcs`: unweighted and weighted LCS aligners
//! - `text`: word-level text diff
//! - `tree`: tree diff engine
//! - `similarity`: similarity gate

pub mod lcs;
pub mod similarity;
pub mod text;
pub mod tokens;
pub mod tree;

pub use lcs::{align, align_weighted, Edit, LcsStats};
pub use similarity::{check_similarity, check_similarity_with, similarity_ratio, WordBag};
pub use text::{diff_text, diff_text_with, diff_tokens, diff_tokens_with, TextChange};
pub use tokens::{split_text, Token, TokenKind};
pub use tree::{dom_diff, dom_diff_with_config, DiffConfig, DiffOutput, DiffStats, DEFAULT_MAX_ALIGNMENT_CELLS};
