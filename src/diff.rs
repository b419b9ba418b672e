//! Markup diff entry point
//!
//! Ties the stages together:
//!
//! ```text
//! old/new markup ─► parse ─► similarity gate ─► div→p ─► tree diff
//!                                                         │
//!                 rendered body ◄─ render ◄─ list/table fixups
//! ```

use tracing::debug;

use crate::algo::{check_similarity_with, dom_diff_with_config, DiffConfig, DiffOutput};
use crate::error::DiffResult;
use crate::node::Document;
use crate::parse::{parse_html, parse_text};
use crate::render::{render_children, render_document, RenderConfig};
use crate::transform::{DivsToParagraphs, FixLists, FixTables, Pipeline, Transform};

/// Returned instead of a diff when the gate rejects the pair
pub const TOO_LARGE: &str =
    "<h2>The differences from the previous version are too large to show concisely.</h2>";

// =============================================================================
// DiffOptions
// =============================================================================

/// Options for [`diff`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffOptions {
    /// Minimum similarity ratio needed to show a diff; `0.0` disables the gate
    pub cutoff: f64,
    /// Treat both inputs as plain text instead of markup
    pub plaintext: bool,
    /// Indent the output, one node per line
    pub pretty: bool,
    /// Alignment limits
    pub diff: DiffConfig,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            cutoff: 0.0,
            plaintext: false,
            pretty: false,
            diff: DiffConfig::default(),
        }
    }
}

impl DiffOptions {
    /// Markup diff, no gate, compact output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the similarity cutoff.
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Diff plain text.
    pub fn plaintext(mut self) -> Self {
        self.plaintext = true;
        self
    }

    /// Indent the output.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Set the alignment limits.
    pub fn with_config(mut self, diff: DiffConfig) -> Self {
        self.diff = diff;
        self
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Show the changes from `old` to `new` as markup.
///
/// Added content is wrapped in `<ins>`, removed content in `<del>`. Only the
/// body content is returned when the document has a `body`.
pub fn diff(old: &str, new: &str, options: &DiffOptions) -> DiffResult<String> {
    let (old_doc, new_doc) = if options.plaintext {
        (parse_text(old), parse_text(new))
    } else {
        (parse_html(old)?, parse_html(new)?)
    };

    if !check_similarity_with(&old_doc, &new_doc, options.cutoff, &options.diff) {
        debug!(cutoff = options.cutoff, "documents too different, skipping diff");
        return Ok(TOO_LARGE.to_string());
    }

    let old_doc = DivsToParagraphs.transform(old_doc);
    let new_doc = DivsToParagraphs.transform(new_doc);

    let DiffOutput { document, stats } = dom_diff_with_config(&old_doc, &new_doc, &options.diff);
    debug!(?stats, "tree diff done");

    let merged = Pipeline::new(document)
        .pipe_if(!options.plaintext, FixLists)
        .pipe_if(!options.plaintext, FixTables)
        .inspect(|doc| {
            let counts = doc.collect_stats();
            debug!(inserts = counts.insert_count, deletes = counts.delete_count, "fixups done");
        })
        .into_inner();

    Ok(render(&merged, options))
}

/// Compare two markup strings, ignoring attribute order and insignificant
/// whitespace.
pub fn html_equal(a: &str, b: &str) -> DiffResult<bool> {
    let mut a = parse_html(a)?;
    let mut b = parse_html(b)?;
    a.root.normalize();
    b.root.normalize();
    Ok(a == b)
}

fn render(doc: &Document, options: &DiffOptions) -> String {
    let config = RenderConfig::new(options.pretty);
    match doc.body() {
        Some(body) => render_children(body, &config),
        None => render_document(doc, &config),
    }
}
