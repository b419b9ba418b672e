//! End-to-end scenarios: markup in, marked-up markup out.

use html_tree_diff::diff::TOO_LARGE;
use html_tree_diff::render::render_children;
use html_tree_diff::transform::distribute_at;
use html_tree_diff::{diff, fix_lists, fix_tables, parse_html, DiffError, DiffOptions, RenderConfig};

fn html_diff(old: &str, new: &str) -> String {
    diff(old, new, &DiffOptions::new()).unwrap()
}

fn text_diff(old: &str, new: &str) -> String {
    diff(old, new, &DiffOptions::new().plaintext()).unwrap()
}

fn fixed_lists(html: &str) -> String {
    let mut doc = parse_html(html).unwrap();
    fix_lists(&mut doc.root);
    render_children(doc.content_root(), &RenderConfig::COMPACT)
}

fn fixed_tables(html: &str) -> String {
    let mut doc = parse_html(html).unwrap();
    fix_tables(&mut doc.root);
    render_children(doc.content_root(), &RenderConfig::COMPACT)
}

// =============================================================================
// Plain text
// =============================================================================

#[test]
fn test_plaintext_special_characters() {
    assert_eq!(
        text_diff("Assume that A < B, and A & B = {}", "If we assume that A < B, and A & B = {}"),
        "<del>Assume</del><ins>If we assume</ins> that A &lt; B, and A &amp; B = {}"
    );
    assert_eq!(text_diff("x", "<"), "<del>x</del><ins>&lt;</ins>");
    assert_eq!(text_diff("x", ">"), "<del>x</del><ins>&gt;</ins>");
    assert_eq!(text_diff("x", "&"), "<del>x</del><ins>&amp;</ins>");
}

#[test]
fn test_plaintext_words() {
    assert_eq!(text_diff("we were excited", "we're excited"), "<del>we were</del><ins>we're</ins> excited");
    assert_eq!(text_diff("Effective 1/2/2003", "Effective 3/4/2005"), "Effective <del>1/2/2003</del><ins>3/4/2005</ins>");
}

#[test]
fn test_plaintext_keeps_newlines() {
    assert_eq!(
        text_diff("one two three\nfour six", "one three\nfour five six"),
        "one <del>two </del>three\nfour <ins>five </ins>six"
    );
}

#[test]
fn test_plaintext_changes_stay_whole_words() {
    let old = "The quick brown fox jumps over the lazy dog.";
    let new = "The very quick brown foxes jump over the dog.";
    let out = text_diff(old, new);
    assert_eq!(
        out,
        "The <ins>very </ins>quick brown <del>fox jumps</del><ins>foxes jump</ins> over the <del>lazy </del>dog."
    );
    assert_eq!(keep_side(&out, "ins", "del"), new);
    assert_eq!(keep_side(&out, "del", "ins"), old);
}

/// Drop `drop` spans and unwrap `keep` spans of marked-up plain text
fn keep_side(marked: &str, keep: &str, drop: &str) -> String {
    let (open, close) = (format!("<{drop}>"), format!("</{drop}>"));
    let mut out = String::new();
    let mut rest = marked;
    while let Some(start) = rest.find(&open) {
        out.push_str(&rest[..start]);
        let end = rest[start..].find(&close).map_or(rest.len(), |i| start + i + close.len());
        rest = &rest[end..];
    }
    out.push_str(rest);
    out.replace(&format!("<{keep}>"), "").replace(&format!("</{keep}>"), "")
}

// =============================================================================
// Markup
// =============================================================================

#[test]
fn test_pretty_output() {
    let out = diff("<h1>one</h1>", "<h1>one</h1><h2>two</h2>", &DiffOptions::new().pretty()).unwrap();
    assert_eq!(out, "<h1>\n  one\n</h1>\n<ins>\n  <h2>\n    two\n  </h2>\n</ins>");
}

#[test]
fn test_cutoff_rejects_unrelated_documents() {
    let out = diff("<h1>totally</h1>", "<h2>different</h2>", &DiffOptions::new().with_cutoff(0.2)).unwrap();
    assert_eq!(out, TOO_LARGE);
}

#[test]
fn test_xml_declaration_ignored() {
    assert_eq!(
        html_diff("<p>foo</p>", "<p>foo bar</p><?xml version='1.0' encoding='utf-8'?>"),
        "<p>foo<ins> bar</ins></p>"
    );
}

#[test]
fn test_non_printing_characters() {
    // div becomes p before diffing
    assert_eq!(
        html_diff("", "<div><p\x01>\x1Ffoo\x21</p>\x00<p>bar</p></div>"),
        "<ins><p><p> foo!</p> <p>bar</p></p></ins>"
    );
}

#[test]
fn test_indentation_is_not_a_change() {
    let old = "<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>";
    let new = "<ul><li>one</li><li>two</li></ul>";
    assert_eq!(html_diff(old, new), "<ul><li>one</li><li>two</li></ul>");
}

#[test]
fn test_list_item_added_and_removed() {
    assert_eq!(
        html_diff("<ol><li>one</li><li>two</li></ol>", "<ol><li>one</li><li>three</li><li>two</li></ol>"),
        "<ol><li>one</li><li><ins>three</ins></li><li>two</li></ol>"
    );
    assert_eq!(
        html_diff("<ol><li>one</li><li>two</li></ol>", "<ol><li>two</li></ol>"),
        "<ol><li class=\"del-li\"><del>one</del></li><li>two</li></ol>"
    );
}

#[test]
fn test_wrapped_and_bare_documents_line_up() {
    let full = "<html><body><p>same text</p></body></html>";
    let bare = "<p>same text</p>";
    assert_eq!(html_diff(full, bare), "<p>same text</p>");
    assert_eq!(html_diff(bare, full), "<p>same text</p>");
    assert_eq!(
        html_diff("<html><head><title>t</title></head><body><p>one</p></body></html>", "<p>one two</p>"),
        "<p>one<ins> two</ins></p>"
    );
}

#[test]
fn test_empty_list_items_stay_in_place() {
    assert_eq!(
        html_diff("<ol><li>one</li></ol>", "<ol><li>one</li><li></li></ol>"),
        "<ol><li>one</li><li><ins></ins></li></ol>"
    );
    assert_eq!(
        html_diff("<ul><li></li><li>two</li></ul>", "<ul><li>two</li></ul>"),
        "<ul><li class=\"del-li\"><del></del></li><li>two</li></ul>"
    );
}

#[test]
fn test_empty_cells_stay_in_place() {
    assert_eq!(
        html_diff("<table><tr><td>a</td></tr></table>", "<table><tr><td>a</td><td></td></tr></table>"),
        "<table><tr><td>a</td><td><ins></ins></td></tr></table>"
    );
    assert_eq!(
        html_diff("<table><tr><td></td><td>a</td></tr></table>", "<table><tr><td>a</td></tr></table>"),
        "<table><tr><td><del></del></td><td>a</td></tr></table>"
    );
    assert_eq!(
        html_diff(
            "<table><tr><td>a</td><td>b</td></tr></table>",
            "<table><tr><td>a</td><td>b</td></tr><tr><td>c</td><td></td></tr></table>"
        ),
        "<table><tr><td>a</td><td>b</td></tr><tr><td><ins>c</ins></td><td><ins></ins></td></tr></table>"
    );
}

#[test]
fn test_table_row_added() {
    assert_eq!(
        html_diff(
            "<table><tbody><tr><td>A</td></tr></tbody></table>",
            "<table><tbody><tr><td>A</td></tr><tr><td>B</td></tr></tbody></table>"
        ),
        "<table><tbody><tr><td>A</td></tr><tr><td><ins>B</ins></td></tr></tbody></table>"
    );
}

// =============================================================================
// Fixups on parsed markup
// =============================================================================

#[test]
fn test_fix_lists_cases() {
    let cases = [
        (
            "<ol><li>one</li><ins><li>two</li></ins></ol>",
            "<ol><li>one</li><li><ins>two</ins></li></ol>",
        ),
        (
            "<ol><li>one</li><ins><li>two</li><li>three</li></ins></ol>",
            "<ol><li>one</li><li><ins>two</ins></li><li><ins>three</ins></li></ol>",
        ),
        (
            "<ol><li>one</li><del><li>one and a half</li></del></ol>",
            "<ol><li>one</li><li class=\"del-li\"><del>one and a half</del></li></ol>",
        ),
        (
            "<ol><del><li>one third</li><li>two thirds</li></del><li>one</li></ol>",
            "<ol><li class=\"del-li\"><del>one third</del></li><li class=\"del-li\"><del>two thirds</del></li><li>one</li></ol>",
        ),
        (
            "<ol><del><li>AAA</li></del><ins><li>BBB</li></ins></ol>",
            "<ol><li><del>AAA</del><ins>BBB</ins></li></ol>",
        ),
        (
            "<ol><del><li class=\"old\" id=\"foo\">AAA</li></del><ins><li class=\"new\">BBB</li></ins></ol>",
            "<ol><li class=\"new\"><del>AAA</del><ins>BBB</ins></li></ol>",
        ),
        (
            "<ol><del><li>AAA</li></del><li><strong>BBB</strong></li><ins><li>CCC</li></ins></ol>",
            "<ol><li class=\"del-li\"><del>AAA</del></li><li><strong>BBB</strong></li><li><ins>CCC</ins></li></ol>",
        ),
        (
            "<ol><del><li>AAA</li></del><del><li>BBB</li></del><ins><li>CCC</li></ins></ol>",
            "<ol><li class=\"del-li\"><del>AAA</del></li><li><del>BBB</del><ins>CCC</ins></li></ol>",
        ),
        (
            "<ol><del><li>AAA</li></del><ins><foo>BBB</foo></ins></ol>",
            "<ol><li class=\"del-li\"><del>AAA</del></li><ins><foo>BBB</foo></ins></ol>",
        ),
        (
            "<ol><del><li>AAA</li></del><ins>BBB</ins></ol>",
            "<ol><li class=\"del-li\"><del>AAA</del></li><ins>BBB</ins></ol>",
        ),
    ];
    for (input, expected) in cases {
        assert_eq!(fixed_lists(input), expected, "input: {input}");
    }
}

#[test]
fn test_fix_tables_cases() {
    assert_eq!(
        fixed_tables("<table><tr><td>A</td></tr><ins><tr><td>B</td></tr></ins></table>"),
        "<table><tr><td>A</td></tr><tr><td><ins>B</ins></td></tr></table>"
    );
    assert_eq!(
        fixed_tables(
            "<table><ins> </ins><del> </del>\
             <thead><ins> </ins><del> </del></thead>\
             <tfoot><ins> </ins><del> </del></tfoot>\
             <tbody><ins> </ins><del> </del>\
             <tr><ins> </ins><del> </del><td><ins>A</ins></td></tr>\
             </tbody></table>"
        ),
        "<table><thead></thead><tfoot></tfoot><tbody><tr><td><ins>A</ins></td></tr></tbody></table>"
    );
}

#[test]
fn test_distribute_parsed_marker() {
    let mut doc = parse_html("<ins><li>A</li><li><em>B</em></li></ins>").unwrap();
    distribute_at(&mut doc.root, &[0, 0]).unwrap();
    assert_eq!(
        render_children(doc.content_root(), &RenderConfig::COMPACT),
        "<li><ins>A</ins></li><li><ins><em>B</em></ins></li>"
    );
}

#[test]
fn test_location_out_of_range() {
    let doc = parse_html("<ins><li>A</li><li><em>B</em></li></ins>").unwrap();
    assert!(matches!(doc.locate(&[0, 10]), Err(DiffError::LocationNotFound { index: 10, depth: 1, .. })));
    assert!(doc.locate(&[0, 0, 1, 0]).is_ok());
}

// =============================================================================
// Preprocessing
// =============================================================================

#[test]
fn test_preprocessing_cases() {
    let cases = [
        ("", ""),
        ("<h1>one</h1>tail", "<h1>one</h1>tail"),
        ("<div/><!--comment one--><!--comment two-->", "<div></div>"),
        ("<style type=\"text/css\"></style>", ""),
        ("<p>xxx<style type=\"text/css\"></style>yyy</p>", "<p>xxxyyy</p>"),
        ("<font type=\"text/css\"></font>", ""),
        ("<!-- test -->", ""),
        (
            "<table>\n    illegal text\n    <tbody>\n        <tr>\n            <td>stuff</td>\n        </tr>\n    </tbody>\n</table>",
            "<table> illegal text <tbody><tr><td>stuff</td></tr></tbody></table>",
        ),
    ];
    for (input, expected) in cases {
        let doc = parse_html(input).unwrap();
        assert_eq!(render_children(doc.content_root(), &RenderConfig::COMPACT), expected, "input: {input:?}");
    }
}
