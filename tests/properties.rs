//! Property tests for the diff pipeline.

use html_tree_diff::algo::{diff_text, dom_diff, split_text, TextChange};
use html_tree_diff::node::{tags, Children, Document, Element, Marker, Node};
use html_tree_diff::transform::{distribute, fix_lists, fix_tables};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn word() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["alpha", "beta", "gamma", "delta", "one", "two", "we're", "1/2", "&amp;", ","])
        .prop_map(str::to_string)
}

fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 1..8).prop_map(|words| words.join(" "))
}

fn block() -> impl Strategy<Value = Element> {
    prop_oneof![
        (prop::sample::select(vec!["p", "h1", "h2"]), sentence()).prop_map(|(tag, text)| Element::new(tag).text(text)),
        (sentence(), sentence()).prop_map(|(a, b)| Element::new("p").text(a).child(Element::new("em").text(b))),
        prop::collection::vec(sentence(), 1..4).prop_map(|items| {
            Element::with_children("ul", items.into_iter().map(|t| Node::elem(Element::new("li").text(t))))
        }),
    ]
}

fn document() -> impl Strategy<Value = Document> {
    prop::collection::vec(block(), 0..6).prop_map(|blocks| {
        Document::new(Element::with_children("body", blocks.into_iter().map(Node::elem)))
    })
}

/// Element holding `text`, or an empty one
fn leaf(tag: &'static str, text: Option<&'static str>) -> Element {
    match text {
        Some(text) => Element::new(tag).text(text),
        None => Element::new(tag),
    }
}

fn list_document() -> impl Strategy<Value = Document> {
    let item = prop::option::weighted(0.8, prop::sample::select(vec!["a", "b", "c", "d", "e"]));
    (prop::sample::select(vec!["ol", "ul"]), prop::collection::vec(item, 0..6)).prop_map(|(tag, items)| {
        let list = Element::with_children(tag, items.into_iter().map(|t| Node::elem(leaf("li", t))));
        Document::new(Element::new("body").child(list))
    })
}

fn table_document() -> impl Strategy<Value = Document> {
    let cell = prop::option::weighted(0.8, prop::sample::select(vec!["1", "2", "3"]));
    prop::collection::vec(prop::collection::vec(cell, 0..4), 0..5).prop_map(|rows| {
        let tbody = Element::with_children(
            "tbody",
            rows.into_iter().map(|cells| {
                Node::elem(Element::with_children(
                    "tr",
                    cells.into_iter().map(|c| Node::elem(leaf("td", c))),
                ))
            }),
        );
        Document::new(Element::new("body").child(Element::new("table").child(tbody)))
    })
}

fn marker() -> impl Strategy<Value = Element> {
    let child = prop_oneof![
        "[a-z ]{1,6}".prop_map(Node::text),
        Just(Node::elem(Element::new("br"))),
        Just(Node::elem(Element::new("li"))),
        sentence().prop_map(|t| Node::elem(Element::new("li").text(t))),
        sentence().prop_map(|t| Node::elem(Element::new("p").child(Element::new("em").text(t)))),
    ];
    (prop::bool::ANY, prop::collection::vec(child, 0..6)).prop_map(|(insert, children)| {
        let kind = if insert { Marker::Insert } else { Marker::Delete };
        kind.wrap(children)
    })
}

// =============================================================================
// Helpers
// =============================================================================

/// Keep one side of the changes: unwrap `keep` markers, drop the others
fn resolve(elem: &Element, keep: Marker) -> Element {
    let mut out = Element {
        tag: elem.tag.clone(),
        attrs: elem.attrs.clone(),
        children: Children::new(),
    };
    for child in &elem.children {
        match child {
            Node::Element(e) => match e.marker() {
                Some(kind) if kind == keep => out.children.extend(resolve(e, keep).children),
                Some(_) => {}
                None => out.push_elem(resolve(e, keep)),
            },
            other => out.children.push(other.clone()),
        }
    }
    out
}

fn normalized(mut elem: Element) -> Element {
    elem.normalize();
    elem
}

fn no_markers_under(elem: &Element, containers: &[&str]) -> bool {
    let here = !elem.is_any(containers) || elem.children.iter().all(|n| n.marker().is_none());
    here && elem.children_elements().all(|e| no_markers_under(e, containers))
}

fn lists_hold_only_items(elem: &Element) -> bool {
    let here = !elem.is_any(&["ol", "ul"]) || elem.children.iter().all(|n| n.is_tag(tags::LI));
    here && elem.children_elements().all(lists_hold_only_items)
}

/// Elements tagged with one of `tags`, at any depth
fn count_tags(elem: &Element, tags: &[&str]) -> usize {
    elem.children_elements()
        .map(|e| usize::from(e.is_any(tags)) + count_tags(e, tags))
        .sum()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn test_tokens_reconstruct_input(text in "\\PC{0,60}") {
        let joined: String = split_text(&text).iter().map(|t| t.text).collect();
        prop_assert_eq!(joined, text);
    }

    #[test]
    fn test_text_diff_is_complete(old in sentence(), new in sentence()) {
        let changes = diff_text(&old, &new);
        let accepted: String = changes
            .iter()
            .filter(|c| !matches!(c, TextChange::Delete(_)))
            .map(TextChange::text)
            .collect();
        let rejected: String = changes
            .iter()
            .filter(|c| !matches!(c, TextChange::Insert(_)))
            .map(TextChange::text)
            .collect();
        prop_assert_eq!(accepted, new);
        prop_assert_eq!(rejected, old);
    }

    #[test]
    fn test_text_diff_deletes_before_inserts(old in sentence(), new in sentence()) {
        let changes = diff_text(&old, &new);
        for pair in changes.windows(2) {
            let swapped = matches!((&pair[0], &pair[1]), (TextChange::Insert(_), TextChange::Delete(_)));
            prop_assert!(!swapped, "insert before delete in {:?}", changes);
        }
    }

    #[test]
    fn test_identical_documents_have_no_markers(doc in document()) {
        let merged = dom_diff(&doc, &doc);
        prop_assert_eq!(merged.collect_stats().marker_count(), 0);
        prop_assert_eq!(&merged, &doc);
    }

    #[test]
    fn test_tree_diff_is_complete(old in document(), new in document()) {
        let merged = dom_diff(&old, &new);
        prop_assert_eq!(normalized(resolve(&merged.root, Marker::Insert)), normalized(new.root.clone()));
        prop_assert_eq!(normalized(resolve(&merged.root, Marker::Delete)), normalized(old.root.clone()));
    }

    #[test]
    fn test_block_deletes_before_inserts(old in document(), new in document()) {
        let merged = dom_diff(&old, &new);
        for pair in merged.root.children.windows(2) {
            let swapped = pair[0].marker() == Some(Marker::Insert) && pair[1].marker() == Some(Marker::Delete);
            prop_assert!(!swapped);
        }
    }

    #[test]
    fn test_distribute_is_idempotent(marker in marker()) {
        let once = distribute(marker);
        let twice: Children = once
            .iter()
            .cloned()
            .flat_map(|node| match node {
                Node::Element(e) if e.is_marker() => distribute(*e),
                other => std::iter::once(other).collect(),
            })
            .collect();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_distribute_keeps_content(marker in marker()) {
        let text = marker.text_content();
        let out = Element::with_children("body", distribute(marker));
        prop_assert_eq!(out.text_content(), text);
    }

    #[test]
    fn test_fixed_lists_are_valid(old in list_document(), new in list_document()) {
        let mut merged = dom_diff(&old, &new);
        fix_lists(&mut merged.root);
        prop_assert!(lists_hold_only_items(&merged.root));
        prop_assert!(count_tags(&merged.root, &[tags::LI]) >= count_tags(&new.root, &[tags::LI]));
    }

    #[test]
    fn test_fixed_tables_are_valid(old in table_document(), new in table_document()) {
        let mut merged = dom_diff(&old, &new);
        fix_tables(&mut merged.root);
        prop_assert!(no_markers_under(&merged.root, tags::TABLE_CONTAINERS));
        prop_assert!(count_tags(&merged.root, tags::CELLS) >= count_tags(&new.root, tags::CELLS));
    }
}
