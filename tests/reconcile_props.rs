//! Property tests for resource reconciliation.

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;

use multipage::{Document, Marker, OutputMode, Resource, Template};

fn template(existing: &BTreeSet<String>, marker: bool) -> String {
    let scripts: String = existing
        .iter()
        .map(|name| format!(r#"<script src="{name}.js"></script>"#))
        .collect();
    let marker = if marker { "<!--SCRIPT-->" } else { "" };
    format!("<!DOCTYPE html><html><head></head><body><div></div>{scripts}{marker}</body></html>")
}

fn script_chunks(doc: &Document) -> Vec<String> {
    doc.scripts()
        .iter()
        .filter_map(Resource::chunk_name)
        .map(str::to_string)
        .collect()
}

fn chunk_names() -> impl Strategy<Value = String> {
    "[a-c]{1,2}(\\.[a-c]{1,2})?"
}

proptest! {
    #[test]
    fn prop_required_chunks_are_all_referenced(
        existing in prop::collection::btree_set(chunk_names(), 0..4),
        required in prop::collection::vec(chunk_names(), 0..6),
        marker in any::<bool>(),
    ) {
        let mut doc = Document::parse(&template(&existing, marker), Template::Default);
        doc.ensure_requires(&required, false).unwrap();

        let chunks: HashSet<String> = script_chunks(&doc).into_iter().collect();
        for name in &required {
            prop_assert!(chunks.contains(name), "{name} missing from {chunks:?}");
        }
    }

    #[test]
    fn prop_no_chunk_is_referenced_twice(
        existing in prop::collection::btree_set(chunk_names(), 0..4),
        first in prop::collection::vec(chunk_names(), 0..6),
        second in prop::collection::vec(chunk_names(), 0..6),
        marker in any::<bool>(),
    ) {
        let mut doc = Document::parse(&template(&existing, marker), Template::Default);
        doc.ensure_requires(&first, false).unwrap();
        doc.ensure_requires(&second, false).unwrap();

        let chunks = script_chunks(&doc);
        let unique: HashSet<&String> = chunks.iter().collect();
        prop_assert_eq!(unique.len(), chunks.len());
    }

    #[test]
    fn prop_reconciliation_is_idempotent(
        existing in prop::collection::btree_set(chunk_names(), 0..4),
        required in prop::collection::vec(chunk_names(), 0..6),
        marker in any::<bool>(),
        production in any::<bool>(),
    ) {
        let mut once = Document::parse(&template(&existing, marker), Template::Default);
        once.ensure_requires(&required, true).unwrap();

        let mut twice = once.clone();
        twice.ensure_requires(&required, true).unwrap();

        prop_assert_eq!(script_chunks(&once), script_chunks(&twice));
        let mode = OutputMode::for_build(production);
        prop_assert_eq!(once.serialize(mode).unwrap(), twice.serialize(mode).unwrap());
    }

    #[test]
    fn prop_marker_is_replaced_in_order(
        existing in prop::collection::btree_set(chunk_names(), 0..4),
        required in prop::collection::vec(chunk_names(), 1..6),
    ) {
        let mut doc = Document::parse(&template(&existing, true), Template::Default);
        doc.ensure_requires(&required, false).unwrap();

        let mut seen: HashSet<&str> = existing.iter().map(String::as_str).collect();
        let left_over: Vec<&str> = required
            .iter()
            .map(String::as_str)
            .filter(|name| seen.insert(*name))
            .collect();

        if left_over.is_empty() {
            prop_assert!(doc.marker(Marker::Script).is_some());
        } else {
            prop_assert!(doc.marker(Marker::Script).is_none());
            let html = doc.serialize(OutputMode::Compact).unwrap();
            let injected: String = left_over
                .iter()
                .map(|name| format!(r#"<script src="{name}"></script>"#))
                .collect();
            let expected_tail = format!("{injected}</body></html>");
            prop_assert!(html.ends_with(&expected_tail), "{html}");
            prop_assert!(!html.contains("SCRIPT"));
        }
    }
}
