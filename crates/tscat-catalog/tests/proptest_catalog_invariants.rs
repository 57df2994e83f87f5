//! Property-based invariant tests for catalog loading and lookup.
//!
//! 1.  Built-in plural rules always return an index below their form count
//! 2.  Negative quantities classify like positive ones
//! 3.  for_locale never panics on arbitrary strings
//! 4.  Unknown keys resolve to the source text unchanged
//! 5.  Untranslated entries resolve to the source text
//! 6.  Every loaded entry resolves to a non-empty string
//! 7.  write(load(x)) loads back to the same entries
//! 8.  Reading never panics on arbitrary input
//! 9.  Coverage percentage is bounded and counts add up
//! 10. Stand-in two-form rule selects forms by quantity

use proptest::prelude::*;
use tscat_catalog::ts::{TsContext, TsDocument, TsMessage, read_document, write_document};
use tscat_catalog::{Catalog, LoadOptions, PluralFamily, PluralRule, TranslationState};

// ── Helpers ──────────────────────────────────────────────────────────

fn text() -> impl Strategy<Value = String> {
    // Printable text including XML-special characters and placeholders.
    "[a-zA-Z0-9 %<>&'\"./()]{0,24}"
}

fn state() -> impl Strategy<Value = TranslationState> {
    prop_oneof![
        Just(TranslationState::Finished),
        Just(TranslationState::Unfinished),
        Just(TranslationState::Obsolete),
        Just(TranslationState::Vanished),
    ]
}

fn message() -> impl Strategy<Value = TsMessage> {
    (
        "[a-zA-Z%1 ]{1,16}",
        proptest::option::of("[a-z]{1,8}"),
        proptest::option::of(text()),
        any::<bool>(),
        proptest::collection::vec(text(), 0..4),
        state(),
    )
        .prop_map(|(source, disambiguation, comment, numerus, forms, state)| {
            // Non-plural entries carry at most one form.
            let forms = if numerus {
                forms
            } else {
                forms.into_iter().filter(|f| !f.is_empty()).take(1).collect()
            };
            TsMessage {
                source: Some(source),
                disambiguation,
                comment,
                numerus,
                forms,
                state,
                ..TsMessage::default()
            }
        })
}

fn document() -> impl Strategy<Value = TsDocument> {
    proptest::collection::vec(
        ("[A-Za-z]{1,10}", proptest::collection::vec(message(), 0..6)),
        0..4,
    )
    .prop_map(|contexts| TsDocument {
        version: Some("2.1".into()),
        language: Some("de_DE".into()),
        source_language: None,
        // Suffix keeps context names unique so file order is stable.
        contexts: contexts
            .into_iter()
            .enumerate()
            .map(|(i, (name, messages))| TsContext {
                name: format!("{name}{i}"),
                messages,
            })
            .collect(),
    })
}

#[derive(Debug)]
struct ZeroOrMany;

impl PluralRule for ZeroOrMany {
    fn form_count(&self) -> usize {
        2
    }

    fn form_index(&self, quantity: i64) -> usize {
        usize::from(quantity >= 2)
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Built-in rules stay within their form count
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rule_index_within_form_count(count in any::<i64>()) {
        for rule in PluralFamily::ALL {
            let index = rule.form_index(count);
            prop_assert!(
                index < rule.form_count(),
                "rule {:?} returned {} for count {} (forms: {})",
                rule, index, count, rule.form_count()
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Negative counts use absolute value
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn negative_matches_positive(count in 0i64..=100_000) {
        for rule in PluralFamily::ALL {
            prop_assert_eq!(rule.form_index(count), rule.form_index(-count));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. for_locale never panics
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn for_locale_never_panics(locale in ".*") {
        let _family = PluralFamily::for_locale(&locale);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Unknown keys resolve to the source
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unknown_key_returns_source(
        doc in document(),
        context in "[0-9]{1,8}",
        source in text(),
        quantity in proptest::option::of(any::<i64>()),
    ) {
        // Generated context names start with a letter, so a numeric one is unknown.
        let (catalog, _) = Catalog::from_document(doc, &LoadOptions::default());
        prop_assert_eq!(catalog.resolve(&context, &source, quantity), source.as_str());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Untranslated entries fall back to the source
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn untranslated_resolves_to_source(
        doc in document(),
        quantity in proptest::option::of(any::<i64>()),
    ) {
        let (catalog, _) = Catalog::from_document(doc, &LoadOptions::default());
        for entry in catalog.entries().filter(|e| e.is_untranslated()) {
            prop_assert_eq!(
                catalog.resolve_disambiguated(
                    &entry.context,
                    &entry.source,
                    entry.disambiguation.as_deref(),
                    quantity,
                ),
                entry.source.as_str()
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Every loaded entry resolves non-empty
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn loaded_entries_resolve_non_empty(
        doc in document(),
        quantity in proptest::option::of(any::<i64>()),
    ) {
        let (catalog, _) = Catalog::from_document(doc, &LoadOptions::new().include_obsolete(true));
        for entry in catalog.entries() {
            let resolved = catalog.resolve_disambiguated(
                &entry.context,
                &entry.source,
                entry.disambiguation.as_deref(),
                quantity,
            );
            prop_assert!(!resolved.is_empty(), "empty resolution for {:?}", entry);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Round-trip through the writer
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn write_then_load_round_trips(doc in document()) {
        let (catalog, _) = Catalog::from_document(doc, &LoadOptions::default());
        let reread = Catalog::load(&catalog.write()).unwrap();
        let before: Vec<_> = catalog
            .entries()
            .map(|e| (&e.context, &e.source, &e.disambiguation, e.numerus, &e.forms, e.state))
            .collect();
        let after: Vec<_> = reread
            .entries()
            .map(|e| (&e.context, &e.source, &e.disambiguation, e.numerus, &e.forms, e.state))
            .collect();
        prop_assert_eq!(before, after);
    }
}

proptest! {
    #[test]
    fn document_writer_is_read_back_exactly(doc in document()) {
        let reread = read_document(&write_document(&doc)).unwrap();
        prop_assert_eq!(reread, doc);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Reader never panics
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reader_never_panics(data in ".{0,256}") {
        let _ = read_document(&data);
    }

    #[test]
    fn reader_never_panics_on_truncated_documents(doc in document(), cut in 0usize..2048) {
        let text = write_document(&doc);
        let mut end = cut.min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let _ = Catalog::load(&text[..end]);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9. Coverage is bounded
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn coverage_percent_bounded(doc in document()) {
        let (catalog, _) = Catalog::from_document(doc, &LoadOptions::default());
        let report = catalog.coverage_report();
        let mut summed = 0;
        for ctx in &report.contexts {
            let counts = &ctx.counts;
            prop_assert!((0.0..=100.0).contains(&counts.completion_percent));
            prop_assert_eq!(counts.translated + counts.untranslated, counts.total);
            summed += counts.total + counts.retired;
        }
        prop_assert!((0.0..=100.0).contains(&report.overall.completion_percent));
        prop_assert_eq!(summed, catalog.len());
        prop_assert_eq!(report.overall.total + report.overall.retired, catalog.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 10. Stand-in two-form rule
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn two_form_rule_selects_by_quantity(
        one in "[a-z]{1,12}",
        many in "[a-z]{1,12}",
        quantity in 0i64..=10_000,
    ) {
        let doc = TsDocument {
            contexts: vec![TsContext {
                name: "ctx".into(),
                messages: vec![TsMessage {
                    source: Some("file(s)".into()),
                    numerus: true,
                    forms: vec![one.clone(), many.clone()],
                    ..TsMessage::default()
                }],
            }],
            ..TsDocument::default()
        };
        let (catalog, _) = Catalog::from_document(doc, &LoadOptions::new().with_plural_rule(ZeroOrMany));
        let expected = if quantity >= 2 { &many } else { &one };
        prop_assert_eq!(catalog.resolve("ctx", "file(s)", Some(quantity)), expected.as_str());
    }
}
