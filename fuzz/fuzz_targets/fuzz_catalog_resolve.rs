#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tscat_catalog::ts::{TsContext, TsDocument, TsMessage};
use tscat_catalog::{Catalog, LoadOptions, PluralFamily};

#[derive(Debug, Arbitrary)]
struct Message {
    context: u8,
    source: String,
    numerus: bool,
    forms: Vec<String>,
}

#[derive(Debug, Arbitrary)]
struct Input {
    locale: String,
    messages: Vec<Message>,
    lookups: Vec<(u8, String, Option<i64>)>,
}

fuzz_target!(|input: Input| {
    if input.messages.len() > 256 || input.lookups.len() > 256 {
        return;
    }

    let mut contexts: Vec<TsContext> = (0..4)
        .map(|i| TsContext {
            name: format!("ctx{i}"),
            messages: Vec::new(),
        })
        .collect();
    for message in input.messages {
        contexts[usize::from(message.context % 4)].messages.push(TsMessage {
            source: Some(message.source),
            numerus: message.numerus,
            forms: message.forms,
            ..TsMessage::default()
        });
    }
    let document = TsDocument {
        language: Some(input.locale.clone()),
        contexts,
        ..TsDocument::default()
    };

    // for_locale must never panic; built-in rules stay in range.
    if let Some(family) = PluralFamily::for_locale(&input.locale) {
        for (_, _, quantity) in &input.lookups {
            if let Some(n) = quantity {
                assert!(family.form_index(*n) < family.form_count());
            }
        }
    }

    let (catalog, _) = Catalog::from_document(document, &LoadOptions::default());
    for (context, source, quantity) in &input.lookups {
        let context = format!("ctx{}", context % 4);
        let resolved = catalog.resolve(&context, source, *quantity);
        if catalog.entry(&context, source, None).is_none() {
            assert_eq!(resolved, source.as_str(), "unknown key must resolve to source");
        }
        if !source.is_empty() {
            assert!(!resolved.is_empty());
        }
    }
});
