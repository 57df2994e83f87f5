#![no_main]

use libfuzzer_sys::fuzz_target;
use tscat_catalog::{Catalog, LoadOptions};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 64 * 1024 {
        return;
    }

    // Malformed input must be an error, never a panic.
    let Ok((catalog, _report)) = Catalog::parse(text, &LoadOptions::default()) else {
        return;
    };

    // Every entry resolves to something non-empty when its source is.
    for entry in catalog.entries() {
        let resolved = catalog.resolve_disambiguated(
            &entry.context,
            &entry.source,
            entry.disambiguation.as_deref(),
            Some(2),
        );
        if !entry.source.is_empty() {
            assert!(!resolved.is_empty(), "empty resolution for {entry:?}");
        }
    }

    // The writer's output must load back to the same entries.
    let written = catalog.write();
    let reread = Catalog::load(&written).expect("writer output must parse");
    assert_eq!(catalog.len(), reread.len(), "entry count changed on rewrite");
    for before in catalog.entries() {
        let after = reread
            .entry(&before.context, &before.source, before.disambiguation.as_deref())
            .expect("entry survives rewrite");
        assert_eq!(before.numerus, after.numerus);
        assert_eq!(before.forms, after.forms);
        assert_eq!(before.state, after.state);
    }
});
