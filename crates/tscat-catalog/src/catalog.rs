//! Immutable translation catalog with source-text fallback.
//!
//! # Invariants
//!
//! 1. **Lookups never fail**: [`Catalog::resolve`] returns the source text
//!    whenever no usable translation exists, so an end user never sees an
//!    empty label for a non-empty source string.
//!
//! 2. **One entry per key**: messages sharing `(context, source,
//!    disambiguation)` collapse into a single entry while loading.
//!
//! 3. **Thread safety**: `Catalog` is `Send + Sync` and never mutated after
//!    construction.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Malformed markup | Not well-formed XML, no `<TS>` root | `CatalogError::Parse`, nothing built |
//! | Missing source | `<message>` without `<source>` | Entry skipped, warning recorded |
//! | Form count mismatch | Plural forms != rule's form count | Entry flagged, index clamped |
//! | Unknown locale | No built-in rule for `language` | Plural entries use the first form |
//! | Unknown key | No entry for the key | Source text returned |
//! | Untranslated | All forms empty | Source text returned |

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use serde::Serialize;

use crate::error::{CatalogError, Result};
use crate::model::{CatalogEntry, TranslationState};
use crate::plural::{PluralFamily, PluralRule};
use crate::ts::{self, TsContext, TsDocument, TsMessage};

/// How to treat repeated `(context, source, disambiguation)` keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Append provenance to the first entry; a translated or still-active
    /// duplicate replaces the first entry's forms.
    #[default]
    Merge,
    /// Keep the first entry untouched and drop later ones.
    KeepFirst,
}

/// Options controlling how a document becomes a [`Catalog`].
///
/// The defaults match what Qt's `lrelease` ships: unfinished translations
/// with text are used, obsolete ones are not.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    locale: Option<String>,
    plural_rule: Option<Arc<dyn PluralRule>>,
    include_unfinished: bool,
    include_obsolete: bool,
    duplicates: DuplicatePolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            locale: None,
            plural_rule: None,
            include_unfinished: true,
            include_obsolete: false,
            duplicates: DuplicatePolicy::Merge,
        }
    }
}

impl LoadOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the plural rule from this tag instead of the document's
    /// `language` attribute.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Use a caller-supplied plural rule, bypassing locale detection.
    #[must_use]
    pub fn with_plural_rule(mut self, rule: impl PluralRule + 'static) -> Self {
        self.plural_rule = Some(Arc::new(rule));
        self
    }

    #[must_use]
    pub fn include_unfinished(mut self, include: bool) -> Self {
        self.include_unfinished = include;
        self
    }

    #[must_use]
    pub fn include_obsolete(mut self, include: bool) -> Self {
        self.include_obsolete = include;
        self
    }

    #[must_use]
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }
}

/// A non-fatal problem found while building a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A `<message>` had no `<source>` and was skipped.
    MissingSource { context: String, index: usize },
    /// A plural entry's form count disagrees with the locale rule.
    PluralFormMismatch {
        context: String,
        source: String,
        expected: usize,
        found: usize,
    },
    /// A repeated key was collapsed into an earlier entry.
    DuplicateEntry { context: String, source: String },
    /// No built-in plural rule covers the locale tag.
    UnknownLocale { locale: String },
}

impl Diagnostic {
    /// Duplicates are routine (several call sites share a string); every
    /// other diagnostic is a warning.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        !matches!(self, Self::DuplicateEntry { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSource { context, index } => {
                write!(f, "{context}: message #{index} has no <source>, skipped")
            }
            Self::PluralFormMismatch {
                context,
                source,
                expected,
                found,
            } => write!(
                f,
                "{context}: '{source}' has {found} plural forms, locale expects {expected}"
            ),
            Self::DuplicateEntry { context, source } => {
                write!(f, "{context}: duplicate '{source}' merged")
            }
            Self::UnknownLocale { locale } => {
                write!(f, "no plural rule for locale '{locale}'")
            }
        }
    }
}

/// Everything noteworthy that happened while building a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub diagnostics: Vec<Diagnostic>,
    /// Messages dropped because they could not form an entry.
    pub skipped: usize,
    /// Messages collapsed into an earlier entry.
    pub merged: usize,
}

impl LoadReport {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }
}

/// Read-only translation catalog.
///
/// # Example
///
/// ```
/// use tscat_catalog::Catalog;
///
/// let catalog = Catalog::load(r#"<TS version="2.1" language="de_DE">
/// <context>
///     <name>FindDialog</name>
///     <message>
///         <source>Find</source>
///         <translation>Suchen</translation>
///     </message>
///     <message numerus="yes">
///         <source>%n match(es)</source>
///         <translation>
///             <numerusform>%n Treffer</numerusform>
///             <numerusform>%n Treffer gesamt</numerusform>
///         </translation>
///     </message>
/// </context>
/// </TS>"#).unwrap();
///
/// assert_eq!(catalog.resolve("FindDialog", "Find", None), "Suchen");
/// assert_eq!(catalog.resolve("FindDialog", "Close", None), "Close");
/// assert_eq!(catalog.resolve("FindDialog", "%n match(es)", Some(1)), "%n Treffer");
/// assert_eq!(catalog.resolve("FindDialog", "%n match(es)", Some(4)), "%n Treffer gesamt");
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    version: Option<String>,
    language: Option<String>,
    source_language: Option<String>,
    entries: Vec<CatalogEntry>,
    /// context -> source -> entry indices (one per disambiguation).
    index: AHashMap<String, AHashMap<String, Vec<usize>>>,
    plural_rule: Option<Arc<dyn PluralRule>>,
    include_unfinished: bool,
    include_obsolete: bool,
}

impl Catalog {
    /// Parse a `.ts` document with default options.
    ///
    /// Diagnostics are still emitted through `tracing`; use
    /// [`Catalog::parse`] to inspect them.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Parse`](crate::CatalogError::Parse) if the document
    /// is malformed.
    pub fn load(data: &str) -> Result<Self> {
        Self::parse(data, &LoadOptions::default()).map(|(catalog, _)| catalog)
    }

    /// Parse a `.ts` document and report what was skipped or flagged.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Parse`](crate::CatalogError::Parse) if the document
    /// is malformed.
    pub fn parse(data: &str, options: &LoadOptions) -> Result<(Self, LoadReport)> {
        let _span = tracing::debug_span!("catalog.load", bytes = data.len()).entered();
        let data = data.strip_prefix('\u{feff}').unwrap_or(data);
        let document = ts::read_document(data)?;
        Ok(Self::from_document(document, options))
    }

    /// Read and parse a `.ts` file.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Io`](crate::CatalogError::Io) if the file cannot be
    /// read, [`CatalogError::Parse`](crate::CatalogError::Parse) if it is
    /// malformed or not valid UTF-8.
    pub fn load_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<(Self, LoadReport)> {
        let bytes = std::fs::read(path.as_ref())?;
        let data = String::from_utf8(bytes).map_err(|err| {
            let offset = err.utf8_error().valid_up_to();
            CatalogError::parse(u64::try_from(offset).unwrap_or(u64::MAX), "invalid UTF-8")
        })?;
        Self::parse(&data, options)
    }

    /// Build a catalog from an already parsed document.
    #[must_use]
    pub fn from_document(document: TsDocument, options: &LoadOptions) -> (Self, LoadReport) {
        let mut report = LoadReport::default();
        let locale = options
            .locale
            .clone()
            .or_else(|| document.language.clone());
        let plural_rule = options.plural_rule.clone().or_else(|| {
            let tag = locale.as_deref()?;
            let family = PluralFamily::for_locale(tag);
            if family.is_none() {
                tracing::warn!(locale = tag, "no plural rule for locale");
                report.diagnostics.push(Diagnostic::UnknownLocale {
                    locale: tag.to_owned(),
                });
            }
            family.map(|family| Arc::new(family) as Arc<dyn PluralRule>)
        });

        let mut catalog = Self {
            version: document.version,
            language: document.language,
            source_language: document.source_language,
            entries: Vec::with_capacity(document.contexts.iter().map(|c| c.messages.len()).sum()),
            index: AHashMap::new(),
            plural_rule,
            include_unfinished: options.include_unfinished,
            include_obsolete: options.include_obsolete,
        };

        for TsContext { name, messages } in document.contexts {
            for (index, message) in messages.into_iter().enumerate() {
                let Some(mut entry) = into_entry(&name, message) else {
                    tracing::warn!(context = %name, index, "message without <source> skipped");
                    report.skipped += 1;
                    report.diagnostics.push(Diagnostic::MissingSource {
                        context: name.clone(),
                        index,
                    });
                    continue;
                };

                if let Some(rule) = &catalog.plural_rule
                    && entry.numerus
                    && !entry.forms.is_empty()
                    && entry.forms.len() != rule.form_count()
                {
                    tracing::warn!(
                        context = %entry.context,
                        source = %entry.source,
                        expected = rule.form_count(),
                        found = entry.forms.len(),
                        "plural form count mismatch"
                    );
                    entry.flagged = true;
                    report.diagnostics.push(Diagnostic::PluralFormMismatch {
                        context: entry.context.clone(),
                        source: entry.source.clone(),
                        expected: rule.form_count(),
                        found: entry.forms.len(),
                    });
                }

                catalog.insert(entry, options.duplicates, &mut report);
            }
        }

        tracing::debug!(
            entries = catalog.entries.len(),
            skipped = report.skipped,
            merged = report.merged,
            "catalog built"
        );
        (catalog, report)
    }

    fn insert(&mut self, entry: CatalogEntry, policy: DuplicatePolicy, report: &mut LoadReport) {
        if let Some(existing) = self.position(
            &entry.context,
            &entry.source,
            entry.disambiguation.as_deref(),
        ) {
            tracing::debug!(
                context = %entry.context,
                source = %entry.source,
                "duplicate entry collapsed"
            );
            report.merged += 1;
            report.diagnostics.push(Diagnostic::DuplicateEntry {
                context: entry.context.clone(),
                source: entry.source.clone(),
            });
            if policy == DuplicatePolicy::Merge {
                merge(&mut self.entries[existing], entry);
            }
            return;
        }

        let position = self.entries.len();
        self.index
            .entry(entry.context.clone())
            .or_default()
            .entry(entry.source.clone())
            .or_default()
            .push(position);
        self.entries.push(entry);
    }

    fn position(&self, context: &str, source: &str, disambiguation: Option<&str>) -> Option<usize> {
        let wanted = disambiguation.unwrap_or_default();
        self.index
            .get(context)?
            .get(source)?
            .iter()
            .copied()
            .find(|&i| self.entries[i].disambiguation.as_deref().unwrap_or_default() == wanted)
    }

    /// Resolve a message to its display string.
    ///
    /// Falls back to `source` when the key is unknown or no usable form
    /// exists. `%N` placeholders are returned untouched.
    #[must_use]
    pub fn resolve<'a>(&'a self, context: &str, source: &'a str, quantity: Option<i64>) -> &'a str {
        self.resolve_disambiguated(context, source, None, quantity)
    }

    /// Resolve a message carrying a disambiguation comment.
    ///
    /// When no entry has that disambiguation, the entry without one is
    /// used.
    #[must_use]
    pub fn resolve_disambiguated<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        disambiguation: Option<&str>,
        quantity: Option<i64>,
    ) -> &'a str {
        let entry = self.entry(context, source, disambiguation).or_else(|| {
            disambiguation
                .filter(|d| !d.is_empty())
                .and_then(|_| self.entry(context, source, None))
        });
        entry
            .and_then(|entry| self.select(entry, quantity))
            .unwrap_or(source)
    }

    /// The entry stored under an exact key.
    #[must_use]
    pub fn entry(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<&CatalogEntry> {
        self.position(context, source, disambiguation)
            .map(|i| &self.entries[i])
    }

    /// Pick the form to display, or `None` to fall back to the source.
    fn select<'a>(&self, entry: &'a CatalogEntry, quantity: Option<i64>) -> Option<&'a str> {
        if !self.is_usable(entry) {
            return None;
        }
        let form = match (entry.numerus, quantity, &self.plural_rule) {
            (true, Some(n), Some(rule)) => {
                let last = entry.forms.len().checked_sub(1)?;
                entry.forms.get(rule.form_index(n).min(last))?
            }
            (true, _, _) => entry.forms.iter().find(|form| !form.is_empty())?,
            (false, _, _) => entry.forms.first()?,
        };
        (!form.is_empty()).then_some(form.as_str())
    }

    fn is_usable(&self, entry: &CatalogEntry) -> bool {
        match entry.state {
            TranslationState::Finished => true,
            TranslationState::Unfinished => self.include_unfinished,
            TranslationState::Obsolete | TranslationState::Vanished => self.include_obsolete,
        }
    }

    fn is_translated(&self, entry: &CatalogEntry) -> bool {
        self.is_usable(entry) && !entry.is_untranslated()
    }

    /// Format version from the `<TS>` element.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Target locale from the `<TS>` element.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    /// The plural rule applied to numerus entries, if any.
    #[must_use]
    pub fn plural_rule(&self) -> Option<&dyn PluralRule> {
        self.plural_rule.as_deref()
    }

    /// Entries in document order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Context names in first-appearance order.
    #[must_use]
    pub fn contexts(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(self.index.len());
        let mut seen: AHashSet<&str> = AHashSet::with_capacity(self.index.len());
        for entry in &self.entries {
            if seen.insert(entry.context.as_str()) {
                names.push(entry.context.as_str());
            }
        }
        names
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Convert back into a document, grouping entries by context in
    /// first-appearance order.
    #[must_use]
    pub fn to_document(&self) -> TsDocument {
        let mut contexts: Vec<TsContext> = Vec::new();
        let mut slots: AHashMap<&str, usize> = AHashMap::new();
        for entry in &self.entries {
            let slot = *slots.entry(entry.context.as_str()).or_insert_with(|| {
                contexts.push(TsContext {
                    name: entry.context.clone(),
                    messages: Vec::new(),
                });
                contexts.len() - 1
            });
            contexts[slot].messages.push(TsMessage {
                source: Some(entry.source.clone()),
                disambiguation: entry.disambiguation.clone(),
                comment: entry.comment.clone(),
                translator_comment: entry.translator_comment.clone(),
                numerus: entry.numerus,
                forms: entry.forms.clone(),
                state: entry.state,
                locations: entry.locations.clone(),
            });
        }
        TsDocument {
            version: self.version.clone(),
            language: self.language.clone(),
            source_language: self.source_language.clone(),
            contexts,
        }
    }

    /// Serialize to `.ts` text.
    #[must_use]
    pub fn write(&self) -> String {
        ts::write_document(&self.to_document())
    }

    // -----------------------------------------------------------------
    // Coverage
    // -----------------------------------------------------------------

    /// Translation coverage overall and per context.
    ///
    /// Obsolete entries are counted as `retired` and excluded from `total`.
    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        let mut overall = CoverageCounts::default();
        let mut contexts: Vec<ContextCoverage> = Vec::new();
        let mut slots: AHashMap<&str, usize> = AHashMap::new();

        for entry in &self.entries {
            let slot = *slots.entry(entry.context.as_str()).or_insert_with(|| {
                contexts.push(ContextCoverage {
                    context: entry.context.clone(),
                    counts: CoverageCounts::default(),
                });
                contexts.len() - 1
            });
            let translated = self.is_translated(entry);
            overall.record(entry, translated);
            contexts[slot].counts.record(entry, translated);
        }

        overall.finish();
        for context in &mut contexts {
            context.counts.finish();
        }
        CoverageReport { overall, contexts }
    }
}

fn into_entry(context: &str, message: TsMessage) -> Option<CatalogEntry> {
    let TsMessage {
        source,
        disambiguation,
        comment,
        translator_comment,
        numerus,
        forms,
        state,
        locations,
    } = message;
    Some(CatalogEntry {
        context: context.to_owned(),
        source: source?,
        disambiguation: disambiguation.filter(|d| !d.is_empty()),
        comment,
        translator_comment,
        numerus,
        forms,
        state,
        locations,
        flagged: false,
    })
}

fn merge(existing: &mut CatalogEntry, incoming: CatalogEntry) {
    fn rank(state: TranslationState, forms: &[String]) -> (bool, bool) {
        (!state.is_retired(), forms.iter().any(|f| !f.is_empty()))
    }

    let CatalogEntry {
        comment,
        translator_comment,
        numerus,
        forms,
        state,
        locations,
        flagged,
        ..
    } = incoming;

    existing.locations.extend(locations);
    if rank(state, &forms) > rank(existing.state, &existing.forms) {
        existing.numerus = numerus;
        existing.forms = forms;
        existing.state = state;
        existing.flagged = flagged;
    }
    if existing.comment.is_none() {
        existing.comment = comment;
    }
    if existing.translator_comment.is_none() {
        existing.translator_comment = translator_comment;
    }
}

/// Coverage report for a catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub overall: CoverageCounts,
    /// Per-context counts in first-appearance order.
    pub contexts: Vec<ContextCoverage>,
}

/// Coverage of one context.
#[derive(Debug, Clone, Serialize)]
pub struct ContextCoverage {
    pub context: String,
    #[serde(flatten)]
    pub counts: CoverageCounts,
}

/// Entry counts and completion percentage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoverageCounts {
    /// Active (non-obsolete) entries.
    pub total: usize,
    pub translated: usize,
    pub untranslated: usize,
    pub plural: usize,
    pub flagged: usize,
    /// Obsolete and vanished entries.
    pub retired: usize,
    /// `translated / total` as a percentage (0.0–100.0).
    pub completion_percent: f32,
}

impl CoverageCounts {
    fn record(&mut self, entry: &CatalogEntry, translated: bool) {
        if entry.state.is_retired() {
            self.retired += 1;
            return;
        }
        self.total += 1;
        if translated {
            self.translated += 1;
        } else {
            self.untranslated += 1;
        }
        if entry.numerus {
            self.plural += 1;
        }
        if entry.flagged {
            self.flagged += 1;
        }
    }

    fn finish(&mut self) {
        self.completion_percent = if self.total == 0 {
            100.0
        } else {
            (self.translated as f32 / self.total as f32) * 100.0
        };
    }
}
