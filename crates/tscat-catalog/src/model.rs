//! Catalog entry types.

use serde::Serialize;

/// Source-file provenance of a message. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub filename: String,
    pub line: Option<u32>,
}

impl Location {
    #[must_use]
    pub fn new(filename: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            filename: filename.into(),
            line,
        }
    }
}

/// The `type` attribute of a `<translation>` element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationState {
    /// No `type` attribute: the translator marked the entry done.
    #[default]
    Finished,
    Unfinished,
    /// The source string no longer exists in code.
    Obsolete,
    /// Like `Obsolete`, written by newer `lupdate` versions.
    Vanished,
}

impl TranslationState {
    /// Parse a `type` attribute value. Unknown values read as `Finished`.
    #[must_use]
    pub fn from_attr(value: &str) -> Self {
        match value {
            "unfinished" => Self::Unfinished,
            "obsolete" => Self::Obsolete,
            "vanished" => Self::Vanished,
            _ => Self::Finished,
        }
    }

    /// The attribute value to write, or `None` for `Finished`.
    #[must_use]
    pub const fn as_attr(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
            Self::Vanished => Some("vanished"),
        }
    }

    #[must_use]
    pub const fn is_retired(self) -> bool {
        matches!(self, Self::Obsolete | Self::Vanished)
    }
}

/// One translatable message of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub context: String,
    pub source: String,
    /// Qt's `<comment>`: tells apart identical source strings in one context.
    pub disambiguation: Option<String>,
    /// Developer note for translators (`<extracomment>`).
    pub comment: Option<String>,
    pub translator_comment: Option<String>,
    pub numerus: bool,
    pub forms: Vec<String>,
    pub state: TranslationState,
    pub locations: Vec<Location>,
    /// Set when a plural entry's form count disagrees with the locale rule.
    pub flagged: bool,
}

impl CatalogEntry {
    /// A non-plural entry with no translation yet.
    #[must_use]
    pub fn new(context: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
            disambiguation: None,
            comment: None,
            translator_comment: None,
            numerus: false,
            forms: Vec::new(),
            state: TranslationState::Unfinished,
            locations: Vec::new(),
            flagged: false,
        }
    }

    /// True when no form carries translator-supplied text.
    #[must_use]
    pub fn is_untranslated(&self) -> bool {
        self.forms.iter().all(String::is_empty)
    }
}
