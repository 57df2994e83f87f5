//! Qt `.ts` document model, reader, and writer.
//!
//! The document model mirrors the XML layout one to one (contexts in file
//! order, messages in context order) and performs no validation beyond
//! well-formedness. Skipping, merging, and plural checks happen when a
//! [`Catalog`](crate::Catalog) is built from a document.

mod reader;
mod writer;

pub use reader::read_document;
pub use writer::write_document;

use crate::model::{Location, TranslationState};

/// Format version written when a document carries none.
pub const DEFAULT_VERSION: &str = "2.1";

/// A parsed `.ts` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsDocument {
    pub version: Option<String>,
    /// Target locale (`language` attribute).
    pub language: Option<String>,
    pub source_language: Option<String>,
    pub contexts: Vec<TsContext>,
}

impl TsDocument {
    /// Total number of `<message>` elements.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|ctx| ctx.messages.len()).sum()
    }
}

/// A `<context>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsContext {
    pub name: String,
    pub messages: Vec<TsMessage>,
}

/// A `<message>` element as written, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsMessage {
    /// `None` when the element has no `<source>` child.
    pub source: Option<String>,
    pub disambiguation: Option<String>,
    pub comment: Option<String>,
    pub translator_comment: Option<String>,
    pub numerus: bool,
    pub forms: Vec<String>,
    pub state: TranslationState,
    pub locations: Vec<Location>,
}
