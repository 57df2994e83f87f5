//! Streaming `.ts` reader built on `quick-xml` events.
//!
//! Elements are classified by their parent, so a `<name>` only counts inside
//! a `<context>` and a `<numerusform>` only inside a `<translation>`.
//! Unknown elements are skipped together with their text.

use std::borrow::Cow;
use std::mem;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{TsContext, TsDocument, TsMessage};
use crate::error::{CatalogError, Result};
use crate::model::{Location, TranslationState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Ts,
    Context,
    Name,
    Message,
    Location,
    Source,
    Comment,
    ExtraComment,
    TranslatorComment,
    Translation,
    NumerusForm,
    LengthVariant,
    Other,
}

impl Tag {
    fn classify(parent: Option<Tag>, name: &[u8]) -> Option<Tag> {
        let tag = match (parent, name) {
            (None, b"TS") => Tag::Ts,
            (None, _) => return None,
            (Some(Tag::Ts), b"context") => Tag::Context,
            (Some(Tag::Context), b"name") => Tag::Name,
            (Some(Tag::Context), b"message") => Tag::Message,
            (Some(Tag::Message), b"location") => Tag::Location,
            (Some(Tag::Message), b"source") => Tag::Source,
            (Some(Tag::Message), b"comment") => Tag::Comment,
            (Some(Tag::Message), b"extracomment") => Tag::ExtraComment,
            (Some(Tag::Message), b"translatorcomment") => Tag::TranslatorComment,
            (Some(Tag::Message), b"translation") => Tag::Translation,
            (Some(Tag::Translation), b"numerusform") => Tag::NumerusForm,
            (Some(Tag::Translation | Tag::NumerusForm), b"lengthvariant") => Tag::LengthVariant,
            _ => Tag::Other,
        };
        Some(tag)
    }

    const fn collects_text(self) -> bool {
        matches!(
            self,
            Tag::Name
                | Tag::Source
                | Tag::Comment
                | Tag::ExtraComment
                | Tag::TranslatorComment
                | Tag::Translation
                | Tag::NumerusForm
                | Tag::LengthVariant
        )
    }
}

#[derive(Default)]
struct ContextBuilder {
    name: Option<String>,
    messages: Vec<TsMessage>,
}

#[derive(Default)]
struct TranslationBuilder {
    forms: Vec<String>,
    saw_numerus_form: bool,
    /// First `<lengthvariant>` of the element being read.
    variant: Option<String>,
}

/// Parse a `.ts` document.
///
/// # Errors
///
/// [`CatalogError::Parse`] when the markup is not well-formed, the root
/// element is not `<TS>`, the document ends inside an element, or a
/// `<context>` has no `<name>`.
pub fn read_document(data: &str) -> Result<TsDocument> {
    let mut reader = Reader::from_str(data);
    reader.config_mut().expand_empty_elements = true;

    let mut document: Option<TsDocument> = None;
    let mut stack: Vec<(Tag, String)> = Vec::new();
    let mut context: Option<ContextBuilder> = None;
    let mut message: Option<TsMessage> = None;
    let mut translation: Option<TranslationBuilder> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| CatalogError::parse(error_position(&reader), err.to_string()))?;

        match event {
            Event::Start(start) => {
                let parent = stack.last().map(|(tag, _)| *tag);
                if parent.is_none() && document.is_some() {
                    return Err(CatalogError::parse(
                        position(&reader),
                        "content after <TS> root element",
                    ));
                }
                let Some(tag) = Tag::classify(parent, start.name().as_ref()) else {
                    return Err(CatalogError::parse(
                        position(&reader),
                        format!(
                            "unexpected root element <{}>, expected <TS>",
                            String::from_utf8_lossy(start.name().as_ref())
                        ),
                    ));
                };

                match tag {
                    Tag::Ts => {
                        document = Some(TsDocument {
                            version: attribute(&reader, &start, b"version")?,
                            language: attribute(&reader, &start, b"language")?,
                            source_language: attribute(&reader, &start, b"sourcelanguage")?,
                            contexts: Vec::new(),
                        });
                    }
                    Tag::Context => context = Some(ContextBuilder::default()),
                    Tag::Message => {
                        let numerus = attribute(&reader, &start, b"numerus")?;
                        message = Some(TsMessage {
                            numerus: numerus.as_deref() == Some("yes"),
                            ..TsMessage::default()
                        });
                    }
                    Tag::Location => {
                        if let Some(msg) = message.as_mut() {
                            let filename = attribute(&reader, &start, b"filename")?;
                            let line = attribute(&reader, &start, b"line")?;
                            msg.locations.push(Location {
                                filename: filename.unwrap_or_default(),
                                line: line.and_then(|value| value.parse().ok()),
                            });
                        }
                    }
                    Tag::Translation => {
                        if let Some(msg) = message.as_mut() {
                            let kind = attribute(&reader, &start, b"type")?;
                            msg.state = kind
                                .as_deref()
                                .map_or(TranslationState::Finished, TranslationState::from_attr);
                        }
                        translation = Some(TranslationBuilder::default());
                    }
                    Tag::NumerusForm => {
                        if let Some(tr) = translation.as_mut() {
                            tr.saw_numerus_form = true;
                            tr.variant = None;
                        }
                    }
                    _ => {}
                }
                stack.push((tag, String::new()));
            }
            Event::Text(text) => {
                if let Some((tag, buffer)) = stack.last_mut()
                    && tag.collects_text()
                {
                    let value = text.unescape().map_err(|err| {
                        CatalogError::parse(position(&reader), err.to_string())
                    })?;
                    buffer.push_str(&value);
                }
            }
            Event::CData(cdata) => {
                if let Some((tag, buffer)) = stack.last_mut()
                    && tag.collects_text()
                {
                    let value = std::str::from_utf8(&cdata).map_err(|err| {
                        CatalogError::parse(position(&reader), err.to_string())
                    })?;
                    buffer.push_str(value);
                }
            }
            Event::End(_) => {
                let Some((tag, text)) = stack.pop() else {
                    return Err(CatalogError::parse(
                        position(&reader),
                        "closing tag without matching opening tag",
                    ));
                };
                match tag {
                    Tag::Ts => {}
                    Tag::Context => {
                        let finished = context.take().unwrap_or_default();
                        let Some(name) = finished.name else {
                            return Err(CatalogError::parse(
                                position(&reader),
                                "<context> without <name>",
                            ));
                        };
                        if let Some(doc) = document.as_mut() {
                            doc.contexts.push(TsContext {
                                name,
                                messages: finished.messages,
                            });
                        }
                    }
                    Tag::Name => {
                        if let Some(ctx) = context.as_mut() {
                            ctx.name = Some(text);
                        }
                    }
                    Tag::Message => {
                        if let (Some(ctx), Some(msg)) = (context.as_mut(), message.take()) {
                            ctx.messages.push(msg);
                        }
                    }
                    Tag::Source => set_field(&mut message, text, |msg| &mut msg.source),
                    Tag::Comment => set_field(&mut message, text, |msg| &mut msg.disambiguation),
                    Tag::ExtraComment => set_field(&mut message, text, |msg| &mut msg.comment),
                    Tag::TranslatorComment => {
                        set_field(&mut message, text, |msg| &mut msg.translator_comment);
                    }
                    Tag::LengthVariant => {
                        if let Some(tr) = translation.as_mut()
                            && tr.variant.is_none()
                        {
                            tr.variant = Some(text);
                        }
                    }
                    Tag::NumerusForm => {
                        if let Some(tr) = translation.as_mut() {
                            let form = tr.variant.take().unwrap_or(text);
                            tr.forms.push(form);
                        }
                    }
                    Tag::Translation => {
                        let mut tr = translation.take().unwrap_or_default();
                        if let Some(msg) = message.as_mut() {
                            msg.forms = if tr.saw_numerus_form && msg.numerus {
                                mem::take(&mut tr.forms)
                            } else {
                                // Singular messages hold at most one form.
                                let value = if tr.saw_numerus_form {
                                    mem::take(&mut tr.forms).into_iter().next().unwrap_or_default()
                                } else {
                                    tr.variant.take().unwrap_or(text)
                                };
                                let value = if msg.numerus && value.trim().is_empty() {
                                    String::new()
                                } else {
                                    value
                                };
                                if value.is_empty() {
                                    Vec::new()
                                } else {
                                    vec![value]
                                }
                            };
                        }
                    }
                    Tag::Location | Tag::Other => {}
                }
            }
            Event::Eof => break,
            // Declarations, DOCTYPE, comments and processing instructions
            // carry nothing the catalog needs.
            _ => {}
        }
    }

    if let Some((tag, _)) = stack.last() {
        return Err(CatalogError::parse(
            position(&reader),
            format!("document ended inside {tag:?} element"),
        ));
    }

    document.ok_or_else(|| CatalogError::parse(position(&reader), "missing <TS> root element"))
}

fn set_field(
    message: &mut Option<TsMessage>,
    text: String,
    field: impl FnOnce(&mut TsMessage) -> &mut Option<String>,
) {
    if let Some(msg) = message.as_mut() {
        *field(msg) = Some(text);
    }
}

fn attribute(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
    name: &[u8],
) -> Result<Option<String>> {
    for attr in start.attributes() {
        let attr = attr.map_err(|err| CatalogError::parse(position(reader), err.to_string()))?;
        if attr.key.as_ref() == name {
            let value: Cow<'_, str> = attr
                .unescape_value()
                .map_err(|err| CatalogError::parse(position(reader), err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn position(reader: &Reader<&[u8]>) -> u64 {
    u64::try_from(reader.buffer_position()).unwrap_or(u64::MAX)
}

fn error_position(reader: &Reader<&[u8]>) -> u64 {
    u64::try_from(reader.error_position()).unwrap_or(u64::MAX)
}
