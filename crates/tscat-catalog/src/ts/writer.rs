//! `.ts` serializer producing the layout `lupdate` writes.

use std::fmt::Write as _;

use quick_xml::escape::escape;

use super::{DEFAULT_VERSION, TsDocument, TsMessage};

const INDENT: &str = "    ";

/// Serialize a document.
///
/// Output uses four-space indentation, never self-closes `<translation>`,
/// and always writes the `<!DOCTYPE TS>` line.
#[must_use]
pub fn write_document(doc: &TsDocument) -> String {
    let mut out = String::with_capacity(256 + doc.message_count() * 192);
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<!DOCTYPE TS>\n");

    out.push_str("<TS version=\"");
    out.push_str(&escape(doc.version.as_deref().unwrap_or(DEFAULT_VERSION)));
    out.push('"');
    if let Some(language) = &doc.language {
        let _ = write!(out, " language=\"{}\"", escape(language));
    }
    if let Some(source_language) = &doc.source_language {
        let _ = write!(out, " sourcelanguage=\"{}\"", escape(source_language));
    }
    out.push_str(">\n");

    for context in &doc.contexts {
        out.push_str("<context>\n");
        element(&mut out, 1, "name", &context.name);
        for message in &context.messages {
            write_message(&mut out, message);
        }
        out.push_str("</context>\n");
    }

    out.push_str("</TS>\n");
    out
}

fn write_message(out: &mut String, msg: &TsMessage) {
    out.push_str(INDENT);
    if msg.numerus {
        out.push_str("<message numerus=\"yes\">\n");
    } else {
        out.push_str("<message>\n");
    }

    for location in &msg.locations {
        indent(out, 2);
        let _ = write!(out, "<location filename=\"{}\"", escape(&location.filename));
        if let Some(line) = location.line {
            let _ = write!(out, " line=\"{line}\"");
        }
        out.push_str("/>\n");
    }

    if let Some(source) = &msg.source {
        element(out, 2, "source", source);
    }
    if let Some(disambiguation) = &msg.disambiguation {
        element(out, 2, "comment", disambiguation);
    }
    if let Some(comment) = &msg.comment {
        element(out, 2, "extracomment", comment);
    }
    if let Some(note) = &msg.translator_comment {
        element(out, 2, "translatorcomment", note);
    }

    indent(out, 2);
    out.push_str("<translation");
    if let Some(kind) = msg.state.as_attr() {
        let _ = write!(out, " type=\"{kind}\"");
    }
    out.push('>');
    if msg.numerus && !msg.forms.is_empty() {
        out.push('\n');
        for form in &msg.forms {
            element(out, 3, "numerusform", form);
        }
        indent(out, 2);
    } else if let Some(text) = msg.forms.first() {
        out.push_str(&escape(text));
    }
    out.push_str("</translation>\n");

    out.push_str(INDENT);
    out.push_str("</message>\n");
}

fn element(out: &mut String, depth: usize, name: &str, text: &str) {
    indent(out, depth);
    let _ = writeln!(out, "<{name}>{}</{name}>", escape(text));
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
