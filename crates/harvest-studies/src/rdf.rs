//! Statement serialization: RDF/XML and N-Triples.

use std::borrow::Cow;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use harvest_core::{vocab, Object, Statement};

use crate::error::{Result, StudiesError};

// ── N-Triples ────────────────────────────────────────────────────

/// One statement as an N-Triples line (without the trailing newline).
pub fn serialize_statement(st: &Statement) -> String {
    let object = match &st.object {
        Object::Resource(uri) => format!("<{uri}>"),
        Object::Literal(text) => format!("\"{}\"", escape_literal(text)),
    };
    format!("<{}> <{}> {} .", st.subject, st.predicate, object)
}

pub fn to_ntriples(statements: &[Statement]) -> String {
    let mut out = String::new();
    for st in statements {
        out.push_str(&serialize_statement(st));
        out.push('\n');
    }
    out
}

fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            _ => out.push(c),
        }
    }
    out
}

// ── RDF/XML ──────────────────────────────────────────────────────

/// Serialize statements as an RDF/XML document.
///
/// Statements are grouped into one `rdf:Description` per subject, in order
/// of first appearance. Predicates outside the known prefixes get a local
/// namespace declaration on their element.
pub fn to_rdfxml(statements: &[Statement]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("rdf:RDF");
    for (prefix, ns) in vocab::PREFIXES {
        root.push_attribute((format!("xmlns:{prefix}").as_str(), ns));
    }
    write(&mut writer, Event::Start(root))?;

    for (subject, group) in group_by_subject(statements) {
        let mut desc = BytesStart::new("rdf:Description");
        desc.push_attribute(("rdf:about", subject));
        write(&mut writer, Event::Start(desc))?;

        for st in group {
            write_property(&mut writer, st)?;
        }

        write(&mut writer, Event::End(BytesEnd::new("rdf:Description")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("rdf:RDF")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| StudiesError::Output(e.to_string()))
}

fn write_property(writer: &mut Writer<Vec<u8>>, st: &Statement) -> Result<()> {
    let (qname, local_ns) = match vocab::compact(&st.predicate) {
        Some((prefix, local)) => (format!("{prefix}:{local}"), None),
        None => {
            let (ns, local) = vocab::split_namespace(&st.predicate).ok_or_else(|| {
                StudiesError::Output(format!(
                    "predicate {} cannot be written as an XML element name",
                    st.predicate
                ))
            })?;
            (format!("ns0:{local}"), Some(ns))
        }
    };

    let mut element = BytesStart::new(qname.as_str());
    if let Some(ns) = local_ns {
        element.push_attribute(("xmlns:ns0", ns));
    }

    match &st.object {
        Object::Resource(uri) => {
            element.push_attribute(("rdf:resource", uri.as_str()));
            write(writer, Event::Empty(element))
        }
        Object::Literal(text) => {
            write(writer, Event::Start(element))?;
            let text = xml_text(text);
            if let Cow::Owned(_) = text {
                tracing::warn!(
                    subject = %st.subject,
                    predicate = %st.predicate,
                    "Stripped characters not allowed in XML"
                );
            }
            write(writer, Event::Text(BytesText::new(&text)))?;
            write(writer, Event::End(BytesEnd::new(qname.as_str())))
        }
    }
}

/// Drop characters outside the XML 1.0 `Char` production.
fn xml_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| is_xml_char(*c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| StudiesError::Output(e.to_string()))
}

fn group_by_subject(statements: &[Statement]) -> Vec<(&str, Vec<&Statement>)> {
    let mut groups: Vec<(&str, Vec<&Statement>)> = Vec::new();
    for st in statements {
        match groups.iter_mut().find(|(s, _)| *s == st.subject) {
            Some((_, group)) => group.push(st),
            None => groups.push((st.subject.as_str(), vec![st])),
        }
    }
    groups
}
