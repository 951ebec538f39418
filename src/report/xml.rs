use std::fmt::Write;

use crate::error::{ReviewError, Result};

use super::{Renderer, ReviewDocument};

/// Structured renderer for tooling that postprocesses reviews. The
/// format is flat enough to hand-roll; escaping covers the five XML
/// entities.
pub struct XmlRenderer;

impl Renderer for XmlRenderer {
    fn extension(&self) -> &'static str {
        "xml"
    }

    fn render(&self, doc: &ReviewDocument) -> Result<String> {
        let mut out = String::new();
        render_into(&mut out, doc).map_err(|e| ReviewError::Renderer(e.to_string()))?;
        Ok(out)
    }
}

fn render_into(out: &mut String, doc: &ReviewDocument) -> std::fmt::Result {
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(out, r#"<review package="{}">"#, escape(&doc.package))?;

    if let Some(error) = &doc.error {
        writeln!(out, "  <error>{}</error>", escape(error))?;
    }

    for section in &doc.sections {
        writeln!(out, r#"  <section title="{}">"#, escape(&section.title))?;
        for entry in &section.entries {
            writeln!(
                out,
                r#"    <check name="{}" group="{}" kind="{}" outcome="{}" url="{}">"#,
                escape(&entry.name),
                escape(&entry.group),
                entry.kind,
                entry.outcome,
                escape(&entry.url),
            )?;
            writeln!(out, "      <text>{}</text>", escape(&entry.text))?;
            if let Some(message) = &entry.message {
                writeln!(out, "      <message>{}</message>", escape(message))?;
            }
            writeln!(out, "    </check>")?;
        }
        writeln!(out, "  </section>")?;
    }

    writeln!(out, "  <groups>")?;
    for status in &doc.groups {
        writeln!(
            out,
            r#"    <group name="{}" applicable="{}"/>"#,
            escape(&status.group),
            status.applicable,
        )?;
    }
    writeln!(out, "  </groups>")?;

    if !doc.checksums.is_empty() {
        writeln!(out, "  <sources>")?;
        for checksum in &doc.checksums {
            writeln!(
                out,
                r#"    <source file="{}" sha256="{}"/>"#,
                escape(&checksum.file),
                checksum.sha256,
            )?;
        }
        writeln!(out, "  </sources>")?;
    }

    if !doc.rpmlint.is_empty() {
        writeln!(out, "  <rpmlint>{}</rpmlint>", escape(doc.rpmlint.trim_end()))?;
    }

    for attachment in &doc.attachments {
        writeln!(
            out,
            r#"  <attachment title="{}">{}</attachment>"#,
            escape(&attachment.title),
            escape(attachment.content.trim_end()),
        )?;
    }

    writeln!(out, "</review>")
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "xml_tests.rs"]
mod tests;
