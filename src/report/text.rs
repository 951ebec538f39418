use std::fmt::Write;

use crate::error::{ReviewError, Result};

use super::{Renderer, ReviewDocument};

/// Plain-text renderer; the default report format. Output is a pure
/// function of the document, so cached reruns reproduce it byte for
/// byte.
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, doc: &ReviewDocument) -> Result<String> {
        let mut out = String::new();
        render_into(&mut out, doc).map_err(|e| ReviewError::Renderer(e.to_string()))?;
        Ok(out)
    }
}

fn render_into(out: &mut String, doc: &ReviewDocument) -> std::fmt::Result {
    writeln!(out, "Package review: {}", doc.package)?;
    writeln!(out)?;
    writeln!(out, "Legend: [x] pass, [!] fail, [?] pending, [-] not applicable,")?;
    writeln!(out, "        [ ] manual review needed, [E] check error")?;

    if let Some(error) = &doc.error {
        writeln!(out)?;
        writeln!(out, "ERROR: {error}")?;
    }

    for section in &doc.sections {
        writeln!(out)?;
        writeln!(out, "==== {} ====", section.title)?;
        for entry in &section.entries {
            writeln!(out, "{}: {}", entry.outcome.glyph(), entry.text)?;
            if let Some(message) = &entry.message {
                writeln!(out, "     Note: {message}")?;
            }
            if !entry.url.is_empty() {
                writeln!(out, "     See: {}", entry.url)?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "==== Applicable groups ====")?;
    for status in &doc.groups {
        let answer = if status.applicable { "yes" } else { "no" };
        writeln!(out, "{}: {answer}", status.group)?;
    }

    if !doc.checksums.is_empty() {
        writeln!(out)?;
        writeln!(out, "==== Source checksums (sha256) ====")?;
        for checksum in &doc.checksums {
            writeln!(out, "{}  {}", checksum.sha256, checksum.file)?;
        }
    }

    if !doc.rpmlint.is_empty() {
        writeln!(out)?;
        writeln!(out, "==== Rpmlint ====")?;
        writeln!(out, "{}", doc.rpmlint.trim_end())?;
    }

    for attachment in &doc.attachments {
        writeln!(out)?;
        writeln!(out, "==== {} ====", attachment.title)?;
        writeln!(out, "{}", attachment.content.trim_end())?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
