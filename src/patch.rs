//! Section upsert: replace a titled span in place, or append a new block
//! at the end of the document.

use crate::section::{self, Section};

/// Canonical block for a section: header line, one blank line, content.
fn render_block(title: &str, content: &str, level: u8) -> String {
    format!("{} {}\n\n{}", "#".repeat(level as usize), title, content)
}

/// Create or replace the section named `title`.
///
/// The first section whose title matches case-insensitively is replaced in
/// place; every line outside its span keeps its position and bytes. With
/// no match the block is appended after one blank line. The header is
/// written with the caller-supplied title casing and level. Re-running
/// with identical arguments returns byte-identical output.
///
/// `level` must already be validated to 1..=6 at the boundary; the patcher
/// does not clamp.
pub fn upsert(text: &str, title: &str, content: &str, level: u8) -> String {
    let sections = section::scan(text);
    let block = render_block(title, content, level);

    match section::find(&sections, title) {
        Some(target) => replace_span(text, target, &block),
        None => append_block(text, &block),
    }
}

/// Splice `block` over the lines spanned by `target`, inclusive. Trailing
/// blank lines inside the old span are discarded with it.
fn replace_span(text: &str, target: &Section, block: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();

    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    out.extend_from_slice(&lines[..target.start_line]);
    out.extend(block.split('\n'));

    if target.end_line + 1 < lines.len() {
        out.extend_from_slice(&lines[target.end_line + 1..]);
        out.join("\n")
    } else {
        // Span ran to end of document: close with the same single trailing
        // newline the append path writes, so repeated upserts of a final
        // section stay byte-identical.
        let mut patched = out.join("\n");
        patched.push('\n');
        patched
    }
}

/// Append `block` after the right-trimmed document, separated by one blank
/// line and closed with a single trailing newline. An empty document gets
/// the block alone.
fn append_block(text: &str, block: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        format!("{}\n", block)
    } else {
        format!("{}\n\n{}\n", trimmed, block)
    }
}
