use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

// A line is a header iff it carries 1-6 marker characters, whitespace, and
// a non-empty title. Seven or more markers never match.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());

/// A titled, leveled span of a memory document.
///
/// A span runs from its header line to the line before the next header (of
/// any level) or the end of the document. `content` is derived from the
/// line span at scan time; it excludes the header line and is trimmed.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    /// Trimmed header title, original casing preserved
    pub title: String,
    /// Header depth 1-6, the count of marker characters
    pub level: u8,
    /// Text strictly between this header and the next, trimmed
    pub content: String,
    /// Zero-based line index of the header line
    pub start_line: usize,
    /// Zero-based inclusive line index of the span's last line
    pub end_line: usize,
}

impl Section {
    /// Number of lines the span covers past its header.
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line
    }
}

/// Scan a document into its ordered section list.
///
/// Splits on `\n` only; CRLF input is normalized by the store before it
/// reaches the scanner. Lines before the first header belong to no
/// section. Text with no header lines scans to an empty list.
pub fn scan(text: &str) -> Vec<Section> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut sections: Vec<Section> = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let Some(caps) = HEADER_RE.captures(line) else {
            continue;
        };

        // A new header closes the previous open section.
        if let Some(open) = sections.last_mut() {
            open.end_line = idx - 1;
            open.content = lines[open.start_line + 1..idx].join("\n").trim().to_string();
        }

        sections.push(Section {
            title: caps[2].trim().to_string(),
            level: caps[1].len() as u8,
            content: String::new(),
            start_line: idx,
            end_line: lines.len() - 1,
        });
    }

    // The last section stays open to the end of the document.
    if let Some(open) = sections.last_mut() {
        open.content = lines[open.start_line + 1..].join("\n").trim().to_string();
    }

    sections
}

/// Find the first section whose title matches case-insensitively.
pub fn find<'a>(sections: &'a [Section], title: &str) -> Option<&'a Section> {
    let needle = title.to_lowercase();
    sections.iter().find(|s| s.title.to_lowercase() == needle)
}

/// All section titles in document order, for not-found hints.
pub fn titles(sections: &[Section]) -> Vec<String> {
    sections.iter().map(|s| s.title.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_header_detection() {
        // (line, matches as header)
        let cases = vec![
            ("# Title", true),
            ("###### Deep", true),
            ("####### Too deep", false),
            ("#NoSpace", false),
            ("#", false),
            ("# ", false),
            ("#\tTabbed", true),
            ("##   Padded title", true),
            ("text # not a header", false),
            ("", false),
        ];

        for (line, want) in cases {
            let got = !scan(line).is_empty();
            assert_eq!(got, want, "scan({:?}) header match = {}, want {}", line, got, want);
        }
    }

    #[test]
    fn test_scan_orders_sections_by_occurrence() {
        let text = "# One\n\n### Three\nbody\n\n## Two\n";
        let titles: Vec<String> = scan(text).into_iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["One", "Three", "Two"]);
    }

    #[test]
    fn test_scan_levels_and_spans() {
        let text = "# Agent Skills\n\n## Skills\n- Python\n\n## Recent Work\n- Did X";
        let sections = scan(text);
        assert_eq!(sections.len(), 3);

        assert_eq!(sections[0].title, "Agent Skills");
        assert_eq!(sections[0].level, 1);
        assert_eq!(sections[0].content, "");
        assert_eq!((sections[0].start_line, sections[0].end_line), (0, 1));

        assert_eq!(sections[1].title, "Skills");
        assert_eq!(sections[1].level, 2);
        assert_eq!(sections[1].content, "- Python");
        assert_eq!((sections[1].start_line, sections[1].end_line), (2, 4));

        assert_eq!(sections[2].title, "Recent Work");
        assert_eq!(sections[2].level, 2);
        assert_eq!(sections[2].content, "- Did X");
        assert_eq!((sections[2].start_line, sections[2].end_line), (5, 6));
    }

    #[test]
    fn test_scan_preamble_belongs_to_no_section() {
        let text = "loose preamble text\nmore preamble\n\n## First\ncontent\n";
        let sections = scan(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "First");
        assert_eq!(sections[0].start_line, 3);
    }

    #[test]
    fn test_scan_no_headers_yields_empty() {
        assert!(scan("").is_empty());
        assert!(scan("just some text\nwith lines\n").is_empty());
    }

    #[test]
    fn test_scan_adjacent_headers() {
        let text = "# A\n## B\ncontent";
        let sections = scan(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].content, "");
        assert_eq!((sections[0].start_line, sections[0].end_line), (0, 0));
        assert_eq!(sections[1].content, "content");
    }

    #[test]
    fn test_scan_content_is_trimmed() {
        let text = "## Notes\n\n  hello  \n\n\n## Next\n";
        let sections = scan(text);
        assert_eq!(sections[0].content, "hello");
    }

    #[test]
    fn test_scan_is_deterministic() {
        let text = "# A\nbody\n\n## B\nmore\n";
        let first = scan(text);
        let second = scan(text);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.title, b.title);
            assert_eq!(a.content, b.content);
            assert_eq!((a.start_line, a.end_line), (b.start_line, b.end_line));
        }
    }

    #[test]
    fn test_find_is_case_insensitive_and_first_match() {
        let text = "## Recent Work\n- a\n\n## recent work\n- b\n";
        let sections = scan(text);

        let hit = find(&sections, "RECENT WORK").expect("lookup failed");
        assert_eq!(hit.title, "Recent Work", "first match wins on duplicates");
        assert_eq!(hit.content, "- a");

        assert!(find(&sections, "missing").is_none());
    }

    #[test]
    fn test_titles_in_document_order() {
        let text = "## B\n\n## A\n\n## C\n";
        assert_eq!(titles(&scan(text)), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_line_count() {
        let text = "## Skills\n- Python\n- Rust\n\n## Next\n";
        let sections = scan(text);
        assert_eq!(sections[0].line_count(), 3);
        assert_eq!(sections[0].end_line - sections[0].start_line, 3);
    }
}
