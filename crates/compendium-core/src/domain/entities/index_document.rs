//! The project README as a sequence of lines, and targeted section patching.
//!
//! Patching is a substring replacement over the line sequence, never a full
//! re-render: every line outside the target section is kept byte-for-byte,
//! including its own line terminator. User edits outside the section survive
//! any number of patches.
//!
//! ## Section boundaries
//!
//! A section starts at its heading and ends at the first later line that
//! either begins with the same heading marker (so `### Sub` ends a `##`
//! section) or is a heading of the same or a higher level. Lines inside
//! fenced code blocks are never headings.

use std::fmt;
use std::ops::Range;

/// `<marker> <text>` where the marker is `#` repeated `level` times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingPattern {
    level: usize,
    text: String,
}

impl HeadingPattern {
    /// # Panics
    /// Panics if `level` is not within 1..=6.
    pub fn new(level: usize, text: impl Into<String>) -> Self {
        assert!((1..=6).contains(&level), "heading level out of range: {level}");
        Self {
            level,
            text: text.into(),
        }
    }

    /// Parse `"## Studies"` style input.
    pub fn parse(s: &str) -> Option<Self> {
        let level = atx_level(s)?;
        let text = s[level..].trim();
        (!text.is_empty()).then(|| Self::new(level, text))
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn marker(&self) -> String {
        "#".repeat(self.level)
    }

    fn matches(&self, line: &str) -> bool {
        match line.strip_prefix(self.marker().as_str()) {
            Some(rest) => rest.starts_with([' ', '\t']) && rest.trim() == self.text,
            None => false,
        }
    }

    fn is_boundary(&self, line: &str) -> bool {
        line.starts_with(self.marker().as_str())
            || atx_level(line).is_some_and(|level| level <= self.level)
    }
}

impl fmt::Display for HeadingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.marker(), self.text)
    }
}

/// One heading and the lines it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading_text: String,
    pub heading_level: usize,
    /// Line indices, heading included, end exclusive.
    pub lines: Range<usize>,
}

impl Section {
    /// Lines after the heading.
    pub fn body(&self) -> Range<usize> {
        self.lines.start + 1..self.lines.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// What a patch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchStatus {
    /// The section body was replaced.
    Replaced { heading_line: usize },
    /// The section already had exactly this body.
    Unchanged { heading_line: usize },
    /// No heading matched; the document is untouched.
    NotFound,
}

/// Result of [`IndexDocument::patch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPatch {
    pub document: String,
    pub status: PatchStatus,
}

impl SectionPatch {
    pub fn changed(&self) -> bool {
        matches!(self.status, PatchStatus::Replaced { .. })
    }
}

/// A markdown document held as lines that keep their own terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDocument {
    lines: Vec<String>,
    line_ending: LineEnding,
}

impl IndexDocument {
    pub fn parse(text: &str) -> Self {
        let lines: Vec<String> = text.split_inclusive('\n').map(str::to_owned).collect();
        let line_ending = match lines.iter().find(|l| l.ends_with('\n')) {
            Some(l) if l.ends_with("\r\n") => LineEnding::CrLf,
            _ => LineEnding::Lf,
        };
        Self { lines, line_ending }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// All headings outside code fences, each owning the lines up to the next
    /// heading. Spans are contiguous and never overlap.
    pub fn sections(&self) -> Vec<Section> {
        let headings: Vec<(usize, usize, String)> = self
            .content_lines()
            .filter_map(|(idx, line)| {
                atx_level(line).map(|level| (idx, level, line[level..].trim().to_string()))
            })
            .collect();

        headings
            .iter()
            .enumerate()
            .map(|(i, (start, level, text))| Section {
                heading_text: text.clone(),
                heading_level: *level,
                lines: *start..headings.get(i + 1).map_or(self.lines.len(), |h| h.0),
            })
            .collect()
    }

    /// First section whose heading matches `pattern`.
    pub fn find(&self, pattern: &HeadingPattern) -> Option<Section> {
        let mut lines = self.content_lines();
        let start = lines.find(|(_, line)| pattern.matches(line))?.0;
        let end = lines
            .find(|(_, line)| pattern.is_boundary(line))
            .map_or(self.lines.len(), |(idx, _)| idx);

        Some(Section {
            heading_text: pattern.text().to_string(),
            heading_level: pattern.level(),
            lines: start..end,
        })
    }

    /// Replace the body of the section matching `pattern` with `new_body`.
    ///
    /// The heading line and everything outside the section are preserved.
    /// `new_body` lines are written with the document's line ending.
    pub fn patch(&self, pattern: &HeadingPattern, new_body: &str) -> SectionPatch {
        let Some(section) = self.find(pattern) else {
            return SectionPatch {
                document: self.to_string(),
                status: PatchStatus::NotFound,
            };
        };

        let eol = self.line_ending.as_str();
        let replacement: Vec<String> = new_body.lines().map(|l| format!("{l}{eol}")).collect();
        let heading_line = section.lines.start + 1;

        if self.lines[section.body()] == replacement[..] {
            return SectionPatch {
                document: self.to_string(),
                status: PatchStatus::Unchanged { heading_line },
            };
        }

        let mut heading = self.lines[section.lines.start].clone();
        if !heading.ends_with('\n') && !replacement.is_empty() {
            heading.push_str(eol);
        }

        let mut out = String::new();
        self.lines[..section.lines.start]
            .iter()
            .for_each(|l| out.push_str(l));
        out.push_str(&heading);
        replacement.iter().for_each(|l| out.push_str(l));
        self.lines[section.lines.end..]
            .iter()
            .for_each(|l| out.push_str(l));

        SectionPatch {
            document: out,
            status: PatchStatus::Replaced { heading_line },
        }
    }

    /// Lines outside fenced code blocks, terminators stripped.
    fn content_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        let mut fence: Option<char> = None;
        self.lines.iter().enumerate().filter_map(move |(idx, raw)| {
            let line = raw.trim_end_matches(['\n', '\r']);
            let trimmed = line.trim_start();
            for marker in ['`', '~'] {
                if trimmed.starts_with(&marker.to_string().repeat(3)) {
                    match fence {
                        None => fence = Some(marker),
                        Some(open) if open == marker => fence = None,
                        Some(_) => {}
                    }
                    return None;
                }
            }
            fence.is_none().then_some((idx, line))
        })
    }
}

impl fmt::Display for IndexDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.lines.iter().try_for_each(|l| f.write_str(l))
    }
}

/// Convenience wrapper over [`IndexDocument::patch`].
pub fn patch_section(document: &str, pattern: &HeadingPattern, new_body: &str) -> SectionPatch {
    IndexDocument::parse(document).patch(pattern, new_body)
}

/// ATX heading level of a line: 1-6 `#` followed by whitespace or nothing.
fn atx_level(line: &str) -> Option<usize> {
    let level = line.bytes().take_while(|b| *b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    match line[level..].chars().next() {
        None | Some(' ') | Some('\t') => Some(level),
        _ => None,
    }
}
