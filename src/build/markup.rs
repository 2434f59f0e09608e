//! Line-oriented conversion of a markup document to HTML.
//!
//! Each line is classified on its own and turned into writer calls. The only
//! state carried between lines is the writer's stack of open blocks: whether
//! a preformatted block is open, and whether a list is innermost.

use std::io::Write;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use super::html::{Close, HtmlError, HtmlWriter, Open, Tag};
use super::inline;
use crate::diagnostics::Diagnostics;

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#+)[ \t]").expect("heading pattern"));
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[*-][ \t]+(.+)").expect("bullet pattern"));
static NUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.[ \t]+(.+)").expect("numbered pattern"));
static DEFINITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[*-][ \t]+(.+):[ \t]+(.+)").expect("definition pattern"));

/// A markup document loaded into memory.
#[derive(Debug, Clone)]
pub struct Document {
    /// Where the document was read from
    pub source: PathBuf,
    /// Value of the page's `<BASE HREF>`
    pub base: String,
    /// Raw lines, each keeping its line terminator
    lines: Vec<String>,
}

impl Document {
    /// Read a document from disk.
    ///
    /// A file that is not valid UTF-8 does not fail the build: an error is
    /// reported and the document is replaced by a two-line placeholder naming
    /// the problem.
    pub fn load(source: &Path, base: &str, diagnostics: &Diagnostics) -> std::io::Result<Self> {
        let bytes = std::fs::read(source)?;
        let lines = match String::from_utf8(bytes) {
            Ok(text) => split_lines(&text),
            Err(e) => {
                let reason = e.utf8_error().to_string();
                diagnostics.error(format_args!("{} (InvalidUtf8) {}", source.display(), reason));
                vec!["InvalidUtf8\n".to_string(), format!("{reason}\n")]
            }
        };

        Ok(Self {
            source: source.to_path_buf(),
            base: base.to_string(),
            lines,
        })
    }

    /// Build a document from text already in memory.
    #[cfg(test)]
    pub fn from_text(source: impl Into<PathBuf>, text: &str, base: &str) -> Self {
        Self {
            source: source.into(),
            base: base.to_string(),
            lines: split_lines(text),
        }
    }

    #[cfg(test)]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Convert the document, writing the complete page to `sink`.
    pub fn convert<W: Write>(&self, sink: W, trace_comments: bool) -> Result<W, HtmlError> {
        let mut html = HtmlWriter::with_trace_comments(sink, trace_comments)?;
        self.write_html(&mut html)?;
        html.finish()
    }

    /// Convert the document to a string.
    #[cfg(test)]
    pub fn to_html(&self) -> Result<String, HtmlError> {
        let bytes = self.convert(Vec::new(), false)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write the page shell and body into `html`, leaving it finalized.
    pub fn write_html<W: Write>(&self, html: &mut HtmlWriter<W>) -> Result<(), HtmlError> {
        html.open(Tag::Html, &[], Open::Block)?;
        html.open(Tag::Head, &[], Open::Block)?;
        html.open(Tag::Base, &[("HREF", Some(self.base.as_str()))], Open::Void)?;
        html.close(Close::To(Tag::Head))?;
        html.open(Tag::Body, &[], Open::Block)?;

        for line in &self.lines {
            write_line(html, line)?;
        }

        html.close(Close::To(Tag::Body))?;
        html.close_all(&[], true)
    }
}

/// Split text into lines, keeping each line's terminator.
fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// What a trimmed line looks like, independent of the surrounding blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    /// A run of three or more `~`
    Fence,
    Heading { level: usize, text: &'a str },
    Bullet(&'a str),
    Numbered(&'a str),
    Definition { term: &'a str, detail: &'a str },
    Text,
}

/// Classify a trimmed line. First match wins, in the order: heading, fence,
/// bullet, numbered, definition.
///
/// Because the bullet pattern accepts everything the definition pattern
/// does, a `- term: detail` line is always a bullet. Existing documents rely
/// on that, so the ordering stays.
pub fn classify(stripped: &str) -> LineKind<'_> {
    if stripped.is_empty() {
        return LineKind::Blank;
    }
    if let Some(caps) = HEADING.captures(stripped) {
        let marker = caps.get(1).map_or(0, |m| m.len());
        return LineKind::Heading {
            level: marker,
            text: stripped[marker..].trim_start(),
        };
    }
    if is_fence(stripped) {
        return LineKind::Fence;
    }
    if let Some(item) = BULLET.captures(stripped).and_then(|caps| caps.get(1)) {
        return LineKind::Bullet(item.as_str());
    }
    if let Some(item) = NUMBERED.captures(stripped).and_then(|caps| caps.get(1)) {
        return LineKind::Numbered(item.as_str());
    }
    if let Some(caps) = DEFINITION.captures(stripped)
        && let (Some(term), Some(detail)) = (caps.get(1), caps.get(2))
    {
        return LineKind::Definition {
            term: term.as_str(),
            detail: detail.as_str(),
        };
    }
    LineKind::Text
}

fn is_fence(stripped: &str) -> bool {
    stripped.starts_with("~~~") && stripped.chars().all(|c| c == '~')
}

fn in_list<W: Write>(html: &HtmlWriter<W>) -> bool {
    html.active().is_some_and(Tag::is_list)
}

/// Process one raw line (terminator included).
fn write_line<W: Write>(html: &mut HtmlWriter<W>, line: &str) -> Result<(), HtmlError> {
    let stripped = line.trim();

    // Inside a preformatted block only a fence means anything.
    if html.is_active(Tag::Preformatted) {
        return if is_fence(stripped) {
            html.close(Close::Count(1))
        } else {
            html.data(line)
        };
    }

    match classify(stripped) {
        LineKind::Blank if !in_list(html) => html.open(Tag::Paragraph, &[], Open::Void),
        LineKind::Blank | LineKind::Text => {
            html.close_all(&Tag::LISTS, !stripped.is_empty())?;
            html.data(&inline::transform(line))
        }
        kind => write_block(html, kind),
    }
}

/// Emit a structural line: heading, fence or list item.
fn write_block<W: Write>(html: &mut HtmlWriter<W>, kind: LineKind<'_>) -> Result<(), HtmlError> {
    match kind {
        LineKind::Heading { level, text } => {
            html.close_all(&Tag::LISTS, true)?;
            html.open(Tag::heading(level), &[], Open::Inline(&inline::transform(text)))
        }
        LineKind::Fence => html.open(Tag::Preformatted, &[], Open::Block),
        LineKind::Bullet(item) => {
            html.open(Tag::UnorderedList, &[], Open::Block)?;
            html.open(Tag::ListItem, &[], Open::Inline(&inline::transform(item)))
        }
        LineKind::Numbered(item) => {
            html.open(Tag::OrderedList, &[], Open::Block)?;
            html.open(Tag::ListItem, &[], Open::Inline(&inline::transform(item)))
        }
        LineKind::Definition { term, detail } => {
            html.open(Tag::DefinitionList, &[], Open::Block)?;
            html.open(Tag::DefinitionTerm, &[], Open::Inline(&inline::transform(term)))?;
            html.open(Tag::DefinitionDetail, &[], Open::Inline(&inline::transform(detail)))
        }
        LineKind::Blank | LineKind::Text => Ok(()),
    }
}
