//! Incremental HTML writer that tracks which block tags are open.
//!
//! The writer keeps a stack of open block tags. Opening a block whose tag is
//! already innermost is a no-op, which is how consecutive list items end up
//! sharing a single enclosing list. Blocks are always closed in reverse order
//! of opening.

use std::fmt;
use std::io::Write;

/// Deepest heading level HTML supports.
pub const MAX_HEADING_LEVEL: usize = 6;

#[derive(thiserror::Error, Debug)]
pub enum HtmlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("document was already finalized")]
    Finalized,
}

/// An HTML element the writer knows how to open and close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Html,
    Head,
    Base,
    Body,
    Paragraph,
    Heading(u8),
    Preformatted,
    UnorderedList,
    OrderedList,
    ListItem,
    DefinitionList,
    DefinitionTerm,
    DefinitionDetail,
}

impl Tag {
    /// Block tags that group list-like items.
    pub const LISTS: [Tag; 3] = [Tag::OrderedList, Tag::UnorderedList, Tag::DefinitionList];

    /// Heading tag for a marker of `level` hashes, clamped to `1..=6`.
    pub fn heading(level: usize) -> Self {
        Tag::Heading(level.clamp(1, MAX_HEADING_LEVEL) as u8)
    }

    pub fn is_list(self) -> bool {
        Self::LISTS.contains(&self)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Html => "HTML",
            Tag::Head => "HEAD",
            Tag::Base => "BASE",
            Tag::Body => "BODY",
            Tag::Paragraph => "P",
            Tag::Heading(level) => return write!(f, "H{level}"),
            Tag::Preformatted => "PRE",
            Tag::UnorderedList => "UL",
            Tag::OrderedList => "OL",
            Tag::ListItem => "LI",
            Tag::DefinitionList => "DL",
            Tag::DefinitionTerm => "DT",
            Tag::DefinitionDetail => "DD",
        };
        f.write_str(name)
    }
}

/// How an opened tag relates to the content that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Open<'a> {
    /// The block stays open for subsequent calls.
    Block,
    /// A self-closing element (`<P/>`, `<BASE .../>`); never pushed.
    Void,
    /// Open, write the text and close in one step; never pushed.
    Inline(&'a str),
}

/// Which open blocks a close call should end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Close {
    /// The innermost `n` blocks.
    Count(usize),
    /// Every open block.
    All,
    /// Everything down to and including the innermost block with this tag.
    To(Tag),
}

/// Append-only HTML writer bound to a single sink.
pub struct HtmlWriter<W: Write> {
    sink: W,
    open: Vec<Tag>,
    trace_comments: bool,
    finalized: bool,
}

impl<W: Write> HtmlWriter<W> {
    /// Create a writer and emit the doctype line.
    pub fn new(sink: W) -> Result<Self, HtmlError> {
        Self::with_trace_comments(sink, false)
    }

    /// Like [`HtmlWriter::new`], optionally annotating every call with an
    /// HTML comment. Useful when debugging how a document was classified.
    pub fn with_trace_comments(mut sink: W, trace_comments: bool) -> Result<Self, HtmlError> {
        writeln!(sink, "<!DOCTYPE html>")?;
        Ok(Self {
            sink,
            open: Vec::new(),
            trace_comments,
            finalized: false,
        })
    }

    /// The innermost open block, if any.
    pub fn active(&self) -> Option<Tag> {
        self.open.last().copied()
    }

    pub fn is_active(&self, tag: Tag) -> bool {
        self.active() == Some(tag)
    }

    /// Number of blocks currently open.
    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Write raw text without touching the tag stack.
    pub fn data(&mut self, text: &str) -> Result<(), HtmlError> {
        self.ensure_open()?;
        self.trace(format_args!("data(text={text:?})"))?;
        self.sink.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Start a block.
    ///
    /// If `tag` is already the innermost open block no opening markup is
    /// written. Attributes with a `None` or empty value are left out.
    pub fn open(
        &mut self,
        tag: Tag,
        attrs: &[(&str, Option<&str>)],
        content: Open<'_>,
    ) -> Result<(), HtmlError> {
        self.ensure_open()?;
        self.trace(format_args!("open(tag={tag}, content={content:?}, attrs={attrs:?})"))?;

        let continuing = self.is_active(tag);
        if !continuing {
            write!(self.sink, "<{tag}")?;
            for &(name, value) in attrs {
                if let Some(value) = value.filter(|v| !v.is_empty()) {
                    write!(self.sink, " {name}=\"{value}\"")?;
                }
            }
            match content {
                Open::Void => writeln!(self.sink, "/>")?,
                Open::Inline(_) => write!(self.sink, ">")?,
                Open::Block => writeln!(self.sink, ">")?,
            }
        }

        match content {
            Open::Void => {}
            Open::Inline(text) => writeln!(self.sink, "{text}</{tag}>")?,
            Open::Block if !continuing => self.open.push(tag),
            Open::Block => {}
        }
        Ok(())
    }

    /// Close open blocks.
    ///
    /// # Panics
    ///
    /// Panics if asked to close more blocks than are open. Callers are
    /// expected to keep opens and closes balanced.
    pub fn close(&mut self, close: Close) -> Result<(), HtmlError> {
        self.ensure_open()?;
        self.trace(format_args!("close({close:?})"))?;
        match close {
            Close::Count(n) => {
                for _ in 0..n {
                    self.pop()?;
                }
            }
            Close::All => {
                while !self.open.is_empty() {
                    self.pop()?;
                }
            }
            Close::To(tag) => {
                while self.active() != Some(tag) {
                    self.pop()?;
                }
                self.pop()?;
            }
        }
        Ok(())
    }

    /// Close innermost blocks while they belong to `tags` and `enabled` holds.
    ///
    /// An empty `tags` slice closes every open block, flushes the sink and
    /// finalizes the writer; any further call returns [`HtmlError::Finalized`].
    pub fn close_all(&mut self, tags: &[Tag], enabled: bool) -> Result<(), HtmlError> {
        self.ensure_open()?;
        self.trace(format_args!("close_all(tags={tags:?}, enabled={enabled})"))?;
        if tags.is_empty() {
            self.close(Close::All)?;
            self.sink.flush()?;
            self.finalized = true;
            return Ok(());
        }
        while enabled && self.active().is_some_and(|tag| tags.contains(&tag)) {
            self.pop()?;
        }
        Ok(())
    }

    /// Finalize the document (if not done already) and return the sink.
    pub fn finish(mut self) -> Result<W, HtmlError> {
        if !self.finalized {
            self.close_all(&[], true)?;
        }
        Ok(self.sink)
    }

    fn pop(&mut self) -> Result<(), HtmlError> {
        let Some(tag) = self.open.pop() else {
            panic!("attempted to close a block but none are open");
        };
        writeln!(self.sink, "</{tag}>")?;
        Ok(())
    }

    fn trace(&mut self, call: fmt::Arguments<'_>) -> Result<(), HtmlError> {
        if self.trace_comments {
            write!(self.sink, "\n  <!-- {call} -->\n")?;
        }
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), HtmlError> {
        if self.finalized {
            Err(HtmlError::Finalized)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(build: impl FnOnce(&mut HtmlWriter<Vec<u8>>) -> Result<(), HtmlError>) -> String {
        let mut html = HtmlWriter::new(Vec::new()).unwrap();
        build(&mut html).unwrap();
        String::from_utf8(html.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(Tag::UnorderedList.to_string(), "UL");
        assert_eq!(Tag::Heading(3).to_string(), "H3");
        assert_eq!(Tag::heading(9), Tag::Heading(6));
        assert_eq!(Tag::heading(0), Tag::Heading(1));
    }

    #[test]
    fn test_same_tag_continues_block() {
        let out = render(|html| {
            html.open(Tag::UnorderedList, &[], Open::Block)?;
            html.open(Tag::ListItem, &[], Open::Inline("one"))?;
            html.open(Tag::UnorderedList, &[], Open::Block)?;
            html.open(Tag::ListItem, &[], Open::Inline("two"))?;
            Ok(())
        });
        assert_eq!(out, "<!DOCTYPE html>\n<UL>\n<LI>one</LI>\n<LI>two</LI>\n</UL>\n");
    }

    #[test]
    fn test_void_tag_with_attributes() {
        let out = render(|html| {
            html.open(
                Tag::Base,
                &[("HREF", Some("file:///docs")), ("TARGET", None), ("ID", Some(""))],
                Open::Void,
            )
        });
        assert_eq!(out, "<!DOCTYPE html>\n<BASE HREF=\"file:///docs\"/>\n");
    }

    #[test]
    fn test_inline_tag_is_not_pushed() {
        let mut html = HtmlWriter::new(Vec::new()).unwrap();
        html.open(Tag::Heading(2), &[], Open::Inline("Title")).unwrap();
        assert_eq!(html.depth(), 0);
        let out = String::from_utf8(html.finish().unwrap()).unwrap();
        assert_eq!(out, "<!DOCTYPE html>\n<H2>Title</H2>\n");
    }

    #[test]
    fn test_close_to_named_ancestor() {
        let mut html = HtmlWriter::new(Vec::new()).unwrap();
        html.open(Tag::Html, &[], Open::Block).unwrap();
        html.open(Tag::Body, &[], Open::Block).unwrap();
        html.open(Tag::UnorderedList, &[], Open::Block).unwrap();
        html.close(Close::To(Tag::Body)).unwrap();
        assert_eq!(html.active(), Some(Tag::Html));
        html.close(Close::Count(1)).unwrap();
        assert_eq!(html.depth(), 0);
    }

    #[test]
    fn test_close_all_stops_at_non_member() {
        let mut html = HtmlWriter::new(Vec::new()).unwrap();
        html.open(Tag::Body, &[], Open::Block).unwrap();
        html.open(Tag::OrderedList, &[], Open::Block).unwrap();
        html.close_all(&Tag::LISTS, false).unwrap();
        assert!(html.is_active(Tag::OrderedList));
        html.close_all(&Tag::LISTS, true).unwrap();
        assert!(html.is_active(Tag::Body));
    }

    #[test]
    fn test_empty_tag_set_finalizes() {
        let mut html = HtmlWriter::new(Vec::new()).unwrap();
        html.open(Tag::Html, &[], Open::Block).unwrap();
        html.close_all(&[], true).unwrap();
        assert_eq!(html.depth(), 0);
        assert!(matches!(html.data("late"), Err(HtmlError::Finalized)));
        let out = String::from_utf8(html.finish().unwrap()).unwrap();
        assert_eq!(out, "<!DOCTYPE html>\n<HTML>\n</HTML>\n");
    }

    #[test]
    #[should_panic(expected = "none are open")]
    fn test_underflow_panics() {
        let mut html = HtmlWriter::new(Vec::new()).unwrap();
        let _ = html.close(Close::Count(1));
    }

    #[test]
    fn test_trace_comments() {
        let mut html = HtmlWriter::with_trace_comments(Vec::new(), true).unwrap();
        html.data("x").unwrap();
        let out = String::from_utf8(html.finish().unwrap()).unwrap();
        assert!(out.contains("<!-- data(text=\"x\") -->"));
    }
}
