//! Inline markup: emphasis, code spans, links and embedded media.
//!
//! Rules are applied one after another to the whole line, each as a global
//! substitution. The order matters: later rules see the HTML produced by
//! earlier ones.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// Name of the frame that generated links open in.
pub const CONTENT_FRAME: &str = "content";

static RULES: Lazy<Vec<InlineRule>> = Lazy::new(|| {
    vec![
        InlineRule::new("italic", r"\*([^*]+)\*", "<I>${1}</I>").isolated('*'),
        InlineRule::new("bold", r"\*\*([^*]+)\*\*", "<B>${1}</B>"),
        InlineRule::new("code", r"`([^`]+)`", "<CODE>${1}</CODE>"),
        InlineRule::new("underline", r"__([^_]+)__", "<U>${1}</U>"),
        InlineRule::new(
            "link",
            r"\[([^\]]+)\]\(([^)]+)\)",
            r#"<A HREF="${2}" TARGET="content">${1}</A>"#,
        ),
        InlineRule::new(
            "internal_link",
            r"\[\[/(.+)\]\]",
            r#"<A HREF="${1}.html" TARGET="content">/${1}</A>"#,
        ),
        InlineRule::new(
            "button",
            r"\(\(([^)]+)\)\)",
            r#"<A HREF="${1}.html" TARGET="content"><INPUT TYPE="submit" CLASS="header" VALUE="${1}"/></A>"#,
        ),
        InlineRule::new(
            "image",
            r"\[image:([^\]]*)\]",
            r#"<IMG SRC="${1}" ALT="${1}" WIDTH="100%"/>"#,
        ),
        InlineRule::new(
            "video",
            r"\[video:([^\]]*)\]",
            r#"<iframe width="560" height="315" src="https://www.youtube.com/embed/${1}" frameborder="0" allow="accelerometer; autoplay; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe>"#,
        ),
    ]
});

/// A single whole-line substitution.
struct InlineRule {
    name: &'static str,
    pattern: Regex,
    replacement: &'static str,
    /// When set, matches whose delimiter sits directly next to another copy
    /// of the same character are skipped (`**x**` is not italic).
    isolated: Option<char>,
}

impl InlineRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        let pattern = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("inline rule '{name}' has an invalid pattern: {e}"));
        Self {
            name,
            pattern,
            replacement,
            isolated: None,
        }
    }

    fn isolated(mut self, delimiter: char) -> Self {
        self.isolated = Some(delimiter);
        self
    }

    fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match self.isolated {
            None => self.pattern.replace_all(text, self.replacement),
            Some(delimiter) => self.replace_isolated(text, delimiter),
        }
    }

    fn replace_isolated<'t>(&self, text: &'t str, delimiter: char) -> Cow<'t, str> {
        let mut out = String::new();
        let mut copied = 0;
        let mut search = 0;

        while let Some(caps) = self.pattern.captures_at(text, search) {
            let Some(whole) = caps.get(0) else { break };
            let before = text[..whole.start()].chars().next_back();
            let after = text[whole.end()..].chars().next();

            if before == Some(delimiter) || after == Some(delimiter) {
                // Retry one delimiter further along so overlapping
                // candidates are still considered.
                search = whole.start() + delimiter.len_utf8();
                continue;
            }

            out.push_str(&text[copied..whole.start()]);
            caps.expand(self.replacement, &mut out);
            copied = whole.end();
            search = whole.end();
        }

        if copied == 0 {
            return Cow::Borrowed(text);
        }
        out.push_str(&text[copied..]);
        Cow::Owned(out)
    }
}

/// Convert the inline markup in a single line to HTML.
///
/// Whitespace, including a trailing newline, is carried through unchanged.
pub fn transform(line: &str) -> String {
    let mut text = line.to_string();
    for rule in RULES.iter() {
        let changed = match rule.apply(&text) {
            Cow::Owned(changed) => Some(changed),
            Cow::Borrowed(_) => None,
        };
        if let Some(changed) = changed {
            text = changed;
        }
    }
    text
}

/// Names of the inline rules in the order they run.
#[cfg(test)]
pub fn rule_names() -> impl Iterator<Item = &'static str> {
    RULES.iter().map(|rule| rule.name)
}
