//! Navigation sidebar for the generated site.
//!
//! Every converted page is added as it is written. Pages inside
//! subdirectories are grouped under a heading per directory; pages at the
//! top of the site go into one flat list after the groups. Pages whose name
//! starts with `_` (including the sidebar itself) are left out.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::html::Tag;
use super::inline::CONTENT_FRAME;
use super::paths::relative_href;

/// File the sidebar is written to, in the root of the target directory.
pub const SIDEBAR_FILE: &str = "_sidebar.html";

/// Leading character that hides a top-level page from navigation.
pub const HIDDEN_PREFIX: char = '_';

/// Accumulates navigation entries across a whole build.
#[derive(Debug)]
pub struct Sidebar {
    root: PathBuf,
    /// Hrefs containing a directory part
    folders: Vec<String>,
    /// Visible top-level hrefs
    pages: Vec<String>,
}

impl Sidebar {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            folders: Vec::new(),
            pages: Vec::new(),
        }
    }

    /// Record a written page.
    pub fn add(&mut self, output_path: &Path) {
        let href = relative_href(&self.root, output_path);
        if href.contains('/') {
            self.folders.push(href);
        } else if !href.starts_with(HIDDEN_PREFIX) {
            self.pages.push(href);
        }
    }

    /// Number of entries that will appear in the sidebar.
    pub fn entry_count(&self) -> usize {
        self.folders.len() + self.pages.len()
    }

    /// Write the sidebar markup.
    pub fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut folders: Vec<(&str, &str)> = self
            .folders
            .iter()
            .filter_map(|href| href.rsplit_once('/').map(|(dir, _)| (dir, href.as_str())))
            .collect();
        folders.sort();

        let mut current: Option<&str> = None;
        for (dir, href) in folders {
            if current != Some(dir) {
                if current.is_some() {
                    writeln!(out, "</UL>")?;
                }
                let heading = Tag::heading(dir.split('/').count());
                let label = dir.rsplit('/').next().unwrap_or(dir);
                writeln!(out, "<{heading}>{label}</{heading}><UL>")?;
                current = Some(dir);
            }
            write_link(out, href)?;
        }
        if current.is_some() {
            writeln!(out, "</UL>")?;
        }

        let mut pages: Vec<&str> = self.pages.iter().map(String::as_str).collect();
        pages.sort();
        writeln!(out, "<UL>")?;
        for href in pages {
            write_link(out, href)?;
        }
        writeln!(out, "</UL>")
    }

    /// Write the sidebar file into the root directory and return its path.
    pub fn flush(self) -> std::io::Result<PathBuf> {
        let path = self.root.join(SIDEBAR_FILE);
        let mut out = BufWriter::new(File::create(&path)?);
        self.render(&mut out)?;
        out.flush()?;
        Ok(path)
    }
}

fn write_link<W: Write>(out: &mut W, href: &str) -> std::io::Result<()> {
    let name = Path::new(href)
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    writeln!(
        out,
        r#"<LI><A HREF="{href}" TARGET="{CONTENT_FRAME}">{name}</A></LI>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(sidebar: &Sidebar) -> String {
        let mut out = Vec::new();
        sidebar.render(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sidebar_with(paths: &[&str]) -> Sidebar {
        let mut sidebar = Sidebar::new("site");
        for path in paths {
            sidebar.add(&Path::new("site").join(path));
        }
        sidebar
    }

    #[test]
    fn test_groups_folders_then_flat_list() {
        let sidebar = sidebar_with(&["top.html", "y/c.html", "x/b.html", "x/a.html"]);

        assert_eq!(
            render(&sidebar),
            concat!(
                "<H1>x</H1><UL>\n",
                "<LI><A HREF=\"x/a.html\" TARGET=\"content\">a</A></LI>\n",
                "<LI><A HREF=\"x/b.html\" TARGET=\"content\">b</A></LI>\n",
                "</UL>\n",
                "<H1>y</H1><UL>\n",
                "<LI><A HREF=\"y/c.html\" TARGET=\"content\">c</A></LI>\n",
                "</UL>\n",
                "<UL>\n",
                "<LI><A HREF=\"top.html\" TARGET=\"content\">top</A></LI>\n",
                "</UL>\n",
            )
        );
    }

    #[test]
    fn test_hidden_page_excluded() {
        let sidebar = sidebar_with(&["_sidebar.html", "index.html"]);
        let out = render(&sidebar);

        assert!(!out.contains("_sidebar"));
        assert!(out.contains("index.html"));
        assert_eq!(sidebar.entry_count(), 1);
    }

    #[test]
    fn test_nested_folder_heading_depth() {
        let sidebar = sidebar_with(&["a/b/deep.html"]);
        assert!(render(&sidebar).starts_with("<H2>b</H2><UL>\n"));
    }

    #[test]
    fn test_folder_groups_stay_together() {
        let sidebar = sidebar_with(&["x/a.html", "x/b/c.html", "x/d.html"]);
        let out = render(&sidebar);

        assert_eq!(out.matches("<H1>x</H1>").count(), 1);
        assert_eq!(out.matches("<H2>b</H2>").count(), 1);
    }

    #[test]
    fn test_empty_sidebar() {
        let sidebar = Sidebar::new("site");
        assert_eq!(render(&sidebar), "<UL>\n</UL>\n");
    }

    #[test]
    fn test_flush_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sidebar = Sidebar::new(dir.path());
        sidebar.add(&dir.path().join("page.html"));

        let path = sidebar.flush().unwrap();
        assert_eq!(path, dir.path().join(SIDEBAR_FILE));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains(r#"HREF="page.html""#));
    }
}
