use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostics;

use super::html::HtmlError;
use super::markup::Document;
use super::paths::{MARKUP_EXTENSION, default_base, extension, page_file_name};
use super::sidebar::Sidebar;

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("source path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("source path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    ReadDocument {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WritePage { path: PathBuf, source: HtmlError },

    #[error("failed to copy {path}: {source}")]
    Copy {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write sidebar: {0}")]
    Sidebar(std::io::Error),
}

pub struct BuildResult {
    pub output_dir: PathBuf,
    pub sidebar_path: PathBuf,
    pub sidebar_entries: usize,
    pub documents: usize,
    pub copied: usize,
    pub skipped: usize,
}

#[derive(Default)]
struct Counts {
    documents: usize,
    copied: usize,
    skipped: usize,
}

pub struct Builder {
    source: PathBuf,
    target: PathBuf,
    /// Value written into every page's `<BASE HREF>`
    base: String,
    /// Extensions of files copied into the output unchanged
    copy_extensions: Vec<String>,
    trace_comments: bool,
    diagnostics: Diagnostics,
}

impl Builder {
    /// Create a builder. Without an explicit `base`, pages use the target
    /// directory (minus a trailing slash).
    pub fn new(
        source: PathBuf,
        target: PathBuf,
        base: Option<String>,
        diagnostics: Diagnostics,
    ) -> Self {
        let base = base
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| default_base(&target));
        Self {
            source,
            target,
            base,
            copy_extensions: vec!["png".to_string()],
            trace_comments: false,
            diagnostics,
        }
    }

    pub fn copy_extensions(mut self, extensions: Vec<String>) -> Self {
        self.copy_extensions = extensions;
        self
    }

    pub fn trace_comments(mut self, enabled: bool) -> Self {
        self.trace_comments = enabled;
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn build(&self) -> Result<BuildResult, BuildError> {
        if !self.source.exists() {
            return Err(BuildError::PathNotFound(self.source.clone()));
        }
        if !self.source.is_dir() {
            return Err(BuildError::NotADirectory(self.source.clone()));
        }

        // One sidebar for the whole tree, written once at the end.
        let mut sidebar = Sidebar::new(self.target.clone());
        let mut counts = Counts::default();
        self.convert_dir(&self.source, &self.target, &mut sidebar, &mut counts)?;

        self.diagnostics.verbose("Writing sidebar...");
        let sidebar_entries = sidebar.entry_count();
        let sidebar_path = sidebar.flush().map_err(BuildError::Sidebar)?;

        Ok(BuildResult {
            output_dir: self.target.clone(),
            sidebar_path,
            sidebar_entries,
            documents: counts.documents,
            copied: counts.copied,
            skipped: counts.skipped,
        })
    }

    /// Convert one directory level, then recurse into its subdirectories.
    fn convert_dir(
        &self,
        source: &Path,
        target: &Path,
        sidebar: &mut Sidebar,
        counts: &mut Counts,
    ) -> Result<(), BuildError> {
        self.diagnostics.verbose(format_args!(
            "Processing {} to {}...",
            source.display(),
            target.display()
        ));
        std::fs::create_dir_all(target).map_err(|e| BuildError::CreateDir {
            path: target.to_path_buf(),
            source: e,
        })?;

        let read_dir_error = |e| BuildError::ReadDir {
            path: source.to_path_buf(),
            source: e,
        };
        let mut entries = std::fs::read_dir(source)
            .map_err(read_dir_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_dir_error)?;
        entries.sort_by_key(|entry| entry.file_name());

        let (dirs, files): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|entry| entry.path().is_dir());

        for file in files {
            self.convert_file(&file.path(), target, sidebar, counts)?;
        }

        for dir in dirs {
            let name = dir.file_name();
            self.convert_dir(&source.join(&name), &target.join(&name), sidebar, counts)?;
        }

        Ok(())
    }

    /// Convert, copy or skip a single file.
    fn convert_file(
        &self,
        path: &Path,
        target: &Path,
        sidebar: &mut Sidebar,
        counts: &mut Counts,
    ) -> Result<(), BuildError> {
        match extension(path) {
            Some(MARKUP_EXTENSION) => {
                let Some(page_name) = page_file_name(path) else {
                    return Ok(());
                };
                let document =
                    Document::load(path, &self.base, &self.diagnostics).map_err(|e| {
                        BuildError::ReadDocument {
                            path: path.to_path_buf(),
                            source: e,
                        }
                    })?;

                let output = target.join(page_name);
                self.diagnostics.verbose(format_args!(
                    "Converting {} to {}...",
                    document.source.display(),
                    output.display()
                ));
                self.write_page(&document, &output)?;
                sidebar.add(&output);
                counts.documents += 1;
            }
            Some(ext) if self.copy_extensions.iter().any(|c| c == ext) => {
                self.diagnostics
                    .verbose(format_args!("Copying {}...", path.display()));
                let Some(name) = path.file_name() else {
                    return Ok(());
                };
                std::fs::copy(path, target.join(name)).map_err(|e| BuildError::Copy {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                counts.copied += 1;
            }
            _ => {
                self.diagnostics
                    .verbose(format_args!("Skipping {}...", path.display()));
                counts.skipped += 1;
            }
        }
        Ok(())
    }

    fn write_page(&self, document: &Document, output: &Path) -> Result<(), BuildError> {
        let write_error = |e| BuildError::WritePage {
            path: output.to_path_buf(),
            source: e,
        };
        let file = File::create(output)
            .map_err(HtmlError::from)
            .map_err(write_error)?;
        document
            .convert(BufWriter::new(file), self.trace_comments)
            .map_err(write_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::sidebar::SIDEBAR_FILE;
    use std::fs;

    fn write(path: &Path, contents: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn quiet_builder(source: &Path, target: &Path, base: Option<&str>) -> Builder {
        Builder::new(
            source.to_path_buf(),
            target.to_path_buf(),
            base.map(str::to_string),
            Diagnostics::silent(),
        )
    }

    #[test]
    fn test_build_mirrors_tree() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(&src.path().join("index.md"), b"# Home\n");
        write(&src.path().join("guide/setup.md"), b"- step\n");
        write(&src.path().join("guide/shot.png"), b"\x89PNG");
        write(&src.path().join("notes.txt"), b"ignored");

        let result = quiet_builder(src.path(), out.path(), Some("file:///docs"))
            .build()
            .unwrap();

        assert_eq!(result.documents, 2);
        assert_eq!(result.copied, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.sidebar_entries, 2);

        let index = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(index.contains("<BASE HREF=\"file:///docs\"/>"));
        assert!(index.contains("<H1>Home</H1>"));

        let setup = fs::read_to_string(out.path().join("guide/setup.html")).unwrap();
        assert!(setup.contains("<BASE HREF=\"file:///docs\"/>"));
        assert!(setup.contains("<LI>step</LI>"));

        assert!(out.path().join("guide/shot.png").exists());
        assert!(!out.path().join("notes.txt").exists());
        assert!(!out.path().join("notes.html").exists());
    }

    #[test]
    fn test_sidebar_written_once_for_whole_tree() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(&src.path().join("top.md"), b"top\n");
        write(&src.path().join("x/a.md"), b"a\n");
        write(&src.path().join("x/y/b.md"), b"b\n");
        write(&src.path().join("_hidden.md"), b"hidden\n");

        let result = quiet_builder(src.path(), out.path(), None).build().unwrap();

        assert_eq!(result.sidebar_path, out.path().join(SIDEBAR_FILE));
        assert!(!out.path().join("x").join(SIDEBAR_FILE).exists());

        let sidebar = fs::read_to_string(&result.sidebar_path).unwrap();
        assert!(sidebar.contains(r#"HREF="x/a.html""#));
        assert!(sidebar.contains(r#"HREF="x/y/b.html""#));
        assert!(sidebar.contains(r#"HREF="top.html""#));
        assert!(!sidebar.contains("_hidden"));
        assert!(out.path().join("_hidden.html").exists());
    }

    #[test]
    fn test_default_base_is_target() {
        let builder = Builder::new(
            PathBuf::from("src"),
            PathBuf::from("site/"),
            None,
            Diagnostics::default(),
        );
        assert_eq!(builder.base(), "site");
    }

    #[test]
    fn test_copy_extensions_configurable() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(&src.path().join("logo.svg"), b"<svg/>");
        write(&src.path().join("shot.png"), b"\x89PNG");

        let result = quiet_builder(src.path(), out.path(), None)
            .copy_extensions(vec!["svg".to_string()])
            .build()
            .unwrap();

        assert_eq!(result.copied, 1);
        assert!(out.path().join("logo.svg").exists());
        assert!(!out.path().join("shot.png").exists());
    }

    #[test]
    fn test_undecodable_document_still_converted() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(&src.path().join("bad.md"), &[0xff, 0xfe, b'\n']);

        let result = quiet_builder(src.path(), out.path(), None).build().unwrap();

        assert_eq!(result.documents, 1);
        let page = fs::read_to_string(out.path().join("bad.html")).unwrap();
        assert!(page.contains("InvalidUtf8"));
    }

    #[test]
    fn test_trace_comments_in_output() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(&src.path().join("a.md"), b"text\n");

        quiet_builder(src.path(), out.path(), None)
            .trace_comments(true)
            .build()
            .unwrap();

        let page = fs::read_to_string(out.path().join("a.html")).unwrap();
        assert!(page.contains("<!-- open(tag=HTML"));
    }

    #[test]
    fn test_missing_source() {
        let out = tempfile::tempdir().unwrap();
        let missing = out.path().join("does-not-exist");
        let result = quiet_builder(&missing, out.path(), None).build();
        assert!(matches!(result, Err(BuildError::PathNotFound(_))));
    }
}
