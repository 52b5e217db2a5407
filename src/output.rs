// src/output.rs
// =============================================================================
// Appends converted documents to the single aggregate Markdown file.
//
// - The parent directory is created on first use
// - The file is opened in append mode for every document, so whatever a
//   previous run wrote is kept and an interrupted run loses nothing
// - Each document is followed by a blank line
//
// Rust strings are UTF-8, so the Chinese source text is written as-is.
// =============================================================================

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CrawlError, Result};

pub const DEFAULT_OUTPUT: &str = "cangjie_docs_markdown/all_docs.md";

#[derive(Debug, Clone)]
pub struct AggregateWriter {
    path: PathBuf,
}

impl AggregateWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Appends one document followed by a blank-line delimiter
    pub fn append(&self, document: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        file.write_all(document.as_bytes())
            .and_then(|_| file.write_all(b"\n\n"))
            .map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), bytes = document.len(), "appended document");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> CrawlError {
        CrawlError::Output {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_parent_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("all_docs.md");
        let writer = AggregateWriter::new(&path);

        writer.append("# 第一章\n\n正文").unwrap();
        writer.append("# Second").unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "# 第一章\n\n正文\n\n# Second\n\n");
    }

    #[test]
    fn test_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all_docs.md");
        fs::write(&path, "earlier run\n\n").unwrap();

        AggregateWriter::new(&path).append("later run").unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "earlier run\n\nlater run\n\n");
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a file for appending
        let writer = AggregateWriter::new(dir.path());
        assert!(matches!(
            writer.append("x"),
            Err(CrawlError::Output { .. })
        ));
    }
}
