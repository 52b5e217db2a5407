// src/extract/markdown.rs
// =============================================================================
// Turns the selected content subtree into the Markdown document that gets
// appended to the aggregate file.
//
// Output shape:
//
//   # <page title>
//
//   > 来源: <source url>
//
//   <body>
//
// The title line is left out when the page has no <title>. A body shorter
// than MIN_BODY_CHARS after trimming is reported as TooShort and never
// written; such pages are almost always empty templates or redirect stubs.
// =============================================================================

use htmd::options::{BulletListMarker, CodeBlockStyle, HeadingStyle, Options};
use htmd::HtmlToMarkdown;
use std::fmt;
use url::Url;

use super::content::SelectedContent;
use crate::error::{CrawlError, Result};

/// Minimum body length, in characters, for a document to be kept.
pub const MIN_BODY_CHARS: usize = 100;

/// Label of the provenance line. The target site is Chinese-language.
pub const PROVENANCE_LABEL: &str = "来源";

pub const DEFAULT_CODE_LANGUAGE: &str = "cangjie";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterOptions {
    /// Tag added to fenced code blocks that carry no language of their own
    pub code_language: Option<String>,
    pub min_body_chars: usize,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            code_language: Some(DEFAULT_CODE_LANGUAGE.to_string()),
            min_body_chars: MIN_BODY_CHARS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDocument {
    pub title: Option<String>,
    pub source: Url,
    pub body: String,
}

impl fmt::Display for ContentDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = &self.title {
            write!(f, "# {title}\n\n")?;
        }
        write!(f, "> {PROVENANCE_LABEL}: {}\n\n{}", self.source, self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    Document(ContentDocument),
    TooShort { length: usize },
}

pub struct MarkdownConverter {
    inner: HtmlToMarkdown,
    options: ConverterOptions,
}

impl MarkdownConverter {
    pub fn new(options: ConverterOptions) -> Self {
        let inner = HtmlToMarkdown::builder()
            .skip_tags(vec!["img", "svg"])
            .options(Options {
                heading_style: HeadingStyle::Atx,
                bullet_list_marker: BulletListMarker::Dash,
                code_block_style: CodeBlockStyle::Fenced,
                ..Default::default()
            })
            .build();
        Self { inner, options }
    }

    pub fn convert(&self, content: &SelectedContent, source: &Url) -> Result<Conversion> {
        let raw = self
            .inner
            .convert(&content.html)
            .map_err(|e| CrawlError::Convert(e.to_string()))?;

        let labelled = match &self.options.code_language {
            Some(language) => label_code_fences(&raw, language),
            None => raw,
        };
        let body = collapse_blank_lines(&labelled).trim().to_string();

        let length = body.chars().count();
        if length < self.options.min_body_chars {
            return Ok(Conversion::TooShort { length });
        }

        Ok(Conversion::Document(ContentDocument {
            title: content.title.clone(),
            source: source.clone(),
            body,
        }))
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new(ConverterOptions::default())
    }
}

/// Keeps at most one blank line between blocks.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut lines = Vec::new();
    let mut previous_blank = false;

    for line in text.lines() {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        lines.push(line);
        previous_blank = blank;
    }

    lines.join("\n")
}

// Adds `language` to every opening ``` fence that has none
fn label_code_fences(text: &str, language: &str) -> String {
    let mut in_fence = false;
    let mut out = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") {
            if !in_fence && trimmed.trim_end() == "```" {
                out.push(format!("{line}{language}"));
            } else {
                out.push(line.to_string());
            }
            in_fence = !in_fence;
        } else {
            out.push(line.to_string());
        }
    }

    out.join("\n")
}
