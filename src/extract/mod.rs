// src/extract/mod.rs
// =============================================================================
// Everything that reads a rendered page.
//
// Submodules:
// - links: finds the next same-site documentation pages to crawl
// - content: picks the subtree that holds the documentation itself
// - markdown: converts that subtree into the document we append to disk
//
// None of these touch the network or the browser; they only see markup.
// =============================================================================

mod content;
mod links;
mod markdown;

pub use content::ContentSelector;
pub use links::{extract_links, LinkPolicy};
pub use markdown::{Conversion, ConverterOptions, MarkdownConverter};
