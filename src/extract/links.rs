// src/extract/links.rs
// =============================================================================
// This module finds the next documentation pages to crawl in a rendered page.
//
// A link is kept only if, after resolving it against the page URL:
// - it uses http or https
// - its host is exactly the target documentation domain
// - it ends with the document suffix (".html" by default)
// - it has not been visited yet in this run
//
// The markup is scanned twice:
// 1. A DOM pass with `scraper` over every <a href> element
// 2. A textual pass with `regex` over raw "<a ... href=...>" tags
// The results are unioned. Script-injected anchors sometimes carry attribute
// quirks that one of the passes misses, and a set makes duplicates between
// the passes disappear.
//
// Every rejected candidate is reported back as a SkippedLink with a reason,
// so a malformed href never aborts extraction for the rest of the page.
// =============================================================================

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

pub const DEFAULT_DOMAIN: &str = "docs.cangjie-lang.cn";
pub const DEFAULT_SUFFIX: &str = ".html";

/// Which links count as same-site documentation pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPolicy {
    pub domain: String,
    pub suffix: String,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

/// Why a candidate href was not turned into a frontier URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    Empty,
    FragmentOnly,
    Unparseable,
    NonHttpScheme,
    ForeignHost,
    MissingSuffix,
    AlreadyVisited,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::Empty => "empty href",
            SkipReason::FragmentOnly => "in-page anchor",
            SkipReason::Unparseable => "unparseable URL",
            SkipReason::NonHttpScheme => "not http(s)",
            SkipReason::ForeignHost => "outside target domain",
            SkipReason::MissingSuffix => "not a document page",
            SkipReason::AlreadyVisited => "already visited",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLink {
    pub href: String,
    pub reason: SkipReason,
}

/// Outcome of scanning one page for links.
#[derive(Debug, Default)]
pub struct LinkExtraction {
    pub links: BTreeSet<Url>,
    pub skipped: Vec<SkippedLink>,
}

impl LinkExtraction {
    fn consider(&mut self, href: &str, base: &Url, policy: &LinkPolicy, visited: &HashSet<Url>) {
        match accept_link(base, href, policy, visited) {
            Ok(url) => {
                self.links.insert(url);
            }
            Err(reason) => self.skipped.push(SkippedLink {
                href: href.to_string(),
                reason,
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum PageLinkError {
    #[error("page URL '{0}' cannot be used as a base for relative links")]
    CannotBeABase(String),
}

// Extracts same-site document links from rendered markup
//
// Parameters:
//   html: the rendered page markup
//   page_url: the URL the markup was fetched from
//   policy: target domain and document suffix
//   visited: URLs already dispatched in this run
//
// Returns: the union of both passes, plus every rejected candidate
pub fn extract_links(
    html: &str,
    page_url: &Url,
    policy: &LinkPolicy,
    visited: &HashSet<Url>,
) -> Result<LinkExtraction, PageLinkError> {
    if page_url.cannot_be_a_base() {
        return Err(PageLinkError::CannotBeABase(page_url.to_string()));
    }

    let mut extraction = LinkExtraction::default();

    for href in dom_hrefs(html) {
        extraction.consider(&href, page_url, policy, visited);
    }
    for href in textual_hrefs(html) {
        extraction.consider(&href, page_url, policy, visited);
    }

    Ok(extraction)
}

/// Resolves `href` against `base` into the canonical form used for dedup.
///
/// Relative and absolute spellings of the same page produce the same URL,
/// and fragments are dropped.
pub fn canonicalize(base: &Url, href: &str) -> Result<Url, SkipReason> {
    let href = href.trim();
    if href.is_empty() {
        return Err(SkipReason::Empty);
    }
    if href.starts_with('#') {
        return Err(SkipReason::FragmentOnly);
    }

    let mut url = base.join(href).map_err(|_| SkipReason::Unparseable)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(SkipReason::NonHttpScheme);
    }
    url.set_fragment(None);
    Ok(url)
}

fn accept_link(
    base: &Url,
    href: &str,
    policy: &LinkPolicy,
    visited: &HashSet<Url>,
) -> Result<Url, SkipReason> {
    let url = canonicalize(base, href)?;

    if !url
        .host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case(&policy.domain))
    {
        return Err(SkipReason::ForeignHost);
    }
    if !url.as_str().ends_with(&policy.suffix) {
        return Err(SkipReason::MissingSuffix);
    }
    if visited.contains(&url) {
        return Err(SkipReason::AlreadyVisited);
    }
    Ok(url)
}

// DOM pass: every <a> element that carries an href attribute
fn dom_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // "a[href]" is a constant selector known to be valid
    let selector = Selector::parse("a[href]").expect("static selector");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

// Textual pass: scan raw "<a ... href=...>" tags without building a DOM
fn textual_hrefs(html: &str) -> Vec<String> {
    static ANCHOR_HREF: OnceLock<Regex> = OnceLock::new();
    let pattern = ANCHOR_HREF.get_or_init(|| {
        Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .expect("static regex")
    });

    pattern
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| decode_entities(m.as_str()))
        .collect()
}

// Raw attribute text still carries HTML escapes the DOM pass has already
// decoded; undo the ones that show up in URLs.
fn decode_entities(raw: &str) -> String {
    raw.replace("&amp;", "&")
        .replace("&#38;", "&")
        .replace("&#x2F;", "/")
        .replace("&#47;", "/")
        .replace("&quot;", "\"")
}
