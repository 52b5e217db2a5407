// src/extract/content.rs
// =============================================================================
// Locates the part of a rendered page that holds the actual documentation.
//
// Steps:
// 1. Parse the markup with `scraper` and read the <title>
// 2. Detach scripts, styles, navigation, headers, footers, frames, SVGs and a
//    few well-known boilerplate containers (sidebars, menus, TOC wrappers)
// 3. Walk a ranked table of content rules; the first rule that matches wins
// 4. Otherwise fall back to <body>, and if even that is missing, to the
//    whole document
//
// The rule table is plain data. Supporting another site template means
// appending a row with `with_rule`, not adding another branch.
// =============================================================================

use scraper::{Html, Selector};
use std::fmt;

use crate::error::{CrawlError, Result};

/// Elements that never carry documentation text.
const STRIPPED_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "iframe", "noscript", "svg",
];

/// Template containers for site chrome.
const BOILERPLATE_SELECTORS: &[&str] = &[
    ".sidebar",
    ".menu",
    ".navigation",
    ".header",
    ".footer",
    ".toctree-wrapper",
];

/// Content rules, most specific first.
const CONTENT_RULES: &[&str] = &[
    r#"[role="main"]"#,
    "main",
    "article",
    ".document",
    ".content",
    ".body",
    ".rst-content",
    "#main-content",
];

/// One row of the ranked rule table.
#[derive(Debug)]
pub struct ContentRule {
    pub name: String,
    selector: Selector,
}

impl ContentRule {
    pub fn new(css: &str) -> Result<Self> {
        Ok(Self {
            name: css.to_string(),
            selector: parse_selector(css)?,
        })
    }
}

/// Which rule produced the selected subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentMatch {
    Rule(String),
    Body,
    Document,
}

impl fmt::Display for ContentMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentMatch::Rule(name) => write!(f, "{name}"),
            ContentMatch::Body => f.write_str("body (fallback)"),
            ContentMatch::Document => f.write_str("document (fallback)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectedContent {
    pub title: Option<String>,
    /// Outer HTML of the chosen subtree, boilerplate already removed.
    pub html: String,
    pub matched: ContentMatch,
}

#[derive(Debug)]
pub struct ContentSelector {
    strip: Vec<Selector>,
    rules: Vec<ContentRule>,
    title: Selector,
    body: Selector,
}

impl ContentSelector {
    /// Builds the selector with the default strip list and rule table.
    pub fn new() -> Result<Self> {
        let strip = STRIPPED_TAGS
            .iter()
            .chain(BOILERPLATE_SELECTORS)
            .map(|css| parse_selector(css))
            .collect::<Result<Vec<_>>>()?;
        let rules = CONTENT_RULES
            .iter()
            .map(|css| ContentRule::new(css))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            strip,
            rules,
            title: parse_selector("title")?,
            body: parse_selector("body")?,
        })
    }

    /// Appends a rule with the lowest priority so far.
    pub fn with_rule(mut self, css: &str) -> Result<Self> {
        self.rules.push(ContentRule::new(css)?);
        Ok(self)
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name.as_str())
    }

    pub fn select(&self, markup: &str) -> SelectedContent {
        let mut document = Html::parse_document(markup);

        let title = document
            .select(&self.title)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty());

        self.strip_boilerplate(&mut document);

        // Detached nodes stay in the arena and `Html::select` would still
        // find them; only walk what is attached to the root.
        let root = document.root_element();

        for rule in &self.rules {
            if let Some(element) = root.select(&rule.selector).next() {
                return SelectedContent {
                    title,
                    html: element.html(),
                    matched: ContentMatch::Rule(rule.name.clone()),
                };
            }
        }

        match root.select(&self.body).next() {
            Some(body) => SelectedContent {
                title,
                html: body.html(),
                matched: ContentMatch::Body,
            },
            None => SelectedContent {
                title,
                html: root.html(),
                matched: ContentMatch::Document,
            },
        }
    }

    fn strip_boilerplate(&self, document: &mut Html) {
        let view: &Html = document;
        let doomed: Vec<_> = self
            .strip
            .iter()
            .flat_map(|selector| view.select(selector).map(|element| element.id()))
            .collect();

        for id in doomed {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| CrawlError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> ContentSelector {
        ContentSelector::new().unwrap()
    }

    #[test]
    fn test_role_main_beats_body() {
        let html = r#"<html><body>
            <div class="wrapper">outside</div>
            <div role="main"><p>inside</p></div>
        </body></html>"#;
        let selected = selector().select(html);
        assert_eq!(selected.matched, ContentMatch::Rule(r#"[role="main"]"#.to_string()));
        assert!(selected.html.contains("inside"));
        assert!(!selected.html.contains("outside"));
    }

    #[test]
    fn test_rule_priority_order() {
        let html = r#"<html><body>
            <div class="content">generic</div>
            <article>semantic</article>
        </body></html>"#;
        let selected = selector().select(html);
        assert_eq!(selected.matched, ContentMatch::Rule("article".to_string()));
        assert!(selected.html.contains("semantic"));
    }

    #[test]
    fn test_boilerplate_removed() {
        let html = r#"<html><body><main>
            <nav>menu links</nav>
            <div class="sidebar">side</div>
            <script>var x = 1;</script>
            <div class="toctree-wrapper">toc</div>
            <p>real text</p>
        </main></body></html>"#;
        let selected = selector().select(html);
        assert!(selected.html.contains("real text"));
        for gone in ["menu links", "side", "var x", "toc"] {
            assert!(!selected.html.contains(gone), "{gone} should be stripped");
        }
    }

    #[test]
    fn test_rule_inside_stripped_sidebar_is_ignored() {
        let html = r#"<html><body>
            <div class="sidebar"><div class="content">sidebar toc entries</div></div>
            <div class="rst-content"><p>real documentation text</p></div>
        </body></html>"#;
        let selected = selector().select(html);
        assert_eq!(selected.matched, ContentMatch::Rule(".rst-content".to_string()));
        assert!(selected.html.contains("real documentation text"));
        assert!(!selected.html.contains("sidebar toc entries"));
    }

    #[test]
    fn test_rule_inside_stripped_header_is_ignored() {
        let html = r#"<html><body>
            <header><div role="main">site banner</div></header>
            <main><p>chapter body</p></main>
        </body></html>"#;
        let selected = selector().select(html);
        assert_eq!(selected.matched, ContentMatch::Rule("main".to_string()));
        assert!(selected.html.contains("chapter body"));
        assert!(!selected.html.contains("site banner"));
    }

    #[test]
    fn test_body_fallback() {
        let html = "<html><head><title>  Plain  </title></head><body><p>just text</p></body></html>";
        let selected = selector().select(html);
        assert_eq!(selected.matched, ContentMatch::Body);
        assert_eq!(selected.title.as_deref(), Some("Plain"));
        assert!(selected.html.starts_with("<body"));
    }

    #[test]
    fn test_empty_title_is_none() {
        let html = "<html><head><title>   </title></head><body><main>x</main></body></html>";
        assert_eq!(selector().select(html).title, None);
    }

    #[test]
    fn test_appended_rule_is_used() {
        let html = r#"<html><body><section class="doc-page">custom</section></body></html>"#;
        let custom = selector().with_rule("section.doc-page").unwrap();
        let selected = custom.select(html);
        assert_eq!(selected.matched, ContentMatch::Rule("section.doc-page".to_string()));
        assert_eq!(custom.rule_names().last(), Some("section.doc-page"));
    }

    #[test]
    fn test_invalid_rule_is_an_error() {
        assert!(selector().with_rule("div[").is_err());
    }
}
