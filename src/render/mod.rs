// src/render/mod.rs
// =============================================================================
// The boundary between the crawler and whatever produces rendered markup.
//
// The documentation site builds its pages with JavaScript, so a plain HTTP
// GET returns an empty shell. The real implementation (chrome.rs) drives a
// headless Chromium; tests drive the crawl with a scripted renderer instead.
//
// A render has three possible outcomes:
// - Ready: the page loaded and settled
// - TimedOut: the page did not finish in time, but we still grabbed
//   whatever the DOM held at that moment
// - Failed: no markup at all (navigation error, browser gone, ...)
// =============================================================================

mod chrome;

pub use chrome::{BrowserSettings, ChromeRenderer};

use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTiming {
    /// Hard limit for navigation to complete
    pub page_load_timeout: Duration,
    /// How long to wait for a <body> element after navigation
    pub ready_timeout: Duration,
    /// Pause after the page reports ready, for deferred rendering
    pub settle_delay: Duration,
}

impl Default for RenderTiming {
    fn default() -> Self {
        Self {
            page_load_timeout: Duration::from_secs(30),
            ready_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Ready(String),
    TimedOut(String),
    Failed(String),
}

/// How a renderer's resources were released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Release {
    Graceful,
    Killed,
    Failed(String),
}

#[allow(async_fn_in_trait)]
pub trait Renderer {
    async fn render(&mut self, url: &Url, timing: &RenderTiming) -> RenderOutcome;

    /// Releases everything the renderer holds. Implementations fall back to
    /// forced termination when a graceful shutdown fails.
    async fn shutdown(self) -> Release
    where
        Self: Sized;
}
