// src/render/chrome.rs
// =============================================================================
// Headless Chromium renderer built on `chromiumoxide`.
//
// Lifecycle:
// 1. launch() starts the browser and spawns the task that pumps DevTools
//    protocol events (chromiumoxide does nothing unless this runs)
// 2. render() reuses one tab for every page, like a person clicking through
// 3. shutdown() must be called on every exit path. It first asks the browser
//    to close and waits a bounded time; if that fails it kills the process.
//
// Timing per page:
// - navigation gets `page_load_timeout`
// - then we poll for <body> for at most `ready_timeout`
// - then sleep `settle_delay` so client-side rendering can finish
// On any timeout we skip the settle delay and return the DOM as it is. That
// includes the DevTools request timeout, which can fire before ours.
// =============================================================================

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};
use url::Url;

use super::{Release, RenderOutcome, RenderTiming, Renderer};
use crate::error::{CrawlError, Result};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

// Upper bound for each step of a graceful shutdown
const GRACEFUL_SHUTDOWN: Duration = Duration::from_secs(5);
const BODY_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    pub headless: bool,
    pub sandbox: bool,
    pub window_size: (u32, u32),
    pub user_agent: String,
    /// Use this Chrome/Chromium binary instead of auto-detection
    pub executable: Option<PathBuf>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: false,
            window_size: (1920, 1080),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            executable: None,
        }
    }
}

impl BrowserSettings {
    fn to_config(&self) -> Result<BrowserConfig> {
        let (width, height) = self.window_size;
        let mut builder = BrowserConfig::builder()
            .window_size(width, height)
            .arg(format!("--user-agent={}", self.user_agent))
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            // Keep Chromium's own chatter off our console
            .arg("--log-level=3")
            .arg("--disable-logging");

        if !self.headless {
            builder = builder.with_head();
        }
        if !self.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(CrawlError::Launch)
    }
}

pub struct ChromeRenderer {
    browser: Browser,
    page: Page,
    events: JoinHandle<()>,
}

impl ChromeRenderer {
    pub async fn launch(settings: &BrowserSettings) -> Result<Self> {
        let config = settings.to_config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| CrawlError::Launch(e.to_string()))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser event error: {}", e);
                }
            }
        });

        // From here on a failure must still tear the browser down
        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let mut browser = browser;
                if let Some(Err(kill_err)) = browser.kill().await {
                    warn!("failed to kill browser after launch error: {}", kill_err);
                }
                events.abort();
                return Err(e.into());
            }
        };

        info!(
            headless = settings.headless,
            width = settings.window_size.0,
            height = settings.window_size.1,
            "🔧 browser started"
        );
        Ok(Self {
            browser,
            page,
            events,
        })
    }

    async fn force_kill(&mut self) -> Release {
        match self.browser.kill().await {
            Some(Ok(())) | None => Release::Killed,
            Some(Err(e)) => Release::Failed(e.to_string()),
        }
    }

    async fn wait_for_body(&self, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        loop {
            if self.page.find_element("body").await.is_ok() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            sleep(BODY_POLL_INTERVAL).await;
        }
    }
}

/// How a navigation attempt ended.
#[derive(Debug, PartialEq, Eq)]
enum Navigation {
    Loaded,
    TimedOut,
    Failed(String),
}

// `None` means our own deadline elapsed. chromiumoxide reports its request
// timeout as `CdpError::Timeout`; both are a slow page, not a dead one.
fn classify_navigation<T>(result: Option<std::result::Result<T, CdpError>>) -> Navigation {
    match result {
        Some(Ok(_)) => Navigation::Loaded,
        None | Some(Err(CdpError::Timeout)) => Navigation::TimedOut,
        Some(Err(e)) => Navigation::Failed(e.to_string()),
    }
}

impl Renderer for ChromeRenderer {
    async fn render(&mut self, url: &Url, timing: &RenderTiming) -> RenderOutcome {
        let navigation = timeout(timing.page_load_timeout, self.page.goto(url.as_str()))
            .await
            .ok();
        let mut timed_out = match classify_navigation(navigation) {
            Navigation::Loaded => false,
            Navigation::TimedOut => true,
            Navigation::Failed(reason) => return RenderOutcome::Failed(reason),
        };

        if !timed_out {
            timed_out = !self.wait_for_body(timing.ready_timeout).await;
        }
        if !timed_out {
            sleep(timing.settle_delay).await;
        }

        match self.page.content().await {
            Ok(html) if timed_out => RenderOutcome::TimedOut(html),
            Ok(html) => RenderOutcome::Ready(html),
            Err(e) => RenderOutcome::Failed(e.to_string()),
        }
    }

    // Releases the browser: graceful close first, forced kill if that fails.
    // Never returns an error; the outcome is reported instead.
    async fn shutdown(mut self) -> Release {
        let release = match timeout(GRACEFUL_SHUTDOWN, self.browser.close()).await {
            Ok(Ok(_)) => match timeout(GRACEFUL_SHUTDOWN, self.browser.wait()).await {
                Ok(Ok(_)) => Release::Graceful,
                Ok(Err(e)) => {
                    warn!("browser did not exit cleanly: {}", e);
                    self.force_kill().await
                }
                Err(_) => {
                    warn!("browser did not exit within {:?}", GRACEFUL_SHUTDOWN);
                    self.force_kill().await
                }
            },
            Ok(Err(e)) => {
                warn!("graceful browser close failed: {}", e);
                self.force_kill().await
            }
            Err(_) => {
                warn!("graceful browser close timed out");
                self.force_kill().await
            }
        };

        self.events.abort();
        release
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = BrowserSettings::default();
        assert!(settings.headless);
        assert!(!settings.sandbox);
        assert_eq!(settings.window_size, (1920, 1080));
        assert!(settings.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_navigation_timeouts_keep_the_page() {
        assert_eq!(classify_navigation::<()>(None), Navigation::TimedOut);
        assert_eq!(
            classify_navigation::<()>(Some(Err(CdpError::Timeout))),
            Navigation::TimedOut
        );
    }

    #[test]
    fn test_navigation_errors_fail_the_page() {
        assert_eq!(classify_navigation(Some(Ok(()))), Navigation::Loaded);
        assert!(matches!(
            classify_navigation::<()>(Some(Err(CdpError::NotFound))),
            Navigation::Failed(_)
        ));
    }
}
