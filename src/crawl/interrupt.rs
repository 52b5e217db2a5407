// src/crawl/interrupt.rs
// =============================================================================
// Ctrl-C handling for the crawl loop.
//
// The signal itself never stops anything. It only flips a flag that the
// driver looks at:
// - at the top of every iteration, before dispatching the next URL
// - while a page is loading, by racing the render against `raised()`
// That way the loop always exits through its normal return path and main.rs
// gets the chance to shut the browser down.
//
// Rust concepts:
// - tokio::sync::watch: a single-value channel; every receiver sees the
//   latest value, which is exactly what a "stop requested" flag needs
// =============================================================================

use tokio::sync::watch;
use tracing::warn;

/// Receiving side, held by the crawl driver.
#[derive(Debug, Clone)]
pub struct Interrupt {
    rx: watch::Receiver<bool>,
}

/// Sending side. Dropping it without raising means "never interrupted".
#[derive(Debug)]
pub struct InterruptTrigger {
    tx: watch::Sender<bool>,
}

pub fn channel() -> (InterruptTrigger, Interrupt) {
    let (tx, rx) = watch::channel(false);
    (InterruptTrigger { tx }, Interrupt { rx })
}

impl InterruptTrigger {
    pub fn raise(&self) {
        // No receivers left means the crawl is already over
        let _ = self.tx.send(true);
    }
}

impl Interrupt {
    /// Raises the returned interrupt on the first Ctrl-C.
    pub fn on_ctrl_c() -> Self {
        let (trigger, interrupt) = channel();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    warn!("⚠️  interrupt received, stopping after the current step");
                    trigger.raise();
                }
                Err(e) => warn!("cannot listen for Ctrl-C: {}", e),
            }
        });
        interrupt
    }

    pub fn is_raised(&self) -> bool {
        *self.rx.borrow()
    }

    // Resolves once the interrupt is raised; never resolves otherwise
    pub async fn raised(&mut self) {
        if self.rx.wait_for(|raised| *raised).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
