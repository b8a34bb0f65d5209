// Headless browser session shared across a batch

use crate::config::EngineConfig;
use crate::error::CompatError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use log::{debug, warn};
use serde_json::Value;
use tokio::task::JoinHandle;

/// One browser tab
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Navigate and wait for the page to settle
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Evaluate a JavaScript expression and return its JSON value
    async fn evaluate(&self, script: &str) -> Result<Value>;

    /// Close the tab
    async fn close(self: Box<Self>) -> Result<()>;
}

/// A running browser that hands out tabs
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn open_page(&self) -> Result<Box<dyn BrowserPage>>;

    /// Release the browser; called once at the end of a batch
    async fn shutdown(self: Box<Self>) -> Result<()>;
}

/// Provisions the session at the start of a batch
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, CompatError>;
}

/// Launches a headless Chromium through the DevTools protocol
pub struct ChromiumLauncher {
    config: EngineConfig,
}

impl ChromiumLauncher {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, CompatError> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .request_timeout(self.config.navigation_timeout);
        if let Some(path) = &self.config.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let browser_config = builder.build().map_err(CompatError::BrowserUnavailable)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| CompatError::BrowserUnavailable(e.to_string()))?;

        // The handler drives the DevTools connection and must be polled for the
        // browser to make progress.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler stopped: {}", e);
                    break;
                }
            }
        });

        debug!("Launched headless browser");
        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
            navigation_timeout: self.config.navigation_timeout,
        }))
    }
}

struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    navigation_timeout: std::time::Duration,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn open_page(&self) -> Result<Box<dyn BrowserPage>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to open browser tab")?;
        Ok(Box::new(ChromiumPage {
            page,
            navigation_timeout: self.navigation_timeout,
        }))
    }

    async fn shutdown(self: Box<Self>) -> Result<()> {
        let ChromiumSession {
            mut browser,
            handler_task,
            ..
        } = *self;

        let closed = browser.close().await;
        if let Err(e) = browser.wait().await {
            warn!("Browser process did not exit cleanly: {}", e);
        }
        handler_task.abort();
        closed.context("Failed to close browser")?;
        Ok(())
    }
}

struct ChromiumPage {
    page: Page,
    navigation_timeout: std::time::Duration,
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn navigate(&self, url: &str) -> Result<()> {
        let navigation = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        };

        match tokio::time::timeout(self.navigation_timeout, navigation).await {
            Ok(result) => result.with_context(|| format!("Navigation to {} failed", url)),
            Err(_) => {
                // Long-polling pages never go idle; carry on with what has rendered
                warn!(
                    "Navigation to {} did not settle within {:?}",
                    url, self.navigation_timeout
                );
                Ok(())
            }
        }
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .context("Script evaluation failed")?;
        evaluation_value(result.value())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.page.close().await.context("Failed to close browser tab")?;
        Ok(())
    }
}

/// JSON value of an evaluation; `undefined` comes back without one
fn evaluation_value(raw: Option<&Value>) -> Result<Value> {
    match raw {
        None => Ok(Value::Null),
        Some(value) => serde_json::from_value(value.clone())
            .context("Script result could not be decoded as JSON"),
    }
}

/// Launcher for runs without browser automation
///
/// The session exists so the batch can start, but every tab request fails and
/// the rendered-DOM tier records that as its failure reason.
pub struct DisabledBrowser;

#[async_trait]
impl BrowserLauncher for DisabledBrowser {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, CompatError> {
        Ok(Box::new(DisabledBrowser))
    }
}

#[async_trait]
impl BrowserSession for DisabledBrowser {
    async fn open_page(&self) -> Result<Box<dyn BrowserPage>> {
        anyhow::bail!("browser automation is disabled")
    }

    async fn shutdown(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
