//! Navigation and waiting operations for CDP page session.

use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Navigate to URL and wait for the document to load.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> Result<String, CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText") {
            return Err(CdpError::NavigationFailed(format!(
                "{}: {}",
                url,
                error.as_str().unwrap_or("Unknown error")
            )));
        }

        let frame_id = result["frameId"].as_str().unwrap_or("main").to_string();

        self.wait_for_load(timeout).await?;

        debug!("Navigated to {}", url);
        Ok(frame_id)
    }

    /// Poll `document.readyState` until the page is interactive.
    pub async fn wait_for_load(&self, timeout: Duration) -> Result<(), CdpError> {
        let start = Instant::now();

        loop {
            let result = self.evaluate("document.readyState").await?;

            if let Some(state) = result.as_str() {
                if state == "complete" || state == "interactive" {
                    return Ok(());
                }
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Get current URL.
    pub async fn get_url(&self) -> Result<String, CdpError> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Re-evaluate `expression` every `poll` until it yields a truthy value.
    ///
    /// Returns that value. JavaScript exceptions abort the wait.
    pub async fn wait_for_function(
        &self,
        expression: &str,
        timeout: Duration,
        poll: Duration,
    ) -> Result<Value, CdpError> {
        let start = Instant::now();

        loop {
            let value = self.evaluate(expression).await?;
            if is_truthy(&value) {
                return Ok(value);
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!(
                    "Condition not met within {:?}",
                    timeout
                )));
            }

            tokio::time::sleep(poll).await;
        }
    }
}

/// JavaScript truthiness of a by-value result.
pub(super) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
