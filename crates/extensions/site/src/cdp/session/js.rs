//! JavaScript execution operations for CDP page session.

use serde_json::{json, Value};

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Evaluate JavaScript expression, awaiting promises, returning by value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            return Err(CdpError::JavaScript(exception_text(exception)));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Call a JavaScript function declaration with JSON arguments.
    pub async fn call_function(&self, function: &str, args: &[Value]) -> Result<Value, CdpError> {
        let expression = Self::invocation(function, args)?;
        self.evaluate(&expression).await
    }

    /// `(function)(arg0, arg1, ...)` with every argument as a JSON literal.
    pub fn invocation(function: &str, args: &[Value]) -> Result<String, CdpError> {
        let args = args
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("({})({})", function.trim(), args.join(", ")))
    }
}

/// Prefer the thrown value's description over the generic "Uncaught".
fn exception_text(exception: &Value) -> String {
    exception["exception"]["description"]
        .as_str()
        .or_else(|| exception["text"].as_str())
        .unwrap_or("Unknown error")
        .to_string()
}
