//! CDP wire messages and the few payloads the team page automation decodes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::CdpError;

/// Outgoing command. `session_id` routes it to an attached page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Incoming message: a command reply when `id` is set, an event otherwise.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<ErrorObject>,
    pub method: Option<String>,
    pub session_id: Option<String>,
}

impl CdpResponse {
    /// Reply payload, or the browser's error. A reply without a result is `null`.
    pub fn into_result(self) -> Result<Value, CdpError> {
        match self.error {
            Some(ErrorObject { code, message }) => Err(CdpError::Protocol { code, message }),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
}

/// Target created through `PUT /json/new`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    pub id: String,
    pub url: String,
}

/// `GET /json/version`; the browser-level socket lives here.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// Content quad of a node from `DOM.getBoxModel`; other boxes are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct BoxModel {
    pub content: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    None,
    Left,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseEventType {
    MouseMoved,
    MousePressed,
    MouseReleased,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyEventType {
    KeyDown,
    KeyUp,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
