use super::*;

#[test]
fn test_session_request_serialize() {
    let req = CdpRequest {
        id: 7,
        method: "Runtime.evaluate".to_string(),
        params: Some(serde_json::json!({"expression": "document.readyState"})),
        session_id: Some("S1".to_string()),
    };
    let json: Value = serde_json::to_value(&req).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["sessionId"], "S1");
    assert_eq!(json["params"]["expression"], "document.readyState");
}

#[test]
fn test_browser_request_omits_session() {
    let req = CdpRequest {
        id: 1,
        method: "Target.attachToTarget".to_string(),
        params: None,
        session_id: None,
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(!json.contains("sessionId"));
    assert!(!json.contains("params"));
}

#[test]
fn test_error_response_deserialize() {
    let json = r#"{"id": 3, "error": {"code": -32000, "message": "Could not compute box model."}}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.id, Some(3));
    assert!(resp.result.is_none());
    let err = resp.into_result().unwrap_err();
    assert!(matches!(err, CdpError::Protocol { code: -32000, .. }));
}

#[test]
fn test_event_deserialize() {
    let json = r#"{"method": "Page.loadEventFired", "params": {"timestamp": 1.5}, "sessionId": "S1"}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert!(resp.id.is_none());
    assert_eq!(resp.method.as_deref(), Some("Page.loadEventFired"));
    assert_eq!(resp.session_id.as_deref(), Some("S1"));
}

#[test]
fn test_browser_version_deserialize() {
    let json = r#"{
        "Browser": "Chrome/131.0.6778.85",
        "Protocol-Version": "1.3",
        "User-Agent": "Mozilla/5.0",
        "V8-Version": "13.1.201.9",
        "webSocketDebuggerUrl": "ws://localhost:9222/devtools/browser/abc"
    }"#;
    let version: BrowserVersion = serde_json::from_str(json).unwrap();
    assert_eq!(version.browser, "Chrome/131.0.6778.85");
    assert!(version.web_socket_debugger_url.starts_with("ws://"));
}

#[test]
fn test_page_info_deserialize() {
    let json = r#"{
        "id": "page123",
        "type": "page",
        "title": "F1 Fantasy",
        "url": "https://fantasy.formula1.com/en/my-team/1",
        "webSocketDebuggerUrl": "ws://localhost:9222/devtools/page/page123"
    }"#;
    let info: PageInfo = serde_json::from_str(json).unwrap();
    assert_eq!(info.id, "page123");
    assert_eq!(info.url, "https://fantasy.formula1.com/en/my-team/1");
}

#[test]
fn test_input_enums_serialize() {
    assert_eq!(serde_json::to_string(&MouseButton::Left).unwrap(), "\"left\"");
    assert_eq!(
        serde_json::to_string(&MouseEventType::MousePressed).unwrap(),
        "\"mousePressed\""
    );
    assert_eq!(serde_json::to_string(&KeyEventType::KeyDown).unwrap(), "\"keyDown\"");
}

#[test]
fn test_box_model_keeps_content_quad() {
    let json = r#"{
        "content": [10, 20, 110, 20, 110, 60, 10, 60],
        "padding": [10, 20, 110, 20, 110, 60, 10, 60],
        "width": 100,
        "height": 40
    }"#;
    let model: BoxModel = serde_json::from_str(json).unwrap();
    assert_eq!(model.content.len(), 8);
    assert_eq!(model.content[2], 110.0);
}

#[test]
fn test_reply_without_result_is_null() {
    let resp: CdpResponse = serde_json::from_str(r#"{"id": 5}"#).unwrap();
    assert_eq!(resp.into_result().unwrap(), Value::Null);
}
