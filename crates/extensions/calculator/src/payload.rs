//! Extraction of the data object embedded in the calculator page.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::CalculatorError;

fn push_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?s)self\.__next_f\.push\(\[1,"(.*?)"\]\)"#).ok())
        .as_ref()
}

/// Decode the largest `self.__next_f.push([1,"…"])` string in `html`.
pub fn extract_next_payload(html: &str) -> Result<String, CalculatorError> {
    let re = push_re().ok_or(CalculatorError::PayloadNotFound)?;
    let raw = re
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .max_by_key(|chunk| chunk.len())
        .ok_or(CalculatorError::PayloadNotFound)?;

    // The chunk is the body of a JSON string literal.
    serde_json::from_str::<String>(&format!("\"{}\"", raw))
        .map_err(|e| CalculatorError::PayloadDecode(e.to_string()))
}

/// Parse the first balanced `{…}` in `payload`.
///
/// Payloads look like `5:["$","$L1a",null,{…}]`. Braces inside string
/// literals do not count.
pub fn extract_json_object(payload: &str) -> Result<Value, CalculatorError> {
    let start = payload.find('{').ok_or(CalculatorError::ObjectNotFound)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in payload[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + c.len_utf8();
                    return Ok(serde_json::from_str(&payload[start..end])?);
                }
            }
            _ => {}
        }
    }

    Err(CalculatorError::UnbalancedObject)
}
