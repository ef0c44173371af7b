//! HTML-unsafe input sanitization.

use serde_json::Value;

/// Sanitize a single string: drop angle brackets, entity-escape the other
/// HTML-significant characters, and trim surrounding whitespace.
pub fn sanitize_input(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' | '>' => {}
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out.trim().to_string()
}

/// Recursively sanitize every string in a JSON value (objects, arrays, and
/// nested combinations). Non-string scalars pass through untouched.
pub fn sanitize_json(value: &mut Value) {
    match value {
        Value::String(s) => *s = sanitize_input(s),
        Value::Array(items) => {
            for item in items {
                sanitize_json(item);
            }
        }
        Value::Object(map) => {
            for (_, v) in map.iter_mut() {
                sanitize_json(v);
            }
        }
        _ => {}
    }
}
