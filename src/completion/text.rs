//! Reply unwrapping for models and gateways that JSON-encode their output.

use serde_json::Value;

/// Object keys that carry the generated text directly.
const TEXT_KEYS: [&str; 5] = [
    "ml_generate_text_result",
    "text",
    "content",
    "output_text",
    "result",
];

/// Keys inspected on the first element of a top-level JSON array.
const LIST_ITEM_KEYS: [&str; 4] = ["content", "text", "output_text", "ml_generate_text_result"];

/// Keys inspected on each entry of a `candidates` array.
const CANDIDATE_TEXT_KEYS: [&str; 3] = ["text", "output_text", "ml_generate_text_result"];

const MAX_DEPTH: usize = 4;

/// Returns the plain text carried by a completion reply.
///
/// Plain-text replies come back unchanged. Replies that are a JSON string,
/// an object with a well-known text key, a `candidates[].content.parts[].text`
/// envelope, or a list whose first element holds text are unwrapped. Anything
/// that does not parse as one of those shapes is returned as-is.
pub fn extract_completion_text(raw: &str) -> String {
    let trimmed = raw.trim();
    let looks_encoded = trimmed.starts_with('{')
        || trimmed.starts_with('[')
        || (trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"'));
    if !looks_encoded {
        return raw.to_string();
    }

    serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(|value| text_from_value(&value, 0))
        .unwrap_or_else(|| raw.to_string())
}

fn text_from_value(value: &Value, depth: usize) -> Option<String> {
    if depth > MAX_DEPTH {
        return None;
    }

    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            for key in TEXT_KEYS {
                if let Some(inner) = map.get(key)
                    && let Some(text) = text_from_value(inner, depth + 1)
                {
                    return Some(text);
                }
            }
            map.get("candidates")
                .and_then(Value::as_array)
                .and_then(|candidates| text_from_candidates(candidates, depth))
        }
        Value::Array(items) => match items.first()? {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => LIST_ITEM_KEYS
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(|inner| text_from_value(inner, depth + 1)),
            _ => None,
        },
        _ => None,
    }
}

fn text_from_candidates(candidates: &[Value], depth: usize) -> Option<String> {
    let mut parts = Vec::new();

    for candidate in candidates {
        let Some(map) = candidate.as_object() else {
            continue;
        };

        for key in CANDIDATE_TEXT_KEYS {
            if let Some(text) = map.get(key).and_then(|v| text_from_value(v, depth + 1)) {
                parts.push(text);
            }
        }

        let content_parts = map
            .get("content")
            .and_then(|c| c.get("parts"))
            .and_then(Value::as_array);
        if let Some(content_parts) = content_parts {
            parts.extend(
                content_parts
                    .iter()
                    .filter_map(|p| p.get("text"))
                    .filter_map(Value::as_str)
                    .map(str::to_string),
            );
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}
