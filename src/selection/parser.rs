use tracing::debug;

use crate::completion::extract_completion_text;
use crate::constants::{LABEL_CONFIDENCE, LABEL_SELECTED_ID, REPLY_LABELS};
use crate::ranking::Candidate;

use super::error::{ParseFailure, ParseFailureReason};
use super::types::{Confidence, Selection};

/// Parses `raw_text` against the candidates that were shown to the model.
///
/// Labels are matched case-insensitively at the start of a line, ignoring
/// list markers and markdown emphasis. A field's value is the rest of its
/// label line plus any following non-blank lines that do not start another
/// label. When a label repeats, the first occurrence wins. Brackets, quotes
/// and trailing commas are removed from the id and confidence only; free-text
/// fields are trimmed and otherwise kept as written.
pub fn parse_selection(
    raw_text: &str,
    candidates: &[Candidate],
) -> Result<Selection, ParseFailure> {
    let fail = |reason| ParseFailure::new(raw_text, reason);

    let text = extract_completion_text(raw_text);
    if text.trim().is_empty() {
        return Err(fail(ParseFailureReason::EmptyReply));
    }

    let fields = collect_fields(&text);

    let mut values: [String; 5] = Default::default();
    for (slot, label) in REPLY_LABELS.into_iter().enumerate() {
        let clean = if label == LABEL_SELECTED_ID || label == LABEL_CONFIDENCE {
            clean_token
        } else {
            clean_text
        };
        let value = fields[slot]
            .as_ref()
            .map(|lines| clean(&lines.join("\n")))
            .filter(|v| !v.is_empty())
            .ok_or_else(|| fail(ParseFailureReason::MissingField { label }))?;
        values[slot] = value;
    }

    let [selected_id, product_name, reasoning, confidence, key_features] = values;

    if !candidates.iter().any(|c| c.id == selected_id) {
        debug!(
            selected_id = %selected_id,
            candidates = candidates.len(),
            "Reply names unknown candidate"
        );
        return Err(fail(ParseFailureReason::UnknownCandidate { id: selected_id }));
    }

    let confidence: Confidence = confidence.parse().map_err(fail)?;

    Ok(Selection {
        selected_id,
        product_name,
        reasoning,
        confidence,
        key_features,
    })
}

fn collect_fields(text: &str) -> [Option<Vec<String>>; 5] {
    let mut fields: [Option<Vec<String>>; 5] = Default::default();
    let mut current: Option<usize> = None;

    for line in text.lines() {
        if let Some((slot, value)) = match_label(line) {
            if fields[slot].is_none() {
                fields[slot] = Some(vec![value.to_string()]);
                current = Some(slot);
            } else {
                current = None;
            }
            continue;
        }

        if line.trim().is_empty() {
            current = None;
            continue;
        }

        if let Some(slot) = current
            && let Some(lines) = fields[slot].as_mut()
        {
            lines.push(line.trim_end().to_string());
        }
    }

    fields
}

/// Returns the label slot and the text after the colon, if `line` starts a field.
fn match_label(line: &str) -> Option<(usize, &str)> {
    let stripped =
        line.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '*' | '#' | '>'));

    REPLY_LABELS.into_iter().enumerate().find_map(|(slot, label)| {
        let head = stripped.get(..label.len())?;
        if !head.eq_ignore_ascii_case(label) {
            return None;
        }
        let rest = stripped[label.len()..].trim_start_matches('*');
        let value = rest.strip_prefix(':')?;
        Some((slot, value.trim_start_matches('*').trim()))
    })
}

/// Trims a free-text value and drops markdown emphasis wrapped around it.
fn clean_text(value: &str) -> String {
    strip_emphasis(value.trim()).to_string()
}

/// Cleans a single-token value such as an id: emphasis, then enclosing
/// brackets, then enclosing quotes, then a trailing comma. Nested wrappers
/// like `["A1"]` or `"[A1]"` are peeled until the value stops changing.
fn clean_token(value: &str) -> String {
    let mut v = strip_emphasis(value.trim());
    loop {
        let before = v;
        v = strip_trailing_comma(v);
        v = strip_pair(v, &[('[', ']'), ('(', ')')]);
        v = strip_pair(v, &[('"', '"'), ('\'', '\'')]);
        v = strip_trailing_comma(v);
        if v == before {
            return v.to_string();
        }
    }
}

fn strip_emphasis(v: &str) -> &str {
    v.strip_prefix("**")
        .and_then(|s| s.strip_suffix("**"))
        .map_or(v, str::trim)
}

fn strip_trailing_comma(v: &str) -> &str {
    v.strip_suffix(',').map_or(v, str::trim_end)
}

fn strip_pair<'a>(v: &'a str, pairs: &[(char, char)]) -> &'a str {
    pairs
        .iter()
        .find_map(|&(open, close)| {
            v.strip_prefix(open)
                .and_then(|s| s.strip_suffix(close))
                .filter(|inner| !inner.contains(close))
        })
        .map_or(v, str::trim)
}
