//! Tolerant JSON recovery from free-form model responses.
//!
//! Models routinely wrap or decorate their JSON, so malformed output is
//! expected and not an error in itself. Decoding runs three pure tiers in
//! strict order with first-success semantics:
//!
//! 1. the whole response parses as a JSON object;
//! 2. a fenced code block (optionally tagged `json`) contains the object;
//! 3. the greedy span from the first `{` to the last `}` parses.
//!
//! Absence of a value is the only failure signal; the caller always has a
//! deterministic fallback payload of its own.

use serde_json::Value;

type DecodeTier = fn(&str) -> Option<Value>;

const TIERS: [DecodeTier; 3] = [decode_direct, decode_fenced, decode_embedded];

/// Extracts a JSON object from a raw model response, or `None` when no
/// decoding tier succeeds.
pub fn decode_json_response(raw: &str) -> Option<Value> {
    TIERS.iter().find_map(|tier| tier(raw))
}

fn decode_direct(raw: &str) -> Option<Value> {
    serde_json::from_str::<Value>(raw.trim())
        .ok()
        .filter(Value::is_object)
}

fn decode_fenced(raw: &str) -> Option<Value> {
    let start = raw.find("```")?;
    let after_fence = &raw[start + 3..];
    let end = after_fence.find("```")?;
    let mut interior = &after_fence[..end];

    if let Some(stripped) = interior.trim_start().strip_prefix("json") {
        interior = stripped;
    }

    brace_span(interior).and_then(decode_direct)
}

fn decode_embedded(raw: &str) -> Option<Value> {
    brace_span(raw).and_then(decode_direct)
}

/// The greedy span from the first `{` to the last `}`, if any.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end >= start).then(|| &text[start..=end])
}
