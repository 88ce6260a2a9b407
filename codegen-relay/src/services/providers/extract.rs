//! Strategies for pulling generated text out of a provider's JSON reply.

use serde_json::Value;

/// Maps a raw provider reply to its generated text, if any.
pub type TextExtractor = fn(&Value) -> Option<String>;

/// `candidates[0].content.parts[*].text`, concatenated.
pub fn candidate_text(response: &Value) -> Option<String> {
    let parts = response
        .pointer("/candidates/0/content/parts")?
        .as_array()?;

    let texts: Vec<&str> = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

/// `choices[0].text`.
pub fn choice_text(response: &Value) -> Option<String> {
    response
        .pointer("/choices/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
}
