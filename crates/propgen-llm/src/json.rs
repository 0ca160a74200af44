//! Pulling a JSON document out of free-text model output.

use serde::de::DeserializeOwned;
use serde_json::Value;

use propgen_core::text::{excerpt, sanitize_content_value};

use crate::error::LlmError;

const EXCERPT_CHARS: usize = 200;

/// Removes one surrounding markdown code fence (```` ```json … ``` ````), if any.
///
/// The fence may span lines or sit on a single line; an info string is only
/// dropped when whitespace separates it from the body.
#[must_use]
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = after_open.trim_end();
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    let info_len = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.')))
        .unwrap_or(inner.len());
    let (info, rest) = inner.split_at(info_len);
    let body = if info.starts_with(|c: char| c.is_ascii_alphabetic())
        && rest.starts_with(char::is_whitespace)
    {
        rest
    } else {
        inner
    };
    body.trim()
}

/// The span from the first `{` to the last `}`, when it parses.
fn brace_span(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start >= end {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// Parses model output as JSON.
///
/// A surrounding code fence is stripped first. When that still fails, the
/// span from the first `{` to the last `}` is tried, in the unfenced text and
/// then in the raw output, which recovers output with a sentence of preamble.
///
/// # Errors
///
/// Returns [`LlmError::InvalidJson`] carrying an excerpt of the original text.
pub fn extract_json(raw: &str) -> Result<Value, LlmError> {
    let candidate = strip_code_fence(raw);
    match serde_json::from_str(candidate) {
        Ok(value) => Ok(value),
        Err(first) => brace_span(candidate)
            .or_else(|| brace_span(raw))
            .ok_or_else(|| LlmError::InvalidJson {
                excerpt: excerpt(raw.trim(), EXCERPT_CHARS),
                source: first,
            }),
    }
}

/// [`extract_json`], then [`sanitize_content_value`], then typed
/// deserialization, so `null` members fall back to serde defaults.
///
/// # Errors
///
/// Returns [`LlmError::InvalidJson`] when the text is not JSON, or
/// [`LlmError::Deserialize`] when it does not match `T`.
pub fn parse_json<T: DeserializeOwned>(raw: &str, context: &str) -> Result<T, LlmError> {
    let mut value = extract_json(raw)?;
    sanitize_content_value(&mut value);
    serde_json::from_value(value).map_err(|e| LlmError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn samples() -> Vec<Value> {
        vec![
            json!({}),
            json!([]),
            json!({"a": 1, "b": [true, null, "x"], "c": {"d": -2.5}}),
            json!({"text": "contains ``` backticks and } braces {"}),
            json!({"unicode": "£2,000 — “quoted”", "nested": [[1], [2, [3]]]}),
            json!(["top", "level", "array"]),
            json!(42),
        ]
    }

    #[test]
    fn fenced_json_round_trips() {
        for value in samples() {
            let serialized = serde_json::to_string(&value).unwrap();
            for wrapped in [
                format!("```json\n{serialized}\n```"),
                format!("```\n{serialized}\n```"),
                format!("  ```json\n{serialized}```  \n"),
                serialized.clone(),
            ] {
                assert_eq!(extract_json(&wrapped).unwrap(), value, "input: {wrapped}");
            }
        }
    }

    #[test]
    fn single_line_fences_are_unwrapped() {
        for raw in [
            "```json {\"a\": 1} ```",
            "```{\"a\": 1}```",
            "```JSON\t{\"a\": 1}```",
        ] {
            assert_eq!(extract_json(raw).unwrap(), json!({"a": 1}), "input: {raw}");
        }
        assert_eq!(extract_json("```[1, 2]```").unwrap(), json!([1, 2]));
        assert_eq!(extract_json("```true```").unwrap(), json!(true));
    }

    #[test]
    fn unterminated_fence_still_parses() {
        assert_eq!(extract_json("```json\n{\"a\": 1}").unwrap(), json!({"a": 1}));
    }

    #[test]
    fn typed_parse_treats_nulls_as_missing() {
        #[derive(Debug, Default, serde::Deserialize)]
        struct Inner {
            #[serde(default)]
            n: u32,
        }
        #[derive(Debug, serde::Deserialize)]
        struct Outer {
            #[serde(default)]
            inner: Inner,
            #[serde(default)]
            items: Vec<String>,
        }
        let parsed: Outer =
            parse_json(r#"{"inner": null, "items": ["a", null]}"#, "test").unwrap();
        assert_eq!(parsed.inner.n, 0);
        assert_eq!(parsed.items, vec!["a"]);
    }

    #[test]
    fn pretty_printed_json_in_fence() {
        let value = json!({"coverPage": {"companyName": "Acme Roofing"}});
        let wrapped = format!("```json\n{}\n```", serde_json::to_string_pretty(&value).unwrap());
        assert_eq!(extract_json(&wrapped).unwrap(), value);
    }

    #[test]
    fn preamble_before_object_is_tolerated() {
        let raw = "Here is the research you asked for:\n{\"ok\": true}\nLet me know!";
        assert_eq!(extract_json(raw).unwrap(), json!({"ok": true}));
    }

    #[test]
    fn malformed_output_reports_excerpt() {
        let raw = "Sure, here's your proposal: {not valid json";
        match extract_json(raw) {
            Err(LlmError::InvalidJson { excerpt, .. }) => {
                assert!(excerpt.starts_with("Sure, here's your proposal"));
            }
            other => panic!("expected InvalidJson, got {other:?}"),
        }
    }

    #[test]
    fn excerpt_is_bounded() {
        let raw = format!("oops {}", "x".repeat(5_000));
        let Err(LlmError::InvalidJson { excerpt, .. }) = extract_json(&raw) else {
            panic!("expected InvalidJson");
        };
        assert!(excerpt.chars().count() <= EXCERPT_CHARS + 1);
    }

    #[test]
    fn typed_parse_reports_context() {
        #[derive(Debug, serde::Deserialize)]
        struct Needs {
            #[allow(dead_code)]
            field: u32,
        }
        let err = parse_json::<Needs>("{\"other\": 1}", "research").unwrap_err();
        assert!(matches!(err, LlmError::Deserialize { ref context, .. } if context == "research"));
    }
}
