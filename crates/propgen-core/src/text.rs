//! Text helpers shared by prompts, parsers and renderers.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

static EXCESS_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("static regex"));

static NON_ALNUM_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));

/// Byte sequences produced when UTF-8 text is decoded as Windows-1252 and
/// re-encoded, paired with the character they should have been.
const MOJIBAKE: &[(&str, &str)] = &[
    ("â€™", "\u{2019}"),
    ("â€˜", "\u{2018}"),
    ("â€œ", "\u{201C}"),
    ("â€\u{9d}", "\u{201D}"),
    ("â€“", "\u{2013}"),
    ("â€”", "\u{2014}"),
    ("â€¦", "\u{2026}"),
    ("â€¢", "\u{2022}"),
    ("Â£", "£"),
    ("Â ", " "),
    ("Ã©", "é"),
    ("Ã¨", "è"),
    ("Ã¼", "ü"),
    ("Ã¶", "ö"),
];

/// Normalizes free text before it is interpolated into an LLM prompt.
///
/// Line endings become `\n`, every line is trimmed, runs of three or more
/// newlines collapse to two, and the whole string is trimmed. The function is
/// idempotent.
#[must_use]
pub fn sanitize_for_prompt(input: &str) -> String {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed_lines = normalized
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    EXCESS_BLANK_LINES
        .replace_all(&trimmed_lines, "\n\n")
        .trim()
        .to_string()
}

/// Repairs common Windows-1252 mojibake and drops replacement characters.
#[must_use]
pub fn fix_encoding(input: &str) -> String {
    if input.is_ascii() {
        return input.to_string();
    }
    let mut out = input.to_string();
    for (broken, fixed) in MOJIBAKE {
        if out.contains(broken) {
            out = out.replace(broken, fixed);
        }
    }
    out.retain(|c| c != '\u{FFFD}');
    out
}

/// Recursively cleans a parsed LLM payload before typed deserialization.
///
/// `null` object members are removed so serde defaults apply instead of
/// failing on a missing value, `null` array items are dropped, and every
/// string is passed through [`fix_encoding`].
pub fn sanitize_content_value(value: &mut Value) {
    match value {
        Value::String(s) => {
            let fixed = fix_encoding(s);
            if fixed != *s {
                *s = fixed;
            }
        }
        Value::Array(items) => {
            items.retain(|v| !v.is_null());
            items.iter_mut().for_each(sanitize_content_value);
        }
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(sanitize_content_value);
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Lowercases and collapses every non-alphanumeric run to a single hyphen.
#[must_use]
pub fn slugify(input: &str) -> String {
    let lower = input.to_lowercase();
    NON_ALNUM_RUN
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Artifact filename: `<company-slug>-seo-proposal-<number or date>.<ext>`.
#[must_use]
pub fn proposal_filename(
    company_name: &str,
    proposal_number: Option<&str>,
    date: NaiveDate,
    extension: &str,
) -> String {
    let mut slug = slugify(company_name);
    if slug.is_empty() {
        slug = "company".to_string();
    }
    let suffix = proposal_number
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| date.format("%Y-%m-%d").to_string());
    format!("{slug}-seo-proposal-{suffix}.{extension}")
}

/// First comma-separated segment of a free-text location ("Leeds, UK" → "Leeds").
#[must_use]
pub fn primary_city(location: &str) -> String {
    location
        .split([',', ';', '/'])
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Thousands-separated integer ("12,500").
#[must_use]
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole pounds ("£2,000").
#[must_use]
pub fn format_gbp(value: u64) -> String {
    format!("£{}", format_number(value))
}

/// At most `max_chars` characters of `text`, for error messages and logs.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
