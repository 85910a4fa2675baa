//! Field-name normalization for wire payloads
//!
//! The remote API reports every field in PascalCase. These pure functions
//! convert keys to the camelCase shape events are delivered in, recursing
//! through nested objects and arrays so no part of a payload escapes
//! unconverted.

use serde_json::{Map, Value};

/// Convert a single key to camelCase
///
/// Words are split at `_`, `-` and space delimiters, at lower-to-upper
/// transitions, and where an acronym ends (`CardID` reads as `Card` + `ID`).
/// Acronyms are folded to a single leading capital, so `CardID` becomes
/// `cardId` and `HTTPStatus` becomes `httpStatus`.
pub fn camel_key(key: &str) -> String {
    let words = split_words(key);
    let mut out = String::with_capacity(key.len());

    for (i, word) in words.iter().enumerate() {
        let mut chars = word.chars();
        if i == 0 {
            out.extend(chars.flat_map(char::to_lowercase));
        } else if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }

    out
}

/// Convert a single key to lower-case hyphenated form
///
/// Uses the same word boundaries as [`camel_key`], so `ActivityTypesChangedEvent`
/// becomes `activity-types-changed-event`.
pub fn kebab_key(key: &str) -> String {
    let words = split_words(key);
    let mut out = String::with_capacity(key.len() + words.len());

    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push('-');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }

    out
}

/// Recursively convert every object key in a JSON value to camelCase
///
/// Objects get their keys converted and their values recursed; arrays recurse
/// element-wise and stay arrays; scalars pass through unchanged.
pub fn camelize(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(camelize_map(map)),
        Value::Array(items) => Value::Array(items.iter().map(camelize).collect()),
        other => other.clone(),
    }
}

/// Recursively convert the keys of a JSON object to camelCase
pub fn camelize_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (camel_key(key), camelize(value)))
        .collect()
}

/// Split an identifier into words at delimiters and case boundaries
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = input.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' || ch == '-' || ch == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() && ch.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |c| c.is_lowercase());
            // New word at aA, 1A, and at the last capital of a run (ABc).
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}
