//! Value coercion: check a raw attribute value against its kind and turn it
//! into the text that ends up in the generated code.

use crate::error::CoerceError;
use crate::schema::{self, ItemType, ValueKind};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

static RE_SHORTCUT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]$").unwrap());

/// Coerce a raw value for an attribute of the given kind.
///
/// One layer of matching quotes is removed first, whatever the kind.
pub fn coerce(kind: ValueKind, raw: &str) -> Result<String, CoerceError> {
    let value = strip_quotes(raw);
    match kind {
        ValueKind::Str => Ok(value.to_string()),
        ValueKind::Int => coerce_int(value),
        ValueKind::ItemType => coerce_type(value),
        ValueKind::Shortcut => coerce_shortcut(value),
        ValueKind::ModifierCombo => Ok(coerce_modifiers(value)),
    }
}

/// Remove one layer of matching `'` or `"` around `value`.
pub fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn coerce_int(value: &str) -> Result<String, CoerceError> {
    value
        .trim()
        .parse::<i64>()
        .map(|n| n.to_string())
        .map_err(|_| CoerceError::NotAnInteger {
            value: value.to_string(),
        })
}

fn coerce_type(value: &str) -> Result<String, CoerceError> {
    match ItemType::from_tag(value) {
        Some(t) => Ok(t.tag().to_string()),
        None => Err(CoerceError::UnknownType {
            value: value.to_string(),
            expected: schema::type_names(),
        }),
    }
}

fn coerce_shortcut(value: &str) -> Result<String, CoerceError> {
    if value == schema::SHORTCUT_NONE {
        return Ok(value.to_string());
    }
    if RE_SHORTCUT.is_match(value) {
        return Ok(format!("'{}'", value));
    }
    Err(CoerceError::InvalidShortcut {
        value: value.to_string(),
    })
}

/// A number is kept as written; otherwise `alt-ctrl` style names are mapped
/// to their flag symbols and OR-ed together.
fn coerce_modifiers(value: &str) -> String {
    if value.trim().parse::<i64>().is_ok() {
        return value.to_string();
    }
    let lowered = value.to_lowercase();
    let mut symbols = Vec::new();
    for part in lowered.split('-').map(str::trim) {
        match schema::modifier_symbol(part) {
            Some(symbol) => symbols.push(symbol),
            None if part.is_empty() => {}
            None => warn!("ignoring unknown modifier '{}' in '{}'", part, value),
        }
    }
    if symbols.is_empty() {
        return "0".to_string();
    }
    symbols.join(schema::MODIFIER_JOIN)
}
