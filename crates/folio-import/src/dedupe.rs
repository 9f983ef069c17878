//! Tagging and deduplication of seed records
//!
//! The same logical entity (an experience listed both as "work" and as
//! "film") may appear in several source groups. Records are tagged with their
//! group's category, concatenated in group order, then collapsed by a
//! composite key.

use crate::config::DedupKeyFields;
use folio_store::Record;
use indexmap::IndexMap;
use serde_json::Value;
use std::hash::Hash;

/// Separator between the two normalized parts of a composite key
///
/// ASCII unit separator: cannot appear in trimmed titles or company names
/// typed by a person, so `("a b", "c")` and `("a", "b c")` never collide.
pub const DEDUP_KEY_SEPARATOR: char = '\u{1f}';

/// Copy each record with `field` set to `value`
///
/// Inputs are not modified. An existing field of the same name is
/// overwritten in place; otherwise the field is appended.
#[must_use]
pub fn tag_group(records: &[Record], field: &str, value: &str) -> Vec<Record> {
    records
        .iter()
        .cloned()
        .map(|mut record| {
            record.insert(field, value);
            record
        })
        .collect()
}

/// Collapse items with equal keys
///
/// Last write wins: a later item replaces an earlier one with the same key,
/// but keeps the position where that key was first seen. The output order is
/// first-seen key order. Idempotent for a fixed `key_fn`.
pub fn dedupe_by_key<T, K, I, F>(items: I, mut key_fn: F) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    K: Hash + Eq,
    F: FnMut(&T) -> K,
{
    // IndexMap::insert on an existing key replaces the value in its original slot
    let mut by_key: IndexMap<K, T> = IndexMap::new();
    for item in items {
        by_key.insert(key_fn(&item), item);
    }
    by_key.into_values().collect()
}

/// Dedup key of an experience record
///
/// `lower(trim(primary))` + [`DEDUP_KEY_SEPARATOR`] + `lower(trim(secondary))`.
/// Missing or null fields count as empty; numbers and booleans use their
/// JSON text.
#[must_use]
pub fn experience_key(record: &Record, fields: &DedupKeyFields) -> String {
    let mut key = normalized_field(record, &fields.primary);
    key.push(DEDUP_KEY_SEPARATOR);
    key.push_str(&normalized_field(record, &fields.secondary));
    key
}

fn normalized_field(record: &Record, field: &str) -> String {
    match record.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_lowercase(),
        Some(other) => other.to_string().trim().to_lowercase(),
    }
}
