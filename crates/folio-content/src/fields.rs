//! Form generation for schema-less documents
//!
//! Walks a content document depth-first and describes the form the admin
//! dashboard renders for it: a section per nested object, a list control
//! per array (with add/remove buttons), and one input per leaf.

use crate::path::{EditPath, PathSegment};
use crate::value::{classify, text_hint_with, TextHint, ValueKind, LONG_TEXT_THRESHOLD};
use serde::Serialize;
use serde_json::Value;

/// One entry of a generated form, in document order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum FormEntry {
    /// Heading for a nested object
    Section {
        path: EditPath,
        label: String,
        depth: usize,
    },
    /// Array with add/remove-item controls
    List {
        path: EditPath,
        label: String,
        depth: usize,
        len: usize,
    },
    /// Editable leaf
    Field(FormField),
}

impl FormEntry {
    /// Path of the node this entry renders
    #[inline]
    #[must_use]
    pub fn path(&self) -> &EditPath {
        match self {
            Self::Section { path, .. } | Self::List { path, .. } => path,
            Self::Field(field) => &field.path,
        }
    }
}

/// Input for a single leaf value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    /// Where edits to this input are written
    pub path: EditPath,
    /// Human-readable label derived from the key
    pub label: String,
    /// Leaf kind; selects the input widget
    pub kind: ValueKind,
    /// Single-line or multi-line, for strings only
    pub hint: Option<TextHint>,
    /// Nesting depth (root children are depth 0)
    pub depth: usize,
    /// Current value
    pub value: Value,
}

/// Generate the form for `root` with the default long-text threshold
#[inline]
#[must_use]
pub fn form_entries(root: &Value) -> Vec<FormEntry> {
    form_entries_with(root, LONG_TEXT_THRESHOLD)
}

/// Generate the form for `root`
///
/// The root itself gets no entry; its children start at depth 0. A scalar
/// root yields a single field labelled `Value`.
#[must_use]
pub fn form_entries_with(root: &Value, long_text_threshold: usize) -> Vec<FormEntry> {
    let mut entries = Vec::new();
    match root {
        Value::Object(map) => {
            for (key, child) in map {
                walk(child, &EditPath::root().key(key.as_str()), 0, long_text_threshold, &mut entries);
            }
        }
        Value::Array(items) => {
            entries.push(FormEntry::List {
                path: EditPath::root(),
                label: "Items".to_string(),
                depth: 0,
                len: items.len(),
            });
            for (i, child) in items.iter().enumerate() {
                walk(child, &EditPath::root().index(i), 1, long_text_threshold, &mut entries);
            }
        }
        leaf => entries.push(leaf_entry(leaf, EditPath::root(), 0, long_text_threshold)),
    }
    entries
}

fn walk(value: &Value, path: &EditPath, depth: usize, threshold: usize, out: &mut Vec<FormEntry>) {
    match value {
        Value::Object(map) => {
            out.push(FormEntry::Section {
                path: path.clone(),
                label: label_for(path),
                depth,
            });
            for (key, child) in map {
                walk(child, &path.key(key.as_str()), depth + 1, threshold, out);
            }
        }
        Value::Array(items) => {
            out.push(FormEntry::List {
                path: path.clone(),
                label: label_for(path),
                depth,
                len: items.len(),
            });
            for (i, child) in items.iter().enumerate() {
                walk(child, &path.index(i), depth + 1, threshold, out);
            }
        }
        leaf => out.push(leaf_entry(leaf, path.clone(), depth, threshold)),
    }
}

fn leaf_entry(value: &Value, path: EditPath, depth: usize, threshold: usize) -> FormEntry {
    let hint = value.as_str().map(|s| text_hint_with(s, threshold));
    let label = label_for(&path);
    FormEntry::Field(FormField {
        path,
        label,
        kind: classify(value),
        hint,
        depth,
        value: value.clone(),
    })
}

fn label_for(path: &EditPath) -> String {
    match path.last() {
        Some(PathSegment::Key(key)) => humanize(key),
        Some(PathSegment::Index(i)) => format!("Item {}", i + 1),
        None => "Value".to_string(),
    }
}

/// Turn a document key into a label
///
/// `heroTitle`, `hero_title` and `hero-title` all become `Hero title`.
#[must_use]
pub fn humanize(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in key.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }

    let joined = words.join(" ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
