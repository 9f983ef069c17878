//! Structural edits on content documents
//!
//! Every edit is a pure function: it takes the current root and returns a
//! new root, leaving the input untouched. Only the node at the target path
//! changes; key sets and array lengths everywhere else are preserved.

use crate::path::{EditPath, PathSegment};
use crate::value::{placeholder_item, zeroed};
use serde_json::Value;

/// Errors from structural edits
///
/// None of these leave a partially edited value behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// A segment of the path does not exist in the current value
    #[error("path not found: '{0}'")]
    PathNotFound(EditPath),

    /// Array operation on a node that is not an array
    #[error("not an array: '{0}'")]
    NotAnArray(EditPath),

    /// Array index past the end
    #[error("index {index} out of range for array of length {len} at '{path}'")]
    IndexOutOfRange {
        path: EditPath,
        index: usize,
        len: usize,
    },
}

/// Read the node at `path`
#[must_use]
pub fn get<'a>(root: &'a Value, path: &EditPath) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, segment| match (node, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Array(items), PathSegment::Index(i)) => items.get(*i),
        _ => None,
    })
}

fn get_mut<'a>(root: &'a mut Value, path: &EditPath) -> Option<&'a mut Value> {
    path.iter().try_fold(root, |node, segment| match (node, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get_mut(key),
        (Value::Array(items), PathSegment::Index(i)) => items.get_mut(*i),
        _ => None,
    })
}

/// Copy `root`, then run `edit` on the copy's node at `path`
fn edit_at<F>(root: &Value, path: &EditPath, edit: F) -> Result<Value, EditError>
where
    F: FnOnce(&mut Value) -> Result<(), EditError>,
{
    let mut next = root.clone();
    let target = get_mut(&mut next, path).ok_or_else(|| EditError::PathNotFound(path.clone()))?;
    edit(target)?;
    Ok(next)
}

/// Replace the node at `path` with `new_value`
///
/// The empty path replaces the whole root.
///
/// # Errors
/// [`EditError::PathNotFound`] if any segment is missing
pub fn set_value(root: &Value, path: &EditPath, new_value: Value) -> Result<Value, EditError> {
    edit_at(root, path, |target| {
        *target = new_value;
        Ok(())
    })
}

/// Append an item to the array at `path`
///
/// The new item copies the shape of the first element with every leaf
/// reset (see [`zeroed`]); an empty array receives a placeholder object.
///
/// # Errors
/// - [`EditError::PathNotFound`] if the path is missing
/// - [`EditError::NotAnArray`] if the node is not an array
pub fn append_array_item(root: &Value, path: &EditPath) -> Result<Value, EditError> {
    edit_at(root, path, |target| match target {
        Value::Array(items) => {
            let item = items.first().map_or_else(placeholder_item, zeroed);
            items.push(item);
            Ok(())
        }
        _ => Err(EditError::NotAnArray(path.clone())),
    })
}

/// Remove the item at `index` from the array at `path`
///
/// Later items shift down by one.
///
/// # Errors
/// - [`EditError::PathNotFound`] if the path is missing
/// - [`EditError::NotAnArray`] if the node is not an array
/// - [`EditError::IndexOutOfRange`] if `index >= len`
pub fn remove_array_item(root: &Value, path: &EditPath, index: usize) -> Result<Value, EditError> {
    edit_at(root, path, |target| match target {
        Value::Array(items) if index < items.len() => {
            items.remove(index);
            Ok(())
        }
        Value::Array(items) => Err(EditError::IndexOutOfRange {
            path: path.clone(),
            index,
            len: items.len(),
        }),
        _ => Err(EditError::NotAnArray(path.clone())),
    })
}
