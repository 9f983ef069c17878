//! Edit paths for addressing nodes within content documents
//!
//! Provides [`EditPath`], the only addressing mechanism for edits.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter, Write as _};
use std::str::FromStr;

/// One step from a node to one of its children
///
/// Serialized untagged, so a path is a plain JSON array such as
/// `["experience", 2, "title"]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Position within an array
    Index(usize),
    /// Key within an object
    Key(String),
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "[{i}]"),
            Self::Key(k) if is_plain_key(k) => f.write_str(k),
            Self::Key(k) => {
                f.write_str("[\"")?;
                for c in k.chars() {
                    if matches!(c, '"' | '\\') {
                        f.write_char('\\')?;
                    }
                    f.write_char(c)?;
                }
                f.write_str("\"]")
            }
        }
    }
}

/// Keys that can be written bare in the text form
///
/// Anything else is written quoted, as `["v1.2"]`.
fn is_plain_key(key: &str) -> bool {
    !key.is_empty() && !key.chars().any(|c| matches!(c, '.' | '[' | ']'))
}

/// Path from the document root to a node
///
/// Indices are positional: removing an array item shifts the paths of
/// every later sibling, so paths must be recomputed after structural edits.
///
/// # Examples
/// - `[]` → root
/// - `["hero", "title"]` → `hero.title`
/// - `["experience", 2, "title"]` → `experience[2].title`
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditPath(Vec<PathSegment>);

impl EditPath {
    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// Empty path (root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get parent path (if not root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Get last segment (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// Append an object key, returning new path
    #[inline]
    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(PathSegment::Key(key.into()));
        new
    }

    /// Append an array index, returning new path
    #[inline]
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut new = self.clone();
        new.0.push(PathSegment::Index(index));
        new
    }

    /// Check if this path is a prefix of another
    ///
    /// # Examples
    /// - `experience` is prefix of `experience[0].title`
    /// - `experience[0]` is NOT prefix of `experience[1].title`
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        if self.0.len() > other.0.len() {
            return false;
        }
        self.0 == other.0[..self.0.len()]
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &PathSegment> {
        self.0.iter()
    }
}

impl Display for EditPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 && matches!(segment, PathSegment::Key(k) if is_plain_key(k)) {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for EditPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        let mut key = String::new();
        let mut after_bracket = false;
        let mut chars = s.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if key.is_empty() && !after_bracket {
                        return Err(PathError::EmptySegment);
                    }
                    if !key.is_empty() {
                        segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    }
                    match chars.peek() {
                        None => return Err(PathError::EmptySegment),
                        Some('[') => return Err(PathError::InvalidSegment(s.to_string())),
                        Some(_) => {}
                    }
                    after_bracket = false;
                }
                '[' => {
                    if !key.is_empty() {
                        segments.push(PathSegment::Key(std::mem::take(&mut key)));
                    }
                    let segment = if chars.peek() == Some(&'"') {
                        chars.next();
                        PathSegment::Key(parse_quoted_key(&mut chars, s)?)
                    } else {
                        let mut digits = String::new();
                        loop {
                            match chars.next() {
                                Some(']') => break,
                                Some(d) => digits.push(d),
                                None => return Err(PathError::UnclosedIndex(s.to_string())),
                            }
                        }
                        let index = digits
                            .parse::<usize>()
                            .map_err(|_| PathError::InvalidIndex(digits))?;
                        PathSegment::Index(index)
                    };
                    segments.push(segment);
                    after_bracket = true;
                }
                ']' => return Err(PathError::InvalidSegment(s.to_string())),
                other => {
                    if after_bracket {
                        return Err(PathError::InvalidSegment(s.to_string()));
                    }
                    key.push(other);
                }
            }
        }

        if !key.is_empty() {
            segments.push(PathSegment::Key(key));
        }
        Ok(Self(segments))
    }
}

/// Read a quoted key after `["`, consuming the closing `"]`
fn parse_quoted_key(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    s: &str,
) -> Result<String, PathError> {
    let mut key = String::new();
    loop {
        match chars.next() {
            Some('"') => break,
            Some('\\') => match chars.next() {
                Some(escaped) => key.push(escaped),
                None => return Err(PathError::UnclosedIndex(s.to_string())),
            },
            Some(c) => key.push(c),
            None => return Err(PathError::UnclosedIndex(s.to_string())),
        }
    }
    match chars.next() {
        Some(']') => Ok(key),
        None => Err(PathError::UnclosedIndex(s.to_string())),
        Some(_) => Err(PathError::InvalidSegment(s.to_string())),
    }
}

impl From<Vec<PathSegment>> for EditPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

/// Errors parsing a textual edit path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty key between separators
    #[error("path contains empty segment")]
    EmptySegment,

    /// Index brackets not closed
    #[error("unclosed index bracket in '{0}'")]
    UnclosedIndex(String),

    /// Index is not a non-negative integer
    #[error("invalid index: '{0}'")]
    InvalidIndex(String),

    /// Misplaced bracket or key glued to an index
    #[error("invalid segment in path '{0}'")]
    InvalidSegment(String),
}
