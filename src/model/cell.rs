//! Cell addressing: row identity, field path, cell key

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, stable identity of one record across renders, paging and sorting
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Name of one editable attribute within a row.
///
/// Nested attributes use dotted paths (`contact.email`). Paths are normalized
/// on construction: segments are trimmed and empty segments dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(path: &str) -> Self {
        let normalized = path
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(".");
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }

    pub fn is_nested(&self) -> bool {
        self.0.contains('.')
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.0
    }
}

/// Addressing unit of the draft store: (row identity, field path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    pub row: RowId,
    pub field: FieldPath,
}

impl CellKey {
    pub fn new(row: impl Into<RowId>, field: impl Into<FieldPath>) -> Self {
        Self {
            row: row.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path_normalizes() {
        assert_eq!(FieldPath::new(" contact . email ").as_str(), "contact.email");
        assert_eq!(FieldPath::new("a..b.").as_str(), "a.b");
        assert!(FieldPath::new("...").is_empty());
    }

    #[test]
    fn test_field_path_segments() {
        let path = FieldPath::new("contact.address.city");
        let segments: Vec<&str> = path.segments().collect();
        assert_eq!(segments, vec!["contact", "address", "city"]);
        assert!(path.is_nested());
        assert!(!FieldPath::new("name").is_nested());
    }

    #[test]
    fn test_cell_key_display() {
        let key = CellKey::new("row-1", "contact.email");
        assert_eq!(key.to_string(), "row-1:contact.email");
    }

    #[test]
    fn test_cell_key_equality_uses_normalized_path() {
        assert_eq!(CellKey::new("r", "a.b"), CellKey::new("r", "a. b"));
        assert_ne!(CellKey::new("r", "a"), CellKey::new("s", "a"));
    }
}
