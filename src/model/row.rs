//! Row records and the per-render row snapshot

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::cell::{FieldPath, RowId};
use super::value::FieldValue;

/// One data record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub fields: BTreeMap<String, FieldValue>,
}

impl Row {
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter, for fixtures
    pub fn with(mut self, path: &str, value: impl Into<FieldValue>) -> Self {
        self.set(&FieldPath::new(path), value.into());
        self
    }

    /// Resolve a (possibly nested) field path
    pub fn get(&self, path: &FieldPath) -> Option<&FieldValue> {
        let mut segments = path.segments();
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            match current {
                FieldValue::Record(map) => current = map.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Set a (possibly nested) field, creating intermediate records.
    ///
    /// Missing or null intermediates become records. Returns false when an
    /// intermediate segment holds any other scalar value.
    pub fn set(&mut self, path: &FieldPath, value: FieldValue) -> bool {
        let segments: Vec<&str> = path.segments().collect();
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };

        let mut map = &mut self.fields;
        for segment in parents {
            let slot = map
                .entry((*segment).to_string())
                .or_insert_with(|| FieldValue::Record(BTreeMap::new()));
            if slot.is_null() {
                *slot = FieldValue::Record(BTreeMap::new());
            }
            match slot {
                FieldValue::Record(inner) => map = inner,
                _ => return false,
            }
        }
        map.insert((*last).to_string(), value);
        true
    }
}

/// Ordered row collection with O(1) lookup by identity
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    rows: Vec<Row>,
    index: HashMap<RowId, usize>,
}

impl RowSet {
    pub fn new(rows: Vec<Row>) -> Self {
        let mut set = Self::default();
        set.replace_all(rows);
        set
    }

    /// Replace the whole collection (a new render pass / refetch).
    ///
    /// Later duplicates of an identity replace earlier ones.
    pub fn replace_all(&mut self, rows: Vec<Row>) {
        self.rows.clear();
        self.index.clear();
        for row in rows {
            self.upsert(row);
        }
    }

    /// Insert a row, or replace the row with the same identity in place
    pub fn upsert(&mut self, row: Row) {
        match self.index.get(&row.id) {
            Some(&idx) => self.rows[idx] = row,
            None => {
                self.index.insert(row.id.clone(), self.rows.len());
                self.rows.push(row);
            }
        }
    }

    pub fn get(&self, id: &RowId) -> Option<&Row> {
        self.index.get(id).map(|&idx| &self.rows[idx])
    }

    pub fn contains(&self, id: &RowId) -> bool {
        self.index.contains_key(id)
    }

    pub fn value(&self, id: &RowId, path: &FieldPath) -> Option<&FieldValue> {
        self.get(id).and_then(|row| row.get(path))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_nested_get_set() {
        let mut row = Row::new("r1").with("name", "Acme");
        assert!(row.set(&FieldPath::new("contact.email"), FieldValue::text("a@acme.test")));

        assert_eq!(
            row.get(&FieldPath::new("contact.email")),
            Some(&FieldValue::text("a@acme.test"))
        );
        assert_eq!(row.get(&FieldPath::new("name")), Some(&FieldValue::text("Acme")));
        assert_eq!(row.get(&FieldPath::new("contact.phone")), None);
    }

    #[test]
    fn test_row_set_through_scalar_fails() {
        let mut row = Row::new("r1").with("name", "Acme");
        assert!(!row.set(&FieldPath::new("name.first"), FieldValue::text("x")));
        assert_eq!(row.get(&FieldPath::new("name")), Some(&FieldValue::text("Acme")));
    }

    #[test]
    fn test_row_set_empty_path_fails() {
        let mut row = Row::new("r1");
        assert!(!row.set(&FieldPath::new(""), FieldValue::Null));
        assert!(row.fields.is_empty());
    }

    #[test]
    fn test_row_set_upsert_keeps_order() {
        let mut set = RowSet::new(vec![Row::new("a"), Row::new("b")]);
        set.upsert(Row::new("a").with("qty", 3.0));
        set.upsert(Row::new("c"));

        let ids: Vec<&str> = set.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(
            set.value(&RowId::from("a"), &FieldPath::new("qty")),
            Some(&FieldValue::Number(3.0))
        );
    }
}
