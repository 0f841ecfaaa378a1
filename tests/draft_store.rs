//! Draft store tests
//!
//! Single-cell and bulk operations against an in-memory data source.

mod common;

use common::{inventory_rows, key};
use stockgrid::draft::{CommitError, DraftStore, WriteError};
use stockgrid::model::{FieldPath, FieldValue, RowId};
use stockgrid::MemorySource;

// ========================================================================
// Single-cell commit
// ========================================================================

#[test]
fn test_commit_one_success_clears_draft() {
    let mut store = DraftStore::new();
    let mut source = MemorySource::new(inventory_rows());
    let k = key("row-1", "name");

    store.begin_edit(k.clone(), FieldValue::text("Acme"));
    store.update(&k, FieldValue::text("Acme Corp")).unwrap();
    let committed = store.commit_one(&k, &mut source).unwrap();

    assert!(store.is_empty());
    assert!(!store.has_unsaved_changes());
    assert_eq!(
        committed.row.get(&FieldPath::new("name")),
        Some(&FieldValue::text("Acme Corp"))
    );
    assert_eq!(
        source.rows().value(&RowId::from("row-1"), &FieldPath::new("name")),
        Some(&FieldValue::text("Acme Corp"))
    );
}

#[test]
fn test_commit_one_failure_keeps_draft_until_discarded() {
    let mut store = DraftStore::new();
    let mut source = MemorySource::new(inventory_rows());
    source.fail_field("name", "backend unavailable");
    let k = key("row-1", "name");

    store.begin_edit(k.clone(), FieldValue::text("Acme"));
    store.update(&k, FieldValue::text("Acme Corp")).unwrap();
    let err = store.commit_one(&k, &mut source).unwrap_err();

    assert_eq!(
        err,
        CommitError::Write(WriteError::Failed("backend unavailable".to_string()))
    );
    let entry = store.get(&k).unwrap();
    assert_eq!(entry.current(), &FieldValue::text("Acme Corp"));
    assert!(!entry.is_in_flight());
    assert!(store.has_unsaved_changes());

    assert!(store.discard_one(&k).is_some());
    assert!(store.is_empty());
    assert!(!store.has_unsaved_changes());
}

#[test]
fn test_commit_one_without_draft() {
    let mut store = DraftStore::new();
    let mut source = MemorySource::new(inventory_rows());
    let err = store.commit_one(&key("row-1", "name"), &mut source).unwrap_err();
    assert!(matches!(err, CommitError::Draft(_)));
    assert!(source.write_log().is_empty());
}

// ========================================================================
// Dirty flags
// ========================================================================

#[test]
fn test_row_dirty_until_discard_all() {
    let mut store = DraftStore::new();
    store.begin_edit(key("row-1", "name"), FieldValue::text("Acme"));
    store.begin_edit(key("row-1", "notes"), FieldValue::text(""));
    store
        .update(&key("row-1", "name"), FieldValue::text("Acme Corp"))
        .unwrap();
    store
        .update(&key("row-1", "notes"), FieldValue::text("call first"))
        .unwrap();

    let row = RowId::from("row-1");
    assert!(store.is_row_dirty(&row));
    assert!(!store.is_row_dirty(&RowId::from("row-2")));

    let discarded = store.discard_all();
    assert_eq!(discarded.len(), 2);
    assert!(store.is_empty());
    assert!(!store.is_row_dirty(&row));
}

#[test]
fn test_typing_the_original_value_is_not_dirty() {
    let mut store = DraftStore::new();
    let k = key("row-1", "qty");
    store.begin_edit(k.clone(), FieldValue::Number(5.0));
    store.update(&k, FieldValue::Number(5.0)).unwrap();

    assert!(store.contains(&k));
    assert!(!store.has_unsaved_changes());
    assert!(!store.is_row_dirty(&RowId::from("row-1")));
}

#[test]
fn test_update_then_discard_restores_nothing_pending() {
    let mut store = DraftStore::new();
    let k = key("row-2", "qty");
    store.begin_edit(k.clone(), FieldValue::Number(12.0));
    store.update(&k, FieldValue::Number(99.0)).unwrap();
    store.discard_one(&k);

    assert_eq!(store.value(&k), None);
    assert!(!store.has_unsaved_changes());
}

// ========================================================================
// Bulk save
// ========================================================================

#[test]
fn test_save_all_partial_failure() {
    let mut store = DraftStore::new();
    let mut source = MemorySource::new(inventory_rows());
    source.fail_cell(key("row-1", "qty"), "locked");
    source.fail_cell(key("row-2", "notes"), "locked");

    let edits = [
        ("row-1", "name", FieldValue::text("Acme"), FieldValue::text("Acme Corp")),
        ("row-1", "qty", FieldValue::Number(5.0), FieldValue::Number(6.0)),
        ("row-2", "notes", FieldValue::text("fragile"), FieldValue::text("ok")),
        ("row-2", "qty", FieldValue::Number(12.0), FieldValue::Number(1.0)),
        ("row-2", "name", FieldValue::text("Globex"), FieldValue::text("Globex Ltd")),
    ];
    for (row, field, original, current) in edits {
        store.begin_edit(key(row, field), original);
        store.update(&key(row, field), current).unwrap();
    }

    let report = store.save_all(&mut source);

    assert_eq!(report.saved_count(), 3);
    assert_eq!(report.failures.len(), 2);
    assert!(!report.is_complete());
    assert_eq!(store.len(), 2);
    assert!(store.contains(&key("row-1", "qty")));
    assert!(store.contains(&key("row-2", "notes")));
    assert_eq!(
        report.failed_keys().cloned().collect::<Vec<_>>(),
        vec![key("row-1", "qty"), key("row-2", "notes")]
    );
    store.assert_invariants();
}

#[test]
fn test_save_all_writes_in_creation_order() {
    let mut store = DraftStore::new();
    let mut source = MemorySource::new(inventory_rows());
    let order = [key("row-2", "qty"), key("row-1", "notes"), key("row-1", "name")];
    for (i, k) in order.iter().enumerate() {
        store.begin_edit(k.clone(), FieldValue::Null);
        store.update(k, FieldValue::text(format!("v{}", i))).unwrap();
    }

    let report = store.save_all(&mut source);

    assert_eq!(source.write_log(), &order);
    assert_eq!(
        report.saved.iter().map(|c| c.key.clone()).collect::<Vec<_>>(),
        order.to_vec()
    );
}

#[test]
fn test_save_all_skips_clean_drafts() {
    let mut store = DraftStore::new();
    let mut source = MemorySource::new(inventory_rows());
    store.begin_edit(key("row-1", "qty"), FieldValue::Number(5.0));
    store.begin_edit(key("row-1", "name"), FieldValue::text("Acme"));
    store
        .update(&key("row-1", "name"), FieldValue::text("Acme Corp"))
        .unwrap();

    let report = store.save_all(&mut source);

    assert_eq!(report.skipped, vec![key("row-1", "qty")]);
    assert_eq!(source.write_log(), &[key("row-1", "name")]);
    assert_eq!(report.into_result(), Ok(1));
    assert!(store.is_empty());
}

#[test]
fn test_save_all_empty_store() {
    let mut store = DraftStore::new();
    let mut source = MemorySource::new(inventory_rows());
    let report = store.save_all(&mut source);
    assert_eq!(report.into_result(), Ok(0));
}

#[test]
fn test_save_all_reports_rejected_writes() {
    let mut store = DraftStore::new();
    let mut source = MemorySource::new(inventory_rows());
    source.set_read_only("name");
    store.begin_edit(key("row-1", "name"), FieldValue::text("Acme"));
    store
        .update(&key("row-1", "name"), FieldValue::text("Acme Corp"))
        .unwrap();
    store.begin_edit(key("row-9", "qty"), FieldValue::Null);
    store.update(&key("row-9", "qty"), FieldValue::Number(1.0)).unwrap();

    let failures = store.save_all(&mut source).into_result().unwrap_err();

    assert_eq!(failures.len(), 2);
    assert!(matches!(
        failures[0].error,
        CommitError::Write(WriteError::Rejected { .. })
    ));
    assert_eq!(
        failures[1].error,
        CommitError::Write(WriteError::RowNotFound(RowId::from("row-9")))
    );
}
