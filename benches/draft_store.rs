//! Benchmarks for draft bookkeeping on large grids
//!
//! Run with: cargo bench draft_store

use stockgrid::model::{CellKey, FieldValue, Row, RowId};
use stockgrid::update::update;
use stockgrid::{ColumnDef, DraftStore, FieldType, GridModel, GridMsg, MemorySource};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            Row::new(format!("row-{}", i))
                .with("name", format!("Item {}", i))
                .with("qty", i as f64)
        })
        .collect()
}

/// Store with one dirty draft per row
fn dirty_store(count: usize) -> DraftStore {
    let mut store = DraftStore::new();
    for i in 0..count {
        let key = CellKey::new(format!("row-{}", i), "qty");
        store.begin_edit(key.clone(), FieldValue::Number(i as f64));
        let _ = store.update(&key, FieldValue::Number(i as f64 + 1.0));
    }
    store
}

// ============================================================================
// Dirty flags
// ============================================================================

#[divan::bench(args = [100, 1000, 10000])]
fn has_unsaved_changes(bencher: divan::Bencher, count: usize) {
    let store = dirty_store(count);
    bencher.bench_local(|| divan::black_box(store.has_unsaved_changes()));
}

#[divan::bench(args = [100, 1000, 10000])]
fn is_row_dirty(bencher: divan::Bencher, count: usize) {
    let store = dirty_store(count);
    let row = RowId::from(format!("row-{}", count / 2));
    bencher.bench_local(|| divan::black_box(store.is_row_dirty(&row)));
}

// ============================================================================
// Bulk save / discard
// ============================================================================

#[divan::bench(args = [100, 1000, 10000])]
fn save_all(bencher: divan::Bencher, count: usize) {
    bencher
        .with_inputs(|| (dirty_store(count), MemorySource::new(rows(count))))
        .bench_local_values(|(mut store, mut source)| {
            divan::black_box(store.save_all(&mut source))
        });
}

#[divan::bench(args = [100, 1000, 10000])]
fn discard_all(bencher: divan::Bencher, count: usize) {
    bencher
        .with_inputs(|| dirty_store(count))
        .bench_local_values(|mut store| divan::black_box(store.discard_all()));
}

// ============================================================================
// Edit session round trip
// ============================================================================

#[divan::bench(args = [100, 1000])]
fn edit_cell_round_trip(bencher: divan::Bencher, count: usize) {
    let columns = vec![
        ColumnDef::new("name", FieldType::Text),
        ColumnDef::new("qty", FieldType::Number),
    ];
    let mut model = GridModel::new(columns, rows(count));
    let mut n = 0usize;

    bencher.bench_local(|| {
        n = (n + 1) % count;
        update(&mut model, GridMsg::activate(&format!("row-{}", n), "qty"));
        update(&mut model, GridMsg::input("42"));
        divan::black_box(update(&mut model, GridMsg::Complete))
    });
}
