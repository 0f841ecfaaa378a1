//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use stockgrid::config::GridConfig;
use stockgrid::model::{CellKey, ColumnDef, FieldType, GridModel, Row};
use stockgrid::validate::Rule;
use stockgrid::{GridController, GridEvent, GridMsg, MemorySource};

pub fn key(row: &str, field: &str) -> CellKey {
    CellKey::new(row, field)
}

/// Two inventory rows with a nested contact record
pub fn inventory_rows() -> Vec<Row> {
    vec![
        Row::new("row-1")
            .with("name", "Acme")
            .with("notes", "")
            .with("qty", 5.0)
            .with("active", true)
            .with("contact.email", "ops@acme.test"),
        Row::new("row-2")
            .with("name", "Globex")
            .with("notes", "fragile")
            .with("qty", 12.0)
            .with("active", false)
            .with("contact.email", "stock@globex.test"),
    ]
}

pub fn inventory_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("name", FieldType::Text)
            .label("Name")
            .rule(Rule::Required)
            .rule(Rule::MaxLength(20)),
        ColumnDef::new("notes", FieldType::Text),
        ColumnDef::new("qty", FieldType::Number).rule(Rule::MinNumber(0.0)),
        ColumnDef::new("active", FieldType::Bool),
        ColumnDef::new("contact.email", FieldType::Text),
    ]
}

pub fn test_model() -> GridModel {
    GridModel::new(inventory_columns(), inventory_rows())
}

pub fn test_controller() -> GridController<MemorySource> {
    test_controller_with(GridConfig::default())
}

pub fn test_controller_with(config: GridConfig) -> GridController<MemorySource> {
    let model = GridModel::with_config(config, inventory_columns(), inventory_rows());
    GridController::new(model, MemorySource::new(inventory_rows()))
}

/// Collect every event the controller emits
pub fn record_events(controller: &mut GridController<MemorySource>) -> Rc<RefCell<Vec<GridEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    controller.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

/// Activate a cell and type into it, leaving the session open
pub fn type_into(controller: &mut GridController<MemorySource>, row: &str, field: &str, text: &str) {
    controller.dispatch(GridMsg::activate(row, field));
    controller.dispatch(GridMsg::input(text));
}
