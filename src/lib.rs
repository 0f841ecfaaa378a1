//! stockgrid - draft/commit editing core for typed data grids
//!
//! Many independently editable cells accumulate pending edits in a
//! [`DraftStore`](draft::DraftStore); the grid exposes an aggregate
//! "has unsaved changes" flag and bulk save/discard. The state machine follows
//! the Elm Architecture: [`GridModel`] is plain data, [`GridMsg`] drives
//! [`update::update`], and [`GridController`] executes the resulting [`Cmd`]s.

pub mod atom;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod controller;
pub mod csv;
pub mod draft;
pub mod messages;
pub mod model;
pub mod source;
pub mod tracing;
pub mod update;
pub mod validate;

// Re-export commonly used types
pub use commands::{Cmd, Damage, GridEvent};
pub use config::GridConfig;
pub use controller::GridController;
pub use draft::{CommitError, DraftStore, SaveReport, WriteError};
pub use messages::GridMsg;
pub use model::{CellKey, ColumnDef, FieldPath, FieldType, FieldValue, GridModel, Row, RowId};
pub use source::{DataSource, MemorySource};
