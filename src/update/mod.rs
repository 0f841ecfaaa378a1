//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod bulk;
mod session;

use crate::commands::{Cmd, GridEvent};
use crate::messages::GridMsg;
use crate::model::{CellKey, FieldValue, GridModel};
use crate::validate::validate;

#[cfg(debug_assertions)]
use crate::tracing::DraftSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut GridModel, msg: GridMsg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut GridModel, msg: GridMsg) -> Option<Cmd> {
    let was_dirty = model.has_unsaved_changes();

    let mut cmds = match msg {
        GridMsg::Activate(key) => session::activate(model, key),
        GridMsg::Input(text) => session::input(model, &text),
        GridMsg::SetValue(value) => session::set_value(model, value),
        GridMsg::Complete => session::complete(model),
        GridMsg::Cancel => session::cancel(model),
        GridMsg::SetEditable { field, editable } => {
            session::set_editable(model, field, editable)
        }
        GridMsg::CommitCell(key) => bulk::commit_cell(model, key),
        GridMsg::DiscardCell(key) => bulk::discard_cell(model, key),
        GridMsg::SaveAll => bulk::save_all(model),
        GridMsg::DiscardAll => bulk::discard_all(model),
        GridMsg::WriteCompleted { write, result } => bulk::write_completed(model, write, result),
        GridMsg::ReplaceRows(rows) => bulk::replace_rows(model, rows),
    };

    let is_dirty = model.has_unsaved_changes();
    if was_dirty != is_dirty {
        cmds.push(Cmd::Notify(GridEvent::UnsavedChanges(is_dirty)));
    }

    match Cmd::batch(cmds) {
        Cmd::None => None,
        cmd => Some(cmd),
    }
}

/// Run a column's rules against a candidate value
pub(crate) fn check_rules(
    model: &GridModel,
    key: &CellKey,
    value: &FieldValue,
) -> Result<(), Vec<String>> {
    match model.column(&key.field) {
        Some(column) => validate(&column.rules, value),
        None => Ok(()),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after draft state, logs diffs and checks store invariants.
#[cfg(debug_assertions)]
fn update_traced(model: &mut GridModel, msg: GridMsg) -> Option<Cmd> {
    // Keystrokes are too noisy for debug level
    let is_noisy = matches!(&msg, GridMsg::Input(_));

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = DraftSnapshot::from_model(model);

    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(model, msg);

    let after = DraftSnapshot::from_model(model);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "drafts", %diff, "state changed");
    }

    model.drafts.assert_invariants();
    if let Some(session) = &model.session {
        assert!(
            model.drafts.contains(&session.key),
            "session on {} has no draft (after {})",
            session.key,
            msg_name
        );
    }

    result
}

/// Get a display name for a message type
///
/// Payloads that can be large (row sets, write results) are summarised.
#[cfg(debug_assertions)]
fn msg_type_name(msg: &GridMsg) -> String {
    match msg {
        GridMsg::Activate(key) => format!("Activate({})", key),
        GridMsg::Input(text) => format!("Input({:?})", text),
        GridMsg::SetValue(value) => format!("SetValue({:?})", value),
        GridMsg::Complete => "Complete".to_string(),
        GridMsg::Cancel => "Cancel".to_string(),
        GridMsg::CommitCell(key) => format!("CommitCell({})", key),
        GridMsg::DiscardCell(key) => format!("DiscardCell({})", key),
        GridMsg::SaveAll => "SaveAll".to_string(),
        GridMsg::DiscardAll => "DiscardAll".to_string(),
        GridMsg::WriteCompleted { write, result } => format!(
            "WriteCompleted({}, ok={})",
            write.key,
            result.is_ok()
        ),
        GridMsg::SetEditable { field, editable } => {
            format!("SetEditable({}, {})", field, editable)
        }
        GridMsg::ReplaceRows(rows) => format!("ReplaceRows({} rows)", rows.len()),
    }
}
