//! Edit session handlers: activation, typing, complete, cancel

use tracing::{debug, warn};

use super::{bulk, check_rules};
use crate::atom::{AtomEvent, FieldEditor};
use crate::commands::Cmd;
use crate::config::BlurBehavior;
use crate::draft::DraftStore;
use crate::model::{CellKey, EditSession, FieldPath, FieldType, FieldValue, GridModel};

/// Open an edit session, finalizing any other open session first
pub(super) fn activate(model: &mut GridModel, key: CellKey) -> Vec<Cmd> {
    if model.session_for(&key).is_some() {
        return Vec::new();
    }
    if !model.rows.contains(&key.row) {
        warn!(target: "session", %key, "activation on unknown row ignored");
        return Vec::new();
    }
    if !model.is_editable(&key.field) {
        debug!(target: "session", %key, "activation on read-only cell ignored");
        return Vec::new();
    }

    let mut cmds = Vec::new();
    if model.session.is_some() {
        cmds.extend(blur(model));
    }

    let original = model.authoritative(&key);
    let previous = model.drafts.value(&key).cloned();
    model.drafts.begin_edit(key.clone(), original.clone());
    let (baseline, seed) = match model.drafts.get(&key) {
        Some(entry) => (entry.original().clone(), entry.current().clone()),
        None => (original.clone(), original),
    };

    let field_type = model
        .column(&key.field)
        .map(|c| c.field_type)
        .unwrap_or(FieldType::Text);
    let editor = FieldEditor::new(model.atoms.get(field_type), baseline, seed);
    let mut session = EditSession::new(key.clone(), field_type, editor, previous);
    // A cell that failed earlier reopens in error mode
    if let Some(messages) = model.failures.get(&key) {
        session.fail(messages.clone());
    }

    debug!(target: "session", %key, %field_type, "session opened");
    model.session = Some(session);
    cmds.push(Cmd::redraw_cell(key));
    cmds
}

pub(super) fn input(model: &mut GridModel, text: &str) -> Vec<Cmd> {
    let GridModel {
        session,
        atoms,
        drafts,
        ..
    } = model;
    let Some(session) = session.as_mut() else {
        warn!(target: "session", "input without an active session");
        return Vec::new();
    };

    if let Some(event) = session.editor.set_input(atoms.get(session.field_type), text) {
        route_change(drafts, &session.key, event);
    }
    vec![Cmd::redraw_cell(session.key.clone())]
}

pub(super) fn set_value(model: &mut GridModel, value: FieldValue) -> Vec<Cmd> {
    let GridModel {
        session,
        atoms,
        drafts,
        ..
    } = model;
    let Some(session) = session.as_mut() else {
        warn!(target: "session", "value change without an active session");
        return Vec::new();
    };

    let event = session.editor.set_value(atoms.get(session.field_type), value);
    route_change(drafts, &session.key, event);
    vec![Cmd::redraw_cell(session.key.clone())]
}

fn route_change(drafts: &mut DraftStore, key: &CellKey, event: AtomEvent) {
    if let AtomEvent::Change { current, .. } = event {
        if let Err(error) = drafts.update(key, current) {
            warn!(target: "session", %key, %error, "change dropped");
        }
    }
}

/// Commit gesture: validate and close, or enter error mode
pub(super) fn complete(model: &mut GridModel) -> Vec<Cmd> {
    if model.session.is_none() {
        debug!(target: "session", "complete without an active session");
        return Vec::new();
    }
    finalize(model, false)
}

/// Finalize the active session with commit semantics.
///
/// When `close_on_error` is set an invalid session still closes; its draft is
/// kept and the cell is marked failed.
pub(super) fn finalize(model: &mut GridModel, close_on_error: bool) -> Vec<Cmd> {
    let Some(session) = model.session.as_ref() else {
        return Vec::new();
    };
    let key = session.key.clone();
    let verdict = check_session(model, session);

    match verdict {
        Err(messages) if !close_on_error => {
            warn!(target: "session", %key, ?messages, "validation failed");
            if let Some(session) = model.session.as_mut() {
                session.fail(messages);
            }
            vec![Cmd::redraw_cell(key)]
        }
        Err(messages) => {
            warn!(target: "session", %key, ?messages, "closing invalid session, draft kept");
            model.session = None;
            model.failures.insert(key.clone(), messages);
            vec![Cmd::redraw_cell(key)]
        }
        Ok(()) => {
            debug!(target: "session", %key, "session completed");
            model.session = None;
            model.failures.remove(&key);

            let mut cmds = vec![Cmd::redraw_cell(key.clone())];
            let entry = model.drafts.get(&key);
            let clean = entry.is_some_and(|e| !e.is_dirty() && !e.is_in_flight());
            let dirty = entry.is_some_and(|e| e.is_dirty());
            if clean {
                model.drafts.discard_one(&key);
            } else if dirty && model.config.auto_commit {
                cmds.extend(bulk::issue_commit(model, &key));
            }
            cmds
        }
    }
}

/// Unchanged values pass without running the column rules
fn check_session(model: &GridModel, session: &EditSession) -> Result<(), Vec<String>> {
    if let Some(error) = session.editor.parse_error() {
        return Err(vec![error.to_string()]);
    }
    if !session.editor.is_modified() {
        return Ok(());
    }
    check_rules(model, &session.key, session.editor.current())
}

/// Abort gesture: restore the value the cell had before this session
pub(super) fn cancel(model: &mut GridModel) -> Vec<Cmd> {
    let Some(session) = model.session.take() else {
        debug!(target: "session", "cancel without an active session");
        return Vec::new();
    };
    let key = session.key;

    match session.previous {
        Some(previous) => {
            if let Err(error) = model.drafts.update(&key, previous) {
                warn!(target: "session", %key, %error, "could not restore previous draft");
            }
        }
        None => {
            model.drafts.discard_one(&key);
        }
    }
    model.failures.remove(&key);

    debug!(target: "session", %key, "session cancelled");
    vec![Cmd::redraw_cell(key)]
}

/// Finalize the outgoing session when focus moves to another cell
fn blur(model: &mut GridModel) -> Vec<Cmd> {
    match model.config.blur {
        BlurBehavior::Commit => finalize(model, true),
        BlurBehavior::Cancel => cancel(model),
    }
}

/// Editability override for a column. Turning it off ends any session in the
/// column; drafts are left alone.
pub(super) fn set_editable(model: &mut GridModel, field: FieldPath, editable: bool) -> Vec<Cmd> {
    let Some(column) = model.column_mut(&field) else {
        warn!(target: "session", %field, "editability change for unknown column");
        return Vec::new();
    };
    if column.editable == editable {
        return Vec::new();
    }
    column.editable = editable;

    if !editable && model.session.as_ref().is_some_and(|s| s.key.field == field) {
        debug!(target: "session", %field, "column became read-only, session dropped");
        model.session = None;
    }

    let keys: Vec<CellKey> = model
        .rows
        .iter()
        .map(|row| CellKey::new(row.id.clone(), field.clone()))
        .collect();
    vec![Cmd::redraw_cells(keys)]
}
