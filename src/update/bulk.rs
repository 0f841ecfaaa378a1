//! Commit, save and discard handlers, plus write completion and row refresh

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::{check_rules, session};
use crate::commands::{Cmd, Damage, GridEvent};
use crate::config::ConflictPolicy;
use crate::draft::{
    record_outcome, CellFailure, CommitError, CommitOutcome, PendingWrite, SaveReport, WriteError,
};
use crate::model::{CellKey, GridModel, Row, RowSet, SaveProgress};

/// Persist one cell, finalizing its session first if it is open
pub(super) fn commit_cell(model: &mut GridModel, key: CellKey) -> Vec<Cmd> {
    let mut cmds = Vec::new();
    if model.session_for(&key).is_some() {
        cmds.extend(session::finalize(model, false));
        if model.session_for(&key).is_some() {
            // Still open: validation failed and the cell is in error mode
            return cmds;
        }
    }
    cmds.extend(issue_commit(model, &key));
    cmds
}

/// Validate a draft and hand it to the write path
pub(super) fn issue_commit(model: &mut GridModel, key: &CellKey) -> Vec<Cmd> {
    let Some(entry) = model.drafts.get(key) else {
        debug!(target: "drafts", %key, "commit without draft ignored");
        return Vec::new();
    };
    if entry.is_in_flight() {
        // auto_commit may already have issued it while finalizing the session
        debug!(target: "drafts", %key, "commit already in flight");
        return Vec::new();
    }
    if !entry.is_dirty() {
        model.drafts.discard_one(key);
        model.failures.remove(key);
        return vec![Cmd::redraw_cell(key.clone())];
    }

    let value = entry.current().clone();
    if let Err(messages) = check_rules(model, key, &value) {
        warn!(target: "drafts", %key, ?messages, "draft failed validation, not written");
        model.failures.insert(key.clone(), messages);
        return vec![Cmd::redraw_cell(key.clone())];
    }

    match model.drafts.begin_commit(key) {
        Ok(pending) => vec![Cmd::Write(pending)],
        Err(error) => {
            warn!(target: "drafts", %key, %error, "commit not started");
            Vec::new()
        }
    }
}

/// Flush every draft. Invalid drafts are reported and kept; the rest are
/// written independently of each other.
pub(super) fn save_all(model: &mut GridModel) -> Vec<Cmd> {
    if model.is_saving() {
        warn!(target: "drafts", "save requested while another save is running");
        return Vec::new();
    }

    let mut invalid: Vec<(CellKey, Vec<String>)> = Vec::new();
    let mut cmds = Vec::new();
    if let Some(key) = model.session.as_ref().map(|s| s.key.clone()) {
        cmds.extend(session::finalize(model, true));
        // Closed invalid: its draft holds the last parseable value, not what
        // the user sees, so it must not be written or skipped as clean
        if let Some(messages) = model.failures.get(&key) {
            invalid.push((key, messages.clone()));
        }
    }

    // Re-validate every dirty draft before anything is written
    for entry in model.drafts.iter() {
        if !entry.is_dirty() || entry.is_in_flight() {
            continue;
        }
        if invalid.iter().any(|(key, _)| key == entry.key()) {
            continue;
        }
        if let Err(messages) = check_rules(model, entry.key(), entry.current()) {
            invalid.push((entry.key().clone(), messages));
        }
    }
    let rejected: HashSet<CellKey> = invalid.iter().map(|(key, _)| key.clone()).collect();
    let plan = model
        .drafts
        .begin_save_matching(|entry| !rejected.contains(entry.key()));

    let mut report = SaveReport {
        skipped: plan.skipped,
        ..Default::default()
    };
    for (key, messages) in invalid {
        model.failures.insert(key.clone(), messages.clone());
        report.failures.push(CellFailure {
            key,
            error: CommitError::Validation(messages),
        });
    }

    let mut damage = Damage::cells(report.skipped.iter().cloned());
    damage.merge(Damage::cells(report.failed_keys().cloned()));
    if !damage.is_none() {
        cmds.push(Cmd::Redraw(damage));
    }

    info!(
        target: "drafts",
        writes = plan.writes.len(),
        invalid = report.failures.len(),
        skipped = report.skipped.len(),
        "save started"
    );

    if plan.writes.is_empty() {
        cmds.push(Cmd::Notify(GridEvent::SaveFinished(report)));
        return cmds;
    }

    model.save = Some(SaveProgress {
        outstanding: plan.writes.iter().map(|w| w.ticket).collect(),
        report,
    });
    cmds.extend(plan.writes.into_iter().map(Cmd::Write));
    cmds
}

/// Apply the write path's verdict for one [`PendingWrite`]
pub(super) fn write_completed(
    model: &mut GridModel,
    write: PendingWrite,
    result: Result<Row, WriteError>,
) -> Vec<Cmd> {
    let outcome = model.drafts.finish_commit(&write, result);
    let mut cmds = Vec::new();

    match &outcome {
        CommitOutcome::Committed(committed) | CommitOutcome::Superseded(committed) => {
            model.rows.upsert(committed.row.clone());
            model.failures.remove(&committed.key);
            // A session open on the cell edits against the written value now,
            // and needs a draft again if the write removed it
            let candidate = match model.session.as_mut() {
                Some(session) if session.key == committed.key => {
                    session.editor.rebase(committed.value.clone());
                    Some(session.editor.current().clone())
                }
                _ => None,
            };
            if let Some(candidate) = candidate {
                model
                    .drafts
                    .begin_edit(committed.key.clone(), committed.value.clone());
                if let Err(error) = model.drafts.update(&committed.key, candidate) {
                    warn!(target: "drafts", key = %committed.key, %error, "could not reopen draft");
                }
            }
            cmds.push(Cmd::redraw_cell(committed.key.clone()));
            cmds.push(Cmd::Notify(GridEvent::RowUpdated(committed.row.clone())));
        }
        CommitOutcome::Orphaned(key) => {
            debug!(target: "drafts", %key, "orphaned write ignored");
        }
        CommitOutcome::Failed(key, error) => {
            let messages = CommitError::Write(error.clone()).messages();
            model.failures.insert(key.clone(), messages);
            cmds.push(Cmd::redraw_cell(key.clone()));
        }
    }

    let in_batch = model
        .save
        .as_mut()
        .is_some_and(|save| save.outstanding.remove(&write.ticket));
    if in_batch {
        if let Some(save) = model.save.as_mut() {
            record_outcome(&mut save.report, outcome);
        }
        if model.save.as_ref().is_some_and(SaveProgress::is_finished) {
            if let Some(save) = model.save.take() {
                info!(
                    target: "drafts",
                    saved = save.report.saved.len(),
                    failed = save.report.failures.len(),
                    orphaned = save.report.orphaned.len(),
                    "save finished"
                );
                cmds.push(Cmd::Notify(GridEvent::SaveFinished(save.report)));
            }
        }
    }
    cmds
}

/// Drop one draft; idempotent
pub(super) fn discard_cell(model: &mut GridModel, key: CellKey) -> Vec<Cmd> {
    if model.session_for(&key).is_some() {
        model.session = None;
    }
    let had_failure = model.failures.remove(&key).is_some();
    let had_draft = model.drafts.discard_one(&key).is_some();
    if had_draft || had_failure {
        vec![Cmd::redraw_cell(key)]
    } else {
        Vec::new()
    }
}

/// Drop every draft and force every cell back to display mode
pub(super) fn discard_all(model: &mut GridModel) -> Vec<Cmd> {
    let mut keys = model.drafts.discard_all();
    if let Some(session) = model.session.take() {
        keys.push(session.key);
    }
    keys.extend(model.failures.drain().map(|(key, _)| key));
    debug!(target: "drafts", cells = keys.len(), "discarded all");
    vec![Cmd::redraw_cells(keys)]
}

/// Swap in a fresh row collection and reconcile drafts against it.
///
/// Drafts of rows that disappeared are dropped. Drafts whose committed value
/// changed underneath them follow the configured [`ConflictPolicy`].
pub(super) fn replace_rows(model: &mut GridModel, rows: Vec<Row>) -> Vec<Cmd> {
    let fresh = RowSet::new(rows);
    let policy = model.config.conflict_policy;

    let mut dropped = Vec::new();
    for entry in model.drafts.iter() {
        let key = entry.key();
        if !fresh.contains(&key.row) {
            dropped.push(key.clone());
            continue;
        }
        let refreshed = fresh.value(&key.row, &key.field).cloned().unwrap_or_default();
        if !refreshed.same_as(entry.original()) {
            match policy {
                ConflictPolicy::KeepDrafts => {
                    warn!(target: "drafts", %key, "row changed underneath draft, keeping draft")
                }
                ConflictPolicy::DropDrafts => dropped.push(key.clone()),
            }
        }
    }

    for key in &dropped {
        model.drafts.discard_one(key);
        model.failures.remove(key);
        if model.session_for(key).is_some() {
            model.session = None;
        }
    }
    model.failures.retain(|key, _| fresh.contains(&key.row));
    if model
        .session
        .as_ref()
        .is_some_and(|s| !fresh.contains(&s.key.row))
    {
        model.session = None;
    }
    model.rows = fresh;

    let mut cmds = vec![Cmd::Redraw(Damage::Full)];
    if !dropped.is_empty() {
        warn!(target: "drafts", count = dropped.len(), "drafts invalidated by row refresh");
        cmds.push(Cmd::Notify(GridEvent::DraftsInvalidated(dropped)));
    }
    cmds
}
