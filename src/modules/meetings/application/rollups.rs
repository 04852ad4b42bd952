// Ledger steps shared by the transitions that close an increment.

use chrono::{DateTime, Utc};

use crate::modules::meetings::adapters::outbound::ledger::{LedgerError, LedgerTransaction};
use crate::modules::meetings::application::errors::{MeetingError, ledger_err};
use crate::modules::meetings::core::cost::fold_closed;
use crate::modules::meetings::core::cycle::close_increment;
use crate::modules::meetings::core::meeting::{Increment, Meeting};

/// Loads the open tail of an active meeting. A missing tail is fatal.
pub async fn open_tail(
    tx: &mut dyn LedgerTransaction,
    meeting: &Meeting,
    operation: &'static str,
) -> Result<Increment, MeetingError> {
    tx.list_open_increment(meeting.id)
        .await
        .map_err(ledger_err(operation))?
        .ok_or_else(|| {
            MeetingError::from_ledger(
                operation,
                LedgerError::InvariantViolation(format!(
                    "active meeting {} has no open increment",
                    meeting.id
                )),
            )
        })
}

/// Closes the open tail at `at`. A tail starting at or after `at` would be persisted
/// with zero length, so it is removed instead. Returns the closed increment, if any.
pub async fn close_open_tail(
    tx: &mut dyn LedgerTransaction,
    meeting: &Meeting,
    at: DateTime<Utc>,
    operation: &'static str,
) -> Result<Option<Increment>, MeetingError> {
    let tail = open_tail(tx, meeting, operation).await?;
    if at <= tail.start_time {
        tracing::debug!(meeting_id = %meeting.id, increment_id = %tail.id, "dropping zero-length tail");
        tx.delete_increment(tail.id)
            .await
            .map_err(ledger_err(operation))?;
        return Ok(None);
    }
    let closed = close_increment(&tail, at);
    tx.update_increment(&closed)
        .await
        .map_err(ledger_err(operation))?;
    Ok(Some(closed))
}

/// Refreshes running totals over the closed ledger and copies the rollups onto the
/// meeting. The caller persists the meeting.
pub async fn rebuild_rollups(
    tx: &mut dyn LedgerTransaction,
    meeting: &mut Meeting,
    operation: &'static str,
) -> Result<(), MeetingError> {
    let mut increments = tx
        .list_increments(meeting.id)
        .await
        .map_err(ledger_err(operation))?;
    let (rollups, changed) = fold_closed(&mut increments);
    for index in changed {
        tx.update_increment(&increments[index])
            .await
            .map_err(ledger_err(operation))?;
    }
    meeting.total_cost_cached = rollups.total_cost;
    meeting.total_duration_cached = rollups.total_duration;
    meeting.max_attendees_cached = rollups.max_attendees;
    Ok(())
}

/// Ends the active period: closes the tail, marks the meeting stopped and rebuilds
/// its rollups. The caller persists the meeting.
pub async fn stop_in_place(
    tx: &mut dyn LedgerTransaction,
    meeting: &mut Meeting,
    now: DateTime<Utc>,
    operation: &'static str,
) -> Result<(), MeetingError> {
    let stopped_at = meeting.started_at.map_or(now, |started| started.max(now));
    close_open_tail(tx, meeting, stopped_at, operation).await?;
    meeting.is_active = false;
    meeting.stopped_at = Some(stopped_at);
    meeting.updated_at = now;
    rebuild_rollups(tx, meeting, operation).await
}
