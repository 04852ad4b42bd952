// Cost calculator: pure functions from an increment ledger to cost figures.
//
// Rules
// - Closed increments contribute their stored cost and elapsed time.
// - The open tail of an active meeting contributes its live cost up to `now`.
// - Results are unrounded; rounding happens when values are persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::meetings::core::meeting::Increment;
use crate::shared::core::primitives::{Money, SECONDS_PER_HOUR, round_money};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub total_cost: Money,
    pub total_duration_seconds: i64,
    pub cost_per_second: Money,
    pub cost_per_minute: Money,
    pub cost_per_hour: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rollups {
    pub total_cost: Money,
    pub total_duration: i64,
    pub max_attendees: u32,
}

/// Whole seconds between two instants, floored and never negative.
pub fn elapsed_seconds(start: DateTime<Utc>, stop: DateTime<Utc>) -> i64 {
    let millis = (stop - start).num_milliseconds();
    if millis <= 0 { 0 } else { millis / 1000 }
}

pub fn slice_cost(elapsed_seconds: i64, attendee_count: u32, average_wage: Money) -> Money {
    (elapsed_seconds as f64 / SECONDS_PER_HOUR) * attendee_count as f64 * average_wage
}

pub fn calculate(increments: &[Increment], now: DateTime<Utc>, is_active: bool) -> CostSummary {
    let mut total_cost = 0.0;
    let mut total_duration = 0i64;

    for increment in increments {
        if increment.is_open() {
            if is_active {
                let elapsed = elapsed_seconds(increment.start_time, now);
                total_cost += slice_cost(elapsed, increment.attendee_count, increment.average_wage);
                total_duration += elapsed;
            }
        } else {
            total_cost += increment.cost;
            total_duration += increment.elapsed_time;
        }
    }

    let cost_per_second = if total_duration > 0 {
        total_cost / total_duration as f64
    } else {
        0.0
    };

    CostSummary {
        total_cost,
        total_duration_seconds: total_duration,
        cost_per_second,
        cost_per_minute: cost_per_second * 60.0,
        cost_per_hour: cost_per_second * SECONDS_PER_HOUR,
    }
}

/// Recomputes `running_total` over the closed ledger in start order and returns the
/// rollups together with the indices whose running total changed.
pub fn fold_closed(increments: &mut [Increment]) -> (Rollups, Vec<usize>) {
    let mut order: Vec<usize> = (0..increments.len()).collect();
    order.sort_by_key(|&i| increments[i].start_time);

    let mut rollups = Rollups::default();
    let mut running = 0.0;
    let mut changed = Vec::new();

    for i in order {
        let increment = &mut increments[i];
        if increment.is_open() {
            continue;
        }
        running += increment.cost;
        rollups.total_duration += increment.elapsed_time;
        rollups.max_attendees = rollups.max_attendees.max(increment.attendee_count);

        let running_total = round_money(running);
        if increment.running_total != running_total {
            increment.running_total = running_total;
            changed.push(i);
        }
    }
    rollups.total_cost = round_money(running);
    (rollups, changed)
}
