// Value helpers shared by every bounded context.
//
// Money
// - Monetary amounts are f64 in currency units (e.g. dollars), hourly for wages.
// - Arithmetic runs in double precision; values are fixed to two decimals only when persisted.

use uuid::Uuid;

pub type Money = f64;

pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Upper bound for any amount accepted from outside.
pub const MAX_AMOUNT: Money = 1_000_000_000.0;

/// Fix a monetary value to two decimals, rounding half to even.
pub fn round_money(value: Money) -> Money {
    (value * 100.0).round_ties_even() / 100.0
}

/// Validates a wage or amount entering the system.
pub fn is_valid_amount(value: Money) -> bool {
    value.is_finite() && (0.0..=MAX_AMOUNT).contains(&value)
}

/// Validates and rounds an incoming amount in one step.
pub fn checked_amount(value: Money) -> Option<Money> {
    if !is_valid_amount(value) {
        return None;
    }
    Some(round_money(value)).filter(|rounded| rounded.is_finite())
}

pub fn new_id() -> Uuid {
    Uuid::now_v7()
}
