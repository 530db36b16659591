//! Block-based table fee computation
//!
//! Time at a table is billed in fixed blocks (default 15 minutes). A session
//! always pays for at least one block, and any started block is charged in
//! full. All money values are integer đồng; intermediate math runs on
//! [`Decimal`] so odd block sizes stay exact until the final rounding.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use shared::{RateTable, Table, TableType};

/// Fallback block length when the rate table carries none
pub const DEFAULT_BLOCK_MINUTES: u32 = 15;

/// Billing block length in minutes, never zero
pub fn block_minutes(rates: &RateTable) -> u32 {
    if rates.billing_block == 0 {
        DEFAULT_BLOCK_MINUTES
    } else {
        rates.billing_block
    }
}

/// Whole minutes elapsed between `start` and `now`, clamped to zero
pub fn elapsed_minutes(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - start).num_minutes().max(0)
}

/// Whole seconds elapsed between `start` and `now`, clamped to zero
pub fn elapsed_seconds(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - start).num_seconds().max(0)
}

/// Number of blocks charged for an elapsed duration
///
/// Any started block counts in full, and a session is never billed for
/// fewer than one block.
pub fn billed_blocks(elapsed_minutes: i64, block_minutes: u32) -> i64 {
    let block = i64::from(block_minutes);
    let blocks = (elapsed_minutes.max(0) + block - 1) / block;
    blocks.max(1)
}

/// Exact price of one block: `hourly_rate * block / 60`
pub fn fee_per_block(hourly_rate: i64, block_minutes: u32) -> Decimal {
    Decimal::from(hourly_rate) * Decimal::from(block_minutes) / Decimal::from(60)
}

/// Table fee for an elapsed session duration
///
/// Rounds half away from zero to whole đồng. A zero (or negative) hourly
/// rate bills nothing regardless of duration.
pub fn table_fee(rates: &RateTable, table_type: TableType, elapsed_minutes: i64) -> i64 {
    let hourly = rates.hourly_rate(table_type);
    if hourly <= 0 {
        return 0;
    }

    let block = block_minutes(rates);
    let blocks = billed_blocks(elapsed_minutes, block);
    let total = Decimal::from(blocks) * fee_per_block(hourly, block);

    total
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}

/// Seconds of prepaid play time left, `None` when the hourly rate is not positive
///
/// Prepaid balances are display-only; they are never netted against the
/// final bill.
pub fn remaining_prepaid_seconds(
    prepaid_amount: i64,
    hourly_rate: i64,
    elapsed_seconds: i64,
) -> Option<i64> {
    if hourly_rate <= 0 {
        return None;
    }

    let purchased = (Decimal::from(prepaid_amount) * Decimal::from(3600)
        / Decimal::from(hourly_rate))
    .floor()
    .to_i64()
    .unwrap_or(i64::MAX);

    Some((purchased - elapsed_seconds).max(0))
}

/// Human-readable duration, e.g. "1h 24m"
pub fn duration_label(elapsed_minutes: i64) -> String {
    let minutes = elapsed_minutes.max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Live billing snapshot of a running session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReadout {
    pub elapsed_minutes: i64,
    pub duration: String,
    pub blocks: i64,
    pub table_fee: i64,
    pub service_fee: i64,
    pub total: i64,
    /// Remaining prepaid seconds, `None` when no prepaid balance applies
    pub prepaid_remaining_seconds: Option<i64>,
}

/// Compute the live readout for a table, `None` unless a session is running
pub fn session_readout(
    table: &Table,
    rates: &RateTable,
    now: DateTime<Utc>,
) -> Option<SessionReadout> {
    if !table.is_playing() {
        return None;
    }
    let start = table.start_time?;

    let minutes = elapsed_minutes(start, now);
    let block = block_minutes(rates);
    let blocks = billed_blocks(minutes, block);
    let fee = table_fee(rates, table.table_type, minutes);
    let service_fee: i64 = table.orders.iter().map(|line| line.subtotal()).sum();

    let prepaid_remaining_seconds = table.prepaid_amount.and_then(|prepaid| {
        remaining_prepaid_seconds(
            prepaid,
            rates.hourly_rate(table.table_type),
            elapsed_seconds(start, now),
        )
    });

    Some(SessionReadout {
        elapsed_minutes: minutes,
        duration: duration_label(minutes),
        blocks,
        table_fee: fee,
        service_fee,
        total: fee + service_fee,
        prepaid_remaining_seconds,
    })
}
