//! Pure reporting functions over the transaction log.
//!
//! Everything here is derived on demand from an in-memory slice; nothing is
//! cached or persisted. Callers pass `now` explicitly so the cut-off points
//! are testable; the service layer passes the local wall clock.

use std::collections::HashMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use shared::Transaction;

/// How many items `top_sellers` returns by default
pub const DEFAULT_TOP_SELLERS: usize = 5;

/// Time window for the history view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryFilter {
    All,
    /// Same local date as `now`
    Today,
    /// Rolling last 7 days
    Week,
    /// Rolling last 30 days
    Month,
}

impl HistoryFilter {
    fn matches(&self, transaction: &Transaction, now: DateTime<FixedOffset>) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Today => {
                transaction.end_time.with_timezone(&now.timezone()).date_naive()
                    == now.date_naive()
            }
            HistoryFilter::Week => {
                transaction.end_time >= (now - Duration::days(7)).with_timezone(&Utc)
            }
            HistoryFilter::Month => {
                transaction.end_time >= (now - Duration::days(30)).with_timezone(&Utc)
            }
        }
    }
}

/// Filter the log by time window plus a case-insensitive search over table
/// name and transaction id. An empty search matches everything.
pub fn filter_history(
    transactions: &[Transaction],
    filter: HistoryFilter,
    search: &str,
    now: DateTime<FixedOffset>,
) -> Vec<Transaction> {
    let needle = search.trim().to_lowercase();
    transactions
        .iter()
        .filter(|tx| filter.matches(tx, now))
        .filter(|tx| {
            needle.is_empty()
                || tx.table_name.to_lowercase().contains(&needle)
                || tx.id.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Revenue totals for one local calendar date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueSummary {
    pub date: NaiveDate,
    /// Sum of transaction totals (đ)
    pub total: i64,
    pub count: usize,
    /// Rounded average per transaction, 0 when there were none
    pub average: i64,
}

/// Summarize the transactions whose `end_time` falls on `date` in the zone
/// of `tz`.
pub fn daily_summary(
    transactions: &[Transaction],
    date: NaiveDate,
    tz: FixedOffset,
) -> RevenueSummary {
    let mut total: i64 = 0;
    let mut count: usize = 0;
    for tx in transactions {
        if tx.end_time.with_timezone(&tz).date_naive() == date {
            total += tx.total;
            count += 1;
        }
    }

    let average = if count == 0 {
        0
    } else {
        (Decimal::from(total) / Decimal::from(count as i64))
            .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(i64::MAX)
    };

    RevenueSummary {
        date,
        total,
        count,
        average,
    }
}

/// One aggregated menu item in the best-seller ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopItem {
    pub name: String,
    pub quantity: i32,
    /// Revenue from this item across the log (đ)
    pub revenue: i64,
}

/// Best-selling items across the whole log, most-sold first.
///
/// Lines are aggregated by snapshotted item name, so a renamed menu item
/// counts as two entries; recorded history stays as sold.
pub fn top_sellers(transactions: &[Transaction], limit: usize) -> Vec<TopItem> {
    let mut sales: HashMap<String, TopItem> = HashMap::new();
    for tx in transactions {
        for line in &tx.orders {
            let entry = sales.entry(line.name.clone()).or_insert_with(|| TopItem {
                name: line.name.clone(),
                quantity: 0,
                revenue: 0,
            });
            entry.quantity += line.quantity;
            entry.revenue += line.subtotal();
        }
    }

    let mut items: Vec<TopItem> = sales.into_values().collect();
    items.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    items.truncate(limit);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::{OrderLine, TransactionStatus};

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    fn sample(id: &str, table: &str, end_time: DateTime<Utc>, total: i64) -> Transaction {
        Transaction {
            id: id.to_string(),
            table_name: table.to_string(),
            start_time: end_time - Duration::hours(1),
            end_time,
            duration: "1h 0m".to_string(),
            table_fee: total,
            service_fee: 0,
            orders: Vec::new(),
            total,
            status: TransactionStatus::Paid,
        }
    }

    fn line(name: &str, quantity: i32, price: i64) -> OrderLine {
        OrderLine {
            id: format!("line-{name}"),
            item_id: format!("item-{name}"),
            name: name.to_string(),
            quantity,
            price,
        }
    }

    #[test]
    fn test_today_filter_uses_local_date() {
        // 2025-03-09 18:30 UTC is already 2025-03-10 01:30 at +07:00
        let now = tz().with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let late_evening = Utc.with_ymd_and_hms(2025, 3, 9, 18, 30, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2025, 3, 9, 10, 0, 0).unwrap();

        let log = vec![
            sample("#TX-AAAA0001", "Bàn 01", late_evening, 100_000),
            sample("#TX-BBBB0002", "Bàn 02", yesterday, 50_000),
        ];

        let hits = filter_history(&log, HistoryFilter::Today, "", now);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "#TX-AAAA0001");
    }

    #[test]
    fn test_week_and_month_are_rolling_windows() {
        let now = tz().with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap();
        let log = vec![
            sample("#TX-RECENT01", "Bàn 01", Utc.with_ymd_and_hms(2025, 3, 28, 5, 0, 0).unwrap(), 1),
            sample("#TX-TENDAYS1", "Bàn 02", Utc.with_ymd_and_hms(2025, 3, 21, 5, 0, 0).unwrap(), 1),
            sample("#TX-ANCIENT1", "Bàn 03", Utc.with_ymd_and_hms(2025, 1, 15, 5, 0, 0).unwrap(), 1),
        ];

        let week = filter_history(&log, HistoryFilter::Week, "", now);
        assert_eq!(week.len(), 1);
        assert_eq!(week[0].id, "#TX-RECENT01");

        let month = filter_history(&log, HistoryFilter::Month, "", now);
        assert_eq!(month.len(), 2);
    }

    #[test]
    fn test_search_matches_table_name_and_id_case_insensitive() {
        let now = tz().with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 10, 1, 0, 0).unwrap();
        let log = vec![
            sample("#TX-AB12CD34", "Bàn 01", end, 1),
            sample("#TX-EF56AB78", "Bàn VIP", end, 1),
        ];

        let by_name = filter_history(&log, HistoryFilter::All, "vip", now);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].table_name, "Bàn VIP");

        let by_id = filter_history(&log, HistoryFilter::All, "ab12", now);
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].id, "#TX-AB12CD34");

        let none = filter_history(&log, HistoryFilter::All, "snooker", now);
        assert!(none.is_empty());
    }

    #[test]
    fn test_daily_summary_totals_and_average() {
        let tz = tz();
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let on_day = Utc.with_ymd_and_hms(2025, 3, 10, 1, 0, 0).unwrap();
        let off_day = Utc.with_ymd_and_hms(2025, 3, 11, 1, 0, 0).unwrap();

        let log = vec![
            sample("#TX-AAAA0001", "Bàn 01", on_day, 100_000),
            sample("#TX-BBBB0002", "Bàn 02", on_day, 45_000),
            sample("#TX-CCCC0003", "Bàn 03", off_day, 999_999),
        ];

        let summary = daily_summary(&log, date, tz);
        assert_eq!(summary.total, 145_000);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.average, 72_500);
    }

    #[test]
    fn test_daily_summary_empty_day() {
        let summary = daily_summary(&[], NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(), tz());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average, 0);
    }

    #[test]
    fn test_top_sellers_aggregates_and_ranks() {
        let end = Utc.with_ymd_and_hms(2025, 3, 10, 1, 0, 0).unwrap();
        let mut tx1 = sample("#TX-AAAA0001", "Bàn 01", end, 1);
        tx1.orders = vec![line("Sting Dâu", 3, 15_000), line("Mì Trứng", 2, 35_000)];
        let mut tx2 = sample("#TX-BBBB0002", "Bàn 02", end, 1);
        tx2.orders = vec![line("Sting Dâu", 2, 15_000), line("Bò Húc", 2, 20_000)];

        let top = top_sellers(&[tx1, tx2], DEFAULT_TOP_SELLERS);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].name, "Sting Dâu");
        assert_eq!(top[0].quantity, 5);
        assert_eq!(top[0].revenue, 75_000);
        // Tie on quantity falls back to name order
        assert_eq!(top[1].name, "Bò Húc");
        assert_eq!(top[2].name, "Mì Trứng");
    }

    #[test]
    fn test_top_sellers_respects_limit() {
        let end = Utc.with_ymd_and_hms(2025, 3, 10, 1, 0, 0).unwrap();
        let mut tx = sample("#TX-AAAA0001", "Bàn 01", end, 1);
        tx.orders = vec![
            line("A", 5, 1_000),
            line("B", 4, 1_000),
            line("C", 3, 1_000),
        ];

        let top = top_sellers(&[tx], 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[1].name, "B");
    }
}
