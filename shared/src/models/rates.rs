//! Rate Configuration Model

use serde::{Deserialize, Serialize};

use super::table::TableType;

/// Global rate configuration (单条记录，经由设置页修改)
///
/// Hourly rates are whole đ per hour, keyed on the wire by the table type
/// name. `billing_block` is the rounding block in minutes; 0 or absent means
/// the documented default of 15 (applied by the fee calculator, not here, so
/// the stored value round-trips unchanged).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    #[serde(rename = "Pool")]
    pub pool: i64,
    #[serde(rename = "Carom")]
    pub carom: i64,
    #[serde(rename = "Snooker")]
    pub snooker: i64,
    #[serde(rename = "VIP")]
    pub vip: i64,
    #[serde(rename = "billingBlock", default)]
    pub billing_block: u32,
}

impl RateTable {
    /// Hourly rate for a table type
    pub fn hourly_rate(&self, table_type: TableType) -> i64 {
        match table_type {
            TableType::Pool => self.pool,
            TableType::Carom => self.carom,
            TableType::Snooker => self.snooker,
            TableType::Vip => self.vip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_billing_block_defaults_to_zero() {
        let json = r#"{"Pool": 60000, "Carom": 50000, "Snooker": 80000, "VIP": 120000}"#;
        let rates: RateTable = serde_json::from_str(json).unwrap();
        assert_eq!(rates.billing_block, 0);
        assert_eq!(rates.hourly_rate(TableType::Vip), 120000);
    }
}
