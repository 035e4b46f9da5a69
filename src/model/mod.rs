use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Organizational cost-center that usage is billed to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venture {
    pub id: u32,
    pub name: String,
    pub symbol: String,
}

/// Physical location usage can be attributed to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: u32,
    pub name: String,
    #[serde(default = "default_true")]
    pub show_in_report: bool,
}

/// Billable resource category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageType {
    pub id: u32,
    pub name: String,
    pub symbol: String,
    /// Prices and report columns are split per warehouse
    #[serde(default)]
    pub by_warehouse: bool,
    /// Unit price is derived from a total cost divided by metered usage
    #[serde(default)]
    pub by_cost: bool,
    #[serde(default = "default_true")]
    pub show_in_report: bool,
}

/// Price record valid over an inclusive date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsagePrice {
    pub usage_type: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub forecast_price: Decimal,
    /// Total cost over the range, used for by-cost usage types
    #[serde(default)]
    pub cost: Decimal,
    #[serde(default)]
    pub forecast_cost: Decimal,
    #[serde(default)]
    pub warehouse: Option<u32>,
}

/// One venture's metered value of one usage type on one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyUsage {
    pub date: NaiveDate,
    pub venture: u32,
    pub usage_type: u32,
    #[serde(default)]
    pub warehouse: Option<u32>,
    pub value: f64,
}

fn default_true() -> bool {
    true
}

impl UsagePrice {
    /// Clamp the record's range to a report window
    pub fn clamp(&self, start: NaiveDate, end: NaiveDate) -> (NaiveDate, NaiveDate) {
        (self.start.max(start), self.end.min(end))
    }

    /// Check if the record overlaps an inclusive window
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start <= end && self.end >= start
    }
}

/// Number of days in an inclusive date range
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_inclusive() {
        assert_eq!(days_inclusive(date(2024, 1, 1), date(2024, 1, 1)), 1);
        assert_eq!(days_inclusive(date(2024, 1, 1), date(2024, 1, 31)), 31);
        assert_eq!(days_inclusive(date(2024, 2, 28), date(2024, 3, 1)), 3); // leap year
    }

    #[test]
    fn test_usage_price_clamp() {
        let up = UsagePrice {
            usage_type: 1,
            start: date(2024, 1, 10),
            end: date(2024, 1, 20),
            price: Decimal::ONE,
            forecast_price: Decimal::ONE,
            cost: Decimal::ZERO,
            forecast_cost: Decimal::ZERO,
            warehouse: None,
        };

        assert_eq!(
            up.clamp(date(2024, 1, 1), date(2024, 1, 31)),
            (date(2024, 1, 10), date(2024, 1, 20))
        );
        assert_eq!(
            up.clamp(date(2024, 1, 15), date(2024, 1, 31)),
            (date(2024, 1, 15), date(2024, 1, 20))
        );

        assert!(up.overlaps(date(2024, 1, 20), date(2024, 1, 25)));
        assert!(up.overlaps(date(2024, 1, 1), date(2024, 1, 10)));
        assert!(!up.overlaps(date(2024, 1, 21), date(2024, 1, 25)));
    }
}
