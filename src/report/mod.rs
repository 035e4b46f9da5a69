pub mod registry;
pub mod usage;

pub use registry::ReportRegistry;
pub use usage::UsagePlugin;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::UsageType;

/// Sentinel shown instead of a cost when pricing is missing or partial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceNote {
    /// No price record overlaps the report window
    NoPrice,
    /// Price records cover only part of the report window
    IncompletePrice,
}

impl PriceNote {
    pub fn message(self) -> &'static str {
        match self {
            PriceNote::NoPrice => "No price",
            PriceNote::IncompletePrice => "Incomplete price",
        }
    }
}

/// One report cell: a usage count, a cost, or a price note
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Count(f64),
    Cost(Decimal),
    Note(&'static str),
}

/// Column descriptor for report rendering
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSchema {
    pub name: String,
    /// Render the cell as money
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub currency: bool,
    /// Column participates in the report's grand total
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub total_cost: bool,
}

impl ColumnSchema {
    pub fn count(name: String) -> Self {
        Self {
            name,
            currency: false,
            total_cost: false,
        }
    }

    pub fn cost(name: String, total_cost: bool) -> Self {
        Self {
            name,
            currency: true,
            total_cost,
        }
    }
}

/// Report rows: venture id -> column key -> cell
pub type ReportRows = BTreeMap<u32, BTreeMap<String, CellValue>>;

/// Ordered column descriptors; insertion order is render order
pub type Schema = Vec<(String, ColumnSchema)>;

/// A usage-type report computation over a loaded dataset.
///
/// The seam the original report chain registered plugins into; every
/// implementation produces rows, a grand total and a column schema for
/// one usage type.
pub trait ReportPlugin {
    /// Per-venture usage counts and costs in the window
    #[allow(clippy::too_many_arguments)]
    fn usages(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        ventures: Option<&[u32]>,
        usage_type: &UsageType,
        forecast: bool,
        no_price_msg: bool,
    ) -> ReportRows;

    /// Total cost across all warehouses for the venture set
    fn total_cost(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        ventures: Option<&[u32]>,
        usage_type: &UsageType,
        forecast: bool,
    ) -> Decimal;

    /// Ordered column schema for the usage type
    fn schema(&self, usage_type: &UsageType) -> Schema;
}

// Report column keys. The warehouse variants carry both ids so a single
// row can hold per-warehouse breakdowns side by side.

pub(crate) fn count_key(usage_type: u32) -> String {
    format!("ut_{}_count", usage_type)
}

pub(crate) fn cost_key(usage_type: u32) -> String {
    format!("ut_{}_cost", usage_type)
}

pub(crate) fn count_wh_key(usage_type: u32, warehouse: u32) -> String {
    format!("ut_{}_count_wh_{}", usage_type, warehouse)
}

pub(crate) fn cost_wh_key(usage_type: u32, warehouse: u32) -> String {
    format!("ut_{}_cost_wh_{}", usage_type, warehouse)
}

pub(crate) fn total_cost_key(usage_type: u32) -> String {
    format!("ut_{}_total_cost", usage_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_price_note_messages() {
        assert_eq!(PriceNote::NoPrice.message(), "No price");
        assert_eq!(PriceNote::IncompletePrice.message(), "Incomplete price");
    }

    #[test]
    fn test_cell_value_serialization() {
        let count = serde_json::to_string(&CellValue::Count(12.5)).unwrap();
        assert_eq!(count, "12.5");

        let cost = serde_json::to_string(&CellValue::Cost(dec!(3.50))).unwrap();
        assert_eq!(cost, "\"3.50\"");

        let note = serde_json::to_string(&CellValue::Note("No price")).unwrap();
        assert_eq!(note, "\"No price\"");
    }

    #[test]
    fn test_column_keys() {
        assert_eq!(count_key(3), "ut_3_count");
        assert_eq!(cost_key(3), "ut_3_cost");
        assert_eq!(count_wh_key(3, 7), "ut_3_count_wh_7");
        assert_eq!(cost_wh_key(3, 7), "ut_3_cost_wh_7");
        assert_eq!(total_cost_key(3), "ut_3_total_cost");
    }
}
