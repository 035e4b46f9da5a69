use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use super::{
    cost_key, cost_wh_key, count_key, count_wh_key, total_cost_key, CellValue, ColumnSchema,
    PriceNote, ReportPlugin, ReportRows, Schema,
};
use crate::model::{days_inclusive, UsagePrice, UsageType};
use crate::store::Dataset;

/// Report plugin for plain metered usage types.
///
/// Walks the price records overlapping the report window, clamps each to
/// the window and charges the usage metered inside the clamped range at
/// that record's price. Usage types flagged `by_warehouse` get one pass
/// per report warehouse; types flagged `by_cost` derive their unit price
/// from the record's total cost.
pub struct UsagePlugin<'a> {
    data: &'a Dataset,
}

/// Usage and cost accumulated for one warehouse pass
#[derive(Debug, Clone, PartialEq)]
pub struct WarehouseTotal {
    pub warehouse: Option<u32>,
    pub usage: f64,
    pub cost: Decimal,
}

/// Per-warehouse totals plus the grand total across warehouses
#[derive(Debug, Clone, PartialEq)]
pub struct WarehouseTotals {
    pub per_warehouse: Vec<WarehouseTotal>,
    pub total: Decimal,
}

/// Column keys for one warehouse pass
struct ColumnKeys {
    count: String,
    cost: String,
    /// Present only for by-warehouse types
    total: Option<String>,
}

impl<'a> UsagePlugin<'a> {
    pub fn new(data: &'a Dataset) -> Self {
        Self { data }
    }

    /// Warehouse passes for a usage type: one per report warehouse when the
    /// type is split by warehouse, otherwise a single unattributed pass
    fn warehouse_passes(&self, usage_type: &UsageType) -> Vec<Option<u32>> {
        if usage_type.by_warehouse {
            self.data
                .report_warehouses()
                .iter()
                .map(|w| Some(w.id))
                .collect()
        } else {
            vec![None]
        }
    }

    /// Check price coverage of the report window.
    ///
    /// Sums the overlap days of every matching price record, clamped to the
    /// window. Zero covered days means no price at all; fewer covered days
    /// than the window has means the pricing is partial. Overlapping records
    /// can double-count days, so coverage is only trustworthy when complete.
    pub fn incomplete_price(
        &self,
        usage_type: &UsageType,
        start: NaiveDate,
        end: NaiveDate,
        warehouse: Option<u32>,
    ) -> Option<PriceNote> {
        let total_days = days_inclusive(start, end);
        let warehouse = if usage_type.by_warehouse {
            warehouse
        } else {
            None
        };

        let mut covered_days = 0i64;
        for up in self.data.usage_prices(usage_type.id, start, end, warehouse) {
            let (up_start, up_end) = up.clamp(start, end);
            covered_days += days_inclusive(up_start, up_end);
        }

        if covered_days == 0 {
            Some(PriceNote::NoPrice)
        } else if covered_days != total_days {
            Some(PriceNote::IncompletePrice)
        } else {
            None
        }
    }

    /// Derive a unit price for a by-cost record: total cost divided by the
    /// usage metered over the record's own range
    pub fn price_from_cost(
        &self,
        usage_price: &UsagePrice,
        forecast: bool,
        warehouse: Option<u32>,
    ) -> Decimal {
        let total_usage = self.data.total_usage(
            usage_price.start,
            usage_price.end,
            usage_price.usage_type,
            warehouse,
            None,
        );
        let cost = if forecast {
            usage_price.forecast_cost
        } else {
            usage_price.cost
        };

        match Decimal::from_f64_retain(total_usage) {
            Some(divisor) if !divisor.is_zero() && !cost.is_zero() => cost / divisor,
            _ => Decimal::ZERO,
        }
    }

    fn effective_price(
        &self,
        usage_type: &UsageType,
        usage_price: &UsagePrice,
        forecast: bool,
        warehouse: Option<u32>,
    ) -> Decimal {
        if usage_type.by_cost {
            self.price_from_cost(usage_price, forecast, warehouse)
        } else if forecast {
            usage_price.forecast_price
        } else {
            usage_price.price
        }
    }

    /// Per-warehouse usage and cost totals for the venture set, plus the
    /// grand total across warehouses
    pub fn total_cost_by_warehouses(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        ventures: Option<&[u32]>,
        usage_type: &UsageType,
        forecast: bool,
    ) -> WarehouseTotals {
        let mut per_warehouse = Vec::new();
        let mut total = Decimal::ZERO;

        for warehouse in self.warehouse_passes(usage_type) {
            let mut usage_sum = 0.0;
            let mut cost_sum = Decimal::ZERO;

            for up in self.data.usage_prices(usage_type.id, start, end, warehouse) {
                let price = self.effective_price(usage_type, up, forecast, warehouse);
                let (up_start, up_end) = up.clamp(start, end);
                let usage =
                    self.data
                        .total_usage(up_start, up_end, usage_type.id, warehouse, ventures);
                usage_sum += usage;
                cost_sum += decimal_usage(usage) * price;
            }

            total += cost_sum;
            per_warehouse.push(WarehouseTotal {
                warehouse,
                usage: usage_sum,
                cost: cost_sum,
            });
        }

        WarehouseTotals {
            per_warehouse,
            total,
        }
    }

    fn column_keys(&self, usage_type: &UsageType, warehouse: Option<u32>) -> ColumnKeys {
        match warehouse {
            Some(wh) if usage_type.by_warehouse => ColumnKeys {
                count: count_wh_key(usage_type.id, wh),
                cost: cost_wh_key(usage_type.id, wh),
                total: Some(total_cost_key(usage_type.id)),
            },
            _ => ColumnKeys {
                count: count_key(usage_type.id),
                cost: cost_key(usage_type.id),
                total: None,
            },
        }
    }

    /// Charge the usage metered in one clamped window at one price.
    ///
    /// Counts always accumulate. Cost cells accumulate unless a price note
    /// is set for the pass, in which case the note replaces the cost and
    /// the per-warehouse total is left untouched.
    #[allow(clippy::too_many_arguments)]
    fn accumulate(
        &self,
        rows: &mut ReportRows,
        keys: &ColumnKeys,
        note: Option<PriceNote>,
        start: NaiveDate,
        end: NaiveDate,
        price: Decimal,
        usage_type: &UsageType,
        warehouse: Option<u32>,
        ventures: Option<&[u32]>,
    ) {
        let per_venture =
            self.data
                .usages_per_venture(start, end, usage_type.id, warehouse, ventures);

        for (venture, usage) in per_venture {
            let row = rows.entry(venture).or_default();
            add_count(row, &keys.count, usage);

            if let Some(note) = note {
                row.insert(keys.cost.clone(), CellValue::Note(note.message()));
            } else {
                let cost = decimal_usage(usage) * price;
                add_cost(row, &keys.cost, cost);
                if let Some(total) = &keys.total {
                    add_cost(row, total, cost);
                }
            }
        }
    }
}

impl ReportPlugin for UsagePlugin<'_> {
    fn usages(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        ventures: Option<&[u32]>,
        usage_type: &UsageType,
        forecast: bool,
        no_price_msg: bool,
    ) -> ReportRows {
        debug!(usage_type = %usage_type.name, %start, %end, forecast, "collecting usages");
        let mut rows = ReportRows::new();

        for warehouse in self.warehouse_passes(usage_type) {
            let note = if no_price_msg {
                self.incomplete_price(usage_type, start, end, warehouse)
            } else {
                None
            };
            let keys = self.column_keys(usage_type, warehouse);
            let prices = self.data.usage_prices(usage_type.id, start, end, warehouse);

            if prices.is_empty() {
                // Counts still appear when nothing is priced
                self.accumulate(
                    &mut rows,
                    &keys,
                    note,
                    start,
                    end,
                    Decimal::ZERO,
                    usage_type,
                    warehouse,
                    ventures,
                );
                continue;
            }

            for up in prices {
                let price = self.effective_price(usage_type, up, forecast, warehouse);
                let (up_start, up_end) = up.clamp(start, end);
                self.accumulate(
                    &mut rows,
                    &keys,
                    note,
                    up_start,
                    up_end,
                    price,
                    usage_type,
                    warehouse,
                    ventures,
                );
            }
        }

        rows
    }

    fn total_cost(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        ventures: Option<&[u32]>,
        usage_type: &UsageType,
        forecast: bool,
    ) -> Decimal {
        self.total_cost_by_warehouses(start, end, ventures, usage_type, forecast)
            .total
    }

    fn schema(&self, usage_type: &UsageType) -> Schema {
        debug!(usage_type = %usage_type.name, "building schema");
        let mut schema = Schema::new();

        if usage_type.by_warehouse {
            for warehouse in self.data.report_warehouses() {
                schema.push((
                    count_wh_key(usage_type.id, warehouse.id),
                    ColumnSchema::count(format!("{} count ({})", usage_type.name, warehouse.name)),
                ));
                schema.push((
                    cost_wh_key(usage_type.id, warehouse.id),
                    ColumnSchema::cost(
                        format!("{} cost ({})", usage_type.name, warehouse.name),
                        false,
                    ),
                ));
            }
            schema.push((
                total_cost_key(usage_type.id),
                ColumnSchema::cost(format!("{} total cost", usage_type.name), true),
            ));
        } else {
            schema.push((
                count_key(usage_type.id),
                ColumnSchema::count(format!("{} count", usage_type.name)),
            ));
            schema.push((
                cost_key(usage_type.id),
                ColumnSchema::cost(format!("{} cost", usage_type.name), true),
            ));
        }

        schema
    }
}

fn decimal_usage(usage: f64) -> Decimal {
    Decimal::from_f64_retain(usage).unwrap_or_default()
}

fn add_count(row: &mut BTreeMap<String, CellValue>, key: &str, usage: f64) {
    match row.get_mut(key) {
        Some(CellValue::Count(current)) => *current += usage,
        _ => {
            row.insert(key.to_string(), CellValue::Count(usage));
        }
    }
}

fn add_cost(row: &mut BTreeMap<String, CellValue>, key: &str, cost: Decimal) {
    match row.get_mut(key) {
        Some(CellValue::Cost(current)) => *current += cost,
        _ => {
            row.insert(key.to_string(), CellValue::Cost(cost));
        }
    }
}
