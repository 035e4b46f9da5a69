pub mod loader;

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::error::{Result, UsagebillError};
use crate::model::{DailyUsage, UsagePrice, UsageType, Venture, Warehouse};

/// In-memory dataset the report plugins query.
///
/// Plays the role of the billing database: entity lookups plus the handful
/// of filtered aggregations the report needs. All date windows are inclusive
/// on both ends.
#[derive(Debug, Default)]
pub struct Dataset {
    pub ventures: Vec<Venture>,
    pub warehouses: Vec<Warehouse>,
    pub usage_types: Vec<UsageType>,
    pub usage_prices: Vec<UsagePrice>,
    pub daily_usages: Vec<DailyUsage>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify id uniqueness and referential integrity after loading
    pub fn validate(&self) -> Result<()> {
        check_unique("venture", self.ventures.iter().map(|v| v.id))?;
        check_unique("warehouse", self.warehouses.iter().map(|w| w.id))?;
        check_unique("usage type", self.usage_types.iter().map(|u| u.id))?;

        for up in &self.usage_prices {
            if self.usage_type(up.usage_type).is_none() {
                return Err(broken("usage price", up.usage_type, "usage type", up.usage_type));
            }
            if let Some(wh) = up.warehouse {
                if self.warehouse(wh).is_none() {
                    return Err(broken("usage price", up.usage_type, "warehouse", wh));
                }
            }
            if up.start > up.end {
                return Err(UsagebillError::InvalidRange {
                    start: up.start,
                    end: up.end,
                });
            }
        }
        for du in &self.daily_usages {
            if self.venture(du.venture).is_none() {
                return Err(broken("daily usage for venture", du.venture, "venture", du.venture));
            }
            if self.usage_type(du.usage_type).is_none() {
                return Err(broken(
                    "daily usage for venture",
                    du.venture,
                    "usage type",
                    du.usage_type,
                ));
            }
            if let Some(wh) = du.warehouse {
                if self.warehouse(wh).is_none() {
                    return Err(broken("daily usage for venture", du.venture, "warehouse", wh));
                }
            }
        }
        Ok(())
    }

    pub fn venture(&self, id: u32) -> Option<&Venture> {
        self.ventures.iter().find(|v| v.id == id)
    }

    pub fn warehouse(&self, id: u32) -> Option<&Warehouse> {
        self.warehouses.iter().find(|w| w.id == id)
    }

    pub fn usage_type(&self, id: u32) -> Option<&UsageType> {
        self.usage_types.iter().find(|u| u.id == id)
    }

    pub fn venture_by_symbol(&self, symbol: &str) -> Result<&Venture> {
        self.ventures
            .iter()
            .find(|v| v.symbol == symbol)
            .ok_or_else(|| UsagebillError::UnknownSymbol {
                entity: "venture",
                symbol: symbol.to_string(),
            })
    }

    pub fn usage_type_by_symbol(&self, symbol: &str) -> Result<&UsageType> {
        self.usage_types
            .iter()
            .find(|u| u.symbol == symbol)
            .ok_or_else(|| UsagebillError::UnknownSymbol {
                entity: "usage type",
                symbol: symbol.to_string(),
            })
    }

    /// Usage types that appear in reports, ordered by id
    pub fn report_usage_types(&self) -> Vec<&UsageType> {
        let mut types: Vec<&UsageType> =
            self.usage_types.iter().filter(|u| u.show_in_report).collect();
        types.sort_by_key(|u| u.id);
        types
    }

    /// Warehouses that appear in reports, ordered by id
    pub fn report_warehouses(&self) -> Vec<&Warehouse> {
        let mut warehouses: Vec<&Warehouse> =
            self.warehouses.iter().filter(|w| w.show_in_report).collect();
        warehouses.sort_by_key(|w| w.id);
        warehouses
    }

    /// Price records of a usage type overlapping the window, ordered by start.
    /// When a warehouse is given only records attributed to it are returned.
    pub fn usage_prices(
        &self,
        usage_type: u32,
        start: NaiveDate,
        end: NaiveDate,
        warehouse: Option<u32>,
    ) -> Vec<&UsagePrice> {
        let mut prices: Vec<&UsagePrice> = self
            .usage_prices
            .iter()
            .filter(|up| up.usage_type == usage_type && up.overlaps(start, end))
            .filter(|up| warehouse.is_none() || up.warehouse == warehouse)
            .collect();
        prices.sort_by_key(|up| up.start);
        prices
    }

    /// Sum of metered usage of one type in the window
    pub fn total_usage(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        usage_type: u32,
        warehouse: Option<u32>,
        ventures: Option<&[u32]>,
    ) -> f64 {
        self.filtered_usages(start, end, usage_type, warehouse, ventures)
            .map(|du| du.value)
            .sum()
    }

    /// Per-venture sums of metered usage of one type in the window,
    /// ordered by venture id
    pub fn usages_per_venture(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        usage_type: u32,
        warehouse: Option<u32>,
        ventures: Option<&[u32]>,
    ) -> BTreeMap<u32, f64> {
        let mut sums = BTreeMap::new();
        for du in self.filtered_usages(start, end, usage_type, warehouse, ventures) {
            *sums.entry(du.venture).or_insert(0.0) += du.value;
        }
        sums
    }

    fn filtered_usages<'a>(
        &'a self,
        start: NaiveDate,
        end: NaiveDate,
        usage_type: u32,
        warehouse: Option<u32>,
        ventures: Option<&'a [u32]>,
    ) -> impl Iterator<Item = &'a DailyUsage> + 'a {
        self.daily_usages.iter().filter(move |du| {
            du.usage_type == usage_type
                && du.date >= start
                && du.date <= end
                && (warehouse.is_none() || du.warehouse == warehouse)
                && ventures.is_none_or(|vs| vs.contains(&du.venture))
        })
    }
}

fn check_unique(entity: &'static str, ids: impl Iterator<Item = u32>) -> Result<()> {
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(UsagebillError::DuplicateId { entity, id });
        }
    }
    Ok(())
}

fn broken(
    entity: &'static str,
    id: u32,
    referenced: &'static str,
    referenced_id: u32,
) -> UsagebillError {
    UsagebillError::BrokenReference {
        entity,
        id,
        referenced,
        referenced_id,
    }
}
