//! Dataset capability table.
//!
//! Lists, per collection, the years, visualization presets, periods and
//! months that tiles may be requested for. The resolver consults it to reject
//! requests before touching the cache or the upstream provider.

use std::ops::RangeInclusive;

use chrono::{Datelike, Utc};
use serde::Serialize;

/// Capabilities of a single collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionCapability {
    pub name: String,
    pub visparams: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub months: Vec<String>,
    #[serde(serialize_with = "serialize_years")]
    pub years: RangeInclusive<i32>,
}

fn serialize_years<S>(years: &RangeInclusive<i32>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(years.clone())
}

impl CollectionCapability {
    pub fn new(name: &str, years: RangeInclusive<i32>) -> Self {
        Self {
            name: name.to_string(),
            visparams: Vec::new(),
            periods: Vec::new(),
            months: Vec::new(),
            years,
        }
    }

    pub fn with_visparams(mut self, visparams: &[&str]) -> Self {
        self.visparams = visparams.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn with_periods(mut self, periods: &[&str]) -> Self {
        self.periods = periods.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_months(mut self, months: &[&str]) -> Self {
        self.months = months.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn supports_year(&self, year: i32) -> bool {
        self.years.contains(&year)
    }
}

/// Lookup table of every known collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityTable {
    collections: Vec<CollectionCapability>,
}

const PERIODS: [&str; 3] = ["WET", "DRY", "MONTH"];
const MONTHS: [&str; 12] = [
    "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12",
];

impl CapabilityTable {
    pub fn new(collections: Vec<CollectionCapability>) -> Self {
        Self { collections }
    }

    /// The built-in table, with open-ended ranges ending at the current UTC year.
    pub fn default_table() -> Self {
        Self::default_table_for(Utc::now().year())
    }

    /// The built-in table with open-ended ranges ending at `current_year`.
    pub fn default_table_for(current_year: i32) -> Self {
        Self::new(vec![
            CollectionCapability::new("s2_harmonized", 2017..=current_year)
                .with_visparams(&["s2-green", "s2-red", "s2-rgb"])
                .with_periods(&PERIODS),
            CollectionCapability::new("landsat", 1985..=current_year)
                .with_visparams(&["landsat-true", "landsat-agri", "landsat-false"])
                .with_months(&MONTHS)
                .with_periods(&PERIODS),
            CollectionCapability::new("open_buildings", 2016..=2023)
                .with_visparams(&["building_height", "building_presence"]),
        ])
    }

    pub fn get(&self, dataset: &str) -> Option<&CollectionCapability> {
        self.collections.iter().find(|c| c.name == dataset)
    }

    /// Whether `year` is listed for `dataset`. Unknown datasets have no valid years.
    pub fn is_valid_year(&self, dataset: &str, year: i32) -> bool {
        self.get(dataset).is_some_and(|c| c.supports_year(year))
    }

    pub fn collections(&self) -> &[CollectionCapability] {
        &self.collections
    }
}

impl Default for CapabilityTable {
    fn default() -> Self {
        Self::default_table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_buildings_years() {
        let table = CapabilityTable::default_table_for(2026);
        assert!(!table.is_valid_year("open_buildings", 2015));
        assert!(table.is_valid_year("open_buildings", 2016));
        assert!(table.is_valid_year("open_buildings", 2023));
        assert!(!table.is_valid_year("open_buildings", 2024));
    }

    #[test]
    fn test_open_ended_ranges_follow_current_year() {
        let table = CapabilityTable::default_table_for(2026);
        assert!(table.is_valid_year("landsat", 1985));
        assert!(table.is_valid_year("landsat", 2026));
        assert!(!table.is_valid_year("landsat", 2027));
        assert!(!table.is_valid_year("s2_harmonized", 2016));
    }

    #[test]
    fn test_unknown_dataset_rejects_every_year() {
        let table = CapabilityTable::default_table_for(2026);
        assert!(!table.is_valid_year("modis", 2020));
    }

    #[test]
    fn test_landsat_lists_months() {
        let table = CapabilityTable::default_table_for(2026);
        let landsat = table.get("landsat").unwrap();
        assert_eq!(landsat.months.len(), 12);
        assert_eq!(landsat.periods, vec!["WET", "DRY", "MONTH"]);
        assert!(table.get("open_buildings").unwrap().months.is_empty());
    }

    #[test]
    fn test_serializes_years_as_list() {
        let table = CapabilityTable::new(vec![CollectionCapability::new("ds", 2020..=2022)
            .with_visparams(&["v"])]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["collections"][0]["years"], serde_json::json!([2020, 2021, 2022]));
        assert!(json["collections"][0].get("months").is_none());
    }
}
