//! Dataset catalogue.
//!
//! A dataset pairs an upstream image collection with the visualization
//! parameters used when minting tile URL templates for each of its bands.

mod band;

pub use band::{Band, UnknownBand};

/// Visualization parameters sent upstream when minting a template.
#[derive(Debug, Clone, PartialEq)]
pub struct VisParams {
    pub bands: Vec<String>,
    pub min: f64,
    pub max: f64,
    pub palette: Vec<String>,
}

impl VisParams {
    /// `min` rendered the way the upstream expects it, e.g. `"0"`.
    pub fn min_string(&self) -> String {
        self.min.to_string()
    }

    /// `max` rendered the way the upstream expects it, e.g. `"30"`.
    pub fn max_string(&self) -> String {
        self.max.to_string()
    }

    /// Palette as a comma-joined string.
    pub fn palette_string(&self) -> String {
        self.palette.join(",")
    }
}

/// A servable dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSpec {
    /// Identifier used in cache keys and the capability table.
    pub id: String,
    /// Upstream collection id.
    pub collection: String,
    presence: VisParams,
    height: VisParams,
}

pub const OPEN_BUILDINGS_ID: &str = "open_buildings";
pub const OPEN_BUILDINGS_COLLECTION: &str = "GOOGLE/Research/open-buildings-temporal/v1";

impl DatasetSpec {
    /// Google Open Buildings 2.5D Temporal.
    pub fn open_buildings() -> Self {
        Self {
            id: OPEN_BUILDINGS_ID.to_string(),
            collection: OPEN_BUILDINGS_COLLECTION.to_string(),
            presence: VisParams {
                bands: vec!["building_presence".to_string()],
                min: 0.0,
                max: 1.0,
                palette: ["000000", "2446c0", "2ca02c", "ffdd57"]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
            },
            height: VisParams {
                bands: vec!["building_height".to_string()],
                min: 0.0,
                max: 30.0,
                palette: [
                    "002873", "1e6caf", "39a7b4", "7ecf4c", "ffe971", "ff7c39", "ff0000",
                ]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            },
        }
    }

    /// Look up a dataset by id.
    pub fn by_id(id: &str) -> Option<Self> {
        match id {
            OPEN_BUILDINGS_ID => Some(Self::open_buildings()),
            _ => None,
        }
    }

    pub fn visparams(&self, band: Band) -> &VisParams {
        match band {
            Band::Presence => &self.presence,
            Band::Height => &self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_buildings_height_visparams() {
        let ds = DatasetSpec::open_buildings();
        let vis = ds.visparams(Band::Height);
        assert_eq!(vis.bands, vec!["building_height"]);
        assert_eq!(vis.min_string(), "0");
        assert_eq!(vis.max_string(), "30");
        assert_eq!(
            vis.palette_string(),
            "002873,1e6caf,39a7b4,7ecf4c,ffe971,ff7c39,ff0000"
        );
    }

    #[test]
    fn test_open_buildings_presence_visparams() {
        let ds = DatasetSpec::open_buildings();
        let vis = ds.visparams(Band::Presence);
        assert_eq!(vis.bands, vec!["building_presence"]);
        assert_eq!(vis.max_string(), "1");
        assert_eq!(vis.palette_string(), "000000,2446c0,2ca02c,ffdd57");
    }

    #[test]
    fn test_fractional_bounds_keep_decimals() {
        let vis = VisParams {
            bands: vec!["b".into()],
            min: 0.5,
            max: 2.25,
            palette: vec![],
        };
        assert_eq!(vis.min_string(), "0.5");
        assert_eq!(vis.max_string(), "2.25");
    }

    #[test]
    fn test_by_id() {
        assert_eq!(DatasetSpec::by_id("open_buildings").unwrap().collection, OPEN_BUILDINGS_COLLECTION);
        assert!(DatasetSpec::by_id("landsat").is_none());
    }
}
