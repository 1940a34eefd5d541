//! Point time series for a dataset band.
//!
//! Band values at a location are read upstream once per image, averaged per
//! calendar day and returned as two plot traces: the raw daily means and a
//! Savitzky-Golay smoothed line.
//!
//! ```text
//! [{"x": ["2016-07-01", ...], "y": [...], "type": "scatter", "mode": "markers", "name": "height (Original)"},
//!  {"x": ["2016-07-01", ...], "y": [...], "type": "scatter", "mode": "lines",   "name": "height (Smoothed)"}]
//! ```

mod smooth;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::dataset::{Band, DatasetSpec};
use crate::provider::{ImageryProvider, PointSeriesQuery, ProviderError, SeriesSample};

pub use smooth::{smooth, WINDOW as SMOOTHING_WINDOW};

/// Default first day of a series request.
pub const DEFAULT_SERIES_START: &str = "2015-07-01";

/// A point series request for the served dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesRequest {
    pub lat: f64,
    pub lon: f64,
    pub band: Band,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub name: String,
}

/// Average samples sharing a date, in date order.
pub fn daily_means(samples: &[SeriesSample]) -> Vec<(NaiveDate, f64)> {
    let mut sums: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for sample in samples {
        let slot = sums.entry(sample.date).or_insert((0.0, 0));
        slot.0 += sample.value;
        slot.1 += 1;
    }
    sums.into_iter()
        .map(|(date, (sum, n))| (date, sum / f64::from(n)))
        .collect()
}

/// Raw and smoothed traces for `samples`, or `None` when there are none.
pub fn plot_traces(band: Band, samples: &[SeriesSample]) -> Option<[PlotTrace; 2]> {
    let daily = daily_means(samples);
    if daily.is_empty() {
        return None;
    }

    let dates: Vec<String> = daily
        .iter()
        .map(|(date, _)| date.format("%Y-%m-%d").to_string())
        .collect();
    let raw: Vec<f64> = daily.iter().map(|(_, value)| *value).collect();
    let smoothed = smooth(&raw);

    Some([
        PlotTrace {
            x: dates.clone(),
            y: raw,
            kind: "scatter",
            mode: "markers",
            name: format!("{} (Original)", band),
        },
        PlotTrace {
            x: dates,
            y: smoothed,
            kind: "scatter",
            mode: "lines",
            name: format!("{} (Smoothed)", band),
        },
    ])
}

/// Read and shape the series for `request` from `dataset`.
///
/// Returns `Ok(None)` when no image has data at the point.
pub async fn band_series<P: ImageryProvider>(
    provider: &P,
    dataset: &DatasetSpec,
    request: &SeriesRequest,
) -> Result<Option<[PlotTrace; 2]>, ProviderError> {
    let band = dataset
        .visparams(request.band)
        .bands
        .first()
        .ok_or_else(|| {
            ProviderError::ProviderSpecific(format!(
                "dataset {} has no upstream band for {}",
                dataset.id, request.band
            ))
        })?;

    let query = PointSeriesQuery {
        collection: dataset.collection.clone(),
        band: band.clone(),
        lat: request.lat,
        lon: request.lon,
        start: request.start,
        end: request.end,
    };
    let samples = provider.point_series(&query).await?;
    debug!(
        dataset = %dataset.id,
        band = %request.band,
        samples = samples.len(),
        "Building point series"
    );
    Ok(plot_traces(request.band, &samples))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample(date: NaiveDate, value: f64) -> SeriesSample {
        SeriesSample { date, value }
    }

    #[test]
    fn test_daily_means_groups_and_sorts() {
        let samples = [
            sample(day(2020, 7, 1), 4.0),
            sample(day(2018, 7, 1), 1.0),
            sample(day(2020, 7, 1), 6.0),
        ];
        assert_eq!(
            daily_means(&samples),
            vec![(day(2018, 7, 1), 1.0), (day(2020, 7, 1), 5.0)]
        );
    }

    #[test]
    fn test_plot_traces_shape() {
        let samples: Vec<SeriesSample> = (0..3)
            .map(|i| sample(day(2016 + i, 7, 1), f64::from(i)))
            .collect();

        let [raw, smoothed] = plot_traces(Band::Height, &samples).unwrap();

        assert_eq!(raw.x, vec!["2016-07-01", "2017-07-01", "2018-07-01"]);
        assert_eq!(raw.y, vec![0.0, 1.0, 2.0]);
        assert_eq!(raw.mode, "markers");
        assert_eq!(raw.name, "height (Original)");
        assert_eq!(smoothed.mode, "lines");
        assert_eq!(smoothed.name, "height (Smoothed)");
        // Fewer points than the window are passed through.
        assert_eq!(smoothed.y, raw.y);

        let json = serde_json::to_value(&raw).unwrap();
        assert_eq!(json["type"], "scatter");
    }

    #[test]
    fn test_plot_traces_empty() {
        assert!(plot_traces(Band::Presence, &[]).is_none());
    }
}
