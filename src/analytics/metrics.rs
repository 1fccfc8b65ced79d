//! Chart data derived from parsed tables

use crate::analytics::table::Table;
use crate::parser::{EmissionRecord, NetworkStep, QueueSample, TripRecord};
use serde::{Deserialize, Serialize};

/// Calculator for chart-ready metrics
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Waiting time histogram with `bins` equal-width buckets
    pub fn waiting_time_histogram(table: &Table<TripRecord>, bins: usize) -> Vec<HistogramBucket> {
        histogram(&table.column(|t| t.waiting_time), bins)
    }

    /// Five-number summary of CO2 per vehicle
    pub fn co2_distribution(table: &Table<EmissionRecord>) -> Option<BoxPlotStats> {
        BoxPlotStats::from_values(&table.column(|e| e.co2))
    }

    /// One queue length series per segment, in first-appearance order
    pub fn queue_series(table: &Table<QueueSample>) -> Vec<QueueSeries> {
        table
            .group_by(|s| s.id.as_str())
            .into_iter()
            .map(|(id, samples)| QueueSeries {
                id: id.to_string(),
                points: samples
                    .iter()
                    .map(|s| TimePoint { x: s.time, y: s.queue_length })
                    .collect(),
            })
            .collect()
    }

    /// Speed and congestion over the shared time axis
    pub fn network_series(table: &Table<NetworkStep>) -> NetworkSeries {
        NetworkSeries {
            mean_speed: table
                .rows()
                .iter()
                .map(|s| TimePoint { x: s.time, y: s.mean_speed })
                .collect(),
            halting: table
                .rows()
                .iter()
                .map(|s| TimePoint { x: s.time, y: s.halting as f64 })
                .collect(),
        }
    }
}

/// Histogram bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub range_start: f64,
    pub range_end: f64,
    pub count: u32,
    pub label: String,
}

/// Box plot statistics. Whiskers reach the furthest value within 1.5 IQR
/// of the box; anything beyond is an outlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxPlotStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let inside = sorted.iter().copied().filter(|v| (low_fence..=high_fence).contains(v));
        let whisker_low = inside.clone().fold(f64::INFINITY, f64::min);
        let whisker_high = inside.fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            min: sorted[0],
            q1,
            median,
            q3,
            max: sorted[sorted.len() - 1],
            whisker_low,
            whisker_high,
            outliers: sorted
                .iter()
                .copied()
                .filter(|v| !(low_fence..=high_fence).contains(v))
                .collect(),
        })
    }
}

/// (time, value) point for scatter-style line charts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub x: f64,
    pub y: f64,
}

/// Queue length over time for one road segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSeries {
    pub id: String,
    pub points: Vec<TimePoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSeries {
    pub mean_speed: Vec<TimePoint>,
    pub halting: Vec<TimePoint>,
}

/// Equal-width histogram over [min, max], the last bucket closed on the right.
/// A single distinct value is spread over [v - 0.5, v + 0.5].
fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBucket> {
    if values.is_empty() || bins == 0 {
        return vec![];
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let precision = label_precision(width);

    let mut buckets: Vec<HistogramBucket> = (0..bins)
        .map(|i| {
            let start = lo + i as f64 * width;
            let end = start + width;
            HistogramBucket {
                range_start: start,
                range_end: end,
                count: 0,
                label: format!("{:.*}-{:.*}", precision, start, precision, end),
            }
        })
        .collect();

    for v in values {
        let idx = ((v - lo) / width).floor() as usize;
        buckets[idx.min(bins - 1)].count += 1;
    }

    buckets
}

/// Decimals needed for neighbouring bucket edges to print differently
fn label_precision(width: f64) -> usize {
    ((-width.log10()).ceil().max(0.0) as usize + 1).min(6)
}

/// Linear interpolation between closest ranks. `sorted` must be non-empty.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}
