//! Computed data payloads attached to materialized charts.

use serde::{Deserialize, Serialize};

use crate::characteristics::{Moments, quantile, sorted};

/// Largest number of histogram bins produced by the binning rule.
const MAX_BINS: usize = 50;

/// Data a renderer needs to draw one chart, already aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    Histogram {
        bins: Vec<HistogramBin>,
    },
    /// Box and violin plots.
    Distribution {
        summary: BoxSummary,
        /// Evenly sampled raw values.
        values: Vec<f64>,
    },
    /// Bar, pie and treemap charts.
    Counts {
        labels: Vec<String>,
        counts: Vec<usize>,
        /// Rows that fell outside the kept top-N labels.
        other: usize,
    },
    Scatter {
        x: Vec<f64>,
        y: Vec<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trendline: Option<Trendline>,
        total_points: usize,
    },
    Heatmap {
        columns: Vec<String>,
        values: Vec<Vec<Option<f64>>>,
    },
    GroupedDistribution {
        groups: Vec<GroupSummary>,
    },
    GroupedBars {
        categories: Vec<String>,
        series: Vec<Series>,
    },
    Line {
        x: Vec<String>,
        series: Vec<Series>,
    },
    /// Sampled rows for scatter matrices and parallel coordinates.
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<Option<f64>>>,
        total_rows: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub label: String,
    pub summary: BoxSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trendline {
    pub slope: f64,
    pub intercept: f64,
}

/// Row indices that evenly cover `len` rows with at most `limit` picks.
pub(crate) fn sample_indices(len: usize, limit: usize) -> Vec<usize> {
    if len <= limit {
        return (0..len).collect();
    }
    let step = len as f64 / limit as f64;
    (0..limit).map(|i| (i as f64 * step) as usize).collect()
}

/// Sturges-rule histogram over the present values.
pub(crate) fn histogram(values: &[f64]) -> Vec<HistogramBin> {
    if values.is_empty() {
        return Vec::new();
    }
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if min == max {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let bins = ((values.len() as f64).log2().ceil() as usize + 1).clamp(1, MAX_BINS);
    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Five-number summary with 1.5 x IQR fences. `None` for an empty sample.
pub(crate) fn box_summary(values: &[f64], outlier_limit: usize) -> Option<BoxSummary> {
    if values.is_empty() {
        return None;
    }
    let s = sorted(values);
    let q1 = quantile(&s, 0.25);
    let q3 = quantile(&s, 0.75);
    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;
    let outliers: Vec<f64> = s
        .iter()
        .copied()
        .filter(|v| *v < lower_fence || *v > upper_fence)
        .collect();
    let outliers = sample_indices(outliers.len(), outlier_limit)
        .into_iter()
        .map(|i| outliers[i])
        .collect();

    Some(BoxSummary {
        min: s[0],
        q1,
        median: quantile(&s, 0.5),
        q3,
        max: s[s.len() - 1],
        mean: Moments::from_values(values).mean,
        lower_fence,
        upper_fence,
        outliers,
    })
}

/// Least-squares fit; `None` when x has no spread.
pub(crate) fn trendline(x: &[f64], y: &[f64]) -> Option<Trendline> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for i in 0..n {
        sxy += (x[i] - mean_x) * (y[i] - mean_y);
        sxx += (x[i] - mean_x) * (x[i] - mean_x);
    }
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    Some(Trendline {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts_everything() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let bins = histogram(&values);
        assert_eq!(bins.len(), 8);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_eq!(bins.last().unwrap().end, 99.0);
    }

    #[test]
    fn test_histogram_constant() {
        let bins = histogram(&[2.0, 2.0, 2.0]);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn test_box_summary() {
        let mut values: Vec<f64> = (1..=19).map(f64::from).collect();
        values.push(500.0);
        let summary = box_summary(&values, 10).unwrap();
        assert_eq!(summary.outliers, vec![500.0]);
        assert_eq!(summary.min, 1.0);
        assert!(box_summary(&[], 10).is_none());
    }

    #[test]
    fn test_sample_indices() {
        assert_eq!(sample_indices(3, 10), vec![0, 1, 2]);
        let picks = sample_indices(1000, 10);
        assert_eq!(picks.len(), 10);
        assert_eq!(picks[1], 100);
    }

    #[test]
    fn test_trendline() {
        let t = trendline(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]).unwrap();
        assert!((t.slope - 2.0).abs() < 1e-12);
        assert!((t.intercept - 1.0).abs() < 1e-12);
        assert!(trendline(&[1.0, 1.0], &[0.0, 1.0]).is_none());
    }
}
