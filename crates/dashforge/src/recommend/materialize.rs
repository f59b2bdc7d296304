//! Binds recommendations to the dataset: ids plus computed data payloads.

use indexmap::IndexMap;

use super::chart::{ChartSpecification, ChartType};
use super::data::{self, ChartData, GroupSummary, Series};
use crate::characteristics::correlation_matrix;
use crate::dataset::{Column, ColumnKind, ColumnValues, Dataset};

/// Default cap on points per scatter-like chart.
pub const DEFAULT_POINT_LIMIT: usize = 2000;

/// Charts that survived materialization and the reasons others were dropped.
#[derive(Debug, Clone, Default)]
pub struct Materialized {
    pub charts: Vec<ChartSpecification>,
    pub errors: Vec<String>,
}

/// Computes chart payloads from the dataset and assigns stable ids.
#[derive(Debug, Clone)]
pub struct ChartMaterializer {
    point_limit: usize,
}

impl Default for ChartMaterializer {
    fn default() -> Self {
        Self::new(DEFAULT_POINT_LIMIT)
    }
}

impl ChartMaterializer {
    pub fn new(point_limit: usize) -> Self {
        Self {
            point_limit: point_limit.max(1),
        }
    }

    /// Materialize specs in order. Ids are `chart_1`, `chart_2`, ... over the
    /// charts that could be built.
    pub fn materialize(&self, specs: &[ChartSpecification], dataset: &Dataset) -> Materialized {
        let mut out = Materialized::default();
        for spec in specs {
            match self.build(spec, dataset) {
                Ok(data) => {
                    let mut chart = spec.clone();
                    chart.id = Some(format!("chart_{}", out.charts.len() + 1));
                    chart.data = Some(data);
                    out.charts.push(chart);
                }
                Err(reason) => {
                    tracing::warn!(chart = %spec.chart_type, %reason, "skipping chart");
                    out.errors.push(format!(
                        "Skipped {} '{}': {reason}",
                        spec.chart_type,
                        spec.title()
                    ));
                }
            }
        }
        out
    }

    fn build(&self, spec: &ChartSpecification, dataset: &Dataset) -> Result<ChartData, String> {
        if spec.columns.is_empty() {
            return Err("no columns".to_string());
        }
        let columns = spec
            .columns
            .iter()
            .map(|name| {
                dataset
                    .column(name)
                    .ok_or_else(|| format!("column '{name}' not found"))
            })
            .collect::<Result<Vec<&Column>, String>>()?;

        match spec.chart_type {
            ChartType::Histogram => {
                let col = expect_kind(columns[0], ColumnKind::Numerical)?;
                Ok(ChartData::Histogram {
                    bins: data::histogram(&col.numbers()),
                })
            }
            ChartType::BoxPlot | ChartType::ViolinPlot => {
                let col = expect_kind(columns[0], ColumnKind::Numerical)?;
                let values = col.numbers();
                let summary = data::box_summary(&values, self.point_limit)
                    .ok_or_else(|| format!("column '{}' has no values", col.name))?;
                let values = data::sample_indices(values.len(), self.point_limit)
                    .into_iter()
                    .map(|i| values[i])
                    .collect();
                Ok(ChartData::Distribution { summary, values })
            }
            ChartType::BarChart | ChartType::PieChart | ChartType::Treemap => {
                Ok(counts(columns[0], spec.config.top_n))
            }
            ChartType::ScatterPlot => {
                let x = expect_kind(columns[0], ColumnKind::Numerical)?;
                let y = expect_kind(second(&columns)?, ColumnKind::Numerical)?;
                Ok(self.scatter(x, y, spec.config.add_trendline.unwrap_or(false)))
            }
            ChartType::CorrelationHeatmap => {
                for col in &columns {
                    expect_kind(col, ColumnKind::Numerical)?;
                }
                let matrix = correlation_matrix(dataset, &spec.columns);
                Ok(ChartData::Heatmap {
                    columns: matrix.columns,
                    values: matrix.values,
                })
            }
            ChartType::GroupedBoxPlot => {
                let value = expect_kind(columns[0], ColumnKind::Numerical)?;
                let group = second(&columns)?;
                Ok(self.grouped_distribution(value, group))
            }
            ChartType::GroupedBarChart => {
                let group = columns[0];
                let metrics = columns[1..]
                    .iter()
                    .map(|c| expect_kind(c, ColumnKind::Numerical))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(grouped_bars(group, &metrics))
            }
            ChartType::LineChart => {
                let date = expect_kind(columns[0], ColumnKind::Datetime)?;
                let metrics = columns[1..]
                    .iter()
                    .map(|c| expect_kind(c, ColumnKind::Numerical))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.line(date, &metrics))
            }
            ChartType::ScatterMatrix | ChartType::ParallelCoordinates => {
                for col in &columns {
                    expect_kind(col, ColumnKind::Numerical)?;
                }
                Ok(self.rows(&columns, dataset.row_count()))
            }
        }
    }

    fn scatter(&self, x: &Column, y: &Column, with_trend: bool) -> ChartData {
        let (ColumnValues::Numerical(xs), ColumnValues::Numerical(ys)) = (&x.values, &y.values)
        else {
            return ChartData::Scatter {
                x: Vec::new(),
                y: Vec::new(),
                trendline: None,
                total_points: 0,
            };
        };
        let points: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys)
            .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
            .filter(|(a, b)| !a.is_nan() && !b.is_nan())
            .collect();
        let all_x: Vec<f64> = points.iter().map(|p| p.0).collect();
        let all_y: Vec<f64> = points.iter().map(|p| p.1).collect();
        let trendline = with_trend.then(|| data::trendline(&all_x, &all_y)).flatten();

        let picks = data::sample_indices(points.len(), self.point_limit);
        ChartData::Scatter {
            x: picks.iter().map(|i| all_x[*i]).collect(),
            y: picks.iter().map(|i| all_y[*i]).collect(),
            trendline,
            total_points: points.len(),
        }
    }

    fn grouped_distribution(&self, value: &Column, group: &Column) -> ChartData {
        let mut buckets: IndexMap<String, Vec<f64>> = IndexMap::new();
        if let ColumnValues::Numerical(values) = &value.values {
            for (row, v) in values.iter().enumerate() {
                let (Some(v), Some(label)) = (v, group.label(row)) else {
                    continue;
                };
                if !v.is_nan() {
                    buckets.entry(label).or_default().push(*v);
                }
            }
        }
        let groups = buckets
            .into_iter()
            .filter_map(|(label, values)| {
                let summary = data::box_summary(&values, self.point_limit)?;
                Some(GroupSummary { label, summary })
            })
            .collect();
        ChartData::GroupedDistribution { groups }
    }

    fn line(&self, date: &Column, metrics: &[&Column]) -> ChartData {
        let ColumnValues::Datetime(dates) = &date.values else {
            return ChartData::Line {
                x: Vec::new(),
                series: Vec::new(),
            };
        };
        let mut rows: Vec<(usize, chrono::NaiveDateTime)> = dates
            .iter()
            .enumerate()
            .filter_map(|(row, d)| Some((row, (*d)?)))
            .collect();
        rows.sort_by_key(|(_, d)| *d);

        let picks: Vec<usize> = data::sample_indices(rows.len(), self.point_limit)
            .into_iter()
            .map(|i| rows[i].0)
            .collect();
        let x = picks
            .iter()
            .filter_map(|row| date.label(*row))
            .collect();
        let series = metrics
            .iter()
            .map(|m| Series {
                name: m.name.clone(),
                values: picks.iter().map(|row| number_at(m, *row)).collect(),
            })
            .collect();
        ChartData::Line { x, series }
    }

    fn rows(&self, columns: &[&Column], row_count: usize) -> ChartData {
        let picks = data::sample_indices(row_count, self.point_limit);
        ChartData::Rows {
            columns: columns.iter().map(|c| c.name.clone()).collect(),
            rows: picks
                .iter()
                .map(|row| columns.iter().map(|c| number_at(c, *row)).collect())
                .collect(),
            total_rows: row_count,
        }
    }
}

fn expect_kind(column: &Column, kind: ColumnKind) -> Result<&Column, String> {
    if column.kind() == kind {
        Ok(column)
    } else {
        Err(format!(
            "column '{}' is {}, expected {}",
            column.name,
            column.kind(),
            kind
        ))
    }
}

fn second<'a>(columns: &[&'a Column]) -> Result<&'a Column, String> {
    columns
        .get(1)
        .copied()
        .ok_or_else(|| "chart needs two columns".to_string())
}

fn number_at(column: &Column, row: usize) -> Option<f64> {
    match &column.values {
        ColumnValues::Numerical(v) => v.get(row).copied().flatten().filter(|x| !x.is_nan()),
        _ => None,
    }
}

/// Value counts, most frequent first, truncated to `top_n`.
fn counts(column: &Column, top_n: Option<usize>) -> ChartData {
    let mut tally: IndexMap<String, usize> = IndexMap::new();
    for row in 0..column.len() {
        if let Some(label) = column.label(row) {
            *tally.entry(label).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(String, usize)> = tally.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let keep = top_n.unwrap_or(ranked.len()).min(ranked.len());
    let other = ranked[keep..].iter().map(|(_, n)| n).sum();
    ranked.truncate(keep);
    let (labels, counts) = ranked.into_iter().unzip();
    ChartData::Counts {
        labels,
        counts,
        other,
    }
}

/// Mean of each metric per group label.
fn grouped_bars(group: &Column, metrics: &[&Column]) -> ChartData {
    let mut sums: IndexMap<String, Vec<(f64, usize)>> = IndexMap::new();
    for row in 0..group.len() {
        let Some(label) = group.label(row) else { continue };
        let entry = sums
            .entry(label)
            .or_insert_with(|| vec![(0.0, 0); metrics.len()]);
        for (slot, metric) in entry.iter_mut().zip(metrics) {
            if let Some(v) = number_at(metric, row) {
                slot.0 += v;
                slot.1 += 1;
            }
        }
    }

    let series = metrics
        .iter()
        .enumerate()
        .map(|(i, m)| Series {
            name: m.name.clone(),
            values: sums
                .values()
                .map(|slots| {
                    let (sum, n) = slots[i];
                    (n > 0).then(|| sum / n as f64)
                })
                .collect(),
        })
        .collect();
    ChartData::GroupedBars {
        categories: sums.keys().cloned().collect(),
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::chart::{AnalysisPurpose, ChartConfig, Priority};

    fn spec(chart: ChartType, columns: &[&str]) -> ChartSpecification {
        ChartSpecification::new(
            chart,
            columns.iter().map(|c| c.to_string()).collect(),
            Priority::High,
            AnalysisPurpose::DistributionAnalysis,
            "",
            ChartConfig::titled("t"),
        )
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Column::numerical("x", (0..50).map(|i| Some(i as f64)).collect()),
            Column::numerical("y", (0..50).map(|i| Some(2.0 * i as f64)).collect()),
            Column::categorical("g", (0..50).map(|i| Some(format!("g{}", i % 3))).collect()),
        ])
        .unwrap()
    }

    #[test]
    fn test_ids_are_sequential_over_kept_charts() {
        let specs = vec![
            spec(ChartType::Histogram, &["x"]),
            spec(ChartType::Histogram, &["missing"]),
            spec(ChartType::BarChart, &["g"]),
        ];
        let out = ChartMaterializer::default().materialize(&specs, &dataset());
        assert_eq!(out.charts.len(), 2);
        assert_eq!(out.charts[0].id.as_deref(), Some("chart_1"));
        assert_eq!(out.charts[1].id.as_deref(), Some("chart_2"));
        assert_eq!(out.charts[1].container_id().as_deref(), Some("chart-chart_2"));
        assert_eq!(out.errors.len(), 1);
        assert!(out.errors[0].contains("'missing' not found"));
    }

    #[test]
    fn test_scatter_respects_point_limit() {
        let mut s = spec(ChartType::ScatterPlot, &["x", "y"]);
        s.config.add_trendline = Some(true);
        let out = ChartMaterializer::new(10).materialize(&[s], &dataset());
        match out.charts[0].data.as_ref().unwrap() {
            ChartData::Scatter {
                x,
                trendline,
                total_points,
                ..
            } => {
                assert_eq!(x.len(), 10);
                assert_eq!(*total_points, 50);
                assert!((trendline.unwrap().slope - 2.0).abs() < 1e-9);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_counts_top_n() {
        let mut s = spec(ChartType::Treemap, &["g"]);
        s.config.top_n = Some(2);
        let out = ChartMaterializer::default().materialize(&[s], &dataset());
        match out.charts[0].data.as_ref().unwrap() {
            ChartData::Counts { labels, counts, other } => {
                assert_eq!(labels, &vec!["g0".to_string(), "g1".to_string()]);
                assert_eq!(counts, &vec![17, 17]);
                assert_eq!(*other, 16);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_kind_mismatch_is_reported() {
        let out = ChartMaterializer::default()
            .materialize(&[spec(ChartType::Histogram, &["g"])], &dataset());
        assert!(out.charts.is_empty());
        assert!(out.errors[0].contains("expected numerical"));
    }

    #[test]
    fn test_grouped_payloads() {
        let out = ChartMaterializer::default().materialize(
            &[
                spec(ChartType::GroupedBoxPlot, &["x", "g"]),
                spec(ChartType::GroupedBarChart, &["g", "x", "y"]),
            ],
            &dataset(),
        );
        assert!(out.errors.is_empty());
        match out.charts[1].data.as_ref().unwrap() {
            ChartData::GroupedBars { categories, series } => {
                assert_eq!(categories.len(), 3);
                assert_eq!(series.len(), 2);
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }
}
