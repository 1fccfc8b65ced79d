//! HTML chart pages with Chart.js

use crate::analytics::metrics::MetricsCalculator;
use crate::analytics::table::Table;
use crate::parser::{EmissionRecord, NetworkStep, QueueSample, TripRecord};
use anyhow::{Context, Result};
use minijinja::Environment;
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const CHART_TEMPLATE: &str = include_str!("../../templates/chart.html");
const BOXPLOT_PLUGIN: &str = "https://cdn.jsdelivr.net/npm/@sgratzl/chartjs-chart-boxplot";

const SERIES_COLORS: [&str; 8] = [
    "#22d3ee", "#f59e0b", "#8b5cf6", "#10b981", "#ef4444", "#ec4899", "#3b82f6", "#eab308",
];

#[derive(Debug, Serialize)]
struct StatCard {
    label: &'static str,
    value: String,
}

#[derive(Debug, Serialize)]
struct ChartPage {
    title: &'static str,
    subtitle: String,
    timestamp: String,
    source: String,
    stats: Vec<StatCard>,
    chart_title: &'static str,
    chart_config: String,
    plugins: Vec<&'static str>,
}

/// Writes one self-contained HTML page per chart
pub struct ReportRenderer {
    env: Environment<'static>,
    output_dir: PathBuf,
}

impl ReportRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("chart.html", CHART_TEMPLATE)
            .context("Failed to load chart template")?;

        Ok(Self {
            env,
            output_dir: output_dir.into(),
        })
    }

    /// Histogram of vehicle waiting times
    pub fn render_waiting_histogram(
        &self,
        table: &Table<TripRecord>,
        bins: usize,
        source: &Path,
    ) -> Result<PathBuf> {
        let buckets = MetricsCalculator::waiting_time_histogram(table, bins);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        let counts: Vec<u32> = buckets.iter().map(|b| b.count).collect();

        let config = json!({
            "type": "bar",
            "data": {
                "labels": labels,
                "datasets": [{
                    "label": "Number of Vehicles",
                    "data": counts,
                    "backgroundColor": "rgba(135, 206, 235, 0.8)",
                    "borderColor": "#000000",
                    "borderWidth": 1,
                    "barPercentage": 1.0,
                    "categoryPercentage": 1.0
                }]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": { "legend": { "display": false } },
                "scales": {
                    "x": axis("Waiting Time (seconds)"),
                    "y": merge(axis("Number of Vehicles"), json!({ "beginAtZero": true, "ticks": { "precision": 0 } }))
                }
            }
        });

        let page = ChartPage {
            title: "Trip Analysis",
            subtitle: format!("{} completed trips", table.len()),
            timestamp: timestamp(),
            source: source.display().to_string(),
            stats: vec![
                StatCard {
                    label: "Average Duration",
                    value: format!("{:.2} s", table.mean(|t| t.duration)),
                },
                StatCard {
                    label: "Average Waiting Time",
                    value: format!("{:.2} s", table.mean(|t| t.waiting_time)),
                },
                StatCard {
                    label: "Average Time Loss",
                    value: format!("{:.2} s", table.mean(|t| t.time_loss)),
                },
            ],
            chart_title: "Distribution of Vehicle Waiting Times",
            chart_config: script_json(&config)?,
            plugins: vec![],
        };

        self.write_page("waiting_time_histogram.html", &page)
    }

    /// Box plot of CO2 emitted per vehicle
    pub fn render_co2_boxplot(&self, table: &Table<EmissionRecord>, source: &Path) -> Result<PathBuf> {
        let stats = MetricsCalculator::co2_distribution(table).context("No CO2 values to plot")?;

        let config = json!({
            "type": "boxplot",
            "data": {
                "labels": ["CO2"],
                "datasets": [{
                    "label": "CO2 per vehicle (g)",
                    "data": [{
                        "min": stats.whisker_low,
                        "q1": stats.q1,
                        "median": stats.median,
                        "q3": stats.q3,
                        "max": stats.whisker_high,
                        "outliers": stats.outliers
                    }],
                    "backgroundColor": "rgba(16, 185, 129, 0.6)",
                    "borderColor": "#10b981",
                    "outlierBackgroundColor": "#10b981",
                    "borderWidth": 1.5
                }]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": { "legend": { "display": false } },
                "scales": { "y": axis("CO2 (grams)") }
            }
        });

        let page = ChartPage {
            title: "Emissions Report",
            subtitle: format!("{} vehicles with emission data", table.len()),
            timestamp: timestamp(),
            source: source.display().to_string(),
            stats: vec![
                StatCard {
                    label: "Total CO2",
                    value: format!("{:.2} g", table.sum(|e| e.co2)),
                },
                StatCard {
                    label: "Median CO2",
                    value: format!("{:.2} g", stats.median),
                },
                StatCard {
                    label: "Average Fuel",
                    value: format!("{:.2} mL", table.mean(|e| e.fuel)),
                },
            ],
            chart_title: "Distribution of CO2 Emissions per Vehicle",
            chart_config: script_json(&config)?,
            plugins: vec![BOXPLOT_PLUGIN],
        };

        self.write_page("co2_boxplot.html", &page)
    }

    /// Queue length over time, one line per road segment
    pub fn render_queue_series(&self, table: &Table<QueueSample>, source: &Path) -> Result<PathBuf> {
        let series = MetricsCalculator::queue_series(table);

        let datasets: Vec<Value> = series
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let color = SERIES_COLORS[i % SERIES_COLORS.len()];
                json!({
                    "label": format!("Zone: {}", s.id),
                    "data": s.points,
                    "borderColor": color,
                    "backgroundColor": color,
                    "borderWidth": 2,
                    "pointRadius": 0,
                    "tension": 0.1
                })
            })
            .collect();

        let config = json!({
            "type": "line",
            "data": { "datasets": datasets },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "interaction": { "intersect": false, "mode": "nearest" },
                "plugins": { "legend": { "position": "top", "align": "end" } },
                "scales": {
                    "x": merge(axis("Time (s)"), json!({ "type": "linear", "grid": { "borderDash": [4, 4] } })),
                    "y": merge(axis("Queue Length (m)"), json!({ "beginAtZero": true, "grid": { "borderDash": [4, 4] } }))
                }
            }
        });

        let max_jam = table
            .rows()
            .iter()
            .map(|s| s.queue_length)
            .fold(0.0_f64, f64::max);

        let page = ChartPage {
            title: "Queue Analysis",
            subtitle: format!("{} road segments", series.len()),
            timestamp: timestamp(),
            source: source.display().to_string(),
            stats: vec![
                StatCard {
                    label: "Samples",
                    value: table.len().to_string(),
                },
                StatCard {
                    label: "Longest Jam",
                    value: format!("{:.2} m", max_jam),
                },
            ],
            chart_title: "Queue Length over Time",
            chart_config: script_json(&config)?,
            plugins: vec![],
        };

        self.write_page("queue_length.html", &page)
    }

    /// Mean speed against halting vehicles on two y axes
    pub fn render_network_speed(&self, table: &Table<NetworkStep>, source: &Path) -> Result<PathBuf> {
        let series = MetricsCalculator::network_series(table);

        let config = json!({
            "type": "line",
            "data": {
                "datasets": [
                    {
                        "label": "Mean Speed (m/s)",
                        "data": series.mean_speed,
                        "yAxisID": "y",
                        "borderColor": "#3b82f6",
                        "backgroundColor": "#3b82f6",
                        "borderWidth": 2,
                        "pointRadius": 0
                    },
                    {
                        "label": "Halting Vehicles",
                        "data": series.halting,
                        "yAxisID": "y1",
                        "fill": "origin",
                        "borderColor": "rgba(239, 68, 68, 0.4)",
                        "backgroundColor": "rgba(239, 68, 68, 0.2)",
                        "borderWidth": 1,
                        "pointRadius": 0
                    }
                ]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "interaction": { "intersect": false, "mode": "index" },
                "scales": {
                    "x": merge(axis("Time (s)"), json!({ "type": "linear" })),
                    "y": merge(axis("Mean Speed (m/s)"), json!({
                        "position": "left",
                        "ticks": { "color": "#3b82f6" }
                    })),
                    "y1": merge(axis("Halting Vehicles"), json!({
                        "position": "right",
                        "beginAtZero": true,
                        "ticks": { "color": "#ef4444", "precision": 0 },
                        "grid": { "drawOnChartArea": false }
                    }))
                }
            }
        });

        let peak_halting = table.rows().iter().map(|s| s.halting).max().unwrap_or(0);

        let page = ChartPage {
            title: "Network Performance",
            subtitle: format!("{} simulation steps", table.len()),
            timestamp: timestamp(),
            source: source.display().to_string(),
            stats: vec![StatCard {
                label: "Peak Halting Vehicles",
                value: peak_halting.to_string(),
            }],
            chart_title: "Speed vs Congestion",
            chart_config: script_json(&config)?,
            plugins: vec![],
        };

        self.write_page("network_speed.html", &page)
    }

    fn write_page(&self, file_name: &str, page: &ChartPage) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

        let html = self
            .env
            .get_template("chart.html")?
            .render(page)
            .context("Failed to render chart page")?;

        let path = self.output_dir.join(file_name);
        fs::write(&path, html).context("Failed to write report file")?;

        info!("Report generated: {}", path.display());
        Ok(path)
    }
}

fn axis(title: &str) -> Value {
    json!({
        "title": {
            "display": true,
            "text": title,
            "font": { "size": 13, "weight": "600" },
            "padding": 10
        }
    })
}

/// Shallow merge of two JSON objects, `extra` wins
fn merge(mut base: Value, extra: Value) -> Value {
    if let (Some(base), Value::Object(extra)) = (base.as_object_mut(), extra) {
        base.extend(extra);
    }
    base
}

/// JSON safe to embed inside a `<script>` element
fn script_json(value: &Value) -> Result<String> {
    let json = serde_json::to_string(value).context("Failed to serialize chart config")?;
    Ok(json.replace("</", "<\\/"))
}

fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
