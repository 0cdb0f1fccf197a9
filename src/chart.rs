use std::collections::{BTreeMap, BTreeSet};

use crate::data::model::{Indicator, Row, Table};

// ---------------------------------------------------------------------------
// Chart modes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartMode {
    /// Correlation between two indicators for one year.
    #[default]
    Scatter,
    /// One indicator compared across countries for one year.
    Bar,
    /// One indicator over every year, one curve per country.
    Curves,
}

impl ChartMode {
    pub const ALL: [ChartMode; 3] = [ChartMode::Scatter, ChartMode::Bar, ChartMode::Curves];

    pub fn label(self) -> &'static str {
        match self {
            ChartMode::Scatter => "Scatter (correlation)",
            ChartMode::Bar => "Bar chart (comparison)",
            ChartMode::Curves => "Curves (over time)",
        }
    }

    pub fn uses_y_axis(self) -> bool {
        self == ChartMode::Scatter
    }

    pub fn uses_year(self) -> bool {
        self != ChartMode::Curves
    }
}

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub country: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub country: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub country: String,
    /// `(year, value)` ordered by year.
    pub points: Vec<(f64, f64)>,
}

/// Drawable series for one chart mode.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Scatter {
        x: Indicator,
        y: Indicator,
        points: Vec<ScatterPoint>,
    },
    Bar {
        indicator: Indicator,
        bars: Vec<Bar>,
    },
    Curves {
        indicator: Indicator,
        curves: Vec<Curve>,
    },
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::Scatter { points, .. } => points.is_empty(),
            ChartData::Bar { bars, .. } => bars.is_empty(),
            ChartData::Curves { curves, .. } => curves.is_empty(),
        }
    }
}

/// Comparison view inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest<'a> {
    pub mode: ChartMode,
    pub year: Option<&'a str>,
    pub x: Indicator,
    pub y: Indicator,
    pub countries: &'a BTreeSet<String>,
}

/// Rows of the comparison view: chosen countries, and the chosen year unless
/// the mode spans all years. No country selected means no rows.
pub fn comparison_rows<'a>(table: &'a Table, req: &ChartRequest<'_>) -> Vec<&'a Row> {
    if req.countries.is_empty() {
        return Vec::new();
    }
    table
        .rows
        .iter()
        .filter(|row| req.countries.contains(&row.country))
        .filter(|row| !req.mode.uses_year() || req.year.is_some_and(|y| y == row.year))
        .collect()
}

/// Build the series for `req.mode`. Rows lacking a needed value are skipped.
pub fn build_chart(table: &Table, req: &ChartRequest<'_>) -> ChartData {
    let rows = comparison_rows(table, req);
    match req.mode {
        ChartMode::Scatter => ChartData::Scatter {
            x: req.x,
            y: req.y,
            points: scatter_points(&rows, req.x, req.y),
        },
        ChartMode::Bar => ChartData::Bar {
            indicator: req.x,
            bars: bars(&rows, req.x),
        },
        ChartMode::Curves => ChartData::Curves {
            indicator: req.x,
            curves: curves(&rows, req.x),
        },
    }
}

fn scatter_points(rows: &[&Row], x: Indicator, y: Indicator) -> Vec<ScatterPoint> {
    rows.iter()
        .filter_map(|row| {
            Some(ScatterPoint {
                country: row.country.clone(),
                x: row.value(x)?,
                y: row.value(y)?,
            })
        })
        .collect()
}

/// Bars in descending order of value.
fn bars(rows: &[&Row], indicator: Indicator) -> Vec<Bar> {
    let mut bars: Vec<Bar> = rows
        .iter()
        .filter_map(|row| {
            Some(Bar {
                country: row.country.clone(),
                value: row.value(indicator)?,
            })
        })
        .collect();
    bars.sort_by(|a, b| b.value.total_cmp(&a.value));
    bars
}

fn curves(rows: &[&Row], indicator: Indicator) -> Vec<Curve> {
    let mut by_country: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
    for row in rows {
        let (Some(year), Some(value)) = (parse_year(&row.year), row.value(indicator)) else {
            continue;
        };
        by_country.entry(row.country.as_str()).or_default().push((year, value));
    }
    by_country
        .into_iter()
        .map(|(country, mut points)| {
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            Curve {
                country: country.to_string(),
                points,
            }
        })
        .collect()
}

/// Years are stored as text; "2015" and "2015.0" both plot at 2015.
pub fn parse_year(year: &str) -> Option<f64> {
    year.trim().parse::<f64>().ok().filter(|y| y.is_finite())
}
