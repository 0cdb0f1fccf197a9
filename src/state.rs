use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::chart::{build_chart, ChartData, ChartMode, ChartRequest};
use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::cascade::countries_for_regions;
use crate::data::filter::{filter_rows, Bounds, Choice, FilterOutcome, FilterQuery};
use crate::data::iso::IsoLookup;
use crate::data::loader::load_table;
use crate::data::model::{Indicator, Table};
use crate::map::{build_map, MapData};

// ---------------------------------------------------------------------------
// Recompute gate
// ---------------------------------------------------------------------------

/// Collects change notifications so a burst of edits triggers one recompute.
#[derive(Debug, Clone, Default)]
pub struct RecomputeGate {
    dirty: bool,
    runs: u64,
}

impl RecomputeGate {
    fn dirty() -> Self {
        RecomputeGate { dirty: true, runs: 0 }
    }

    pub fn mark(&mut self) {
        self.dirty = true;
    }

    /// Consume the pending notification, counting one recompute.
    fn take(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty = false;
        self.runs += 1;
        true
    }

    /// Recomputes performed so far.
    pub fn runs(&self) -> u64 {
        self.runs
    }
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Overview,
    Comparison,
    Map,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::Comparison, Tab::Map];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Comparison => "Comparison",
            Tab::Map => "Map",
        }
    }
}

// ---------------------------------------------------------------------------
// Overview: plain filtered table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct OverviewState {
    pub query: FilterQuery,
    pub outcome: FilterOutcome,
    /// The matching rows, materialized for the overview table.
    pub rows: Table,
    pub gate: RecomputeGate,
}

impl OverviewState {
    pub fn new(table: &Table) -> Self {
        let mut state = OverviewState {
            query: FilterQuery {
                bounds: Bounds::unbounded(),
                ..Default::default()
            },
            outcome: FilterOutcome::default(),
            rows: Table::default(),
            gate: RecomputeGate::dirty(),
        };
        state.refresh(table);
        state
    }

    pub fn set_year(&mut self, year: Choice) {
        self.query.year = year;
        self.gate.mark();
    }

    pub fn set_region(&mut self, region: Choice) {
        self.query.region = region;
        self.gate.mark();
    }

    pub fn set_country(&mut self, country: Choice) {
        self.query.country = country;
        self.gate.mark();
    }

    pub fn refresh(&mut self, table: &Table) -> bool {
        if !self.gate.take() {
            return false;
        }
        self.outcome = filter_rows(table, &self.query);
        self.rows = self.outcome.to_table(table);
        log::debug!(
            "Overview refiltered: {} rows (run {})",
            self.rows.len(),
            self.gate.runs()
        );
        true
    }
}

// ---------------------------------------------------------------------------
// Comparison: region → country cascade driving a chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ComparisonState {
    pub mode: ChartMode,
    pub year: Option<String>,
    pub x: Indicator,
    pub y: Indicator,
    pub selected_regions: BTreeSet<String>,
    pub selected_countries: BTreeSet<String>,
    pub chart: ChartData,
    pub colors: ColorMap,
    pub gate: RecomputeGate,
}

impl ComparisonState {
    pub fn new(table: &Table) -> Self {
        let mut state = ComparisonState {
            mode: ChartMode::Scatter,
            year: table.years().iter().next().cloned(),
            x: Indicator::Happiness,
            y: Indicator::Economy,
            selected_regions: BTreeSet::new(),
            selected_countries: BTreeSet::new(),
            chart: ChartData::Scatter {
                x: Indicator::Happiness,
                y: Indicator::Economy,
                points: Vec::new(),
            },
            colors: ColorMap::new(table.countries()),
            gate: RecomputeGate::dirty(),
        };
        state.refresh(table);
        state
    }

    pub fn set_mode(&mut self, mode: ChartMode) {
        if self.mode != mode {
            self.mode = mode;
            self.gate.mark();
        }
    }

    pub fn set_year(&mut self, year: String) {
        self.year = Some(year);
        self.gate.mark();
    }

    pub fn set_x(&mut self, indicator: Indicator) {
        self.x = indicator;
        self.gate.mark();
    }

    pub fn set_y(&mut self, indicator: Indicator) {
        self.y = indicator;
        self.gate.mark();
    }

    pub fn toggle_country(&mut self, country: &str) {
        if !self.selected_countries.remove(country) {
            self.selected_countries.insert(country.to_string());
        }
        self.gate.mark();
    }

    /// Select every country directly, clearing the region list.
    pub fn select_all_countries(&mut self, table: &Table) {
        self.selected_regions.clear();
        self.selected_countries = table.countries().clone();
        self.gate.mark();
    }

    /// Clear both the region and the country selection.
    pub fn reset_selection(&mut self) {
        self.selected_regions.clear();
        self.selected_countries.clear();
        self.gate.mark();
    }

    /// Toggle a region and replace the country selection with the countries
    /// of the selected regions.
    pub fn toggle_region(&mut self, table: &Table, region: &str) {
        if !self.selected_regions.remove(region) {
            self.selected_regions.insert(region.to_string());
        }
        self.selected_countries = countries_for_regions(table, &self.selected_regions);
        self.gate.mark();
    }

    pub fn refresh(&mut self, table: &Table) -> bool {
        if !self.gate.take() {
            return false;
        }
        let req = ChartRequest {
            mode: self.mode,
            year: self.year.as_deref(),
            x: self.x,
            y: self.y,
            countries: &self.selected_countries,
        };
        self.chart = build_chart(table, &req);
        log::debug!(
            "Comparison chart rebuilt ({:?}, {} countries selected, run {})",
            self.mode,
            self.selected_countries.len(),
            self.gate.runs()
        );
        true
    }
}

// ---------------------------------------------------------------------------
// Map: advanced filter driving the choropleth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MapState {
    pub query: FilterQuery,
    pub outcome: FilterOutcome,
    pub data: MapData,
    pub gate: RecomputeGate,
}

impl MapState {
    pub fn new(table: &Table, iso: &IsoLookup) -> Self {
        let mut state = MapState {
            query: FilterQuery::default(),
            outcome: FilterOutcome::default(),
            data: MapData::default(),
            gate: RecomputeGate::dirty(),
        };
        state.refresh(table, iso);
        state
    }

    pub fn set_year(&mut self, year: Choice) {
        self.query.year = year;
        self.gate.mark();
    }

    pub fn set_region(&mut self, region: Choice) {
        self.query.region = region;
        self.gate.mark();
    }

    pub fn set_country(&mut self, country: Choice) {
        self.query.country = country;
        self.gate.mark();
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        if self.query.bounds != bounds {
            self.query.bounds = bounds;
            self.gate.mark();
        }
    }

    pub fn refresh(&mut self, table: &Table, iso: &IsoLookup) -> bool {
        if !self.gate.take() {
            return false;
        }
        self.outcome = filter_rows(table, &self.query);
        self.data = build_map(table, &self.outcome, iso, self.query.year.is_all());
        log::debug!(
            "Map rebuilt: {} rows, {} countries (run {})",
            self.outcome.indices.len(),
            self.data.country_count(),
            self.gate.runs()
        );
        true
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Owns the immutable table and the per-tab view state.
pub struct AppState {
    pub table: Table,
    pub iso: IsoLookup,
    /// File the current table was read from.
    pub source: Option<PathBuf>,
    pub tab: Tab,
    pub overview: OverviewState,
    pub comparison: ComparisonState,
    pub map: MapState,
    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn with_table(table: Table, iso: IsoLookup) -> Self {
        AppState {
            overview: OverviewState::new(&table),
            comparison: ComparisonState::new(&table),
            map: MapState::new(&table, &iso),
            table,
            iso,
            source: None,
            tab: Tab::default(),
            status_message: None,
        }
    }

    /// Startup: load the configured files, degrading to an empty table.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut iso_notice = None;
        let iso = match &config.iso_table_path {
            Some(path) => match IsoLookup::load(path) {
                Ok(lookup) if lookup.is_empty() => {
                    log::warn!("ISO table {} is empty, using the bundled table", path.display());
                    iso_notice = Some(format!("ISO table {} is empty, using the bundled table", path.display()));
                    IsoLookup::bundled()
                }
                Ok(lookup) => {
                    log::info!("Loaded {} ISO3 codes from {}", lookup.len(), path.display());
                    lookup
                }
                Err(e) => {
                    log::error!("Failed to load ISO table {}: {e}", path.display());
                    iso_notice = Some(format!("Could not load ISO table {}: {e}", path.display()));
                    IsoLookup::bundled()
                }
            },
            None => IsoLookup::bundled(),
        };

        let mut state = Self::with_table(Table::default(), iso);
        state.open(&config.data_path);
        if let Some(notice) = iso_notice {
            state.status_message = Some(match state.status_message.take() {
                Some(data_error) => format!("{data_error}; {notice}"),
                None => notice,
            });
        }
        state
    }

    /// Replace the table with the contents of `path`. On failure the current
    /// table is replaced by an empty one and the error is shown.
    pub fn open(&mut self, path: &Path) {
        match read(path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows ({} countries, {} years) from {}",
                    table.len(),
                    table.countries().len(),
                    table.years().len(),
                    path.display()
                );
                self.set_table(table);
                self.source = Some(path.to_path_buf());
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load data: {e:#}");
                self.set_table(Table::default());
                self.source = None;
                self.status_message = Some(format!("Could not load data: {e:#}"));
            }
        }
    }

    pub fn set_table(&mut self, table: Table) {
        self.overview = OverviewState::new(&table);
        self.comparison = ComparisonState::new(&table);
        self.map = MapState::new(&table, &self.iso);
        self.table = table;
    }

    /// Run the pending recomputes of every view, at most once each.
    pub fn refresh(&mut self) {
        self.overview.refresh(&self.table);
        self.comparison.refresh(&self.table);
        self.map.refresh(&self.table, &self.iso);
    }
}

fn read(path: &Path) -> Result<Table> {
    load_table(path).with_context(|| format!("reading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{full_table, row};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample() -> Table {
        full_table(vec![
            row("France", "Western Europe", "2015", 6.575),
            row("Germany", "Western Europe", "2015", 6.750),
            row("Japan", "Eastern Asia", "2015", 5.987),
            row("Canada", "North America", "2015", 7.427),
            row("France", "Western Europe", "2016", 6.478),
        ])
    }

    fn names(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn views_compute_once_on_creation() {
        let state = AppState::with_table(sample(), IsoLookup::bundled());
        assert_eq!(state.overview.gate.runs(), 1);
        assert_eq!(state.comparison.gate.runs(), 1);
        assert_eq!(state.map.gate.runs(), 1);
        assert_eq!(state.overview.outcome.indices.len(), 5);
        assert_eq!(state.overview.rows.len(), 5);
        assert!(state.comparison.chart.is_empty());
    }

    #[test]
    fn select_all_triggers_a_single_recompute() {
        let table = sample();
        let mut view = ComparisonState::new(&table);
        view.toggle_region(&table, "Eastern Asia");

        view.select_all_countries(&table);
        assert!(view.refresh(&table));
        assert!(!view.refresh(&table));

        assert_eq!(view.gate.runs(), 2);
        assert!(view.selected_regions.is_empty());
        assert_eq!(view.selected_countries.len(), 4);
    }

    #[test]
    fn region_cascade_replaces_country_selection() {
        let table = sample();
        let mut view = ComparisonState::new(&table);
        view.toggle_country(&table.rows[3].country);

        view.toggle_region(&table, "Western Europe");
        assert_eq!(names(&view.selected_countries), ["France", "Germany"]);

        view.toggle_region(&table, "Eastern Asia");
        assert_eq!(names(&view.selected_countries), ["France", "Germany", "Japan"]);

        view.toggle_region(&table, "Western Europe");
        view.toggle_region(&table, "Eastern Asia");
        assert!(view.selected_countries.is_empty());

        view.refresh(&table);
        assert_eq!(view.gate.runs(), 2);
    }

    #[test]
    fn reset_clears_both_lists() {
        let table = sample();
        let mut view = ComparisonState::new(&table);
        view.toggle_region(&table, "North America");
        view.reset_selection();
        view.refresh(&table);

        assert!(view.selected_regions.is_empty());
        assert!(view.selected_countries.is_empty());
        assert!(view.chart.is_empty());
    }

    #[test]
    fn comparison_chart_follows_selection() {
        let table = sample();
        let mut view = ComparisonState::new(&table);
        view.set_mode(ChartMode::Bar);
        view.toggle_region(&table, "Western Europe");
        view.refresh(&table);

        let ChartData::Bar { bars, .. } = &view.chart else {
            panic!("expected bar data");
        };
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].country, "Germany");
    }

    #[test]
    fn map_bounds_change_refilters_once() {
        let table = sample();
        let iso = IsoLookup::bundled();
        let mut view = MapState::new(&table, &iso);
        assert_eq!(view.data.country_count(), 4);

        let mut bounds = view.query.bounds;
        bounds.get_mut(Indicator::Happiness).min = 6.6;
        view.set_bounds(bounds);
        view.set_bounds(bounds);
        view.set_year(Choice::Exact("2015".into()));
        view.refresh(&table, &iso);

        assert_eq!(view.gate.runs(), 2);
        let countries: Vec<_> = view.outcome.rows(&table).map(|r| r.country.as_str()).collect();
        assert_eq!(countries, ["Germany", "Canada"]);
    }

    #[test]
    fn missing_file_degrades_to_empty_table() {
        let config = AppConfig {
            data_path: PathBuf::from("/no/such/happiness.csv"),
            iso_table_path: None,
        };
        let state = AppState::from_config(&config);

        assert!(state.table.is_empty());
        assert!(state.status_message.is_some());
        assert!(state.overview.outcome.indices.is_empty());
        assert!(state.map.data.entries.is_empty());
    }

    #[test]
    fn overview_rows_follow_the_filter() {
        let table = sample();
        let mut view = OverviewState::new(&table);
        view.set_region(Choice::Exact("Western Europe".into()));
        view.set_year(Choice::Exact("2015".into()));
        assert!(view.refresh(&table));

        let countries: Vec<_> = view.rows.rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, ["France", "Germany"]);
        assert_eq!(view.gate.runs(), 2);
    }

    #[test]
    fn unreadable_iso_table_is_reported_on_screen() {
        let mut data = NamedTempFile::new().unwrap();
        write!(data, "Country;Year;Happiness Score\nFrance;2015;6.5\n").unwrap();
        let mut iso = NamedTempFile::new().unwrap();
        write!(iso, "{{ not json").unwrap();

        let config = AppConfig {
            data_path: data.path().to_path_buf(),
            iso_table_path: Some(iso.path().to_path_buf()),
        };
        let state = AppState::from_config(&config);

        assert_eq!(state.table.len(), 1);
        assert_eq!(state.iso.resolve("France"), Some("FRA"));
        let message = state.status_message.expect("ISO failure should be shown");
        assert!(message.contains("ISO table"));
    }

    #[test]
    fn empty_iso_table_falls_back_to_bundled() {
        let mut iso = NamedTempFile::new().unwrap();
        write!(iso, "{{}}").unwrap();
        let config = AppConfig {
            data_path: PathBuf::from("/no/such/happiness.csv"),
            iso_table_path: Some(iso.path().to_path_buf()),
        };
        let state = AppState::from_config(&config);

        assert!(!state.iso.is_empty());
        assert!(state.status_message.unwrap().contains("is empty"));
    }

    #[test]
    fn iso_notice_is_kept_alongside_a_data_error() {
        let config = AppConfig {
            data_path: PathBuf::from("/no/such/happiness.csv"),
            iso_table_path: Some(PathBuf::from("/no/such/iso.json")),
        };
        let state = AppState::from_config(&config);

        let message = state.status_message.unwrap();
        assert!(message.contains("Could not load data"));
        assert!(message.contains("ISO table"));
    }

    #[test]
    fn open_replaces_table_and_resets_views() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "Country;Region;Year;Happiness Score\nFrance;Western Europe;2015;6.5\nJapan;Eastern Asia;2015;5.9\n"
        )
        .unwrap();

        let mut state = AppState::with_table(sample(), IsoLookup::bundled());
        state.comparison.toggle_region(&state.table, "Western Europe");
        state.open(file.path());

        assert_eq!(state.table.len(), 2);
        assert_eq!(state.source.as_deref(), Some(file.path()));
        assert!(state.comparison.selected_countries.is_empty());
        assert!(state.status_message.is_none());
    }
}
