use std::collections::BTreeSet;
use std::fmt;

use super::model::{Indicator, Row, Table};

// ---------------------------------------------------------------------------
// Filter predicates
// ---------------------------------------------------------------------------

/// A categorical filter: either the "all" sentinel or an exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Choice {
    #[default]
    All,
    Exact(String),
}

impl Choice {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Exact(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str("All"),
            Choice::Exact(v) => f.write_str(v),
        }
    }
}

/// Closed interval `[min, max]` on one indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Range { min, max }
    }

    /// NaN never lies inside a range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One closed range per indicator, indexed by [`Indicator::index`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds([Range; 7]);

impl Default for Bounds {
    /// The ranges offered by the filter widgets.
    fn default() -> Self {
        Bounds(Indicator::ALL.map(|ind| {
            let (min, max) = ind.default_range();
            Range::new(min, max)
        }))
    }
}

impl Bounds {
    /// Bounds admitting every finite value.
    pub fn unbounded() -> Self {
        Bounds([Range::new(f64::NEG_INFINITY, f64::INFINITY); 7])
    }

    pub fn get(&self, indicator: Indicator) -> Range {
        self.0[indicator.index()]
    }

    pub fn get_mut(&mut self, indicator: Indicator) -> &mut Range {
        &mut self.0[indicator.index()]
    }
}

/// Full argument set of the advanced filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterQuery {
    pub year: Choice,
    pub region: Choice,
    pub country: Choice,
    pub bounds: Bounds,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Indices of the matching rows, in table order, plus any columns that a
/// predicate referenced but the table lacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub indices: Vec<usize>,
    pub missing_columns: BTreeSet<String>,
}

impl FilterOutcome {
    pub fn rows<'a>(&'a self, table: &'a Table) -> impl Iterator<Item = &'a Row> + 'a {
        self.indices.iter().map(move |&i| &table.rows[i])
    }

    pub fn to_table(&self, table: &Table) -> Table {
        table.subset(&self.indices)
    }
}

// ---------------------------------------------------------------------------
// Advanced filter
// ---------------------------------------------------------------------------

/// Return the rows passing every predicate of `query`.
///
/// A row passes when:
/// * year, region and country each match their [`Choice`]
/// * every indicator value lies within its closed range; a missing value fails
///
/// Predicates on columns absent from the table are skipped and reported in
/// [`FilterOutcome::missing_columns`].
pub fn filter_rows(table: &Table, query: &FilterQuery) -> FilterOutcome {
    let mut missing_columns = BTreeSet::new();

    let region_active = !query.region.is_all() && table.has_region;
    if !query.region.is_all() && !table.has_region {
        missing_columns.insert("Region".to_string());
    }

    let ranges: Vec<(Indicator, Range)> = Indicator::ALL
        .into_iter()
        .filter(|&ind| {
            let present = table.has_indicator(ind);
            if !present {
                missing_columns.insert(ind.column().to_string());
            }
            present
        })
        .map(|ind| (ind, query.bounds.get(ind)))
        .collect();

    for col in &missing_columns {
        log::warn!("Column '{col}' is missing; its filter is skipped");
    }

    let indices = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            if !query.year.matches(&row.year) || !query.country.matches(&row.country) {
                return false;
            }
            if region_active && !query.region.matches(row.region.as_deref().unwrap_or("")) {
                return false;
            }
            ranges
                .iter()
                .all(|(ind, range)| row.value(*ind).is_some_and(|v| range.contains(v)))
        })
        .map(|(i, _)| i)
        .collect();

    FilterOutcome {
        indices,
        missing_columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{full_table, row};
    use proptest::prelude::*;

    fn sample() -> Table {
        full_table(vec![
            row("France", "Western Europe", "2015", 6.575),
            row("Germany", "Western Europe", "2015", 6.750),
            row("Japan", "Eastern Asia", "2015", 5.987),
            row("France", "Western Europe", "2016", 6.478),
        ])
    }

    fn countries(table: &Table, outcome: &FilterOutcome) -> Vec<String> {
        outcome.rows(table).map(|r| r.country.clone()).collect()
    }

    #[test]
    fn region_filter_returns_matching_countries() {
        let table = full_table(vec![
            row("France", "Western Europe", "2015", 6.575),
            row("Germany", "Western Europe", "2015", 6.750),
            row("Japan", "Eastern Asia", "2015", 5.987),
        ]);
        let query = FilterQuery {
            region: Choice::Exact("Western Europe".into()),
            ..Default::default()
        };

        let outcome = filter_rows(&table, &query);
        assert_eq!(countries(&table, &outcome), ["France", "Germany"]);
        assert!(outcome.missing_columns.is_empty());
    }

    #[test]
    fn exact_combination_matches_all_three() {
        let table = sample();
        let query = FilterQuery {
            year: Choice::Exact("2016".into()),
            region: Choice::Exact("Western Europe".into()),
            country: Choice::Exact("France".into()),
            bounds: Bounds::default(),
        };

        let outcome = filter_rows(&table, &query);
        assert_eq!(outcome.indices, [3]);
    }

    #[test]
    fn all_sentinels_keep_everything_in_order() {
        let table = sample();
        let outcome = filter_rows(&table, &FilterQuery::default());
        assert_eq!(outcome.indices, [0, 1, 2, 3]);
    }

    #[test]
    fn bounds_are_closed_intervals() {
        let table = sample();
        let mut query = FilterQuery::default();
        *query.bounds.get_mut(Indicator::Happiness) = Range::new(5.987, 6.575);

        let outcome = filter_rows(&table, &query);
        assert_eq!(countries(&table, &outcome), ["France", "Japan", "France"]);
    }

    #[test]
    fn missing_value_fails_the_range() {
        let mut rows = sample().rows;
        rows[1].values[Indicator::Trust.index()] = None;
        let table = full_table(rows);

        let outcome = filter_rows(&table, &FilterQuery::default());
        assert_eq!(outcome.indices, [0, 2, 3]);
    }

    #[test]
    fn missing_columns_are_reported_and_skipped() {
        let rows = sample()
            .rows
            .into_iter()
            .map(|mut r| {
                r.region = None;
                r
            })
            .collect();
        let table = Table::new(rows, [Indicator::Happiness].into_iter().collect(), false);
        let mut query = FilterQuery {
            region: Choice::Exact("Western Europe".into()),
            ..Default::default()
        };
        *query.bounds.get_mut(Indicator::Trust) = Range::new(5.0, 1.0);

        let outcome = filter_rows(&table, &query);
        assert_eq!(outcome.indices, [0, 1, 2, 3]);
        assert!(outcome.missing_columns.contains("Region"));
        assert!(outcome.missing_columns.contains("Trust (Government Corruption)"));
        assert!(!outcome.missing_columns.contains("Happiness Score"));
    }

    #[test]
    fn refiltering_is_idempotent() {
        let table = sample();
        let query = FilterQuery {
            year: Choice::Exact("2015".into()),
            ..Default::default()
        };
        let first = filter_rows(&table, &query);
        let second = filter_rows(&table, &query);
        assert_eq!(first, second);
        assert_eq!(first.to_table(&table), second.to_table(&table));
    }

    #[test]
    fn empty_table_yields_empty_outcome() {
        let outcome = filter_rows(&Table::default(), &FilterQuery::default());
        assert!(outcome.indices.is_empty());
    }

    proptest! {
        #[test]
        fn inverted_range_yields_nothing(
            which in 0usize..7,
            min in -10.0f64..10.0,
            gap in 0.001f64..5.0,
        ) {
            let table = sample();
            let mut query = FilterQuery { bounds: Bounds::unbounded(), ..Default::default() };
            *query.bounds.get_mut(Indicator::ALL[which]) = Range::new(min, min - gap);

            prop_assert!(filter_rows(&table, &query).indices.is_empty());
        }
    }
}
