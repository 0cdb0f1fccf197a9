use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Indicator – one of the seven numeric columns
// ---------------------------------------------------------------------------

/// The seven well-being metrics tracked per country-year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Indicator {
    Happiness,
    Economy,
    Family,
    Health,
    Freedom,
    Trust,
    Generosity,
}

impl Indicator {
    pub const ALL: [Indicator; 7] = [
        Indicator::Happiness,
        Indicator::Economy,
        Indicator::Family,
        Indicator::Health,
        Indicator::Freedom,
        Indicator::Trust,
        Indicator::Generosity,
    ];

    /// Header name of the column in the source file.
    pub fn column(self) -> &'static str {
        match self {
            Indicator::Happiness => "Happiness Score",
            Indicator::Economy => "Economy (GDP per Capita)",
            Indicator::Family => "Family",
            Indicator::Health => "Health (Life Expectancy)",
            Indicator::Freedom => "Freedom",
            Indicator::Trust => "Trust (Government Corruption)",
            Indicator::Generosity => "Generosity",
        }
    }

    /// Short label for compact widgets.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::Happiness => "Happiness",
            Indicator::Economy => "Economy",
            Indicator::Family => "Family",
            Indicator::Health => "Health",
            Indicator::Freedom => "Freedom",
            Indicator::Trust => "Trust",
            Indicator::Generosity => "Generosity",
        }
    }

    /// Range offered by the map filter widgets, also the default bounds.
    pub fn default_range(self) -> (f64, f64) {
        match self {
            Indicator::Happiness => (0.0, 10.0),
            Indicator::Economy | Indicator::Family => (0.0, 2.0),
            _ => (0.0, 1.0),
        }
    }

    /// Position of this indicator in [`Indicator::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Row – one (country, year) observation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub country: String,
    pub region: Option<String>,
    /// Kept as text; years are compared and displayed verbatim.
    pub year: String,
    /// Indicator values indexed by [`Indicator::index`]. `None` for blank cells.
    pub values: [Option<f64>; 7],
}

impl Row {
    pub fn value(&self, indicator: Indicator) -> Option<f64> {
        self.values[indicator.index()]
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Immutable in-memory table with pre-computed distinct values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<Row>,
    /// Indicator columns found in the header.
    pub indicators: BTreeSet<Indicator>,
    /// Whether the header carried a Region column.
    pub has_region: bool,
    years: BTreeSet<String>,
    regions: BTreeSet<String>,
    countries: BTreeSet<String>,
}

impl Table {
    /// Build the distinct-value indices from the loaded rows.
    pub fn new(rows: Vec<Row>, indicators: BTreeSet<Indicator>, has_region: bool) -> Self {
        let mut years = BTreeSet::new();
        let mut regions = BTreeSet::new();
        let mut countries = BTreeSet::new();

        for row in &rows {
            years.insert(row.year.clone());
            countries.insert(row.country.clone());
            if let Some(region) = &row.region {
                regions.insert(region.clone());
            }
        }

        Table {
            rows,
            indicators,
            has_region,
            years,
            regions,
            countries,
        }
    }

    /// Table of the rows at `indices`, in the given order, with the same schema.
    pub fn subset(&self, indices: &[usize]) -> Table {
        let rows = indices.iter().map(|&i| self.rows[i].clone()).collect();
        Table::new(rows, self.indicators.clone(), self.has_region)
    }

    pub fn has_indicator(&self, indicator: Indicator) -> bool {
        self.indicators.contains(&indicator)
    }

    /// Distinct years, sorted ascending.
    pub fn years(&self) -> &BTreeSet<String> {
        &self.years
    }

    /// Distinct non-empty regions, sorted. Empty if the file has no Region column.
    pub fn regions(&self) -> &BTreeSet<String> {
        &self.regions
    }

    /// Distinct countries, sorted.
    pub fn countries(&self) -> &BTreeSet<String> {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn row(country: &str, region: &str, year: &str, happiness: f64) -> Row {
        Row {
            country: country.to_string(),
            region: Some(region.to_string()),
            year: year.to_string(),
            values: [
                Some(happiness),
                Some(1.0),
                Some(1.0),
                Some(0.5),
                Some(0.5),
                Some(0.2),
                Some(0.2),
            ],
        }
    }

    pub(crate) fn full_table(rows: Vec<Row>) -> Table {
        Table::new(rows, Indicator::ALL.into_iter().collect(), true)
    }

    #[test]
    fn distinct_values_are_sorted_and_deduplicated() {
        let table = full_table(vec![
            row("Japan", "Eastern Asia", "2016", 5.9),
            row("France", "Western Europe", "2015", 6.5),
            row("France", "Western Europe", "2016", 6.4),
        ]);

        assert_eq!(table.years().iter().collect::<Vec<_>>(), ["2015", "2016"]);
        assert_eq!(
            table.regions().iter().collect::<Vec<_>>(),
            ["Eastern Asia", "Western Europe"]
        );
        assert_eq!(table.countries().iter().collect::<Vec<_>>(), ["France", "Japan"]);
    }

    #[test]
    fn subset_keeps_order_and_schema() {
        let table = full_table(vec![
            row("France", "Western Europe", "2015", 6.5),
            row("Germany", "Western Europe", "2015", 6.7),
            row("Japan", "Eastern Asia", "2015", 5.9),
        ]);
        let sub = table.subset(&[2, 0]);

        assert_eq!(sub.rows[0].country, "Japan");
        assert_eq!(sub.rows[1].country, "France");
        assert!(sub.has_region);
        assert_eq!(sub.indicators.len(), 7);
        assert!(!sub.countries().contains("Germany"));
    }

    #[test]
    fn indicator_index_matches_all_order() {
        for (i, ind) in Indicator::ALL.iter().enumerate() {
            assert_eq!(ind.index(), i);
        }
    }
}
