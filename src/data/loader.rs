use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use serde::Deserialize;

use super::model::{Indicator, Row, Table};
use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the happiness table from a semicolon-delimited file.
///
/// Layout: one header row, then one row per (country, year). `Country` and
/// `Year` are required; `Region` and the seven indicator columns are optional.
/// Blank or non-numeric indicator cells load as missing values, and so do the
/// trailing cells of a short record. A record longer than the header is an
/// error.
pub fn load_table(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            DataError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DataError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    read_table(file, path)
}

/// Parse a table from any reader. `origin` is only used in error messages.
pub fn read_table<R: io::Read>(input: R, origin: &Path) -> Result<Table> {
    let csv_err = |source: csv::Error| DataError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers: csv::StringRecord = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(clean_header)
        .collect();

    for required in ["Country", "Year"] {
        if !headers.iter().any(|h| h == required) {
            return Err(DataError::MissingColumn {
                column: required.to_string(),
            });
        }
    }
    let has_region = headers.iter().any(|h| h == "Region");
    let indicators: BTreeSet<Indicator> = Indicator::ALL
        .into_iter()
        .filter(|ind| headers.iter().any(|h| h == ind.column()))
        .collect();

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        if record.len() > headers.len() {
            return Err(DataError::TooManyFields {
                path: origin.to_path_buf(),
                line: record.position().map_or(line as u64 + 2, |p| p.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        let raw: RawRow = record.deserialize(Some(&headers)).map_err(csv_err)?;
        match raw.into_row() {
            Some(row) => rows.push(row),
            None => {
                dropped += 1;
                log::warn!(
                    "Dropping record {} of {}: empty Country or Year",
                    line + 1,
                    origin.display()
                );
            }
        }
    }

    if dropped > 0 {
        log::warn!("{dropped} record(s) without Country/Year were skipped");
    }

    Ok(Table::new(rows, indicators, has_region))
}

/// Header names are trimmed and stripped of a byte-order marker.
fn clean_header(raw: &str) -> String {
    raw.trim().replace('\u{feff}', "").trim().to_string()
}

// ---------------------------------------------------------------------------
// Record shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Country", default)]
    country: Option<String>,
    #[serde(rename = "Region", default)]
    region: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "Happiness Score", default, deserialize_with = "csv::invalid_option")]
    happiness: Option<f64>,
    #[serde(rename = "Economy (GDP per Capita)", default, deserialize_with = "csv::invalid_option")]
    economy: Option<f64>,
    #[serde(rename = "Family", default, deserialize_with = "csv::invalid_option")]
    family: Option<f64>,
    #[serde(rename = "Health (Life Expectancy)", default, deserialize_with = "csv::invalid_option")]
    health: Option<f64>,
    #[serde(rename = "Freedom", default, deserialize_with = "csv::invalid_option")]
    freedom: Option<f64>,
    #[serde(rename = "Trust (Government Corruption)", default, deserialize_with = "csv::invalid_option")]
    trust: Option<f64>,
    #[serde(rename = "Generosity", default, deserialize_with = "csv::invalid_option")]
    generosity: Option<f64>,
}

impl RawRow {
    fn into_row(self) -> Option<Row> {
        let country = self.country.filter(|c| !c.is_empty())?;
        let year = self.year.filter(|y| !y.is_empty())?;
        Some(Row {
            country,
            region: self.region.filter(|r| !r.is_empty()),
            year,
            values: [
                self.happiness,
                self.economy,
                self.family,
                self.health,
                self.freedom,
                self.trust,
                self.generosity,
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Country;Region;Year;Happiness Score;Economy (GDP per Capita);Family;\
Health (Life Expectancy);Freedom;Trust (Government Corruption);Generosity";

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    fn parse(content: &str) -> Result<Table> {
        read_table(content.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn test_load_three_row_sample() {
        let file = create_temp_csv(&format!(
            "{HEADER}\n\
             France;Western Europe;2015;6.575;1.27;1.26;0.91;0.55;0.20;0.12\n\
             Germany;Western Europe;2015;6.750;1.32;1.28;0.89;0.61;0.21;0.28\n\
             Japan;Eastern Asia;2015;5.987;1.27;1.25;0.99;0.49;0.18;0.10\n"
        ));
        let table = load_table(file.path()).unwrap();

        assert_eq!(table.len(), 3);
        assert!(table.has_region);
        assert_eq!(table.indicators.len(), 7);
        assert_eq!(table.rows[1].country, "Germany");
        assert_eq!(table.rows[1].value(Indicator::Happiness), Some(6.750));
        assert_eq!(table.rows[2].value(Indicator::Generosity), Some(0.10));
    }

    #[test]
    fn test_loaded_sample_filters_by_region() {
        use crate::data::filter::{filter_rows, Choice, FilterQuery};

        let table = parse(&format!(
            "{HEADER}\n\
             France;Western Europe;2015;6.575;1.27;1.26;0.91;0.55;0.20;0.12\n\
             Germany;Western Europe;2015;6.750;1.32;1.28;0.89;0.61;0.21;0.28\n\
             Japan;Eastern Asia;2015;5.987;1.27;1.25;0.99;0.49;0.18;0.10\n"
        ))
        .unwrap();
        let query = FilterQuery {
            region: Choice::Exact("Western Europe".into()),
            ..Default::default()
        };

        let countries: Vec<_> = filter_rows(&table, &query)
            .rows(&table)
            .map(|r| r.country.clone())
            .collect();
        assert_eq!(countries, ["France", "Germany"]);
    }

    #[test]
    fn test_header_bom_and_whitespace_are_removed() {
        let table = parse("\u{feff}Country ; Year ;  Happiness Score \nChad;2016;3.76\n").unwrap();

        assert!(table.has_indicator(Indicator::Happiness));
        assert_eq!(table.rows[0].country, "Chad");
        assert_eq!(table.rows[0].year, "2016");
        assert_eq!(table.rows[0].value(Indicator::Happiness), Some(3.76));
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let table = parse("Country;Year;Freedom\nPeru;2017;0.45\n").unwrap();

        assert!(!table.has_region);
        assert!(table.regions().is_empty());
        assert_eq!(table.rows[0].region, None);
        assert_eq!(table.indicators.len(), 1);
        assert_eq!(table.rows[0].value(Indicator::Freedom), Some(0.45));
        assert_eq!(table.rows[0].value(Indicator::Happiness), None);
    }

    #[test]
    fn test_blank_and_invalid_numbers_load_as_missing() {
        let table = parse("Country;Year;Happiness Score;Family\nMali;2015;;n/a\n").unwrap();

        assert_eq!(table.rows[0].value(Indicator::Happiness), None);
        assert_eq!(table.rows[0].value(Indicator::Family), None);
    }

    #[test]
    fn test_rows_without_country_or_year_are_dropped() {
        let table = parse("Country;Year\n;2015\nIran;\nIraq;2015\n").unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].country, "Iraq");
    }

    #[test]
    fn test_missing_required_column() {
        let result = parse("Country;Region\nFrance;Western Europe\n");

        assert!(matches!(
            result,
            Err(DataError::MissingColumn { ref column }) if column == "Year"
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_table(Path::new("/definitely/not/here.csv"));

        assert!(matches!(result, Err(DataError::FileNotFound { .. })));
    }

    #[test]
    fn test_short_records_fill_missing_cells() {
        let table = parse(
            "Country;Region;Year;Happiness Score;Generosity\n\
             France;Western Europe;2015;6.5;0.1\n\
             Japan;Eastern Asia;2015;5.9\n\
             Germany;Western Europe;2015;6.7;0.2\n",
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[1].country, "Japan");
        assert_eq!(table.rows[1].value(Indicator::Happiness), Some(5.9));
        assert_eq!(table.rows[1].value(Indicator::Generosity), None);
        assert_eq!(table.rows[2].value(Indicator::Generosity), Some(0.2));
    }

    #[test]
    fn test_record_cut_before_year_is_dropped() {
        let table = parse("Country;Region;Year\nChile\nPeru;Latin America;2016\n").unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].country, "Peru");
    }

    #[test]
    fn test_record_longer_than_header_is_rejected() {
        let result = parse("Country;Year\nFrance;2015\nSpain;2015;extra\n");

        assert!(matches!(
            result,
            Err(DataError::TooManyFields { line: 3, expected: 2, found: 3, .. })
        ));
    }
}
