use std::collections::BTreeMap;

use eframe::egui::Color32;

use crate::color::ContinuousScale;
use crate::data::filter::FilterOutcome;
use crate::data::iso::IsoLookup;
use crate::data::model::{Indicator, Table};

/// One coloured country on the choropleth.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub iso3: String,
    pub country: String,
    pub region: Option<String>,
    pub score: f64,
    pub color: Color32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapData {
    pub entries: Vec<MapEntry>,
    pub scale: Option<ContinuousScale>,
    /// Countries that matched the filter but have no ISO3 code.
    pub unresolved: Vec<String>,
}

impl MapData {
    /// Number of distinct countries drawn.
    pub fn country_count(&self) -> usize {
        let mut names: Vec<&str> = self.entries.iter().map(|e| e.country.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }
}

/// Turn the filtered rows into map entries coloured by happiness score.
///
/// Rows whose country does not resolve to ISO3, or that have no score, are
/// left out. With `average_years` the score is averaged per
/// (iso3, country, region); otherwise each row is one entry.
pub fn build_map(
    table: &Table,
    outcome: &FilterOutcome,
    lookup: &IsoLookup,
    average_years: bool,
) -> MapData {
    let mut unresolved: Vec<String> = Vec::new();
    let mut resolved = Vec::new();

    for row in outcome.rows(table) {
        let Some(iso3) = lookup.resolve(&row.country) else {
            if !unresolved.contains(&row.country) {
                unresolved.push(row.country.clone());
            }
            continue;
        };
        let Some(score) = row.value(Indicator::Happiness) else {
            continue;
        };
        resolved.push((iso3.to_string(), row.country.clone(), row.region.clone(), score));
    }

    if !unresolved.is_empty() {
        log::debug!("{} countries without ISO3 code left off the map", unresolved.len());
    }

    let grouped: Vec<(String, String, Option<String>, f64)> = if average_years {
        let mut sums: BTreeMap<(String, String, Option<String>), (f64, usize)> = BTreeMap::new();
        for (iso3, country, region, score) in resolved {
            let slot = sums.entry((iso3, country, region)).or_insert((0.0, 0));
            slot.0 += score;
            slot.1 += 1;
        }
        sums.into_iter()
            .map(|((iso3, country, region), (sum, n))| (iso3, country, region, sum / n as f64))
            .collect()
    } else {
        resolved
    };

    let scale = ContinuousScale::spanning(grouped.iter().map(|g| g.3));
    let entries = grouped
        .into_iter()
        .map(|(iso3, country, region, score)| MapEntry {
            color: scale.map_or(Color32::GRAY, |s| s.color_for(score)),
            iso3,
            country,
            region,
            score,
        })
        .collect();

    MapData {
        entries,
        scale,
        unresolved,
    }
}
