use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{DataError, Result};

/// Lookup table bundled into the binary.
const BUNDLED_TABLE: &str = include_str!("../../assets/country_iso3.json");

// ---------------------------------------------------------------------------
// Country name → ISO 3166-1 alpha-3
// ---------------------------------------------------------------------------

/// Exact-match country-name → ISO3 lookup.
///
/// The table is a JSON object `{ "France": "FRA", ... }`. Names are compared
/// after trimming; there is no fuzzy matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IsoLookup {
    codes: BTreeMap<String, String>,
}

impl IsoLookup {
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: BTreeMap<String, String> = serde_json::from_str(text)?;
        let codes = raw
            .into_iter()
            .map(|(name, code)| (name.trim().to_string(), code.trim().to_ascii_uppercase()))
            .filter(|(name, code)| !name.is_empty() && !code.is_empty())
            .collect();
        Ok(IsoLookup { codes })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DataError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&text)
    }

    /// The table shipped with the application.
    pub fn bundled() -> Self {
        match Self::from_json(BUNDLED_TABLE) {
            Ok(lookup) => lookup,
            Err(e) => {
                log::error!("Bundled ISO table is invalid: {e}");
                IsoLookup::default()
            }
        }
    }

    pub fn resolve(&self, country: &str) -> Option<&str> {
        self.codes.get(country.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
