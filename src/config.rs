use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "happiness_fixed.csv";
pub const DATA_ENV: &str = "HAPPINESS_DATA";
pub const ISO_TABLE_ENV: &str = "HAPPINESS_ISO_TABLE";

pub const WINDOW_SIZE: [f32; 2] = [1400.0, 900.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [800.0, 500.0];

/// Startup configuration, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    /// Optional replacement for the bundled ISO3 lookup table.
    pub iso_table_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let data_path = non_empty(DATA_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_path);
        let iso_table_path = non_empty(ISO_TABLE_ENV).map(PathBuf::from);

        AppConfig {
            data_path,
            iso_table_path,
        }
    }
}

/// `happiness_fixed.csv` beside the executable, else in the working directory.
fn default_data_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::parent)
        .map(|dir| dir.join(DEFAULT_DATA_FILE))
        .filter(|p| p.exists())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}
