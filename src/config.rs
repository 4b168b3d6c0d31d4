use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Configuration loaded from `config.toml`.
///
/// Search order:
/// 1. Path in the `SALES_PULSE_CONFIG` environment variable
/// 2. `config.toml` next to the executable
/// 3. Embedded default config (local sample database, no credentials)
///
/// The `DATABASE_URL` environment variable always overrides `source.url`,
/// so a deployable artifact never needs credentials baked in.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub segments: SegmentConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// DuckDB database path or URL.
    pub url: String,
    /// Fact table to read.
    #[serde(default = "default_table")]
    pub table: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// How long a loaded table snapshot stays fresh.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
}

/// Country synonym table; data, not logic, so it lives in config.
#[derive(Debug, Deserialize, Clone)]
pub struct NormalizeConfig {
    #[serde(default = "default_countries")]
    pub countries: BTreeMap<String, String>,
}

/// Customer segment labels in ascending revenue order. The bin count of the
/// segmentation is the number of labels.
#[derive(Debug, Deserialize, Clone)]
pub struct SegmentConfig {
    #[serde(default = "default_segment_labels")]
    pub labels: Vec<String>,
}

fn default_table() -> String {
    "dashboard_data".to_string()
}

fn default_ttl() -> u64 {
    3600
}

fn default_countries() -> BTreeMap<String, String> {
    [
        ("US", "UNITED STATES"),
        ("USA", "UNITED STATES"),
        ("UNITED STATES", "UNITED STATES"),
        ("DE", "GERMANY"),
        ("GERMENY", "GERMANY"),
        ("GERMANY", "GERMANY"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_segment_labels() -> Vec<String> {
    ["Bronze", "Silver", "Gold", "Platinum", "Diamond"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            ttl_seconds: default_ttl(),
        }
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        NormalizeConfig {
            countries: default_countries(),
        }
    }
}

impl Default for SegmentConfig {
    fn default() -> Self {
        SegmentConfig {
            labels: default_segment_labels(),
        }
    }
}

/// Default configuration embedded in the binary.
const DEFAULT_CONFIG: &str = r#"
[source]
url = "sales.duckdb"
table = "dashboard_data"
"#;

/// Load configuration, then apply environment overrides.
pub fn load_config() -> Result<AppConfig> {
    let mut config = match config_path() {
        Some(path) => {
            log::info!("Loading config from: {}", path.display());
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?
        }
        None => {
            log::info!("Using default embedded configuration");
            toml::from_str(DEFAULT_CONFIG).context("parsing embedded default config")?
        }
    };

    if let Ok(url) = std::env::var("DATABASE_URL") {
        config = with_source_url(config, url);
    }
    if config.segments.labels.is_empty() {
        config.segments = SegmentConfig::default();
    }
    Ok(config)
}

fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("SALES_PULSE_CONFIG") {
        return Some(PathBuf::from(path));
    }
    let exe = std::env::current_exe().ok()?;
    let candidate = exe.parent()?.join("config.toml");
    candidate.exists().then_some(candidate)
}

fn with_source_url(mut config: AppConfig, url: String) -> AppConfig {
    log::info!("DATABASE_URL override in effect");
    config.source.url = url;
    config
}
