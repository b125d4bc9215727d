//! Dataset source resolution and loading.
//!
//! Precedence: explicit `--file`, `--url`, `--demo`, then the `CMO_DATA_PATH`
//! and `CMO_DATA_URL` environment variables (a `.env` file is honored), then
//! the built-in default URL.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::data::sample::generate_history;
use crate::domain::{DEFAULT_DATA_URL, DashboardConfig, DataSource};
use crate::error::AppError;
use crate::io::{IngestedData, load_cmo_file, parse_cmo_str};

pub const ENV_DATA_PATH: &str = "CMO_DATA_PATH";
pub const ENV_DATA_URL: &str = "CMO_DATA_URL";

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Explicit source choices from the command line.
#[derive(Debug, Clone, Default)]
pub struct SourceArgs {
    pub file: Option<PathBuf>,
    pub url: Option<String>,
    pub demo_seed: Option<u64>,
}

/// Resolve the source from CLI choices and the process environment.
pub fn resolve_source(args: &SourceArgs) -> DataSource {
    dotenvy::dotenv().ok();
    let env_path = std::env::var(ENV_DATA_PATH).ok();
    let env_url = std::env::var(ENV_DATA_URL).ok();
    resolve_with_env(args, env_path, env_url)
}

fn resolve_with_env(
    args: &SourceArgs,
    env_path: Option<String>,
    env_url: Option<String>,
) -> DataSource {
    let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());

    if let Some(path) = &args.file {
        return DataSource::File(path.clone());
    }
    if let Some(url) = &args.url {
        return DataSource::Url(url.clone());
    }
    if let Some(seed) = args.demo_seed {
        return DataSource::Demo { seed };
    }
    if let Some(path) = non_empty(env_path) {
        return DataSource::File(PathBuf::from(path));
    }
    if let Some(url) = non_empty(env_url) {
        return DataSource::Url(url);
    }
    DataSource::Url(DEFAULT_DATA_URL.to_string())
}

/// Blocking HTTP client for the published CSV.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn fetch_text(&self, url: &str) -> Result<String, AppError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::runtime(format!("Request to {url} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::runtime(format!(
                "Request to {url} failed with status {}.",
                resp.status()
            )));
        }

        resp.text()
            .map_err(|e| AppError::runtime(format!("Failed to read response body from {url}: {e}")))
    }
}

/// Load and normalize the configured dataset.
pub fn load_dataset(config: &DashboardConfig) -> Result<IngestedData, AppError> {
    log::info!("loading data from {}", config.source);
    match &config.source {
        DataSource::File(path) => load_cmo_file(path, config),
        DataSource::Url(url) => {
            let body = HttpSource::new()?.fetch_text(url)?;
            parse_cmo_str(&body, config)
        }
        DataSource::Demo { seed } => generate_history(*seed, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_win_over_environment() {
        let args = SourceArgs {
            file: None,
            url: Some("https://example.org/cmo.csv".to_string()),
            demo_seed: Some(7),
        };
        let source = resolve_with_env(&args, Some("/tmp/x.csv".to_string()), None);
        assert_eq!(source, DataSource::Url("https://example.org/cmo.csv".to_string()));

        let args = SourceArgs {
            demo_seed: Some(7),
            ..SourceArgs::default()
        };
        assert_eq!(
            resolve_with_env(&args, Some("/tmp/x.csv".to_string()), None),
            DataSource::Demo { seed: 7 }
        );
    }

    #[test]
    fn environment_path_beats_environment_url() {
        let source = resolve_with_env(
            &SourceArgs::default(),
            Some("data/cmo.csv".to_string()),
            Some("https://example.org".to_string()),
        );
        assert_eq!(source, DataSource::File(PathBuf::from("data/cmo.csv")));
    }

    #[test]
    fn falls_back_to_default_url() {
        let source = resolve_with_env(&SourceArgs::default(), Some("  ".to_string()), None);
        assert_eq!(source, DataSource::Url(DEFAULT_DATA_URL.to_string()));
    }

    #[test]
    fn loads_a_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmo.csv");
        std::fs::write(&path, ",Gold\n,($/troy oz)\n2024M01,2000\n2024M02,2050\n").unwrap();

        let config = DashboardConfig {
            source: DataSource::File(path),
            ..DashboardConfig::default()
        };
        let data = load_dataset(&config).unwrap();
        assert_eq!(data.table.len(), 2);
        assert_eq!(data.units.get("Gold"), Some("$/toz"));
    }
}
