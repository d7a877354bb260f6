use crate::error::{LeadsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.example-b2b-provider.com/v1/contacts";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Mock,
    Http,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub api_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub mock_latency_min_ms: u64,
    pub mock_latency_max_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub page_limit: u32,
    pub max_pages: u32,
    pub request_delay_min_ms: u64,
    pub request_delay_max_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub base_directory: PathBuf,
    pub preview_rows: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Mock,
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            timeout_secs: 30,
            seed: None,
            mock_latency_min_ms: 1000,
            mock_latency_max_ms: 1500,
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_limit: 50,
            max_pages: 5,
            request_delay_min_ms: 500,
            request_delay_max_ms: 2000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_directory: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            preview_rows: 10,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LeadsError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| LeadsError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| LeadsError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["gmbleads.toml", ".gmbleads.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(kind) = cli_args.source_kind {
            self.source.kind = kind;
        }

        if let Some(ref api_url) = cli_args.api_url {
            self.source.api_url = api_url.clone();
        }

        if let Some(ref api_key) = cli_args.api_key {
            self.source.api_key = api_key.clone();
        }

        if let Some(seed) = cli_args.seed {
            self.source.seed = Some(seed);
        }

        if let Some(latency) = cli_args.mock_latency_ms {
            self.source.mock_latency_min_ms = latency;
            self.source.mock_latency_max_ms = latency;
        }

        if let Some(page_limit) = cli_args.page_limit {
            self.pagination.page_limit = page_limit;
        }

        if let Some(max_pages) = cli_args.max_pages {
            self.pagination.max_pages = max_pages;
        }

        if let Some(delay) = cli_args.delay_ms {
            self.pagination.request_delay_min_ms = delay;
            self.pagination.request_delay_max_ms = delay;
        }

        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.base_directory = output_dir.clone();
        }

        if let Some(preview_rows) = cli_args.preview_rows {
            self.output.preview_rows = preview_rows;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.pagination.page_limit == 0 {
            return Err(LeadsError::Config {
                message: "Page limit must be greater than 0".to_string(),
            });
        }

        if self.pagination.max_pages == 0 {
            return Err(LeadsError::Config {
                message: "Maximum page count must be greater than 0".to_string(),
            });
        }

        if self.pagination.request_delay_min_ms > self.pagination.request_delay_max_ms {
            return Err(LeadsError::Config {
                message: format!(
                    "Request delay minimum ({} ms) exceeds maximum ({} ms)",
                    self.pagination.request_delay_min_ms, self.pagination.request_delay_max_ms
                ),
            });
        }

        if self.source.mock_latency_min_ms > self.source.mock_latency_max_ms {
            return Err(LeadsError::Config {
                message: format!(
                    "Mock latency minimum ({} ms) exceeds maximum ({} ms)",
                    self.source.mock_latency_min_ms, self.source.mock_latency_max_ms
                ),
            });
        }

        if self.source.timeout_secs == 0 {
            return Err(LeadsError::Config {
                message: "Provider timeout must be greater than 0".to_string(),
            });
        }

        if self.source.kind == SourceKind::Http {
            let url = Url::parse(&self.source.api_url).map_err(|_| LeadsError::InvalidUrl {
                url: self.source.api_url.clone(),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(LeadsError::InvalidUrl {
                    url: self.source.api_url.clone(),
                });
            }

            if self.source.api_key.trim().is_empty() {
                return Err(LeadsError::Config {
                    message: "An API key is required for the http source".to_string(),
                });
            }
        }

        if let Some(parent) = self.output.base_directory.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(LeadsError::Config {
                    message: format!("Parent directory does not exist: {}", parent.display()),
                });
            }
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub source_kind: Option<SourceKind>,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub seed: Option<u64>,
    pub mock_latency_ms: Option<u64>,
    pub page_limit: Option<u32>,
    pub max_pages: Option<u32>,
    pub delay_ms: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub preview_rows: Option<usize>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_kind(mut self, kind: Option<SourceKind>) -> Self {
        self.source_kind = kind;
        self
    }

    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        self.api_url = api_url;
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_mock_latency(mut self, latency_ms: Option<u64>) -> Self {
        self.mock_latency_ms = latency_ms;
        self
    }

    pub fn with_page_limit(mut self, page_limit: Option<u32>) -> Self {
        self.page_limit = page_limit;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_delay(mut self, delay_ms: Option<u64>) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_preview_rows(mut self, rows: Option<usize>) -> Self {
        self.preview_rows = rows;
        self
    }
}
