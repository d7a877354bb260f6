use crate::config::{CliOverrides, Config, SourceKind};
use crate::error::Result;
use crate::source::LeadFilters;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "gmbleads")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Export B2B contacts whose Google Business Profile lists no website")]
#[command(
    long_about = "GmbLeads pages through a B2B contact provider, keeps the contacts whose \
                  Google Business Profile has no website, and writes them to a CSV file."
)]
#[command(after_help = "EXAMPLES:\n  \
    gmbleads --industry Software --country USA\n  \
    gmbleads --interactive\n  \
    gmbleads --source http --api-url https://api.example-b2b-provider.com/v1/contacts --max-pages 10\n  \
    gmbleads --seed 42 --delay-ms 0 --output-dir leads")]
pub struct Cli {
    /// Industry to filter by (blank for any)
    #[arg(short, long)]
    pub industry: Option<String>,

    /// Country to filter by (blank for any)
    #[arg(short, long)]
    pub country: Option<String>,

    /// Prompt for industry and country on the terminal
    #[arg(long, conflicts_with_all = ["industry", "country"])]
    pub interactive: bool,

    /// Contact source to use
    #[arg(long, value_enum)]
    pub source: Option<SourceArg>,

    /// Provider endpoint for the http source
    #[arg(long, value_parser = validate_api_url)]
    pub api_url: Option<String>,

    /// Provider API key
    #[arg(long, env = "GMBLEADS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Seed for the mock source (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fixed simulated latency of the mock source (milliseconds)
    #[arg(long)]
    pub mock_latency_ms: Option<u64>,

    /// Contacts requested per page
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_limit: Option<u32>,

    /// Maximum number of pages to request
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: Option<u32>,

    /// Fixed delay between page requests (milliseconds)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Directory for the CSV file
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Number of leads shown in the console preview
    #[arg(long)]
    pub preview_rows: Option<usize>,

    /// Configuration file path
    #[arg(long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show the resolved plan without contacting the provider
    #[arg(long)]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SourceArg {
    /// Seeded fixture generator
    Mock,
    /// REST provider
    Http,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Mock => SourceKind::Mock,
            SourceArg::Http => SourceKind::Http,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_source_kind(self.source.map(SourceKind::from))
            .with_api_url(self.api_url.clone())
            .with_api_key(self.api_key.clone())
            .with_seed(self.seed)
            .with_mock_latency(self.mock_latency_ms)
            .with_page_limit(self.page_limit)
            .with_max_pages(self.max_pages)
            .with_delay(self.delay_ms)
            .with_output_dir(self.output_dir.clone())
            .with_preview_rows(self.preview_rows)
    }

    pub fn lead_filters(&self) -> LeadFilters {
        LeadFilters::new(self.industry.as_deref(), self.country.as_deref())
    }

    pub fn output_mode(&self) -> OutputMode {
        match self.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

/// Ask for industry and country, one line each. Blank answers mean "any".
pub fn prompt_filters<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<LeadFilters> {
    write!(
        output,
        "Enter industry to filter by (e.g., 'Software', 'Healthcare', leave blank for any): "
    )?;
    output.flush()?;
    let mut industry = String::new();
    input.read_line(&mut industry)?;

    write!(
        output,
        "Enter country to filter by (e.g., 'USA', 'UK', 'Australia', leave blank for any): "
    )?;
    output.flush()?;
    let mut country = String::new();
    input.read_line(&mut country)?;

    Ok(LeadFilters::new(Some(&industry), Some(&country)))
}

pub fn validate_api_url(s: &str) -> std::result::Result<String, String> {
    let url =
        Url::parse(s).map_err(|_| "Invalid URL format. Please provide a valid URL.".to_string())?;

    match url.scheme() {
        "https" | "http" => {}
        _ => return Err("Only http and https provider endpoints are supported".to_string()),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err("URL must include a valid hostname".to_string()),
    }

    Ok(s.to_string())
}
