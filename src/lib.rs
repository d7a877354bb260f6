pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod source;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat, SourceArg};
pub use config::{CliOverrides, Config, OutputConfig, PaginationConfig, SourceConfig, SourceKind};
pub use error::{LeadsError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    filter_leads, lacks_gmb_website, output_filename, ExtractionOutcome, LeadExtractor,
    OutputManager, PageEvent, RunReport, StopReason,
};
pub use source::{
    build_source, ContactRecord, ContactSource, FieldValue, HttpContactSource, LeadFilters,
    MockContactSource, TransportError,
};
pub use ui::{OutputFormatter, OutputMode, ProgressAwareOutput, ProgressManager};

use std::path::Path;

/// Fetch, filter, export and preview in one call.
pub struct LeadsPipeline {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl LeadsPipeline {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        // Bars would interleave with machine-readable lines.
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        Ok(Self::new(
            config,
            cli_args.output_mode(),
            cli_args.verbose,
            cli_args.quiet,
        ))
    }

    /// Run against the configured source.
    pub async fn run(&self, filters: &LeadFilters) -> Result<RunReport> {
        let source = build_source(&self.config.source)?;
        self.run_with_source(source.as_ref(), filters).await
    }

    /// Provider failures end pagination early and never surface as errors here;
    /// only output problems do.
    pub async fn run_with_source(
        &self,
        source: &dyn ContactSource,
        filters: &LeadFilters,
    ) -> Result<RunReport> {
        self.output_formatter.start_operation(&format!(
            "Extracting contacts (industry: {}, country: {})",
            filters.industry_label(),
            filters.country_label()
        ));
        tracing::info!(
            source = source.name(),
            industry = filters.industry_label(),
            country = filters.country_label(),
            "Starting lead extraction"
        );

        let extractor = LeadExtractor::from_config(&self.config.pagination);
        let page_progress = self.progress_manager.create_page_progress(extractor.max_pages());
        let output = ProgressAwareOutput::new(&self.output_formatter, Some(&self.progress_manager));

        let observer = |event: &PageEvent| {
            ui::progress::update_page_progress(&page_progress, event);
            output.page_event(event);
        };

        let outcome = extractor.extract(source, filters, Some(&observer)).await;

        ui::progress::finish_progress_with_summary(
            &page_progress,
            &format!("Fetched {} contacts", outcome.raw_count),
            outcome.elapsed,
        );
        self.progress_manager.clear();

        self.output_formatter.print_run_summary(&outcome);

        if outcome.leads.is_empty() {
            return Ok(RunReport::new(filters, &outcome, None, &[]));
        }

        let columns = extractor::select_columns(&outcome.leads);
        let output_manager = OutputManager::new(self.config.output.base_directory.clone())?;
        let path = output_manager.write_leads(filters, &outcome.leads, &columns)?;

        self.output_formatter.print_saved_file(&path);
        self.output_formatter
            .print_preview(&outcome.leads, &columns, self.config.output.preview_rows);

        Ok(RunReport::new(filters, &outcome, Some(path), &columns))
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &LeadsError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::{batch, ScriptedSource};
    use std::fs;
    use tempfile::TempDir;

    fn test_pipeline(output_dir: &Path) -> LeadsPipeline {
        let mut config = Config::default();
        config.output.base_directory = output_dir.to_path_buf();
        config.pagination.page_limit = 4;
        config.pagination.max_pages = 3;
        config.pagination.request_delay_min_ms = 0;
        config.pagination.request_delay_max_ms = 0;

        LeadsPipeline::new(config, OutputMode::Plain, 0, true)
    }

    #[tokio::test]
    async fn test_run_writes_leads_file() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = test_pipeline(temp_dir.path());
        let source = ScriptedSource::full_pages(3, 4);
        let filters = LeadFilters::new(Some("Software"), Some("USA"));

        let report = pipeline.run_with_source(&source, &filters).await.unwrap();

        assert_eq!(report.raw_contacts, 12);
        assert_eq!(report.leads, 6);
        assert_eq!(report.pages_fetched, 3);
        assert_eq!(report.stop_reason, StopReason::PageCeiling { max_pages: 3 });

        let path = report.output_file.unwrap();
        assert_eq!(
            path,
            temp_dir.path().join("gmb_no_website_leads_Software_USA.csv")
        );
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 7);
        assert!(content.starts_with("name,title,company_name,"));
    }

    #[tokio::test]
    async fn test_empty_first_batch_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = test_pipeline(temp_dir.path());
        let source = ScriptedSource::new(vec![Ok(Vec::new())]);

        let report = pipeline
            .run_with_source(&source, &LeadFilters::default())
            .await
            .unwrap();

        assert_eq!(report.leads, 0);
        assert!(report.output_file.is_none());
        assert!(report.columns.is_empty());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_failure_keeps_earlier_pages() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = test_pipeline(temp_dir.path());
        let source = ScriptedSource::new(vec![
            Ok(batch(0, 4)),
            Err(TransportError::Network("connection reset".to_string())),
        ]);

        let report = pipeline
            .run_with_source(&source, &LeadFilters::default())
            .await
            .unwrap();

        assert!(report.partial);
        assert_eq!(report.raw_contacts, 4);
        assert_eq!(report.leads, 2);
        assert!(report.output_file.unwrap().exists());
    }

    #[tokio::test]
    async fn test_null_phone_contacts_are_exported() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = test_pipeline(temp_dir.path());
        let page = source::http::parse_page(
            r#"{"data": [
                {"id": "c1", "name": "Ann Lee", "email": "a@acme.com", "phone": null,
                 "google_business_profile_website": null},
                {"id": "c2", "name": "Raj Rao", "email": "r@beta.com", "phone": "+1-555",
                 "google_business_profile_website": "http://gmb.website/beta.com"}
            ]}"#,
        )
        .unwrap();
        let source = ScriptedSource::new(vec![Ok(page.data)]);

        let report = pipeline
            .run_with_source(&source, &LeadFilters::default())
            .await
            .unwrap();

        assert_eq!(report.raw_contacts, 2);
        assert_eq!(report.leads, 1);
        assert!(!report.partial);
        assert_eq!(
            report.columns,
            vec!["name", "email", "phone", "google_business_profile_website"]
        );

        let content = fs::read_to_string(report.output_file.unwrap()).unwrap();
        assert_eq!(
            content,
            "name,email,phone,google_business_profile_website\nAnn Lee,a@acme.com,,\n"
        );
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        LeadsPipeline::generate_sample_config(&config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[source]"));
        assert!(content.contains("[pagination]"));
        assert!(content.contains("[output]"));
    }
}
