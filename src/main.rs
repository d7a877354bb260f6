use clap::Parser;
use console::Term;
use gmbleads::cli::prompt_filters;
use gmbleads::{
    logging, output_filename, Cli, LeadFilters, LeadsError, LeadsPipeline, OutputFormatter,
    SourceKind, UserFriendlyError,
};
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let pipeline = match LeadsPipeline::from_cli(&cli) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            print_startup_error(&cli, &e);
            return 1;
        }
    };

    let filters = if cli.interactive {
        match prompt_filters(std::io::stdin().lock(), Term::stdout()) {
            Ok(filters) => filters,
            Err(e) => {
                pipeline.handle_error(&LeadsError::Io(e));
                return 1;
            }
        }
    } else {
        cli.lead_filters()
    };

    if cli.dry_run {
        return handle_dry_run(&pipeline, &filters);
    }

    match pipeline.run(&filters).await {
        Ok(report) => {
            pipeline.output_formatter().print_run_report(&report);
            0
        }
        Err(e) => {
            tracing::error!(error = %e, "Run aborted");
            pipeline.handle_error(&e);
            1
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "gmbleads.toml".to_string());

    match LeadsPipeline::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  gmbleads --config {}", config_path);
            println!("\nEdit the file to point at your provider and tune pagination.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(pipeline: &LeadsPipeline, filters: &LeadFilters) -> i32 {
    let formatter = pipeline.output_formatter();
    let config = pipeline.config();

    formatter.warning("DRY RUN MODE - the provider will not be contacted");
    formatter.print_separator();

    println!("  Industry: {}", filters.industry_label());
    println!("  Country: {}", filters.country_label());
    match config.source.kind {
        SourceKind::Mock => match config.source.seed {
            Some(seed) => println!("  Source: mock (seed {})", seed),
            None => println!("  Source: mock (random seed)"),
        },
        SourceKind::Http => println!("  Source: http ({})", config.source.api_url),
    }
    println!("  Page limit: {}", config.pagination.page_limit);
    println!("  Max pages: {}", config.pagination.max_pages);
    println!(
        "  Request delay: {}-{} ms",
        config.pagination.request_delay_min_ms, config.pagination.request_delay_max_ms
    );
    println!(
        "  Output file: {}",
        config
            .output
            .base_directory
            .join(output_filename(filters))
            .display()
    );

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to fetch contacts");

    0
}

fn print_startup_error(cli: &Cli, error: &LeadsError) {
    let formatter = OutputFormatter::new(cli.output_mode(), 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use gmbleads::{Config, OutputMode};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::parse_from([
            "gmbleads",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ]);

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[pagination]"));
    }

    #[test]
    fn test_dry_run_mode() {
        let pipeline = LeadsPipeline::new(Config::default(), OutputMode::Plain, 0, true);
        let filters = LeadFilters::new(Some("Software"), None);

        let exit_code = handle_dry_run(&pipeline, &filters);
        assert_eq!(exit_code, 0);
    }
}
