use crate::error::{LeadsError, UserFriendlyError};
use crate::extractor::{Column, ExtractionOutcome, PageEvent, RunReport};
use crate::source::ContactRecord;
use console::{style, Emoji, Term};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    /// One line per pagination event.
    pub fn page_event(&self, event: &PageEvent) {
        match event {
            PageEvent::Requesting { page, max_pages } => {
                if !self.should_show_message(0) {
                    return;
                }
                let line = format!("Requesting page {} of at most {} from API...", page, max_pages);
                match self.mode {
                    OutputMode::Human => println!("  {}", line),
                    OutputMode::Json => self.print_json_object(&serde_json::json!({
                        "type": "page",
                        "page": page,
                        "max_pages": max_pages,
                    })),
                    OutputMode::Plain => println!("PAGE: {}", line),
                }
            }
            PageEvent::Received {
                page,
                received,
                accumulated,
            } => self.debug(&format!(
                "Page {} returned {} contacts ({} total)",
                page, received, accumulated
            )),
            PageEvent::Failed { message, .. } => {
                self.warning(&format!("API call failed: {}. Stopping extraction.", message))
            }
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &LeadsError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    // Summary and reporting
    /// Quiet mode still reports an empty result; json mode leaves that to the run report.
    pub fn print_run_summary(&self, outcome: &ExtractionOutcome) {
        if self.quiet {
            if self.mode != OutputMode::Json {
                if let Some(line) = empty_result_line(outcome) {
                    println!("{}", line);
                }
            }
            return;
        }

        match self.mode {
            OutputMode::Human => self.print_human_summary(outcome),
            OutputMode::Json => self.print_json_summary(outcome),
            OutputMode::Plain => self.print_plain_summary(outcome),
        }
    }

    pub fn print_saved_file(&self, path: &Path) {
        self.success(&format!("Filtered leads saved to '{}'", path.display()));
    }

    /// First `max_rows` leads as an aligned table. JSON mode has no preview.
    pub fn print_preview(&self, leads: &[ContactRecord], columns: &[Column], max_rows: usize) {
        if self.quiet || self.mode == OutputMode::Json || leads.is_empty() || max_rows == 0 {
            return;
        }

        let shown = leads.len().min(max_rows);
        self.print_header(&format!("First {} Filtered Leads", shown));
        println!("{}", format_preview_table(leads, columns, max_rows));
    }

    pub fn print_run_report(&self, report: &RunReport) {
        match self.mode {
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Plain => {
                if self.quiet {
                    return;
                }
                println!("REPORT: Run completed");
                if report.partial {
                    println!("Partial: {}", report.stop_reason);
                }
                println!("Leads: {}", report.leads);
                if let Some(ref path) = report.output_file {
                    println!("File: {}", path.display());
                }
            }
            OutputMode::Human => {}
        }
    }

    // Specialized output methods
    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{} {}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => {
                println!("=== {} ===", title);
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(&self, outcome: &ExtractionOutcome) {
        println!();
        self.print_separator();

        let headline = if outcome.leads.is_empty() {
            "No leads found matching the criteria.".to_string()
        } else {
            format!(
                "Extraction complete! Found {} leads whose companies lack a Google Business Profile website.",
                outcome.leads.len()
            )
        };

        match (self.use_colors, outcome.leads.is_empty()) {
            (true, false) => println!("{}{}", CHECKMARK, style(&headline).green().bold()),
            (true, true) => println!("{}{}", WARNING, style(&headline).yellow().bold()),
            (false, false) => println!("✓ {}", headline),
            (false, true) => println!("! {}", headline),
        }

        println!();
        println!("  Raw contacts:  {}", self.highlight(outcome.raw_count.to_string()));
        println!("  Pages fetched: {}", self.highlight(outcome.pages_fetched.to_string()));
        println!("  Stopped:       {}", outcome.stop_reason);
        println!("  Time taken:    {}", self.highlight(format_elapsed(outcome.elapsed)));

        self.print_separator();
    }

    fn print_json_summary(&self, outcome: &ExtractionOutcome) {
        let summary = serde_json::json!({
            "type": "summary",
            "raw_contacts": outcome.raw_count,
            "leads": outcome.leads.len(),
            "pages_fetched": outcome.pages_fetched,
            "stop_reason": outcome.stop_reason,
            "duration_ms": outcome.elapsed.as_millis() as u64,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        println!(
            "{}",
            serde_json::to_string(&summary).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_plain_summary(&self, outcome: &ExtractionOutcome) {
        if outcome.leads.is_empty() {
            println!("COMPLETED: No leads found matching the criteria");
        } else {
            println!("COMPLETED: Found {} leads", outcome.leads.len());
        }
        println!("Raw contacts: {}", outcome.raw_count);
        println!("Pages fetched: {}", outcome.pages_fetched);
        println!("Stopped: {}", outcome.stop_reason);
        println!("Total time taken: {}", format_elapsed(outcome.elapsed));
    }

    fn highlight(&self, value: String) -> String {
        if self.use_colors {
            style(value).cyan().bold().to_string()
        } else {
            value
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

pub fn empty_result_line(outcome: &ExtractionOutcome) -> Option<String> {
    if outcome.leads.is_empty() {
        Some(format!(
            "No leads found matching the criteria. Total time taken: {}",
            format_elapsed(outcome.elapsed)
        ))
    } else {
        None
    }
}

pub fn format_elapsed(duration: Duration) -> String {
    format!("{:.2} seconds", duration.as_secs_f64())
}

/// Left-aligned text table with a header row and a row index column.
pub fn format_preview_table(leads: &[ContactRecord], columns: &[Column], max_rows: usize) -> String {
    let rows: Vec<&ContactRecord> = leads.iter().take(max_rows).collect();
    let index_width = rows.len().saturating_sub(1).to_string().len();

    let widths: Vec<usize> = columns
        .iter()
        .map(|column| {
            rows.iter()
                .map(|r| column.value(r).chars().count())
                .chain(std::iter::once(column.header().chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let headers: Vec<&str> = columns.iter().map(Column::header).collect();
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render_row("", &headers, &widths, index_width));
    for (i, record) in rows.iter().enumerate() {
        let cells: Vec<&str> = columns.iter().map(|c| c.value(record)).collect();
        lines.push(render_row(&i.to_string(), &cells, &widths, index_width));
    }

    lines.join("\n")
}

fn render_row(index: &str, cells: &[&str], widths: &[usize], index_width: usize) -> String {
    let mut line = format!("{:<width$}", index, width = index_width);
    for (cell, width) in cells.iter().zip(widths) {
        line.push_str("  ");
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.chars().count())));
    }
    line.trim_end().to_string()
}

// Progress-aware output wrapper
pub struct ProgressAwareOutput<'a> {
    formatter: &'a OutputFormatter,
    progress_manager: Option<&'a crate::ui::ProgressManager>,
}

impl<'a> ProgressAwareOutput<'a> {
    pub fn new(
        formatter: &'a OutputFormatter,
        progress_manager: Option<&'a crate::ui::ProgressManager>,
    ) -> Self {
        Self {
            formatter,
            progress_manager,
        }
    }

    pub fn suspend_and_print<F>(&self, f: F)
    where
        F: FnOnce(&OutputFormatter),
    {
        if let Some(pm) = self.progress_manager {
            pm.suspend(|| f(self.formatter));
        } else {
            f(self.formatter);
        }
    }

    pub fn page_event(&self, event: &PageEvent) {
        self.suspend_and_print(|f| f.page_event(event));
    }
}
