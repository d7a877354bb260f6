use crate::error::{LeadsError, Result};
use crate::extractor::{ExtractionOutcome, StopReason};
use crate::source::{ContactRecord, FieldValue, LeadFilters};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Exported columns, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Title,
    CompanyName,
    Industry,
    Country,
    Email,
    Phone,
    LinkedinProfileUrl,
    GeneralWebsiteUrl,
    GmbWebsite,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Name,
        Column::Title,
        Column::CompanyName,
        Column::Industry,
        Column::Country,
        Column::Email,
        Column::Phone,
        Column::LinkedinProfileUrl,
        Column::GeneralWebsiteUrl,
        Column::GmbWebsite,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Title => "title",
            Column::CompanyName => "company_name",
            Column::Industry => "industry",
            Column::Country => "country",
            Column::Email => "email",
            Column::Phone => "phone",
            Column::LinkedinProfileUrl => "linkedin_profile_url",
            Column::GeneralWebsiteUrl => "general_website_url",
            Column::GmbWebsite => "google_business_profile_website",
        }
    }

    pub fn field<'a>(&self, record: &'a ContactRecord) -> &'a FieldValue {
        match self {
            Column::Name => &record.name,
            Column::Title => &record.title,
            Column::CompanyName => &record.company_name,
            Column::Industry => &record.industry,
            Column::Country => &record.country,
            Column::Email => &record.email,
            Column::Phone => &record.phone,
            Column::LinkedinProfileUrl => &record.linkedin_profile_url,
            Column::GeneralWebsiteUrl => &record.general_website_url,
            Column::GmbWebsite => &record.google_business_profile_website,
        }
    }

    /// Cell text; null and absent values render as an empty cell.
    pub fn value<'a>(&self, record: &'a ContactRecord) -> &'a str {
        self.field(record).text_or_empty()
    }

    /// Whether the record carries this key at all, even as null.
    pub fn is_present_in(&self, record: &ContactRecord) -> bool {
        !self.field(record).is_missing()
    }
}

/// Fixed projection restricted to the fields the records actually carry.
pub fn select_columns(records: &[ContactRecord]) -> Vec<Column> {
    if records.is_empty() {
        return Vec::new();
    }

    Column::ALL
        .iter()
        .copied()
        .filter(|column| records.iter().any(|r| column.is_present_in(r)))
        .collect()
}

/// `gmb_no_website_leads_<industry>_<country>.csv`, with placeholders for unset filters.
pub fn output_filename(filters: &LeadFilters) -> String {
    let industry = filters
        .industry
        .as_deref()
        .map(sanitize_component)
        .unwrap_or_else(|| "any_industry".to_string());
    let country = filters
        .country
        .as_deref()
        .map(sanitize_component)
        .unwrap_or_else(|| "any_country".to_string());

    format!("gmb_no_website_leads_{}_{}.csv", industry, country)
}

fn sanitize_component(value: &str) -> String {
    let sanitized: String = value
        .chars()
        .map(|ch| match ch {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' | '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}

/// Write the projection as CSV with a header row.
pub fn write_csv<W: Write>(writer: W, records: &[ContactRecord], columns: &[Column]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(columns.iter().map(Column::header))?;
    for record in records {
        csv_writer.write_record(columns.iter().map(|c| c.value(record)))?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub industry: Option<String>,
    pub country: Option<String>,
    pub pages_fetched: u32,
    pub raw_contacts: usize,
    pub leads: usize,
    pub stop_reason: StopReason,
    /// Set when a provider failure cut pagination short.
    pub partial: bool,
    pub elapsed_ms: u64,
    pub output_file: Option<PathBuf>,
    pub columns: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl RunReport {
    pub fn new(
        filters: &LeadFilters,
        outcome: &ExtractionOutcome,
        output_file: Option<PathBuf>,
        columns: &[Column],
    ) -> Self {
        Self {
            industry: filters.industry.clone(),
            country: filters.country.clone(),
            pages_fetched: outcome.pages_fetched,
            raw_contacts: outcome.raw_count,
            leads: outcome.leads.len(),
            stop_reason: outcome.stop_reason.clone(),
            partial: outcome.stop_reason.is_failure(),
            elapsed_ms: outcome.elapsed.as_millis() as u64,
            output_file,
            columns: columns.iter().map(|c| c.header().to_string()).collect(),
            generated_at: Utc::now(),
        }
    }
}

pub struct OutputManager {
    output_directory: PathBuf,
}

impl OutputManager {
    pub fn new(output_directory: PathBuf) -> Result<Self> {
        let manager = Self { output_directory };
        manager.validate_paths()?;
        Ok(manager)
    }

    pub fn output_path(&self, filters: &LeadFilters) -> PathBuf {
        self.output_directory.join(output_filename(filters))
    }

    /// Write the leads file, replacing any earlier export for the same filters.
    pub fn write_leads(
        &self,
        filters: &LeadFilters,
        leads: &[ContactRecord],
        columns: &[Column],
    ) -> Result<PathBuf> {
        let path = self.output_path(filters);
        let file = fs::File::create(&path).map_err(|e| LeadsError::Permission {
            path: format!("Cannot create {}: {}", path.display(), e),
        })?;

        write_csv(file, leads, columns)?;
        tracing::info!(path = %path.display(), rows = leads.len(), "Wrote leads file");

        Ok(path)
    }

    fn validate_paths(&self) -> Result<()> {
        if !self.output_directory.exists() {
            fs::create_dir_all(&self.output_directory).map_err(|e| LeadsError::Permission {
                path: format!(
                    "Cannot create output directory {}: {}",
                    self.output_directory.display(),
                    e
                ),
            })?;
        }

        let metadata = fs::metadata(&self.output_directory)?;
        if metadata.permissions().readonly() {
            return Err(LeadsError::Permission {
                path: format!(
                    "No write permission for directory {}",
                    self.output_directory.display()
                ),
            });
        }

        Ok(())
    }
}
