pub mod lead_extractor;
pub mod lead_filter;
pub mod output_manager;

pub use lead_extractor::{ExtractionOutcome, ExtractionProgress, LeadExtractor, PageEvent, StopReason};
pub use lead_filter::{filter_leads, lacks_gmb_website};
pub use output_manager::{output_filename, select_columns, Column, OutputManager, RunReport};
