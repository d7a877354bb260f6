use crate::config::PaginationConfig;
use crate::extractor::lead_filter::filter_leads;
use crate::source::{ContactQuery, ContactRecord, ContactSource, LeadFilters};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

/// Why pagination stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopReason {
    EmptyBatch { page: u32 },
    ShortBatch { page: u32, received: usize, limit: u32 },
    PageCeiling { max_pages: u32 },
    TransportFailure { page: u32, message: String },
}

impl StopReason {
    pub fn is_failure(&self) -> bool {
        matches!(self, StopReason::TransportFailure { .. })
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EmptyBatch { page } => write!(f, "page {} returned no contacts", page),
            StopReason::ShortBatch {
                page,
                received,
                limit,
            } => write!(
                f,
                "page {} returned {} of {} contacts (last page)",
                page, received, limit
            ),
            StopReason::PageCeiling { max_pages } => {
                write!(f, "reached the page ceiling of {} pages", max_pages)
            }
            StopReason::TransportFailure { page, message } => {
                write!(f, "request for page {} failed: {}", page, message)
            }
        }
    }
}

/// Pagination events reported to an optional observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Requesting { page: u32, max_pages: u32 },
    Received { page: u32, received: usize, accumulated: usize },
    Failed { page: u32, message: String },
}

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub pages_fetched: u32,
    pub start_time: Instant,
}

impl ExtractionProgress {
    pub fn start() -> Self {
        Self {
            pages_fetched: 0,
            start_time: Instant::now(),
        }
    }

    pub fn record_page(&mut self) {
        self.pages_fetched += 1;
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Result of one fetch-and-filter run.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub leads: Vec<ContactRecord>,
    pub raw_count: usize,
    pub pages_fetched: u32,
    pub stop_reason: StopReason,
    pub elapsed: Duration,
}

pub struct LeadExtractor {
    page_limit: u32,
    max_pages: u32,
    delay_min: Duration,
    delay_max: Duration,
}

impl LeadExtractor {
    pub fn from_config(config: &PaginationConfig) -> Self {
        Self {
            page_limit: 1,
            max_pages: 1,
            delay_min: Duration::ZERO,
            delay_max: Duration::ZERO,
        }
        .with_page_limit(config.page_limit)
        .with_max_pages(config.max_pages)
        .with_request_delay(
            Duration::from_millis(config.request_delay_min_ms),
            Duration::from_millis(config.request_delay_max_ms),
        )
    }

    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_request_delay(mut self, min: Duration, max: Duration) -> Self {
        self.delay_min = min;
        self.delay_max = max.max(min);
        self
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Fetch every page the source will give (within the ceiling), then keep the leads.
    pub async fn extract(
        &self,
        source: &dyn ContactSource,
        filters: &LeadFilters,
        observer: Option<&dyn Fn(&PageEvent)>,
    ) -> ExtractionOutcome {
        let progress = ExtractionProgress::start();
        let (records, progress, stop_reason) =
            self.fetch_all(source, filters, progress, observer).await;

        tracing::info!(
            raw = records.len(),
            pages = progress.pages_fetched,
            reason = %stop_reason,
            "Pagination finished"
        );

        let raw_count = records.len();
        let leads = filter_leads(records);
        tracing::debug!(leads = leads.len(), raw = raw_count, "Applied GMB website filter");

        ExtractionOutcome {
            leads,
            raw_count,
            pages_fetched: progress.pages_fetched,
            stop_reason,
            elapsed: progress.elapsed(),
        }
    }

    async fn fetch_all(
        &self,
        source: &dyn ContactSource,
        filters: &LeadFilters,
        mut progress: ExtractionProgress,
        observer: Option<&dyn Fn(&PageEvent)>,
    ) -> (Vec<ContactRecord>, ExtractionProgress, StopReason) {
        let notify = |event: PageEvent| {
            if let Some(callback) = observer {
                callback(&event);
            }
        };

        let mut records = Vec::new();
        let mut page = 1;

        let stop_reason = loop {
            notify(PageEvent::Requesting {
                page,
                max_pages: self.max_pages,
            });

            let query = ContactQuery::new(filters, self.page_limit, page);
            match source.fetch(&query).await {
                Ok(batch) => {
                    let received = batch.data.len();
                    progress.record_page();
                    records.extend(batch.data);

                    tracing::debug!(page, received, total = records.len(), "Fetched page");
                    notify(PageEvent::Received {
                        page,
                        received,
                        accumulated: records.len(),
                    });

                    if received == 0 {
                        break StopReason::EmptyBatch { page };
                    }
                    if received < self.page_limit as usize {
                        break StopReason::ShortBatch {
                            page,
                            received,
                            limit: self.page_limit,
                        };
                    }
                    if page >= self.max_pages {
                        break StopReason::PageCeiling {
                            max_pages: self.max_pages,
                        };
                    }
                }
                Err(e) => {
                    tracing::warn!(page, error = %e, "Contact provider request failed, stopping extraction");
                    notify(PageEvent::Failed {
                        page,
                        message: e.to_string(),
                    });
                    break StopReason::TransportFailure {
                        page,
                        message: e.to_string(),
                    };
                }
            }

            self.pause().await;
            page += 1;
        };

        (records, progress, stop_reason)
    }

    /// Politeness delay between page requests.
    async fn pause(&self) {
        let delay = if self.delay_max > self.delay_min {
            let millis = rand::rng().random_range(
                self.delay_min.as_millis() as u64..=self.delay_max.as_millis() as u64,
            );
            Duration::from_millis(millis)
        } else {
            self.delay_min
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
