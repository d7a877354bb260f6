use super::{ContactQuery, ContactRecord, ContactSource, FetchPage, FieldValue, TransportError};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

const FIRST_NAMES: [&str; 5] = ["Alice", "Bob", "Charlie", "Diana", "Eve"];
const LAST_NAMES: [&str; 5] = ["Smith", "Jones", "Williams", "Brown", "Davis"];
const TITLES: [&str; 5] = [
    "CEO",
    "Marketing Manager",
    "Sales Representative",
    "Software Engineer",
    "HR Director",
];
const COUNTRIES: [&str; 4] = ["USA", "India", "Germany", "Canada"];

const TOTAL_RESULTS: u64 = 1000;

// Probability that a generated contact carries each URL.
const LINKEDIN_RATE: f64 = 0.9;
const GENERAL_WEBSITE_RATE: f64 = 0.7;
const GMB_WEBSITE_RATE: f64 = 0.4;

/// Seeded stand-in for a contact provider.
///
/// Always returns full pages, so pagination only ends at the page ceiling.
/// Two sources built from the same seed answer the same queries identically.
pub struct MockContactSource {
    rng: Mutex<StdRng>,
    latency_min: Duration,
    latency_max: Duration,
}

impl MockContactSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            latency_min: Duration::ZERO,
            latency_max: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, min: Duration, max: Duration) -> Self {
        self.latency_min = min;
        self.latency_max = max.max(min);
        self
    }

    fn simulated_latency(&self) -> Duration {
        if self.latency_max <= self.latency_min {
            return self.latency_min;
        }
        // Jitter comes from the thread rng so latency never shifts the fixture stream.
        let millis = rand::rng()
            .random_range(self.latency_min.as_millis() as u64..=self.latency_max.as_millis() as u64);
        Duration::from_millis(millis)
    }

    pub fn generate_contacts(&self, query: &ContactQuery) -> Vec<ContactRecord> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        (0..query.limit)
            .map(|_| generate_contact(&mut *rng, query))
            .collect()
    }
}

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

fn generate_contact<R: Rng>(rng: &mut R, query: &ContactQuery) -> ContactRecord {
    let first_name = pick(rng, &FIRST_NAMES);
    let last_name = pick(rng, &LAST_NAMES);

    let company_name = match query.industry {
        Some(ref industry) => format!(
            "Company {} {}",
            rng.random_range(1..=100),
            title_case(industry)
        ),
        None => format!("Company {}", rng.random_range(1..=100)),
    };
    let company_slug = company_name.to_lowercase().replace(' ', "");

    let title = pick(rng, &TITLES).to_string();
    let country = match query.country {
        Some(ref country) => title_case(country),
        None => pick(rng, &COUNTRIES).to_string(),
    };

    let linkedin_profile_url = if rng.random_bool(LINKEDIN_RATE) {
        FieldValue::text(format!(
            "https://www.linkedin.com/in/{}{}{}",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            rng.random_range(1..=99)
        ))
    } else {
        FieldValue::Null
    };

    let general_website_url = if rng.random_bool(GENERAL_WEBSITE_RATE) {
        FieldValue::text(format!("http://www.{}.com", company_slug))
    } else {
        FieldValue::Null
    };

    let google_business_profile_website = if rng.random_bool(GMB_WEBSITE_RATE) {
        FieldValue::text(format!(
            "http://gmb.website/{}{}.com",
            company_slug,
            rng.random_range(1..=99)
        ))
    } else {
        FieldValue::Null
    };

    ContactRecord {
        id: format!("contact_{}", rng.random_range(100_000..=999_999)),
        name: FieldValue::text(format!("{} {}", first_name, last_name)),
        title: FieldValue::text(title),
        industry: query.industry.clone().into(),
        country: FieldValue::text(country),
        email: FieldValue::text(format!(
            "{}.{}@{}.com",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            company_slug
        )),
        phone: FieldValue::text(format!(
            "+1-{}-{}-{}",
            rng.random_range(100..=999),
            rng.random_range(100..=999),
            rng.random_range(1000..=9999)
        )),
        company_name: FieldValue::text(company_name),
        linkedin_profile_url,
        general_website_url,
        google_business_profile_website,
    }
}

/// Capitalizes the first letter of every word and lowercases the rest.
pub fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut at_word_start = true;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                result.extend(ch.to_uppercase());
            } else {
                result.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(ch);
            at_word_start = true;
        }
    }

    result
}

#[async_trait]
impl ContactSource for MockContactSource {
    async fn fetch(&self, query: &ContactQuery) -> Result<FetchPage, TransportError> {
        tracing::info!(
            industry = query.industry.as_deref().unwrap_or("any"),
            country = query.country.as_deref().unwrap_or("any"),
            limit = query.limit,
            page = query.page,
            "Mock API call"
        );

        let latency = self.simulated_latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        Ok(FetchPage {
            data: self.generate_contacts(query),
            total_results: TOTAL_RESULTS,
            current_page: query.page,
            per_page: query.limit,
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
