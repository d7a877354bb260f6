use super::{ContactQuery, ContactSource, FetchPage, TransportError};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// REST client for a B2B contact provider.
///
/// Sends `GET <endpoint>?limit=..&page=..[&industry=..][&country=..]` with a
/// bearer key and expects `{"data": [...], "total_results", "current_page", "per_page"}`.
pub struct HttpContactSource {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl HttpContactSource {
    pub fn new(endpoint: Url, api_key: String, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gmbleads/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

pub fn query_params(query: &ContactQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("limit", query.limit.to_string()),
        ("page", query.page.to_string()),
    ];

    if let Some(ref industry) = query.industry {
        params.push(("industry", industry.clone()));
    }
    if let Some(ref country) = query.country {
        params.push(("country", country.clone()));
    }

    params
}

pub fn parse_page(body: &str) -> Result<FetchPage, TransportError> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl ContactSource for HttpContactSource {
    async fn fetch(&self, query: &ContactQuery) -> Result<FetchPage, TransportError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            page = query.page,
            limit = query.limit,
            "Requesting contacts"
        );

        let resp = self
            .client
            .get(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .query(&query_params(query))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        parse_page(&body)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FieldValue, LeadFilters};

    #[test]
    fn test_query_params_skip_unset_filters() {
        let query = ContactQuery::new(&LeadFilters::default(), 50, 2);
        let params = query_params(&query);
        assert_eq!(
            params,
            vec![("limit", "50".to_string()), ("page", "2".to_string())]
        );

        let filters = LeadFilters::new(Some("Healthcare"), Some("UK"));
        let params = query_params(&ContactQuery::new(&filters, 25, 1));
        assert!(params.contains(&("industry", "Healthcare".to_string())));
        assert!(params.contains(&("country", "UK".to_string())));
    }

    #[test]
    fn test_parse_provider_page() {
        let body = r#"{
            "data": [
                {
                    "id": "contact_123456",
                    "name": "Diana Brown",
                    "title": "CEO",
                    "company_name": "Company 7 Software",
                    "industry": "Software",
                    "country": "Usa",
                    "email": "diana.brown@company7software.com",
                    "phone": "+1-555-123-4567",
                    "linkedin_profile_url": "https://www.linkedin.com/in/dianabrown12",
                    "general_website_url": null,
                    "google_business_profile_website": null
                }
            ],
            "total_results": 1000,
            "current_page": 1,
            "per_page": 50
        }"#;

        let page = parse_page(body).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.total_results, 1000);
        assert_eq!(page.per_page, 50);
        assert_eq!(page.data[0].google_business_profile_website, FieldValue::Null);
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let err = parse_page("<html>gateway timeout</html>").unwrap_err();
        assert!(matches!(err, TransportError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_network_error() {
        let endpoint = Url::parse("http://127.0.0.1:9/v1/contacts").unwrap();
        let source =
            HttpContactSource::new(endpoint, "key".to_string(), Duration::from_secs(5)).unwrap();

        let query = ContactQuery::new(&LeadFilters::default(), 50, 1);
        let err = source.fetch(&query).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
