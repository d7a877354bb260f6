use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Tri-state value of an optional provider field.
///
/// Providers either omit a key, send it as `null`, or send a string. The
/// distinction matters for export: a column is only written when at least
/// one record carries the key at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldValue {
    #[default]
    Missing,
    Null,
    Text(String),
}

impl FieldValue {
    pub fn text<S: Into<String>>(value: S) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// True when there is no usable value: missing, null or the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Missing | FieldValue::Null => true,
            FieldValue::Text(value) => value.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Cell text: the string itself, or empty when there is none.
    pub fn text_or_empty(&self) -> &str {
        self.as_str().unwrap_or("")
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) => FieldValue::Text(text),
            None => FieldValue::Null,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(value) => serializer.serialize_str(value),
            _ => serializer.serialize_none(),
        }
    }
}

// Only called when the key is present; absent keys fall back to `Default`.
impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.into())
    }
}

/// One contact as sent by the provider.
///
/// Every exported field keeps its tri-state so a payload that never sends a
/// key produces no column for it, and a `null` anywhere never rejects the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "FieldValue::is_missing")]
    pub name: FieldValue,
    #[serde(default, skip_serializing_if = "FieldValue::is_missing")]
    pub title: FieldValue,
    #[serde(default, skip_serializing_if = "FieldValue::is_missing")]
    pub company_name: FieldValue,
    #[serde(default, skip_serializing_if = "FieldValue::is_missing")]
    pub industry: FieldValue,
    #[serde(default, skip_serializing_if = "FieldValue::is_missing")]
    pub country: FieldValue,
    #[serde(default, skip_serializing_if = "FieldValue::is_missing")]
    pub email: FieldValue,
    #[serde(default, skip_serializing_if = "FieldValue::is_missing")]
    pub phone: FieldValue,
    #[serde(default, skip_serializing_if = "FieldValue::is_missing")]
    pub linkedin_profile_url: FieldValue,
    #[serde(default, skip_serializing_if = "FieldValue::is_missing")]
    pub general_website_url: FieldValue,
    #[serde(default, skip_serializing_if = "FieldValue::is_missing")]
    pub google_business_profile_website: FieldValue,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page of provider results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchPage {
    #[serde(default)]
    pub data: Vec<ContactRecord>,
    /// Informational only; pagination never relies on it.
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub per_page: u32,
}

/// Industry and country filters for a run. Blank input means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadFilters {
    pub industry: Option<String>,
    pub country: Option<String>,
}

impl LeadFilters {
    pub fn new(industry: Option<&str>, country: Option<&str>) -> Self {
        Self {
            industry: normalize(industry),
            country: normalize(country),
        }
    }

    pub fn industry_label(&self) -> &str {
        self.industry.as_deref().unwrap_or("Any")
    }

    pub fn country_label(&self) -> &str {
        self.country.as_deref().unwrap_or("Any")
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactQuery {
    pub industry: Option<String>,
    pub country: Option<String>,
    pub limit: u32,
    /// 1-indexed.
    pub page: u32,
}

impl ContactQuery {
    pub fn new(filters: &LeadFilters, limit: u32, page: u32) -> Self {
        Self {
            industry: filters.industry.clone(),
            country: filters.country.clone(),
            limit,
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_distinguishes_missing_null_and_text() {
        let json = r#"{
            "id": "contact_1",
            "name": "Alice Smith",
            "general_website_url": null,
            "google_business_profile_website": "http://gmb.website/acme.com"
        }"#;
        let record: ContactRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.linkedin_profile_url, FieldValue::Missing);
        assert_eq!(record.general_website_url, FieldValue::Null);
        assert_eq!(
            record.google_business_profile_website.as_str(),
            Some("http://gmb.website/acme.com")
        );
        assert_eq!(record.industry, FieldValue::Missing);
        assert_eq!(record.name.as_str(), Some("Alice Smith"));
    }

    #[test]
    fn test_null_scalar_fields_are_accepted() {
        let json = r#"{
            "id": null,
            "name": "Bob Jones",
            "title": null,
            "company_name": "Acme",
            "country": "USA",
            "email": "bob@acme.com",
            "phone": null,
            "google_business_profile_website": null
        }"#;
        let record: ContactRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, "");
        assert_eq!(record.phone, FieldValue::Null);
        assert_eq!(record.title.text_or_empty(), "");
        assert_eq!(record.email.text_or_empty(), "bob@acme.com");
    }

    #[test]
    fn test_blank_values() {
        assert!(FieldValue::Missing.is_blank());
        assert!(FieldValue::Null.is_blank());
        assert!(FieldValue::text("").is_blank());
        assert!(!FieldValue::text(" ").is_blank());
        assert!(!FieldValue::text("http://example.com").is_blank());
    }

    #[test]
    fn test_missing_fields_are_not_serialized() {
        let record = ContactRecord {
            name: FieldValue::text("Bob Jones"),
            general_website_url: FieldValue::Null,
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();

        assert!(!object.contains_key("linkedin_profile_url"));
        assert!(object["general_website_url"].is_null());
    }

    #[test]
    fn test_page_metadata_defaults() {
        let page: FetchPage = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total_results, 0);
        assert_eq!(page.current_page, 0);
    }

    #[test]
    fn test_filters_normalize_blank_input() {
        let filters = LeadFilters::new(Some("  "), Some(" Canada "));
        assert_eq!(filters.industry, None);
        assert_eq!(filters.country.as_deref(), Some("Canada"));
        assert_eq!(filters.industry_label(), "Any");
        assert_eq!(filters.country_label(), "Canada");
    }

    #[test]
    fn test_query_carries_filters() {
        let filters = LeadFilters::new(Some("Software"), None);
        let query = ContactQuery::new(&filters, 50, 3);
        assert_eq!(query.industry.as_deref(), Some("Software"));
        assert_eq!(query.country, None);
        assert_eq!((query.limit, query.page), (50, 3));
    }
}
