use crate::source::ContactRecord;

/// A contact is a lead when its Google Business Profile lists no website.
pub fn lacks_gmb_website(record: &ContactRecord) -> bool {
    record.google_business_profile_website.is_blank()
}

/// Keep only the leads, preserving order.
pub fn filter_leads(records: Vec<ContactRecord>) -> Vec<ContactRecord> {
    records.into_iter().filter(lacks_gmb_website).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::{batch, contact};
    use crate::source::FieldValue;

    #[test]
    fn test_lead_predicate() {
        assert!(lacks_gmb_website(&contact("A", FieldValue::Missing)));
        assert!(lacks_gmb_website(&contact("B", FieldValue::Null)));
        assert!(lacks_gmb_website(&contact("C", FieldValue::text(""))));
        assert!(!lacks_gmb_website(&contact(
            "D",
            FieldValue::text("http://gmb.website/d.com")
        )));
    }

    #[test]
    fn test_filter_keeps_exactly_the_leads_in_order() {
        let records = vec![
            contact("Alice Smith", FieldValue::Null),
            contact("Bob Jones", FieldValue::text("http://gmb.website/bob.com")),
            contact("Charlie Brown", FieldValue::text("")),
            contact("Diana Davis", FieldValue::Missing),
            contact("Eve Williams", FieldValue::text("http://gmb.website/eve.com")),
        ];

        let names: Vec<String> = filter_leads(records)
            .into_iter()
            .map(|r| r.name.text_or_empty().to_string())
            .collect();
        assert_eq!(names, vec!["Alice Smith", "Charlie Brown", "Diana Davis"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let once = filter_leads(batch(1, 20));
        let twice = filter_leads(once.clone());
        assert_eq!(once.len(), 10);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_empty_input() {
        assert!(filter_leads(Vec::new()).is_empty());
    }
}
