use crate::error::ExtractError;
use serde::{Deserialize, Serialize};

/// One extracted listing. All seven fields are always present; an empty string
/// means the field was not found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub index: usize,
    pub title: String,
    pub price: String,
    pub location: String,
    pub description: String,
    pub link: String,
    pub revenue: String,
    pub cash_flow: String,
}

impl ListingRecord {
    /// Column names in export order.
    pub const FIELDS: [&'static str; 8] = [
        "index",
        "title",
        "price",
        "location",
        "description",
        "link",
        "revenue",
        "cash_flow",
    ];

    pub fn empty(index: usize) -> Self {
        Self {
            index,
            title: String::new(),
            price: String::new(),
            location: String::new(),
            description: String::new(),
            link: String::new(),
            revenue: String::new(),
            cash_flow: String::new(),
        }
    }
}

/// A listing block that was located but could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedListing {
    pub index: usize,
    pub reason: ExtractError,
}

/// The whole page, kept for manual inspection when nothing was extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPageFallback {
    pub markup: String,
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_serializes_every_field() {
        let value = serde_json::to_value(ListingRecord::empty(3)).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), ListingRecord::FIELDS.len());
        for field in ListingRecord::FIELDS {
            assert!(object.contains_key(field), "missing {}", field);
        }
        assert_eq!(object["index"], 3);
        assert_eq!(object["cash_flow"], "");
    }
}
