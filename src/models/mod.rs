use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Preview of a single listing as it appears in the search results.
///
/// The record is kept exactly as the site sent it and written back out
/// unchanged; the accessors below are a lenient read-only view for logging.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PropertyPreview(pub Map<String, Value>);

impl PropertyPreview {
    /// Listing identifier, whether sent as a string or a number
    pub fn property_id(&self) -> Option<String> {
        match self.0.get("property_id")? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    pub fn permalink(&self) -> Option<&str> {
        self.0.get("permalink").and_then(Value::as_str)
    }

    pub fn list_price(&self) -> Option<f64> {
        self.0.get("list_price").and_then(Value::as_f64)
    }
}

/// One page of search results (`home_search` in the embedded page data)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResults {
    /// Results on this page
    pub count: u32,
    /// Results across all pages
    pub total: u32,
    #[serde(default)]
    pub results: Vec<PropertyPreview>,
}
