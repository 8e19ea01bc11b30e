use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameters of the customer autocomplete endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartySearchQuery {
    pub search: String,
    pub page: usize,
    pub size: usize,
}

impl CounterpartySearchQuery {
    /// First page of matches for `search`
    pub fn first_page(search: &str, size: usize) -> Self {
        Self {
            search: search.trim().to_string(),
            page: 0,
            size,
        }
    }
}

/// One option of the customer autocomplete list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartySuggestion {
    pub id: String,
    pub name: String,
}

impl CounterpartySuggestion {
    /// Lenient row parse: `id` may be a string or a number, the display name
    /// is taken from `name`, `customerName` or `description`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let name = ["name", "customerName", "description"]
            .iter()
            .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
            .map(str::trim)
            .filter(|s| !s.is_empty())?
            .to_string();
        let id = match value.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        Some(Self { id, name })
    }
}

/// Raw autocomplete response: `{"success": bool, "customers": [...]}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CounterpartySearchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub customers: Option<Vec<Value>>,
}

impl CounterpartySearchResponse {
    /// Normalize any response body to a suggestion list.
    ///
    /// `success = false`, a missing list or an unexpected shape all yield an
    /// empty list.
    pub fn suggestions_from(body: Value) -> Vec<CounterpartySuggestion> {
        serde_json::from_value::<CounterpartySearchResponse>(body)
            .map(CounterpartySearchResponse::into_suggestions)
            .unwrap_or_default()
    }

    pub fn into_suggestions(self) -> Vec<CounterpartySuggestion> {
        if !self.success {
            return Vec::new();
        }
        self.customers
            .unwrap_or_default()
            .iter()
            .filter_map(CounterpartySuggestion::from_value)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_successful_response() {
        let body = json!({
            "success": true,
            "customers": [
                {"id": 7, "name": "Acme Ltd"},
                {"id": "c-2", "customerName": "Globex"},
                {"id": 9},
            ]
        });
        let list = CounterpartySearchResponse::suggestions_from(body);
        assert_eq!(
            list,
            vec![
                CounterpartySuggestion { id: "7".into(), name: "Acme Ltd".into() },
                CounterpartySuggestion { id: "c-2".into(), name: "Globex".into() },
            ]
        );
    }

    #[test]
    fn test_failed_or_malformed_response() {
        assert!(CounterpartySearchResponse::suggestions_from(
            json!({"success": false, "customers": [{"id": 1, "name": "A"}]})
        )
        .is_empty());
        assert!(CounterpartySearchResponse::suggestions_from(json!({"success": true})).is_empty());
        assert!(CounterpartySearchResponse::suggestions_from(json!([1, 2, 3])).is_empty());
        assert!(CounterpartySearchResponse::suggestions_from(json!({"success": "yes"})).is_empty());
    }

    #[test]
    fn test_query_trims() {
        let query = CounterpartySearchQuery::first_page("  ac ", 10);
        assert_eq!(query.search, "ac");
        assert_eq!(query.page, 0);
    }
}
