use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Pagination / sort model
// ============================================================================

/// Page position of a server-paginated grid (page is 0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationModel {
    pub page: usize,
    pub page_size: usize,
}

impl PaginationModel {
    /// Page size is clamped to at least 1
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size: page_size.max(1),
        }
    }

    pub fn first_page(self) -> Self {
        Self { page: 0, ..self }
    }
}

impl Default for PaginationModel {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One column of a multi-column sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortItem {
    pub field: String,
    pub sort: SortDirection,
}

/// Sort columns in priority order (first item sorts first)
pub type SortModel = Vec<SortItem>;

// ============================================================================
// Paginated list response
// ============================================================================

/// Rows of one listing page together with the total row count on the server
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPage {
    pub rows: Vec<Value>,
    pub row_count: u64,
}

impl ListPage {
    /// Normalize a listing response body.
    ///
    /// Accepted shapes:
    /// - `{"content": [...], "totalElements": n}`
    /// - a bare array (row count is its length)
    ///
    /// Anything else is treated as an empty page, never as an error.
    pub fn from_response(body: Value) -> Self {
        match body {
            Value::Array(rows) => {
                let row_count = rows.len() as u64;
                Self { rows, row_count }
            }
            Value::Object(mut map) => {
                let total = map.get("totalElements").and_then(as_count);
                match (map.remove("content"), total) {
                    (Some(Value::Array(rows)), Some(row_count)) => Self { rows, row_count },
                    _ => Self::default(),
                }
            }
            _ => Self::default(),
        }
    }
}

fn as_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n as u64)
    })
}

// ============================================================================
// Helpers
// ============================================================================

/// Trimmed value, or `None` when the input is blank
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Checks `YYYY-MM-DD`
pub fn is_iso_date(value: &str) -> bool {
    value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
