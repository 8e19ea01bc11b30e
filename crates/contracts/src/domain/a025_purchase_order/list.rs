use crate::domain::common::non_blank;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Status
// ============================================================================

/// Delivery status of a purchase order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    Pending,
    Delivered,
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Pending => "pending",
            PurchaseOrderStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PurchaseOrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(PurchaseOrderStatus::Pending),
            "delivered" => Ok(PurchaseOrderStatus::Delivered),
            other => Err(format!("Unknown purchase order status: {}", other)),
        }
    }
}

// ============================================================================
// List query
// ============================================================================

/// Query parameters of `GET /api/a025/purchase-orders`.
///
/// Optional parameters are omitted from the query string when blank, never
/// sent as empty values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderListQuery {
    pub page: usize,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Substring match against the PO number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Customer name match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PurchaseOrderStatus>,
}

impl PurchaseOrderListQuery {
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size,
            start_date: None,
            end_date: None,
            search: None,
            customer: None,
            status: None,
        }
    }

    pub fn with_dates(mut self, start_date: &str, end_date: &str) -> Self {
        self.start_date = non_blank(start_date);
        self.end_date = non_blank(end_date);
        self
    }

    pub fn with_search(mut self, po_number: &str) -> Self {
        self.search = non_blank(po_number);
        self
    }

    pub fn with_customer(mut self, customer_name: &str) -> Self {
        self.customer = non_blank(customer_name);
        self
    }

    pub fn with_status(mut self, status: Option<PurchaseOrderStatus>) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_fields_are_omitted() {
        let query = PurchaseOrderListQuery::new(0, 10)
            .with_dates("", "  ")
            .with_search(" ")
            .with_customer("")
            .with_status(None);
        assert_eq!(serde_json::to_value(&query).unwrap(), json!({"page": 0, "size": 10}));
    }

    #[test]
    fn test_filled_fields() {
        let query = PurchaseOrderListQuery::new(2, 25)
            .with_dates("2024-01-01", "2024-01-31")
            .with_search(" PO-77 ")
            .with_customer("Acme")
            .with_status(Some(PurchaseOrderStatus::Pending));
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "page": 2,
                "size": 25,
                "startDate": "2024-01-01",
                "endDate": "2024-01-31",
                "search": "PO-77",
                "customer": "Acme",
                "status": "pending"
            })
        );
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Delivered".parse(), Ok(PurchaseOrderStatus::Delivered));
        assert!("none".parse::<PurchaseOrderStatus>().is_err());
    }
}
