use crate::domain::common::non_blank;
use serde::{Deserialize, Serialize};

/// Date bounds shared by every summary endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl SummaryRange {
    pub fn new(start_date: &str, end_date: &str) -> Self {
        Self {
            start_date: non_blank(start_date),
            end_date: non_blank(end_date),
        }
    }
}

/// Dashboard view model merged from several aggregate endpoints.
///
/// Every field defaults to zero so a missing part never leaves the view
/// half-initialised.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordsSummary {
    pub invoices: InvoiceTotals,
    pub purchase_orders: PurchaseOrderTotals,
    pub total_actual_cost: f64,
    pub total_tax: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceTotals {
    pub total: u64,
    pub paid: u64,
    pub unpaid: u64,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PurchaseOrderTotals {
    pub total: u64,
    pub pending: u64,
    pub delivered: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_summary_defaults_to_zero() {
        let summary: RecordsSummary =
            serde_json::from_value(json!({"invoices": {"total": 5}, "totalActualCost": 120})).unwrap();
        assert_eq!(summary.invoices.total, 5);
        assert_eq!(summary.invoices.paid, 0);
        assert_eq!(summary.total_actual_cost, 120.0);
        assert_eq!(summary.purchase_orders, PurchaseOrderTotals::default());
    }

    #[test]
    fn test_range_omits_blank_dates() {
        let range = SummaryRange::new("2024-01-01", "");
        assert_eq!(serde_json::to_value(&range).unwrap(), json!({"startDate": "2024-01-01"}));
    }
}
