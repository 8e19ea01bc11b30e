//! URL projection of the list state.
//!
//! The URL is read once on mount to seed the state; afterwards it is only
//! written (state → URL).

use super::state::{DateRange, PurchaseOrderListState};
use contracts::domain::a025_purchase_order::PurchaseOrderStatus;
use contracts::domain::common::{is_iso_date, non_blank, PaginationModel, SortModel};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Initial list state carried by the URL. Unparseable values fall back to
/// defaults instead of failing the mount.
#[derive(Clone, Debug, PartialEq)]
pub struct UrlSeed {
    pub pagination: PaginationModel,
    pub sort: SortModel,
    pub grid_filter: Option<Value>,
    pub status: Option<PurchaseOrderStatus>,
    pub range: DateRange,
}

impl UrlSeed {
    pub fn from_query(search: &str, default_page_size: usize) -> Self {
        let params: HashMap<String, String> =
            serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
        let get = |key: &str| params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let page = get("page").and_then(|v| v.parse().ok()).unwrap_or(0);
        let page_size = get("pageSize")
            .and_then(|v| v.parse().ok())
            .filter(|size: &usize| *size > 0)
            .unwrap_or(default_page_size);
        let sort = get("sort")
            .and_then(|v| serde_json::from_str::<SortModel>(v).ok())
            .unwrap_or_default();
        let grid_filter = get("filter").and_then(|v| serde_json::from_str::<Value>(v).ok());
        let status = get("status").and_then(|v| v.parse().ok());
        let date = |key: &str| {
            get(key)
                .filter(|v| is_iso_date(v))
                .unwrap_or_default()
                .to_string()
        };

        Self {
            pagination: PaginationModel::new(page, page_size),
            sort,
            grid_filter,
            status,
            range: DateRange::new(date("startDate"), date("endDate")),
        }
    }

    pub fn into_state(self) -> PurchaseOrderListState {
        let mut state = PurchaseOrderListState::new(self.pagination);
        state.set_status(self.status);
        state.seed_range(self.range);
        state.set_sort(self.sort);
        state.set_grid_filter(self.grid_filter);
        // status seeding resets the page; restore the URL's page last
        state.set_pagination(self.pagination);
        state
    }
}

/// Parameters written back to the URL, in this order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UrlProjection {
    page: usize,
    page_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<PurchaseOrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<String>,
}

impl UrlProjection {
    fn of(state: &PurchaseOrderListState) -> Self {
        let pagination = state.pagination();
        let range = state.applied_range();
        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            sort: Some(state.sort())
                .filter(|sort| !sort.is_empty())
                .and_then(|sort| serde_json::to_string(sort).ok()),
            filter: state.grid_filter().map(|filter| filter.to_string()),
            status: state.filter().status,
            start_date: non_blank(&range.start_date),
            end_date: non_blank(&range.end_date),
        }
    }
}

/// Query string (without `?`) mirroring the current state
pub fn project(state: &PurchaseOrderListState) -> String {
    match serde_qs::to_string(&UrlProjection::of(state)) {
        Ok(query) => query,
        Err(e) => {
            log::warn!("list state not written to URL: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::common::{SortDirection, SortItem};
    use serde_json::json;

    #[test]
    fn test_seed_from_url() {
        let seed = UrlSeed::from_query(
            "?page=3&pageSize=20&status=delivered&startDate=2024-01-01&endDate=2024-01-31\
             &sort=%5B%7B%22field%22%3A%22poDate%22%2C%22sort%22%3A%22asc%22%7D%5D",
            10,
        );
        assert_eq!(seed.pagination, PaginationModel::new(3, 20));
        assert_eq!(seed.status, Some(PurchaseOrderStatus::Delivered));
        assert_eq!(seed.range, DateRange::new("2024-01-01", "2024-01-31"));
        assert_eq!(
            seed.sort,
            vec![SortItem { field: "poDate".into(), sort: SortDirection::Asc }]
        );

        let state = seed.into_state();
        assert_eq!(state.pagination().page, 3);
        assert!(state.filter().is_active);
        assert_eq!(state.draft_range(), state.applied_range());
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let seed = UrlSeed::from_query(
            "page=-1&pageSize=0&status=lost&startDate=yesterday&sort=%5Bbroken&filter=%7B",
            10,
        );
        assert_eq!(seed.pagination, PaginationModel::new(0, 10));
        assert_eq!(seed.status, None);
        assert_eq!(seed.range, DateRange::default());
        assert!(seed.sort.is_empty());
        assert_eq!(seed.grid_filter, None);
    }

    #[test]
    fn test_projection_round_trips() {
        let mut state = UrlSeed::from_query("", 10).into_state();
        state.set_status(Some(PurchaseOrderStatus::Pending));
        state.set_sort(vec![SortItem { field: "total".into(), sort: SortDirection::Desc }]);
        state.set_grid_filter(Some(json!({"items": [{"field": "po", "value": "7"}]})));
        state.set_draft_range("2024-02-01", "");
        state.apply_date_range();
        state.set_pagination(PaginationModel::new(2, 50));

        let query = project(&state);
        assert!(query.starts_with("page=2&pageSize=50&sort="));
        assert!(query.contains("&status=pending&startDate=2024-02-01"));
        assert!(!query.contains("endDate"));

        let reseeded = UrlSeed::from_query(&query, 10).into_state();
        assert_eq!(reseeded.pagination(), state.pagination());
        assert_eq!(reseeded.sort(), state.sort());
        assert_eq!(reseeded.grid_filter(), state.grid_filter());
        assert_eq!(reseeded.filter().status, state.filter().status);
        assert_eq!(reseeded.applied_range(), state.applied_range());
    }

    #[test]
    fn test_plus_and_escapes_in_query_are_decoded() {
        let seed = UrlSeed::from_query(
            "?pageSize=25&filter=%7B%22q%22%3A%22a+b%22%7D&status=pending",
            10,
        );
        assert_eq!(seed.pagination, PaginationModel::new(0, 25));
        assert_eq!(seed.grid_filter, Some(json!({"q": "a b"})));
        assert_eq!(seed.status, Some(PurchaseOrderStatus::Pending));
    }

    #[test]
    fn test_json_params_are_escaped() {
        let mut state = UrlSeed::from_query("", 10).into_state();
        state.set_sort(vec![SortItem { field: "poDate".into(), sort: SortDirection::Desc }]);
        let query = project(&state);
        assert!(query.starts_with("page=0&pageSize=10&sort=%5B"));
        assert!(!query.contains('"'));
    }

    #[test]
    fn test_empty_state_projection() {
        let state = UrlSeed::from_query("", 10).into_state();
        assert_eq!(project(&state), "page=0&pageSize=10");
    }
}
