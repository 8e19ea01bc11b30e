use contracts::domain::a025_purchase_order::{PurchaseOrderListQuery, PurchaseOrderStatus};
use contracts::domain::common::{PaginationModel, SortModel};
use serde_json::Value;

/// Search criteria typed into the list's filter panel
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub po_number_text: String,
    pub customer_name_text: String,
    pub status: Option<PurchaseOrderStatus>,
    /// True while a search is active; derived from the fields and also
    /// forced on by discrete actions (status pick, suggestion pick, submit)
    pub is_active: bool,
}

impl FilterState {
    pub fn has_criteria(&self) -> bool {
        !self.po_number_text.trim().is_empty()
            || !self.customer_name_text.trim().is_empty()
            || self.status.is_some()
    }
}

/// Inclusive `YYYY-MM-DD` bounds; blank means unbounded
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

impl DateRange {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }
}

/// Canonical filter / pagination / sort state of the purchase order list.
///
/// Every mutation of search criteria moves back to the first page and
/// leaves the page size alone.
#[derive(Clone, Debug, PartialEq)]
pub struct PurchaseOrderListState {
    filter: FilterState,
    draft_range: DateRange,
    applied_range: DateRange,
    pagination: PaginationModel,
    sort: SortModel,
    grid_filter: Option<Value>,
}

impl PurchaseOrderListState {
    pub fn new(pagination: PaginationModel) -> Self {
        Self {
            filter: FilterState::default(),
            draft_range: DateRange::default(),
            applied_range: DateRange::default(),
            pagination,
            sort: SortModel::new(),
            grid_filter: None,
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn draft_range(&self) -> &DateRange {
        &self.draft_range
    }

    pub fn applied_range(&self) -> &DateRange {
        &self.applied_range
    }

    pub fn pagination(&self) -> PaginationModel {
        self.pagination
    }

    pub fn sort(&self) -> &SortModel {
        &self.sort
    }

    pub fn grid_filter(&self) -> Option<&Value> {
        self.grid_filter.as_ref()
    }

    /// Free-text PO number. Returns true when the search just became inactive.
    pub fn set_free_text(&mut self, value: &str) -> bool {
        self.filter.po_number_text = value.to_string();
        self.pagination = self.pagination.first_page();
        self.recompute_active()
    }

    /// Typed customer name. Returns true when the search just became inactive.
    pub fn set_entity_name(&mut self, value: &str) -> bool {
        self.filter.customer_name_text = value.to_string();
        self.pagination = self.pagination.first_page();
        self.recompute_active()
    }

    /// Choosing a status activates the search; choosing "none" falls back to
    /// the derived flag. Returns true when the search just became inactive.
    pub fn set_status(&mut self, status: Option<PurchaseOrderStatus>) -> bool {
        self.filter.status = status;
        self.pagination = self.pagination.first_page();
        if status.is_some() {
            self.filter.is_active = true;
            false
        } else {
            self.recompute_active()
        }
    }

    /// Customer picked from the autocomplete list
    pub fn commit_entity(&mut self, name: &str) {
        self.filter.customer_name_text = name.to_string();
        self.filter.is_active = true;
        self.pagination = self.pagination.first_page();
    }

    /// Explicit submit (Enter). Activates the search when there is anything to search for.
    pub fn submit(&mut self) {
        self.pagination = self.pagination.first_page();
        if self.filter.has_criteria() {
            self.filter.is_active = true;
        }
    }

    /// Reset all criteria. Returns true if a search was active before.
    pub fn clear_all(&mut self) -> bool {
        let was_active = self.filter.is_active;
        self.filter = FilterState::default();
        self.pagination = self.pagination.first_page();
        was_active
    }

    pub fn set_draft_range(&mut self, start_date: &str, end_date: &str) {
        self.draft_range = DateRange::new(start_date, end_date);
    }

    /// Commit the draft range. Returns false (and changes nothing) when the
    /// draft equals the applied range.
    pub fn apply_date_range(&mut self) -> bool {
        if self.draft_range == self.applied_range {
            return false;
        }
        self.applied_range = self.draft_range.clone();
        self.pagination = self.pagination.first_page();
        true
    }

    /// Seed both the draft and the applied range (mount only)
    pub fn seed_range(&mut self, range: DateRange) {
        self.draft_range = range.clone();
        self.applied_range = range;
    }

    pub fn set_pagination(&mut self, pagination: PaginationModel) {
        self.pagination = PaginationModel::new(pagination.page, pagination.page_size);
    }

    pub fn set_sort(&mut self, sort: SortModel) {
        self.sort = sort;
    }

    pub fn set_grid_filter(&mut self, grid_filter: Option<Value>) {
        self.grid_filter = grid_filter;
    }

    /// Listing query for the current criteria, applied range and page
    pub fn query(&self) -> PurchaseOrderListQuery {
        PurchaseOrderListQuery::new(self.pagination.page, self.pagination.page_size)
            .with_dates(&self.applied_range.start_date, &self.applied_range.end_date)
            .with_search(&self.filter.po_number_text)
            .with_customer(&self.filter.customer_name_text)
            .with_status(self.filter.status)
    }

    fn recompute_active(&mut self) -> bool {
        let was_active = self.filter.is_active;
        self.filter.is_active = self.filter.has_criteria();
        was_active && !self.filter.is_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page(page: usize) -> PurchaseOrderListState {
        let mut state = PurchaseOrderListState::new(PaginationModel::new(0, 25));
        state.set_pagination(PaginationModel::new(page, 25));
        state
    }

    #[test]
    fn test_every_filter_mutation_resets_page_only() {
        let mutations: Vec<Box<dyn Fn(&mut PurchaseOrderListState)>> = vec![
            Box::new(|s| {
                s.set_free_text("PO-1");
            }),
            Box::new(|s| {
                s.set_entity_name("Acme");
            }),
            Box::new(|s| {
                s.set_status(Some(PurchaseOrderStatus::Delivered));
            }),
            Box::new(|s| s.commit_entity("Acme Ltd")),
            Box::new(|s| {
                s.clear_all();
            }),
            Box::new(|s| {
                s.set_draft_range("2024-01-01", "2024-01-31");
                s.apply_date_range();
            }),
        ];
        for mutate in mutations {
            let mut state = on_page(4);
            mutate(&mut state);
            assert_eq!(state.pagination(), PaginationModel::new(0, 25));
        }
    }

    #[test]
    fn test_active_flag_is_derived() {
        let mut state = on_page(0);
        assert!(!state.set_free_text("P"));
        assert!(state.filter().is_active);
        assert!(state.set_free_text("  "));
        assert!(!state.filter().is_active);
    }

    #[test]
    fn test_status_forces_active() {
        let mut state = on_page(0);
        state.set_status(Some(PurchaseOrderStatus::Pending));
        assert!(state.filter().is_active);
        assert!(state.set_status(None));
        assert!(!state.filter().is_active);
    }

    #[test]
    fn test_clear_all_resets_fields() {
        let mut state = on_page(3);
        state.set_free_text("PO");
        state.set_entity_name("Ac");
        state.set_status(Some(PurchaseOrderStatus::Pending));
        assert!(state.clear_all());
        assert_eq!(state.filter(), &FilterState::default());
        assert!(!state.clear_all());
    }

    #[test]
    fn test_apply_unchanged_range_is_noop() {
        let mut state = on_page(2);
        state.set_draft_range("", "");
        assert!(!state.apply_date_range());
        assert_eq!(state.pagination().page, 2);

        state.set_draft_range("2024-01-01", "2024-01-31");
        assert_eq!(state.applied_range(), &DateRange::default());
        assert!(state.apply_date_range());
        assert_eq!(state.applied_range(), &DateRange::new("2024-01-01", "2024-01-31"));
        assert!(!state.apply_date_range());
    }

    #[test]
    fn test_query_uses_applied_range_not_draft() {
        let mut state = on_page(0);
        state.set_draft_range("2024-05-01", "2024-05-31");
        state.set_free_text(" PO-9 ");
        let query = state.query();
        assert_eq!(query.start_date, None);
        assert_eq!(query.search.as_deref(), Some("PO-9"));
        assert_eq!(query.size, 25);
    }
}
