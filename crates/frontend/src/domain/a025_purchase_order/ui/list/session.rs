use super::executor::{ListingResolution, ListingState, ListingTicket};
use super::state::PurchaseOrderListState;
use super::suggestions::{SuggestionPath, SuggestionResolution, SuggestionState, SuggestionStep, SuggestionTicket};
use super::url_state::{project, UrlSeed};
use crate::shared::api_utils::{api_url, with_query};
use crate::shared::clock::{Clock, Millis};
use crate::shared::config::Config;
use crate::shared::search::DebounceScheduler;
use crate::shared::transport::{FetchError, FetchOutcome};
use contracts::domain::a003_counterparty::CounterpartySuggestion;
use contracts::domain::a025_purchase_order::PurchaseOrderStatus;
use contracts::domain::common::{PaginationModel, SortModel};
use serde_json::Value;
use std::rc::Rc;

/// Debounced input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    FreeText,
    EntityName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceAction {
    RunListing,
    LookupSuggestions,
}

/// Work a handler leaves for the async layer
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Followup {
    Nothing,
    Listing,
    Suggestions,
}

/// Everything the purchase order list owns for its mounted lifetime:
/// filter state, listing and suggestion slices, debounce timers, the
/// suggestion cache and the cancellation slot.
///
/// Handlers are synchronous and return a [`Followup`]; requests are split
/// into `begin_*` (build the request, mark loading) and `complete_*`
/// (guard against stale answers, commit) so no borrow is ever held across
/// a network await.
pub struct SearchSession {
    config: Config,
    clock: Rc<dyn Clock>,
    store: PurchaseOrderListState,
    listing: ListingState,
    suggestions: SuggestionPath,
    timers: DebounceScheduler<SearchField, DebounceAction>,
    written_url: Option<String>,
}

impl SearchSession {
    /// Create the session, seeding state from the page URL query
    pub fn mount(config: Config, clock: Rc<dyn Clock>, location_query: &str) -> Self {
        let store = UrlSeed::from_query(location_query, config.search.default_page_size).into_state();
        let suggestions = SuggestionPath::new(
            config.cache.capacity,
            config.cache.ttl_ms,
            config.search.min_query_len,
            config.search.suggestion_page_size,
        );
        Self {
            config,
            clock,
            store,
            listing: ListingState::default(),
            suggestions,
            timers: DebounceScheduler::new(),
            written_url: Some(location_query.trim_start_matches('?').to_string()),
        }
    }

    fn now(&self) -> Millis {
        self.clock.now_ms()
    }

    // ------------------------------------------------------------------
    // accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> &PurchaseOrderListState {
        &self.store
    }

    pub fn listing(&self) -> &ListingState {
        &self.listing
    }

    pub fn suggestions(&self) -> &SuggestionState {
        &self.suggestions.state
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    pub fn is_pending(&self, field: SearchField) -> bool {
        self.timers.is_pending(field)
    }

    // ------------------------------------------------------------------
    // filter handlers
    // ------------------------------------------------------------------

    pub fn set_free_text(&mut self, value: &str) -> Followup {
        if self.store.set_free_text(value) {
            self.timers.cancel(SearchField::FreeText);
            return Followup::Listing;
        }
        if self.store.filter().is_active {
            let (delay, now) = (self.config.search.search_debounce_ms, self.now());
            self.timers
                .schedule(SearchField::FreeText, DebounceAction::RunListing, delay, now);
        } else {
            self.timers.cancel(SearchField::FreeText);
        }
        Followup::Nothing
    }

    pub fn set_entity_name(&mut self, value: &str) -> Followup {
        let became_inactive = self.store.set_entity_name(value);
        if self.suggestions.is_too_short(value) {
            self.timers.cancel(SearchField::EntityName);
            self.suggestions.clear();
        } else {
            let (delay, now) = (self.config.search.suggestion_debounce_ms, self.now());
            self.timers.schedule(
                SearchField::EntityName,
                DebounceAction::LookupSuggestions,
                delay,
                now,
            );
            self.suggestions.mark_debouncing();
        }
        if became_inactive {
            self.timers.cancel(SearchField::FreeText);
            return Followup::Listing;
        }
        Followup::Nothing
    }

    /// Dropdown pick: never debounced, always searches right away
    pub fn set_status(&mut self, status: Option<PurchaseOrderStatus>) -> Followup {
        self.timers.cancel_all();
        self.store.set_status(status);
        Followup::Listing
    }

    pub fn select_suggestion(&mut self, option: &CounterpartySuggestion) -> Followup {
        self.timers.cancel_all();
        self.suggestions.clear();
        self.store.commit_entity(&option.name);
        Followup::Listing
    }

    /// Enter key in any filter field
    pub fn submit(&mut self) -> Followup {
        self.timers.cancel_all();
        self.store.submit();
        Followup::Listing
    }

    /// Reset every filter. The unfiltered reload comes from the search
    /// becoming inactive, not from clearing itself.
    pub fn clear_all(&mut self) -> Followup {
        self.timers.cancel_all();
        self.suggestions.clear();
        if self.store.clear_all() {
            Followup::Listing
        } else {
            Followup::Nothing
        }
    }

    pub fn set_draft_range(&mut self, start_date: &str, end_date: &str) {
        self.store.set_draft_range(start_date, end_date);
    }

    pub fn apply_date_range(&mut self) -> Followup {
        if self.store.apply_date_range() {
            Followup::Listing
        } else {
            Followup::Nothing
        }
    }

    pub fn set_pagination(&mut self, pagination: PaginationModel) -> Followup {
        self.store.set_pagination(pagination);
        Followup::Listing
    }

    pub fn set_sort(&mut self, sort: SortModel) -> Followup {
        self.store.set_sort(sort);
        Followup::Listing
    }

    /// Client-side grid filter; only mirrored into the URL
    pub fn set_grid_filter(&mut self, grid_filter: Option<Value>) -> Followup {
        self.store.set_grid_filter(grid_filter);
        Followup::Nothing
    }

    pub fn refresh(&mut self) -> Followup {
        Followup::Listing
    }

    /// Re-run the listing after a failure
    pub fn retry(&mut self) -> Followup {
        if self.listing.error.is_some() {
            Followup::Listing
        } else {
            Followup::Nothing
        }
    }

    /// Fire every debounce timer that is due
    pub fn fire_due(&mut self) -> Vec<Followup> {
        let now = self.now();
        self.timers
            .fire_due(now)
            .into_iter()
            .map(|(_, action)| match action {
                DebounceAction::RunListing => Followup::Listing,
                DebounceAction::LookupSuggestions => Followup::Suggestions,
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // requests
    // ------------------------------------------------------------------

    pub fn listing_url(&self) -> Result<String, FetchError> {
        let base = api_url(&self.config.api.base_url, &self.config.api.purchase_orders_path);
        with_query(&base, &self.store.query())
    }

    pub fn begin_listing(&mut self) -> Result<ListingTicket, FetchError> {
        let url = self.listing_url()?;
        Ok(self.listing.begin(self.store.query(), url))
    }

    pub fn complete_listing(
        &mut self,
        ticket: &ListingTicket,
        outcome: FetchOutcome<Value>,
    ) -> ListingResolution {
        self.listing.complete(ticket, outcome)
    }

    /// Record a request that could not even be built
    pub fn fail_listing(&mut self, err: FetchError) -> ListingResolution {
        let message = err.to_string();
        log::warn!("listing request not sent: {}", message);
        self.listing.error = Some(message.clone());
        ListingResolution::Failed(message)
    }

    /// Start a lookup for the customer text as it is now
    pub fn begin_suggestions(&mut self) -> SuggestionStep {
        let now = self.now();
        let query = self.store.filter().customer_name_text.clone();
        self.suggestions.begin(&query, now)
    }

    pub fn suggestions_url(&self, ticket: &SuggestionTicket) -> Result<String, FetchError> {
        let base = api_url(&self.config.api.base_url, &self.config.api.customers_search_path);
        with_query(&base, &ticket.query)
    }

    pub fn complete_suggestions(
        &mut self,
        ticket: &SuggestionTicket,
        outcome: FetchOutcome<Value>,
    ) -> SuggestionResolution {
        let now = self.now();
        self.suggestions.complete(ticket, outcome, now)
    }

    // ------------------------------------------------------------------
    // URL / lifecycle
    // ------------------------------------------------------------------

    /// Current URL projection (query string without `?`)
    pub fn url_query(&self) -> String {
        project(&self.store)
    }

    /// The projection if it differs from what was last written
    pub fn take_url_update(&mut self) -> Option<String> {
        let query = self.url_query();
        if self.written_url.as_deref() == Some(query.as_str()) {
            return None;
        }
        self.written_url = Some(query.clone());
        Some(query)
    }

    /// Drop timers, the live request and the cache
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.suggestions.teardown();
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
