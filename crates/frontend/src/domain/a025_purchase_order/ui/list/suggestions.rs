use crate::shared::clock::Millis;
use crate::shared::search::{normalize_key, CancelHandle, CancellationSlot, FetchPhase, SuggestionCache};
use crate::shared::transport::FetchOutcome;
use contracts::domain::a003_counterparty::{
    CounterpartySearchQuery, CounterpartySearchResponse, CounterpartySuggestion,
};
use serde_json::Value;

/// What the customer autocomplete dropdown shows
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SuggestionState {
    pub options: Vec<CounterpartySuggestion>,
    pub is_loading: bool,
    pub phase: FetchPhase,
    pub error: Option<String>,
}

#[derive(Debug)]
pub enum SuggestionStep {
    /// Query too short; list cleared, nothing to fetch
    Cleared,
    /// Served from cache with this many options
    Cached(usize),
    Fetch(SuggestionTicket),
}

/// A dispatched suggestion request
#[derive(Clone, Debug)]
pub struct SuggestionTicket {
    pub handle: CancelHandle,
    pub key: String,
    pub query: CounterpartySearchQuery,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SuggestionResolution {
    Applied { count: usize },
    /// Superseded or cancelled; nothing was written
    Discarded,
    Failed(String),
}

/// Customer autocomplete: cache lookup, single-flight fetch and the
/// "is this still the live request?" guard on every completion
#[derive(Debug)]
pub struct SuggestionPath {
    pub state: SuggestionState,
    cache: SuggestionCache<CounterpartySuggestion>,
    slot: CancellationSlot,
    min_query_len: usize,
    page_size: usize,
}

impl SuggestionPath {
    pub fn new(capacity: usize, ttl_ms: Millis, min_query_len: usize, page_size: usize) -> Self {
        Self {
            state: SuggestionState::default(),
            cache: SuggestionCache::new(capacity, ttl_ms),
            slot: CancellationSlot::new(),
            min_query_len,
            page_size,
        }
    }

    pub fn is_too_short(&self, raw_query: &str) -> bool {
        normalize_key(raw_query).chars().count() < self.min_query_len
    }

    pub fn mark_debouncing(&mut self) {
        self.state.phase = FetchPhase::Debouncing;
    }

    pub fn begin(&mut self, raw_query: &str, now: Millis) -> SuggestionStep {
        if self.is_too_short(raw_query) {
            self.clear();
            return SuggestionStep::Cleared;
        }

        let key = normalize_key(raw_query);
        if let Some(options) = self.cache.lookup(&key, now) {
            let options = options.to_vec();
            log::debug!("suggestions for '{}' served from cache", key);
            // a cache hit supersedes whatever was in flight
            self.slot.cancel();
            let count = options.len();
            self.state = SuggestionState {
                options,
                is_loading: false,
                phase: FetchPhase::Applied,
                error: None,
            };
            return SuggestionStep::Cached(count);
        }

        let handle = self.slot.acquire();
        self.state.is_loading = true;
        self.state.phase = FetchPhase::Fetching;
        SuggestionStep::Fetch(SuggestionTicket {
            handle,
            query: CounterpartySearchQuery::first_page(raw_query, self.page_size),
            key,
        })
    }

    pub fn complete(
        &mut self,
        ticket: &SuggestionTicket,
        outcome: FetchOutcome<Value>,
        now: Millis,
    ) -> SuggestionResolution {
        if !self.slot.is_live(&ticket.handle) {
            log::debug!("suggestions for '{}' discarded as stale", ticket.key);
            return SuggestionResolution::Discarded;
        }
        self.slot.release(&ticket.handle);
        self.state.is_loading = false;

        match outcome {
            FetchOutcome::Ok(body) => {
                let options = CounterpartySearchResponse::suggestions_from(body);
                if let Some(evicted) = self.cache.store(&ticket.key, options.clone(), now) {
                    log::debug!("suggestion cache full, evicted '{}'", evicted);
                }
                let count = options.len();
                self.state.options = options;
                self.state.error = None;
                self.state.phase = FetchPhase::Applied;
                SuggestionResolution::Applied { count }
            }
            FetchOutcome::Cancelled => {
                self.state.phase = FetchPhase::Discarded;
                SuggestionResolution::Discarded
            }
            FetchOutcome::Failed(err) => {
                let message = err.to_string();
                log::warn!("suggestions for '{}' failed: {}", ticket.key, message);
                self.state.options.clear();
                self.state.error = Some(message.clone());
                self.state.phase = FetchPhase::Failed;
                SuggestionResolution::Failed(message)
            }
        }
    }

    /// Cancel the live request and empty the list
    pub fn clear(&mut self) {
        self.slot.cancel();
        self.state = SuggestionState::default();
    }

    pub fn has_live_request(&self) -> bool {
        self.slot.has_live()
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn teardown(&mut self) {
        self.clear();
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::transport::FetchError;
    use serde_json::json;

    fn path() -> SuggestionPath {
        SuggestionPath::new(50, 300_000, 2, 10)
    }

    fn customers(names: &[&str]) -> Value {
        let list: Vec<Value> = names
            .iter()
            .enumerate()
            .map(|(i, n)| json!({"id": i, "name": n}))
            .collect();
        json!({"success": true, "customers": list})
    }

    fn expect_fetch(step: SuggestionStep) -> SuggestionTicket {
        match step {
            SuggestionStep::Fetch(ticket) => ticket,
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn test_short_query_clears_without_fetch() {
        let mut path = path();
        path.state.options = vec![CounterpartySuggestion { id: "1".into(), name: "A".into() }];
        assert!(matches!(path.begin(" a ", 0), SuggestionStep::Cleared));
        assert!(path.state.options.is_empty());
        assert!(!path.has_live_request());
    }

    #[test]
    fn test_second_lookup_hits_cache_without_loading() {
        let mut path = path();
        let ticket = expect_fetch(path.begin("Acme", 0));
        assert!(path.state.is_loading);
        assert_eq!(ticket.query.search, "Acme");
        path.complete(&ticket, FetchOutcome::Ok(customers(&["Acme Ltd"])), 10);

        assert!(matches!(path.begin("  ACME", 20), SuggestionStep::Cached(1)));
        assert!(!path.state.is_loading);
        assert_eq!(path.state.options[0].name, "Acme Ltd");
    }

    #[test]
    fn test_expired_entry_is_fetched_again() {
        let mut path = path();
        let ticket = expect_fetch(path.begin("acme", 0));
        path.complete(&ticket, FetchOutcome::Ok(customers(&["Acme"])), 0);
        assert!(matches!(path.begin("acme", 300_000), SuggestionStep::Fetch(_)));
    }

    #[test]
    fn test_superseded_result_never_overwrites() {
        let mut path = path();
        let a = expect_fetch(path.begin("ac", 0));
        let b = expect_fetch(path.begin("acm", 0));
        assert!(a.handle.is_cancelled());

        // B first, then A
        path.complete(&b, FetchOutcome::Ok(customers(&["Acme"])), 5);
        let res = path.complete(&a, FetchOutcome::Ok(customers(&["Ace", "Acorn"])), 6);
        assert_eq!(res, SuggestionResolution::Discarded);
        assert_eq!(path.state.options.len(), 1);

        // A first, then B
        let mut path = super::tests::path();
        let a = expect_fetch(path.begin("ac", 0));
        let b = expect_fetch(path.begin("acm", 0));
        assert_eq!(
            path.complete(&a, FetchOutcome::Ok(customers(&["Ace", "Acorn"])), 5),
            SuggestionResolution::Discarded
        );
        assert!(path.state.is_loading);
        path.complete(&b, FetchOutcome::Ok(customers(&["Acme"])), 6);
        assert_eq!(path.state.options[0].name, "Acme");
        assert!(!path.state.is_loading);
        // the stale answer was not cached either
        assert_eq!(path.cached_len(), 1);
    }

    #[test]
    fn test_failure_is_recorded() {
        let mut path = path();
        let ticket = expect_fetch(path.begin("acme", 0));
        let res = path.complete(
            &ticket,
            FetchOutcome::Failed(FetchError::Network("offline".into())),
            1,
        );
        assert_eq!(res, SuggestionResolution::Failed("Network error: offline".into()));
        assert_eq!(path.state.phase, FetchPhase::Failed);
        assert!(!path.state.is_loading);
        assert_eq!(path.cached_len(), 0);
    }

    #[test]
    fn test_clear_makes_in_flight_result_stale() {
        let mut path = path();
        let ticket = expect_fetch(path.begin("acme", 0));
        path.clear();
        assert!(ticket.handle.is_cancelled());
        assert_eq!(
            path.complete(&ticket, FetchOutcome::Cancelled, 1),
            SuggestionResolution::Discarded
        );
        assert_eq!(path.state, SuggestionState::default());
    }
}
