pub mod executor;
pub mod session;
pub mod state;
pub mod suggestions;
pub mod url_state;

use self::executor::ListingResolution;
use self::session::{Followup, SearchSession};
use self::suggestions::{SuggestionResolution, SuggestionStep};
use crate::shared::clock::{Clock, Millis};
use crate::shared::config::Config;
use crate::shared::transport::{FetchOutcome, Transport};
use contracts::domain::a003_counterparty::CounterpartySuggestion;
use contracts::domain::a025_purchase_order::PurchaseOrderStatus;
use contracts::domain::common::{PaginationModel, SortModel};
use serde_json::Value;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Destination of the list's URL projection (browser history in the app)
pub trait UrlSink {
    fn replace_query(&self, query: &str);
}

/// Async glue of the purchase order list.
///
/// Each user intent runs the matching [`SearchSession`] handler, mirrors the
/// state into the URL and then performs whatever request the handler asked
/// for. The session is only borrowed between awaits, never across them, so
/// overlapping requests interleave safely on one thread.
pub struct PurchaseOrderList<T: Transport> {
    session: Rc<RefCell<SearchSession>>,
    transport: Rc<T>,
    url_sink: Rc<dyn UrlSink>,
}

impl<T: Transport> Clone for PurchaseOrderList<T> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            transport: self.transport.clone(),
            url_sink: self.url_sink.clone(),
        }
    }
}

impl<T: Transport> PurchaseOrderList<T> {
    /// Seed from the URL and load the first page
    pub async fn mount(
        config: Config,
        clock: Rc<dyn Clock>,
        transport: Rc<T>,
        url_sink: Rc<dyn UrlSink>,
        location_query: &str,
    ) -> Self {
        let session = SearchSession::mount(config, clock, location_query);
        let list = Self {
            session: Rc::new(RefCell::new(session)),
            transport,
            url_sink,
        };
        list.sync_url();
        list.load_listing().await;
        list
    }

    pub fn session(&self) -> Ref<'_, SearchSession> {
        self.session.borrow()
    }

    /// When the host should call [`tick`](Self::tick) next
    pub fn next_deadline(&self) -> Option<Millis> {
        self.session.borrow().next_deadline()
    }

    // ------------------------------------------------------------------
    // user intents
    // ------------------------------------------------------------------

    pub async fn set_free_text(&self, value: &str) {
        let followup = self.session.borrow_mut().set_free_text(value);
        self.follow(followup).await;
    }

    pub async fn set_entity_name(&self, value: &str) {
        let followup = self.session.borrow_mut().set_entity_name(value);
        self.follow(followup).await;
    }

    pub async fn set_status(&self, status: Option<PurchaseOrderStatus>) {
        let followup = self.session.borrow_mut().set_status(status);
        self.follow(followup).await;
    }

    pub async fn select_suggestion(&self, option: &CounterpartySuggestion) {
        let followup = self.session.borrow_mut().select_suggestion(option);
        self.follow(followup).await;
    }

    pub async fn submit(&self) {
        let followup = self.session.borrow_mut().submit();
        self.follow(followup).await;
    }

    pub async fn clear_all(&self) {
        let followup = self.session.borrow_mut().clear_all();
        self.follow(followup).await;
    }

    pub fn set_draft_range(&self, start_date: &str, end_date: &str) {
        self.session.borrow_mut().set_draft_range(start_date, end_date);
    }

    pub async fn apply_date_range(&self) {
        let followup = self.session.borrow_mut().apply_date_range();
        self.follow(followup).await;
    }

    pub async fn set_pagination(&self, pagination: PaginationModel) {
        let followup = self.session.borrow_mut().set_pagination(pagination);
        self.follow(followup).await;
    }

    pub async fn set_sort(&self, sort: SortModel) {
        let followup = self.session.borrow_mut().set_sort(sort);
        self.follow(followup).await;
    }

    pub async fn set_grid_filter(&self, grid_filter: Option<Value>) {
        let followup = self.session.borrow_mut().set_grid_filter(grid_filter);
        self.follow(followup).await;
    }

    pub async fn refresh(&self) {
        let followup = self.session.borrow_mut().refresh();
        self.follow(followup).await;
    }

    pub async fn retry(&self) {
        let followup = self.session.borrow_mut().retry();
        self.follow(followup).await;
    }

    /// Run every debounced action that is due
    pub async fn tick(&self) {
        let due = self.session.borrow_mut().fire_due();
        for followup in due {
            self.follow(followup).await;
        }
    }

    pub fn teardown(&self) {
        self.session.borrow_mut().teardown();
    }

    // ------------------------------------------------------------------
    // requests
    // ------------------------------------------------------------------

    async fn follow(&self, followup: Followup) {
        self.sync_url();
        match followup {
            Followup::Nothing => {}
            Followup::Listing => {
                self.load_listing().await;
            }
            Followup::Suggestions => {
                self.load_suggestions().await;
            }
        }
    }

    fn sync_url(&self) {
        let update = self.session.borrow_mut().take_url_update();
        if let Some(query) = update {
            self.url_sink.replace_query(&query);
        }
    }

    /// Issue the listing query for the current state and commit the answer
    pub async fn load_listing(&self) -> ListingResolution {
        let ticket = self.session.borrow_mut().begin_listing();
        let ticket = match ticket {
            Ok(ticket) => ticket,
            Err(err) => return self.session.borrow_mut().fail_listing(err),
        };
        let outcome = self.transport.get_json(&ticket.url, None).await;
        self.session.borrow_mut().complete_listing(&ticket, outcome)
    }

    /// Look up customer suggestions for the current customer text
    pub async fn load_suggestions(&self) -> SuggestionResolution {
        let step = self.session.borrow_mut().begin_suggestions();
        let ticket = match step {
            SuggestionStep::Cleared => return SuggestionResolution::Applied { count: 0 },
            SuggestionStep::Cached(count) => return SuggestionResolution::Applied { count },
            SuggestionStep::Fetch(ticket) => ticket,
        };
        let url = self.session.borrow().suggestions_url(&ticket);
        let outcome = match url {
            Ok(url) => self.transport.get_json(&url, Some(&ticket.handle)).await,
            Err(err) => FetchOutcome::Failed(err),
        };
        self.session.borrow_mut().complete_suggestions(&ticket, outcome)
    }
}
