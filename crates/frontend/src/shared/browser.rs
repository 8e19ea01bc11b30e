//! Browser bindings: fetch with abort, history URL writes, debounce timers.

use crate::dashboards::d405_records_summary::{CommitResult, RecordsSummaryLoader};
use crate::domain::a025_purchase_order::ui::list::{PurchaseOrderList, UrlSink};
use crate::shared::clock::{Clock, SystemClock};
use crate::shared::config::{load_config, Config, ConfigError};
use crate::shared::date_utils::current_month_range;
use crate::shared::search::CancelHandle;
use crate::shared::transport::{FetchError, FetchOutcome, Transport};
use async_trait::async_trait;
use contracts::dashboards::d405_records_summary::SummaryRange;
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde_json::Value;
use std::rc::Rc;
use web_sys::window;

/// `Transport` over `fetch`; a cancelled handle aborts the request
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn get_json(&self, url: &str, cancel: Option<&CancelHandle>) -> FetchOutcome<Value> {
        if cancel.map_or(false, |h| h.is_cancelled()) {
            return FetchOutcome::Cancelled;
        }

        let controller = match cancel {
            Some(handle) => match web_sys::AbortController::new() {
                Ok(controller) => {
                    let abort = controller.clone();
                    handle.on_cancel(move || abort.abort());
                    Some(controller)
                }
                Err(_) => {
                    log::warn!("AbortController unavailable, request is not abortable");
                    None
                }
            },
            None => None,
        };
        let signal = controller.as_ref().map(|c| c.signal());

        let response = match Request::get(url).abort_signal(signal.as_ref()).send().await {
            Ok(response) => response,
            Err(e) => {
                if cancel.map_or(false, |h| h.is_cancelled()) {
                    return FetchOutcome::Cancelled;
                }
                return FetchOutcome::Failed(FetchError::Network(e.to_string()));
            }
        };

        if !response.ok() {
            return FetchOutcome::Failed(FetchError::Http {
                status: response.status(),
            });
        }

        match response.json::<Value>().await {
            Ok(body) => FetchOutcome::Ok(body),
            Err(_) if cancel.map_or(false, |h| h.is_cancelled()) => FetchOutcome::Cancelled,
            Err(e) => FetchOutcome::Failed(FetchError::Parse(e.to_string())),
        }
    }
}

/// Writes the list projection with `history.replaceState`
#[derive(Debug, Default, Clone, Copy)]
pub struct HistoryUrlSink;

impl UrlSink for HistoryUrlSink {
    fn replace_query(&self, query: &str) {
        let new_url = if query.is_empty() {
            location_path()
        } else {
            format!("?{}", query)
        };

        // Only update URL if it actually changed
        let current = format!("?{}", location_query());
        if current == new_url {
            return;
        }
        if let Some(w) = window() {
            if let Ok(history) = w.history() {
                let _ = history.replace_state_with_url(
                    &wasm_bindgen::JsValue::NULL,
                    "",
                    Some(&new_url),
                );
            }
        }
    }
}

/// Current `location.search` without the leading `?`
pub fn location_query() -> String {
    window()
        .and_then(|w| w.location().search().ok())
        .map(|s| s.trim_start_matches('?').to_string())
        .unwrap_or_default()
}

fn location_path() -> String {
    window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// Fill in an empty API base from the page location
pub fn with_page_api_base(mut config: Config) -> Config {
    if config.api.base_url.is_empty() {
        config.api.base_url = super::api_utils::api_base();
    }
    config
}

/// Sleep until the list's next debounce deadline, fire it, and re-arm while
/// anything is still pending. Call after every intent that may debounce.
pub fn arm_debounce<T: Transport + 'static>(list: &PurchaseOrderList<T>, clock: Rc<dyn Clock>) {
    let Some(deadline) = list.next_deadline() else {
        return;
    };
    let list = list.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let wait = deadline.saturating_sub(clock.now_ms());
        TimeoutFuture::new(u32::try_from(wait).unwrap_or(u32::MAX)).await;
        list.tick().await;
        arm_debounce(&list, clock);
    });
}

/// Mount the purchase order list against the live page
pub async fn mount_purchase_order_list(
    config_overrides: Option<&str>,
) -> Result<PurchaseOrderList<GlooTransport>, ConfigError> {
    let config = with_page_api_base(load_config(config_overrides)?);
    let clock: Rc<dyn Clock> = Rc::new(SystemClock);
    Ok(PurchaseOrderList::mount(
        config,
        clock,
        Rc::new(GlooTransport),
        Rc::new(HistoryUrlSink),
        &location_query(),
    )
    .await)
}

/// Load the records summary for the current month. The loader is returned
/// for later reloads along with the outcome of this first load.
pub async fn load_month_summary(
    config_overrides: Option<&str>,
) -> Result<(RecordsSummaryLoader<GlooTransport>, CommitResult), ConfigError> {
    let config = with_page_api_base(load_config(config_overrides)?);
    let loader = RecordsSummaryLoader::new(config, Rc::new(GlooTransport));
    let (start, end) = current_month_range();
    let result = loader.load(&SummaryRange::new(&start, &end)).await;
    Ok((loader, result))
}
