//! In-memory transport and URL sink for async tests.

use crate::domain::a025_purchase_order::ui::list::UrlSink;
use crate::shared::search::CancelHandle;
use crate::shared::transport::{FetchError, FetchOutcome, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::cell::RefCell;
use tokio::sync::oneshot;

enum Reply {
    Always(FetchOutcome<Value>),
    Once(FetchOutcome<Value>),
    Gate(oneshot::Receiver<FetchOutcome<Value>>),
}

struct Route {
    prefix: String,
    reply: Reply,
}

/// Answers requests by URL prefix, first matching route wins.
///
/// `reply` answers forever, `reply_once` and `gate` are consumed by one
/// request. A gated request stays pending until the returned sender fires.
/// Cancellation signals are ignored so stale answers really arrive.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: RefCell<Vec<Route>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, prefix: &str, outcome: FetchOutcome<Value>) {
        self.push(prefix, Reply::Always(outcome));
    }

    pub fn reply_once(&self, prefix: &str, outcome: FetchOutcome<Value>) {
        self.push(prefix, Reply::Once(outcome));
    }

    pub fn gate(&self, prefix: &str) -> oneshot::Sender<FetchOutcome<Value>> {
        let (tx, rx) = oneshot::channel();
        self.push(prefix, Reply::Gate(rx));
        tx
    }

    fn push(&self, prefix: &str, reply: Reply) {
        self.routes.borrow_mut().push(Route {
            prefix: prefix.to_string(),
            reply,
        });
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, prefix: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|url| url.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn take_reply(&self, url: &str) -> Option<Reply> {
        let mut routes = self.routes.borrow_mut();
        let index = routes.iter().position(|r| url.starts_with(&r.prefix))?;
        if let Reply::Always(outcome) = &routes[index].reply {
            return Some(Reply::Always(outcome.clone()));
        }
        Some(routes.remove(index).reply)
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn get_json(&self, url: &str, _cancel: Option<&CancelHandle>) -> FetchOutcome<Value> {
        self.calls.borrow_mut().push(url.to_string());
        match self.take_reply(url) {
            Some(Reply::Always(outcome)) | Some(Reply::Once(outcome)) => outcome,
            Some(Reply::Gate(rx)) => rx.await.unwrap_or(FetchOutcome::Cancelled),
            None => FetchOutcome::Failed(FetchError::Http { status: 404 }),
        }
    }
}

#[derive(Default)]
pub struct RecordingUrlSink {
    writes: RefCell<Vec<String>>,
}

impl RecordingUrlSink {
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }
}

impl UrlSink for RecordingUrlSink {
    fn replace_query(&self, query: &str) {
        self.writes.borrow_mut().push(query.to_string());
    }
}
