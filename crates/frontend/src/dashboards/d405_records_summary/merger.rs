use super::api::{summary_requests, SummaryRequest};
use crate::shared::config::Config;
use crate::shared::transport::{FetchOutcome, Transport};
use contracts::dashboards::d405_records_summary::{RecordsSummary, SummaryRange};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum CommitResult {
    /// A structurally different view was committed
    Changed,
    /// Same content as before; the previous `Rc` is kept
    Unchanged,
    /// At least one request failed; the zero view was committed
    Failed(String),
    Cancelled,
    /// A later load was issued; this one was dropped
    Stale,
}

/// Assign `value` at a dotted key path. Without a path the value's own keys
/// are merged into `root`.
pub fn assign_path(root: &mut Map<String, Value>, path: Option<&str>, value: Value) {
    let segments: Vec<&str> = path
        .map(|p| p.split('.').filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let Some((last, parents)) = segments.split_last() else {
        match value {
            Value::Object(map) => root.extend(map),
            other => log::warn!("summary part is not an object, ignored: {}", other),
        }
        return;
    };

    let mut target = root;
    for segment in parents {
        let slot = target
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(map) = slot else {
            return;
        };
        target = map;
    }
    target.insert(last.to_string(), value);
}

/// Committed view model of several parallel aggregate fetches.
///
/// All requests must succeed for a merged view to be committed; any failure
/// commits the default (all-zero) view instead. A commit is skipped when
/// the new view equals the current one, keeping the existing `Rc`. Only the
/// most recently begun load may settle; older ones resolve to `Stale`.
#[derive(Debug)]
pub struct ParallelFetchMerger<V> {
    view: Rc<V>,
    pub is_loading: bool,
    pub error: Option<String>,
    issued_seq: u64,
}

impl<V: Default> Default for ParallelFetchMerger<V> {
    fn default() -> Self {
        Self {
            view: Rc::new(V::default()),
            is_loading: false,
            error: None,
            issued_seq: 0,
        }
    }
}

impl<V: DeserializeOwned + Default + PartialEq> ParallelFetchMerger<V> {
    pub fn view(&self) -> Rc<V> {
        self.view.clone()
    }

    /// Start a load; its sequence number must be passed to `settle`/`fail`
    pub fn begin(&mut self) -> u64 {
        self.issued_seq += 1;
        self.is_loading = true;
        self.issued_seq
    }

    fn is_stale(&self, seq: u64) -> bool {
        if seq < self.issued_seq {
            log::debug!("summary load #{} discarded as stale", seq);
            return true;
        }
        false
    }

    /// Commit `next` unless it equals the current view
    pub fn commit(&mut self, next: V) -> CommitResult {
        if *self.view == next {
            CommitResult::Unchanged
        } else {
            self.view = Rc::new(next);
            CommitResult::Changed
        }
    }

    /// Merge the settled outcomes of load `seq`, `mounts[i]` placing `outcomes[i]`
    pub fn settle(
        &mut self,
        seq: u64,
        mounts: &[Option<String>],
        outcomes: Vec<FetchOutcome<Value>>,
    ) -> CommitResult {
        if self.is_stale(seq) {
            return CommitResult::Stale;
        }
        self.is_loading = false;

        let mut merged = Map::new();
        let mut cancelled = false;
        for (mount, outcome) in mounts.iter().zip(outcomes) {
            match outcome {
                FetchOutcome::Ok(body) => assign_path(&mut merged, mount.as_deref(), body),
                FetchOutcome::Cancelled => cancelled = true,
                FetchOutcome::Failed(err) => return self.fail(seq, err.to_string()),
            }
        }
        if cancelled {
            return CommitResult::Cancelled;
        }

        match serde_json::from_value::<V>(Value::Object(merged)) {
            Ok(next) => {
                self.error = None;
                self.commit(next)
            }
            Err(e) => self.fail(seq, format!("Failed to parse response: {}", e)),
        }
    }

    pub fn fail(&mut self, seq: u64, message: String) -> CommitResult {
        if self.is_stale(seq) {
            return CommitResult::Stale;
        }
        log::warn!("summary load failed: {}", message);
        self.is_loading = false;
        self.error = Some(message.clone());
        let _ = self.commit(V::default());
        CommitResult::Failed(message)
    }
}

/// Loads the records dashboard summary from every configured endpoint at once
pub struct RecordsSummaryLoader<T: Transport> {
    config: Config,
    transport: Rc<T>,
    merger: Rc<RefCell<ParallelFetchMerger<RecordsSummary>>>,
}

impl<T: Transport> RecordsSummaryLoader<T> {
    pub fn new(config: Config, transport: Rc<T>) -> Self {
        Self {
            config,
            transport,
            merger: Rc::new(RefCell::new(ParallelFetchMerger::default())),
        }
    }

    pub fn merger(&self) -> Ref<'_, ParallelFetchMerger<RecordsSummary>> {
        self.merger.borrow()
    }

    pub fn view(&self) -> Rc<RecordsSummary> {
        self.merger.borrow().view()
    }

    pub async fn load(&self, range: &SummaryRange) -> CommitResult {
        let seq = self.merger.borrow_mut().begin();
        let requests: Vec<SummaryRequest> = match summary_requests(&self.config, range) {
            Ok(requests) => requests,
            Err(err) => return self.merger.borrow_mut().fail(seq, err.to_string()),
        };

        let fetches = requests
            .iter()
            .map(|request| self.transport.get_json(&request.url, None));
        let outcomes = futures::future::join_all(fetches).await;

        let mounts: Vec<Option<String>> = requests.into_iter().map(|r| r.mount).collect();
        self.merger.borrow_mut().settle(seq, &mounts, outcomes)
    }
}
