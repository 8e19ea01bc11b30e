use crate::shared::search::FetchPhase;
use crate::shared::transport::FetchOutcome;
use contracts::domain::a025_purchase_order::PurchaseOrderListQuery;
use contracts::domain::common::ListPage;
use serde_json::Value;

/// One issued listing request
#[derive(Clone, Debug, PartialEq)]
pub struct ListingTicket {
    pub seq: u64,
    pub url: String,
    pub query: PurchaseOrderListQuery,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ListingResolution {
    Applied { row_count: u64 },
    /// An answer to a request older than the last one resolved
    Stale,
    Cancelled,
    Failed(String),
}

/// Displayed page of purchase orders and the bookkeeping of listing requests.
///
/// Requests are never cancelled. Each carries a sequence number; once a
/// request has resolved (rows or error), answers to anything issued before
/// it are stale, so an out-of-order answer cannot replace fresher state.
#[derive(Clone, Debug, Default)]
pub struct ListingState {
    pub rows: Vec<Value>,
    pub row_count: u64,
    pub is_loading: bool,
    pub error: Option<String>,
    pub phase: FetchPhase,
    in_flight: usize,
    issued_seq: u64,
    resolved_seq: u64,
}

impl ListingState {
    pub fn begin(&mut self, query: PurchaseOrderListQuery, url: String) -> ListingTicket {
        self.issued_seq += 1;
        self.in_flight += 1;
        self.is_loading = true;
        self.phase = FetchPhase::Fetching;
        ListingTicket {
            seq: self.issued_seq,
            url,
            query,
        }
    }

    pub fn complete(
        &mut self,
        ticket: &ListingTicket,
        outcome: FetchOutcome<Value>,
    ) -> ListingResolution {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.is_loading = self.in_flight > 0;

        let resolution = match outcome {
            FetchOutcome::Ok(_) if ticket.seq < self.resolved_seq => ListingResolution::Stale,
            FetchOutcome::Ok(body) => {
                let page = ListPage::from_response(body);
                self.resolved_seq = ticket.seq;
                self.rows = page.rows;
                self.row_count = page.row_count;
                self.error = None;
                ListingResolution::Applied {
                    row_count: self.row_count,
                }
            }
            FetchOutcome::Cancelled => ListingResolution::Cancelled,
            // a newer request is pending or done; its result decides what is shown
            FetchOutcome::Failed(_) if ticket.seq < self.issued_seq => ListingResolution::Stale,
            FetchOutcome::Failed(err) => {
                let message = err.to_string();
                self.resolved_seq = ticket.seq;
                self.error = Some(message.clone());
                ListingResolution::Failed(message)
            }
        };

        match &resolution {
            ListingResolution::Applied { row_count } => {
                log::debug!("listing #{} applied: {} rows", ticket.seq, row_count);
            }
            ListingResolution::Stale => {
                log::debug!("listing #{} discarded as stale", ticket.seq);
            }
            ListingResolution::Cancelled => {}
            ListingResolution::Failed(message) => {
                log::warn!("listing #{} failed: {}", ticket.seq, message);
            }
        }

        if !self.is_loading {
            self.phase = match &resolution {
                ListingResolution::Applied { .. } => FetchPhase::Applied,
                ListingResolution::Failed(_) => FetchPhase::Failed,
                ListingResolution::Stale | ListingResolution::Cancelled => {
                    if self.error.is_some() {
                        FetchPhase::Failed
                    } else {
                        FetchPhase::Discarded
                    }
                }
            };
        }
        resolution
    }
}
