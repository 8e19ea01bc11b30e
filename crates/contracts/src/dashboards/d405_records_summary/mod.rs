pub mod dto;

pub use dto::{InvoiceTotals, PurchaseOrderTotals, RecordsSummary, SummaryRange};
