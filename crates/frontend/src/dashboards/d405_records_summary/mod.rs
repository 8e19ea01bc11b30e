pub mod api;
pub mod merger;

pub use merger::{CommitResult, ParallelFetchMerger, RecordsSummaryLoader};
