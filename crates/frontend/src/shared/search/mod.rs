//! Building blocks of the incremental search: suggestion cache,
//! single-flight cancellation slot and per-field debounce timers.

pub mod cache;
pub mod cancellation;
pub mod debounce;

pub use cache::{normalize_key, SuggestionCache};
pub use cancellation::{CancelHandle, CancellationSlot};
pub use debounce::DebounceScheduler;

/// Lifecycle of one asynchronous search path:
/// `Idle → Debouncing → Fetching → {Applied | Discarded | Failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Debouncing,
    Fetching,
    Applied,
    /// Result arrived after the request was superseded or cancelled
    Discarded,
    Failed,
}
