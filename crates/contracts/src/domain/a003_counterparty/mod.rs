pub mod search;

pub use search::{CounterpartySearchQuery, CounterpartySearchResponse, CounterpartySuggestion};
