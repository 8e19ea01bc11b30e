pub mod api_utils;
pub mod clock;
pub mod config;
pub mod date_utils;
pub mod search;
pub mod transport;

#[cfg(target_arch = "wasm32")]
pub mod browser;
