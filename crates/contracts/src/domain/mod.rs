pub mod a003_counterparty;
pub mod a025_purchase_order;
pub mod common;
