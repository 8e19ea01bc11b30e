pub mod list;

pub use list::{PurchaseOrderListQuery, PurchaseOrderStatus};
