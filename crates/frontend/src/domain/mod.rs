pub mod a025_purchase_order;
