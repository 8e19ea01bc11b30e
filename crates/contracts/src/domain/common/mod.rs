mod list_model;

pub use list_model::{
    is_iso_date, non_blank, ListPage, PaginationModel, SortDirection, SortItem, SortModel,
};
