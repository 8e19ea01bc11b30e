//! DTOs shared between the dashboard frontend and the REST backend.

pub mod dashboards;
pub mod domain;
