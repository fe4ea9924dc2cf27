//! Project listing and CRUD.

pub mod query;
pub mod service;

pub use query::{ListProjectsParams, SortDirection, SortField, SortSpec, DEFAULT_PAGE_SIZE};
pub use service::ProjectService;
