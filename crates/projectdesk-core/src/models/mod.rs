//! Data models for API entities.
//!
//! - `Project`, `ProjectInput`: the managed resource and its write payload
//! - `Page`: the server's pagination envelope

pub mod page;
pub mod project;

pub use page::{Page, Pageable, SortInfo};
pub use project::{Project, ProjectInput};
