//! Utility functions for display formatting and date input.

pub mod date;
pub mod format;

pub use date::{format_display_date, mask_date_input, parse_display_date};
pub use format::{format_money, format_timestamp, truncate_string};
