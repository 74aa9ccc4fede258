//! API request handlers.

pub mod content;
pub mod entry;
pub mod listing;
