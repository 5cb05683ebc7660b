//! Practicum homework API module.
//!
//! Fetches homework statuses, checks the response shape, and turns
//! individual records into notification text.

mod client;
mod homework;

pub use client::PracticumClient;
pub use homework::{Report, extract_homeworks, next_cursor, parse_status};
