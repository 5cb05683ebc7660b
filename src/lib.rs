//! Homework Status Bot Library
//!
//! A Telegram bot that watches Practicum homework reviews.
//!
//! This crate provides the core functionality for:
//! - Loading credentials, settings, and the verdict table
//! - Polling the homework status API and validating responses
//! - Translating review statuses into chat messages
//! - Delivering notifications to Telegram without stopping on failures

pub mod config;
pub mod error;
pub mod poller;
pub mod practicum;
pub mod telegram;

pub use error::{BotError, ErrorKind};
