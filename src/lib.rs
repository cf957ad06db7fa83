//! noticewatch - academic announcement watcher.
//!
//! Scrapes staff profile pages and department feeds, detects announcements
//! that have not been delivered yet, and relays each one to a Telegram chat
//! exactly once.

pub mod admin;
pub mod cli;
pub mod config;
pub mod migrations;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod repository;
pub mod schema;
pub mod scrapers;
