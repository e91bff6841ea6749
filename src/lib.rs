//! creditlens - credit memo analysis
//!
//! Talks to a remote extraction service that turns a financial PDF into an
//! [`models::AnalysisRecord`], then works on that record locally: renders
//! Markdown and Word-compatible credit memos ([`report`]), exports them
//! ([`export`]), overlays analyst edits ([`overlay`]) and scores borrower
//! risk ([`risk`]).

pub mod cli;
pub mod client;
pub mod config;
pub mod export;
pub mod models;
pub mod overlay;
pub mod report;
pub mod risk;
pub mod search;
