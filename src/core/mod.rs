//! Message selection and caching.
//!
//! This module contains:
//! - [`filter`] - Message filtering by date range and sender
//! - [`cache`] - Caller-owned cache of parsed exports with immutable snapshots
//!
//! # Quick Start
//!
//! ```rust
//! use chatpulse::core::{ChatCache, FilterConfig, apply_filters};
//! ```

pub mod cache;
pub mod filter;

// Re-export main types for convenience
pub use cache::{ChatCache, ReloadSummary, Snapshot, group_name_from_file, sort_chronologically};
pub use filter::{FilterConfig, apply_filters, filter_by_date};

// Re-export Message from the crate root
pub use crate::Message;
