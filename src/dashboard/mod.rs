//! Dashboard module
//!
//! Provides an overview page with account and transaction counts, charts of
//! the transaction types and category totals, and totals for a date range.

mod aggregation;
mod cards;
mod charts;
mod date_range;
mod handlers;
mod stats;
mod tables;

pub use handlers::get_dashboard_page;
