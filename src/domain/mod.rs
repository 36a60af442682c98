//! Core domain types and logic.

pub mod entry;
pub mod taxonomy;
pub mod rule;
pub mod balance;
pub mod period;
pub mod date_adjust;
pub mod classify;
pub mod import;
pub mod report;
pub mod cache;
pub mod validation;
pub mod error;
