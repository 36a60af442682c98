//! Port traits the domain's callers depend on.

pub mod config_port;
pub mod report_port;
pub mod store_port;
