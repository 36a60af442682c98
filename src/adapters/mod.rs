//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod csv_store_adapter;
pub mod file_config_adapter;
pub mod text_report_adapter;
