//! Report rendering port trait.

use std::io::Write;

use crate::domain::error::FluxoError;
use crate::domain::report::MonthlyReport;

/// Port for rendering a finished monthly report. The report is read-only;
/// layout and formatting belong entirely to the adapter.
pub trait ReportPort {
    fn render(&self, report: &MonthlyReport, out: &mut dyn Write) -> Result<(), FluxoError>;
}
