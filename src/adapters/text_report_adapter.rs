//! Plain-text report adapter implementing ReportPort.
//!
//! Renders a monthly report as aligned text: taxonomy lines with month
//! totals, the flat totals, then the daily running balance. Day-by-day
//! line values stay available on the report itself for richer renderers.

use std::io::Write;

use rust_decimal::Decimal;

use crate::domain::error::FluxoError;
use crate::domain::report::MonthlyReport;
use crate::ports::report_port::ReportPort;

const NAME_WIDTH: usize = 36;
const AMOUNT_WIDTH: usize = 14;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TextReportAdapter {
    fn render(&self, report: &MonthlyReport, out: &mut dyn Write) -> Result<(), FluxoError> {
        writeln!(out, "Cash flow {}", report.period)?;
        write_amount_line(out, "Opening balance", report.opening_balance)?;
        writeln!(out)?;

        if report.lines.is_empty() {
            writeln!(out, "(no active groups)")?;
        }
        for group in &report.lines {
            write_line(out, &group.name, 0, group.month_total)?;
            for subgroup in &group.subgroups {
                write_line(out, &subgroup.name, 2, subgroup.month_total)?;
            }
        }
        writeln!(out)?;

        write_amount_line(out, "Total inflow", report.total_inflow)?;
        write_amount_line(out, "Total outflow", report.total_outflow)?;
        write_amount_line(out, "Closing balance", report.closing_balance)?;
        writeln!(out)?;

        writeln!(out, "Daily balance")?;
        for column in &report.columns {
            let balance = report
                .balance_by_day
                .get(&column.day)
                .copied()
                .unwrap_or(Decimal::ZERO);
            writeln!(
                out,
                "{:>4}  {}  {:>width$}",
                column.day,
                column.date,
                format_amount(balance),
                width = AMOUNT_WIDTH
            )?;
        }
        Ok(())
    }
}

fn format_amount(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

fn write_line(
    out: &mut dyn Write,
    name: &str,
    indent: usize,
    total: Decimal,
) -> Result<(), FluxoError> {
    writeln!(
        out,
        "{:indent$}{:<name_width$}{:>width$}",
        "",
        name,
        format_amount(total),
        indent = indent,
        name_width = NAME_WIDTH.saturating_sub(indent),
        width = AMOUNT_WIDTH
    )?;
    Ok(())
}

fn write_amount_line(out: &mut dyn Write, label: &str, value: Decimal) -> Result<(), FluxoError> {
    writeln!(
        out,
        "{:<name_width$}{:>width$}",
        label,
        format_amount(value),
        name_width = NAME_WIDTH,
        width = AMOUNT_WIDTH
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entry::{Entry, EntryKind, EntryOrigin, EntryStatus};
    use crate::domain::period::Period;
    use crate::domain::report::aggregate;
    use crate::domain::taxonomy::{Group, Subgroup};
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn render(report: &MonthlyReport) -> String {
        let mut buf = Vec::new();
        TextReportAdapter::new().render(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn make_entry(day: u32, kind: EntryKind, amount: &str, subgroup_id: Uuid) -> Entry {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        Entry {
            id: Uuid::new_v4(),
            kind,
            due_date: date,
            effective_date: date,
            counterparty: "ABC LTDA".into(),
            counterparty_document: None,
            description: None,
            amount: amount.parse().unwrap(),
            group_id: None,
            subgroup_id: Some(subgroup_id),
            status: EntryStatus::Projected,
            origin: EntryOrigin::Manual,
            batch_id: None,
            duplicate: false,
            created_at: ts,
            updated_at: ts,
            created_by: "ana".into(),
            updated_by: "ana".into(),
        }
    }

    #[test]
    fn renders_lines_totals_and_daily_balance() {
        let group = Group {
            id: Uuid::new_v4(),
            name: "Receitas".into(),
            kind: EntryKind::Inflow,
            display_order: 1,
            active: true,
        };
        let subgroup = Subgroup {
            id: Uuid::new_v4(),
            group_id: group.id,
            name: "Mensalidades".into(),
            display_order: 1,
            active: true,
        };
        let entries = vec![make_entry(2, EntryKind::Inflow, "150.00", subgroup.id)];
        let report = aggregate(
            Period::parse("2024-05").unwrap(),
            "50".parse().unwrap(),
            &entries,
            &[group],
            &[subgroup],
        );

        let text = render(&report);

        assert!(text.contains("Cash flow 2024-05"));
        assert!(text.contains("Receitas"));
        assert!(text.contains("Mensalidades"));
        assert!(text.contains("150.00"));
        assert!(text.contains("Closing balance"));
        assert!(text.contains("200.00"));
        // One daily balance row per calendar day.
        assert!(text.contains("2024-05-01"));
        assert!(text.contains("2024-05-31"));
    }

    #[test]
    fn empty_taxonomy_is_called_out() {
        let report = aggregate(
            Period::parse("2024-05").unwrap(),
            "50".parse().unwrap(),
            &[],
            &[],
            &[],
        );
        let text = render(&report);
        assert!(text.contains("(no active groups)"));
        assert!(text.contains("Opening balance"));
    }
}
