//! Monthly report aggregation.
//!
//! A report has one column per calendar day of the period and one line per
//! active group, with its active subgroups nested under it. Line values and
//! totals are magnitudes keyed by subgroup; the sign of an entry only enters
//! through the daily balance, where inflows add and outflows subtract.
//!
//! Entries without a subgroup still count toward the period totals and the
//! daily balances. They just have no line to sit on.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::entry::{Entry, EntryKind, EntryStatus};
use crate::domain::error::FluxoError;
use crate::domain::period::Period;
use crate::domain::taxonomy::{active_groups_ordered, active_subgroups_ordered, Group, Subgroup};

/// Which entry statuses a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    All,
    Projected,
    Settled,
}

impl ReportMode {
    /// Accepts the canonical tokens plus the vocabulary used by import
    /// files. Anything else is an error rather than a silent catch-all.
    pub fn parse(input: &str) -> Result<Self, FluxoError> {
        match input.trim().to_lowercase().as_str() {
            "all" | "todos" | "ambos" => Ok(ReportMode::All),
            "projected" | "previsto" => Ok(ReportMode::Projected),
            "settled" | "realizado" => Ok(ReportMode::Settled),
            _ => Err(FluxoError::ModeParse {
                input: input.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportMode::All => "all",
            ReportMode::Projected => "projected",
            ReportMode::Settled => "settled",
        }
    }
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keeps the entries a mode covers. [`ReportMode::All`] keeps everything.
pub fn filter_by_mode(entries: &[Entry], mode: ReportMode) -> Vec<Entry> {
    let wanted = match mode {
        ReportMode::All => return entries.to_vec(),
        ReportMode::Projected => EntryStatus::Projected,
        ReportMode::Settled => EntryStatus::Settled,
    };
    entries
        .iter()
        .filter(|entry| entry.status == wanted)
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    pub day: u32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubgroupLine {
    pub subgroup_id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    /// Sparse: days without movement are absent and read as zero.
    pub values_by_day: BTreeMap<u32, Decimal>,
    pub month_total: Decimal,
}

impl SubgroupLine {
    pub fn value_for_day(&self, day: u32) -> Decimal {
        self.values_by_day.get(&day).copied().unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupLine {
    pub group_id: Uuid,
    pub name: String,
    pub kind: EntryKind,
    /// Sparse, summed from the child subgroup lines.
    pub values_by_day: BTreeMap<u32, Decimal>,
    pub month_total: Decimal,
    pub subgroups: Vec<SubgroupLine>,
}

impl GroupLine {
    pub fn value_for_day(&self, day: u32) -> Decimal {
        self.values_by_day.get(&day).copied().unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub period: Period,
    pub columns: Vec<DayColumn>,
    pub lines: Vec<GroupLine>,
    pub total_inflow: Decimal,
    pub total_outflow: Decimal,
    pub opening_balance: Decimal,
    /// Dense: one running balance per calendar day, movement or not.
    pub balance_by_day: BTreeMap<u32, Decimal>,
    pub closing_balance: Decimal,
}

/// Builds the monthly report for `period`.
///
/// Only entries whose effective date falls inside the period count.
/// Inactive groups and subgroups get no lines, and lines follow the
/// taxonomy display order. The caller applies any mode filter first
/// via [`filter_by_mode`].
pub fn aggregate(
    period: Period,
    opening_balance: Decimal,
    entries: &[Entry],
    groups: &[Group],
    subgroups: &[Subgroup],
) -> MonthlyReport {
    let columns: Vec<DayColumn> = (1..=period.days_in_month())
        .map(|day| DayColumn {
            day,
            date: period.first_day() + Duration::days(i64::from(day) - 1),
        })
        .collect();

    let month_entries: Vec<&Entry> = entries
        .iter()
        .filter(|entry| period.contains(entry.effective_date))
        .collect();

    let mut lines = Vec::new();
    for group in active_groups_ordered(groups) {
        let mut group_line = GroupLine {
            group_id: group.id,
            name: group.name.clone(),
            kind: group.kind,
            values_by_day: BTreeMap::new(),
            month_total: Decimal::ZERO,
            subgroups: Vec::new(),
        };

        for subgroup in active_subgroups_ordered(subgroups, group.id) {
            let mut line = SubgroupLine {
                subgroup_id: subgroup.id,
                group_id: group.id,
                name: subgroup.name.clone(),
                values_by_day: BTreeMap::new(),
                month_total: Decimal::ZERO,
            };

            for entry in month_entries
                .iter()
                .filter(|entry| entry.subgroup_id == Some(subgroup.id))
            {
                let day = entry.effective_date.day();
                *line.values_by_day.entry(day).or_insert(Decimal::ZERO) += entry.amount;
                line.month_total += entry.amount;
            }

            for (day, value) in &line.values_by_day {
                *group_line.values_by_day.entry(*day).or_insert(Decimal::ZERO) += *value;
            }
            group_line.month_total += line.month_total;
            group_line.subgroups.push(line);
        }

        lines.push(group_line);
    }

    let total_inflow = sum_amounts(&month_entries, EntryKind::Inflow, None);
    let total_outflow = sum_amounts(&month_entries, EntryKind::Outflow, None);

    let mut balance_by_day = BTreeMap::new();
    let mut running = opening_balance;
    for column in &columns {
        let inflow = sum_amounts(&month_entries, EntryKind::Inflow, Some(column.day));
        let outflow = sum_amounts(&month_entries, EntryKind::Outflow, Some(column.day));
        running += inflow - outflow;
        balance_by_day.insert(column.day, running);
    }

    MonthlyReport {
        period,
        columns,
        lines,
        total_inflow,
        total_outflow,
        opening_balance,
        balance_by_day,
        closing_balance: running,
    }
}

fn sum_amounts(entries: &[&Entry], kind: EntryKind, day: Option<u32>) -> Decimal {
    entries
        .iter()
        .filter(|entry| entry.kind == kind)
        .filter(|entry| day.is_none_or(|d| entry.effective_date.day() == d))
        .map(|entry| entry.amount)
        .sum()
}
