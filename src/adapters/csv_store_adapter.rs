//! CSV file store adapter implementing StorePort.
//!
//! One file per collection inside a data directory: `entries.csv`,
//! `groups.csv`, `subgroups.csv`, `rules.csv`, `balances.csv`. A missing
//! file reads as an empty collection, so a fresh directory works with no
//! setup. Writes rewrite the whole file; the store is meant for a single
//! CLI process, not concurrent writers.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::balance::OpeningBalance;
use crate::domain::entry::{Entry, EntryKind, EntryOrigin, EntryStatus};
use crate::domain::error::FluxoError;
use crate::domain::period::Period;
use crate::domain::rule::{ClassificationRule, MatchMode};
use crate::domain::taxonomy::{Group, Subgroup};
use crate::ports::store_port::StorePort;

#[derive(Debug)]
pub struct CsvStoreAdapter {
    dir: PathBuf,
}

impl CsvStoreAdapter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn read_rows<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, FluxoError> {
        let path = self.path(file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| FluxoError::Store {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let mut rows = Vec::new();
        for result in reader.deserialize() {
            rows.push(result.map_err(|e| FluxoError::Store {
                reason: format!("{}: {}", file, e),
            })?);
        }
        Ok(rows)
    }

    fn write_rows<T: Serialize>(&self, file: &str, rows: &[T]) -> Result<(), FluxoError> {
        let path = self.path(file);
        let store_err = |reason: String| FluxoError::Store { reason };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| store_err(format!("failed to create {}: {}", parent.display(), e)))?;
        }

        let mut writer = csv::Writer::from_path(&path)
            .map_err(|e| store_err(format!("failed to open {}: {}", path.display(), e)))?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| store_err(format!("{}: {}", file, e)))?;
        }
        writer
            .flush()
            .map_err(|e| store_err(format!("failed to write {}: {}", path.display(), e)))
    }
}

impl StorePort for CsvStoreAdapter {
    fn load_entries(&self) -> Result<Vec<Entry>, FluxoError> {
        let rows: Vec<EntryRow> = self.read_rows("entries.csv")?;
        rows.into_iter().map(EntryRow::into_entry).collect()
    }

    fn load_groups(&self) -> Result<Vec<Group>, FluxoError> {
        let rows: Vec<GroupRow> = self.read_rows("groups.csv")?;
        rows.into_iter().map(GroupRow::into_group).collect()
    }

    fn load_subgroups(&self) -> Result<Vec<Subgroup>, FluxoError> {
        let rows: Vec<SubgroupRow> = self.read_rows("subgroups.csv")?;
        rows.into_iter().map(SubgroupRow::into_subgroup).collect()
    }

    fn load_rules(&self) -> Result<Vec<ClassificationRule>, FluxoError> {
        let rows: Vec<RuleRow> = self.read_rows("rules.csv")?;
        rows.into_iter().map(RuleRow::into_rule).collect()
    }

    fn opening_balance(&self, period: Period) -> Result<Option<OpeningBalance>, FluxoError> {
        let rows: Vec<BalanceRow> = self.read_rows("balances.csv")?;
        for row in rows {
            let balance = row.into_balance()?;
            if balance.period == period {
                return Ok(Some(balance));
            }
        }
        Ok(None)
    }

    fn append_entries(&self, entries: &[Entry]) -> Result<(), FluxoError> {
        let mut all = self.load_entries()?;
        all.extend(entries.iter().cloned());
        self.replace_entries(&all)
    }

    fn replace_entries(&self, entries: &[Entry]) -> Result<(), FluxoError> {
        let rows: Vec<EntryRow> = entries.iter().map(EntryRow::from_entry).collect();
        self.write_rows("entries.csv", &rows)
    }
}

/// Seeds taxonomy and rule files, replacing what is there. Kept off the
/// port because only setup tooling and tests need it.
impl CsvStoreAdapter {
    pub fn save_groups(&self, groups: &[Group]) -> Result<(), FluxoError> {
        let rows: Vec<GroupRow> = groups.iter().map(GroupRow::from_group).collect();
        self.write_rows("groups.csv", &rows)
    }

    pub fn save_subgroups(&self, subgroups: &[Subgroup]) -> Result<(), FluxoError> {
        let rows: Vec<SubgroupRow> = subgroups.iter().map(SubgroupRow::from_subgroup).collect();
        self.write_rows("subgroups.csv", &rows)
    }

    pub fn save_rules(&self, rules: &[ClassificationRule]) -> Result<(), FluxoError> {
        let rows: Vec<RuleRow> = rules.iter().map(RuleRow::from_rule).collect();
        self.write_rows("rules.csv", &rows)
    }

    pub fn save_balances(&self, balances: &[OpeningBalance]) -> Result<(), FluxoError> {
        let rows: Vec<BalanceRow> = balances.iter().map(BalanceRow::from_balance).collect();
        self.write_rows("balances.csv", &rows)
    }
}

// Row structs bridge Uuid/Decimal/date fields through strings so the CSV
// stays human-readable and diff-friendly.

#[derive(Debug, Serialize, Deserialize)]
struct EntryRow {
    id: String,
    kind: String,
    due_date: String,
    effective_date: String,
    counterparty: String,
    counterparty_document: Option<String>,
    description: Option<String>,
    amount: String,
    group_id: Option<String>,
    subgroup_id: Option<String>,
    status: String,
    origin: String,
    batch_id: Option<String>,
    duplicate: bool,
    created_at: String,
    updated_at: String,
    created_by: String,
    updated_by: String,
}

impl EntryRow {
    fn from_entry(entry: &Entry) -> Self {
        Self {
            id: entry.id.to_string(),
            kind: entry.kind.as_str().to_string(),
            due_date: entry.due_date.to_string(),
            effective_date: entry.effective_date.to_string(),
            counterparty: entry.counterparty.clone(),
            counterparty_document: entry.counterparty_document.clone(),
            description: entry.description.clone(),
            amount: entry.amount.to_string(),
            group_id: entry.group_id.map(|id| id.to_string()),
            subgroup_id: entry.subgroup_id.map(|id| id.to_string()),
            status: entry.status.as_str().to_string(),
            origin: entry.origin.as_str().to_string(),
            batch_id: entry.batch_id.map(|id| id.to_string()),
            duplicate: entry.duplicate,
            created_at: entry.created_at.to_rfc3339(),
            updated_at: entry.updated_at.to_rfc3339(),
            created_by: entry.created_by.clone(),
            updated_by: entry.updated_by.clone(),
        }
    }

    fn into_entry(self) -> Result<Entry, FluxoError> {
        Ok(Entry {
            id: parse_uuid("entries.csv", "id", &self.id)?,
            kind: EntryKind::parse(&self.kind).ok_or_else(|| {
                field_err("entries.csv", "kind", &self.kind)
            })?,
            due_date: parse_date("entries.csv", "due_date", &self.due_date)?,
            effective_date: parse_date("entries.csv", "effective_date", &self.effective_date)?,
            counterparty: self.counterparty,
            counterparty_document: self.counterparty_document,
            description: self.description,
            amount: parse_decimal("entries.csv", "amount", &self.amount)?,
            group_id: parse_optional_uuid("entries.csv", "group_id", self.group_id)?,
            subgroup_id: parse_optional_uuid("entries.csv", "subgroup_id", self.subgroup_id)?,
            status: EntryStatus::parse(&self.status).ok_or_else(|| {
                field_err("entries.csv", "status", &self.status)
            })?,
            origin: EntryOrigin::parse(&self.origin).ok_or_else(|| {
                field_err("entries.csv", "origin", &self.origin)
            })?,
            batch_id: parse_optional_uuid("entries.csv", "batch_id", self.batch_id)?,
            duplicate: self.duplicate,
            created_at: parse_datetime("entries.csv", "created_at", &self.created_at)?,
            updated_at: parse_datetime("entries.csv", "updated_at", &self.updated_at)?,
            created_by: self.created_by,
            updated_by: self.updated_by,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GroupRow {
    id: String,
    name: String,
    kind: String,
    display_order: i32,
    active: bool,
}

impl GroupRow {
    fn from_group(group: &Group) -> Self {
        Self {
            id: group.id.to_string(),
            name: group.name.clone(),
            kind: group.kind.as_str().to_string(),
            display_order: group.display_order,
            active: group.active,
        }
    }

    fn into_group(self) -> Result<Group, FluxoError> {
        Ok(Group {
            id: parse_uuid("groups.csv", "id", &self.id)?,
            name: self.name,
            kind: EntryKind::parse(&self.kind)
                .ok_or_else(|| field_err("groups.csv", "kind", &self.kind))?,
            display_order: self.display_order,
            active: self.active,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SubgroupRow {
    id: String,
    group_id: String,
    name: String,
    display_order: i32,
    active: bool,
}

impl SubgroupRow {
    fn from_subgroup(subgroup: &Subgroup) -> Self {
        Self {
            id: subgroup.id.to_string(),
            group_id: subgroup.group_id.to_string(),
            name: subgroup.name.clone(),
            display_order: subgroup.display_order,
            active: subgroup.active,
        }
    }

    fn into_subgroup(self) -> Result<Subgroup, FluxoError> {
        Ok(Subgroup {
            id: parse_uuid("subgroups.csv", "id", &self.id)?,
            group_id: parse_uuid("subgroups.csv", "group_id", &self.group_id)?,
            name: self.name,
            display_order: self.display_order,
            active: self.active,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RuleRow {
    id: String,
    match_text: String,
    mode: String,
    keywords: Option<String>,
    kind_filter: Option<String>,
    group_id: String,
    subgroup_id: String,
    priority: i32,
    active: bool,
}

impl RuleRow {
    fn from_rule(rule: &ClassificationRule) -> Self {
        Self {
            id: rule.id.to_string(),
            match_text: rule.match_text.clone(),
            mode: rule.mode.as_str().to_string(),
            keywords: rule.keywords.clone(),
            kind_filter: rule.kind_filter.map(|k| k.as_str().to_string()),
            group_id: rule.group_id.to_string(),
            subgroup_id: rule.subgroup_id.to_string(),
            priority: rule.priority,
            active: rule.active,
        }
    }

    fn into_rule(self) -> Result<ClassificationRule, FluxoError> {
        let kind_filter = match self.kind_filter.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(
                EntryKind::parse(raw).ok_or_else(|| field_err("rules.csv", "kind_filter", raw))?,
            ),
        };
        Ok(ClassificationRule {
            id: parse_uuid("rules.csv", "id", &self.id)?,
            match_text: self.match_text,
            mode: MatchMode::parse(&self.mode)
                .ok_or_else(|| field_err("rules.csv", "mode", &self.mode))?,
            keywords: self.keywords,
            kind_filter,
            group_id: parse_uuid("rules.csv", "group_id", &self.group_id)?,
            subgroup_id: parse_uuid("rules.csv", "subgroup_id", &self.subgroup_id)?,
            priority: self.priority,
            active: self.active,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct BalanceRow {
    period: String,
    value: String,
    set_by: String,
    set_at: String,
}

impl BalanceRow {
    fn from_balance(balance: &OpeningBalance) -> Self {
        Self {
            period: balance.period.to_string(),
            value: balance.value.to_string(),
            set_by: balance.set_by.clone(),
            set_at: balance.set_at.to_rfc3339(),
        }
    }

    fn into_balance(self) -> Result<OpeningBalance, FluxoError> {
        Ok(OpeningBalance {
            period: Period::parse(&self.period).map_err(|_| {
                field_err("balances.csv", "period", &self.period)
            })?,
            value: parse_decimal("balances.csv", "value", &self.value)?,
            set_by: self.set_by,
            set_at: parse_datetime("balances.csv", "set_at", &self.set_at)?,
        })
    }
}

fn field_err(file: &str, field: &str, value: &str) -> FluxoError {
    FluxoError::Store {
        reason: format!("{}: invalid {} {:?}", file, field, value),
    }
}

fn parse_uuid(file: &str, field: &str, value: &str) -> Result<Uuid, FluxoError> {
    value.parse().map_err(|_| field_err(file, field, value))
}

fn parse_optional_uuid(
    file: &str,
    field: &str,
    value: Option<String>,
) -> Result<Option<Uuid>, FluxoError> {
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => parse_uuid(file, field, raw).map(Some),
    }
}

fn parse_date(file: &str, field: &str, value: &str) -> Result<NaiveDate, FluxoError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| field_err(file, field, value))
}

fn parse_datetime(file: &str, field: &str, value: &str) -> Result<DateTime<Utc>, FluxoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| field_err(file, field, value))
}

fn parse_decimal(file: &str, field: &str, value: &str) -> Result<Decimal, FluxoError> {
    value.parse().map_err(|_| field_err(file, field, value))
}
