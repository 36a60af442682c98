#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use fluxo::domain::balance::OpeningBalance;
use fluxo::domain::entry::{Entry, EntryKind, EntryOrigin, EntryStatus};
use fluxo::domain::error::FluxoError;
use fluxo::domain::period::Period;
use fluxo::domain::rule::{ClassificationRule, MatchMode};
use fluxo::domain::taxonomy::{Group, Subgroup};
use fluxo::ports::store_port::StorePort;

/// In-memory store. Writes land behind a mutex so the port's `&self`
/// write methods work without touching disk.
pub struct MockStore {
    pub entries: Mutex<Vec<Entry>>,
    pub groups: Vec<Group>,
    pub subgroups: Vec<Subgroup>,
    pub rules: Vec<ClassificationRule>,
    pub balances: Vec<OpeningBalance>,
    pub fail_reason: Option<String>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            groups: Vec::new(),
            subgroups: Vec::new(),
            rules: Vec::new(),
            balances: Vec::new(),
            fail_reason: None,
        }
    }

    pub fn with_entries(self, entries: Vec<Entry>) -> Self {
        *self.entries.lock().unwrap() = entries;
        self
    }

    pub fn with_groups(mut self, groups: Vec<Group>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_subgroups(mut self, subgroups: Vec<Subgroup>) -> Self {
        self.subgroups = subgroups;
        self
    }

    pub fn with_rules(mut self, rules: Vec<ClassificationRule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_balance(mut self, period: &str, value: &str) -> Self {
        self.balances.push(OpeningBalance::new(
            Period::parse(period).unwrap(),
            dec(value),
            "test",
            ts(),
        ));
        self
    }

    pub fn with_failure(mut self, reason: &str) -> Self {
        self.fail_reason = Some(reason.to_string());
        self
    }

    fn check(&self) -> Result<(), FluxoError> {
        match &self.fail_reason {
            Some(reason) => Err(FluxoError::Store {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl StorePort for MockStore {
    fn load_entries(&self) -> Result<Vec<Entry>, FluxoError> {
        self.check()?;
        Ok(self.entries.lock().unwrap().clone())
    }

    fn load_groups(&self) -> Result<Vec<Group>, FluxoError> {
        self.check()?;
        Ok(self.groups.clone())
    }

    fn load_subgroups(&self) -> Result<Vec<Subgroup>, FluxoError> {
        self.check()?;
        Ok(self.subgroups.clone())
    }

    fn load_rules(&self) -> Result<Vec<ClassificationRule>, FluxoError> {
        self.check()?;
        Ok(self.rules.clone())
    }

    fn opening_balance(&self, period: Period) -> Result<Option<OpeningBalance>, FluxoError> {
        self.check()?;
        Ok(self.balances.iter().find(|b| b.period == period).cloned())
    }

    fn append_entries(&self, entries: &[Entry]) -> Result<(), FluxoError> {
        self.check()?;
        self.entries.lock().unwrap().extend(entries.iter().cloned());
        Ok(())
    }

    fn replace_entries(&self, entries: &[Entry]) -> Result<(), FluxoError> {
        self.check()?;
        *self.entries.lock().unwrap() = entries.to_vec();
        Ok(())
    }
}

pub fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn make_entry(effective: NaiveDate, kind: EntryKind, amount: &str, counterparty: &str) -> Entry {
    Entry {
        id: Uuid::new_v4(),
        kind,
        due_date: effective,
        effective_date: effective,
        counterparty: counterparty.to_string(),
        counterparty_document: None,
        description: None,
        amount: dec(amount),
        group_id: None,
        subgroup_id: None,
        status: EntryStatus::Projected,
        origin: EntryOrigin::Manual,
        batch_id: None,
        duplicate: false,
        created_at: ts(),
        updated_at: ts(),
        created_by: "test".into(),
        updated_by: "test".into(),
    }
}

pub fn make_group(name: &str, kind: EntryKind, order: i32) -> Group {
    Group {
        id: Uuid::new_v4(),
        name: name.to_string(),
        kind,
        display_order: order,
        active: true,
    }
}

pub fn make_subgroup(group: &Group, name: &str, order: i32) -> Subgroup {
    Subgroup {
        id: Uuid::new_v4(),
        group_id: group.id,
        name: name.to_string(),
        display_order: order,
        active: true,
    }
}

pub fn make_rule(
    match_text: &str,
    mode: MatchMode,
    priority: i32,
    group: &Group,
    subgroup: &Subgroup,
) -> ClassificationRule {
    ClassificationRule {
        id: Uuid::new_v4(),
        match_text: match_text.to_string(),
        mode,
        keywords: None,
        kind_filter: None,
        group_id: group.id,
        subgroup_id: subgroup.id,
        priority,
        active: true,
    }
}
