//! Cash-flow entry and its lifecycle enums.
//!
//! An entry stores its amount as a positive magnitude; the sign is derived
//! from [`EntryKind`] wherever balances are computed.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::date_adjust::shift_weekend;
use crate::domain::error::FluxoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Inflow,
    Outflow,
}

impl EntryKind {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "inflow" => Some(EntryKind::Inflow),
            "outflow" => Some(EntryKind::Outflow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Inflow => "inflow",
            EntryKind::Outflow => "outflow",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Projected,
    Settled,
}

impl EntryStatus {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "projected" => Some(EntryStatus::Projected),
            "settled" => Some(EntryStatus::Settled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Projected => "projected",
            EntryStatus::Settled => "settled",
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrigin {
    Imported,
    Manual,
}

impl EntryOrigin {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "imported" => Some(EntryOrigin::Imported),
            "manual" => Some(EntryOrigin::Manual),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryOrigin::Imported => "imported",
            EntryOrigin::Manual => "manual",
        }
    }
}

impl std::fmt::Display for EntryOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub due_date: NaiveDate,
    pub effective_date: NaiveDate,
    pub counterparty: String,
    pub counterparty_document: Option<String>,
    pub description: Option<String>,
    pub amount: Decimal,
    pub group_id: Option<Uuid>,
    pub subgroup_id: Option<Uuid>,
    pub status: EntryStatus,
    pub origin: EntryOrigin,
    pub batch_id: Option<Uuid>,
    pub duplicate: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}

/// Caller input for a manually created entry.
#[derive(Debug, Clone)]
pub struct ManualEntry {
    pub kind: EntryKind,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub counterparty: String,
    pub description: Option<String>,
    pub status: EntryStatus,
    pub group_id: Option<Uuid>,
    pub subgroup_id: Option<Uuid>,
    pub actor: String,
}

impl Entry {
    /// Builds a [`EntryOrigin::Manual`] entry: trims free text, shifts the
    /// due date off the weekend and stamps the audit fields.
    pub fn manual(input: ManualEntry, now: DateTime<Utc>) -> Result<Self, FluxoError> {
        if input.amount <= Decimal::ZERO {
            return Err(FluxoError::EntryInvalid {
                reason: "amount must be positive".into(),
            });
        }

        let counterparty = input.counterparty.trim();
        if counterparty.is_empty() {
            return Err(FluxoError::EntryInvalid {
                reason: "counterparty is required".into(),
            });
        }

        let description = input
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(Entry {
            id: Uuid::new_v4(),
            kind: input.kind,
            due_date: input.due_date,
            effective_date: shift_weekend(input.due_date),
            counterparty: counterparty.to_string(),
            counterparty_document: None,
            description,
            amount: input.amount,
            group_id: input.group_id,
            subgroup_id: input.subgroup_id,
            status: input.status,
            origin: EntryOrigin::Manual,
            batch_id: None,
            duplicate: false,
            created_at: now,
            updated_at: now,
            created_by: input.actor.clone(),
            updated_by: input.actor,
        })
    }
}
