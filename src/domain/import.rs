//! Import mapping: raw tabular rows into validated entries.
//!
//! Validation is all-or-nothing per row: every problem found is recorded on
//! the row and no entry is produced for it. Rows never abort the batch.
//!
//! Expected columns: `DataVencimento`, `Tipo`, `Valor`, `Contraparte`
//! (required); `Status`, `Documento`, `Descricao` (optional).

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::date_adjust::shift_weekend;
use crate::domain::entry::{Entry, EntryKind, EntryOrigin, EntryStatus};

/// One decoded data row. `line` is 1-based with the header counted as
/// line 1; blank lines in the source are not numbered.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line: usize,
    pub values: HashMap<String, String>,
    pub errors: Vec<String>,
}

impl RawRow {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            values: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Returns the cell for a column, treating a missing column and a blank
    /// cell the same way.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Processing,
    Completed,
    Failed,
}

impl BatchStatus {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "processing" => Some(BatchStatus::Processing),
            "completed" => Some(BatchStatus::Completed),
            "failed" => Some(BatchStatus::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Processing => "processing",
            BatchStatus::Completed => "completed",
            BatchStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit record for one import run.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch {
    pub id: Uuid,
    pub filename: String,
    pub imported_at: DateTime<Utc>,
    pub actor: String,
    pub total_rows: usize,
    pub error_rows: usize,
    pub status: BatchStatus,
}

impl ImportBatch {
    pub fn start(filename: &str, actor: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            imported_at: now,
            actor: actor.to_string(),
            total_rows: 0,
            error_rows: 0,
            status: BatchStatus::Processing,
        }
    }

    /// Records the row counts and marks the batch completed.
    pub fn finalize(&mut self, rows: &[RawRow]) {
        self.total_rows = rows.len();
        self.error_rows = rows.iter().filter(|r| !r.errors.is_empty()).count();
        self.status = BatchStatus::Completed;
    }

    /// Marks a batch whose file could not be decoded at all.
    pub fn fail(&mut self) {
        self.status = BatchStatus::Failed;
    }
}

/// Maps decoded rows into entries. Rows that fail validation collect their
/// error messages and yield nothing; valid rows become [`EntryOrigin::Imported`]
/// entries with the weekend-adjusted effective date.
pub fn map_rows(
    batch_id: Uuid,
    rows: &mut [RawRow],
    actor: &str,
    now: DateTime<Utc>,
) -> Vec<Entry> {
    let mut entries = Vec::new();
    for row in rows.iter_mut() {
        if let Some(entry) = map_row(batch_id, row, actor, now) {
            entries.push(entry);
        }
    }
    entries
}

fn map_row(batch_id: Uuid, row: &mut RawRow, actor: &str, now: DateTime<Utc>) -> Option<Entry> {
    let mut errors = Vec::new();

    let due_date = row.get("DataVencimento").and_then(parse_due_date);
    if due_date.is_none() {
        errors.push("invalid due date".to_string());
    }

    let kind = row.get("Tipo").and_then(parse_kind);
    if kind.is_none() {
        errors.push("invalid kind".to_string());
    }

    let amount = row.get("Valor").and_then(parse_amount);
    if amount.is_none() {
        errors.push("invalid amount".to_string());
    }

    let counterparty = row.get("Contraparte");
    if counterparty.is_none() {
        errors.push("counterparty is required".to_string());
    }

    let status = row
        .get("Status")
        .and_then(parse_status)
        .unwrap_or(EntryStatus::Projected);

    if !errors.is_empty() {
        row.errors.extend(errors);
        return None;
    }

    let due_date = due_date?;
    Some(Entry {
        id: Uuid::new_v4(),
        kind: kind?,
        due_date,
        effective_date: shift_weekend(due_date),
        counterparty: counterparty?.to_string(),
        counterparty_document: row.get("Documento").map(str::to_string),
        description: row.get("Descricao").map(str::to_string),
        amount: amount?,
        group_id: None,
        subgroup_id: None,
        status,
        origin: EntryOrigin::Imported,
        batch_id: Some(batch_id),
        duplicate: false,
        created_at: now,
        updated_at: now,
        created_by: actor.to_string(),
        updated_by: actor.to_string(),
    })
}

/// Flags entries that repeat an already stored entry on
/// (effective date, amount, counterparty, description, kind).
///
/// The comparison is against the existing store only; repeats inside the
/// same batch are not flagged.
pub fn mark_duplicates(new_entries: &mut [Entry], existing: &[Entry]) {
    for entry in new_entries.iter_mut() {
        entry.duplicate = existing.iter().any(|e| {
            e.effective_date == entry.effective_date
                && e.amount == entry.amount
                && e.counterparty == entry.counterparty
                && e.description == entry.description
                && e.kind == entry.kind
        });
    }
}

fn parse_due_date(input: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
    const DATETIME_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
    ];

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Some(datetime.date());
        }
    }
    None
}

fn parse_kind(input: &str) -> Option<EntryKind> {
    match input.to_lowercase().as_str() {
        "entrada" | "e" => Some(EntryKind::Inflow),
        "saida" | "saída" | "s" => Some(EntryKind::Outflow),
        _ => None,
    }
}

fn parse_status(input: &str) -> Option<EntryStatus> {
    match input.to_lowercase().as_str() {
        "previsto" => Some(EntryStatus::Projected),
        "realizado" => Some(EntryStatus::Settled),
        _ => None,
    }
}

/// Amounts accept `.` or a single `,` as the decimal separator and must be
/// strictly positive, as entries store magnitudes.
fn parse_amount(input: &str) -> Option<Decimal> {
    let parsed = input.parse::<Decimal>().ok().or_else(|| {
        if input.matches(',').count() == 1 && !input.contains('.') {
            input.replace(',', ".").parse::<Decimal>().ok()
        } else {
            None
        }
    })?;
    (parsed > Decimal::ZERO).then_some(parsed)
}
