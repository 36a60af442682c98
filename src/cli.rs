//! CLI definition and dispatch.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use uuid::Uuid;

use crate::adapters::csv_adapter::CsvDecoder;
use crate::adapters::csv_store_adapter::CsvStoreAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::cache::{invalidation_keys, periods_touched};
use crate::domain::classify::classify_entry;
use crate::domain::entry::{Entry, EntryKind, EntryStatus, ManualEntry};
use crate::domain::error::FluxoError;
use crate::domain::import::{map_rows, mark_duplicates, ImportBatch, RawRow};
use crate::domain::period::Period;
use crate::domain::report::{aggregate, filter_by_mode, MonthlyReport, ReportMode};
use crate::domain::rule::ClassificationRule;
use crate::domain::validation::{validate_rules, validate_taxonomy};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::store_port::StorePort;

#[derive(Parser, Debug)]
#[command(name = "fluxo", about = "Cash-flow tracking and monthly reporting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the monthly cash-flow report
    Report {
        #[arg(short, long)]
        config: PathBuf,
        /// Period as YYYY-MM
        #[arg(short, long)]
        period: String,
        /// projected, settled or all
        #[arg(short, long, default_value = "all")]
        mode: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import entries from a CSV file
    Import {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        file: PathBuf,
        #[arg(long)]
        actor: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Re-run classification over stored entries
    Classify {
        #[arg(short, long)]
        config: PathBuf,
        /// Reclassify every entry, not just unclassified ones
        #[arg(long)]
        all: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Add one manual entry
    Add {
        #[arg(short, long)]
        config: PathBuf,
        /// inflow or outflow
        #[arg(long)]
        kind: String,
        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due_date: String,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        counterparty: String,
        #[arg(long)]
        description: Option<String>,
        /// projected or settled
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        group_id: Option<String>,
        #[arg(long)]
        subgroup_id: Option<String>,
        #[arg(long)]
        actor: Option<String>,
    },
    /// Check taxonomy and rules for problems
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Report {
            config,
            period,
            mode,
            output,
        } => run_report(&config, &period, &mode, output.as_deref()),
        Command::Import {
            config,
            file,
            actor,
            dry_run,
        } => run_import(&config, &file, actor.as_deref(), dry_run),
        Command::Classify {
            config,
            all,
            dry_run,
        } => run_classify(&config, all, dry_run),
        Command::Add {
            config,
            kind,
            due_date,
            amount,
            counterparty,
            description,
            status,
            group_id,
            subgroup_id,
            actor,
        } => run_add(
            &config,
            &kind,
            &due_date,
            &amount,
            &counterparty,
            description.as_deref(),
            status.as_deref(),
            group_id.as_deref(),
            subgroup_id.as_deref(),
            actor.as_deref(),
        ),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = FluxoError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Opens the CSV store at `[data] dir`.
pub fn open_store(config: &dyn ConfigPort) -> Result<CsvStoreAdapter, FluxoError> {
    let dir = config
        .get_string("data", "dir")
        .ok_or_else(|| FluxoError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        })?;
    Ok(CsvStoreAdapter::new(PathBuf::from(dir)))
}

/// Actor precedence: command-line flag, then `[import] actor`, then "cli".
pub fn resolve_actor(config: &dyn ConfigPort, flag: Option<&str>) -> String {
    flag.map(str::to_string)
        .or_else(|| config.get_string("import", "actor"))
        .unwrap_or_else(|| "cli".to_string())
}

/// Loads the store, applies the mode filter and aggregates one period.
pub fn build_report(
    store: &dyn StorePort,
    period: Period,
    mode: ReportMode,
) -> Result<MonthlyReport, FluxoError> {
    let entries = filter_by_mode(&store.load_entries()?, mode);
    let groups = store.load_groups()?;
    let subgroups = store.load_subgroups()?;
    let opening_balance = store
        .opening_balance(period)?
        .map(|b| b.value)
        .unwrap_or(Decimal::ZERO);
    Ok(aggregate(period, opening_balance, &entries, &groups, &subgroups))
}

fn run_report(config_path: &Path, period: &str, mode: &str, output: Option<&Path>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let result = (|| {
        let period = Period::parse(period)?;
        let mode = ReportMode::parse(mode)?;
        let store = open_store(&config)?;

        eprintln!("Aggregating {period} ({mode})");
        let report = build_report(&store, period, mode)?;

        let renderer = TextReportAdapter::new();
        match output {
            Some(path) => {
                let mut file = fs::File::create(path)?;
                renderer.render(&report, &mut file)?;
                eprintln!("Report written to {}", path.display());
            }
            None => {
                let stdout = std::io::stdout();
                renderer.render(&report, &mut stdout.lock())?;
            }
        }
        Ok::<(), FluxoError>(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// What one import run produced, before anything is persisted.
pub struct ImportOutcome {
    pub batch: ImportBatch,
    pub entries: Vec<Entry>,
    pub rows: Vec<RawRow>,
}

/// Maps decoded rows, classifies each mapped entry against the stored rules
/// and flags duplicates against the stored entries. Persisting the result
/// is the caller's decision.
pub fn import_rows(
    store: &dyn StorePort,
    filename: &str,
    mut rows: Vec<RawRow>,
    actor: &str,
) -> Result<ImportOutcome, FluxoError> {
    let now = Utc::now();
    let mut batch = ImportBatch::start(filename, actor, now);

    let mut entries = map_rows(batch.id, &mut rows, actor, now);

    let rules = store.load_rules()?;
    for entry in &mut entries {
        let (group_id, subgroup_id) = classify_entry(entry, &rules);
        entry.group_id = group_id;
        entry.subgroup_id = subgroup_id;
    }

    let existing = store.load_entries()?;
    mark_duplicates(&mut entries, &existing);

    batch.finalize(&rows);
    Ok(ImportOutcome {
        batch,
        entries,
        rows,
    })
}

fn run_import(config_path: &Path, file: &Path, actor: Option<&str>, dry_run: bool) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let actor = resolve_actor(&config, actor);

    let result = (|| {
        let store = open_store(&config)?;

        let groups = store.load_groups()?;
        let subgroups = store.load_subgroups()?;
        let mut issues = validate_taxonomy(&groups, &subgroups);
        issues.extend(validate_rules(&store.load_rules()?, &groups, &subgroups));
        for issue in &issues {
            eprintln!("warning: {issue}");
        }

        eprintln!("Decoding {}", file.display());
        let rows = CsvDecoder::decode_file(file)?;

        let filename = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        let outcome = import_rows(&store, &filename, rows, &actor)?;

        for row in &outcome.rows {
            for error in &row.errors {
                println!("line {}: {}", row.line, error);
            }
        }

        let duplicates = outcome.entries.iter().filter(|e| e.duplicate).count();
        let unclassified = outcome
            .entries
            .iter()
            .filter(|e| e.subgroup_id.is_none())
            .count();
        println!("batch {} ({})", outcome.batch.id, outcome.batch.status);
        println!(
            "rows: {} total, {} with errors",
            outcome.batch.total_rows, outcome.batch.error_rows
        );
        println!(
            "entries: {} mapped, {} duplicates, {} unclassified",
            outcome.entries.len(),
            duplicates,
            unclassified
        );

        if dry_run {
            eprintln!("Dry run, nothing persisted");
            return Ok(());
        }

        store.append_entries(&outcome.entries)?;
        eprintln!("Appended {} entries", outcome.entries.len());
        for key in invalidation_keys(&periods_touched(&outcome.entries)) {
            eprintln!("stale cache key: {key}");
        }
        Ok::<(), FluxoError>(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Re-runs classification in place. Without `all`, only unclassified
/// entries are touched. Returns how many entries changed target.
pub fn reclassify_entries(entries: &mut [Entry], rules: &[ClassificationRule], all: bool) -> usize {
    let now = Utc::now();
    let mut changed = 0;
    for entry in entries.iter_mut() {
        if !all && entry.subgroup_id.is_some() {
            continue;
        }
        let (group_id, subgroup_id) = classify_entry(entry, rules);
        if (entry.group_id, entry.subgroup_id) != (group_id, subgroup_id) {
            entry.group_id = group_id;
            entry.subgroup_id = subgroup_id;
            entry.updated_at = now;
            changed += 1;
        }
    }
    changed
}

fn run_classify(config_path: &Path, all: bool, dry_run: bool) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let result = (|| {
        let store = open_store(&config)?;
        let rules = store.load_rules()?;
        let mut entries = store.load_entries()?;

        eprintln!(
            "Classifying {} entries against {} rules",
            entries.len(),
            rules.len()
        );
        let changed = reclassify_entries(&mut entries, &rules, all);
        let unclassified = entries.iter().filter(|e| e.subgroup_id.is_none()).count();
        println!("{changed} entries reclassified, {unclassified} still unclassified");

        if dry_run {
            eprintln!("Dry run, nothing persisted");
            return Ok(());
        }
        if changed > 0 {
            store.replace_entries(&entries)?;
            for key in invalidation_keys(&periods_touched(&entries)) {
                eprintln!("stale cache key: {key}");
            }
        }
        Ok::<(), FluxoError>(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Parses the `add` command's field arguments into a [`ManualEntry`].
#[allow(clippy::too_many_arguments)]
pub fn build_manual_entry(
    kind: &str,
    due_date: &str,
    amount: &str,
    counterparty: &str,
    description: Option<&str>,
    status: Option<&str>,
    group_id: Option<&str>,
    subgroup_id: Option<&str>,
    actor: &str,
) -> Result<ManualEntry, FluxoError> {
    let invalid = |reason: String| FluxoError::EntryInvalid { reason };

    let kind = EntryKind::parse(kind)
        .ok_or_else(|| invalid(format!("unknown kind {kind:?}, expected inflow or outflow")))?;
    let due_date = NaiveDate::parse_from_str(due_date, "%Y-%m-%d")
        .map_err(|_| invalid(format!("invalid due date {due_date:?}, expected YYYY-MM-DD")))?;
    let amount: Decimal = amount
        .parse()
        .map_err(|_| invalid(format!("invalid amount {amount:?}")))?;
    let status = match status {
        None => EntryStatus::Projected,
        Some(raw) => EntryStatus::parse(raw)
            .ok_or_else(|| invalid(format!("unknown status {raw:?}")))?,
    };
    let parse_id = |label: &str, raw: Option<&str>| -> Result<Option<Uuid>, FluxoError> {
        raw.map(|r| {
            r.parse()
                .map_err(|_| invalid(format!("invalid {label} {r:?}")))
        })
        .transpose()
    };

    Ok(ManualEntry {
        kind,
        due_date,
        amount,
        counterparty: counterparty.to_string(),
        description: description.map(str::to_string),
        status,
        group_id: parse_id("group id", group_id)?,
        subgroup_id: parse_id("subgroup id", subgroup_id)?,
        actor: actor.to_string(),
    })
}

#[allow(clippy::too_many_arguments)]
fn run_add(
    config_path: &Path,
    kind: &str,
    due_date: &str,
    amount: &str,
    counterparty: &str,
    description: Option<&str>,
    status: Option<&str>,
    group_id: Option<&str>,
    subgroup_id: Option<&str>,
    actor: Option<&str>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let actor = resolve_actor(&config, actor);

    let result = (|| {
        let store = open_store(&config)?;
        let input = build_manual_entry(
            kind,
            due_date,
            amount,
            counterparty,
            description,
            status,
            group_id,
            subgroup_id,
            &actor,
        )?;
        let entry = Entry::manual(input, Utc::now())?;

        println!(
            "added {} {} {} on {} (effective {})",
            entry.id, entry.kind, entry.amount, entry.due_date, entry.effective_date
        );
        store.append_entries(std::slice::from_ref(&entry))?;
        for key in invalidation_keys(&periods_touched(std::slice::from_ref(&entry))) {
            eprintln!("stale cache key: {key}");
        }
        Ok::<(), FluxoError>(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let issues = (|| {
        let store = open_store(&config)?;
        let groups = store.load_groups()?;
        let subgroups = store.load_subgroups()?;
        let rules = store.load_rules()?;

        let mut issues = validate_taxonomy(&groups, &subgroups);
        issues.extend(validate_rules(&rules, &groups, &subgroups));
        Ok::<Vec<String>, FluxoError>(issues)
    })();

    match issues {
        Ok(issues) if issues.is_empty() => {
            println!("no issues found");
            ExitCode::SUCCESS
        }
        Ok(issues) => {
            for issue in &issues {
                println!("{issue}");
            }
            eprintln!("{} issue(s) found", issues.len());
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
