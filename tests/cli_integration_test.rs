//! CLI-layer tests: config loading, store wiring and the command helper
//! functions, using real INI files and data directories on disk.

mod common;

use common::*;

use std::io::Write;
use std::path::PathBuf;

use fluxo::adapters::csv_adapter::CsvDecoder;
use fluxo::adapters::csv_store_adapter::CsvStoreAdapter;
use fluxo::adapters::file_config_adapter::FileConfigAdapter;
use fluxo::cli;
use fluxo::domain::entry::{Entry, EntryKind, EntryOrigin, EntryStatus};
use fluxo::domain::error::FluxoError;
use fluxo::domain::period::Period;
use fluxo::domain::report::ReportMode;
use fluxo::domain::rule::MatchMode;
use fluxo::ports::store_port::StorePort;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn config_for(dir: &std::path::Path) -> FileConfigAdapter {
    let ini = format!("[data]\ndir = {}\n\n[import]\nactor = backoffice\n", dir.display());
    FileConfigAdapter::from_string(&ini).unwrap()
}

mod config_wiring {
    use super::*;

    #[test]
    fn load_config_reads_ini_from_disk() {
        let file = write_temp_ini("[data]\ndir = /srv/fluxo\n");
        let config = cli::load_config(file.path()).unwrap();
        let store = cli::open_store(&config).unwrap();
        // A store over a missing directory still reads as empty.
        assert!(store.load_entries().unwrap().is_empty());
    }

    #[test]
    fn load_config_missing_file_fails() {
        assert!(cli::load_config(&PathBuf::from("/nonexistent/fluxo.ini")).is_err());
    }

    #[test]
    fn open_store_requires_data_dir() {
        let config = FileConfigAdapter::from_string("[data]\n").unwrap();
        let err = cli::open_store(&config).unwrap_err();
        assert!(matches!(
            err,
            FluxoError::ConfigMissing { section, key } if section == "data" && key == "dir"
        ));
    }

    #[test]
    fn resolve_actor_prefers_flag_then_config_then_default() {
        let config =
            FileConfigAdapter::from_string("[import]\nactor = backoffice\n").unwrap();
        assert_eq!(cli::resolve_actor(&config, Some("ana")), "ana");
        assert_eq!(cli::resolve_actor(&config, None), "backoffice");

        let bare = FileConfigAdapter::from_string("[data]\n").unwrap();
        assert_eq!(cli::resolve_actor(&bare, None), "cli");
    }
}

mod manual_entry_parsing {
    use super::*;

    fn build(kind: &str, due: &str, amount: &str) -> Result<fluxo::domain::entry::ManualEntry, FluxoError> {
        cli::build_manual_entry(kind, due, amount, "ABC LTDA", None, None, None, None, "ana")
    }

    #[test]
    fn valid_arguments_build_an_input() {
        let input = build("inflow", "2024-05-08", "120.50").unwrap();
        assert_eq!(input.kind, EntryKind::Inflow);
        assert_eq!(input.due_date, date(2024, 5, 8));
        assert_eq!(input.amount, dec("120.50"));
        assert_eq!(input.status, EntryStatus::Projected);
    }

    #[test]
    fn status_argument_is_honored() {
        let input = cli::build_manual_entry(
            "outflow",
            "2024-05-08",
            "10",
            "X",
            Some("conta"),
            Some("settled"),
            None,
            None,
            "ana",
        )
        .unwrap();
        assert_eq!(input.status, EntryStatus::Settled);
        assert_eq!(input.description.as_deref(), Some("conta"));
    }

    #[test]
    fn bad_kind_date_amount_and_ids_are_rejected() {
        assert!(matches!(
            build("sideways", "2024-05-08", "10"),
            Err(FluxoError::EntryInvalid { .. })
        ));
        assert!(build("inflow", "08/05/2024", "10").is_err());
        assert!(build("inflow", "2024-05-08", "ten").is_err());
        assert!(cli::build_manual_entry(
            "inflow",
            "2024-05-08",
            "10",
            "X",
            None,
            None,
            Some("not-a-uuid"),
            None,
            "ana"
        )
        .is_err());
    }
}

mod store_backed_flow {
    use super::*;

    #[test]
    fn import_then_report_against_a_disk_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = CsvStoreAdapter::new(dir.path().to_path_buf());

        let group = make_group("Receitas", EntryKind::Inflow, 1);
        let subgroup = make_subgroup(&group, "Mensalidades", 1);
        let rule = make_rule("ABC LTDA", MatchMode::Exact, 1, &group, &subgroup);
        store.save_groups(std::slice::from_ref(&group)).unwrap();
        store.save_subgroups(std::slice::from_ref(&subgroup)).unwrap();
        store.save_rules(std::slice::from_ref(&rule)).unwrap();

        let mut csv = tempfile::NamedTempFile::new().unwrap();
        write!(
            csv,
            "DataVencimento,Tipo,Valor,Contraparte\n2024-05-04,entrada,150.00,ABC LTDA\n"
        )
        .unwrap();

        let rows = CsvDecoder::decode_file(csv.path()).unwrap();
        let outcome = cli::import_rows(&store, "maio.csv", rows, "ana").unwrap();
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].subgroup_id, Some(subgroup.id));
        store.append_entries(&outcome.entries).unwrap();

        let period = Period::parse("2024-05").unwrap();
        let report = cli::build_report(&store, period, ReportMode::All).unwrap();
        assert_eq!(report.lines[0].subgroups[0].value_for_day(6), dec("150.00"));
        assert_eq!(report.total_inflow, dec("150.00"));
    }

    #[test]
    fn manual_entry_persists_and_survives_reload() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = CsvStoreAdapter::new(dir.path().to_path_buf());

        let input = cli::build_manual_entry(
            "outflow",
            "2024-05-05",
            "40",
            "Energia SA",
            Some("conta de luz"),
            None,
            None,
            None,
            "ana",
        )
        .unwrap();
        let entry = Entry::manual(input, ts()).unwrap();
        store.append_entries(std::slice::from_ref(&entry)).unwrap();

        let loaded = store.load_entries().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].origin, EntryOrigin::Manual);
        // Sunday due date shifted to Monday before persisting.
        assert_eq!(loaded[0].effective_date, date(2024, 5, 6));
    }

    #[test]
    fn reclassify_rewrites_the_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = CsvStoreAdapter::new(dir.path().to_path_buf());

        let group = make_group("Despesas", EntryKind::Outflow, 1);
        let subgroup = make_subgroup(&group, "Energia", 1);
        let rule = make_rule("ENERGIA", MatchMode::Contains, 1, &group, &subgroup);
        store.save_rules(std::slice::from_ref(&rule)).unwrap();
        store
            .append_entries(&[make_entry(
                date(2024, 5, 8),
                EntryKind::Outflow,
                "40",
                "Energia SA",
            )])
            .unwrap();

        let rules = store.load_rules().unwrap();
        let mut entries = store.load_entries().unwrap();
        let changed = cli::reclassify_entries(&mut entries, &rules, false);
        assert_eq!(changed, 1);
        store.replace_entries(&entries).unwrap();

        let reloaded = store.load_entries().unwrap();
        assert_eq!(reloaded[0].subgroup_id, Some(subgroup.id));
    }

    #[test]
    fn report_config_store_round_trip_through_ini() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = config_for(dir.path());
        let store = cli::open_store(&config).unwrap();

        store
            .append_entries(&[make_entry(date(2024, 5, 2), EntryKind::Inflow, "10", "A")])
            .unwrap();

        let period = Period::parse("2024-05").unwrap();
        let report = cli::build_report(&store, period, ReportMode::All).unwrap();
        assert_eq!(report.total_inflow, dec("10"));
        assert_eq!(cli::resolve_actor(&config, None), "backoffice");
    }
}
