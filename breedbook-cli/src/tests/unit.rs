//! Focused unit tests covering CLI configuration and command wiring.

use super::helpers::{StubSourceBuilder, Workspace, fixed_now, sample_records};
use super::*;
use breedbook_core::{
    ArgumentError, BreedRecord, EntityStore, FetchError, IngestError, Limit, StoreError,
};
use crate::count::{CountArgs, CountConfig};
use crate::export::{ExportArgs, ExportConfig};
use crate::ingest::{IngestArgs, IngestConfig};
use crate::sync::{SyncArgs, SyncConfig};
use rstest::rstest;

#[rstest]
fn ingest_requires_page_size() {
    let err = IngestConfig::try_from(IngestArgs::default()).expect_err("missing page size");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_PAGE_SIZE);
            assert_eq!(env, ENV_INGEST_PAGE_SIZE);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn ingest_config_applies_defaults() {
    let args = IngestArgs {
        page_size: Some(25),
        ..IngestArgs::default()
    };

    let config = IngestConfig::try_from(args).expect("config should build");

    assert_eq!(config.database, Utf8PathBuf::from(DEFAULT_DATABASE));
    assert_eq!(config.source.base_url, "https://catfact.ninja");
    assert_eq!(config.source.timeout, Duration::from_secs(30));
    assert_eq!(config.page_size, Limit::new(25));
}

#[rstest]
fn ingest_config_honours_overrides() {
    let args = IngestArgs {
        database: Some(Utf8PathBuf::from("/tmp/cats.db")),
        base_url: Some("http://127.0.0.1:9000".into()),
        timeout_secs: Some(5),
        page_size: Some(0),
    };

    let config = IngestConfig::try_from(args).expect("config should build");

    assert_eq!(config.database, Utf8PathBuf::from("/tmp/cats.db"));
    assert_eq!(config.source.base_url, "http://127.0.0.1:9000");
    assert_eq!(config.source.timeout, Duration::from_secs(5));
    assert!(config.page_size.is_zero());
}

#[rstest]
#[case::ingest(ARG_PAGE_SIZE)]
#[case::export(ARG_LIMIT)]
fn negative_sizes_are_invalid_arguments(#[case] field: &'static str) {
    let err = if field == ARG_PAGE_SIZE {
        IngestConfig::try_from(IngestArgs {
            page_size: Some(-3),
            ..IngestArgs::default()
        })
        .map(|_| ())
    } else {
        ExportConfig::try_from(ExportArgs {
            limit: Some(-3),
            ..ExportArgs::default()
        })
        .map(|_| ())
    }
    .expect_err("negative size");

    match err {
        CliError::InvalidArgument(ArgumentError::Negative { field: got, value }) => {
            assert_eq!(got, field);
            assert_eq!(value, -3);
        }
        other => panic!("expected InvalidArgument, found {other:?}"),
    }
}

#[rstest]
fn export_config_defaults_output_dir() {
    let config = ExportConfig::try_from(ExportArgs {
        limit: Some(10),
        ..ExportArgs::default()
    })
    .expect("config should build");

    assert_eq!(config.output_dir, Utf8PathBuf::from("."));
    assert_eq!(config.limit, Limit::new(10));
}

#[rstest]
fn count_requires_country() {
    let err = CountConfig::try_from(CountArgs::default()).expect_err("missing country");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_COUNTRY);
            assert_eq!(env, ENV_COUNT_COUNTRY);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case::page_size(None, Some(1), ARG_PAGE_SIZE, ENV_SYNC_PAGE_SIZE)]
#[case::limit(Some(1), None, ARG_LIMIT, ENV_SYNC_LIMIT)]
fn sync_requires_both_sizes(
    #[case] page_size: Option<i64>,
    #[case] limit: Option<i64>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = SyncArgs {
        page_size,
        limit,
        ..SyncArgs::default()
    };
    let err = SyncConfig::try_from(args).expect_err("missing size");
    match err {
        CliError::MissingArgument { field: got, env } => {
            assert_eq!(got, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn sync_shares_the_database() {
    let args = SyncArgs {
        database: Some(Utf8PathBuf::from("cats.db")),
        page_size: Some(5),
        limit: Some(3),
        ..SyncArgs::default()
    };
    let config = SyncConfig::try_from(args).expect("config should build");
    assert_eq!(config.ingest.database, config.export.database);
    assert_eq!(config.ingest.page_size, Limit::new(5));
    assert_eq!(config.export.limit, Limit::new(3));
}

#[rstest]
fn parses_negative_page_size_as_a_value() {
    let cli = Cli::try_parse_from(["breedbook", "ingest", "--page-size", "-1"])
        .expect("negative numbers should parse");
    match cli.command {
        Command::Ingest(args) => assert_eq!(args.page_size, Some(-1)),
        other => panic!("expected ingest, found {other:?}"),
    }
}

#[rstest]
fn rejects_non_integer_page_size() {
    let err = Cli::try_parse_from(["breedbook", "ingest", "--page-size", "ten"])
        .expect_err("non-integer should fail");
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

#[rstest]
fn ingest_then_count_round_trip() {
    let workspace = Workspace::new();
    let builder = StubSourceBuilder::with_records(sample_records());
    let config = IngestConfig {
        database: workspace.database(),
        source: SourceSettings::resolve(None, None),
        page_size: Limit::new(10),
    };

    let report = crate::ingest::execute_ingest(&config, &builder).expect("ingest");

    assert_eq!(report.breeds_created, 2);
    assert_eq!(report.duplicates_skipped, 1);
    let store = open_store(&workspace.database()).expect("reopen");
    assert_eq!(store.count_breeds("Canada").expect("count"), 1);
    assert_eq!(store.count_breeds("USA").expect("count"), 1);
    assert_eq!(builder.seen().len(), 1);
}

#[rstest]
fn ingest_fetch_failure_is_reported() {
    let workspace = Workspace::new();
    let builder = StubSourceBuilder::with_error(FetchError::Timeout {
        url: "https://catfact.ninja/breeds?limit=10".into(),
        timeout_secs: 30,
    });
    let config = IngestConfig {
        database: workspace.database(),
        source: SourceSettings::resolve(None, None),
        page_size: Limit::new(10),
    };

    let err = crate::ingest::execute_ingest(&config, &builder).expect_err("fetch should fail");

    assert!(matches!(
        err,
        CliError::Ingest(IngestError::Fetch(FetchError::Timeout { .. }))
    ));
}

#[rstest]
fn zero_page_size_skips_source_and_database() {
    let workspace = Workspace::new();
    let builder = StubSourceBuilder::with_records(sample_records());
    let config = IngestConfig {
        database: workspace.database(),
        source: SourceSettings::resolve(None, None),
        page_size: Limit::ZERO,
    };

    let report = crate::ingest::execute_ingest(&config, &builder).expect("ingest");

    assert_eq!(report, breedbook_core::ReconcileReport::default());
    assert!(builder.seen().is_empty());
    assert!(!workspace.database().exists());
}

#[rstest]
fn count_on_missing_database_creates_nothing() {
    let workspace = Workspace::new();
    let args = CountArgs {
        country: Some("Canada".into()),
        database: Some(workspace.database()),
    };
    let mut stdout = Vec::new();

    let err = crate::count::run_count_with(args, &mut stdout).expect_err("missing database");

    assert!(matches!(err, CliError::Store(StoreError::Unavailable { .. })));
    assert!(!workspace.database().exists());
    assert!(workspace.database().parent().is_some_and(|dir| !dir.exists()));
    assert!(stdout.is_empty());
}

#[rstest]
fn export_on_missing_database_creates_nothing() {
    let workspace = Workspace::new();
    let config = ExportConfig {
        database: workspace.database(),
        limit: Limit::new(5),
        output_dir: workspace.output_dir(),
    };
    let mut stdout = Vec::new();

    let err = crate::export::execute_export(&config, fixed_now(), &mut stdout)
        .expect_err("missing database");

    assert!(matches!(err, CliError::Store(StoreError::Unavailable { .. })));
    assert!(!workspace.database().exists());
    assert!(!workspace.output_dir().exists());
}

#[rstest]
fn export_writes_timestamped_file() {
    let workspace = Workspace::new();
    {
        let builder = StubSourceBuilder::with_records(sample_records());
        let config = IngestConfig {
            database: workspace.database(),
            source: SourceSettings::resolve(None, None),
            page_size: Limit::new(10),
        };
        crate::ingest::execute_ingest(&config, &builder).expect("ingest");
    }
    let config = ExportConfig {
        database: workspace.database(),
        limit: Limit::new(1),
        output_dir: workspace.output_dir(),
    };
    let mut stdout = Vec::new();

    crate::export::execute_export(&config, fixed_now(), &mut stdout).expect("export");

    let path = workspace.output_dir().join("05062024143012.json");
    let written = std::fs::read_to_string(&path).expect("export file");
    let records: Vec<BreedRecord> = serde_json::from_str(&written).expect("decode export");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].breed, "Sphynx");
    assert_eq!(records[0].country, "Canada");
    let printed = String::from_utf8(stdout).expect("utf-8 output");
    assert!(printed.starts_with("exported 1 record(s) to "));
}

#[rstest]
fn report_line_lists_all_counts() {
    let report = breedbook_core::ReconcileReport {
        records: 3,
        countries_created: 2,
        breeds_created: 2,
        duplicates_skipped: 1,
    };
    let mut out = Vec::new();
    crate::ingest::write_report(&mut out, &report).expect("write");
    assert_eq!(
        String::from_utf8(out).expect("utf-8"),
        "ingested 3 record(s): 2 new country(ies), 2 new breed(s), 1 duplicate(s) skipped\n"
    );
}
