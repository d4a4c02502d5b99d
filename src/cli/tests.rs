//! Tests for argument parsing and command wiring

use super::runner::failure_reason;
use super::*;
use crate::config::ToolConfig;
use crate::rates::FamilySize;
use crate::verify::{CompletenessReport, VerificationOutcome};
use clap::Parser;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

#[test]
fn test_parse_facilities_defaults() {
    let cli = Cli::try_parse_from(["health-data-tools", "facilities"]).unwrap();

    assert!(!cli.verbose);
    assert!(cli.config.is_none());
    match cli.command {
        Commands::Facilities(args) => assert_eq!(args, FacilitiesArgs::default()),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_facilities_flags() {
    let cli = Cli::try_parse_from([
        "health-data-tools",
        "-v",
        "facilities",
        "--out",
        "out.xlsx",
        "--sleep",
        "0",
        "--max-pages",
        "3",
        "--timeout",
        "10",
        "--retries",
        "1",
        "--no-verify-ssl",
    ])
    .unwrap();

    assert!(cli.verbose);
    let Commands::Facilities(args) = cli.command else {
        panic!("expected facilities command");
    };
    assert_eq!(args.out, Some(PathBuf::from("out.xlsx")));
    assert_eq!(args.sleep, Some(0.0));
    assert_eq!(args.max_pages, Some(3));
    assert_eq!(args.timeout, Some(10));
    assert_eq!(args.retries, Some(1));
    assert!(args.no_verify_ssl);
}

#[test]
fn test_parse_rejects_zero_max_pages() {
    let result = Cli::try_parse_from(["health-data-tools", "facilities", "--max-pages", "0"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_inspect_and_seed_defaults() {
    let cli = Cli::try_parse_from(["health-data-tools", "inspect"]).unwrap();
    match cli.command {
        Commands::Inspect { path, rows } => {
            assert_eq!(path, PathBuf::from("Rates.xlsx"));
            assert_eq!(rows, 20);
        }
        other => panic!("unexpected command {other:?}"),
    }

    let cli = Cli::try_parse_from([
        "health-data-tools",
        "seed",
        "other.xlsx",
        "--batch-size",
        "10",
        "--config",
        "tools.yaml",
    ])
    .unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("tools.yaml")));
    match cli.command {
        Commands::Seed { path, batch_size } => {
            assert_eq!(path, PathBuf::from("other.xlsx"));
            assert_eq!(batch_size, 10);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_verify() {
    let cli = Cli::try_parse_from(["health-data-tools", "verify"]).unwrap();
    assert!(matches!(cli.command, Commands::Verify));
}

#[test]
fn test_facilities_args_override_config() {
    let mut config = ToolConfig::default();
    let args = FacilitiesArgs {
        out: Some(PathBuf::from("x.xlsx")),
        sleep: Some(1.5),
        max_pages: Some(2),
        timeout: None,
        retries: Some(0),
        no_verify_ssl: true,
    };

    args.apply(&mut config);

    assert_eq!(config.facilities.output, PathBuf::from("x.xlsx"));
    assert_eq!(config.facilities.sleep_seconds, 1.5);
    assert_eq!(config.facilities.max_pages, Some(2));
    assert_eq!(config.http.timeout_seconds, 60);
    assert_eq!(config.http.max_retries, 0);
    assert!(!config.http.verify_tls);
}

#[test]
fn test_unset_flags_keep_config_values() {
    let mut config = ToolConfig::from_yaml("facilities:\n  max_pages: 4\n").unwrap();
    FacilitiesArgs::default().apply(&mut config);

    assert_eq!(config.facilities.max_pages, Some(4));
    assert!(config.http.verify_tls);
}

#[test]
fn test_failure_reasons() {
    assert_eq!(
        failure_reason(&VerificationOutcome::Empty),
        "rate table is empty; run the seed command"
    );

    let report = CompletenessReport {
        expected: 146,
        found: 144,
        missing: vec![(18, FamilySize::M), (18, FamilySize::MPlusOne)],
    };
    assert_eq!(
        failure_reason(&VerificationOutcome::Missing(report)),
        "2 of 146 records missing ([18])"
    );
}

#[tokio::test]
async fn test_inspect_missing_workbook_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("Rates.xlsx");
    let cli = Cli::try_parse_from([
        "health-data-tools",
        "inspect",
        missing.to_str().unwrap(),
    ])
    .unwrap();

    let err = Runner::new(cli).run().await.unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with(&format!("Inspecting {}", missing.display())));
    assert!(message.contains("File not found"));
}

#[tokio::test]
async fn test_seed_reads_workbook_before_connecting() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("Rates.xlsx");
    let cli = Cli::try_parse_from(["health-data-tools", "seed", missing.to_str().unwrap()])
        .unwrap();

    // Fails on the workbook whether or not credentials are configured
    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(err
        .to_string()
        .starts_with(&format!("Reading rates from {}", missing.display())));
}
