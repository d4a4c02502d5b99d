//! Tests for database verification

use super::*;
use crate::database::DatabaseConfig;
use crate::http::{HttpClient, HttpClientConfig};
use serde_json::{json, Value};
use test_case::test_case;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn row(age: u32, family_size: &str, payment_type: &str) -> RateRow {
    RateRow {
        age,
        family_size: Some(family_size.to_string()),
        payment_type: Some(payment_type.to_string()),
    }
}

fn complete_rows() -> Vec<RateRow> {
    (MIN_AGE..=MAX_AGE)
        .flat_map(|age| {
            let payment = payment_type_for_age(age).as_str();
            [row(age, "M", payment), row(age, "M+1", payment)]
        })
        .collect()
}

fn rows_json(rows: &[RateRow]) -> Value {
    serde_json::to_value(rows).unwrap()
}

// ============================================================================
// Completeness Tests
// ============================================================================

#[test]
fn test_check_completeness_full_table() {
    let report = check_completeness(&complete_rows());

    assert_eq!(report.expected, 146);
    assert_eq!(report.found, 146);
    assert!(report.is_complete());
}

#[test]
fn test_check_completeness_reports_missing() {
    let rows: Vec<RateRow> = complete_rows()
        .into_iter()
        .filter(|r| !(r.age >= 80 && r.family_size.as_deref() == Some("M+1")))
        .filter(|r| r.age != 18)
        .collect();

    let report = check_completeness(&rows);

    assert!(!report.is_complete());
    assert_eq!(report.found, 133);
    assert_eq!(report.missing.len(), 13);
    assert_eq!(report.missing[0], (18, FamilySize::M));
    assert_eq!(report.missing_ages(FamilySize::M), vec![18]);
    assert_eq!(report.missing_ages(FamilySize::MPlusOne).len(), 12);
}

#[test]
fn test_check_completeness_ignores_unknown_family_sizes() {
    let rows = vec![row(18, "M+2", "ANNUAL"), row(19, "M", "ANNUAL")];
    let report = check_completeness(&rows);
    assert_eq!(report.missing.len(), 145);
}

#[test]
fn test_check_payment_types() {
    let rows = vec![
        row(60, "M", "ANNUAL"),
        row(61, "M", "ANNUAL"),
        row(70, "M+1", "LUMPSUM"),
        RateRow {
            age: 30,
            family_size: Some("M".to_string()),
            payment_type: None,
        },
    ];

    let mismatches = check_payment_types(&rows);

    assert_eq!(
        mismatches,
        vec![
            PaymentTypeMismatch {
                age: 61,
                actual: Some("ANNUAL".to_string()),
                expected: "LUMPSUM".to_string(),
            },
            PaymentTypeMismatch {
                age: 30,
                actual: None,
                expected: "ANNUAL".to_string(),
            },
        ]
    );
}

#[test_case(&[] => "None" ; "empty")]
#[test_case(&[40, 18, 25] => "[18, 25, 40]" ; "short list sorted")]
#[test_case(&[5, 4, 3, 2, 1] => "[1, 2, 3, 4, 5]" ; "five ages")]
#[test_case(&[80, 81, 82, 83, 84, 85] => "Ages 80-85 (6 ages)" ; "range")]
fn test_summarize_ages(ages: &[u32]) -> String {
    summarize_ages(ages)
}

// ============================================================================
// Database Tests
// ============================================================================

async fn verify_against(body: Value) -> VerificationOutcome {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/premium_rates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let http = HttpClient::with_config(HttpClientConfig::builder().max_retries(0).build()).unwrap();
    let db = RestClient::new(&http, DatabaseConfig::new(server.uri(), "key")).unwrap();
    verify_database(&db).await.unwrap()
}

#[tokio::test]
async fn test_verify_database_passes() {
    let outcome = verify_against(rows_json(&complete_rows())).await;
    assert_eq!(outcome, VerificationOutcome::Passed { found: 146 });
    assert!(outcome.passed());
}

#[tokio::test]
async fn test_verify_database_empty() {
    let outcome = verify_against(json!([])).await;
    assert_eq!(outcome, VerificationOutcome::Empty);
    assert!(!outcome.passed());
}

#[tokio::test]
async fn test_verify_database_missing_rows() {
    let rows: Vec<RateRow> = complete_rows().into_iter().skip(2).collect();
    let outcome = verify_against(rows_json(&rows)).await;

    match outcome {
        VerificationOutcome::Missing(report) => {
            assert_eq!(report.missing, vec![(18, FamilySize::M), (18, FamilySize::MPlusOne)]);
        }
        other => panic!("expected missing rows, got {other:?}"),
    }
}

#[tokio::test]
async fn test_verify_database_wrong_payment_types() {
    let mut rows = complete_rows();
    rows[0].payment_type = Some("LUMPSUM".to_string());
    let outcome = verify_against(rows_json(&rows)).await;

    match outcome {
        VerificationOutcome::PaymentTypeErrors(mismatches) => {
            assert_eq!(mismatches.len(), 1);
            assert_eq!(mismatches[0].age, 18);
        }
        other => panic!("expected payment type errors, got {other:?}"),
    }
}

#[tokio::test]
async fn test_verify_database_propagates_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let http = HttpClient::with_config(HttpClientConfig::builder().max_retries(0).build()).unwrap();
    let db = RestClient::new(&http, DatabaseConfig::new(server.uri(), "bad")).unwrap();
    let err = verify_database(&db).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
}
