//! Tests for the rate table

use super::seed::format_amount;
use super::*;
use crate::database::{DatabaseConfig, RestClient};
use crate::http::{HttpClient, HttpClientConfig};
use calamine::{Data, Range};
use rust_xlsxwriter::Workbook;
use serde_json::json;
use tempfile::tempdir;
use test_case::test_case;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Sheet with every block filled: lumpsum ages 90..=61, annual ages 60..=18
fn full_sheet() -> Range<Data> {
    let mut range = Range::new((0, 0), (78, 11));
    for block in &RATE_BLOCKS {
        let top_age = match block.payment_type {
            PaymentType::Lumpsum => 90,
            PaymentType::Annual => 60,
        };
        for (offset, row) in (block.first_row..=block.last_row).enumerate() {
            let age = top_age - offset as u32;
            let col = block.anchor_col;
            range.set_value((row, col), Data::Float(f64::from(age)));
            for option in 1..=4 {
                let amount = f64::from(age * 100 + option);
                range.set_value((row, col + option), Data::Float(amount));
            }
        }
    }
    range
}

fn rate(age: u32, family_size: FamilySize) -> PremiumRate {
    PremiumRate {
        age,
        family_size,
        payment_type: payment_type_for_age(age),
        option_1: 1000.0,
        option_2: 2000.0,
        option_3: 3000.0,
        option_4: 4000.0,
    }
}

// ============================================================================
// Type Tests
// ============================================================================

#[test_case(18 => PaymentType::Annual ; "youngest")]
#[test_case(60 => PaymentType::Annual ; "last annual")]
#[test_case(61 => PaymentType::Lumpsum ; "first lumpsum")]
#[test_case(90 => PaymentType::Lumpsum ; "oldest")]
fn test_payment_type_for_age(age: u32) -> PaymentType {
    payment_type_for_age(age)
}

#[test]
fn test_premium_rate_serde_names() {
    let value = serde_json::to_value(rate(61, FamilySize::MPlusOne)).unwrap();
    assert_eq!(value["family_size"], json!("M+1"));
    assert_eq!(value["payment_type"], json!("LUMPSUM"));
    assert_eq!(value["option_4"], json!(4000.0));

    let parsed: PremiumRate = serde_json::from_value(json!({
        "id": 7,
        "age": 30,
        "family_size": "M",
        "payment_type": "ANNUAL",
        "option_1": 1, "option_2": 2, "option_3": 3, "option_4": 4
    }))
    .unwrap();
    assert_eq!(parsed.family_size, FamilySize::M);
    assert_eq!(parsed.option_3, 3.0);
}

// ============================================================================
// Parser Tests
// ============================================================================

#[test]
fn test_parse_full_sheet() {
    let parsed = parse_rate_table(&full_sheet());

    assert!(parsed.skipped.is_empty());
    assert_eq!(parsed.rates.len(), 146);

    let first = &parsed.rates[0];
    assert_eq!(first.age, 90);
    assert_eq!(first.family_size, FamilySize::M);
    assert_eq!(first.payment_type, PaymentType::Lumpsum);
    assert_eq!(first.option_1, 9001.0);
    assert_eq!(first.option_4, 9004.0);

    // Blocks are kept in read order
    assert_eq!(parsed.rates[30].family_size, FamilySize::MPlusOne);
    assert_eq!(parsed.rates[60].payment_type, PaymentType::Annual);
    assert_eq!(parsed.rates[60].age, 60);
    assert_eq!(parsed.rates[145].age, 18);
    assert_eq!(parsed.rates[145].family_size, FamilySize::MPlusOne);
}

#[test]
fn test_parse_skips_bad_rows() {
    let mut range = full_sheet();
    range.set_value((1, 0), Data::String("Age".to_string()));
    range.set_value((2, 3), Data::Empty);
    range.set_value((36, 9), Data::String("n/a".to_string()));

    let parsed = parse_rate_table(&range);

    assert_eq!(parsed.rates.len(), 143);
    assert_eq!(
        parsed.skipped,
        vec![
            SkippedRow {
                row: 1,
                block: "M Lumpsum".to_string(),
                reason: "age \"Age\" is not a whole number".to_string(),
            },
            SkippedRow {
                row: 2,
                block: "M Lumpsum".to_string(),
                reason: "option 3 is missing".to_string(),
            },
            SkippedRow {
                row: 36,
                block: "M+1 Annual".to_string(),
                reason: "option 2 value \"n/a\" is not numeric".to_string(),
            },
        ]
    );
}

#[test]
fn test_parse_truncates_fractional_age_and_reads_text_numbers() {
    let mut range = full_sheet();
    range.set_value((1, 0), Data::Float(90.7));
    range.set_value((1, 1), Data::String(" 1500.5 ".to_string()));

    let parsed = parse_rate_table(&range);
    assert_eq!(parsed.rates[0].age, 90);
    assert_eq!(parsed.rates[0].option_1, 1500.5);
}

#[test]
fn test_parse_empty_sheet_skips_everything() {
    let parsed = parse_rate_table(&Range::empty());
    assert!(parsed.rates.is_empty());
    assert_eq!(parsed.skipped.len(), 146);
    assert_eq!(parsed.skipped[0].reason, "age is missing");
}

#[test]
fn test_load_rate_table_from_workbook() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Rates.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(RATES_SHEET).unwrap();
    sheet.write_string(0, 0, "Retirees").unwrap();
    sheet.write_number(1, 0, 90).unwrap();
    for option in 1..=4u16 {
        sheet.write_number(1, option, 1000.0 * f64::from(option)).unwrap();
    }
    workbook.save(&path).unwrap();

    let parsed = load_rate_table(&path).unwrap();
    assert_eq!(parsed.rates.len(), 1);
    assert_eq!(parsed.rates[0].option_2, 2000.0);
    assert_eq!(parsed.skipped.len(), 145);
}

#[test]
fn test_load_rate_table_wrong_sheet() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Other.xlsx");

    let mut workbook = Workbook::new();
    workbook.add_worksheet().set_name("Sheet1").unwrap();
    workbook.save(&path).unwrap();

    let err = load_rate_table(&path).unwrap_err();
    assert!(matches!(err, crate::Error::SheetNotFound { .. }));
}

#[test_case(0.0 => "0.00")]
#[test_case(999.5 => "999.50")]
#[test_case(1234.567 => "1,234.57")]
#[test_case(1_234_567.0 => "1,234,567.00")]
#[test_case(-45_000.0 => "-45,000.00")]
fn test_format_amount(value: f64) -> String {
    format_amount(value)
}

// ============================================================================
// Seeding Tests
// ============================================================================

fn session() -> HttpClient {
    HttpClient::with_config(HttpClientConfig::builder().max_retries(0).build()).unwrap()
}

#[tokio::test]
async fn test_seed_rates_clears_then_inserts_in_batches() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/premium_rates"))
        .and(query_param("id", "neq.0"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/premium_rates"))
        .respond_with(ResponseTemplate::new(201))
        .expect(3)
        .mount(&server)
        .await;

    let rates: Vec<PremiumRate> = (0..120).map(|i| rate(18 + i % 73, FamilySize::M)).collect();

    let http = session();
    let db = RestClient::new(&http, DatabaseConfig::new(server.uri(), "key")).unwrap();
    let report = seed_rates(&db, &rates, DEFAULT_BATCH_SIZE).await.unwrap();

    assert_eq!(report, SeedReport { inserted: 120 });
}

#[tokio::test]
async fn test_seed_rates_continues_when_clear_fails() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let http = session();
    let db = RestClient::new(&http, DatabaseConfig::new(server.uri(), "key")).unwrap();
    let report = seed_rates(&db, &[rate(30, FamilySize::M)], DEFAULT_BATCH_SIZE)
        .await
        .unwrap();

    assert_eq!(report.inserted, 1);
}

#[tokio::test]
async fn test_seed_rates_insert_failure_aborts() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad row"))
        .expect(1)
        .mount(&server)
        .await;

    let rates: Vec<PremiumRate> = (18..=90).map(|age| rate(age, FamilySize::M)).collect();

    let http = session();
    let db = RestClient::new(&http, DatabaseConfig::new(server.uri(), "key")).unwrap();
    let err = seed_rates(&db, &rates, 10).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_import_summary_counts_and_samples() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/premium_rates"))
        .and(query_param("select", "age,family_size,payment_type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"age": 90, "family_size": "M", "payment_type": "LUMPSUM"},
            {"age": 90, "family_size": "M+1", "payment_type": "LUMPSUM"},
            {"age": 18, "family_size": "M", "payment_type": "ANNUAL"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/premium_rates"))
        .and(query_param("select", "*"))
        .and(query_param("age", "in.(90,60,18)"))
        .and(query_param("order", "age.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"age": 90, "family_size": "M", "payment_type": "LUMPSUM",
             "option_1": 12345.6, "option_2": 2, "option_3": 3, "option_4": 4},
            {"age": 18, "family_size": "M", "payment_type": "ANNUAL",
             "option_1": 500, "option_2": 2, "option_3": 3, "option_4": 4}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let http = session();
    let db = RestClient::new(&http, DatabaseConfig::new(server.uri(), "key")).unwrap();
    let summary = import_summary(&db).await.unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.principal_only, 2);
    assert_eq!(summary.with_spouse, 1);
    assert_eq!(summary.lumpsum, 2);
    assert_eq!(summary.annual, 1);
    assert_eq!(summary.samples.len(), 2);
    assert_eq!(summary.samples[0].age, 90);
}
