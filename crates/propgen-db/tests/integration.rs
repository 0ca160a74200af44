//! Offline unit tests for propgen-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use propgen_core::{AppConfig, Environment, PackageTier};
use propgen_db::{CustomerRow, PoolConfig, ProposalRow};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        anthropic_api_key: "sk-test".to_string(),
        llm_base_url: "http://localhost".to_string(),
        llm_model: "standard".to_string(),
        llm_premium_model: "premium".to_string(),
        llm_timeout_secs: 30,
        llm_max_retries: 3,
        llm_backoff_base_ms: 1000,
        thinking_budget: 10_000,
        search_api_key: "serp".to_string(),
        search_base_url: "http://localhost".to_string(),
        search_timeout_secs: 30,
        search_max_retries: 3,
        search_country: "uk".to_string(),
        artifact_dir: PathBuf::from("./artifacts"),
        public_base_url: "http://localhost:3000".to_string(),
        chrome_path: PathBuf::from("chromium"),
        chrome_no_sandbox: false,
        run_deadline_secs: 900,
        reference_doc_path: None,
        industry_map_path: None,
        testimonials_path: None,
        agency_name: "Agency".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    }
}

fn customer() -> CustomerRow {
    CustomerRow {
        id: 7,
        public_id: Uuid::new_v4(),
        company_name: "  Acme Roofing ".to_string(),
        contact_name: None,
        email: None,
        website: Some("https://acmeroofing.co.uk".to_string()),
        industry: Some("Roofing".to_string()),
        location: Some("   ".to_string()),
        sdr_notes: None,
        average_deal_value: Some(Decimal::new(450_050, 2)),
        profit_per_deal: Some(Decimal::ZERO),
        conversion_rate: Some(Decimal::new(30, 2)),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn customer_maps_to_research_request() {
    let request = customer().research_request(PackageTier::Regional);
    assert_eq!(request.company_name, "Acme Roofing");
    assert_eq!(request.website.as_deref(), Some("https://acmeroofing.co.uk"));
    assert_eq!(request.industry, "Roofing");
    assert_eq!(request.location, "United Kingdom");
    assert_eq!(request.tier, PackageTier::Regional);
}

#[test]
fn customer_overrides_round_and_drop_zeroes() {
    let overrides = customer().conversion_overrides();
    assert_eq!(overrides.average_deal_value, Some(4_501));
    assert_eq!(overrides.profit_per_deal, None);
    assert!((overrides.lead_to_customer_rate.unwrap() - 0.3).abs() < 1e-9);
}

#[test]
fn half_pound_deal_values_round_away_from_zero() {
    let cases = [
        (Decimal::new(250_050, 2), Some(2_501)),
        (Decimal::new(199_950, 2), Some(2_000)),
        (Decimal::new(200_049, 2), Some(2_000)),
        (Decimal::new(50, 2), Some(1)),
        (Decimal::new(49, 2), None),
    ];
    for (value, expected) in cases {
        let mut row = customer();
        row.average_deal_value = Some(value);
        row.profit_per_deal = Some(value);
        let overrides = row.conversion_overrides();
        assert_eq!(overrides.average_deal_value, expected, "deal value {value}");
        assert_eq!(overrides.profit_per_deal, expected, "profit {value}");
        assert_eq!(row.deal_value(), expected);
    }
}

/// Compile-time smoke test: confirm that [`ProposalRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn proposal_row_has_expected_fields() {
    let row = ProposalRow {
        id: 1,
        public_id: Uuid::new_v4(),
        proposal_number: "PROP-2026-00001".to_string(),
        customer_id: 7,
        package_tier: "local".to_string(),
        proposal_mode: "concise".to_string(),
        template_style: "classic".to_string(),
        output_format: "pdf".to_string(),
        document_url: "http://localhost:3000/artifacts/acme-roofing-PROP-2026-00001.pdf".to_string(),
        filename: "acme-roofing-PROP-2026-00001.pdf".to_string(),
        model: "standard".to_string(),
        total_tokens: 12_000,
        total_cost: Decimal::new(1185, 4),
        duration_ms: 95_000,
        created_at: Utc::now(),
    };
    assert_eq!(row.total_cost.to_string(), "0.1185");
    assert!(row.document_url.ends_with(&row.filename));
}
