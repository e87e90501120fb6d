use careinsight::context::ContextBuilder;
use careinsight::generate::{GeneratorConfig, SyntheticGenerator};
use careinsight::model::{DocType, MrrBand};
use careinsight::persistence::{read_documents, write_documents, write_samples, DataLayout};
use careinsight::{DashboardData, NarrativeGenerator, PortfolioSummary};
use chrono::NaiveDate;
use std::collections::HashSet;
use tempfile::TempDir;

fn config() -> GeneratorConfig {
    GeneratorConfig {
        customers: 40,
        seed: 11,
        ..GeneratorConfig::default()
    }
}

#[test]
fn test_generated_customers_respect_bands() {
    let data = SyntheticGenerator::new(config()).generate();
    for c in &data.customers {
        assert!(c.health_score <= 100, "{} health {}", c.customer_id, c.health_score);
        assert!(MrrBand::for_org_type(c.org_type).contains(c), "{} outside its band", c.customer_id);
    }
}

#[test]
fn test_every_row_references_a_customer() {
    let data = SyntheticGenerator::new(config()).generate();
    let ids: HashSet<&str> = data.customers.iter().map(|c| c.customer_id.as_str()).collect();

    assert!(data.interactions.iter().all(|i| ids.contains(i.customer_id.as_str())));
    assert!(data.calls.iter().all(|c| ids.contains(c.customer_id.as_str())));
    assert!(data.feature_requests.iter().all(|r| ids.contains(r.customer_id.as_str())));
}

#[test]
fn test_context_documents_are_idempotent_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let layout = DataLayout::new(temp_dir.path());
    layout.write_dataset(&SyntheticGenerator::new(config()).generate()).unwrap();

    let stamp = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap().and_hms_opt(12, 0, 0).unwrap();
    let build = || {
        let tables = layout.read_dataset().unwrap();
        let docs = ContextBuilder::new(&tables).with_timestamp(stamp).build_documents();
        write_documents(&layout.documents(), &docs).unwrap();
        std::fs::read(layout.documents()).unwrap()
    };

    let first = build();
    let second = build();
    assert_eq!(first, second);

    let docs = read_documents(&layout.documents()).unwrap();
    let profiles = docs.iter().filter(|d| d.doc_type == DocType::ComprehensiveProfile).count();
    assert_eq!(profiles, 40);
    assert!(docs[..profiles].iter().all(|d| d.customer_id.is_some()));
    assert!(docs[profiles..].iter().all(|d| d.theme.is_some()));
}

#[test]
fn test_portfolio_counts_are_consistent() {
    let data = SyntheticGenerator::new(config()).generate();
    let s = PortfolioSummary::compute(&data.customers, &data.interactions);

    let count = |f: &dyn Fn(u8, u32) -> bool| data.customers.iter().filter(|c| f(c.health_score, c.tenure_months)).count();
    assert_eq!(s.at_risk, count(&|h, _| h < 50));
    assert_eq!(s.critical, count(&|h, _| h < 40));
    assert_eq!(s.expansion_ready, count(&|h, t| h > 70 && t > 6));
    assert!(s.critical <= s.at_risk);

    // at_risk and expansion_ready never overlap, and the rest covers the gap
    let middle = count(&|h, t| h >= 50 && !(h > 70 && t > 6));
    assert_eq!(s.at_risk + s.expansion_ready + middle, s.total_customers);
}

#[test]
fn test_full_pipeline_feeds_dashboard() {
    let temp_dir = TempDir::new().unwrap();
    let layout = DataLayout::new(temp_dir.path());

    let cfg = config();
    let mut generator = SyntheticGenerator::new(cfg.clone());
    let data = generator.generate();
    layout.write_dataset(&data).unwrap();
    layout.write_telemetry(&generator.generate_telemetry(&data.customers)).unwrap();
    let narratives = NarrativeGenerator::new(cfg.seed).with_end_date(cfg.end_date).generate_all(&data);
    layout.write_narratives(&narratives).unwrap();

    let docs = ContextBuilder::new(&data).build_documents();
    write_documents(&layout.documents(), &docs).unwrap();
    assert_eq!(write_samples(&layout, &docs).unwrap(), 3);

    let report = DashboardData::load(&layout);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    let loaded = report.data.unwrap();
    assert_eq!(loaded.tables, data);
    assert_eq!(loaded.documents.len(), docs.len());
    assert_eq!(loaded.metrics().customers, 40);
    assert_eq!(layout.read_narratives().unwrap(), narratives);
}

#[test]
fn test_empty_directory_runs_without_data() {
    let temp_dir = TempDir::new().unwrap();
    let report = DashboardData::load(&DataLayout::new(temp_dir.path()));
    assert!(report.data.is_none());
    assert!(!report.errors.is_empty());
}
