//! Synthetic entity generation
//!
//! Produces the customer table and every table that hangs off it. Field
//! distributions are conditioned on customer attributes: organization type
//! picks the revenue band, health score skews ticket and call sentiment.
//! Output is a pure function of [`GeneratorConfig`].

pub mod catalog;
mod calls;
mod customers;
mod descriptions;
mod feature_requests;
mod interactions;
mod telemetry;

use crate::model::{Call, Customer, FeatureRequest, Interaction, UsageTelemetry};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

/// Knobs for one synthetic run
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Number of customer organizations
    pub customers: usize,
    /// Seed for every random draw
    pub seed: u64,
    pub calls_per_customer: usize,
    /// Days of usage telemetry ending at `end_date`
    pub telemetry_days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            customers: 300,
            seed: 42,
            calls_per_customer: 2,
            telemetry_days: 90,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2025, 10, 6).unwrap_or_default(),
        }
    }
}

/// The four base tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntheticDataset {
    pub customers: Vec<Customer>,
    pub interactions: Vec<Interaction>,
    pub calls: Vec<Call>,
    pub feature_requests: Vec<FeatureRequest>,
}

impl SyntheticDataset {
    pub fn customer(&self, customer_id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.customer_id == customer_id)
    }
}

/// Seeded generator for the base tables
pub struct SyntheticGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl SyntheticGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate customers, then every dependent table from them
    pub fn generate(&mut self) -> SyntheticDataset {
        info!(customers = self.config.customers, seed = self.config.seed, "Generating healthcare customers");
        let customers = customers::generate(&mut self.rng, &self.config);

        let interactions = interactions::generate(&mut self.rng, &self.config, &customers);
        info!(count = interactions.len(), "Generated support interactions");

        let calls = calls::generate(&mut self.rng, &self.config, &customers);
        info!(count = calls.len(), "Generated call notes");

        let feature_requests = feature_requests::generate(&mut self.rng, &self.config, &customers);
        info!(count = feature_requests.len(), "Generated feature requests");

        SyntheticDataset {
            customers,
            interactions,
            calls,
            feature_requests,
        }
    }

    /// Daily usage for the last `telemetry_days` of the window.
    ///
    /// Uses its own random stream so adding telemetry never changes the base tables.
    pub fn generate_telemetry(&self, customers: &[Customer]) -> Vec<UsageTelemetry> {
        let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(0x7e1e));
        let rows = telemetry::generate(&mut rng, &self.config, customers);
        info!(count = rows.len(), "Generated usage telemetry");
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MrrBand, Priority, Sentiment};
    use std::collections::HashSet;

    fn small_config() -> GeneratorConfig {
        GeneratorConfig {
            customers: 60,
            seed: 7,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = SyntheticGenerator::new(small_config()).generate();
        let b = SyntheticGenerator::new(small_config()).generate();
        assert_eq!(a, b);

        let other = SyntheticGenerator::new(GeneratorConfig { seed: 8, ..small_config() }).generate();
        assert_ne!(a.customers, other.customers);
    }

    #[test]
    fn test_health_and_mrr_bands() {
        let data = SyntheticGenerator::new(small_config()).generate();
        assert_eq!(data.customers.len(), 60);
        for c in &data.customers {
            assert!(c.health_score <= 100);
            assert!(MrrBand::for_org_type(c.org_type).contains(c), "{:?} outside band", c.customer_id);
            if c.tenure_months < 6 {
                assert!(c.health_score >= 30);
            }
        }
    }

    #[test]
    fn test_referential_consistency() {
        let data = SyntheticGenerator::new(small_config()).generate();
        let ids: HashSet<&str> = data.customers.iter().map(|c| c.customer_id.as_str()).collect();
        assert!(data.interactions.iter().all(|i| ids.contains(i.customer_id.as_str())));
        assert!(data.calls.iter().all(|c| ids.contains(c.customer_id.as_str())));
        assert!(data.feature_requests.iter().all(|r| ids.contains(r.customer_id.as_str())));
        assert_eq!(data.calls.len(), 60 * 2);
    }

    #[test]
    fn test_sentiment_conditioned_on_health() {
        let data = SyntheticGenerator::new(GeneratorConfig { customers: 120, ..small_config() }).generate();
        for ticket in &data.interactions {
            let customer = data.customer(&ticket.customer_id).unwrap();
            if customer.health_score > 70 {
                assert!(matches!(
                    ticket.sentiment,
                    Sentiment::Positive | Sentiment::Neutral | Sentiment::Satisfied
                ));
            } else if customer.health_score <= 50 {
                assert!(ticket.sentiment.is_negative());
            }
            if ticket.escalated {
                assert_eq!(ticket.priority, Priority::High);
            }
            if ticket.topic.is_care_critical() || ticket.sentiment.is_critical() {
                assert_eq!(ticket.priority, Priority::High);
            }
        }
    }

    #[test]
    fn test_call_flags_follow_rules() {
        let data = SyntheticGenerator::new(small_config()).generate();
        for call in &data.calls {
            if call.expansion_opportunity {
                assert!(call.call_type.can_surface_expansion());
            }
            if call.churn_risk_mentioned {
                assert!(data.customer(&call.customer_id).unwrap().health_score < 60);
            }
        }
    }

    #[test]
    fn test_dates_within_window() {
        let config = small_config();
        let data = SyntheticGenerator::new(config.clone()).generate();
        assert!(data
            .interactions
            .iter()
            .all(|i| i.date >= config.start_date && i.date <= config.end_date));
        assert!(data
            .calls
            .iter()
            .all(|c| c.date >= config.start_date && c.date <= config.end_date));
    }

    #[test]
    fn test_telemetry_rows_and_integration_rule() {
        let config = GeneratorConfig { customers: 10, telemetry_days: 30, ..small_config() };
        let mut generator = SyntheticGenerator::new(config);
        let data = generator.generate();
        let telemetry = generator.generate_telemetry(&data.customers);
        assert_eq!(telemetry.len(), 10 * 30);
        for row in &telemetry {
            let customer = data.customer(&row.customer_id).unwrap();
            if !customer.ehr_integrated {
                assert_eq!(row.ehr_sync_failures, 0);
            }
            assert_eq!(row.licensed_users, customer.num_providers);
            assert!(row.total_sessions >= 1);
        }
    }
}
