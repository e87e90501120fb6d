use super::catalog::{BUSINESS_IMPACTS, FEATURE_REQUESTS, PAIN_POINTS, REQUEST_STATUSES, URGENCIES};
use super::GeneratorConfig;
use crate::model::{Customer, FeatureRequest};
use crate::sampling::{chance, date_between, pick};
use rand::Rng;

/// Share of customers that file any feature request
const SUBMITTING_SHARE: f64 = 0.6;

pub(super) fn generate<R: Rng>(rng: &mut R, config: &GeneratorConfig, customers: &[Customer]) -> Vec<FeatureRequest> {
    let mut requests = Vec::new();

    for customer in customers {
        if !chance(rng, SUBMITTING_SHARE) {
            continue;
        }
        let count = rng.gen_range(1..5);
        for _ in 0..count {
            requests.push(FeatureRequest {
                request_id: format!("FR-{}", requests.len() + 1000),
                customer_id: customer.customer_id.clone(),
                date: date_between(rng, config.start_date, config.end_date),
                feature_requested: pick(rng, FEATURE_REQUESTS).to_string(),
                description: pick(rng, PAIN_POINTS).to_string(),
                business_impact: pick(rng, BUSINESS_IMPACTS).to_string(),
                votes: rng.gen_range(1..50),
                status: pick(rng, REQUEST_STATUSES).to_string(),
                urgency: pick(rng, URGENCIES).to_string(),
            });
        }
    }

    requests
}
