use super::catalog::CALL_ATTENDEES;
use super::{descriptions, GeneratorConfig};
use crate::model::{Call, CallType, Customer, Sentiment};
use crate::sampling::{chance, date_between, pick, pick_of, weighted};
use rand::Rng;

pub(super) fn generate<R: Rng>(rng: &mut R, config: &GeneratorConfig, customers: &[Customer]) -> Vec<Call> {
    let mut calls = Vec::with_capacity(customers.len() * config.calls_per_customer);

    for customer in customers {
        for _ in 0..config.calls_per_customer {
            let id = format!("CALL-{}", calls.len() + 2000);
            calls.push(call(rng, config, customer, id));
        }
    }

    calls
}

/// Call tone leans on account health the same way ticket sentiment does
fn call_sentiment<R: Rng>(rng: &mut R, health_score: u8) -> Sentiment {
    if health_score > 70 {
        weighted(
            rng,
            &[
                (Sentiment::Positive, 0.35),
                (Sentiment::Enthusiastic, 0.3),
                (Sentiment::Neutral, 0.25),
                (Sentiment::Concerned, 0.1),
            ],
        )
    } else if health_score > 50 {
        weighted(
            rng,
            &[
                (Sentiment::Positive, 0.2),
                (Sentiment::Enthusiastic, 0.1),
                (Sentiment::Neutral, 0.4),
                (Sentiment::Concerned, 0.3),
            ],
        )
    } else {
        weighted(
            rng,
            &[
                (Sentiment::Positive, 0.1),
                (Sentiment::Neutral, 0.3),
                (Sentiment::Concerned, 0.4),
                (Sentiment::Frustrated, 0.2),
            ],
        )
    }
}

fn call<R: Rng>(rng: &mut R, config: &GeneratorConfig, customer: &Customer, call_id: String) -> Call {
    let date = date_between(rng, config.start_date, config.end_date);
    let call_type = pick_of(rng, CallType::ALL);
    let call_notes = descriptions::call_notes(rng, call_type, customer);

    let duration_minutes = rng.gen_range(15..90);
    let attendees = pick(rng, CALL_ATTENDEES).to_string();
    let sentiment = call_sentiment(rng, customer.health_score);
    let expansion_opportunity = call_type.can_surface_expansion() && chance(rng, 0.5);
    let churn_risk_mentioned = customer.health_score < 60 && chance(rng, 0.15);

    Call {
        call_id,
        customer_id: customer.customer_id.clone(),
        date,
        call_type,
        duration_minutes,
        attendees,
        call_notes,
        action_items: descriptions::action_items(call_type),
        sentiment,
        expansion_opportunity,
        churn_risk_mentioned,
    }
}
