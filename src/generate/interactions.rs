use super::catalog::STAFF_ROLES;
use super::{descriptions, GeneratorConfig};
use crate::model::{Channel, Customer, Interaction, PatientImpact, Priority, Sentiment, Topic};
use crate::sampling::{chance, date_between, pick, pick_of, weighted};
use rand::Rng;
use rand_distr::{Distribution, Poisson};

/// Mean tickets per customer over the whole window
const MEAN_TICKETS_PER_CUSTOMER: f64 = 4.0;

pub(super) fn generate<R: Rng>(rng: &mut R, config: &GeneratorConfig, customers: &[Customer]) -> Vec<Interaction> {
    let poisson = Poisson::new(MEAN_TICKETS_PER_CUSTOMER).ok();
    let mut interactions = Vec::new();

    for customer in customers {
        let count = poisson
            .as_ref()
            .map(|p| p.sample(rng) as usize)
            .unwrap_or(MEAN_TICKETS_PER_CUSTOMER as usize);

        for _ in 0..count {
            let id = format!("TICKET-{}", interactions.len() + 5000);
            interactions.push(interaction(rng, config, customer, id));
        }
    }

    interactions
}

/// Health above 70 stays upbeat, above 50 drifts to concern, the rest is negative
fn sentiment_for_health<R: Rng>(rng: &mut R, health_score: u8) -> Sentiment {
    if health_score > 70 {
        weighted(
            rng,
            &[(Sentiment::Positive, 0.5), (Sentiment::Neutral, 0.3), (Sentiment::Satisfied, 0.2)],
        )
    } else if health_score > 50 {
        weighted(
            rng,
            &[(Sentiment::Neutral, 0.5), (Sentiment::Concerned, 0.3), (Sentiment::Frustrated, 0.2)],
        )
    } else {
        weighted(
            rng,
            &[(Sentiment::Frustrated, 0.4), (Sentiment::Negative, 0.4), (Sentiment::Urgent, 0.2)],
        )
    }
}

fn priority_for<R: Rng>(rng: &mut R, topic: Topic, sentiment: Sentiment) -> Priority {
    if topic.is_care_critical() || sentiment.is_critical() {
        Priority::High
    } else if sentiment == Sentiment::Negative {
        Priority::Medium
    } else {
        weighted(rng, &[(Priority::Low, 0.6), (Priority::Medium, 0.4)])
    }
}

fn interaction<R: Rng>(rng: &mut R, config: &GeneratorConfig, customer: &Customer, interaction_id: String) -> Interaction {
    let date = date_between(rng, config.start_date, config.end_date);
    let topic = pick_of(rng, Topic::ALL);
    let sentiment = sentiment_for_health(rng, customer.health_score);
    let priority = priority_for(rng, topic, sentiment);
    let description = descriptions::ticket_description(rng, topic, sentiment, customer);

    let channel = weighted(
        rng,
        &[
            (Channel::Email, 0.3),
            (Channel::Chat, 0.3),
            (Channel::Phone, 0.3),
            (Channel::Ticket, 0.1),
        ],
    );
    let resolution_time_hours = rng.gen_range(2..96);
    let resolved = chance(rng, 0.85);
    let escalated = priority == Priority::High && chance(rng, 0.15);
    let csat_score = if rng.gen::<f64>() > 0.4 { Some(rng.gen_range(1..6)) } else { None };
    let staff_role = pick(rng, STAFF_ROLES).to_string();
    let affected_users = rng.gen_range(1..customer.num_providers.clamp(2, 10));
    let patient_impact = if rng.gen::<f64>() > 0.5 {
        Some(pick_of(rng, PatientImpact::ALL))
    } else {
        None
    };

    Interaction {
        interaction_id,
        customer_id: customer.customer_id.clone(),
        date,
        channel,
        topic,
        priority,
        sentiment,
        resolution_time_hours,
        resolved,
        escalated,
        csat_score,
        description,
        staff_role,
        affected_users,
        patient_impact,
    }
}
