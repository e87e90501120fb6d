//! Narrative content generation
//!
//! Expands the base tables into unstructured text: call transcripts, email
//! threads, survey verbatims and intervention outcomes. Each artifact picks a
//! template bucket from the row's sentiment or the customer's health band and
//! fills it from row fields.

pub mod email;
pub mod outcome;
pub mod survey;
pub mod template;
pub mod transcript;

pub use template::{Template, Vars, WeightedTemplates};

use crate::generate::{GeneratorConfig, SyntheticDataset};
use crate::model::{CallTranscript, Channel, Customer, EmailThread, Interaction, OutcomeRecord, SurveyResponse};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use tracing::{debug, info};

/// The four narrative tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NarrativeDataset {
    pub transcripts: Vec<CallTranscript>,
    pub emails: Vec<EmailThread>,
    pub surveys: Vec<SurveyResponse>,
    pub outcomes: Vec<OutcomeRecord>,
}

/// Seeded narrative generator
pub struct NarrativeGenerator {
    rng: StdRng,
    end_date: NaiveDate,
}

impl NarrativeGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            end_date: GeneratorConfig::default().end_date,
        }
    }

    /// Anchor for survey and outcome dates
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = end_date;
        self
    }

    pub fn generate_all(&mut self, dataset: &SyntheticDataset) -> NarrativeDataset {
        let by_id: HashMap<&str, &Customer> = dataset
            .customers
            .iter()
            .map(|c| (c.customer_id.as_str(), c))
            .collect();

        let transcripts = self.transcripts(dataset, &by_id);
        info!(count = transcripts.len(), "Generated call transcripts");

        let emails = self.emails(dataset, &by_id);
        info!(count = emails.len(), "Generated email threads");

        let surveys = self.surveys(&dataset.customers);
        info!(count = surveys.len(), "Generated survey responses");

        let outcomes = self.outcomes(dataset);
        info!(count = outcomes.len(), "Generated outcome records");

        NarrativeDataset {
            transcripts,
            emails,
            surveys,
            outcomes,
        }
    }

    fn transcripts(&mut self, dataset: &SyntheticDataset, by_id: &HashMap<&str, &Customer>) -> Vec<CallTranscript> {
        let mut out = Vec::with_capacity(dataset.calls.len());
        for call in &dataset.calls {
            match by_id.get(call.customer_id.as_str()) {
                Some(customer) => out.push(transcript::transcript(&mut self.rng, customer, call)),
                None => debug!(call_id = %call.call_id, "Skipping call for unknown customer"),
            }
        }
        out
    }

    fn emails(&mut self, dataset: &SyntheticDataset, by_id: &HashMap<&str, &Customer>) -> Vec<EmailThread> {
        let mut out = Vec::new();
        for interaction in dataset.interactions.iter().filter(|i| i.channel == Channel::Email) {
            match by_id.get(interaction.customer_id.as_str()) {
                Some(customer) => {
                    let id = format!("EMAIL-{}", out.len() + 1000);
                    out.push(email::thread(&mut self.rng, customer, interaction, id));
                }
                None => debug!(interaction_id = %interaction.interaction_id, "Skipping ticket for unknown customer"),
            }
        }
        out
    }

    fn surveys(&mut self, customers: &[Customer]) -> Vec<SurveyResponse> {
        let mut out: Vec<SurveyResponse> = Vec::new();
        for customer in customers {
            let next_id = format!("SURVEY-{}", out.len() + 1000);
            if let Some(response) = survey::response(&mut self.rng, customer, self.end_date, || next_id) {
                out.push(response);
            }
        }
        out
    }

    fn outcomes(&mut self, dataset: &SyntheticDataset) -> Vec<OutcomeRecord> {
        let mut per_customer: HashMap<&str, Vec<&Interaction>> = HashMap::new();
        for interaction in &dataset.interactions {
            per_customer
                .entry(interaction.customer_id.as_str())
                .or_default()
                .push(interaction);
        }

        let mut out: Vec<OutcomeRecord> = Vec::new();
        for customer in &dataset.customers {
            let rows = per_customer
                .get(customer.customer_id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let next_id = format!("INS-{}", out.len() + 5000);
            if let Some(record) = outcome::outcome(&mut self.rng, customer, rows, self.end_date, || next_id) {
                out.push(record);
            }
        }
        out
    }
}
