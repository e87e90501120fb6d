//! Context document building
//!
//! Turns the base tables into the text blocks the language model reads:
//! one comprehensive profile per customer, cross-customer thematic insights,
//! the portfolio summary and the compact per-turn chat context. Everything
//! is recomputed from the tables on each call.

pub mod portfolio;
pub mod profile;
pub mod risk;
pub mod signals;
pub mod thematic;

pub use portfolio::PortfolioSummary;
pub use risk::{Opportunity, RiskAssessment, RiskFactor, RiskLevel, Severity};
pub use signals::CustomerSignals;

use crate::generate::SyntheticDataset;
use crate::model::{truncate_chars, Call, ContextDocument, Customer, FeatureRequest, Interaction};
use chrono::{Local, NaiveDateTime};
use std::collections::HashMap;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContextError {
    #[error("Unknown customer: {0}")]
    UnknownCustomer(String),
}

pub type ContextResult<T> = Result<T, ContextError>;

/// Interactions shown in the chat context and counted as "recent"
pub const RECENT_INTERACTIONS: usize = 10;
/// Calls listed in the chat context
pub const CHAT_CALLS: usize = 5;
/// Characters of the stored profile appended to the chat context
pub const CHAT_PROFILE_CHARS: usize = 2000;

/// One customer's rows, newest first
#[derive(Debug, Default, Clone)]
pub struct CustomerRows<'a> {
    pub interactions: Vec<&'a Interaction>,
    pub calls: Vec<&'a Call>,
    pub feature_requests: Vec<&'a FeatureRequest>,
}

/// Builds context documents from one snapshot of the tables
pub struct ContextBuilder<'a> {
    tables: &'a SyntheticDataset,
    rows: HashMap<&'a str, CustomerRows<'a>>,
    generated_at: NaiveDateTime,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(tables: &'a SyntheticDataset) -> Self {
        let mut rows: HashMap<&'a str, CustomerRows<'a>> = HashMap::new();
        for interaction in &tables.interactions {
            rows.entry(interaction.customer_id.as_str()).or_default().interactions.push(interaction);
        }
        for call in &tables.calls {
            rows.entry(call.customer_id.as_str()).or_default().calls.push(call);
        }
        for request in &tables.feature_requests {
            rows.entry(request.customer_id.as_str()).or_default().feature_requests.push(request);
        }

        // Newest first; same-day rows ordered by id so output is stable
        for r in rows.values_mut() {
            r.interactions
                .sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.interaction_id.cmp(&b.interaction_id)));
            r.calls.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.call_id.cmp(&b.call_id)));
            r.feature_requests
                .sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.request_id.cmp(&b.request_id)));
        }

        Self {
            tables,
            rows,
            generated_at: Local::now().naive_local(),
        }
    }

    /// Pin the "Document Generated" stamp so repeated builds compare equal
    pub fn with_timestamp(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn tables(&self) -> &'a SyntheticDataset {
        self.tables
    }

    pub fn customer(&self, customer_id: &str) -> ContextResult<&'a Customer> {
        self.tables
            .customer(customer_id)
            .ok_or_else(|| ContextError::UnknownCustomer(customer_id.to_string()))
    }

    /// Rows for one customer; empty when the customer has no activity
    pub fn rows(&self, customer_id: &str) -> CustomerRows<'a> {
        self.rows.get(customer_id).cloned().unwrap_or_default()
    }

    pub fn signals(&self, customer: &Customer) -> CustomerSignals {
        CustomerSignals::compute(&self.rows(&customer.customer_id))
    }

    pub fn assess(&self, customer: &Customer) -> RiskAssessment {
        RiskAssessment::assess(customer, &self.signals(customer))
    }

    /// The comprehensive profile document for one customer
    pub fn customer_profile(&self, customer_id: &str) -> ContextResult<ContextDocument> {
        let customer = self.customer(customer_id)?;
        let rows = self.rows(customer_id);
        let signals = CustomerSignals::compute(&rows);
        let assessment = RiskAssessment::assess(customer, &signals);
        Ok(profile::document(customer, &rows, &signals, &assessment, self.generated_at))
    }

    /// Profiles for every customer in table order, then the thematic documents
    pub fn build_documents(&self) -> Vec<ContextDocument> {
        let mut docs = Vec::with_capacity(self.tables.customers.len() + 2);
        for customer in &self.tables.customers {
            let rows = self.rows(&customer.customer_id);
            let signals = CustomerSignals::compute(&rows);
            let assessment = RiskAssessment::assess(customer, &signals);
            docs.push(profile::document(customer, &rows, &signals, &assessment, self.generated_at));
        }
        let profiles = docs.len();
        docs.extend(self.thematic_documents());
        info!(profiles, thematic = docs.len() - profiles, "Built context documents");
        docs
    }

    /// Compact context for one customer chat turn
    pub fn customer_chat_context(&self, customer_id: &str, documents: &[ContextDocument]) -> ContextResult<String> {
        let customer = self.customer(customer_id)?;
        let rows = self.rows(customer_id);

        let mut context = format!(
            "
CUSTOMER PROFILE: {name} ({id})

BASIC INFO:
- Segment: {segment}
- Monthly Revenue: ${mrr}
- Health Score: {health}/100
- Customer Since: {since} ({tenure} months)
- Providers: {providers} across {locations} location(s)

TECHNOLOGY:
- EHR System: {ehr}
- Integration Status: {integration}

ACCOUNT HEALTH:
- Champion Status: {champion}
- Payment Status: {payment}

RECENT ACTIVITY:
Support Interactions (Last {RECENT_INTERACTIONS}):",
            name = customer.organization_name,
            id = customer.customer_id,
            segment = customer.segment,
            mrr = crate::model::thousands(customer.mrr),
            health = customer.health_score,
            since = customer.signup_date,
            tenure = customer.tenure_months,
            providers = customer.num_providers,
            locations = customer.num_locations,
            ehr = customer.ehr_system,
            integration = if customer.ehr_integrated { "✓ Integrated" } else { "✗ Not Integrated" },
            champion = if customer.champion_exists { "Active" } else { "No active champion" },
            payment = customer.payment_status,
        );

        for interaction in rows.interactions.iter().take(RECENT_INTERACTIONS) {
            context.push_str(&format!(
                "\n- [{}] {} - {} (Priority: {})",
                interaction.date,
                interaction.topic.title(),
                interaction.sentiment,
                interaction.priority
            ));
        }

        if !rows.calls.is_empty() {
            context.push_str("\n\nRecent Calls:");
            for call in rows.calls.iter().take(CHAT_CALLS) {
                context.push_str(&format!("\n- [{}] {} - {}", call.date, call.call_type, call.sentiment));
            }
        }

        let stored = documents
            .iter()
            .find(|d| d.customer_id.as_deref() == Some(customer_id))
            .map(|d| truncate_chars(&d.content, CHAT_PROFILE_CHARS))
            .filter(|content| !content.is_empty());
        if let Some(analysis) = stored {
            context.push_str("\n\nDETAILED ANALYSIS:\n");
            context.push_str(analysis);
        }

        Ok(context)
    }

    pub fn portfolio(&self) -> PortfolioSummary {
        PortfolioSummary::compute(&self.tables.customers, &self.tables.interactions)
    }
}
