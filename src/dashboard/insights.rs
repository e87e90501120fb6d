//! Quick-insight cards with a suggested chat question each

use crate::model::{Customer, Segment};

/// Share of current MRR shown as expansion potential
pub const EXPANSION_SHARE: f64 = 0.4;
const CARDS: usize = 5;

/// Offered before the first chat turn
pub const STARTER_QUESTIONS: [&str; 3] = [
    "Which customers need attention today?",
    "Show me expansion opportunities",
    "What are the biggest product issues?",
];

#[derive(Debug, Clone, PartialEq)]
pub struct InsightCard {
    pub customer_id: String,
    pub organization_name: String,
    pub segment: Segment,
    pub mrr: u64,
    pub health_score: u8,
    pub ehr_system: String,
    pub ehr_integrated: bool,
    pub tenure_months: u32,
    pub num_providers: u32,
    /// Set on expansion cards only
    pub expansion_potential: Option<f64>,
    /// Question that opens a chat scoped to this customer
    pub question: String,
}

impl InsightCard {
    fn new(c: &Customer, question: String, expansion_potential: Option<f64>) -> Self {
        Self {
            customer_id: c.customer_id.clone(),
            organization_name: c.organization_name.clone(),
            segment: c.segment,
            mrr: c.mrr,
            health_score: c.health_score,
            ehr_system: c.ehr_system.clone(),
            ehr_integrated: c.ehr_integrated,
            tenure_months: c.tenure_months,
            num_providers: c.num_providers,
            expansion_potential,
            question,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuickInsights {
    /// Lowest-health critical customers, worst first
    pub critical: Vec<InsightCard>,
    /// Highest-MRR expansion-ready customers, largest first
    pub expansion: Vec<InsightCard>,
}

impl QuickInsights {
    pub fn compute(customers: &[Customer]) -> Self {
        let mut critical: Vec<&Customer> = customers.iter().filter(|c| c.is_critical()).collect();
        critical.sort_by_key(|c| c.health_score);

        let mut expansion: Vec<&Customer> = customers.iter().filter(|c| c.is_expansion_ready()).collect();
        expansion.sort_by(|a, b| b.mrr.cmp(&a.mrr));

        Self {
            critical: critical
                .into_iter()
                .take(CARDS)
                .map(|c| {
                    InsightCard::new(
                        c,
                        format!("What's the churn risk analysis for {}?", c.organization_name),
                        None,
                    )
                })
                .collect(),
            expansion: expansion
                .into_iter()
                .take(CARDS)
                .map(|c| {
                    InsightCard::new(
                        c,
                        format!("What's the expansion strategy for {}?", c.organization_name),
                        Some(c.mrr as f64 * EXPANSION_SHARE),
                    )
                })
                .collect(),
        }
    }
}
