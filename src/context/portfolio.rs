//! Portfolio-wide summary used as the default chat context

use crate::model::{rank_topics, thousands, Customer, Interaction, Topic};
use std::fmt;

const TOP_TOPICS: usize = 5;
const LOWEST_HEALTH: usize = 5;

/// Row of the critical-customers table
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalCustomer {
    pub organization_name: String,
    pub health_score: u8,
    pub mrr: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    pub total_customers: usize,
    pub total_mrr: u64,
    /// 0.0 on an empty portfolio
    pub avg_health: f64,
    pub at_risk: usize,
    pub critical: usize,
    pub expansion_ready: usize,
    pub top_topics: Vec<(Topic, usize)>,
    /// Lowest health first; ties keep table order
    pub lowest_health: Vec<CriticalCustomer>,
}

impl PortfolioSummary {
    pub fn compute(customers: &[Customer], interactions: &[Interaction]) -> Self {
        let avg_health = if customers.is_empty() {
            0.0
        } else {
            customers.iter().map(|c| c.health_score as f64).sum::<f64>() / customers.len() as f64
        };

        let mut top_topics = rank_topics(interactions);
        top_topics.truncate(TOP_TOPICS);

        let mut by_health: Vec<&Customer> = customers.iter().collect();
        by_health.sort_by_key(|c| c.health_score);
        let lowest_health = by_health
            .into_iter()
            .take(LOWEST_HEALTH)
            .map(|c| CriticalCustomer {
                organization_name: c.organization_name.clone(),
                health_score: c.health_score,
                mrr: c.mrr,
            })
            .collect();

        Self {
            total_customers: customers.len(),
            total_mrr: customers.iter().map(|c| c.mrr).sum(),
            avg_health,
            at_risk: customers.iter().filter(|c| c.is_at_risk()).count(),
            critical: customers.iter().filter(|c| c.is_critical()).count(),
            expansion_ready: customers.iter().filter(|c| c.is_expansion_ready()).count(),
            top_topics,
            lowest_health,
        }
    }

    /// The portfolio context block handed to the model
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PortfolioSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "PORTFOLIO OVERVIEW:")?;
        writeln!(f, "- Total Customers: {}", self.total_customers)?;
        writeln!(f, "- Total MRR: ${}", thousands(self.total_mrr))?;
        writeln!(f, "- Average Health Score: {:.0}/100", self.avg_health)?;
        writeln!(f)?;
        writeln!(f, "RISK ANALYSIS:")?;
        writeln!(f, "- At Risk (Health <50): {} customers", self.at_risk)?;
        writeln!(f, "- Critical (Health <40): {}", self.critical)?;
        writeln!(f)?;
        writeln!(f, "OPPORTUNITIES:")?;
        writeln!(f, "- Expansion Ready: {} customers", self.expansion_ready)?;
        writeln!(f)?;
        writeln!(f, "TOP SUPPORT TOPICS:")?;
        for (topic, count) in &self.top_topics {
            writeln!(f, "- {}: {} tickets", topic.title(), count)?;
        }
        writeln!(f)?;
        writeln!(f, "CRITICAL CUSTOMERS:")?;

        let name_width = self
            .lowest_health
            .iter()
            .map(|c| c.organization_name.chars().count())
            .chain(["organization_name".len()])
            .max()
            .unwrap_or_default();
        writeln!(f, "{:>name_width$}  health_score    mrr", "organization_name")?;
        for row in &self.lowest_health {
            writeln!(
                f,
                "{:>name_width$}  {:>12}  {:>5}",
                row.organization_name, row.health_score, row.mrr
            )?;
        }
        Ok(())
    }
}
