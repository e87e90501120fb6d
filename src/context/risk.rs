//! Risk and opportunity assessment

use super::CustomerSignals;
use crate::model::{Customer, PaymentStatus, Segment};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Warning,
}

impl Severity {
    pub fn marker(&self) -> &'static str {
        match self {
            Severity::Critical => "🔴",
            Severity::Warning => "🟡",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskFactor {
    pub severity: Severity,
    pub description: String,
}

impl RiskFactor {
    fn critical(description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Critical,
            description: description.into(),
        }
    }

    fn warning(description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            description: description.into(),
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.severity.marker(), self.description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Metadata value ("low" / "medium" / "high")
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    pub fn banner(&self) -> &'static str {
        match self {
            RiskLevel::High => "🔴 HIGH - Immediate Action Required",
            RiskLevel::Medium => "🟡 MEDIUM - Monitor Closely",
            RiskLevel::Low => "🟢 LOW - Stable",
        }
    }
}

/// Growth signal surfaced in the profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opportunity(pub String);

impl fmt::Display for Opportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "✓ {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub factors: Vec<RiskFactor>,
    pub level: RiskLevel,
    pub opportunities: Vec<Opportunity>,
    pub has_expansion_opportunity: bool,
    pub has_churn_risk: bool,
}

impl RiskAssessment {
    pub fn assess(customer: &Customer, signals: &CustomerSignals) -> Self {
        let factors = risk_factors(customer, signals);
        let level = RiskLevel::classify(&factors);
        let has_churn_risk = signals.churn_risk_mentioned || factors.len() > 3;

        Self {
            opportunities: opportunities(customer, signals),
            has_expansion_opportunity: signals.expansion_mentioned,
            has_churn_risk,
            level,
            factors,
        }
    }

    pub fn critical_count(&self) -> usize {
        self.factors.iter().filter(|f| f.severity == Severity::Critical).count()
    }
}

impl RiskLevel {
    /// High on more than two critical factors, medium on more than two factors of any kind
    pub fn classify(factors: &[RiskFactor]) -> Self {
        let critical = factors.iter().filter(|f| f.severity == Severity::Critical).count();
        if critical > 2 {
            RiskLevel::High
        } else if factors.len() > 2 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

fn risk_factors(customer: &Customer, signals: &CustomerSignals) -> Vec<RiskFactor> {
    let mut factors = Vec::new();

    if customer.health_score < 50 {
        factors.push(RiskFactor::critical("Critical health score (<50)"));
    } else if customer.health_score < 70 {
        factors.push(RiskFactor::warning("At-risk health score (<70)"));
    }
    if !customer.ehr_integrated {
        factors.push(RiskFactor::critical("EHR not integrated - major friction point"));
    }
    if !customer.champion_exists {
        factors.push(RiskFactor::warning("No active champion identified"));
    }
    if signals.negative_sentiment_pct > 40.0 {
        factors.push(RiskFactor::critical("High negative sentiment in support interactions"));
    }
    if signals.escalated_tickets > 2 {
        factors.push(RiskFactor::warning(format!("{} escalated tickets", signals.escalated_tickets)));
    }
    if customer.payment_status == PaymentStatus::PastDue {
        factors.push(RiskFactor::critical("Payment past due"));
    }
    if signals.churn_risk_mentioned {
        factors.push(RiskFactor::critical("Churn risk explicitly mentioned in calls"));
    }
    if customer.competing_systems.is_threat() {
        factors.push(RiskFactor::warning(format!("Competitive threat: {}", customer.competing_systems)));
    }

    factors
}

fn opportunities(customer: &Customer, signals: &CustomerSignals) -> Vec<Opportunity> {
    let mut found = Vec::new();

    if customer.health_score > 75 && signals.expansion_mentioned {
        found.push(Opportunity("Strong expansion candidate - high health + interest expressed".to_string()));
    }
    if customer.ehr_integrated && customer.health_score > 70 {
        found.push(Opportunity("Good integration success story - reference potential".to_string()));
    }
    if signals.feature_requests > 3 {
        found.push(Opportunity(format!(
            "Highly engaged - {} feature requests submitted",
            signals.feature_requests
        )));
    }
    if customer.num_locations > 3 && customer.segment != Segment::Enterprise {
        found.push(Opportunity("Multi-location practice - potential for enterprise upgrade".to_string()));
    }

    found
}
