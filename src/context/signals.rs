//! Per-customer summary statistics

use super::{CustomerRows, RECENT_INTERACTIONS};
use crate::model::{rank_topics, Priority, Topic};

/// Support and relationship signals for one customer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerSignals {
    /// Size of the recent window (at most 10)
    pub recent_tickets: usize,
    pub recent_high_priority: usize,
    pub recent_escalations: usize,
    /// Share of frustrated / negative / urgent tickets in the recent window, 0-100
    pub negative_sentiment_pct: f64,
    pub total_tickets: usize,
    pub high_priority_tickets: usize,
    pub escalated_tickets: usize,
    pub unresolved_tickets: usize,
    /// `None` when the customer has no tickets
    pub avg_resolution_hours: Option<f64>,
    /// Up to three topics, most frequent first
    pub top_topics: Vec<(Topic, usize)>,
    pub affected_users_total: u64,
    pub expansion_mentioned: bool,
    pub churn_risk_mentioned: bool,
    pub feature_requests: usize,
}

impl CustomerSignals {
    pub fn compute(rows: &CustomerRows<'_>) -> Self {
        let recent = &rows.interactions[..rows.interactions.len().min(RECENT_INTERACTIONS)];
        let negative = recent.iter().filter(|i| i.sentiment.is_negative()).count();
        let negative_sentiment_pct = if recent.is_empty() {
            0.0
        } else {
            negative as f64 / recent.len() as f64 * 100.0
        };

        let all = &rows.interactions;
        let avg_resolution_hours = if all.is_empty() {
            None
        } else {
            Some(all.iter().map(|i| i.resolution_time_hours as f64).sum::<f64>() / all.len() as f64)
        };

        let mut top_topics = rank_topics(all.iter().copied());
        top_topics.truncate(3);

        Self {
            recent_tickets: recent.len(),
            recent_high_priority: recent.iter().filter(|i| i.priority == Priority::High).count(),
            recent_escalations: recent.iter().filter(|i| i.escalated).count(),
            negative_sentiment_pct,
            total_tickets: all.len(),
            high_priority_tickets: all.iter().filter(|i| i.priority == Priority::High).count(),
            escalated_tickets: all.iter().filter(|i| i.escalated).count(),
            unresolved_tickets: all.iter().filter(|i| !i.resolved).count(),
            avg_resolution_hours,
            top_topics,
            affected_users_total: all.iter().map(|i| i.affected_users as u64).sum(),
            expansion_mentioned: rows.calls.iter().any(|c| c.expansion_opportunity),
            churn_risk_mentioned: rows.calls.iter().any(|c| c.churn_risk_mentioned),
            feature_requests: rows.feature_requests.len(),
        }
    }
}
