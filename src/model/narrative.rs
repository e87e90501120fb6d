//! Free-text artifacts derived from the base tables

use super::Sentiment;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallTranscript {
    pub call_id: String,
    pub customer_id: String,
    pub date: NaiveDate,
    pub transcript: String,
    pub key_quotes: String,
    pub competitor_mentioned: bool,
    pub expansion_signals: bool,
    pub churn_signals: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailThread {
    pub email_id: String,
    pub customer_id: String,
    pub interaction_id: String,
    pub date: NaiveDate,
    pub thread_content: String,
    pub sentiment: Sentiment,
    /// "high" for high-priority tickets, otherwise "normal"
    pub escalation_level: String,
}

categorical! {
    NpsCategory("nps_category") {
        Promoter => "promoter",
        Passive => "passive",
        Detractor => "detractor",
    }
}

impl NpsCategory {
    /// Bands by health score: above 80 promote, above 60 stay passive
    pub fn for_health(health_score: u8) -> Self {
        if health_score > 80 {
            NpsCategory::Promoter
        } else if health_score > 60 {
            NpsCategory::Passive
        } else {
            NpsCategory::Detractor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub survey_id: String,
    pub customer_id: String,
    pub survey_date: NaiveDate,
    pub nps_score: u8,
    pub nps_category: NpsCategory,
    pub ease_of_use: u8,
    pub feature_satisfaction: u8,
    pub support_satisfaction: u8,
    pub value_for_money: u8,
    pub primary_reason_verbatim: String,
    pub improvement_suggestion_verbatim: String,
    pub considering_alternatives_verbatim: String,
    pub would_recommend_verbatim: String,
}

categorical! {
    OutcomeStatus("outcome_status") {
        Resolved => "resolved",
        Unresolved => "unresolved",
        Churned => "churned",
    }
}

/// Tracks what happened after a churn-risk insight was raised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub insight_id: String,
    pub customer_id: String,
    pub generated_date: NaiveDate,
    pub insight_type: String,
    pub risk_score: u8,
    pub primary_issue: String,
    /// JSON array of strings
    pub recommended_actions: String,
    /// JSON array of `{action, completed, date}` objects
    pub actions_taken: String,
    pub outcome_status: OutcomeStatus,
    pub health_score_before: u8,
    pub health_score_after: u8,
    pub health_score_change: i32,
    pub churn_prevented: bool,
    pub expansion_occurred: bool,
    pub expansion_arr: f64,
    pub mrr_retained: u64,
    pub customer_feedback: String,
    /// JSON array of strings
    pub learnings: String,
}
