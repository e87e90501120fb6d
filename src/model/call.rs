//! Sales and customer-success call records

use super::Sentiment;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

categorical! {
    CallType("call_type") {
        Onboarding => "onboarding",
        CheckIn => "check-in",
        Renewal => "renewal",
        Expansion => "expansion",
        SupportEscalation => "support_escalation",
    }
}

impl CallType {
    /// Call types where an expansion opportunity can be flagged
    pub fn can_surface_expansion(&self) -> bool {
        matches!(self, CallType::CheckIn | CallType::Renewal)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub call_id: String,
    pub customer_id: String,
    pub date: NaiveDate,
    pub call_type: CallType,
    pub duration_minutes: u32,
    pub attendees: String,
    pub call_notes: String,
    /// `" | "`-joined list
    pub action_items: String,
    pub sentiment: Sentiment,
    pub expansion_opportunity: bool,
    pub churn_risk_mentioned: bool,
}
