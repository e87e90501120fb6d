//! Support interactions (tickets)

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

categorical! {
    Channel("channel") {
        Email => "email",
        Chat => "chat",
        Phone => "phone",
        Ticket => "ticket",
    }
}

categorical! {
    /// Healthcare product area a ticket is about
    Topic("topic") {
        EhrIntegration => "ehr_integration",
        HipaaCompliance => "hipaa_compliance",
        PatientScheduling => "patient_scheduling",
        BillingWorkflow => "billing_workflow",
        ClinicalDocumentation => "clinical_documentation",
        TelehealthSetup => "telehealth_setup",
        InsuranceVerification => "insurance_verification",
        PatientPortal => "patient_portal",
        ReportingAnalytics => "reporting_analytics",
        ClaimsManagement => "claims_management",
        AppointmentReminders => "appointment_reminders",
        PrescriptionWorkflow => "prescription_workflow",
    }
}

impl Topic {
    /// Topics that always open as high priority
    pub fn is_care_critical(&self) -> bool {
        matches!(
            self,
            Topic::EhrIntegration | Topic::HipaaCompliance | Topic::PatientScheduling
        )
    }

    pub fn title(&self) -> String {
        super::title_case(self.as_str())
    }
}

categorical! {
    Priority("priority") {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

categorical! {
    /// Sentiment vocabulary shared by tickets and calls
    Sentiment("sentiment") {
        Positive => "positive",
        Neutral => "neutral",
        Satisfied => "satisfied",
        Concerned => "concerned",
        Frustrated => "frustrated",
        Negative => "negative",
        Urgent => "urgent",
        Enthusiastic => "enthusiastic",
    }
}

impl Sentiment {
    /// Counted towards the negative-sentiment percentage
    pub fn is_negative(&self) -> bool {
        matches!(self, Sentiment::Frustrated | Sentiment::Negative | Sentiment::Urgent)
    }

    /// Surfaces a ticket in the "recent critical issues" list
    pub fn is_critical(&self) -> bool {
        matches!(self, Sentiment::Frustrated | Sentiment::Urgent)
    }

    pub fn is_upbeat(&self) -> bool {
        matches!(self, Sentiment::Positive | Sentiment::Enthusiastic)
    }
}

categorical! {
    PatientImpact("patient_impact") {
        NoImpact => "None",
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
}

/// A support ticket raised by one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub interaction_id: String,
    pub customer_id: String,
    pub date: NaiveDate,
    pub channel: Channel,
    pub topic: Topic,
    pub priority: Priority,
    pub sentiment: Sentiment,
    pub resolution_time_hours: u32,
    pub resolved: bool,
    pub escalated: bool,
    pub csat_score: Option<u8>,
    pub description: String,
    pub staff_role: String,
    pub affected_users: u32,
    pub patient_impact: Option<PatientImpact>,
}

impl Interaction {
    /// Numeric part of the ticket id ("TICKET-5012" -> "5012")
    pub fn ticket_number(&self) -> &str {
        self.interaction_id
            .split_once('-')
            .map(|(_, n)| n)
            .unwrap_or(&self.interaction_id)
    }
}

/// Ticket counts per topic, most frequent first; ties keep first-seen order
pub fn rank_topics<'a, I>(interactions: I) -> Vec<(Topic, usize)>
where
    I: IntoIterator<Item = &'a Interaction>,
{
    let mut counts: IndexMap<Topic, usize> = IndexMap::new();
    for interaction in interactions {
        *counts.entry(interaction.topic).or_default() += 1;
    }
    let mut ranked: Vec<(Topic, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn interaction(id: &str, customer_id: &str, date: (i32, u32, u32)) -> Interaction {
        Interaction {
            interaction_id: id.to_string(),
            customer_id: customer_id.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            channel: Channel::Email,
            topic: Topic::BillingWorkflow,
            priority: Priority::Low,
            sentiment: Sentiment::Neutral,
            resolution_time_hours: 24,
            resolved: true,
            escalated: false,
            csat_score: Some(4),
            description: "Claims rejecting at an unusual rate.".to_string(),
            staff_role: "Billing Specialist".to_string(),
            affected_users: 3,
            patient_impact: None,
        }
    }
}
