//! Comprehensive customer profile documents

use super::{CustomerRows, CustomerSignals, RiskAssessment};
use crate::model::{thousands, title_case, truncate_chars, ContextDocument, Customer, Priority};
use chrono::NaiveDateTime;
use serde_json::{json, Map, Value};
use std::fmt;

const RULE: &str = "═══════════════════════════════════════════════════════";
const THIN_RULE: &str = "─────────────────────────────────────────";

/// Critical issues and calls listed in the profile
const PROFILE_CRITICAL_ISSUES: usize = 3;
const PROFILE_CALLS: usize = 3;
const PROFILE_REQUESTS: usize = 5;

/// Renders one profile; `to_string()` gives the document content
pub struct ProfileView<'a> {
    pub customer: &'a Customer,
    pub rows: &'a CustomerRows<'a>,
    pub signals: &'a CustomerSignals,
    pub assessment: &'a RiskAssessment,
    pub generated_at: NaiveDateTime,
}

pub(super) fn document(
    customer: &Customer,
    rows: &CustomerRows<'_>,
    signals: &CustomerSignals,
    assessment: &RiskAssessment,
    generated_at: NaiveDateTime,
) -> ContextDocument {
    let content = ProfileView {
        customer,
        rows,
        signals,
        assessment,
        generated_at,
    }
    .to_string();

    ContextDocument::for_customer(customer.customer_id.clone(), content, metadata(customer, assessment))
}

fn metadata(customer: &Customer, assessment: &RiskAssessment) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("segment".to_string(), json!(customer.segment.as_str()));
    map.insert("health_score".to_string(), json!(customer.health_score));
    map.insert("mrr".to_string(), json!(customer.mrr));
    map.insert("tenure".to_string(), json!(customer.tenure_months));
    map.insert("risk_level".to_string(), json!(assessment.level.as_str()));
    map.insert(
        "has_expansion_opportunity".to_string(),
        json!(assessment.has_expansion_opportunity),
    );
    map.insert("has_churn_risk".to_string(), json!(assessment.has_churn_risk));
    map
}

impl fmt::Display for ProfileView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.header(f)?;
        self.engagement(f)?;
        self.critical_issues(f)?;
        self.calls(f)?;
        self.feature_requests(f)?;
        self.risk(f)?;
        self.recommended_actions(f)?;
        writeln!(f)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Document Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        write!(f, "{RULE}")
    }
}

impl ProfileView<'_> {
    fn header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.customer;
        writeln!(f, "{RULE}")?;
        writeln!(f, "COMPREHENSIVE CUSTOMER PROFILE: {}", c.customer_id)?;
        writeln!(f, "{RULE}")?;
        writeln!(f)?;
        writeln!(f, "ORGANIZATION OVERVIEW")?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "Organization: {}", c.organization_name)?;
        writeln!(f, "Type: {} | Specialty: {}", c.org_type, c.specialty)?;
        writeln!(f, "Segment: {}", c.segment)?;
        writeln!(f)?;
        writeln!(f, "SCALE & SCOPE")?;
        writeln!(f, "━━━━━━━━━━━━━")?;
        writeln!(f, "• {} Providers across {} location(s)", c.num_providers, c.num_locations)?;
        writeln!(f, "• {} patients per month", thousands(c.patients_per_month as u64))?;
        writeln!(f, "• Monthly Revenue: ${}", thousands(c.mrr))?;
        writeln!(f, "• Customer since: {} ({} months)", c.signup_date, c.tenure_months)?;
        writeln!(f)?;
        writeln!(f, "TECHNOLOGY STACK")?;
        writeln!(f, "━━━━━━━━━━━━━━━━")?;
        writeln!(f, "• EHR System: {}", c.ehr_system)?;
        writeln!(
            f,
            "• Integration Status: {}",
            if c.ehr_integrated { "✓ Integrated" } else { "✗ Not Integrated - RISK FACTOR" }
        )?;
        writeln!(f, "• Implementation: {}", title_case(c.implementation_status.as_str()))?;
        writeln!(f, "• Compliance: {}", c.compliance_certifications.join(", "))?;
        writeln!(f)?;
        writeln!(f, "ACCOUNT HEALTH")?;
        writeln!(f, "━━━━━━━━━━━━━━")?;
        writeln!(f, "• Health Score: {}/100 {}", c.health_score, c.health_label())?;
        writeln!(f, "• Contract: {}", title_case(c.contract_type.as_str()))?;
        writeln!(f, "• Payment Status: {}", title_case(c.payment_status.as_str()))?;
        writeln!(
            f,
            "• Champion: {} {}",
            c.champion_title,
            if c.champion_exists { "✓ Active" } else { "✗ No Active Champion - RISK" }
        )?;
        writeln!(f)
    }

    fn engagement(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.signals;
        writeln!(f, "ENGAGEMENT & SUPPORT ANALYSIS")?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "Recent Support Activity (Last 10 interactions):")?;
        writeln!(f, "• Total Tickets: {}", s.recent_tickets)?;
        writeln!(f, "• High Priority: {}", s.recent_high_priority)?;
        writeln!(f, "• Escalations: {}", s.recent_escalations)?;
        let concern = if s.negative_sentiment_pct > 30.0 { " ⚠️ CONCERN" } else { "" };
        writeln!(f, "• Negative Sentiment: {:.0}%{}", s.negative_sentiment_pct, concern)?;
        match s.avg_resolution_hours {
            Some(hours) => writeln!(f, "• Average Resolution Time: {:.1} hours", hours)?,
            None => writeln!(f, "• Average Resolution Time: n/a")?,
        }
        writeln!(f, "• Unresolved Tickets: {}", s.unresolved_tickets)?;
        writeln!(f)?;
        writeln!(f, "Most Common Support Topics:")?;
        for (topic, count) in &s.top_topics {
            writeln!(f, "• {}: {} tickets", topic.title(), count)?;
        }
        Ok(())
    }

    fn critical_issues(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let critical: Vec<_> = self
            .rows
            .interactions
            .iter()
            .take(super::RECENT_INTERACTIONS)
            .filter(|i| i.priority == Priority::High || i.sentiment.is_critical())
            .take(PROFILE_CRITICAL_ISSUES)
            .collect();
        if critical.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "⚠️ RECENT CRITICAL ISSUES:")?;
        for ticket in critical {
            writeln!(f)?;
            writeln!(f, "[{}] {}", ticket.date, ticket.topic.title())?;
            writeln!(
                f,
                "Priority: {} | Sentiment: {}",
                ticket.priority.as_str().to_uppercase(),
                title_case(ticket.sentiment.as_str())
            )?;
            writeln!(f, "Description: {}...", truncate_chars(&ticket.description, 200))?;
            writeln!(
                f,
                "Status: {}",
                if ticket.resolved { "Resolved" } else { "❌ OPEN - Action Required" }
            )?;
            writeln!(f, "Staff Role Affected: {}", ticket.staff_role)?;
            match ticket.patient_impact {
                Some(impact) => writeln!(f, "Patient Impact: {}", impact)?,
                None => writeln!(f, "Patient Impact: Unknown")?,
            }
            writeln!(f, "---")?;
        }
        Ok(())
    }

    fn calls(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.calls.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "RECENT CONVERSATIONS & RELATIONSHIP NOTES")?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for call in self.rows.calls.iter().take(PROFILE_CALLS) {
            writeln!(f)?;
            writeln!(f, "[{}] {} Call", call.date, title_case(call.call_type.as_str()))?;
            writeln!(f, "Duration: {} minutes | Attendees: {}", call.duration_minutes, call.attendees)?;
            writeln!(f, "Sentiment: {}", title_case(call.sentiment.as_str()))?;
            writeln!(f)?;
            writeln!(f, "Notes:")?;
            writeln!(f, "{}", call.call_notes)?;
            writeln!(f)?;
            writeln!(f, "Action Items: {}", call.action_items)?;
            if call.expansion_opportunity {
                writeln!(f, "🎯 EXPANSION OPPORTUNITY IDENTIFIED")?;
            }
            if call.churn_risk_mentioned {
                writeln!(f, "⚠️ CHURN RISK DISCUSSED")?;
            }
            writeln!(f, "{THIN_RULE}")?;
        }
        Ok(())
    }

    fn feature_requests(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.feature_requests.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "FEATURE REQUESTS & PRODUCT FEEDBACK")?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for request in self.rows.feature_requests.iter().take(PROFILE_REQUESTS) {
            writeln!(f)?;
            writeln!(f, "[{}] {}", request.date, request.feature_requested)?;
            writeln!(f, "Business Impact: {}", request.business_impact)?;
            writeln!(f, "Pain Point: {}", request.description)?;
            writeln!(f, "Urgency: {} | Status: {}", request.urgency, request.status)?;
            writeln!(f, "Community Votes: {}", request.votes)?;
            writeln!(f, "---")?;
        }
        Ok(())
    }

    fn risk(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.assessment;
        if !a.factors.is_empty() {
            writeln!(f)?;
            writeln!(f, "⚠️ RISK ASSESSMENT")?;
            writeln!(f, "━━━━━━━━━━━━━━━━━")?;
            for factor in &a.factors {
                writeln!(f, "{}", factor)?;
            }
            writeln!(f)?;
            writeln!(f, "OVERALL RISK LEVEL: {}", a.level.banner())?;
        }
        if !a.opportunities.is_empty() {
            writeln!(f)?;
            writeln!(f, "💡 GROWTH OPPORTUNITIES")?;
            writeln!(f, "━━━━━━━━━━━━━━━━━━━━━")?;
            for opportunity in &a.opportunities {
                writeln!(f, "{}", opportunity)?;
            }
        }
        Ok(())
    }

    fn recommended_actions(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.customer;
        writeln!(f)?;
        writeln!(f, "📋 RECOMMENDED ACTIONS")?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━")?;
        if self.assessment.factors.len() > 2 {
            writeln!(f)?;
            writeln!(f, "IMMEDIATE (Next 48 hours):")?;
            writeln!(f, "• Executive touchpoint with champion/decision maker")?;
            writeln!(f, "• Review and address all open high-priority tickets")?;
            writeln!(f, "• Schedule technical review if integration issues present")?;
        }
        if !c.ehr_integrated {
            writeln!(f)?;
            writeln!(f, "SHORT-TERM (Next 2 weeks):")?;
            writeln!(f, "• Prioritize EHR integration completion")?;
            writeln!(f, "• Provide dedicated integration support resources")?;
        }
        if self.signals.expansion_mentioned && c.health_score > 70 {
            writeln!(f)?;
            writeln!(f, "EXPANSION PURSUIT:")?;
            writeln!(f, "• Prepare customized expansion proposal")?;
            writeln!(f, "• Schedule demo of requested features")?;
            writeln!(f, "• Share relevant case studies from similar practices")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::call::fixtures::call;
    use crate::model::customer::fixtures::customer;
    use crate::model::feature_request::fixtures::request;
    use crate::model::interaction::fixtures::interaction;
    use crate::model::{Interaction, Sentiment};
    use chrono::NaiveDate;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 6).unwrap().and_hms_opt(12, 30, 0).unwrap()
    }

    fn render(customer: &Customer, rows: &CustomerRows<'_>) -> ContextDocument {
        let signals = CustomerSignals::compute(rows);
        let assessment = RiskAssessment::assess(customer, &signals);
        document(customer, rows, &signals, &assessment, stamp())
    }

    #[test]
    fn test_quiet_healthy_profile() {
        let c = customer("HC-1000");
        let doc = render(&c, &CustomerRows::default());

        assert!(doc.content.starts_with(RULE));
        assert!(doc.content.contains("COMPREHENSIVE CUSTOMER PROFILE: HC-1000"));
        assert!(doc.content.contains("• 3,000 patients per month"));
        assert!(doc.content.contains("• Health Score: 80/100 🟢 Healthy"));
        assert!(doc.content.contains("• Average Resolution Time: n/a"));
        assert!(!doc.content.contains("RISK ASSESSMENT"));
        assert!(doc.content.contains("💡 GROWTH OPPORTUNITIES"));
        assert!(doc.content.contains("Document Generated: 2025-10-06 12:30:00"));
        assert!(doc.content.ends_with(RULE));

        assert_eq!(doc.customer_id.as_deref(), Some("HC-1000"));
        assert_eq!(doc.metadata["risk_level"], "low");
        assert_eq!(doc.metadata["segment"], "Mid-Market");
        assert_eq!(doc.metadata["has_churn_risk"], false);
    }

    #[test]
    fn test_struggling_profile_sections() {
        let mut c = customer("HC-1000");
        c.health_score = 35;
        c.ehr_integrated = false;
        c.champion_exists = false;

        let mut tickets: Vec<Interaction> = Vec::new();
        for (i, day) in [3, 2, 1].into_iter().enumerate() {
            let mut t = interaction(&format!("TICKET-{}", 5000 + i), "HC-1000", (2025, 5, day));
            t.sentiment = Sentiment::Frustrated;
            t.resolved = i != 0;
            tickets.push(t);
        }
        let mut churn_call = call("CALL-2000", "HC-1000", (2025, 4, 1));
        churn_call.churn_risk_mentioned = true;
        let fr = request("FR-1000", "HC-1000", (2025, 2, 1));

        let rows = CustomerRows {
            interactions: tickets.iter().collect(),
            calls: vec![&churn_call],
            feature_requests: vec![&fr],
        };
        let doc = render(&c, &rows);
        let text = &doc.content;

        assert!(text.contains("• Negative Sentiment: 100% ⚠️ CONCERN"));
        assert!(text.contains("⚠️ RECENT CRITICAL ISSUES:"));
        assert!(text.contains("Status: ❌ OPEN - Action Required"));
        assert!(text.contains("Patient Impact: Unknown"));
        assert!(text.contains("[2025-04-01] Check-in Call"));
        assert!(text.contains("⚠️ CHURN RISK DISCUSSED"));
        assert!(text.contains("[2025-02-01] Lab results integration"));
        assert!(text.contains("🔴 Critical health score (<50)"));
        assert!(text.contains("OVERALL RISK LEVEL: 🔴 HIGH - Immediate Action Required"));
        assert!(text.contains("IMMEDIATE (Next 48 hours):"));
        assert!(text.contains("SHORT-TERM (Next 2 weeks):"));
        assert!(!text.contains("EXPANSION PURSUIT:"));

        assert_eq!(doc.metadata["risk_level"], "high");
        assert_eq!(doc.metadata["has_churn_risk"], true);
        assert_eq!(doc.metadata["health_score"], 35);
    }
}
