//! Cross-customer thematic insight documents

use super::ContextBuilder;
use crate::model::{
    thousands, thousands_f64, truncate_chars, Call, ContextDocument, Customer, Interaction, Priority, Topic,
};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Theme key of the expansion pipeline document
pub const EXPANSION_THEME: &str = "expansion_opportunities";

/// Share of current MRR assumed as expansion upside
const EXPANSION_UPLIFT: f64 = 0.5;

const RECENT_INCIDENTS: usize = 5;
const TOP_OPPORTUNITIES: usize = 5;
const RULE: &str = "═══════════════════════════════════════════════════════";
const THIN_RULE: &str = "─────────────────────────────────────────";

/// Counts by key, most frequent first; ties keep first-seen order
fn ranked<K: Hash + Eq>(keys: impl IntoIterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: IndexMap<K, usize> = IndexMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    let mut ranked: Vec<(K, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

fn topic_actions(topic: Topic) -> [&'static str; 4] {
    match topic {
        Topic::EhrIntegration => [
            "IMMEDIATE: Create dedicated EHR integration support team",
            "SHORT-TERM: Develop automated monitoring for EHR API health",
            "MEDIUM-TERM: Proactive communication before EHR vendor updates",
            "LONG-TERM: Enhanced integration resilience and error handling",
        ],
        _ => [
            "IMMEDIATE: Review all open high-priority tickets in this area",
            "SHORT-TERM: Publish a known-issues note and workaround guide",
            "MEDIUM-TERM: Add product telemetry around the failing workflow",
            "LONG-TERM: Prioritize the fix in the product roadmap",
        ],
    }
}

fn topic_implications(topic: Topic) -> [&'static str; 3] {
    match topic {
        Topic::EhrIntegration => [
            "Consider building EHR update notification system",
            "Improve error messaging for integration failures",
            "Develop self-service diagnostic tools for practices",
        ],
        _ => [
            "Review the workflow with affected practices",
            "Improve in-product guidance for this area",
            "Track ticket volume after each release",
        ],
    }
}

/// All tickets on one topic, newest first, joined to their customers
struct TopicView<'a> {
    topic: Topic,
    tickets: Vec<&'a Interaction>,
    joined: Vec<(&'a Interaction, &'a Customer)>,
    affected: Vec<&'a str>,
    revenue_at_risk: u64,
}

impl TopicView<'_> {
    fn high_priority(&self) -> usize {
        self.tickets.iter().filter(|t| t.priority == Priority::High).count()
    }

    fn avg_resolution(&self) -> f64 {
        self.tickets.iter().map(|t| t.resolution_time_hours as f64).sum::<f64>() / self.tickets.len().max(1) as f64
    }
}

impl fmt::Display for TopicView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (title, label) = if self.topic == Topic::EhrIntegration {
            ("EHR INTEGRATION CHALLENGES".to_string(), "EHR".to_string())
        } else {
            (format!("{} CHALLENGES", self.topic.title().to_uppercase()), self.topic.title())
        };

        writeln!(f, "THEMATIC INSIGHT: {title}")?;
        writeln!(f, "{RULE}")?;
        writeln!(f)?;
        writeln!(f, "SCOPE OF ISSUE")?;
        writeln!(f, "━━━━━━━━━━━━━━")?;
        writeln!(f, "• Total {label}-related tickets: {}", self.tickets.len())?;
        writeln!(f, "• Customers affected: {}", self.affected.len())?;
        writeln!(f, "• High priority: {}", self.high_priority())?;
        writeln!(f, "• Average resolution time: {:.1} hours", self.avg_resolution())?;
        writeln!(f)?;
        writeln!(f, "BREAKDOWN BY EHR SYSTEM:")?;
        for (ehr, count) in ranked(self.joined.iter().map(|(_, c)| c.ehr_system.as_str())).into_iter().take(5) {
            writeln!(f, "• {ehr}: {count} tickets")?;
        }
        writeln!(f)?;
        writeln!(f, "SEGMENT IMPACT:")?;
        for (segment, count) in ranked(self.joined.iter().map(|(_, c)| c.segment)) {
            writeln!(f, "• {segment}: {count} tickets")?;
        }
        writeln!(f)?;
        writeln!(f, "RECENT INCIDENTS (Last {RECENT_INCIDENTS}):")?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━")?;
        for (ticket, customer) in self.joined.iter().take(RECENT_INCIDENTS) {
            writeln!(f)?;
            writeln!(f, "[{}] {} ({})", ticket.date, customer.organization_name, customer.ehr_system)?;
            writeln!(f, "{}", ticket.description)?;
            writeln!(
                f,
                "Status: {} | Priority: {}",
                if ticket.resolved { "Resolved" } else { "Open" },
                ticket.priority.as_str().to_uppercase()
            )?;
            writeln!(f, "{THIN_RULE}")?;
        }
        writeln!(f)?;
        writeln!(f, "BUSINESS IMPACT")?;
        writeln!(f, "━━━━━━━━━━━━━━━")?;
        writeln!(f, "• Revenue at Risk: ${}/month", thousands(self.revenue_at_risk))?;
        if self.topic.is_care_critical() {
            writeln!(f, "• Patient Care Impact: Direct impact on appointment scheduling and clinical workflows")?;
            writeln!(f, "• Compliance Risk: Integration failures can cause HIPAA audit concerns")?;
        }
        writeln!(f)?;
        writeln!(f, "RECOMMENDED ACTIONS")?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━")?;
        for (n, action) in topic_actions(self.topic).iter().enumerate() {
            writeln!(f, "{}. {}", n + 1, action)?;
        }
        writeln!(f)?;
        writeln!(f, "PRODUCT IMPLICATIONS")?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━")?;
        for implication in topic_implications(self.topic) {
            writeln!(f, "• {implication}")?;
        }
        Ok(())
    }
}

/// Expansion-flagged calls joined to their customers
struct ExpansionView<'a> {
    joined: Vec<(&'a Call, &'a Customer)>,
    unique_customers: usize,
    potential_arr: f64,
}

impl fmt::Display for ExpansionView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let avg_health =
            self.joined.iter().map(|(_, c)| c.health_score as f64).sum::<f64>() / self.joined.len().max(1) as f64;

        writeln!(f, "THEMATIC INSIGHT: EXPANSION OPPORTUNITIES")?;
        writeln!(f, "{RULE}")?;
        writeln!(f)?;
        writeln!(f, "OPPORTUNITY PIPELINE")?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "• Total opportunities identified: {}", self.joined.len())?;
        writeln!(f, "• Unique customers: {}", self.unique_customers)?;
        writeln!(
            f,
            "• Total potential ARR: ${} (estimated 50% increase)",
            thousands_f64(self.potential_arr)
        )?;
        writeln!(f, "• Average customer health: {avg_health:.0}/100")?;
        writeln!(f)?;
        writeln!(f, "SEGMENT BREAKDOWN:")?;
        for (segment, count) in ranked(self.joined.iter().map(|(_, c)| c.segment)) {
            let segment_arr = self
                .joined
                .iter()
                .filter(|(_, c)| c.segment == segment)
                .map(|(_, c)| c.mrr as f64)
                .sum::<f64>()
                * EXPANSION_UPLIFT;
            writeln!(
                f,
                "• {segment}: {count} opportunities (${} potential ARR)",
                thousands_f64(segment_arr)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "TOP OPPORTUNITIES (By Revenue Potential):")?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        let mut by_revenue = self.joined.clone();
        by_revenue.sort_by(|a, b| b.1.mrr.cmp(&a.1.mrr).then_with(|| a.0.call_id.cmp(&b.0.call_id)));
        for (call, customer) in by_revenue.iter().take(TOP_OPPORTUNITIES) {
            writeln!(f)?;
            writeln!(f, "{} ({})", customer.organization_name, customer.segment)?;
            writeln!(
                f,
                "Current MRR: ${} | Health Score: {}/100",
                thousands(customer.mrr),
                customer.health_score
            )?;
            writeln!(f, "Call Date: {} | Type: {}", call.date, call.call_type)?;
            writeln!(f, "Notes Summary: {}...", truncate_chars(&call.call_notes, 200))?;
            writeln!(
                f,
                "Expansion Potential: ${}/month",
                thousands_f64(customer.mrr as f64 * EXPANSION_UPLIFT)
            )?;
            writeln!(f, "{THIN_RULE}")?;
        }
        writeln!(f)?;
        writeln!(f, "RECOMMENDED EXPANSION STRATEGY")?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "1. Prioritize customers with health scores > 75 and existing budget approval")?;
        writeln!(f, "2. Bundle approach: Package complementary features for higher perceived value")?;
        writeln!(f, "3. Timing: Align with budget cycles (Q4 for most healthcare orgs)")?;
        writeln!(f, "4. Proof: Leverage case studies from similar practice types")?;
        writeln!(f, "5. Incentive: Consider implementation discounts for multi-year commits")?;
        writeln!(f)?;
        writeln!(f, "SUCCESS FACTORS")?;
        writeln!(f, "━━━━━━━━━━━━━")?;
        for factor in [
            "EHR integration working smoothly",
            "Active champion in organization",
            "Demonstrated ROI from current usage",
            "Growing provider headcount",
            "Expressed pain points that we can solve",
        ] {
            writeln!(f, "• {factor}")?;
        }
        Ok(())
    }
}

impl<'a> ContextBuilder<'a> {
    /// Thematic document for every ticket on `topic`; `None` when there are no such tickets
    pub fn topic_insight(&self, topic: Topic) -> Option<ContextDocument> {
        let mut tickets: Vec<&'a Interaction> = self
            .tables
            .interactions
            .iter()
            .filter(|i| i.topic == topic)
            .collect();
        if tickets.is_empty() {
            return None;
        }
        tickets.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.interaction_id.cmp(&b.interaction_id)));

        // Tickets whose customer is missing from the table are left out of the breakdowns
        let joined: Vec<(&'a Interaction, &'a Customer)> = tickets
            .iter()
            .filter_map(|t| self.tables.customer(&t.customer_id).map(|c| (*t, c)))
            .collect();

        let mut affected: Vec<&'a str> = Vec::new();
        for t in &tickets {
            if !affected.contains(&t.customer_id.as_str()) {
                affected.push(t.customer_id.as_str());
            }
        }
        let revenue_at_risk = affected
            .iter()
            .filter_map(|id| self.tables.customer(id))
            .map(|c| c.mrr)
            .sum();

        let view = TopicView {
            topic,
            tickets,
            joined,
            affected,
            revenue_at_risk,
        };

        let mut metadata = Map::new();
        metadata.insert("customers_affected".to_string(), json!(view.affected.len()));
        metadata.insert("total_incidents".to_string(), json!(view.tickets.len()));
        metadata.insert(
            "priority".to_string(),
            json!(if topic.is_care_critical() { "critical" } else { "medium" }),
        );

        Some(ContextDocument::for_theme(topic.as_str(), view.to_string(), metadata))
    }

    /// Pipeline of calls flagged as expansion opportunities; `None` when there are none
    pub fn expansion_insight(&self) -> Option<ContextDocument> {
        let joined: Vec<(&'a Call, &'a Customer)> = self
            .tables
            .calls
            .iter()
            .filter(|c| c.expansion_opportunity)
            .filter_map(|call| self.tables.customer(&call.customer_id).map(|c| (call, c)))
            .collect();
        if joined.is_empty() {
            return None;
        }

        let unique: HashSet<&str> = joined.iter().map(|(call, _)| call.customer_id.as_str()).collect();
        let potential_arr = joined.iter().map(|(_, c)| c.mrr as f64).sum::<f64>() * EXPANSION_UPLIFT;
        let view = ExpansionView {
            unique_customers: unique.len(),
            joined,
            potential_arr,
        };

        let mut metadata = Map::new();
        metadata.insert("customers_affected".to_string(), json!(view.unique_customers));
        metadata.insert("potential_arr".to_string(), json!(potential_arr));
        metadata.insert("priority".to_string(), Value::from("high"));

        Some(ContextDocument::for_theme(EXPANSION_THEME, view.to_string(), metadata))
    }

    /// EHR-integration and expansion documents, skipping themes without rows
    pub fn thematic_documents(&self) -> Vec<ContextDocument> {
        [self.topic_insight(Topic::EhrIntegration), self.expansion_insight()]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::SyntheticDataset;
    use crate::model::call::fixtures::call;
    use crate::model::customer::fixtures::customer;
    use crate::model::interaction::fixtures::interaction;
    use crate::model::{DocType, Segment};

    fn tables() -> SyntheticDataset {
        let mut big = customer("HC-1000");
        big.mrr = 40_000;
        big.segment = Segment::Enterprise;
        big.ehr_system = "Cerner".to_string();
        let small = customer("HC-1001");

        let mut tickets = Vec::new();
        for (i, (cust, day)) in [("HC-1000", 1), ("HC-1001", 2), ("HC-1001", 3)].into_iter().enumerate() {
            let mut t = interaction(&format!("TICKET-{}", 5000 + i), cust, (2025, 6, day));
            t.topic = Topic::EhrIntegration;
            t.priority = if i == 0 { Priority::High } else { Priority::Low };
            t.resolution_time_hours = 12;
            tickets.push(t);
        }

        let mut a = call("CALL-2000", "HC-1000", (2025, 1, 1));
        a.expansion_opportunity = true;
        let mut b = call("CALL-2001", "HC-1001", (2025, 1, 2));
        b.expansion_opportunity = true;
        let c = call("CALL-2002", "HC-1001", (2025, 1, 3));

        SyntheticDataset {
            customers: vec![big, small],
            interactions: tickets,
            calls: vec![a, b, c],
            feature_requests: Vec::new(),
        }
    }

    #[test]
    fn test_ehr_insight() {
        let t = tables();
        let builder = ContextBuilder::new(&t);
        let doc = builder.topic_insight(Topic::EhrIntegration).unwrap();

        assert_eq!(doc.doc_type, DocType::ThematicInsight);
        assert_eq!(doc.theme.as_deref(), Some("ehr_integration"));
        assert!(doc.content.starts_with("THEMATIC INSIGHT: EHR INTEGRATION CHALLENGES"));
        assert!(doc.content.contains("• Total EHR-related tickets: 3"));
        assert!(doc.content.contains("• Customers affected: 2"));
        assert!(doc.content.contains("• High priority: 1"));
        assert!(doc.content.contains("• Average resolution time: 12.0 hours"));
        assert!(doc.content.contains("• Epic: 2 tickets\n• Cerner: 1 tickets"));
        assert!(doc.content.contains("• Revenue at Risk: $50,000/month"));
        assert_eq!(doc.metadata["customers_affected"], 2);
        assert_eq!(doc.metadata["priority"], "critical");

        // Newest incident listed first
        let first_incident = doc.content.find("[2025-06-03]").unwrap();
        let last_incident = doc.content.find("[2025-06-01]").unwrap();
        assert!(first_incident < last_incident);
    }

    #[test]
    fn test_topic_without_tickets_is_skipped() {
        let t = tables();
        let builder = ContextBuilder::new(&t);
        assert!(builder.topic_insight(Topic::PatientPortal).is_none());
    }

    #[test]
    fn test_expansion_insight() {
        let t = tables();
        let builder = ContextBuilder::new(&t);
        let doc = builder.expansion_insight().unwrap();

        assert_eq!(doc.theme.as_deref(), Some(EXPANSION_THEME));
        assert!(doc.content.contains("• Total opportunities identified: 2"));
        assert!(doc.content.contains("• Total potential ARR: $25,000 (estimated 50% increase)"));
        assert!(doc.content.contains("• Enterprise: 1 opportunities ($20,000 potential ARR)"));
        let big = doc.content.find("Regional Health Center HC-1000 (Enterprise)").unwrap();
        let small = doc.content.find("Regional Health Center HC-1001 (Mid-Market)").unwrap();
        assert!(big < small);
        assert_eq!(doc.metadata["potential_arr"], 25_000.0);
    }

    #[test]
    fn test_thematic_documents_order() {
        let t = tables();
        let docs = ContextBuilder::new(&t).thematic_documents();
        let keys: Vec<&str> = docs.iter().map(ContextDocument::key).collect();
        assert_eq!(keys, vec!["ehr_integration", EXPANSION_THEME]);

        let empty = SyntheticDataset::default();
        assert!(ContextBuilder::new(&empty).thematic_documents().is_empty());
    }
}
