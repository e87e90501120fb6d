//! Short free-text fields that live on the base rows: ticket descriptions,
//! call notes and action items.

use super::catalog::{CHECK_IN_FEEDBACK, PAIN_POINTS, SUCCESS_STORIES};
use crate::model::{CallType, Customer, Sentiment, Topic};
use crate::sampling::pick;
use rand::Rng;

pub(super) fn ticket_description<R: Rng>(rng: &mut R, topic: Topic, sentiment: Sentiment, customer: &Customer) -> String {
    let ehr = &customer.ehr_system;
    let variants: Vec<String> = match topic {
        Topic::EhrIntegration => vec![
            format!("Epic integration stopped syncing patient appointments after last {} update. Appointments from past 48 hours missing.", ehr),
            format!("Medication reconciliation data from {} not flowing correctly. Providers seeing outdated medication lists.", ehr),
            format!(
                "Lab results integration failing for 3 of our {} locations. Urgent - providers need results for patient care.",
                customer.num_locations
            ),
        ],
        Topic::HipaaCompliance => vec![
            "Need audit logs for past 6 months for compliance review. Upcoming HIPAA audit in 2 weeks.".to_string(),
            "Questions about data encryption standards. Internal audit flagged concerns about patient data security.".to_string(),
            "BAA (Business Associate Agreement) needs review before renewal. Legal team has questions.".to_string(),
        ],
        Topic::PatientScheduling => vec![
            "Double-booking occurring in Provider schedule - happened 5 times this week. Causing patient wait issues.".to_string(),
            "Recurring appointment feature not working properly. Patients with standing weekly appointments getting canceled.".to_string(),
            "Need to block off provider time for hospital rounds but system won't allow multi-location blocking.".to_string(),
        ],
        Topic::BillingWorkflow => vec![
            "Insurance claims rejecting at unusually high rate (35%) - normally 10%. Major revenue impact.".to_string(),
            "Explanation of Benefits (EOB) posting is 3 weeks behind. Billing team can't reconcile accounts receivable.".to_string(),
            format!("CPT codes not mapping correctly to {} procedures. Causing claim denials.", ehr),
        ],
        Topic::PatientPortal => vec![
            "Patients reporting can't access lab results through portal. IT showing error: 'unauthorized access'.".to_string(),
            format!(
                "Portal messaging feature timing out for {} patient messages. Staff having to call patients back.",
                customer.patients_per_month
            ),
            "Appointment request form on portal not submitting. Patients calling saying online booking broken.".to_string(),
        ],
        other => vec![format!("Issue with {}", other.as_str().replace('_', " "))],
    };

    let idx = rng.gen_range(0..variants.len());
    let mut description = variants[idx].clone();

    match sentiment {
        Sentiment::Frustrated | Sentiment::Urgent => {
            description.push_str(&format!(
                " This is causing significant disruption to patient care. {} escalating.",
                customer.champion_title
            ));
        }
        Sentiment::Negative => description.push_str(" Staff productivity severely impacted. Need resolution ASAP."),
        _ => {}
    }

    description
}

pub(super) fn call_notes<R: Rng>(rng: &mut R, call_type: CallType, customer: &Customer) -> String {
    match call_type {
        CallType::Onboarding => format!(
            "Onboarding call with {} - {}

Goals discussed:
- Reduce no-show rate (currently at 22%)
- Streamline insurance verification process
- Improve patient portal adoption (currently only 15% of patients using)
- Better reporting for quality measures

Current pain points:
- {}
- Staff training needed on advanced features
- {} integration setup pending

Success criteria defined: Reduce no-shows by 50% within 6 months, achieve 40% portal adoption
Timeline: Full implementation target is 90 days
",
            customer.organization_name,
            customer.specialty,
            pick(rng, PAIN_POINTS),
            customer.ehr_system
        ),
        CallType::Expansion => format!(
            "Expansion opportunity discussion

Currently using: Basic scheduling + billing modules
Expressed interest in: Telehealth module and advanced analytics

Drivers:
- Expanding to telehealth post-COVID, need integrated solution
- Board requesting better operational dashboards
- {} providers, growing to {} next quarter

Budget: ${:.1}/mo approved for Q4
Competition: Evaluating [competitor name] but prefer staying with us due to EHR integration

Next steps: Demo advanced analytics next week, pricing proposal by Friday
",
            customer.num_providers,
            customer.num_providers + 10,
            customer.mrr as f64 * 1.5
        ),
        CallType::Renewal => {
            let satisfaction = if customer.health_score > 70 {
                "high"
            } else if customer.health_score > 50 {
                "medium"
            } else {
                "at-risk"
            };
            let likelihood = match satisfaction {
                "high" => "Strong",
                "medium" => "Moderate",
                _ => "At risk",
            };
            let concerns = if satisfaction == "high" {
                "None - very satisfied"
            } else {
                pick(rng, PAIN_POINTS)
            };
            let terms = if customer.health_score > 70 {
                "Multi-year discount offered"
            } else {
                "Addressing concerns before renewal"
            };
            let action = if satisfaction == "high" {
                "Prepare renewal paperwork"
            } else {
                "Executive escalation meeting scheduled"
            };
            format!(
                "Renewal discussion - {} contract expiring in 60 days

Overall satisfaction: {}
Renewal likelihood: {}

What's working:
- {}

Concerns raised:
- {}

Renewal terms discussed: {}
Action needed: {}
",
                customer.contract_type,
                satisfaction,
                likelihood,
                pick(rng, SUCCESS_STORIES),
                concerns,
                terms,
                action
            )
        }
        CallType::CheckIn | CallType::SupportEscalation => {
            let tickets = if customer.health_score > 70 {
                "None - smooth sailing"
            } else {
                "2-3 tickets this month, mostly questions"
            };
            let training = if customer.tenure_months > 12 {
                "Staff fully trained"
            } else {
                "Additional training requested on reporting"
            };
            format!(
                "Check-in call with {}

Usage stats reviewed: {} providers active
Recent support tickets: {}
Training needs: {}

Feedback: {}
",
                customer.champion_title,
                customer.num_providers,
                tickets,
                training,
                pick(rng, CHECK_IN_FEEDBACK)
            )
        }
    }
}

pub(super) fn action_items(call_type: CallType) -> String {
    let items: &[&str] = match call_type {
        CallType::Onboarding => &[
            "Schedule EHR integration kickoff",
            "Send training materials for staff",
            "Configure automated appointment reminders",
        ],
        CallType::Expansion => &[
            "Send proposal for telehealth module",
            "Schedule demo with CMO and Operations",
            "Prepare ROI analysis",
        ],
        CallType::Renewal => &[
            "Send renewal quote by Friday",
            "Schedule executive review if needed",
            "Prepare case studies for board presentation",
        ],
        CallType::CheckIn => &[
            "Follow up on training request",
            "Share best practices document",
            "Schedule next quarterly review",
        ],
        CallType::SupportEscalation => &["Follow up next month"],
    };
    items.join(" | ")
}
