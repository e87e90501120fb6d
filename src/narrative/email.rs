//! Email threads for email-channel tickets

use super::template::{Template, Vars};
use crate::model::{title_case, Customer, EmailThread, Interaction, Priority, Sentiment};
use crate::sampling::pick;
use chrono::Duration;
use rand::Rng;

const ESCALATION: Template = Template(
    "From: {sender_name} <{sender_email}>
Date: {date}
Subject: URGENT: {issue_summary}

{opening_frustration}

{specific_problem_details}

{business_impact}

{urgency_statement}

Please call me ASAP: {phone}
{sender_title}",
);

const FOLLOW_UP: Template = Template(
    "From: {sender_name} <{sender_email}>
Date: {followup_date}
Subject: Re: {issue_summary}

I sent information on ticket #{ticket_id} {days_ago} days ago and haven't heard back.

{frustration_statement}

{consequence_statement}

{sender_title}",
);

const POSITIVE: Template = Template(
    "From: {sender_name} <{sender_email}>
Date: {date}
Subject: {positive_subject}

I wanted to reach out with some positive feedback.

{success_details}

{forward_looking}

Thanks,
{sender_title}",
);

/// Days between an unanswered escalation and its follow-up
pub const FOLLOW_UP_DELAY_DAYS: i64 = 3;

pub(super) fn thread<R: Rng>(rng: &mut R, customer: &Customer, interaction: &Interaction, email_id: String) -> EmailThread {
    let mut vars = Vars::new();
    vars.insert("sender_name", interaction.staff_role.clone());
    vars.insert("sender_title", interaction.staff_role.clone());
    vars.insert(
        "sender_email",
        format!(
            "{}@{}",
            interaction.staff_role.to_lowercase().replace(' ', "."),
            customer.email_domain()
        ),
    );
    vars.insert("date", interaction.date.to_string());
    vars.insert("issue_summary", title_case(interaction.topic.as_str()));

    let thread_content = match interaction.sentiment {
        Sentiment::Frustrated | Sentiment::Urgent => escalation(rng, interaction, &mut vars),
        _ => {
            vars.insert(
                "positive_subject",
                pick(
                    rng,
                    &["Thank you for the quick response", "Positive feedback to share", "Great support experience"],
                )
                .to_string(),
            );
            vars.insert(
                "success_details",
                pick(
                    rng,
                    &[
                        "Your team was incredibly responsive on our recent issue.",
                        "The new feature you rolled out is exactly what we needed.",
                        "Our providers are really happy with the improvements you've made.",
                    ],
                )
                .to_string(),
            );
            vars.insert(
                "forward_looking",
                pick(
                    rng,
                    &[
                        "Looking forward to continuing our partnership.",
                        "Interested in learning about upcoming features.",
                        "Would be happy to be a reference if you need one.",
                    ],
                )
                .to_string(),
            );
            POSITIVE.render(&vars)
        }
    };

    EmailThread {
        email_id,
        customer_id: interaction.customer_id.clone(),
        interaction_id: interaction.interaction_id.clone(),
        date: interaction.date,
        thread_content,
        sentiment: interaction.sentiment,
        escalation_level: if interaction.priority == Priority::High { "high" } else { "normal" }.to_string(),
    }
}

fn escalation<R: Rng>(rng: &mut R, interaction: &Interaction, vars: &mut Vars) -> String {
    vars.insert(
        "opening_frustration",
        pick(
            rng,
            &[
                "I need immediate assistance with a critical issue.",
                "This is urgent and affecting patient care.",
                "We've been struggling with this for too long.",
            ],
        )
        .to_string(),
    );
    vars.insert("specific_problem_details", interaction.description.clone());
    let business_impact = match rng.gen_range(0..3) {
        0 => "This is costing us thousands in delayed revenue.".to_string(),
        1 => format!("Staff are spending {} extra hours per week on workarounds.", rng.gen_range(5..=15)),
        _ => "Patients are complaining and it's affecting our reputation.".to_string(),
    };
    vars.insert("business_impact", business_impact);
    vars.insert(
        "urgency_statement",
        pick(
            rng,
            &[
                "We need this resolved by end of week.",
                "This cannot wait any longer.",
                "Our leadership is questioning whether we should continue with your platform.",
            ],
        )
        .to_string(),
    );
    vars.insert("phone", format!("555-{}", rng.gen_range(1000..=9999)));

    let mut email = ESCALATION.render(vars);

    if !interaction.resolved {
        vars.insert(
            "followup_date",
            (interaction.date + Duration::days(FOLLOW_UP_DELAY_DAYS)).to_string(),
        );
        vars.insert("ticket_id", interaction.ticket_number().to_string());
        vars.insert("days_ago", FOLLOW_UP_DELAY_DAYS.to_string());
        vars.insert(
            "frustration_statement",
            "This is the second time this month I've had to repeat myself. I'm spending more time explaining our problems than getting them fixed.".to_string(),
        );
        vars.insert(
            "consequence_statement",
            format!(
                "Our {} just asked me if we should look at other platforms. I don't know what to tell them.",
                pick(rng, &["CFO", "CMO", "Board"])
            ),
        );
        let rule = "=".repeat(60);
        email.push_str(&format!(
            "\n\n{rule}\nFOLLOW-UP EMAIL:\n{rule}\n\n{}",
            FOLLOW_UP.render(vars)
        ));
    }

    email
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::customer::fixtures::customer;
    use crate::model::interaction::fixtures::interaction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_unresolved_escalation_gets_follow_up() {
        let mut rng = StdRng::seed_from_u64(1);
        let c = customer("HC-1001");
        let mut row = interaction("TICKET-5012", "HC-1001", (2025, 2, 10));
        row.sentiment = Sentiment::Urgent;
        row.resolved = false;
        row.priority = Priority::High;
        row.staff_role = "Office Manager".to_string();

        let thread = thread(&mut rng, &c, &row, "EMAIL-1000".to_string());
        let text = &thread.thread_content;
        assert!(text.contains("Subject: URGENT: Billing Workflow"));
        assert!(text.contains("office.manager@regionalhealthcenterhc-1001.com"));
        assert!(text.contains("FOLLOW-UP EMAIL:"));
        assert!(text.contains("Date: 2025-02-13"));
        assert!(text.contains("ticket #5012 3 days ago"));
        assert_eq!(thread.escalation_level, "high");
        assert!(!text.contains('{'));
    }

    #[test]
    fn test_resolved_escalation_has_no_follow_up() {
        let mut rng = StdRng::seed_from_u64(2);
        let c = customer("HC-1001");
        let mut row = interaction("TICKET-5013", "HC-1001", (2025, 2, 10));
        row.sentiment = Sentiment::Frustrated;
        row.resolved = true;

        let thread = thread(&mut rng, &c, &row, "EMAIL-1001".to_string());
        assert!(thread.thread_content.contains("URGENT"));
        assert!(!thread.thread_content.contains("FOLLOW-UP"));
        assert_eq!(thread.escalation_level, "normal");
    }

    #[test]
    fn test_other_sentiments_get_positive_email() {
        let mut rng = StdRng::seed_from_u64(3);
        let c = customer("HC-1001");
        let mut row = interaction("TICKET-5014", "HC-1001", (2025, 2, 10));
        row.sentiment = Sentiment::Negative;
        row.resolved = false;

        let thread = thread(&mut rng, &c, &row, "EMAIL-1002".to_string());
        assert!(thread.thread_content.contains("positive feedback"));
        assert!(!thread.thread_content.contains("FOLLOW-UP"));
    }
}
