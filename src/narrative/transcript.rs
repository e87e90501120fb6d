//! Call transcripts expanded from call rows

use super::template::{Template, Vars, WeightedTemplates};
use crate::generate::catalog::COMPETITORS;
use crate::model::{thousands, truncate_chars, Call, CallTranscript, Customer, Sentiment};
use crate::sampling::pick;
use chrono::Duration;
use rand::Rng;

const HEADER: Template = Template(
    "CALL TRANSCRIPT
Customer: {organization} ({customer_id})
Date: {date}
Duration: {duration} minutes
Type: {call_type}
Participants: {attendee} (Customer), CSM Team
",
);

const FRUSTRATION_SCRIPT: Template = Template(
    r#"
[00:02:15]
{attendee}: "Look, I'm going to be honest with you. {pain_point}. This is really impacting our operations and my team's morale."

[00:03:30]
CSM: "I completely understand your frustration. This is not the experience we want you to have. Can you tell me more about when this started?"

[00:04:05]
{attendee}: "It's been about {weeks} weeks now. And here's the thing - we're paying you ${mrr} per month specifically because you promised {promise}. That was the whole selling point."

[00:05:20]
{attendee}: "I had a demo from {competitor} last week. {competitor_pitch}. I don't want to switch - we've invested a lot in your platform - but I need to show leadership we have options if this doesn't get fixed soon."

[00:07:45]
CSM: "I hear you. Give me 48 hours. I'm going to escalate this to our VP of Engineering personally. Can we schedule a technical deep-dive on {weekday}?"

[00:08:30]
{attendee}: "{availability}. But this is urgent. We're {renewal_days} days from renewal and leadership is concerned. I can't recommend renewing if we're still having these issues."

[00:09:15]
CSM: "Understood. I'm going to personally own this until it's resolved. You'll have an update from me by end of day tomorrow with a clear action plan."

Call Sentiment: {closing}
"#,
);

const SUCCESS_SCRIPT: Template = Template(
    r#"
[00:01:30]
{attendee}: "I wanted to share some good news - {success_story}. The team is really happy with the results."

[00:02:15]
CSM: "That's fantastic to hear! What do you think made the biggest difference?"

[00:03:00]
{attendee}: "Honestly, once we got past the initial learning curve, the {favorite_feature} has been a game-changer. {team_reaction}."

[00:04:30]
{attendee}: "Actually, I wanted to ask about {expansion_area}. We're looking to expand and I've heard good things from other practices about that capability."

[00:05:45]
CSM: "Absolutely! Let me set up a demo for you next week. Given your success with the current setup, I think you'll find a lot of value in those features. Many practices your size see additional {expected_gain}."

[00:07:00]
{attendee}: "Perfect. Also, our CFO asked me to be a reference for you if you need one. We're really happy with the ROI we're seeing."

Call Sentiment: Very positive - expansion opportunity + reference potential
"#,
);

const CHECK_IN_SCRIPT: Template = Template(
    r#"
[00:01:00]
CSM: "Thanks for making time today. How are things going with the platform?"

[00:01:30]
{attendee}: "Overall it's going well. The team is getting more comfortable with it. We're up to about {active_providers} of our {num_providers} providers using it daily."

[00:02:45]
CSM: "That's great adoption. Any areas where the team is struggling or needs additional training?"

[00:03:40]
{attendee}: "{training_gap}"

[00:04:30]
CSM: "I can arrange that."

[00:05:00]
{attendee}: "Sounds good. Otherwise no major issues. Talk to you next quarter."

Call Sentiment: Neutral - stable but no strong enthusiasm
"#,
);

const PAIN_POINTS: &[&str] = &[
    "the Epic integration keeps breaking after their updates",
    "we're spending 2+ extra hours per day on manual data entry",
    "our claim denial rate has jumped from 10% to 25%",
    "the scheduling conflicts are causing patient complaints",
];

const SUCCESS_STORIES: &[&str] = &[
    "we reduced our no-show rate from 18% to 8%",
    "our staff is saving about 10 hours per week on scheduling",
    "patient satisfaction scores have improved by 15 points",
    "we're processing claims 30% faster than before",
];

const TRAINING_GAPS: &[&str] = &[
    "The billing team could use a refresher on the denial management screens.",
    "A couple of our newer providers still chart outside the system.",
    "Front desk staff want more training on the recurring appointment setup.",
];

/// Pain-point emphasis by health: sicker accounts lead with integration and revenue trouble
fn pain_points(health_score: u8) -> WeightedTemplates {
    if health_score < 50 {
        WeightedTemplates::weighted(PAIN_POINTS, &[0.35, 0.15, 0.35, 0.15])
    } else {
        WeightedTemplates::uniform(PAIN_POINTS)
    }
}

/// Healthier accounts talk about bigger wins more often
fn success_stories(health_score: u8) -> WeightedTemplates {
    if health_score > 75 {
        WeightedTemplates::weighted(SUCCESS_STORIES, &[0.3, 0.2, 0.2, 0.3])
    } else {
        WeightedTemplates::uniform(SUCCESS_STORIES)
    }
}

pub(super) fn transcript<R: Rng>(rng: &mut R, customer: &Customer, call: &Call) -> CallTranscript {
    let mut vars = Vars::new();
    vars.insert("organization", customer.organization_name.clone());
    vars.insert("customer_id", call.customer_id.clone());
    vars.insert("date", call.date.to_string());
    vars.insert("duration", call.duration_minutes.to_string());
    vars.insert("call_type", call.call_type.to_string());
    vars.insert("attendee", call.attendees.clone());

    let script = match call.sentiment {
        Sentiment::Frustrated | Sentiment::Concerned => {
            vars.insert("pain_point", pain_points(customer.health_score).choose(rng).0.to_string());
            vars.insert("weeks", rng.gen_range(2..=6).to_string());
            vars.insert("mrr", thousands(customer.mrr));
            vars.insert(
                "promise",
                pick(rng, &["seamless integration", "workflow efficiency", "reduced admin burden"]).to_string(),
            );
            vars.insert("competitor", pick(rng, COMPETITORS).to_string());
            vars.insert(
                "competitor_pitch",
                pick(
                    rng,
                    &[
                        "They showed me their Epic connector and it looked more stable",
                        "Their workflow actually matches how specialists work",
                        "The pricing was competitive and they guarantee uptime",
                    ],
                )
                .to_string(),
            );
            vars.insert("weekday", (call.date + Duration::days(2)).format("%A").to_string());
            vars.insert("availability", pick(rng, &["That works", "Wednesday works", "I can do Thursday"]).to_string());
            vars.insert("renewal_days", rng.gen_range(30..=90).to_string());
            let closing = if customer.health_score > 40 {
                "Frustrated but willing to work with us"
            } else {
                "Very frustrated, high churn risk"
            };
            vars.insert("closing", closing.to_string());
            FRUSTRATION_SCRIPT
        }
        Sentiment::Positive | Sentiment::Enthusiastic => {
            vars.insert("success_story", success_stories(customer.health_score).choose(rng).0.to_string());
            vars.insert(
                "favorite_feature",
                pick(rng, &["automated reminders", "integration with Epic", "reporting dashboard", "mobile app"]).to_string(),
            );
            vars.insert(
                "team_reaction",
                pick(
                    rng,
                    &[
                        "Our providers are actually using it daily",
                        "The billing team loves the workflow",
                        "Patients are commenting on how easy it is",
                    ],
                )
                .to_string(),
            );
            vars.insert(
                "expansion_area",
                pick(
                    rng,
                    &[
                        "the telehealth module",
                        "advanced analytics",
                        "the referral management feature",
                        "multi-location scheduling",
                    ],
                )
                .to_string(),
            );
            vars.insert(
                "expected_gain",
                pick(rng, &["15-20% efficiency gains", "$50K+ in recovered revenue", "25% improvement in coordination"])
                    .to_string(),
            );
            SUCCESS_SCRIPT
        }
        _ => {
            let active = (customer.num_providers as f64 * rng.gen_range(0.6..0.9)) as u32;
            vars.insert("active_providers", active.to_string());
            vars.insert("num_providers", customer.num_providers.to_string());
            vars.insert("training_gap", pick(rng, TRAINING_GAPS).to_string());
            CHECK_IN_SCRIPT
        }
    };

    let transcript = format!("{}{}", HEADER.render(&vars), script.render(&vars));
    let lowered = transcript.to_lowercase();

    CallTranscript {
        call_id: call.call_id.clone(),
        customer_id: call.customer_id.clone(),
        date: call.date,
        key_quotes: key_quotes(&transcript),
        competitor_mentioned: COMPETITORS.iter().any(|c| transcript.contains(c)),
        expansion_signals: lowered.contains("expand") || lowered.contains("interested in"),
        churn_signals: lowered.contains("renewal") && lowered.contains("concern"),
        transcript,
    }
}

/// First three customer quotes, each capped at 100 characters
pub fn key_quotes(transcript: &str) -> String {
    transcript
        .lines()
        .filter_map(|line| line.split_once(": \""))
        .filter(|(speaker, _)| *speaker != "CSM" && !speaker.starts_with('['))
        .take(3)
        .map(|(_, quote)| {
            let quote = quote.trim_end_matches('"');
            let capped = truncate_chars(quote, 100);
            if capped.len() < quote.len() {
                format!("{}...", capped)
            } else {
                capped.to_string()
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::call::fixtures::call;
    use crate::model::customer::fixtures::customer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_frustrated_call_gets_frustration_script() {
        let mut rng = StdRng::seed_from_u64(5);
        let c = customer("HC-1001");
        let mut row = call("CALL-2000", "HC-1001", (2025, 3, 3));
        row.sentiment = Sentiment::Frustrated;

        let t = transcript(&mut rng, &c, &row);
        assert!(t.transcript.starts_with("CALL TRANSCRIPT"));
        assert!(t.transcript.contains("$10,000 per month"));
        assert!(t.competitor_mentioned);
        assert!(t.churn_signals);
        // 2025-03-03 is a Monday
        assert!(t.transcript.contains("deep-dive on Wednesday?"));
        assert!(t.transcript.contains("Frustrated but willing to work with us"));
        assert!(!t.transcript.contains('{'));
    }

    #[test]
    fn test_positive_call_surfaces_expansion() {
        let mut rng = StdRng::seed_from_u64(6);
        let c = customer("HC-1001");
        let mut row = call("CALL-2001", "HC-1001", (2025, 3, 3));
        row.sentiment = Sentiment::Enthusiastic;

        let t = transcript(&mut rng, &c, &row);
        assert!(t.expansion_signals);
        assert!(!t.competitor_mentioned);
        assert!(!t.churn_signals);
        assert_eq!(t.key_quotes.split(" | ").count(), 3);
    }

    #[test]
    fn test_neutral_call_is_check_in() {
        let mut rng = StdRng::seed_from_u64(7);
        let c = customer("HC-1001");
        let row = call("CALL-2002", "HC-1001", (2025, 3, 3));

        let t = transcript(&mut rng, &c, &row);
        assert!(t.transcript.contains("of our 20 providers using it daily"));
        assert!(t.transcript.contains("Call Sentiment: Neutral"));
    }

    #[test]
    fn test_key_quotes_skip_csm_and_cap_length() {
        let long = "x".repeat(150);
        let text = format!(
            "[00:01:00]\nCSM: \"hello\"\n\nPractice Manager: \"{}\"\nPractice Manager: \"short\"",
            long
        );
        let quotes = key_quotes(&text);
        let parts: Vec<&str> = quotes.split(" | ").collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 103);
        assert!(parts[0].ends_with("..."));
        assert_eq!(parts[1], "short");
    }
}
