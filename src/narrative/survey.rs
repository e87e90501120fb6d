//! NPS survey responses with verbatim comments

use crate::generate::catalog::COMPETITORS;
use crate::model::{Customer, NpsCategory, SurveyResponse};
use crate::sampling::{chance, pick};
use chrono::{Duration, NaiveDate};
use rand::Rng;

/// Share of customers that answer the survey
pub const RESPONSE_RATE: f64 = 0.6;

/// Returns `None` for customers that did not respond
pub(super) fn response<R: Rng>(
    rng: &mut R,
    customer: &Customer,
    end_date: NaiveDate,
    survey_id: impl FnOnce() -> String,
) -> Option<SurveyResponse> {
    if !chance(rng, RESPONSE_RATE) {
        return None;
    }

    let category = NpsCategory::for_health(customer.health_score);
    let nps_score = match category {
        NpsCategory::Promoter => rng.gen_range(9..=10),
        NpsCategory::Passive => rng.gen_range(7..=9),
        NpsCategory::Detractor => rng.gen_range(0..=6),
    };
    let ehr = &customer.ehr_system;

    let (primary_reason, improvement, considering_alternatives) = match category {
        NpsCategory::Promoter => (
            match rng.gen_range(0..5) {
                0 => format!(
                    "The platform has transformed our workflow. We're saving {} hours per week on administrative tasks.",
                    rng.gen_range(5..=15)
                ),
                1 => format!("Integration with {} works flawlessly. Our providers love how seamless it is.", ehr),
                2 => format!("Best investment we've made. ROI was evident within {} months.", rng.gen_range(2..=4)),
                3 => "Support team is exceptional. They truly understand healthcare workflows and respond quickly.".to_string(),
                _ => "The reporting capabilities give us insights we never had before. Making much better operational decisions.".to_string(),
            },
            pick(
                rng,
                &[
                    "Honestly, very satisfied. Maybe add more mobile functionality for providers on the go.",
                    "Would love to see integration with a few more specialty-specific tools.",
                    "Everything is great. Keep up the good work.",
                    "More customization options for reports would be nice, but this is minor.",
                ],
            )
            .to_string(),
            "No, very happy with the platform.".to_string(),
        ),
        NpsCategory::Passive => (
            match rng.gen_range(0..5) {
                0 => "It works well overall, but some features are more complex than they need to be.".to_string(),
                1 => format!(
                    "Good platform but the learning curve was steep. Took us {} months to get fully comfortable.",
                    rng.gen_range(3..=6)
                ),
                2 => "Meets our needs but doesn't exceed expectations. Feels like we're paying for features we don't use.".to_string(),
                3 => format!(
                    "Integration with {} works most of the time, but occasional hiccups are frustrating.",
                    ehr
                ),
                _ => "Support is responsive but sometimes it feels like they don't fully understand our workflow.".to_string(),
            },
            pick(
                rng,
                &[
                    "Simplify the UI. Too many clicks to do basic tasks.",
                    "Better training materials. More specialty-specific examples.",
                    "More competitive pricing. We're a small practice and it's a stretch for our budget.",
                    "Faster resolution on technical issues. When something breaks, we can't wait days for a fix.",
                ],
            )
            .to_string(),
            pick(
                rng,
                &[
                    "Not actively looking, but we review options annually.",
                    "We've had a few demos from competitors but nothing compelling yet.",
                    "Considering it. Depends on whether issues get resolved.",
                ],
            )
            .to_string(),
        ),
        NpsCategory::Detractor => (
            match rng.gen_range(0..5) {
                0 => format!(
                    "The implementation was a disaster. We were promised {} days but it took {} months and still isn't working properly.",
                    rng.gen_range(60..=90),
                    rng.gen_range(4..=7)
                ),
                1 => format!(
                    "Integration with {} breaks constantly. We're doing manual data entry that should be automatic.",
                    ehr
                ),
                2 => "The sales demo was not representative of reality. What we were shown doesn't match what we actually got.".to_string(),
                3 => format!(
                    "Our {} has actually INCREASED since implementation. This is the opposite of what was promised.",
                    pick(rng, &["claim denial rate", "no-show rate", "administrative burden"])
                ),
                _ => "Support is slow and often gives us generic answers that don't solve our specific problems. We feel like we're troubleshooting your product for you.".to_string(),
            },
            pick(
                rng,
                &[
                    "Either fix the core functionality or be honest in sales that it doesn't work for our type of practice.",
                    "Stop telling us to 'adapt our workflow to the software.' We're running a medical practice - the software should adapt to us.",
                    "Assign us a dedicated support person who actually understands our specialty and can solve problems quickly.",
                    "Massive improvement needed in reliability and integration stability. We can't run a practice on a platform that breaks every few weeks.",
                ],
            )
            .to_string(),
            match rng.gen_range(0..4) {
                0 => format!("Yes, we have demos scheduled with {} next week.", pick(rng, COMPETITORS)),
                1 => "Actively evaluating alternatives. This isn't working for us.".to_string(),
                2 => "Already put in a budget request to switch platforms. Just waiting for board approval.".to_string(),
                _ => "We're stuck until our contract is up but we won't be renewing unless major improvements happen.".to_string(),
            },
        ),
    };

    let mut sub_score = |support: bool| -> u8 {
        match category {
            NpsCategory::Promoter if support => rng.gen_range(4..=5),
            NpsCategory::Promoter => rng.gen_range(3..=5),
            NpsCategory::Passive => rng.gen_range(2..=4),
            NpsCategory::Detractor => rng.gen_range(1..=3),
        }
    };
    let ease_of_use = sub_score(false);
    let feature_satisfaction = sub_score(false);
    let support_satisfaction = sub_score(true);
    let value_for_money = sub_score(false);

    Some(SurveyResponse {
        survey_id: survey_id(),
        customer_id: customer.customer_id.clone(),
        survey_date: end_date - Duration::days(rng.gen_range(0..=60)),
        nps_score,
        nps_category: category,
        ease_of_use,
        feature_satisfaction,
        support_satisfaction,
        value_for_money,
        primary_reason_verbatim: primary_reason,
        improvement_suggestion_verbatim: improvement,
        considering_alternatives_verbatim: considering_alternatives,
        would_recommend_verbatim: format!("Score: {}/10 - {}", nps_score, crate::model::title_case(category.as_str())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::customer::fixtures::customer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 6).unwrap()
    }

    #[test]
    fn test_nps_matches_health_band() {
        let mut rng = StdRng::seed_from_u64(9);
        for (health, category, range) in [
            (85, NpsCategory::Promoter, 9..=10),
            (70, NpsCategory::Passive, 7..=9),
            (45, NpsCategory::Detractor, 0..=6),
        ] {
            let mut c = customer("HC-1001");
            c.health_score = health;
            let mut answered = 0;
            for _ in 0..40 {
                if let Some(s) = response(&mut rng, &c, end(), || "SURVEY-1000".to_string()) {
                    answered += 1;
                    assert_eq!(s.nps_category, category);
                    assert!(range.contains(&s.nps_score));
                    assert!(s.survey_date <= end());
                    assert!(s.would_recommend_verbatim.starts_with(&format!("Score: {}/10", s.nps_score)));
                }
            }
            assert!(answered > 0);
        }
    }

    #[test]
    fn test_promoter_support_scores_high() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut c = customer("HC-1001");
        c.health_score = 95;
        for _ in 0..30 {
            if let Some(s) = response(&mut rng, &c, end(), || "SURVEY-1".to_string()) {
                assert!(s.support_satisfaction >= 4);
                assert_eq!(s.considering_alternatives_verbatim, "No, very happy with the platform.");
            }
        }
    }
}
