//! Chart series for the analytics view

use crate::model::{rank_topics, Customer, Interaction, Segment};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One labelled value
#[derive(Debug, Clone, PartialEq)]
pub struct Bar<T> {
    pub label: String,
    pub value: T,
}

impl<T> Bar<T> {
    fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Top-of-page numbers
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlineMetrics {
    pub customers: usize,
    pub total_mrr: u64,
    pub at_risk: usize,
    /// Share of customers at risk, 0-100
    pub at_risk_pct: f64,
    pub avg_health: f64,
}

impl HeadlineMetrics {
    pub fn compute(customers: &[Customer]) -> Self {
        let at_risk = customers.iter().filter(|c| c.is_at_risk()).count();
        let (at_risk_pct, avg_health) = if customers.is_empty() {
            (0.0, 0.0)
        } else {
            let n = customers.len() as f64;
            (
                at_risk as f64 / n * 100.0,
                customers.iter().map(|c| c.health_score as f64).sum::<f64>() / n,
            )
        };
        Self {
            customers: customers.len(),
            total_mrr: customers.iter().map(|c| c.mrr).sum(),
            at_risk,
            at_risk_pct,
            avg_health,
        }
    }

    /// Total MRR in thousands ("$1234K")
    pub fn total_mrr_k(&self) -> String {
        format!("${:.0}K", self.total_mrr as f64 / 1000.0)
    }
}

/// Customer counts per health band; bands include their upper bound
pub fn health_distribution(customers: &[Customer]) -> Vec<Bar<usize>> {
    let mut bars = vec![
        Bar::new("Critical (<40)", 0),
        Bar::new("At Risk (40-60)", 0),
        Bar::new("Stable (60-75)", 0),
        Bar::new("Healthy (75+)", 0),
    ];
    for c in customers {
        let band = match c.health_score {
            0..=40 => 0,
            41..=60 => 1,
            61..=75 => 2,
            _ => 3,
        };
        bars[band].value += 1;
    }
    bars
}

/// MRR summed per risk band; bands include their lower bound
pub fn mrr_by_risk(customers: &[Customer]) -> Vec<Bar<u64>> {
    let mut bars = vec![
        Bar::new("Critical (<40)", 0),
        Bar::new("High Risk (40-60)", 0),
        Bar::new("Medium Risk (60-75)", 0),
        Bar::new("Healthy (75+)", 0),
    ];
    for c in customers {
        let band = match c.health_score {
            0..=39 => 0,
            40..=59 => 1,
            60..=74 => 2,
            _ => 3,
        };
        bars[band].value += c.mrr;
    }
    bars
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentHealth {
    pub segment: Segment,
    /// Rounded to one decimal
    pub avg_health: f64,
    pub customers: usize,
    pub mrr: u64,
}

/// Segments without customers are omitted
pub fn segment_health(customers: &[Customer]) -> Vec<SegmentHealth> {
    Segment::ALL
        .iter()
        .filter_map(|&segment| {
            let members: Vec<&Customer> = customers.iter().filter(|c| c.segment == segment).collect();
            if members.is_empty() {
                return None;
            }
            Some(SegmentHealth {
                segment,
                avg_health: round1(avg_health(&members)),
                customers: members.len(),
                mrr: members.iter().map(|c| c.mrr).sum(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChurnWeek {
    pub week: NaiveDate,
    pub critical: u32,
    pub high_risk: u32,
    pub medium: u32,
}

/// Twelve simulated weeks ending at `end`; no history is stored, so the
/// series is drawn from `seed`
pub fn churn_trend(seed: u64, end: NaiveDate) -> Vec<ChurnWeek> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..12i64)
        .map(|i| ChurnWeek {
            week: end - Duration::weeks(11 - i),
            critical: rng.gen_range(8..15),
            high_risk: rng.gen_range(15..25),
            medium: rng.gen_range(20..35),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct EhrIntegrationRow {
    pub ehr_system: String,
    pub integrated: bool,
    /// Rounded to one decimal
    pub avg_health: f64,
    pub customers: usize,
}

/// Average health per EHR system and integration state, sorted by system
/// with the non-integrated row first
pub fn ehr_integration(customers: &[Customer]) -> Vec<EhrIntegrationRow> {
    let mut keys: Vec<(&str, bool)> = customers.iter().map(|c| (c.ehr_system.as_str(), c.ehr_integrated)).collect();
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .map(|(ehr_system, integrated)| {
            let members: Vec<&Customer> = customers
                .iter()
                .filter(|c| c.ehr_system == ehr_system && c.ehr_integrated == integrated)
                .collect();
            EhrIntegrationRow {
                ehr_system: ehr_system.to_string(),
                integrated,
                avg_health: round1(avg_health(&members)),
                customers: members.len(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunnelStage {
    pub label: &'static str,
    pub customers: usize,
    /// Share of the first stage, 0-100
    pub pct_of_total: f64,
}

pub fn expansion_funnel(customers: &[Customer]) -> Vec<FunnelStage> {
    let stages: [(&'static str, fn(&Customer) -> bool); 4] = [
        ("All Customers", |_| true),
        ("Healthy (>70)", |c| c.health_score > 70),
        ("Tenured (>6mo)", |c| c.is_expansion_ready()),
        ("High Adoption (>75)", |c| c.health_score > 75 && c.tenure_months > 6),
    ];
    let total = customers.len();
    stages
        .into_iter()
        .map(|(label, keep)| {
            let n = customers.iter().filter(|c| keep(c)).count();
            FunnelStage {
                label,
                customers: n,
                pct_of_total: if total == 0 { 0.0 } else { n as f64 / total as f64 * 100.0 },
            }
        })
        .collect()
}

/// Ten most frequent ticket topics
pub fn support_topics(interactions: &[Interaction]) -> Vec<Bar<usize>> {
    rank_topics(interactions)
        .into_iter()
        .take(10)
        .map(|(topic, n)| Bar::new(topic.as_str(), n))
        .collect()
}

fn avg_health(members: &[&Customer]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    members.iter().map(|c| c.health_score as f64).sum::<f64>() / members.len() as f64
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::customer::fixtures::customer;
    use crate::model::interaction::fixtures::interaction;
    use crate::model::Topic;

    fn with_health(scores: &[u8]) -> Vec<Customer> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &h)| {
                let mut c = customer(&format!("HC-{}", 1000 + i));
                c.health_score = h;
                c
            })
            .collect()
    }

    #[test]
    fn test_health_bins_include_upper_edge() {
        let customers = with_health(&[0, 40, 41, 60, 75, 76, 100]);
        let counts: Vec<usize> = health_distribution(&customers).iter().map(|b| b.value).collect();
        assert_eq!(counts, vec![2, 2, 1, 2]);
        assert_eq!(counts.iter().sum::<usize>(), customers.len());
    }

    #[test]
    fn test_mrr_bins_include_lower_edge() {
        let customers = with_health(&[39, 40, 60, 75]);
        let totals: Vec<u64> = mrr_by_risk(&customers).iter().map(|b| b.value).collect();
        assert_eq!(totals, vec![10_000, 10_000, 10_000, 10_000]);
    }

    #[test]
    fn test_headline_metrics() {
        let m = HeadlineMetrics::compute(&with_health(&[30, 45, 80, 90]));
        assert_eq!(m.customers, 4);
        assert_eq!(m.at_risk, 2);
        assert_eq!(m.at_risk_pct, 50.0);
        assert_eq!(m.avg_health, 61.25);
        assert_eq!(m.total_mrr_k(), "$40K");
        assert_eq!(HeadlineMetrics::compute(&[]).avg_health, 0.0);
    }

    #[test]
    fn test_segment_health_skips_empty_segments() {
        let mut customers = with_health(&[50, 61]);
        customers[1].segment = Segment::Enterprise;
        customers[1].mrr = 30_000;
        let rows = segment_health(&customers);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].segment, Segment::Enterprise);
        assert_eq!(rows[0].mrr, 30_000);
        assert_eq!(rows[1].avg_health, 50.0);
    }

    #[test]
    fn test_churn_trend_is_seeded() {
        let end = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();
        let a = churn_trend(7, end);
        assert_eq!(a, churn_trend(7, end));
        assert_eq!(a.len(), 12);
        assert_eq!(a[11].week, end);
        assert!(a.iter().all(|w| (8..15).contains(&w.critical) && (20..35).contains(&w.medium)));
    }

    #[test]
    fn test_ehr_rows_split_by_integration() {
        let mut customers = with_health(&[80, 40, 60]);
        customers[1].ehr_integrated = false;
        customers[2].ehr_system = "Athenahealth".to_string();
        let rows = ehr_integration(&customers);
        let keys: Vec<(&str, bool)> = rows.iter().map(|r| (r.ehr_system.as_str(), r.integrated)).collect();
        assert_eq!(keys, vec![("Athenahealth", true), ("Epic", false), ("Epic", true)]);
        assert_eq!(rows[2].avg_health, 80.0);
    }

    #[test]
    fn test_funnel_is_monotonic() {
        let mut customers = with_health(&[90, 72, 74, 30]);
        customers[1].tenure_months = 3;
        let stages = expansion_funnel(&customers);
        let counts: Vec<usize> = stages.iter().map(|s| s.customers).collect();
        assert_eq!(counts, vec![4, 3, 2, 1]);
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(stages[3].pct_of_total, 25.0);
    }

    #[test]
    fn test_support_topics_top_ten() {
        let mut tickets = Vec::new();
        for (i, topic) in Topic::ALL.iter().enumerate() {
            for j in 0..=i {
                let mut t = interaction(&format!("TICKET-{}", 5000 + i * 20 + j), "HC-1000", (2025, 1, 1));
                t.topic = *topic;
                tickets.push(t);
            }
        }
        let bars = support_topics(&tickets);
        assert_eq!(bars.len(), 10);
        assert_eq!(bars[0].label, "prescription_workflow");
        assert_eq!(bars[0].value, 12);
    }
}
