use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Product feedback submitted by a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRequest {
    pub request_id: String,
    pub customer_id: String,
    pub date: NaiveDate,
    pub feature_requested: String,
    pub description: String,
    pub business_impact: String,
    pub votes: u32,
    pub status: String,
    pub urgency: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn request(id: &str, customer_id: &str, date: (i32, u32, u32)) -> FeatureRequest {
        FeatureRequest {
            request_id: id.to_string(),
            customer_id: customer_id.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            feature_requested: "Lab results integration".to_string(),
            description: "Cannot easily track referrals to specialists".to_string(),
            business_impact: "Medium - workaround exists".to_string(),
            votes: 12,
            status: "Planned".to_string(),
            urgency: "High".to_string(),
        }
    }
}
