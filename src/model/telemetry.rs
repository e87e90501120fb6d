use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of product usage for one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageTelemetry {
    pub customer_id: String,
    pub date: NaiveDate,

    // Scheduling
    pub appointments_created: u32,
    pub appointments_cancelled: u32,
    pub no_shows: u32,
    pub reminders_sent: u32,
    pub online_bookings: u32,

    // Billing
    pub claims_submitted: u32,
    pub claims_approved: u32,
    pub claims_denied: u32,
    pub claim_denial_rate: f64,

    // EHR sync
    pub ehr_sync_attempts: u32,
    pub ehr_sync_failures: u32,
    pub ehr_data_synced_mb: u32,

    // Patient portal
    pub portal_active_patients: u32,
    pub portal_logins: u32,
    pub portal_messages: u32,
    pub portal_adoption_rate: f64,

    // User activity
    pub active_users: u32,
    pub licensed_users: u32,
    pub utilization_rate: f64,
    pub total_sessions: u32,
    pub avg_session_duration_min: u32,

    // Errors
    pub total_errors: u32,
    pub critical_errors: u32,
    pub workflows_completed: u32,
    pub workflows_abandoned: u32,
}
