//! Vocabulary the generators draw from

pub const ORG_NAME_PREFIXES: &[&str] = &["Regional", "Community", "Advanced", "Integrated", "Premier"];
pub const ORG_NAME_CORES: &[&str] = &["Health", "Medical", "Healthcare", "Care"];
pub const ORG_NAME_SUFFIXES: &[&str] = &["Center", "Group", "Partners", "Associates", "System"];

pub const SPECIALTIES: &[&str] = &[
    "Primary Care",
    "Cardiology",
    "Orthopedics",
    "Pediatrics",
    "Mental Health",
    "Oncology",
    "Emergency Medicine",
    "Multi-specialty",
];

pub const EHR_SYSTEMS: &[&str] = &["Epic", "Cerner", "Allscripts", "eClinicalWorks", "Athenahealth", "NextGen"];

pub const COMPLIANCE_PROGRAMS: &[&str] = &["HIPAA", "HITECH", "State Privacy Laws", "Meaningful Use"];

pub const CHAMPION_TITLES: &[&str] = &[
    "Practice Manager",
    "Chief Medical Officer",
    "Director of Operations",
    "IT Director",
    "COO",
];

pub const STAFF_ROLES: &[&str] = &[
    "Practice Manager",
    "Medical Assistant",
    "Billing Specialist",
    "Front Desk",
    "Provider",
    "IT Admin",
];

pub const CALL_ATTENDEES: &[&str] = &[
    "Practice Manager",
    "CMO",
    "Operations Director",
    "Billing Manager",
    "Multiple stakeholders",
];

pub const FEATURE_REQUESTS: &[&str] = &[
    "Enhanced ePrescribing integration",
    "Insurance eligibility real-time checks",
    "Patient waitlist management",
    "Referral tracking workflow",
    "Clinical decision support alerts",
    "Lab results integration",
    "Prior authorization automation",
    "Patient payment plans",
    "Telemedicine video quality improvements",
    "Multi-location scheduling view",
];

pub const PAIN_POINTS: &[&str] = &[
    "Staff spending too much time on manual data entry",
    "EHR integration frequently breaks after Epic updates",
    "Insurance verification taking 15+ minutes per patient",
    "No-show rate impacting revenue, need better reminders",
    "Compliance audit preparation is extremely time-consuming",
    "Patient portal adoption is low, too complex for elderly patients",
    "Billing staff overwhelmed with claim rejections",
    "Cannot easily track referrals to specialists",
    "Reporting doesn't show metrics leadership needs",
    "Scheduling conflicts between multiple providers",
];

pub const SUCCESS_STORIES: &[&str] = &[
    "Reduced no-show rate from 18% to 7% using automated reminders",
    "Staff saves 2 hours per day on insurance verification",
    "Improved patient satisfaction scores by 23 points",
    "Increased collections by 15% with better billing workflow",
    "Achieved HIPAA audit compliance in half the time",
    "Patient portal adoption increased from 12% to 47%",
    "Decreased wait times by 20 minutes on average",
    "Successfully integrated with Epic in under 2 weeks",
];

pub const BUSINESS_IMPACTS: &[&str] = &[
    "High - blocking workflow",
    "Medium - workaround exists",
    "Low - nice to have",
];

pub const REQUEST_STATUSES: &[&str] = &["Under review", "Planned", "In development", "Shipped", "Declined"];

pub const URGENCIES: &[&str] = &["Critical", "High", "Medium", "Low"];

pub const CHECK_IN_FEEDBACK: &[&str] = &[
    "Very happy with platform",
    "Some workflow improvements needed",
    "Meeting expectations",
    "Exceeded expectations",
];

/// Competitors named in transcripts and surveys
pub const COMPETITORS: &[&str] = &["Athenahealth", "eClinicalWorks", "NextGen"];
