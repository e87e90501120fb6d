//! Customer (healthcare organization) records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::Range;

categorical! {
    /// Kind of healthcare organization
    OrgType("org_type") {
        HospitalSystem => "Hospital System",
        ClinicNetwork => "Clinic Network",
        PrivatePractice => "Private Practice",
        SpecialtyCenter => "Specialty Center",
        UrgentCare => "Urgent Care",
        TelehealthProvider => "Telehealth Provider",
    }
}

categorical! {
    /// Commercial segment, derived from the organization type
    Segment("segment") {
        Enterprise => "Enterprise",
        MidMarket => "Mid-Market",
        Smb => "SMB",
    }
}

categorical! {
    ContractType("contract_type") {
        Monthly => "monthly",
        Annual => "annual",
        ThreeYear => "3-year",
    }
}

categorical! {
    PaymentStatus("payment_status") {
        Current => "current",
        PastDue => "past_due",
        Excellent => "excellent",
    }
}

categorical! {
    ImplementationStatus("implementation_status") {
        Live => "live",
        Training => "training",
        Configuration => "configuration",
        FullAdoption => "full_adoption",
    }
}

categorical! {
    /// Whether the customer is looking at, or running, a competing product
    CompetingSystems("competing_systems") {
        NoCompetition => "None",
        EvaluatingAlternatives => "Evaluating alternatives",
        LegacyAlongside => "Using legacy system alongside",
        ConsideringSwitch => "Considering switch",
    }
}

impl CompetingSystems {
    pub fn is_threat(&self) -> bool {
        *self != CompetingSystems::NoCompetition
    }
}

/// Size and revenue band assigned to an organization type.
///
/// Ranges are half-open, matching how the generator samples them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MrrBand {
    pub segment: Segment,
    pub providers: Range<u32>,
    pub mrr: Range<u64>,
}

impl MrrBand {
    pub fn for_org_type(org_type: OrgType) -> Self {
        match org_type {
            OrgType::HospitalSystem => MrrBand {
                segment: Segment::Enterprise,
                providers: 50..500,
                mrr: 15_000..80_000,
            },
            OrgType::ClinicNetwork | OrgType::SpecialtyCenter => MrrBand {
                segment: Segment::MidMarket,
                providers: 10..100,
                mrr: 5_000..25_000,
            },
            OrgType::PrivatePractice | OrgType::UrgentCare | OrgType::TelehealthProvider => MrrBand {
                segment: Segment::Smb,
                providers: 2..20,
                mrr: 500..8_000,
            },
        }
    }

    /// True when a customer's segment, provider count and MRR all sit in this band
    pub fn contains(&self, customer: &Customer) -> bool {
        customer.segment == self.segment
            && self.providers.contains(&customer.num_providers)
            && self.mrr.contains(&customer.mrr)
    }
}

/// Compliance programmes a customer is certified for.
///
/// Stored in a single CSV cell separated by `;`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Certifications(pub Vec<String>);

impl Certifications {
    pub fn join(&self, sep: &str) -> String {
        self.0.join(sep)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Certifications {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.join(";"))
    }
}

impl<'de> Deserialize<'de> for Certifications {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Certifications(
            raw.split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }
}

/// One customer organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub organization_name: String,
    pub org_type: OrgType,
    pub specialty: String,
    pub segment: Segment,
    pub num_providers: u32,
    pub num_locations: u32,
    pub patients_per_month: u32,
    pub mrr: u64,
    pub tenure_months: u32,
    pub health_score: u8,
    pub signup_date: NaiveDate,
    pub contract_type: ContractType,
    pub ehr_system: String,
    pub ehr_integrated: bool,
    pub compliance_certifications: Certifications,
    pub payment_status: PaymentStatus,
    pub champion_title: String,
    pub champion_exists: bool,
    pub implementation_status: ImplementationStatus,
    pub competing_systems: CompetingSystems,
}

impl Customer {
    /// Health < 50
    pub fn is_at_risk(&self) -> bool {
        self.health_score < 50
    }

    /// Health < 40
    pub fn is_critical(&self) -> bool {
        self.health_score < 40
    }

    /// Healthy and past the implementation phase
    pub fn is_expansion_ready(&self) -> bool {
        self.health_score > 70 && self.tenure_months > 6
    }

    /// Label used by the profile header
    pub fn health_label(&self) -> &'static str {
        if self.health_score > 70 {
            "🟢 Healthy"
        } else if self.health_score > 50 {
            "🟡 At Risk"
        } else {
            "🔴 Critical"
        }
    }

    /// Domain used for synthetic staff email addresses
    pub fn email_domain(&self) -> String {
        format!("{}.com", self.organization_name.to_lowercase().replace(' ', ""))
    }
}
