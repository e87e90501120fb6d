use super::catalog::*;
use super::GeneratorConfig;
use crate::model::{
    Certifications, CompetingSystems, ContractType, Customer, ImplementationStatus, MrrBand, OrgType,
    PaymentStatus,
};
use crate::sampling::{chance, date_between, pick, pick_of, weighted};
use chrono::Duration;
use rand::seq::SliceRandom;
use rand::Rng;

/// Customers whose tenure is below this are still implementing and lose health
const IMPLEMENTATION_PHASE_MONTHS: u32 = 6;

pub(super) fn generate<R: Rng>(rng: &mut R, config: &GeneratorConfig) -> Vec<Customer> {
    (0..config.customers).map(|i| customer(rng, config, i)).collect()
}

fn customer<R: Rng>(rng: &mut R, config: &GeneratorConfig, index: usize) -> Customer {
    let org_type = pick_of(rng, OrgType::ALL);
    let band = MrrBand::for_org_type(org_type);

    let num_providers = rng.gen_range(band.providers.clone());
    let mrr = rng.gen_range(band.mrr.clone());
    let patients_per_month = num_providers * rng.gen_range(100..300);

    let tenure_months = rng.gen_range(1..48);
    let mut health_score: u8 = rng.gen_range(40..100);
    if tenure_months < IMPLEMENTATION_PHASE_MONTHS {
        health_score = health_score.saturating_sub(20).max(30);
    }

    let organization_name = format!(
        "{} {} {}",
        pick(rng, ORG_NAME_PREFIXES),
        pick(rng, ORG_NAME_CORES),
        pick(rng, ORG_NAME_SUFFIXES)
    );

    let num_locations = match org_type {
        OrgType::HospitalSystem | OrgType::ClinicNetwork => rng.gen_range(1..20),
        _ => rng.gen_range(1..5),
    };

    let signup_date = date_between(rng, config.start_date, config.start_date + Duration::days(600));

    let certification_count = rng.gen_range(1..=3);
    let compliance_certifications = Certifications(
        COMPLIANCE_PROGRAMS
            .choose_multiple(rng, certification_count)
            .map(|s| s.to_string())
            .collect(),
    );

    Customer {
        customer_id: format!("HC-{}", index + 1000),
        organization_name,
        org_type,
        specialty: pick(rng, SPECIALTIES).to_string(),
        segment: band.segment,
        num_providers,
        num_locations,
        patients_per_month,
        mrr,
        tenure_months,
        health_score,
        signup_date,
        contract_type: weighted(
            rng,
            &[
                (ContractType::Monthly, 0.2),
                (ContractType::Annual, 0.6),
                (ContractType::ThreeYear, 0.2),
            ],
        ),
        ehr_system: pick(rng, EHR_SYSTEMS).to_string(),
        ehr_integrated: chance(rng, 0.7),
        compliance_certifications,
        payment_status: weighted(
            rng,
            &[
                (PaymentStatus::Current, 0.75),
                (PaymentStatus::PastDue, 0.1),
                (PaymentStatus::Excellent, 0.15),
            ],
        ),
        champion_title: pick(rng, CHAMPION_TITLES).to_string(),
        champion_exists: chance(rng, 0.65),
        implementation_status: pick_of(rng, ImplementationStatus::ALL),
        competing_systems: pick_of(rng, CompetingSystems::ALL),
    }
}
