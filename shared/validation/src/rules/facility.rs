use airinv_models::{NaicsType, ValidationField};
use airinv_utils::{is_valid_eis_program_id, is_valid_email, is_valid_naics_format};

use super::{duplicates, is_blank, StatusYearCheck};
use crate::args;
use crate::context::{Findings, ValidationContext};
use crate::registry::ValidationRule;
use crate::target::{scope, FacilityTarget};

pub struct FacilitySiteRule;

const STATUS_YEAR: StatusYearCheck<'static> = StatusYearCheck {
    field: ValidationField::FacilityStatusYear,
    required_key: "facilitysite.statusYear.required",
    range_key: "facilitysite.status.range",
};

impl FacilitySiteRule {
    fn check_naics(&self, ctx: &ValidationContext<'_>, target: &FacilityTarget<'_>, findings: &mut Findings) {
        let facility = target.facility;

        if facility.naics.is_empty() {
            findings.error(ValidationField::FacilityNaics, "facilitysite.naics.required", &args![]);
            return;
        }

        for naics in &facility.naics {
            if !is_valid_naics_format(&naics.code) {
                findings.error(ValidationField::FacilityNaics, "facilitysite.naics.format", &args![naics.code]);
                continue;
            }
            match ctx.reference.naics(&naics.code, ctx.all_records()) {
                None => {
                    findings.error(ValidationField::FacilityNaics, "facilitysite.naics.invalid", &args![naics.code]);
                }
                Some(record) if record.is_legacy_for(ctx.report_year) => {
                    if record.map_to.is_empty() {
                        findings.error(ValidationField::FacilityNaics, "facilitysite.naics.legacy", &args![naics.code]);
                    } else {
                        findings.error(
                            ValidationField::FacilityNaics,
                            "facilitysite.naics.legacy.map",
                            &args![naics.code, record.map_to.join(", ")],
                        );
                    }
                }
                Some(_) => {}
            }
        }

        for code in duplicates(facility.naics.iter().map(|n| n.code.as_str())) {
            findings.error(ValidationField::FacilityNaics, "facilitysite.naics.duplicate", &args![code]);
        }

        let primaries = facility.naics.iter().filter(|n| n.naics_type == NaicsType::Primary).count();
        if primaries != 1 {
            findings.error(ValidationField::FacilityNaics, "facilitysite.naics.primary.required", &args![primaries]);
        }
    }
}

impl ValidationRule<scope::Facility> for FacilitySiteRule {
    fn name(&self) -> &'static str {
        "federal.facility_site"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, target: &FacilityTarget<'_>, findings: &mut Findings) -> bool {
        let facility = target.facility;
        let status = facility.status_code.as_deref();

        match status {
            None => findings.error(ValidationField::FacilityStatus, "facilitysite.status.required", &args![]),
            Some(code) if !ctx.is_known_status(Some(code)) => {
                findings.error(ValidationField::FacilityStatus, "facilitysite.status.invalid", &args![code])
            }
            Some(_) => {}
        }
        STATUS_YEAR.run(ctx, findings, status, facility.status_year);

        if let Some(eis) = facility.eis_program_id.as_deref() {
            if !is_valid_eis_program_id(eis) {
                findings.error(ValidationField::FacilityEisId, "facilitysite.eisProgramId.format", &args![eis]);
            }
        }

        self.check_naics(ctx, target, findings);

        for contact in &facility.contacts {
            let Some(email) = contact.email.as_deref() else {
                continue;
            };
            if !is_blank(Some(email)) && !is_valid_email(email.trim()) {
                let name = [contact.first_name.as_deref(), contact.last_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                findings.error(
                    ValidationField::FacilityEmailAddress,
                    "facilitySite.contacts.emailAddress.requiredFormat",
                    &args![email, name],
                );
            }
        }

        !findings.has_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures;
    use crate::target::ValidationTarget;
    use airinv_models::{EmissionsReport, FacilityContact, FacilityNaics, FacilitySite, NaicsCode};
    use airinv_utils::ValidationSettings;

    fn run(reference: &airinv_models::InMemoryReferenceData, facility: FacilitySite) -> Findings {
        let settings = ValidationSettings::default();
        let mut report = EmissionsReport::new(2021, "GADNR");
        report.facility_sites.push(facility);
        let ctx = fixtures::context(reference, &settings, &report);
        let target = FacilityTarget {
            report: &report,
            facility: &report.facility_sites[0],
        };
        let mut findings = Findings::new(target.details());
        FacilitySiteRule.validate(&ctx, &target, &mut findings);
        findings
    }

    fn keys(findings: &Findings) -> Vec<&str> {
        findings.entries().iter().map(|e| e.message_key.as_str()).collect()
    }

    #[test]
    fn test_valid_facility() {
        let mut facility = FacilitySite::new("Plant");
        facility.naics.push(FacilityNaics::new("562212", NaicsType::Primary));
        facility.naics.push(FacilityNaics::new("221112", NaicsType::Secondary));
        facility.contacts.push(FacilityContact {
            email: Some("env@plant.example.com".to_string()),
            ..FacilityContact::default()
        });
        assert!(run(&fixtures::reference(), facility).is_empty());
    }

    #[test]
    fn test_status_year_required_when_shut_down() {
        let mut facility = FacilitySite::new("Plant");
        facility.status_code = Some("PS".to_string());
        facility.naics.push(FacilityNaics::new("562212", NaicsType::Primary));
        assert_eq!(keys(&run(&fixtures::reference(), facility)), vec!["facilitysite.statusYear.required"]);
    }

    #[test]
    fn test_naics_checks() {
        let mut legacy = NaicsCode::new("562211", "Hazardous Waste Treatment");
        legacy.last_inventory_year = Some(2017);
        legacy.map_to = vec!["562212".to_string()];
        let reference = fixtures::reference().with_naics(legacy);

        let mut facility = FacilitySite::new("Plant");
        facility.naics.push(FacilityNaics::new("562211", NaicsType::Secondary));
        facility.naics.push(FacilityNaics::new("999999", NaicsType::Tertiary));
        facility.naics.push(FacilityNaics::new("221112", NaicsType::Secondary));
        facility.naics.push(FacilityNaics::new("221112", NaicsType::Tertiary));

        assert_eq!(
            keys(&run(&reference, facility)),
            vec![
                "facilitysite.naics.legacy.map",
                "facilitysite.naics.invalid",
                "facilitysite.naics.duplicate",
                "facilitysite.naics.primary.required",
            ]
        );
    }

    #[test]
    fn test_malformed_naics_skips_lookup() {
        let mut facility = FacilitySite::new("Plant");
        facility.naics.push(FacilityNaics::new("562212", NaicsType::Primary));
        facility.naics.push(FacilityNaics::new("5622", NaicsType::Secondary));

        let findings = run(&fixtures::reference(), facility);
        assert_eq!(keys(&findings), vec!["facilitysite.naics.format"]);
        assert!(findings.entries()[0].message.contains("5622"));
    }

    #[test]
    fn test_bad_email() {
        let mut facility = FacilitySite::new("Plant");
        facility.naics.push(FacilityNaics::new("562212", NaicsType::Primary));
        facility.contacts.push(FacilityContact {
            first_name: Some("Pat".to_string()),
            last_name: Some("Lee".to_string()),
            email: Some("pat.lee@".to_string()),
            ..FacilityContact::default()
        });
        let findings = run(&fixtures::reference(), facility);
        assert_eq!(findings.entries()[0].field, ValidationField::FacilityEmailAddress);
        assert!(findings.entries()[0].message.contains("Pat Lee"));
    }
}
