use rust_decimal::Decimal;

use airinv_models::ValidationField;

use super::{duplicates, is_blank, is_first_duplicate, within};
use crate::args;
use crate::context::{Findings, ValidationContext};
use crate::registry::ValidationRule;
use crate::target::{scope, ControlPathTarget};

pub struct ControlPathRule;

impl ControlPathRule {
    fn check_assignments(&self, target: &ControlPathTarget<'_>, findings: &mut Findings) {
        let facility = target.facility;
        let path = target.path;

        for assignment in &path.assignments {
            let sequence = assignment.sequence_number;

            if !within(assignment.percent_apportionment, Decimal::new(1, 1), Decimal::ONE_HUNDRED) {
                findings.error(
                    ValidationField::ControlPathAssignment,
                    "controlPath.assignment.percentApportionment.range",
                    &args![sequence],
                );
            }

            match (assignment.control_id, assignment.child_path_id) {
                (Some(control_id), None) => {
                    if facility.control(control_id).is_none() {
                        findings.error(
                            ValidationField::ControlPathAssignment,
                            "controlPath.assignment.control.invalid",
                            &args![sequence],
                        );
                    }
                }
                (None, Some(child_id)) => {
                    if facility.control_path(child_id).is_none() {
                        findings.error(
                            ValidationField::ControlPathAssignment,
                            "controlPath.assignment.controlPath.invalid",
                            &args![sequence],
                        );
                    }
                }
                _ => findings.error(
                    ValidationField::ControlPathAssignment,
                    "controlPath.assignment.target",
                    &args![sequence],
                ),
            }
        }

        let sequences: Vec<String> = path.assignments.iter().map(|a| a.sequence_number.to_string()).collect();
        for sequence in duplicates(sequences.iter().map(String::as_str)) {
            findings.error(
                ValidationField::ControlPathSequenceNumber,
                "controlPath.assignment.sequenceNumber.duplicate",
                &args![sequence],
            );
        }
    }

    /// Each cycle is reported once, on the path it starts from.
    fn check_cycles(&self, target: &ControlPathTarget<'_>, findings: &mut Findings) {
        for cycle in target.graph.find_cycles() {
            if cycle.first().map(String::as_str) == Some(target.path.identifier.as_str()) {
                findings.error(ValidationField::ControlPathCycle, "controlPath.cycle", &args![cycle.join(" -> ")]);
            }
        }
    }
}

impl ValidationRule<scope::ControlPath> for ControlPathRule {
    fn name(&self) -> &'static str {
        "federal.control_path"
    }

    fn validate(&self, _ctx: &ValidationContext<'_>, target: &ControlPathTarget<'_>, findings: &mut Findings) -> bool {
        let facility = target.facility;
        let path = target.path;

        if is_blank(Some(&path.identifier)) {
            findings.error(
                ValidationField::ControlPathIdentifier,
                "controlPath.controlPathIdentifier.required",
                &args![],
            );
        } else if let Some(position) = facility.control_paths.iter().position(|p| p.id == path.id) {
            let siblings = facility.control_paths.iter().map(|p| p.identifier.as_str());
            if is_first_duplicate(&path.identifier, siblings, position) {
                findings.error(
                    ValidationField::ControlPathIdentifier,
                    "controlPath.controlPathIdentifier.duplicate",
                    &args![path.identifier.trim()],
                );
            }
        }

        self.check_cycles(target, findings);
        self.check_assignments(target, findings);

        if let Some(percent) = path.percent_control {
            if !within(percent, Decimal::ZERO, Decimal::ONE_HUNDRED) {
                findings.error(ValidationField::ControlPathPercentControl, "controlPath.percentControl.range", &args![]);
            }
        }

        if target.graph.descendant_controls(path.id).is_empty() {
            findings.warning(ValidationField::ControlPathNoControlDevice, "controlPath.notAssigned", &args![path.identifier]);
        }

        !findings.has_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures;
    use crate::target::ValidationTarget;
    use airinv_models::{
        Control, ControlAssignment, ControlPath, ControlPathGraph, EmissionsReport, FacilitySite,
    };
    use airinv_utils::ValidationSettings;
    use uuid::Uuid;

    fn run(facility: &FacilitySite) -> Vec<Findings> {
        let reference = fixtures::reference();
        let settings = ValidationSettings::default();
        let report = EmissionsReport::new(2021, "GADNR");
        let ctx = fixtures::context(&reference, &settings, &report);
        let graph = ControlPathGraph::build(&facility.control_paths);

        facility
            .control_paths
            .iter()
            .map(|path| {
                let target = ControlPathTarget {
                    facility,
                    path,
                    graph: &graph,
                };
                let mut findings = Findings::new(target.details());
                ControlPathRule.validate(&ctx, &target, &mut findings);
                findings
            })
            .collect()
    }

    fn keys(findings: &Findings) -> Vec<&str> {
        findings.entries().iter().map(|e| e.message_key.as_str()).collect()
    }

    #[test]
    fn test_nested_paths_pass() {
        let control = Control::new("C-1", "101");
        let mut child = ControlPath::new("CP-2");
        child.assignments.push(ControlAssignment::control(1, control.id, Decimal::ONE_HUNDRED));
        let mut root = ControlPath::new("CP-1");
        root.assignments.push(ControlAssignment::child_path(1, child.id, Decimal::ONE_HUNDRED));

        let mut facility = FacilitySite::new("Plant");
        facility.controls.push(control);
        facility.control_paths = vec![root, child];

        assert!(run(&facility).iter().all(Findings::is_empty));
    }

    #[test]
    fn test_cycle_reported_once() {
        let control = Control::new("C-1", "101");
        let mut a = ControlPath::new("A");
        let mut b = ControlPath::new("B");
        a.assignments.push(ControlAssignment::child_path(1, b.id, Decimal::ONE_HUNDRED));
        a.assignments.push(ControlAssignment::control(2, control.id, Decimal::ONE_HUNDRED));
        b.assignments.push(ControlAssignment::child_path(1, a.id, Decimal::ONE_HUNDRED));

        let mut facility = FacilitySite::new("Plant");
        facility.controls.push(control);
        facility.control_paths = vec![a, b];

        let findings = run(&facility);
        let cycles: Vec<&str> = findings
            .iter()
            .flat_map(|f| f.entries())
            .filter(|e| e.message_key == "controlPath.cycle")
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(cycles.len(), 1);
        assert!(cycles[0].contains("A -> B"));
    }

    #[test]
    fn test_assignment_checks() {
        let control = Control::new("C-1", "101");
        let mut path = ControlPath::new("CP-1");
        path.percent_control = Some(Decimal::from(101));
        path.assignments.push(ControlAssignment::control(1, control.id, Decimal::new(5, 2)));
        path.assignments.push(ControlAssignment::control(1, Uuid::new_v4(), Decimal::ONE_HUNDRED));
        path.assignments.push(ControlAssignment {
            sequence_number: 2,
            control_id: None,
            child_path_id: None,
            percent_apportionment: Decimal::ONE_HUNDRED,
        });

        let mut facility = FacilitySite::new("Plant");
        facility.controls.push(control);
        facility.control_paths.push(path);

        assert_eq!(
            keys(&run(&facility)[0]),
            vec![
                "controlPath.assignment.percentApportionment.range",
                "controlPath.assignment.control.invalid",
                "controlPath.assignment.target",
                "controlPath.assignment.sequenceNumber.duplicate",
                "controlPath.percentControl.range",
            ]
        );
    }

    #[test]
    fn test_path_without_controls_warns() {
        let mut facility = FacilitySite::new("Plant");
        facility.control_paths.push(ControlPath::new("CP-1"));
        let findings = run(&facility);
        assert_eq!(keys(&findings[0]), vec!["controlPath.notAssigned"]);
        assert!(!findings[0].has_errors());
    }
}
