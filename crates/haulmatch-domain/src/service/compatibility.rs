//! Load-vehicle compatibility matching
//!
//! The single decision procedure shared by the admin matching screen and the
//! vehicle-owner load search: a stable partition of candidate vehicles into
//! compatible and incompatible sets, with every failed predicate reported per
//! rejected vehicle.

use serde::{Deserialize, Serialize};

use haulmatch_types::{Error, Result};

use crate::model::{Load, LoadStatus, Vehicle, VehicleStatus};

/// Why a vehicle was rejected for a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Body length below the required size
    Size,
    /// Carrying capacity below the shipment weight
    Weight,
    /// Vehicle not currently available
    Status,
    /// Vehicle not admin-approved
    Approval,
}

impl ReasonCode {
    pub fn label(&self) -> &'static str {
        match self {
            ReasonCode::Size => "size",
            ReasonCode::Weight => "weight",
            ReasonCode::Status => "status",
            ReasonCode::Approval => "approval",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A rejected candidate with every predicate it failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedVehicle {
    pub vehicle: Vehicle,
    pub reasons: Vec<ReasonCode>,
}

/// Result of matching one load against a vehicle collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub compatible: Vec<Vehicle>,
    pub incompatible: Vec<RejectedVehicle>,
}

impl MatchOutcome {
    /// Number of candidates examined
    pub fn total(&self) -> usize {
        self.compatible.len() + self.incompatible.len()
    }
}

/// Total shipment weight in kilograms for a load's manifest
///
/// Fails with `InvalidInput` on a non-finite or negative material weight;
/// an empty manifest weighs 0.
pub fn required_weight_kg(load: &Load) -> Result<f64> {
    let mut total = 0.0;
    for material in &load.materials {
        if !material.total_weight_kg.is_finite() || material.total_weight_kg < 0.0 {
            return Err(Error::InvalidInput(format!(
                "material '{}' of load {} has invalid weight {}",
                material.name, load.id, material.total_weight_kg
            )));
        }
        total += material.total_weight_kg;
    }
    Ok(total)
}

fn validate_requirement(load: &Load) -> Result<()> {
    let size = load.vehicle_requirement.size_ft;
    if !size.is_finite() || size < 0.0 {
        return Err(Error::InvalidInput(format!(
            "load {} has invalid required size {}",
            load.id, size
        )));
    }
    Ok(())
}

/// Evaluate the four independent predicates for one candidate
///
/// Returns every failed predicate, not just the first: an admin reviewing a
/// rejected vehicle needs to see all deficiencies at once.
fn failed_checks(
    vehicle: &Vehicle,
    required_size_ft: f64,
    required_weight_kg: f64,
) -> Vec<ReasonCode> {
    let mut reasons = Vec::new();
    if vehicle.vehicle_size_ft < required_size_ft {
        reasons.push(ReasonCode::Size);
    }
    if vehicle.capacity_kg() < required_weight_kg {
        reasons.push(ReasonCode::Weight);
    }
    if vehicle.status != VehicleStatus::Available {
        reasons.push(ReasonCode::Status);
    }
    if !vehicle.is_approved {
        reasons.push(ReasonCode::Approval);
    }
    reasons
}

/// Partition candidate vehicles against a load's requirements
///
/// Pure and stable: no I/O, no mutation, both outputs preserve the input
/// order. Weight comparison is kg-normalized (`passing_limit_tons * 1000`),
/// and both size and weight boundaries are inclusive.
pub fn match_load(load: &Load, vehicles: &[Vehicle]) -> Result<MatchOutcome> {
    validate_requirement(load)?;
    let required_weight = required_weight_kg(load)?;
    let required_size = load.vehicle_requirement.size_ft;

    let mut outcome = MatchOutcome {
        compatible: Vec::new(),
        incompatible: Vec::new(),
    };
    for vehicle in vehicles {
        let reasons = failed_checks(vehicle, required_size, required_weight);
        if reasons.is_empty() {
            outcome.compatible.push(vehicle.clone());
        } else {
            outcome.incompatible.push(RejectedVehicle {
                vehicle: vehicle.clone(),
                reasons,
            });
        }
    }
    Ok(outcome)
}

/// Whether a single vehicle can serve a load
pub fn is_compatible(load: &Load, vehicle: &Vehicle) -> Result<bool> {
    validate_requirement(load)?;
    let required_weight = required_weight_kg(load)?;
    Ok(failed_checks(vehicle, load.vehicle_requirement.size_ft, required_weight).is_empty())
}

/// Posted loads a given vehicle can serve, in input order
///
/// The inverse view used by the vehicle-owner load search.
pub fn find_loads_for_vehicle(vehicle: &Vehicle, loads: &[Load]) -> Result<Vec<Load>> {
    let mut matches = Vec::new();
    for load in loads {
        if load.status != LoadStatus::Posted {
            continue;
        }
        if is_compatible(load, vehicle)? {
            matches.push(load.clone());
        }
    }
    Ok(matches)
}

/// Render a match outcome as a plain-text report for the admin screen
pub fn generate_match_report(load: &Load, outcome: &MatchOutcome) -> String {
    let required_weight = load.total_weight_kg();

    let mut report = String::new();
    report.push_str("==================================================\n");
    report.push_str("           Load Compatibility Report\n");
    report.push_str("==================================================\n\n");
    report.push_str(&format!("Load:            {}\n", load.id));
    report.push_str(&format!(
        "Route:           {} -> {}\n",
        load.origin, load.destination
    ));
    report.push_str(&format!(
        "Required size:   {:.1} ft ({})\n",
        load.vehicle_requirement.size_ft, load.vehicle_requirement.vehicle_type
    ));
    report.push_str(&format!("Shipment weight: {:.0} kg\n\n", required_weight));

    report.push_str("Summary\n");
    report.push_str(&format!("  Candidates:   {}\n", outcome.total()));
    report.push_str(&format!("  Compatible:   {}\n", outcome.compatible.len()));
    report.push_str(&format!("  Incompatible: {}\n\n", outcome.incompatible.len()));

    if !outcome.compatible.is_empty() {
        report.push_str("Compatible Vehicles\n");
        report.push_str("-".repeat(60).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<18} {:>9} {:>12} {:>12}\n",
            "Plate", "Size(ft)", "Limit(t)", "Headroom(kg)"
        ));
        for vehicle in &outcome.compatible {
            report.push_str(&format!(
                "{:<18} {:>9.1} {:>12.2} {:>12.0}\n",
                truncate_str(&vehicle.plate_number, 17),
                vehicle.vehicle_size_ft,
                vehicle.passing_limit_tons,
                vehicle.capacity_kg() - required_weight
            ));
        }
        report.push('\n');
    } else {
        report.push_str("No Compatible Vehicles\n\n");
    }

    if !outcome.incompatible.is_empty() {
        report.push_str("Rejected Vehicles\n");
        report.push_str("-".repeat(60).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<18} {:>9} {:>12} {}\n",
            "Plate", "Size(ft)", "Limit(t)", "Reasons"
        ));
        for rejected in &outcome.incompatible {
            let reasons: Vec<&str> = rejected.reasons.iter().map(|r| r.label()).collect();
            report.push_str(&format!(
                "{:<18} {:>9.1} {:>12.2} {}\n",
                truncate_str(&rejected.vehicle.plate_number, 17),
                rejected.vehicle.vehicle_size_ft,
                rejected.vehicle.passing_limit_tons,
                reasons.join(", ")
            ));
        }
        report.push('\n');
    }

    report.push_str("==================================================\n");
    report
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", truncated)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VehicleRequirement;

    fn load_with(size_ft: f64, weight_kg: f64) -> Load {
        let mut load = Load::new(
            "provider-1".to_string(),
            "Dhaka".to_string(),
            "Sylhet".to_string(),
            VehicleRequirement {
                size_ft,
                vehicle_type: "10-wheel".to_string(),
                trailer_type: None,
            },
        );
        if weight_kg != 0.0 {
            load = load.with_material("cargo".to_string(), weight_kg);
        }
        load
    }

    fn vehicle_with(plate: &str, size_ft: f64, limit_tons: f64) -> Vehicle {
        Vehicle::new(
            "owner-1".to_string(),
            plate.to_string(),
            size_ft,
            limit_tons,
            "10-wheel".to_string(),
        )
        .approved()
    }

    #[test]
    fn test_scenario_partition_with_reasons() {
        // Load requires size=14, total weight=5000kg
        let load = load_with(14.0, 5000.0);

        let vehicle_a = vehicle_with("A", 14.0, 6.0);
        let vehicle_b = vehicle_with("B", 12.0, 10.0);
        let mut vehicle_c = vehicle_with("C", 20.0, 3.0);
        vehicle_c.set_status(VehicleStatus::Assigned).unwrap();
        let mut vehicle_d = vehicle_with("D", 20.0, 10.0);
        vehicle_d.is_approved = false;

        let outcome =
            match_load(&load, &[vehicle_a, vehicle_b, vehicle_c, vehicle_d]).unwrap();

        assert_eq!(outcome.compatible.len(), 1);
        assert_eq!(outcome.compatible[0].plate_number, "A");

        assert_eq!(outcome.incompatible.len(), 3);
        assert_eq!(outcome.incompatible[0].vehicle.plate_number, "B");
        assert_eq!(outcome.incompatible[0].reasons, vec![ReasonCode::Size]);
        assert_eq!(outcome.incompatible[1].vehicle.plate_number, "C");
        assert_eq!(
            outcome.incompatible[1].reasons,
            vec![ReasonCode::Weight, ReasonCode::Status]
        );
        assert_eq!(outcome.incompatible[2].vehicle.plate_number, "D");
        assert_eq!(outcome.incompatible[2].reasons, vec![ReasonCode::Approval]);
    }

    #[test]
    fn test_partition_is_exact() {
        let load = load_with(14.0, 5000.0);
        let vehicles = vec![
            vehicle_with("A", 14.0, 6.0),
            vehicle_with("B", 12.0, 10.0),
            vehicle_with("C", 20.0, 3.0),
        ];
        let outcome = match_load(&load, &vehicles).unwrap();

        let mut seen: Vec<String> = outcome
            .compatible
            .iter()
            .map(|v| v.id.clone())
            .chain(outcome.incompatible.iter().map(|r| r.vehicle.id.clone()))
            .collect();
        seen.sort();
        let mut expected: Vec<String> = vehicles.iter().map(|v| v.id.clone()).collect();
        expected.sort();
        assert_eq!(seen, expected);
        assert_eq!(outcome.total(), vehicles.len());
    }

    #[test]
    fn test_size_boundary_inclusive() {
        let load = load_with(14.0, 0.0);
        let outcome = match_load(&load, &[vehicle_with("X", 14.0, 5.0)]).unwrap();
        assert_eq!(outcome.compatible.len(), 1);
    }

    #[test]
    fn test_weight_boundary_inclusive() {
        // passing_limit 5t == 5000kg exactly
        let load = load_with(10.0, 5000.0);
        let outcome = match_load(&load, &[vehicle_with("X", 12.0, 5.0)]).unwrap();
        assert_eq!(outcome.compatible.len(), 1);
    }

    #[test]
    fn test_weight_just_over_limit_rejected() {
        let load = load_with(10.0, 5000.5);
        let outcome = match_load(&load, &[vehicle_with("X", 12.0, 5.0)]).unwrap();
        assert_eq!(outcome.incompatible.len(), 1);
        assert_eq!(outcome.incompatible[0].reasons, vec![ReasonCode::Weight]);
    }

    #[test]
    fn test_empty_vehicle_collection() {
        let load = load_with(14.0, 5000.0);
        let outcome = match_load(&load, &[]).unwrap();
        assert!(outcome.compatible.is_empty());
        assert!(outcome.incompatible.is_empty());
    }

    #[test]
    fn test_empty_manifest_ignores_passing_limit() {
        let load = load_with(10.0, 0.0);
        let outcome = match_load(&load, &[vehicle_with("X", 10.0, 0.5)]).unwrap();
        assert_eq!(outcome.compatible.len(), 1);
    }

    #[test]
    fn test_invalid_required_size_is_error() {
        let mut load = load_with(14.0, 1000.0);
        load.vehicle_requirement.size_ft = f64::NAN;
        assert!(match_load(&load, &[vehicle_with("X", 20.0, 10.0)]).is_err());

        load.vehicle_requirement.size_ft = -1.0;
        assert!(match_load(&load, &[vehicle_with("X", 20.0, 10.0)]).is_err());
    }

    #[test]
    fn test_invalid_material_weight_is_error() {
        let load = load_with(14.0, f64::NAN);
        assert!(match_load(&load, &[vehicle_with("X", 20.0, 10.0)]).is_err());
    }

    #[test]
    fn test_idempotent_over_unchanged_inputs() {
        let load = load_with(14.0, 5000.0);
        let vehicles = vec![vehicle_with("A", 14.0, 6.0), vehicle_with("B", 12.0, 10.0)];
        let first = match_load(&load, &vehicles).unwrap();
        let second = match_load(&load, &vehicles).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_find_loads_skips_non_posted() {
        let vehicle = vehicle_with("X", 20.0, 10.0);
        let posted = load_with(14.0, 5000.0);
        let mut assigned = load_with(14.0, 5000.0);
        assigned.advance().unwrap();
        let too_big = load_with(24.0, 5000.0);

        let matches =
            find_loads_for_vehicle(&vehicle, &[posted.clone(), assigned, too_big]).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, posted.id);
    }

    #[test]
    fn test_unapproved_vehicle_finds_no_loads() {
        let mut vehicle = vehicle_with("X", 20.0, 10.0);
        vehicle.is_approved = false;
        let matches = find_loads_for_vehicle(&vehicle, &[load_with(14.0, 5000.0)]).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_generate_report() {
        let load = load_with(14.0, 5000.0);
        let vehicles = vec![vehicle_with("GOOD", 14.0, 6.0), vehicle_with("SMALL", 12.0, 10.0)];
        let outcome = match_load(&load, &vehicles).unwrap();
        let report = generate_match_report(&load, &outcome);
        assert!(report.contains("Load Compatibility Report"));
        assert!(report.contains("GOOD"));
        assert!(report.contains("SMALL"));
        assert!(report.contains("size"));
    }
}
