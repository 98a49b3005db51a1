//! Matching and assignment use cases
//!
//! The thin coordination layer between the repositories, the pure matcher,
//! and the stores. All status transitions of both entities go through here so
//! the lifecycle guards are applied in one place.

use serde::Serialize;

use haulmatch_domain::model::{Load, LoadStatus, Vehicle, VehicleStatus};
use haulmatch_domain::repository::{LoadRepository, VehicleRepository};
use haulmatch_domain::service::{
    commission_for, find_loads_for_vehicle, generate_match_report, match_load, rank_candidates,
    MatchOutcome, RankedVehicle,
};
use haulmatch_store::{AssignmentStore, CommissionLedger};
use haulmatch_types::{Error, Result};

/// Options for a matching run
#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    top_n: Option<usize>,
    include_report: bool,
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }

    pub fn with_report(mut self, include_report: bool) -> Self {
        self.include_report = include_report;
        self
    }
}

/// Result of matching one load
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub load: Load,
    pub outcome: MatchOutcome,
    pub ranked: Vec<RankedVehicle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

/// Match one load against every registered vehicle
pub fn match_one(
    loads: &impl LoadRepository,
    vehicles: &impl VehicleRepository,
    load_id: &str,
    options: &MatchOptions,
) -> Result<MatchSummary> {
    let load = loads
        .find_by_id(load_id)?
        .ok_or_else(|| Error::InvalidInput(format!("load not found: {}", load_id)))?;
    let candidates = vehicles.find_all()?;

    let outcome = match_load(&load, &candidates)?;
    let ranked = rank_candidates(&load, &outcome.compatible, options.top_n)?;
    let report = options
        .include_report
        .then(|| generate_match_report(&load, &outcome));

    Ok(MatchSummary {
        load,
        outcome,
        ranked,
        report,
    })
}

/// Match every posted load against the vehicle pool
pub fn match_all_posted(
    loads: &impl LoadRepository,
    vehicles: &impl VehicleRepository,
    options: &MatchOptions,
) -> Result<Vec<MatchSummary>> {
    let posted = loads.find_by_status(LoadStatus::Posted)?;
    let candidates = vehicles.find_all()?;

    let mut summaries = Vec::with_capacity(posted.len());
    for load in posted {
        let outcome = match_load(&load, &candidates)?;
        let ranked = rank_candidates(&load, &outcome.compatible, options.top_n)?;
        let report = options
            .include_report
            .then(|| generate_match_report(&load, &outcome));
        summaries.push(MatchSummary {
            load,
            outcome,
            ranked,
            report,
        });
    }
    Ok(summaries)
}

/// Posted loads a vehicle can serve (the vehicle-owner search)
pub fn find_loads(
    loads: &impl LoadRepository,
    vehicles: &impl VehicleRepository,
    vehicle_id: &str,
) -> Result<Vec<Load>> {
    let vehicle = vehicles
        .find_by_id(vehicle_id)?
        .ok_or_else(|| Error::InvalidInput(format!("vehicle not found: {}", vehicle_id)))?;
    let posted = loads.find_by_status(LoadStatus::Posted)?;
    find_loads_for_vehicle(&vehicle, &posted)
}

/// Outcome of a confirmed assignment
#[derive(Debug, Clone)]
pub struct AssignmentResult {
    pub assignment_id: String,
    pub load: Load,
    pub vehicle: Vehicle,
    pub commission_accrued: bool,
}

/// Confirm a load-vehicle match
///
/// The load must still be posted and the vehicle must pass the full
/// compatibility predicate at assignment time; both lifecycles advance and
/// commission is accrued for platform-coordinated loads.
pub fn assign(
    loads: &mut impl LoadRepository,
    vehicles: &mut impl VehicleRepository,
    assignments: &mut AssignmentStore,
    ledger: &mut CommissionLedger,
    load_id: &str,
    vehicle_id: &str,
) -> Result<AssignmentResult> {
    let mut load = loads
        .find_by_id(load_id)?
        .ok_or_else(|| Error::InvalidInput(format!("load not found: {}", load_id)))?;
    if load.status != LoadStatus::Posted {
        return Err(Error::InvalidTransition(format!(
            "load {} is {}, only posted loads can be assigned",
            load.id, load.status
        )));
    }

    let mut vehicle = vehicles
        .find_by_id(vehicle_id)?
        .ok_or_else(|| Error::InvalidInput(format!("vehicle not found: {}", vehicle_id)))?;

    let outcome = match_load(&load, std::slice::from_ref(&vehicle))?;
    if let Some(rejected) = outcome.incompatible.first() {
        let reasons: Vec<&str> = rejected.reasons.iter().map(|r| r.label()).collect();
        return Err(Error::InvalidInput(format!(
            "vehicle {} is not compatible with load {}: {}",
            vehicle.plate_number,
            load.id,
            reasons.join(", ")
        )));
    }

    let assignment_id = assignments.record(&load.id, &vehicle.id)?;
    load.advance()?;
    vehicle.set_status(VehicleStatus::Assigned)?;
    loads.save(&load)?;
    vehicles.save(&vehicle)?;

    let commission_accrued = match commission_for(&load) {
        Some(entry) => ledger.accrue(entry)?,
        None => false,
    };

    Ok(AssignmentResult {
        assignment_id,
        load,
        vehicle,
        commission_accrued,
    })
}

/// Advance a load one lifecycle step, keeping the assigned vehicle in sync
///
/// assigned -> enroute moves the vehicle to in_transit; enroute -> delivered
/// closes the assignment (the vehicle stays in_transit until released).
pub fn advance_load(
    loads: &mut impl LoadRepository,
    vehicles: &mut impl VehicleRepository,
    assignments: &mut AssignmentStore,
    load_id: &str,
) -> Result<LoadStatus> {
    let mut load = loads
        .find_by_id(load_id)?
        .ok_or_else(|| Error::InvalidInput(format!("load not found: {}", load_id)))?;
    let new_status = load.advance()?;

    match new_status {
        LoadStatus::Enroute => {
            let vehicle_id = assignments
                .active_for_load(&load.id)
                .map(|record| record.vehicle_id.clone());
            if let Some(vehicle_id) = vehicle_id {
                if let Some(mut vehicle) = vehicles.find_by_id(&vehicle_id)? {
                    vehicle.set_status(VehicleStatus::InTransit)?;
                    vehicles.save(&vehicle)?;
                }
            }
        }
        LoadStatus::Delivered => {
            let assignment_id = assignments
                .active_for_load(&load.id)
                .map(|record| record.id.clone());
            if let Some(assignment_id) = assignment_id {
                assignments.close(&assignment_id)?;
            }
        }
        _ => {}
    }

    loads.save(&load)?;
    Ok(new_status)
}

/// Return a vehicle to the available pool
///
/// Refused while the vehicle still holds an undelivered load.
pub fn release_vehicle(
    vehicles: &mut impl VehicleRepository,
    assignments: &AssignmentStore,
    vehicle_id: &str,
) -> Result<Vehicle> {
    let mut vehicle = vehicles
        .find_by_id(vehicle_id)?
        .ok_or_else(|| Error::InvalidInput(format!("vehicle not found: {}", vehicle_id)))?;

    let active = assignments.active_for_vehicle(&vehicle.id);
    if !active.is_empty() {
        return Err(Error::InvalidTransition(format!(
            "vehicle {} still has {} undelivered load(s)",
            vehicle.plate_number,
            active.len()
        )));
    }

    vehicle.set_status(VehicleStatus::Available)?;
    vehicles.save(&vehicle)?;
    Ok(vehicle)
}

/// Flip a vehicle's admin approval flag
pub fn approve_vehicle(
    vehicles: &mut impl VehicleRepository,
    vehicle_id: &str,
    approved: bool,
) -> Result<Vehicle> {
    let mut vehicle = vehicles
        .find_by_id(vehicle_id)?
        .ok_or_else(|| Error::InvalidInput(format!("vehicle not found: {}", vehicle_id)))?;
    vehicle.is_approved = approved;
    vehicles.save(&vehicle)?;
    Ok(vehicle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulmatch_domain::model::VehicleRequirement;
    use haulmatch_infra::persistence::{FileLoadRepository, FileVehicleRepository};
    use tempfile::tempdir;

    struct Fixture {
        loads: FileLoadRepository,
        vehicles: FileVehicleRepository,
        assignments: AssignmentStore,
        ledger: CommissionLedger,
        _dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let path = dir.path().to_path_buf();
        Fixture {
            loads: FileLoadRepository::open(path.clone()).unwrap(),
            vehicles: FileVehicleRepository::open(path.clone()).unwrap(),
            assignments: AssignmentStore::open(path.clone()).unwrap(),
            ledger: CommissionLedger::open(path).unwrap(),
            _dir: dir,
        }
    }

    fn seed_load(fx: &mut Fixture, platform_coordinated: bool) -> Load {
        let mut load = Load::new(
            "provider-1".to_string(),
            "Dhaka".to_string(),
            "Chattogram".to_string(),
            VehicleRequirement {
                size_ft: 14.0,
                vehicle_type: "10-wheel".to_string(),
                trailer_type: None,
            },
        )
        .with_material("cement bags".to_string(), 5000.0)
        .with_agreed_price(20000.0);
        load.platform_coordinated = platform_coordinated;
        fx.loads.save(&load).unwrap();
        load
    }

    fn seed_vehicle(fx: &mut Fixture, plate: &str, size_ft: f64, limit_tons: f64) -> Vehicle {
        let vehicle = Vehicle::new(
            "owner-1".to_string(),
            plate.to_string(),
            size_ft,
            limit_tons,
            "10-wheel".to_string(),
        )
        .approved();
        fx.vehicles.save(&vehicle).unwrap();
        vehicle
    }

    #[test]
    fn test_match_one_ranks_compatible_candidates() {
        let mut fx = fixture();
        let load = seed_load(&mut fx, false);
        seed_vehicle(&mut fx, "TIGHT", 14.0, 6.0);
        seed_vehicle(&mut fx, "ROOMY", 20.0, 10.0);
        seed_vehicle(&mut fx, "SMALL", 12.0, 10.0);

        let summary = match_one(
            &fx.loads,
            &fx.vehicles,
            &load.id,
            &MatchOptions::new().with_top_n(1).with_report(true),
        )
        .unwrap();

        assert_eq!(summary.outcome.compatible.len(), 2);
        assert_eq!(summary.outcome.incompatible.len(), 1);
        assert_eq!(summary.ranked.len(), 1);
        assert_eq!(summary.ranked[0].vehicle.plate_number, "TIGHT");
        assert!(summary.report.unwrap().contains("SMALL"));
    }

    #[test]
    fn test_assign_advances_both_lifecycles() {
        let mut fx = fixture();
        let load = seed_load(&mut fx, true);
        let vehicle = seed_vehicle(&mut fx, "DHK-TA-1122", 14.0, 6.0);

        let result = assign(
            &mut fx.loads,
            &mut fx.vehicles,
            &mut fx.assignments,
            &mut fx.ledger,
            &load.id,
            &vehicle.id,
        )
        .unwrap();

        assert_eq!(result.load.status, LoadStatus::Assigned);
        assert_eq!(result.vehicle.status, VehicleStatus::Assigned);
        assert!(result.commission_accrued);
        assert!((fx.ledger.get(&load.id).unwrap().amount - 1000.0).abs() < f64::EPSILON);
        assert!(fx.assignments.active_for_load(&load.id).is_some());
    }

    #[test]
    fn test_assign_rejects_incompatible_vehicle() {
        let mut fx = fixture();
        let load = seed_load(&mut fx, false);
        let small = seed_vehicle(&mut fx, "SMALL", 12.0, 10.0);

        let err = assign(
            &mut fx.loads,
            &mut fx.vehicles,
            &mut fx.assignments,
            &mut fx.ledger,
            &load.id,
            &small.id,
        )
        .unwrap_err();
        assert!(err.to_string().contains("size"));

        // Nothing moved
        assert_eq!(
            fx.loads.find_by_id(&load.id).unwrap().unwrap().status,
            LoadStatus::Posted
        );
        assert_eq!(fx.assignments.count(), 0);
    }

    #[test]
    fn test_assign_rejects_non_posted_load() {
        let mut fx = fixture();
        let load = seed_load(&mut fx, false);
        let vehicle = seed_vehicle(&mut fx, "DHK-TA-1122", 14.0, 6.0);

        assign(
            &mut fx.loads,
            &mut fx.vehicles,
            &mut fx.assignments,
            &mut fx.ledger,
            &load.id,
            &vehicle.id,
        )
        .unwrap();

        let other = seed_vehicle(&mut fx, "CTG-GA-5566", 20.0, 10.0);
        let err = assign(
            &mut fx.loads,
            &mut fx.vehicles,
            &mut fx.assignments,
            &mut fx.ledger,
            &load.id,
            &other.id,
        )
        .unwrap_err();
        assert!(err.to_string().contains("only posted loads"));
    }

    #[test]
    fn test_release_refused_while_load_undelivered() {
        let mut fx = fixture();
        let load = seed_load(&mut fx, false);
        let vehicle = seed_vehicle(&mut fx, "DHK-TA-1122", 14.0, 6.0);

        assign(
            &mut fx.loads,
            &mut fx.vehicles,
            &mut fx.assignments,
            &mut fx.ledger,
            &load.id,
            &vehicle.id,
        )
        .unwrap();

        let err = release_vehicle(&mut fx.vehicles, &fx.assignments, &vehicle.id).unwrap_err();
        assert!(err.to_string().contains("undelivered"));
    }

    #[test]
    fn test_full_delivery_cycle_releases_vehicle() {
        let mut fx = fixture();
        let load = seed_load(&mut fx, false);
        let vehicle = seed_vehicle(&mut fx, "DHK-TA-1122", 14.0, 6.0);

        assign(
            &mut fx.loads,
            &mut fx.vehicles,
            &mut fx.assignments,
            &mut fx.ledger,
            &load.id,
            &vehicle.id,
        )
        .unwrap();

        // assigned -> enroute: vehicle moves to in_transit
        let status =
            advance_load(&mut fx.loads, &mut fx.vehicles, &mut fx.assignments, &load.id).unwrap();
        assert_eq!(status, LoadStatus::Enroute);
        assert_eq!(
            fx.vehicles.find_by_id(&vehicle.id).unwrap().unwrap().status,
            VehicleStatus::InTransit
        );

        // enroute -> delivered: assignment closes
        let status =
            advance_load(&mut fx.loads, &mut fx.vehicles, &mut fx.assignments, &load.id).unwrap();
        assert_eq!(status, LoadStatus::Delivered);
        assert!(fx.assignments.active_for_load(&load.id).is_none());

        // Vehicle can now return to the pool
        let released =
            release_vehicle(&mut fx.vehicles, &fx.assignments, &vehicle.id).unwrap();
        assert_eq!(released.status, VehicleStatus::Available);
    }

    #[test]
    fn test_find_loads_respects_vehicle_fitness() {
        let mut fx = fixture();
        seed_load(&mut fx, false);
        let vehicle = seed_vehicle(&mut fx, "DHK-TA-1122", 14.0, 6.0);
        let small = seed_vehicle(&mut fx, "SMALL", 10.0, 2.0);

        assert_eq!(find_loads(&fx.loads, &fx.vehicles, &vehicle.id).unwrap().len(), 1);
        assert!(find_loads(&fx.loads, &fx.vehicles, &small.id).unwrap().is_empty());
    }

    #[test]
    fn test_approve_vehicle_flips_flag() {
        let mut fx = fixture();
        let mut vehicle = seed_vehicle(&mut fx, "DHK-TA-1122", 14.0, 6.0);
        vehicle.is_approved = false;
        fx.vehicles.save(&vehicle).unwrap();

        let updated = approve_vehicle(&mut fx.vehicles, &vehicle.id, true).unwrap();
        assert!(updated.is_approved);
        let reverted = approve_vehicle(&mut fx.vehicles, &vehicle.id, false).unwrap();
        assert!(!reverted.is_approved);
    }
}
