//! Candidate ranking layered on top of the matcher
//!
//! Ordering is a separate concern from compatibility: the matcher produces a
//! stable partition, and this module ranks an already-compatible set so the
//! tightest fit surfaces first. It never re-checks eligibility.

use serde::{Deserialize, Serialize};

use haulmatch_types::Result;

use crate::model::{Load, Vehicle};
use crate::service::compatibility::required_weight_kg;

/// A compatible candidate with its fit margins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedVehicle {
    pub vehicle: Vehicle,
    /// Spare carrying capacity after loading, in kilograms
    pub weight_headroom_kg: f64,
    /// Body length beyond the requirement, in feet
    pub size_margin_ft: f64,
}

/// Rank compatible candidates by fit, tightest first
///
/// Primary key: weight headroom ascending; secondary: size margin ascending;
/// final tie-break on plate number so the order is deterministic. `top_n`
/// truncates the result when given.
pub fn rank_candidates(
    load: &Load,
    candidates: &[Vehicle],
    top_n: Option<usize>,
) -> Result<Vec<RankedVehicle>> {
    let required_weight = required_weight_kg(load)?;
    let required_size = load.vehicle_requirement.size_ft;

    let mut ranked: Vec<RankedVehicle> = candidates
        .iter()
        .map(|vehicle| RankedVehicle {
            weight_headroom_kg: vehicle.capacity_kg() - required_weight,
            size_margin_ft: vehicle.vehicle_size_ft - required_size,
            vehicle: vehicle.clone(),
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.weight_headroom_kg
            .total_cmp(&b.weight_headroom_kg)
            .then(a.size_margin_ft.total_cmp(&b.size_margin_ft))
            .then_with(|| a.vehicle.plate_number.cmp(&b.vehicle.plate_number))
    });

    if let Some(n) = top_n {
        ranked.truncate(n);
    }
    Ok(ranked)
}
