//! Vehicle type definitions and status transitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use haulmatch_types::{Error, Result, VehicleClass};

/// Vehicle availability status
///
/// Transitions form a guarded cycle: available -> assigned -> in_transit ->
/// available. A cancelled assignment may also return assigned -> available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    Assigned,
    InTransit,
}

impl VehicleStatus {
    pub fn can_transition_to(&self, target: VehicleStatus) -> bool {
        matches!(
            (self, target),
            (VehicleStatus::Available, VehicleStatus::Assigned)
                | (VehicleStatus::Assigned, VehicleStatus::InTransit)
                | (VehicleStatus::Assigned, VehicleStatus::Available)
                | (VehicleStatus::InTransit, VehicleStatus::Available)
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::Assigned => "assigned",
            VehicleStatus::InTransit => "in_transit",
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for VehicleStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "available" => Ok(VehicleStatus::Available),
            "assigned" => Ok(VehicleStatus::Assigned),
            "in_transit" | "in-transit" => Ok(VehicleStatus::InTransit),
            other => Err(Error::InvalidInput(format!(
                "unknown vehicle status: {}",
                other
            ))),
        }
    }
}

/// A truck registered by a vehicle owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique identifier
    pub id: String,
    /// Owning vehicle-owner account
    pub owner_id: String,
    /// License plate number
    pub plate_number: String,
    /// Transport company name
    #[serde(default)]
    pub company: Option<String>,
    /// Body length in feet
    pub vehicle_size_ft: f64,
    /// Maximum legal/declared carrying weight in tons
    pub passing_limit_tons: f64,
    /// Vehicle category (e.g. "10-wheel", "covered-van")
    pub vehicle_type: String,
    /// Trailer category, if the vehicle tows one
    #[serde(default)]
    pub trailer_type: Option<String>,
    /// Availability status
    pub status: VehicleStatus,
    /// Set by an administrator, never by the vehicle owner
    #[serde(default)]
    pub is_approved: bool,
    /// When the vehicle was registered
    pub registered_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(
        owner_id: String,
        plate_number: String,
        vehicle_size_ft: f64,
        passing_limit_tons: f64,
        vehicle_type: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            plate_number,
            company: None,
            vehicle_size_ft,
            passing_limit_tons,
            vehicle_type,
            trailer_type: None,
            status: VehicleStatus::Available,
            is_approved: false,
            registered_at: Utc::now(),
        }
    }

    pub fn with_company(mut self, company: String) -> Self {
        self.company = Some(company);
        self
    }

    pub fn with_trailer_type(mut self, trailer_type: String) -> Self {
        self.trailer_type = Some(trailer_type);
        self
    }

    pub fn approved(mut self) -> Self {
        self.is_approved = true;
        self
    }

    /// Carrying capacity normalized to kilograms
    pub fn capacity_kg(&self) -> f64 {
        self.passing_limit_tons * 1000.0
    }

    pub fn vehicle_class(&self) -> VehicleClass {
        VehicleClass::from_size_ft(self.vehicle_size_ft)
    }

    /// Apply a status transition, rejecting jumps the cycle does not allow
    pub fn set_status(&mut self, target: VehicleStatus) -> Result<()> {
        if self.status == target {
            return Ok(());
        }
        if !self.status.can_transition_to(target) {
            return Err(Error::InvalidTransition(format!(
                "vehicle {}: {} -> {} is not allowed",
                self.plate_number, self.status, target
            )));
        }
        self.status = target;
        Ok(())
    }
}
