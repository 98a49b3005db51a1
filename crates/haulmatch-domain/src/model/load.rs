//! Load (shipment) type definitions and lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use haulmatch_types::{Error, Result};

/// Load lifecycle status
///
/// Transitions run strictly forward, one step at a time:
/// posted -> assigned -> enroute -> delivered -> completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Posted,
    Assigned,
    Enroute,
    Delivered,
    Completed,
}

impl LoadStatus {
    /// The next status in the lifecycle, if any
    pub fn next(&self) -> Option<LoadStatus> {
        match self {
            LoadStatus::Posted => Some(LoadStatus::Assigned),
            LoadStatus::Assigned => Some(LoadStatus::Enroute),
            LoadStatus::Enroute => Some(LoadStatus::Delivered),
            LoadStatus::Delivered => Some(LoadStatus::Completed),
            LoadStatus::Completed => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoadStatus::Posted => "posted",
            LoadStatus::Assigned => "assigned",
            LoadStatus::Enroute => "enroute",
            LoadStatus::Delivered => "delivered",
            LoadStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for LoadStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "posted" => Ok(LoadStatus::Posted),
            "assigned" => Ok(LoadStatus::Assigned),
            "enroute" => Ok(LoadStatus::Enroute),
            "delivered" => Ok(LoadStatus::Delivered),
            "completed" => Ok(LoadStatus::Completed),
            other => Err(Error::InvalidInput(format!(
                "unknown load status: {}",
                other
            ))),
        }
    }
}

/// One material line in a load's manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Display name (e.g. "cement bags", "steel coils")
    pub name: String,
    /// Shipment weight for this line in kilograms
    pub total_weight_kg: f64,
}

/// Vehicle requirements declared by the load provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRequirement {
    /// Minimum vehicle body length in feet
    pub size_ft: f64,
    /// Vehicle category (e.g. "10-wheel", "covered-van")
    pub vehicle_type: String,
    /// Trailer category, when the load needs one
    #[serde(default)]
    pub trailer_type: Option<String>,
}

/// A shipment posted by a load provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Load {
    /// Unique identifier
    pub id: String,
    /// Owning load-provider account
    pub provider_id: String,
    /// Pickup location
    pub origin: String,
    /// Drop-off location
    pub destination: String,
    /// Required vehicle spec
    pub vehicle_requirement: VehicleRequirement,
    /// Materials to transport; total shipment weight is the sum of lines
    #[serde(default)]
    pub materials: Vec<Material>,
    /// Lifecycle status
    pub status: LoadStatus,
    /// Agreed freight price, once negotiated
    #[serde(default)]
    pub agreed_price: Option<f64>,
    /// Whether the platform coordinates this load (commission applies)
    #[serde(default)]
    pub platform_coordinated: bool,
    /// When the load was posted
    pub posted_at: DateTime<Utc>,
}

impl Load {
    pub fn new(
        provider_id: String,
        origin: String,
        destination: String,
        vehicle_requirement: VehicleRequirement,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            provider_id,
            origin,
            destination,
            vehicle_requirement,
            materials: Vec::new(),
            status: LoadStatus::Posted,
            agreed_price: None,
            platform_coordinated: false,
            posted_at: Utc::now(),
        }
    }

    pub fn with_material(mut self, name: String, total_weight_kg: f64) -> Self {
        self.materials.push(Material {
            name,
            total_weight_kg,
        });
        self
    }

    pub fn with_agreed_price(mut self, price: f64) -> Self {
        self.agreed_price = Some(price);
        self
    }

    pub fn with_platform_coordination(mut self) -> Self {
        self.platform_coordinated = true;
        self
    }

    /// Total shipment weight in kilograms (0 for an empty manifest)
    pub fn total_weight_kg(&self) -> f64 {
        self.materials.iter().map(|m| m.total_weight_kg).sum()
    }

    /// Advance the lifecycle by exactly one step
    pub fn advance(&mut self) -> Result<LoadStatus> {
        match self.status.next() {
            Some(next) => {
                self.status = next;
                Ok(next)
            }
            None => Err(Error::InvalidTransition(format!(
                "load {} is already completed",
                self.id
            ))),
        }
    }
}
