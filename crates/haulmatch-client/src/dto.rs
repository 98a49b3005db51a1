//! Wire shapes for the marketplace REST API
//!
//! The backend speaks camelCase JSON; these DTOs convert to and from the
//! snake_case domain models at the client boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use haulmatch_domain::model::{
    Load, LoadStatus, Material, Vehicle, VehicleRequirement, VehicleStatus,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRequirementDto {
    /// Minimum vehicle body length in feet
    pub size: f64,
    pub vehicle_type: String,
    #[serde(default)]
    pub trailer_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDto {
    pub name: String,
    /// Weight in kilograms
    pub total_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadDto {
    pub id: String,
    pub provider_id: String,
    pub origin: String,
    pub destination: String,
    pub vehicle_requirement: VehicleRequirementDto,
    #[serde(default)]
    pub materials: Vec<MaterialDto>,
    pub status: LoadStatus,
    #[serde(default)]
    pub agreed_price: Option<f64>,
    /// Backend wire name for the platform-coordinated flag
    #[serde(default)]
    pub xbow_support: bool,
    pub posted_at: DateTime<Utc>,
}

impl From<LoadDto> for Load {
    fn from(dto: LoadDto) -> Self {
        Load {
            id: dto.id,
            provider_id: dto.provider_id,
            origin: dto.origin,
            destination: dto.destination,
            vehicle_requirement: VehicleRequirement {
                size_ft: dto.vehicle_requirement.size,
                vehicle_type: dto.vehicle_requirement.vehicle_type,
                trailer_type: dto.vehicle_requirement.trailer_type,
            },
            materials: dto
                .materials
                .into_iter()
                .map(|m| Material {
                    name: m.name,
                    total_weight_kg: m.total_weight,
                })
                .collect(),
            status: dto.status,
            agreed_price: dto.agreed_price,
            platform_coordinated: dto.xbow_support,
            posted_at: dto.posted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDto {
    pub id: String,
    pub owner_id: String,
    pub plate_number: String,
    #[serde(default)]
    pub company: Option<String>,
    /// Body length in feet
    pub vehicle_size: f64,
    /// Carrying limit in tons
    pub passing_limit: f64,
    pub vehicle_type: String,
    #[serde(default)]
    pub trailer_type: Option<String>,
    pub status: VehicleStatus,
    pub is_approved: bool,
    pub registered_at: DateTime<Utc>,
}

impl From<VehicleDto> for Vehicle {
    fn from(dto: VehicleDto) -> Self {
        Vehicle {
            id: dto.id,
            owner_id: dto.owner_id,
            plate_number: dto.plate_number,
            company: dto.company,
            vehicle_size_ft: dto.vehicle_size,
            passing_limit_tons: dto.passing_limit,
            vehicle_type: dto.vehicle_type,
            trailer_type: dto.trailer_type,
            status: dto.status,
            is_approved: dto.is_approved,
            registered_at: dto.registered_at,
        }
    }
}

/// Body of `POST /admin/match-loads`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequestDto {
    pub load_id: String,
    pub vehicle_id: String,
}
