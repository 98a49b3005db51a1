//! Typed asynchronous client for the marketplace REST backend
//!
//! The matcher itself never performs I/O; callers fetch loads and vehicles
//! through this client, run the matcher, then post match requests back.

mod api;
mod dto;
mod session;

pub use api::{ApiClient, ApiError};
pub use dto::{LoadDto, MatchRequestDto, MaterialDto, VehicleDto, VehicleRequirementDto};
pub use session::Session;
