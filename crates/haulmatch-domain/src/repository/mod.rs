//! Repository trait definitions for data persistence

use haulmatch_types::Error;

use crate::model::{Load, LoadStatus, Vehicle};

/// Repository for posted loads
pub trait LoadRepository {
    /// Save or replace a load
    fn save(&mut self, load: &Load) -> Result<(), Error>;

    /// Find a load by its id
    fn find_by_id(&self, id: &str) -> Result<Option<Load>, Error>;

    /// Find all loads
    fn find_all(&self) -> Result<Vec<Load>, Error>;

    /// Find loads in a given lifecycle status
    fn find_by_status(&self, status: LoadStatus) -> Result<Vec<Load>, Error>;
}

/// Repository for registered vehicles
pub trait VehicleRepository {
    /// Save or replace a vehicle
    fn save(&mut self, vehicle: &Vehicle) -> Result<(), Error>;

    /// Find a vehicle by its id
    fn find_by_id(&self, id: &str) -> Result<Option<Vehicle>, Error>;

    /// Find a vehicle by license plate
    fn find_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, Error>;

    /// Find all vehicles
    fn find_all(&self) -> Result<Vec<Vehicle>, Error>;

    /// Find vehicles that are available and admin-approved
    fn find_available_approved(&self) -> Result<Vec<Vehicle>, Error>;
}
