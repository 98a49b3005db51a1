//! Fleet fixture loader from TOML configuration

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use haulmatch_domain::model::Vehicle;
use haulmatch_types::{ConfigError, Error, Result};

/// One `[[vehicles]]` table in a fleet file
#[derive(Debug, Deserialize)]
struct FleetEntry {
    plate_number: String,
    owner_id: String,
    vehicle_size_ft: f64,
    passing_limit_tons: f64,
    vehicle_type: String,
    #[serde(default)]
    trailer_type: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    approved: bool,
}

/// Container for parsing a fleet TOML file
#[derive(Debug, Deserialize)]
struct FleetConfig {
    vehicles: Vec<FleetEntry>,
}

/// Fleet fixture data loaded from TOML, keyed by plate number
#[derive(Debug)]
pub struct FleetLoader {
    vehicles: HashMap<String, Vehicle>,
}

impl FleetLoader {
    /// Load fleet data from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(ConfigError::ParseError(format!(
                "Failed to read fleet file: {}",
                e
            )))
        })?;

        Self::load_from_str(&content)
    }

    /// Load fleet data from a TOML string
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let config: FleetConfig = toml::from_str(toml_content).map_err(|e| {
            Error::Config(ConfigError::ParseError(format!(
                "Failed to parse fleet TOML: {}",
                e
            )))
        })?;

        let vehicles = config
            .vehicles
            .into_iter()
            .map(|entry| {
                let mut vehicle = Vehicle::new(
                    entry.owner_id,
                    entry.plate_number.clone(),
                    entry.vehicle_size_ft,
                    entry.passing_limit_tons,
                    entry.vehicle_type,
                );
                vehicle.trailer_type = entry.trailer_type;
                vehicle.company = entry.company;
                vehicle.is_approved = entry.approved;
                (entry.plate_number, vehicle)
            })
            .collect();

        Ok(Self { vehicles })
    }

    /// Look up a vehicle by plate number
    pub fn get_vehicle(&self, plate_number: &str) -> Option<&Vehicle> {
        self.vehicles.get(plate_number)
    }

    /// All loaded vehicles
    pub fn all_vehicles(&self) -> Vec<&Vehicle> {
        self.vehicles.values().collect()
    }

    /// Consume the loader, yielding owned vehicles
    pub fn into_vehicles(self) -> Vec<Vehicle> {
        self.vehicles.into_values().collect()
    }

    pub fn has_vehicle(&self, plate_number: &str) -> bool {
        self.vehicles.contains_key(plate_number)
    }

    pub fn count(&self) -> usize {
        self.vehicles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOML: &str = r#"
[[vehicles]]
plate_number = "DHK-TA-1122"
owner_id = "owner-01"
vehicle_size_ft = 14.0
passing_limit_tons = 6.0
vehicle_type = "10-wheel"
company = "Padma Logistics"
approved = true

[[vehicles]]
plate_number = "CTG-GA-5566"
owner_id = "owner-02"
vehicle_size_ft = 20.0
passing_limit_tons = 10.0
vehicle_type = "trailer"
trailer_type = "flatbed"
"#;

    #[test]
    fn test_load_from_str() {
        let loader = FleetLoader::load_from_str(TEST_TOML).unwrap();
        assert_eq!(loader.count(), 2);
    }

    #[test]
    fn test_get_vehicle() {
        let loader = FleetLoader::load_from_str(TEST_TOML).unwrap();
        let vehicle = loader.get_vehicle("DHK-TA-1122").unwrap();
        assert!(vehicle.is_approved);
        assert!((vehicle.passing_limit_tons - 6.0).abs() < f64::EPSILON);
        assert_eq!(vehicle.company.as_deref(), Some("Padma Logistics"));
        assert!(!loader.has_vehicle("XYZ-0000"));
    }

    #[test]
    fn test_unapproved_by_default() {
        let loader = FleetLoader::load_from_str(TEST_TOML).unwrap();
        let vehicle = loader.get_vehicle("CTG-GA-5566").unwrap();
        assert!(!vehicle.is_approved);
        assert_eq!(vehicle.trailer_type.as_deref(), Some("flatbed"));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = FleetLoader::load_from_str("vehicles = 3");
        assert!(result.is_err());
    }
}
