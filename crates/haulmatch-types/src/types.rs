//! Shared vehicle classification types

use serde::{Deserialize, Serialize};

/// Vehicle class based on body length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleClass {
    /// Pickup class (up to 10 ft)
    Pickup,
    /// Light truck (10-14 ft)
    Light,
    /// Medium truck (14-20 ft)
    Medium,
    /// Heavy truck (20 ft and above)
    Heavy,
    /// Unknown or invalid size
    Unknown,
}

impl VehicleClass {
    /// Determine vehicle class from body length in feet
    pub fn from_size_ft(size_ft: f64) -> Self {
        match size_ft {
            s if !s.is_finite() || s <= 0.0 => VehicleClass::Unknown,
            s if s <= 10.0 => VehicleClass::Pickup,
            s if s <= 14.0 => VehicleClass::Light,
            s if s <= 20.0 => VehicleClass::Medium,
            _ => VehicleClass::Heavy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleClass::Pickup => "pickup",
            VehicleClass::Light => "light",
            VehicleClass::Medium => "medium",
            VehicleClass::Heavy => "heavy",
            VehicleClass::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_from_size() {
        assert_eq!(VehicleClass::from_size_ft(10.0), VehicleClass::Pickup);
        assert_eq!(VehicleClass::from_size_ft(14.0), VehicleClass::Light);
        assert_eq!(VehicleClass::from_size_ft(17.0), VehicleClass::Medium);
        assert_eq!(VehicleClass::from_size_ft(24.0), VehicleClass::Heavy);
        assert_eq!(VehicleClass::from_size_ft(0.0), VehicleClass::Unknown);
        assert_eq!(VehicleClass::from_size_ft(f64::NAN), VehicleClass::Unknown);
    }
}
