//! Platform commission accrual

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use haulmatch_types::{Error, Result};

use crate::model::Load;

/// Fee charged on platform-coordinated loads
pub const PLATFORM_COMMISSION_RATE: f64 = 0.05;

/// Commission settlement status, forward-only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionStatus {
    Pending,
    Deducted,
    Paid,
}

impl CommissionStatus {
    pub fn next(&self) -> Option<CommissionStatus> {
        match self {
            CommissionStatus::Pending => Some(CommissionStatus::Deducted),
            CommissionStatus::Deducted => Some(CommissionStatus::Paid),
            CommissionStatus::Paid => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CommissionStatus::Pending => "pending",
            CommissionStatus::Deducted => "deducted",
            CommissionStatus::Paid => "paid",
        }
    }
}

impl std::fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One accrued commission line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionEntry {
    pub load_id: String,
    pub rate: f64,
    pub amount: f64,
    pub status: CommissionStatus,
    pub accrued_at: DateTime<Utc>,
}

impl CommissionEntry {
    /// Advance settlement by one step
    pub fn advance(&mut self) -> Result<CommissionStatus> {
        match self.status.next() {
            Some(next) => {
                self.status = next;
                Ok(next)
            }
            None => Err(Error::InvalidTransition(format!(
                "commission for load {} is already paid",
                self.load_id
            ))),
        }
    }
}

/// Commission owed for a load, if any
///
/// Only platform-coordinated loads with an agreed price accrue commission;
/// everything else returns None.
pub fn commission_for(load: &Load) -> Option<CommissionEntry> {
    if !load.platform_coordinated {
        return None;
    }
    let price = load.agreed_price?;
    Some(CommissionEntry {
        load_id: load.id.clone(),
        rate: PLATFORM_COMMISSION_RATE,
        amount: price * PLATFORM_COMMISSION_RATE,
        status: CommissionStatus::Pending,
        accrued_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VehicleRequirement;

    fn priced_load(platform_coordinated: bool, price: Option<f64>) -> Load {
        let mut load = Load::new(
            "provider-1".to_string(),
            "Dhaka".to_string(),
            "Rajshahi".to_string(),
            VehicleRequirement {
                size_ft: 14.0,
                vehicle_type: "10-wheel".to_string(),
                trailer_type: None,
            },
        );
        load.platform_coordinated = platform_coordinated;
        load.agreed_price = price;
        load
    }

    #[test]
    fn test_commission_on_coordinated_load() {
        let entry = commission_for(&priced_load(true, Some(20000.0))).unwrap();
        assert!((entry.amount - 1000.0).abs() < f64::EPSILON);
        assert_eq!(entry.status, CommissionStatus::Pending);
    }

    #[test]
    fn test_no_commission_without_coordination() {
        assert!(commission_for(&priced_load(false, Some(20000.0))).is_none());
    }

    #[test]
    fn test_no_commission_without_price() {
        assert!(commission_for(&priced_load(true, None)).is_none());
    }

    #[test]
    fn test_settlement_forward_only() {
        let mut entry = commission_for(&priced_load(true, Some(10000.0))).unwrap();
        assert_eq!(entry.advance().unwrap(), CommissionStatus::Deducted);
        assert_eq!(entry.advance().unwrap(), CommissionStatus::Paid);
        assert!(entry.advance().is_err());
    }
}
