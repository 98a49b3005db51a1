//! Domain services

pub mod commission;
pub mod compatibility;
pub mod ranking;

pub use commission::{
    commission_for, CommissionEntry, CommissionStatus, PLATFORM_COMMISSION_RATE,
};
pub use compatibility::{
    find_loads_for_vehicle, generate_match_report, is_compatible, match_load,
    required_weight_kg, MatchOutcome, ReasonCode, RejectedVehicle,
};
pub use ranking::{rank_candidates, RankedVehicle};
