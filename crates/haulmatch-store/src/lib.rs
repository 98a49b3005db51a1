//! Persistent JSON-file stores for match history and commission tracking

mod assignments;
mod ledger;

pub use assignments::{AssignmentRecord, AssignmentStore};
pub use ledger::{CommissionLedger, LedgerStats};
