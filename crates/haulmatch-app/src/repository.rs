//! Repository and store adapters for the persistence layer

use std::path::PathBuf;

use haulmatch_infra::persistence::{FileLoadRepository, FileVehicleRepository};
use haulmatch_store::{AssignmentStore, CommissionLedger};
use haulmatch_types::Result;

use crate::config::Config;

/// Open file-based load repository
pub fn open_load_repo(config: &Config) -> Result<FileLoadRepository> {
    FileLoadRepository::open(config.store_dir()?)
}

/// Open file-based vehicle repository
pub fn open_vehicle_repo(config: &Config) -> Result<FileVehicleRepository> {
    FileVehicleRepository::open(config.store_dir()?)
}

/// Open the assignment store
pub fn open_assignment_store(config: &Config) -> Result<AssignmentStore> {
    AssignmentStore::open(config.store_dir()?)
}

/// Open the commission ledger
pub fn open_ledger(config: &Config) -> Result<CommissionLedger> {
    CommissionLedger::open(config.store_dir()?)
}

/// Open file-based load repository at a custom directory
pub fn open_load_repo_at(store_dir: PathBuf) -> Result<FileLoadRepository> {
    FileLoadRepository::open(store_dir)
}

/// Open file-based vehicle repository at a custom directory
pub fn open_vehicle_repo_at(store_dir: PathBuf) -> Result<FileVehicleRepository> {
    FileVehicleRepository::open(store_dir)
}

/// Open the assignment store at a custom directory
pub fn open_assignment_store_at(store_dir: PathBuf) -> Result<AssignmentStore> {
    AssignmentStore::open(store_dir)
}

/// Open the commission ledger at a custom directory
pub fn open_ledger_at(store_dir: PathBuf) -> Result<CommissionLedger> {
    CommissionLedger::open(store_dir)
}
