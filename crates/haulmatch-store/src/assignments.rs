//! Persistent store for load-vehicle assignments

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use haulmatch_types::{Result, StoreError};

/// One recorded load-vehicle match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Unique identifier (used as key)
    pub id: String,

    /// Matched load
    pub load_id: String,

    /// Assigned vehicle
    pub vehicle_id: String,

    /// When the match was confirmed
    pub matched_at: DateTime<Utc>,

    /// Whether the assignment is still active (load not yet delivered)
    #[serde(default = "default_true")]
    pub active: bool,

    /// Optional notes
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Persistent store for assignment records
pub struct AssignmentStore {
    store_path: PathBuf,
    records: HashMap<String, AssignmentRecord>,
}

impl AssignmentStore {
    /// Create or load a store
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("assignments.json");

        let records = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).unwrap_or_default()
        } else {
            HashMap::new()
        };

        Ok(Self {
            store_path,
            records,
        })
    }

    fn save(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.records)?;
        Ok(())
    }

    /// Record a confirmed match
    ///
    /// Rejects a second active assignment for the same load.
    pub fn record(&mut self, load_id: &str, vehicle_id: &str) -> Result<String> {
        if self.active_for_load(load_id).is_some() {
            return Err(StoreError::Duplicate(format!(
                "load {} already has an active assignment",
                load_id
            ))
            .into());
        }

        let record = AssignmentRecord {
            id: uuid::Uuid::new_v4().to_string(),
            load_id: load_id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            matched_at: Utc::now(),
            active: true,
            notes: None,
        };
        let id = record.id.clone();
        self.records.insert(id.clone(), record);
        self.save()?;
        Ok(id)
    }

    /// Mark an assignment inactive once its load is delivered
    pub fn close(&mut self, assignment_id: &str) -> Result<()> {
        match self.records.get_mut(assignment_id) {
            Some(record) => {
                record.active = false;
                self.save()?;
                Ok(())
            }
            None => Err(StoreError::NotFound(assignment_id.to_string()).into()),
        }
    }

    /// The active assignment for a load, if any
    pub fn active_for_load(&self, load_id: &str) -> Option<&AssignmentRecord> {
        self.records
            .values()
            .find(|r| r.active && r.load_id == load_id)
    }

    /// Active assignments held by a vehicle
    pub fn active_for_vehicle(&self, vehicle_id: &str) -> Vec<&AssignmentRecord> {
        let mut records: Vec<_> = self
            .records
            .values()
            .filter(|r| r.active && r.vehicle_id == vehicle_id)
            .collect();
        records.sort_by(|a, b| b.matched_at.cmp(&a.matched_at));
        records
    }

    /// Get a record by id
    pub fn get(&self, assignment_id: &str) -> Option<&AssignmentRecord> {
        self.records.get(assignment_id)
    }

    /// All records, newest first
    pub fn all_records(&self) -> Vec<&AssignmentRecord> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by(|a, b| b.matched_at.cmp(&a.matched_at));
        records
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn active_count(&self) -> usize {
        self.records.values().filter(|r| r.active).count()
    }
}
