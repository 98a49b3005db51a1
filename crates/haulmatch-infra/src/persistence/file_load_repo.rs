//! File-based implementation of LoadRepository

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use haulmatch_domain::model::{Load, LoadStatus};
use haulmatch_domain::repository::LoadRepository;
use haulmatch_types::{Error, Result};

/// File-based load repository (loads.json)
pub struct FileLoadRepository {
    store_path: PathBuf,
    loads: HashMap<String, Load>,
}

impl FileLoadRepository {
    /// Create or load a repository in the given directory
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("loads.json");

        let loads = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).unwrap_or_default()
        } else {
            HashMap::new()
        };

        Ok(Self { store_path, loads })
    }

    fn persist(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.loads)?;
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.loads.len()
    }
}

impl LoadRepository for FileLoadRepository {
    fn save(&mut self, load: &Load) -> std::result::Result<(), Error> {
        self.loads.insert(load.id.clone(), load.clone());
        self.persist()
    }

    fn find_by_id(&self, id: &str) -> std::result::Result<Option<Load>, Error> {
        Ok(self.loads.get(id).cloned())
    }

    fn find_all(&self) -> std::result::Result<Vec<Load>, Error> {
        let mut loads: Vec<Load> = self.loads.values().cloned().collect();
        loads.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        Ok(loads)
    }

    fn find_by_status(&self, status: LoadStatus) -> std::result::Result<Vec<Load>, Error> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|l| l.status == status)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulmatch_domain::model::VehicleRequirement;
    use tempfile::tempdir;

    fn sample_load() -> Load {
        Load::new(
            "provider-1".to_string(),
            "Dhaka".to_string(),
            "Bogura".to_string(),
            VehicleRequirement {
                size_ft: 14.0,
                vehicle_type: "10-wheel".to_string(),
                trailer_type: None,
            },
        )
        .with_material("rice sacks".to_string(), 4000.0)
    }

    #[test]
    fn test_save_and_find() {
        let dir = tempdir().unwrap();
        let mut repo = FileLoadRepository::open(dir.path().to_path_buf()).unwrap();

        let load = sample_load();
        repo.save(&load).unwrap();

        let found = repo.find_by_id(&load.id).unwrap().unwrap();
        assert_eq!(found.origin, "Dhaka");
        assert_eq!(repo.find_by_status(LoadStatus::Posted).unwrap().len(), 1);
        assert!(repo.find_by_status(LoadStatus::Assigned).unwrap().is_empty());
    }

    #[test]
    fn test_save_replaces_existing() {
        let dir = tempdir().unwrap();
        let mut repo = FileLoadRepository::open(dir.path().to_path_buf()).unwrap();

        let mut load = sample_load();
        repo.save(&load).unwrap();
        load.advance().unwrap();
        repo.save(&load).unwrap();

        assert_eq!(repo.count(), 1);
        let found = repo.find_by_id(&load.id).unwrap().unwrap();
        assert_eq!(found.status, LoadStatus::Assigned);
    }

    #[test]
    fn test_round_trip_through_reopen() {
        let dir = tempdir().unwrap();
        let load = sample_load();
        {
            let mut repo = FileLoadRepository::open(dir.path().to_path_buf()).unwrap();
            repo.save(&load).unwrap();
        }
        let repo = FileLoadRepository::open(dir.path().to_path_buf()).unwrap();
        let found = repo.find_by_id(&load.id).unwrap().unwrap();
        assert!((found.total_weight_kg() - 4000.0).abs() < f64::EPSILON);
    }
}
