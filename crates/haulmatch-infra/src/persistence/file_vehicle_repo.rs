//! File-based implementation of VehicleRepository

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use haulmatch_domain::model::{Vehicle, VehicleStatus};
use haulmatch_domain::repository::VehicleRepository;
use haulmatch_types::{Error, Result};

/// File-based vehicle repository (vehicles.json)
pub struct FileVehicleRepository {
    store_path: PathBuf,
    vehicles: HashMap<String, Vehicle>,
}

impl FileVehicleRepository {
    /// Create or load a repository in the given directory
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("vehicles.json");

        let vehicles = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).unwrap_or_default()
        } else {
            HashMap::new()
        };

        Ok(Self {
            store_path,
            vehicles,
        })
    }

    fn persist(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.vehicles)?;
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.vehicles.len()
    }
}

/// Normalize a plate for comparison: drop spaces and dashes, lowercase
fn normalize_plate(plate: &str) -> String {
    plate.replace([' ', '-'], "").to_lowercase()
}

impl VehicleRepository for FileVehicleRepository {
    fn save(&mut self, vehicle: &Vehicle) -> std::result::Result<(), Error> {
        self.vehicles.insert(vehicle.id.clone(), vehicle.clone());
        self.persist()
    }

    fn find_by_id(&self, id: &str) -> std::result::Result<Option<Vehicle>, Error> {
        Ok(self.vehicles.get(id).cloned())
    }

    fn find_by_plate(&self, plate: &str) -> std::result::Result<Option<Vehicle>, Error> {
        let normalized = normalize_plate(plate);
        Ok(self
            .vehicles
            .values()
            .find(|v| normalize_plate(&v.plate_number) == normalized)
            .cloned())
    }

    fn find_all(&self) -> std::result::Result<Vec<Vehicle>, Error> {
        let mut vehicles: Vec<Vehicle> = self.vehicles.values().cloned().collect();
        vehicles.sort_by(|a, b| a.plate_number.cmp(&b.plate_number));
        Ok(vehicles)
    }

    fn find_available_approved(&self) -> std::result::Result<Vec<Vehicle>, Error> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|v| v.status == VehicleStatus::Available && v.is_approved)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_vehicle(plate: &str) -> Vehicle {
        Vehicle::new(
            "owner-1".to_string(),
            plate.to_string(),
            14.0,
            6.0,
            "10-wheel".to_string(),
        )
    }

    #[test]
    fn test_find_by_plate_ignores_spacing() {
        let dir = tempdir().unwrap();
        let mut repo = FileVehicleRepository::open(dir.path().to_path_buf()).unwrap();
        repo.save(&sample_vehicle("DHK-TA 1122")).unwrap();

        assert!(repo.find_by_plate("dhkta1122").unwrap().is_some());
        assert!(repo.find_by_plate("DHK TA-1122").unwrap().is_some());
        assert!(repo.find_by_plate("DHK-TA-9999").unwrap().is_none());
    }

    #[test]
    fn test_available_approved_filter() {
        let dir = tempdir().unwrap();
        let mut repo = FileVehicleRepository::open(dir.path().to_path_buf()).unwrap();

        let approved = sample_vehicle("A-1").approved();
        let unapproved = sample_vehicle("B-2");
        let mut busy = sample_vehicle("C-3").approved();
        busy.set_status(VehicleStatus::Assigned).unwrap();

        repo.save(&approved).unwrap();
        repo.save(&unapproved).unwrap();
        repo.save(&busy).unwrap();

        let eligible = repo.find_available_approved().unwrap();
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].plate_number, "A-1");
    }

    #[test]
    fn test_round_trip_through_reopen() {
        let dir = tempdir().unwrap();
        let vehicle = sample_vehicle("DHK-TA-1122").approved();
        {
            let mut repo = FileVehicleRepository::open(dir.path().to_path_buf()).unwrap();
            repo.save(&vehicle).unwrap();
        }
        let repo = FileVehicleRepository::open(dir.path().to_path_buf()).unwrap();
        let found = repo.find_by_id(&vehicle.id).unwrap().unwrap();
        assert!(found.is_approved);
        assert_eq!(found.status, VehicleStatus::Available);
    }
}
