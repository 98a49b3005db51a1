//! Load manifest importer from CSV

use std::path::Path;

use serde::Deserialize;

use haulmatch_domain::model::{Load, Material, VehicleRequirement};
use haulmatch_types::{Error, Result};

/// One row of a load manifest CSV
///
/// Expected header:
/// provider_id,origin,destination,size_ft,vehicle_type,materials[,trailer_type][,agreed_price][,platform_coordinated]
///
/// The materials column packs the manifest as `name:kg` pairs separated by
/// `|`, e.g. `cement bags:3000|steel coils:2000`. An empty column is a load
/// with no materials.
#[derive(Debug, Deserialize)]
struct ManifestRow {
    provider_id: String,
    origin: String,
    destination: String,
    size_ft: f64,
    vehicle_type: String,
    #[serde(default)]
    materials: String,
    #[serde(default)]
    trailer_type: Option<String>,
    #[serde(default)]
    agreed_price: Option<f64>,
    #[serde(default)]
    platform_coordinated: Option<bool>,
}

/// Load a manifest CSV into domain loads
pub fn load_manifest_from_csv(path: &Path) -> Result<Vec<Load>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::CsvLoader(format!("Failed to open manifest CSV: {}", e)))?;

    let mut loads = Vec::new();
    for (index, result) in reader.deserialize::<ManifestRow>().enumerate() {
        let row = result
            .map_err(|e| Error::CsvLoader(format!("Row {}: {}", index + 1, e)))?;
        loads.push(row_to_load(row, index)?);
    }
    Ok(loads)
}

fn row_to_load(row: ManifestRow, index: usize) -> Result<Load> {
    let mut load = Load::new(
        row.provider_id,
        row.origin,
        row.destination,
        VehicleRequirement {
            size_ft: row.size_ft,
            vehicle_type: row.vehicle_type,
            trailer_type: row.trailer_type,
        },
    );
    load.materials = parse_materials(&row.materials, index)?;
    load.agreed_price = row.agreed_price;
    load.platform_coordinated = row.platform_coordinated.unwrap_or(false);
    Ok(load)
}

/// Parse a packed materials column (`name:kg|name:kg`)
fn parse_materials(packed: &str, row_index: usize) -> Result<Vec<Material>> {
    let packed = packed.trim();
    if packed.is_empty() {
        return Ok(Vec::new());
    }

    let mut materials = Vec::new();
    for part in packed.split('|') {
        let (name, weight) = part.rsplit_once(':').ok_or_else(|| {
            Error::CsvLoader(format!(
                "Row {}: material entry '{}' is not name:kg",
                row_index + 1,
                part
            ))
        })?;
        let total_weight_kg: f64 = weight.trim().parse().map_err(|_| {
            Error::CsvLoader(format!(
                "Row {}: material weight '{}' is not a number",
                row_index + 1,
                weight
            ))
        })?;
        materials.push(Material {
            name: name.trim().to_string(),
            total_weight_kg,
        });
    }
    Ok(materials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TEST_CSV: &str = "\
provider_id,origin,destination,size_ft,vehicle_type,materials,trailer_type,agreed_price,platform_coordinated
provider-01,Dhaka,Chattogram,14,10-wheel,cement bags:3000|steel coils:2000,,25000,true
provider-02,Khulna,Jashore,10,pickup,,,,
";

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_manifest() {
        let file = write_csv(TEST_CSV);
        let loads = load_manifest_from_csv(file.path()).unwrap();
        assert_eq!(loads.len(), 2);

        let first = &loads[0];
        assert_eq!(first.provider_id, "provider-01");
        assert_eq!(first.materials.len(), 2);
        assert!((first.total_weight_kg() - 5000.0).abs() < f64::EPSILON);
        assert_eq!(first.agreed_price, Some(25000.0));
        assert!(first.platform_coordinated);

        let second = &loads[1];
        assert!(second.materials.is_empty());
        assert_eq!(second.total_weight_kg(), 0.0);
        assert!(!second.platform_coordinated);
    }

    #[test]
    fn test_bad_material_entry_is_error() {
        let file = write_csv(
            "provider_id,origin,destination,size_ft,vehicle_type,materials\n\
             provider-01,Dhaka,Sylhet,14,10-wheel,cement bags\n",
        );
        let err = load_manifest_from_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("name:kg"));
    }

    #[test]
    fn test_bad_weight_is_error() {
        let file = write_csv(
            "provider_id,origin,destination,size_ft,vehicle_type,materials\n\
             provider-01,Dhaka,Sylhet,14,10-wheel,cement bags:heavy\n",
        );
        assert!(load_manifest_from_csv(file.path()).is_err());
    }
}
