use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use haulmatch_app::config::Config;
use haulmatch_app::repository::{
    open_assignment_store_at, open_ledger_at, open_load_repo_at, open_vehicle_repo_at,
};
use haulmatch_infra::fleet_toml::FleetLoader;
use haulmatch_infra::manifest_csv::load_manifest_from_csv;

#[derive(Parser, Debug)]
#[command(name = "fleet_check", about = "Store and fixture diagnostic for haulmatch data")]
struct Args {
    /// Optional config file path (defaults to app config location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Store directory override
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Path to a fleet TOML file to validate
    #[arg(long)]
    fleet_toml: Option<PathBuf>,

    /// Path to a load manifest CSV to validate
    #[arg(long)]
    manifest_csv: Option<PathBuf>,

    /// Write JSONL output to file
    #[arg(long)]
    jsonl: Option<PathBuf>,

    /// Write pretty JSON summary to file
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Summary {
    store_dir: String,
    load_count: usize,
    vehicle_count: usize,
    assignment_count: usize,
    active_assignment_count: usize,
    ledger_count: usize,
    ledger_pending_amount: f64,
    fleet_count: Option<usize>,
    manifest_count: Option<usize>,
}

fn main() {
    let args = Args::parse();

    let config = match args.config {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str::<Config>(&content).unwrap_or_default(),
            Err(e) => {
                eprintln!("Failed to read config at {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Config::load().unwrap_or_default(),
    };

    let store_dir = match args.store_dir {
        Some(dir) => dir,
        None => config
            .store_dir()
            .unwrap_or_else(|_| std::env::temp_dir().join("haulmatch")),
    };

    println!("[Store] Dir: {}", store_dir.display());

    let mut summary = Summary {
        store_dir: store_dir.display().to_string(),
        load_count: 0,
        vehicle_count: 0,
        assignment_count: 0,
        active_assignment_count: 0,
        ledger_count: 0,
        ledger_pending_amount: 0.0,
        fleet_count: None,
        manifest_count: None,
    };

    let loads = match open_load_repo_at(store_dir.clone()) {
        Ok(repo) => repo,
        Err(e) => {
            eprintln!("[Store] failed to open loads: {}", e);
            std::process::exit(1);
        }
    };
    summary.load_count = loads.count();
    println!("[Store] loads.json entries: {}", summary.load_count);

    let vehicles = match open_vehicle_repo_at(store_dir.clone()) {
        Ok(repo) => repo,
        Err(e) => {
            eprintln!("[Store] failed to open vehicles: {}", e);
            std::process::exit(1);
        }
    };
    summary.vehicle_count = vehicles.count();
    println!("[Store] vehicles.json entries: {}", summary.vehicle_count);

    let assignments = match open_assignment_store_at(store_dir.clone()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("[Store] failed to open: {}", e);
            std::process::exit(1);
        }
    };
    summary.assignment_count = assignments.count();
    summary.active_assignment_count = assignments.active_count();
    println!(
        "[Store] assignments.json entries: {}",
        summary.assignment_count
    );
    println!(
        "[Store] active assignments: {}",
        summary.active_assignment_count
    );

    let ledger = match open_ledger_at(store_dir.clone()) {
        Ok(ledger) => ledger,
        Err(e) => {
            eprintln!("[Ledger] failed to open: {}", e);
            std::process::exit(1);
        }
    };
    summary.ledger_count = ledger.count();
    summary.ledger_pending_amount = ledger.stats().pending_amount;
    println!("[Ledger] ledger.json entries: {}", summary.ledger_count);
    println!(
        "[Ledger] pending amount: {:.2}",
        summary.ledger_pending_amount
    );

    if let Some(fleet_toml) = args.fleet_toml {
        println!("[Fleet] file: {}", fleet_toml.display());
        match FleetLoader::load_from_file(&fleet_toml) {
            Ok(loader) => {
                summary.fleet_count = Some(loader.count());
                println!("[Fleet] vehicles loaded: {}", loader.count());
            }
            Err(e) => {
                eprintln!("[Fleet] load failed: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("[Fleet] skipped (provide --fleet-toml)");
    }

    if let Some(manifest_csv) = args.manifest_csv {
        println!("[Manifest] file: {}", manifest_csv.display());
        match load_manifest_from_csv(&manifest_csv) {
            Ok(loads) => {
                summary.manifest_count = Some(loads.len());
                println!("[Manifest] loads loaded: {}", loads.len());
            }
            Err(e) => {
                eprintln!("[Manifest] load failed: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("[Manifest] skipped (provide --manifest-csv)");
    }

    if let Some(path) = args.jsonl {
        if let Ok(mut file) = std::fs::File::create(&path) {
            let _ = writeln!(
                file,
                "{}",
                serde_json::json!({
                    "event": "store",
                    "store_dir": summary.store_dir,
                    "load_count": summary.load_count,
                    "vehicle_count": summary.vehicle_count,
                    "assignment_count": summary.assignment_count,
                    "active_assignment_count": summary.active_assignment_count,
                    "ledger_count": summary.ledger_count
                })
            );
            let _ = writeln!(
                file,
                "{}",
                serde_json::json!({
                    "event": "fixtures",
                    "fleet_count": summary.fleet_count,
                    "manifest_count": summary.manifest_count
                })
            );
        } else {
            eprintln!("[JSONL] failed to write: {}", path.display());
        }
    }

    if let Some(path) = args.json {
        if let Ok(content) = serde_json::to_string_pretty(&summary) {
            if let Err(e) = std::fs::write(&path, content) {
                eprintln!("[JSON] failed to write: {}", e);
            }
        }
    }
}
