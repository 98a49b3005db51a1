//! Command handlers

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use indicatif::{ProgressBar, ProgressStyle};

use haulmatch_app::app::{self, MatchOptions, MatchSummary};
use haulmatch_app::config::Config;
use haulmatch_app::export::export_to_excel;
use haulmatch_app::repository::{
    open_assignment_store, open_ledger, open_load_repo, open_vehicle_repo,
};
use haulmatch_client::ApiClient;
use haulmatch_domain::model::{Load, LoadStatus, Vehicle};
use haulmatch_domain::repository::{LoadRepository, VehicleRepository};
use haulmatch_domain::service::{generate_match_report, match_load, rank_candidates};
use haulmatch_infra::fleet_toml::FleetLoader;
use haulmatch_infra::manifest_csv::load_manifest_from_csv;
use haulmatch_types::{Error, OutputFormat, Result};

use crate::cli::{Cli, Commands};
use crate::output::{output_ledger, output_loads, output_match_summary, output_vehicles};

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref api_url) = cli.api_url {
        config.api_base_url = api_url.clone();
    }
    if let Some(ref store_dir) = cli.store_dir {
        config.store_dir = Some(store_dir.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Match { load_id, top } => {
            cmd_match(&config, output_format, load_id, *top)
        }

        Commands::MatchAll { output, jobs } => {
            let job_count = match jobs {
                Some(0) => num_cpus::get(),
                Some(n) => *n,
                None => 4,
            };
            cmd_match_all(
                &config,
                output_format,
                cli.verbose,
                output.clone(),
                job_count,
            )
        }

        Commands::FindLoads { vehicle } => cmd_find_loads(&config, output_format, vehicle),

        Commands::Assign {
            load_id,
            vehicle_id,
            remote,
        } => cmd_assign(&config, cli.verbose, load_id, vehicle_id, *remote),

        Commands::Advance { load_id } => cmd_advance(&config, load_id),

        Commands::Release { vehicle_id } => cmd_release(&config, vehicle_id),

        Commands::Vehicles { eligible } => cmd_vehicles(&config, output_format, *eligible),

        Commands::Loads { status } => cmd_loads(&config, output_format, status.as_deref()),

        Commands::Approve {
            vehicle_id,
            revoke,
            remote,
        } => cmd_approve(&config, vehicle_id, *revoke, *remote),

        Commands::Commission { advance } => {
            cmd_commission(&config, output_format, advance.as_deref())
        }

        Commands::Fetch {
            loads_only,
            vehicles_only,
        } => cmd_fetch(&config, *loads_only, *vehicles_only),

        Commands::Import {
            fleet,
            manifest,
            dry_run,
        } => cmd_import(&config, fleet.clone(), manifest.clone(), *dry_run),

        Commands::Export { output } => cmd_export(&config, output.clone()),

        Commands::Config {
            show,
            set_api_url,
            set_token,
            set_store_dir,
            set_output,
            set_top_n,
            reset,
        } => cmd_config(
            *show,
            set_api_url.clone(),
            set_token.clone(),
            set_store_dir.clone(),
            *set_output,
            *set_top_n,
            *reset,
        ),
    }
}

fn api_client(config: &Config) -> Result<ApiClient> {
    ApiClient::with_base_url(&config.api_base_url).map_err(|e| Error::Api(e.to_string()))
}

/// Run an async client call on a throwaway current-thread runtime
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

fn cmd_match(
    config: &Config,
    output_format: OutputFormat,
    load_id: &str,
    top: Option<usize>,
) -> Result<()> {
    let loads = open_load_repo(config)?;
    let vehicles = open_vehicle_repo(config)?;

    let options = MatchOptions::new()
        .with_top_n(top.unwrap_or(config.top_n))
        .with_report(true);
    let summary = app::match_one(&loads, &vehicles, load_id, &options)?;

    output_match_summary(output_format, &summary)
}

fn cmd_match_all(
    config: &Config,
    output_format: OutputFormat,
    verbose: bool,
    output: Option<PathBuf>,
    jobs: usize,
) -> Result<()> {
    let loads_repo = open_load_repo(config)?;
    let vehicles_repo = open_vehicle_repo(config)?;

    let posted = loads_repo.find_by_status(LoadStatus::Posted)?;
    if posted.is_empty() {
        println!("No posted loads.");
        return Ok(());
    }
    let top_n = config.top_n;

    if verbose {
        eprintln!(
            "Matching {} posted loads with {} worker(s)",
            posted.len(),
            jobs
        );
    }

    let mut summaries;
    let mut failed = 0usize;

    if jobs <= 1 {
        // Sequential matching through the app layer
        let options = MatchOptions::new().with_top_n(top_n).with_report(true);
        summaries = app::match_all_posted(&loads_repo, &vehicles_repo, &options)?;
    } else {
        // Parallel matching: the matcher is pure, so workers only share
        // read-only snapshots of the loads and candidates
        let candidates = vehicles_repo.find_all()?;

        let pb = ProgressBar::new(posted.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        let results: Arc<Mutex<Vec<(usize, std::result::Result<MatchSummary, String>)>>> =
            Arc::new(Mutex::new(Vec::new()));
        let posted = Arc::new(posted);
        let candidates = Arc::new(candidates);
        let next_index = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        let worker_count = jobs.min(posted.len());

        for _ in 0..worker_count {
            let posted = Arc::clone(&posted);
            let candidates = Arc::clone(&candidates);
            let results = Arc::clone(&results);
            let next_index = Arc::clone(&next_index);
            let pb = pb.clone();

            let handle = thread::spawn(move || {
                loop {
                    let idx = next_index.fetch_add(1, Ordering::SeqCst);
                    if idx >= posted.len() {
                        break;
                    }

                    let load = &posted[idx];
                    if verbose {
                        pb.set_message(load.id.clone());
                    }

                    let result = match_load(load, &candidates)
                        .and_then(|outcome| {
                            let ranked =
                                rank_candidates(load, &outcome.compatible, Some(top_n))?;
                            Ok(MatchSummary {
                                load: load.clone(),
                                report: Some(generate_match_report(load, &outcome)),
                                outcome,
                                ranked,
                            })
                        })
                        .map_err(|e| e.to_string());

                    {
                        let mut guard = results.lock().unwrap();
                        guard.push((idx, result));
                    }

                    pb.inc(1);
                }
            });

            handles.push(handle);
        }

        for handle in handles {
            let _ = handle.join();
        }

        pb.finish_and_clear();

        let mut task_results = Arc::try_unwrap(results)
            .expect("All workers should be done")
            .into_inner()
            .unwrap();
        task_results.sort_by_key(|(idx, _)| *idx);

        summaries = Vec::new();
        for (_, result) in task_results {
            match result {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    eprintln!("Match failed: {}", e);
                    failed += 1;
                }
            }
        }
    }

    if let Some(output_path) = output {
        let content = serde_json::to_string_pretty(&summaries)?;
        std::fs::write(&output_path, content)?;
        println!("Results saved to: {}", output_path.display());
        return Ok(());
    }

    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(&summaries)?;
        println!("{}", content);
        return Ok(());
    }

    println!("\nBatch Matching Complete");
    println!("=======================");
    println!("Posted loads:  {}", summaries.len() + failed);
    println!("Failed:        {}", failed);
    println!();
    println!(
        "{:<38} {:>11} {:>13} {:<18}",
        "Load", "Compatible", "Incompatible", "Best candidate"
    );
    println!("{}", "-".repeat(84));
    for summary in &summaries {
        let best = summary
            .ranked
            .first()
            .map(|r| r.vehicle.plate_number.clone())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<38} {:>11} {:>13} {:<18}",
            &summary.load.id[..summary.load.id.len().min(36)],
            summary.outcome.compatible.len(),
            summary.outcome.incompatible.len(),
            best
        );
    }

    Ok(())
}

fn cmd_find_loads(config: &Config, output_format: OutputFormat, vehicle_arg: &str) -> Result<()> {
    let loads = open_load_repo(config)?;
    let vehicles = open_vehicle_repo(config)?;

    // Accept either an id or a license plate
    let vehicle = match vehicles.find_by_id(vehicle_arg)? {
        Some(vehicle) => vehicle,
        None => vehicles.find_by_plate(vehicle_arg)?.ok_or_else(|| {
            Error::InvalidInput(format!("vehicle not found: {}", vehicle_arg))
        })?,
    };

    let matches = app::find_loads(&loads, &vehicles, &vehicle.id)?;
    println!(
        "Vehicle {} ({:.1} ft, {:.1} t) can serve {} posted load(s)\n",
        vehicle.plate_number,
        vehicle.vehicle_size_ft,
        vehicle.passing_limit_tons,
        matches.len()
    );
    output_loads(output_format, &matches)
}

fn cmd_assign(
    config: &Config,
    verbose: bool,
    load_id: &str,
    vehicle_id: &str,
    remote: bool,
) -> Result<()> {
    let mut loads = open_load_repo(config)?;
    let mut vehicles = open_vehicle_repo(config)?;
    let mut assignments = open_assignment_store(config)?;
    let mut ledger = open_ledger(config)?;

    let result = app::assign(
        &mut loads,
        &mut vehicles,
        &mut assignments,
        &mut ledger,
        load_id,
        vehicle_id,
    )?;

    println!(
        "Assigned load {} to vehicle {}",
        result.load.id, result.vehicle.plate_number
    );
    println!("  Assignment: {}", result.assignment_id);
    println!("  Load status:    {}", result.load.status);
    println!("  Vehicle status: {}", result.vehicle.status);
    if result.commission_accrued {
        if let Some(entry) = ledger.get(&result.load.id) {
            println!(
                "  Commission accrued: {:.2} ({:.0}%)",
                entry.amount,
                entry.rate * 100.0
            );
        }
    }

    if remote {
        if verbose {
            eprintln!("Submitting match request to {}", config.api_base_url);
        }
        let client = api_client(config)?;
        let token = config.auth_token.clone();
        block_on(async {
            if let Some(token) = token {
                client.install_token(token).await;
            }
            client.request_match(load_id, vehicle_id).await
        })?
        .map_err(|e| Error::Api(e.to_string()))?;
        println!("  Match request submitted to backend");
    }

    Ok(())
}

fn cmd_advance(config: &Config, load_id: &str) -> Result<()> {
    let mut loads = open_load_repo(config)?;
    let mut vehicles = open_vehicle_repo(config)?;
    let mut assignments = open_assignment_store(config)?;

    let status = app::advance_load(&mut loads, &mut vehicles, &mut assignments, load_id)?;
    println!("Load {} is now {}", load_id, status);
    Ok(())
}

fn cmd_release(config: &Config, vehicle_id: &str) -> Result<()> {
    let mut vehicles = open_vehicle_repo(config)?;
    let assignments = open_assignment_store(config)?;

    let vehicle = app::release_vehicle(&mut vehicles, &assignments, vehicle_id)?;
    println!("Vehicle {} is now {}", vehicle.plate_number, vehicle.status);
    Ok(())
}

fn cmd_vehicles(config: &Config, output_format: OutputFormat, eligible: bool) -> Result<()> {
    let vehicles = open_vehicle_repo(config)?;
    let list = if eligible {
        vehicles.find_available_approved()?
    } else {
        vehicles.find_all()?
    };
    output_vehicles(output_format, &list)
}

fn cmd_loads(config: &Config, output_format: OutputFormat, status: Option<&str>) -> Result<()> {
    let loads = open_load_repo(config)?;
    let list = match status {
        Some(status) => loads.find_by_status(status.parse()?)?,
        None => loads.find_all()?,
    };
    output_loads(output_format, &list)
}

fn cmd_approve(config: &Config, vehicle_id: &str, revoke: bool, remote: bool) -> Result<()> {
    let mut vehicles = open_vehicle_repo(config)?;
    let vehicle = app::approve_vehicle(&mut vehicles, vehicle_id, !revoke)?;
    println!(
        "Vehicle {} approval: {}",
        vehicle.plate_number,
        if vehicle.is_approved { "granted" } else { "revoked" }
    );

    if remote {
        let client = api_client(config)?;
        let token = config.auth_token.clone();
        let approved = vehicle.is_approved;
        block_on(async {
            if let Some(token) = token {
                client.install_token(token).await;
            }
            client.set_vehicle_approval(vehicle_id, approved).await
        })?
        .map_err(|e| Error::Api(e.to_string()))?;
        println!("  Approval updated on backend");
    }

    Ok(())
}

fn cmd_commission(
    config: &Config,
    output_format: OutputFormat,
    advance: Option<&str>,
) -> Result<()> {
    let mut ledger = open_ledger(config)?;

    if let Some(load_id) = advance {
        let status = ledger.advance(load_id)?;
        println!("Commission for load {} is now {}\n", load_id, status);
    }

    let entries = ledger.all_entries();
    let stats = ledger.stats();
    output_ledger(output_format, &entries, &stats)
}

fn cmd_fetch(config: &Config, loads_only: bool, vehicles_only: bool) -> Result<()> {
    let client = api_client(config)?;
    let token = config.auth_token.clone();

    let fetch_loads = !vehicles_only;
    let fetch_vehicles = !loads_only;

    let (loads, vehicles): (Vec<Load>, Vec<Vehicle>) = block_on(async {
        if let Some(token) = token {
            client.install_token(token).await;
        }
        let loads = if fetch_loads {
            client.get_loads(None).await?
        } else {
            Vec::new()
        };
        let vehicles = if fetch_vehicles {
            client.get_vehicles(false).await?
        } else {
            Vec::new()
        };
        Ok::<_, haulmatch_client::ApiError>((loads, vehicles))
    })?
    .map_err(|e| Error::Api(e.to_string()))?;

    if fetch_loads {
        let mut repo = open_load_repo(config)?;
        for load in &loads {
            repo.save(load)?;
        }
        println!("Fetched {} load(s)", loads.len());
    }
    if fetch_vehicles {
        let mut repo = open_vehicle_repo(config)?;
        for vehicle in &vehicles {
            repo.save(vehicle)?;
        }
        println!("Fetched {} vehicle(s)", vehicles.len());
    }

    Ok(())
}

fn cmd_import(
    config: &Config,
    fleet: Option<PathBuf>,
    manifest: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    if fleet.is_none() && manifest.is_none() {
        return Err(Error::InvalidInput(
            "provide --fleet and/or --manifest".to_string(),
        ));
    }

    if let Some(fleet_path) = fleet {
        if !fleet_path.exists() {
            return Err(Error::FileNotFound(format!(
                "Fleet file not found: {}",
                fleet_path.display()
            )));
        }
        let loader = FleetLoader::load_from_file(&fleet_path)?;
        println!(
            "Loaded {} vehicle(s) from {}",
            loader.count(),
            fleet_path.display()
        );

        if !dry_run {
            let mut repo = open_vehicle_repo(config)?;
            for vehicle in loader.into_vehicles() {
                repo.save(&vehicle)?;
            }
        }
    }

    if let Some(manifest_path) = manifest {
        if !manifest_path.exists() {
            return Err(Error::FileNotFound(format!(
                "Manifest file not found: {}",
                manifest_path.display()
            )));
        }
        let loads = load_manifest_from_csv(&manifest_path)?;
        println!(
            "Loaded {} load(s) from {}",
            loads.len(),
            manifest_path.display()
        );

        if !dry_run {
            let mut repo = open_load_repo(config)?;
            for load in &loads {
                repo.save(load)?;
            }
        }
    }

    if dry_run {
        println!("[Dry run mode - nothing written to the store]");
    }

    Ok(())
}

fn cmd_export(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let assignments = open_assignment_store(config)?;
    let ledger = open_ledger(config)?;

    let output_path = output.unwrap_or_else(|| PathBuf::from("haulmatch-report.xlsx"));
    let records = assignments.all_records();
    export_to_excel(&records, &ledger.stats(), &output_path)?;

    println!("Exported to: {}", output_path.display());
    Ok(())
}

fn cmd_config(
    show: bool,
    set_api_url: Option<String>,
    set_token: Option<String>,
    set_store_dir: Option<PathBuf>,
    set_output: Option<OutputFormat>,
    set_top_n: Option<usize>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(api_url) = set_api_url {
        config.api_base_url = api_url;
        modified = true;
    }

    if let Some(token) = set_token {
        config.auth_token = Some(token);
        modified = true;
    }

    if let Some(store_dir) = set_store_dir {
        config.store_dir = Some(store_dir);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(top_n) = set_top_n {
        config.top_n = top_n;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
