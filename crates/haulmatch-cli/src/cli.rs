//! CLI definition using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use haulmatch_types::OutputFormat;

#[derive(Parser)]
#[command(name = "haulmatch")]
#[command(version)]
#[command(about = "Load-vehicle compatibility matching for a freight marketplace")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend API base URL override
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Store directory override
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match one load against the registered vehicle pool
    Match {
        /// Load id
        load_id: String,

        /// Number of ranked candidates to show. Uses config value if not specified.
        #[arg(long, short = 'n')]
        top: Option<usize>,
    },

    /// Match every posted load against the vehicle pool
    MatchAll {
        /// Output file for results (JSON)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Number of parallel workers. 0 = auto (CPU count). Uses 4 if not specified.
        #[arg(long, short = 'j')]
        jobs: Option<usize>,
    },

    /// List posted loads a vehicle can serve
    FindLoads {
        /// Vehicle id or license plate
        vehicle: String,
    },

    /// Confirm a load-vehicle match
    Assign {
        /// Load id
        load_id: String,

        /// Vehicle id
        vehicle_id: String,

        /// Also submit the match request to the backend
        #[arg(long)]
        remote: bool,
    },

    /// Advance a load one lifecycle step
    Advance {
        /// Load id
        load_id: String,
    },

    /// Return a delivered vehicle to the available pool
    Release {
        /// Vehicle id
        vehicle_id: String,
    },

    /// List registered vehicles
    Vehicles {
        /// Only show available, approved vehicles
        #[arg(long)]
        eligible: bool,
    },

    /// List loads
    Loads {
        /// Filter by lifecycle status (posted, assigned, enroute, delivered, completed)
        #[arg(long)]
        status: Option<String>,
    },

    /// Flip a vehicle's admin approval flag
    Approve {
        /// Vehicle id
        vehicle_id: String,

        /// Revoke approval instead of granting it
        #[arg(long)]
        revoke: bool,

        /// Also update approval on the backend
        #[arg(long)]
        remote: bool,
    },

    /// Commission ledger report
    Commission {
        /// Advance settlement for the given load id by one step
        #[arg(long)]
        advance: Option<String>,
    },

    /// Pull loads and vehicles from the backend into the local store
    Fetch {
        /// Only fetch loads
        #[arg(long)]
        loads_only: bool,

        /// Only fetch vehicles
        #[arg(long)]
        vehicles_only: bool,
    },

    /// Import fleet and manifest fixtures into the local store
    Import {
        /// Fleet TOML file
        #[arg(long)]
        fleet: Option<PathBuf>,

        /// Load manifest CSV file
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Parse and report without writing to the store
        #[arg(long)]
        dry_run: bool,
    },

    /// Export assignments and ledger to Excel
    Export {
        /// Output Excel file path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set backend API base URL
        #[arg(long)]
        set_api_url: Option<String>,

        /// Set backend auth token
        #[arg(long)]
        set_token: Option<String>,

        /// Set store directory
        #[arg(long)]
        set_store_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set default ranked candidate count
        #[arg(long)]
        set_top_n: Option<usize>,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}
