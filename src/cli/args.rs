//! CLI argument definitions using clap
//!
//! Commands:
//! - evstats init
//! - evstats load <csv>
//! - evstats summary | trends | bev-range | verify
//! - evstats county <name> [--page] [--page-size] [--model-year] [--sort-by] [--sort-order]
//! - evstats models <make>
//! - evstats analyze   (request JSON on stdin)

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// evstats - statistics over electric vehicle registrations
#[derive(Parser, Debug)]
#[command(name = "evstats")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./evstats.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory layout
    Init,

    /// Load a registration CSV into the store
    Load {
        /// Path to the CSV file
        csv: PathBuf,
    },

    /// Collection-wide summary statistics
    Summary,

    /// Paginated listing of one county
    County {
        /// County name (case-insensitive)
        name: String,

        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Defaults to `default_page_size` from the configuration
        #[arg(long)]
        page_size: Option<usize>,

        #[arg(long)]
        model_year: Option<i64>,

        /// model_year, make or model
        #[arg(long, default_value = "model_year")]
        sort_by: String,

        /// asc or desc
        #[arg(long, default_value = "asc")]
        sort_order: String,
    },

    /// Per-model breakdown of one make
    Models {
        /// Make name (case-insensitive)
        make: String,
    },

    /// Per-model-year trends
    Trends,

    /// Mean electric range of battery electric vehicles
    BevRange,

    /// Filter, group and rank (request JSON on stdin)
    Analyze,

    /// Run the integrity probes
    Verify,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
