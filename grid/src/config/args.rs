//! Command-line argument parsing for grid construction

use clap::Parser;
use grid::Patching;

/// Molecular integration grid with YAML configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config_file: String,

    /// Override number of radial shells per atom
    #[arg(long)]
    pub nrad: Option<usize>,

    /// Override angular fineness (0-3)
    #[arg(long)]
    pub fineness: Option<usize>,

    /// Override outer radius of the atomic grids (bohr)
    #[arg(long)]
    pub r_max: Option<f64>,

    /// Override patching scheme (becke or naive)
    #[arg(long)]
    pub patching: Option<Patching>,

    /// Disable the heteronuclear cell-size correction
    #[arg(long)]
    pub no_hetero: bool,

    /// Override output file: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write a per-atom grid summary table to this file
    #[arg(long)]
    pub summary: Option<String>,

    /// Show per-atom debug output
    #[arg(short, long)]
    pub verbose: bool,
}
