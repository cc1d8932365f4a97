//! Configuration management for grid construction
//!
//! This module handles the YAML file model and its conversion into the
//! library's `GridParams`. Missing keys are filled once, at conversion.

mod args;

pub use args::Args;

use grid::{GridParams, Patching};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub geometry: Vec<Atom>,
    pub grid: Option<GridSection>,
    pub probe: Option<ProbeParams>,
}

/// Atomic position configuration (bohr)
#[derive(Debug, Deserialize, Serialize)]
pub struct Atom {
    pub element: String,
    pub coords: [f64; 3],
}

/// Grid construction parameters
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GridSection {
    pub nrad: Option<usize>,
    pub fineness: Option<usize>,
    pub r_max: Option<f64>,
    pub patching: Option<Patching>,
    pub heteronuclear_correction: Option<bool>,
    pub track_density_gradient: Option<bool>,
    pub min_partition_denominator: Option<f64>,
}

impl GridSection {
    /// Fill the gaps from `GridParams::default()` and build the typed parameters
    pub fn to_params(&self) -> GridParams {
        let defaults = GridParams::default();
        GridParams {
            nrad: self.nrad.unwrap_or(defaults.nrad),
            fineness: self.fineness.unwrap_or(defaults.fineness),
            r_max: self.r_max.unwrap_or(defaults.r_max),
            patching: self.patching.unwrap_or(defaults.patching),
            heteronuclear_correction: self
                .heteronuclear_correction
                .unwrap_or(defaults.heteronuclear_correction),
            track_density_gradient: self
                .track_density_gradient
                .unwrap_or(defaults.track_density_gradient),
            min_partition_denominator: self
                .min_partition_denominator
                .unwrap_or(defaults.min_partition_denominator),
        }
    }
}

/// Promolecular test density: one normalized s Gaussian squared per atom,
/// weighted by the atomic number
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProbeParams {
    pub enabled: Option<bool>,
    pub exponent: Option<f64>,
}

impl Config {
    /// Exponent of the promolecular check, or `None` when it is switched off
    pub fn probe_exponent(&self) -> Option<f64> {
        let probe = self.probe.as_ref();
        if !probe.and_then(|p| p.enabled).unwrap_or(true) {
            return None;
        }
        Some(probe.and_then(|p| p.exponent).unwrap_or(1.0))
    }

    /// Grid parameters from the file, with command-line overrides applied
    pub fn grid_params(&self, args: &Args) -> GridParams {
        let mut params = self
            .grid
            .as_ref()
            .map(GridSection::to_params)
            .unwrap_or_default();

        if let Some(nrad) = args.nrad {
            params.nrad = nrad;
        }
        if let Some(fineness) = args.fineness {
            params.fineness = fineness;
        }
        if let Some(r_max) = args.r_max {
            params.r_max = r_max;
        }
        if let Some(patching) = args.patching {
            params.patching = patching;
        }
        if args.no_hetero {
            params.heteronuclear_correction = false;
        }
        params
    }
}
