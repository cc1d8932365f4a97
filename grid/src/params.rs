use crate::error::{GridError, Result};
use crate::quadrature::MAX_FINENESS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How overlapping atomic grids are combined
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Patching {
    /// Hard Voronoi cutoff: a point closer to a foreign nucleus gets zero weight
    Naive,
    /// Becke's smooth fuzzy-cell partition
    Becke,
}

impl FromStr for Patching {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "naive" | "voronoi" => Ok(Self::Naive),
            "becke" => Ok(Self::Becke),
            _ => Err(GridError::InvalidConfig(format!(
                "Unknown patching scheme: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for Patching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Patching::Naive => write!(f, "naive"),
            Patching::Becke => write!(f, "becke"),
        }
    }
}

/// Everything needed to build a `MolecularGrid`, fixed for the grid's lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    /// Radial shells per atom
    pub nrad: usize,
    /// Angular rule selector, 0 (coarsest) to `MAX_FINENESS`
    pub fineness: usize,
    /// Outer radius of each atomic grid (bohr)
    pub r_max: f64,
    pub patching: Patching,
    /// Shift Becke cell boundaries by the Bragg radius ratio of unlike atoms
    pub heteronuclear_correction: bool,
    /// Cache basis-function gradients and density gradients on every point
    pub track_density_gradient: bool,
    /// Smallest Becke denominator accepted before the geometry is reported degenerate
    pub min_partition_denominator: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            nrad: 32,
            fineness: 1,
            r_max: 12.0, // bohr
            patching: Patching::Becke,
            heteronuclear_correction: true,
            track_density_gradient: false,
            min_partition_denominator: 1e-300,
        }
    }
}

impl GridParams {
    pub fn validate(&self) -> Result<()> {
        if self.nrad < 2 {
            return Err(GridError::InvalidConfig(format!(
                "nrad must be at least 2, got {}",
                self.nrad
            )));
        }
        if self.fineness > MAX_FINENESS {
            return Err(GridError::InvalidConfig(format!(
                "fineness must be between 0 and {}, got {}",
                MAX_FINENESS, self.fineness
            )));
        }
        if !self.r_max.is_finite() || self.r_max <= 0.0 {
            return Err(GridError::InvalidConfig(format!(
                "r_max must be a positive number, got {}",
                self.r_max
            )));
        }
        if !(self.min_partition_denominator >= 0.0) {
            return Err(GridError::InvalidConfig(format!(
                "min_partition_denominator must be non-negative, got {}",
                self.min_partition_denominator
            )));
        }
        Ok(())
    }
}
