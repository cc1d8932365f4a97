//! Patching schemes that turn overlapping raw atomic grids into one
//! molecular integration rule.
//!
//! A patcher takes ownership of the raw grids and hands back patched ones, so
//! a set of points can never be patched twice.

use crate::atom::Atom;
use crate::atomic_grid::{AtomicGrid, RawAtomicGrid};
use crate::becke::BeckePartition;
use crate::error::{GridError, Result};
use crate::params::{GridParams, Patching};
use rayon::prelude::*;
use tracing::debug;

pub trait Patcher: Send + Sync {
    fn patch(&self, atoms: &[Atom], grids: Vec<RawAtomicGrid>) -> Result<Vec<AtomicGrid>>;
}

/// Create the patcher selected by the grid parameters
pub fn create_patcher(params: &GridParams) -> Box<dyn Patcher> {
    match params.patching {
        Patching::Naive => Box::new(VoronoiPatcher),
        Patching::Becke => Box::new(BeckePatcher::from_params(params)),
    }
}

fn check_owner(atoms: &[Atom], grid: &RawAtomicGrid) -> Result<()> {
    if grid.atom >= atoms.len() {
        return Err(GridError::InvalidConfig(format!(
            "atomic grid refers to atom {} but the molecule has {} atoms",
            grid.atom,
            atoms.len()
        )));
    }
    Ok(())
}

/// Hard cutoff at the Voronoi cell boundary.
///
/// A point strictly closer to a foreign nucleus than to its own gets weight
/// exactly zero; all other points keep their raw weight.
#[derive(Clone, Copy, Debug, Default)]
pub struct VoronoiPatcher;

impl Patcher for VoronoiPatcher {
    fn patch(&self, atoms: &[Atom], grids: Vec<RawAtomicGrid>) -> Result<Vec<AtomicGrid>> {
        grids
            .into_iter()
            .map(|grid| {
                check_owner(atoms, &grid)?;
                let iat = grid.atom;
                let raw_total = grid.total_weight();
                let own = atoms[iat].position();

                let points: Vec<_> = grid
                    .points
                    .into_par_iter()
                    .map(|p| {
                        let rip2 = (p.r - own).norm_squared();
                        let foreign = atoms.iter().enumerate().any(|(jat, atj)| {
                            jat != iat && (p.r - atj.position()).norm_squared() < rip2
                        });
                        p.patch(if foreign { 0.0 } else { 1.0 })
                    })
                    .collect();

                let zeroed = points.iter().filter(|p| p.weight() == 0.0).count();
                debug!(
                    "Voronoi patch atom {}: {} of {} points cut",
                    iat,
                    zeroed,
                    points.len()
                );
                Ok(AtomicGrid::new(iat, raw_total, points))
            })
            .collect()
    }
}

/// Becke's normalized fuzzy-cell weights: w_p ← w_p · P_i(p) / Σ_k P_k(p).
#[derive(Clone, Copy, Debug)]
pub struct BeckePatcher {
    pub heteronuclear_correction: bool,
    pub min_denominator: f64,
}

impl Default for BeckePatcher {
    fn default() -> Self {
        Self::from_params(&GridParams::default())
    }
}

impl BeckePatcher {
    pub fn new(heteronuclear_correction: bool) -> Self {
        Self {
            heteronuclear_correction,
            ..Self::default()
        }
    }

    pub fn from_params(params: &GridParams) -> Self {
        Self {
            heteronuclear_correction: params.heteronuclear_correction,
            min_denominator: params.min_partition_denominator,
        }
    }
}

impl Patcher for BeckePatcher {
    fn patch(&self, atoms: &[Atom], grids: Vec<RawAtomicGrid>) -> Result<Vec<AtomicGrid>> {
        let partition = BeckePartition::new(atoms, self.heteronuclear_correction)?;

        grids
            .into_iter()
            .map(|grid| {
                check_owner(atoms, &grid)?;
                let iat = grid.atom;
                let raw_total = grid.total_weight();

                let points = grid
                    .points
                    .into_par_iter()
                    .enumerate()
                    .map(|(ip, p)| {
                        let cells = partition.cell_functions(&p.r);
                        // P_iat is the same value that enters the sum
                        let denom = cells.sum();
                        if !denom.is_finite() || denom <= self.min_denominator {
                            return Err(GridError::DegeneratePartition {
                                atom: iat,
                                point: ip,
                            });
                        }
                        Ok(p.patch(cells[iat] / denom))
                    })
                    .collect::<Result<Vec<_>>>()?;

                let patched = AtomicGrid::new(iat, raw_total, points);
                debug!(
                    "Becke patch atom {}: weight {:.6} -> {:.6}",
                    iat,
                    raw_total,
                    patched.total_weight()
                );
                Ok(patched)
            })
            .collect()
    }
}
