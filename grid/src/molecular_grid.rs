//! Molecular integration grid assembled from patched atomic grids.
//!
//! Point ordering contract: all flattened arrays list the points of atom 0
//! first, then atom 1, and so on; inside one atom the order is the order the
//! atomic grid source produced. `atom_range` and `owner` translate between a
//! flattened index and the owning atom.

extern crate nalgebra as na;

use crate::atom::{check_distinct_positions, Atom};
use crate::atomic_grid::{AtomGridSource, AtomicGrid, RawAtomicGrid};
use crate::basis_set::BasisSet;
use crate::error::{GridError, Result};
use crate::params::GridParams;
use crate::patch::create_patcher;
use crate::point::GridPoint;
use crate::quadrature::ProductGridSource;
use na::{DMatrix, DVector, Vector3};
use rayon::prelude::*;
use std::ops::Range;
use tracing::{debug, info, warn};

#[cfg(test)]
mod tests;

pub struct MolecularGrid {
    atoms: Vec<Atom>,
    params: GridParams,
    atom_grids: Vec<AtomicGrid>,
    // offsets[i]..offsets[i + 1] is the flattened range of atom i
    offsets: Vec<usize>,
    weights: DVector<f64>,
}

impl MolecularGrid {
    /// Build the grid with the default Gauss–Legendre × angular atomic source.
    pub fn new(atoms: Vec<Atom>, params: GridParams) -> Result<Self> {
        Self::with_source(atoms, params, &ProductGridSource)
    }

    /// Build the grid: one raw atomic grid per atom from `source`, one
    /// patching pass over all of them, then the flattened weights.
    pub fn with_source<S: AtomGridSource + ?Sized>(
        atoms: Vec<Atom>,
        params: GridParams,
        source: &S,
    ) -> Result<Self> {
        params.validate()?;
        check_distinct_positions(&atoms)?;

        info!(
            "Building molecular grid: {} atoms, nrad={}, fineness={}, r_max={}, patching={}",
            atoms.len(),
            params.nrad,
            params.fineness,
            params.r_max,
            params.patching
        );

        let raw = atoms
            .iter()
            .enumerate()
            .map(|(i, atom)| {
                let points = source.generate(atom, &params)?;
                debug!(
                    "Atom {} (Z={}): {} raw points",
                    i,
                    atom.atomic_number(),
                    points.len()
                );
                Ok(RawAtomicGrid::new(i, points))
            })
            .collect::<Result<Vec<_>>>()?;

        let atom_grids = create_patcher(&params).patch(&atoms, raw)?;
        for ag in atom_grids.iter().filter(|g| !g.is_empty()) {
            if ag.total_weight() == 0.0 {
                warn!(
                    "Atom {}: all {} points lost their weight in patching",
                    ag.atom(),
                    ag.len()
                );
            }
        }

        let mut offsets = Vec::with_capacity(atom_grids.len() + 1);
        offsets.push(0);
        for grid in &atom_grids {
            offsets.push(offsets[offsets.len() - 1] + grid.len());
        }

        let npts = offsets[offsets.len() - 1];
        let weights = DVector::from_iterator(
            npts,
            atom_grids
                .iter()
                .flat_map(|g| g.points().iter().map(|p| p.weight())),
        );

        info!(
            "Molecular grid ready: {} points, total weight {:.6}",
            npts,
            weights.sum()
        );

        Ok(Self {
            atoms,
            params,
            atom_grids,
            offsets,
            weights,
        })
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn params(&self) -> &GridParams {
        &self.params
    }

    pub fn atom_grids(&self) -> &[AtomicGrid] {
        &self.atom_grids
    }

    /// Total number of points over all atomic grids
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// All points, atom by atom, in source order
    pub fn points(&self) -> impl Iterator<Item = &GridPoint> + '_ {
        self.atom_grids.iter().flat_map(|g| g.points().iter())
    }

    pub fn point(&self, index: usize) -> Option<&GridPoint> {
        let iat = self.owner(index)?;
        self.atom_grids[iat].points().get(index - self.offsets[iat])
    }

    /// Point positions as an `npts x 3` matrix
    pub fn coordinates(&self) -> DMatrix<f64> {
        let mut xyz = DMatrix::<f64>::zeros(self.len(), 3);
        for (k, p) in self.points().enumerate() {
            let r = p.position();
            xyz[(k, 0)] = r.x;
            xyz[(k, 1)] = r.y;
            xyz[(k, 2)] = r.z;
        }
        xyz
    }

    /// Patched quadrature weights, index-aligned with `points`
    pub fn weights(&self) -> &DVector<f64> {
        &self.weights
    }

    /// Flattened index range owned by atom `iat`
    pub fn atom_range(&self, iat: usize) -> Option<Range<usize>> {
        if iat >= self.atom_grids.len() {
            return None;
        }
        Some(self.offsets[iat]..self.offsets[iat + 1])
    }

    /// Atom owning the flattened point `index`
    pub fn owner(&self, index: usize) -> Option<usize> {
        if index >= self.len() {
            return None;
        }
        // last offset <= index; empty atomic grids share an offset with the next atom
        Some(self.offsets.partition_point(|&o| o <= index) - 1)
    }

    /// Evaluate basis-function amplitudes on every point, plus their
    /// gradients when the grid tracks density gradients.
    ///
    /// Every point must receive `basis.nbf()` amplitudes and an `nbf x 3`
    /// gradient matrix; otherwise the grid is left untouched and an
    /// offending point is reported. Any density set earlier is discarded.
    pub fn set_bf_amps<B: BasisSet + Sync + ?Sized>(&mut self, basis: &B) -> Result<()> {
        let with_grads = self.params.track_density_gradient;
        let nbf = basis.nbf();

        let evaluated = self
            .points()
            .collect::<Vec<_>>()
            .into_par_iter()
            .enumerate()
            .map(|(k, p)| evaluate_basis(basis, nbf, with_grads, k, p.position()))
            .collect::<Result<Vec<_>>>()?;

        let points = self
            .atom_grids
            .iter_mut()
            .flat_map(|grid| grid.points.iter_mut());
        for (p, (amps, grads)) in points.zip(evaluated) {
            p.set_bf_amps(amps, grads);
        }
        debug!("Basis amplitudes set ({} functions)", nbf);
        Ok(())
    }

    /// Compute ρ = φᵀ D φ on every point from a total density matrix `D`
    /// (and ∇ρ when gradients are tracked). Requires `set_bf_amps` first.
    pub fn set_density(&mut self, density: &DMatrix<f64>) -> Result<()> {
        let nbf = self.nbf()?;
        if density.nrows() != nbf {
            return Err(GridError::DimensionMismatch {
                expected: nbf,
                found: density.nrows(),
            });
        }
        if density.ncols() != nbf {
            return Err(GridError::DimensionMismatch {
                expected: nbf,
                found: density.ncols(),
            });
        }

        self.atom_grids.par_iter_mut().for_each(|grid| {
            grid.points.par_iter_mut().for_each(|p| {
                p.set_density(density);
            })
        });
        Ok(())
    }

    /// Density at every point
    pub fn density(&self) -> Result<DVector<f64>> {
        let values = self
            .points()
            .map(|p| p.density().ok_or(GridError::NotPopulated("density")))
            .collect::<Result<Vec<_>>>()?;
        Ok(DVector::from_vec(values))
    }

    /// ∇ρ at every point as an `npts x 3` matrix
    pub fn density_gradient(&self) -> Result<DMatrix<f64>> {
        if !self.params.track_density_gradient {
            return Err(GridError::GradientsDisabled);
        }
        let mut grad = DMatrix::<f64>::zeros(self.len(), 3);
        for (k, p) in self.points().enumerate() {
            let g = p
                .density_gradient()
                .ok_or(GridError::NotPopulated("density gradient"))?;
            grad[(k, 0)] = g.x;
            grad[(k, 1)] = g.y;
            grad[(k, 2)] = g.z;
        }
        Ok(grad)
    }

    /// |∇ρ|² at every point
    pub fn gamma(&self) -> Result<DVector<f64>> {
        let grad = self.density_gradient()?;
        Ok(DVector::from_iterator(
            grad.nrows(),
            grad.row_iter().map(|row| row.norm_squared()),
        ))
    }

    /// Number of basis functions cached on the points.
    ///
    /// Every point must carry the same number; a mismatch is an error rather
    /// than something to truncate around.
    pub fn nbf(&self) -> Result<usize> {
        let mut expected = None;
        for (k, p) in self.points().enumerate() {
            let found = p
                .nbf()
                .ok_or(GridError::NotPopulated("basis-function amplitudes"))?;
            match expected {
                None => expected = Some(found),
                Some(n) if n != found => {
                    return Err(GridError::InconsistentBasisCount {
                        point: k,
                        expected: n,
                        found,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(expected.unwrap_or(0))
    }

    /// Basis function `ibf` over the whole grid
    pub fn bf_values(&self, ibf: usize) -> Result<DVector<f64>> {
        let nbf = self.nbf()?;
        if ibf >= nbf {
            return Err(GridError::IndexOutOfRange {
                index: ibf,
                len: nbf,
            });
        }
        Ok(DVector::from_iterator(
            self.len(),
            self.points()
                .map(|p| p.bf_amps().map_or(0.0, |amps| amps[ibf])),
        ))
    }

    /// `npts x nbf` matrix of amplitudes; row k is point k
    pub fn bf_matrix(&self) -> Result<DMatrix<f64>> {
        let nbf = self.nbf()?;
        let mut mat = DMatrix::<f64>::zeros(self.len(), nbf);
        for (k, p) in self.points().enumerate() {
            if let Some(amps) = p.bf_amps() {
                mat.row_mut(k).tr_copy_from(amps);
            }
        }
        Ok(mat)
    }

    /// Basis-function gradients: one `nbf x 3` matrix per point
    pub fn bf_gradients(&self) -> Result<Vec<DMatrix<f64>>> {
        if !self.params.track_density_gradient {
            return Err(GridError::GradientsDisabled);
        }
        let nbf = self.nbf()?;
        self.points()
            .enumerate()
            .map(|(k, p)| {
                let grads = p
                    .bf_grads()
                    .ok_or(GridError::NotPopulated("basis-function gradients"))?;
                check_gradient_shape(grads, nbf, k)?;
                Ok(grads.clone())
            })
            .collect()
    }

    /// Quadrature sum Σ_k w_k f_k for values sampled on the grid points
    pub fn integrate(&self, values: &DVector<f64>) -> Result<f64> {
        if values.len() != self.len() {
            return Err(GridError::DimensionMismatch {
                expected: self.len(),
                found: values.len(),
            });
        }
        Ok(self.weights.dot(values))
    }
}

fn check_gradient_shape(grads: &DMatrix<f64>, nbf: usize, point: usize) -> Result<()> {
    if grads.nrows() != nbf {
        return Err(GridError::InconsistentBasisCount {
            point,
            expected: nbf,
            found: grads.nrows(),
        });
    }
    if grads.ncols() != 3 {
        return Err(GridError::DimensionMismatch {
            expected: 3,
            found: grads.ncols(),
        });
    }
    Ok(())
}

/// Amplitudes (and gradients) of `basis` at one point, shape-checked
fn evaluate_basis<B: BasisSet + ?Sized>(
    basis: &B,
    nbf: usize,
    with_grads: bool,
    point: usize,
    r: &Vector3<f64>,
) -> Result<(DVector<f64>, Option<DMatrix<f64>>)> {
    let amps = basis.values(r);
    if amps.len() != nbf {
        return Err(GridError::InconsistentBasisCount {
            point,
            expected: nbf,
            found: amps.len(),
        });
    }
    if !with_grads {
        return Ok((amps, None));
    }
    let grads = basis.gradients(r);
    check_gradient_shape(&grads, nbf, point)?;
    Ok((amps, Some(grads)))
}
