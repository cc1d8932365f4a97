//! Per-atom grids, before and after multicenter patching.

extern crate nalgebra as na;

use crate::atom::Atom;
use crate::error::Result;
use crate::params::GridParams;
use crate::point::{GridPoint, RawPoint};
use na::DVector;

/// Produces the raw quadrature points of a single atom.
///
/// Implementations must be deterministic: the same atom and parameters give
/// the same points in the same order.
pub trait AtomGridSource {
    fn generate(&self, atom: &Atom, params: &GridParams) -> Result<Vec<RawPoint>>;
}

/// Raw points of one atom, waiting to be consumed by a patcher.
#[derive(Clone, Debug)]
pub struct RawAtomicGrid {
    pub atom: usize,
    pub points: Vec<RawPoint>,
}

impl RawAtomicGrid {
    pub fn new(atom: usize, points: Vec<RawPoint>) -> Self {
        Self { atom, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of the unpatched weights
    pub fn total_weight(&self) -> f64 {
        self.points.iter().map(|p| p.w).sum()
    }
}

/// Patched points of one atom.
///
/// Only a `Patcher` can build one, so every `AtomicGrid` has been patched
/// exactly once.
#[derive(Clone, Debug)]
pub struct AtomicGrid {
    atom: usize,
    raw_weight: f64,
    pub(crate) points: Vec<GridPoint>,
}

impl AtomicGrid {
    pub(crate) fn new(atom: usize, raw_weight: f64, points: Vec<GridPoint>) -> Self {
        Self {
            atom,
            raw_weight,
            points,
        }
    }

    /// Index of the owning atom in the molecule
    pub fn atom(&self) -> usize {
        self.atom
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    pub fn weights(&self) -> DVector<f64> {
        DVector::from_iterator(self.points.len(), self.points.iter().map(|p| p.weight()))
    }

    pub fn total_weight(&self) -> f64 {
        self.points.iter().map(|p| p.weight()).sum()
    }

    /// Sum of the weights before patching
    pub fn raw_weight(&self) -> f64 {
        self.raw_weight
    }
}
