//! Becke's fuzzy-cell partition.
//!
//! A.D. Becke, "A multicenter numerical integration scheme for polyatomic
//! molecules", J. Chem. Phys. 88, 2547 (1988). Equation numbers below refer
//! to that paper.

extern crate nalgebra as na;

use crate::atom::{check_distinct_positions, Atom};
use crate::error::Result;
use na::{DMatrix, DVector, Vector3};

/// Number of smoothing iterations (k = 3 in the paper)
pub const BECKE_ORDER: usize = 3;

/// Elementary smoothing polynomial p(x) = 3x/2 - x³/2, eq. (19)
#[inline]
pub fn pbecke(x: f64) -> f64 {
    1.5 * x - 0.5 * x * x * x
}

/// p applied `n` times, eq. (20)
#[inline]
pub fn fbecke(x: f64, n: usize) -> f64 {
    (0..n).fold(x, |acc, _| pbecke(acc))
}

/// Cell step function s(x) = (1 - f(x)) / 2, eq. (21).
///
/// Goes from 1 at x = -1 to 0 at x = +1 with s(0) = 1/2. Not clamped.
#[inline]
pub fn sbecke(x: f64, n: usize) -> f64 {
    0.5 * (1.0 - fbecke(x, n))
}

/// Size-adjustment coefficient a_ij for a radius ratio chi = R_i / R_j
/// (Appendix A), clamped to [-1/2, 1/2].
pub fn hetero_coefficient(chi: f64) -> f64 {
    let u = (chi - 1.0) / (chi + 1.0);
    let a = u / (u * u - 1.0);
    a.clamp(-0.5, 0.5)
}

/// Un-normalized Becke cell functions P_i(r) = Π_{j≠i} s(mu_ij) for a fixed
/// set of atoms.
///
/// Inverse internuclear distances and the heteronuclear coefficients are
/// computed once; evaluating all cell functions at a point costs O(N²).
pub struct BeckePartition<'a> {
    atoms: &'a [Atom],
    inv_dist: DMatrix<f64>,
    hetero: DMatrix<f64>,
}

impl<'a> BeckePartition<'a> {
    pub fn new(atoms: &'a [Atom], heteronuclear_correction: bool) -> Result<Self> {
        check_distinct_positions(atoms)?;

        let n = atoms.len();
        let mut inv_dist = DMatrix::<f64>::zeros(n, n);
        let mut hetero = DMatrix::<f64>::zeros(n, n);

        for i in 0..n {
            for j in (i + 1)..n {
                let rij = (atoms[i].position() - atoms[j].position()).norm();
                inv_dist[(i, j)] = 1.0 / rij;
                inv_dist[(j, i)] = 1.0 / rij;

                if heteronuclear_correction && atoms[i].atomic_number() != atoms[j].atomic_number()
                {
                    let chi = atoms[i].bragg_radius() / atoms[j].bragg_radius();
                    let a = hetero_coefficient(chi);
                    hetero[(i, j)] = a;
                    hetero[(j, i)] = -a;
                }
            }
        }

        Ok(Self {
            atoms,
            inv_dist,
            hetero,
        })
    }

    /// mu_ij at a point given the distances from the point to atoms i and j,
    /// including the size adjustment nu_ij = mu_ij + a_ij (1 - mu_ij²).
    #[inline]
    fn mu(&self, i: usize, j: usize, ri: f64, rj: f64) -> f64 {
        let mu = (ri - rj) * self.inv_dist[(i, j)];
        let a = self.hetero[(i, j)];
        if a != 0.0 {
            mu + a * (1.0 - mu * mu)
        } else {
            mu
        }
    }

    fn cell_from_distances(&self, i: usize, dist: &[f64]) -> f64 {
        let mut sprod = 1.0;
        for j in 0..dist.len() {
            if j == i {
                continue;
            }
            sprod *= sbecke(self.mu(i, j, dist[i], dist[j]), BECKE_ORDER);
        }
        sprod
    }

    fn distances(&self, r: &Vector3<f64>) -> Vec<f64> {
        self.atoms.iter().map(|a| (r - a.position()).norm()).collect()
    }

    /// P_i(r) for a single target atom
    pub fn cell_function(&self, i: usize, r: &Vector3<f64>) -> f64 {
        self.cell_from_distances(i, &self.distances(r))
    }

    /// P_k(r) for every atom k, in atom order
    pub fn cell_functions(&self, r: &Vector3<f64>) -> DVector<f64> {
        let dist = self.distances(r);
        DVector::from_iterator(
            dist.len(),
            (0..dist.len()).map(|i| self.cell_from_distances(i, &dist)),
        )
    }
}
