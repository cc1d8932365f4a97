//! Basis-function collaborators evaluated on grid points.

extern crate nalgebra as na;

use na::{DMatrix, DVector, Vector3};
use std::f64::consts::PI;

/// A single real basis function
pub trait BasisFunction {
    fn evaluate(&self, r: &Vector3<f64>) -> f64;
    fn gradient(&self, r: &Vector3<f64>) -> Vector3<f64>;
}

/// An ordered set of basis functions evaluated together at a point.
pub trait BasisSet {
    fn nbf(&self) -> usize;

    /// Amplitudes φ_i(r), length `nbf`
    fn values(&self, r: &Vector3<f64>) -> DVector<f64>;

    /// Gradients ∇φ_i(r) as an `nbf x 3` matrix
    fn gradients(&self, r: &Vector3<f64>) -> DMatrix<f64>;
}

impl<F: BasisFunction> BasisSet for Vec<F> {
    fn nbf(&self) -> usize {
        self.len()
    }

    fn values(&self, r: &Vector3<f64>) -> DVector<f64> {
        DVector::from_iterator(self.len(), self.iter().map(|bf| bf.evaluate(r)))
    }

    fn gradients(&self, r: &Vector3<f64>) -> DMatrix<f64> {
        let mut grads = DMatrix::<f64>::zeros(self.len(), 3);
        for (i, bf) in self.iter().enumerate() {
            let g = bf.gradient(r);
            grads[(i, 0)] = g.x;
            grads[(i, 1)] = g.y;
            grads[(i, 2)] = g.z;
        }
        grads
    }
}

/// Normalized s-type Gaussian (2α/π)^(3/4) exp(-α |r - A|²)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SGaussian {
    pub alpha: f64,
    pub center: Vector3<f64>,
    norm: f64,
}

impl SGaussian {
    pub fn new(alpha: f64, center: Vector3<f64>) -> Self {
        let norm = (2.0 * alpha / PI).powf(0.75);
        Self {
            alpha,
            center,
            norm,
        }
    }

    /// Overlap ⟨a|b⟩ of two normalized s Gaussians
    pub fn overlap(a: &Self, b: &Self) -> f64 {
        let p = a.alpha + b.alpha;
        let mu = a.alpha * b.alpha / p;
        let r2 = (a.center - b.center).norm_squared();
        a.norm * b.norm * (PI / p).powf(1.5) * (-mu * r2).exp()
    }
}

impl BasisFunction for SGaussian {
    fn evaluate(&self, r: &Vector3<f64>) -> f64 {
        let d = r - self.center;
        self.norm * (-self.alpha * d.norm_squared()).exp()
    }

    fn gradient(&self, r: &Vector3<f64>) -> Vector3<f64> {
        let d = r - self.center;
        d * (-2.0 * self.alpha * self.evaluate(r))
    }
}
