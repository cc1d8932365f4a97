extern crate nalgebra as na;

use na::{DMatrix, DVector, Vector3};

/// A quadrature point as produced by an atomic grid source, before any
/// multicenter partitioning has been applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawPoint {
    pub r: Vector3<f64>,
    pub w: f64,
}

impl RawPoint {
    pub fn new(r: Vector3<f64>, w: f64) -> Self {
        Self { r, w }
    }

    /// Consume the raw point, scaling its weight by the partition factor.
    pub(crate) fn patch(self, factor: f64) -> GridPoint {
        GridPoint::new(self.r, self.w * factor)
    }
}

/// A point of a patched atomic grid.
///
/// The position and weight are fixed once patching is done. The remaining
/// fields are filled by `MolecularGrid::set_bf_amps` / `set_density` and stay
/// `None` until then.
#[derive(Clone, Debug)]
pub struct GridPoint {
    r: Vector3<f64>,
    w: f64,
    pub(crate) density: Option<f64>,
    pub(crate) density_gradient: Option<Vector3<f64>>,
    pub(crate) bf_amps: Option<DVector<f64>>,
    // nbf x 3
    pub(crate) bf_grads: Option<DMatrix<f64>>,
}

impl GridPoint {
    fn new(r: Vector3<f64>, w: f64) -> Self {
        Self {
            r,
            w,
            density: None,
            density_gradient: None,
            bf_amps: None,
            bf_grads: None,
        }
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.r
    }

    pub fn weight(&self) -> f64 {
        self.w
    }

    pub fn density(&self) -> Option<f64> {
        self.density
    }

    pub fn density_gradient(&self) -> Option<&Vector3<f64>> {
        self.density_gradient.as_ref()
    }

    /// Reduced density gradient |∇ρ|²
    pub fn gamma(&self) -> Option<f64> {
        self.density_gradient.map(|g| g.norm_squared())
    }

    pub fn bf_amps(&self) -> Option<&DVector<f64>> {
        self.bf_amps.as_ref()
    }

    pub fn bf_grads(&self) -> Option<&DMatrix<f64>> {
        self.bf_grads.as_ref()
    }

    /// Number of basis functions cached on this point, if any.
    pub fn nbf(&self) -> Option<usize> {
        self.bf_amps.as_ref().map(|a| a.len())
    }

    pub(crate) fn set_bf_amps(&mut self, amps: DVector<f64>, grads: Option<DMatrix<f64>>) {
        self.bf_amps = Some(amps);
        self.bf_grads = grads;
        // any density computed from the previous amplitudes is stale now
        self.density = None;
        self.density_gradient = None;
    }

    /// ρ = φᵀ D φ and, when gradients are cached, ∇ρ = gᵀ (D + Dᵀ) φ.
    ///
    /// `density` must be `nbf x nbf`; the caller checks the dimension. It
    /// need not be symmetric: the gradient is taken of the same φᵀ D φ.
    pub(crate) fn set_density(&mut self, density: &DMatrix<f64>) -> bool {
        let phi = match self.bf_amps.as_ref() {
            Some(phi) => phi,
            None => return false,
        };
        let d_phi = density * phi;
        self.density = Some(phi.dot(&d_phi));
        self.density_gradient = self.bf_grads.as_ref().map(|grads| {
            let sym_phi = &d_phi + density.tr_mul(phi);
            let g = grads.tr_mul(&sym_phi);
            Vector3::new(g[0], g[1], g[2])
        });
        true
    }
}
