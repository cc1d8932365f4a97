//! Single-atom product quadrature: Gauss–Legendre radial × symmetric angular rule.
//!
//! The raw weights of one atom sum to the volume of a sphere of radius
//! `r_max`, since the radial rule integrates r² exactly and the angular
//! weights sum to 4π.

extern crate nalgebra as na;

use crate::atom::Atom;
use crate::atomic_grid::AtomGridSource;
use crate::error::{GridError, Result};
use crate::params::GridParams;
use crate::point::RawPoint;
use na::Vector3;
use std::f64::consts::PI;

/// Highest supported `fineness`
pub const MAX_FINENESS: usize = 3;

/// Default atomic grid source: `nrad` Gauss–Legendre shells on `[0, r_max]`
/// times the angular rule selected by `fineness`.
///
/// Points are emitted shell by shell, innermost first, with the angular
/// directions in a fixed order inside every shell.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProductGridSource;

impl AtomGridSource for ProductGridSource {
    fn generate(&self, atom: &Atom, params: &GridParams) -> Result<Vec<RawPoint>> {
        if params.nrad < 2 {
            return Err(GridError::InvalidConfig(format!(
                "nrad must be at least 2, got {}",
                params.nrad
            )));
        }
        let (r_nodes, r_weights) = gauss_legendre(params.nrad, 0.0, params.r_max);
        let ang = angular_rule(params.fineness)?;
        let center = atom.position();

        let mut points = Vec::with_capacity(r_nodes.len() * ang.len());
        for (&r, &wr) in r_nodes.iter().zip(r_weights.iter()) {
            let wr = wr * r * r; // Jacobian r^2
            for &(dir, wang) in &ang {
                points.push(RawPoint::new(center + dir * r, wr * wang));
            }
        }
        Ok(points)
    }
}

/// Angular rule for a given fineness; weights sum to 4π.
///
/// | fineness | points | exact to degree |
/// |----------|--------|-----------------|
/// | 0        | 6      | 3               |
/// | 1        | 14     | 5               |
/// | 2        | 26     | 7               |
/// | 3        | 50     | 11              |
pub fn angular_rule(fineness: usize) -> Result<Vec<(Vector3<f64>, f64)>> {
    let mut rule = Vec::new();
    match fineness {
        0 => {
            push_axes(&mut rule, 1.0 / 6.0);
        }
        1 => {
            push_axes(&mut rule, 1.0 / 15.0);
            push_corners(&mut rule, 3.0 / 40.0);
        }
        2 => {
            push_axes(&mut rule, 1.0 / 21.0);
            push_edges(&mut rule, 4.0 / 105.0);
            push_corners(&mut rule, 27.0 / 840.0);
        }
        3 => {
            // Lebedev–Laikov 50-point rule
            push_axes(&mut rule, 0.126_984_126_984_127_0e-1);
            push_edges(&mut rule, 0.225_749_559_082_892_4e-1);
            push_corners(&mut rule, 0.210_937_500_000_000_0e-1);
            push_llm(&mut rule, 0.301_511_344_577_763_6, 0.201_733_355_379_188_7e-1);
        }
        _ => {
            return Err(GridError::InvalidConfig(format!(
                "fineness must be between 0 and {}, got {}",
                MAX_FINENESS, fineness
            )))
        }
    }
    for (_, w) in rule.iter_mut() {
        *w *= 4.0 * PI;
    }
    Ok(rule)
}

// (±1, 0, 0) and permutations
fn push_axes(rule: &mut Vec<(Vector3<f64>, f64)>, w: f64) {
    for axis in 0..3 {
        for sign in [1.0, -1.0] {
            let mut v = Vector3::zeros();
            v[axis] = sign;
            rule.push((v, w));
        }
    }
}

// (0, ±a, ±a) and permutations, a = 1/√2
fn push_edges(rule: &mut Vec<(Vector3<f64>, f64)>, w: f64) {
    let a = std::f64::consts::FRAC_1_SQRT_2;
    for zero_axis in 0..3 {
        for s1 in [1.0, -1.0] {
            for s2 in [1.0, -1.0] {
                let mut v = Vector3::zeros();
                let (i, j) = ((zero_axis + 1) % 3, (zero_axis + 2) % 3);
                v[i] = s1 * a;
                v[j] = s2 * a;
                rule.push((v, w));
            }
        }
    }
}

// (±b, ±b, ±b), b = 1/√3
fn push_corners(rule: &mut Vec<(Vector3<f64>, f64)>, w: f64) {
    let b = 1.0 / 3.0_f64.sqrt();
    for sx in [1.0, -1.0] {
        for sy in [1.0, -1.0] {
            for sz in [1.0, -1.0] {
                rule.push((Vector3::new(sx * b, sy * b, sz * b), w));
            }
        }
    }
}

// (±l, ±l, ±m) and permutations, m = sqrt(1 - 2 l^2)
fn push_llm(rule: &mut Vec<(Vector3<f64>, f64)>, l: f64, w: f64) {
    let m = (1.0 - 2.0 * l * l).sqrt();
    for m_axis in 0..3 {
        for sx in [1.0, -1.0] {
            for sy in [1.0, -1.0] {
                for sz in [1.0, -1.0] {
                    let signs = [sx, sy, sz];
                    let mut v = Vector3::zeros();
                    for k in 0..3 {
                        v[k] = signs[k] * if k == m_axis { m } else { l };
                    }
                    rule.push((v, w));
                }
            }
        }
    }
}

/// Gauss–Legendre nodes and weights on [a, b].
///
/// Newton iteration on the roots of P_n(x), numerical recipes style.
pub fn gauss_legendre(n: usize, a: f64, b: f64) -> (Vec<f64>, Vec<f64>) {
    debug_assert!(n >= 2);
    let m = (n + 1) / 2;
    let mut x = vec![0.0_f64; n];
    let mut w = vec![0.0_f64; n];

    let eps = 1e-14;
    let nn = n as f64;
    let xm = 0.5 * (b + a);
    let xl = 0.5 * (b - a);
    for i in 0..m {
        let i1 = i as f64 + 1.0;
        let mut z = (PI * (i1 - 0.25) / (nn + 0.5)).cos();
        // capped: the last bit can oscillate
        for _ in 0..100 {
            let (p1, _) = legendre_pn(n, z);
            let pp = legendre_dpn(n, z);
            let z1 = z;
            z = z1 - p1 / pp;
            if (z - z1).abs() < eps {
                break;
            }
        }
        let pp = legendre_dpn(n, z);
        x[i] = xm - xl * z;
        x[n - 1 - i] = xm + xl * z;
        let wi = 2.0 * xl / ((1.0 - z * z) * pp * pp);
        w[i] = wi;
        w[n - 1 - i] = wi;
    }
    (x, w)
}

/// Returns (P_n(z), P_{n-1}(z)).
fn legendre_pn(n: usize, z: f64) -> (f64, f64) {
    let mut p1 = 1.0;
    let mut p2 = 0.0;
    for j in 1..=n {
        let p3 = p2;
        p2 = p1;
        p1 = ((2.0 * j as f64 - 1.0) * z * p2 - (j as f64 - 1.0) * p3) / (j as f64);
    }
    (p1, p2)
}

/// P'_n(z)
fn legendre_dpn(n: usize, z: f64) -> f64 {
    let (p1, p2) = legendre_pn(n, z);
    (n as f64 * (z * p1 - p2)) / (z * z - 1.0)
}
