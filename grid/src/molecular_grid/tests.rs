//! Tests for the molecular grid aggregator

use super::MolecularGrid;
use crate::atom::Atom;
use crate::atomic_grid::AtomGridSource;
use crate::basis_set::{BasisFunction, BasisSet, SGaussian};
use crate::error::{GridError, Result};
use crate::params::{GridParams, Patching};
use crate::point::RawPoint;
use nalgebra::{DMatrix, DVector, Vector3};

// Mock implementations for testing

/// Places `atomic_number + 1` points on a line through the atom, weights 1, 2, 3, ...
struct MockSource;

impl AtomGridSource for MockSource {
    fn generate(&self, atom: &Atom, _params: &GridParams) -> Result<Vec<RawPoint>> {
        let n = atom.atomic_number() as usize + 1;
        Ok((0..n)
            .map(|k| {
                let offset = Vector3::new(0.1 * (k as f64 + 1.0), 0.0, 0.0);
                RawPoint::new(atom.position() + offset, (k + 1) as f64)
            })
            .collect())
    }
}

/// Returns one amplitude on the positive x side and two elsewhere
struct RaggedBasis;

impl BasisSet for RaggedBasis {
    fn nbf(&self) -> usize {
        1
    }

    fn values(&self, r: &Vector3<f64>) -> DVector<f64> {
        if r.x > 0.0 {
            DVector::from_element(1, 1.0)
        } else {
            DVector::from_element(2, 1.0)
        }
    }

    fn gradients(&self, r: &Vector3<f64>) -> DMatrix<f64> {
        DMatrix::zeros(self.values(r).len(), 3)
    }
}

/// Two amplitudes with a mis-shaped gradient matrix: `1 x 3` when `ncols`
/// is 3, `2 x ncols` otherwise
struct ShortGradientBasis {
    ncols: usize,
}

impl BasisSet for ShortGradientBasis {
    fn nbf(&self) -> usize {
        2
    }

    fn values(&self, _r: &Vector3<f64>) -> DVector<f64> {
        DVector::from_element(2, 1.0)
    }

    fn gradients(&self, _r: &Vector3<f64>) -> DMatrix<f64> {
        if self.ncols == 3 {
            DMatrix::zeros(1, 3)
        } else {
            DMatrix::zeros(2, self.ncols)
        }
    }
}

fn naive_params() -> GridParams {
    GridParams {
        patching: Patching::Naive,
        ..GridParams::default()
    }
}

fn separated_pair() -> Vec<Atom> {
    // far enough apart that the mock points never cross the Voronoi plane
    vec![
        Atom::new(1, Vector3::new(0.0, 0.0, 0.0)).unwrap(),
        Atom::new(3, Vector3::new(0.0, 0.0, 10.0)).unwrap(),
    ]
}

#[test]
fn test_index_alignment() {
    let grid = MolecularGrid::with_source(separated_pair(), naive_params(), &MockSource).unwrap();

    // H contributes 2 points, Li contributes 4
    assert_eq!(grid.len(), 6);
    assert_eq!(grid.atom_range(0), Some(0..2));
    assert_eq!(grid.atom_range(1), Some(2..6));
    assert_eq!(grid.atom_range(2), None);

    let owners: Vec<_> = (0..grid.len()).map(|k| grid.owner(k).unwrap()).collect();
    assert_eq!(owners, vec![0, 0, 1, 1, 1, 1]);
    assert_eq!(grid.owner(6), None);

    let weights = grid.weights();
    assert_eq!(weights.as_slice(), &[1.0, 2.0, 1.0, 2.0, 3.0, 4.0]);

    let xyz = grid.coordinates();
    assert_eq!(xyz.shape(), (6, 3));
    for (k, p) in grid.points().enumerate() {
        assert_eq!(p.weight(), weights[k]);
        assert_eq!(xyz[(k, 0)], p.position().x);
        assert_eq!(xyz[(k, 2)], p.position().z);
        assert_eq!(grid.point(k).unwrap().position(), p.position());
    }
    assert!(grid.point(6).is_none());

    for (i, ag) in grid.atom_grids().iter().enumerate() {
        assert_eq!(ag.atom(), i);
    }
}

#[test]
fn test_single_atom_keeps_raw_weights() {
    let atom = Atom::new(8, Vector3::new(0.5, -0.2, 0.1)).unwrap();
    let params = GridParams {
        nrad: 10,
        fineness: 2,
        ..GridParams::default()
    };
    let raw = crate::quadrature::ProductGridSource
        .generate(&atom, &params)
        .unwrap();
    let grid = MolecularGrid::new(vec![atom], params).unwrap();

    assert_eq!(grid.len(), raw.len());
    for (rp, w) in raw.iter().zip(grid.weights().iter()) {
        assert_eq!(rp.w, *w);
    }
}

#[test]
fn test_empty_molecule() {
    let grid = MolecularGrid::new(vec![], GridParams::default()).unwrap();
    assert!(grid.is_empty());
    assert_eq!(grid.nbf().unwrap(), 0);
    assert_eq!(grid.integrate(&DVector::zeros(0)).unwrap(), 0.0);
}

#[test]
fn test_queries_before_population_fail() {
    let grid = MolecularGrid::with_source(separated_pair(), naive_params(), &MockSource).unwrap();
    assert!(matches!(grid.nbf(), Err(GridError::NotPopulated(_))));
    assert!(matches!(grid.density(), Err(GridError::NotPopulated(_))));
    assert!(matches!(grid.bf_matrix(), Err(GridError::NotPopulated(_))));
    assert!(matches!(
        grid.density_gradient(),
        Err(GridError::GradientsDisabled)
    ));
    assert!(matches!(grid.gamma(), Err(GridError::GradientsDisabled)));
    assert!(matches!(
        grid.bf_gradients(),
        Err(GridError::GradientsDisabled)
    ));

    let mut grid = grid;
    assert!(matches!(
        grid.set_density(&DMatrix::identity(1, 1)),
        Err(GridError::NotPopulated(_))
    ));
}

#[test]
fn test_inconsistent_basis_count_rejected() {
    let atoms = vec![
        Atom::new(1, Vector3::new(-5.0, 0.0, 0.0)).unwrap(),
        Atom::new(1, Vector3::new(5.0, 0.0, 0.0)).unwrap(),
    ];
    let mut grid = MolecularGrid::with_source(atoms, naive_params(), &MockSource).unwrap();

    // atom 0's points sit at x < 0 and get two amplitudes instead of one
    match grid.set_bf_amps(&RaggedBasis) {
        Err(GridError::InconsistentBasisCount {
            point,
            expected,
            found,
        }) => {
            assert!(point < 2);
            assert_eq!(expected, 1);
            assert_eq!(found, 2);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    // nothing was stored
    assert!(matches!(grid.nbf(), Err(GridError::NotPopulated(_))));
}

#[test]
fn test_short_gradient_matrix_rejected() {
    let params = GridParams {
        track_density_gradient: true,
        ..naive_params()
    };
    let mut grid = MolecularGrid::with_source(separated_pair(), params, &MockSource).unwrap();

    let err = grid.set_bf_amps(&ShortGradientBasis { ncols: 3 }).unwrap_err();
    assert!(matches!(
        err,
        GridError::InconsistentBasisCount {
            expected: 2,
            found: 1,
            ..
        }
    ));

    let err = grid
        .set_bf_amps(&ShortGradientBasis { ncols: 2 })
        .unwrap_err();
    assert!(matches!(
        err,
        GridError::DimensionMismatch {
            expected: 3,
            found: 2
        }
    ));
    assert!(matches!(
        grid.set_density(&DMatrix::identity(2, 2)),
        Err(GridError::NotPopulated(_))
    ));
}

#[test]
fn test_nbf_detects_mixed_point_counts() {
    let atoms = separated_pair();
    let basis = vec![SGaussian::new(1.0, *atoms[0].position())];
    let mut grid = MolecularGrid::with_source(atoms, naive_params(), &MockSource).unwrap();
    grid.set_bf_amps(&basis).unwrap();
    assert_eq!(grid.nbf().unwrap(), 1);

    grid.atom_grids[1].points[0].set_bf_amps(DVector::zeros(3), None);
    assert!(matches!(
        grid.nbf(),
        Err(GridError::InconsistentBasisCount {
            point: 2,
            expected: 1,
            found: 3
        })
    ));
    assert!(grid.bf_matrix().is_err());
}

#[test]
fn test_bf_matrix_and_values() {
    let atoms = separated_pair();
    let basis = vec![
        SGaussian::new(1.0, *atoms[0].position()),
        SGaussian::new(0.4, *atoms[1].position()),
    ];
    let mut grid = MolecularGrid::with_source(atoms, naive_params(), &MockSource).unwrap();
    grid.set_bf_amps(&basis).unwrap();

    assert_eq!(grid.nbf().unwrap(), 2);
    let mat = grid.bf_matrix().unwrap();
    assert_eq!(mat.shape(), (grid.len(), 2));

    let col1 = grid.bf_values(1).unwrap();
    for (k, p) in grid.points().enumerate() {
        assert_eq!(mat[(k, 0)], basis[0].evaluate(p.position()));
        assert_eq!(col1[k], basis[1].evaluate(p.position()));
    }
    assert!(matches!(
        grid.bf_values(2),
        Err(GridError::IndexOutOfRange { index: 2, len: 2 })
    ));
}

#[test]
fn test_density_matrix_dimension_checked() {
    let atoms = separated_pair();
    let basis = vec![SGaussian::new(1.0, *atoms[0].position())];
    let mut grid = MolecularGrid::with_source(atoms, naive_params(), &MockSource).unwrap();
    grid.set_bf_amps(&basis).unwrap();

    assert!(matches!(
        grid.set_density(&DMatrix::identity(2, 2)),
        Err(GridError::DimensionMismatch {
            expected: 1,
            found: 2
        })
    ));
    assert!(matches!(
        grid.set_density(&DMatrix::zeros(1, 3)),
        Err(GridError::DimensionMismatch {
            expected: 1,
            found: 3
        })
    ));
    grid.set_density(&DMatrix::identity(1, 1)).unwrap();
    assert_eq!(grid.density().unwrap().len(), grid.len());
}

#[test]
fn test_density_and_gradient_match_analytic() {
    let center = Vector3::new(0.0, 0.0, 0.3);
    let g = SGaussian::new(0.7, center);
    let atoms = vec![Atom::new(1, center).unwrap()];
    let params = GridParams {
        nrad: 32,
        fineness: 1,
        track_density_gradient: true,
        ..GridParams::default()
    };
    let mut grid = MolecularGrid::new(atoms, params).unwrap();
    grid.set_bf_amps(&vec![g]).unwrap();
    // occupancy 2 in a single orbital
    grid.set_density(&DMatrix::from_element(1, 1, 2.0)).unwrap();

    let rho = grid.density().unwrap();
    let grad = grid.density_gradient().unwrap();
    let gamma = grid.gamma().unwrap();
    assert_eq!(grad.shape(), (grid.len(), 3));

    for (k, p) in grid.points().enumerate() {
        let phi = g.evaluate(p.position());
        let dphi = g.gradient(p.position());
        assert!((rho[k] - 2.0 * phi * phi).abs() < 1e-14);
        for c in 0..3 {
            assert!((grad[(k, c)] - 4.0 * phi * dphi[c]).abs() < 1e-14);
        }
        let expected_gamma = (4.0 * phi * dphi).norm_squared();
        assert!((gamma[k] - expected_gamma).abs() < 1e-12);
    }

    let grads = grid.bf_gradients().unwrap();
    assert_eq!(grads.len(), grid.len());
    assert_eq!(grads[0].shape(), (1, 3));

    // a normalized Gaussian squared integrates to 1 on a single-center grid
    let electrons = grid.integrate(&rho).unwrap();
    assert!((electrons - 2.0).abs() < 1e-8);
}

#[test]
fn test_new_amplitudes_discard_density() {
    let atoms = separated_pair();
    let basis = vec![SGaussian::new(1.0, *atoms[0].position())];
    let mut grid = MolecularGrid::with_source(atoms, naive_params(), &MockSource).unwrap();
    grid.set_bf_amps(&basis).unwrap();
    grid.set_density(&DMatrix::identity(1, 1)).unwrap();
    assert!(grid.density().is_ok());
    grid.set_bf_amps(&basis).unwrap();
    assert!(matches!(grid.density(), Err(GridError::NotPopulated(_))));
}

#[test]
fn test_integrate_length_checked() {
    let grid = MolecularGrid::with_source(separated_pair(), naive_params(), &MockSource).unwrap();
    let ones = DVector::from_element(grid.len(), 1.0);
    assert_eq!(grid.integrate(&ones).unwrap(), grid.weights().sum());
    assert!(matches!(
        grid.integrate(&DVector::zeros(grid.len() + 1)),
        Err(GridError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_construction_errors() {
    let atoms = vec![
        Atom::new(1, Vector3::zeros()).unwrap(),
        Atom::new(1, Vector3::zeros()).unwrap(),
    ];
    for patching in [Patching::Naive, Patching::Becke] {
        let params = GridParams {
            patching,
            ..GridParams::default()
        };
        assert!(matches!(
            MolecularGrid::new(atoms.clone(), params),
            Err(GridError::CoincidentAtoms { .. })
        ));
    }

    let bad = GridParams {
        nrad: 0,
        ..GridParams::default()
    };
    assert!(matches!(
        MolecularGrid::new(separated_pair(), bad),
        Err(GridError::InvalidConfig(_))
    ));
}
