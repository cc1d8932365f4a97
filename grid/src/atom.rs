extern crate nalgebra as na;

use crate::elements::bragg_radius;
use crate::error::{GridError, Result};
use na::Vector3;
use periodic_table_on_an_enum::Element;

/// A nucleus the molecular grid is built around.
///
/// Positions are in bohr. The Bragg radius is looked up once at construction,
/// so an `Atom` that exists always has a valid reference radius.
#[derive(Clone, Debug, PartialEq)]
pub struct Atom {
    atomic_number: u32,
    position: Vector3<f64>,
    radius: f64,
}

impl Atom {
    pub fn new(atomic_number: u32, position: Vector3<f64>) -> Result<Self> {
        let radius = bragg_radius(atomic_number)?;
        Ok(Self {
            atomic_number,
            position,
            radius,
        })
    }

    pub fn from_element(element: &Element, position: Vector3<f64>) -> Result<Self> {
        Self::new(element.get_atomic_number() as u32, position)
    }

    pub fn from_symbol(symbol: &str, position: Vector3<f64>) -> Result<Self> {
        let element = Element::from_symbol(symbol)
            .ok_or_else(|| GridError::UnknownSymbol(symbol.to_string()))?;
        Self::from_element(&element, position)
    }

    pub fn atomic_number(&self) -> u32 {
        self.atomic_number
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    /// Bragg–Slater radius used by the heteronuclear cell correction
    pub fn bragg_radius(&self) -> f64 {
        self.radius
    }
}

/// Atoms closer than this (bohr) are treated as sitting on the same spot
const COINCIDENT_ATOM_TOLERANCE: f64 = 1e-8;

/// Reject geometries in which two nuclei coincide; the cell partition is
/// undefined for them.
pub fn check_distinct_positions(atoms: &[Atom]) -> Result<()> {
    for i in 0..atoms.len() {
        for j in (i + 1)..atoms.len() {
            if (atoms[i].position() - atoms[j].position()).norm() < COINCIDENT_ATOM_TOLERANCE {
                return Err(GridError::CoincidentAtoms {
                    first: i,
                    second: j,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_from_symbol() {
        let atom = Atom::from_symbol("O", Vector3::new(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(atom.atomic_number(), 8);
        assert_eq!(atom.bragg_radius(), 0.60);
        assert_eq!(atom.position().z, 1.0);
    }

    #[test]
    fn test_atom_from_element_matches_number() {
        let a = Atom::from_element(&Element::Hydrogen, Vector3::zeros()).unwrap();
        let b = Atom::new(1, Vector3::zeros()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unsupported_atomic_number() {
        let err = Atom::new(92, Vector3::zeros()).unwrap_err();
        assert!(matches!(err, GridError::UnknownElement(92)));
    }

    #[test]
    fn test_distinct_positions() {
        let a = Atom::new(1, Vector3::zeros()).unwrap();
        let b = Atom::new(1, Vector3::new(0.0, 0.0, 1.4)).unwrap();
        assert!(check_distinct_positions(&[a.clone(), b.clone()]).is_ok());
        let err = check_distinct_positions(&[a.clone(), b, a]).unwrap_err();
        assert!(matches!(err, GridError::CoincidentAtoms { first: 0, second: 2 }));
    }

    #[test]
    fn test_unknown_symbol() {
        let err = Atom::from_symbol("Qq", Vector3::zeros()).unwrap_err();
        assert!(matches!(err, GridError::UnknownSymbol(_)));
    }
}
