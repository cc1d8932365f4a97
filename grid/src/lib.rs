// Main library file for multicenter molecular integration grids

pub mod atom;
pub mod atomic_grid;
pub mod basis_set;
pub mod becke;
pub mod elements;
pub mod error;
pub mod molecular_grid;
pub mod params;
pub mod patch;
pub mod point;
pub mod quadrature;

pub use atom::Atom;
pub use atomic_grid::{AtomGridSource, AtomicGrid, RawAtomicGrid};
pub use basis_set::{BasisFunction, BasisSet, SGaussian};
pub use becke::BeckePartition;
pub use error::{GridError, Result};
pub use molecular_grid::MolecularGrid;
pub use params::{GridParams, Patching};
pub use patch::{create_patcher, BeckePatcher, Patcher, VoronoiPatcher};
pub use point::{GridPoint, RawPoint};
pub use quadrature::ProductGridSource;
