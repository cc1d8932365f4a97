//! Error types for molecular grid construction and evaluation

/// Error types for the grid crate
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("No Bragg radius for atomic number {0}")]
    UnknownElement(u32),

    #[error("Invalid element symbol: {0}")]
    UnknownSymbol(String),

    #[error("Invalid grid configuration: {0}")]
    InvalidConfig(String),

    #[error("Atoms {first} and {second} occupy the same position")]
    CoincidentAtoms { first: usize, second: usize },

    #[error("Becke partition denominator vanishes at point {point} of atom {atom}")]
    DegeneratePartition { atom: usize, point: usize },

    #[error("{0} requested before it was set on the grid")]
    NotPopulated(&'static str),

    #[error("Density gradients are not tracked on this grid")]
    GradientsDisabled,

    #[error("Point {point} carries {found} basis functions, expected {expected}")]
    InconsistentBasisCount {
        point: usize,
        expected: usize,
        found: usize,
    },

    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Result type for grid operations
pub type Result<T> = std::result::Result<T, GridError>;
