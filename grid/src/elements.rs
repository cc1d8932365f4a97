//! Static element data used by the grid partition.
//!
//! Only the Bragg–Slater radius is needed here: it biases the Becke cell
//! boundary between unlike atoms. Values are in Angstrom; only ratios enter
//! the partition, so no unit conversion is applied.

use crate::error::{GridError, Result};

/// Bragg–Slater radii (Angstrom) for H through Xe, indexed by atomic number.
/// Noble gases take the usual van der Waals-derived values.
const BRAGG_RADII: [f64; 55] = [
    0.00, // dummy
    0.35, 1.40, // H, He
    1.45, 1.05, 0.85, 0.70, 0.65, 0.60, 0.50, 1.50, // Li - Ne
    1.80, 1.50, 1.25, 1.10, 1.00, 1.00, 1.00, 1.80, // Na - Ar
    2.20, 1.80, // K, Ca
    1.60, 1.40, 1.35, 1.40, 1.40, 1.40, 1.35, 1.35, 1.35, 1.35, // Sc - Zn
    1.30, 1.25, 1.15, 1.15, 1.15, 1.90, // Ga - Kr
    2.35, 2.00, // Rb, Sr
    1.80, 1.55, 1.45, 1.45, 1.35, 1.30, 1.35, 1.40, 1.60, 1.55, // Y - Cd
    1.55, 1.45, 1.45, 1.40, 1.40, 2.10, // In - Xe
];

/// Largest atomic number with tabulated data.
pub const MAX_ATOMIC_NUMBER: u32 = (BRAGG_RADII.len() - 1) as u32;

/// Look up the Bragg radius for an atomic number.
///
/// Atomic numbers outside `1..=MAX_ATOMIC_NUMBER` are rejected; nothing is
/// extrapolated.
pub fn bragg_radius(atomic_number: u32) -> Result<f64> {
    if atomic_number == 0 || atomic_number > MAX_ATOMIC_NUMBER {
        return Err(GridError::UnknownElement(atomic_number));
    }
    Ok(BRAGG_RADII[atomic_number as usize])
}
