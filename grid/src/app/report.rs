use color_eyre::eyre::{Result, WrapErr};
use grid::{MolecularGrid, SGaussian};
use nalgebra::{DMatrix, DVector};
use periodic_table_on_an_enum::Element;
use tracing::info;

pub fn report_grid_summary(grid: &MolecularGrid, elements: &[Element]) {
    let params = grid.params();
    info!("\nGrid construction finished.");
    info!(
        "  Patching: {}, heteronuclear correction: {}",
        params.patching, params.heteronuclear_correction
    );

    info!("\nPer-atom grids:");
    let mut raw_sum = 0.0;
    let mut zeroed_sum = 0;
    for (ag, elem) in grid.atom_grids().iter().zip(elements.iter()) {
        let zeroed = ag.points().iter().filter(|p| p.weight() == 0.0).count();
        raw_sum += ag.raw_weight();
        zeroed_sum += zeroed;
        info!(
            "  Atom {:>2} {:>2}: {:>6} points, {:>6} zeroed, raw weight {:.6}, patched weight {:.6}",
            ag.atom() + 1,
            elem.get_symbol(),
            ag.len(),
            zeroed,
            ag.raw_weight(),
            ag.total_weight()
        );
    }

    info!("\nTotal points: {}", grid.len());
    info!("Zero-weight points: {}", zeroed_sum);
    info!("Raw weight sum: {:.6}", raw_sum);
    info!("Patched weight sum: {:.6}", grid.weights().sum());
}

/// Integrate the promolecular density Σ_A Z_A φ_A² of normalized s Gaussians
/// with a shared exponent; the exact answer is Σ_A Z_A.
pub fn report_probe(grid: &mut MolecularGrid, exponent: f64) -> Result<f64> {
    let basis: Vec<SGaussian> = grid
        .atoms()
        .iter()
        .map(|a| SGaussian::new(exponent, *a.position()))
        .collect();
    let charges: Vec<f64> = grid
        .atoms()
        .iter()
        .map(|a| a.atomic_number() as f64)
        .collect();
    let expected: f64 = charges.iter().sum();

    grid.set_bf_amps(&basis)
        .wrap_err("Failed to evaluate the probe basis")?;
    let density = DMatrix::from_diagonal(&DVector::from_vec(charges));
    grid.set_density(&density)
        .wrap_err("Failed to evaluate the probe density")?;
    let rho = grid.density()?;
    let electrons = grid.integrate(&rho)?;

    info!("\nPromolecular probe (exponent {:.4}):", exponent);
    info!("  Expected electrons: {:.6}", expected);
    info!("  Integrated electrons: {:.6}", electrons);
    info!("  Error: {:+.3e}", electrons - expected);
    Ok(electrons)
}
