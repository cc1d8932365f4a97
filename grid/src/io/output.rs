//! Output formatting and logging utilities

use color_eyre::eyre::{Result, WrapErr};
use grid::MolecularGrid;
use periodic_table_on_an_enum::Element;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::time::SystemTime as StdSystemTime;
use tracing::info;
use tracing_subscriber::{
    filter::LevelFilter, fmt::format::Writer, fmt::layer, fmt::time::FormatTime,
    layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

/// Custom time formatter that shows only seconds
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let duration = StdSystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();

        let total_seconds = duration.as_secs();
        write!(
            w,
            "{:02}:{:02}:{:02}",
            (total_seconds / 3600) % 24,
            (total_seconds / 60) % 60,
            total_seconds % 60
        )
    }
}

/// Setup logging to a file or stdout; `verbose` also shows per-atom debug output
pub fn setup_output(output_path: Option<&String>, verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    match output_path {
        Some(path) => {
            let log = File::create(path)
                .wrap_err_with(|| format!("Could not create output file: {}", path))?;
            let file_layer = layer()
                .with_writer(log)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(false)
                .with_filter(level);
            Registry::default().with(file_layer).init();
            info!("Output will be written to: {}", path);
        }
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true)
                .with_filter(level);
            Registry::default().with(stdout_layer).init();
            info!("Output will be printed to stdout");
        }
    }
    Ok(())
}

/// Write a per-atom table of point counts and patched weights
pub fn print_grid_summary<W: Write>(
    writer: &mut W,
    grid: &MolecularGrid,
    elements: &[Element],
) -> Result<()> {
    writeln!(writer, "Molecular grid: {} points", grid.len())?;
    writeln!(
        writer,
        "{:>6} {:>4} {:>10} {:>10} {:>18}",
        "atom", "elem", "points", "zeroed", "weight"
    )?;
    for (ag, elem) in grid.atom_grids().iter().zip(elements.iter()) {
        let zeroed = ag.points().iter().filter(|p| p.weight() == 0.0).count();
        writeln!(
            writer,
            "{:>6} {:>4} {:>10} {:>10} {:>18.10}",
            ag.atom() + 1,
            elem.get_symbol(),
            ag.len(),
            zeroed,
            ag.total_weight()
        )?;
    }
    writeln!(writer, "Total weight: {:.10}", grid.weights().sum())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid::{Atom, GridParams};
    use nalgebra::Vector3;

    #[test]
    fn test_grid_summary_lists_every_atom() {
        let atoms = vec![
            Atom::new(1, Vector3::new(0.0, 0.0, 0.7)).unwrap(),
            Atom::new(1, Vector3::new(0.0, 0.0, -0.7)).unwrap(),
        ];
        let params = GridParams {
            nrad: 6,
            fineness: 0,
            ..GridParams::default()
        };
        let grid = MolecularGrid::new(atoms, params).unwrap();
        let elements = vec![Element::Hydrogen, Element::Hydrogen];

        let mut buf = Vec::new();
        print_grid_summary(&mut buf, &grid, &elements).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("Molecular grid: 72 points"));
        // header, two atoms, total
        assert_eq!(text.lines().count(), 5);
        assert!(text.lines().nth(2).unwrap().contains(" H "));
    }
}
