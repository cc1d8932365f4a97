mod geometry;
mod report;

use self::geometry::build_geometry;

use self::report::{report_grid_summary, report_probe};
use crate::config::{Args, Config};
use crate::io::{print_grid_summary, setup_output};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use grid::MolecularGrid;
use std::fs::{self, File};
use tracing::info;

pub struct GridApplication {
    args: Args,
    config: Config,
}

impl GridApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = load_config(&args)?;
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_ref(), self.args.verbose)?;
        info!("Configuration loaded from: {}", self.args.config_file);

        let geometry = build_geometry(&self.config)?;
        let params = self.config.grid_params(&self.args);
        info!("Grid parameters: {:?}", params);

        let mut grid = MolecularGrid::new(geometry.atoms, params)
            .wrap_err("Failed to build the molecular grid")?;
        report_grid_summary(&grid, &geometry.elements);

        if let Some(exponent) = self.config.probe_exponent() {
            report_probe(&mut grid, exponent)?;
        }

        if let Some(ref path) = self.args.summary {
            let mut file = File::create(path)
                .wrap_err_with(|| format!("Unable to create summary file: {}", path))?;
            print_grid_summary(&mut file, &grid, &geometry.elements)?;
            info!("Grid summary written to: {}", path);
        }

        Ok(())
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let config_content = fs::read_to_string(&args.config_file)
        .wrap_err_with(|| format!("Unable to read configuration file: {}", args.config_file))?;

    let config = serde_yml::from_str::<Config>(&config_content)
        .wrap_err("Failed to parse configuration file")?;

    Ok(config)
}
