//! Molecular Grid Command-Line Interface
//!
//! Builds a Becke or Voronoi patched integration grid for a geometry given in
//! a YAML configuration and reports on it.

use color_eyre::eyre::Result;

mod app;
mod config;
mod io;

use app::GridApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    GridApplication::from_cli()?.run()
}
