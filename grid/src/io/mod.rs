//! Input/Output operations for the grid driver
//!
//! This module handles logging setup and the grid summary written at the end
//! of a run.

mod output;

pub use output::{print_grid_summary, setup_output};
