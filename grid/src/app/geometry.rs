use crate::config::Config;
use color_eyre::eyre::{eyre, Result, WrapErr};
use grid::Atom;
use nalgebra::Vector3;
use periodic_table_on_an_enum::Element;
use tracing::info;

/// Geometry information (elements and grid atoms) prepared from the user
/// configuration.
pub struct Geometry {
    pub elements: Vec<Element>,
    pub atoms: Vec<Atom>,
}

/// Build the molecular geometry defined in the YAML configuration.
pub fn build_geometry(config: &Config) -> Result<Geometry> {
    info!("Preparing geometry...");

    let mut elements = Vec::with_capacity(config.geometry.len());
    let mut atoms = Vec::with_capacity(config.geometry.len());

    for (i, entry) in config.geometry.iter().enumerate() {
        let element = Element::from_symbol(&entry.element)
            .ok_or_else(|| eyre!("Invalid element symbol: {}", entry.element))?;
        let position = Vector3::new(entry.coords[0], entry.coords[1], entry.coords[2]);
        let atom = Atom::from_element(&element, position)
            .wrap_err_with(|| format!("Unsupported atom {} ({})", i + 1, entry.element))?;
        info!(
            "  Atom {:>2} {:>2}: [{:.6}, {:.6}, {:.6}]",
            i + 1,
            element.get_symbol(),
            position.x,
            position.y,
            position.z
        );
        elements.push(element);
        atoms.push(atom);
    }

    Ok(Geometry { elements, atoms })
}
