//! # Procedural Layout
//!
//! Pure geometry: turns a list of [`DomeDescriptor`]s into placed domes, hex
//! panels and furnished interiors. Nothing here touches the GPU, so every
//! placement rule can be checked directly in tests.

pub mod descriptor;
pub mod dome;
pub mod hex;
pub mod interior;

pub use descriptor::DomeDescriptor;
pub use dome::{place_domes, PlacedDome};
pub use hex::{latitude_bands, look_at_rotation, tile_hex_panels, HexPanel};
pub use interior::{
    layout_interior, sectors, Chair, Floor, InteriorLayout, Plant, Sector, Table, Wall,
    SECTOR_COUNT, SECTOR_SPAN,
};

use crate::{config::LayoutConfig, error::Result};

/// Everything generated for one dome
#[derive(Debug, Clone, PartialEq)]
pub struct DomeLayout {
    pub dome: PlacedDome,
    pub hex_panels: Vec<HexPanel>,
    pub interior: InteriorLayout,
}

/// Generates the full layout of every dome, in descriptor order
///
/// The first invalid descriptor or infeasible interior aborts generation.
pub fn generate(descriptors: &[DomeDescriptor], config: &LayoutConfig) -> Result<Vec<DomeLayout>> {
    let domes = place_domes(descriptors, config)?;

    let layouts = domes
        .into_iter()
        .map(|dome| {
            let hex_panels = tile_hex_panels(&dome, config);
            let interior = layout_interior(&dome, config)?;
            Ok(DomeLayout {
                dome,
                hex_panels,
                interior,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    log::info!(
        "Generated {} domes: {} hex panels, {} chairs, {} walls",
        layouts.len(),
        layouts.iter().map(|l| l.hex_panels.len()).sum::<usize>(),
        layouts.iter().map(|l| l.interior.chairs.len()).sum::<usize>(),
        layouts.iter().map(|l| l.interior.walls.len()).sum::<usize>(),
    );

    Ok(layouts)
}
