use rand::Rng;
use rand::seq::SliceRandom;

use diffusion_core::{CellKind, Lattice, Result};

/// Tag each listed linear index as a vessel.
pub fn place_listed(lattice: &mut Lattice, indices: &[usize]) -> Result<()> {
    for &i in indices {
        lattice.place(i, CellKind::Vessel)?;
    }
    Ok(())
}

/// Scatter `count` extra vessels over cells that are not vessels yet.
/// Fewer are placed if the grid runs out of free cells.
pub fn place_random<R: Rng>(rng: &mut R, lattice: &mut Lattice, count: usize) -> Result<usize> {
    let len = lattice.width() * lattice.height();
    let mut free: Vec<usize> = (0..len)
        .filter(|&i| lattice.cell(i).map(|c| c.kind) != Some(CellKind::Vessel))
        .collect();
    free.shuffle(rng);

    let picked = count.min(free.len());
    for &i in &free[..picked] {
        lattice.place(i, CellKind::Vessel)?;
    }
    Ok(picked)
}
