//! Cell lattice that tags which sites act as sources.
//!
//! Plain records in a flat container, one occupant per site. The field code
//! never sees this type; it only receives the [`Site`] list it produces.

use crate::error::{DiffusionError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Tissue,
    Vessel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Site {
    pub x: usize,
    pub y: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LatticeCell {
    pub x: usize,
    pub y: usize,
    pub kind: CellKind,
}

#[derive(Clone, Debug)]
pub struct Lattice {
    width: usize,
    height: usize,
    cells: Vec<Option<LatticeCell>>,
}

impl Lattice {
    pub fn new(width: usize, height: usize) -> Result<Lattice> {
        if width == 0 || height == 0 {
            return Err(DiffusionError::EmptyGrid);
        }
        Ok(Lattice {
            width,
            height,
            cells: vec![None; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Place a cell at linear index `index`, replacing any occupant.
    pub fn place(&mut self, index: usize, kind: CellKind) -> Result<LatticeCell> {
        let len = self.cells.len();
        let slot = self
            .cells
            .get_mut(index)
            .ok_or(DiffusionError::IndexOutOfRange { index, len })?;
        let cell = LatticeCell {
            x: index % self.width,
            y: index / self.width,
            kind,
        };
        *slot = Some(cell);
        Ok(cell)
    }

    pub fn place_at(&mut self, x: usize, y: usize, kind: CellKind) -> Result<LatticeCell> {
        if x >= self.width || y >= self.height {
            return Err(DiffusionError::OutOfRange {
                x: x as i64,
                y: y as i64,
                width: self.width,
                height: self.height,
            });
        }
        self.place(y * self.width + x, kind)
    }

    pub fn cell(&self, index: usize) -> Option<LatticeCell> {
        self.cells.get(index).copied().flatten()
    }

    pub fn occupied(&self) -> impl Iterator<Item = LatticeCell> + '_ {
        self.cells.iter().filter_map(|c| *c)
    }

    /// Positions of every cell of `kind`, in index order.
    pub fn sites(&self, kind: CellKind) -> Vec<Site> {
        self.occupied()
            .filter(|c| c.kind == kind)
            .map(|c| Site { x: c.x, y: c.y })
            .collect()
    }
}
