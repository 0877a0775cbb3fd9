//! Double-buffered scalar field.
//!
//! Reads always see the `field` buffer. Writes land in the `next` buffer and
//! only become visible after [`ScalarField::commit`], so a stencil never sees
//! a neighbour that was already updated in the same step.

use crate::error::{DiffusionError, Result};

#[derive(Clone, Debug)]
pub struct ScalarField {
    width: usize,
    height: usize,
    field: Vec<f64>,
    next: Vec<f64>,
}

impl ScalarField {
    pub fn new(width: usize, height: usize) -> Result<ScalarField> {
        if width == 0 || height == 0 {
            return Err(DiffusionError::EmptyGrid);
        }
        let size = width * height;

        Ok(ScalarField {
            width,
            height,
            field: vec![0.0; size],
            next: vec![0.0; size],
        })
    }

    // ---- Shape ----

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.field.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field.is_empty()
    }

    pub fn index_of(&self, x: i64, y: i64) -> Result<usize> {
        let in_x = x >= 0 && (x as u64) < self.width as u64;
        let in_y = y >= 0 && (y as u64) < self.height as u64;
        if !(in_x && in_y) {
            return Err(DiffusionError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width + x as usize)
    }

    pub fn coords_of(&self, i: usize) -> Result<(usize, usize)> {
        self.check_index(i)?;
        Ok((i % self.width, i / self.width))
    }

    fn check_index(&self, i: usize) -> Result<()> {
        if i >= self.field.len() {
            return Err(DiffusionError::IndexOutOfRange {
                index: i,
                len: self.field.len(),
            });
        }
        Ok(())
    }

    // ---- Reads (committed snapshot) ----

    pub fn get(&self, x: i64, y: i64) -> Result<f64> {
        let i = self.index_of(x, y)?;
        Ok(self.field[i])
    }

    pub fn get_index(&self, i: usize) -> Result<f64> {
        self.check_index(i)?;
        Ok(self.field[i])
    }

    /// The committed buffer, row-major (`i = y * width + x`).
    pub fn values(&self) -> &[f64] {
        &self.field
    }

    pub fn max(&self) -> f64 {
        self.field.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.field.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Sum over all cells. Conserved by both schemes under zero-flux edges.
    pub fn total(&self) -> f64 {
        self.field.iter().sum()
    }

    pub fn max_abs_difference(&self, other: &ScalarField) -> Result<f64> {
        if self.dims() != other.dims() {
            return Err(DiffusionError::DimensionMismatch {
                left: self.dims(),
                right: other.dims(),
            });
        }
        Ok(self
            .field
            .iter()
            .zip(&other.field)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max))
    }

    // ---- Staged writes ----

    pub fn set(&mut self, x: i64, y: i64, value: f64) -> Result<()> {
        let i = self.index_of(x, y)?;
        self.stage(i, value)
    }

    pub fn set_index(&mut self, i: usize, value: f64) -> Result<()> {
        self.check_index(i)?;
        self.stage(i, value)
    }

    pub fn fill(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(DiffusionError::NonFiniteValue { index: 0, value });
        }
        self.next.fill(value);
        Ok(())
    }

    fn stage(&mut self, i: usize, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(DiffusionError::NonFiniteValue { index: i, value });
        }
        self.next[i] = value;
        Ok(())
    }

    /// Publish the staged buffer. Staging is then re-seeded from the new
    /// current values, so cells a step leaves untouched carry over unchanged.
    pub fn commit(&mut self) {
        std::mem::swap(&mut self.field, &mut self.next);
        self.next.copy_from_slice(&self.field);
    }

    /// Split borrow for stencil kernels: committed values to read, staging to write.
    pub(crate) fn buffers_mut(&mut self) -> (&[f64], &mut [f64]) {
        (&self.field, &mut self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_is_invisible_until_commit() {
        let mut f = ScalarField::new(3, 2).unwrap();
        f.set(2, 1, 4.5).unwrap();
        assert_eq!(f.get(2, 1).unwrap(), 0.0);
        f.commit();
        assert_eq!(f.get(2, 1).unwrap(), 4.5);
        assert_eq!(f.get_index(5).unwrap(), 4.5);
    }

    #[test]
    fn commit_reseeds_staging_from_current() {
        let mut f = ScalarField::new(2, 2).unwrap();
        f.set_index(0, 1.0).unwrap();
        f.commit();
        // A partial write must not zero the other cells on the next commit.
        f.set_index(3, 2.0).unwrap();
        f.commit();
        assert_eq!(f.values(), &[1.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let f = ScalarField::new(5, 5).unwrap();
        assert!(f.get(-1, 0).unwrap_err().is_out_of_range());
        assert!(f.get(5, 0).unwrap_err().is_out_of_range());
        assert!(f.get(0, 5).unwrap_err().is_out_of_range());
        assert_eq!(
            f.get_index(25).unwrap_err(),
            DiffusionError::IndexOutOfRange { index: 25, len: 25 }
        );
    }

    #[test]
    fn non_finite_writes_are_rejected() {
        let mut f = ScalarField::new(2, 2).unwrap();
        assert!(matches!(
            f.set(0, 0, f64::NAN),
            Err(DiffusionError::NonFiniteValue { index: 0, .. })
        ));
        assert!(f.set_index(1, f64::INFINITY).is_err());
        f.commit();
        assert_eq!(f.total(), 0.0);
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert_eq!(ScalarField::new(0, 4).unwrap_err(), DiffusionError::EmptyGrid);
    }

    #[test]
    fn coords_round_trip_through_index() {
        let f = ScalarField::new(4, 3).unwrap();
        let i = f.index_of(3, 2).unwrap();
        assert_eq!(i, 11);
        assert_eq!(f.coords_of(i).unwrap(), (3, 2));
    }

    #[test]
    fn difference_requires_matching_shapes() {
        let a = ScalarField::new(3, 3).unwrap();
        let b = ScalarField::new(3, 4).unwrap();
        assert_eq!(
            a.max_abs_difference(&b).unwrap_err(),
            DiffusionError::DimensionMismatch {
                left: (3, 3),
                right: (3, 4)
            }
        );
    }
}
