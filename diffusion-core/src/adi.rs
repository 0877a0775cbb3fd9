//! Alternating-direction implicit diffusion.
//!
//! A full step is two implicit 1D sweeps with half coefficient `α = d / 2`:
//! rows first, then columns. Each line is a tridiagonal system
//!
//! ```text
//! -α v'[i-1] + (1 + 2α) v'[i] - α v'[i+1] = v[i]
//! ```
//!
//! solved with the Thomas algorithm. Zero-flux edges fold the missing
//! neighbour into the diagonal, which becomes `1 + α` at both line ends.

use crate::error::Result;
use crate::field::ScalarField;
use crate::scheme::check_coefficient;

/// Coefficients and elimination scratch for one line length.
#[derive(Clone, Debug)]
pub struct TridiagonalLine {
    sub: Vec<f64>,
    diag: Vec<f64>,
    sup: Vec<f64>,
    c_prime: Vec<f64>,
    d_prime: Vec<f64>,
}

impl TridiagonalLine {
    /// Implicit diffusion operator `(I - α δ²)` on a zero-flux line of length `n`.
    pub fn zero_flux(n: usize, alpha: f64) -> TridiagonalLine {
        let mut sub = vec![0.0; n];
        let mut diag = vec![1.0; n];
        let mut sup = vec![0.0; n];

        for i in 0..n {
            if i > 0 {
                sub[i] = -alpha;
                diag[i] += alpha;
            }
            if i + 1 < n {
                sup[i] = -alpha;
                diag[i] += alpha;
            }
        }

        TridiagonalLine {
            sub,
            diag,
            sup,
            c_prime: vec![0.0; n],
            d_prime: vec![0.0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.diag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diag.is_empty()
    }

    /// Forward elimination then back substitution, `O(n)`.
    ///
    /// The matrix is strictly diagonally dominant for `α >= 0`, so no pivoting.
    pub fn solve(&mut self, rhs: &[f64], out: &mut [f64]) {
        let n = self.len();
        debug_assert_eq!(rhs.len(), n);
        debug_assert_eq!(out.len(), n);
        if n == 0 {
            return;
        }

        self.c_prime[0] = self.sup[0] / self.diag[0];
        self.d_prime[0] = rhs[0] / self.diag[0];
        for i in 1..n {
            let m = self.diag[i] - self.sub[i] * self.c_prime[i - 1];
            self.c_prime[i] = self.sup[i] / m;
            self.d_prime[i] = (rhs[i] - self.sub[i] * self.d_prime[i - 1]) / m;
        }

        out[n - 1] = self.d_prime[n - 1];
        for i in (0..n - 1).rev() {
            out[i] = self.d_prime[i] - self.c_prime[i] * out[i + 1];
        }
    }
}

/// One ADI step. Unconditionally stable for any finite `d >= 0`.
pub fn adi_step(field: &mut ScalarField, d: f64) -> Result<()> {
    check_coefficient(d)?;

    let alpha = 0.5 * d;
    let (w, h) = field.dims();
    let (cur, next) = field.buffers_mut();

    // Row sweep: current -> half
    let mut half = vec![0.0; w * h];
    let mut rows = TridiagonalLine::zero_flux(w, alpha);
    for y in 0..h {
        let span = y * w..(y + 1) * w;
        rows.solve(&cur[span.clone()], &mut half[span]);
    }

    // Column sweep: half -> staging
    let mut cols = TridiagonalLine::zero_flux(h, alpha);
    let mut rhs = vec![0.0; h];
    let mut out = vec![0.0; h];
    for x in 0..w {
        for y in 0..h {
            rhs[y] = half[y * w + x];
        }
        cols.solve(&rhs, &mut out);
        for y in 0..h {
            next[y * w + x] = out[y];
        }
    }

    field.commit();
    Ok(())
}
