//! Forward-Euler (Jacobi) diffusion on the 4-neighbour stencil.

use crate::error::Result;
use crate::field::ScalarField;
use crate::scheme::check_coefficient;

/// Largest coefficient for which the explicit 2D stencil stays bounded.
pub const EXPLICIT_STABILITY_LIMIT: f64 = 0.25;

/// One explicit step: `v' = v + d * lap(v)`, reading only committed values.
///
/// Edges are zero-flux: a neighbour outside the grid counts as the cell
/// itself. Coefficients above [`EXPLICIT_STABILITY_LIMIT`] are applied as
/// given and will blow up.
pub fn explicit_step(field: &mut ScalarField, d: f64) -> Result<()> {
    check_coefficient(d)?;

    let (w, h) = field.dims();
    let (cur, next) = field.buffers_mut();

    for y in 0..h {
        let row = y * w;
        for x in 0..w {
            let i = row + x;
            let u = cur[i];

            let left = if x > 0 { cur[i - 1] } else { u };
            let right = if x + 1 < w { cur[i + 1] } else { u };
            let up = if y > 0 { cur[i - w] } else { u };
            let down = if y + 1 < h { cur[i + w] } else { u };

            let lap = (left + right + up + down) - 4.0 * u;
            next[i] = u + d * lap;
        }
    }

    field.commit();
    Ok(())
}
