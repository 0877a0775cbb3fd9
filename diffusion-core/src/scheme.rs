use std::fmt;

use crate::adi::adi_step;
use crate::error::{DiffusionError, Result};
use crate::explicit::{EXPLICIT_STABILITY_LIMIT, explicit_step};
use crate::field::ScalarField;

/// Integrator used to advance a field by one timestep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiffusionScheme {
    Explicit,
    Adi,
}

impl DiffusionScheme {
    pub fn step(self, field: &mut ScalarField, coefficient: f64) -> Result<()> {
        match self {
            DiffusionScheme::Explicit => explicit_step(field, coefficient),
            DiffusionScheme::Adi => adi_step(field, coefficient),
        }
    }

    /// Whether `coefficient` keeps this scheme bounded.
    pub fn is_stable(self, coefficient: f64) -> bool {
        match self {
            DiffusionScheme::Explicit => coefficient <= EXPLICIT_STABILITY_LIMIT,
            DiffusionScheme::Adi => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DiffusionScheme::Explicit => "explicit",
            DiffusionScheme::Adi => "adi",
        }
    }
}

impl fmt::Display for DiffusionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn check_coefficient(d: f64) -> Result<()> {
    if !d.is_finite() || d < 0.0 {
        return Err(DiffusionError::InvalidCoefficient(d));
    }
    Ok(())
}

/// Physical parameters folded into the dimensionless coefficient `D`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nondimensional {
    pub diffusivity: f64,
    pub timestep: f64,
    pub spacing: f64,
}

impl Nondimensional {
    /// `D = diffusivity * dt / dx²`
    pub fn coefficient(&self) -> f64 {
        self.diffusivity * self.timestep / (self.spacing * self.spacing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn scenario_coefficient() {
        let p = Nondimensional {
            diffusivity: 1e-2,
            timestep: 0.1,
            spacing: 0.2,
        };
        assert_relative_eq!(p.coefficient(), 0.025, epsilon = 1e-15);
    }

    #[test]
    fn both_schemes_reject_nan() {
        let mut f = ScalarField::new(2, 2).unwrap();
        for scheme in [DiffusionScheme::Explicit, DiffusionScheme::Adi] {
            assert!(matches!(
                scheme.step(&mut f, f64::NAN),
                Err(DiffusionError::InvalidCoefficient(_))
            ));
        }
    }

    #[test]
    fn stability_bounds() {
        assert!(DiffusionScheme::Explicit.is_stable(0.25));
        assert!(!DiffusionScheme::Explicit.is_stable(0.26));
        assert!(DiffusionScheme::Adi.is_stable(1e6));
    }
}
