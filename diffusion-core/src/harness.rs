//! Lockstep comparison of two diffusion schemes.
//!
//! Two fields start from the same sources. Each step advances lane A and
//! lane B with their own scheme, samples the probe cell of both, and records
//! `error = a - b`.

use tracing::{debug, error, info, warn};

use crate::error::{DiffusionError, Result};
use crate::field::ScalarField;
use crate::lattice::Site;
use crate::scheme::DiffusionScheme;
use crate::source::{SourceMode, seed_sources};

#[derive(Clone, Debug, PartialEq)]
pub struct HarnessConfig {
    pub width: usize,
    pub height: usize,
    pub coefficient: f64,
    pub steps: usize,
    pub concentration: f64,
    /// Linear index of the sampled cell.
    pub probe: usize,
    pub source_mode: SourceMode,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            width: 5,
            height: 5,
            coefficient: 0.025,
            steps: 100,
            concentration: 1.0,
            probe: 1,
            source_mode: SourceMode::Initial,
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DiffusionError::EmptyGrid);
        }
        let len = self.width * self.height;
        if self.probe >= len {
            return Err(DiffusionError::IndexOutOfRange {
                index: self.probe,
                len,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HarnessState {
    Idle,
    Initialized,
    Running { step: usize },
    Done,
    Failed { step: usize },
}

impl HarnessState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HarnessState::Idle => "idle",
            HarnessState::Initialized => "initialized",
            HarnessState::Running { .. } => "running",
            HarnessState::Done => "done",
            HarnessState::Failed { .. } => "failed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    pub step: usize,
    /// Probe value of lane A.
    pub explicit: f64,
    /// Probe value of lane B.
    pub adi: f64,
    pub error: f64,
    pub max_abs_difference: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    pub steps_completed: usize,
    pub final_error: f64,
    pub peak_abs_error: f64,
    pub explicit_mass: f64,
    pub adi_mass: f64,
}

#[derive(Clone, Debug)]
struct Lane {
    scheme: DiffusionScheme,
    field: ScalarField,
}

impl Lane {
    fn advance(&mut self, coefficient: f64, sources: &[Site], config: &HarnessConfig) -> Result<f64> {
        self.scheme.step(&mut self.field, coefficient)?;
        if config.source_mode == SourceMode::Clamped {
            seed_sources(&mut self.field, sources, config.concentration)?;
        }
        self.field.get_index(config.probe)
    }
}

#[derive(Clone, Debug)]
pub struct ComparisonHarness {
    config: HarnessConfig,
    a: Lane,
    b: Lane,
    sources: Vec<Site>,
    state: HarnessState,
    reports: Vec<StepReport>,
    last_error: Option<DiffusionError>,
}

impl ComparisonHarness {
    /// Explicit on lane A, ADI on lane B.
    pub fn new(config: HarnessConfig) -> Result<ComparisonHarness> {
        Self::with_schemes(config, DiffusionScheme::Explicit, DiffusionScheme::Adi)
    }

    pub fn with_schemes(
        config: HarnessConfig,
        scheme_a: DiffusionScheme,
        scheme_b: DiffusionScheme,
    ) -> Result<ComparisonHarness> {
        config.validate()?;
        let a = ScalarField::new(config.width, config.height)?;
        let b = ScalarField::new(config.width, config.height)?;
        Self::from_fields(config, (scheme_a, a), (scheme_b, b))
    }

    /// Build from caller-provided fields. Both must match the configured shape.
    pub fn from_fields(
        config: HarnessConfig,
        (scheme_a, field_a): (DiffusionScheme, ScalarField),
        (scheme_b, field_b): (DiffusionScheme, ScalarField),
    ) -> Result<ComparisonHarness> {
        if field_a.dims() != field_b.dims() {
            return Err(DiffusionError::DimensionMismatch {
                left: field_a.dims(),
                right: field_b.dims(),
            });
        }
        if field_a.dims() != (config.width, config.height) {
            return Err(DiffusionError::DimensionMismatch {
                left: (config.width, config.height),
                right: field_a.dims(),
            });
        }
        config.validate()?;

        Ok(ComparisonHarness {
            config,
            a: Lane {
                scheme: scheme_a,
                field: field_a,
            },
            b: Lane {
                scheme: scheme_b,
                field: field_b,
            },
            sources: Vec::new(),
            state: HarnessState::Idle,
            reports: Vec::new(),
            last_error: None,
        })
    }

    // ---- Accessors ----

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    pub fn reports(&self) -> &[StepReport] {
        &self.reports
    }

    pub fn last_error(&self) -> Option<&DiffusionError> {
        self.last_error.as_ref()
    }

    pub fn field_a(&self) -> &ScalarField {
        &self.a.field
    }

    pub fn field_b(&self) -> &ScalarField {
        &self.b.field
    }

    pub fn schemes(&self) -> (DiffusionScheme, DiffusionScheme) {
        (self.a.scheme, self.b.scheme)
    }

    pub fn sources(&self) -> &[Site] {
        &self.sources
    }

    // ---- Lifecycle ----

    /// Seed both fields from the same sites. `Idle -> Initialized`.
    pub fn initialize(&mut self, sites: &[Site]) -> Result<()> {
        if self.state != HarnessState::Idle {
            return Err(self.transition_error("initialize"));
        }

        seed_sources(&mut self.a.field, sites, self.config.concentration)?;
        seed_sources(&mut self.b.field, sites, self.config.concentration)?;
        self.sources = sites.to_vec();

        for lane in [&self.a, &self.b] {
            if !lane.scheme.is_stable(self.config.coefficient) {
                warn!(
                    scheme = %lane.scheme,
                    coefficient = self.config.coefficient,
                    "coefficient exceeds stability bound; expect divergence"
                );
            }
        }

        info!(
            width = self.config.width,
            height = self.config.height,
            sources = sites.len(),
            coefficient = self.config.coefficient,
            "harness initialized"
        );
        self.state = HarnessState::Initialized;
        Ok(())
    }

    /// Advance both lanes one timestep and report the probe difference.
    pub fn step(&mut self) -> Result<StepReport> {
        let step = match self.state {
            HarnessState::Initialized => 1,
            HarnessState::Running { step } => step + 1,
            _ => return Err(self.transition_error("step")),
        };

        match self.advance(step) {
            Ok(report) => {
                debug!(
                    step,
                    a = report.explicit,
                    b = report.adi,
                    error = report.error,
                    "step"
                );
                self.reports.push(report);
                self.state = if step >= self.config.steps {
                    info!(steps = step, "run complete");
                    HarnessState::Done
                } else {
                    HarnessState::Running { step }
                };
                Ok(report)
            }
            Err(e) => {
                error!(step, error = %e, "run halted");
                self.state = HarnessState::Failed { step };
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    fn advance(&mut self, step: usize) -> Result<StepReport> {
        let coefficient = self.config.coefficient;
        let value_a = self.a.advance(coefficient, &self.sources, &self.config)?;
        let value_b = self.b.advance(coefficient, &self.sources, &self.config)?;
        let max_abs_difference = self.a.field.max_abs_difference(&self.b.field)?;

        Ok(StepReport {
            step,
            explicit: value_a,
            adi: value_b,
            error: value_a - value_b,
            max_abs_difference,
        })
    }

    /// Step until `Done`, or until the first error.
    pub fn run(&mut self) -> Result<&[StepReport]> {
        if self.state == HarnessState::Initialized && self.config.steps == 0 {
            self.state = HarnessState::Done;
        }
        while self.state != HarnessState::Done {
            self.step()?;
        }
        Ok(&self.reports)
    }

    pub fn summary(&self) -> RunSummary {
        let final_error = self.reports.last().map_or(0.0, |r| r.error);
        let peak_abs_error = self
            .reports
            .iter()
            .map(|r| r.error.abs())
            .fold(0.0, f64::max);

        RunSummary {
            steps_completed: self.reports.len(),
            final_error,
            peak_abs_error,
            explicit_mass: self.a.field.total(),
            adi_mass: self.b.field.total(),
        }
    }

    fn transition_error(&self, action: &'static str) -> DiffusionError {
        DiffusionError::InvalidTransition {
            state: self.state.as_str(),
            action,
        }
    }
}
