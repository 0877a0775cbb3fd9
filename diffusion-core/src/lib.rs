//! Scalar diffusion on a 2D lattice with two interchangeable integrators,
//! an explicit 4-point stencil and an ADI scheme, plus a harness that runs
//! them side by side and reports how far apart they drift at a probe cell.

pub mod adi;
pub mod error;
pub mod explicit;
pub mod field;
pub mod harness;
pub mod lattice;
pub mod scheme;
pub mod source;

pub use adi::{TridiagonalLine, adi_step};
pub use error::{DiffusionError, Result};
pub use explicit::{EXPLICIT_STABILITY_LIMIT, explicit_step};
pub use field::ScalarField;
pub use harness::{ComparisonHarness, HarnessConfig, HarnessState, RunSummary, StepReport};
pub use lattice::{CellKind, Lattice, LatticeCell, Site};
pub use scheme::{DiffusionScheme, Nondimensional};
pub use source::{SourceMode, seed_sources};
