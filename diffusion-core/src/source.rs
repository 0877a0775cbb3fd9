use crate::error::Result;
use crate::field::ScalarField;
use crate::lattice::Site;

/// How long source sites hold their concentration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceMode {
    /// Written once as the initial condition, then free to diffuse away.
    #[default]
    Initial,
    /// Re-asserted after every step.
    Clamped,
}

/// Stage `concentration` at every site and commit once.
///
/// All sites are bounds-checked before anything is written, so a bad site
/// leaves the field untouched. Non-source cells keep their current value.
pub fn seed_sources(field: &mut ScalarField, sites: &[Site], concentration: f64) -> Result<()> {
    let indices = sites
        .iter()
        .map(|s| field.index_of(s.x as i64, s.y as i64))
        .collect::<Result<Vec<_>>>()?;

    for i in indices {
        field.set_index(i, concentration)?;
    }
    field.commit();
    Ok(())
}
