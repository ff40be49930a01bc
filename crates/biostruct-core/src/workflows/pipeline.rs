use crate::core::bio::assembler;
use crate::core::io::traits::ModelAdapter;
use crate::core::models::builder::FrameBuilder;
use crate::core::models::frame::Frame;
use crate::engine::config::Settings;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::{dihedrals, hbonds, structures};
use tracing::{info, instrument};

/// Counts produced by one recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecomputeSummary {
    pub polymers: usize,
    pub residues_with_dihedrals: usize,
    pub structures: usize,
    pub hbonds: usize,
}

/// Builds a frame with the default resolver and derives everything on it.
#[instrument(skip_all, name = "load_workflow")]
pub fn load(
    adapter: &impl ModelAdapter,
    settings: &Settings,
    reporter: &ProgressReporter,
) -> Result<Frame, EngineError> {
    load_with(FrameBuilder::new(), adapter, settings, reporter)
}

/// Like [`load`], with a caller-configured builder.
pub fn load_with(
    builder: FrameBuilder,
    adapter: &impl ModelAdapter,
    settings: &Settings,
    reporter: &ProgressReporter,
) -> Result<Frame, EngineError> {
    settings.validate()?;
    let mut frame = reporter.phase("Build", || builder.load(adapter))?;
    info!(
        atoms = frame.atoms().len(),
        groups = frame.groups().len(),
        models = frame.models().len(),
        "Frame built."
    );
    recompute(&mut frame, settings, reporter)?;
    Ok(frame)
}

/// Rebuilds all derived data of a frame.
///
/// Polymers are detached and reassembled, then dihedrals, secondary
/// structure and hydrogen bonds are computed in that order. Handles to
/// polymers from before the call become invalid.
#[instrument(skip_all, name = "recompute_workflow")]
pub fn recompute(
    frame: &mut Frame,
    settings: &Settings,
    reporter: &ProgressReporter,
) -> Result<RecomputeSummary, EngineError> {
    settings.validate()?;

    let polymers = reporter.phase("Assembly", || {
        assembler::assemble(frame, &settings.assembly)
    });
    check_partition(frame)?;
    let residues_with_dihedrals = reporter.phase("Dihedrals", || dihedrals::compute(frame));
    let structures = reporter.phase("Secondary Structure", || {
        structures::assign(frame, &settings.structure)
    });
    let hbonds = reporter.phase("Hydrogen Bonds", || {
        hbonds::compute(frame, &settings.hbond, reporter)
    });

    let summary = RecomputeSummary {
        polymers,
        residues_with_dihedrals,
        structures,
        hbonds,
    };
    reporter.report(Progress::Message(format!(
        "{} polymer(s), {} structure(s), {} hydrogen bond(s)",
        summary.polymers, summary.structures, summary.hbonds
    )));
    info!(
        polymers = summary.polymers,
        structures = summary.structures,
        hbonds = summary.hbonds,
        "Recompute complete."
    );
    Ok(summary)
}

/// Every polymer member must point back at its polymer and position.
fn check_partition(frame: &Frame) -> Result<(), EngineError> {
    for (id, polymer) in frame.polymers_iter() {
        for (position, &group_index) in polymer.groups().iter().enumerate() {
            let slot = frame
                .monomer(group_index)
                .and_then(|monomer| monomer.polymer());
            if slot.is_none_or(|s| s.polymer != id || s.position != position) {
                return Err(EngineError::Internal(format!(
                    "group {} is not registered at position {} of its polymer",
                    group_index, position
                )));
            }
        }
    }
    Ok(())
}
