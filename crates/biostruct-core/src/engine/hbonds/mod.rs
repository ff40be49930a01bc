//! Hydrogen-bond networks derived from geometry.
//!
//! Protein backbones use the electrostatic N-H···O=C model ([`amino`]);
//! nucleic acids use base-plane pairing of purines with pyrimidines
//! ([`nucleic`]). Bonds are gathered per model and stored on the frame,
//! replacing any earlier result.

pub mod amino;
pub mod nucleic;

use super::config::HBondSettings;
use super::progress::{Progress, ProgressReporter};
use crate::core::bio::monomer::MonomerType;
use crate::core::bio::polymer::BioPolymer;
use crate::core::models::frame::Frame;
use crate::core::models::topology::HBond;
use tracing::{debug, instrument};

/// Polymers of one model with the given monomer type, in assembly order.
pub(crate) fn model_polymers(
    frame: &Frame,
    model_index: usize,
    monomer_type: MonomerType,
) -> Vec<&BioPolymer> {
    frame
        .polymers_in_model(model_index)
        .map(|(_, polymer)| polymer)
        .filter(|polymer| polymer.monomer_type() == monomer_type)
        .collect()
}

/// Recomputes the frame's hydrogen bonds.
///
/// Each model is one step of the reported task.
///
/// # Return
///
/// Returns the number of bonds found.
#[instrument(skip_all, name = "hbond_task")]
pub fn compute(frame: &mut Frame, settings: &HBondSettings, reporter: &ProgressReporter) -> usize {
    frame.hbonds.clear();
    if !settings.enabled {
        return 0;
    }
    let model_count = frame.models().len();
    reporter.report(Progress::TaskStart {
        total_steps: model_count as u64,
    });
    let mut bonds: Vec<HBond> = Vec::new();
    for model_index in 0..model_count {
        let backbone = amino::backbone_hbonds(frame, model_index, settings);
        let pairs = if settings.base_pairs {
            nucleic::base_pair_hbonds(frame, model_index, settings)
        } else {
            Vec::new()
        };
        debug!(
            model = model_index,
            backbone = backbone.len(),
            base_pair = pairs.len(),
            "Derived hydrogen bonds."
        );
        bonds.extend(backbone);
        bonds.extend(pairs);
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    let count = bonds.len();
    frame.hbonds = bonds;
    count
}
