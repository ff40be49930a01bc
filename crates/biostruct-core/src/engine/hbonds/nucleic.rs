use super::model_polymers;
use crate::core::bio::monomer::{Monomer, MonomerType};
use crate::core::models::atom::AtomRole;
use crate::core::models::frame::Frame;
use crate::core::models::topology::{HBond, HBondKind};
use crate::core::utils::geometry::{distance_to_plane, plane_normal};
use crate::engine::config::HBondSettings;
use tracing::trace;

/// Purine atom paired with a pyrimidine atom, beyond the N1···N3 bond.
const GUANINE_PAIRS: [(AtomRole, AtomRole); 2] =
    [(AtomRole::N2, AtomRole::O2), (AtomRole::O6, AtomRole::N4)];
const ADENINE_PAIRS: [(AtomRole, AtomRole); 1] = [(AtomRole::N6, AtomRole::O4)];

/// Watson-Crick style base pairs between nucleotides of one model.
///
/// Each purine looks for the closest pyrimidine whose N3 lies near its N1
/// and close to its base plane, skipping pyrimidines stacked on top of it.
/// A pair yields the N1···N3 bond plus the guanine or adenine side bonds
/// whose atoms are present.
pub fn base_pair_hbonds(
    frame: &Frame,
    model_index: usize,
    settings: &HBondSettings,
) -> Vec<HBond> {
    let store = frame.store();
    let pos = |monomer: &Monomer, role: AtomRole| {
        monomer.atom(role).and_then(|i| store.position(i))
    };

    let bases: Vec<(usize, &Monomer)> = model_polymers(frame, model_index, MonomerType::Nucleic)
        .into_iter()
        .flat_map(|polymer| polymer.groups().iter().copied())
        .filter_map(|g| frame.monomer(g).map(|m| (g, m)))
        .collect();

    let mut bonds = Vec::new();
    for &(purine_group, purine) in &bases {
        if !purine.nucleic().is_some_and(|n| n.is_purine()) {
            continue;
        }
        let (Some(n1), Some(n3), Some(n9)) = (
            pos(purine, AtomRole::N1),
            pos(purine, AtomRole::N3),
            pos(purine, AtomRole::N9),
        ) else {
            continue;
        };
        let Some(normal) = plane_normal(&n3, &n1, &n9) else {
            continue;
        };

        let mut closest: Option<(&Monomer, f64)> = None;
        for &(group, candidate) in &bases {
            if group == purine_group || !candidate.nucleic().is_some_and(|n| n.is_pyrimidine()) {
                continue;
            }
            let Some(candidate_n3) = pos(candidate, AtomRole::N3) else {
                continue;
            };
            let distance = (candidate_n3 - n1).norm();
            let off_plane = distance_to_plane(&normal, &n1, &candidate_n3).abs();
            if distance > settings.base_pair_radius || off_plane >= settings.base_plane_tolerance {
                continue;
            }
            let stacked = pos(candidate, AtomRole::N1).is_some_and(|candidate_n1| {
                (n9 - candidate_n1).norm_squared() <= settings.stacking_distance_squared
            });
            if stacked {
                continue;
            }
            if closest.is_none_or(|(_, best)| distance < best) {
                closest = Some((candidate, distance));
            }
        }

        let Some((pyrimidine, _)) = closest else {
            continue;
        };
        let mut pairs = vec![(AtomRole::N1, AtomRole::N3)];
        if purine.atom(AtomRole::O6).is_some() {
            pairs.extend(GUANINE_PAIRS);
        } else if purine.atom(AtomRole::N6).is_some() {
            pairs.extend(ADENINE_PAIRS);
        }
        for (purine_role, pyrimidine_role) in pairs {
            if let (Some(a), Some(b)) = (purine.atom(purine_role), pyrimidine.atom(pyrimidine_role)) {
                trace!(purine = a, pyrimidine = b, "Base pair hydrogen bond.");
                bonds.push(HBond::new(a, b, HBondKind::Nucleotide, 0.0));
            }
        }
    }
    bonds
}
