use super::monomer::{MonomerType, PolymerSlot};
use super::polymer::BioPolymer;
use crate::core::models::chain::ChainType;
use crate::core::models::frame::Frame;
use crate::core::models::ids::ChainId;
use serde::Deserialize;
use tracing::debug;

const WATER_NAMES: [&str; 4] = ["HOH", "WAT", "DOD", "H2O"];

/// Controls how consecutive monomers are chained into polymers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssemblySettings {
    /// When false, consecutive monomers of one type are chained without any
    /// bond or distance test.
    pub check_connections: bool,
    /// Largest CA–CA distance (Å) joining two alpha-carbon residues.
    pub max_alpha_distance: f64,
    /// Largest P–P distance (Å) joining two phosphorus residues.
    pub max_phosphorus_distance: f64,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            check_connections: true,
            max_alpha_distance: 4.2,
            max_phosphorus_distance: 8.0,
        }
    }
}

/// Drops every polymer and all polymer and structure membership.
pub fn detach(frame: &mut Frame) {
    frame.polymers.clear();
    frame.hbonds.clear();
    for group in frame.groups.iter_mut() {
        if let Some(monomer) = group.monomer_mut() {
            monomer.detach();
        }
    }
    for chain in frame.chains.values_mut() {
        chain.polymers.clear();
        chain.chain_type = ChainType::Other;
    }
    for model in frame.models.iter_mut() {
        model.polymers.clear();
    }
}

/// Rebuilds all polymers of the frame.
///
/// Each chain is walked in input order. A polymer starts at the first
/// unowned monomer and grows while the next group is an unowned monomer of
/// the same type that connects to the previous one.
///
/// # Return
///
/// Returns the number of polymers created.
pub fn assemble(frame: &mut Frame, settings: &AssemblySettings) -> usize {
    detach(frame);

    let chain_order: Vec<(usize, ChainId)> = frame
        .models
        .iter()
        .flat_map(|model| model.chains.iter().map(move |&id| (model.index, id)))
        .collect();

    for (model_index, chain_id) in chain_order {
        let Some(chain_groups) = frame.chains.get(chain_id).map(|c| c.groups.clone()) else {
            continue;
        };
        for run in connected_runs(frame, &chain_groups, settings) {
            let Some(monomer_type) = frame.monomer(run[0]).map(|m| m.monomer_type()) else {
                continue;
            };
            let length = run.len();
            let polymer_id =
                frame
                    .polymers
                    .insert(BioPolymer::new(monomer_type, model_index, chain_id, run.clone()));
            for (position, &group_index) in run.iter().enumerate() {
                if let Some(monomer) = frame.groups[group_index].monomer_mut() {
                    monomer.polymer = Some(PolymerSlot {
                        polymer: polymer_id,
                        position,
                    });
                }
            }
            frame.models[model_index].polymers.push(polymer_id);
            if let Some(chain) = frame.chains.get_mut(chain_id) {
                chain.polymers.push(polymer_id);
            }
            debug!(
                model = model_index,
                polymer_type = %monomer_type,
                monomers = length,
                "Assembled polymer."
            );
        }
        let chain_type = classify_chain(frame, chain_id);
        if let Some(chain) = frame.chains.get_mut(chain_id) {
            chain.chain_type = chain_type;
        }
    }
    frame.polymers.len()
}

/// Splits a chain's groups into maximal runs of connected monomers.
fn connected_runs(frame: &Frame, groups: &[usize], settings: &AssemblySettings) -> Vec<Vec<usize>> {
    let store = frame.store();
    let mut runs = Vec::new();
    let mut i = 0;
    while i < groups.len() {
        let Some(start) = frame.monomer(groups[i]).filter(|m| m.polymer().is_none()) else {
            i += 1;
            continue;
        };
        let mut run = vec![groups[i]];
        let mut previous = start;
        let mut j = i + 1;
        while let Some(next) = groups.get(j).and_then(|&g| frame.monomer(g)) {
            let joins = next.polymer().is_none()
                && next.monomer_type() == previous.monomer_type()
                && (!settings.check_connections
                    || next.is_connected_after(previous, store, settings));
            if !joins {
                break;
            }
            run.push(groups[j]);
            previous = next;
            j += 1;
        }
        runs.push(run);
        i = j;
    }
    runs
}

fn classify_chain(frame: &Frame, chain_id: ChainId) -> ChainType {
    let Some(chain) = frame.chains.get(chain_id) else {
        return ChainType::Other;
    };
    let polymers: Vec<&BioPolymer> = chain
        .polymers
        .iter()
        .filter_map(|&id| frame.polymers.get(id))
        .collect();
    if polymers.iter().any(|p| p.is_protein()) {
        return ChainType::Protein;
    }
    if let Some(nucleic) = polymers.iter().find(|p| {
        matches!(
            p.monomer_type(),
            MonomerType::Nucleic | MonomerType::Phosphorus
        )
    }) {
        return if nucleic.is_rna(frame) {
            ChainType::RNA
        } else {
            ChainType::DNA
        };
    }
    if !polymers.is_empty() {
        return ChainType::Carbohydrate;
    }
    let all_water = !chain.groups.is_empty()
        && chain.groups.iter().all(|&g| {
            frame
                .group(g)
                .is_some_and(|group| WATER_NAMES.contains(&group.name.trim()))
        });
    if all_water {
        ChainType::Water
    } else {
        ChainType::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::records::AtomRecord;
    use crate::core::io::traits::RecordSet;
    use crate::core::models::builder::FrameBuilder;
    use nalgebra::Point3;

    fn backbone(set: &mut RecordSet, chain: char, seq: i32, x: f64, first_id: u64) {
        for (k, name) in ["N", "CA", "C", "O"].iter().enumerate() {
            set.push_atom(AtomRecord {
                atom_name: name.to_string(),
                element: name[..1].to_string(),
                chain_id: chain,
                group3: "ALA".into(),
                sequence_number: seq,
                unique_id: first_id + k as u64,
                position: Point3::new(x + k as f64 * 0.9, 0.0, 0.0),
                ..AtomRecord::default()
            });
        }
        set.push_bond(first_id, first_id + 1, 1)
            .push_bond(first_id + 1, first_id + 2, 1)
            .push_bond(first_id + 2, first_id + 3, 2);
    }

    fn peptide(residues: usize, broken_after: Option<usize>) -> RecordSet {
        let mut set = RecordSet::new();
        for r in 0..residues {
            backbone(&mut set, 'A', r as i32 + 1, r as f64 * 3.8, r as u64 * 10);
            if r > 0 && broken_after != Some(r - 1) {
                let prev_c = (r as u64 - 1) * 10 + 2;
                set.push_bond(prev_c, r as u64 * 10, 1);
            }
        }
        set
    }

    #[test]
    fn bonded_backbone_forms_one_polymer() {
        let mut frame = FrameBuilder::new().load(&peptide(5, None)).unwrap();
        assert_eq!(assemble(&mut frame, &AssemblySettings::default()), 1);
        let (id, polymer) = frame.polymers_iter().next().unwrap();
        assert_eq!(polymer.monomer_type(), MonomerType::Amino);
        assert_eq!(polymer.monomer_count(), 5);
        let slot = frame.monomer(3).unwrap().polymer().unwrap();
        assert_eq!(slot.polymer, id);
        assert_eq!(slot.position, 3);

        let chain = frame.find_chain(0, 'A').unwrap();
        assert_eq!(frame.chain(chain).unwrap().chain_type, ChainType::Protein);
    }

    #[test]
    fn missing_peptide_bond_splits_the_chain() {
        let mut frame = FrameBuilder::new().load(&peptide(6, Some(2))).unwrap();
        assert_eq!(assemble(&mut frame, &AssemblySettings::default()), 2);
        let lengths: Vec<_> = frame
            .polymers_in_model(0)
            .map(|(_, p)| p.monomer_count())
            .collect();
        assert_eq!(lengths, vec![3, 3]);
    }

    #[test]
    fn sequential_mode_ignores_missing_bonds() {
        let mut frame = FrameBuilder::new().load(&peptide(6, Some(2))).unwrap();
        let settings = AssemblySettings {
            check_connections: false,
            ..AssemblySettings::default()
        };
        assert_eq!(assemble(&mut frame, &settings), 1);
    }

    #[test]
    fn plain_groups_and_type_changes_end_a_run() {
        let mut set = peptide(2, None);
        set.push_atom(AtomRecord {
            atom_name: "O".into(),
            group3: "HOH".into(),
            sequence_number: 3,
            unique_id: 100,
            ..AtomRecord::default()
        });
        backbone(&mut set, 'A', 4, 20.0, 200);
        let mut frame = FrameBuilder::new().load(&set).unwrap();
        assert_eq!(assemble(&mut frame, &AssemblySettings::default()), 2);
        assert!(frame.group(2).unwrap().monomer().is_none());
    }

    #[test]
    fn reassembly_is_idempotent() {
        let mut frame = FrameBuilder::new().load(&peptide(4, Some(1))).unwrap();
        let settings = AssemblySettings::default();
        assemble(&mut frame, &settings);
        let first: Vec<_> = frame
            .polymers_in_model(0)
            .map(|(_, p)| p.groups().to_vec())
            .collect();
        let stale = frame.model(0).unwrap().polymers()[0];
        assemble(&mut frame, &settings);
        let second: Vec<_> = frame
            .polymers_in_model(0)
            .map(|(_, p)| p.groups().to_vec())
            .collect();
        assert_eq!(first, second);
        assert!(frame.polymer(stale).is_none());
    }

    #[test]
    fn alpha_traces_break_on_long_gaps() {
        let mut set = RecordSet::new();
        for (i, x) in [0.0, 3.8, 7.6, 20.0].iter().enumerate() {
            set.push_atom(AtomRecord {
                atom_name: "CA".into(),
                group3: "GLY".into(),
                sequence_number: i as i32,
                unique_id: i as u64,
                position: Point3::new(*x, 0.0, 0.0),
                ..AtomRecord::default()
            });
        }
        let mut frame = FrameBuilder::new().load(&set).unwrap();
        assert_eq!(assemble(&mut frame, &AssemblySettings::default()), 2);
    }

    #[test]
    fn hydrogen_bond_orders_do_not_link_residues() {
        let mut set = peptide(2, Some(0));
        set.push_bond(2, 10, 1 << 11);
        let mut frame = FrameBuilder::new().load(&set).unwrap();
        assert_eq!(assemble(&mut frame, &AssemblySettings::default()), 2);
    }

    fn single_atom_group(set: &mut RecordSet, atom: &str, group3: &str, seq: i32, x: f64) {
        set.push_atom(AtomRecord {
            atom_name: atom.into(),
            element: atom[..1].to_string(),
            group3: group3.into(),
            sequence_number: seq,
            unique_id: seq as u64,
            position: Point3::new(x, 0.0, 0.0),
            ..AtomRecord::default()
        });
    }

    const NUCLEOTIDE: [&str; 8] = ["P", "O5'", "C5'", "C4'", "C3'", "O3'", "C2'", "C1'"];

    fn dinucleotide(linked: bool) -> RecordSet {
        let mut set = RecordSet::new();
        for r in 0..2u64 {
            for (k, atom) in NUCLEOTIDE.iter().enumerate() {
                set.push_atom(AtomRecord {
                    atom_name: atom.to_string(),
                    element: atom[..1].to_string(),
                    group3: "DA".into(),
                    sequence_number: r as i32 + 1,
                    unique_id: r * 10 + k as u64,
                    position: Point3::new(r as f64 * 6.5 + k as f64 * 0.8, 0.0, 0.0),
                    ..AtomRecord::default()
                });
            }
        }
        if linked {
            set.push_bond(5, 10, 1);
        }
        set
    }

    #[test]
    fn nucleotides_link_through_phosphorus_and_o3_prime() {
        let mut frame = FrameBuilder::new().load(&dinucleotide(true)).unwrap();
        assert_eq!(assemble(&mut frame, &AssemblySettings::default()), 1);
        let (_, polymer) = frame.polymers_iter().next().unwrap();
        assert_eq!(polymer.monomer_type(), MonomerType::Nucleic);
        assert_eq!(polymer.monomer_count(), 2);
        let chain = frame.find_chain(0, 'A').unwrap();
        assert_eq!(frame.chain(chain).unwrap().chain_type, ChainType::DNA);
    }

    #[test]
    fn unlinked_nucleotides_stay_apart() {
        let mut frame = FrameBuilder::new().load(&dinucleotide(false)).unwrap();
        assert_eq!(assemble(&mut frame, &AssemblySettings::default()), 2);
    }

    #[test]
    fn phosphorus_traces_break_on_long_gaps() {
        let mut set = RecordSet::new();
        for (i, x) in [0.0, 6.5, 13.0, 25.0].iter().enumerate() {
            single_atom_group(&mut set, "P", "DC", i as i32, *x);
        }
        let mut frame = FrameBuilder::new().load(&set).unwrap();
        assert_eq!(assemble(&mut frame, &AssemblySettings::default()), 2);
        let lengths: Vec<_> = frame
            .polymers_in_model(0)
            .map(|(_, p)| (p.monomer_type(), p.monomer_count()))
            .collect();
        assert_eq!(
            lengths,
            vec![(MonomerType::Phosphorus, 3), (MonomerType::Phosphorus, 1)]
        );
    }

    #[test]
    fn sugars_link_through_any_covalent_bond() {
        let mut set = RecordSet::new();
        for (seq, name) in ["GLC", "GLC", "GAL"].iter().enumerate() {
            for (k, atom) in ["C1", "O1", "O5"].iter().enumerate() {
                set.push_atom(AtomRecord {
                    atom_name: atom.to_string(),
                    element: atom[..1].to_string(),
                    group3: name.to_string(),
                    sequence_number: seq as i32 + 1,
                    unique_id: seq as u64 * 10 + k as u64,
                    position: Point3::new(seq as f64 * 5.0 + k as f64, 0.0, 0.0),
                    ..AtomRecord::default()
                });
            }
        }
        set.push_bond(1, 10, 1);
        let mut frame = FrameBuilder::new().load(&set).unwrap();
        assert_eq!(assemble(&mut frame, &AssemblySettings::default()), 2);
        let lengths: Vec<_> = frame
            .polymers_in_model(0)
            .map(|(_, p)| (p.monomer_type(), p.monomer_count()))
            .collect();
        assert_eq!(
            lengths,
            vec![(MonomerType::Carbohydrate, 2), (MonomerType::Carbohydrate, 1)]
        );
        let chain = frame.find_chain(0, 'A').unwrap();
        assert_eq!(frame.chain(chain).unwrap().chain_type, ChainType::Carbohydrate);
    }

    #[test]
    fn water_chains_are_classified() {
        let mut set = RecordSet::new();
        for i in 0..3 {
            set.push_atom(AtomRecord {
                atom_name: "O".into(),
                chain_id: 'W',
                group3: "HOH".into(),
                sequence_number: i,
                unique_id: i as u64,
                is_hetero: true,
                ..AtomRecord::default()
            });
        }
        let mut frame = FrameBuilder::new().load(&set).unwrap();
        assemble(&mut frame, &AssemblySettings::default());
        let chain = frame.find_chain(0, 'W').unwrap();
        assert_eq!(frame.chain(chain).unwrap().chain_type, ChainType::Water);
        assert_eq!(frame.polymer_count(), 0);
    }
}
