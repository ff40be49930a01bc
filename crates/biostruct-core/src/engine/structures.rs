use super::config::StructureSettings;
use super::ramachandran::{find_segments, pair_tags};
use crate::core::bio::monomer::MonomerType;
use crate::core::bio::polymer::BioPolymer;
use crate::core::bio::structure::{ProteinStructure, StructureKind};
use crate::core::io::records::StructureRecord;
use crate::core::models::frame::Frame;
use crate::core::models::ids::PolymerId;
use itertools::Itertools;
use tracing::{debug, instrument, trace};

/// Where the structures of a model came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureSource {
    Computed,
    Declared,
}

/// Assigns secondary structure to every protein polymer of the frame.
///
/// Models with declared structures use them when
/// `prefer_declared_structures` is set; otherwise amino polymers get
/// structures derived from their dihedrals and alpha-carbon polymers get
/// none.
///
/// # Return
///
/// Returns the number of structures assigned.
#[instrument(skip_all, name = "structure_task")]
pub fn assign(frame: &mut Frame, settings: &StructureSettings) -> usize {
    let mut total = 0;
    for model_index in 0..frame.models().len() {
        let source = if settings.prefer_declared_structures
            && frame.models()[model_index].has_declared_structures()
        {
            StructureSource::Declared
        } else {
            StructureSource::Computed
        };
        let declared = ordered_declarations(frame.models()[model_index].declared_structures());

        let polymers: Vec<PolymerId> = frame
            .polymers_in_model(model_index)
            .filter(|(_, p)| p.is_protein())
            .map(|(id, _)| id)
            .collect();
        for polymer_id in polymers {
            let Some(polymer) = frame.polymer(polymer_id) else {
                continue;
            };
            let candidates = match source {
                StructureSource::Declared => declared_structures(frame, polymer, &declared),
                StructureSource::Computed if polymer.monomer_type() == MonomerType::Amino => {
                    computed_structures(frame, polymer, settings)
                }
                StructureSource::Computed => Vec::new(),
            };
            total += apply(frame, polymer_id, candidates);
        }
        debug!(model = model_index, ?source, "Assigned secondary structure.");
    }
    total
}

fn computed_structures(
    frame: &Frame,
    polymer: &BioPolymer,
    settings: &StructureSettings,
) -> Vec<ProteinStructure> {
    let tags = pair_tags(frame, polymer.groups(), settings);
    find_segments(&tags, settings)
        .into_iter()
        .map(|segment| {
            ProteinStructure::new(
                segment.tag.kind(),
                segment.tag.subtype(),
                segment.first,
                segment.last,
            )
        })
        .collect()
}

/// Declarations in application order: turns go last so they win overlaps.
fn ordered_declarations(records: &[StructureRecord]) -> Vec<StructureRecord> {
    let mut ordered = records.to_vec();
    ordered.sort_by_key(|record| record.kind == StructureKind::Turn);
    ordered
}

fn declared_structures(
    frame: &Frame,
    polymer: &BioPolymer,
    records: &[StructureRecord],
) -> Vec<ProteinStructure> {
    let position_of = |chain: char, seqcode| {
        polymer.groups().iter().position(|&g| {
            frame
                .group(g)
                .is_some_and(|group| group.chain_id == chain && group.seqcode == seqcode)
        })
    };
    records
        .iter()
        .filter_map(|record| {
            let first = position_of(record.start_chain, record.start_seqcode)?;
            let last = position_of(record.end_chain, record.end_seqcode)?;
            if first > last {
                trace!(
                    start = %record.start_seqcode,
                    end = %record.end_seqcode,
                    "Skipping reversed structure declaration."
                );
                return None;
            }
            Some(
                ProteinStructure::new(record.kind, record.subtype, first, last)
                    .declared(record.strand_count),
            )
        })
        .collect()
}

/// Installs `candidates` on a polymer in order, later ones taking over the
/// residues they share with earlier ones.
///
/// Every contiguous run of residues a candidate still owns becomes one
/// structure, so a candidate cut in two by a later one yields two pieces.
/// Candidates left with no residues are dropped. Structures are stored in
/// candidate order, then by position.
fn apply(frame: &mut Frame, polymer_id: PolymerId, candidates: Vec<ProteinStructure>) -> usize {
    let Some(polymer) = frame.polymers.get(polymer_id) else {
        return 0;
    };
    let groups = polymer.groups.clone();
    let mut owner: Vec<Option<usize>> = vec![None; groups.len()];
    for (index, structure) in candidates.iter().enumerate() {
        for position in structure.first()..=structure.last().min(groups.len().saturating_sub(1)) {
            owner[position] = Some(index);
        }
    }

    let mut runs: Vec<(usize, usize, usize)> = owner
        .iter()
        .enumerate()
        .chunk_by(|(_, o)| **o)
        .into_iter()
        .filter_map(|(index, run)| {
            let index = index?;
            let positions: Vec<usize> = run.map(|(position, _)| position).collect();
            Some((index, *positions.first()?, *positions.last()?))
        })
        .collect();
    runs.sort_by_key(|&(index, first, _)| (index, first));

    let mut slot_of = vec![None; groups.len()];
    let mut kept = Vec::with_capacity(runs.len());
    for (index, first, last) in runs {
        let mut structure = candidates[index].clone();
        structure.set_span(first, last);
        slot_of[first..=last].fill(Some(kept.len()));
        kept.push(structure);
    }
    if kept.len() > candidates.len() {
        trace!(
            candidates = candidates.len(),
            structures = kept.len(),
            "Split structures interrupted by later ones."
        );
    }

    for (position, &group_index) in groups.iter().enumerate() {
        if let Some(monomer) = frame.groups[group_index].monomer_mut() {
            monomer.structure = slot_of[position];
        }
    }
    let count = kept.len();
    if let Some(polymer) = frame.polymers.get_mut(polymer_id) {
        polymer.structures = kept;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bio::assembler::{AssemblySettings, assemble};
    use crate::core::bio::structure::StructureSubtype;
    use crate::core::io::records::AtomRecord;
    use crate::core::io::traits::RecordSet;
    use crate::core::models::atom::Seqcode;
    use crate::core::models::builder::FrameBuilder;
    use nalgebra::Point3;

    fn alpha_trace(n: usize) -> RecordSet {
        let mut set = RecordSet::new();
        for i in 0..n {
            set.push_atom(AtomRecord {
                atom_name: "CA".into(),
                group3: "ALA".into(),
                sequence_number: i as i32 + 1,
                unique_id: i as u64,
                position: Point3::new(i as f64 * 3.8, 0.0, 0.0),
                ..AtomRecord::default()
            });
        }
        set
    }

    fn declared(kind: StructureKind, start: i32, end: i32) -> StructureRecord {
        StructureRecord::new(kind, 'A', Seqcode::new(start, ' '), Seqcode::new(end, ' '))
    }

    fn built(set: &RecordSet) -> Frame {
        let mut frame = FrameBuilder::new().load(set).unwrap();
        assemble(&mut frame, &AssemblySettings::default());
        frame
    }

    #[test]
    fn alpha_polymers_get_no_computed_structure() {
        let mut frame = built(&alpha_trace(8));
        assert_eq!(assign(&mut frame, &StructureSettings::default()), 0);
    }

    #[test]
    fn turns_win_overlapping_declarations() {
        let mut set = alpha_trace(10);
        set.push_structure(declared(StructureKind::Turn, 4, 6))
            .push_structure(declared(StructureKind::Helix, 1, 5))
            .push_structure(declared(StructureKind::Sheet, 8, 9));
        let mut frame = built(&set);
        assert_eq!(assign(&mut frame, &StructureSettings::default()), 3);

        let (_, polymer) = frame.polymers_in_model(0).next().unwrap();
        let spans: Vec<_> = polymer
            .structures()
            .iter()
            .map(|s| (s.kind(), s.first(), s.last(), s.is_declared()))
            .collect();
        assert_eq!(
            spans,
            vec![
                (StructureKind::Helix, 0, 2, true),
                (StructureKind::Sheet, 7, 8, true),
                (StructureKind::Turn, 3, 5, true),
            ]
        );
        assert_eq!(frame.monomer(3).unwrap().structure(), Some(2));
        assert_eq!(frame.monomer(6).unwrap().structure(), None);
    }

    #[test]
    fn a_turn_inside_a_helix_splits_it() {
        let mut set = alpha_trace(10);
        set.push_structure(declared(StructureKind::Helix, 1, 10))
            .push_structure(declared(StructureKind::Turn, 4, 6));
        let mut frame = built(&set);
        assert_eq!(assign(&mut frame, &StructureSettings::default()), 3);

        let (id, polymer) = frame.polymers_in_model(0).next().unwrap();
        let spans: Vec<_> = polymer
            .structures()
            .iter()
            .map(|s| (s.kind(), s.first(), s.last()))
            .collect();
        assert_eq!(
            spans,
            vec![
                (StructureKind::Helix, 0, 2),
                (StructureKind::Helix, 6, 9),
                (StructureKind::Turn, 3, 5),
            ]
        );
        let owners: Vec<_> = (0..10)
            .map(|g| frame.monomer(g).unwrap().structure())
            .collect();
        assert_eq!(
            owners,
            vec![
                Some(0),
                Some(0),
                Some(0),
                Some(2),
                Some(2),
                Some(2),
                Some(1),
                Some(1),
                Some(1),
                Some(1)
            ]
        );

        let helix_axis = frame.structure_axis(id, 0).unwrap();
        assert!((helix_axis.start.x - 0.0).abs() < 1e-9);
        assert!(helix_axis.end.x <= 3.0 * 3.8 + 1e-9);
    }

    #[test]
    fn fully_covered_structures_are_removed() {
        let mut set = alpha_trace(6);
        set.push_structure(declared(StructureKind::Helix, 2, 3))
            .push_structure(declared(StructureKind::Turn, 1, 5));
        let mut frame = built(&set);
        assert_eq!(assign(&mut frame, &StructureSettings::default()), 1);
        let (_, polymer) = frame.polymers_in_model(0).next().unwrap();
        assert_eq!(polymer.structures()[0].kind(), StructureKind::Turn);
        assert_eq!(frame.monomer(1).unwrap().structure(), Some(0));
    }

    #[test]
    fn declarations_outside_the_polymer_are_ignored() {
        let mut set = alpha_trace(4);
        let mut helix = declared(StructureKind::Helix, 2, 40);
        helix.subtype = StructureSubtype::Alpha;
        set.push_structure(helix)
            .push_structure(declared(StructureKind::Sheet, 3, 2));
        let mut frame = built(&set);
        assert_eq!(assign(&mut frame, &StructureSettings::default()), 0);
    }

    #[test]
    fn declared_structures_can_be_disabled() {
        let mut set = alpha_trace(6);
        set.push_structure(declared(StructureKind::Helix, 1, 5));
        let mut frame = built(&set);
        let settings = StructureSettings {
            prefer_declared_structures: false,
            ..StructureSettings::default()
        };
        assert_eq!(assign(&mut frame, &settings), 0);
    }
}
