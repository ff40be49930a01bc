use super::monomer::{
    AlphaResidue, AminoResidue, CarbohydrateResidue, Monomer, MonomerKind, NucleicResidue,
    PhosphorusResidue,
};
use crate::core::models::atom::AtomRole;
use crate::core::models::frame::AtomStore;
use crate::core::models::group::Group;
use crate::core::utils::identifiers::is_carbohydrate;
use tracing::warn;

const AMINO_MASK: u32 = AtomRole::AmideNitrogen.mask_bit()
    | AtomRole::AlphaCarbon.mask_bit()
    | AtomRole::CarbonylCarbon.mask_bit();
const ALPHA_ONLY_MASK: u32 = AtomRole::AlphaCarbon.mask_bit();
const NUCLEIC_MASK: u32 = AtomRole::O5Prime.mask_bit()
    | AtomRole::C5Prime.mask_bit()
    | AtomRole::C4Prime.mask_bit()
    | AtomRole::C3Prime.mask_bit()
    | AtomRole::O3Prime.mask_bit()
    | AtomRole::C2Prime.mask_bit()
    | AtomRole::C1Prime.mask_bit();
const PHOSPHORUS_ONLY_MASK: u32 = AtomRole::Phosphorus.mask_bit();

/// Reusable per-residue buffer of role offsets.
///
/// One buffer is allocated per build and refilled for every group.
#[derive(Debug, Clone)]
pub struct RoleScratch {
    offsets: [Option<usize>; AtomRole::SLOT_COUNT],
    mask: u32,
}

impl Default for RoleScratch {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleScratch {
    pub fn new() -> Self {
        Self {
            offsets: [None; AtomRole::SLOT_COUNT],
            mask: 0,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.offsets = [None; AtomRole::SLOT_COUNT];
        self.mask = 0;
    }

    pub(crate) fn record(&mut self, role: AtomRole, offset: usize) {
        self.offsets[role.id() as usize] = Some(offset);
        self.mask |= role.mask_bit();
    }

    /// Offset of the `role` atom from the first atom of the scanned group.
    pub fn offset(&self, role: AtomRole) -> Option<usize> {
        self.offsets[role.id() as usize]
    }

    /// Bit mask of the distinguishing roles present in the scanned group.
    pub fn mask(&self) -> u32 {
        self.mask
    }

    /// Refills the buffer from the atoms of `group`.
    ///
    /// Atoms are visited last to first, so when a role name occurs twice the
    /// first-listed atom wins.
    pub fn fill(&mut self, group: &Group, store: &AtomStore) {
        self.clear();
        let first = group.first_atom();
        for index in group.atom_range().rev() {
            if let Some(role) = store.atom(index).and_then(|atom| atom.role) {
                self.record(role, index - first);
            }
        }
    }
}

/// Turns a raw group into a typed monomer.
pub trait GroupResolver {
    fn resolve(&self, group: &Group, store: &AtomStore, scratch: &mut RoleScratch)
    -> Option<Monomer>;
}

/// Classifies groups into the five biological monomer subtypes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BioResolver;

impl GroupResolver for BioResolver {
    fn resolve(
        &self,
        group: &Group,
        store: &AtomStore,
        scratch: &mut RoleScratch,
    ) -> Option<Monomer> {
        classify(group, store, scratch).map(Monomer::new)
    }
}

/// Decides the monomer subtype of `group`, or `None` for a plain group.
///
/// The first matching rule wins: amino backbone, alpha-carbon only, sugar
/// ring, phosphorus only, then the carbohydrate name table.
pub fn classify(group: &Group, store: &AtomStore, scratch: &mut RoleScratch) -> Option<MonomerKind> {
    scratch.fill(group, store);
    let mask = scratch.mask();
    let first = group.first_atom();

    let kind = if mask & AMINO_MASK == AMINO_MASK {
        let amino = sized(group, AminoResidue::from_scratch(first, scratch))?;
        if group.is_hetero && !has_backbone_bonds(&amino, store) {
            return None;
        }
        MonomerKind::Amino(amino)
    } else if mask == ALPHA_ONLY_MASK {
        MonomerKind::Alpha(sized(group, AlphaResidue::from_scratch(first, scratch))?)
    } else if mask & NUCLEIC_MASK == NUCLEIC_MASK {
        MonomerKind::Nucleic(sized(group, NucleicResidue::from_scratch(first, scratch))?)
    } else if mask == PHOSPHORUS_ONLY_MASK {
        MonomerKind::Phosphorus(sized(group, PhosphorusResidue::from_scratch(first, scratch))?)
    } else if is_carbohydrate(&group.name) {
        MonomerKind::Carbohydrate(CarbohydrateResidue::new(first, group.last_atom()))
    } else {
        return None;
    };
    Some(kind)
}

fn sized<T>(group: &Group, payload: Option<T>) -> Option<T> {
    if payload.is_none() {
        warn!(
            residue = %group.name,
            seqcode = %group.seqcode,
            atoms = group.atom_count(),
            "Role atom lies too far from the start of its residue; leaving it unclassified."
        );
    }
    payload
}

/// Hetero residues only count as amino acids when their backbone is actually bonded.
fn has_backbone_bonds(amino: &AminoResidue, store: &AtomStore) -> bool {
    let (Some(n), Some(ca), Some(c)) = (
        amino.nitrogen(),
        amino.alpha_carbon(),
        amino.carbonyl_carbon(),
    ) else {
        return false;
    };
    if !store.is_bonded(n, ca) || !store.is_bonded(ca, c) {
        return false;
    }
    amino
        .carbonyl_oxygen()
        .is_none_or(|o| store.is_bonded(c, o))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bio::monomer::MonomerType;
    use crate::core::io::records::AtomRecord;
    use crate::core::models::builder::FrameBuilder;
    use crate::core::models::frame::Frame;
    use nalgebra::Point3;

    fn record(name: &str, group3: &str, seq: i32, hetero: bool, id: u64) -> AtomRecord {
        AtomRecord {
            atom_name: name.to_string(),
            element: name.chars().next().map(String::from).unwrap_or_default(),
            group3: group3.to_string(),
            sequence_number: seq,
            is_hetero: hetero,
            unique_id: id,
            position: Point3::new(id as f64 * 1.3, 0.0, 0.0),
            ..AtomRecord::default()
        }
    }

    fn frame_of(records: Vec<AtomRecord>, bonds: &[(u64, u64)]) -> Frame {
        let mut builder = FrameBuilder::without_resolver();
        for r in records {
            builder.add_atom(r).unwrap();
        }
        for (a, b) in bonds {
            builder.add_bond_ids(*a, *b, 1);
        }
        builder.build().unwrap()
    }

    fn classify_first(frame: &Frame) -> Option<MonomerType> {
        let mut scratch = RoleScratch::new();
        classify(&frame.groups()[0], frame.store(), &mut scratch).map(|k| k.monomer_type())
    }

    #[test]
    fn backbone_atoms_make_an_amino_residue() {
        let frame = frame_of(
            vec![
                record("N", "ALA", 1, false, 0),
                record("CA", "ALA", 1, false, 1),
                record("C", "ALA", 1, false, 2),
                record("O", "ALA", 1, false, 3),
                record("CB", "ALA", 1, false, 4),
            ],
            &[],
        );
        let mut scratch = RoleScratch::new();
        let kind = classify(&frame.groups()[0], frame.store(), &mut scratch).unwrap();
        let MonomerKind::Amino(amino) = kind else {
            panic!("expected amino, got {:?}", kind.monomer_type());
        };
        assert_eq!(amino.role_offset(AtomRole::AmideNitrogen), Some(0));
        assert_eq!(amino.role_offset(AtomRole::AlphaCarbon), Some(1));
        assert_eq!(amino.role_offset(AtomRole::CarbonylCarbon), Some(2));
        assert_eq!(amino.role_offset(AtomRole::CarbonylOxygen), Some(3));
    }

    #[test]
    fn hetero_residue_without_backbone_bonds_stays_plain() {
        let atoms = vec![
            record("N", "LIG", 1, true, 0),
            record("CA", "LIG", 1, true, 1),
            record("C", "LIG", 1, true, 2),
        ];
        let frame = frame_of(atoms.clone(), &[]);
        assert_eq!(classify_first(&frame), None);

        let bonded = frame_of(atoms, &[(0, 1), (1, 2)]);
        assert_eq!(classify_first(&bonded), Some(MonomerType::Amino));
    }

    #[test]
    fn lone_alpha_carbon_makes_an_alpha_residue() {
        let frame = frame_of(vec![record("CA", "GLY", 1, false, 0)], &[]);
        assert_eq!(classify_first(&frame), Some(MonomerType::Alpha));

        let with_n = frame_of(
            vec![record("N", "GLY", 1, false, 0), record("CA", "GLY", 1, false, 1)],
            &[],
        );
        assert_eq!(classify_first(&with_n), None);
    }

    #[test]
    fn full_sugar_ring_makes_a_nucleic_residue() {
        let names = ["P", "O5'", "C5'", "C4'", "C3'", "O3'", "C2'", "C1'", "N1"];
        let atoms = names
            .iter()
            .enumerate()
            .map(|(i, n)| record(n, "DC", 1, false, i as u64))
            .collect();
        let frame = frame_of(atoms, &[]);
        assert_eq!(classify_first(&frame), Some(MonomerType::Nucleic));
    }

    #[test]
    fn lone_phosphorus_makes_a_phosphorus_residue() {
        let frame = frame_of(vec![record("P", "A", 1, false, 0)], &[]);
        assert_eq!(classify_first(&frame), Some(MonomerType::Phosphorus));
    }

    #[test]
    fn carbohydrate_names_are_recognized_last() {
        let frame = frame_of(
            vec![record("C1", "NAG", 1, true, 0), record("O5", "NAG", 1, true, 1)],
            &[],
        );
        assert_eq!(classify_first(&frame), Some(MonomerType::Carbohydrate));

        let water = frame_of(vec![record("O", "HOH", 1, true, 0)], &[]);
        assert_eq!(classify_first(&water), None);
    }

    #[test]
    fn first_listed_duplicate_role_wins() {
        let frame = frame_of(
            vec![
                record("N", "ALA", 1, false, 0),
                record("CA", "ALA", 1, false, 1),
                record("CA", "ALA", 1, false, 2),
                record("C", "ALA", 1, false, 3),
            ],
            &[],
        );
        let mut scratch = RoleScratch::new();
        scratch.fill(&frame.groups()[0], frame.store());
        assert_eq!(scratch.offset(AtomRole::AlphaCarbon), Some(1));
        assert_eq!(scratch.mask(), AMINO_MASK);
    }
}
