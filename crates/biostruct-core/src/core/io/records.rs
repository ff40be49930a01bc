use crate::core::bio::structure::{StructureKind, StructureSubtype};
use crate::core::models::atom::Seqcode;
use nalgebra::Point3;

/// One atom as produced by a file adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    pub model_index: usize,
    pub element: String,
    pub atomic_number: u8,
    pub atom_name: String,
    pub chain_id: char,
    /// Three-letter residue name.
    pub group3: String,
    pub sequence_number: i32,
    /// Blank or NUL for no insertion code.
    pub insertion_code: char,
    pub position: Point3<f64>,
    pub is_hetero: bool,
    pub serial: i32,
    /// Identifier that bond records refer to.
    pub unique_id: u64,
}

impl Default for AtomRecord {
    fn default() -> Self {
        Self {
            model_index: 0,
            element: String::new(),
            atomic_number: 0,
            atom_name: String::new(),
            chain_id: 'A',
            group3: String::new(),
            sequence_number: 0,
            insertion_code: ' ',
            position: Point3::origin(),
            is_hetero: false,
            serial: 0,
            unique_id: 0,
        }
    }
}

impl AtomRecord {
    pub fn seqcode(&self) -> Seqcode {
        Seqcode::new(self.sequence_number, self.insertion_code)
    }
}

/// A bond between two atoms, identified by their unique ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BondRecord {
    pub atom1: u64,
    pub atom2: u64,
    /// Numeric order, decoded with [`BondOrder::from_code`](crate::core::models::topology::BondOrder::from_code).
    pub order: i32,
}

impl BondRecord {
    pub fn new(atom1: u64, atom2: u64, order: i32) -> Self {
        Self {
            atom1,
            atom2,
            order,
        }
    }
}

/// A secondary structure annotation declared by the input file
/// (`HELIX`, `SHEET` and `TURN` records in PDB terms).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureRecord {
    pub model_index: usize,
    pub kind: StructureKind,
    pub subtype: StructureSubtype,
    pub strand_count: u32,
    pub start_chain: char,
    pub start_seqcode: Seqcode,
    pub end_chain: char,
    pub end_seqcode: Seqcode,
}

impl StructureRecord {
    /// A single-chain annotation covering `start..=end`.
    pub fn new(kind: StructureKind, chain: char, start: Seqcode, end: Seqcode) -> Self {
        Self {
            model_index: 0,
            kind,
            subtype: StructureSubtype::Unspecified,
            strand_count: 0,
            start_chain: chain,
            start_seqcode: start,
            end_chain: chain,
            end_seqcode: end,
        }
    }
}
