use super::records::{AtomRecord, BondRecord, StructureRecord};

/// Supplies the records of one input to the frame builder.
///
/// Implementors are file-format readers. Atoms must be yielded grouped by
/// residue; bonds and structures may come in any order.
pub trait ModelAdapter {
    /// Atoms in input order.
    fn atoms(&self) -> impl Iterator<Item = AtomRecord> + '_;

    /// Explicit bonds, referring to atoms by unique id.
    fn bonds(&self) -> impl Iterator<Item = BondRecord> + '_ {
        std::iter::empty()
    }

    /// Declared secondary structure annotations.
    fn structures(&self) -> impl Iterator<Item = StructureRecord> + '_ {
        std::iter::empty()
    }
}

/// In-memory adapter holding already parsed records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    pub atoms: Vec<AtomRecord>,
    pub bonds: Vec<BondRecord>,
    pub structures: Vec<StructureRecord>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_atom(&mut self, atom: AtomRecord) -> &mut Self {
        self.atoms.push(atom);
        self
    }

    pub fn push_bond(&mut self, atom1: u64, atom2: u64, order: i32) -> &mut Self {
        self.bonds.push(BondRecord::new(atom1, atom2, order));
        self
    }

    pub fn push_structure(&mut self, structure: StructureRecord) -> &mut Self {
        self.structures.push(structure);
        self
    }
}

impl ModelAdapter for RecordSet {
    fn atoms(&self) -> impl Iterator<Item = AtomRecord> + '_ {
        self.atoms.iter().cloned()
    }

    fn bonds(&self) -> impl Iterator<Item = BondRecord> + '_ {
        self.bonds.iter().copied()
    }

    fn structures(&self) -> impl Iterator<Item = StructureRecord> + '_ {
        self.structures.iter().cloned()
    }
}
