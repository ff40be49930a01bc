use super::atom::Seqcode;
use super::frame::AtomStore;
use super::ids::ChainId;
use crate::core::bio::monomer::Monomer;
use crate::core::utils::identifiers::one_letter_code;
use std::ops::RangeInclusive;

/// A residue as delimited by the input stream: one contiguous run of atoms
/// sharing model, chain, sequence code and residue name.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Residue name (e.g., "ALA", "DG", "HOH").
    pub name: String,
    pub seqcode: Seqcode,
    pub chain: ChainId,
    pub chain_id: char,
    pub model_index: usize,
    /// Taken from the first atom of the group.
    pub is_hetero: bool,
    pub(crate) first_atom: usize,
    pub(crate) last_atom: usize,
    pub(crate) monomer: Option<Monomer>,
}

impl Group {
    pub(crate) fn new(
        name: &str,
        seqcode: Seqcode,
        chain: ChainId,
        chain_id: char,
        model_index: usize,
        first_atom: usize,
    ) -> Self {
        Self {
            name: name.to_string(),
            seqcode,
            chain,
            chain_id,
            model_index,
            is_hetero: false,
            first_atom,
            last_atom: first_atom,
            monomer: None,
        }
    }

    pub fn first_atom(&self) -> usize {
        self.first_atom
    }

    pub fn last_atom(&self) -> usize {
        self.last_atom
    }

    pub fn atom_range(&self) -> RangeInclusive<usize> {
        self.first_atom..=self.last_atom
    }

    pub fn atom_count(&self) -> usize {
        self.last_atom - self.first_atom + 1
    }

    pub fn residue_number(&self) -> i32 {
        self.seqcode.sequence_number()
    }

    pub fn insertion_code(&self) -> Option<char> {
        self.seqcode.insertion_code()
    }

    /// One-letter residue code, `?` when the name is not a standard residue.
    pub fn group1(&self) -> char {
        one_letter_code(&self.name)
    }

    pub fn monomer(&self) -> Option<&Monomer> {
        self.monomer.as_ref()
    }

    pub(crate) fn monomer_mut(&mut self) -> Option<&mut Monomer> {
        self.monomer.as_mut()
    }

    pub fn is_monomer(&self) -> bool {
        self.monomer.is_some()
    }

    /// Finds an atom of this group by name.
    pub fn atom_index_by_name(&self, store: &AtomStore, name: &str) -> Option<usize> {
        self.atom_range()
            .find(|&index| store.atom(index).is_some_and(|atom| atom.name.trim() == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_chain_id(n: u64) -> ChainId {
        ChainId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn new_group_initializes_fields_correctly() {
        let chain = dummy_chain_id(1);
        let group = Group::new("GLY", Seqcode::new(10, 'B'), chain, 'A', 0, 42);
        assert_eq!(group.name, "GLY");
        assert_eq!(group.chain, chain);
        assert_eq!(group.residue_number(), 10);
        assert_eq!(group.insertion_code(), Some('B'));
        assert_eq!(group.first_atom(), 42);
        assert_eq!(group.last_atom(), 42);
        assert_eq!(group.atom_count(), 1);
        assert!(!group.is_monomer());
    }

    #[test]
    fn atom_range_is_inclusive() {
        let mut group = Group::new("ALA", Seqcode::new(1, ' '), dummy_chain_id(1), 'A', 0, 3);
        group.last_atom = 7;
        assert_eq!(group.atom_range().collect::<Vec<_>>(), vec![3, 4, 5, 6, 7]);
        assert_eq!(group.atom_count(), 5);
    }

    #[test]
    fn group1_maps_residue_names() {
        let chain = dummy_chain_id(1);
        assert_eq!(Group::new("TRP", Seqcode::new(1, ' '), chain, 'A', 0, 0).group1(), 'W');
        assert_eq!(Group::new("HOH", Seqcode::new(1, ' '), chain, 'A', 0, 0).group1(), '?');
    }
}
