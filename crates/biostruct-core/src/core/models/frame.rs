use super::atom::Atom;
use super::chain::Chain;
use super::group::Group;
use super::ids::{ChainId, PolymerId};
use super::model::{Model, ModelSummary};
use super::topology::{Bond, BondOrder, HBond};
use crate::core::bio::monomer::Monomer;
use crate::core::bio::polymer::BioPolymer;
use crate::core::bio::structure::{Axis, ProteinStructure};
use nalgebra::Point3;
use slotmap::SlotMap;
use std::collections::HashMap;

/// Atoms, covalent bonds and bond adjacency of a frame.
///
/// Split from [`Frame`] so that passes can read atoms while mutating groups
/// and polymers.
#[derive(Debug, Clone, Default)]
pub struct AtomStore {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    /// Cached adjacency list for bond connectivity, indexed by atom index.
    bond_adjacency: Vec<Vec<usize>>,
    /// Client-supplied unique ids, used to resolve bond records.
    unique_ids: HashMap<u64, usize>,
}

impl AtomStore {
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn position(&self, index: usize) -> Option<Point3<f64>> {
        self.atoms.get(index).map(|atom| atom.position)
    }

    pub fn distance(&self, a: usize, b: usize) -> Option<f64> {
        Some(nalgebra::distance(&self.position(a)?, &self.position(b)?))
    }

    /// Atoms directly bonded to `index`; empty for unknown indices.
    pub fn bonded_neighbors(&self, index: usize) -> &[usize] {
        self.bond_adjacency
            .get(index)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_bonded(&self, a: usize, b: usize) -> bool {
        self.bonded_neighbors(a).contains(&b)
    }

    /// Atom index registered for a client unique id.
    pub fn index_of_unique_id(&self, unique_id: u64) -> Option<usize> {
        self.unique_ids.get(&unique_id).copied()
    }

    /// Appends an atom and returns its index.
    ///
    /// A repeated unique id is re-pointed at the newest atom.
    pub(crate) fn push_atom(&mut self, atom: Atom, unique_id: u64) -> (usize, bool) {
        let index = self.atoms.len();
        self.atoms.push(atom);
        self.bond_adjacency.push(Vec::new());
        let replaced = self.unique_ids.insert(unique_id, index).is_some();
        (index, replaced)
    }

    /// Adds a bond between two atoms.
    ///
    /// Only covalent bonds enter the adjacency list; hydrogen-bond orders are
    /// recorded on the atoms but never count as connectivity.
    ///
    /// # Return
    ///
    /// Returns `Some(index)` of the new or already existing bond, or `None`
    /// if either atom does not exist or both ends are the same atom.
    pub(crate) fn add_bond(&mut self, atom1: usize, atom2: usize, order: BondOrder) -> Option<usize> {
        if atom1 == atom2 || atom1 >= self.atoms.len() || atom2 >= self.atoms.len() {
            return None;
        }
        let existing = self.atoms[atom1]
            .bonds
            .iter()
            .copied()
            .find(|&b| self.bonds[b].contains(atom2));
        if existing.is_some() {
            return existing;
        }

        let bond_index = self.bonds.len();
        self.bonds.push(Bond::new(atom1, atom2, order));
        if order.is_covalent() {
            self.bond_adjacency[atom1].push(atom2);
            self.bond_adjacency[atom2].push(atom1);
        }
        self.atoms[atom1].bonds.push(bond_index);
        self.atoms[atom2].bonds.push(bond_index);
        Some(bond_index)
    }

    pub(crate) fn atom_mut(&mut self, index: usize) -> Option<&mut Atom> {
        self.atoms.get_mut(index)
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.atoms.shrink_to_fit();
        self.bonds.shrink_to_fit();
        self.bond_adjacency.shrink_to_fit();
    }
}

/// A fully built structural model: atoms, residues, chains, models, the
/// polymers assembled from them and the derived hydrogen-bond network.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub(crate) store: AtomStore,
    pub(crate) groups: Vec<Group>,
    pub(crate) chains: SlotMap<ChainId, Chain>,
    pub(crate) models: Vec<Model>,
    pub(crate) polymers: SlotMap<PolymerId, BioPolymer>,
    pub(crate) hbonds: Vec<HBond>,
}

impl Frame {
    pub fn store(&self) -> &AtomStore {
        &self.store
    }

    pub fn atoms(&self) -> &[Atom] {
        self.store.atoms()
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.store.atom(index)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    /// The monomer of a group, if the group was classified.
    pub fn monomer(&self, group_index: usize) -> Option<&Monomer> {
        self.groups.get(group_index).and_then(Group::monomer)
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chains.iter()
    }

    /// Looks up the chain with identifier `chain_id` in model `model_index`.
    pub fn find_chain(&self, model_index: usize, chain_id: char) -> Option<ChainId> {
        self.models.get(model_index)?.chains.iter().copied().find(|&id| {
            self.chains
                .get(id)
                .is_some_and(|chain| chain.id == chain_id)
        })
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn model(&self, index: usize) -> Option<&Model> {
        self.models.get(index)
    }

    pub fn polymer(&self, id: PolymerId) -> Option<&BioPolymer> {
        self.polymers.get(id)
    }

    pub fn polymers_iter(&self) -> impl Iterator<Item = (PolymerId, &BioPolymer)> {
        self.polymers.iter()
    }

    pub fn polymer_count(&self) -> usize {
        self.polymers.len()
    }

    /// Polymers of one model in assembly order.
    pub fn polymers_in_model(
        &self,
        model_index: usize,
    ) -> impl Iterator<Item = (PolymerId, &BioPolymer)> + '_ {
        self.models
            .get(model_index)
            .map(|model| model.polymers.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|&id| self.polymers.get(id).map(|polymer| (id, polymer)))
    }

    /// Hydrogen bonds found by the last recompute.
    pub fn hbonds(&self) -> &[HBond] {
        &self.hbonds
    }

    /// Moves an atom. Derived data is stale until the next recompute.
    ///
    /// # Return
    ///
    /// Returns `Some(())` if the atom exists, otherwise `None`.
    pub fn set_atom_position(&mut self, index: usize, position: Point3<f64>) -> Option<()> {
        self.store.atom_mut(index)?.position = position;
        for polymer in self.polymers.values_mut() {
            polymer
                .structures
                .iter_mut()
                .for_each(ProteinStructure::invalidate_axis);
        }
        Some(())
    }

    /// Axis endpoints of a structure, computed from the polymer's lead
    /// midpoints on first request and cached until membership changes.
    pub fn structure_axis(&self, polymer_id: PolymerId, structure_index: usize) -> Option<Axis> {
        let polymer = self.polymers.get(polymer_id)?;
        let structure = polymer.structures.get(structure_index)?;
        structure.axis_with(|| polymer.lead_midpoints_and_wing_vectors(self).midpoints)
    }

    /// Counts and polymer sequences of one model.
    pub fn model_summary(&self, model_index: usize) -> Option<ModelSummary> {
        let model = self.models.get(model_index)?;
        let group_count = model
            .chains
            .iter()
            .filter_map(|&id| self.chains.get(id))
            .map(|chain| chain.groups.len())
            .sum();
        let sequences = self
            .polymers_in_model(model_index)
            .map(|(_, polymer)| polymer.sequence(self))
            .collect();
        Some(ModelSummary {
            index: model.index,
            chain_count: model.chains.len(),
            group_count,
            polymer_count: model.polymers.len(),
            sequences,
        })
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.store.shrink_to_fit();
        self.groups.shrink_to_fit();
        for chain in self.chains.values_mut() {
            chain.groups.shrink_to_fit();
        }
        self.models.shrink_to_fit();
    }
}
