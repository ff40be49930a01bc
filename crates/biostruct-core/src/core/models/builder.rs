use super::atom::{Atom, Seqcode};
use super::chain::Chain;
use super::frame::Frame;
use super::group::Group;
use super::ids::ChainId;
use super::model::Model;
use super::topology::BondOrder;
use crate::core::bio::resolver::{BioResolver, GroupResolver, RoleScratch};
use crate::core::io::records::{AtomRecord, BondRecord, StructureRecord};
use crate::core::io::traits::ModelAdapter;
use crate::core::utils::identifiers::role_for_atom_name;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Group {group} would end at atom {last} before its first atom {first}")]
    InvariantViolation {
        group: usize,
        first: usize,
        last: usize,
    },
}

/// The group currently receiving atoms.
#[derive(Debug, Clone, Copy)]
struct OpenGroup {
    group_index: usize,
    model_index: usize,
    chain_id: char,
    seqcode: Seqcode,
}

/// Builds a [`Frame`] from a stream of atom records.
///
/// Atoms must arrive grouped by residue. A change of model, chain, sequence
/// code or residue name closes the current group and opens a new one; the
/// builder never reorders atoms.
pub struct FrameBuilder {
    frame: Frame,
    resolver: Option<Box<dyn GroupResolver>>,

    // --- Builder-specific state for streaming construction ---
    chain_map: HashMap<(usize, char), ChainId>,
    open: Option<OpenGroup>,
    skipped_bonds: usize,
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuilder {
    /// A builder that classifies groups with [`BioResolver`].
    pub fn new() -> Self {
        Self::with_resolver(Box::new(BioResolver))
    }

    /// A builder that leaves every group unclassified.
    pub fn without_resolver() -> Self {
        Self::from_parts(None)
    }

    pub fn with_resolver(resolver: Box<dyn GroupResolver>) -> Self {
        Self::from_parts(Some(resolver))
    }

    fn from_parts(resolver: Option<Box<dyn GroupResolver>>) -> Self {
        Self {
            frame: Frame::default(),
            resolver,
            chain_map: HashMap::new(),
            open: None,
            skipped_bonds: 0,
        }
    }

    /// Feeds every record of `adapter` into the builder and builds the frame.
    pub fn load(mut self, adapter: &impl ModelAdapter) -> Result<Frame, BuildError> {
        for record in adapter.atoms() {
            self.add_atom(record)?;
        }
        for record in adapter.bonds() {
            self.add_bond(record);
        }
        for record in adapter.structures() {
            self.add_structure(record);
        }
        self.build()
    }

    /// Appends one atom, closing and opening groups as needed.
    ///
    /// # Return
    ///
    /// Returns the index of the new atom.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvariantViolation`] if closing the previous
    /// group would produce an inverted atom range.
    pub fn add_atom(&mut self, record: AtomRecord) -> Result<usize, BuildError> {
        let atom_index = self.frame.store.len();
        let seqcode = record.seqcode();

        let continues_open_group = self.open.is_some_and(|open| {
            open.model_index == record.model_index
                && open.chain_id == record.chain_id
                && open.seqcode == seqcode
                && self.frame.groups[open.group_index].name == record.group3
        });

        if !continues_open_group {
            if let Some(open) = self.open.take() {
                self.close_group(open, atom_index)?;
            }
            self.open = Some(self.open_group(&record, seqcode, atom_index));
        }

        let group_index = self.open.map_or(0, |open| open.group_index);
        let atom = Atom {
            name: record.atom_name.trim().to_string(),
            element: record.element,
            atomic_number: record.atomic_number,
            position: record.position,
            model_index: record.model_index,
            serial: record.serial,
            chain_id: record.chain_id,
            seqcode,
            is_hetero: record.is_hetero,
            role: role_for_atom_name(&record.atom_name),
            group_index,
            bonds: Vec::new(),
        };
        let (index, replaced) = self.frame.store.push_atom(atom, record.unique_id);
        if replaced {
            warn!(
                unique_id = record.unique_id,
                atom_index = index,
                "Duplicate atom id; bonds will refer to the latest atom."
            );
        }
        Ok(index)
    }

    /// Adds a bond between two previously added atoms.
    ///
    /// Returns `false`, after logging, when either id is unknown.
    pub fn add_bond(&mut self, record: BondRecord) -> bool {
        let store = &self.frame.store;
        let (Some(a), Some(b)) = (
            store.index_of_unique_id(record.atom1),
            store.index_of_unique_id(record.atom2),
        ) else {
            warn!(
                atom1 = record.atom1,
                atom2 = record.atom2,
                "Skipping bond that refers to an unknown atom."
            );
            self.skipped_bonds += 1;
            return false;
        };
        let order = BondOrder::from_code(record.order);
        if self.frame.store.add_bond(a, b, order).is_none() {
            warn!(atom1 = a, atom2 = b, "Skipping self bond.");
            self.skipped_bonds += 1;
            return false;
        }
        true
    }

    pub fn add_bond_ids(&mut self, atom1: u64, atom2: u64, order: i32) -> bool {
        self.add_bond(BondRecord::new(atom1, atom2, order))
    }

    /// Stores a declared secondary structure on its model.
    pub fn add_structure(&mut self, record: StructureRecord) {
        self.ensure_model(record.model_index);
        self.frame.models[record.model_index]
            .declared_structures
            .push(record);
    }

    /// Closes the last group, classifies all groups and freezes the frame.
    pub fn build(mut self) -> Result<Frame, BuildError> {
        if let Some(open) = self.open.take() {
            let end = self.frame.store.len();
            self.close_group(open, end)?;
        }

        let mut monomer_count = 0;
        if let Some(resolver) = self.resolver.as_deref() {
            let mut scratch = RoleScratch::new();
            let Frame { store, groups, .. } = &mut self.frame;
            for group in groups.iter_mut() {
                group.monomer = resolver.resolve(group, store, &mut scratch);
                if group.monomer.is_some() {
                    monomer_count += 1;
                }
            }
        }

        self.frame.shrink_to_fit();
        info!(
            atoms = self.frame.store.len(),
            bonds = self.frame.store.bonds().len(),
            groups = self.frame.groups.len(),
            monomers = monomer_count,
            chains = self.frame.chains.len(),
            models = self.frame.models.len(),
            skipped_bonds = self.skipped_bonds,
            "Frame built."
        );
        Ok(self.frame)
    }

    fn ensure_model(&mut self, model_index: usize) {
        while self.frame.models.len() <= model_index {
            let index = self.frame.models.len();
            self.frame.models.push(Model::new(index));
        }
    }

    fn resolve_chain(&mut self, model_index: usize, chain_id: char) -> ChainId {
        self.ensure_model(model_index);
        if let Some(&id) = self.chain_map.get(&(model_index, chain_id)) {
            return id;
        }
        let id = self.frame.chains.insert(Chain::new(chain_id, model_index));
        self.frame.models[model_index].chains.push(id);
        self.chain_map.insert((model_index, chain_id), id);
        debug!(model = model_index, chain = %chain_id, "Opened chain.");
        id
    }

    fn open_group(&mut self, record: &AtomRecord, seqcode: Seqcode, first_atom: usize) -> OpenGroup {
        let chain = self.resolve_chain(record.model_index, record.chain_id);
        let group_index = self.frame.groups.len();
        let mut group = Group::new(
            &record.group3,
            seqcode,
            chain,
            record.chain_id,
            record.model_index,
            first_atom,
        );
        group.is_hetero = record.is_hetero;
        self.frame.groups.push(group);
        if let Some(chain) = self.frame.chains.get_mut(chain) {
            chain.groups.push(group_index);
        }
        OpenGroup {
            group_index,
            model_index: record.model_index,
            chain_id: record.chain_id,
            seqcode,
        }
    }

    /// Ends `open` just before atom `end`.
    fn close_group(&mut self, open: OpenGroup, end: usize) -> Result<(), BuildError> {
        let group = &mut self.frame.groups[open.group_index];
        let first = group.first_atom;
        if end <= first {
            return Err(BuildError::InvariantViolation {
                group: open.group_index,
                first,
                last: end.wrapping_sub(1),
            });
        }
        group.last_atom = end - 1;
        Ok(())
    }
}
