use super::ids::{ChainId, PolymerId};
use crate::core::io::records::StructureRecord;

/// One snapshot of the structure; a frame holds one model per input model index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub index: usize,
    pub(crate) chains: Vec<ChainId>,
    pub(crate) polymers: Vec<PolymerId>,
    pub(crate) declared_structures: Vec<StructureRecord>,
}

impl Model {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// Chains in the order their first atom was seen.
    pub fn chains(&self) -> &[ChainId] {
        &self.chains
    }

    pub fn polymers(&self) -> &[PolymerId] {
        &self.polymers
    }

    /// Secondary structure annotations supplied with the input.
    pub fn declared_structures(&self) -> &[StructureRecord] {
        &self.declared_structures
    }

    pub fn has_declared_structures(&self) -> bool {
        !self.declared_structures.is_empty()
    }
}

/// Counts and sequences reported for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSummary {
    pub index: usize,
    pub chain_count: usize,
    pub group_count: usize,
    pub polymer_count: usize,
    /// One-letter sequence of each polymer, in polymer order.
    pub sequences: Vec<String>,
}
