use super::ids::PolymerId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Broad classification of a chain, derived from the polymers assembled on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChainType {
    Protein,
    DNA,
    RNA,
    Carbohydrate,
    Water,
    #[default]
    Other,
}

#[derive(Debug, Error)]
#[error("Invalid chain type string")]
pub struct ParseChainTypeError;

impl FromStr for ChainType {
    type Err = ParseChainTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "protein" => Ok(ChainType::Protein),
            "dna" => Ok(ChainType::DNA),
            "rna" => Ok(ChainType::RNA),
            "carbohydrate" => Ok(ChainType::Carbohydrate),
            "water" => Ok(ChainType::Water),
            "other" => Ok(ChainType::Other),
            _ => Err(ParseChainTypeError),
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChainType::Protein => "Protein",
                ChainType::DNA => "DNA",
                ChainType::RNA => "RNA",
                ChainType::Carbohydrate => "Carbohydrate",
                ChainType::Water => "Water",
                ChainType::Other => "Other",
            }
        )
    }
}

/// All groups of one chain identifier within one model, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: char,
    pub model_index: usize,
    pub chain_type: ChainType,
    pub(crate) groups: Vec<usize>,
    pub(crate) polymers: Vec<PolymerId>,
}

impl Chain {
    pub(crate) fn new(id: char, model_index: usize) -> Self {
        Self {
            id,
            model_index,
            chain_type: ChainType::Other,
            groups: Vec::new(),
            polymers: Vec::new(),
        }
    }

    /// Group indices in the order they were first seen.
    pub fn groups(&self) -> &[usize] {
        &self.groups
    }

    /// Polymers assembled on this chain during the last recompute.
    pub fn polymers(&self) -> &[PolymerId] {
        &self.polymers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_type_from_str_parses_known_types() {
        assert_eq!("protein".parse::<ChainType>().unwrap(), ChainType::Protein);
        assert_eq!("DNA".parse::<ChainType>().unwrap(), ChainType::DNA);
        assert_eq!("Rna".parse::<ChainType>().unwrap(), ChainType::RNA);
        assert_eq!("water".parse::<ChainType>().unwrap(), ChainType::Water);
        assert!("ligand".parse::<ChainType>().is_err());
    }

    #[test]
    fn chain_type_display_round_trips_through_from_str() {
        for chain_type in [
            ChainType::Protein,
            ChainType::DNA,
            ChainType::RNA,
            ChainType::Carbohydrate,
            ChainType::Water,
            ChainType::Other,
        ] {
            assert_eq!(chain_type.to_string().parse::<ChainType>().unwrap(), chain_type);
        }
    }

    #[test]
    fn new_chain_starts_empty() {
        let chain = Chain::new('A', 2);
        assert_eq!(chain.id, 'A');
        assert_eq!(chain.model_index, 2);
        assert_eq!(chain.chain_type, ChainType::Other);
        assert!(chain.groups().is_empty());
        assert!(chain.polymers().is_empty());
    }
}
