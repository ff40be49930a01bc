use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const AROMATIC_MASK: i32 = 0x200;
const HYDROGEN_SHIFT: u32 = 11;
const HYDROGEN_MASK: i32 = 0xF << HYDROGEN_SHIFT;

/// Sequence-offset classification of a hydrogen bond.
///
/// Backbone bonds inside one polymer are tagged by `donor - acceptor` residue
/// offset; bonds between polymers and offsets without a dedicated tag are
/// [`HBondKind::Calc`]; base-pair bonds are [`HBondKind::Nucleotide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HBondKind {
    Regular = 1,
    Calc = 2,
    Plus2 = 3,
    Plus3 = 4,
    Plus4 = 5,
    Plus5 = 6,
    Minus3 = 7,
    Minus4 = 8,
    Nucleotide = 9,
}

impl HBondKind {
    /// Tag for a bond whose donor residue sits `offset` positions after its acceptor.
    pub fn from_offset(offset: i64) -> Self {
        match offset {
            2 => Self::Plus2,
            3 => Self::Plus3,
            4 => Self::Plus4,
            5 => Self::Plus5,
            -3 => Self::Minus3,
            -4 => Self::Minus4,
            _ => Self::Calc,
        }
    }

    fn from_code(code: i32) -> Self {
        match code {
            2 => Self::Calc,
            3 => Self::Plus2,
            4 => Self::Plus3,
            5 => Self::Plus4,
            6 => Self::Plus5,
            7 => Self::Minus3,
            8 => Self::Minus4,
            9 => Self::Nucleotide,
            _ => Self::Regular,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
    Hydrogen(HBondKind),
}

impl BondOrder {
    /// Decodes a numeric bond order as supplied by file adapters.
    ///
    /// `1`, `2` and `3` are covalent orders, the `0x200` bit marks an aromatic
    /// bond and a non-zero nibble at bit 11 marks a hydrogen bond of that
    /// subtype. Anything else is read as a single bond.
    pub fn from_code(code: i32) -> Self {
        let hydrogen = (code & HYDROGEN_MASK) >> HYDROGEN_SHIFT;
        if hydrogen != 0 {
            return Self::Hydrogen(HBondKind::from_code(hydrogen));
        }
        if code & AROMATIC_MASK != 0 {
            return Self::Aromatic;
        }
        match code & 0x7 {
            2 => Self::Double,
            3 => Self::Triple,
            _ => Self::Single,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::Aromatic => AROMATIC_MASK | 3,
            Self::Hydrogen(kind) => (kind as i32) << HYDROGEN_SHIFT,
        }
    }

    pub fn is_covalent(self) -> bool {
        !matches!(self, Self::Hydrogen(_))
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond order string")]
pub struct ParseBondOrderError;

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "s" | "single" => Ok(Self::Single),
            "2" | "d" | "double" => Ok(Self::Double),
            "3" | "t" | "triple" => Ok(Self::Triple),
            "ar" | "aromatic" => Ok(Self::Aromatic),
            "h" | "hbond" | "hydrogen" => Ok(Self::Hydrogen(HBondKind::Regular)),
            _ => Err(ParseBondOrderError),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("Single"),
            Self::Double => f.write_str("Double"),
            Self::Triple => f.write_str("Triple"),
            Self::Aromatic => f.write_str("Aromatic"),
            Self::Hydrogen(kind) => write!(f, "Hydrogen({:?})", kind),
        }
    }
}

/// A covalent (or file-declared hydrogen) bond between two atoms of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Self {
            atom1,
            atom2,
            order,
        }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.atom1 == atom || self.atom2 == atom
    }

    /// The atom at the other end of the bond, if `atom` is one of its ends.
    pub fn partner(&self, atom: usize) -> Option<usize> {
        if self.atom1 == atom {
            Some(self.atom2)
        } else if self.atom2 == atom {
            Some(self.atom1)
        } else {
            None
        }
    }
}

/// A computed hydrogen bond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HBond {
    /// Donor heavy atom (amide nitrogen or base atom).
    pub donor: usize,
    /// Acceptor atom (carbonyl oxygen or base atom).
    pub acceptor: usize,
    pub kind: HBondKind,
    /// Energy in kcal/mol; zero for base pairs.
    pub energy: f64,
}

impl HBond {
    pub fn new(donor: usize, acceptor: usize, kind: HBondKind, energy: f64) -> Self {
        Self {
            donor,
            acceptor,
            kind,
            energy,
        }
    }

    pub fn order(&self) -> BondOrder {
        BondOrder::Hydrogen(self.kind)
    }
}
