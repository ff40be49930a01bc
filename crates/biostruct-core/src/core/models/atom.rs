use crate::core::utils::identifiers::role_for_atom_name;
use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Identifies the structural role an atom plays inside a biological residue.
///
/// Roles are assigned from the atom name when the atom is ingested and are the
/// only thing the residue classifier looks at. The discriminants are stable
/// small integers: roles below [`AtomRole::DISTINGUISHING_LIMIT`] take part in
/// the classification bit mask, the others are optional atoms that are tracked
/// but never decide the residue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum AtomRole {
    /// Backbone amide nitrogen `N`.
    AmideNitrogen = 1,
    /// Alpha carbon `CA`.
    AlphaCarbon = 2,
    /// Backbone carbonyl carbon `C`.
    CarbonylCarbon = 3,
    O5Prime = 5,
    C5Prime = 6,
    C4Prime = 7,
    C3Prime = 8,
    O3Prime = 9,
    C2Prime = 10,
    C1Prime = 11,
    /// Backbone phosphorus `P`.
    Phosphorus = 12,
    /// C-terminal oxygen `OXT`.
    TerminalOxygen = 32,
    /// Amide hydrogen `H`.
    AmideHydrogen = 33,
    /// Backbone carbonyl oxygen `O`.
    CarbonylOxygen = 40,
    /// Alternate carbonyl oxygen name `O1`.
    CarbonylOxygenAlt = 41,
    O1P = 47,
    O2P = 48,
    O4Prime = 49,
    O2Prime = 50,
    N1 = 64,
    C2 = 65,
    N3 = 66,
    C4 = 67,
    C5 = 68,
    C6 = 69,
    O2 = 70,
    N7 = 71,
    C8 = 72,
    N9 = 73,
    N4 = 74,
    N2 = 75,
    N6 = 76,
    C5M = 77,
    O6 = 78,
    O4 = 79,
    S4 = 80,
}

impl AtomRole {
    /// Roles with an id below this value contribute to the classification mask.
    pub const DISTINGUISHING_LIMIT: u8 = 32;
    /// One past the largest role id; sizes per-role lookup tables.
    pub const SLOT_COUNT: usize = 81;

    pub const fn id(self) -> u8 {
        self as u8
    }

    pub const fn is_distinguishing(self) -> bool {
        (self as u8) < Self::DISTINGUISHING_LIMIT
    }

    /// Bit of this role in a distinguishing-role mask, or zero for optional roles.
    pub const fn mask_bit(self) -> u32 {
        if self.is_distinguishing() {
            1u32 << (self as u8)
        } else {
            0
        }
    }

    /// Canonical PDB name of the atom that carries this role.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::AmideNitrogen => "N",
            Self::AlphaCarbon => "CA",
            Self::CarbonylCarbon => "C",
            Self::O5Prime => "O5'",
            Self::C5Prime => "C5'",
            Self::C4Prime => "C4'",
            Self::C3Prime => "C3'",
            Self::O3Prime => "O3'",
            Self::C2Prime => "C2'",
            Self::C1Prime => "C1'",
            Self::Phosphorus => "P",
            Self::TerminalOxygen => "OXT",
            Self::AmideHydrogen => "H",
            Self::CarbonylOxygen => "O",
            Self::CarbonylOxygenAlt => "O1",
            Self::O1P => "O1P",
            Self::O2P => "O2P",
            Self::O4Prime => "O4'",
            Self::O2Prime => "O2'",
            Self::N1 => "N1",
            Self::C2 => "C2",
            Self::N3 => "N3",
            Self::C4 => "C4",
            Self::C5 => "C5",
            Self::C6 => "C6",
            Self::O2 => "O2",
            Self::N7 => "N7",
            Self::C8 => "C8",
            Self::N9 => "N9",
            Self::N4 => "N4",
            Self::N2 => "N2",
            Self::N6 => "N6",
            Self::C5M => "C5M",
            Self::O6 => "O6",
            Self::O4 => "O4",
            Self::S4 => "S4",
        }
    }
}

impl fmt::Display for AtomRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl FromStr for AtomRole {
    type Err = ();

    /// Maps a PDB atom name onto its role.
    ///
    /// Surrounding whitespace is ignored and the old `*` prime notation
    /// (`C1*`) is accepted alongside the current `'` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        role_for_atom_name(s).ok_or(())
    }
}

const SEQUENCE_NUMBER_SHIFT: u32 = 8;
const SEQUENCE_NUMBER_FLAG: i32 = 0x80;
const INSERTION_CODE_MASK: i32 = 0x7F;

/// Residue sequence number and insertion code packed into one ordered integer.
///
/// The layout is `(number << 8) | 0x80 | code`, so comparing two seqcodes
/// orders residues by number first and insertion code second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Seqcode(i32);

impl Seqcode {
    /// Packs a residue number and insertion code.
    ///
    /// A blank or NUL insertion code means "none". Codes outside `A-Z`, `a-z`,
    /// `0-9`, `?` and `*` are logged and dropped.
    pub fn new(sequence_number: i32, insertion_code: char) -> Self {
        let code = match insertion_code {
            ' ' | '\0' => 0,
            c if is_valid_insertion_code(c) => c as i32,
            c => {
                warn!(
                    sequence_number,
                    insertion_code = ?c,
                    "Ignoring invalid insertion code."
                );
                0
            }
        };
        Self((sequence_number << SEQUENCE_NUMBER_SHIFT) | SEQUENCE_NUMBER_FLAG | code)
    }

    pub fn sequence_number(self) -> i32 {
        self.0 >> SEQUENCE_NUMBER_SHIFT
    }

    pub fn insertion_code(self) -> Option<char> {
        match self.0 & INSERTION_CODE_MASK {
            0 => None,
            code => char::from_u32(code as u32),
        }
    }

    pub fn raw(self) -> i32 {
        self.0
    }
}

fn is_valid_insertion_code(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '?' || c == '*'
}

impl fmt::Display for Seqcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.insertion_code() {
            Some(code) => write!(f, "{}^{}", self.sequence_number(), code),
            None => write!(f, "{}", self.sequence_number()),
        }
    }
}

/// An atom of a frame.
///
/// Atoms are stored in one append-only vector owned by the frame and are
/// referred to everywhere else by their index in that vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The atom name as given by the input (e.g., "CA", "O3'").
    pub name: String,
    /// Element symbol.
    pub element: String,
    pub atomic_number: u8,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    pub model_index: usize,
    pub serial: i32,
    pub chain_id: char,
    pub seqcode: Seqcode,
    /// `HETATM` records set this flag.
    pub is_hetero: bool,
    /// Distinguishing role derived from the atom name, if any.
    pub role: Option<AtomRole>,
    pub(crate) group_index: usize,
    pub(crate) bonds: Vec<usize>,
}

impl Atom {
    pub fn new(name: &str, element: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element: element.to_string(),
            atomic_number: 0,
            position,
            model_index: 0,
            serial: 0,
            chain_id: ' ',
            seqcode: Seqcode::new(0, ' '),
            is_hetero: false,
            role: role_for_atom_name(name),
            group_index: 0,
            bonds: Vec::new(),
        }
    }

    /// Index of the group this atom belongs to.
    pub fn group_index(&self) -> usize {
        self.group_index
    }

    /// Indices of the bonds this atom takes part in.
    pub fn bonds(&self) -> &[usize] {
        &self.bonds
    }
}
