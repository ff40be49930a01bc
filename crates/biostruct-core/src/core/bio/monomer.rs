use super::assembler::AssemblySettings;
use super::resolver::RoleScratch;
use crate::core::models::atom::AtomRole;
use crate::core::models::frame::AtomStore;
use crate::core::models::ids::PolymerId;
use std::fmt;

/// Sentinel stored in a role offset table for a role the residue does not have.
pub const ABSENT_OFFSET: u8 = u8::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonomerType {
    /// Full peptide backbone (N, CA, C).
    Amino,
    /// Alpha-carbon-only trace.
    Alpha,
    /// Nucleotide with a complete sugar ring.
    Nucleic,
    /// Phosphorus-only trace.
    Phosphorus,
    Carbohydrate,
}

impl fmt::Display for MonomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MonomerType::Amino => "Amino",
                MonomerType::Alpha => "Alpha",
                MonomerType::Nucleic => "Nucleic",
                MonomerType::Phosphorus => "Phosphorus",
                MonomerType::Carbohydrate => "Carbohydrate",
            }
        )
    }
}

/// Operations every monomer subtype provides to the polymer layer.
pub trait PolymerUnit {
    /// Atom index carrying `role`, if the residue has one.
    fn atom(&self, role: AtomRole) -> Option<usize>;

    /// The atom that traces the polymer backbone.
    fn lead_atom(&self) -> usize;

    /// The atom that orients the backbone ribbon, if the subtype has one.
    fn wing_atom(&self) -> Option<usize> {
        None
    }

    /// Whether this residue continues a polymer whose last member is `previous`.
    fn is_connected_after(
        &self,
        previous: &Self,
        store: &AtomStore,
        settings: &AssemblySettings,
    ) -> bool
    where
        Self: Sized;
}

/// Fixed-size table of role offsets relative to a residue's first atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleOffsets<const N: usize> {
    first_atom: usize,
    offsets: [u8; N],
}

impl<const N: usize> RoleOffsets<N> {
    /// Copies the offsets of `roles` out of a filled scratch buffer.
    ///
    /// Returns `None` when any recorded offset does not fit below the sentinel.
    fn collect(first_atom: usize, roles: &[AtomRole; N], scratch: &RoleScratch) -> Option<Self> {
        let mut offsets = [ABSENT_OFFSET; N];
        for (slot, role) in roles.iter().enumerate() {
            if let Some(offset) = scratch.offset(*role) {
                offsets[slot] = narrow_offset(offset)?;
            }
        }
        Some(Self {
            first_atom,
            offsets,
        })
    }

    fn offset_at(&self, slot: usize) -> Option<u8> {
        match self.offsets.get(slot) {
            Some(&offset) if offset != ABSENT_OFFSET => Some(offset),
            _ => None,
        }
    }

    fn atom_at(&self, slot: usize) -> Option<usize> {
        self.offset_at(slot)
            .map(|offset| self.first_atom + offset as usize)
    }

    fn lookup(&self, roles: &[AtomRole; N], role: AtomRole) -> Option<usize> {
        roles
            .iter()
            .position(|r| *r == role)
            .and_then(|slot| self.atom_at(slot))
    }

    fn offset_of(&self, roles: &[AtomRole; N], role: AtomRole) -> Option<u8> {
        roles
            .iter()
            .position(|r| *r == role)
            .and_then(|slot| self.offset_at(slot))
    }
}

fn narrow_offset(offset: usize) -> Option<u8> {
    u8::try_from(offset).ok().filter(|o| *o != ABSENT_OFFSET)
}

const AMINO_ROLES: [AtomRole; 6] = [
    AtomRole::AmideNitrogen,
    AtomRole::AlphaCarbon,
    AtomRole::CarbonylCarbon,
    AtomRole::CarbonylOxygen,
    AtomRole::TerminalOxygen,
    AtomRole::AmideHydrogen,
];
const AMINO_CARBONYL_OXYGEN_SLOT: usize = 3;

/// Residue with a complete peptide backbone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AminoResidue {
    roles: RoleOffsets<6>,
    /// Backbone dihedrals in degrees; NaN until computed or when undefined.
    pub phi: f64,
    pub psi: f64,
    pub omega: f64,
}

impl AminoResidue {
    pub(crate) fn from_scratch(first_atom: usize, scratch: &RoleScratch) -> Option<Self> {
        let mut roles = RoleOffsets::collect(first_atom, &AMINO_ROLES, scratch)?;
        if roles.offsets[AMINO_CARBONYL_OXYGEN_SLOT] == ABSENT_OFFSET {
            if let Some(offset) = scratch.offset(AtomRole::CarbonylOxygenAlt) {
                roles.offsets[AMINO_CARBONYL_OXYGEN_SLOT] = narrow_offset(offset)?;
            }
        }
        Some(Self {
            roles,
            phi: f64::NAN,
            psi: f64::NAN,
            omega: f64::NAN,
        })
    }

    pub fn role_offset(&self, role: AtomRole) -> Option<u8> {
        self.roles.offset_of(&AMINO_ROLES, role)
    }

    pub fn nitrogen(&self) -> Option<usize> {
        self.roles.atom_at(0)
    }

    pub fn alpha_carbon(&self) -> Option<usize> {
        self.roles.atom_at(1)
    }

    pub fn carbonyl_carbon(&self) -> Option<usize> {
        self.roles.atom_at(2)
    }

    /// Carbonyl oxygen `O`, or `O1` when the residue names it that way.
    pub fn carbonyl_oxygen(&self) -> Option<usize> {
        self.roles.atom_at(AMINO_CARBONYL_OXYGEN_SLOT)
    }

    pub fn explicit_hydrogen(&self) -> Option<usize> {
        self.roles.atom_at(5)
    }

    pub(crate) fn clear_dihedrals(&mut self) {
        self.phi = f64::NAN;
        self.psi = f64::NAN;
        self.omega = f64::NAN;
    }
}

impl PolymerUnit for AminoResidue {
    fn atom(&self, role: AtomRole) -> Option<usize> {
        match role {
            AtomRole::CarbonylOxygenAlt => self.carbonyl_oxygen(),
            _ => self.roles.lookup(&AMINO_ROLES, role),
        }
    }

    fn lead_atom(&self) -> usize {
        self.alpha_carbon().unwrap_or(self.roles.first_atom)
    }

    fn wing_atom(&self) -> Option<usize> {
        self.carbonyl_oxygen()
    }

    fn is_connected_after(
        &self,
        previous: &Self,
        store: &AtomStore,
        _settings: &AssemblySettings,
    ) -> bool {
        match (previous.carbonyl_carbon(), self.nitrogen()) {
            (Some(c), Some(n)) => store.is_bonded(c, n),
            _ => false,
        }
    }
}

/// Residue represented by its alpha carbon only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphaResidue {
    roles: RoleOffsets<1>,
}

const ALPHA_ROLES: [AtomRole; 1] = [AtomRole::AlphaCarbon];

impl AlphaResidue {
    pub(crate) fn from_scratch(first_atom: usize, scratch: &RoleScratch) -> Option<Self> {
        RoleOffsets::collect(first_atom, &ALPHA_ROLES, scratch).map(|roles| Self { roles })
    }
}

impl PolymerUnit for AlphaResidue {
    fn atom(&self, role: AtomRole) -> Option<usize> {
        self.roles.lookup(&ALPHA_ROLES, role)
    }

    fn lead_atom(&self) -> usize {
        self.roles.atom_at(0).unwrap_or(self.roles.first_atom)
    }

    fn is_connected_after(
        &self,
        previous: &Self,
        store: &AtomStore,
        settings: &AssemblySettings,
    ) -> bool {
        store
            .distance(previous.lead_atom(), self.lead_atom())
            .is_some_and(|d| d <= settings.max_alpha_distance)
    }
}

const NUCLEIC_ROLES: [AtomRole; 29] = [
    AtomRole::Phosphorus,
    AtomRole::O5Prime,
    AtomRole::C5Prime,
    AtomRole::C4Prime,
    AtomRole::C3Prime,
    AtomRole::O3Prime,
    AtomRole::C2Prime,
    AtomRole::C1Prime,
    AtomRole::O4Prime,
    AtomRole::O2Prime,
    AtomRole::O1P,
    AtomRole::O2P,
    AtomRole::N1,
    AtomRole::C2,
    AtomRole::N3,
    AtomRole::C4,
    AtomRole::C5,
    AtomRole::C6,
    AtomRole::O2,
    AtomRole::N7,
    AtomRole::C8,
    AtomRole::N9,
    AtomRole::N4,
    AtomRole::N2,
    AtomRole::N6,
    AtomRole::C5M,
    AtomRole::O6,
    AtomRole::O4,
    AtomRole::S4,
];

/// Nucleotide with a complete sugar ring; phosphate and base atoms are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NucleicResidue {
    roles: RoleOffsets<29>,
}

impl NucleicResidue {
    pub(crate) fn from_scratch(first_atom: usize, scratch: &RoleScratch) -> Option<Self> {
        RoleOffsets::collect(first_atom, &NUCLEIC_ROLES, scratch).map(|roles| Self { roles })
    }

    pub fn role_offset(&self, role: AtomRole) -> Option<u8> {
        self.roles.offset_of(&NUCLEIC_ROLES, role)
    }

    /// N1, N3 and N9 present.
    pub fn is_purine(&self) -> bool {
        [AtomRole::N1, AtomRole::N3, AtomRole::N9]
            .iter()
            .all(|role| self.atom(*role).is_some())
    }

    /// N3 present without N9.
    pub fn is_pyrimidine(&self) -> bool {
        self.atom(AtomRole::N3).is_some() && self.atom(AtomRole::N9).is_none()
    }

    pub fn is_guanine(&self) -> bool {
        self.atom(AtomRole::O6).is_some()
    }

    pub fn is_adenine(&self) -> bool {
        self.atom(AtomRole::N6).is_some()
    }

    /// A ribose 2' oxygen marks RNA.
    pub fn is_rna(&self) -> bool {
        self.atom(AtomRole::O2Prime).is_some()
    }
}

impl PolymerUnit for NucleicResidue {
    fn atom(&self, role: AtomRole) -> Option<usize> {
        self.roles.lookup(&NUCLEIC_ROLES, role)
    }

    fn lead_atom(&self) -> usize {
        self.atom(AtomRole::Phosphorus)
            .or_else(|| self.atom(AtomRole::C1Prime))
            .unwrap_or(self.roles.first_atom)
    }

    fn wing_atom(&self) -> Option<usize> {
        self.atom(AtomRole::C6)
    }

    fn is_connected_after(
        &self,
        previous: &Self,
        store: &AtomStore,
        _settings: &AssemblySettings,
    ) -> bool {
        match (self.atom(AtomRole::Phosphorus), previous.atom(AtomRole::O3Prime)) {
            (Some(p), Some(o3)) => store.is_bonded(p, o3),
            _ => false,
        }
    }
}

/// Nucleotide represented by its phosphorus only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhosphorusResidue {
    roles: RoleOffsets<1>,
}

const PHOSPHORUS_ROLES: [AtomRole; 1] = [AtomRole::Phosphorus];

impl PhosphorusResidue {
    pub(crate) fn from_scratch(first_atom: usize, scratch: &RoleScratch) -> Option<Self> {
        RoleOffsets::collect(first_atom, &PHOSPHORUS_ROLES, scratch).map(|roles| Self { roles })
    }
}

impl PolymerUnit for PhosphorusResidue {
    fn atom(&self, role: AtomRole) -> Option<usize> {
        self.roles.lookup(&PHOSPHORUS_ROLES, role)
    }

    fn lead_atom(&self) -> usize {
        self.roles.atom_at(0).unwrap_or(self.roles.first_atom)
    }

    fn is_connected_after(
        &self,
        previous: &Self,
        store: &AtomStore,
        settings: &AssemblySettings,
    ) -> bool {
        store
            .distance(previous.lead_atom(), self.lead_atom())
            .is_some_and(|d| d <= settings.max_phosphorus_distance)
    }
}

/// Sugar residue recognized by name; it has no role atoms of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarbohydrateResidue {
    first_atom: usize,
    last_atom: usize,
}

impl CarbohydrateResidue {
    pub(crate) fn new(first_atom: usize, last_atom: usize) -> Self {
        Self {
            first_atom,
            last_atom,
        }
    }

    fn contains(&self, atom: usize) -> bool {
        (self.first_atom..=self.last_atom).contains(&atom)
    }
}

impl PolymerUnit for CarbohydrateResidue {
    fn atom(&self, _role: AtomRole) -> Option<usize> {
        None
    }

    fn lead_atom(&self) -> usize {
        self.first_atom
    }

    fn is_connected_after(
        &self,
        previous: &Self,
        store: &AtomStore,
        _settings: &AssemblySettings,
    ) -> bool {
        (previous.first_atom..=previous.last_atom).any(|atom| {
            store
                .bonded_neighbors(atom)
                .iter()
                .any(|&partner| self.contains(partner))
        })
    }
}

/// Subtype payload of a classified residue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonomerKind {
    Amino(AminoResidue),
    Alpha(AlphaResidue),
    Nucleic(NucleicResidue),
    Phosphorus(PhosphorusResidue),
    Carbohydrate(CarbohydrateResidue),
}

impl MonomerKind {
    pub fn monomer_type(&self) -> MonomerType {
        match self {
            MonomerKind::Amino(_) => MonomerType::Amino,
            MonomerKind::Alpha(_) => MonomerType::Alpha,
            MonomerKind::Nucleic(_) => MonomerType::Nucleic,
            MonomerKind::Phosphorus(_) => MonomerType::Phosphorus,
            MonomerKind::Carbohydrate(_) => MonomerType::Carbohydrate,
        }
    }

    fn unit(&self) -> &dyn PolymerUnit {
        match self {
            MonomerKind::Amino(m) => m,
            MonomerKind::Alpha(m) => m,
            MonomerKind::Nucleic(m) => m,
            MonomerKind::Phosphorus(m) => m,
            MonomerKind::Carbohydrate(m) => m,
        }
    }
}

/// Position of a monomer inside its polymer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolymerSlot {
    pub polymer: PolymerId,
    pub position: usize,
}

/// A classified residue.
///
/// Polymer membership and structure membership are rebuilt on every
/// recompute; the subtype payload is fixed once the frame is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Monomer {
    kind: MonomerKind,
    pub(crate) polymer: Option<PolymerSlot>,
    pub(crate) structure: Option<usize>,
}

impl Monomer {
    pub fn new(kind: MonomerKind) -> Self {
        Self {
            kind,
            polymer: None,
            structure: None,
        }
    }

    pub fn kind(&self) -> &MonomerKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut MonomerKind {
        &mut self.kind
    }

    pub fn monomer_type(&self) -> MonomerType {
        self.kind.monomer_type()
    }

    pub fn atom(&self, role: AtomRole) -> Option<usize> {
        self.kind.unit().atom(role)
    }

    /// Offset of the `role` atom from the first atom of the residue.
    pub fn role_offset(&self, role: AtomRole) -> Option<u8> {
        match &self.kind {
            MonomerKind::Amino(m) => m.role_offset(role),
            MonomerKind::Nucleic(m) => m.role_offset(role),
            MonomerKind::Alpha(m) => m.roles.offset_of(&ALPHA_ROLES, role),
            MonomerKind::Phosphorus(m) => m.roles.offset_of(&PHOSPHORUS_ROLES, role),
            MonomerKind::Carbohydrate(_) => None,
        }
    }

    pub fn lead_atom(&self) -> usize {
        self.kind.unit().lead_atom()
    }

    pub fn wing_atom(&self) -> Option<usize> {
        self.kind.unit().wing_atom()
    }

    /// Subtype-specific connectivity; residues of different subtypes never connect.
    pub fn is_connected_after(
        &self,
        previous: &Monomer,
        store: &AtomStore,
        settings: &AssemblySettings,
    ) -> bool {
        match (&self.kind, &previous.kind) {
            (MonomerKind::Amino(a), MonomerKind::Amino(b)) => {
                a.is_connected_after(b, store, settings)
            }
            (MonomerKind::Alpha(a), MonomerKind::Alpha(b)) => {
                a.is_connected_after(b, store, settings)
            }
            (MonomerKind::Nucleic(a), MonomerKind::Nucleic(b)) => {
                a.is_connected_after(b, store, settings)
            }
            (MonomerKind::Phosphorus(a), MonomerKind::Phosphorus(b)) => {
                a.is_connected_after(b, store, settings)
            }
            (MonomerKind::Carbohydrate(a), MonomerKind::Carbohydrate(b)) => {
                a.is_connected_after(b, store, settings)
            }
            _ => false,
        }
    }

    pub fn amino(&self) -> Option<&AminoResidue> {
        match &self.kind {
            MonomerKind::Amino(m) => Some(m),
            _ => None,
        }
    }

    pub(crate) fn amino_mut(&mut self) -> Option<&mut AminoResidue> {
        match &mut self.kind {
            MonomerKind::Amino(m) => Some(m),
            _ => None,
        }
    }

    pub fn nucleic(&self) -> Option<&NucleicResidue> {
        match &self.kind {
            MonomerKind::Nucleic(m) => Some(m),
            _ => None,
        }
    }

    pub fn polymer(&self) -> Option<PolymerSlot> {
        self.polymer
    }

    /// Index of the structure this residue belongs to in its polymer's structure list.
    pub fn structure(&self) -> Option<usize> {
        self.structure
    }

    pub fn phi(&self) -> f64 {
        self.amino().map_or(f64::NAN, |m| m.phi)
    }

    pub fn psi(&self) -> f64 {
        self.amino().map_or(f64::NAN, |m| m.psi)
    }

    pub fn omega(&self) -> f64 {
        self.amino().map_or(f64::NAN, |m| m.omega)
    }

    pub(crate) fn detach(&mut self) {
        self.polymer = None;
        self.structure = None;
        if let Some(amino) = self.amino_mut() {
            amino.clear_dihedrals();
        }
    }
}
