use super::config::StructureSettings;
use crate::core::bio::structure::{StructureKind, StructureSubtype};
use crate::core::models::frame::Frame;
use itertools::Itertools;
use std::fmt;

/// Classification of one adjacent residue pair `(i, i+1)` from `psi[i]`
/// and `phi[i+1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairTag {
    AlphaHelix,
    ThreeTenHelix,
    Sheet,
    Turn,
}

impl PairTag {
    /// Run detection order; later passes overwrite earlier ones on overlap.
    pub const PASSES: [PairTag; 4] = [
        PairTag::AlphaHelix,
        PairTag::ThreeTenHelix,
        PairTag::Sheet,
        PairTag::Turn,
    ];

    pub fn kind(self) -> StructureKind {
        match self {
            PairTag::AlphaHelix | PairTag::ThreeTenHelix => StructureKind::Helix,
            PairTag::Sheet => StructureKind::Sheet,
            PairTag::Turn => StructureKind::Turn,
        }
    }

    pub fn subtype(self) -> StructureSubtype {
        match self {
            PairTag::AlphaHelix => StructureSubtype::Alpha,
            PairTag::ThreeTenHelix => StructureSubtype::ThreeTen,
            PairTag::Sheet | PairTag::Turn => StructureSubtype::Unspecified,
        }
    }

    /// Fewest residues a run of this tag must span to become a segment.
    pub fn min_length(self, settings: &StructureSettings) -> usize {
        match self {
            PairTag::AlphaHelix | PairTag::ThreeTenHelix => settings.min_helix_length,
            PairTag::Sheet => settings.min_sheet_length,
            PairTag::Turn => settings.min_turn_length,
        }
    }
}

impl fmt::Display for PairTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            PairTag::AlphaHelix => '4',
            PairTag::ThreeTenHelix => '3',
            PairTag::Sheet => 's',
            PairTag::Turn => 't',
        };
        write!(f, "{}", symbol)
    }
}

/// Tags a `(phi, psi)` pair; the helix window is tested first, then sheet,
/// then turn. NaN angles match nothing.
pub fn classify_pair(phi: f64, psi: f64, settings: &StructureSettings) -> Option<PairTag> {
    if settings.helix.contains(phi, psi) {
        if phi < settings.alpha_helix_phi_below && psi < settings.alpha_helix_psi_below {
            Some(PairTag::AlphaHelix)
        } else {
            Some(PairTag::ThreeTenHelix)
        }
    } else if settings.sheet.iter().any(|w| w.contains(phi, psi)) {
        Some(PairTag::Sheet)
    } else if settings.turn.contains(phi, psi) {
        Some(PairTag::Turn)
    } else {
        None
    }
}

/// Tags of every adjacent pair of a polymer's residues.
pub fn pair_tags(frame: &Frame, groups: &[usize], settings: &StructureSettings) -> Vec<Option<PairTag>> {
    groups
        .iter()
        .tuple_windows()
        .map(|(&leading, &trailing)| {
            let psi = frame.monomer(leading).map_or(f64::NAN, |m| m.psi());
            let phi = frame.monomer(trailing).map_or(f64::NAN, |m| m.phi());
            classify_pair(phi, psi, settings)
        })
        .collect()
}

/// A run of identically tagged pairs, as residue positions `first..=last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub tag: PairTag,
    pub first: usize,
    pub last: usize,
}

impl Segment {
    pub fn residue_count(&self) -> usize {
        self.last - self.first + 1
    }
}

/// Maximal runs of each tag long enough to count, in pass order.
///
/// A run over pairs `s..=e` covers residues `s..=e+1`.
pub fn find_segments(tags: &[Option<PairTag>], settings: &StructureSettings) -> Vec<Segment> {
    let runs: Vec<Segment> = tags
        .iter()
        .enumerate()
        .chunk_by(|(_, tag)| **tag)
        .into_iter()
        .filter_map(|(tag, run)| {
            let tag = tag?;
            let positions: Vec<usize> = run.map(|(i, _)| i).collect();
            Some(Segment {
                tag,
                first: *positions.first()?,
                last: *positions.last()? + 1,
            })
        })
        .filter(|segment| segment.residue_count() >= segment.tag.min_length(settings))
        .collect();

    PairTag::PASSES
        .iter()
        .flat_map(|&pass| runs.iter().filter(move |s| s.tag == pass).copied())
        .collect()
}
