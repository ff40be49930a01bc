use crate::core::utils::geometry::{best_fit_line, project_onto_line};
use nalgebra::{Point3, Vector3};
use std::cell::OnceCell;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StructureKind {
    Helix,
    Sheet,
    Turn,
    /// A declared range with no recognized kind.
    Annotation,
}

#[derive(Debug, Error)]
#[error("Invalid structure kind string")]
pub struct ParseStructureKindError;

impl FromStr for StructureKind {
    type Err = ParseStructureKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "helix" => Ok(StructureKind::Helix),
            "sheet" | "strand" => Ok(StructureKind::Sheet),
            "turn" => Ok(StructureKind::Turn),
            "annotation" | "none" => Ok(StructureKind::Annotation),
            _ => Err(ParseStructureKindError),
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                StructureKind::Helix => "Helix",
                StructureKind::Sheet => "Sheet",
                StructureKind::Turn => "Turn",
                StructureKind::Annotation => "Annotation",
            }
        )
    }
}

/// Finer classification of a structure; only helices use it today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StructureSubtype {
    #[default]
    Unspecified,
    /// i → i+4 helix.
    Alpha,
    /// i → i+3 helix.
    ThreeTen,
    /// i → i+5 helix.
    Pi,
}

impl FromStr for StructureSubtype {
    type Err = ParseStructureKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "unspecified" => Ok(StructureSubtype::Unspecified),
            "alpha" | "1" => Ok(StructureSubtype::Alpha),
            "3-10" | "310" | "3_10" | "5" => Ok(StructureSubtype::ThreeTen),
            "pi" | "3" => Ok(StructureSubtype::Pi),
            _ => Err(ParseStructureKindError),
        }
    }
}

/// Endpoints of a structure's axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Axis {
    pub fn vector(&self) -> Vector3<f64> {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.vector().norm()
    }
}

/// A secondary structure segment covering monomer positions `first..=last`
/// of one polymer.
#[derive(Debug, Clone, PartialEq)]
pub struct ProteinStructure {
    kind: StructureKind,
    subtype: StructureSubtype,
    strand_count: u32,
    first: usize,
    last: usize,
    declared: bool,
    axis: OnceCell<Option<Axis>>,
}

impl ProteinStructure {
    pub fn new(kind: StructureKind, subtype: StructureSubtype, first: usize, last: usize) -> Self {
        Self {
            kind,
            subtype,
            strand_count: 0,
            first,
            last,
            declared: false,
            axis: OnceCell::new(),
        }
    }

    pub(crate) fn declared(mut self, strand_count: u32) -> Self {
        self.declared = true;
        self.strand_count = strand_count;
        self
    }

    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    pub fn subtype(&self) -> StructureSubtype {
        self.subtype
    }

    pub fn strand_count(&self) -> u32 {
        self.strand_count
    }

    /// First monomer position in the polymer.
    pub fn first(&self) -> usize {
        self.first
    }

    /// Last monomer position in the polymer, inclusive.
    pub fn last(&self) -> usize {
        self.last
    }

    pub fn monomer_count(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn contains(&self, position: usize) -> bool {
        (self.first..=self.last).contains(&position)
    }

    /// Whether the structure came from an input annotation rather than geometry.
    pub fn is_declared(&self) -> bool {
        self.declared
    }

    pub(crate) fn set_span(&mut self, first: usize, last: usize) {
        if (first, last) != (self.first, self.last) {
            self.first = first;
            self.last = last;
            self.invalidate_axis();
        }
    }

    pub(crate) fn invalidate_axis(&mut self) {
        self.axis.take();
    }

    /// Axis of the structure given its polymer's lead midpoints.
    ///
    /// `midpoints` is only requested on the first call; the result is cached
    /// until the span changes.
    pub fn axis_with(&self, midpoints: impl FnOnce() -> Vec<Point3<f64>>) -> Option<Axis> {
        *self
            .axis
            .get_or_init(|| self.compute_axis(&midpoints()))
    }

    /// Helices fit a line through the midpoints of their residues and project
    /// the ends onto it; other kinds run from the first midpoint to the one
    /// following the last residue.
    fn compute_axis(&self, midpoints: &[Point3<f64>]) -> Option<Axis> {
        let segment = midpoints.get(self.first..=self.last + 1)?;
        let (first, last) = (segment.first()?, segment.last()?);
        match self.kind {
            StructureKind::Helix if segment.len() > 2 => {
                let (center, direction) = best_fit_line(segment)?;
                Some(Axis {
                    start: project_onto_line(first, &center, &direction),
                    end: project_onto_line(last, &center, &direction),
                })
            }
            _ => Some(Axis {
                start: *first,
                end: *last,
            }),
        }
    }
}
