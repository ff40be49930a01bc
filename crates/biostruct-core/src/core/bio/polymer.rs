use super::monomer::{Monomer, MonomerKind, MonomerType};
use super::structure::ProteinStructure;
use crate::core::models::atom::AtomRole;
use crate::core::models::frame::Frame;
use crate::core::models::ids::ChainId;
use nalgebra::{Point3, Vector3};

/// Ordered, connected run of same-type monomers from one chain.
#[derive(Debug, Clone, PartialEq)]
pub struct BioPolymer {
    pub(crate) monomer_type: MonomerType,
    pub(crate) model_index: usize,
    pub(crate) chain: ChainId,
    /// Group indices of the member monomers, in chain order.
    pub(crate) groups: Vec<usize>,
    pub(crate) structures: Vec<ProteinStructure>,
}

/// Backbone trace points handed to renderers.
///
/// All three vectors hold `monomer_count + 1` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadGeometry {
    pub lead_points: Vec<Point3<f64>>,
    pub midpoints: Vec<Point3<f64>>,
    pub wing_vectors: Vec<Vector3<f64>>,
}

impl BioPolymer {
    pub(crate) fn new(
        monomer_type: MonomerType,
        model_index: usize,
        chain: ChainId,
        groups: Vec<usize>,
    ) -> Self {
        Self {
            monomer_type,
            model_index,
            chain,
            groups,
            structures: Vec::new(),
        }
    }

    pub fn monomer_type(&self) -> MonomerType {
        self.monomer_type
    }

    pub fn model_index(&self) -> usize {
        self.model_index
    }

    pub fn chain(&self) -> ChainId {
        self.chain
    }

    pub fn groups(&self) -> &[usize] {
        &self.groups
    }

    pub fn monomer_count(&self) -> usize {
        self.groups.len()
    }

    pub fn structures(&self) -> &[ProteinStructure] {
        &self.structures
    }

    /// Group index of the monomer at `position`.
    pub fn group_at(&self, position: usize) -> Option<usize> {
        self.groups.get(position).copied()
    }

    /// Secondary structure is only computed for protein backbones.
    pub fn is_protein(&self) -> bool {
        matches!(self.monomer_type, MonomerType::Amino | MonomerType::Alpha)
    }

    pub(crate) fn monomers<'a>(&'a self, frame: &'a Frame) -> impl Iterator<Item = &'a Monomer> + 'a {
        self.groups
            .iter()
            .filter_map(move |&g| frame.groups.get(g).and_then(|group| group.monomer()))
    }

    /// One-letter sequence of the polymer; `?` marks unknown residues.
    pub fn sequence(&self, frame: &Frame) -> String {
        self.groups
            .iter()
            .map(|&g| frame.groups.get(g).map_or('?', |group| group.group1()))
            .collect()
    }

    /// Lead atom index of every monomer, in polymer order.
    pub fn lead_atoms(&self, frame: &Frame) -> Vec<usize> {
        self.monomers(frame).map(Monomer::lead_atom).collect()
    }

    /// Whether every monomer has a wing atom.
    pub fn has_wing_points(&self, frame: &Frame) -> bool {
        !self.groups.is_empty() && self.monomers(frame).all(|m| m.wing_atom().is_some())
    }

    /// Whether any nucleotide carries a 2' oxygen.
    pub fn is_rna(&self, frame: &Frame) -> bool {
        self.monomers(frame)
            .filter_map(Monomer::nucleic)
            .any(|n| n.is_rna())
    }

    /// Lead points, lead midpoints and wing vectors of the polymer.
    ///
    /// Midpoint `i` lies halfway between lead points `i - 1` and `i`; the first
    /// and last entries are the initiator and terminator atoms. Successive wing
    /// vectors are flipped to stay within 90 degrees of each other.
    pub fn lead_midpoints_and_wing_vectors(&self, frame: &Frame) -> LeadGeometry {
        let store = frame.store();
        let monomers: Vec<&Monomer> = self.monomers(frame).collect();
        let count = monomers.len();
        let point = |index: usize| store.position(index).unwrap_or_else(Point3::origin);
        if count == 0 {
            return LeadGeometry {
                lead_points: Vec::new(),
                midpoints: Vec::new(),
                wing_vectors: Vec::new(),
            };
        }

        let mut lead_points = Vec::with_capacity(count + 1);
        let mut midpoints = Vec::with_capacity(count + 1);
        let mut wing_vectors = vec![Vector3::x(); count + 1];
        let has_wing_points = self.has_wing_points(frame);

        lead_points.push(point(monomers[0].lead_atom()));
        midpoints.push(point(initiator_atom(monomers[0])));
        let mut previous_d: Option<Vector3<f64>> = None;
        for i in 1..count {
            let lead_prev = lead_points[i - 1];
            let lead = point(monomers[i].lead_atom());
            lead_points.push(lead);
            midpoints.push(Point3::from((lead.coords + lead_prev.coords) * 0.5));

            if has_wing_points {
                let wing_prev = monomers[i - 1]
                    .wing_atom()
                    .map_or(lead_prev, |w| point(w));
                let a = lead - lead_prev;
                let b = lead_prev - wing_prev;
                let c = a.cross(&b);
                let d = a.cross(&c).try_normalize(f64::EPSILON).unwrap_or_else(Vector3::x);
                let d = flip_to_follow(d, previous_d);
                previous_d = Some(d);
                wing_vectors[i] = d;
            }
        }
        let terminator = point(terminator_atom(monomers[count - 1]));
        lead_points.push(terminator);
        midpoints.push(terminator);

        if !has_wing_points && count >= 3 {
            let mut previous_c: Option<Vector3<f64>> = None;
            for i in 1..count {
                let a = midpoints[i] - lead_points[i];
                let b = lead_points[i] - midpoints[i + 1];
                let c = a.cross(&b).try_normalize(f64::EPSILON).unwrap_or_else(Vector3::x);
                let c = flip_to_follow(c, previous_c);
                previous_c = Some(c);
                wing_vectors[i] = c;
            }
        }
        if count > 1 {
            wing_vectors[0] = wing_vectors[1];
            wing_vectors[count] = wing_vectors[count - 1];
        }

        LeadGeometry {
            lead_points,
            midpoints,
            wing_vectors,
        }
    }
}

fn flip_to_follow(vector: Vector3<f64>, previous: Option<Vector3<f64>>) -> Vector3<f64> {
    match previous {
        Some(prev) if prev.dot(&vector) < 0.0 => -vector,
        _ => vector,
    }
}

/// Atom where the backbone trace of a polymer starts.
fn initiator_atom(monomer: &Monomer) -> usize {
    let role = match monomer.kind() {
        MonomerKind::Amino(_) => Some(AtomRole::AmideNitrogen),
        MonomerKind::Nucleic(_) => Some(AtomRole::O5Prime),
        _ => None,
    };
    role.and_then(|r| monomer.atom(r))
        .unwrap_or_else(|| monomer.lead_atom())
}

/// Atom where the backbone trace of a polymer ends.
fn terminator_atom(monomer: &Monomer) -> usize {
    let roles: &[AtomRole] = match monomer.kind() {
        MonomerKind::Amino(_) => &[AtomRole::TerminalOxygen, AtomRole::CarbonylCarbon],
        MonomerKind::Nucleic(_) => &[AtomRole::O3Prime],
        _ => &[],
    };
    roles
        .iter()
        .find_map(|&r| monomer.atom(r))
        .unwrap_or_else(|| monomer.lead_atom())
}
