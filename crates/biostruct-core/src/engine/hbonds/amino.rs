use super::model_polymers;
use crate::core::bio::monomer::{AminoResidue, MonomerType};
use crate::core::models::frame::Frame;
use crate::core::models::topology::{HBond, HBondKind};
use crate::core::utils::geometry::calculate_hn_position;
use crate::core::utils::identifiers::is_proline;
use crate::engine::config::HBondSettings;
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Point3;
use tracing::trace;

/// Partial-charge product of the backbone dipoles, in cal/mol·Å.
const Q: f64 = -332.0 * 0.42 * 0.2 * 1000.0;
const MIN_DISTANCE_SQUARED: f64 = 0.25;
const ENERGY_FLOOR: i32 = -9900;

/// Electrostatic energy (cal/mol) of an N-H···O=C interaction.
///
/// Returns `None` when two of the atoms nearly coincide or the energy falls
/// below the physical floor.
pub fn hbond_energy(
    nitrogen: &Point3<f64>,
    hydrogen: &Point3<f64>,
    carbon: &Point3<f64>,
    oxygen: &Point3<f64>,
) -> Option<i32> {
    let d_on2 = (oxygen - nitrogen).norm_squared();
    let d_oh2 = (oxygen - hydrogen).norm_squared();
    let d_ch2 = (carbon - hydrogen).norm_squared();
    let d_cn2 = (carbon - nitrogen).norm_squared();
    if [d_on2, d_oh2, d_ch2, d_cn2]
        .iter()
        .any(|&d2| d2 < MIN_DISTANCE_SQUARED)
    {
        return None;
    }
    let (d_on, d_oh, d_ch, d_cn) = (d_on2.sqrt(), d_oh2.sqrt(), d_ch2.sqrt(), d_cn2.sqrt());
    let energy = (Q / d_oh - Q / d_ch + Q / d_cn - Q / d_on) as i32;
    (energy >= ENERGY_FLOOR).then_some(energy)
}

#[derive(Debug, Clone, Copy)]
struct Donor {
    polymer: usize,
    position: usize,
    nitrogen: usize,
    n: Point3<f64>,
    h: Point3<f64>,
    ca: Point3<f64>,
}

#[derive(Debug, Clone, Copy)]
struct Acceptor {
    polymer: usize,
    position: usize,
    oxygen: usize,
    o: Point3<f64>,
    c: Point3<f64>,
    ca: Point3<f64>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    acceptor: usize,
    energy: i32,
}

/// Keeps the two lowest energies seen; on ties the earlier candidate stays.
#[derive(Debug, Default)]
struct LowestTwo {
    best: [Option<Candidate>; 2],
}

impl LowestTwo {
    fn offer(&mut self, candidate: Candidate) {
        let beats = |slot: &Option<Candidate>| slot.is_none_or(|c| candidate.energy < c.energy);
        if beats(&self.best[0]) {
            self.best[1] = self.best[0];
            self.best[0] = Some(candidate);
        } else if beats(&self.best[1]) {
            self.best[1] = Some(candidate);
        }
    }

    fn kept(self) -> impl Iterator<Item = Candidate> {
        self.best.into_iter().flatten()
    }
}

fn amino_at<'a>(frame: &'a Frame, group_index: usize) -> Option<&'a AminoResidue> {
    frame.monomer(group_index)?.amino()
}

/// Backbone hydrogen bonds of every amino polymer in one model.
///
/// Donors are all residues but the first of each polymer, prolines
/// excepted. The amide hydrogen is taken from the residue when present and
/// placed on the bisector opposite N→CA and N→C(i-1) otherwise. Acceptors
/// are carbonyl oxygens of residues whose CA lies within the search radius of
/// the donor CA; within one polymer the donor itself and its two neighbours
/// are excluded.
pub fn backbone_hbonds(frame: &Frame, model_index: usize, settings: &HBondSettings) -> Vec<HBond> {
    let polymers = model_polymers(frame, model_index, MonomerType::Amino);
    let store = frame.store();
    let pos = |index: Option<usize>| index.and_then(|i| store.position(i));

    let mut donors = Vec::new();
    let mut acceptors = Vec::new();
    for (p, polymer) in polymers.iter().enumerate() {
        for (position, &group_index) in polymer.groups().iter().enumerate() {
            let Some(amino) = amino_at(frame, group_index) else {
                continue;
            };
            let ca = pos(amino.alpha_carbon());
            if let (Some(oxygen), Some(o), Some(c), Some(ca)) = (
                amino.carbonyl_oxygen(),
                pos(amino.carbonyl_oxygen()),
                pos(amino.carbonyl_carbon()),
                ca,
            ) {
                acceptors.push(Acceptor {
                    polymer: p,
                    position,
                    oxygen,
                    o,
                    c,
                    ca,
                });
            }

            if position == 0 || frame.group(group_index).is_some_and(|g| is_proline(&g.name)) {
                continue;
            }
            let (Some(nitrogen), Some(n), Some(ca)) = (amino.nitrogen(), pos(amino.nitrogen()), ca)
            else {
                continue;
            };
            let h = pos(amino.explicit_hydrogen()).or_else(|| {
                let previous = polymer
                    .group_at(position - 1)
                    .and_then(|g| amino_at(frame, g))?;
                let prev_c = pos(previous.carbonyl_carbon())?;
                Some(calculate_hn_position(
                    &n,
                    &ca,
                    &prev_c,
                    settings.amide_hydrogen_distance,
                ))
            });
            let Some(h) = h else {
                continue;
            };
            donors.push(Donor {
                polymer: p,
                position,
                nitrogen,
                n,
                h,
                ca,
            });
        }
    }
    if donors.is_empty() || acceptors.is_empty() || settings.max_per_residue == 0 {
        return Vec::new();
    }

    let mut tree: KdTree<f64, 3> = KdTree::new();
    for (index, acceptor) in acceptors.iter().enumerate() {
        tree.add(&[acceptor.ca.x, acceptor.ca.y, acceptor.ca.z], index as u64);
    }
    let radius_sq = settings.search_radius * settings.search_radius;

    let mut bonds = Vec::new();
    for donor in &donors {
        let mut nearby: Vec<usize> = tree
            .within::<SquaredEuclidean>(&[donor.ca.x, donor.ca.y, donor.ca.z], radius_sq)
            .into_iter()
            .filter(|neighbour| neighbour.distance < radius_sq)
            .map(|neighbour| neighbour.item as usize)
            .collect();
        nearby.sort_unstable();

        let mut lowest = LowestTwo::default();
        for index in nearby {
            let acceptor = &acceptors[index];
            if acceptor.polymer == donor.polymer && acceptor.position.abs_diff(donor.position) <= 1 {
                continue;
            }
            let Some(energy) = hbond_energy(&donor.n, &donor.h, &acceptor.c, &acceptor.o) else {
                continue;
            };
            let d_cn = (acceptor.c - donor.n).norm();
            let d_ch = (acceptor.c - donor.h).norm();
            let d_oh = (acceptor.o - donor.h).norm();
            if d_cn > d_ch && d_oh <= settings.max_oh_distance && energy <= settings.max_energy {
                lowest.offer(Candidate {
                    acceptor: index,
                    energy,
                });
            }
        }

        for candidate in lowest.kept().take(settings.max_per_residue) {
            let acceptor = &acceptors[candidate.acceptor];
            let kind = if acceptor.polymer == donor.polymer {
                HBondKind::from_offset(donor.position as i64 - acceptor.position as i64)
            } else {
                HBondKind::Calc
            };
            trace!(
                donor = donor.nitrogen,
                acceptor = acceptor.oxygen,
                energy = candidate.energy,
                "Backbone hydrogen bond."
            );
            bonds.push(HBond::new(
                donor.nitrogen,
                acceptor.oxygen,
                kind,
                candidate.energy as f64 / 1000.0,
            ));
        }
    }
    bonds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bio::assembler::{AssemblySettings, assemble};
    use crate::core::io::records::AtomRecord;
    use crate::core::io::traits::RecordSet;
    use crate::core::models::builder::FrameBuilder;

    fn residue(set: &mut RecordSet, seq: i32, name: &str, atoms: &[(&str, [f64; 3])]) {
        for (k, (atom, p)) in atoms.iter().enumerate() {
            set.push_atom(AtomRecord {
                atom_name: atom.to_string(),
                element: atom[..1].to_string(),
                group3: name.into(),
                sequence_number: seq,
                unique_id: seq as u64 * 10 + k as u64,
                position: Point3::new(p[0], p[1], p[2]),
                ..AtomRecord::default()
            });
        }
    }

    /// Residue 3 donates to the carbonyl of residue 0; residues 1 and 2 sit
    /// far away.
    fn hairpin(donor_name: &str) -> Frame {
        let mut set = RecordSet::new();
        residue(
            &mut set,
            0,
            "ALA",
            &[
                ("N", [6.0, 2.0, 0.0]),
                ("CA", [5.0, 1.0, 0.0]),
                ("C", [4.1, 0.0, 0.0]),
                ("O", [2.9, 0.0, 0.0]),
            ],
        );
        for seq in 1..3 {
            let z = 20.0 + seq as f64 * 3.8;
            residue(
                &mut set,
                seq,
                "GLY",
                &[
                    ("N", [0.0, 0.0, z]),
                    ("CA", [1.0, 1.0, z]),
                    ("C", [2.0, 0.0, z]),
                    ("O", [2.0, -1.2, z]),
                ],
            );
        }
        residue(
            &mut set,
            3,
            donor_name,
            &[
                ("N", [0.0, 0.0, 0.0]),
                ("CA", [-1.0, 1.0, 0.0]),
                ("C", [-2.0, 0.0, 0.0]),
                ("O", [-2.0, -1.2, 0.0]),
                ("H", [1.0, 0.0, 0.0]),
            ],
        );
        let mut frame = FrameBuilder::new().load(&set).unwrap();
        let settings = AssemblySettings {
            check_connections: false,
            ..AssemblySettings::default()
        };
        assemble(&mut frame, &settings);
        frame
    }

    #[test]
    fn energy_of_a_linear_hydrogen_bond() {
        let energy = hbond_energy(
            &Point3::origin(),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(4.1, 0.0, 0.0),
            &Point3::new(2.9, 0.0, 0.0),
        )
        .unwrap();
        let expected = Q * (1.0 / 1.9 - 1.0 / 3.1 + 1.0 / 4.1 - 1.0 / 2.9);
        assert_eq!(energy, expected as i32);
        assert!(energy < -2000);
    }

    #[test]
    fn near_coincident_atoms_are_rejected() {
        let n = Point3::origin();
        let h = Point3::new(1.0, 0.0, 0.0);
        assert!(hbond_energy(&n, &h, &Point3::new(3.0, 0.0, 0.0), &Point3::new(1.2, 0.0, 0.0)).is_none());
    }

    #[test]
    fn lowest_two_keeps_the_first_of_equal_energies() {
        let mut lowest = LowestTwo::default();
        for (acceptor, energy) in [(0, -900), (1, -1200), (2, -900), (3, -600)] {
            lowest.offer(Candidate { acceptor, energy });
        }
        let kept: Vec<_> = lowest.kept().map(|c| c.acceptor).collect();
        assert_eq!(kept, vec![1, 0]);
    }

    #[test]
    fn donor_bonds_to_residue_three_back() {
        let frame = hairpin("ALA");
        let bonds = backbone_hbonds(&frame, 0, &HBondSettings::default());
        assert_eq!(bonds.len(), 1);
        let bond = bonds[0];
        assert_eq!(bond.donor, 12);
        assert_eq!(bond.acceptor, 3);
        assert_eq!(bond.kind, HBondKind::Plus3);
        assert!(bond.energy < -2.0);
    }

    #[test]
    fn proline_never_donates() {
        let frame = hairpin("PRO");
        assert!(backbone_hbonds(&frame, 0, &HBondSettings::default()).is_empty());
    }

    #[test]
    fn zero_bonds_per_residue_disables_the_pass() {
        let frame = hairpin("ALA");
        let settings = HBondSettings {
            max_per_residue: 0,
            ..HBondSettings::default()
        };
        assert!(backbone_hbonds(&frame, 0, &settings).is_empty());
    }
}
