use crate::core::bio::monomer::MonomerType;
use crate::core::models::frame::Frame;
use crate::core::utils::geometry::torsion_angle;
use nalgebra::Point3;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Backbone {
    n: Option<Point3<f64>>,
    ca: Option<Point3<f64>>,
    c: Option<Point3<f64>>,
}

#[derive(Debug, Clone, Copy)]
struct Dihedrals {
    phi: f64,
    psi: f64,
    omega: f64,
}

impl Default for Dihedrals {
    fn default() -> Self {
        Self {
            phi: f64::NAN,
            psi: f64::NAN,
            omega: f64::NAN,
        }
    }
}

fn torsion(
    a: Option<Point3<f64>>,
    b: Option<Point3<f64>>,
    c: Option<Point3<f64>>,
    d: Option<Point3<f64>>,
) -> f64 {
    match (a, b, c, d) {
        (Some(a), Some(b), Some(c), Some(d)) => torsion_angle(&a, &b, &c, &d),
        _ => f64::NAN,
    }
}

fn backbone(frame: &Frame, group_index: usize) -> Option<Backbone> {
    let amino = frame.monomer(group_index)?.amino()?;
    let store = frame.store();
    Some(Backbone {
        n: amino.nitrogen().and_then(|i| store.position(i)),
        ca: amino.alpha_carbon().and_then(|i| store.position(i)),
        c: amino.carbonyl_carbon().and_then(|i| store.position(i)),
    })
}

/// Backbone dihedrals of one polymer, indexed by monomer position.
///
/// For each adjacent pair `(i, i+1)`: `psi[i]` is N-CA-C-N', `phi[i+1]` is
/// C-N'-CA'-C' and `omega[i]` is CA-C-N'-CA'. The first `phi` and the last
/// `psi` and `omega` stay NaN.
fn polymer_dihedrals(frame: &Frame, groups: &[usize]) -> Vec<Dihedrals> {
    let chain: Vec<Option<Backbone>> = groups.iter().map(|&g| backbone(frame, g)).collect();
    let mut angles = vec![Dihedrals::default(); groups.len()];
    for i in 0..chain.len().saturating_sub(1) {
        let (Some(a), Some(b)) = (chain[i], chain[i + 1]) else {
            continue;
        };
        angles[i].psi = torsion(a.n, a.ca, a.c, b.n);
        angles[i].omega = torsion(a.ca, a.c, b.n, b.ca);
        angles[i + 1].phi = torsion(a.c, b.n, b.ca, b.c);
    }
    angles
}

/// Computes phi, psi and omega for every amino polymer of the frame.
///
/// # Return
///
/// Returns the number of residues with at least one defined angle.
#[instrument(skip_all, name = "dihedral_task")]
pub fn compute(frame: &mut Frame) -> usize {
    let polymers: Vec<Vec<usize>> = (0..frame.models().len())
        .flat_map(|model| {
            frame
                .polymers_in_model(model)
                .filter(|(_, p)| p.monomer_type() == MonomerType::Amino)
                .map(|(_, p)| p.groups().to_vec())
                .collect::<Vec<_>>()
        })
        .collect();

    let mut defined = 0;
    for groups in polymers {
        let angles = polymer_dihedrals(frame, &groups);
        for (&group_index, angle) in groups.iter().zip(angles) {
            let Some(amino) = frame.groups[group_index]
                .monomer_mut()
                .and_then(|m| m.amino_mut())
            else {
                continue;
            };
            amino.phi = angle.phi;
            amino.psi = angle.psi;
            amino.omega = angle.omega;
            if !angle.phi.is_nan() || !angle.psi.is_nan() {
                defined += 1;
            }
        }
    }
    debug!(residues = defined, "Computed backbone dihedrals.");
    defined
}
