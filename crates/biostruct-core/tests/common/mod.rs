#![allow(dead_code)]

use biostruct::core::io::records::AtomRecord;
use biostruct::core::io::traits::RecordSet;
use nalgebra::{Point3, Vector3};

pub const BACKBONE: [&str; 4] = ["N", "CA", "C", "O"];

pub const ALPHA_PHI: f64 = -57.0;
pub const ALPHA_PSI: f64 = -47.0;
pub const STRAND_PHI: f64 = -120.0;
pub const STRAND_PSI: f64 = 130.0;

/// Places `d` so that |cd| = `bond`, angle bcd = `angle` and torsion abcd =
/// `torsion` (degrees).
pub fn place(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    bond: f64,
    angle: f64,
    torsion: f64,
) -> Point3<f64> {
    let bc = (c - b).normalize();
    let n = (b - a).cross(&bc).normalize();
    let m = n.cross(&bc);
    let (angle, torsion) = (angle.to_radians(), torsion.to_radians());
    c + bc * (-bond * angle.cos())
        + m * (bond * angle.sin() * torsion.cos())
        + n * (bond * angle.sin() * torsion.sin())
}

/// Ideal N, CA, C, O coordinates of `count` residues with constant phi and psi.
pub fn backbone(count: usize, phi: f64, psi: f64, offset: Vector3<f64>) -> Vec<[Point3<f64>; 4]> {
    let angle = 111.2f64.to_radians();
    let mut n = Point3::new(1.458 * angle.cos(), 1.458 * angle.sin(), 0.0);
    let mut ca = Point3::origin();
    let mut c = Point3::new(1.525, 0.0, 0.0);
    let mut residues = Vec::with_capacity(count);
    for i in 0..count {
        if i > 0 {
            let next_n = place(&n, &ca, &c, 1.329, 116.2, psi);
            let next_ca = place(&ca, &c, &next_n, 1.458, 121.7, 180.0);
            let next_c = place(&c, &next_n, &next_ca, 1.525, 111.2, phi);
            (n, ca, c) = (next_n, next_ca, next_c);
        }
        let o = place(&n, &ca, &c, 1.231, 120.5, psi + 180.0);
        residues.push([n + offset, ca + offset, c + offset, o + offset]);
    }
    residues
}

/// Appends a peptide to `set`, numbering residues from 1 and atoms from
/// `first_id`. Backbone bonds are added inside each residue and between
/// neighbours, except after the positions listed in `breaks`.
pub fn push_peptide(
    set: &mut RecordSet,
    chain: char,
    names: &[&str],
    coords: &[[Point3<f64>; 4]],
    first_id: u64,
    breaks: &[usize],
) {
    for (i, (name, atoms)) in names.iter().zip(coords).enumerate() {
        let base = first_id + 4 * i as u64;
        for (k, (atom, position)) in BACKBONE.iter().zip(atoms).enumerate() {
            set.push_atom(AtomRecord {
                atom_name: atom.to_string(),
                element: atom[..1].to_string(),
                chain_id: chain,
                group3: name.to_string(),
                sequence_number: i as i32 + 1,
                unique_id: base + k as u64,
                position: *position,
                ..AtomRecord::default()
            });
        }
        set.push_bond(base, base + 1, 1)
            .push_bond(base + 1, base + 2, 1)
            .push_bond(base + 2, base + 3, 2);
        if i > 0 && !breaks.contains(&(i - 1)) {
            set.push_bond(base - 2, base, 1);
        }
    }
}

pub fn helix(count: usize) -> RecordSet {
    let mut set = RecordSet::new();
    let names = vec!["ALA"; count];
    let coords = backbone(count, ALPHA_PHI, ALPHA_PSI, Vector3::zeros());
    push_peptide(&mut set, 'A', &names, &coords, 0, &[]);
    set
}

/// A guanine in chain `A` facing a cytosine in chain `B` in one plane.
pub fn guanine_cytosine() -> RecordSet {
    let mut set = RecordSet::new();
    let guanine: [(&str, [f64; 3]); 12] = [
        ("O5'", [-4.0, 0.0, -1.0]),
        ("C5'", [-3.5, 0.5, -1.5]),
        ("C4'", [-3.0, 0.0, -2.0]),
        ("C3'", [-2.5, 0.5, -2.5]),
        ("O3'", [-2.0, 0.0, -3.0]),
        ("C2'", [-1.5, 0.5, -2.0]),
        ("C1'", [-1.0, 0.0, -1.0]),
        ("N9", [0.0, 0.0, 0.0]),
        ("N3", [1.2, 1.0, 0.0]),
        ("N1", [3.0, 0.5, 0.0]),
        ("N2", [3.0, 2.0, 0.0]),
        ("O6", [3.5, -1.0, 0.0]),
    ];
    let cytosine: [(&str, [f64; 3]); 11] = [
        ("O5'", [13.0, 0.0, -1.0]),
        ("C5'", [12.5, 0.5, -1.5]),
        ("C4'", [12.0, 0.0, -2.0]),
        ("C3'", [11.5, 0.5, -2.5]),
        ("O3'", [11.0, 0.0, -3.0]),
        ("C2'", [10.5, 0.5, -2.0]),
        ("C1'", [9.5, 0.0, -1.0]),
        ("N3", [5.9, 0.5, 0.0]),
        ("N1", [8.5, 0.5, 0.0]),
        ("O2", [5.9, 2.0, 0.0]),
        ("N4", [6.3, -1.0, 0.0]),
    ];
    for (chain, name, atoms, first_id) in [
        ('A', "DG", &guanine[..], 0u64),
        ('B', "DC", &cytosine[..], 100u64),
    ] {
        for (k, (atom, p)) in atoms.iter().enumerate() {
            set.push_atom(AtomRecord {
                atom_name: atom.to_string(),
                element: atom[..1].to_string(),
                chain_id: chain,
                group3: name.to_string(),
                sequence_number: 1,
                unique_id: first_id + k as u64,
                position: Point3::new(p[0], p[1], p[2]),
                ..AtomRecord::default()
            });
        }
    }
    set
}
