use crate::core::models::atom::AtomRole;
use phf::{Map, Set, phf_map, phf_set};
use std::borrow::Cow;

static ATOM_ROLES: Map<&'static str, AtomRole> = phf_map! {
    "N" => AtomRole::AmideNitrogen,
    "CA" => AtomRole::AlphaCarbon,
    "C" => AtomRole::CarbonylCarbon,
    "O5'" => AtomRole::O5Prime,
    "C5'" => AtomRole::C5Prime,
    "C4'" => AtomRole::C4Prime,
    "C3'" => AtomRole::C3Prime,
    "O3'" => AtomRole::O3Prime,
    "C2'" => AtomRole::C2Prime,
    "C1'" => AtomRole::C1Prime,
    "P" => AtomRole::Phosphorus,
    "OXT" => AtomRole::TerminalOxygen,
    "H" => AtomRole::AmideHydrogen,
    "O" => AtomRole::CarbonylOxygen,
    "O1" => AtomRole::CarbonylOxygenAlt,
    "O1P" => AtomRole::O1P,
    "OP1" => AtomRole::O1P,
    "O2P" => AtomRole::O2P,
    "OP2" => AtomRole::O2P,
    "O4'" => AtomRole::O4Prime,
    "O2'" => AtomRole::O2Prime,
    "N1" => AtomRole::N1,
    "C2" => AtomRole::C2,
    "N3" => AtomRole::N3,
    "C4" => AtomRole::C4,
    "C5" => AtomRole::C5,
    "C6" => AtomRole::C6,
    "O2" => AtomRole::O2,
    "N7" => AtomRole::N7,
    "C8" => AtomRole::C8,
    "N9" => AtomRole::N9,
    "N4" => AtomRole::N4,
    "N2" => AtomRole::N2,
    "N6" => AtomRole::N6,
    "C5M" => AtomRole::C5M,
    "C7" => AtomRole::C5M,
    "O6" => AtomRole::O6,
    "O4" => AtomRole::O4,
    "S4" => AtomRole::S4,
};

static CARBOHYDRATE_NAMES: Set<&'static str> = phf_set! {
    "AFL", "AGC", "AHR", "ARA", "ARB", "BDF", "BDR", "BGC", "BMA", "FCA",
    "FCB", "FRU", "FUC", "FUL", "GAL", "GLA", "GLB", "GLC", "GUP", "LXC",
    "MAN", "RAA", "RAM", "RIB", "RIP", "XYP", "XYS", "CBI", "CT3", "CTR",
    "CTT", "LAT", "MAB", "MAL", "MLR", "MTT", "SUC", "TRE", "ASF", "GCU",
    "MTL", "NAG", "NAM", "RHA", "SOR", "XYL",
};

static ONE_LETTER_CODES: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    "ASX" => 'B', "GLX" => 'Z', "SEC" => 'U', "PYL" => 'O',
    "HSD" => 'H', "HSE" => 'H', "HSP" => 'H', "HID" => 'H', "HIE" => 'H', "HIP" => 'H',
    "CYX" => 'C', "MSE" => 'M',
    "A" => 'A', "C" => 'C', "G" => 'G', "T" => 'T', "U" => 'U', "I" => 'I',
    "DA" => 'A', "DC" => 'C', "DG" => 'G', "DT" => 'T', "DU" => 'U', "DI" => 'I',
    "ADE" => 'A', "CYT" => 'C', "GUA" => 'G', "THY" => 'T', "URA" => 'U',
    "+A" => 'A', "+C" => 'C', "+G" => 'G', "+T" => 'T', "+U" => 'U', "+I" => 'I',
};

/// Maps an atom name onto its distinguishing role.
///
/// The legacy `*` prime notation is normalized to `'` before the lookup.
pub fn role_for_atom_name(atom_name: &str) -> Option<AtomRole> {
    let trimmed = atom_name.trim();
    let name: Cow<'_, str> = if trimmed.contains('*') {
        Cow::Owned(trimmed.replace('*', "'"))
    } else {
        Cow::Borrowed(trimmed)
    };
    ATOM_ROLES.get(name.as_ref()).copied()
}

pub fn is_carbohydrate(group3: &str) -> bool {
    CARBOHYDRATE_NAMES.contains(group3.trim())
}

pub fn is_proline(group3: &str) -> bool {
    group3.trim().eq_ignore_ascii_case("PRO")
}

/// One-letter code of a residue name, case-insensitive; `?` when unknown.
pub fn one_letter_code(group3: &str) -> char {
    let trimmed = group3.trim();
    if let Some(code) = ONE_LETTER_CODES.get(trimmed) {
        return *code;
    }
    let upper = trimmed.to_ascii_uppercase();
    ONE_LETTER_CODES.get(upper.as_str()).copied().unwrap_or('?')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_for_atom_name_recognizes_backbone_and_sugar_atoms() {
        assert_eq!(role_for_atom_name("N"), Some(AtomRole::AmideNitrogen));
        assert_eq!(role_for_atom_name("CA"), Some(AtomRole::AlphaCarbon));
        assert_eq!(role_for_atom_name("P"), Some(AtomRole::Phosphorus));
        assert_eq!(role_for_atom_name("C4'"), Some(AtomRole::C4Prime));
        assert_eq!(role_for_atom_name("OP1"), Some(AtomRole::O1P));
    }

    #[test]
    fn role_for_atom_name_trims_and_normalizes_stars() {
        assert_eq!(role_for_atom_name(" CA "), Some(AtomRole::AlphaCarbon));
        assert_eq!(role_for_atom_name("O3*"), Some(AtomRole::O3Prime));
        assert_eq!(role_for_atom_name("ca"), None);
        assert_eq!(role_for_atom_name("CB"), None);
        assert_eq!(role_for_atom_name(""), None);
    }

    #[test]
    fn carbohydrate_table_matches_known_sugars() {
        assert!(is_carbohydrate("GLC"));
        assert!(is_carbohydrate("NAG"));
        assert!(is_carbohydrate(" MAN"));
        assert!(!is_carbohydrate("ALA"));
        assert!(!is_carbohydrate("HOH"));
    }

    #[test]
    fn one_letter_code_covers_amino_acids_and_nucleotides() {
        assert_eq!(one_letter_code("ALA"), 'A');
        assert_eq!(one_letter_code("trp"), 'W');
        assert_eq!(one_letter_code("DG"), 'G');
        assert_eq!(one_letter_code("U"), 'U');
        assert_eq!(one_letter_code("HOH"), '?');
    }

    #[test]
    fn is_proline_is_case_insensitive() {
        assert!(is_proline("PRO"));
        assert!(is_proline("pro"));
        assert!(!is_proline("PHE"));
    }
}
