use crate::core::bio::assembler::AssemblySettings;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Rectangular region of the Ramachandran plot, bounds inclusive, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AngleWindow {
    pub phi_min: f64,
    pub phi_max: f64,
    pub psi_min: f64,
    pub psi_max: f64,
}

impl AngleWindow {
    pub const fn new(phi_min: f64, phi_max: f64, psi_min: f64, psi_max: f64) -> Self {
        Self {
            phi_min,
            phi_max,
            psi_min,
            psi_max,
        }
    }

    /// NaN angles never fall inside a window.
    pub fn contains(&self, phi: f64, psi: f64) -> bool {
        (self.phi_min..=self.phi_max).contains(&phi) && (self.psi_min..=self.psi_max).contains(&psi)
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.phi_min > self.phi_max || self.psi_min > self.psi_max {
            return Err(ConfigError::InvalidValue {
                field,
                reason: format!("window bounds are inverted: {:?}", self),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StructureSettings {
    pub helix: AngleWindow,
    /// Helix positions with `phi` and `psi` both below these bounds are
    /// alpha (i → i+4); other helix positions are 3-10.
    pub alpha_helix_phi_below: f64,
    pub alpha_helix_psi_below: f64,
    pub sheet: Vec<AngleWindow>,
    pub turn: AngleWindow,
    pub min_helix_length: usize,
    pub min_sheet_length: usize,
    pub min_turn_length: usize,
    /// Use the input's declared structures for models that have any.
    pub prefer_declared_structures: bool,
}

impl Default for StructureSettings {
    fn default() -> Self {
        Self {
            helix: AngleWindow::new(-160.0, 0.0, -100.0, 45.0),
            alpha_helix_phi_below: 0.0,
            alpha_helix_psi_below: 25.0,
            sheet: vec![
                AngleWindow::new(-180.0, -10.0, 70.0, 180.0),
                AngleWindow::new(-180.0, -45.0, -180.0, -130.0),
                AngleWindow::new(140.0, 180.0, 90.0, 180.0),
            ],
            turn: AngleWindow::new(30.0, 90.0, -15.0, 95.0),
            min_helix_length: 4,
            min_sheet_length: 3,
            min_turn_length: 3,
            prefer_declared_structures: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HBondSettings {
    pub enabled: bool,
    /// Acceptors kept per donor residue; at most 2.
    pub max_per_residue: usize,
    /// CA–CA distance (Å) within which acceptor residues are considered.
    pub search_radius: f64,
    /// Largest O···H distance (Å) of an accepted bond.
    pub max_oh_distance: f64,
    /// Energy (cal/mol) an accepted bond must not exceed.
    pub max_energy: i32,
    /// Distance (Å) of a placed amide hydrogen from its nitrogen.
    pub amide_hydrogen_distance: f64,
    pub base_pairs: bool,
    /// Largest purine N1 to pyrimidine N3 distance (Å).
    pub base_pair_radius: f64,
    /// Largest distance (Å) of the pyrimidine N3 from the purine base plane.
    pub base_plane_tolerance: f64,
    /// Squared N9···N1 distance (Å²) below which two bases are stacked, not paired.
    pub stacking_distance_squared: f64,
}

impl Default for HBondSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_per_residue: 2,
            search_radius: 9.0,
            max_oh_distance: 3.0,
            max_energy: -500,
            amide_hydrogen_distance: 1.0,
            base_pairs: true,
            base_pair_radius: 5.0,
            base_plane_tolerance: 1.0,
            stacking_distance_squared: 50.0,
        }
    }
}

/// All tunables of the pipeline.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub assembly: AssemblySettings,
    pub structure: StructureSettings,
    pub hbond: HBondSettings,
}

impl Settings {
    /// Reads settings from a TOML file; missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<string>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content).map_err(|e| ConfigError::Toml {
            path: origin.to_string(),
            source: e,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("assembly.max_alpha_distance", self.assembly.max_alpha_distance)?;
        positive(
            "assembly.max_phosphorus_distance",
            self.assembly.max_phosphorus_distance,
        )?;

        let structure = &self.structure;
        structure.helix.validate("structure.helix")?;
        structure.turn.validate("structure.turn")?;
        for window in &structure.sheet {
            window.validate("structure.sheet")?;
        }
        for (field, length) in [
            ("structure.min_helix_length", structure.min_helix_length),
            ("structure.min_sheet_length", structure.min_sheet_length),
            ("structure.min_turn_length", structure.min_turn_length),
        ] {
            if length == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be at least 1".to_string(),
                });
            }
        }

        let hbond = &self.hbond;
        if hbond.max_per_residue > 2 {
            return Err(ConfigError::InvalidValue {
                field: "hbond.max_per_residue",
                reason: format!("{} exceeds the limit of 2", hbond.max_per_residue),
            });
        }
        positive("hbond.search_radius", hbond.search_radius)?;
        positive("hbond.max_oh_distance", hbond.max_oh_distance)?;
        positive("hbond.amide_hydrogen_distance", hbond.amide_hydrogen_distance)?;
        positive("hbond.base_pair_radius", hbond.base_pair_radius)?;
        positive("hbond.base_plane_tolerance", hbond.base_plane_tolerance)?;
        positive("hbond.stacking_distance_squared", hbond.stacking_distance_squared)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("{} is not a positive distance", value),
        })
    }
}

#[derive(Default)]
pub struct SettingsBuilder {
    check_connections: Option<bool>,
    max_alpha_distance: Option<f64>,
    max_phosphorus_distance: Option<f64>,
    prefer_declared_structures: Option<bool>,
    max_hbonds_per_residue: Option<usize>,
    hbonds: Option<bool>,
    base_pairs: Option<bool>,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_connections(mut self, check: bool) -> Self {
        self.check_connections = Some(check);
        self
    }
    pub fn max_alpha_distance(mut self, distance: f64) -> Self {
        self.max_alpha_distance = Some(distance);
        self
    }
    pub fn max_phosphorus_distance(mut self, distance: f64) -> Self {
        self.max_phosphorus_distance = Some(distance);
        self
    }
    pub fn prefer_declared_structures(mut self, prefer: bool) -> Self {
        self.prefer_declared_structures = Some(prefer);
        self
    }
    pub fn max_hbonds_per_residue(mut self, n: usize) -> Self {
        self.max_hbonds_per_residue = Some(n);
        self
    }
    pub fn hbonds(mut self, enabled: bool) -> Self {
        self.hbonds = Some(enabled);
        self
    }
    pub fn base_pairs(mut self, enabled: bool) -> Self {
        self.base_pairs = Some(enabled);
        self
    }

    pub fn build(self) -> Result<Settings, ConfigError> {
        let mut settings = Settings::default();
        if let Some(check) = self.check_connections {
            settings.assembly.check_connections = check;
        }
        if let Some(distance) = self.max_alpha_distance {
            settings.assembly.max_alpha_distance = distance;
        }
        if let Some(distance) = self.max_phosphorus_distance {
            settings.assembly.max_phosphorus_distance = distance;
        }
        if let Some(prefer) = self.prefer_declared_structures {
            settings.structure.prefer_declared_structures = prefer;
        }
        if let Some(n) = self.max_hbonds_per_residue {
            settings.hbond.max_per_residue = n;
        }
        if let Some(enabled) = self.hbonds {
            settings.hbond.enabled = enabled;
        }
        if let Some(enabled) = self.base_pairs {
            settings.hbond.base_pairs = enabled;
        }
        settings.validate()?;
        Ok(settings)
    }
}
