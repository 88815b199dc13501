//! TOML description of a propagation scenario.
//!
//! Every section is optional and falls back to the defaults of
//! [`PmnsEngine::new`] and zero NSI:
//! ```toml
//! energy = 2.5          # GeV
//! nubar = false
//!
//! [mixing]              # angles and phase in radians, splittings in eV^2
//! theta12 = 0.5836
//! dm31 = 2.517e-3
//!
//! [path]
//! length = 1300.0       # km
//! density = 2.848       # g/cm^3
//! zoa = 0.5
//!
//! [nsi]
//! eps_ee = 0.1
//! eps_emu = 0.05
//! delta_emu = 1.57
//! ```

use std::{ fs, path::Path };
use serde::{ Deserialize, Serialize };
use thiserror::Error;
use crate::{
    engine::{ MixingParams, NuPath, PmnsEngine },
    hamiltonians::HBuilderNsi,
    nsi::NsiParams,
};

/// Errors from reading or validating a [`ScenarioConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("neutrino energy must be positive, got {0} GeV")]
    Energy(f64),
    #[error("matter density must be non-negative, got {0} g/cm^3")]
    Density(f64),
    #[error("electron fraction must lie in [0, 1], got {0}")]
    ElectronFraction(f64),
}

fn def_energy() -> f64 { 1.0 }

/// A full propagation scenario: engine state plus NSI couplings.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Neutrino energy [GeV].
    #[serde(default = "def_energy")]
    pub energy: f64,
    /// Propagate antineutrinos.
    #[serde(default)]
    pub nubar: bool,
    #[serde(default)]
    pub mixing: MixingParams,
    #[serde(default)]
    pub path: NuPath,
    #[serde(default)]
    pub nsi: NsiParams,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            energy: def_energy(),
            nubar: false,
            mixing: MixingParams::default(),
            path: NuPath::default(),
            nsi: NsiParams::default(),
        }
    }
}

impl ScenarioConfig {
    /// Parse and validate a scenario from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a scenario from a TOML file.
    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where P: AsRef<Path>
    {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Check that the physical inputs make sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.energy > 0.0) {
            return Err(ConfigError::Energy(self.energy));
        }
        if !(self.path.density >= 0.0) {
            return Err(ConfigError::Density(self.path.density));
        }
        if !(0.0..=1.0).contains(&self.path.zoa) {
            return Err(ConfigError::ElectronFraction(self.path.zoa));
        }
        Ok(())
    }

    /// Construct an engine in the described state.
    pub fn engine(&self) -> PmnsEngine {
        let mut engine = PmnsEngine::with_mixing(self.mixing);
        engine.set_energy(self.energy);
        engine.set_is_nubar(self.nubar);
        engine.set_path(self.path);
        engine
    }

    /// Validate, then construct an NSI Hamiltonian builder in the described
    /// state.
    pub fn build(&self) -> Result<HBuilderNsi<PmnsEngine>, ConfigError> {
        self.validate()?;
        Ok(HBuilderNsi::with_params(self.engine(), &self.nsi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ engine::PropagationEngine, hamiltonians::HamBuild };

    #[test]
    fn empty_config_is_default() {
        let config = ScenarioConfig::from_toml_str("").unwrap();
        assert_eq!(config, ScenarioConfig::default());
        assert_eq!(config.path, NuPath::std());
    }

    #[test]
    fn partial_sections() {
        let config = ScenarioConfig::from_toml_str(
            r#"
            energy = 2.5
            nubar = true

            [path]
            density = 2.848

            [nsi]
            eps_ee = 0.1
            eps_mutau = 0.05
            delta_mutau = 1.5
            "#
        ).unwrap();
        assert_eq!(config.energy, 2.5);
        assert!(config.nubar);
        assert_eq!(config.path.density, 2.848);
        assert_eq!(config.path.zoa, 0.5);
        assert_eq!(config.mixing, MixingParams::nufit52_no());
        assert_eq!(config.nsi.eps_mutau, 0.05);
        assert_eq!(config.nsi.eps_emu, 0.0);

        let builder = config.build().unwrap();
        assert!(builder.engine().is_nubar());
        assert_eq!(builder.engine().energy(), 2.5);
        assert!((builder.get_eps(0, 0).re - 1.1).abs() < 1e-15);
    }

    #[test]
    fn rejects_unphysical_values() {
        assert!(matches!(
            ScenarioConfig::from_toml_str("energy = 0.0"),
            Err(ConfigError::Energy(_)),
        ));
        assert!(matches!(
            ScenarioConfig::from_toml_str("[path]\ndensity = -1.0"),
            Err(ConfigError::Density(_)),
        ));
        assert!(matches!(
            ScenarioConfig::from_toml_str("[path]\nzoa = 1.5"),
            Err(ConfigError::ElectronFraction(_)),
        ));
        assert!(matches!(
            ScenarioConfig::from_toml_str("energy = \"high\""),
            Err(ConfigError::Parse(_)),
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            ScenarioConfig::from_file("/nonexistent/scenario.toml"),
            Err(ConfigError::Io(_)),
        ));
    }

    #[test]
    fn built_hamiltonian_matches_engine_state() {
        let config = ScenarioConfig::default();
        let mut builder = config.build().unwrap();
        builder.update_ham();
        let hms = config.mixing.mass_matrix();
        assert_eq!(
            builder.ham()[[1, 2]],
            hms[[1, 2]] / crate::constants::two_e_ev(config.energy),
        );
    }
}
