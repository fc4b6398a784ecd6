use super::constants::{ACOUSTIC_MODES_AT_GAMMA, CM1_2_HARTREE, K_2_HARTREE, SMALL_K};
use crate::domain::{AbinsError, AbinsResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Numerical configuration shared by the loader and the Debye-Waller kernel.
///
/// Every field may be overridden from a JSON file; keys left out keep the
/// CODATA defaults from [`super::constants`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AbinsParameters {
    #[serde(rename = "kToHartree")]
    pub k_2_hartree: f64,
    #[serde(rename = "cm1ToHartree")]
    pub cm1_2_hartree: f64,
    #[serde(rename = "smallK")]
    pub small_k: f64,
    #[serde(rename = "acousticModesAtGamma")]
    pub acoustic_modes_at_gamma: usize,
}

impl Default for AbinsParameters {
    fn default() -> Self {
        Self {
            k_2_hartree: K_2_HARTREE,
            cm1_2_hartree: CM1_2_HARTREE,
            small_k: SMALL_K,
            acoustic_modes_at_gamma: ACOUSTIC_MODES_AT_GAMMA,
        }
    }
}

impl AbinsParameters {
    pub fn validate(&self) -> AbinsResult<()> {
        for (name, value) in [
            ("kToHartree", self.k_2_hartree),
            ("cm1ToHartree", self.cm1_2_hartree),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AbinsError::invalid_argument(
                    "INPUT.ABINS_PARAMETERS",
                    format!("parameter '{}' must be finite and positive, got {}", name, value),
                ));
            }
        }

        if !self.small_k.is_finite() || self.small_k < 0.0 {
            return Err(AbinsError::invalid_argument(
                "INPUT.ABINS_PARAMETERS",
                format!(
                    "parameter 'smallK' must be finite and non-negative, got {}",
                    self.small_k
                ),
            ));
        }

        Ok(())
    }
}

pub fn parse_parameters(source: &str) -> AbinsResult<AbinsParameters> {
    let parameters: AbinsParameters = serde_json::from_str(source).map_err(|source| {
        AbinsError::invalid_argument(
            "INPUT.ABINS_PARAMETERS",
            format!("failed to parse parameter overrides: {}", source),
        )
    })?;
    parameters.validate()?;
    Ok(parameters)
}

pub fn load_parameters(path: impl AsRef<Path>) -> AbinsResult<AbinsParameters> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| {
        AbinsError::io_system(
            "IO.ABINS_PARAMETERS_READ",
            format!("failed to read parameter file '{}': {}", path.display(), source),
        )
    })?;
    parse_parameters(&source)
}
