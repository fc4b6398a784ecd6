mod atoms;
mod dw_crystal;
mod k_points;
pub mod loader;

pub use atoms::{AtomData, AtomsData};
pub use dw_crystal::{DwCrystalData, DwTensor};
pub use k_points::{DisplacementVector, KpointsData};
pub use loader::{
    FrequencyUnit, load_phonon_document, parse_phonon_document, render_phonon_document,
};

use crate::domain::{AbinsError, AbinsResult};

/// Parsed output of a phonon calculation for one crystal.
#[derive(Debug, Clone, PartialEq)]
pub struct AbinsData {
    k_points_data: KpointsData,
    atoms_data: AtomsData,
}

impl AbinsData {
    pub fn new(k_points_data: KpointsData, atoms_data: AtomsData) -> AbinsResult<Self> {
        if atoms_data.len() != k_points_data.num_atoms() {
            return Err(AbinsError::invalid_argument(
                "INPUT.ABINS_DATA",
                format!(
                    "atoms data describes {} atoms but displacements cover {}",
                    atoms_data.len(),
                    k_points_data.num_atoms()
                ),
            ));
        }

        Ok(Self {
            k_points_data,
            atoms_data,
        })
    }

    pub fn k_points_data(&self) -> &KpointsData {
        &self.k_points_data
    }

    pub fn atoms_data(&self) -> &AtomsData {
        &self.atoms_data
    }

    pub fn with_k_points_data(&self, k_points_data: KpointsData) -> AbinsResult<Self> {
        Self::new(k_points_data, self.atoms_data.clone())
    }

    pub fn with_atoms_data(&self, atoms_data: AtomsData) -> AbinsResult<Self> {
        Self::new(self.k_points_data.clone(), atoms_data)
    }
}
