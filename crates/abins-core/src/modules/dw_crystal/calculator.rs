use crate::common::AbinsParameters;
use crate::data::{AbinsData, DisplacementVector, DwCrystalData, DwTensor};
use crate::domain::{AbinsError, AbinsResult, ExecutionMode};
use crate::numerics::vector_norm3;
use rayon::prelude::*;
use tracing::debug;

/// Validated non-negative temperature in Kelvin.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Temperature(f64);

impl Temperature {
    pub fn new(kelvin: f64) -> AbinsResult<Self> {
        if !kelvin.is_finite() {
            return Err(AbinsError::invalid_argument(
                "INPUT.DW_TEMPERATURE",
                format!("temperature must be a finite number of Kelvin, got {}", kelvin),
            ));
        }
        if kelvin < 0.0 {
            return Err(AbinsError::invalid_argument(
                "INPUT.DW_TEMPERATURE",
                format!("temperature must be non-negative, got {} K", kelvin),
            ));
        }
        Ok(Self(kelvin))
    }

    pub const fn kelvin(self) -> f64 {
        self.0
    }

    pub fn to_hartree(self, parameters: &AbinsParameters) -> f64 {
        self.0 * parameters.k_2_hartree
    }
}

/// Crystal Debye-Waller tensors
///
/// `W_a = 1/(2 m_a) * sum_k w_k * sum_n coth(w_kn / 2T) / w_kn * Re(e_kan (x) e_kan*)`
///
/// The leading acoustic modes of any k-point closer to Gamma than `small_k`
/// are left out of the sum since their frequency is zero there.
#[derive(Debug, Clone)]
pub struct DebyeWallerCalculator<'a> {
    temperature: Temperature,
    abins_data: &'a AbinsData,
    parameters: AbinsParameters,
    execution_mode: ExecutionMode,
    masses: Vec<f64>,
    num_k: usize,
    num_atoms: usize,
    num_freq: usize,
}

impl<'a> DebyeWallerCalculator<'a> {
    pub fn new(
        temperature: Temperature,
        abins_data: &'a AbinsData,
        parameters: AbinsParameters,
    ) -> AbinsResult<Self> {
        parameters.validate()?;
        let k_points = abins_data.k_points_data();

        Ok(Self {
            temperature,
            abins_data,
            parameters,
            execution_mode: ExecutionMode::Serial,
            masses: abins_data.atoms_data().masses(),
            num_k: k_points.num_k(),
            num_atoms: k_points.num_atoms(),
            num_freq: k_points.num_freq(),
        })
    }

    pub fn from_kelvin(
        kelvin: f64,
        abins_data: &'a AbinsData,
        parameters: AbinsParameters,
    ) -> AbinsResult<Self> {
        Self::new(Temperature::new(kelvin)?, abins_data, parameters)
    }

    pub fn with_execution_mode(mut self, execution_mode: ExecutionMode) -> Self {
        self.execution_mode = execution_mode;
        self
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn num_k(&self) -> usize {
        self.num_k
    }

    pub fn num_atoms(&self) -> usize {
        self.num_atoms
    }

    pub fn num_freq(&self) -> usize {
        self.num_freq
    }

    pub fn calculate_data(&self) -> DwCrystalData {
        debug!(
            temperature = self.temperature.kelvin(),
            num_k = self.num_k,
            num_atoms = self.num_atoms,
            num_freq = self.num_freq,
            mode = ?self.execution_mode,
            "computing crystal Debye-Waller tensors"
        );

        let coefficients = self.mode_coefficients();
        let tensors: Vec<DwTensor> = match self.execution_mode {
            ExecutionMode::Serial => (0..self.num_atoms)
                .map(|atom| self.atom_tensor(atom, &coefficients))
                .collect(),
            ExecutionMode::Parallel => (0..self.num_atoms)
                .into_par_iter()
                .map(|atom| self.atom_tensor(atom, &coefficients))
                .collect(),
        };

        DwCrystalData::from_tensors(self.temperature.kelvin(), tensors)
    }

    fn first_mode(&self, k: usize) -> usize {
        let k_vector = self.abins_data.k_points_data().k_vectors()[k];
        if vector_norm3(k_vector) < self.parameters.small_k {
            self.parameters.acoustic_modes_at_gamma.min(self.num_freq)
        } else {
            0
        }
    }

    /// `coth(w / 2T) / w` for every (k, mode); skipped Gamma modes hold zero.
    fn mode_coefficients(&self) -> Vec<Vec<f64>> {
        // Infinite at T = 0, where tanh saturates to 1 and only 1/w remains.
        let factor = 1.0 / (2.0 * self.temperature.to_hartree(&self.parameters));
        let frequencies = self.abins_data.k_points_data().frequencies();

        (0..self.num_k)
            .map(|k| {
                let start = self.first_mode(k);
                frequencies[k]
                    .iter()
                    .enumerate()
                    .map(|(mode, &frequency)| {
                        if mode < start {
                            0.0
                        } else {
                            1.0 / (frequency * factor).tanh() / frequency
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn atom_tensor(&self, atom: usize, coefficients: &[Vec<f64>]) -> DwTensor {
        let k_points = self.abins_data.k_points_data();
        let weights = k_points.weights();

        let mut tensor = DwTensor::zeros();
        for k in 0..self.num_k {
            let mut k_tensor = DwTensor::zeros();
            for mode in self.first_mode(k)..self.num_freq {
                let outer = hermitian_outer_real(k_points.displacement(k, atom, mode));
                k_tensor.add_assign(&outer.scaled(coefficients[k][mode]));
            }
            tensor.add_assign(&k_tensor.scaled(weights[k]));
        }

        tensor.scaled(1.0 / (2.0 * self.masses[atom]))
    }
}

/// `Re(v (x) v*) = v_re (x) v_re + v_im (x) v_im`
fn hermitian_outer_real(vector: &DisplacementVector) -> DwTensor {
    let mut rows = [[0.0; 3]; 3];
    for (i, row) in rows.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            *value = vector[i].re * vector[j].re + vector[i].im * vector[j].im;
        }
    }
    DwTensor::from_rows(rows)
}
