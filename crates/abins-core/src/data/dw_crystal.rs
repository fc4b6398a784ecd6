use crate::domain::{AbinsError, AbinsResult};
use crate::numerics::symmetric_eigenvalues;
use faer::Mat;
use serde::{Deserialize, Serialize};

/// Real 3x3 tensor in atomic units (bohr^2 for mean-square displacements).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DwTensor([[f64; 3]; 3]);

impl DwTensor {
    pub const fn zeros() -> Self {
        Self([[0.0; 3]; 3])
    }

    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self(rows)
    }

    pub const fn rows(&self) -> &[[f64; 3]; 3] {
        &self.0
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[row][col]
    }

    pub fn add_assign(&mut self, other: &DwTensor) {
        for (lhs_row, rhs_row) in self.0.iter_mut().zip(other.0.iter()) {
            for (lhs, rhs) in lhs_row.iter_mut().zip(rhs_row.iter()) {
                *lhs += *rhs;
            }
        }
    }

    pub fn scale(&mut self, factor: f64) {
        for value in self.0.iter_mut().flatten() {
            *value *= factor;
        }
    }

    pub fn scaled(mut self, factor: f64) -> Self {
        self.scale(factor);
        self
    }

    pub fn trace(&self) -> f64 {
        self.0[0][0] + self.0[1][1] + self.0[2][2]
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().flatten().all(|value| value.is_finite())
    }

    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (0..3).all(|row| {
            (0..3).all(|col| (self.0[row][col] - self.0[col][row]).abs() <= tolerance)
        })
    }

    /// `q^T W q`.
    pub fn quadratic_form(&self, q: [f64; 3]) -> f64 {
        let mut sum = 0.0;
        for row in 0..3 {
            for col in 0..3 {
                sum += q[row] * self.0[row][col] * q[col];
            }
        }
        sum
    }

    /// Principal mean-square displacements (eigenvalues, ascending).
    pub fn principal_values(&self) -> AbinsResult<[f64; 3]> {
        let mut matrix = Mat::<f64>::zeros(3, 3);
        for row in 0..3 {
            for col in 0..3 {
                matrix[(row, col)] = self.0[row][col];
            }
        }

        let eigenvalues = symmetric_eigenvalues(&matrix).map_err(|source| {
            AbinsError::computation(
                "RUN.DW_PRINCIPAL_VALUES",
                format!("failed to diagonalise Debye-Waller tensor: {}", source),
            )
        })?;
        Ok([eigenvalues[0], eigenvalues[1], eigenvalues[2]])
    }
}

/// Per-atom Debye-Waller tensors for one temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "DwCrystalDocument", try_from = "DwCrystalDocument")]
pub struct DwCrystalData {
    temperature: f64,
    tensors: Vec<DwTensor>,
}

impl DwCrystalData {
    pub fn new(temperature: f64, num_atoms: usize) -> Self {
        Self {
            temperature,
            tensors: vec![DwTensor::zeros(); num_atoms],
        }
    }

    pub fn from_tensors(temperature: f64, tensors: Vec<DwTensor>) -> Self {
        Self {
            temperature,
            tensors,
        }
    }

    pub fn set(&mut self, atom: usize, tensor: DwTensor) -> AbinsResult<()> {
        let num_atoms = self.tensors.len();
        let slot = self.tensors.get_mut(atom).ok_or_else(|| {
            AbinsError::invalid_argument(
                "INPUT.DW_ATOM_INDEX",
                format!("atom index {} is out of range for {} atoms", atom, num_atoms),
            )
        })?;
        *slot = tensor;
        Ok(())
    }

    pub fn get(&self, atom: usize) -> Option<&DwTensor> {
        self.tensors.get(atom)
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    pub fn tensors(&self) -> &[DwTensor] {
        &self.tensors
    }

    pub fn extract(&self) -> Vec<[[f64; 3]; 3]> {
        self.tensors.iter().map(|tensor| *tensor.rows()).collect()
    }

    pub fn is_finite(&self) -> bool {
        self.tensors.iter().all(DwTensor::is_finite)
    }

    /// Intensity attenuation `exp(-q^T W q)` for momentum transfer `q` in bohr^-1.
    pub fn attenuation(&self, atom: usize, q: [f64; 3]) -> Option<f64> {
        self.get(atom)
            .map(|tensor| (-tensor.quadratic_form(q)).exp())
    }

    pub fn isotropic_msd(&self, atom: usize) -> Option<f64> {
        self.get(atom).map(|tensor| tensor.trace() / 3.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DwCrystalDocument {
    temperature: f64,
    atoms: Vec<DwAtomEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DwAtomEntry {
    index: usize,
    tensor: DwTensor,
}

impl From<DwCrystalData> for DwCrystalDocument {
    fn from(data: DwCrystalData) -> Self {
        Self {
            temperature: data.temperature,
            atoms: data
                .tensors
                .into_iter()
                .enumerate()
                .map(|(index, tensor)| DwAtomEntry { index, tensor })
                .collect(),
        }
    }
}

impl TryFrom<DwCrystalDocument> for DwCrystalData {
    type Error = AbinsError;

    fn try_from(document: DwCrystalDocument) -> Result<Self, Self::Error> {
        let mut tensors = Vec::with_capacity(document.atoms.len());
        for (position, entry) in document.atoms.into_iter().enumerate() {
            if entry.index != position {
                return Err(AbinsError::invalid_argument(
                    "INPUT.DW_CRYSTAL_PARSE",
                    format!(
                        "atom entries must be ordered by index; found index {} at position {}",
                        entry.index, position
                    ),
                ));
            }
            tensors.push(entry.tensor);
        }

        Ok(Self::from_tensors(document.temperature, tensors))
    }
}
