use crate::domain::{AbinsError, AbinsResult};
use num_complex::Complex64;

pub type DisplacementVector = [Complex64; 3];

/// Phonon eigen-data sampled on a set of k-points.
///
/// Shapes are checked once here: `weights`, `k_vectors`, `frequencies` and
/// `atomic_displacements` share the k-point axis, every frequency row has
/// `num_freq` entries and every displacement block is `[num_atoms][num_freq]`.
/// Frequencies are in Hartree.
#[derive(Debug, Clone, PartialEq)]
pub struct KpointsData {
    weights: Vec<f64>,
    k_vectors: Vec<[f64; 3]>,
    frequencies: Vec<Vec<f64>>,
    atomic_displacements: Vec<Vec<Vec<DisplacementVector>>>,
    num_atoms: usize,
    num_freq: usize,
}

impl KpointsData {
    pub fn new(
        weights: Vec<f64>,
        k_vectors: Vec<[f64; 3]>,
        frequencies: Vec<Vec<f64>>,
        atomic_displacements: Vec<Vec<Vec<DisplacementVector>>>,
    ) -> AbinsResult<Self> {
        let num_k = weights.len();
        if num_k == 0 {
            return Err(shape_error("at least one k-point is required"));
        }

        for (field, len) in [
            ("k_vectors", k_vectors.len()),
            ("frequencies", frequencies.len()),
            ("atomic_displacements", atomic_displacements.len()),
        ] {
            if len != num_k {
                return Err(shape_error(format!(
                    "'{}' holds {} k-points but 'weights' holds {}",
                    field, len, num_k
                )));
            }
        }

        let num_freq = frequencies[0].len();
        if num_freq == 0 {
            return Err(shape_error("at least one frequency per k-point is required"));
        }
        let num_atoms = atomic_displacements[0].len();
        if num_atoms == 0 {
            return Err(shape_error("at least one atom is required in 'atomic_displacements'"));
        }

        for k in 0..num_k {
            if !weights[k].is_finite() {
                return Err(value_error(format!("weight of k-point {} is not finite", k)));
            }
            if k_vectors[k].iter().any(|component| !component.is_finite()) {
                return Err(value_error(format!("k-vector of k-point {} is not finite", k)));
            }
            if frequencies[k].len() != num_freq {
                return Err(shape_error(format!(
                    "k-point {} holds {} frequencies, expected {}",
                    k,
                    frequencies[k].len(),
                    num_freq
                )));
            }
            if frequencies[k].iter().any(|frequency| !frequency.is_finite()) {
                return Err(value_error(format!(
                    "frequencies of k-point {} are not finite",
                    k
                )));
            }

            let block = &atomic_displacements[k];
            if block.len() != num_atoms {
                return Err(shape_error(format!(
                    "k-point {} holds displacements for {} atoms, expected {}",
                    k,
                    block.len(),
                    num_atoms
                )));
            }
            for (atom, modes) in block.iter().enumerate() {
                if modes.len() != num_freq {
                    return Err(shape_error(format!(
                        "k-point {} atom {} holds {} displacement modes, expected {}",
                        k,
                        atom,
                        modes.len(),
                        num_freq
                    )));
                }
                let finite = modes
                    .iter()
                    .flatten()
                    .all(|value| value.re.is_finite() && value.im.is_finite());
                if !finite {
                    return Err(value_error(format!(
                        "displacements of k-point {} atom {} are not finite",
                        k, atom
                    )));
                }
            }
        }

        Ok(Self {
            weights,
            k_vectors,
            frequencies,
            atomic_displacements,
            num_atoms,
            num_freq,
        })
    }

    pub fn num_k(&self) -> usize {
        self.weights.len()
    }

    pub fn num_atoms(&self) -> usize {
        self.num_atoms
    }

    pub fn num_freq(&self) -> usize {
        self.num_freq
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn k_vectors(&self) -> &[[f64; 3]] {
        &self.k_vectors
    }

    pub fn frequencies(&self) -> &[Vec<f64>] {
        &self.frequencies
    }

    pub fn displacement(&self, k: usize, atom: usize, mode: usize) -> &DisplacementVector {
        &self.atomic_displacements[k][atom][mode]
    }

    pub fn with_scaled_weights(&self, factor: f64) -> Self {
        let mut scaled = self.clone();
        for weight in &mut scaled.weights {
            *weight *= factor;
        }
        scaled
    }
}

fn shape_error(message: impl Into<String>) -> AbinsError {
    AbinsError::invalid_argument("INPUT.K_POINTS_SHAPE", message)
}

fn value_error(message: impl Into<String>) -> AbinsError {
    AbinsError::invalid_argument("INPUT.K_POINTS_VALUE", message)
}
