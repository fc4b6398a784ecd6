//! JSON phonon document <-> [`AbinsData`].
//!
//! Complex displacement components are written as `[re, im]` pairs. Frequencies
//! may be given in Hartree or in wavenumbers; the latter are converted with
//! `AbinsParameters::cm1_2_hartree` on load.

use super::{AbinsData, AtomData, AtomsData, DisplacementVector, KpointsData};
use crate::common::AbinsParameters;
use crate::domain::{AbinsError, AbinsResult, ParserResult};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum FrequencyUnit {
    #[default]
    #[serde(rename = "hartree")]
    Hartree,
    #[serde(rename = "cm-1")]
    Wavenumber,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhononDocument {
    #[serde(default)]
    frequency_unit: FrequencyUnit,
    atoms: Vec<AtomEntry>,
    k_points: Vec<KPointEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct AtomEntry {
    symbol: String,
    #[serde(default)]
    sort: Option<usize>,
    mass: f64,
    #[serde(default)]
    coord: [f64; 3],
    #[serde(default)]
    fract_coord: [f64; 3],
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct KPointEntry {
    weight: f64,
    k_vector: [f64; 3],
    frequencies: Vec<f64>,
    /// `[atom][mode][axis] -> [re, im]`
    displacements: Vec<Vec<[[f64; 2]; 3]>>,
}

pub fn parse_phonon_document(source: &str, parameters: &AbinsParameters) -> ParserResult<AbinsData> {
    let document: PhononDocument = serde_json::from_str(source).map_err(|source| {
        AbinsError::invalid_argument(
            "INPUT.PHONON_PARSE",
            format!("failed to parse phonon document: {}", source),
        )
    })?;

    let frequency_factor = match document.frequency_unit {
        FrequencyUnit::Hartree => 1.0,
        FrequencyUnit::Wavenumber => parameters.cm1_2_hartree,
    };

    let atoms = document
        .atoms
        .into_iter()
        .enumerate()
        .map(|(index, entry)| AtomData {
            symbol: entry.symbol,
            sort: entry.sort.unwrap_or(index),
            mass: entry.mass,
            coord: entry.coord,
            fract_coord: entry.fract_coord,
        })
        .collect();
    let atoms_data = AtomsData::new(atoms)?;

    let num_k = document.k_points.len();
    let mut weights = Vec::with_capacity(num_k);
    let mut k_vectors = Vec::with_capacity(num_k);
    let mut frequencies = Vec::with_capacity(num_k);
    let mut displacements = Vec::with_capacity(num_k);
    for entry in document.k_points {
        weights.push(entry.weight);
        k_vectors.push(entry.k_vector);
        frequencies.push(
            entry
                .frequencies
                .into_iter()
                .map(|frequency| frequency * frequency_factor)
                .collect::<Vec<_>>(),
        );
        displacements.push(
            entry
                .displacements
                .into_iter()
                .map(|modes| modes.into_iter().map(complex_vector).collect::<Vec<_>>())
                .collect::<Vec<_>>(),
        );
    }

    let k_points_data = KpointsData::new(weights, k_vectors, frequencies, displacements)?;
    AbinsData::new(k_points_data, atoms_data)
}

pub fn load_phonon_document(
    path: impl AsRef<Path>,
    parameters: &AbinsParameters,
) -> AbinsResult<AbinsData> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| {
        AbinsError::io_system(
            "IO.PHONON_READ",
            format!("failed to read phonon document '{}': {}", path.display(), source),
        )
    })?;
    parse_phonon_document(&source, parameters)
}

/// Pretty JSON with frequencies in Hartree.
pub fn render_phonon_document(data: &AbinsData) -> AbinsResult<String> {
    let k_points = data.k_points_data();
    let num_atoms = k_points.num_atoms();
    let num_freq = k_points.num_freq();

    let document = PhononDocument {
        frequency_unit: FrequencyUnit::Hartree,
        atoms: data
            .atoms_data()
            .iter()
            .map(|atom| AtomEntry {
                symbol: atom.symbol.clone(),
                sort: Some(atom.sort),
                mass: atom.mass,
                coord: atom.coord,
                fract_coord: atom.fract_coord,
            })
            .collect(),
        k_points: (0..k_points.num_k())
            .map(|k| KPointEntry {
                weight: k_points.weights()[k],
                k_vector: k_points.k_vectors()[k],
                frequencies: k_points.frequencies()[k].clone(),
                displacements: (0..num_atoms)
                    .map(|atom| {
                        (0..num_freq)
                            .map(|mode| pair_vector(k_points.displacement(k, atom, mode)))
                            .collect()
                    })
                    .collect(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&document).map_err(|source| {
        AbinsError::internal(
            "SYS.PHONON_RENDER",
            format!("failed to render phonon document: {}", source),
        )
    })
}

fn complex_vector(components: [[f64; 2]; 3]) -> DisplacementVector {
    components.map(|[re, im]| Complex64::new(re, im))
}

fn pair_vector(vector: &DisplacementVector) -> [[f64; 2]; 3] {
    vector.map(|value| [value.re, value.im])
}
