use crate::domain::{AbinsError, AbinsResult};

#[derive(Debug, Clone, PartialEq)]
pub struct AtomData {
    pub symbol: String,
    pub sort: usize,
    /// Mass in the unit the kernel divides by (atomic mass units).
    pub mass: f64,
    /// Cartesian position in bohr.
    pub coord: [f64; 3],
    pub fract_coord: [f64; 3],
}

impl AtomData {
    pub fn new(symbol: impl Into<String>, sort: usize, mass: f64) -> Self {
        Self {
            symbol: symbol.into(),
            sort,
            mass,
            coord: [0.0; 3],
            fract_coord: [0.0; 3],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtomsData {
    atoms: Vec<AtomData>,
}

impl AtomsData {
    pub fn new(atoms: Vec<AtomData>) -> AbinsResult<Self> {
        if atoms.is_empty() {
            return Err(AbinsError::invalid_argument(
                "INPUT.ATOMS_DATA",
                "at least one atom is required",
            ));
        }

        for (index, atom) in atoms.iter().enumerate() {
            if atom.symbol.trim().is_empty() {
                return Err(AbinsError::invalid_argument(
                    "INPUT.ATOMS_DATA",
                    format!("atom {} has an empty symbol", index),
                ));
            }
            if !atom.mass.is_finite() || atom.mass <= 0.0 {
                return Err(AbinsError::invalid_argument(
                    "INPUT.ATOMS_DATA",
                    format!(
                        "atom {} ({}) must have a finite positive mass, got {}",
                        index, atom.symbol, atom.mass
                    ),
                ));
            }
            let finite_position = atom
                .coord
                .iter()
                .chain(atom.fract_coord.iter())
                .all(|value| value.is_finite());
            if !finite_position {
                return Err(AbinsError::invalid_argument(
                    "INPUT.ATOMS_DATA",
                    format!("atom {} ({}) has a non-finite position", index, atom.symbol),
                ));
            }
        }

        Ok(Self { atoms })
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AtomData> {
        self.atoms.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AtomData> {
        self.atoms.iter()
    }

    pub fn masses(&self) -> Vec<f64> {
        self.atoms.iter().map(|atom| atom.mass).collect()
    }
}
