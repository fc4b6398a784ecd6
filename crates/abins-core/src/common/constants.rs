//! Physical constants in atomic (Hartree) units, CODATA 2018, plus the
//! Gamma-point handling defaults used by Abins.
//!
//! These are the defaults behind [`super::parameters::AbinsParameters`]; kernels
//! should read the parameter struct rather than these literals directly.

/// Boltzmann constant expressed in Hartree per Kelvin.
pub const K_2_HARTREE: f64 = 3.166_811_563e-6;
/// One wavenumber (cm^-1) expressed in Hartree.
pub const CM1_2_HARTREE: f64 = 4.556_335_252_912e-6;
/// Norm (in the k-vector's own units) below which a k-point is treated as
/// Gamma. Not a physical constant; matches the `SMALL_K` threshold of Abins.
pub const SMALL_K: f64 = 1.0e-1;
/// Translational modes with zero frequency at Gamma.
pub const ACOUSTIC_MODES_AT_GAMMA: usize = 3;
