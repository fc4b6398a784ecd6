//! Crystal Debye-Waller tensors from phonon eigen-data.
//!
//! [`modules::dw_crystal::DebyeWallerCalculator`] is the numerical kernel; the
//! surrounding modules provide the data containers it reads, a JSON loader,
//! a file-based executor and a tolerance-based regression comparator.

pub mod common;
pub mod data;
pub mod domain;
pub mod modules;
pub mod numerics;
