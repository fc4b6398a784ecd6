pub mod constants;
pub mod parameters;

pub use parameters::{AbinsParameters, load_parameters, parse_parameters};
