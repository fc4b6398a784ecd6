pub mod dw_crystal;
pub mod regression;
pub mod serialization;

mod traits;

pub use traits::ModuleExecutor;
