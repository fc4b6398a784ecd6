pub mod errors;

pub use errors::{AbinsError, AbinsErrorCategory, AbinsResult, ComputeResult, ParserResult};

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionMode {
    #[default]
    Serial,
    /// Independent per-atom reductions are mapped over the rayon pool.
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComputeModule {
    DwCrystal,
}

impl ComputeModule {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DwCrystal => "DW_CRYSTAL",
        }
    }
}

impl Display for ComputeModule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputeRequest {
    pub fixture_id: String,
    pub module: ComputeModule,
    pub execution_mode: ExecutionMode,
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub temperature: f64,
    pub parameters_path: Option<PathBuf>,
}

impl ComputeRequest {
    pub fn new(
        fixture_id: impl Into<String>,
        module: ComputeModule,
        input_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        temperature: f64,
    ) -> Self {
        Self {
            fixture_id: fixture_id.into(),
            module,
            execution_mode: ExecutionMode::Serial,
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            temperature,
            parameters_path: None,
        }
    }

    pub fn with_execution_mode(mut self, execution_mode: ExecutionMode) -> Self {
        self.execution_mode = execution_mode;
        self
    }

    pub fn with_parameters_path(mut self, parameters_path: impl Into<PathBuf>) -> Self {
        self.parameters_path = Some(parameters_path.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeArtifact {
    pub relative_path: PathBuf,
}

impl ComputeArtifact {
    pub fn new(relative_path: impl Into<PathBuf>) -> Self {
        Self {
            relative_path: relative_path.into(),
        }
    }
}
