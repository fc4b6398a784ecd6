mod calculator;
mod model;
mod parser;

pub use calculator::{DebyeWallerCalculator, Temperature};

use super::ModuleExecutor;
use crate::data::{DwCrystalData, load_phonon_document};
use crate::domain::{AbinsError, ComputeArtifact, ComputeRequest, ComputeResult};
use std::fs;
use tracing::info;

use model::DwCrystalModel;
use parser::{artifact_list, resolve_parameters, validate_request_shape};

pub(crate) const DW_CRYSTAL_REQUIRED_INPUTS: [&str; 1] = ["phonon.json"];
pub(crate) const DW_CRYSTAL_REQUIRED_OUTPUTS: [&str; 2] = ["dw_crystal.json", "dw_crystal.dat"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DwCrystalContract {
    pub required_inputs: Vec<ComputeArtifact>,
    pub expected_outputs: Vec<ComputeArtifact>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DwCrystalModule;

impl DwCrystalModule {
    pub fn contract_for_request(&self, request: &ComputeRequest) -> ComputeResult<DwCrystalContract> {
        validate_request_shape(request)?;
        Ok(DwCrystalContract {
            required_inputs: artifact_list(&DW_CRYSTAL_REQUIRED_INPUTS),
            expected_outputs: artifact_list(&DW_CRYSTAL_REQUIRED_OUTPUTS),
        })
    }

    /// Loads the request inputs and computes the tensors without writing artifacts.
    pub fn compute(&self, request: &ComputeRequest) -> ComputeResult<DwCrystalData> {
        Ok(self.build_model(request)?.result().clone())
    }

    fn build_model(&self, request: &ComputeRequest) -> ComputeResult<DwCrystalModel> {
        validate_request_shape(request)?;
        let parameters = resolve_parameters(request)?;
        let abins_data = load_phonon_document(&request.input_path, &parameters)?;

        DwCrystalModel::compute(
            &request.fixture_id,
            &abins_data,
            request.temperature,
            parameters,
            request.execution_mode,
        )
    }
}

impl ModuleExecutor for DwCrystalModule {
    fn execute(&self, request: &ComputeRequest) -> ComputeResult<Vec<ComputeArtifact>> {
        let model = self.build_model(request)?;
        let outputs = artifact_list(&DW_CRYSTAL_REQUIRED_OUTPUTS);
        write_outputs(&model, request, &outputs)?;
        Ok(outputs)
    }
}

/// Renders every artifact before touching the output directory.
fn write_outputs(
    model: &DwCrystalModel,
    request: &ComputeRequest,
    outputs: &[ComputeArtifact],
) -> ComputeResult<()> {
    let rendered = outputs
        .iter()
        .map(|artifact| {
            let artifact_name = artifact.relative_path.to_string_lossy().replace('\\', "/");
            model
                .render_artifact(&artifact_name)
                .map(|contents| (request.output_dir.join(&artifact.relative_path), contents))
        })
        .collect::<ComputeResult<Vec<_>>>()?;

    fs::create_dir_all(&request.output_dir).map_err(|source| {
        AbinsError::io_system(
            "IO.DW_CRYSTAL_OUTPUT_DIRECTORY",
            format!(
                "failed to create DW_CRYSTAL output directory '{}': {}",
                request.output_dir.display(),
                source
            ),
        )
    })?;

    for (output_path, contents) in &rendered {
        DwCrystalModel::write_rendered(output_path, contents)?;
        info!(fixture = %request.fixture_id, path = %output_path.display(), "wrote artifact");
    }
    Ok(())
}
