use super::DW_CRYSTAL_REQUIRED_INPUTS;
use crate::common::{AbinsParameters, load_parameters};
use crate::domain::{AbinsError, ComputeArtifact, ComputeModule, ComputeRequest, ComputeResult};

pub(super) fn validate_request_shape(request: &ComputeRequest) -> ComputeResult<()> {
    if request.module != ComputeModule::DwCrystal {
        return Err(AbinsError::invalid_argument(
            "INPUT.DW_CRYSTAL_MODULE",
            format!("DW_CRYSTAL module expects DW_CRYSTAL, got {}", request.module),
        ));
    }

    let input_file_name = request
        .input_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            AbinsError::invalid_argument(
                "INPUT.DW_CRYSTAL_INPUT_ARTIFACT",
                format!(
                    "DW_CRYSTAL module expects input artifact '{}' at '{}'",
                    DW_CRYSTAL_REQUIRED_INPUTS[0],
                    request.input_path.display()
                ),
            )
        })?;

    if !input_file_name.eq_ignore_ascii_case(DW_CRYSTAL_REQUIRED_INPUTS[0]) {
        return Err(AbinsError::invalid_argument(
            "INPUT.DW_CRYSTAL_INPUT_ARTIFACT",
            format!(
                "DW_CRYSTAL module requires input artifact '{}' but received '{}'",
                DW_CRYSTAL_REQUIRED_INPUTS[0], input_file_name
            ),
        ));
    }

    Ok(())
}

pub(super) fn resolve_parameters(request: &ComputeRequest) -> ComputeResult<AbinsParameters> {
    match &request.parameters_path {
        Some(path) => load_parameters(path),
        None => Ok(AbinsParameters::default()),
    }
}

pub(super) fn artifact_list(paths: &[&str]) -> Vec<ComputeArtifact> {
    paths.iter().copied().map(ComputeArtifact::new).collect()
}
