use super::calculator::DebyeWallerCalculator;
use crate::common::AbinsParameters;
use crate::data::{AbinsData, DwCrystalData};
use crate::domain::{AbinsError, ComputeResult, ExecutionMode};
use crate::modules::serialization::{format_fixed_f64, write_text_artifact};
use std::path::Path;

#[derive(Debug, Clone)]
pub(super) struct DwCrystalModel {
    fixture_id: String,
    symbols: Vec<String>,
    num_k: usize,
    num_freq: usize,
    result: DwCrystalData,
}

impl DwCrystalModel {
    pub(super) fn compute(
        fixture_id: &str,
        abins_data: &AbinsData,
        temperature: f64,
        parameters: AbinsParameters,
        execution_mode: ExecutionMode,
    ) -> ComputeResult<Self> {
        let calculator = DebyeWallerCalculator::from_kelvin(temperature, abins_data, parameters)?
            .with_execution_mode(execution_mode);
        let result = calculator.calculate_data();

        if let Some(atom) = result.tensors().iter().position(|tensor| !tensor.is_finite()) {
            return Err(AbinsError::computation(
                "RUN.DW_NON_FINITE",
                format!(
                    "fixture '{}' produced a non-finite Debye-Waller tensor for atom {}; check for zero frequencies away from Gamma",
                    fixture_id, atom
                ),
            ));
        }

        Ok(Self {
            fixture_id: fixture_id.to_string(),
            symbols: abins_data
                .atoms_data()
                .iter()
                .map(|atom| atom.symbol.clone())
                .collect(),
            num_k: calculator.num_k(),
            num_freq: calculator.num_freq(),
            result,
        })
    }

    pub(super) fn result(&self) -> &DwCrystalData {
        &self.result
    }

    pub(super) fn render_artifact(&self, artifact_name: &str) -> ComputeResult<String> {
        match artifact_name {
            "dw_crystal.json" => self.render_json(),
            "dw_crystal.dat" => self.render_dat(),
            other => Err(AbinsError::internal(
                "SYS.DW_CRYSTAL_OUTPUT_CONTRACT",
                format!("unsupported DW_CRYSTAL output artifact '{}'", other),
            )),
        }
    }

    pub(super) fn write_rendered(output_path: &Path, contents: &str) -> ComputeResult<()> {
        write_text_artifact(output_path, contents).map_err(|source| {
            AbinsError::io_system(
                "IO.DW_CRYSTAL_OUTPUT_WRITE",
                format!(
                    "failed to write DW_CRYSTAL artifact '{}': {}",
                    output_path.display(),
                    source
                ),
            )
        })
    }

    fn render_json(&self) -> ComputeResult<String> {
        serde_json::to_string_pretty(&self.result).map_err(|source| {
            AbinsError::internal(
                "SYS.DW_CRYSTAL_RENDER",
                format!("failed to serialise Debye-Waller tensors: {}", source),
            )
        })
    }

    fn render_dat(&self) -> ComputeResult<String> {
        let mut lines = Vec::with_capacity(self.result.len() * 5 + 4);
        lines.push("# DW_CRYSTAL crystal Debye-Waller tensors (atomic units)".to_string());
        lines.push(format!("# fixture: {}", self.fixture_id));
        lines.push(format!(
            "# temperature={} atoms={} k_points={} modes={}",
            format_fixed_f64(self.result.temperature(), 10, 4).trim(),
            self.result.len(),
            self.num_k,
            self.num_freq
        ));
        lines.push(
            "# columns: atom symbol isotropic_msd | principal p1 p2 p3 | tensor rows".to_string(),
        );

        for (index, tensor) in self.result.tensors().iter().enumerate() {
            let symbol = self.symbols.get(index).map(String::as_str).unwrap_or("?");
            lines.push(format!(
                "{:>5} {:<3}{}",
                index,
                symbol,
                format_fixed_f64(tensor.trace() / 3.0, 20, 12)
            ));

            let principal = tensor.principal_values()?;
            lines.push(format!(
                "  principal{}",
                principal
                    .iter()
                    .map(|value| format_fixed_f64(*value, 20, 12))
                    .collect::<String>()
            ));
            for row in tensor.rows() {
                lines.push(format!(
                    "           {}",
                    row.iter()
                        .map(|value| format_fixed_f64(*value, 20, 12))
                        .collect::<String>()
                ));
            }
        }

        Ok(lines.join("\n"))
    }
}
