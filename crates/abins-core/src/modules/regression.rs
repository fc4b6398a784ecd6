use super::dw_crystal::DwCrystalModule;
use super::serialization::write_text_artifact;
use crate::data::DwCrystalData;
use crate::domain::{AbinsError, ComputeModule, ComputeRequest, ComputeResult, ExecutionMode};
use crate::numerics::{
    NumericTolerance, NumericTolerancePolicy, NumericTolerancePolicyError,
    compare_with_policy_tolerance, format_numeric_for_policy, load_numeric_tolerance_policy,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum RegressionActualSource {
    /// A previously written `dw_crystal.json`.
    Precomputed(PathBuf),
    /// Recompute from a phonon document.
    Compute {
        input_path: PathBuf,
        temperature: f64,
        parameters_path: Option<PathBuf>,
        execution_mode: ExecutionMode,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegressionRunnerConfig {
    pub fixture_id: String,
    pub baseline_path: PathBuf,
    pub actual: RegressionActualSource,
    pub policy_path: Option<PathBuf>,
    pub report_path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegressionRunReport {
    pub generated_at_unix_seconds: u64,
    pub passed: bool,
    pub fixture_id: String,
    pub baseline_path: String,
    pub actual_source: String,
    pub policy_version: String,
    pub tolerance: NumericTolerance,
    pub comparison: DwComparison,
}

#[derive(Debug, Clone, Serialize)]
pub struct DwComparison {
    pub passed: bool,
    pub baseline_temperature: f64,
    pub actual_temperature: f64,
    pub temperature_matches: bool,
    pub baseline_atom_count: usize,
    pub actual_atom_count: usize,
    pub atom_count_matches: bool,
    pub atoms: Vec<AtomComparison>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AtomComparison {
    pub index: usize,
    pub passed: bool,
    pub max_abs_diff: f64,
    pub max_rel_diff: f64,
    pub worst_component: [usize; 2],
    pub failing_components: usize,
}

pub fn compare_dw_crystal(
    baseline: &DwCrystalData,
    actual: &DwCrystalData,
    tolerance: NumericTolerance,
) -> DwComparison {
    let temperature_matches =
        compare_with_policy_tolerance(baseline.temperature(), actual.temperature(), tolerance)
            .passes;
    let atom_count_matches = baseline.len() == actual.len();

    let atoms: Vec<AtomComparison> = baseline
        .tensors()
        .iter()
        .zip(actual.tensors())
        .enumerate()
        .map(|(index, (expected, computed))| {
            let mut comparison = AtomComparison {
                index,
                passed: true,
                max_abs_diff: 0.0,
                max_rel_diff: 0.0,
                worst_component: [0, 0],
                failing_components: 0,
            };

            for row in 0..3 {
                for col in 0..3 {
                    let result = compare_with_policy_tolerance(
                        expected.get(row, col),
                        computed.get(row, col),
                        tolerance,
                    );
                    // NaN differences never pass and always count as worst.
                    if !result.passes {
                        comparison.passed = false;
                        comparison.failing_components += 1;
                    }
                    if result.abs_diff.is_nan() || result.abs_diff > comparison.max_abs_diff {
                        comparison.max_abs_diff = result.abs_diff;
                        comparison.worst_component = [row, col];
                    }
                    if result.rel_diff.is_nan() || result.rel_diff > comparison.max_rel_diff {
                        comparison.max_rel_diff = result.rel_diff;
                    }
                }
            }

            comparison
        })
        .collect();

    let passed = temperature_matches && atom_count_matches && atoms.iter().all(|atom| atom.passed);

    DwComparison {
        passed,
        baseline_temperature: baseline.temperature(),
        actual_temperature: actual.temperature(),
        temperature_matches,
        baseline_atom_count: baseline.len(),
        actual_atom_count: actual.len(),
        atom_count_matches,
        atoms,
    }
}

pub fn load_dw_crystal(path: &Path) -> ComputeResult<DwCrystalData> {
    let source = fs::read_to_string(path).map_err(|source| {
        AbinsError::io_system(
            "IO.DW_CRYSTAL_READ",
            format!("failed to read Debye-Waller results '{}': {}", path.display(), source),
        )
    })?;
    serde_json::from_str(&source).map_err(|source| {
        AbinsError::invalid_argument(
            "INPUT.DW_CRYSTAL_PARSE",
            format!(
                "failed to parse Debye-Waller results '{}': {}",
                path.display(),
                source
            ),
        )
    })
}

pub fn run_regression(config: &RegressionRunnerConfig) -> ComputeResult<RegressionRunReport> {
    let policy = match &config.policy_path {
        Some(path) => load_numeric_tolerance_policy(path).map_err(policy_error)?,
        None => NumericTolerancePolicy::default(),
    };

    let baseline = load_dw_crystal(&config.baseline_path)?;
    let (actual, actual_source) = match &config.actual {
        RegressionActualSource::Precomputed(path) => {
            (load_dw_crystal(path)?, path.display().to_string())
        }
        RegressionActualSource::Compute {
            input_path,
            temperature,
            parameters_path,
            execution_mode,
        } => {
            let mut request = ComputeRequest::new(
                config.fixture_id.clone(),
                ComputeModule::DwCrystal,
                input_path,
                input_path.parent().unwrap_or_else(|| Path::new(".")),
                *temperature,
            )
            .with_execution_mode(*execution_mode);
            if let Some(parameters_path) = parameters_path {
                request = request.with_parameters_path(parameters_path);
            }
            (
                DwCrystalModule.compute(&request)?,
                format!("computed:{}", input_path.display()),
            )
        }
    };

    let comparison = compare_dw_crystal(&baseline, &actual, policy.tolerance);
    if comparison.passed {
        info!(fixture = %config.fixture_id, "regression comparison passed");
    } else {
        warn!(fixture = %config.fixture_id, "regression comparison failed");
    }

    let report = RegressionRunReport {
        generated_at_unix_seconds: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0),
        passed: comparison.passed,
        fixture_id: config.fixture_id.clone(),
        baseline_path: config.baseline_path.display().to_string(),
        actual_source,
        policy_version: policy.policy_version,
        tolerance: policy.tolerance,
        comparison,
    };

    write_report(&config.report_path, &report)?;
    Ok(report)
}

pub fn render_human_summary(report: &RegressionRunReport) -> String {
    let mut lines = Vec::new();
    let status = if report.passed { "PASS" } else { "FAIL" };
    lines.push(format!("Regression status: {}", status));
    lines.push(format!("Fixture: {}", report.fixture_id));

    let comparison = &report.comparison;
    lines.push(format!(
        "Temperature: baseline={} actual={} ({})",
        format_numeric_for_policy(comparison.baseline_temperature),
        format_numeric_for_policy(comparison.actual_temperature),
        if comparison.temperature_matches { "match" } else { "MISMATCH" }
    ));
    lines.push(format!(
        "Atoms: baseline={} actual={} ({})",
        comparison.baseline_atom_count,
        comparison.actual_atom_count,
        if comparison.atom_count_matches { "match" } else { "MISMATCH" }
    ));

    for atom in &comparison.atoms {
        let atom_status = if atom.passed { "PASS" } else { "FAIL" };
        lines.push(format!(
            "Atom {}: {} (max_abs_diff={}, max_rel_diff={}, worst=[{}][{}], failing={}/9)",
            atom.index,
            atom_status,
            format_numeric_for_policy(atom.max_abs_diff),
            format_numeric_for_policy(atom.max_rel_diff),
            atom.worst_component[0],
            atom.worst_component[1],
            atom.failing_components
        ));
    }

    lines.join("\n")
}

fn write_report(path: &Path, report: &RegressionRunReport) -> ComputeResult<()> {
    let rendered = serde_json::to_string_pretty(report).map_err(|source| {
        AbinsError::internal(
            "SYS.REGRESSION_REPORT_RENDER",
            format!("failed to serialise regression report: {}", source),
        )
    })?;
    write_text_artifact(path, &rendered).map_err(|source| {
        AbinsError::io_system(
            "IO.REGRESSION_REPORT_WRITE",
            format!(
                "failed to write regression report '{}': {}",
                path.display(),
                source
            ),
        )
    })
}

fn policy_error(error: NumericTolerancePolicyError) -> AbinsError {
    match error {
        NumericTolerancePolicyError::Read { .. } => {
            AbinsError::io_system("IO.REGRESSION_POLICY_READ", error.to_string())
        }
        NumericTolerancePolicyError::Parse { .. } => {
            AbinsError::invalid_argument("INPUT.REGRESSION_POLICY", error.to_string())
        }
    }
}
