use super::CliError;
use super::helpers::{current_working_dir, resolve_cli_path};
use abins_core::domain::{ComputeModule, ComputeRequest, ExecutionMode};
use abins_core::modules::ModuleExecutor;
use abins_core::modules::dw_crystal::DwCrystalModule;
use abins_core::modules::regression::{
    RegressionActualSource, RegressionRunnerConfig, render_human_summary, run_regression,
};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_FIXTURE_ID: &str = "FX-DW-001";

#[derive(clap::Args)]
pub(super) struct DwCrystalArgs {
    /// Phonon document (must be named phonon.json)
    #[arg(long, default_value = "phonon.json")]
    input: PathBuf,

    /// Temperature in Kelvin
    #[arg(long, allow_negative_numbers = true)]
    temperature: f64,

    /// Directory receiving dw_crystal.json and dw_crystal.dat
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// JSON file overriding physical constants and Gamma handling
    #[arg(long)]
    parameters: Option<PathBuf>,

    /// Map atoms over the rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Fixture identifier written into the text report
    #[arg(long, default_value = DEFAULT_FIXTURE_ID)]
    fixture_id: String,
}

#[derive(clap::Args)]
#[command(group(clap::ArgGroup::new("actual_source").required(true).args(["actual", "input"])))]
pub(super) struct RegressionArgs {
    /// Baseline dw_crystal.json
    #[arg(long)]
    baseline: PathBuf,

    /// Previously computed dw_crystal.json to compare
    #[arg(long)]
    actual: Option<PathBuf>,

    /// Phonon document to compute the actual tensors from
    #[arg(long, requires = "temperature")]
    input: Option<PathBuf>,

    /// Temperature in Kelvin used with --input
    #[arg(long, allow_negative_numbers = true)]
    temperature: Option<f64>,

    /// Numeric tolerance policy path
    #[arg(long)]
    policy: Option<PathBuf>,

    /// JSON file overriding physical constants and Gamma handling
    #[arg(long, requires = "input")]
    parameters: Option<PathBuf>,

    /// Map atoms over the rayon thread pool when computing
    #[arg(long, requires = "input")]
    parallel: bool,

    /// JSON report output path
    #[arg(long, default_value = "artifacts/regression/report.json")]
    report: PathBuf,

    /// Fixture identifier recorded in the report
    #[arg(long, default_value = DEFAULT_FIXTURE_ID)]
    fixture_id: String,
}

impl DwCrystalArgs {
    fn into_request(self) -> Result<ComputeRequest, CliError> {
        let working_dir = current_working_dir()?;
        let mut request = ComputeRequest::new(
            self.fixture_id,
            ComputeModule::DwCrystal,
            resolve_cli_path(&working_dir, &self.input),
            resolve_cli_path(&working_dir, &self.output_dir),
            self.temperature,
        )
        .with_execution_mode(execution_mode(self.parallel));
        if let Some(parameters) = self.parameters {
            request = request.with_parameters_path(resolve_cli_path(&working_dir, &parameters));
        }
        Ok(request)
    }
}

impl RegressionArgs {
    fn into_config(self) -> Result<RegressionRunnerConfig, CliError> {
        let working_dir = current_working_dir()?;
        let actual = match (self.actual, self.input, self.temperature) {
            (Some(actual), None, _) => {
                RegressionActualSource::Precomputed(resolve_cli_path(&working_dir, &actual))
            }
            (None, Some(input), Some(temperature)) => RegressionActualSource::Compute {
                input_path: resolve_cli_path(&working_dir, &input),
                temperature,
                parameters_path: self
                    .parameters
                    .map(|path| resolve_cli_path(&working_dir, &path)),
                execution_mode: execution_mode(self.parallel),
            },
            _ => {
                return Err(CliError::Usage(
                    "regression expects either --actual or --input with --temperature".to_string(),
                ));
            }
        };

        Ok(RegressionRunnerConfig {
            fixture_id: self.fixture_id,
            baseline_path: resolve_cli_path(&working_dir, &self.baseline),
            actual,
            policy_path: self
                .policy
                .map(|path| resolve_cli_path(&working_dir, &path)),
            report_path: resolve_cli_path(&working_dir, &self.report),
        })
    }
}

fn execution_mode(parallel: bool) -> ExecutionMode {
    if parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Serial
    }
}

pub(super) fn run_dw_crystal_command(args: DwCrystalArgs) -> Result<i32, CliError> {
    let request = args.into_request()?;
    debug!(input = %request.input_path.display(), "dispatching DW_CRYSTAL");

    println!("Running {}...", request.module);
    let artifacts = DwCrystalModule
        .execute(&request)
        .map_err(CliError::Compute)?;
    for artifact in &artifacts {
        println!(
            "  wrote {}",
            request.output_dir.join(&artifact.relative_path).display()
        );
    }
    println!(
        "{} completed for fixture '{}' ({} artifacts).",
        request.module,
        request.fixture_id,
        artifacts.len()
    );
    Ok(0)
}

pub(super) fn run_regression_command(args: RegressionArgs) -> Result<i32, CliError> {
    let config = args.into_config()?;
    let report = run_regression(&config).map_err(CliError::Compute)?;
    println!("{}", render_human_summary(&report));
    println!("JSON report: {}", config.report_path.display());

    if report.passed { Ok(0) } else { Ok(1) }
}
