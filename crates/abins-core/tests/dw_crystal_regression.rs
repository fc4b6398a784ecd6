use abins_core::common::AbinsParameters;
use abins_core::data::load_phonon_document;
use abins_core::domain::{AbinsErrorCategory, ComputeModule, ComputeRequest, ExecutionMode};
use abins_core::modules::ModuleExecutor;
use abins_core::modules::dw_crystal::{DebyeWallerCalculator, DwCrystalModule};
use abins_core::modules::regression::{
    RegressionActualSource, RegressionRunnerConfig, compare_dw_crystal, load_dw_crystal,
    render_human_summary, run_regression,
};
use abins_core::numerics::NumericTolerance;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct FixtureCase {
    id: &'static str,
    name: &'static str,
    temperature: f64,
}

const APPROVED_DW_FIXTURES: [FixtureCase; 2] = [
    FixtureCase {
        id: "FX-DW-MOLECULE-001",
        name: "molecule",
        temperature: 10.0,
    },
    FixtureCase {
        id: "FX-DW-SI2-001",
        name: "si2",
        temperature: 300.0,
    },
];

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn phonon_fixture(fixture: &FixtureCase) -> PathBuf {
    fixture_path(&format!("{}_phonon.json", fixture.name))
}

fn baseline_fixture(fixture: &FixtureCase) -> PathBuf {
    fixture_path(&format!("{}_dw_crystal.json", fixture.name))
}

fn stage_phonon_input(fixture: &FixtureCase, root: &Path) -> PathBuf {
    let input_dir = root.join(fixture.id);
    fs::create_dir_all(&input_dir).expect("input directory should be created");
    let input_path = input_dir.join("phonon.json");
    fs::copy(phonon_fixture(fixture), &input_path).expect("phonon input should be staged");
    input_path
}

#[test]
fn approved_fixtures_match_precomputed_tensors() {
    for fixture in &APPROVED_DW_FIXTURES {
        let parameters = AbinsParameters::default();
        let data = load_phonon_document(phonon_fixture(fixture), &parameters)
            .expect("phonon fixture should load");
        let actual = DebyeWallerCalculator::from_kelvin(fixture.temperature, &data, parameters)
            .expect("calculator should build")
            .calculate_data();
        let baseline =
            load_dw_crystal(&baseline_fixture(fixture)).expect("baseline fixture should load");

        let comparison =
            compare_dw_crystal(&baseline, &actual, NumericTolerance::dw_crystal_default());
        assert!(
            comparison.passed,
            "fixture '{}' should match its baseline: {:?}",
            fixture.id, comparison
        );
        for atom in &comparison.atoms {
            assert!(
                atom.max_rel_diff <= 1.0e-10,
                "fixture '{}' atom {} drifted by {:e}",
                fixture.id,
                atom.index,
                atom.max_rel_diff
            );
        }
    }
}

#[test]
fn approved_fixtures_emit_deterministic_artifacts() {
    for fixture in &APPROVED_DW_FIXTURES {
        let temp = TempDir::new().expect("tempdir should be created");
        let input_path = stage_phonon_input(fixture, temp.path());

        let mut outputs = Vec::new();
        for (label, mode) in [
            ("first", ExecutionMode::Serial),
            ("second", ExecutionMode::Serial),
            ("parallel", ExecutionMode::Parallel),
        ] {
            let output_dir = temp.path().join(label);
            let request = ComputeRequest::new(
                fixture.id,
                ComputeModule::DwCrystal,
                &input_path,
                &output_dir,
                fixture.temperature,
            )
            .with_execution_mode(mode);
            DwCrystalModule
                .execute(&request)
                .expect("DW_CRYSTAL execution should succeed");
            outputs.push(output_dir);
        }

        for artifact in ["dw_crystal.json", "dw_crystal.dat"] {
            let first = fs::read(outputs[0].join(artifact)).expect("first output should exist");
            for other in &outputs[1..] {
                let second = fs::read(other.join(artifact)).expect("output should exist");
                assert_eq!(
                    first, second,
                    "fixture '{}' artifact '{}' should be deterministic",
                    fixture.id, artifact
                );
            }
        }
    }
}

#[test]
fn regression_run_computes_from_phonon_input_and_passes() {
    for fixture in &APPROVED_DW_FIXTURES {
        let temp = TempDir::new().expect("tempdir should be created");
        let input_path = stage_phonon_input(fixture, temp.path());
        let report_path = temp.path().join("report/report.json");

        let report = run_regression(&RegressionRunnerConfig {
            fixture_id: fixture.id.to_string(),
            baseline_path: baseline_fixture(fixture),
            actual: RegressionActualSource::Compute {
                input_path,
                temperature: fixture.temperature,
                parameters_path: None,
                execution_mode: ExecutionMode::Parallel,
            },
            policy_path: None,
            report_path: report_path.clone(),
        })
        .expect("regression run should succeed");

        assert!(report.passed, "{}", render_human_summary(&report));
        let parsed: Value = serde_json::from_str(
            &fs::read_to_string(&report_path).expect("report should be readable"),
        )
        .expect("report JSON should parse");
        assert_eq!(parsed["passed"], Value::Bool(true));
        assert_eq!(parsed["fixture_id"], Value::String(fixture.id.to_string()));
    }
}

#[test]
fn regression_run_against_perturbed_baseline_fails_unless_policy_allows_it() {
    let fixture = &APPROVED_DW_FIXTURES[1];
    let temp = TempDir::new().expect("tempdir should be created");
    let input_path = stage_phonon_input(fixture, temp.path());
    let output_dir = temp.path().join("actual");
    DwCrystalModule
        .execute(&ComputeRequest::new(
            fixture.id,
            ComputeModule::DwCrystal,
            &input_path,
            &output_dir,
            fixture.temperature,
        ))
        .expect("DW_CRYSTAL execution should succeed");

    let mut baseline: Value = serde_json::from_str(
        &fs::read_to_string(baseline_fixture(fixture)).expect("baseline should be readable"),
    )
    .expect("baseline should parse");
    let value = baseline["atoms"][1]["tensor"][2][0]
        .as_f64()
        .expect("tensor component should be a number");
    baseline["atoms"][1]["tensor"][2][0] = Value::from(value * (1.0 + 1.0e-6));
    let perturbed_path = temp.path().join("perturbed_dw_crystal.json");
    fs::write(&perturbed_path, baseline.to_string()).expect("perturbed baseline should be written");

    let config = RegressionRunnerConfig {
        fixture_id: fixture.id.to_string(),
        baseline_path: perturbed_path,
        actual: RegressionActualSource::Precomputed(output_dir.join("dw_crystal.json")),
        policy_path: None,
        report_path: temp.path().join("strict-report.json"),
    };
    let strict = run_regression(&config).expect("regression run should complete");
    assert!(!strict.passed);
    assert!(strict.comparison.atoms[0].passed);
    assert!(!strict.comparison.atoms[1].passed);
    assert_eq!(strict.comparison.atoms[1].worst_component, [2, 0]);
    assert!(render_human_summary(&strict).starts_with("Regression status: FAIL"));

    let policy_path = temp.path().join("policy.json");
    fs::write(
        &policy_path,
        r#"{ "policyVersion": "loose", "tolerance": { "absTol": 0.0, "relTol": 1.0e-4, "relativeFloor": 1.0e-30 } }"#,
    )
    .expect("policy should be written");
    let loose = run_regression(&RegressionRunnerConfig {
        policy_path: Some(policy_path),
        report_path: temp.path().join("loose-report.json"),
        ..config
    })
    .expect("regression run should complete");
    assert!(loose.passed, "{}", render_human_summary(&loose));
    assert_eq!(loose.policy_version, "loose");
}

#[test]
fn regression_run_reports_missing_baseline_as_io_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let error = run_regression(&RegressionRunnerConfig {
        fixture_id: "FX-DW-MISSING".to_string(),
        baseline_path: temp.path().join("missing.json"),
        actual: RegressionActualSource::Precomputed(temp.path().join("also-missing.json")),
        policy_path: None,
        report_path: temp.path().join("report.json"),
    })
    .expect_err("missing baseline should fail");

    assert_eq!(error.category(), AbinsErrorCategory::IoSystem);
    assert_eq!(error.exit_code(), 3);
    assert!(!temp.path().join("report.json").exists());
}
