use abins_core::common::AbinsParameters;
use abins_core::data::{AbinsData, AtomData, AtomsData, DwCrystalData, parse_phonon_document};
use abins_core::domain::{AbinsErrorCategory, ExecutionMode};
use abins_core::modules::dw_crystal::DebyeWallerCalculator;
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;

const FIXTURES: [(&str, f64); 2] = [("molecule", 10.0), ("si2", 300.0)];

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn phonon_document(fixture: &str) -> Value {
    let source = fs::read_to_string(fixture_path(&format!("{}_phonon.json", fixture)))
        .expect("phonon fixture should be readable");
    serde_json::from_str(&source).expect("phonon fixture should parse")
}

fn abins_data(document: &Value) -> AbinsData {
    parse_phonon_document(&document.to_string(), &AbinsParameters::default())
        .expect("phonon document should be accepted")
}

fn compute(data: &AbinsData, kelvin: f64, execution_mode: ExecutionMode) -> DwCrystalData {
    DebyeWallerCalculator::from_kelvin(kelvin, data, AbinsParameters::default())
        .expect("calculator should build")
        .with_execution_mode(execution_mode)
        .calculate_data()
}

fn assert_close(expected: f64, actual: f64, rel_tol: f64, context: &str) {
    let scale = expected.abs().max(1.0e-30);
    assert!(
        (expected - actual).abs() <= rel_tol * scale,
        "{}: expected {:e}, got {:e}",
        context,
        expected,
        actual
    );
}

#[test]
fn every_tensor_is_symmetric() {
    for (fixture, kelvin) in FIXTURES {
        let data = abins_data(&phonon_document(fixture));
        let result = compute(&data, kelvin, ExecutionMode::Serial);

        assert_eq!(result.len(), data.atoms_data().len());
        for (atom, tensor) in result.tensors().iter().enumerate() {
            assert!(
                tensor.is_symmetric(0.0),
                "fixture '{}' atom {} should be exactly symmetric",
                fixture,
                atom
            );
            assert!(tensor.trace() > 0.0);
        }
    }
}

#[test]
fn negative_temperature_is_rejected_and_zero_is_accepted() {
    let data = abins_data(&phonon_document("molecule"));

    let error = DebyeWallerCalculator::from_kelvin(-1.0, &data, AbinsParameters::default())
        .expect_err("negative temperature should be rejected");
    assert_eq!(error.category(), AbinsErrorCategory::InvalidArgument);
    assert_eq!(error.exit_code(), 2);

    let result = compute(&data, 0.0, ExecutionMode::Serial);
    assert!(result.is_finite());
    assert_eq!(result.temperature(), 0.0);
}

#[test]
fn zero_temperature_lower_bounds_finite_temperature() {
    let data = abins_data(&phonon_document("si2"));
    let cold = compute(&data, 0.0, ExecutionMode::Serial);
    let warm = compute(&data, 300.0, ExecutionMode::Serial);

    for atom in 0..cold.len() {
        let cold_msd = cold.isotropic_msd(atom).expect("atom exists");
        let warm_msd = warm.isotropic_msd(atom).expect("atom exists");
        assert!(warm_msd > cold_msd, "atom {} should vibrate more at 300 K", atom);
    }
}

#[test]
fn acoustic_modes_at_gamma_do_not_contribute() {
    let document = phonon_document("molecule");
    let mut masked = document.clone();
    let zero_vector = json!([[0.0, 0.0], [0.0, 0.0], [0.0, 0.0]]);
    for atom in masked["kPoints"][0]["displacements"]
        .as_array_mut()
        .expect("displacements should be an array")
    {
        for mode in 0..3 {
            atom[mode] = zero_vector.clone();
        }
    }
    for mode in 0..3 {
        masked["kPoints"][0]["frequencies"][mode] = json!(0.0);
    }

    let original = compute(&abins_data(&document), 10.0, ExecutionMode::Serial);
    let masked = compute(&abins_data(&masked), 10.0, ExecutionMode::Serial);
    assert_eq!(original, masked);
}

#[test]
fn doubling_an_atom_mass_halves_its_tensor() {
    for (fixture, kelvin) in FIXTURES {
        let data = abins_data(&phonon_document(fixture));
        let mut atoms: Vec<AtomData> = data.atoms_data().iter().cloned().collect();
        atoms[0].mass *= 2.0;
        let heavier_data = data
            .with_atoms_data(AtomsData::new(atoms).expect("atoms should be accepted"))
            .expect("heavier data should be accepted");

        let original = compute(&data, kelvin, ExecutionMode::Serial);
        let heavier = compute(&heavier_data, kelvin, ExecutionMode::Serial);

        assert_eq!(
            heavier.get(0).copied(),
            original.get(0).map(|tensor| tensor.scaled(0.5))
        );
        for atom in 1..original.len() {
            assert_eq!(heavier.get(atom), original.get(atom));
        }
    }
}

#[test]
fn scaling_weights_scales_every_tensor() {
    let data = abins_data(&phonon_document("si2"));
    let original = compute(&data, 300.0, ExecutionMode::Serial);

    for factor in [0.5, 3.0] {
        let scaled_data = data
            .with_k_points_data(data.k_points_data().with_scaled_weights(factor))
            .expect("scaled data should be accepted");
        let scaled = compute(&scaled_data, 300.0, ExecutionMode::Serial);

        for (atom, (base, result)) in original.tensors().iter().zip(scaled.tensors()).enumerate() {
            for row in 0..3 {
                for col in 0..3 {
                    assert_close(
                        factor * base.get(row, col),
                        result.get(row, col),
                        1.0e-13,
                        &format!("factor {} atom {} [{}][{}]", factor, atom, row, col),
                    );
                }
            }
        }
    }
}

#[test]
fn repeated_computations_are_identical() {
    for (fixture, kelvin) in FIXTURES {
        let data = abins_data(&phonon_document(fixture));
        let first = compute(&data, kelvin, ExecutionMode::Serial);
        let second = compute(&data, kelvin, ExecutionMode::Serial);
        assert_eq!(first, second, "fixture '{}' should be deterministic", fixture);
    }
}

#[test]
fn serial_and_parallel_execution_agree_bit_for_bit() {
    for (fixture, kelvin) in FIXTURES {
        let data = abins_data(&phonon_document(fixture));
        let serial = compute(&data, kelvin, ExecutionMode::Serial);
        let parallel = compute(&data, kelvin, ExecutionMode::Parallel);
        assert_eq!(serial.extract(), parallel.extract(), "fixture '{}'", fixture);
    }
}

#[test]
fn malformed_documents_are_rejected_as_invalid_arguments() {
    let document = phonon_document("si2");

    let mut weightless_atom = document.clone();
    weightless_atom["atoms"][1]["mass"] = json!(0.0);

    let mut missing_mode = document.clone();
    missing_mode["kPoints"][1]["displacements"][0]
        .as_array_mut()
        .expect("modes should be an array")
        .pop();

    let mut extra_atom = document.clone();
    extra_atom["atoms"]
        .as_array_mut()
        .expect("atoms should be an array")
        .push(json!({ "symbol": "Si", "mass": 28.0855 }));

    let mut ragged_frequencies = document;
    ragged_frequencies["kPoints"][2]["frequencies"]
        .as_array_mut()
        .expect("frequencies should be an array")
        .push(json!(0.001));

    for (label, malformed) in [
        ("zero mass", weightless_atom),
        ("missing mode", missing_mode),
        ("extra atom", extra_atom),
        ("ragged frequencies", ragged_frequencies),
    ] {
        let error = parse_phonon_document(&malformed.to_string(), &AbinsParameters::default())
            .expect_err("malformed document should be rejected");
        assert_eq!(
            error.category(),
            AbinsErrorCategory::InvalidArgument,
            "{} should be an invalid argument",
            label
        );
    }
}

#[test]
fn wavenumber_input_matches_hartree_input() {
    let parameters = AbinsParameters::default();
    let document = phonon_document("si2");
    let mut wavenumbers = document.clone();
    wavenumbers["frequencyUnit"] = json!("cm-1");
    for k_point in wavenumbers["kPoints"]
        .as_array_mut()
        .expect("k-points should be an array")
    {
        for frequency in k_point["frequencies"]
            .as_array_mut()
            .expect("frequencies should be an array")
        {
            let hartree = frequency.as_f64().expect("frequency should be a number");
            *frequency = json!(hartree / parameters.cm1_2_hartree);
        }
    }

    let hartree = compute(&abins_data(&document), 300.0, ExecutionMode::Serial);
    let converted = compute(&abins_data(&wavenumbers), 300.0, ExecutionMode::Serial);

    for (atom, (expected, actual)) in hartree.tensors().iter().zip(converted.tensors()).enumerate()
    {
        for row in 0..3 {
            for col in 0..3 {
                assert_close(
                    expected.get(row, col),
                    actual.get(row, col),
                    1.0e-12,
                    &format!("atom {} [{}][{}]", atom, row, col),
                );
            }
        }
    }
}

#[test]
fn principal_values_bound_the_isotropic_msd() {
    let data = abins_data(&phonon_document("si2"));
    let result = compute(&data, 300.0, ExecutionMode::Serial);

    for tensor in result.tensors() {
        let principal = tensor.principal_values().expect("principal values should converge");
        assert!(principal[0] <= principal[1] && principal[1] <= principal[2]);
        assert!(principal[0] > 0.0, "tensor should be positive definite");
        assert_close(
            tensor.trace(),
            principal.iter().sum::<f64>(),
            1.0e-12,
            "trace equals eigenvalue sum",
        );
    }
}
