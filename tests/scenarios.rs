//! End-to-end scenarios for the units core
//!
//! Each test builds its own registry so tests stay independent of the
//! process-wide default.

use std::sync::Arc;

use sounio_units::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn unit(registry: &Registry, abbreviation: &str) -> Arc<Unit> {
    registry
        .unit_by_abbreviation(abbreviation)
        .unwrap_or_else(|| panic!("missing unit {abbreviation}"))
}

// ============================================================================
// Custom quantities
// ============================================================================

#[test]
fn jerk_in_inches_per_second_cubed() {
    init_tracing();
    let registry = Registry::new();
    let jerk = Quantity::of(&registry, "Jerk", "m/s3".parse().unwrap()).unwrap();
    let standard = Unit::builder(&jerk, "m/s3", "metre per second cubed")
        .build(&registry)
        .unwrap();
    let inch = standard
        .derive_linear(0.0254, "in/s3", "inch per second cubed")
        .unwrap()
        .unit_system(UnitSystem::Imperial)
        .build(&registry)
        .unwrap();

    assert!(standard.is_standard());
    assert!(!inch.is_standard());
    assert_eq!(inch.scale(), &Scale::linear(0.0254).unwrap());

    let j = Scalar::new(4.0_f64, &inch);
    assert!((j.si() - 0.1016).abs() < 1e-12);
    assert!((j.in_unit(&standard).unwrap() - 0.1016).abs() < 1e-12);

    // jerk × duration lands on the pre-registered acceleration unit
    let seconds = Scalar::new(2.0_f64, &unit(&registry, "s"));
    let acceleration = multiply(&registry, &j, &seconds).unwrap();
    let expected = registry
        .quantity_by_name("Acceleration")
        .and_then(|q| q.standard_unit())
        .unwrap();
    assert!(Arc::ptr_eq(acceleration.unit(), &expected));
    assert!((acceleration.value() - 0.2032).abs() < 1e-12);
}

#[test]
fn derived_results_use_standard_units() {
    let registry = Registry::new();
    let km = unit(&registry, "km");
    let h = unit(&registry, "h");

    let distance = Scalar::new(36.0_f64, &km);
    let time = Scalar::new(0.5_f64, &h);
    let speed = divide(&registry, &distance, &time).unwrap();
    assert_eq!(speed.unit().quantity_name(), "Speed");
    assert!((speed.value() - 20.0).abs() < 1e-9);

    let area = power(&registry, &Scalar::new(3.0_f64, &unit(&registry, "m")), 2).unwrap();
    assert_eq!(area.unit().quantity_name(), "Area");
    assert!((area.value() - 9.0).abs() < 1e-12);
}

#[test]
fn unnamed_products_get_anonymous_units() {
    let registry = Registry::new();
    let a = unit(&registry, "A");
    let current = Scalar::new(2.0_f64, &a);
    let squared = multiply(&registry, &current, &current).unwrap();
    let cubed = multiply(&registry, &squared, &current).unwrap();

    let synthesised = cubed.unit();
    assert_eq!(synthesised.id(), "A3");
    assert!(synthesised.is_generated());
    let quantity = synthesised.quantity().unwrap();
    assert!(quantity.is_anonymous());
    assert_eq!(quantity.name(), "[A3]");
    assert!((cubed.value() - 8.0).abs() < 1e-12);

    // the second request returns the same unit
    let again = registry.lookup_or_create_unit_with_dimensions("A^3".parse().unwrap());
    assert!(Arc::ptr_eq(synthesised, &again));
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn notations_resolve_to_one_unit() {
    let registry = Registry::new();
    let signatures = ["kgm4/s5A3", "kg.m^4/s^5.A^3", "m4kg/A3s5", "kg m4 s-5 A-3"];
    let first =
        registry.lookup_or_create_unit_with_dimensions(signatures[0].parse().unwrap());
    for signature in &signatures[1..] {
        let dims: DimensionVector = signature.parse().unwrap();
        let unit = registry.lookup_or_create_unit_with_dimensions(dims);
        assert!(Arc::ptr_eq(&first, &unit), "{signature}");
    }
    assert_eq!(first.id(), "kg.m4/s5.A3");
}

#[test]
fn repeated_division_is_rejected() {
    let err = DimensionVector::parse("m/m/m/m").unwrap_err();
    assert!(err.is_parse());

    let registry = Registry::new();
    assert!(registry.resolve("m/m/m/m").unwrap_err().is_parse());
}

#[test]
fn parse_errors_render_as_diagnostics() {
    use miette::Diagnostic;

    let err = DimensionVector::parse("kg.m^2/furlong").unwrap_err();
    assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("units::parse"));
    let label = err.labels().and_then(|mut labels| labels.next()).unwrap();
    assert_eq!(label.offset(), 7);
    assert_eq!(label.len(), 7);
    assert!(err.to_string().contains("furlong"));
}

// ============================================================================
// Registry lifecycle
// ============================================================================

#[test]
fn unregistering_a_quantity_removes_its_units() {
    init_tracing();
    let registry = Registry::new();
    let before = registry.len();
    let jerk = Quantity::of(&registry, "Jerk", "m/s3".parse().unwrap()).unwrap();
    Unit::builder(&jerk, "m/s3", "metre per second cubed")
        .abbreviation("jolt")
        .build(&registry)
        .unwrap();
    assert_eq!(registry.len(), before + 1);
    assert!(registry.unit_by_abbreviation("jolt").is_some());

    assert!(registry.unregister(&jerk));
    assert_eq!(registry.len(), before);
    assert!(registry.quantity_by_name("Jerk").is_none());
    assert!(registry.unit_by_abbreviation("jolt").is_none());
    assert!(registry.unit_by_id("m/s3").is_none());

    // units can no longer be attached to the dropped quantity
    let late = Unit::builder(&jerk, "late", "late").build(&registry);
    assert!(matches!(late, Err(UnitError::UnregisteredQuantity { .. })));

    // a second unregister is a no-op
    assert!(!registry.unregister(&jerk));
}

#[test]
fn conflicting_registrations_fail() {
    let registry = Registry::new();
    let err = Quantity::of(&registry, "Length", DimensionVector::TIME).unwrap_err();
    assert!(matches!(err, UnitError::QuantityNameTaken { ref name, .. } if name == "Length"));

    let length = registry.quantity_by_name("Length").unwrap();
    let err = Unit::builder(&length, "km", "second kilometre")
        .build(&registry)
        .unwrap_err();
    assert!(matches!(err, UnitError::RegistrationConflict { .. }));
}

#[test]
fn quantity_of_returns_the_owner_of_its_dimensions() {
    let registry = Registry::new();
    let length = registry.quantity_by_name("Length").unwrap();
    let before = registry.len();

    let stride = Quantity::of(&registry, "Stride", DimensionVector::LENGTH).unwrap();
    assert!(Arc::ptr_eq(&stride, &length));
    assert_eq!(stride.name(), "Length");
    assert!(registry.quantity_by_name("Stride").is_none());
    assert_eq!(registry.len(), before);
}

#[test]
fn registration_with_unrepresentable_prefix_is_all_or_nothing() {
    let registry = Registry::empty();
    let length = Quantity::of(&registry, "Length", DimensionVector::LENGTH).unwrap();
    Unit::builder(&length, "m", "metre").build(&registry).unwrap();

    // quetta down to zetta overflow f64, exa still fits
    let vast = Unit::builder(&length, "vast", "vast metre")
        .scale(Scale::linear(1e290).unwrap())
        .si_prefixes(SiPrefixes::All)
        .build(&registry)
        .unwrap();
    assert!(vast.to_standard(1.0).is_finite());
    for skipped in ["Qvast", "Rvast", "Yvast", "Zvast"] {
        assert!(registry.unit_by_abbreviation(skipped).is_none(), "{skipped}");
    }
    assert!(registry.unit_by_abbreviation("Evast").is_some());
    assert!(registry.unit_by_abbreviation("qvast").is_some());
    assert_eq!(length.units().len(), 2 + 20);
    for unit in length.units() {
        assert!(unit.to_standard(1.0).is_finite(), "{}", unit.id());
    }
}

#[test]
fn exponent_overflow_is_an_error() {
    let registry = Registry::new();
    let m = unit(&registry, "m");
    let big = power(&registry, &Scalar::new(2.0_f64, &m), 100).unwrap();
    assert_eq!(big.unit().id(), "m100");

    let err = multiply(&registry, &big, &big).unwrap_err();
    assert!(matches!(err, UnitError::ExponentOverflow { .. }));
    assert!(DimensionVector::LENGTH.power(100).unwrap().mul(&big.dimensions()).is_none());
    let length = registry.quantity_by_name("Length").unwrap();
    let err = Unit::builder(&length, "km", "second kilometre")
        .build(&registry)
        .unwrap_err();
    assert!(matches!(err, UnitError::RegistrationConflict { .. }));
}

#[test]
fn registries_are_shareable_across_threads() {
    let registry = Arc::new(Registry::new());
    let handles: Vec<_> = (1..=4i8)
        .map(|n| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                let dims = DimensionVector::CURRENT.power(n + 3).unwrap();
                registry.lookup_or_create_unit_with_dimensions(dims).id().to_string()
            })
        })
        .collect();
    let ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(ids, vec!["A4", "A5", "A6", "A7"]);
}

// ============================================================================
// Indexed values
// ============================================================================

#[test]
fn copy_on_write_isolates_edits() {
    let registry = Registry::new();
    let m = unit(&registry, "m");
    let original = Vector::dense(vec![1.0_f64, 2.0, 3.0], &m);

    let mut a = original.mutable();
    let b = original.mutable();
    assert!(a.storage().shares_buffer_with(original.storage()));
    assert!(b.storage().shares_buffer_with(original.storage()));

    a.set(1, 20.0).unwrap();
    assert!(!a.storage().shares_buffer_with(original.storage()));
    assert_eq!(a.to_vec(), vec![1.0, 20.0, 3.0]);
    assert_eq!(b.to_vec(), vec![1.0, 2.0, 3.0]);
    assert_eq!(original.to_vec(), vec![1.0, 2.0, 3.0]);

    // further writes reuse the now-private buffer
    let before = a.storage().clone();
    a.set(2, 30.0).unwrap();
    assert!(!a.storage().shares_buffer_with(&before));
    assert_eq!(before.to_vec(), vec![1.0, 20.0, 3.0]);
}

#[test]
fn result_layout_follows_operands() {
    let registry = Registry::new();
    let n = unit(&registry, "N");
    let m = unit(&registry, "m");

    let dense_force = Vector::dense(vec![1.0_f64, 2.0, 0.0], &n);
    let sparse_force = Vector::sparse(vec![0.0, 2.0, 0.0], &n);
    let dense_distance = Vector::dense(vec![3.0, 4.0, 5.0], &m);
    let sparse_distance = Vector::sparse(vec![3.0, 0.0, 0.0], &m);

    let work = multiply_elementwise(&registry, &dense_force, &dense_distance).unwrap();
    assert!(work.storage().is_dense());
    assert_eq!(work.unit().quantity_name(), "Energy");
    assert_eq!(work.to_vec(), vec![3.0, 8.0, 0.0]);

    let work = multiply_elementwise(&registry, &sparse_force, &dense_distance).unwrap();
    assert!(work.storage().is_sparse());
    assert_eq!(work.to_vec(), vec![0.0, 8.0, 0.0]);

    let work = multiply_elementwise(&registry, &sparse_force, &sparse_distance).unwrap();
    assert!(work.storage().is_sparse());
    assert_eq!(work.cardinality(), 0);

    let short = Vector::dense(vec![1.0], &m);
    assert!(matches!(
        multiply_elementwise(&registry, &dense_force, &short),
        Err(UnitError::ShapeMismatch { .. })
    ));
}

#[test]
fn matrices_divide_elementwise() {
    let registry = Registry::new();
    let j = unit(&registry, "J");
    let s = unit(&registry, "s");
    let energy = Matrix::dense(2, 2, vec![10.0_f64, 20.0, 30.0, 40.0], &j).unwrap();
    let time = Matrix::dense(2, 2, vec![2.0, 4.0, 5.0, 8.0], &s).unwrap();

    let power = divide_elementwise(&registry, &energy, &time).unwrap();
    assert_eq!(power.unit().quantity_name(), "Power");
    assert_eq!(power.to_vec(), vec![5.0, 5.0, 6.0, 5.0]);
    assert!(!power.is_mutable());
}
