//! End-to-end tests for type-enforced containers
//!
//! Tests the full lifecycle: class declaration -> synthesis ->
//! instantiation -> policed mutation -> derivation and narrowing.

use pyxis::{
    ClassError, ClassSpec, ContainerClass, Severity, SeverityOverride, StorageKind, TypeTag,
    TypedList, Value,
};

// =============================================================================
// CLASS SYNTHESIS
// =============================================================================

/// The canonical "list of ints" scenario: construct, mutate, reject.
#[test]
fn test_list_of_int_scenario() {
    let class = ContainerClass::list_of("Ints", vec![TypeTag::Integer]).unwrap();

    let mut list = class
        .instantiate(vec![
            Value::Integer(1),
            Value::Integer(2),
            Value::Integer(3),
        ])
        .unwrap();
    assert_eq!(list.len(), 3);
    for value in &list {
        assert!(value.conforms_to(&TypeTag::Integer));
    }

    // Default severity is raise: the append fails and nothing changes
    let violation = list.append(Value::from("x")).unwrap_err();
    assert_eq!(list.len(), 3);
    assert_eq!(violation.actual, TypeTag::Text);
    assert!(violation.to_string().contains("'Ints'"));
}

/// Factory invoked with zero types fails before any class exists
#[test]
fn test_zero_types_is_configuration_error() {
    let err = ContainerClass::list_of("Nothing", vec![]).unwrap_err();
    assert!(matches!(err, ClassError::NoTypesGiven));
}

/// Enforcement-only declaration without a sequence base is a usage error
#[test]
fn test_enforcement_only_needs_sequence_base() {
    let err = ClassSpec::new("Orphan")
        .of_types(vec![TypeTag::Integer])
        .unwrap()
        .build()
        .unwrap_err();
    assert!(matches!(err, ClassError::MissingStorage { .. }));

    // The same declaration with an explicit storage base synthesizes
    let class = ClassSpec::new("Anchored")
        .of_types(vec![TypeTag::Integer])
        .unwrap()
        .storage(StorageKind::Vec)
        .build()
        .unwrap();
    assert_eq!(class.name(), "Anchored");
}

// =============================================================================
// DERIVATION AND NARROWING
// =============================================================================

/// A derived class may narrow its ancestor's restriction
#[test]
fn test_derivation_narrows() {
    let numbers = ContainerClass::list_of("Numbers", vec![TypeTag::Number]).unwrap();
    let ints = ClassSpec::new("Ints")
        .derive_from(&numbers)
        .of_types(vec![TypeTag::Integer])
        .unwrap()
        .build()
        .unwrap();

    // The narrowed class rejects what the parent would accept
    let mut list = TypedList::empty(&ints);
    list.append(Value::Integer(1)).unwrap();
    assert!(list.append(Value::Float(1.5)).is_err());
    assert_eq!(list.len(), 1);
}

/// The reverse direction - widening - is a composition conflict
#[test]
fn test_derivation_cannot_widen() {
    let ints = ContainerClass::list_of("Ints", vec![TypeTag::Integer]).unwrap();
    let err = ClassSpec::new("Widened")
        .derive_from(&ints)
        .of_types(vec![TypeTag::Number])
        .unwrap()
        .build()
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("number"));
    assert!(message.contains("integer"));
    assert!(message.contains("Widened"));
}

/// Custom nominal types participate in narrowing like built-ins
#[test]
fn test_custom_type_narrowing() {
    let event_id = TypeTag::custom("event_id", TypeTag::Integer);

    let ints = ContainerClass::list_of("Ints", vec![TypeTag::Integer]).unwrap();
    let events = ClassSpec::new("Events")
        .derive_from(&ints)
        .of_types(vec![event_id.clone()])
        .unwrap()
        .build()
        .unwrap();

    let mut list = TypedList::empty(&events);
    list.append(Value::tagged(event_id, Value::Integer(7))).unwrap();
    // A bare integer is no longer specific enough
    assert!(list.append(Value::Integer(7)).is_err());
    assert_eq!(list.len(), 1);
}

// =============================================================================
// SEVERITY POLICY
// =============================================================================

/// Warn severity: the mutation succeeds, one diagnostic, item stored
#[test]
fn test_warn_severity_stores_and_warns() {
    let class = ContainerClass::list_of("Ints", vec![TypeTag::Integer]).unwrap();
    class.set_severity("warn".parse::<Severity>().unwrap());

    let mut list = TypedList::empty(&class);
    let warning = list.append(Value::from("oops")).unwrap();

    let warning = warning.expect("warn severity should produce a diagnostic");
    assert_eq!(warning.index, 0);
    assert_eq!(list.len(), 1);
}

/// Silent severity: the mutation succeeds, no diagnostic, item stored
#[test]
fn test_silent_severity_stores_quietly() {
    let class = ContainerClass::list_of("Ints", vec![TypeTag::Integer]).unwrap();
    class.set_severity(Severity::from_level(-1).unwrap());

    let mut list = TypedList::empty(&class);
    let warning = list.append(Value::from("oops")).unwrap();

    assert!(warning.is_none());
    assert_eq!(list.len(), 1);
}

/// Severity is inherited by subclasses until they override it
#[test]
fn test_severity_inheritance_across_classes() {
    let parent = ContainerClass::list_of("Parent", vec![TypeTag::Integer]).unwrap();
    let child = ClassSpec::new("Child").derive_from(&parent).build().unwrap();

    parent.set_severity(Severity::Warn);
    let mut list = TypedList::empty(&child);
    assert!(list.append(Value::from("x")).unwrap().is_some());

    child.set_severity(Severity::Raise);
    assert!(list.append(Value::from("y")).is_err());
    assert_eq!(list.len(), 1);
}

/// Per-call flags beat the class-level setting
#[test]
fn test_per_call_override() {
    let class = ContainerClass::list_of("Ints", vec![TypeTag::Integer]).unwrap();
    class.set_severity(Severity::Silent);

    let mut list = TypedList::empty(&class);
    // Explicit raises flag on a silent class
    let result = list.extend_with(vec![Value::from("x")], SeverityOverride::raises());
    assert!(result.is_err());
    assert!(list.is_empty());

    // No flags set also resolves to raise on the bulk entry point
    let result = list.extend_with(vec![Value::from("x")], SeverityOverride::default());
    assert!(result.is_err());

    // The default-mode entry point follows the class setting
    let report = list.extend(vec![Value::from("x")]).unwrap();
    assert_eq!(report.accepted, 1);
    assert!(report.warnings.is_empty());
    assert_eq!(list.len(), 1);
}

// =============================================================================
// BULK VALIDATION
// =============================================================================

/// Order is preserved and validation is interleaved with storage
#[test]
fn test_extend_interleaves_validation_and_storage() {
    let class = ContainerClass::list_of("Ints", vec![TypeTag::Integer]).unwrap();
    let mut list = TypedList::empty(&class);

    let violation = list
        .extend(vec![
            Value::Integer(10),
            Value::Integer(20),
            Value::from("bad"),
            Value::Integer(30),
        ])
        .unwrap_err();

    assert_eq!(violation.index, 2);
    assert_eq!(list.items(), &[Value::Integer(10), Value::Integer(20)]);
}

/// Construction from a warn-mode class stores everything and reports
/// deduplicated warnings
#[test]
fn test_bulk_construction_with_warnings() {
    let class =
        ContainerClass::list_of("Ints", vec![TypeTag::Integer]).unwrap();

    let (list, report) = TypedList::with_severity(
        &class,
        vec![
            Value::Integer(1),
            Value::from("a"),
            Value::from("b"),
            Value::Float(0.5),
        ],
        SeverityOverride::warns(),
    )
    .unwrap();

    assert_eq!(list.len(), 4);
    assert_eq!(report.accepted, 4);
    // Two text violations collapse; the float one is distinct
    assert_eq!(report.warnings.len(), 2);
}

/// Multiple allowed types: membership in any of them is enough, and the
/// diagnostic phrase names the whole list
#[test]
fn test_multiple_allowed_types() {
    let class =
        ContainerClass::list_of("Scalars", vec![TypeTag::Integer, TypeTag::Text]).unwrap();

    let mut list = class
        .instantiate(vec![Value::Integer(1), Value::from("two")])
        .unwrap();
    assert_eq!(list.len(), 2);

    let violation = list.append(Value::Float(3.0)).unwrap_err();
    assert!(violation.expected.contains("one of [integer, text]"));
}
