use nullguard_core::ir::lower::{LoweringErrorKind, build_condition};
use nullguard_core::ir::{BinaryOp, BoundExpr, Literal, SyntheticNodeFactory, UnaryOp};
use nullguard_core::symbols::{ParameterSymbol, TypeSymbol};
use nullguard_core::{GuardErrorExt, Level};

#[test]
fn reference_parameter_tests_equality_with_null() {
    let x = ParameterSymbol::new("x", TypeSymbol::reference("string"), 0).null_checked();
    let cond = build_condition(&x, &SyntheticNodeFactory).expect("reference types can be null-checked");

    match &cond {
        BoundExpr::Binary { op, left, right } => {
            assert_eq!(*op, BinaryOp::Equal);
            assert_eq!(**left, BoundExpr::parameter(&x));
            assert_eq!(**right, BoundExpr::Literal { value: Literal::Null });
        }
        other => panic!("expected a null comparison, got {:?}", other),
    }
    assert_eq!(cond.to_string(), "x == null");
}

#[test]
fn nullable_parameter_tests_negated_has_value() {
    let y = ParameterSymbol::new("y", TypeSymbol::nullable("int"), 0).null_checked();
    let cond = build_condition(&y, &SyntheticNodeFactory).expect("nullable value types can be null-checked");

    match &cond {
        BoundExpr::Unary { op: UnaryOp::Not, operand } => match &**operand {
            BoundExpr::HasValue { operand } => assert_eq!(**operand, BoundExpr::parameter(&y)),
            other => panic!("expected hasValue, got {:?}", other),
        },
        other => panic!("expected a negation, got {:?}", other),
    }
    assert_eq!(cond.to_string(), "!hasValue(y)");
}

#[test]
fn nullable_condition_never_compares_against_null() {
    let y = ParameterSymbol::new("y", TypeSymbol::nullable("long"), 0).null_checked();
    let cond = build_condition(&y, &SyntheticNodeFactory).unwrap();
    assert!(!matches!(cond, BoundExpr::Binary { .. }));

    let x = ParameterSymbol::new("x", TypeSymbol::reference("object"), 0).null_checked();
    let cond = build_condition(&x, &SyntheticNodeFactory).unwrap();
    assert!(!matches!(cond, BoundExpr::Unary { .. } | BoundExpr::HasValue { .. }));
}

#[test]
fn plain_value_parameter_is_an_invariant_violation() {
    let n = ParameterSymbol::new("n", TypeSymbol::value("int"), 0).null_checked();
    let err = build_condition(&n, &SyntheticNodeFactory).expect_err("plain value types cannot be null");

    assert_eq!(err.kind(), LoweringErrorKind::InvariantViolation);
    assert_eq!(err.level(), Level::Critical);
    assert!(err.message().contains("`n`"), "{}", err.message());
    assert!(err.message().contains("`int`"), "{}", err.message());
}

#[test]
fn only_types_that_admit_null_get_a_condition() {
    let types = [
        TypeSymbol::reference("string"),
        TypeSymbol::nullable("int"),
        TypeSymbol::value("int"),
    ];
    for ty in types {
        let p = ParameterSymbol::new("p", ty.clone(), 0).null_checked();
        assert_eq!(
            build_condition(&p, &SyntheticNodeFactory).is_ok(),
            ty.admits_null(),
            "{}",
            ty
        );
    }

    assert!(TypeSymbol::nullable("int").is_value_type());
    assert!(TypeSymbol::nullable("int").is_nullable());
    assert!(!TypeSymbol::reference("string").is_nullable());
}
