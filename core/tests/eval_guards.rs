use nullguard_core::eval::EvalErrorKind;
use nullguard_core::ir::lower::get_or_create_string_hash_helper;
use nullguard_core::ir::{
    BinaryOp, BoundBlock, BoundExpr, BoundStmt, Literal, LocalSymbol, SyntheticNodeFactory,
};
use nullguard_core::symbols::{MethodSymbol, ParameterSymbol, TypeSymbol};
use nullguard_core::{FunctionDecl, Interpreter, LoweringOptions, ModuleSource, Outcome, Value, lower_module};

fn returns_length() -> FunctionDecl {
    let x = ParameterSymbol::new("x", TypeSymbol::reference("string"), 0).null_checked();
    let body = BoundBlock::new(
        Vec::new(),
        vec![BoundStmt::Return {
            value: Some(BoundExpr::StringLength { operand: Box::new(BoundExpr::parameter(&x)) }),
        }],
    );
    FunctionDecl::new("length", vec![x], body).returning(TypeSymbol::value("int"))
}

fn returns_successor() -> FunctionDecl {
    let y = ParameterSymbol::new("y", TypeSymbol::nullable("int"), 0).null_checked();
    let body = BoundBlock::new(
        Vec::new(),
        vec![BoundStmt::Return {
            value: Some(BoundExpr::Literal { value: Literal::Str("has value".to_string()) }),
        }],
    );
    FunctionDecl::new("successor", vec![y], body)
}

fn unchecked_length() -> FunctionDecl {
    let s = ParameterSymbol::new("s", TypeSymbol::reference("string"), 0);
    let body = BoundBlock::new(
        Vec::new(),
        vec![BoundStmt::Return {
            value: Some(BoundExpr::StringLength { operand: Box::new(BoundExpr::parameter(&s)) }),
        }],
    );
    FunctionDecl::new("unchecked", vec![s], body)
}

fn source() -> ModuleSource {
    ModuleSource::new("demo", vec![returns_length(), returns_successor(), unchecked_length()])
}

fn assert_argument_null(outcome: Outcome, name: &str) {
    match outcome {
        Outcome::Threw(exception) => {
            assert_eq!(exception.class(), Some("System.ArgumentNullException"));
            assert_eq!(exception.fields(), &[Value::Str(name.to_string())]);
        }
        other => panic!("expected ArgumentNullException, got {:?}", other),
    }
}

#[test]
fn null_reference_argument_throws_with_parameter_name() {
    let lowered = lower_module(&source(), &LoweringOptions::default()).unwrap();
    let interpreter = Interpreter::new(&lowered);

    let outcome = interpreter.invoke("length", vec![Value::Null]).unwrap();
    assert!(outcome.is_throw());
    assert_argument_null(outcome, "x");
}

#[test]
fn non_null_argument_reaches_the_body() {
    let lowered = lower_module(&source(), &LoweringOptions::default()).unwrap();
    let interpreter = Interpreter::new(&lowered);

    let outcome = interpreter.invoke("length", vec![Value::Str("héllo".to_string())]).unwrap();
    assert_eq!(outcome, Outcome::Returned(Value::Int(5)));
}

#[test]
fn absent_nullable_throws_and_present_one_passes() {
    let lowered = lower_module(&source(), &LoweringOptions::default()).unwrap();
    let interpreter = Interpreter::new(&lowered);

    assert_argument_null(interpreter.invoke("successor", vec![Value::Nullable(None)]).unwrap(), "y");

    let present = Value::Nullable(Some(Box::new(Value::Int(0))));
    assert_eq!(
        interpreter.invoke("successor", vec![present]).unwrap(),
        Outcome::Returned(Value::Str("has value".to_string()))
    );
}

#[test]
fn unguarded_null_fails_inside_the_body() {
    let lowered = lower_module(&source(), &LoweringOptions::default()).unwrap();
    let interpreter = Interpreter::new(&lowered);

    match interpreter.invoke("unchecked", vec![Value::Null]).unwrap() {
        Outcome::Threw(exception) => {
            assert_eq!(exception.class(), Some("System.NullReferenceException"))
        }
        other => panic!("expected NullReferenceException, got {:?}", other),
    }
}

#[test]
fn faults_are_errors_not_outcomes() {
    let lowered = lower_module(&source(), &LoweringOptions::default()).unwrap();
    let interpreter = Interpreter::new(&lowered);

    let err = interpreter.invoke("missing", Vec::new()).unwrap_err();
    assert_eq!(err.kind(), EvalErrorKind::UnknownFunction);

    let err = interpreter.invoke("length", Vec::new()).unwrap_err();
    assert_eq!(err.kind(), EvalErrorKind::Arity);
}

#[test]
fn step_limit_stops_runaway_loops() {
    let body = BoundBlock::new(
        Vec::new(),
        vec![BoundStmt::While {
            condition: BoundExpr::Literal { value: Literal::Bool(true) },
            body: Box::new(BoundStmt::Block { block: BoundBlock::default() }),
        }],
    );
    let source = ModuleSource::new("spin", vec![FunctionDecl::new("spin", Vec::new(), body)]);
    let lowered = lower_module(&source, &LoweringOptions::default()).unwrap();
    let interpreter = Interpreter::new(&lowered).with_step_limit(1_000);

    let err = interpreter.invoke("spin", Vec::new()).unwrap_err();
    assert_eq!(err.kind(), EvalErrorKind::StepLimit);
}

#[test]
fn string_hash_helper_computes_fnv1a() {
    let s = ParameterSymbol::new("s", TypeSymbol::reference("string"), 0);
    let source = ModuleSource::new("hashing", vec![FunctionDecl::new("placeholder", Vec::new(), BoundBlock::default())]);
    let mut lowered = lower_module(&source, &LoweringOptions::default()).unwrap();

    let helper = get_or_create_string_hash_helper(&lowered.module, &SyntheticNodeFactory);
    let call = BoundExpr::Call { method: helper, args: vec![BoundExpr::parameter(&s)] };
    lowered.functions[0].name = "hash".to_string();
    lowered.functions[0].parameters = vec![s];
    lowered.functions[0].body = BoundBlock::new(Vec::new(), vec![BoundStmt::Return { value: Some(call) }]);

    let interpreter = Interpreter::new(&lowered);
    let hash = |arg: Value| match interpreter.invoke("hash", vec![arg]).unwrap() {
        Outcome::Returned(value) => value,
        other => panic!("hash threw: {:?}", other),
    };

    assert_eq!(hash(Value::Null), Value::UInt(2166136261));
    assert_eq!(hash(Value::Str(String::new())), Value::UInt(2166136261));
    assert_eq!(hash(Value::Str("a".to_string())), Value::UInt(3826002220));
    assert_eq!(hash(Value::Str("abc".to_string())), Value::UInt(440920331));
}

#[test]
fn equality_treats_absent_nullables_as_null() {
    let p = ParameterSymbol::new("p", TypeSymbol::nullable("int"), 0);
    let body = BoundBlock::new(
        Vec::new(),
        vec![BoundStmt::Return {
            value: Some(BoundExpr::Binary {
                op: BinaryOp::Equal,
                left: Box::new(BoundExpr::parameter(&p)),
                right: Box::new(BoundExpr::Literal { value: Literal::Null }),
            }),
        }],
    );
    let source = ModuleSource::new("eq", vec![FunctionDecl::new("is_null", vec![p], body)]);
    let lowered = lower_module(&source, &LoweringOptions::default()).unwrap();
    let interpreter = Interpreter::new(&lowered);

    assert_eq!(
        interpreter.invoke("is_null", vec![Value::Nullable(None)]).unwrap(),
        Outcome::Returned(Value::Bool(true))
    );
    assert_eq!(
        interpreter.invoke("is_null", vec![Value::Nullable(Some(Box::new(Value::Int(1))))]).unwrap(),
        Outcome::Returned(Value::Bool(false))
    );
}

#[test]
fn unbounded_recursion_is_an_error() {
    let recurse = MethodSymbol::ordinary("demo", "recurse", Vec::new(), TypeSymbol::value("void"));
    let body = BoundBlock::new(
        Vec::new(),
        vec![BoundStmt::Expression { expr: BoundExpr::Call { method: recurse, args: Vec::new() } }],
    );
    let source = ModuleSource::new("deep", vec![FunctionDecl::new("recurse", Vec::new(), body)]);
    let lowered = lower_module(&source, &LoweringOptions::default()).unwrap();
    let interpreter = Interpreter::new(&lowered);

    let err = interpreter.invoke("recurse", Vec::new()).unwrap_err();
    assert_eq!(err.kind(), EvalErrorKind::CallDepth);

    // The depth counter starts over for every invocation.
    let err = interpreter.invoke("recurse", Vec::new()).unwrap_err();
    assert_eq!(err.kind(), EvalErrorKind::CallDepth);
}

#[test]
fn bounded_recursion_within_the_limit_completes() {
    let n = ParameterSymbol::new("n", TypeSymbol::value("int"), 0);
    let countdown = MethodSymbol::ordinary("demo", "countdown", vec![n.clone()], TypeSymbol::value("int"));
    // if (n < 1) { return 0; } return countdown(n + -1);
    let body = BoundBlock::new(
        Vec::new(),
        vec![
            BoundStmt::If {
                condition: BoundExpr::Binary {
                    op: BinaryOp::LessThan,
                    left: Box::new(BoundExpr::parameter(&n)),
                    right: Box::new(BoundExpr::Literal { value: Literal::Int(1) }),
                },
                then_branch: Box::new(BoundStmt::Return {
                    value: Some(BoundExpr::Literal { value: Literal::Int(0) }),
                }),
                else_branch: None,
            },
            BoundStmt::Return {
                value: Some(BoundExpr::Call {
                    method: countdown,
                    args: vec![BoundExpr::Binary {
                        op: BinaryOp::Add,
                        left: Box::new(BoundExpr::parameter(&n)),
                        right: Box::new(BoundExpr::Literal { value: Literal::Int(-1) }),
                    }],
                }),
            },
        ],
    );
    let source = ModuleSource::new("count", vec![FunctionDecl::new("countdown", vec![n], body)]);
    let lowered = lower_module(&source, &LoweringOptions::default()).unwrap();

    let interpreter = Interpreter::new(&lowered);
    assert_eq!(
        interpreter.invoke("countdown", vec![Value::Int(10)]).unwrap(),
        Outcome::Returned(Value::Int(0))
    );

    let shallow = Interpreter::new(&lowered).with_call_depth_limit(5);
    let err = shallow.invoke("countdown", vec![Value::Int(10)]).unwrap_err();
    assert_eq!(err.kind(), EvalErrorKind::CallDepth);
}

#[test]
fn inner_block_local_shadows_outer_until_block_ends() {
    let int = TypeSymbol::value("int");
    let assign = |value: i64| BoundStmt::Assign {
        target: "x".to_string(),
        value: BoundExpr::Literal { value: Literal::Int(value) },
    };
    // int x; x = 5; { int x; x = 1; } return x;
    let body = BoundBlock::new(
        vec![LocalSymbol::new("x", int.clone())],
        vec![
            assign(5),
            BoundStmt::Block {
                block: BoundBlock::new(vec![LocalSymbol::new("x", int.clone())], vec![assign(1)]),
            },
            BoundStmt::Return { value: Some(BoundExpr::Local { name: "x".to_string() }) },
        ],
    );
    let source = ModuleSource::new("scopes", vec![FunctionDecl::new("shadow", Vec::new(), body)]);
    let lowered = lower_module(&source, &LoweringOptions::default()).unwrap();

    assert_eq!(
        Interpreter::new(&lowered).invoke("shadow", Vec::new()).unwrap(),
        Outcome::Returned(Value::Int(5))
    );
}

#[test]
fn block_locals_go_out_of_scope() {
    // { int y; y = 2; } return y;
    let body = BoundBlock::new(
        Vec::new(),
        vec![
            BoundStmt::Block {
                block: BoundBlock::new(
                    vec![LocalSymbol::new("y", TypeSymbol::value("int"))],
                    vec![BoundStmt::Assign {
                        target: "y".to_string(),
                        value: BoundExpr::Literal { value: Literal::Int(2) },
                    }],
                ),
            },
            BoundStmt::Return { value: Some(BoundExpr::Local { name: "y".to_string() }) },
        ],
    );
    let source = ModuleSource::new("scopes", vec![FunctionDecl::new("leak", Vec::new(), body)]);
    let lowered = lower_module(&source, &LoweringOptions::default()).unwrap();

    let err = Interpreter::new(&lowered).invoke("leak", Vec::new()).unwrap_err();
    assert_eq!(err.kind(), EvalErrorKind::UnknownVariable);
}
