use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use nullguard_core::ir::lower::{LoweringErrorKind, lower_functions};
use nullguard_core::ir::well_known::THROW_IF_NULL_METHOD_NAME;
use nullguard_core::ir::{
    BinaryOp, BoundBlock, BoundExpr, BoundStmt, CompilationModule, Literal, LocalSymbol, NodeFactory,
    SyntheticNodeFactory,
};
use nullguard_core::symbols::{MethodRef, ParameterSymbol, TypeSymbol};
use nullguard_core::{FunctionDecl, LoweringOptions, ModuleSource, lower_module};

fn string_param(name: &str, checked: bool) -> ParameterSymbol {
    let p = ParameterSymbol::new(name, TypeSymbol::reference("string"), 0);
    if checked { p.null_checked() } else { p }
}

fn body_returning(value: i64) -> BoundBlock {
    BoundBlock::new(
        Vec::new(),
        vec![BoundStmt::Return { value: Some(BoundExpr::Literal { value: Literal::Int(value) }) }],
    )
}

fn helper_calls(body: &BoundBlock) -> Vec<MethodRef> {
    body.statements
        .iter()
        .filter(|stmt| stmt.is_hidden_sequence_point())
        .filter_map(|stmt| match stmt.inner() {
            BoundStmt::If { then_branch, .. } => match &**then_branch {
                BoundStmt::Block { block } => match &block.statements[0] {
                    BoundStmt::Expression { expr } => expr.called_method().cloned(),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect()
}

/// Twenty functions, each null-checking one parameter.
fn many_guarded_functions() -> ModuleSource {
    let functions = (0..20)
        .map(|i| {
            FunctionDecl::new(
                &format!("f{}", i),
                vec![string_param(&format!("p{}", i), true)],
                body_returning(i),
            )
        })
        .collect();
    ModuleSource::new("many", functions)
}

#[test]
fn parallel_lowering_shares_one_helper() {
    let source = many_guarded_functions();
    let lowered = lower_module(&source, &LoweringOptions::default().with_workers(8)).unwrap();

    assert_eq!(lowered.module.synthesized().len(), 1);
    let helper = lowered
        .module
        .synthesized()
        .get_method(THROW_IF_NULL_METHOD_NAME)
        .unwrap();

    let calls: Vec<_> = lowered.functions.iter().flat_map(|f| helper_calls(&f.body)).collect();
    assert_eq!(calls.len(), 20);
    assert!(calls.iter().all(|call| Arc::ptr_eq(call, &helper)));
    assert_eq!(lowered.guard_count(), 20);
}

#[test]
fn output_keeps_declaration_order() {
    let source = many_guarded_functions();
    let lowered = lower_module(&source, &LoweringOptions::default().with_workers(4)).unwrap();

    let names: Vec<_> = lowered.functions.iter().map(|f| f.name.clone()).collect();
    let expected: Vec<_> = (0..20).map(|i| format!("f{}", i)).collect();
    assert_eq!(names, expected);
    assert_eq!(lowered.function("f7").unwrap().body.statements[1].to_string(), "return 7;");
}

#[test]
fn single_worker_matches_parallel_output() {
    let source = many_guarded_functions();
    let serial = lower_module(&source, &LoweringOptions::default().with_workers(1)).unwrap();
    let parallel = lower_module(&source, &LoweringOptions::default().with_workers(6)).unwrap();

    assert_eq!(serial.functions, parallel.functions);
    assert_ne!(serial.module.id(), parallel.module.id());
}

#[test]
fn unchecked_functions_are_left_alone() {
    let body = body_returning(3);
    let source = ModuleSource::new(
        "plain",
        vec![FunctionDecl::new("g", vec![string_param("s", false)], body.clone())],
    );
    let lowered = lower_module(&source, &LoweringOptions::default()).unwrap();

    let g = lowered.function("g").unwrap();
    assert_eq!(g.body, body);
    assert_eq!(g.guards, 0);
    assert!(lowered.module.synthesized().is_empty());
}

#[test]
fn mixed_signature_guards_checked_parameters_only() {
    let source = ModuleSource::new(
        "mixed",
        vec![FunctionDecl::new(
            "f",
            vec![
                string_param("a", true),
                string_param("b", false),
                ParameterSymbol::new("c", TypeSymbol::nullable("int"), 0).null_checked(),
            ],
            body_returning(0),
        )],
    );
    let lowered = lower_module(&source, &LoweringOptions::default()).unwrap();
    let f = lowered.function("f").unwrap();

    assert_eq!(f.guards, 2);
    assert_eq!(f.parameters.iter().map(|p| p.ordinal).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(f.body.statements[0].to_string(), r#"if (a == null) { ThrowIfNull("a"); return; }"#);
    assert_eq!(f.body.statements[1].to_string(), r#"if (!hasValue(c)) { ThrowIfNull("c"); return; }"#);
    assert_eq!(f.body.statements[2].to_string(), "return 0;");
}

#[test]
fn plain_value_null_check_fails_the_module() {
    let source = ModuleSource::new(
        "bad",
        vec![
            FunctionDecl::new("ok", vec![string_param("s", true)], body_returning(0)),
            FunctionDecl::new(
                "broken",
                vec![ParameterSymbol::new("n", TypeSymbol::value("int"), 0).null_checked()],
                body_returning(0),
            ),
        ],
    );
    let err = lower_module(&source, &LoweringOptions::default().with_workers(2)).unwrap_err();
    assert_eq!(err.kind(), LoweringErrorKind::InvariantViolation);
}

#[test]
fn cancelled_before_start_lowers_nothing() {
    let flag = Arc::new(AtomicBool::new(true));
    let options = LoweringOptions::default().with_workers(2).with_cancel(flag);
    let err = lower_module(&many_guarded_functions(), &options).unwrap_err();
    assert_eq!(err.kind(), LoweringErrorKind::Cancelled);
}

#[test]
fn empty_module_lowers_to_nothing() {
    let lowered = lower_module(&ModuleSource::new("empty", Vec::new()), &LoweringOptions::default()).unwrap();
    assert!(lowered.functions.is_empty());
    assert_eq!(lowered.guard_count(), 0);
    assert!(lowered.to_string().starts_with("module empty ("));
}

/// Builds nodes like `SyntheticNodeFactory`, but slowly, and counts the
/// guards it marks hidden.
#[derive(Default)]
struct SlowCountingFactory {
    guards: AtomicUsize,
}

impl NodeFactory for SlowCountingFactory {
    fn null_literal(&self) -> BoundExpr {
        SyntheticNodeFactory.null_literal()
    }
    fn string_literal(&self, value: &str) -> BoundExpr {
        SyntheticNodeFactory.string_literal(value)
    }
    fn int_literal(&self, value: i64) -> BoundExpr {
        SyntheticNodeFactory.int_literal(value)
    }
    fn uint_literal(&self, value: u32) -> BoundExpr {
        SyntheticNodeFactory.uint_literal(value)
    }
    fn parameter(&self, param: &ParameterSymbol) -> BoundExpr {
        SyntheticNodeFactory.parameter(param)
    }
    fn local(&self, local: &LocalSymbol) -> BoundExpr {
        SyntheticNodeFactory.local(local)
    }
    fn not(&self, operand: BoundExpr) -> BoundExpr {
        SyntheticNodeFactory.not(operand)
    }
    fn binary(&self, op: BinaryOp, left: BoundExpr, right: BoundExpr) -> BoundExpr {
        SyntheticNodeFactory.binary(op, left, right)
    }
    fn has_value(&self, operand: BoundExpr) -> BoundExpr {
        SyntheticNodeFactory.has_value(operand)
    }
    fn null_check(&self, operand: BoundExpr, op: BinaryOp) -> BoundExpr {
        SyntheticNodeFactory.null_check(operand, op)
    }
    fn string_length(&self, operand: BoundExpr) -> BoundExpr {
        SyntheticNodeFactory.string_length(operand)
    }
    fn string_char(&self, operand: BoundExpr, index: BoundExpr) -> BoundExpr {
        SyntheticNodeFactory.string_char(operand, index)
    }
    fn static_call(&self, method: &MethodRef, args: Vec<BoundExpr>) -> BoundExpr {
        SyntheticNodeFactory.static_call(method, args)
    }
    fn new_object(&self, constructor: &MethodRef, args: Vec<BoundExpr>) -> BoundExpr {
        SyntheticNodeFactory.new_object(constructor, args)
    }
    fn expression(&self, expr: BoundExpr) -> BoundStmt {
        SyntheticNodeFactory.expression(expr)
    }
    fn ret(&self, value: Option<BoundExpr>) -> BoundStmt {
        SyntheticNodeFactory.ret(value)
    }
    fn throw(&self, value: BoundExpr) -> BoundStmt {
        SyntheticNodeFactory.throw(value)
    }
    fn assign(&self, target: &LocalSymbol, value: BoundExpr) -> BoundStmt {
        SyntheticNodeFactory.assign(target, value)
    }
    fn if_then(&self, condition: BoundExpr, then_branch: BoundStmt) -> BoundStmt {
        SyntheticNodeFactory.if_then(condition, then_branch)
    }
    fn while_loop(&self, condition: BoundExpr, body: BoundStmt) -> BoundStmt {
        SyntheticNodeFactory.while_loop(condition, body)
    }
    fn block_statement(&self, statements: Vec<BoundStmt>) -> BoundStmt {
        SyntheticNodeFactory.block_statement(statements)
    }
    fn hidden_sequence_point(&self, statement: BoundStmt) -> BoundStmt {
        thread::sleep(Duration::from_millis(1));
        self.guards.fetch_add(1, Ordering::SeqCst);
        SyntheticNodeFactory.hidden_sequence_point(statement)
    }
    fn block(&self, locals: Vec<LocalSymbol>, statements: Vec<BoundStmt>) -> BoundBlock {
        SyntheticNodeFactory.block(locals, statements)
    }
}

#[test]
fn first_failure_stops_the_other_workers() {
    let mut functions = vec![FunctionDecl::new(
        "broken",
        vec![ParameterSymbol::new("n", TypeSymbol::value("int"), 0).null_checked()],
        body_returning(0),
    )];
    functions.extend((0..2000).map(|i| {
        FunctionDecl::new(&format!("f{}", i), vec![string_param("s", true)], body_returning(i))
    }));

    let module = CompilationModule::new("stops");
    let factory = SlowCountingFactory::default();
    let options = LoweringOptions::default().with_workers(2);
    let err = lower_functions(&functions, &module, &factory, &options).unwrap_err();

    assert_eq!(err.kind(), LoweringErrorKind::InvariantViolation);
    let built = factory.guards.load(Ordering::SeqCst);
    assert!(built < 1000, "{} guards built after the failure", built);
}
