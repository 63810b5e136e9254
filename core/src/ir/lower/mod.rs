//! file: core/src/ir/lower/mod.rs
//! description: function- and module-level lowering drivers.
//!
//! `lower_module` builds a fresh `CompilationModule` for a `ModuleSource`
//! and lowers its functions on a pool of scoped worker threads. Workers
//! share only the module (and through it the synthesized member
//! container); each function's statements belong to the worker lowering it.

pub mod err;
pub mod lowering_context;
pub mod null_check;
pub mod options;
pub mod string_hash;
pub mod throw_helper;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use log::{debug, info, trace};
use serde::Serialize;

pub use self::err::{LoweringError, LoweringErrorKind};
pub use self::lowering_context::LoweringContext;
pub use self::null_check::{
    build_condition, build_guard, construct_null_checked_statement_list, rewrite_null_checking,
};
pub use self::options::LoweringOptions;
pub use self::string_hash::get_or_create_string_hash_helper;
pub use self::throw_helper::get_or_create_throw_helper;

use crate::ir::factory::{NodeFactory, SyntheticNodeFactory};
use crate::ir::module::CompilationModule;
use crate::ir::node::BoundBlock;
use crate::source::{FunctionDecl, ModuleSource};
use crate::symbols::{ParameterSymbol, TypeSymbol};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoweredFunction {
    pub name: String,
    pub parameters: Vec<ParameterSymbol>,
    pub return_type: TypeSymbol,
    pub body: BoundBlock,
    /// Number of null guards prepended to the body.
    pub guards: usize,
}

#[derive(Debug)]
pub struct LoweredModule {
    pub module: CompilationModule,
    /// In declaration order.
    pub functions: Vec<LoweredFunction>,
}

impl LoweredModule {
    pub fn function(&self, name: &str) -> Option<&LoweredFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn guard_count(&self) -> usize {
        self.functions.iter().map(|f| f.guards).sum()
    }
}

impl std::fmt::Display for LoweredModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.module)?;
        for function in &self.functions {
            writeln!(f)?;
            write!(f, "{} {}(", function.return_type, function.name)?;
            for (i, param) in function.parameters.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", param)?;
            }
            writeln!(f, ")")?;
            writeln!(f, "{}", function.body)?;
        }
        Ok(())
    }
}

/// Lower one function body. Functions without null-checked parameters keep
/// their body as is.
pub fn lower_function(
    decl: &FunctionDecl,
    ctx: &LoweringContext<'_>,
) -> Result<LoweredFunction, LoweringError> {
    let ctx = ctx.for_function(&decl.name);
    let (body, guards) = match rewrite_null_checking(&decl.parameters, &decl.body, &ctx)? {
        Some(body) => {
            let guards = body.len() - decl.body.len();
            (body, guards)
        }
        None => (decl.body.clone(), 0),
    };
    trace!("lowered `{}` ({} guard(s))", decl.name, guards);

    Ok(LoweredFunction {
        name: decl.name.clone(),
        parameters: decl.parameters.clone(),
        return_type: decl.return_type.clone(),
        body,
        guards,
    })
}

/// Lower `decls` into `module` using `options.workers` threads. Results come
/// back in declaration order regardless of which worker produced them.
///
/// The first failing function stops every worker before it takes another
/// function; the error of the earliest failing declaration is returned.
pub fn lower_functions(
    decls: &[FunctionDecl],
    module: &CompilationModule,
    factory: &dyn NodeFactory,
    options: &LoweringOptions,
) -> Result<Vec<LoweredFunction>, LoweringError> {
    let ctx = LoweringContext::new(module, factory);
    let workers = options.workers.clamp(1, decls.len().max(1));
    let next = AtomicUsize::new(0);
    let failed = AtomicBool::new(false);
    debug!(
        "lowering {} function(s) of `{}` on {} worker(s)",
        decls.len(),
        module.name(),
        workers
    );

    let batches = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let ctx = &ctx;
                let next = &next;
                let failed = &failed;
                scope.spawn(move || {
                    let mut done = Vec::new();
                    while !options.is_cancelled() && !failed.load(Ordering::Acquire) {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(decl) = decls.get(index) else {
                            break;
                        };
                        trace!("worker {} takes `{}`", worker, decl.name);
                        let result = lower_function(decl, ctx);
                        if result.is_err() {
                            failed.store(true, Ordering::Release);
                        }
                        done.push((index, result));
                    }
                    done
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().map_err(|_| LoweringError::worker_panic(module.name())))
            .collect::<Result<Vec<_>, _>>()
    })?;

    let mut results: Vec<_> = batches.into_iter().flatten().collect();
    results.sort_by_key(|(index, _)| *index);

    let mut lowered = Vec::with_capacity(decls.len());
    for (_, result) in results {
        lowered.push(result?);
    }
    if lowered.len() < decls.len() {
        return Err(LoweringError::cancelled(module.name()));
    }
    Ok(lowered)
}

/// Lower every function of `source` into a new module.
pub fn lower_module(
    source: &ModuleSource,
    options: &LoweringOptions,
) -> Result<LoweredModule, LoweringError> {
    let module = CompilationModule::new(&source.name);
    let factory = SyntheticNodeFactory;
    let functions = lower_functions(&source.functions, &module, &factory, options)?;
    info!(
        "lowered module `{}`: {} function(s), {} synthesized member(s)",
        module.name(),
        functions.len(),
        module.synthesized().len()
    );
    Ok(LoweredModule { module, functions })
}
