//! Reserved names and well-known types/members the lowering relies on.

use lazy_static::lazy_static;

use crate::symbols::{MethodRef, MethodSymbol, ParameterSymbol, TypeSymbol};

/// Compiler-private type holding every synthesized member of a module.
pub const PRIVATE_IMPLEMENTATION_DETAILS: &str = "<PrivateImplementationDetails>";
pub const THROW_IF_NULL_METHOD_NAME: &str = "ThrowIfNull";
pub const STRING_HASH_METHOD_NAME: &str = "ComputeStringHash";
pub const ARGUMENT_NULL_EXCEPTION: &str = "System.ArgumentNullException";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialType {
    Void,
    String,
    UInt32,
    Int32,
}

lazy_static! {
    static ref VOID: TypeSymbol = TypeSymbol::value("void");
    static ref STRING: TypeSymbol = TypeSymbol::reference("string");
    static ref UINT32: TypeSymbol = TypeSymbol::value("uint");
    static ref INT32: TypeSymbol = TypeSymbol::value("int");
    static ref ARGUMENT_NULL_EXCEPTION_TYPE: TypeSymbol =
        TypeSymbol::reference(ARGUMENT_NULL_EXCEPTION);
}

pub fn special_type(ty: SpecialType) -> TypeSymbol {
    match ty {
        SpecialType::Void => VOID.clone(),
        SpecialType::String => STRING.clone(),
        SpecialType::UInt32 => UINT32.clone(),
        SpecialType::Int32 => INT32.clone(),
    }
}

/// Members resolved once per module from the type system.
#[derive(Debug, Clone)]
pub struct WellKnownMembers {
    argument_null_exception_ctor: MethodRef,
}

impl WellKnownMembers {
    pub fn resolve() -> Self {
        let message = ParameterSymbol::new("paramName", special_type(SpecialType::String), 0);
        let ctor = MethodSymbol::constructor(
            &ARGUMENT_NULL_EXCEPTION_TYPE,
            vec![message],
            special_type(SpecialType::Void),
        );
        WellKnownMembers { argument_null_exception_ctor: ctor }
    }

    /// `System.ArgumentNullException(string paramName)`
    pub fn argument_null_exception_ctor(&self) -> &MethodRef {
        &self.argument_null_exception_ctor
    }
}

impl Default for WellKnownMembers {
    fn default() -> Self {
        Self::resolve()
    }
}
