use serde::{Deserialize, Serialize};

/// Static classification of a type, as far as null checking cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Classes, strings, arrays: absence is the null reference.
    Reference,
    /// A value type wrapped in a nullable; absence is a missing value.
    NullableValue,
    /// A value type that can never be absent.
    PlainValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeSymbol {
    pub name: String,
    pub kind: TypeKind,
}

impl TypeSymbol {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        TypeSymbol { name: name.into(), kind }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TypeSymbol::new(name, TypeKind::Reference)
    }

    /// `underlying?`
    pub fn nullable(underlying: &str) -> Self {
        TypeSymbol::new(format!("{}?", underlying), TypeKind::NullableValue)
    }

    pub fn value(name: impl Into<String>) -> Self {
        TypeSymbol::new(name, TypeKind::PlainValue)
    }

    pub fn is_value_type(&self) -> bool {
        !matches!(self.kind, TypeKind::Reference)
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self.kind, TypeKind::NullableValue)
    }

    /// Whether a value of this type can be absent at runtime.
    pub fn admits_null(&self) -> bool {
        !self.is_value_type() || self.is_nullable()
    }
}

impl std::fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
