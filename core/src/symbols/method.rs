use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::param::ParameterSymbol;
use super::types::TypeSymbol;

pub const CONSTRUCTOR_NAME: &str = ".ctor";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Ordinary,
    Constructor,
    /// Generated by the compiler into the module's private container.
    Synthesized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSymbol {
    pub name: String,
    /// Name of the containing type.
    pub container: String,
    pub parameters: Vec<ParameterSymbol>,
    pub return_type: TypeSymbol,
    pub kind: MethodKind,
}

/// Shared handle to a method symbol. Two references denote the same method
/// only when `Arc::ptr_eq` holds.
pub type MethodRef = Arc<MethodSymbol>;

impl MethodSymbol {
    pub fn ordinary(
        container: &str,
        name: &str,
        parameters: Vec<ParameterSymbol>,
        return_type: TypeSymbol,
    ) -> MethodRef {
        Arc::new(MethodSymbol {
            name: name.to_string(),
            container: container.to_string(),
            parameters,
            return_type,
            kind: MethodKind::Ordinary,
        })
    }

    pub fn synthesized(
        container: &str,
        name: &str,
        parameters: Vec<ParameterSymbol>,
        return_type: TypeSymbol,
    ) -> MethodRef {
        Arc::new(MethodSymbol {
            name: name.to_string(),
            container: container.to_string(),
            parameters,
            return_type,
            kind: MethodKind::Synthesized,
        })
    }

    pub fn constructor(ty: &TypeSymbol, parameters: Vec<ParameterSymbol>, void: TypeSymbol) -> MethodRef {
        Arc::new(MethodSymbol {
            name: CONSTRUCTOR_NAME.to_string(),
            container: ty.name.clone(),
            parameters,
            return_type: void,
            kind: MethodKind::Constructor,
        })
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.container, self.name)
    }
}

impl std::fmt::Display for MethodSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind == MethodKind::Synthesized {
            write!(f, "static ")?;
        }
        write!(f, "{} {}(", self.return_type, self.qualified_name())?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}
