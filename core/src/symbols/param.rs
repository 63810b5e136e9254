use serde::{Deserialize, Serialize};

use super::types::TypeSymbol;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterSymbol {
    /// Source name; also the payload of the synthesized null guard.
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSymbol,
    /// Set by binding for parameters declared with the `!` suffix.
    #[serde(default)]
    pub null_checked: bool,
    /// Position in the declaring signature.
    #[serde(default)]
    pub ordinal: usize,
}

impl ParameterSymbol {
    pub fn new(name: impl Into<String>, ty: TypeSymbol, ordinal: usize) -> Self {
        ParameterSymbol {
            name: name.into(),
            ty,
            null_checked: false,
            ordinal,
        }
    }

    pub fn null_checked(mut self) -> Self {
        self.null_checked = true;
        self
    }
}

impl std::fmt::Display for ParameterSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.ty, self.name)?;
        if self.null_checked {
            write!(f, "!")?;
        }
        Ok(())
    }
}
