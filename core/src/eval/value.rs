use serde::Serialize;

use super::err::{EvalError, EvalErrorKind};
use crate::ir::node::Literal;
use crate::symbols::{TypeKind, TypeSymbol};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u32),
    Str(String),
    /// A nullable value type; `None` is the absent value.
    Nullable(Option<Box<Value>>),
    Object { class: String, fields: Vec<Value> },
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(i) => Value::Int(*i),
            Literal::UInt(u) => Value::UInt(*u),
            Literal::Str(s) => Value::Str(s.clone()),
        }
    }
}

impl Value {
    pub(crate) fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null | Value::Nullable(None))
    }

    /// Class name of an object value (e.g. a thrown exception).
    pub fn class(&self) -> Option<&str> {
        match self {
            Value::Object { class, .. } => Some(class),
            _ => None,
        }
    }

    pub fn fields(&self) -> &[Value] {
        match self {
            Value::Object { fields, .. } => fields,
            _ => &[],
        }
    }

    /// Convert a JSON argument to a value of parameter type `ty`.
    pub fn from_json(json: &serde_json::Value, ty: &TypeSymbol) -> Result<Value, EvalError> {
        match (ty.kind, json) {
            (TypeKind::NullableValue, serde_json::Value::Null) => Ok(Value::Nullable(None)),
            (TypeKind::NullableValue, other) => {
                let underlying = ty.name.trim_end_matches('?');
                Ok(Value::Nullable(Some(Box::new(scalar(other, underlying)?))))
            }
            (TypeKind::Reference, serde_json::Value::Null) => Ok(Value::Null),
            (TypeKind::PlainValue, serde_json::Value::Null) => Err(EvalError::new(
                EvalErrorKind::InvalidArgument,
                format!("`null` is not a value of type `{}`", ty),
            )),
            (_, other) => scalar(other, &ty.name),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Nullable(None) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::UInt(u) => serde_json::Value::from(*u),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Nullable(Some(inner)) => inner.to_json(),
            Value::Object { class, fields } => serde_json::json!({
                "class": class,
                "fields": fields.iter().map(Value::to_json).collect::<Vec<_>>(),
            }),
        }
    }
}

fn scalar(json: &serde_json::Value, type_name: &str) -> Result<Value, EvalError> {
    let invalid = || {
        EvalError::new(
            EvalErrorKind::InvalidArgument,
            format!("`{}` is not a value of type `{}`", json, type_name),
        )
    };
    match json {
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::String(s) => Ok(Value::Str(s.clone())),
        serde_json::Value::Number(n) if type_name == "uint" => n
            .as_u64()
            .and_then(|u| u32::try_from(u).ok())
            .map(Value::UInt)
            .ok_or_else(invalid),
        serde_json::Value::Number(n) => n.as_i64().map(Value::Int).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null | Value::Nullable(None) => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::UInt(u) => write!(f, "{}u", u),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Nullable(Some(inner)) => write!(f, "{}", inner),
            Value::Object { class, fields } => {
                write!(f, "{}(", class)?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", field)?;
                }
                write!(f, ")")
            }
        }
    }
}
