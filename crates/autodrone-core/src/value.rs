//! Runtime values for the scripting language.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value on the VM operand stack.
///
/// Scripts can write literals of three types: numbers, strings and
/// booleans. The fourth variant, [`Record`](Value::Record), cannot be
/// written as a literal; it exists for the read-only `inventory` table,
/// the one structured value scripts ever see.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A number. All script numbers are `f64`; integer literals parse
    /// to whole-valued floats.
    Number(f64),
    /// A string.
    Str(String),
    /// A boolean.
    Bool(bool),
    /// A read-only table of named numeric fields, in a fixed order.
    Record(Vec<(String, f64)>),
}

impl Value {
    /// Truthiness: `false`, `0` and `""` are falsy, everything else truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Bool(b) => *b,
            Value::Record(_) => true,
        }
    }

    /// Numeric view of the value: booleans map to 0/1, strings parse as
    /// decimal and fall back to NaN. Total, so arithmetic opcodes never
    /// fail on operand type.
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Str(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
            Value::Record(_) => f64::NAN,
        }
    }

    /// Structural equality for the `==` operator: values of different
    /// types are never equal, numbers compare numerically, strings and
    /// booleans compare exactly.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }

    /// Look up a field of a [`Record`](Value::Record) value. `None` for
    /// missing fields and for non-record values.
    pub fn field(&self, name: &str) -> Option<f64> {
        match self {
            Value::Record(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, v)| *v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Whole-valued numbers print without a fractional part, so
    /// `log 3` prints `3`, not `3.0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Record(fields) => {
                f.write_str("{")?;
                for (i, (name, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {}", Value::Number(*v))?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s)
    }
}
