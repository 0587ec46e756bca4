use std::fmt::{Display, Formatter};

/// Typed scalar carried by [Term](super::Predicate::Term) and
/// [Terms](super::Predicate::Terms) leaves.
///
/// # Purpose
/// Preserves the native representation of a filter value all the way to the
/// executing backend. A taxon id stays a 32-bit integer, a behavior flag
/// stays a boolean, a dataset identifier stays a string. Values with no
/// native representation fall back to their string form via `From<String>`.
///
/// # Usage
/// Create values using the From trait:
/// ```text
/// let v: TermValue = 42i32.into();
/// let v = TermValue::from("HKr.CR");
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TermValue {
    /// Represents a boolean value.
    Bool(bool),
    /// Represents a 64-bit floating point value.
    F64(f64),
    /// Represents a signed 64-bit integer value.
    I64(i64),
    /// Represents a signed 32-bit integer value.
    I32(i32),
    /// Represents a signed 16-bit integer value.
    I16(i16),
    /// Represents a signed 8-bit integer value.
    I8(i8),
    /// Represents a string value. Also the fallback form for types the
    /// backend has no native representation for.
    Str(String),
}

impl Display for TermValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TermValue::Bool(v) => write!(f, "{}", v),
            TermValue::F64(v) => write!(f, "{}", v),
            TermValue::I64(v) => write!(f, "{}", v),
            TermValue::I32(v) => write!(f, "{}", v),
            TermValue::I16(v) => write!(f, "{}", v),
            TermValue::I8(v) => write!(f, "{}", v),
            TermValue::Str(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for TermValue {
    #[inline]
    fn from(value: bool) -> Self {
        TermValue::Bool(value)
    }
}

impl From<f64> for TermValue {
    #[inline]
    fn from(value: f64) -> Self {
        TermValue::F64(value)
    }
}

impl From<i64> for TermValue {
    #[inline]
    fn from(value: i64) -> Self {
        TermValue::I64(value)
    }
}

impl From<i32> for TermValue {
    #[inline]
    fn from(value: i32) -> Self {
        TermValue::I32(value)
    }
}

impl From<i16> for TermValue {
    #[inline]
    fn from(value: i16) -> Self {
        TermValue::I16(value)
    }
}

impl From<i8> for TermValue {
    #[inline]
    fn from(value: i8) -> Self {
        TermValue::I8(value)
    }
}

impl From<String> for TermValue {
    #[inline]
    fn from(value: String) -> Self {
        TermValue::Str(value)
    }
}

impl From<&str> for TermValue {
    #[inline]
    fn from(value: &str) -> Self {
        TermValue::Str(value.to_string())
    }
}

/// Typed parameter carried by a [Script](super::Predicate::Script) leaf.
///
/// Script parameters are forwarded to the execution layer as-is, so they
/// serialize untagged into the natural JSON form (`"hours": [4, 5, 6]`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ScriptParam {
    /// Represents a boolean parameter.
    Bool(bool),
    /// Represents a signed 64-bit integer parameter.
    I64(i64),
    /// Represents a 64-bit floating point parameter.
    F64(f64),
    /// Represents a string parameter.
    Str(String),
    /// Represents a list of integers, e.g. an hour set or a day-of-year set.
    IntList(Vec<i64>),
    /// Represents a list of strings.
    StrList(Vec<String>),
}

impl From<bool> for ScriptParam {
    #[inline]
    fn from(value: bool) -> Self {
        ScriptParam::Bool(value)
    }
}

impl From<i64> for ScriptParam {
    #[inline]
    fn from(value: i64) -> Self {
        ScriptParam::I64(value)
    }
}

impl From<f64> for ScriptParam {
    #[inline]
    fn from(value: f64) -> Self {
        ScriptParam::F64(value)
    }
}

impl From<String> for ScriptParam {
    #[inline]
    fn from(value: String) -> Self {
        ScriptParam::Str(value)
    }
}

impl From<&str> for ScriptParam {
    #[inline]
    fn from(value: &str) -> Self {
        ScriptParam::Str(value.to_string())
    }
}

impl From<Vec<i64>> for ScriptParam {
    #[inline]
    fn from(value: Vec<i64>) -> Self {
        ScriptParam::IntList(value)
    }
}

impl From<Vec<String>> for ScriptParam {
    #[inline]
    fn from(value: Vec<String>) -> Self {
        ScriptParam::StrList(value)
    }
}
