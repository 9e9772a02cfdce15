use std::fmt;

use crate::schema::SchemaError;

/// Type tag of a [`Value`]'s payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Str,
    Int,
    Float,
    Bool,
}

impl ValueKind {
    /// Short tag used in help output (`[type=int, ...]`).
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Str => "str",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of payloads a command or flag can carry.
///
/// Registration accepts anything `Into<Payload>`, so the supported kinds are
/// fixed at compile time; there is no runtime "unsupported type" path.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Payload {
    pub fn kind(&self) -> ValueKind {
        match self {
            Payload::Str(_) => ValueKind::Str,
            Payload::Int(_) => ValueKind::Int,
            Payload::Float(_) => ValueKind::Float,
            Payload::Bool(_) => ValueKind::Bool,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Str(s) => f.write_str(s),
            Payload::Int(i) => write!(f, "{i}"),
            Payload::Float(x) => write!(f, "{x}"),
            Payload::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Str(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Str(s)
    }
}

impl From<i64> for Payload {
    fn from(i: i64) -> Self {
        Payload::Int(i)
    }
}

impl From<f64> for Payload {
    fn from(x: f64) -> Self {
        Payload::Float(x)
    }
}

impl From<bool> for Payload {
    fn from(b: bool) -> Self {
        Payload::Bool(b)
    }
}

/// Requested a payload of one kind from a [`Value`] storing another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("type mismatch: value is {stored}, requested {requested}")]
pub struct TypeMismatch {
    pub stored: ValueKind,
    pub requested: ValueKind,
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
    impl Sealed for bool {}
}

/// Types a payload can be read back as. Sealed: exactly the four kinds.
pub trait FromPayload: sealed::Sealed + Sized {
    #[doc(hidden)]
    const KIND: ValueKind;

    #[doc(hidden)]
    fn from_payload(payload: &Payload) -> Option<Self>;
}

impl FromPayload for String {
    const KIND: ValueKind = ValueKind::Str;

    fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromPayload for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromPayload for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl FromPayload for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_payload(payload: &Payload) -> Option<Self> {
        match payload {
            Payload::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// One registered command or flag: a description and a typed payload.
///
/// The kind is derived from the payload at construction and never changes;
/// the parser replaces the payload only with one of the same kind.
#[derive(Debug, Clone)]
pub struct Value {
    description: String,
    payload: Payload,
}

impl Value {
    /// Builds a value from a typed default. The description must be
    /// non-empty; it is immutable afterwards.
    pub fn new(
        default: impl Into<Payload>,
        description: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        let description = description.into();
        if description.is_empty() {
            return Err(SchemaError::InvalidDefinition {
                reason: "description must not be empty".to_string(),
            });
        }
        Ok(Value { description, payload: default.into() })
    }

    pub fn kind(&self) -> ValueKind {
        self.payload.kind()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Reads the payload as `T`, failing when `T`'s kind differs from the
    /// stored tag. There is no silent conversion between kinds.
    pub fn get<T: FromPayload>(&self) -> Result<T, TypeMismatch> {
        T::from_payload(&self.payload).ok_or(TypeMismatch {
            stored: self.kind(),
            requested: T::KIND,
        })
    }

    /// Overwrites the payload after a successful coercion. Callers guarantee
    /// the kind matches; the tag and description are never touched.
    pub(crate) fn set_payload(&mut self, payload: Payload) {
        debug_assert_eq!(payload.kind(), self.payload.kind());
        self.payload = payload;
    }
}
