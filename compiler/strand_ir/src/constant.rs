//! Runtime constants as they appear in symbol tables and metadata loads.
//!
//! Floats are stored as raw bits so `Constant` can be `Eq + Hash`.

use std::fmt;

use crate::{Name, StringLookup};

/// A runtime constant value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    /// `f32` bits.
    Float(u32),
    /// `f64` bits.
    Double(u64),
    String(Name),
}

impl Constant {
    #[inline]
    pub fn float(value: f32) -> Self {
        Constant::Float(value.to_bits())
    }

    #[inline]
    pub fn double(value: f64) -> Self {
        Constant::Double(value.to_bits())
    }

    /// The value class of this constant, used for type classification.
    pub fn kind(self) -> ConstantKind {
        match self {
            Constant::Null => ConstantKind::Null,
            Constant::Bool(_) => ConstantKind::Bool,
            Constant::Int(_) => ConstantKind::Int,
            Constant::Long(_) => ConstantKind::Long,
            Constant::Float(_) => ConstantKind::Float,
            Constant::Double(_) => ConstantKind::Double,
            Constant::String(_) => ConstantKind::String,
        }
    }

    /// Render the constant for IR listings.
    pub fn display(self, names: &impl StringLookup) -> String {
        match self {
            Constant::Null => "null".to_owned(),
            Constant::Bool(b) => b.to_string(),
            Constant::Int(i) => i.to_string(),
            Constant::Long(l) => format!("{l}L"),
            Constant::Float(bits) => format!("{}f", f32::from_bits(bits)),
            Constant::Double(bits) => f64::from_bits(bits).to_string(),
            Constant::String(name) => format!("{:?}", names.lookup(name)),
        }
    }
}

/// Fieldless tag of a [`Constant`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstantKind {
    Null,
    Bool,
    Int,
    Long,
    Float,
    Double,
    String,
}

impl ConstantKind {
    pub fn name(self) -> &'static str {
        match self {
            ConstantKind::Null => "null",
            ConstantKind::Bool => "boolean",
            ConstantKind::Int => "int",
            ConstantKind::Long => "long",
            ConstantKind::Float => "float",
            ConstantKind::Double => "double",
            ConstantKind::String => "string",
        }
    }

    /// Returns `true` for the integral and floating kinds.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ConstantKind::Int | ConstantKind::Long | ConstantKind::Float | ConstantKind::Double
        )
    }
}

impl fmt::Display for ConstantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
