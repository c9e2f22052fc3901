//! References to type-level entities.
//!
//! Instructions never point at classes or methods directly. They carry
//! symbolic references (loader + name) that a registry resolves lazily,
//! so IR can be built before the referenced classes exist.

use crate::{Name, StringLookup};

/// Symbolic reference to a type: the loader that owns it plus its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef {
    /// Name of the loader the type belongs to.
    pub loader: Name,
    /// Qualified type name within that loader.
    pub name: Name,
}

impl TypeRef {
    #[inline]
    pub const fn new(loader: Name, name: Name) -> Self {
        TypeRef { loader, name }
    }

    /// Render as `loader:name`.
    pub fn display(self, names: &impl StringLookup) -> String {
        format!("{}:{}", names.lookup(self.loader), names.lookup(self.name))
    }
}

/// Symbolic reference to a field (or a global, or a named property slot).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldRef {
    /// The type declaring the field.
    pub declaring: TypeRef,
    /// Field name.
    pub name: Name,
    /// Declared type of the field.
    pub ty: TypeRef,
}

impl FieldRef {
    #[inline]
    pub const fn new(declaring: TypeRef, name: Name, ty: TypeRef) -> Self {
        FieldRef {
            declaring,
            name,
            ty,
        }
    }
}

/// Symbolic reference to a method: declaring type plus selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub declaring: TypeRef,
    pub selector: Name,
}

impl MethodRef {
    #[inline]
    pub const fn new(declaring: TypeRef, selector: Name) -> Self {
        MethodRef {
            declaring,
            selector,
        }
    }
}

/// How a call site selects its callee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dispatch {
    /// Receiver-type dispatch.
    Virtual,
    /// No receiver.
    Static,
    /// Exact target (constructors, super calls).
    Special,
    /// Dispatch through an interface type.
    Interface,
    /// Callee is a first-class function value.
    Dynamic,
}

impl Dispatch {
    /// Returns `true` if the call has no receiver operand.
    #[inline]
    pub fn is_static(self) -> bool {
        matches!(self, Dispatch::Static)
    }
}

/// A call site: program counter within the caller plus the declared target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallSiteRef {
    pub pc: u32,
    pub target: MethodRef,
    pub dispatch: Dispatch,
}

impl CallSiteRef {
    #[inline]
    pub const fn new(pc: u32, target: MethodRef, dispatch: Dispatch) -> Self {
        CallSiteRef {
            pc,
            target,
            dispatch,
        }
    }
}

/// An allocation site: program counter plus the allocated type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NewSiteRef {
    pub pc: u32,
    pub ty: TypeRef,
}

impl NewSiteRef {
    #[inline]
    pub const fn new(pc: u32, ty: TypeRef) -> Self {
        NewSiteRef { pc, ty }
    }
}
