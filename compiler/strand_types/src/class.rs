//! Class model.
//!
//! One `Class` type covers every class shape; the [`ClassKind`] tag says
//! whether it is a plain class, a dynamic-property class or a code body.

use bitflags::bitflags;
use smallvec::SmallVec;
use strand_ir::{Name, Span, TypeRef};

use crate::MethodId;

/// Index of a class in its registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ClassId(u32);

impl ClassId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The shape of a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Plain,
    /// Accepts runtime-named field slots besides its declared ones.
    DynamicProperty,
    /// Backs a callable unit (function or script). `body` is set exactly
    /// once, by binding.
    CodeBody { body: Option<MethodId> },
}

impl ClassKind {
    /// An unbound code body.
    pub const CODE_BODY: ClassKind = ClassKind::CodeBody { body: None };
}

/// Lifecycle of a class. Only moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassState {
    /// Name reserved and attributes set.
    Declared,
    /// Superclass and interfaces looked up successfully.
    HierarchyResolved,
    /// Code body attached.
    BodyBound,
}

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ClassFlags: u8 {
        const INTERFACE = 1 << 0;
        const ABSTRACT = 1 << 1;
        /// Not backed by any input module.
        const SYNTHETIC = 1 << 2;
    }
}

/// Declared interfaces.
pub type Interfaces = SmallVec<[TypeRef; 2]>;

/// A type-level entity owned by one loader's registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Class {
    pub(crate) ty: TypeRef,
    pub(crate) kind: ClassKind,
    pub(crate) superclass: Option<TypeRef>,
    pub(crate) interfaces: Interfaces,
    pub(crate) flags: ClassFlags,
    pub(crate) span: Span,
    pub(crate) state: ClassState,
}

impl Class {
    /// Qualified name plus owning loader.
    #[inline]
    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    #[inline]
    pub fn name(&self) -> Name {
        self.ty.name
    }

    #[inline]
    pub fn loader(&self) -> Name {
        self.ty.loader
    }

    #[inline]
    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    /// Declared superclass; `None` only for a root class.
    #[inline]
    pub fn superclass(&self) -> Option<TypeRef> {
        self.superclass
    }

    #[inline]
    pub fn interfaces(&self) -> &[TypeRef] {
        &self.interfaces
    }

    #[inline]
    pub fn flags(&self) -> ClassFlags {
        self.flags
    }

    /// Definition position.
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    #[inline]
    pub fn state(&self) -> ClassState {
        self.state
    }

    pub fn is_code_body(&self) -> bool {
        matches!(self.kind, ClassKind::CodeBody { .. })
    }

    pub fn supports_dynamic_properties(&self) -> bool {
        matches!(self.kind, ClassKind::DynamicProperty)
    }

    /// The bound code body, for code-body classes that have one.
    pub fn body(&self) -> Option<MethodId> {
        match self.kind {
            ClassKind::CodeBody { body } => body,
            ClassKind::Plain | ClassKind::DynamicProperty => None,
        }
    }

    pub fn is_interface(&self) -> bool {
        self.flags.contains(ClassFlags::INTERFACE)
    }

    pub fn is_synthetic(&self) -> bool {
        self.flags.contains(ClassFlags::SYNTHETIC)
    }
}

/// Everything needed to define a class with an explicit superclass
/// reference, possibly owned by another loader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    pub name: Name,
    pub kind: ClassKind,
    pub superclass: Option<TypeRef>,
    pub interfaces: Interfaces,
    pub flags: ClassFlags,
    pub span: Span,
}

impl ClassDef {
    pub fn new(name: Name, kind: ClassKind) -> Self {
        ClassDef {
            name,
            kind,
            superclass: None,
            interfaces: Interfaces::new(),
            flags: ClassFlags::empty(),
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn superclass(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    #[must_use]
    pub fn interfaces(mut self, interfaces: &[TypeRef]) -> Self {
        self.interfaces = interfaces.into();
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: ClassFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}
