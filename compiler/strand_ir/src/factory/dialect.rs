//! `Dialect`: the instruction-shape policy of one language's factory.

use bitflags::bitflags;

use crate::{ExceptionTypes, TypeRef};

bitflags! {
    /// Optional instruction shapes a dialect may support.
    ///
    /// Assign, phi, pi, instance field access, the control transfers,
    /// get-caught-exception, allocation, unary/binary/comparison and
    /// unchecked conversion are always available and have no flag.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct Shapes: u32 {
        // === Baseline (bits 0-15) ===

        /// Array length, load and store.
        const ARRAYS = 1 << 0;
        /// Field access without a receiver.
        const STATIC_FIELDS = 1 << 1;
        /// Calls whose target is named by the call site.
        const TYPED_INVOKE = 1 << 2;
        /// Calls through a first-class function value.
        const FUNCTION_INVOKE = 1 << 3;
        /// Allocation with constructor arguments.
        const NEW_WITH_ARGS = 1 << 4;
        const CHECK_CAST = 1 << 5;
        /// Instance-of against a statically named type.
        const INSTANCE_OF = 1 << 6;
        const MONITORS = 1 << 7;
        /// Class-literal and other metadata loads.
        const METADATA = 1 << 8;
        /// Overflow-checked conversions.
        const OVERFLOW_CONVERSION = 1 << 9;

        // === Extensions (bits 16-31) ===

        /// Property read/write keyed by a runtime value.
        const PROPERTY_ACCESS = 1 << 16;
        /// Reads and writes of variables owned by enclosing code bodies.
        const LEXICAL = 1 << 17;
        const GLOBALS = 1 << 18;
        const IS_DEFINED = 1 << 19;
        /// For-each style property enumeration.
        const EACH_ELEMENT = 1 << 20;
        const TYPE_OF = 1 << 21;
        const ASSERT = 1 << 22;
        const ECHO = 1 << 23;
        /// `with`-style scoped name resolution regions.
        const SCOPED_REGION = 1 << 24;
        const CHECK_REFERENCE = 1 << 25;
        /// Instance-of against a type held in a value.
        const DYNAMIC_INSTANCE_OF = 1 << 26;

        /// Every baseline shape.
        const BASELINE = Self::ARRAYS.bits()
            | Self::STATIC_FIELDS.bits()
            | Self::TYPED_INVOKE.bits()
            | Self::FUNCTION_INVOKE.bits()
            | Self::NEW_WITH_ARGS.bits()
            | Self::CHECK_CAST.bits()
            | Self::INSTANCE_OF.bits()
            | Self::MONITORS.bits()
            | Self::METADATA.bits()
            | Self::OVERFLOW_CONVERSION.bits();

        /// Every extension shape.
        const EXTENSIONS = Self::PROPERTY_ACCESS.bits()
            | Self::LEXICAL.bits()
            | Self::GLOBALS.bits()
            | Self::IS_DEFINED.bits()
            | Self::EACH_ELEMENT.bits()
            | Self::TYPE_OF.bits()
            | Self::ASSERT.bits()
            | Self::ECHO.bits()
            | Self::SCOPED_REGION.bits()
            | Self::CHECK_REFERENCE.bits()
            | Self::DYNAMIC_INSTANCE_OF.bits();
    }
}

/// Instruction-shape policy: which shapes exist and what each
/// potentially-excepting shape may raise.
///
/// Built once per language through [`Dialect::builder`] and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dialect {
    pub(crate) name: String,
    pub(crate) root: TypeRef,
    pub(crate) shapes: Shapes,
    /// `None`: instance field access never excepts.
    pub(crate) field_access: Option<ExceptionTypes>,
    pub(crate) throw: ExceptionTypes,
    pub(crate) invoke: ExceptionTypes,
    pub(crate) allocation: ExceptionTypes,
    pub(crate) dynamic_access: ExceptionTypes,
    /// `None`: integer division never traps.
    pub(crate) arithmetic: Option<ExceptionTypes>,
    pub(crate) array: ExceptionTypes,
    pub(crate) cast: ExceptionTypes,
    pub(crate) monitor: ExceptionTypes,
}

impl Dialect {
    /// Start a dialect with no optional shapes and no exception types.
    pub fn builder(name: impl Into<String>, root: TypeRef) -> DialectBuilder {
        DialectBuilder::new(name, root)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root of the dialect's type hierarchy; named field accesses are
    /// declared on it.
    #[inline]
    pub fn root(&self) -> TypeRef {
        self.root
    }

    #[inline]
    pub fn shapes(&self) -> Shapes {
        self.shapes
    }
}

/// Builder for [`Dialect`].
#[derive(Clone, Debug)]
pub struct DialectBuilder {
    dialect: Dialect,
}

impl DialectBuilder {
    pub fn new(name: impl Into<String>, root: TypeRef) -> Self {
        DialectBuilder {
            dialect: Dialect {
                name: name.into(),
                root,
                shapes: Shapes::empty(),
                field_access: None,
                throw: ExceptionTypes::new(),
                invoke: ExceptionTypes::new(),
                allocation: ExceptionTypes::new(),
                dynamic_access: ExceptionTypes::new(),
                arithmetic: None,
                array: ExceptionTypes::new(),
                cast: ExceptionTypes::new(),
                monitor: ExceptionTypes::new(),
            },
        }
    }

    /// Add supported shapes.
    #[must_use]
    pub fn shapes(mut self, shapes: Shapes) -> Self {
        self.dialect.shapes |= shapes;
        self
    }

    /// Make instance field access potentially excepting.
    #[must_use]
    pub fn field_access_exceptions(mut self, types: &[TypeRef]) -> Self {
        self.dialect.field_access = Some(types.into());
        self
    }

    /// Types a `throw` is known to raise; empty means "any".
    #[must_use]
    pub fn throw_exceptions(mut self, types: &[TypeRef]) -> Self {
        self.dialect.throw = types.into();
        self
    }

    #[must_use]
    pub fn invoke_exceptions(mut self, types: &[TypeRef]) -> Self {
        self.dialect.invoke = types.into();
        self
    }

    #[must_use]
    pub fn allocation_exceptions(mut self, types: &[TypeRef]) -> Self {
        self.dialect.allocation = types.into();
        self
    }

    /// Raised by property, global and reference-check extensions.
    #[must_use]
    pub fn dynamic_access_exceptions(mut self, types: &[TypeRef]) -> Self {
        self.dialect.dynamic_access = types.into();
        self
    }

    /// Make integer division and remainder potentially excepting.
    #[must_use]
    pub fn arithmetic_exceptions(mut self, types: &[TypeRef]) -> Self {
        self.dialect.arithmetic = Some(types.into());
        self
    }

    #[must_use]
    pub fn array_exceptions(mut self, types: &[TypeRef]) -> Self {
        self.dialect.array = types.into();
        self
    }

    #[must_use]
    pub fn cast_exceptions(mut self, types: &[TypeRef]) -> Self {
        self.dialect.cast = types.into();
        self
    }

    #[must_use]
    pub fn monitor_exceptions(mut self, types: &[TypeRef]) -> Self {
        self.dialect.monitor = types.into();
        self
    }

    pub fn build(self) -> Dialect {
        self.dialect
    }
}
