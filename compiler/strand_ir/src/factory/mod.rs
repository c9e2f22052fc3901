//! The instruction factory: the only construction path for [`Instr`].
//!
//! A factory is configured by a [`Dialect`] and decides, per instruction,
//! whether the shape exists in the language and which exceptions it may
//! raise. Operations for shapes the dialect lacks fail with
//! [`IrError::UnsupportedOperation`] and build nothing, so every caller
//! handles that outcome at the call site. [`InstructionFactory::supports`]
//! lets a front-end check up front instead.
//!
//! Renumbering ([`Instr::renumbered`]) goes back through the same
//! operations, so a renumbered instruction is indistinguishable from one
//! the front-end built directly.

mod dialect;

pub use dialect::{Dialect, DialectBuilder, Shapes};

use smallvec::SmallVec;

use crate::{
    BinaryOp, BlockId, BranchOp, CallSiteRef, ComparisonOp, Constant, Dispatch, ExceptionTypes,
    FieldRef, Instr, InstrIdx, InstrKind, IrError, IrResult, LexicalAccess, Name, NewSiteRef,
    TypeRef, UnaryOp, ValueId,
};

/// Builds instructions for one dialect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionFactory {
    dialect: Dialect,
}

impl InstructionFactory {
    pub fn new(dialect: Dialect) -> Self {
        InstructionFactory { dialect }
    }

    #[inline]
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Returns `true` if every shape in `shapes` is available.
    #[inline]
    pub fn supports(&self, shapes: Shapes) -> bool {
        self.dialect.shapes.contains(shapes)
    }

    fn require(&self, shape: Shapes, operation: &'static str) -> IrResult<()> {
        if self.supports(shape) {
            Ok(())
        } else {
            Err(IrError::UnsupportedOperation {
                dialect: self.dialect.name.clone(),
                operation,
            })
        }
    }

    #[inline]
    fn plain(kind: InstrKind) -> Instr {
        Instr::new(kind, None)
    }

    #[inline]
    fn excepting(kind: InstrKind, types: &ExceptionTypes) -> Instr {
        Instr::new(kind, Some(types.clone()))
    }

    // ── Data movement ───────────────────────────────────────────────

    pub fn assign(&self, def: ValueId, value: ValueId) -> IrResult<Instr> {
        Ok(Self::plain(InstrKind::Assign { def, value }))
    }

    pub fn phi(&self, def: ValueId, params: &[ValueId]) -> IrResult<Instr> {
        if params.is_empty() {
            return Err(IrError::MalformedShape {
                operation: "phi",
                reason: "a phi needs at least one incoming value",
            });
        }
        Ok(Self::plain(InstrKind::Phi {
            def,
            params: params.into(),
        }))
    }

    pub fn pi(
        &self,
        def: ValueId,
        value: ValueId,
        block: BlockId,
        successor: BlockId,
        cause: InstrIdx,
    ) -> IrResult<Instr> {
        Ok(Self::plain(InstrKind::Pi {
            def,
            value,
            block,
            successor,
            cause,
        }))
    }

    // ── Fields ──────────────────────────────────────────────────────

    fn field_kind(&self, kind: InstrKind, is_static: bool) -> Instr {
        match (&self.dialect.field_access, is_static) {
            (Some(types), false) => Self::excepting(kind, types),
            _ => Self::plain(kind),
        }
    }

    /// Instance field read.
    pub fn get(&self, def: ValueId, object: ValueId, field: FieldRef) -> IrResult<Instr> {
        Ok(self.field_kind(
            InstrKind::Get {
                def,
                object: Some(object),
                field,
            },
            false,
        ))
    }

    pub fn get_static(&self, def: ValueId, field: FieldRef) -> IrResult<Instr> {
        self.require(Shapes::STATIC_FIELDS, "get_static")?;
        Ok(self.field_kind(
            InstrKind::Get {
                def,
                object: None,
                field,
            },
            true,
        ))
    }

    /// Instance field read by bare name, declared on the dialect root.
    pub fn get_named(&self, def: ValueId, object: ValueId, field: Name) -> IrResult<Instr> {
        self.get(def, object, self.root_field(field))
    }

    /// Instance field write.
    pub fn put(&self, object: ValueId, value: ValueId, field: FieldRef) -> IrResult<Instr> {
        Ok(self.field_kind(
            InstrKind::Put {
                object: Some(object),
                value,
                field,
            },
            false,
        ))
    }

    pub fn put_static(&self, value: ValueId, field: FieldRef) -> IrResult<Instr> {
        self.require(Shapes::STATIC_FIELDS, "put_static")?;
        Ok(self.field_kind(
            InstrKind::Put {
                object: None,
                value,
                field,
            },
            true,
        ))
    }

    /// Instance field write by bare name, declared on the dialect root.
    pub fn put_named(&self, object: ValueId, value: ValueId, field: Name) -> IrResult<Instr> {
        self.put(object, value, self.root_field(field))
    }

    fn root_field(&self, name: Name) -> FieldRef {
        FieldRef::new(self.dialect.root, name, self.dialect.root)
    }

    // ── Control flow ────────────────────────────────────────────────

    pub fn goto(&self) -> IrResult<Instr> {
        Ok(Self::plain(InstrKind::Goto))
    }

    pub fn conditional_branch(
        &self,
        op: BranchOp,
        operand_type: TypeRef,
        lhs: ValueId,
        rhs: ValueId,
    ) -> IrResult<Instr> {
        Ok(Self::plain(InstrKind::ConditionalBranch {
            op,
            operand_type,
            lhs,
            rhs,
        }))
    }

    /// Multi-way branch. Case values must be distinct.
    pub fn switch(
        &self,
        scrutinee: ValueId,
        default: BlockId,
        cases: &[(i32, BlockId)],
    ) -> IrResult<Instr> {
        let mut seen: SmallVec<[i32; 8]> = cases.iter().map(|&(value, _)| value).collect();
        seen.sort_unstable();
        if seen.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(IrError::MalformedShape {
                operation: "switch",
                reason: "duplicate case value",
            });
        }
        Ok(Self::plain(InstrKind::Switch {
            scrutinee,
            default,
            cases: cases.into(),
        }))
    }

    pub fn return_void(&self) -> IrResult<Instr> {
        Ok(Self::plain(InstrKind::Return {
            value: None,
            is_primitive: false,
        }))
    }

    pub fn return_value(&self, value: ValueId, is_primitive: bool) -> IrResult<Instr> {
        Ok(Self::plain(InstrKind::Return {
            value: Some(value),
            is_primitive,
        }))
    }

    /// Always potentially excepting.
    pub fn throw(&self, exception: ValueId) -> IrResult<Instr> {
        Ok(Self::excepting(
            InstrKind::Throw { exception },
            &self.dialect.throw,
        ))
    }

    /// Binds the exception caught by the handler starting at `block`.
    pub fn get_caught_exception(&self, def: ValueId, block: BlockId) -> IrResult<Instr> {
        Ok(Self::plain(InstrKind::GetCaughtException { def, block }))
    }

    // ── Calls and allocation ────────────────────────────────────────

    /// Call whose target is named by `site`. Non-static calls pass the
    /// receiver as the first parameter.
    pub fn invoke(
        &self,
        results: &[ValueId],
        exception: ValueId,
        params: &[ValueId],
        site: CallSiteRef,
    ) -> IrResult<Instr> {
        self.require(Shapes::TYPED_INVOKE, "invoke")?;
        if site.dispatch == Dispatch::Dynamic {
            return Err(IrError::MalformedShape {
                operation: "invoke",
                reason: "dynamic dispatch needs a function value",
            });
        }
        if !site.dispatch.is_static() && params.is_empty() {
            return Err(IrError::MalformedShape {
                operation: "invoke",
                reason: "missing receiver",
            });
        }
        Ok(Self::excepting(
            InstrKind::Invoke {
                results: results.into(),
                exception,
                function: None,
                params: params.into(),
                site,
            },
            &self.dialect.invoke,
        ))
    }

    /// Call through the function value `function`.
    pub fn invoke_value(
        &self,
        results: &[ValueId],
        exception: ValueId,
        function: ValueId,
        params: &[ValueId],
        site: CallSiteRef,
    ) -> IrResult<Instr> {
        self.require(Shapes::FUNCTION_INVOKE, "invoke_value")?;
        Ok(Self::excepting(
            InstrKind::Invoke {
                results: results.into(),
                exception,
                function: Some(function),
                params: params.into(),
                site,
            },
            &self.dialect.invoke,
        ))
    }

    pub fn new_object(&self, def: ValueId, site: NewSiteRef) -> IrResult<Instr> {
        Ok(Self::excepting(
            InstrKind::New {
                def,
                params: SmallVec::new(),
                site,
            },
            &self.dialect.allocation,
        ))
    }

    /// Allocation with arguments (array dimensions, constructor operands).
    pub fn new_with_args(
        &self,
        def: ValueId,
        params: &[ValueId],
        site: NewSiteRef,
    ) -> IrResult<Instr> {
        self.require(Shapes::NEW_WITH_ARGS, "new_with_args")?;
        Ok(Self::excepting(
            InstrKind::New {
                def,
                params: params.into(),
                site,
            },
            &self.dialect.allocation,
        ))
    }

    // ── Operators ───────────────────────────────────────────────────

    pub fn unary_op(&self, op: UnaryOp, def: ValueId, value: ValueId) -> IrResult<Instr> {
        Ok(Self::plain(InstrKind::UnaryOp { op, def, value }))
    }

    /// Potentially excepting only for integer division and remainder in a
    /// dialect whose arithmetic traps.
    pub fn binary_op(
        &self,
        op: BinaryOp,
        def: ValueId,
        lhs: ValueId,
        rhs: ValueId,
        may_be_integer: bool,
    ) -> IrResult<Instr> {
        let kind = InstrKind::BinaryOp {
            op,
            def,
            lhs,
            rhs,
            may_be_integer,
        };
        match &self.dialect.arithmetic {
            Some(types) if may_be_integer && op.may_trap() => Ok(Self::excepting(kind, types)),
            _ => Ok(Self::plain(kind)),
        }
    }

    pub fn comparison(
        &self,
        op: ComparisonOp,
        def: ValueId,
        lhs: ValueId,
        rhs: ValueId,
    ) -> IrResult<Instr> {
        Ok(Self::plain(InstrKind::Comparison { op, def, lhs, rhs }))
    }

    // ── Types ───────────────────────────────────────────────────────

    pub fn instance_of(&self, def: ValueId, value: ValueId, ty: TypeRef) -> IrResult<Instr> {
        self.require(Shapes::INSTANCE_OF, "instance_of")?;
        Ok(Self::plain(InstrKind::InstanceOf { def, value, ty }))
    }

    pub fn check_cast(&self, def: ValueId, value: ValueId, ty: TypeRef) -> IrResult<Instr> {
        self.require(Shapes::CHECK_CAST, "check_cast")?;
        Ok(Self::excepting(
            InstrKind::CheckCast { def, value, ty },
            &self.dialect.cast,
        ))
    }

    /// Value conversion between two types. An overflow-checked request
    /// fails unless the dialect has checked conversions.
    pub fn conversion(
        &self,
        def: ValueId,
        value: ValueId,
        from: TypeRef,
        to: TypeRef,
        check_overflow: bool,
    ) -> IrResult<Instr> {
        if check_overflow && !self.supports(Shapes::OVERFLOW_CONVERSION) {
            return Err(IrError::UnsupportedConversion {
                dialect: self.dialect.name.clone(),
                from: format!("{from:?}"),
                to: format!("{to:?}"),
            });
        }
        Ok(Self::plain(InstrKind::Conversion {
            def,
            value,
            from,
            to,
            check_overflow,
        }))
    }

    // ── Arrays ──────────────────────────────────────────────────────

    pub fn array_length(&self, def: ValueId, array: ValueId) -> IrResult<Instr> {
        self.require(Shapes::ARRAYS, "array_length")?;
        Ok(Self::excepting(
            InstrKind::ArrayLength { def, array },
            &self.dialect.array,
        ))
    }

    pub fn array_load(
        &self,
        def: ValueId,
        array: ValueId,
        index: ValueId,
        element: TypeRef,
    ) -> IrResult<Instr> {
        self.require(Shapes::ARRAYS, "array_load")?;
        Ok(Self::excepting(
            InstrKind::ArrayLoad {
                def,
                array,
                index,
                element,
            },
            &self.dialect.array,
        ))
    }

    pub fn array_store(
        &self,
        array: ValueId,
        index: ValueId,
        value: ValueId,
        element: TypeRef,
    ) -> IrResult<Instr> {
        self.require(Shapes::ARRAYS, "array_store")?;
        Ok(Self::excepting(
            InstrKind::ArrayStore {
                array,
                index,
                value,
                element,
            },
            &self.dialect.array,
        ))
    }

    // ── Runtime support ─────────────────────────────────────────────

    pub fn monitor(&self, object: ValueId, enter: bool) -> IrResult<Instr> {
        self.require(Shapes::MONITORS, "monitor")?;
        Ok(Self::excepting(
            InstrKind::Monitor { object, enter },
            &self.dialect.monitor,
        ))
    }

    pub fn load_metadata(&self, def: ValueId, entity: TypeRef, token: Constant) -> IrResult<Instr> {
        self.require(Shapes::METADATA, "load_metadata")?;
        Ok(Self::plain(InstrKind::LoadMetadata { def, entity, token }))
    }

    // ── Language extensions ─────────────────────────────────────────

    pub fn property_read(&self, def: ValueId, object: ValueId, member: ValueId) -> IrResult<Instr> {
        self.require(Shapes::PROPERTY_ACCESS, "property_read")?;
        Ok(Self::excepting(
            InstrKind::PropertyRead {
                def,
                object,
                member,
            },
            &self.dialect.dynamic_access,
        ))
    }

    pub fn property_write(
        &self,
        object: ValueId,
        member: ValueId,
        value: ValueId,
    ) -> IrResult<Instr> {
        self.require(Shapes::PROPERTY_ACCESS, "property_write")?;
        Ok(Self::excepting(
            InstrKind::PropertyWrite {
                object,
                member,
                value,
            },
            &self.dialect.dynamic_access,
        ))
    }

    /// Read one or more lexically scoped variables at once.
    pub fn lexical_read(&self, accesses: &[LexicalAccess]) -> IrResult<Instr> {
        self.require(Shapes::LEXICAL, "lexical_read")?;
        if accesses.is_empty() {
            return Err(IrError::MalformedShape {
                operation: "lexical_read",
                reason: "no accesses",
            });
        }
        Ok(Self::plain(InstrKind::LexicalRead {
            accesses: accesses.into(),
        }))
    }

    pub fn lexical_read_one(&self, def: ValueId, definer: Name, variable: Name) -> IrResult<Instr> {
        self.lexical_read(&[LexicalAccess::new(definer, variable, def)])
    }

    /// Write one or more lexically scoped variables at once.
    pub fn lexical_write(&self, accesses: &[LexicalAccess]) -> IrResult<Instr> {
        self.require(Shapes::LEXICAL, "lexical_write")?;
        if accesses.is_empty() {
            return Err(IrError::MalformedShape {
                operation: "lexical_write",
                reason: "no accesses",
            });
        }
        Ok(Self::plain(InstrKind::LexicalWrite {
            accesses: accesses.into(),
        }))
    }

    pub fn lexical_write_one(
        &self,
        definer: Name,
        variable: Name,
        value: ValueId,
    ) -> IrResult<Instr> {
        self.lexical_write(&[LexicalAccess::new(definer, variable, value)])
    }

    pub fn global_read(&self, def: ValueId, global: FieldRef) -> IrResult<Instr> {
        self.require(Shapes::GLOBALS, "global_read")?;
        Ok(Self::excepting(
            InstrKind::GlobalRead { def, global },
            &self.dialect.dynamic_access,
        ))
    }

    pub fn global_write(&self, global: FieldRef, value: ValueId) -> IrResult<Instr> {
        self.require(Shapes::GLOBALS, "global_write")?;
        Ok(Self::excepting(
            InstrKind::GlobalWrite { global, value },
            &self.dialect.dynamic_access,
        ))
    }

    /// Definedness test. Four shapes: the object alone, or the object
    /// plus a field given as a value, a static reference, or both.
    pub fn is_defined(
        &self,
        def: ValueId,
        object: ValueId,
        field_value: Option<ValueId>,
        field: Option<FieldRef>,
    ) -> IrResult<Instr> {
        self.require(Shapes::IS_DEFINED, "is_defined")?;
        Ok(Self::plain(InstrKind::IsDefined {
            def,
            object,
            field_value,
            field,
        }))
    }

    pub fn each_element_has_next(&self, def: ValueId, object: ValueId) -> IrResult<Instr> {
        self.require(Shapes::EACH_ELEMENT, "each_element_has_next")?;
        Ok(Self::plain(InstrKind::EachElementHasNext { def, object }))
    }

    pub fn each_element_get(&self, def: ValueId, object: ValueId) -> IrResult<Instr> {
        self.require(Shapes::EACH_ELEMENT, "each_element_get")?;
        Ok(Self::plain(InstrKind::EachElementGet { def, object }))
    }

    pub fn type_of(&self, def: ValueId, object: ValueId) -> IrResult<Instr> {
        self.require(Shapes::TYPE_OF, "type_of")?;
        Ok(Self::plain(InstrKind::TypeOf { def, object }))
    }

    pub fn assert(&self, value: ValueId, from_specification: bool) -> IrResult<Instr> {
        self.require(Shapes::ASSERT, "assert")?;
        Ok(Self::plain(InstrKind::Assert {
            value,
            from_specification,
        }))
    }

    pub fn echo(&self, values: &[ValueId]) -> IrResult<Instr> {
        self.require(Shapes::ECHO, "echo")?;
        Ok(Self::plain(InstrKind::Echo {
            values: values.into(),
        }))
    }

    pub fn scoped_region(&self, object: ValueId, enter: bool) -> IrResult<Instr> {
        self.require(Shapes::SCOPED_REGION, "scoped_region")?;
        Ok(Self::plain(InstrKind::ScopedRegion { object, enter }))
    }

    /// Raises the dialect's dynamic-access errors when `value` is not a
    /// valid reference.
    pub fn check_reference(&self, value: ValueId) -> IrResult<Instr> {
        self.require(Shapes::CHECK_REFERENCE, "check_reference")?;
        Ok(Self::excepting(
            InstrKind::CheckReference { value },
            &self.dialect.dynamic_access,
        ))
    }

    pub fn dynamic_instance_of(
        &self,
        def: ValueId,
        object: ValueId,
        type_value: ValueId,
    ) -> IrResult<Instr> {
        self.require(Shapes::DYNAMIC_INSTANCE_OF, "dynamic_instance_of")?;
        Ok(Self::plain(InstrKind::DynamicInstanceOf {
            def,
            object,
            type_value,
        }))
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;
