//! SSA instructions.
//!
//! An [`Instr`] is a closed tagged union ([`InstrKind`]) plus the exception
//! behaviour its dialect attached when it was built. Instructions are
//! immutable: value renumbering builds a fresh instance through the same
//! [`InstructionFactory`](crate::InstructionFactory) instead of mutating.
//!
//! # Operand order
//!
//! [`Instr::uses`] and [`Instr::defs`] list value numbers in a fixed order
//! per variant. Renumbering addresses operands by position in these lists,
//! so the order documented on each variant is part of the contract.

use smallvec::SmallVec;

use crate::{
    BinaryOp, BlockId, BranchOp, CallSiteRef, ComparisonOp, Constant, FieldRef, InstrIdx,
    IrError, IrResult, Name, NewSiteRef, TypeRef, UnaryOp, ValueId,
};

/// Ordered operand list (uses or defs).
pub type ValueList = SmallVec<[ValueId; 4]>;

/// Exception types a potentially-excepting instruction may raise.
pub type ExceptionTypes = SmallVec<[TypeRef; 2]>;

// ── Lexical accesses ────────────────────────────────────────────────

/// One access to a variable owned by an enclosing code body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LexicalAccess {
    /// Name of the code body that defines the variable.
    pub definer: Name,
    /// The variable's name in the definer.
    pub variable: Name,
    /// Value number read into (for reads) or written from (for writes).
    pub value: ValueId,
}

impl LexicalAccess {
    #[inline]
    pub const fn new(definer: Name, variable: Name, value: ValueId) -> Self {
        LexicalAccess {
            definer,
            variable,
            value,
        }
    }

    #[must_use]
    #[inline]
    pub(crate) const fn with_value(self, value: ValueId) -> Self {
        LexicalAccess { value, ..self }
    }
}

/// Lexical access list; at least one entry.
pub type LexicalAccesses = SmallVec<[LexicalAccess; 2]>;

/// Switch case list: `(case value, target block)`.
pub type SwitchCases = SmallVec<[(i32, BlockId); 4]>;

// ── Instruction payloads ────────────────────────────────────────────

/// Variant payload of an instruction.
///
/// Baseline variants come first, then the language-extension variants.
/// Operand order for `uses`/`defs` is given as `defs / uses`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum InstrKind {
    /// `def / value`.
    Assign { def: ValueId, value: ValueId },

    /// `def / params...`: merge at a control-flow join.
    Phi { def: ValueId, params: ValueList },

    /// `def / value`: refines `value` on the edge `block -> successor`,
    /// justified by the instruction at `cause`.
    Pi {
        def: ValueId,
        value: ValueId,
        block: BlockId,
        successor: BlockId,
        cause: InstrIdx,
    },

    /// `def / object?`: static when `object` is `None`.
    Get {
        def: ValueId,
        object: Option<ValueId>,
        field: FieldRef,
    },

    /// `- / object?, value`: static when `object` is `None`.
    Put {
        object: Option<ValueId>,
        value: ValueId,
        field: FieldRef,
    },

    /// Unconditional jump; the target is a CFG edge.
    Goto,

    /// `- / lhs, rhs`: branch taken when `lhs op rhs`; falls through
    /// otherwise.
    ConditionalBranch {
        op: BranchOp,
        operand_type: TypeRef,
        lhs: ValueId,
        rhs: ValueId,
    },

    /// `- / scrutinee`.
    Switch {
        scrutinee: ValueId,
        default: BlockId,
        cases: SwitchCases,
    },

    /// `- / value?`.
    Return {
        value: Option<ValueId>,
        is_primitive: bool,
    },

    /// `- / exception`.
    Throw { exception: ValueId },

    /// `def / -`: binds the exception caught by handler block `block`.
    GetCaughtException { def: ValueId, block: BlockId },

    /// `results..., exception / function?, params...`.
    ///
    /// `function` is present for calls through a first-class function
    /// value; typed calls name their target in `site`.
    Invoke {
        results: ValueList,
        exception: ValueId,
        function: Option<ValueId>,
        params: ValueList,
        site: CallSiteRef,
    },

    /// `def / params...`.
    New {
        def: ValueId,
        params: ValueList,
        site: NewSiteRef,
    },

    /// `def / value`.
    UnaryOp {
        op: UnaryOp,
        def: ValueId,
        value: ValueId,
    },

    /// `def / lhs, rhs`.
    BinaryOp {
        op: BinaryOp,
        def: ValueId,
        lhs: ValueId,
        rhs: ValueId,
        /// Whether the operands may be integers (decides trapping).
        may_be_integer: bool,
    },

    /// `def / lhs, rhs`.
    Comparison {
        op: ComparisonOp,
        def: ValueId,
        lhs: ValueId,
        rhs: ValueId,
    },

    /// `def / value`.
    InstanceOf {
        def: ValueId,
        value: ValueId,
        ty: TypeRef,
    },

    /// `def / value`.
    CheckCast {
        def: ValueId,
        value: ValueId,
        ty: TypeRef,
    },

    /// `def / value`.
    Conversion {
        def: ValueId,
        value: ValueId,
        from: TypeRef,
        to: TypeRef,
        check_overflow: bool,
    },

    /// `def / array`.
    ArrayLength { def: ValueId, array: ValueId },

    /// `def / array, index`.
    ArrayLoad {
        def: ValueId,
        array: ValueId,
        index: ValueId,
        element: TypeRef,
    },

    /// `- / array, index, value`.
    ArrayStore {
        array: ValueId,
        index: ValueId,
        value: ValueId,
        element: TypeRef,
    },

    /// `- / object`.
    Monitor { object: ValueId, enter: bool },

    /// `def / -`: loads the runtime representation of `token`.
    LoadMetadata {
        def: ValueId,
        entity: TypeRef,
        token: Constant,
    },

    // ── Language extensions ─────────────────────────────────────────
    /// `def / object, member`.
    PropertyRead {
        def: ValueId,
        object: ValueId,
        member: ValueId,
    },

    /// `- / object, member, value`.
    PropertyWrite {
        object: ValueId,
        member: ValueId,
        value: ValueId,
    },

    /// `values... / -`.
    LexicalRead { accesses: LexicalAccesses },

    /// `- / values...`.
    LexicalWrite { accesses: LexicalAccesses },

    /// `def / -`.
    GlobalRead { def: ValueId, global: FieldRef },

    /// `- / value`.
    GlobalWrite { global: FieldRef, value: ValueId },

    /// `def / object, field_value?`.
    IsDefined {
        def: ValueId,
        object: ValueId,
        field_value: Option<ValueId>,
        field: Option<FieldRef>,
    },

    /// `def / object`.
    EachElementHasNext { def: ValueId, object: ValueId },

    /// `def / object`.
    EachElementGet { def: ValueId, object: ValueId },

    /// `def / object`.
    TypeOf { def: ValueId, object: ValueId },

    /// `- / value`.
    Assert {
        value: ValueId,
        from_specification: bool,
    },

    /// `- / values...`.
    Echo { values: ValueList },

    /// `- / object`: enters or leaves a scope that resolves names
    /// against `object`.
    ScopedRegion { object: ValueId, enter: bool },

    /// `- / value`.
    CheckReference { value: ValueId },

    /// `def / object, type_value`.
    DynamicInstanceOf {
        def: ValueId,
        object: ValueId,
        type_value: ValueId,
    },
}

// ── Opcodes ─────────────────────────────────────────────────────────

/// Fieldless tag of an [`InstrKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    Assign,
    Phi,
    Pi,
    Get,
    Put,
    Goto,
    ConditionalBranch,
    Switch,
    Return,
    Throw,
    GetCaughtException,
    Invoke,
    New,
    UnaryOp,
    BinaryOp,
    Comparison,
    InstanceOf,
    CheckCast,
    Conversion,
    ArrayLength,
    ArrayLoad,
    ArrayStore,
    Monitor,
    LoadMetadata,
    PropertyRead,
    PropertyWrite,
    LexicalRead,
    LexicalWrite,
    GlobalRead,
    GlobalWrite,
    IsDefined,
    EachElementHasNext,
    EachElementGet,
    TypeOf,
    Assert,
    Echo,
    ScopedRegion,
    CheckReference,
    DynamicInstanceOf,
}

impl Opcode {
    pub fn name(self) -> &'static str {
        match self {
            Opcode::Assign => "assign",
            Opcode::Phi => "phi",
            Opcode::Pi => "pi",
            Opcode::Get => "get",
            Opcode::Put => "put",
            Opcode::Goto => "goto",
            Opcode::ConditionalBranch => "conditional_branch",
            Opcode::Switch => "switch",
            Opcode::Return => "return",
            Opcode::Throw => "throw",
            Opcode::GetCaughtException => "get_caught_exception",
            Opcode::Invoke => "invoke",
            Opcode::New => "new",
            Opcode::UnaryOp => "unary_op",
            Opcode::BinaryOp => "binary_op",
            Opcode::Comparison => "comparison",
            Opcode::InstanceOf => "instance_of",
            Opcode::CheckCast => "check_cast",
            Opcode::Conversion => "conversion",
            Opcode::ArrayLength => "array_length",
            Opcode::ArrayLoad => "array_load",
            Opcode::ArrayStore => "array_store",
            Opcode::Monitor => "monitor",
            Opcode::LoadMetadata => "load_metadata",
            Opcode::PropertyRead => "property_read",
            Opcode::PropertyWrite => "property_write",
            Opcode::LexicalRead => "lexical_read",
            Opcode::LexicalWrite => "lexical_write",
            Opcode::GlobalRead => "global_read",
            Opcode::GlobalWrite => "global_write",
            Opcode::IsDefined => "is_defined",
            Opcode::EachElementHasNext => "each_element_has_next",
            Opcode::EachElementGet => "each_element_get",
            Opcode::TypeOf => "type_of",
            Opcode::Assert => "assert",
            Opcode::Echo => "echo",
            Opcode::ScopedRegion => "scoped_region",
            Opcode::CheckReference => "check_reference",
            Opcode::DynamicInstanceOf => "dynamic_instance_of",
        }
    }

    /// Returns `true` for variants outside the baseline set.
    pub fn is_extension(self) -> bool {
        self >= Opcode::PropertyRead
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl InstrKind {
    pub fn opcode(&self) -> Opcode {
        match self {
            InstrKind::Assign { .. } => Opcode::Assign,
            InstrKind::Phi { .. } => Opcode::Phi,
            InstrKind::Pi { .. } => Opcode::Pi,
            InstrKind::Get { .. } => Opcode::Get,
            InstrKind::Put { .. } => Opcode::Put,
            InstrKind::Goto => Opcode::Goto,
            InstrKind::ConditionalBranch { .. } => Opcode::ConditionalBranch,
            InstrKind::Switch { .. } => Opcode::Switch,
            InstrKind::Return { .. } => Opcode::Return,
            InstrKind::Throw { .. } => Opcode::Throw,
            InstrKind::GetCaughtException { .. } => Opcode::GetCaughtException,
            InstrKind::Invoke { .. } => Opcode::Invoke,
            InstrKind::New { .. } => Opcode::New,
            InstrKind::UnaryOp { .. } => Opcode::UnaryOp,
            InstrKind::BinaryOp { .. } => Opcode::BinaryOp,
            InstrKind::Comparison { .. } => Opcode::Comparison,
            InstrKind::InstanceOf { .. } => Opcode::InstanceOf,
            InstrKind::CheckCast { .. } => Opcode::CheckCast,
            InstrKind::Conversion { .. } => Opcode::Conversion,
            InstrKind::ArrayLength { .. } => Opcode::ArrayLength,
            InstrKind::ArrayLoad { .. } => Opcode::ArrayLoad,
            InstrKind::ArrayStore { .. } => Opcode::ArrayStore,
            InstrKind::Monitor { .. } => Opcode::Monitor,
            InstrKind::LoadMetadata { .. } => Opcode::LoadMetadata,
            InstrKind::PropertyRead { .. } => Opcode::PropertyRead,
            InstrKind::PropertyWrite { .. } => Opcode::PropertyWrite,
            InstrKind::LexicalRead { .. } => Opcode::LexicalRead,
            InstrKind::LexicalWrite { .. } => Opcode::LexicalWrite,
            InstrKind::GlobalRead { .. } => Opcode::GlobalRead,
            InstrKind::GlobalWrite { .. } => Opcode::GlobalWrite,
            InstrKind::IsDefined { .. } => Opcode::IsDefined,
            InstrKind::EachElementHasNext { .. } => Opcode::EachElementHasNext,
            InstrKind::EachElementGet { .. } => Opcode::EachElementGet,
            InstrKind::TypeOf { .. } => Opcode::TypeOf,
            InstrKind::Assert { .. } => Opcode::Assert,
            InstrKind::Echo { .. } => Opcode::Echo,
            InstrKind::ScopedRegion { .. } => Opcode::ScopedRegion,
            InstrKind::CheckReference { .. } => Opcode::CheckReference,
            InstrKind::DynamicInstanceOf { .. } => Opcode::DynamicInstanceOf,
        }
    }

    /// Values defined by this instruction, in operand order.
    pub fn defs(&self) -> ValueList {
        match self {
            InstrKind::Assign { def, .. }
            | InstrKind::Phi { def, .. }
            | InstrKind::Pi { def, .. }
            | InstrKind::Get { def, .. }
            | InstrKind::GetCaughtException { def, .. }
            | InstrKind::New { def, .. }
            | InstrKind::UnaryOp { def, .. }
            | InstrKind::BinaryOp { def, .. }
            | InstrKind::Comparison { def, .. }
            | InstrKind::InstanceOf { def, .. }
            | InstrKind::CheckCast { def, .. }
            | InstrKind::Conversion { def, .. }
            | InstrKind::ArrayLength { def, .. }
            | InstrKind::ArrayLoad { def, .. }
            | InstrKind::LoadMetadata { def, .. }
            | InstrKind::PropertyRead { def, .. }
            | InstrKind::GlobalRead { def, .. }
            | InstrKind::IsDefined { def, .. }
            | InstrKind::EachElementHasNext { def, .. }
            | InstrKind::EachElementGet { def, .. }
            | InstrKind::TypeOf { def, .. }
            | InstrKind::DynamicInstanceOf { def, .. } => smallvec::smallvec![*def],

            InstrKind::Invoke {
                results, exception, ..
            } => {
                let mut defs = results.clone();
                defs.push(*exception);
                defs
            }

            InstrKind::LexicalRead { accesses } => accesses.iter().map(|a| a.value).collect(),

            InstrKind::Put { .. }
            | InstrKind::Goto
            | InstrKind::ConditionalBranch { .. }
            | InstrKind::Switch { .. }
            | InstrKind::Return { .. }
            | InstrKind::Throw { .. }
            | InstrKind::ArrayStore { .. }
            | InstrKind::Monitor { .. }
            | InstrKind::PropertyWrite { .. }
            | InstrKind::LexicalWrite { .. }
            | InstrKind::GlobalWrite { .. }
            | InstrKind::Assert { .. }
            | InstrKind::Echo { .. }
            | InstrKind::ScopedRegion { .. }
            | InstrKind::CheckReference { .. } => ValueList::new(),
        }
    }

    /// Values read by this instruction, in operand order.
    pub fn uses(&self) -> ValueList {
        match self {
            InstrKind::Assign { value, .. }
            | InstrKind::Pi { value, .. }
            | InstrKind::UnaryOp { value, .. }
            | InstrKind::InstanceOf { value, .. }
            | InstrKind::CheckCast { value, .. }
            | InstrKind::Conversion { value, .. }
            | InstrKind::GlobalWrite { value, .. }
            | InstrKind::Assert { value, .. }
            | InstrKind::CheckReference { value } => smallvec::smallvec![*value],

            InstrKind::Throw { exception } => smallvec::smallvec![*exception],
            InstrKind::Switch { scrutinee, .. } => smallvec::smallvec![*scrutinee],
            InstrKind::ArrayLength { array, .. } => smallvec::smallvec![*array],

            InstrKind::Monitor { object, .. }
            | InstrKind::EachElementHasNext { object, .. }
            | InstrKind::EachElementGet { object, .. }
            | InstrKind::TypeOf { object, .. }
            | InstrKind::ScopedRegion { object, .. } => smallvec::smallvec![*object],

            InstrKind::Phi { params, .. }
            | InstrKind::New { params, .. }
            | InstrKind::Echo { values: params } => params.clone(),

            InstrKind::Get { object, .. } => object.iter().copied().collect(),

            InstrKind::Put { object, value, .. } => {
                object
                    .iter()
                    .copied()
                    .chain(std::iter::once(*value))
                    .collect()
            }

            InstrKind::ConditionalBranch { lhs, rhs, .. }
            | InstrKind::BinaryOp { lhs, rhs, .. }
            | InstrKind::Comparison { lhs, rhs, .. } => smallvec::smallvec![*lhs, *rhs],

            InstrKind::Return { value, .. } => value.iter().copied().collect(),

            InstrKind::Invoke {
                function, params, ..
            } => function.iter().chain(params.iter()).copied().collect(),

            InstrKind::ArrayLoad { array, index, .. } => smallvec::smallvec![*array, *index],
            InstrKind::ArrayStore {
                array,
                index,
                value,
                ..
            } => smallvec::smallvec![*array, *index, *value],

            InstrKind::PropertyRead { object, member, .. } => smallvec::smallvec![*object, *member],
            InstrKind::PropertyWrite {
                object,
                member,
                value,
            } => smallvec::smallvec![*object, *member, *value],

            InstrKind::LexicalWrite { accesses } => accesses.iter().map(|a| a.value).collect(),

            InstrKind::IsDefined {
                object,
                field_value,
                ..
            } => std::iter::once(*object).chain(*field_value).collect(),

            InstrKind::DynamicInstanceOf {
                object, type_value, ..
            } => smallvec::smallvec![*object, *type_value],

            InstrKind::Goto
            | InstrKind::GetCaughtException { .. }
            | InstrKind::LoadMetadata { .. }
            | InstrKind::LexicalRead { .. }
            | InstrKind::GlobalRead { .. } => ValueList::new(),
        }
    }
}

// ── Instructions ────────────────────────────────────────────────────

/// An SSA instruction: variant payload plus exception behaviour.
///
/// Only an [`InstructionFactory`](crate::InstructionFactory) builds these,
/// so every instance carries the exception set its dialect decided on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Instr {
    kind: InstrKind,
    /// `Some` iff the instruction is potentially excepting.
    exceptions: Option<ExceptionTypes>,
}

impl Instr {
    #[inline]
    pub(crate) fn new(kind: InstrKind, exceptions: Option<ExceptionTypes>) -> Self {
        Instr { kind, exceptions }
    }

    #[inline]
    pub fn kind(&self) -> &InstrKind {
        &self.kind
    }

    #[inline]
    pub fn opcode(&self) -> Opcode {
        self.kind.opcode()
    }

    #[inline]
    pub fn uses(&self) -> ValueList {
        self.kind.uses()
    }

    #[inline]
    pub fn defs(&self) -> ValueList {
        self.kind.defs()
    }

    pub fn num_uses(&self) -> usize {
        self.kind.uses().len()
    }

    pub fn num_defs(&self) -> usize {
        self.kind.defs().len()
    }

    /// The `index`-th use, if there is one.
    pub fn use_at(&self, index: usize) -> Option<ValueId> {
        self.kind.uses().get(index).copied()
    }

    /// The `index`-th def, if there is one.
    pub fn def_at(&self, index: usize) -> Option<ValueId> {
        self.kind.defs().get(index).copied()
    }

    /// PEI: the instruction may transfer control to an exception handler.
    #[inline]
    pub fn is_potentially_excepting(&self) -> bool {
        self.exceptions.is_some()
    }

    /// Exception types this instruction may raise.
    ///
    /// An empty slice means "may throw, types unknown" (e.g. `throw` of an
    /// arbitrary value). Fails with `NotApplicable` for non-PEI instructions.
    pub fn exception_types(&self) -> IrResult<&[TypeRef]> {
        self.exceptions
            .as_deref()
            .ok_or(IrError::NotApplicable {
                query: "exception_types",
            })
    }

    /// Whether control may continue to the next instruction in the block.
    ///
    /// Conditional branches fall through on their false edge.
    pub fn is_fall_through(&self) -> bool {
        !matches!(
            self.kind,
            InstrKind::Goto
                | InstrKind::Switch { .. }
                | InstrKind::Return { .. }
                | InstrKind::Throw { .. }
        )
    }
}
