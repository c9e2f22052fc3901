//! Code bodies: the CFG, symbol table and lexical metadata backing a
//! function or script class.
//!
//! A front-end assembles a [`MethodBody`] once its CFG is complete and
//! hands it to [`TypeRegistry::bind_code_body`](crate::TypeRegistry::bind_code_body).
//! From then on the body is immutable.

use std::ops::Range;

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use strand_ir::{
    BlockId, Constant, Instr, InstrIdx, IrError, IrResult, MethodRef, Name, Span, TypeRef,
    ValueId,
};

use crate::ClassId;

/// Index of a method in its registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct MethodId(u32);

impl MethodId {
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

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct Qualifiers: u8 {
        const PUBLIC = 1 << 0;
        const FINAL = 1 << 1;
        const STATIC = 1 << 2;
    }
}

// ── Control-flow graph ──────────────────────────────────────────────

/// A basic block: a contiguous run of the CFG's instruction array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicBlock {
    pub id: BlockId,
    /// Instruction indices `[start, end)`.
    pub instrs: Range<u32>,
    pub normal_successors: SmallVec<[BlockId; 2]>,
    pub exceptional_successors: SmallVec<[BlockId; 2]>,
}

impl BasicBlock {
    pub fn new(id: BlockId, instrs: Range<u32>) -> Self {
        BasicBlock {
            id,
            instrs,
            normal_successors: SmallVec::new(),
            exceptional_successors: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn successors(mut self, normal: &[BlockId]) -> Self {
        self.normal_successors = normal.into();
        self
    }

    #[must_use]
    pub fn handlers(mut self, exceptional: &[BlockId]) -> Self {
        self.exceptional_successors = exceptional.into();
        self
    }
}

/// Control-flow graph over a flat instruction array.
///
/// Block `i` is stored at position `i`; the front-end numbers blocks.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Cfg {
    instrs: Vec<Instr>,
    blocks: Vec<BasicBlock>,
}

impl Cfg {
    pub fn new(instrs: Vec<Instr>, blocks: Vec<BasicBlock>) -> Self {
        Cfg { instrs, blocks }
    }

    /// A CFG with every instruction in one block.
    pub fn single_block(instrs: Vec<Instr>) -> Self {
        let end = u32::try_from(instrs.len()).unwrap_or(u32::MAX);
        Cfg {
            instrs,
            blocks: vec![BasicBlock::new(BlockId::new(0), 0..end)],
        }
    }

    #[inline]
    pub fn instrs(&self) -> &[Instr] {
        &self.instrs
    }

    pub fn instr(&self, idx: InstrIdx) -> Option<&Instr> {
        self.instrs.get(idx.index())
    }

    #[inline]
    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.index())
    }

    /// Instructions of `block`; empty if its range is out of bounds.
    pub fn block_instrs(&self, block: &BasicBlock) -> &[Instr] {
        self.instrs
            .get(block.instrs.start as usize..block.instrs.end as usize)
            .unwrap_or(&[])
    }
}

// ── Symbol table ────────────────────────────────────────────────────

/// Per-body value-number metadata.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SymbolTable {
    constants: FxHashMap<ValueId, Constant>,
    params: SmallVec<[ValueId; 4]>,
    max_value: Option<ValueId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Symbol table whose first value numbers are the parameters.
    pub fn with_params(params: &[ValueId]) -> Self {
        let mut table = Self::new();
        for &param in params {
            table.note(param);
        }
        table.params = params.into();
        table
    }

    fn note(&mut self, value: ValueId) {
        match self.max_value {
            Some(max) if max >= value => {}
            _ => self.max_value = Some(value),
        }
    }

    /// Record that `value` holds `constant`.
    pub fn set_constant(&mut self, value: ValueId, constant: Constant) {
        self.note(value);
        self.constants.insert(value, constant);
    }

    pub fn constant(&self, value: ValueId) -> Option<Constant> {
        self.constants.get(&value).copied()
    }

    pub fn is_constant(&self, value: ValueId) -> bool {
        self.constants.contains_key(&value)
    }

    #[inline]
    pub fn params(&self) -> &[ValueId] {
        &self.params
    }

    /// Highest value number recorded so far.
    #[inline]
    pub fn max_value_number(&self) -> Option<ValueId> {
        self.max_value
    }

    /// Reserve a fresh value number above every recorded one.
    pub fn new_value(&mut self) -> ValueId {
        let next = self
            .max_value
            .map_or(ValueId::new(0), |max| ValueId::new(max.raw() + 1));
        self.max_value = Some(next);
        next
    }
}

// ── Lexical scoping ─────────────────────────────────────────────────

/// Lexical metadata of a code body.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct LexicalInfo {
    /// Enclosing code bodies, innermost first, by class name.
    parents: SmallVec<[Name; 2]>,
    /// Variables this body exposes to nested bodies.
    exposed: Vec<(Name, ValueId)>,
}

impl LexicalInfo {
    pub fn new(parents: &[Name]) -> Self {
        LexicalInfo {
            parents: parents.into(),
            exposed: Vec::new(),
        }
    }

    #[must_use]
    pub fn expose(mut self, variable: Name, value: ValueId) -> Self {
        self.exposed.push((variable, value));
        self
    }

    #[inline]
    pub fn parents(&self) -> &[Name] {
        &self.parents
    }

    pub fn exposed(&self) -> &[(Name, ValueId)] {
        &self.exposed
    }

    /// Value number holding an exposed variable.
    pub fn exposed_value(&self, variable: Name) -> Option<ValueId> {
        self.exposed
            .iter()
            .find(|(name, _)| *name == variable)
            .map(|&(_, value)| value)
    }
}

/// A resolved scoping parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LexicalParent {
    pub name: Name,
    pub method: MethodId,
}

// ── Method bodies ───────────────────────────────────────────────────

/// Everything a front-end supplies for one code body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodBody {
    cfg: Cfg,
    symbols: SymbolTable,
    caught: FxHashMap<BlockId, SmallVec<[TypeRef; 2]>>,
    lexical: LexicalInfo,
    /// One optional source position per instruction.
    positions: Vec<Option<Span>>,
    qualifiers: Qualifiers,
}

impl MethodBody {
    pub fn builder(cfg: Cfg) -> MethodBodyBuilder {
        MethodBodyBuilder::new(cfg)
    }

    #[inline]
    pub fn cfg(&self) -> &Cfg {
        &self.cfg
    }

    #[inline]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    #[inline]
    pub fn lexical(&self) -> &LexicalInfo {
        &self.lexical
    }

    #[inline]
    pub fn qualifiers(&self) -> Qualifiers {
        self.qualifiers
    }

    pub fn has_catch_block(&self) -> bool {
        !self.caught.is_empty()
    }

    /// Exception types caught by handler block `block`.
    pub fn caught_exception_types(&self, block: BlockId) -> &[TypeRef] {
        self.caught
            .get(&block)
            .map_or(&[], |types| types.as_slice())
    }

    pub fn position(&self, instr: InstrIdx) -> Option<Span> {
        self.positions.get(instr.index()).copied().flatten()
    }

    /// Code bodies are register-based; there is no operand stack.
    pub fn max_stack_height(&self) -> IrResult<u32> {
        Err(IrError::NotApplicable {
            query: "max_stack_height",
        })
    }

    /// Code bodies are register-based; there is no local slot table.
    pub fn max_locals(&self) -> IrResult<u32> {
        Err(IrError::NotApplicable {
            query: "max_locals",
        })
    }

    /// Source-level local names are not tracked per instruction.
    pub fn local_variable_name(&self, _instr: InstrIdx, _value: ValueId) -> IrResult<Name> {
        Err(IrError::NotApplicable {
            query: "local_variable_name",
        })
    }
}

/// Builder for [`MethodBody`].
#[derive(Clone, Debug)]
pub struct MethodBodyBuilder {
    body: MethodBody,
}

impl MethodBodyBuilder {
    pub fn new(cfg: Cfg) -> Self {
        MethodBodyBuilder {
            body: MethodBody {
                cfg,
                symbols: SymbolTable::new(),
                caught: FxHashMap::default(),
                lexical: LexicalInfo::default(),
                positions: Vec::new(),
                qualifiers: Qualifiers::PUBLIC | Qualifiers::FINAL,
            },
        }
    }

    #[must_use]
    pub fn symbols(mut self, symbols: SymbolTable) -> Self {
        self.body.symbols = symbols;
        self
    }

    /// Mark `block` as a handler catching `types`.
    #[must_use]
    pub fn catches(mut self, block: BlockId, types: &[TypeRef]) -> Self {
        self.body.caught.insert(block, types.into());
        self
    }

    #[must_use]
    pub fn lexical(mut self, lexical: LexicalInfo) -> Self {
        self.body.lexical = lexical;
        self
    }

    #[must_use]
    pub fn position(mut self, instr: InstrIdx, span: Span) -> Self {
        let index = instr.index();
        if self.body.positions.len() <= index {
            self.body.positions.resize(index + 1, None);
        }
        self.body.positions[index] = Some(span);
        self
    }

    #[must_use]
    pub fn qualifiers(mut self, qualifiers: Qualifiers) -> Self {
        self.body.qualifiers = qualifiers;
        self
    }

    pub fn build(self) -> MethodBody {
        self.body
    }
}

/// A code body bound to its class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Method {
    pub(crate) class: ClassId,
    pub(crate) reference: MethodRef,
    pub(crate) body: MethodBody,
}

impl Method {
    #[inline]
    pub fn class(&self) -> ClassId {
        self.class
    }

    #[inline]
    pub fn reference(&self) -> MethodRef {
        self.reference
    }

    #[inline]
    pub fn body(&self) -> &MethodBody {
        &self.body
    }

    /// Names of the enclosing code bodies, innermost first.
    pub fn scoping_parents(&self) -> &[Name] {
        self.body.lexical.parents()
    }

    pub fn is_static(&self) -> bool {
        self.body.qualifiers.contains(Qualifiers::STATIC)
    }
}
