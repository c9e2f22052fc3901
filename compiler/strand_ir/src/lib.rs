//! Strand IR - SSA instruction model
//!
//! This crate contains the language-neutral core of the Strand analysis IR:
//! - Names for interned identifiers, spans for source locations
//! - Value, block and instruction index newtypes
//! - Symbolic references to types, fields, methods and sites
//! - Instructions (`Instr`, `InstrKind`, `Opcode`)
//! - The instruction factory, configured per language by a `Dialect`
//! - Visitor dispatch, renumbering and textual rendering
//!
//! # Design Philosophy
//!
//! - **Factory-only construction**: `Instr` has no public constructor. The
//!   factory decides whether a shape exists in the language and which
//!   exceptions it may raise, and renumbering goes back through it.
//! - **Closed variant set**: one tagged union with exhaustive matches;
//!   language extensions are variants gated by `Shapes`, not subclasses.
//! - **Intern Everything**: strings become `Name(u32)`, references stay
//!   `Copy`.
//!
//! Constants that contain floats store them as bits for Hash compatibility.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod constant;
mod display;
mod error;
mod factory;
mod ids;
mod instr;
mod interner;
mod name;
mod ops;
mod refs;
mod renumber;
mod span;
mod visitor;

pub use constant::{Constant, ConstantKind};
pub use error::{IrError, IrResult};
pub use factory::{Dialect, DialectBuilder, InstructionFactory, Shapes};
pub use ids::{BlockId, InstrIdx, ValueId};
pub use instr::{
    ExceptionTypes, Instr, InstrKind, LexicalAccess, LexicalAccesses, Opcode, SwitchCases,
    ValueList,
};
pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use ops::{BinaryOp, BranchOp, ComparisonOp, UnaryOp};
pub use refs::{CallSiteRef, Dispatch, FieldRef, MethodRef, NewSiteRef, TypeRef};
pub use span::Span;
pub use visitor::InstrVisitor;

// Size assertions for the hot id and reference types.
static_assert_size!(Name, 4);
static_assert_size!(ValueId, 4);
static_assert_size!(BlockId, 4);
static_assert_size!(Span, 8);
static_assert_size!(TypeRef, 8);
