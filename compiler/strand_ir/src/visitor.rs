//! Variant dispatch for instruction consumers.
//!
//! [`InstrVisitor`] has one method per variant. Every method defaults to
//! failing with [`IrError::UnsupportedVariant`], so a consumer written for
//! a subset of the instruction set (for example the baseline only) fails
//! explicitly when handed anything else instead of silently skipping it.

use crate::{Instr, InstrKind, IrError, IrResult};

#[inline]
fn unsupported<T>(instr: &Instr) -> IrResult<T> {
    Err(IrError::UnsupportedVariant {
        opcode: instr.opcode(),
    })
}

macro_rules! visitor_methods {
    ($($method:ident),* $(,)?) => {
        $(
            fn $method(&mut self, instr: &Instr) -> IrResult<Self::Output> {
                unsupported(instr)
            }
        )*
    };
}

/// Consumer of instructions, one method per variant.
pub trait InstrVisitor {
    type Output;

    visitor_methods!(
        visit_assign,
        visit_phi,
        visit_pi,
        visit_get,
        visit_put,
        visit_goto,
        visit_conditional_branch,
        visit_switch,
        visit_return,
        visit_throw,
        visit_get_caught_exception,
        visit_invoke,
        visit_new,
        visit_unary_op,
        visit_binary_op,
        visit_comparison,
        visit_instance_of,
        visit_check_cast,
        visit_conversion,
        visit_array_length,
        visit_array_load,
        visit_array_store,
        visit_monitor,
        visit_load_metadata,
        visit_property_read,
        visit_property_write,
        visit_lexical_read,
        visit_lexical_write,
        visit_global_read,
        visit_global_write,
        visit_is_defined,
        visit_each_element_has_next,
        visit_each_element_get,
        visit_type_of,
        visit_assert,
        visit_echo,
        visit_scoped_region,
        visit_check_reference,
        visit_dynamic_instance_of,
    );
}

impl Instr {
    /// Call the visitor method for this instruction's variant.
    pub fn dispatch<V: InstrVisitor + ?Sized>(&self, visitor: &mut V) -> IrResult<V::Output> {
        match self.kind() {
            InstrKind::Assign { .. } => visitor.visit_assign(self),
            InstrKind::Phi { .. } => visitor.visit_phi(self),
            InstrKind::Pi { .. } => visitor.visit_pi(self),
            InstrKind::Get { .. } => visitor.visit_get(self),
            InstrKind::Put { .. } => visitor.visit_put(self),
            InstrKind::Goto => visitor.visit_goto(self),
            InstrKind::ConditionalBranch { .. } => visitor.visit_conditional_branch(self),
            InstrKind::Switch { .. } => visitor.visit_switch(self),
            InstrKind::Return { .. } => visitor.visit_return(self),
            InstrKind::Throw { .. } => visitor.visit_throw(self),
            InstrKind::GetCaughtException { .. } => visitor.visit_get_caught_exception(self),
            InstrKind::Invoke { .. } => visitor.visit_invoke(self),
            InstrKind::New { .. } => visitor.visit_new(self),
            InstrKind::UnaryOp { .. } => visitor.visit_unary_op(self),
            InstrKind::BinaryOp { .. } => visitor.visit_binary_op(self),
            InstrKind::Comparison { .. } => visitor.visit_comparison(self),
            InstrKind::InstanceOf { .. } => visitor.visit_instance_of(self),
            InstrKind::CheckCast { .. } => visitor.visit_check_cast(self),
            InstrKind::Conversion { .. } => visitor.visit_conversion(self),
            InstrKind::ArrayLength { .. } => visitor.visit_array_length(self),
            InstrKind::ArrayLoad { .. } => visitor.visit_array_load(self),
            InstrKind::ArrayStore { .. } => visitor.visit_array_store(self),
            InstrKind::Monitor { .. } => visitor.visit_monitor(self),
            InstrKind::LoadMetadata { .. } => visitor.visit_load_metadata(self),
            InstrKind::PropertyRead { .. } => visitor.visit_property_read(self),
            InstrKind::PropertyWrite { .. } => visitor.visit_property_write(self),
            InstrKind::LexicalRead { .. } => visitor.visit_lexical_read(self),
            InstrKind::LexicalWrite { .. } => visitor.visit_lexical_write(self),
            InstrKind::GlobalRead { .. } => visitor.visit_global_read(self),
            InstrKind::GlobalWrite { .. } => visitor.visit_global_write(self),
            InstrKind::IsDefined { .. } => visitor.visit_is_defined(self),
            InstrKind::EachElementHasNext { .. } => visitor.visit_each_element_has_next(self),
            InstrKind::EachElementGet { .. } => visitor.visit_each_element_get(self),
            InstrKind::TypeOf { .. } => visitor.visit_type_of(self),
            InstrKind::Assert { .. } => visitor.visit_assert(self),
            InstrKind::Echo { .. } => visitor.visit_echo(self),
            InstrKind::ScopedRegion { .. } => visitor.visit_scoped_region(self),
            InstrKind::CheckReference { .. } => visitor.visit_check_reference(self),
            InstrKind::DynamicInstanceOf { .. } => visitor.visit_dynamic_instance_of(self),
        }
    }
}
