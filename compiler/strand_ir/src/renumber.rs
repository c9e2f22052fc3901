//! Value renumbering.
//!
//! SSA construction and similar passes rename value numbers by rebuilding
//! each instruction through its dialect's factory. Replacement values are
//! given positionally against [`Instr::defs`] and [`Instr::uses`]; any
//! slot without a replacement keeps its current value, so the result
//! always has the original operand counts.

use smallvec::SmallVec;

use crate::{Instr, InstrKind, InstructionFactory, IrResult, ValueId, ValueList};

/// Positional replacement values for one operand list.
#[derive(Clone, Copy)]
struct Slots<'a> {
    replacement: Option<&'a [ValueId]>,
}

impl<'a> Slots<'a> {
    fn new(replacement: Option<&'a [ValueId]>) -> Self {
        Slots { replacement }
    }

    /// Value for slot `index`, falling back to `original`.
    #[inline]
    fn at(self, index: usize, original: ValueId) -> ValueId {
        self.replacement
            .and_then(|values| values.get(index))
            .copied()
            .unwrap_or(original)
    }

    /// Values for the slots starting at `start`.
    fn run(self, start: usize, original: &[ValueId]) -> ValueList {
        original
            .iter()
            .enumerate()
            .map(|(offset, &value)| self.at(start + offset, value))
            .collect()
    }
}

impl Instr {
    /// Rebuild this instruction with new value numbers.
    ///
    /// `defs` and `uses` replace operands positionally; `None`, or a slice
    /// shorter than the operand list, leaves the remaining operands as
    /// they are. The rebuild goes through `factory`, so the result carries
    /// that dialect's exception behaviour.
    pub fn renumbered(
        &self,
        factory: &InstructionFactory,
        defs: Option<&[ValueId]>,
        uses: Option<&[ValueId]>,
    ) -> IrResult<Instr> {
        tracing::trace!(opcode = %self.opcode(), "renumbering instruction");
        let d = Slots::new(defs);
        let u = Slots::new(uses);

        match self.kind() {
            InstrKind::Assign { def, value } => factory.assign(d.at(0, *def), u.at(0, *value)),

            InstrKind::Phi { def, params } => factory.phi(d.at(0, *def), &u.run(0, params)),

            InstrKind::Pi {
                def,
                value,
                block,
                successor,
                cause,
            } => factory.pi(d.at(0, *def), u.at(0, *value), *block, *successor, *cause),

            InstrKind::Get { def, object, field } => match object {
                Some(object) => factory.get(d.at(0, *def), u.at(0, *object), *field),
                None => factory.get_static(d.at(0, *def), *field),
            },

            InstrKind::Put {
                object,
                value,
                field,
            } => match object {
                Some(object) => factory.put(u.at(0, *object), u.at(1, *value), *field),
                None => factory.put_static(u.at(0, *value), *field),
            },

            InstrKind::Goto => factory.goto(),

            InstrKind::ConditionalBranch {
                op,
                operand_type,
                lhs,
                rhs,
            } => factory.conditional_branch(*op, *operand_type, u.at(0, *lhs), u.at(1, *rhs)),

            InstrKind::Switch {
                scrutinee,
                default,
                cases,
            } => factory.switch(u.at(0, *scrutinee), *default, cases),

            InstrKind::Return {
                value,
                is_primitive,
            } => match value {
                Some(value) => factory.return_value(u.at(0, *value), *is_primitive),
                None => factory.return_void(),
            },

            InstrKind::Throw { exception } => factory.throw(u.at(0, *exception)),

            InstrKind::GetCaughtException { def, block } => {
                factory.get_caught_exception(d.at(0, *def), *block)
            }

            InstrKind::Invoke {
                results,
                exception,
                function,
                params,
                site,
            } => {
                let new_results = d.run(0, results);
                let new_exception = d.at(results.len(), *exception);
                match function {
                    Some(function) => factory.invoke_value(
                        &new_results,
                        new_exception,
                        u.at(0, *function),
                        &u.run(1, params),
                        *site,
                    ),
                    None => {
                        factory.invoke(&new_results, new_exception, &u.run(0, params), *site)
                    }
                }
            }

            InstrKind::New { def, params, site } => {
                if params.is_empty() {
                    factory.new_object(d.at(0, *def), *site)
                } else {
                    factory.new_with_args(d.at(0, *def), &u.run(0, params), *site)
                }
            }

            InstrKind::UnaryOp { op, def, value } => {
                factory.unary_op(*op, d.at(0, *def), u.at(0, *value))
            }

            InstrKind::BinaryOp {
                op,
                def,
                lhs,
                rhs,
                may_be_integer,
            } => factory.binary_op(
                *op,
                d.at(0, *def),
                u.at(0, *lhs),
                u.at(1, *rhs),
                *may_be_integer,
            ),

            InstrKind::Comparison { op, def, lhs, rhs } => {
                factory.comparison(*op, d.at(0, *def), u.at(0, *lhs), u.at(1, *rhs))
            }

            InstrKind::InstanceOf { def, value, ty } => {
                factory.instance_of(d.at(0, *def), u.at(0, *value), *ty)
            }

            InstrKind::CheckCast { def, value, ty } => {
                factory.check_cast(d.at(0, *def), u.at(0, *value), *ty)
            }

            InstrKind::Conversion {
                def,
                value,
                from,
                to,
                check_overflow,
            } => {
                factory.conversion(d.at(0, *def), u.at(0, *value), *from, *to, *check_overflow)
            }

            InstrKind::ArrayLength { def, array } => {
                factory.array_length(d.at(0, *def), u.at(0, *array))
            }

            InstrKind::ArrayLoad {
                def,
                array,
                index,
                element,
            } => factory.array_load(d.at(0, *def), u.at(0, *array), u.at(1, *index), *element),

            InstrKind::ArrayStore {
                array,
                index,
                value,
                element,
            } => factory.array_store(
                u.at(0, *array),
                u.at(1, *index),
                u.at(2, *value),
                *element,
            ),

            InstrKind::Monitor { object, enter } => factory.monitor(u.at(0, *object), *enter),

            InstrKind::LoadMetadata { def, entity, token } => {
                factory.load_metadata(d.at(0, *def), *entity, *token)
            }

            InstrKind::PropertyRead {
                def,
                object,
                member,
            } => factory.property_read(d.at(0, *def), u.at(0, *object), u.at(1, *member)),

            InstrKind::PropertyWrite {
                object,
                member,
                value,
            } => factory.property_write(u.at(0, *object), u.at(1, *member), u.at(2, *value)),

            InstrKind::LexicalRead { accesses } => {
                let accesses: SmallVec<[_; 2]> = accesses
                    .iter()
                    .enumerate()
                    .map(|(i, access)| access.with_value(d.at(i, access.value)))
                    .collect();
                factory.lexical_read(&accesses)
            }

            InstrKind::LexicalWrite { accesses } => {
                let accesses: SmallVec<[_; 2]> = accesses
                    .iter()
                    .enumerate()
                    .map(|(i, access)| access.with_value(u.at(i, access.value)))
                    .collect();
                factory.lexical_write(&accesses)
            }

            InstrKind::GlobalRead { def, global } => factory.global_read(d.at(0, *def), *global),

            InstrKind::GlobalWrite { global, value } => {
                factory.global_write(*global, u.at(0, *value))
            }

            InstrKind::IsDefined {
                def,
                object,
                field_value,
                field,
            } => factory.is_defined(
                d.at(0, *def),
                u.at(0, *object),
                field_value.map(|value| u.at(1, value)),
                *field,
            ),

            InstrKind::EachElementHasNext { def, object } => {
                factory.each_element_has_next(d.at(0, *def), u.at(0, *object))
            }

            InstrKind::EachElementGet { def, object } => {
                factory.each_element_get(d.at(0, *def), u.at(0, *object))
            }

            InstrKind::TypeOf { def, object } => factory.type_of(d.at(0, *def), u.at(0, *object)),

            InstrKind::Assert {
                value,
                from_specification,
            } => factory.assert(u.at(0, *value), *from_specification),

            InstrKind::Echo { values } => factory.echo(&u.run(0, values)),

            InstrKind::ScopedRegion { object, enter } => {
                factory.scoped_region(u.at(0, *object), *enter)
            }

            InstrKind::CheckReference { value } => factory.check_reference(u.at(0, *value)),

            InstrKind::DynamicInstanceOf {
                def,
                object,
                type_value,
            } => {
                factory.dynamic_instance_of(d.at(0, *def), u.at(0, *object), u.at(1, *type_value))
            }
        }
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;
