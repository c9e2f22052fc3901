use pretty_assertions::assert_eq;

use super::*;
use crate::{
    BinaryOp, BlockId, BranchOp, CallSiteRef, ComparisonOp, Constant, Dialect, Dispatch,
    FieldRef, InstrIdx, IrError, LexicalAccess, MethodRef, NewSiteRef, Opcode, Shapes,
    StringInterner, TypeRef, UnaryOp,
};

fn v(raw: u32) -> ValueId {
    ValueId::new(raw)
}

fn full_factory(names: &StringInterner) -> InstructionFactory {
    let ty = |name: &str| TypeRef::new(names.intern("Test"), names.intern(name));
    InstructionFactory::new(
        Dialect::builder("full", ty("Root"))
            .shapes(Shapes::BASELINE | Shapes::EXTENSIONS)
            .field_access_exceptions(&[ty("NullPointer")])
            .invoke_exceptions(&[ty("Error")])
            .allocation_exceptions(&[ty("OutOfMemory")])
            .dynamic_access_exceptions(&[ty("TypeError")])
            .arithmetic_exceptions(&[ty("Arithmetic")])
            .build(),
    )
}

/// One instruction of every variant (plus the optional-operand shapes).
fn every_shape(names: &StringInterner, f: &InstructionFactory) -> Vec<Instr> {
    let ty = |name: &str| TypeRef::new(names.intern("Test"), names.intern(name));
    let field = FieldRef::new(ty("Box"), names.intern("value"), ty("Int"));
    let target = MethodRef::new(ty("Box"), names.intern("do"));
    let outer = names.intern("outer");
    let block = BlockId::new(1);

    vec![
        f.assign(v(2), v(1)),
        f.phi(v(4), &[v(1), v(2), v(3)]),
        f.pi(v(2), v(1), block, BlockId::new(2), InstrIdx::new(0)),
        f.get(v(2), v(1), field),
        f.get_static(v(2), field),
        f.put(v(1), v(2), field),
        f.put_static(v(2), field),
        f.goto(),
        f.conditional_branch(BranchOp::Eq, ty("Int"), v(1), v(2)),
        f.switch(v(1), block, &[(0, BlockId::new(2)), (1, BlockId::new(3))]),
        f.return_void(),
        f.return_value(v(1), true),
        f.throw(v(1)),
        f.get_caught_exception(v(1), block),
        f.invoke(
            &[v(5)],
            v(6),
            &[v(1), v(2)],
            CallSiteRef::new(0, target, Dispatch::Virtual),
        ),
        f.invoke_value(
            &[v(5), v(6)],
            v(7),
            v(1),
            &[v(2)],
            CallSiteRef::new(1, target, Dispatch::Dynamic),
        ),
        f.new_object(v(1), NewSiteRef::new(2, ty("Box"))),
        f.new_with_args(v(3), &[v(1), v(2)], NewSiteRef::new(3, ty("Array"))),
        f.unary_op(UnaryOp::Neg, v(2), v(1)),
        f.binary_op(BinaryOp::Div, v(3), v(1), v(2), true),
        f.comparison(ComparisonOp::Cmpl, v(3), v(1), v(2)),
        f.instance_of(v(2), v(1), ty("Box")),
        f.check_cast(v(2), v(1), ty("Box")),
        f.conversion(v(2), v(1), ty("Int"), ty("Long"), false),
        f.conversion(v(2), v(1), ty("Long"), ty("Int"), true),
        f.array_length(v(2), v(1)),
        f.array_load(v(3), v(1), v(2), ty("Int")),
        f.array_store(v(1), v(2), v(3), ty("Int")),
        f.monitor(v(1), true),
        f.load_metadata(v(1), ty("Class"), Constant::String(names.intern("Box"))),
        f.property_read(v(3), v(1), v(2)),
        f.property_write(v(1), v(2), v(3)),
        f.lexical_read(&[
            LexicalAccess::new(outer, names.intern("x"), v(1)),
            LexicalAccess::new(outer, names.intern("y"), v(2)),
        ]),
        f.lexical_write_one(outer, names.intern("x"), v(1)),
        f.global_read(v(1), field),
        f.global_write(field, v(1)),
        f.is_defined(v(3), v(1), None, None),
        f.is_defined(v(3), v(1), Some(v(2)), Some(field)),
        f.each_element_has_next(v(2), v(1)),
        f.each_element_get(v(2), v(1)),
        f.type_of(v(2), v(1)),
        f.assert(v(1), true),
        f.echo(&[v(1), v(2)]),
        f.scoped_region(v(1), false),
        f.check_reference(v(1)),
        f.dynamic_instance_of(v(3), v(1), v(2)),
    ]
    .into_iter()
    .collect::<Result<_, IrError>>()
    .expect("every shape is supported by the full dialect")
}

fn shifted(values: &[ValueId]) -> Vec<ValueId> {
    values.iter().map(|v| ValueId::new(v.raw() + 100)).collect()
}

#[test]
fn every_opcode_is_covered() {
    let names = StringInterner::new();
    let f = full_factory(&names);
    let mut opcodes: Vec<Opcode> = every_shape(&names, &f).iter().map(Instr::opcode).collect();
    opcodes.dedup();
    assert_eq!(opcodes.len(), 39);
}

#[test]
fn renumbering_without_replacements_is_identity() {
    let names = StringInterner::new();
    let f = full_factory(&names);
    for instr in every_shape(&names, &f) {
        let copy = instr.renumbered(&f, None, None).expect("renumber");
        assert_eq!(copy, instr);
    }
}

#[test]
fn replacing_every_operand_preserves_shape() {
    let names = StringInterner::new();
    let f = full_factory(&names);
    for instr in every_shape(&names, &f) {
        let defs = shifted(&instr.defs());
        let uses = shifted(&instr.uses());
        let copy = instr
            .renumbered(&f, Some(&defs), Some(&uses))
            .expect("renumber");

        assert_eq!(copy.opcode(), instr.opcode());
        assert_eq!(copy.defs().to_vec(), defs);
        assert_eq!(copy.uses().to_vec(), uses);
        assert_eq!(
            copy.is_potentially_excepting(),
            instr.is_potentially_excepting()
        );
        assert_eq!(copy.exception_types(), instr.exception_types());
    }
}

#[test]
fn replacing_only_defs_leaves_uses_alone() {
    let names = StringInterner::new();
    let f = full_factory(&names);
    for instr in every_shape(&names, &f) {
        let defs = shifted(&instr.defs());
        let copy = instr.renumbered(&f, Some(&defs), None).expect("renumber");
        assert_eq!(copy.defs().to_vec(), defs, "{}", instr.display(&names));
        assert_eq!(copy.uses(), instr.uses(), "{}", instr.display(&names));
    }
}

#[test]
fn short_replacement_falls_back_per_slot() {
    let names = StringInterner::new();
    let f = full_factory(&names);
    let int = TypeRef::new(names.intern("Test"), names.intern("Int"));
    let store = f
        .array_store(v(1), v(2), v(3), int)
        .expect("array store");

    let copy = store
        .renumbered(&f, None, Some(&[v(10)]))
        .expect("renumber");
    assert_eq!(copy.uses().to_vec(), vec![v(10), v(2), v(3)]);
}

#[test]
fn invoke_exception_def_follows_results() {
    let names = StringInterner::new();
    let f = full_factory(&names);
    let target = MethodRef::new(
        TypeRef::new(names.intern("Test"), names.intern("Box")),
        names.intern("do"),
    );
    let call = f
        .invoke_value(
            &[v(5)],
            v(6),
            v(1),
            &[v(2)],
            CallSiteRef::new(0, target, Dispatch::Dynamic),
        )
        .expect("invoke");

    let copy = call
        .renumbered(&f, Some(&[v(50), v(60)]), Some(&[v(10), v(20)]))
        .expect("renumber");
    assert_eq!(
        copy.kind(),
        &InstrKind::Invoke {
            results: ValueList::from_slice(&[v(50)]),
            exception: v(60),
            function: Some(v(10)),
            params: ValueList::from_slice(&[v(20)]),
            site: CallSiteRef::new(0, target, Dispatch::Dynamic),
        }
    );
}

#[test]
fn renumbering_through_a_narrower_factory_fails() {
    let names = StringInterner::new();
    let full = full_factory(&names);
    let root = TypeRef::new(names.intern("Test"), names.intern("Root"));
    let narrow = InstructionFactory::new(Dialect::builder("narrow", root).build());

    let read = full.property_read(v(3), v(1), v(2)).expect("read");
    assert!(matches!(
        read.renumbered(&narrow, None, None),
        Err(IrError::UnsupportedOperation {
            operation: "property_read",
            ..
        })
    ));
}

#[test]
fn checked_conversion_stays_checked() {
    let names = StringInterner::new();
    let f = full_factory(&names);
    let ty = |name: &str| TypeRef::new(names.intern("Test"), names.intern(name));

    let checked = f
        .conversion(v(2), v(1), ty("Long"), ty("Int"), true)
        .expect("checked conversion");
    let unchecked = f
        .conversion(v(2), v(1), ty("Long"), ty("Int"), false)
        .expect("unchecked conversion");
    assert_ne!(checked, unchecked);

    let moved = checked
        .renumbered(&f, Some(&[v(8)]), Some(&[v(9)]))
        .expect("renumber");
    assert!(matches!(
        moved.kind(),
        InstrKind::Conversion {
            def,
            value,
            check_overflow: true,
            ..
        } if *def == v(8) && *value == v(9)
    ));
}
