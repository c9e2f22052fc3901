use pretty_assertions::assert_eq;

use super::*;
use crate::{MethodRef, Opcode, StringInterner};

fn v(raw: u32) -> ValueId {
    ValueId::new(raw)
}

fn ty(names: &StringInterner, name: &str) -> TypeRef {
    TypeRef::new(names.intern("Test"), names.intern(name))
}

/// A statically typed dialect with trapping arithmetic and no extensions.
fn typed(names: &StringInterner) -> InstructionFactory {
    let npe = ty(names, "NullPointer");
    InstructionFactory::new(
        Dialect::builder("typed", ty(names, "Object"))
            .shapes(Shapes::BASELINE - Shapes::OVERFLOW_CONVERSION)
            .field_access_exceptions(&[npe])
            .invoke_exceptions(&[npe, ty(names, "Error")])
            .allocation_exceptions(&[ty(names, "OutOfMemory")])
            .arithmetic_exceptions(&[ty(names, "Arithmetic")])
            .cast_exceptions(&[ty(names, "ClassCast")])
            .array_exceptions(&[npe, ty(names, "IndexOutOfBounds")])
            .monitor_exceptions(&[npe])
            .build(),
    )
}

/// A dynamically typed dialect: every extension, no arrays or casts.
fn dynamic(names: &StringInterner) -> InstructionFactory {
    InstructionFactory::new(
        Dialect::builder("dynamic", ty(names, "Root"))
            .shapes(Shapes::EXTENSIONS | Shapes::FUNCTION_INVOKE)
            .allocation_exceptions(&[ty(names, "TypeError")])
            .dynamic_access_exceptions(&[ty(names, "TypeError")])
            .build(),
    )
}

#[test]
fn unsupported_shapes_build_nothing() {
    let names = StringInterner::new();
    let js = dynamic(&names);
    let int = ty(&names, "Int");

    let err = js
        .array_load(v(1), v(2), v(3), int)
        .expect_err("unsupported");
    assert_eq!(
        err,
        IrError::UnsupportedOperation {
            dialect: "dynamic".to_owned(),
            operation: "array_load",
        }
    );
    assert!(js.check_cast(v(1), v(2), int).is_err());
    assert!(js.instance_of(v(1), v(2), int).is_err());
    assert!(js.monitor(v(1), true).is_err());
    assert!(js
        .new_with_args(v(1), &[v(2)], NewSiteRef::new(0, int))
        .is_err());
    let field = FieldRef::new(int, names.intern("f"), int);
    assert!(js.get_static(v(1), field).is_err());
    assert!(js
        .load_metadata(v(1), int, Constant::String(names.intern("x")))
        .is_err());

    let java = typed(&names);
    assert!(java.property_read(v(1), v(2), v(3)).is_err());
    let (outer, x) = (names.intern("outer"), names.intern("x"));
    assert!(java.lexical_read_one(v(1), outer, x).is_err());
    assert!(java.type_of(v(1), v(2)).is_err());
    assert!(java.echo(&[v(1)]).is_err());
}

#[test]
fn supports_reports_shape_sets() {
    let names = StringInterner::new();
    let js = dynamic(&names);
    assert!(js.supports(Shapes::PROPERTY_ACCESS | Shapes::LEXICAL));
    assert!(!js.supports(Shapes::PROPERTY_ACCESS | Shapes::ARRAYS));
    assert!(js.supports(Shapes::empty()));
}

#[test]
fn overflow_checked_conversion_is_rejected_without_support() {
    let names = StringInterner::new();
    let java = typed(&names);
    let (int, long) = (ty(&names, "I"), ty(&names, "J"));

    let err = java
        .conversion(v(2), v(1), int, long, true)
        .expect_err("unsupported");
    assert!(matches!(
        err,
        IrError::UnsupportedConversion { ref dialect, .. } if dialect == "typed"
    ));

    let plain = java
        .conversion(v(2), v(1), int, long, false)
        .expect("unchecked conversion");
    assert!(!plain.is_potentially_excepting());
    assert!(matches!(
        plain.kind(),
        InstrKind::Conversion {
            check_overflow: false,
            ..
        }
    ));
}

#[test]
fn integer_division_traps_only_with_trapping_arithmetic() {
    let names = StringInterner::new();
    let java = typed(&names);
    let js = dynamic(&names);

    let div = java
        .binary_op(BinaryOp::Div, v(3), v(1), v(2), true)
        .expect("div");
    assert_eq!(
        div.exception_types().expect("div is PEI"),
        &[ty(&names, "Arithmetic")]
    );

    let float_div = java
        .binary_op(BinaryOp::Div, v(3), v(1), v(2), false)
        .expect("div");
    assert!(!float_div.is_potentially_excepting());

    let add = java
        .binary_op(BinaryOp::Add, v(3), v(1), v(2), true)
        .expect("add");
    assert!(!add.is_potentially_excepting());

    let js_rem = js
        .binary_op(BinaryOp::Rem, v(3), v(1), v(2), true)
        .expect("rem");
    assert!(!js_rem.is_potentially_excepting());
}

#[test]
fn field_access_exceptions_follow_the_dialect() {
    let names = StringInterner::new();
    let java = typed(&names);
    let js = dynamic(&names);
    let field = FieldRef::new(ty(&names, "Box"), names.intern("value"), ty(&names, "Int"));

    assert!(java
        .get(v(2), v(1), field)
        .expect("get")
        .is_potentially_excepting());
    assert!(!java
        .get_static(v(2), field)
        .expect("static get")
        .is_potentially_excepting());
    assert!(!js
        .get(v(2), v(1), field)
        .expect("get")
        .is_potentially_excepting());
    assert!(!js
        .put(v(1), v(2), field)
        .expect("put")
        .is_potentially_excepting());
}

#[test]
fn named_field_access_is_declared_on_the_root() {
    let names = StringInterner::new();
    let js = dynamic(&names);
    let root = ty(&names, "Root");
    let name = names.intern("length");

    let get = js.get_named(v(2), v(1), name).expect("named get");
    assert_eq!(
        get.kind(),
        &InstrKind::Get {
            def: v(2),
            object: Some(v(1)),
            field: FieldRef::new(root, name, root),
        }
    );

    let put = js.put_named(v(1), v(2), name).expect("named put");
    assert_eq!(put.opcode(), Opcode::Put);
}

#[test]
fn dynamic_accesses_raise_type_errors() {
    let names = StringInterner::new();
    let js = dynamic(&names);
    let type_error = [ty(&names, "TypeError")];
    let global = FieldRef::new(ty(&names, "Root"), names.intern("g"), ty(&names, "Root"));

    let instrs = [
        js.property_read(v(3), v(1), v(2)).expect("read"),
        js.property_write(v(1), v(2), v(3)).expect("write"),
        js.global_read(v(1), global).expect("global read"),
        js.global_write(global, v(1)).expect("global write"),
        js.check_reference(v(1)).expect("check reference"),
        js.new_object(v(1), NewSiteRef::new(0, ty(&names, "Object")))
            .expect("new"),
    ];
    for instr in &instrs {
        assert_eq!(
            instr.exception_types(),
            Ok(&type_error[..]),
            "{:?}",
            instr.opcode()
        );
    }

    let quiet = [
        js.type_of(v(2), v(1)).expect("typeof"),
        js.each_element_get(v(2), v(1)).expect("each get"),
        js.each_element_has_next(v(2), v(1)).expect("each has next"),
        js.scoped_region(v(1), true).expect("scoped region"),
        js.assert(v(1), false).expect("assert"),
        js.dynamic_instance_of(v(3), v(1), v(2))
            .expect("instanceof"),
    ];
    for instr in &quiet {
        assert!(!instr.is_potentially_excepting(), "{:?}", instr.opcode());
    }
}

#[test]
fn malformed_shapes_are_rejected() {
    let names = StringInterner::new();
    let java = typed(&names);
    let js = dynamic(&names);

    assert!(matches!(
        java.phi(v(1), &[]),
        Err(IrError::MalformedShape {
            operation: "phi",
            ..
        })
    ));
    let duplicate_labels = [(1, BlockId::new(1)), (1, BlockId::new(2))];
    assert!(matches!(
        java.switch(v(1), BlockId::new(0), &duplicate_labels),
        Err(IrError::MalformedShape {
            operation: "switch",
            ..
        })
    ));
    assert!(matches!(
        js.lexical_read(&[]),
        Err(IrError::MalformedShape { .. })
    ));

    let target = MethodRef::new(ty(&names, "Object"), names.intern("do"));
    let virtual_call = CallSiteRef::new(0, target, Dispatch::Virtual);
    assert!(matches!(
        java.invoke(&[v(1)], v(2), &[], virtual_call),
        Err(IrError::MalformedShape {
            reason: "missing receiver",
            ..
        })
    ));
    let static_call = CallSiteRef::new(0, target, Dispatch::Static);
    assert!(java.invoke(&[v(1)], v(2), &[], static_call).is_ok());
}

#[test]
fn invoke_carries_the_dialect_invoke_set() {
    let names = StringInterner::new();
    let java = typed(&names);
    let target = MethodRef::new(ty(&names, "Object"), names.intern("do"));
    let site = CallSiteRef::new(7, target, Dispatch::Special);
    let call = java.invoke(&[], v(2), &[v(1)], site).expect("invoke");
    assert_eq!(
        call.exception_types().expect("invoke is PEI"),
        &[ty(&names, "NullPointer"), ty(&names, "Error")]
    );
}
