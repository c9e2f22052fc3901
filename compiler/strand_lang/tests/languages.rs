//! Language descriptors and their dialects.
//!
//! Covers constant classification, primitive lookup, which instructions
//! are potentially excepting in each dialect, and the shapes each dialect
//! refuses to build.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use strand_ir::{
    BinaryOp, BranchOp, CallSiteRef, ComparisonOp, Constant, Dispatch, FieldRef, IrError,
    MethodRef, NewSiteRef, SharedInterner, Shapes, TypeRef, UnaryOp, ValueId,
};
use strand_lang::{ecma, jvm};
use strand_types::{Language, LanguageError};

fn v(raw: u32) -> ValueId {
    ValueId::new(raw)
}

fn ty(names: &SharedInterner, loader: &str, name: &str) -> TypeRef {
    TypeRef::new(names.intern(loader), names.intern(name))
}

fn ecma_ty(names: &SharedInterner, name: &str) -> TypeRef {
    ty(names, ecma::LOADER, name)
}

fn jvm_ty(names: &SharedInterner, name: &str) -> TypeRef {
    ty(names, jvm::PRIMORDIAL, name)
}

// ── Constants and primitives ────────────────────────────────────────

#[test]
fn ecma_numbers_share_one_type() {
    let names = SharedInterner::new();
    let lang = ecma::language(&names);
    let number = ecma_ty(&names, ecma::types::NUMBER);

    for constant in [
        Constant::Int(1),
        Constant::Long(2),
        Constant::float(0.5),
        Constant::double(1.5),
    ] {
        assert_eq!(lang.constant_type(constant), Ok(number));
    }
    assert_eq!(
        lang.constant_type(Constant::Null),
        Ok(ecma_ty(&names, ecma::types::NULL))
    );
    assert_eq!(
        lang.constant_type(Constant::Bool(false)),
        Ok(ecma_ty(&names, ecma::types::BOOLEAN))
    );
    assert_eq!(
        lang.constant_type(Constant::String(names.intern("hi"))),
        Ok(ecma_ty(&names, ecma::types::STRING))
    );
}

#[test]
fn jvm_constants_keep_their_width() {
    let names = SharedInterner::new();
    let lang = jvm::language(&names);
    let (int, long) = (jvm_ty(&names, "I"), jvm_ty(&names, "J"));
    let (float, double) = (jvm_ty(&names, "F"), jvm_ty(&names, "D"));
    assert_eq!(lang.constant_type(Constant::Int(1)), Ok(int));
    assert_eq!(lang.constant_type(Constant::Long(1)), Ok(long));
    assert_eq!(lang.constant_type(Constant::float(1.0)), Ok(float));
    assert_eq!(lang.constant_type(Constant::double(1.0)), Ok(double));
    assert!(lang.is_long_type(long));
    assert!(!lang.is_int_type(long));
    assert!(lang.is_float_type(float));
    assert!(!lang.is_double_type(float));
}

#[test]
fn type_predicates_by_language() {
    let names = SharedInterner::new();
    let js = ecma::language(&names);
    assert!(js.is_null_type(ecma_ty(&names, ecma::types::UNDEFINED)));
    assert!(js.is_null_type(ecma_ty(&names, ecma::types::NULL)));
    let number = ecma_ty(&names, ecma::types::NUMBER_OBJECT);
    let string = ecma_ty(&names, ecma::types::STRING_OBJECT);
    assert!(js.is_double_type(number));
    assert!(js.is_string_type(string));
    assert!(!js.is_int_type(ecma_ty(&names, ecma::types::NUMBER)));

    let java = jvm::language(&names);
    assert!(java.is_string_type(jvm_ty(&names, jvm::types::STRING)));
    assert!(!java.is_null_type(jvm_ty(&names, jvm::types::OBJECT)));
}

#[test]
fn primitive_lookup() {
    let names = SharedInterner::new();
    let js = ecma::language(&names);
    assert_eq!(
        js.lookup_primitive("RegExp"),
        Ok(ecma_ty(&names, ecma::types::REGEXP))
    );
    assert_eq!(
        js.lookup_primitive("int"),
        Err(LanguageError::UnknownPrimitiveType {
            language: ecma::LANGUAGE.to_owned(),
            name: "int".to_owned(),
        })
    );

    let java = jvm::language(&names);
    assert_eq!(java.lookup_primitive("int"), Ok(jvm_ty(&names, "I")));
    assert_eq!(java.lookup_primitive("boolean"), Ok(jvm_ty(&names, "Z")));
    assert!(java.lookup_primitive("Number").is_err());
}

#[test]
fn language_specific_queries() {
    let names = SharedInterner::new();
    let js = ecma::language(&names);
    let java = jvm::language(&names);
    let target = MethodRef::new(js.root_type(), names.intern("do"));

    assert_eq!(js.infer_invoke_exceptions(&target), &[js.root_type()]);
    assert_eq!(
        java.infer_invoke_exceptions(&target),
        &[
            jvm_ty(&names, jvm::types::RUNTIME_EXCEPTION),
            jvm_ty(&names, jvm::types::ERROR)
        ]
    );

    assert!(js.array_interfaces().is_empty());
    assert_eq!(java.array_interfaces().len(), 2);

    assert!(matches!(
        js.metadata_token_type(),
        Err(LanguageError::NotApplicable { .. })
    ));
    assert_eq!(
        java.metadata_token_type(),
        Ok(jvm_ty(&names, jvm::types::CLASS))
    );

    assert_eq!(js.throwable_type(), js.root_type());
    assert_eq!(
        java.throwable_type(),
        jvm_ty(&names, jvm::types::THROWABLE)
    );
    assert!(js.code_body_types().is_some());
    assert!(java.code_body_types().is_none());
}

// ── Potentially-excepting instructions ──────────────────────────────

fn check_common_pei(lang: &Language, names: &SharedInterner) {
    let f = lang.factory();
    let root = lang.root_type();
    let site = NewSiteRef::new(0, root);
    let target = MethodRef::new(root, names.intern("do"));

    let excepting = [
        f.throw(v(1)).expect("throw"),
        f.new_object(v(1), site).expect("new"),
    ];
    for instr in &excepting {
        assert!(instr.is_potentially_excepting(), "{}", instr.opcode());
    }

    let call = if f.supports(Shapes::TYPED_INVOKE) {
        let site = CallSiteRef::new(0, target, Dispatch::Virtual);
        f.invoke(&[v(3)], v(4), &[v(1)], site)
    } else {
        let site = CallSiteRef::new(0, target, Dispatch::Dynamic);
        f.invoke_value(&[v(3)], v(4), v(1), &[v(2)], site)
    }
    .expect("call");
    assert!(call.is_potentially_excepting());
    assert!(!call.exception_types().expect("call is PEI").is_empty());

    let quiet = [
        f.goto().expect("goto"),
        f.assign(v(2), v(1)).expect("assign"),
        f.phi(v(3), &[v(1), v(2)]).expect("phi"),
        f.comparison(ComparisonOp::Lt, v(3), v(1), v(2))
            .expect("comparison"),
        f.unary_op(UnaryOp::Neg, v(2), v(1)).expect("neg"),
        f.binary_op(BinaryOp::Add, v(3), v(1), v(2), true)
            .expect("add"),
        f.conditional_branch(BranchOp::Eq, root, v(1), v(2))
            .expect("branch"),
    ];
    for instr in &quiet {
        assert!(!instr.is_potentially_excepting(), "{}", instr.opcode());
        assert!(matches!(
            instr.exception_types(),
            Err(IrError::NotApplicable { .. })
        ));
    }
}

#[test]
fn pei_consistency_in_every_dialect() {
    let names = SharedInterner::new();
    check_common_pei(&ecma::language(&names), &names);
    check_common_pei(&jvm::language(&names), &names);
    check_common_pei(&jvm::source::language(&names), &names);
}

#[test]
fn ecma_property_and_global_access_raise_type_errors() {
    let names = SharedInterner::new();
    let lang = ecma::language(&names);
    let f = lang.factory();
    let type_error = [ecma_ty(&names, ecma::types::TYPE_ERROR)];
    let global = FieldRef::new(lang.root_type(), names.intern("window"), lang.root_type());

    for instr in [
        f.property_read(v(3), v(1), v(2)).expect("read"),
        f.property_write(v(1), v(2), v(3)).expect("write"),
        f.global_read(v(1), global).expect("global read"),
        f.global_write(global, v(1)).expect("global write"),
    ] {
        assert_eq!(instr.exception_types(), Ok(&type_error[..]));
    }

    let division = f
        .binary_op(BinaryOp::Div, v(3), v(1), v(2), true)
        .expect("div");
    assert!(!division.is_potentially_excepting());
}

#[test]
fn jvm_traps_on_integer_division_and_null_receivers() {
    let names = SharedInterner::new();
    let lang = jvm::language(&names);
    let f = lang.factory();
    let field = FieldRef::new(lang.root_type(), names.intern("next"), lang.root_type());

    let division = f
        .binary_op(BinaryOp::Rem, v(3), v(1), v(2), true)
        .expect("rem");
    assert_eq!(
        division.exception_types(),
        Ok(&[jvm_ty(&names, jvm::types::ARITHMETIC)][..])
    );
    assert!(f
        .get(v(2), v(1), field)
        .expect("get")
        .is_potentially_excepting());
    assert!(!f
        .get_static(v(2), field)
        .expect("static get")
        .is_potentially_excepting());
    assert!(f
        .array_length(v(2), v(1))
        .expect("length")
        .is_potentially_excepting());
}

// ── Unsupported shapes ──────────────────────────────────────────────

#[test]
fn dialects_refuse_foreign_shapes() {
    let names = SharedInterner::new();
    let js = ecma::language(&names);
    let java = jvm::language(&names);
    let source = jvm::source::language(&names);

    assert!(matches!(
        js.factory().array_length(v(2), v(1)),
        Err(IrError::UnsupportedOperation {
            ref dialect,
            operation: "array_length",
        }) if dialect == ecma::LANGUAGE
    ));
    assert!(matches!(
        java.factory().property_read(v(3), v(1), v(2)),
        Err(IrError::UnsupportedOperation { .. })
    ));
    assert!(java.factory().assert(v(1), true).is_err());
    assert!(source.factory().assert(v(1), true).is_ok());

    let (int, long) = (jvm_ty(&names, "I"), jvm_ty(&names, "J"));
    assert!(matches!(
        java.factory().conversion(v(2), v(1), int, long, true),
        Err(IrError::UnsupportedConversion { .. })
    ));
}
