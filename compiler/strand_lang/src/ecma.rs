//! ECMAScript-style dynamic language.
//!
//! Every value is an object rooted at `Root`; numbers of every width share
//! one `Number` type, properties are keyed by runtime values, and
//! functions and scripts are code-body classes under `CodeBody`.

use strand_ir::{ConstantKind, Dialect, InstructionFactory, Name, SharedInterner, Shapes, TypeRef};
use strand_types::{ClassKind, ClassTemplate, Language};

/// Catalog name of the language.
pub const LANGUAGE: &str = "ecma";

/// Loader that owns the bootstrap classes.
pub const LOADER: &str = "Ecma";

/// Well-known type names.
pub mod types {
    pub const ROOT: &str = "Root";
    pub const UNDEFINED: &str = "Undefined";
    pub const PRIMITIVES: &str = "Primitives";
    pub const FAKE_ROOT: &str = "FakeRoot";
    pub const STRING: &str = "String";
    pub const NULL: &str = "Null";
    pub const ARRAY: &str = "Array";
    pub const OBJECT: &str = "Object";
    pub const TYPE_ERROR: &str = "TypeError";
    pub const CODE_BODY: &str = "CodeBody";
    pub const FUNCTION: &str = "Function";
    pub const SCRIPT: &str = "Script";
    pub const BOOLEAN: &str = "Boolean";
    pub const NUMBER: &str = "Number";
    pub const DATE: &str = "Date";
    pub const REGEXP: &str = "RegExp";
    pub const BOOLEAN_OBJECT: &str = "BooleanObject";
    pub const NUMBER_OBJECT: &str = "NumberObject";
    pub const DATE_OBJECT: &str = "DateObject";
    pub const REGEXP_OBJECT: &str = "RegExpObject";
    pub const STRING_OBJECT: &str = "StringObject";
}

use types::{
    ARRAY, BOOLEAN, BOOLEAN_OBJECT, CODE_BODY, DATE, DATE_OBJECT, FAKE_ROOT, FUNCTION, NULL,
    NUMBER, NUMBER_OBJECT, OBJECT, PRIMITIVES, REGEXP, REGEXP_OBJECT, ROOT, SCRIPT, STRING,
    STRING_OBJECT, TYPE_ERROR, UNDEFINED,
};

/// Classes directly under `Root`, in bootstrap order.
const ROOT_CHILDREN: [&str; 13] = [
    UNDEFINED, PRIMITIVES, FAKE_ROOT, STRING, NULL, ARRAY, OBJECT, TYPE_ERROR, CODE_BODY, BOOLEAN,
    NUMBER, DATE, REGEXP,
];

/// Wrapper objects under `Object`.
const OBJECT_CHILDREN: [&str; 5] = [
    BOOLEAN_OBJECT,
    NUMBER_OBJECT,
    DATE_OBJECT,
    REGEXP_OBJECT,
    STRING_OBJECT,
];

/// Source names of the primitive types.
const PRIMITIVE_NAMES: [&str; 5] = [BOOLEAN, NUMBER, STRING, DATE, REGEXP];

fn ty(names: &SharedInterner, loader: Name, name: &str) -> TypeRef {
    TypeRef::new(loader, names.intern(name))
}

/// Instruction shapes: every extension plus calls through function values.
///
/// Allocation and dynamic property access raise `TypeError`; calls may
/// raise anything; field access and arithmetic never trap.
pub fn dialect(names: &SharedInterner) -> Dialect {
    let loader = names.intern(LOADER);
    let type_error = ty(names, loader, TYPE_ERROR);
    Dialect::builder(LANGUAGE, ty(names, loader, ROOT))
        .shapes(Shapes::EXTENSIONS | Shapes::FUNCTION_INVOKE)
        .invoke_exceptions(&[ty(names, loader, ROOT)])
        .allocation_exceptions(&[type_error])
        .dynamic_access_exceptions(&[type_error])
        .build()
}

pub fn language(names: &SharedInterner) -> Language {
    let loader = names.intern(LOADER);
    let t = |name: &str| ty(names, loader, name);
    let root = t(ROOT);
    let number = t(NUMBER);

    let mut builder = Language::builder(
        names,
        LANGUAGE,
        loader,
        InstructionFactory::new(dialect(names)),
    )
    .constant(ConstantKind::Null, t(NULL))
    .constant(ConstantKind::Bool, t(BOOLEAN))
    .constant(ConstantKind::String, t(STRING))
    .constant(ConstantKind::Int, number)
    .constant(ConstantKind::Long, number)
    .constant(ConstantKind::Float, number)
    .constant(ConstantKind::Double, number)
    .null_type(t(UNDEFINED))
    .null_type(t(NULL))
    .string_type(t(STRING))
    .string_type(t(STRING_OBJECT))
    .double_type(number)
    .double_type(t(NUMBER_OBJECT))
    .invoke_exceptions(&[root])
    .code_body_types(t(CODE_BODY), t(FUNCTION), t(SCRIPT))
    .class(ClassTemplate::new(root, ClassKind::DynamicProperty));

    for name in PRIMITIVE_NAMES {
        builder = builder.primitive(name, t(name));
    }
    for name in ROOT_CHILDREN {
        let kind = if name == OBJECT {
            ClassKind::DynamicProperty
        } else {
            ClassKind::Plain
        };
        let template = ClassTemplate::new(t(name), kind).extends(root);
        builder = builder.class(template);
    }
    for name in [FUNCTION, SCRIPT] {
        let template = ClassTemplate::new(t(name), ClassKind::Plain);
        builder = builder.class(template.extends(t(CODE_BODY)));
    }
    for name in OBJECT_CHILDREN {
        let template = ClassTemplate::new(t(name), ClassKind::Plain);
        builder = builder.class(template.extends(t(OBJECT)));
    }
    builder.build()
}
