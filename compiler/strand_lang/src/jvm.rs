//! JVM bytecode language.
//!
//! Statically typed, width-distinguishing, with trapping integer division
//! and null-checked field, array and monitor operations. Bootstrap
//! classes live in the primordial loader; application loaders delegate to
//! it.

pub mod source;

use strand_ir::{
    ConstantKind, Dialect, DialectBuilder, InstructionFactory, Name, SharedInterner, Shapes,
    TypeRef,
};
use strand_types::{ClassFlags, ClassKind, ClassTemplate, Language, LanguageBuilder};

/// Catalog name of the language.
pub const LANGUAGE: &str = "jvm";

/// Loader that owns the bootstrap classes.
pub const PRIMORDIAL: &str = "Primordial";

/// Conventional loader for application classes.
pub const APPLICATION: &str = "Application";

/// Well-known type names, in descriptor form.
pub mod types {
    pub const OBJECT: &str = "Ljava/lang/Object";
    pub const STRING: &str = "Ljava/lang/String";
    pub const CLASS: &str = "Ljava/lang/Class";
    pub const THROWABLE: &str = "Ljava/lang/Throwable";
    pub const EXCEPTION: &str = "Ljava/lang/Exception";
    pub const RUNTIME_EXCEPTION: &str = "Ljava/lang/RuntimeException";
    pub const ERROR: &str = "Ljava/lang/Error";
    pub const NULL_POINTER: &str = "Ljava/lang/NullPointerException";
    pub const ARITHMETIC: &str = "Ljava/lang/ArithmeticException";
    pub const CLASS_CAST: &str = "Ljava/lang/ClassCastException";
    pub const ARRAY_INDEX: &str = "Ljava/lang/ArrayIndexOutOfBoundsException";
    pub const OUT_OF_MEMORY: &str = "Ljava/lang/OutOfMemoryError";
    pub const CLONEABLE: &str = "Ljava/lang/Cloneable";
    pub const SERIALIZABLE: &str = "Ljava/io/Serializable";
    /// Type of the `null` constant.
    pub const NULL: &str = "null";
}

use types::{
    ARITHMETIC, ARRAY_INDEX, CLASS, CLASS_CAST, CLONEABLE, ERROR, EXCEPTION, NULL, NULL_POINTER,
    OBJECT, OUT_OF_MEMORY, RUNTIME_EXCEPTION, SERIALIZABLE, STRING, THROWABLE,
};

/// Source keyword to descriptor.
const PRIMITIVES: [(&str, &str); 9] = [
    ("boolean", "Z"),
    ("byte", "B"),
    ("char", "C"),
    ("short", "S"),
    ("int", "I"),
    ("long", "J"),
    ("float", "F"),
    ("double", "D"),
    ("void", "V"),
];

/// `(class, superclass)` pairs under `Object`, in bootstrap order.
const HIERARCHY: [(&str, &str); 11] = [
    (CLASS, OBJECT),
    (THROWABLE, OBJECT),
    (EXCEPTION, THROWABLE),
    (RUNTIME_EXCEPTION, EXCEPTION),
    (ERROR, THROWABLE),
    (NULL_POINTER, RUNTIME_EXCEPTION),
    (ARITHMETIC, RUNTIME_EXCEPTION),
    (CLASS_CAST, RUNTIME_EXCEPTION),
    (ARRAY_INDEX, RUNTIME_EXCEPTION),
    (OUT_OF_MEMORY, ERROR),
    (NULL, OBJECT),
];

/// Types homed in the primordial loader.
struct Primordial<'a> {
    names: &'a SharedInterner,
    loader: Name,
}

impl<'a> Primordial<'a> {
    fn new(names: &'a SharedInterner) -> Self {
        Primordial {
            names,
            loader: names.intern(PRIMORDIAL),
        }
    }

    fn ty(&self, name: &str) -> TypeRef {
        TypeRef::new(self.loader, self.names.intern(name))
    }
}

/// Shapes and exception sets shared by bytecode and source front-ends.
fn dialect_builder(name: &str, p: &Primordial<'_>) -> DialectBuilder {
    let npe = p.ty(NULL_POINTER);
    Dialect::builder(name, p.ty(OBJECT))
        .shapes(Shapes::BASELINE - Shapes::OVERFLOW_CONVERSION)
        .field_access_exceptions(&[npe])
        .invoke_exceptions(&[p.ty(RUNTIME_EXCEPTION), p.ty(ERROR)])
        .allocation_exceptions(&[p.ty(OUT_OF_MEMORY)])
        .arithmetic_exceptions(&[p.ty(ARITHMETIC)])
        .cast_exceptions(&[p.ty(CLASS_CAST)])
        .array_exceptions(&[npe, p.ty(ARRAY_INDEX)])
        .monitor_exceptions(&[npe])
}

pub fn dialect(names: &SharedInterner) -> Dialect {
    dialect_builder(LANGUAGE, &Primordial::new(names)).build()
}

/// Everything but the name, home loader and factory.
fn describe(builder: LanguageBuilder, p: &Primordial<'_>) -> LanguageBuilder {
    let object = p.ty(OBJECT);
    let serializable = p.ty(SERIALIZABLE);

    let mut builder = builder
        .throwable(p.ty(THROWABLE))
        .constant(ConstantKind::Null, p.ty(NULL))
        .constant(ConstantKind::Bool, p.ty("Z"))
        .constant(ConstantKind::Int, p.ty("I"))
        .constant(ConstantKind::Long, p.ty("J"))
        .constant(ConstantKind::Float, p.ty("F"))
        .constant(ConstantKind::Double, p.ty("D"))
        .constant(ConstantKind::String, p.ty(STRING))
        .null_type(p.ty(NULL))
        .string_type(p.ty(STRING))
        .double_type(p.ty("D"))
        .float_type(p.ty("F"))
        .int_type(p.ty("I"))
        .long_type(p.ty("J"))
        .invoke_exceptions(&[p.ty(RUNTIME_EXCEPTION), p.ty(ERROR)])
        .array_interfaces(&[p.ty(CLONEABLE), serializable])
        .metadata_token_type(p.ty(CLASS))
        .class(ClassTemplate::new(object, ClassKind::Plain))
        .class(
            ClassTemplate::new(p.ty(STRING), ClassKind::Plain)
                .extends(object)
                .interfaces(&[serializable]),
        );

    for (keyword, descriptor) in PRIMITIVES {
        builder = builder.primitive(keyword, p.ty(descriptor));
    }
    for (class, superclass) in HIERARCHY {
        let template = ClassTemplate::new(p.ty(class), ClassKind::Plain);
        builder = builder.class(template.extends(p.ty(superclass)));
    }
    for interface in [CLONEABLE, SERIALIZABLE] {
        builder = builder.class(
            ClassTemplate::new(p.ty(interface), ClassKind::Plain)
                .extends(object)
                .flags(ClassFlags::INTERFACE | ClassFlags::ABSTRACT),
        );
    }
    builder
}

pub fn language(names: &SharedInterner) -> Language {
    let p = Primordial::new(names);
    let factory = InstructionFactory::new(dialect_builder(LANGUAGE, &p).build());
    describe(Language::builder(names, LANGUAGE, p.loader, factory), &p).build()
}
