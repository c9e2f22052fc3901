//! JVM source front-end.
//!
//! Same type system as bytecode, plus source-level assertions. Its
//! classes are produced by a source front-end rather than read from class
//! files, so its loader is synthetic and layered over the application
//! loader.

use strand_ir::{InstructionFactory, SharedInterner, Shapes};
use strand_types::Language;

use super::{describe, dialect_builder, Primordial};

/// Catalog name of the language.
pub const LANGUAGE: &str = "jvm-source";

/// Loader that owns classes built from source.
pub const LOADER: &str = "Source";

pub fn language(names: &SharedInterner) -> Language {
    let p = Primordial::new(names);
    let dialect = dialect_builder(LANGUAGE, &p).shapes(Shapes::ASSERT);
    let factory = InstructionFactory::new(dialect.build());
    let builder = Language::builder(names, LANGUAGE, names.intern(LOADER), factory);
    describe(builder, &p).build()
}
