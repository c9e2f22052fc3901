//! Concrete languages for the Strand IR core.
//!
//! - [`ecma`]: a dynamic, prototype-style script language
//! - [`jvm`]: JVM bytecode, with [`jvm::source`] for source front-ends
//! - [`scopes`]: loader layouts for the languages above
//!
//! Each language module exposes its catalog name, its loader names, its
//! dialect and a `language` constructor. [`catalog`] collects them all.

pub mod ecma;
pub mod jvm;
pub mod scopes;

use strand_ir::SharedInterner;
use strand_types::{LanguageCatalog, LanguageResult};

/// A catalog with every language of this crate.
pub fn catalog(names: &SharedInterner) -> LanguageResult<LanguageCatalog> {
    tracing::debug!("building language catalog");
    LanguageCatalog::builder(names)
        .with(ecma::language(names))
        .with(jvm::language(names))
        .with(jvm::source::language(names))
        .build()
}
