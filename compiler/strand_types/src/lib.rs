//! Type-level model for Strand.
//!
//! - `Language`: per-language classification tables, instruction factory and
//!   bootstrap template, collected into a `LanguageCatalog`
//! - `TypeRegistry`: the classes and code bodies of one loader
//! - `AnalysisScope`: the loaders of one session, initialized in order
//!
//! # Lifecycle
//!
//! Catalogs are built once per process and shared. Scopes and registries
//! are built per session through `&mut` APIs and afterwards read through
//! `&`; every finalized type here is `Send + Sync`.

mod class;
mod error;
mod language;
mod method;
mod registry;
mod scope;

pub use class::{Class, ClassDef, ClassFlags, ClassId, ClassKind, ClassState, Interfaces};
pub use error::{
    HierarchyFault, LanguageError, LanguageResult, RegistryError, RegistryResult, ScopeError,
    ScopeResult,
};
pub use language::{
    ClassTemplate, CodeBodyTypes, Language, LanguageBuilder, LanguageCatalog,
    LanguageCatalogBuilder,
};
pub use method::{
    BasicBlock, Cfg, LexicalInfo, LexicalParent, Method, MethodBody, MethodBodyBuilder, MethodId,
    Qualifiers, SymbolTable,
};
pub use registry::TypeRegistry;
pub use scope::{AnalysisScope, LoaderHandle, LoaderSpec};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{ClassId, MethodId};
    strand_ir::static_assert_size!(ClassId, 4);
    strand_ir::static_assert_size!(MethodId, 4);
}
