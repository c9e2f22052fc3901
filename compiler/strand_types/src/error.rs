//! Error types for language descriptors, registries and analysis scopes.
//!
//! Every error carries resolved names so it can be displayed without an
//! interner. None of them is transient: each reports a construction-time
//! invariant violation to the immediate caller.

use strand_ir::ConstantKind;
use thiserror::Error;

pub type LanguageResult<T> = Result<T, LanguageError>;
pub type RegistryResult<T> = Result<T, RegistryError>;
pub type ScopeResult<T> = Result<T, ScopeError>;

/// A language descriptor was asked something outside its domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageError {
    #[error("language `{language}` has no type for {kind} constants")]
    UnclassifiableConstant {
        language: String,
        kind: ConstantKind,
    },

    #[error("language `{language}` has no primitive type named `{name}`")]
    UnknownPrimitiveType { language: String, name: String },

    #[error("`{query}` is not applicable to language `{language}`")]
    NotApplicable {
        language: String,
        query: &'static str,
    },

    #[error("language `{language}` is already in the catalog")]
    DuplicateLanguage { language: String },
}

/// Why a superclass chain could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyFault {
    #[error("superclass chain is cyclic")]
    Cycle,

    #[error("`{name}` is not defined")]
    Unresolvable { name: String },
}

/// Registry misuse. A failed operation leaves the registry unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("type `{name}` is already defined in loader `{loader}`")]
    DuplicateTypeDefinition { loader: String, name: String },

    #[error("code body `{name}` is already bound")]
    AlreadyBound { name: String },

    #[error("no class named `{name}` in loader `{loader}`")]
    UnknownClass { loader: String, name: String },

    #[error("class `{name}` is not a code body")]
    NotACodeBody { name: String },

    #[error("loader `{loader}` has no function or script types")]
    NoCodeBodyTypes { loader: String },

    #[error("cannot resolve the hierarchy of `{class}`: {fault}")]
    HierarchyError {
        class: String,
        #[source]
        fault: HierarchyFault,
    },

    #[error("no method #{method} in loader `{loader}`")]
    UnknownMethod { loader: String, method: u32 },

    #[error("code body `{method}` names lexical parent `{parent}`, which has no bound code body")]
    MissingLexicalParent { method: String, parent: String },
}

/// Scope misconfiguration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("loader `{loader}` depends on `{base}`, which has not been initialized")]
    UninitializedBaseLoader { loader: String, base: String },

    #[error("no loader named `{name}`")]
    UnknownLoader { name: String },

    #[error("no language named `{name}` in the catalog")]
    UnknownLanguage { name: String },

    #[error("loader `{name}` is already part of the scope")]
    DuplicateLoader { name: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
