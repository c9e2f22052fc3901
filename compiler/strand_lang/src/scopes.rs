//! Ready-made loader layouts.

use std::sync::Arc;

use strand_types::{AnalysisScope, Language, LanguageCatalog, LoaderSpec, ScopeError, ScopeResult};

use crate::{ecma, jvm};

fn language(catalog: &LanguageCatalog, name: &str) -> ScopeResult<Arc<Language>> {
    catalog
        .get(name)
        .cloned()
        .ok_or_else(|| ScopeError::UnknownLanguage {
            name: name.to_owned(),
        })
}

/// A single initialized ECMAScript loader.
pub fn ecma(catalog: &LanguageCatalog) -> ScopeResult<AnalysisScope> {
    let js = language(catalog, ecma::LANGUAGE)?;
    let mut scope = AnalysisScope::new(catalog);
    scope.add_language(LoaderSpec::new(ecma::LOADER, js))?;
    scope.initialize()?;
    Ok(scope)
}

/// Primordial, then application, then a synthetic source loader, each
/// delegating to the one before. Initialized.
pub fn jvm_source(catalog: &LanguageCatalog) -> ScopeResult<AnalysisScope> {
    let bytecode = language(catalog, jvm::LANGUAGE)?;
    let source = language(catalog, jvm::source::LANGUAGE)?;

    let mut scope = AnalysisScope::new(catalog);
    scope.add_language(LoaderSpec::new(jvm::PRIMORDIAL, Arc::clone(&bytecode)))?;
    scope.add_language(
        LoaderSpec::new(jvm::APPLICATION, bytecode).depends_on(jvm::PRIMORDIAL),
    )?;
    scope.add_language(
        LoaderSpec::new(jvm::source::LOADER, source)
            .depends_on(jvm::APPLICATION)
            .synthetic(),
    )?;
    scope.initialize()?;
    Ok(scope)
}
