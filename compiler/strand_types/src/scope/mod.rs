//! Analysis scope: the loaders of one session and their registries.
//!
//! Loaders are added with [`AnalysisScope::add_language`] and initialized
//! in the order they were added. A loader may declare a base loader; its
//! class lookups delegate to that base first, and it cannot be
//! initialized before the base has been.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use strand_ir::{Name, SharedInterner, StringLookup, TypeRef};
use tracing::debug;

use crate::{
    ClassId, HierarchyFault, Language, LanguageCatalog, RegistryError, ScopeError, ScopeResult,
    TypeRegistry,
};

/// Index of a loader in its scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct LoaderHandle(u32);

impl LoaderHandle {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Configuration of one loader.
#[derive(Clone, Debug)]
pub struct LoaderSpec {
    name: String,
    language: Arc<Language>,
    base: Option<String>,
    synthetic: bool,
}

impl LoaderSpec {
    pub fn new(name: impl Into<String>, language: Arc<Language>) -> Self {
        LoaderSpec {
            name: name.into(),
            language,
            base: None,
            synthetic: false,
        }
    }

    /// Delegate lookups to `base`, which must be initialized first.
    #[must_use]
    pub fn depends_on(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Classes of this loader are not backed by input modules.
    #[must_use]
    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

#[derive(Debug)]
struct Loader {
    name: Name,
    language: Arc<Language>,
    base: Option<Name>,
    registry: TypeRegistry,
    initialized: bool,
}

/// Loaders of one analysis session.
#[derive(Debug)]
pub struct AnalysisScope {
    names: SharedInterner,
    loaders: Vec<Loader>,
    by_name: FxHashMap<Name, LoaderHandle>,
}

impl AnalysisScope {
    /// An empty scope sharing `catalog`'s interner.
    pub fn new(catalog: &LanguageCatalog) -> Self {
        AnalysisScope {
            names: catalog.interner().clone(),
            loaders: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.names
    }

    fn resolve(&self, name: Name) -> String {
        self.names.lookup(name).to_owned()
    }

    /// Add a loader. Its registry exists immediately but stays empty until
    /// the loader is initialized.
    pub fn add_language(&mut self, spec: LoaderSpec) -> ScopeResult<LoaderHandle> {
        let name = self.names.intern(&spec.name);
        if self.by_name.contains_key(&name) {
            return Err(ScopeError::DuplicateLoader { name: spec.name });
        }

        let mut registry = TypeRegistry::new(name, self.names.clone());
        if spec.synthetic {
            registry = registry.synthetic();
        }

        #[expect(clippy::cast_possible_truncation, reason = "loader count fits in u32")]
        let handle = LoaderHandle(self.loaders.len() as u32);
        self.loaders.push(Loader {
            name,
            language: spec.language,
            base: spec.base.map(|base| self.names.intern(&base)),
            registry,
            initialized: false,
        });
        self.by_name.insert(name, handle);
        debug!(loader = %spec.name, "added loader");
        Ok(handle)
    }

    pub fn get_loader(&self, name: &str) -> ScopeResult<LoaderHandle> {
        self.names
            .get(name)
            .and_then(|name| self.by_name.get(&name))
            .copied()
            .ok_or_else(|| ScopeError::UnknownLoader {
                name: name.to_owned(),
            })
    }

    // ── Initialization ──────────────────────────────────────────────

    /// Bootstrap every loader in the order they were added.
    #[tracing::instrument(level = "debug", skip_all, fields(loaders = self.loaders.len()))]
    pub fn initialize(&mut self) -> ScopeResult<()> {
        for index in 0..self.loaders.len() {
            #[expect(clippy::cast_possible_truncation, reason = "loader count fits in u32")]
            let handle = LoaderHandle(index as u32);
            self.initialize_loader(handle)?;
        }
        Ok(())
    }

    /// Bootstrap one loader. A no-op if it is already initialized.
    ///
    /// After the loader's own template classes are defined, every
    /// superclass they name in other loaders must be resolvable through
    /// the scope.
    pub fn initialize_loader(&mut self, handle: LoaderHandle) -> ScopeResult<()> {
        let loader = &self.loaders[handle.index()];
        if loader.initialized {
            return Ok(());
        }

        if let Some(base) = loader.base {
            let base_handle = self
                .by_name
                .get(&base)
                .ok_or_else(|| ScopeError::UnknownLoader {
                    name: self.resolve(base),
                })?;
            if !self.loaders[base_handle.index()].initialized {
                return Err(ScopeError::UninitializedBaseLoader {
                    loader: self.resolve(loader.name),
                    base: self.resolve(base),
                });
            }
        }

        let language = Arc::clone(&loader.language);
        let checkpoint = self.loaders[handle.index()].registry.checkpoint();
        if let Err(err) = self.bootstrap_loader(handle, &language) {
            self.loaders[handle.index()].registry.rollback(checkpoint);
            return Err(err);
        }

        let classes = self.loaders[handle.index()].registry.len();
        let loader = &mut self.loaders[handle.index()];
        loader.initialized = true;
        debug!(
            loader = self.names.lookup(loader.name),
            language = language.name(),
            classes,
            "initialized loader"
        );
        Ok(())
    }

    fn bootstrap_loader(&mut self, handle: LoaderHandle, language: &Language) -> ScopeResult<()> {
        self.loaders[handle.index()].registry.bootstrap(language)?;
        for index in 0..self.loaders[handle.index()].registry.len() {
            #[expect(clippy::cast_possible_truncation, reason = "class count fits in u32")]
            let class = ClassId::new(index as u32);
            self.resolve_superclass(handle, class)?;
        }
        Ok(())
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[inline]
    pub fn registry(&self, handle: LoaderHandle) -> &TypeRegistry {
        &self.loaders[handle.index()].registry
    }

    #[inline]
    pub fn registry_mut(&mut self, handle: LoaderHandle) -> &mut TypeRegistry {
        &mut self.loaders[handle.index()].registry
    }

    #[inline]
    pub fn language(&self, handle: LoaderHandle) -> &Arc<Language> {
        &self.loaders[handle.index()].language
    }

    pub fn loader_name(&self, handle: LoaderHandle) -> &str {
        self.names.lookup(self.loaders[handle.index()].name)
    }

    /// The declared base loader, if it was added to this scope.
    pub fn base_loader(&self, handle: LoaderHandle) -> Option<LoaderHandle> {
        let base = self.loaders[handle.index()].base?;
        self.by_name.get(&base).copied()
    }

    pub fn is_synthetic(&self, handle: LoaderHandle) -> bool {
        self.loaders[handle.index()].registry.is_synthetic()
    }

    pub fn is_initialized(&self, handle: LoaderHandle) -> bool {
        self.loaders[handle.index()].initialized
    }

    /// Loaders in initialization order.
    pub fn loaders(&self) -> impl Iterator<Item = (LoaderHandle, &str)> + '_ {
        self.loaders.iter().enumerate().map(|(index, loader)| {
            #[expect(clippy::cast_possible_truncation, reason = "loader count fits in u32")]
            let handle = LoaderHandle(index as u32);
            (handle, self.names.lookup(loader.name))
        })
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    // ── Cross-loader lookup ─────────────────────────────────────────

    /// `handle` followed by its base chain, outermost last. Stops at a
    /// base that was never added, and after `len()` loaders.
    fn delegation_chain(&self, handle: LoaderHandle) -> SmallVec<[LoaderHandle; 4]> {
        let mut chain = SmallVec::new();
        let mut current = Some(handle);
        while let Some(handle) = current {
            if chain.len() == self.loaders.len() || chain.contains(&handle) {
                break;
            }
            chain.push(handle);
            current = self.base_loader(handle);
        }
        chain
    }

    fn lookup_name(&self, handle: LoaderHandle, name: Name) -> Option<(LoaderHandle, ClassId)> {
        self.delegation_chain(handle)
            .iter()
            .rev()
            .find_map(|&loader| {
                self.loaders[loader.index()]
                    .registry
                    .class_id(name)
                    .map(|class| (loader, class))
            })
    }

    /// Find a class visible from `handle`, asking its bases first.
    pub fn lookup_class(
        &self,
        handle: LoaderHandle,
        name: &str,
    ) -> Option<(LoaderHandle, ClassId)> {
        let name = self.names.get(name)?;
        self.lookup_name(handle, name)
    }

    /// Find the class a type reference names, starting at its loader.
    pub fn lookup_type(&self, ty: TypeRef) -> Option<(LoaderHandle, ClassId)> {
        let handle = *self.by_name.get(&ty.loader)?;
        self.lookup_name(handle, ty.name)
    }

    /// Superclass of a class, following references into other loaders.
    ///
    /// A superclass homed in a loader of this scope that is not yet
    /// initialized fails with `UninitializedBaseLoader`.
    pub fn resolve_superclass(
        &self,
        handle: LoaderHandle,
        class: ClassId,
    ) -> ScopeResult<Option<(LoaderHandle, ClassId)>> {
        let registry = self.registry(handle);
        if let Some(local) = registry.superclass_of(class)? {
            return Ok(Some((handle, local)));
        }

        let declared = registry.class(class);
        match declared.superclass() {
            Some(superclass) if superclass.loader != registry.loader() => {
                self.require_initialized(registry.loader(), superclass.loader)?;
                self.lookup_type(superclass).map(Some).ok_or_else(|| {
                    ScopeError::Registry(RegistryError::HierarchyError {
                        class: self.resolve(declared.name()),
                        fault: HierarchyFault::Unresolvable {
                            name: superclass.display(&self.names),
                        },
                    })
                })
            }
            _ => Ok(None),
        }
    }

    fn require_initialized(&self, loader: Name, base: Name) -> ScopeResult<()> {
        match self.by_name.get(&base) {
            Some(handle) if !self.loaders[handle.index()].initialized => {
                Err(ScopeError::UninitializedBaseLoader {
                    loader: self.resolve(loader),
                    base: self.resolve(base),
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;
