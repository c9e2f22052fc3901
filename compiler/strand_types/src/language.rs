//! Language descriptors.
//!
//! A [`Language`] bundles everything the core needs to know about one
//! source language: its type-classification tables, its instruction
//! factory and the classes every loader of that language starts with.
//! Descriptors are built once, shared by `Arc` through a
//! [`LanguageCatalog`], and never mutated.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use strand_ir::{
    Constant, ConstantKind, InstructionFactory, MethodRef, Name, SharedInterner, StringLookup,
    TypeRef,
};

use crate::{ClassFlags, ClassKind, Interfaces, LanguageError, LanguageResult};

type TypeSet = SmallVec<[TypeRef; 2]>;

/// One class of a language's bootstrap template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassTemplate {
    pub ty: TypeRef,
    pub superclass: Option<TypeRef>,
    pub kind: ClassKind,
    pub flags: ClassFlags,
    pub interfaces: Interfaces,
}

impl ClassTemplate {
    /// A template class with no superclass; only roots stay that way.
    pub fn new(ty: TypeRef, kind: ClassKind) -> Self {
        ClassTemplate {
            ty,
            superclass: None,
            kind,
            flags: ClassFlags::empty(),
            interfaces: Interfaces::new(),
        }
    }

    #[must_use]
    pub fn extends(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: ClassFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn interfaces(mut self, interfaces: &[TypeRef]) -> Self {
        self.interfaces = interfaces.into();
        self
    }
}

/// Parent types of a language's code bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CodeBodyTypes {
    /// Common supertype of function and script types.
    pub base: TypeRef,
    pub function: TypeRef,
    pub script: TypeRef,
}

/// Immutable description of one source language.
#[derive(Debug)]
pub struct Language {
    name: String,
    names: SharedInterner,
    home_loader: Name,
    root: TypeRef,
    throwable: TypeRef,
    constants: FxHashMap<ConstantKind, TypeRef>,
    null_types: TypeSet,
    string_types: TypeSet,
    primitives: FxHashMap<Name, TypeRef>,
    double_types: TypeSet,
    float_types: TypeSet,
    int_types: TypeSet,
    long_types: TypeSet,
    invoke_exceptions: TypeSet,
    array_interfaces: TypeSet,
    metadata_token: Option<TypeRef>,
    code_body_types: Option<CodeBodyTypes>,
    factory: InstructionFactory,
    template: Vec<ClassTemplate>,
}

impl Language {
    /// Start a language descriptor around its instruction factory.
    ///
    /// The root type is the factory dialect's root, which is also the
    /// throwable root until [`LanguageBuilder::throwable`] says otherwise.
    pub fn builder(
        names: &SharedInterner,
        name: impl Into<String>,
        home_loader: Name,
        factory: InstructionFactory,
    ) -> LanguageBuilder {
        LanguageBuilder::new(names, name, home_loader, factory)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The loader that owns this language's bootstrap classes.
    #[inline]
    pub fn home_loader(&self) -> Name {
        self.home_loader
    }

    #[inline]
    pub fn root_type(&self) -> TypeRef {
        self.root
    }

    #[inline]
    pub fn throwable_type(&self) -> TypeRef {
        self.throwable
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.names
    }

    pub fn factory(&self) -> &InstructionFactory {
        &self.factory
    }

    /// Classes defined by bootstrap, in definition order.
    pub fn bootstrap_template(&self) -> &[ClassTemplate] {
        &self.template
    }

    /// Static type of a constant value.
    pub fn constant_type(&self, constant: Constant) -> LanguageResult<TypeRef> {
        let kind = constant.kind();
        self.constants
            .get(&kind)
            .copied()
            .ok_or_else(|| LanguageError::UnclassifiableConstant {
                language: self.name.clone(),
                kind,
            })
    }

    /// Type of a primitive by source name. Never interns `name`.
    pub fn lookup_primitive(&self, name: &str) -> LanguageResult<TypeRef> {
        self.names
            .get(name)
            .and_then(|name| self.primitives.get(&name))
            .copied()
            .ok_or_else(|| LanguageError::UnknownPrimitiveType {
                language: self.name.clone(),
                name: name.to_owned(),
            })
    }

    /// Primitive types keyed by source name.
    pub fn primitive_types(&self) -> impl Iterator<Item = (&str, TypeRef)> + '_ {
        self.primitives
            .iter()
            .map(|(&name, &ty)| (self.names.lookup(name), ty))
    }

    pub fn is_null_type(&self, ty: TypeRef) -> bool {
        self.null_types.contains(&ty)
    }

    pub fn is_string_type(&self, ty: TypeRef) -> bool {
        self.string_types.contains(&ty)
    }

    pub fn is_double_type(&self, ty: TypeRef) -> bool {
        self.double_types.contains(&ty)
    }

    pub fn is_float_type(&self, ty: TypeRef) -> bool {
        self.float_types.contains(&ty)
    }

    pub fn is_int_type(&self, ty: TypeRef) -> bool {
        self.int_types.contains(&ty)
    }

    pub fn is_long_type(&self, ty: TypeRef) -> bool {
        self.long_types.contains(&ty)
    }

    /// Exception types any call may raise in this language.
    ///
    /// The set does not depend on the target: callees are not resolved
    /// when call sites are built.
    pub fn infer_invoke_exceptions(&self, _target: &MethodRef) -> &[TypeRef] {
        &self.invoke_exceptions
    }

    /// Interfaces every array type implements; empty without typed arrays.
    pub fn array_interfaces(&self) -> &[TypeRef] {
        &self.array_interfaces
    }

    /// Type of the value produced by a metadata load.
    pub fn metadata_token_type(&self) -> LanguageResult<TypeRef> {
        self.metadata_token
            .ok_or_else(|| LanguageError::NotApplicable {
                language: self.name.clone(),
                query: "metadata_token_type",
            })
    }

    /// Function and script parent types, for languages with code bodies.
    #[inline]
    pub fn code_body_types(&self) -> Option<CodeBodyTypes> {
        self.code_body_types
    }
}

/// Builder for [`Language`].
#[derive(Debug)]
pub struct LanguageBuilder {
    language: Language,
}

impl LanguageBuilder {
    pub fn new(
        names: &SharedInterner,
        name: impl Into<String>,
        home_loader: Name,
        factory: InstructionFactory,
    ) -> Self {
        let root = factory.dialect().root();
        LanguageBuilder {
            language: Language {
                name: name.into(),
                names: names.clone(),
                home_loader,
                root,
                throwable: root,
                constants: FxHashMap::default(),
                null_types: TypeSet::new(),
                string_types: TypeSet::new(),
                primitives: FxHashMap::default(),
                double_types: TypeSet::new(),
                float_types: TypeSet::new(),
                int_types: TypeSet::new(),
                long_types: TypeSet::new(),
                invoke_exceptions: TypeSet::new(),
                array_interfaces: TypeSet::new(),
                metadata_token: None,
                code_body_types: None,
                factory,
                template: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn throwable(mut self, ty: TypeRef) -> Self {
        self.language.throwable = ty;
        self
    }

    /// Type constants of `kind` get. A later mapping replaces an earlier one.
    #[must_use]
    pub fn constant(mut self, kind: ConstantKind, ty: TypeRef) -> Self {
        self.language.constants.insert(kind, ty);
        self
    }

    #[must_use]
    pub fn null_type(mut self, ty: TypeRef) -> Self {
        self.language.null_types.push(ty);
        self
    }

    #[must_use]
    pub fn string_type(mut self, ty: TypeRef) -> Self {
        self.language.string_types.push(ty);
        self
    }

    #[must_use]
    pub fn primitive(mut self, name: &str, ty: TypeRef) -> Self {
        let name = self.language.names.intern(name);
        self.language.primitives.insert(name, ty);
        self
    }

    #[must_use]
    pub fn double_type(mut self, ty: TypeRef) -> Self {
        self.language.double_types.push(ty);
        self
    }

    #[must_use]
    pub fn float_type(mut self, ty: TypeRef) -> Self {
        self.language.float_types.push(ty);
        self
    }

    #[must_use]
    pub fn int_type(mut self, ty: TypeRef) -> Self {
        self.language.int_types.push(ty);
        self
    }

    #[must_use]
    pub fn long_type(mut self, ty: TypeRef) -> Self {
        self.language.long_types.push(ty);
        self
    }

    #[must_use]
    pub fn invoke_exceptions(mut self, types: &[TypeRef]) -> Self {
        self.language.invoke_exceptions = types.into();
        self
    }

    #[must_use]
    pub fn array_interfaces(mut self, types: &[TypeRef]) -> Self {
        self.language.array_interfaces = types.into();
        self
    }

    #[must_use]
    pub fn metadata_token_type(mut self, ty: TypeRef) -> Self {
        self.language.metadata_token = Some(ty);
        self
    }

    #[must_use]
    pub fn code_body_types(mut self, base: TypeRef, function: TypeRef, script: TypeRef) -> Self {
        self.language.code_body_types = Some(CodeBodyTypes {
            base,
            function,
            script,
        });
        self
    }

    /// Append a class to the bootstrap template.
    #[must_use]
    pub fn class(mut self, template: ClassTemplate) -> Self {
        self.language.template.push(template);
        self
    }

    pub fn build(self) -> Language {
        self.language
    }
}

// ── Catalog ─────────────────────────────────────────────────────────

/// The languages known to a process, by name.
///
/// Built once and passed by reference to every scope.
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    names: SharedInterner,
    languages: Vec<Arc<Language>>,
    by_name: FxHashMap<Name, usize>,
}

impl LanguageCatalog {
    pub fn builder(names: &SharedInterner) -> LanguageCatalogBuilder {
        LanguageCatalogBuilder {
            names: names.clone(),
            languages: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Language>> {
        let name = self.names.get(name)?;
        self.by_name.get(&name).map(|&index| &self.languages[index])
    }

    /// The interner shared by every language of the catalog.
    pub fn interner(&self) -> &SharedInterner {
        &self.names
    }

    /// Languages in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Language>> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

/// Builder for [`LanguageCatalog`].
#[derive(Debug)]
pub struct LanguageCatalogBuilder {
    names: SharedInterner,
    languages: Vec<Language>,
}

impl LanguageCatalogBuilder {
    #[must_use]
    pub fn with(mut self, language: Language) -> Self {
        self.languages.push(language);
        self
    }

    /// Fails if two languages share a name.
    pub fn build(self) -> LanguageResult<LanguageCatalog> {
        let mut by_name = FxHashMap::default();
        let mut languages = Vec::with_capacity(self.languages.len());
        for language in self.languages {
            let name = self.names.intern(language.name());
            if by_name.insert(name, languages.len()).is_some() {
                return Err(LanguageError::DuplicateLanguage {
                    language: language.name,
                });
            }
            languages.push(Arc::new(language));
        }
        Ok(LanguageCatalog {
            names: self.names,
            languages,
            by_name,
        })
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;
