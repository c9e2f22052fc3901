//! Per-loader class registry.
//!
//! A `TypeRegistry` owns every class and code body defined in one loader
//! during one analysis session. Classes live in an arena in definition
//! order; a name index maps each qualified name to at most one class.
//!
//! # Hierarchy resolution
//!
//! Superclasses are stored as symbolic [`TypeRef`]s and looked up lazily.
//! Only the local part of a chain is walked here: a superclass owned by
//! another loader ends the walk and is resolved by the
//! [`AnalysisScope`](crate::AnalysisScope). Walks take at most `len()`
//! steps, so cyclic input is reported instead of looping.

use rustc_hash::FxHashMap;
use strand_ir::{MethodRef, Name, SharedInterner, Span, StringLookup, TypeRef};
use tracing::debug;

use crate::{
    Class, ClassDef, ClassFlags, ClassId, ClassKind, ClassState, CodeBodyTypes, HierarchyFault,
    Language, LexicalParent, Method, MethodBody, MethodId, RegistryError, RegistryResult,
};

/// Selector of the single method of every code body.
const CODE_BODY_SELECTOR: &str = "do";

/// Classes and code bodies of one loader.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    loader: Name,
    names: SharedInterner,
    classes: Vec<Class>,
    by_name: FxHashMap<Name, ClassId>,
    methods: Vec<Method>,
    code_body_types: Option<CodeBodyTypes>,
    synthetic: bool,
}

impl TypeRegistry {
    pub fn new(loader: Name, names: SharedInterner) -> Self {
        TypeRegistry {
            loader,
            names,
            classes: Vec::new(),
            by_name: FxHashMap::default(),
            methods: Vec::new(),
            code_body_types: None,
            synthetic: false,
        }
    }

    /// Mark every class this registry defines as synthetic.
    #[must_use]
    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    #[inline]
    pub fn loader(&self) -> Name {
        self.loader
    }

    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.names
    }

    /// Function and script parent types, known after bootstrap.
    pub fn code_body_types(&self) -> Option<CodeBodyTypes> {
        self.code_body_types
    }

    fn resolve(&self, name: Name) -> String {
        self.names.lookup(name).to_owned()
    }

    // ── Definition ──────────────────────────────────────────────────

    /// Define a class whose superclass, if any, lives in this loader.
    pub fn define_class(
        &mut self,
        name: &str,
        super_name: Option<&str>,
        kind: ClassKind,
        span: Span,
    ) -> RegistryResult<ClassId> {
        let mut def = ClassDef::new(self.names.intern(name), kind).span(span);
        if let Some(super_name) = super_name {
            def = def.superclass(TypeRef::new(self.loader, self.names.intern(super_name)));
        }
        self.define_class_ref(def)
    }

    /// Define a class from a full definition.
    ///
    /// Fails with `DuplicateTypeDefinition` if the name is taken, leaving
    /// the registry unchanged. Code-body kinds always start unbound.
    pub fn define_class_ref(&mut self, def: ClassDef) -> RegistryResult<ClassId> {
        if self.by_name.contains_key(&def.name) {
            return Err(RegistryError::DuplicateTypeDefinition {
                loader: self.resolve(self.loader),
                name: self.resolve(def.name),
            });
        }

        let kind = match def.kind {
            ClassKind::CodeBody { .. } => ClassKind::CODE_BODY,
            kind => kind,
        };
        let mut flags = def.flags;
        if self.synthetic {
            flags |= ClassFlags::SYNTHETIC;
        }

        #[expect(clippy::cast_possible_truncation, reason = "class count fits in u32")]
        let id = ClassId::new(self.classes.len() as u32);
        self.classes.push(Class {
            ty: TypeRef::new(self.loader, def.name),
            kind,
            superclass: def.superclass,
            interfaces: def.interfaces,
            flags,
            span: def.span,
            state: ClassState::Declared,
        });
        self.by_name.insert(def.name, id);
        debug!(
            loader = self.names.lookup(self.loader),
            class = self.names.lookup(def.name),
            ?kind,
            "defined class"
        );
        Ok(id)
    }

    /// Define an unbound code body subclassing a local type.
    pub fn define_code_body(
        &mut self,
        name: &str,
        parent_type_name: &str,
        span: Span,
    ) -> RegistryResult<ClassId> {
        self.define_class(name, Some(parent_type_name), ClassKind::CODE_BODY, span)
    }

    /// Define an unbound code body subclassing the language function type.
    pub fn define_function_type(&mut self, name: &str, span: Span) -> RegistryResult<ClassId> {
        let parent = self.require_code_body_types()?.function;
        self.define_code_body_under(name, parent, span)
    }

    /// Define an unbound code body subclassing the language script type.
    pub fn define_script_type(&mut self, name: &str, span: Span) -> RegistryResult<ClassId> {
        let parent = self.require_code_body_types()?.script;
        self.define_code_body_under(name, parent, span)
    }

    fn require_code_body_types(&self) -> RegistryResult<CodeBodyTypes> {
        self.code_body_types
            .ok_or_else(|| RegistryError::NoCodeBodyTypes {
                loader: self.resolve(self.loader),
            })
    }

    fn define_code_body_under(
        &mut self,
        name: &str,
        parent: TypeRef,
        span: Span,
    ) -> RegistryResult<ClassId> {
        let def = ClassDef::new(self.names.intern(name), ClassKind::CODE_BODY)
            .superclass(parent)
            .span(span);
        self.define_class_ref(def)
    }

    /// Attach a body to a defined, unbound code-body class.
    ///
    /// The class hierarchy is resolved first; on any error the registry
    /// is unchanged.
    pub fn bind_code_body(
        &mut self,
        class_name: &str,
        body: MethodBody,
    ) -> RegistryResult<MethodId> {
        let id = self
            .lookup_class(class_name)
            .ok_or_else(|| RegistryError::UnknownClass {
                loader: self.resolve(self.loader),
                name: class_name.to_owned(),
            })?;

        match self.classes[id.index()].kind {
            ClassKind::CodeBody { body: None } => {}
            ClassKind::CodeBody { body: Some(_) } => {
                return Err(RegistryError::AlreadyBound {
                    name: class_name.to_owned(),
                });
            }
            ClassKind::Plain | ClassKind::DynamicProperty => {
                return Err(RegistryError::NotACodeBody {
                    name: class_name.to_owned(),
                });
            }
        }

        self.resolve_superclass(id)?;

        #[expect(clippy::cast_possible_truncation, reason = "method count fits in u32")]
        let method = MethodId::new(self.methods.len() as u32);
        let selector = self.names.intern(CODE_BODY_SELECTOR);
        let class = &mut self.classes[id.index()];
        self.methods.push(Method {
            class: id,
            reference: MethodRef::new(class.ty, selector),
            body,
        });
        class.kind = ClassKind::CodeBody { body: Some(method) };
        class.state = ClassState::BodyBound;
        debug!(class = class_name, method = method.raw(), "bound code body");
        Ok(method)
    }

    // ── Hierarchy ───────────────────────────────────────────────────

    /// The local class a class's superclass reference names, if it is
    /// local at all.
    fn local_superclass(&self, class: &Class) -> Result<Option<ClassId>, HierarchyFault> {
        match class.superclass {
            Some(superclass) if superclass.loader == self.loader => self
                .by_name
                .get(&superclass.name)
                .copied()
                .map(Some)
                .ok_or_else(|| HierarchyFault::Unresolvable {
                    name: self.resolve(superclass.name),
                }),
            _ => Ok(None),
        }
    }

    fn hierarchy_error(&self, id: ClassId, fault: HierarchyFault) -> RegistryError {
        RegistryError::HierarchyError {
            class: self.resolve(self.classes[id.index()].name()),
            fault,
        }
    }

    /// Superclass of `id` within this registry, without changing state.
    ///
    /// `None` for a root and for a superclass owned by another loader.
    /// Fails if the local chain above `id` names an undefined class or
    /// never reaches a root or foreign superclass.
    pub fn superclass_of(&self, id: ClassId) -> RegistryResult<Option<ClassId>> {
        let class = &self.classes[id.index()];

        for interface in &class.interfaces {
            if interface.loader == self.loader && !self.by_name.contains_key(&interface.name) {
                return Err(self.hierarchy_error(
                    id,
                    HierarchyFault::Unresolvable {
                        name: self.resolve(interface.name),
                    },
                ));
            }
        }

        let superclass = match self.local_superclass(class) {
            Ok(Some(superclass)) => superclass,
            Ok(None) => return Ok(None),
            Err(fault) => return Err(self.hierarchy_error(id, fault)),
        };

        let mut current = superclass;
        for _ in 0..self.classes.len() {
            if current == id {
                return Err(self.hierarchy_error(id, HierarchyFault::Cycle));
            }
            match self.local_superclass(&self.classes[current.index()]) {
                Ok(Some(next)) => current = next,
                Ok(None) => return Ok(Some(superclass)),
                Err(fault) => return Err(self.hierarchy_error(id, fault)),
            }
        }
        Err(self.hierarchy_error(id, HierarchyFault::Cycle))
    }

    /// Look up the superclass of `id` and mark the class resolved.
    pub fn resolve_superclass(&mut self, id: ClassId) -> RegistryResult<Option<ClassId>> {
        let superclass = self.superclass_of(id)?;
        let class = &mut self.classes[id.index()];
        if class.state == ClassState::Declared {
            class.state = ClassState::HierarchyResolved;
        }
        Ok(superclass)
    }

    /// Resolve every class; stops at the first failure.
    pub fn resolve_hierarchy(&mut self) -> RegistryResult<()> {
        for index in 0..self.classes.len() {
            #[expect(clippy::cast_possible_truncation, reason = "class count fits in u32")]
            let id = ClassId::new(index as u32);
            self.resolve_superclass(id)?;
        }
        Ok(())
    }

    // ── Lookup ──────────────────────────────────────────────────────

    /// Class by qualified name. Never interns `name`.
    pub fn lookup_class(&self, name: &str) -> Option<ClassId> {
        let name = self.names.get(name)?;
        self.by_name.get(&name).copied()
    }

    pub fn class_id(&self, name: Name) -> Option<ClassId> {
        self.by_name.get(&name).copied()
    }

    pub fn class_by_name(&self, name: Name) -> Option<&Class> {
        self.by_name.get(&name).map(|id| &self.classes[id.index()])
    }

    #[inline]
    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &Method {
        &self.methods[id.index()]
    }

    /// The bound method of a code-body class, by class name.
    pub fn code_body(&self, class_name: &str) -> Option<&Method> {
        let id = self.lookup_class(class_name)?;
        self.classes[id.index()]
            .body()
            .map(|method| self.method(method))
    }

    /// Classes in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.classes.iter().enumerate().map(|(index, class)| {
            #[expect(clippy::cast_possible_truncation, reason = "class count fits in u32")]
            let id = ClassId::new(index as u32);
            (id, class)
        })
    }

    /// Bound methods in binding order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Enclosing code bodies of a method, innermost first.
    pub fn lexical_parents(&self, id: MethodId) -> RegistryResult<Vec<LexicalParent>> {
        let method = self
            .methods
            .get(id.index())
            .ok_or_else(|| RegistryError::UnknownMethod {
                loader: self.resolve(self.loader),
                method: id.raw(),
            })?;

        method
            .scoping_parents()
            .iter()
            .map(|&parent| {
                self.class_by_name(parent)
                    .and_then(Class::body)
                    .map(|body| LexicalParent {
                        name: parent,
                        method: body,
                    })
                    .ok_or_else(|| RegistryError::MissingLexicalParent {
                        method: self.resolve(self.classes[method.class.index()].name()),
                        parent: self.resolve(parent),
                    })
            })
            .collect()
    }

    // ── Bootstrap ───────────────────────────────────────────────────

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            classes: self.classes.len(),
            methods: self.methods.len(),
            code_body_types: self.code_body_types,
        }
    }

    /// Drop every class and method defined after `checkpoint`.
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        self.classes.truncate(checkpoint.classes);
        self.methods.truncate(checkpoint.methods);
        self.by_name.retain(|_, id| id.index() < checkpoint.classes);
        self.code_body_types = checkpoint.code_body_types;
    }

    /// Define the template classes `language` homes in this loader, then
    /// resolve the whole local hierarchy.
    ///
    /// On failure every class defined by this call is removed again.
    #[tracing::instrument(level = "debug", skip_all, fields(language = language.name()))]
    pub fn bootstrap(&mut self, language: &Language) -> RegistryResult<()> {
        let checkpoint = self.checkpoint();
        if let Err(err) = self.define_template(language) {
            self.rollback(checkpoint);
            return Err(err);
        }
        debug!(classes = self.len(), "bootstrap complete");
        Ok(())
    }

    fn define_template(&mut self, language: &Language) -> RegistryResult<()> {
        let loader = self.loader;
        for template in language
            .bootstrap_template()
            .iter()
            .filter(|template| template.ty.loader == loader)
        {
            self.define_class_ref(ClassDef {
                name: template.ty.name,
                kind: template.kind,
                superclass: template.superclass,
                interfaces: template.interfaces.clone(),
                flags: template.flags,
                span: Span::DUMMY,
            })?;
        }
        self.code_body_types = language.code_body_types();
        self.resolve_hierarchy()
    }
}

/// Registry sizes to restore after a failed multi-step update.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Checkpoint {
    classes: usize,
    methods: usize,
    code_body_types: Option<CodeBodyTypes>,
}
