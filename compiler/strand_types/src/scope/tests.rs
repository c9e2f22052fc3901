use pretty_assertions::assert_eq;
use strand_ir::{Dialect, InstructionFactory, Shapes};

use super::*;
use crate::{ClassKind, ClassTemplate};

struct Fixture {
    names: SharedInterner,
    catalog: LanguageCatalog,
}

impl Fixture {
    fn ty(names: &SharedInterner, loader: &str, name: &str) -> TypeRef {
        TypeRef::new(names.intern(loader), names.intern(name))
    }

    fn plain(names: &SharedInterner, loader: &str, name: &str, parent: TypeRef) -> ClassTemplate {
        ClassTemplate::new(Self::ty(names, loader, name), ClassKind::Plain).extends(parent)
    }

    /// `base` homes Root and Number in loader "Base"; `layer` homes Widget
    /// in loader "Layer", subclassing the base Root.
    fn new() -> Self {
        let names = SharedInterner::new();
        let root = Self::ty(&names, "Base", "Root");
        let factory = || {
            let dialect = Dialect::builder("mini", root).shapes(Shapes::EXTENSIONS);
            InstructionFactory::new(dialect.build())
        };

        let base = Language::builder(&names, "base", names.intern("Base"), factory())
            .class(ClassTemplate::new(root, ClassKind::DynamicProperty))
            .class(Self::plain(&names, "Base", "Number", root))
            .build();
        let layer = Language::builder(&names, "layer", names.intern("Layer"), factory())
            .class(ClassTemplate::new(root, ClassKind::DynamicProperty))
            .class(Self::plain(&names, "Layer", "Widget", root))
            .build();
        let nowhere = Self::ty(&names, "Nowhere", "Root");
        let orphan = Language::builder(&names, "orphan", names.intern("Orphan"), factory())
            .class(Self::plain(&names, "Orphan", "Stray", nowhere))
            .build();

        let catalog = LanguageCatalog::builder(&names)
            .with(base)
            .with(layer)
            .with(orphan)
            .build()
            .expect("distinct languages");
        Fixture { names, catalog }
    }

    fn loader(&self, loader: &str, language: &str) -> LoaderSpec {
        let language = self.catalog.get(language).expect("language in catalog");
        LoaderSpec::new(loader, Arc::clone(language))
    }

    fn scope(&self) -> AnalysisScope {
        AnalysisScope::new(&self.catalog)
    }
}

#[test]
fn layered_loader_cannot_initialize_before_its_base() {
    let fx = Fixture::new();
    let mut scope = fx.scope();
    let base = scope.add_language(fx.loader("Base", "base")).expect("base");
    let layer = scope
        .add_language(fx.loader("Layer", "layer").depends_on("Base"))
        .expect("layer");

    let err = scope.initialize_loader(layer).expect_err("base not ready");
    assert_eq!(
        err,
        ScopeError::UninitializedBaseLoader {
            loader: "Layer".to_owned(),
            base: "Base".to_owned(),
        }
    );
    assert!(!scope.is_initialized(layer));

    scope.initialize_loader(base).expect("base");
    scope.initialize_loader(layer).expect("layer");
    assert_eq!(scope.get_loader("Base"), Ok(base));
    assert_eq!(scope.get_loader("Layer"), Ok(layer));
    assert!(scope.is_initialized(base) && scope.is_initialized(layer));
}

#[test]
fn initialize_runs_in_insertion_order() {
    let fx = Fixture::new();
    let mut scope = fx.scope();
    scope.add_language(fx.loader("Base", "base")).expect("base");
    scope
        .add_language(fx.loader("Layer", "layer").depends_on("Base"))
        .expect("layer");
    scope.initialize().expect("initialize");

    assert_eq!(
        scope.loaders().map(|(_, name)| name).collect::<Vec<_>>(),
        ["Base", "Layer"]
    );
    let base = scope.get_loader("Base").expect("base");
    assert_eq!(scope.registry(base).len(), 2);

    // A second initialization is a no-op.
    scope.initialize().expect("idempotent");
    assert_eq!(scope.registry(base).len(), 2);
}

#[test]
fn insertion_order_matters() {
    let fx = Fixture::new();
    let mut scope = fx.scope();
    scope
        .add_language(fx.loader("Layer", "layer").depends_on("Base"))
        .expect("layer");
    scope.add_language(fx.loader("Base", "base")).expect("base");
    assert!(matches!(
        scope.initialize(),
        Err(ScopeError::UninitializedBaseLoader { .. })
    ));
}

#[test]
fn unknown_and_duplicate_loaders() {
    let fx = Fixture::new();
    let mut scope = fx.scope();
    let layer = scope
        .add_language(fx.loader("Layer", "layer").depends_on("Missing"))
        .expect("layer");
    assert_eq!(
        scope.initialize_loader(layer),
        Err(ScopeError::UnknownLoader {
            name: "Missing".to_owned()
        })
    );
    assert_eq!(
        scope.add_language(fx.loader("Layer", "base")),
        Err(ScopeError::DuplicateLoader {
            name: "Layer".to_owned()
        })
    );
    assert!(matches!(
        scope.get_loader("Nope"),
        Err(ScopeError::UnknownLoader { .. })
    ));
    assert_eq!(scope.len(), 1);
}

#[test]
fn lookups_delegate_to_the_base_first() {
    let fx = Fixture::new();
    let mut scope = fx.scope();
    let base = scope.add_language(fx.loader("Base", "base")).expect("base");
    let layer = scope
        .add_language(fx.loader("Layer", "layer").depends_on("Base"))
        .expect("layer");
    scope.initialize().expect("initialize");

    let (owner, number) = scope.lookup_class(layer, "Number").expect("visible");
    assert_eq!(owner, base);
    let class = scope.registry(owner).class(number);
    assert_eq!(scope.interner().lookup(class.name()), "Number");

    let (owner, _) = scope.lookup_class(layer, "Widget").expect("local");
    assert_eq!(owner, layer);
    assert!(scope.lookup_class(base, "Widget").is_none());
    assert!(scope.lookup_class(layer, "Gadget").is_none());
}

#[test]
fn foreign_superclasses_resolve_through_the_scope() {
    let fx = Fixture::new();
    let mut scope = fx.scope();
    let base = scope.add_language(fx.loader("Base", "base")).expect("base");
    let layer = scope
        .add_language(fx.loader("Layer", "layer").depends_on("Base"))
        .expect("layer");
    scope.initialize().expect("initialize");

    let widget = scope
        .registry(layer)
        .lookup_class("Widget")
        .expect("widget");
    let root = scope.registry(base).lookup_class("Root").expect("root");
    assert_eq!(
        scope.resolve_superclass(layer, widget),
        Ok(Some((base, root)))
    );
    assert_eq!(scope.resolve_superclass(base, root), Ok(None));
    let number = Fixture::ty(&fx.names, "Base", "Number");
    assert_eq!(
        scope.lookup_type(number).map(|(owner, _)| owner),
        Some(base)
    );
}

#[test]
fn unresolvable_foreign_superclass_fails_initialization() {
    let fx = Fixture::new();
    let mut scope = fx.scope();
    let orphan = scope
        .add_language(fx.loader("Orphan", "orphan"))
        .expect("orphan");
    let err = scope
        .initialize_loader(orphan)
        .expect_err("Nowhere is not a loader");
    assert_eq!(
        err,
        ScopeError::Registry(RegistryError::HierarchyError {
            class: "Stray".to_owned(),
            fault: HierarchyFault::Unresolvable {
                name: "Nowhere:Root".to_owned()
            },
        })
    );
    assert!(!scope.is_initialized(orphan));
}

#[test]
fn synthetic_loaders_define_synthetic_classes() {
    let fx = Fixture::new();
    let mut scope = fx.scope();
    scope.add_language(fx.loader("Base", "base")).expect("base");
    let layer = scope
        .add_language(fx.loader("Layer", "layer").depends_on("Base").synthetic())
        .expect("layer");
    scope.initialize().expect("initialize");

    assert!(scope.is_synthetic(layer));
    assert!(scope
        .registry(layer)
        .iter()
        .all(|(_, class)| class.is_synthetic()));
    assert_eq!(scope.base_loader(layer), scope.get_loader("Base").ok());
}

#[test]
fn superclass_in_an_uninitialized_loader_is_reported() {
    let fx = Fixture::new();
    let mut scope = fx.scope();
    // Layer names Base:Root without declaring Base as its base loader.
    let layer = scope
        .add_language(fx.loader("Layer", "layer"))
        .expect("layer");
    let base = scope.add_language(fx.loader("Base", "base")).expect("base");

    assert_eq!(
        scope.initialize_loader(layer),
        Err(ScopeError::UninitializedBaseLoader {
            loader: "Layer".to_owned(),
            base: "Base".to_owned(),
        })
    );
    assert!(scope.registry(layer).is_empty());
    assert!(!scope.is_initialized(layer));

    scope.initialize_loader(base).expect("base");
    scope.initialize_loader(layer).expect("retry after base");
    let widget = scope
        .registry(layer)
        .lookup_class("Widget")
        .expect("widget");
    let root = scope.registry(base).lookup_class("Root").expect("root");
    assert_eq!(
        scope.resolve_superclass(layer, widget),
        Ok(Some((base, root)))
    );
}

#[test]
fn failed_initialization_can_be_retried() {
    let fx = Fixture::new();
    let mut scope = fx.scope();
    let orphan = scope
        .add_language(fx.loader("Orphan", "orphan"))
        .expect("orphan");
    for _ in 0..2 {
        assert!(matches!(
            scope.initialize_loader(orphan),
            Err(ScopeError::Registry(RegistryError::HierarchyError { .. }))
        ));
        assert!(scope.registry(orphan).is_empty());
    }
}
