use pretty_assertions::assert_eq;
use strand_ir::{Dialect, Shapes};

use super::*;

struct Fixture {
    names: SharedInterner,
    home: Name,
}

impl Fixture {
    fn new() -> Self {
        let names = SharedInterner::new();
        let home = names.intern("Home");
        Fixture { names, home }
    }

    fn ty(&self, name: &str) -> TypeRef {
        TypeRef::new(self.home, self.names.intern(name))
    }

    fn factory(&self) -> InstructionFactory {
        InstructionFactory::new(
            Dialect::builder("mini", self.ty("Root"))
                .shapes(Shapes::EXTENSIONS)
                .build(),
        )
    }

    fn language(&self, name: &str) -> Language {
        let (root, number) = (self.ty("Root"), self.ty("Number"));
        Language::builder(&self.names, name, self.home, self.factory())
            .constant(ConstantKind::Int, number)
            .constant(ConstantKind::Double, number)
            .constant(ConstantKind::Null, self.ty("Null"))
            .null_type(self.ty("Null"))
            .null_type(self.ty("Undefined"))
            .primitive("Number", number)
            .double_type(number)
            .invoke_exceptions(&[root])
            .class(ClassTemplate::new(root, ClassKind::DynamicProperty))
            .class(ClassTemplate::new(number, ClassKind::Plain).extends(root))
            .build()
    }
}

#[test]
fn root_and_throwable_default_to_the_dialect_root() {
    let fx = Fixture::new();
    let lang = fx.language("mini");
    assert_eq!(lang.root_type(), fx.ty("Root"));
    assert_eq!(lang.throwable_type(), fx.ty("Root"));
    assert_eq!(lang.home_loader(), fx.home);
    assert_eq!(lang.bootstrap_template().len(), 2);
}

#[test]
fn constants_are_classified_by_kind() {
    let fx = Fixture::new();
    let lang = fx.language("mini");
    let number = fx.ty("Number");
    assert_eq!(lang.constant_type(Constant::Int(3)), Ok(number));
    assert_eq!(lang.constant_type(Constant::double(0.5)), Ok(number));
    assert_eq!(lang.constant_type(Constant::Null), Ok(fx.ty("Null")));

    let err = lang
        .constant_type(Constant::Bool(true))
        .expect_err("no boolean type");
    assert_eq!(
        err,
        LanguageError::UnclassifiableConstant {
            language: "mini".to_owned(),
            kind: ConstantKind::Bool,
        }
    );
}

#[test]
fn primitive_lookup_never_interns() {
    let fx = Fixture::new();
    let lang = fx.language("mini");
    assert_eq!(lang.lookup_primitive("Number"), Ok(fx.ty("Number")));

    let before = fx.names.len();
    assert!(matches!(
        lang.lookup_primitive("Quaternion"),
        Err(LanguageError::UnknownPrimitiveType { ref name, .. }) if name == "Quaternion"
    ));
    assert_eq!(fx.names.len(), before);
}

#[test]
fn type_predicates() {
    let fx = Fixture::new();
    let lang = fx.language("mini");
    assert!(lang.is_null_type(fx.ty("Undefined")));
    assert!(!lang.is_null_type(fx.ty("Number")));
    assert!(lang.is_double_type(fx.ty("Number")));
    assert!(!lang.is_int_type(fx.ty("Number")));
    assert!(!lang.is_string_type(fx.ty("Number")));
}

#[test]
fn optional_queries() {
    let fx = Fixture::new();
    let lang = fx.language("mini");
    let target = MethodRef::new(fx.ty("Root"), fx.names.intern("do"));
    assert_eq!(lang.infer_invoke_exceptions(&target), &[fx.ty("Root")]);
    assert!(lang.array_interfaces().is_empty());
    assert_eq!(lang.code_body_types(), None);
    assert_eq!(
        lang.metadata_token_type(),
        Err(LanguageError::NotApplicable {
            language: "mini".to_owned(),
            query: "metadata_token_type",
        })
    );
}

#[test]
fn catalog_lookup_and_duplicates() {
    let fx = Fixture::new();
    let catalog = LanguageCatalog::builder(&fx.names)
        .with(fx.language("a"))
        .with(fx.language("b"))
        .build()
        .expect("distinct names");
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get("b").map(|lang| lang.name()), Some("b"));
    assert!(catalog.get("c").is_none());
    assert_eq!(
        catalog.iter().map(|lang| lang.name()).collect::<Vec<_>>(),
        ["a", "b"]
    );

    let err = LanguageCatalog::builder(&fx.names)
        .with(fx.language("a"))
        .with(fx.language("a"))
        .build()
        .expect_err("duplicate name");
    assert_eq!(
        err,
        LanguageError::DuplicateLanguage {
            language: "a".to_owned()
        }
    );
}
