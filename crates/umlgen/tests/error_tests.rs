//! Tests for configuration and input errors

use umlgen::prelude::*;
use umlgen::{load_manifest, parse_manifest, render_manifest};

fn registry() -> TypeRegistry {
    TypeRegistry::new()
        .with(TypeDescriptor::class("shop.Car"))
        .with(TypeDescriptor::class("shop.Wheel"))
}

struct BlankNames;

impl NameResolver for BlankNames {
    fn type_name(&self, _descriptor: &TypeDescriptor) -> String {
        "  ".to_string()
    }
}

#[test]
fn test_blank_type_name_is_configuration_error() {
    let registry = registry();
    let config = DiagramConfig::from_options(DiagramOptions::new().with_type("shop.Car"))
        .unwrap()
        .with_name_resolver(BlankNames);

    let err = ClassDiagramBuilder::new(&registry, config).build().unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("Class name must not be blank"));
}

#[test]
fn test_empty_package_is_configuration_error() {
    let err = umlgen::render(&registry(), DiagramOptions::new().with_package("garage")).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("Package 'garage' must not be empty"));
}

#[test]
fn test_unresolvable_requested_type() {
    let err = umlgen::render(&registry(), DiagramOptions::new().with_type("shop.Boat")).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("shop.Boat"));
}

#[test]
fn test_invalid_exclude_pattern() {
    let options = DiagramOptions::new().with_type("shop.Car").with_exclude("*bad");
    let err = umlgen::render(&registry(), options).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("invalid exclude pattern"));
}

#[test]
fn test_blank_requested_type() {
    let err = umlgen::render(&registry(), DiagramOptions::new().with_type(" ")).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_unresolvable_member_types_are_skipped() {
    let registry = TypeRegistry::new().with(
        TypeDescriptor::class("shop.Car")
            .with_field(FieldDescriptor::new("engine", TypeRef::named("vendor.Engine"))),
    );
    let options = DiagramOptions::new().with_type("shop.Car").with_dependencies();

    let model = umlgen::build_model(&registry, options).unwrap();
    assert_eq!(model.node_count(), 1);
    assert_eq!(model.edge_count(), 0);
    // still listed as an attribute
    assert_eq!(
        model.types()[0].attributes[0].type_name.as_deref(),
        Some("Engine")
    );
}

#[test]
fn test_manifest_errors() {
    let err = parse_manifest("{ not json").unwrap_err();
    assert!(matches!(err, DiagramError::Json { .. }));

    let err = parse_manifest(r#"{"types": [{"name": ""}]}"#).unwrap_err();
    assert!(matches!(err, DiagramError::Manifest { .. }));

    let err = render_manifest(r#"{"types": []}"#, DiagramOptions::new().with_package("a")).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_missing_manifest_file_is_io_error() {
    let err = load_manifest("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, DiagramError::Io { .. }));
}
