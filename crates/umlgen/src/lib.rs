//! umlgen - Generate PlantUML class diagrams from type descriptions
//!
//! Types are described to the library (registered in code, loaded from a
//! JSON manifest, or supplied by any [`Introspector`]). The builder infers
//! inheritance, ownership and usage associations between them and renders
//! deterministic PlantUML text.
//!
//! # Quick Start
//!
//! ```rust
//! use umlgen::prelude::*;
//!
//! let registry = TypeRegistry::new()
//!     .with(
//!         TypeDescriptor::class("shop.Car")
//!             .with_field(FieldDescriptor::new("brand", TypeRef::parse("String")))
//!             .with_field(
//!                 FieldDescriptor::new("wheels", TypeRef::parse("Collection"))
//!                     .with_generics([TypeRef::named("shop.Wheel")]),
//!             ),
//!     )
//!     .with(TypeDescriptor::class("shop.Wheel"));
//!
//! let options = DiagramOptions::new().with_package("shop");
//! let text = umlgen::render(&registry, options).unwrap();
//! assert!(text.contains("\"Car\" --> \"*\" \"Wheel\" : wheels"));
//! ```
//!
//! # Advanced Usage
//!
//! [`DiagramConfig`] adds member predicates and name or link resolvers that
//! cannot be expressed as plain options:
//!
//! ```rust
//! use umlgen::prelude::*;
//!
//! let registry = TypeRegistry::new().with(
//!     TypeDescriptor::class("shop.Car")
//!         .with_field(FieldDescriptor::new("brand", TypeRef::parse("String")).with_annotation("Machine"))
//!         .with_field(FieldDescriptor::new("owner", TypeRef::parse("String"))),
//! );
//!
//! let config = DiagramConfig::from_options(DiagramOptions::new().with_type("shop.Car"))
//!     .unwrap()
//!     .with_field_predicate(|_, field| field.has_annotation("Machine"));
//! let model = ClassDiagramBuilder::new(&registry, config).build_model().unwrap();
//! assert_eq!(model.types()[0].attributes.len(), 1);
//! ```

pub mod core;
pub mod plugins;

pub use core::*;
pub use plugins::class::{
    ClassDiagramBuilder, DiagramConfig, DiagramModel, DiagramOptions, PlantUmlRenderer, TypeOrder,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        AssociationKind, Cardinality, Database, DiagramError, DiagramResult, FieldDescriptor,
        Introspector, Link, LinkResolver, MethodDescriptor, NameResolver, PackageStyle,
        ParameterDescriptor, Renderer, TypeDescriptor, TypeHandle, TypeKind, TypeRef,
        TypeRegistry, Visibility,
    };
    pub use crate::plugins::class::{
        ClassDiagramBuilder, DiagramConfig, DiagramModel, DiagramOptions, PlantUmlRenderer,
        TypeOrder,
    };
}

/// Build and render a class diagram
///
/// # Example
/// ```rust
/// use umlgen::{render, DiagramOptions, TypeDescriptor, TypeRegistry};
///
/// let registry = TypeRegistry::new().with(TypeDescriptor::interface("shop.Vehicule"));
/// let text = render(&registry, DiagramOptions::new().with_type("shop.Vehicule")).unwrap();
/// assert!(text.starts_with("@startuml"));
/// assert!(text.contains("interface \"Vehicule\""));
/// ```
pub fn render<I: Introspector + ?Sized>(
    introspector: &I,
    options: DiagramOptions,
) -> DiagramResult<String> {
    ClassDiagramBuilder::with_options(introspector, options)?.build()
}

/// Build the diagram model without rendering it
pub fn build_model<I: Introspector + ?Sized>(
    introspector: &I,
    options: DiagramOptions,
) -> DiagramResult<DiagramModel> {
    ClassDiagramBuilder::with_options(introspector, options)?.build_model()
}

/// Render a class diagram for the types described by manifest JSON
///
/// # Example
/// ```rust
/// use umlgen::{render_manifest, DiagramOptions};
///
/// let manifest = r#"{"types": [{"name": "shop.Devise", "kind": "enum", "constants": ["CHF"]}]}"#;
/// let text = render_manifest(manifest, DiagramOptions::new().with_package("shop")).unwrap();
/// assert!(text.contains("enum \"Devise\" {\n  CHF\n}"));
/// ```
pub fn render_manifest(manifest: &str, options: DiagramOptions) -> DiagramResult<String> {
    let registry = parse_manifest(manifest)?;
    render(&registry, options)
}
