//! Class diagram plugin
//!
//! Infers associations between described types and renders them as a
//! PlantUML class diagram.

mod builder;
mod config;
mod database;
mod directives;
mod graph;
mod renderer;
mod scope;

pub use builder::ClassDiagramBuilder;
pub use config::{DiagramConfig, DiagramOptions, TypeOrder};
pub use database::{
    Association, Attribute, DiagramModel, DiagramType, Operation, Package, PackageMember,
};
pub use directives::HideDirectives;
pub use graph::{use_label, AssociationGraph, Edge, Inference, USE_LABEL};
pub use renderer::{PlantUmlRenderer, END_MARKER, START_MARKER};
pub use scope::{DescriptorCache, Scope, ScopeResolver, ScopedType};
