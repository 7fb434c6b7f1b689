//! Class diagram builder
//!
//! One builder draws one diagram: it resolves the scope, infers the edges,
//! assembles a [`DiagramModel`] and hands it to the renderer. Builders are
//! consumed by `build`, so nothing leaks from one diagram into the next.

use tracing::{info, span, Level};

use super::config::{DiagramConfig, DiagramOptions};
use super::database::{Association, Attribute, DiagramModel, DiagramType, Operation, Package};
use super::directives::HideDirectives;
use super::graph::{AssociationGraph, Edge, Inference};
use super::renderer::PlantUmlRenderer;
use super::scope::{DescriptorCache, Scope, ScopeResolver, ScopedType};
use crate::core::{DiagramError, DiagramResult, Introspector, TypeHandle};

/// Builds one class diagram from an introspector and a configuration
pub struct ClassDiagramBuilder<'i, I: Introspector + ?Sized> {
    introspector: &'i I,
    config: DiagramConfig,
}

impl<'i, I: Introspector + ?Sized> ClassDiagramBuilder<'i, I> {
    pub fn new(introspector: &'i I, config: DiagramConfig) -> Self {
        Self {
            introspector,
            config,
        }
    }

    /// Builder over plain options, with default predicates and resolvers
    pub fn with_options(introspector: &'i I, options: DiagramOptions) -> DiagramResult<Self> {
        Ok(Self::new(introspector, DiagramConfig::from_options(options)?))
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    /// Build and render the diagram text
    pub fn build(self) -> DiagramResult<String> {
        let model = self.assemble()?;
        PlantUmlRenderer::with_line_separator(self.config.options().line_separator.as_str())
            .render_model(&model)
    }

    /// Build the diagram model without rendering it
    pub fn build_model(self) -> DiagramResult<DiagramModel> {
        self.assemble()
    }

    fn assemble(&self) -> DiagramResult<DiagramModel> {
        let options = self.config.options();
        let build_span = span!(
            Level::INFO,
            "build_diagram",
            types = options.types.len(),
            packages = options.packages.len(),
            expand = options.expand_dependencies
        );
        let _enter = build_span.enter();

        let directives = HideDirectives::parse(options.parts());
        let mut cache = DescriptorCache::new(self.introspector);
        let scope = ScopeResolver::new(
            options,
            self.config.filter(),
            self.config.names(),
            &directives,
        )
        .resolve(&mut cache)?;

        let graph = Inference::new(
            self.config.filter(),
            self.config.names(),
            options.hide_self_links,
        )
        .infer(&scope);

        let mut model = DiagramModel::new();
        model.set_header(options.header.clone());
        model.set_footer(options.footer.clone());
        model.set_title(options.title.clone());
        model.set_start_options(options.start_options.clone());
        model.set_end_options(options.end_options.clone());

        for package in scope.packages() {
            let mut group = Package::new(package, options.package_style);
            group.color = options.package_color.clone();
            for member in scope.package_members(package) {
                group = group.with_member(member.name.as_str(), member.descriptor.kind());
            }
            model.add_package(group)?;
        }

        for scoped in scope.iter() {
            model.add_type(self.diagram_type(scoped))?;
        }

        self.add_associations(&mut model, &scope, &graph)?;

        info!(
            types = scope.len(),
            associations = model.associations().len(),
            descriptors = cache.len(),
            "Built class diagram"
        );
        Ok(model)
    }

    fn diagram_type(&self, scoped: &ScopedType) -> DiagramType {
        let descriptor = scoped.descriptor.as_ref();
        let names = self.config.names();
        let links = self.config.links();
        let filter = self.config.filter();

        let mut diagram_type = DiagramType::new(scoped.name.as_str(), descriptor.kind());
        diagram_type.stereotypes = descriptor.stereotypes().to_vec();
        diagram_type.link = links.type_link(descriptor);
        diagram_type.background_color = self
            .config
            .options()
            .colors
            .get(descriptor.qualified_name())
            .cloned();

        if scoped.show_fields {
            for field in filter.visible_fields(descriptor) {
                diagram_type.add_attribute(Attribute {
                    name: names.field_name(descriptor, field),
                    type_name: (!field.is_enum_constant).then(|| field.type_name()),
                    link: links.field_link(descriptor, field),
                });
            }
        }
        if scoped.show_methods {
            for method in filter.visible_methods(descriptor) {
                diagram_type.add_method(Operation {
                    name: names.method_name(descriptor, method),
                    parameters: method.parameters.iter().map(|p| p.type_name()).collect(),
                    return_type: method.return_type_name(),
                    link: links.method_link(descriptor, method),
                });
            }
        }
        diagram_type
    }

    fn add_associations(
        &self,
        model: &mut DiagramModel,
        scope: &Scope,
        graph: &AssociationGraph,
    ) -> DiagramResult<()> {
        for edge in graph.inheritance().iter().chain(graph.edges()) {
            model.add_association(association(scope, edge)?)?;
        }
        Ok(())
    }
}

fn endpoint<'s>(scope: &'s Scope, handle: &TypeHandle) -> DiagramResult<&'s str> {
    scope.name_of(handle).ok_or_else(|| {
        DiagramError::configuration(format!("Association endpoint '{handle}' is not in scope"))
    })
}

fn association(scope: &Scope, edge: &Edge) -> DiagramResult<Association> {
    let mut association = Association::new(
        endpoint(scope, &edge.from)?,
        endpoint(scope, &edge.to)?,
        edge.kind,
    )
    .with_cardinalities(edge.from_cardinality, edge.to_cardinality);
    association.label = edge.label();
    Ok(association)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AssociationKind, FieldDescriptor, TypeDescriptor, TypeRef, TypeRegistry};

    fn registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(
                TypeDescriptor::class("a.Node")
                    .with_field(FieldDescriptor::new("next", TypeRef::named("a.Node")))
                    .with_field(FieldDescriptor::new("label", TypeRef::parse("String"))),
            )
    }

    #[test]
    fn test_self_links_hidden_by_default() {
        let registry = registry();
        let options = DiagramOptions::new().with_type("a.Node");
        let model = ClassDiagramBuilder::with_options(&registry, options)
            .unwrap()
            .build_model()
            .unwrap();
        assert!(model.associations().is_empty());
        assert_eq!(model.types()[0].attributes.len(), 2);
    }

    #[test]
    fn test_self_links_shown_on_request() {
        let registry = registry();
        let options = DiagramOptions::new().with_type("a.Node").show_self_links();
        let model = ClassDiagramBuilder::with_options(&registry, options)
            .unwrap()
            .build_model()
            .unwrap();
        let assoc = &model.associations()[0];
        assert_eq!((assoc.from.as_str(), assoc.to.as_str()), ("Node", "Node"));
        assert_eq!(assoc.kind, AssociationKind::Directed);
        assert_eq!(assoc.label.as_deref(), Some("next"));
    }

    #[test]
    fn test_colors_applied_by_qualified_name() {
        let registry = registry();
        let options = DiagramOptions::new()
            .with_type("a.Node")
            .with_color("a.Node", "Wheat");
        let text = ClassDiagramBuilder::with_options(&registry, options)
            .unwrap()
            .build()
            .unwrap();
        assert!(text.contains("class \"Node\" #Wheat {"));
    }

    #[test]
    fn test_invalid_exclude_fails_before_build() {
        let registry = registry();
        let options = DiagramOptions::new().with_type("a.Node").with_exclude("[");
        assert!(ClassDiagramBuilder::with_options(&registry, options).is_err());
    }
}
