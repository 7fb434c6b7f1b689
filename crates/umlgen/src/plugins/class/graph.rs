//! Association inference
//!
//! Edges are keyed by the unordered pair of their endpoints, so two types
//! share at most one field or use edge. Field references are read before
//! method signatures; a use edge never replaces an ownership edge.

use std::collections::{HashMap, HashSet};

use tracing::{debug, span, trace, Level};

use super::scope::{Scope, ScopedType};
use crate::core::{AssociationKind, Cardinality, MemberFilter, NameResolver, TypeHandle};

/// Label written for plain use edges
pub const USE_LABEL: &str = "use";

/// One inferred edge between two scoped types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: TypeHandle,
    pub to: TypeHandle,
    pub kind: AssociationKind,
    labels: Vec<String>,
    pub from_cardinality: Cardinality,
    pub to_cardinality: Cardinality,
}

impl Edge {
    pub fn new(from: TypeHandle, to: TypeHandle, kind: AssociationKind) -> Self {
        Self {
            from,
            to,
            kind,
            labels: Vec::new(),
            from_cardinality: Cardinality::None,
            to_cardinality: Cardinality::None,
        }
    }

    /// Append a label segment
    pub fn push_label(&mut self, label: &str) {
        if !label.is_empty() {
            self.labels.push(label.to_string());
        }
    }

    /// Append a label segment unless it is already present
    pub fn push_distinct_label(&mut self, label: &str) {
        if !self.labels.iter().any(|l| l == label) {
            self.push_label(label);
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Segments joined with `/`
    pub fn label(&self) -> Option<String> {
        (!self.labels.is_empty()).then(|| self.labels.join("/"))
    }
}

type PairKey = (TypeHandle, TypeHandle);

fn pair_key(a: &TypeHandle, b: &TypeHandle) -> PairKey {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// Inferred edges of one diagram
#[derive(Debug, Clone, Default)]
pub struct AssociationGraph {
    inheritance: Vec<Edge>,
    inherited: HashSet<(TypeHandle, TypeHandle)>,
    edges: Vec<Edge>,
    index: HashMap<PairKey, usize>,
}

impl AssociationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `child` derives from `parent`
    pub fn add_inheritance(&mut self, parent: &TypeHandle, child: &TypeHandle) {
        if self.inherited.insert((parent.clone(), child.clone())) {
            self.inheritance.push(Edge::new(
                parent.clone(),
                child.clone(),
                AssociationKind::Inheritance,
            ));
        }
    }

    /// Record a field of `owner` typed by `target`
    ///
    /// A second field over the same pair merges into the existing edge: from
    /// the same side it only extends the label, from the other side the edge
    /// turns bidirected. Collection fields put a many marker on the far end.
    pub fn add_field_link(&mut self, owner: &TypeHandle, target: &TypeHandle, label: &str, many: bool) {
        let key = pair_key(owner, target);
        let cardinality = if many { Cardinality::Many } else { Cardinality::None };

        if let Some(&idx) = self.index.get(&key) {
            let edge = &mut self.edges[idx];
            if edge.kind.is_ownership() {
                if edge.from == *owner {
                    edge.to_cardinality = edge.to_cardinality.upgrade(cardinality);
                } else {
                    edge.kind = AssociationKind::Bidirected;
                    edge.from_cardinality = edge.from_cardinality.upgrade(cardinality);
                }
                edge.push_label(label);
                trace!(from = %edge.from, to = %edge.to, kind = ?edge.kind, "Merged field into edge");
                return;
            }
            // a weaker edge gives way to ownership
            let mut replacement = Edge::new(owner.clone(), target.clone(), AssociationKind::Directed);
            replacement.to_cardinality = cardinality;
            replacement.push_label(label);
            *edge = replacement;
            return;
        }

        let mut edge = Edge::new(owner.clone(), target.clone(), AssociationKind::Directed);
        edge.to_cardinality = cardinality;
        edge.push_label(label);
        trace!(from = %owner, to = %target, label, "New field edge");
        self.index.insert(key, self.edges.len());
        self.edges.push(edge);
    }

    /// Record that `user` depends on `used` through a method signature
    pub fn add_use(&mut self, user: &TypeHandle, used: &TypeHandle, label: &str) {
        let key = pair_key(user, used);

        if let Some(&idx) = self.index.get(&key) {
            let edge = &mut self.edges[idx];
            if edge.kind.is_ownership() {
                trace!(from = %user, to = %used, "Use suppressed by ownership edge");
            } else {
                edge.push_distinct_label(label);
            }
            return;
        }

        let mut edge = Edge::new(user.clone(), used.clone(), AssociationKind::Use);
        edge.push_label(label);
        trace!(from = %user, to = %used, label, "New use edge");
        self.index.insert(key, self.edges.len());
        self.edges.push(edge);
    }

    pub fn inheritance(&self) -> &[Edge] {
        &self.inheritance
    }

    /// Field and use edges, in creation order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The field or use edge between two types, in either direction
    pub fn edge_between(&self, a: &TypeHandle, b: &TypeHandle) -> Option<&Edge> {
        self.index.get(&pair_key(a, b)).map(|&idx| &self.edges[idx])
    }

    pub fn len(&self) -> usize {
        self.inheritance.len() + self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `use` for placeholder parameter names, `use as <name>` otherwise
pub fn use_label(parameter_name: &str) -> String {
    if is_placeholder_name(parameter_name) {
        USE_LABEL.to_string()
    } else {
        format!("{USE_LABEL} as {parameter_name}")
    }
}

/// Compiler-generated parameter names such as `arg0`
fn is_placeholder_name(name: &str) -> bool {
    if name.trim().is_empty() {
        return true;
    }
    name.strip_prefix("arg")
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// Infers every edge between the types of a scope
pub struct Inference<'a> {
    filter: &'a MemberFilter,
    names: &'a dyn NameResolver,
    hide_self_links: bool,
}

impl<'a> Inference<'a> {
    pub fn new(filter: &'a MemberFilter, names: &'a dyn NameResolver, hide_self_links: bool) -> Self {
        Self {
            filter,
            names,
            hide_self_links,
        }
    }

    pub fn infer(&self, scope: &Scope) -> AssociationGraph {
        let infer_span = span!(Level::DEBUG, "infer_associations", type_count = scope.len());
        let _enter = infer_span.enter();

        let mut graph = AssociationGraph::new();

        for scoped in scope.iter() {
            for supertype in scoped.descriptor.supertypes() {
                if supertype != scoped.handle() && scope.contains(supertype) {
                    graph.add_inheritance(supertype, scoped.handle());
                }
            }
        }

        // every field edge exists before the first use edge is considered
        for scoped in scope.iter().filter(|t| t.show_fields) {
            self.field_edges(scope, scoped, &mut graph);
        }
        for scoped in scope.iter().filter(|t| t.show_methods) {
            self.use_edges(scope, scoped, &mut graph);
        }

        debug!(
            inheritance = graph.inheritance().len(),
            edges = graph.edges().len(),
            "Inferred associations"
        );
        graph
    }

    fn field_edges(&self, scope: &Scope, scoped: &ScopedType, graph: &mut AssociationGraph) {
        let owner = scoped.descriptor.as_ref();
        for field in self.filter.visible_fields(owner) {
            if field.is_enum_constant {
                continue;
            }
            let label = self.names.field_name(owner, field);
            for target in field.concerned_types() {
                if !scope.contains(target) {
                    continue;
                }
                if target == owner.handle() && self.hide_self_links {
                    continue;
                }
                graph.add_field_link(owner.handle(), target, &label, field.is_collection());
            }
        }
    }

    fn use_edges(&self, scope: &Scope, scoped: &ScopedType, graph: &mut AssociationGraph) {
        let owner = scoped.descriptor.as_ref();
        let in_reach = |handle: &TypeHandle| handle != owner.handle() && scope.contains(handle);

        for method in self.filter.visible_methods(owner) {
            for parameter in &method.parameters {
                if !self.filter.accepts_parameter(owner, method, parameter) {
                    continue;
                }
                let label = use_label(&parameter.name);
                for used in parameter.concerned_types() {
                    if in_reach(used) {
                        graph.add_use(owner.handle(), used, &label);
                    }
                }
            }
            for used in method.concerned_return_types() {
                if in_reach(used) {
                    graph.add_use(owner.handle(), used, USE_LABEL);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(name: &str) -> TypeHandle {
        TypeHandle::new(name)
    }

    #[test]
    fn test_first_field_creates_directed_edge() {
        let mut graph = AssociationGraph::new();
        graph.add_field_link(&h("a.Car"), &h("a.Wheel"), "wheels", true);
        let edge = graph.edge_between(&h("a.Wheel"), &h("a.Car")).unwrap();
        assert_eq!(edge.kind, AssociationKind::Directed);
        assert_eq!(edge.from, h("a.Car"));
        assert_eq!(edge.to_cardinality, Cardinality::Many);
        assert_eq!(edge.from_cardinality, Cardinality::None);
        assert_eq!(edge.label().as_deref(), Some("wheels"));
    }

    #[test]
    fn test_back_reference_turns_bidirected() {
        let mut graph = AssociationGraph::new();
        graph.add_field_link(&h("a.Car"), &h("a.Driver"), "driver", false);
        graph.add_field_link(&h("a.Driver"), &h("a.Car"), "cars", true);
        assert_eq!(graph.edges().len(), 1);
        let edge = &graph.edges()[0];
        assert_eq!(edge.kind, AssociationKind::Bidirected);
        assert_eq!(edge.from, h("a.Car"));
        assert_eq!(edge.from_cardinality, Cardinality::Many);
        assert_eq!(edge.to_cardinality, Cardinality::None);
        assert_eq!(edge.label().as_deref(), Some("driver/cars"));
    }

    #[test]
    fn test_same_side_fields_merge_labels() {
        let mut graph = AssociationGraph::new();
        graph.add_field_link(&h("a.Car"), &h("a.Wheel"), "front", false);
        graph.add_field_link(&h("a.Car"), &h("a.Wheel"), "spares", true);
        let edge = &graph.edges()[0];
        assert_eq!(edge.kind, AssociationKind::Directed);
        assert_eq!(edge.to_cardinality, Cardinality::Many);
        assert_eq!(edge.label().as_deref(), Some("front/spares"));
    }

    #[test]
    fn test_same_named_fields_on_both_ends_keep_both_labels() {
        let mut graph = AssociationGraph::new();
        graph.add_field_link(&h("a.Car"), &h("a.Driver"), "link", false);
        graph.add_field_link(&h("a.Driver"), &h("a.Car"), "link", false);
        let edge = &graph.edges()[0];
        assert_eq!(edge.kind, AssociationKind::Bidirected);
        assert_eq!(edge.label().as_deref(), Some("link/link"));
    }

    #[test]
    fn test_use_never_overrides_ownership() {
        let mut graph = AssociationGraph::new();
        graph.add_field_link(&h("a.Car"), &h("a.Driver"), "driver", false);
        graph.add_use(&h("a.Driver"), &h("a.Car"), "use as car");
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edges()[0].kind, AssociationKind::Directed);
        assert_eq!(graph.edges()[0].label().as_deref(), Some("driver"));
    }

    #[test]
    fn test_use_labels_merge() {
        let mut graph = AssociationGraph::new();
        graph.add_use(&h("a.Garage"), &h("a.Car"), "use as car");
        graph.add_use(&h("a.Garage"), &h("a.Car"), "use");
        graph.add_use(&h("a.Garage"), &h("a.Car"), "use");
        let edge = &graph.edges()[0];
        assert_eq!(edge.kind, AssociationKind::Use);
        assert_eq!(edge.label().as_deref(), Some("use as car/use"));
    }

    #[test]
    fn test_field_replaces_use() {
        let mut graph = AssociationGraph::new();
        graph.add_use(&h("a.Garage"), &h("a.Car"), "use");
        graph.add_field_link(&h("a.Car"), &h("a.Garage"), "garage", false);
        let edge = &graph.edges()[0];
        assert_eq!(edge.kind, AssociationKind::Directed);
        assert_eq!(edge.from, h("a.Car"));
        assert_eq!(edge.label().as_deref(), Some("garage"));
    }

    #[test]
    fn test_inheritance_deduplicated() {
        let mut graph = AssociationGraph::new();
        graph.add_inheritance(&h("a.Vehicule"), &h("a.Car"));
        graph.add_inheritance(&h("a.Vehicule"), &h("a.Car"));
        assert_eq!(graph.inheritance().len(), 1);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_use_label() {
        assert_eq!(use_label("arg0"), "use");
        assert_eq!(use_label("arg12"), "use");
        assert_eq!(use_label(""), "use");
        assert_eq!(use_label("args"), "use as args");
        assert_eq!(use_label("wheel"), "use as wheel");
    }
}
