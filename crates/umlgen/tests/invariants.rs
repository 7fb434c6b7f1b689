//! Property tests over randomly shaped type graphs

use std::collections::HashSet;

use proptest::prelude::*;
use umlgen::prelude::*;

const TYPE_COUNT: usize = 5;

/// Per type: fields as (target, is_collection) and method parameters as targets
type Shape = Vec<(Vec<(usize, bool)>, Vec<usize>)>;

fn arb_shape() -> impl Strategy<Value = Shape> {
    prop::collection::vec(
        (
            prop::collection::vec((0..TYPE_COUNT, any::<bool>()), 0..4),
            prop::collection::vec(0..TYPE_COUNT, 0..3),
        ),
        TYPE_COUNT,
    )
}

fn type_name(idx: usize) -> String {
    format!("p.T{idx}")
}

fn descriptor(idx: usize, fields: &[(usize, bool)], params: &[usize]) -> TypeDescriptor {
    let mut descriptor = TypeDescriptor::class(type_name(idx));
    if idx > 0 {
        descriptor = descriptor.with_supertype(type_name(idx - 1).as_str());
    }
    for (n, &(target, many)) in fields.iter().enumerate() {
        let field = if many {
            FieldDescriptor::new(format!("f{n}"), TypeRef::parse("List"))
                .with_generics([TypeRef::named(type_name(target))])
        } else {
            FieldDescriptor::new(format!("f{n}"), TypeRef::named(type_name(target)))
        };
        descriptor = descriptor.with_field(field);
    }
    for (n, &target) in params.iter().enumerate() {
        descriptor = descriptor.with_method(
            MethodDescriptor::new(format!("m{n}"))
                .with_parameter(ParameterDescriptor::new("value", TypeRef::named(type_name(target)))),
        );
    }
    descriptor
}

fn registry(shape: &Shape, order: &[usize]) -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    for &idx in order {
        let (fields, params) = &shape[idx];
        registry.register(descriptor(idx, fields, params));
    }
    registry
}

fn options(show_self_links: bool) -> DiagramOptions {
    let options = DiagramOptions::new().with_package("p");
    if show_self_links {
        options.show_self_links()
    } else {
        options
    }
}

proptest! {
    #[test]
    fn prop_output_independent_of_registration_order(
        shape in arb_shape(),
        order in Just((0..TYPE_COUNT).collect::<Vec<_>>()).prop_shuffle(),
        self_links in any::<bool>(),
    ) {
        let natural: Vec<usize> = (0..TYPE_COUNT).collect();
        let first = umlgen::render(&registry(&shape, &natural), options(self_links)).unwrap();
        let second = umlgen::render(&registry(&shape, &order), options(self_links)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_one_member_edge_per_pair(shape in arb_shape(), self_links in any::<bool>()) {
        let natural: Vec<usize> = (0..TYPE_COUNT).collect();
        let model = umlgen::build_model(&registry(&shape, &natural), options(self_links)).unwrap();

        let mut pairs = HashSet::new();
        for assoc in model.associations() {
            if assoc.kind == AssociationKind::Inheritance {
                continue;
            }
            let mut pair = [assoc.from.clone(), assoc.to.clone()];
            pair.sort();
            prop_assert!(pairs.insert(pair), "duplicate edge between {} and {}", assoc.from, assoc.to);
        }
    }

    #[test]
    fn prop_edges_connect_drawn_types(shape in arb_shape(), self_links in any::<bool>()) {
        let natural: Vec<usize> = (0..TYPE_COUNT).collect();
        let model = umlgen::build_model(&registry(&shape, &natural), options(self_links)).unwrap();

        for assoc in model.associations() {
            prop_assert!(model.get_type(&assoc.from).is_some());
            prop_assert!(model.get_type(&assoc.to).is_some());
            if !self_links || assoc.kind == AssociationKind::Use {
                prop_assert_ne!(&assoc.from, &assoc.to);
            }
        }
    }

    #[test]
    fn prop_inheritance_follows_supertypes(shape in arb_shape()) {
        let natural: Vec<usize> = (0..TYPE_COUNT).collect();
        let model = umlgen::build_model(&registry(&shape, &natural), options(false)).unwrap();

        let inheritance = model
            .associations()
            .iter()
            .filter(|a| a.kind == AssociationKind::Inheritance)
            .count();
        prop_assert_eq!(inheritance, TYPE_COUNT - 1);
    }
}
