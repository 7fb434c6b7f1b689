//! Scope resolution
//!
//! Turns the requested types and packages into the ordered set of types that
//! get a block in the diagram. With dependency expansion enabled, every
//! resolvable type reachable through supertypes and visible member
//! signatures joins the scope too.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, span, trace, Level};

use super::config::{DiagramOptions, TypeOrder};
use super::directives::HideDirectives;
use crate::core::{
    DiagramError, DiagramResult, Introspector, MemberFilter, NameResolver, TypeDescriptor,
    TypeHandle,
};

/// Per-build memo of introspector answers, including misses
pub struct DescriptorCache<'i, I: Introspector + ?Sized> {
    introspector: &'i I,
    entries: HashMap<TypeHandle, Option<Arc<TypeDescriptor>>>,
}

impl<'i, I: Introspector + ?Sized> DescriptorCache<'i, I> {
    pub fn new(introspector: &'i I) -> Self {
        Self {
            introspector,
            entries: HashMap::new(),
        }
    }

    /// Describe a type once per build
    pub fn get(&mut self, handle: &TypeHandle) -> Option<Arc<TypeDescriptor>> {
        if let Some(entry) = self.entries.get(handle) {
            return entry.clone();
        }
        let described = self.introspector.describe(handle).map(Arc::new);
        if described.is_none() {
            trace!(type_name = %handle, "Unresolvable type reference skipped");
        }
        self.entries.insert(handle.clone(), described.clone());
        described
    }

    pub fn package_types(&self, package: &str) -> Vec<TypeHandle> {
        self.introspector.package_types(package)
    }

    /// Number of distinct handles asked about so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A type in scope, with its display name and visible categories settled
#[derive(Debug, Clone)]
pub struct ScopedType {
    pub descriptor: Arc<TypeDescriptor>,
    pub name: String,
    pub show_fields: bool,
    pub show_methods: bool,
}

impl ScopedType {
    pub fn handle(&self) -> &TypeHandle {
        self.descriptor.handle()
    }
}

/// Ordered set of types drawn in one diagram
#[derive(Debug, Clone, Default)]
pub struct Scope {
    types: IndexMap<TypeHandle, ScopedType>,
    packages: IndexMap<String, HashSet<TypeHandle>>,
}

impl Scope {
    pub fn contains(&self, handle: &TypeHandle) -> bool {
        self.types.contains_key(handle)
    }

    pub fn get(&self, handle: &TypeHandle) -> Option<&ScopedType> {
        self.types.get(handle)
    }

    pub fn name_of(&self, handle: &TypeHandle) -> Option<&str> {
        self.types.get(handle).map(|t| t.name.as_str())
    }

    /// Types in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &ScopedType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Requested package names, in request order
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// Types contributed by a requested package, in canonical order
    pub fn package_members(&self, package: &str) -> Vec<&ScopedType> {
        match self.packages.get(package) {
            Some(members) => self
                .iter()
                .filter(|t| members.contains(t.handle()))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Resolves the scope of one build
pub struct ScopeResolver<'a> {
    options: &'a DiagramOptions,
    filter: &'a MemberFilter,
    names: &'a dyn NameResolver,
    directives: &'a HideDirectives,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(
        options: &'a DiagramOptions,
        filter: &'a MemberFilter,
        names: &'a dyn NameResolver,
        directives: &'a HideDirectives,
    ) -> Self {
        Self {
            options,
            filter,
            names,
            directives,
        }
    }

    pub fn resolve<I: Introspector + ?Sized>(
        &self,
        cache: &mut DescriptorCache<'_, I>,
    ) -> DiagramResult<Scope> {
        let scope_span = span!(
            Level::DEBUG,
            "resolve_scope",
            types = self.options.types.len(),
            packages = self.options.packages.len(),
            expand = self.options.expand_dependencies
        );
        let _enter = scope_span.enter();

        let mut scope = Scope::default();

        for name in &self.options.types {
            let handle = TypeHandle::new(name.trim());
            let descriptor = cache.get(&handle).ok_or_else(|| {
                DiagramError::configuration(format!("Type '{name}' cannot be resolved"))
            })?;
            self.insert(&mut scope, descriptor);
        }

        for package in &self.options.packages {
            let handles = cache.package_types(package);
            if handles.is_empty() {
                return Err(DiagramError::configuration(format!(
                    "Package '{package}' must not be empty"
                )));
            }
            let mut members = HashSet::new();
            for handle in handles {
                if let Some(descriptor) = cache.get(&handle) {
                    self.insert(&mut scope, descriptor);
                    members.insert(handle);
                }
            }
            scope
                .packages
                .entry(package.clone())
                .or_default()
                .extend(members);
        }

        if self.options.expand_dependencies {
            self.expand(&mut scope, cache);
        }

        if self.options.type_order == TypeOrder::Name {
            scope.types.sort_by(|_, a, _, b| {
                (a.name.as_str(), a.descriptor.qualified_name())
                    .cmp(&(b.name.as_str(), b.descriptor.qualified_name()))
            });
        }

        debug!(type_count = scope.len(), "Resolved scope");
        Ok(scope)
    }

    fn insert(&self, scope: &mut Scope, descriptor: Arc<TypeDescriptor>) {
        if scope.contains(descriptor.handle()) {
            return;
        }
        let name = self.names.type_name(&descriptor);
        let scoped = ScopedType {
            show_fields: self.directives.fields_visible(&name),
            show_methods: self.directives.methods_visible(&name),
            name,
            descriptor,
        };
        trace!(type_name = %scoped.name, qualified = %scoped.handle(), "Type in scope");
        scope.types.insert(scoped.handle().clone(), scoped);
    }

    /// Breadth-first closure over resolvable references
    fn expand<I: Introspector + ?Sized>(&self, scope: &mut Scope, cache: &mut DescriptorCache<'_, I>) {
        let mut queue: VecDeque<TypeHandle> = scope.types.keys().cloned().collect();
        let before = scope.len();

        while let Some(handle) = queue.pop_front() {
            let Some(scoped) = scope.get(&handle) else {
                continue;
            };
            for reference in self.references(scoped) {
                if scope.contains(&reference) {
                    continue;
                }
                if let Some(descriptor) = cache.get(&reference) {
                    self.insert(scope, descriptor);
                    queue.push_back(reference);
                }
            }
        }

        debug!(discovered = scope.len() - before, "Expanded dependencies");
    }

    /// Named types a scoped type points at through visible members
    fn references(&self, scoped: &ScopedType) -> Vec<TypeHandle> {
        let owner = scoped.descriptor.as_ref();
        let mut found: Vec<TypeHandle> = owner.supertypes().to_vec();

        if scoped.show_fields {
            for field in self.filter.visible_fields(owner) {
                found.extend(field.concerned_types().into_iter().cloned());
            }
        }
        if scoped.show_methods {
            for method in self.filter.visible_methods(owner) {
                for parameter in &method.parameters {
                    if self.filter.accepts_parameter(owner, method, parameter) {
                        found.extend(parameter.concerned_types().into_iter().cloned());
                    }
                }
                found.extend(method.concerned_return_types().into_iter().cloned());
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        DefaultResolver, FieldDescriptor, MethodDescriptor, ParameterDescriptor, TypeRef,
        TypeRegistry,
    };

    fn registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(
                TypeDescriptor::class("shop.Car")
                    .with_supertype("shop.Vehicule")
                    .with_field(FieldDescriptor::new("price", TypeRef::named("shop.Price")))
                    .with_field(FieldDescriptor::new("plate", TypeRef::named("ext.Plate"))),
            )
            .with(TypeDescriptor::abstract_class("shop.Vehicule"))
            .with(
                TypeDescriptor::class("money.Price")
                    .with_field(FieldDescriptor::new("amount", TypeRef::parse("int"))),
            )
            .with(
                TypeDescriptor::class("shop.Price")
                    .with_field(FieldDescriptor::new("devise", TypeRef::named("money.Devise"))),
            )
            .with(TypeDescriptor::enumeration("money.Devise").with_constant("CHF"))
            .with(
                TypeDescriptor::class("shop.Garage").with_method(
                    MethodDescriptor::new("repair")
                        .with_parameter(ParameterDescriptor::new("car", TypeRef::named("shop.Car"))),
                ),
            )
    }

    fn resolve(options: &DiagramOptions) -> DiagramResult<Scope> {
        let registry = registry();
        let filter = MemberFilter::new();
        let directives = HideDirectives::parse(options.parts());
        let mut cache = DescriptorCache::new(&registry);
        ScopeResolver::new(options, &filter, &DefaultResolver, &directives).resolve(&mut cache)
    }

    fn names(scope: &Scope) -> Vec<&str> {
        scope.iter().map(|t| t.descriptor.qualified_name()).collect()
    }

    #[test]
    fn test_explicit_types_only() {
        let options = DiagramOptions::new().with_type("shop.Car");
        let scope = resolve(&options).unwrap();
        assert_eq!(names(&scope), vec!["shop.Car"]);
    }

    #[test]
    fn test_unknown_explicit_type_fails() {
        let options = DiagramOptions::new().with_type("shop.Boat");
        assert!(resolve(&options).unwrap_err().is_configuration());
    }

    #[test]
    fn test_empty_package_fails() {
        let options = DiagramOptions::new().with_package("nowhere");
        let err = resolve(&options).unwrap_err();
        assert!(err.to_string().contains("Package 'nowhere' must not be empty"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let options = DiagramOptions::new()
            .with_type("shop.Car")
            .with_type("shop.Car")
            .with_package("shop");
        let scope = resolve(&options).unwrap();
        assert_eq!(scope.len(), 4);
        assert_eq!(scope.package_members("shop").len(), 4);
    }

    #[test]
    fn test_expansion_is_transitive_and_skips_unresolvable() {
        let options = DiagramOptions::new().with_type("shop.Car").with_dependencies();
        let scope = resolve(&options).unwrap();
        // sorted by display name, then qualified name
        assert_eq!(
            names(&scope),
            vec!["shop.Car", "money.Devise", "shop.Price", "shop.Vehicule"]
        );
        assert!(!scope.contains(&TypeHandle::new("ext.Plate")));
    }

    #[test]
    fn test_declaration_order() {
        let mut options = DiagramOptions::new()
            .with_type("shop.Vehicule")
            .with_type("shop.Car");
        options.type_order = TypeOrder::Declaration;
        let scope = resolve(&options).unwrap();
        assert_eq!(names(&scope), vec!["shop.Vehicule", "shop.Car"]);
    }

    #[test]
    fn test_hidden_fields_do_not_expand() {
        let options = DiagramOptions::new()
            .with_type("shop.Car")
            .with_dependencies()
            .with_header("hide fields");
        let scope = resolve(&options).unwrap();
        assert_eq!(names(&scope), vec!["shop.Car", "shop.Vehicule"]);
        assert!(!scope.iter().next().unwrap().show_fields);
    }

    #[test]
    fn test_cache_remembers_misses() {
        let registry = registry();
        let mut cache = DescriptorCache::new(&registry);
        assert!(cache.get(&TypeHandle::new("ext.Plate")).is_none());
        assert!(cache.get(&TypeHandle::new("ext.Plate")).is_none());
        assert!(cache.get(&TypeHandle::new("shop.Car")).is_some());
        assert_eq!(cache.len(), 2);
    }
}
