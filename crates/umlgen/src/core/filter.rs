//! Member filters
//!
//! A filter decides which fields and methods are visible in the diagram.
//! Visibility is the logical AND of the built-in defaults, the exclusion
//! patterns and every caller-supplied predicate. Filtered-out members are
//! neither rendered nor used for association inference.

use regex::Regex;

use super::descriptor::{
    FieldDescriptor, MethodDescriptor, ParameterDescriptor, TypeDescriptor, TypeRef,
    SYNTHETIC_PREFIX,
};
use super::error::{DiagramError, DiagramResult};

/// Method names hidden by default
pub const DEFAULT_EXCLUDED_METHODS: &[&str] = &["equals", "hashCode", "toString"];

/// Discriminant of a [`Member`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
    Parameter,
}

/// A diagram member together with its owning type
#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    Field {
        owner: &'a TypeDescriptor,
        field: &'a FieldDescriptor,
    },
    Method {
        owner: &'a TypeDescriptor,
        method: &'a MethodDescriptor,
    },
    Parameter {
        owner: &'a TypeDescriptor,
        method: &'a MethodDescriptor,
        parameter: &'a ParameterDescriptor,
    },
}

impl<'a> Member<'a> {
    pub fn kind(&self) -> MemberKind {
        match self {
            Member::Field { .. } => MemberKind::Field,
            Member::Method { .. } => MemberKind::Method,
            Member::Parameter { .. } => MemberKind::Parameter,
        }
    }

    pub fn owner(&self) -> &'a TypeDescriptor {
        match *self {
            Member::Field { owner, .. }
            | Member::Method { owner, .. }
            | Member::Parameter { owner, .. } => owner,
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            Member::Field { field, .. } => &field.name,
            Member::Method { method, .. } => &method.name,
            Member::Parameter { parameter, .. } => &parameter.name,
        }
    }

    pub fn annotations(&self) -> &'a [String] {
        match *self {
            Member::Field { field, .. } => &field.annotations,
            Member::Method { method, .. } => &method.annotations,
            Member::Parameter { .. } => &[],
        }
    }

    /// `declaringType.memberName`, the string exclusion patterns match
    ///
    /// Parameters are named after their method.
    pub fn qualified_name(&self) -> String {
        let member = match *self {
            Member::Parameter { method, .. } => method.name.as_str(),
            _ => self.name(),
        };
        format!("{}.{}", self.owner().qualified_name(), member)
    }
}

/// Caller-supplied predicate over members
pub type MemberPredicate = Box<dyn Fn(&Member<'_>) -> bool + Send + Sync>;

/// Composable member filter
#[derive(Default)]
pub struct MemberFilter {
    excludes: Vec<Regex>,
    predicates: Vec<(MemberKind, MemberPredicate)>,
}

impl std::fmt::Debug for MemberFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberFilter")
            .field("excludes", &self.excludes)
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

impl MemberFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude members whose `declaringType.memberName` fully matches `pattern`
    pub fn exclude(&mut self, pattern: &str) -> DiagramResult<&mut Self> {
        let anchored = format!("^(?:{pattern})$");
        let regex = Regex::new(&anchored).map_err(|e| {
            DiagramError::configuration(format!("invalid exclude pattern '{pattern}': {e}"))
        })?;
        self.excludes.push(regex);
        Ok(self)
    }

    /// Narrow the visible fields further
    pub fn add_field_predicate<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&TypeDescriptor, &FieldDescriptor) -> bool + Send + Sync + 'static,
    {
        let boxed: MemberPredicate = Box::new(move |member: &Member<'_>| match *member {
            Member::Field { owner, field } => predicate(owner, field),
            _ => true,
        });
        self.predicates.push((MemberKind::Field, boxed));
        self
    }

    /// Narrow the visible methods further
    pub fn add_method_predicate<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&TypeDescriptor, &MethodDescriptor) -> bool + Send + Sync + 'static,
    {
        let boxed: MemberPredicate = Box::new(move |member: &Member<'_>| match *member {
            Member::Method { owner, method } => predicate(owner, method),
            _ => true,
        });
        self.predicates.push((MemberKind::Method, boxed));
        self
    }

    /// Narrow members of the given kind with a predicate over [`Member`]
    pub fn add_predicate(&mut self, kind: MemberKind, predicate: MemberPredicate) -> &mut Self {
        self.predicates.push((kind, predicate));
        self
    }

    pub fn exclude_count(&self) -> usize {
        self.excludes.len()
    }

    fn is_excluded(&self, member: &Member<'_>) -> bool {
        if self.excludes.is_empty() {
            return false;
        }
        let qualified = member.qualified_name();
        self.excludes.iter().any(|re| re.is_match(&qualified))
    }

    fn passes_predicates(&self, member: &Member<'_>) -> bool {
        let kind = member.kind();
        self.predicates
            .iter()
            .filter(|(k, _)| *k == kind)
            .all(|(_, predicate)| predicate(member))
    }

    /// Whether a field is visible in the diagram
    pub fn accepts_field(&self, owner: &TypeDescriptor, field: &FieldDescriptor) -> bool {
        if field.name.starts_with(SYNTHETIC_PREFIX) {
            return false;
        }
        // enum constants are static but stay visible
        if field.is_static && !owner.kind().is_enum() {
            return false;
        }
        let member = Member::Field { owner, field };
        !self.is_excluded(&member) && self.passes_predicates(&member)
    }

    /// Whether a method is visible in the diagram
    pub fn accepts_method(&self, owner: &TypeDescriptor, method: &MethodDescriptor) -> bool {
        if method.name.starts_with(SYNTHETIC_PREFIX)
            || method.is_static
            || !method.visibility.is_public()
            || DEFAULT_EXCLUDED_METHODS.contains(&method.name.as_str())
            || is_accessor(owner, method)
        {
            return false;
        }
        let member = Member::Method { owner, method };
        !self.is_excluded(&member) && self.passes_predicates(&member)
    }

    /// Whether a parameter of a visible method may contribute a use edge
    pub fn accepts_parameter(
        &self,
        owner: &TypeDescriptor,
        method: &MethodDescriptor,
        parameter: &ParameterDescriptor,
    ) -> bool {
        let member = Member::Parameter {
            owner,
            method,
            parameter,
        };
        self.passes_predicates(&member)
    }

    /// Visible fields of a type, in declaration order
    pub fn visible_fields<'a>(
        &'a self,
        owner: &'a TypeDescriptor,
    ) -> impl Iterator<Item = &'a FieldDescriptor> + 'a {
        owner
            .fields()
            .iter()
            .filter(move |field| self.accepts_field(owner, field))
    }

    /// Visible methods of a type, in declaration order
    pub fn visible_methods<'a>(
        &'a self,
        owner: &'a TypeDescriptor,
    ) -> impl Iterator<Item = &'a MethodDescriptor> + 'a {
        owner
            .methods()
            .iter()
            .filter(move |method| self.accepts_method(owner, method))
    }
}

/// Property name behind an accessor-style method name, if any
fn property_name(method: &MethodDescriptor) -> Option<(String, bool)> {
    let (rest, is_setter) = if let Some(rest) = method.name.strip_prefix("get") {
        (rest, false)
    } else if let Some(rest) = method.name.strip_prefix("is") {
        (rest, false)
    } else if let Some(rest) = method.name.strip_prefix("set") {
        (rest, true)
    } else {
        return None;
    };
    let mut chars = rest.chars();
    let first = chars.next()?;
    if !first.is_uppercase() {
        return None;
    }
    Some((first.to_lowercase().chain(chars).collect(), is_setter))
}

fn same_type(field: &FieldDescriptor, ty: &TypeRef, generics: &[TypeRef]) -> bool {
    field.declared_type == *ty && field.generic_arguments == generics
}

/// Getter or setter for a field of the owning type with the same name and type
pub fn is_accessor(owner: &TypeDescriptor, method: &MethodDescriptor) -> bool {
    let Some((property, is_setter)) = property_name(method) else {
        return false;
    };
    let Some(field) = owner.field(&property) else {
        return false;
    };
    if is_setter {
        method.return_type.is_none()
            && method.parameters.len() == 1
            && same_type(
                field,
                &method.parameters[0].declared_type,
                &method.parameters[0].generic_arguments,
            )
    } else {
        method.parameters.is_empty()
            && method
                .return_type
                .as_ref()
                .is_some_and(|ty| same_type(field, ty, &method.return_generic_arguments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Visibility;

    fn car() -> TypeDescriptor {
        TypeDescriptor::class("com.acme.Car")
            .with_field(FieldDescriptor::new("brand", TypeRef::parse("String")))
            .with_field(FieldDescriptor::new("ignored", TypeRef::parse("String")))
            .with_field(FieldDescriptor::new("COUNT", TypeRef::parse("int")).static_member())
            .with_method(
                MethodDescriptor::new("getBrand").returning(TypeRef::parse("String")),
            )
            .with_method(
                MethodDescriptor::new("setBrand")
                    .with_parameter(ParameterDescriptor::new("brand", TypeRef::parse("String"))),
            )
            .with_method(MethodDescriptor::new("toString").returning(TypeRef::parse("String")))
            .with_method(MethodDescriptor::new("drive"))
            .with_method(MethodDescriptor::new("tune").with_visibility(Visibility::Private))
            .with_method(MethodDescriptor::new("create").static_member())
    }

    #[test]
    fn test_default_field_filter() {
        let car = car();
        let filter = MemberFilter::new();
        let names: Vec<_> = filter.visible_fields(&car).map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["brand", "ignored"]);
    }

    #[test]
    fn test_enum_constants_stay_visible() {
        let devise = TypeDescriptor::enumeration("com.acme.Devise")
            .with_constant("CHF")
            .with_constant("EUR");
        let filter = MemberFilter::new();
        assert_eq!(filter.visible_fields(&devise).count(), 2);
    }

    #[test]
    fn test_default_method_filter() {
        let car = car();
        let filter = MemberFilter::new();
        let names: Vec<_> = filter.visible_methods(&car).map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["drive"]);
    }

    #[test]
    fn test_exclude_patterns_any_match() {
        let car = car();
        let mut filter = MemberFilter::new();
        filter.exclude(r".*\.ignored").unwrap();
        filter.exclude("nothing").unwrap();
        let names: Vec<_> = filter.visible_fields(&car).map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["brand"]);
    }

    #[test]
    fn test_exclude_is_full_match() {
        let car = car();
        let mut filter = MemberFilter::new();
        filter.exclude("ignored").unwrap();
        assert_eq!(filter.visible_fields(&car).count(), 2);
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let mut filter = MemberFilter::new();
        let err = filter.exclude("(unclosed").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_predicates_compose_with_and() {
        let car = TypeDescriptor::class("a.Car")
            .with_field(FieldDescriptor::new("brand", TypeRef::parse("String")).with_annotation("Machine"))
            .with_field(FieldDescriptor::new("model", TypeRef::parse("String")).with_annotation("Machine"))
            .with_field(FieldDescriptor::new("price", TypeRef::parse("int")));
        let mut filter = MemberFilter::new();
        filter.add_field_predicate(|_, f| f.has_annotation("Machine"));
        filter.add_field_predicate(|_, f| f.name != "model");
        let names: Vec<_> = filter.visible_fields(&car).map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["brand"]);
    }

    #[test]
    fn test_method_predicate_does_not_touch_fields() {
        let car = car();
        let mut filter = MemberFilter::new();
        filter.add_method_predicate(|_, _| false);
        assert_eq!(filter.visible_methods(&car).count(), 0);
        assert_eq!(filter.visible_fields(&car).count(), 2);
    }

    #[test]
    fn test_accessor_detection() {
        let car = car();
        let getter = &car.methods()[0];
        let setter = &car.methods()[1];
        assert!(is_accessor(&car, getter));
        assert!(is_accessor(&car, setter));

        // a getter whose type differs from the field is a real method
        let odd = MethodDescriptor::new("getBrand").returning(TypeRef::parse("int"));
        assert!(!is_accessor(&car, &odd));
        // no backing field
        let derived = MethodDescriptor::new("getSpeed").returning(TypeRef::parse("int"));
        assert!(!is_accessor(&car, &derived));
    }

    #[test]
    fn test_member_qualified_name() {
        let car = car();
        let field = &car.fields()[0];
        let member = Member::Field { owner: &car, field };
        assert_eq!(member.qualified_name(), "com.acme.Car.brand");
        assert_eq!(member.kind(), MemberKind::Field);
    }
}
