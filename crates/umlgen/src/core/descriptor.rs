//! Type descriptors: immutable snapshots of a modeled type's shape
//!
//! Descriptors are supplied by an [`Introspector`] (static analysis, code
//! generation, a JSON manifest or manual registration). The core never
//! queries a live type system.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::types::{TypeKind, Visibility};

/// Prefix reserved for compiler-synthetic members
pub const SYNTHETIC_PREFIX: char = '$';

const NESTING_SEPARATOR: char = '$';

/// Built-in primitive, boxed, void and string-like type names
const PRIMITIVES: &[&str] = &[
    "byte", "short", "int", "long", "float", "double", "boolean", "char", "void", "Byte", "Short",
    "Integer", "Long", "Float", "Double", "Boolean", "Character", "Void", "String", "Object",
    "Number", "CharSequence", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32",
    "u64", "u128", "usize", "f32", "f64", "bool", "str", "()",
];

/// Built-in collection-like container names
const COLLECTIONS: &[&str] = &[
    "Collection", "List", "ArrayList", "LinkedList", "Set", "HashSet", "LinkedHashSet",
    "TreeSet", "SortedSet", "Map", "HashMap", "LinkedHashMap", "TreeMap", "SortedMap",
    "Iterable", "Queue", "Deque", "ArrayDeque", "Vec", "VecDeque", "BTreeMap", "BTreeSet",
];

/// Packages whose members count as language built-ins
const BUILTIN_PACKAGES: &[&str] = &["java.lang.", "java.util.", "std::collections::"];

/// Opaque identity of a modeled type
///
/// Two handles are equal when they denote the same underlying type, which
/// is keyed by the fully qualified name, never by the display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle(Arc<str>);

impl TypeHandle {
    pub fn new(qualified_name: impl AsRef<str>) -> Self {
        Self(Arc::from(qualified_name.as_ref()))
    }

    pub fn qualified_name(&self) -> &str {
        &self.0
    }

    /// Package part of the qualified name, if any
    pub fn package(&self) -> Option<&str> {
        self.0.rfind('.').map(|idx| &self.0[..idx])
    }

    /// Simple display name
    ///
    /// Takes the last segment; for nested names the part after the last
    /// nesting separator, with any numeric prefix of local and anonymous
    /// types stripped. A purely numeric segment is kept as is.
    pub fn simple_name(&self) -> &str {
        let segment = match self.0.rfind('.') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        };
        match segment.rfind(NESTING_SEPARATOR) {
            Some(idx) => {
                let inner = &segment[idx + 1..];
                let stripped = inner.trim_start_matches(|c: char| c.is_ascii_digit());
                if stripped.is_empty() {
                    inner
                } else {
                    stripped
                }
            }
            None => segment,
        }
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeHandle {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A reference to a type from a member signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Language built-in primitive, boxed, void or string-like value type
    Primitive(String),
    /// Built-in collection-like container
    Collection(String),
    /// Any other type, resolved through the introspector
    Named(TypeHandle),
    /// A generic argument that is itself parameterized, e.g. `List<Wheel>`
    /// inside `Map<String, List<Wheel>>`
    ///
    /// Kept for display only; it never resolves to a type.
    Parameterized(String),
}

impl TypeRef {
    /// Classify a type name written in a signature
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        let local = BUILTIN_PACKAGES
            .iter()
            .find_map(|prefix| name.strip_prefix(*prefix))
            .unwrap_or(name);
        let unqualified = !local.contains('.') && !local.contains("::");
        if unqualified && PRIMITIVES.contains(&local) {
            TypeRef::Primitive(local.to_string())
        } else if unqualified && COLLECTIONS.contains(&local) {
            TypeRef::Collection(local.to_string())
        } else {
            TypeRef::Named(TypeHandle::new(name))
        }
    }

    pub fn named(qualified_name: impl AsRef<str>) -> Self {
        TypeRef::Named(TypeHandle::new(qualified_name))
    }

    /// A parameterized argument written as `Base<Args>` with display names
    pub fn parameterized(base: &TypeRef, generics: &[TypeRef]) -> Self {
        TypeRef::Parameterized(display_with_generics(base, generics))
    }

    pub fn handle(&self) -> Option<&TypeHandle> {
        match self {
            TypeRef::Named(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, TypeRef::Collection(_))
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, TypeRef::Primitive(_) | TypeRef::Collection(_))
    }

    /// Name written in attribute and signature types
    pub fn display_name(&self) -> &str {
        match self {
            TypeRef::Primitive(name)
            | TypeRef::Collection(name)
            | TypeRef::Parameterized(name) => name,
            TypeRef::Named(handle) => handle.simple_name(),
        }
    }
}

/// `Base<Arg1, Arg2>` or `Base`
fn display_with_generics(base: &TypeRef, generics: &[TypeRef]) -> String {
    if generics.is_empty() {
        return base.display_name().to_string();
    }
    let args: Vec<&str> = generics.iter().map(TypeRef::display_name).collect();
    format!("{}<{}>", base.display_name(), args.join(", "))
}

/// Named handles of a type and its generic arguments, deduplicated in order
fn concerned_handles<'a>(base: &'a TypeRef, generics: &'a [TypeRef]) -> Vec<&'a TypeHandle> {
    let mut seen = HashSet::new();
    std::iter::once(base)
        .chain(generics.iter())
        .filter_map(TypeRef::handle)
        .filter(|handle| seen.insert(*handle))
        .collect()
}

/// A declared field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub declared_type: TypeRef,
    pub generic_arguments: Vec<TypeRef>,
    pub is_enum_constant: bool,
    pub is_static: bool,
    pub visibility: Visibility,
    pub annotations: Vec<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, declared_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            declared_type,
            generic_arguments: Vec::new(),
            is_enum_constant: false,
            is_static: false,
            visibility: Visibility::Private,
            annotations: Vec::new(),
        }
    }

    /// An enum constant: static, public, typed by its enum
    pub fn enum_constant(name: impl Into<String>, enum_type: &TypeHandle) -> Self {
        Self {
            is_enum_constant: true,
            is_static: true,
            visibility: Visibility::Public,
            ..Self::new(name, TypeRef::Named(enum_type.clone()))
        }
    }

    pub fn with_generics(mut self, generics: impl IntoIterator<Item = TypeRef>) -> Self {
        self.generic_arguments = generics.into_iter().collect();
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn has_annotation(&self, annotation: &str) -> bool {
        self.annotations.iter().any(|a| a == annotation)
    }

    pub fn is_collection(&self) -> bool {
        self.declared_type.is_collection()
    }

    pub fn type_name(&self) -> String {
        display_with_generics(&self.declared_type, &self.generic_arguments)
    }

    /// Named types this field refers to, declared type first
    pub fn concerned_types(&self) -> Vec<&TypeHandle> {
        concerned_handles(&self.declared_type, &self.generic_arguments)
    }
}

/// A method parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub declared_type: TypeRef,
    pub generic_arguments: Vec<TypeRef>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, declared_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            declared_type,
            generic_arguments: Vec::new(),
        }
    }

    pub fn with_generics(mut self, generics: impl IntoIterator<Item = TypeRef>) -> Self {
        self.generic_arguments = generics.into_iter().collect();
        self
    }

    pub fn type_name(&self) -> String {
        display_with_generics(&self.declared_type, &self.generic_arguments)
    }

    pub fn concerned_types(&self) -> Vec<&TypeHandle> {
        concerned_handles(&self.declared_type, &self.generic_arguments)
    }
}

/// A declared method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub parameters: Vec<ParameterDescriptor>,
    /// `None` means the method returns no value
    pub return_type: Option<TypeRef>,
    pub return_generic_arguments: Vec<TypeRef>,
    pub is_static: bool,
    pub visibility: Visibility,
    pub annotations: Vec<String>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
            return_generic_arguments: Vec::new(),
            is_static: false,
            visibility: Visibility::Public,
            annotations: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returning(mut self, return_type: TypeRef) -> Self {
        self.return_type = match return_type {
            TypeRef::Primitive(ref name) if name == "void" || name == "()" => None,
            other => Some(other),
        };
        self
    }

    pub fn with_return_generics(mut self, generics: impl IntoIterator<Item = TypeRef>) -> Self {
        self.return_generic_arguments = generics.into_iter().collect();
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn return_type_name(&self) -> Option<String> {
        self.return_type
            .as_ref()
            .map(|ty| display_with_generics(ty, &self.return_generic_arguments))
    }

    /// Named types in the return type and its generic arguments
    pub fn concerned_return_types(&self) -> Vec<&TypeHandle> {
        match &self.return_type {
            Some(ty) => concerned_handles(ty, &self.return_generic_arguments),
            None => Vec::new(),
        }
    }
}

/// Immutable view of one modeled type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    handle: TypeHandle,
    kind: TypeKind,
    name: String,
    package: Option<String>,
    supertypes: Vec<TypeHandle>,
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodDescriptor>,
    stereotypes: Vec<String>,
}

impl TypeDescriptor {
    pub fn new(qualified_name: impl AsRef<str>, kind: TypeKind) -> Self {
        let handle = TypeHandle::new(qualified_name);
        Self {
            name: handle.simple_name().to_string(),
            package: handle.package().map(str::to_string),
            handle,
            kind,
            supertypes: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            stereotypes: Vec::new(),
        }
    }

    pub fn class(qualified_name: impl AsRef<str>) -> Self {
        Self::new(qualified_name, TypeKind::Class)
    }

    pub fn interface(qualified_name: impl AsRef<str>) -> Self {
        Self::new(qualified_name, TypeKind::Interface)
    }

    pub fn abstract_class(qualified_name: impl AsRef<str>) -> Self {
        Self::new(qualified_name, TypeKind::Abstract)
    }

    pub fn enumeration(qualified_name: impl AsRef<str>) -> Self {
        Self::new(qualified_name, TypeKind::Enum)
    }

    pub fn in_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Supertypes keep declaration order; duplicates are ignored
    pub fn with_supertype(mut self, supertype: impl Into<TypeHandle>) -> Self {
        let supertype = supertype.into();
        if !self.supertypes.contains(&supertype) {
            self.supertypes.push(supertype);
        }
        self
    }

    /// Compiler-synthetic fields are dropped
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        if !field.name.starts_with(SYNTHETIC_PREFIX) {
            self.fields.push(field);
        }
        self
    }

    /// Adds an enum constant typed by this enum
    pub fn with_constant(self, name: impl Into<String>) -> Self {
        let constant = FieldDescriptor::enum_constant(name, &self.handle);
        self.with_field(constant)
    }

    /// Compiler-synthetic methods are dropped
    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        if !method.name.starts_with(SYNTHETIC_PREFIX) {
            self.methods.push(method);
        }
        self
    }

    pub fn with_stereotype(mut self, stereotype: impl Into<String>) -> Self {
        self.stereotypes.push(stereotype.into());
        self
    }

    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Default display name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> &str {
        self.handle.qualified_name()
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn supertypes(&self) -> &[TypeHandle] {
        &self.supertypes
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn stereotypes(&self) -> &[String] {
        &self.stereotypes
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Supplies type descriptors to the core
///
/// Implementations must be pure and stable for the duration of one build.
pub trait Introspector {
    /// Describe a type, or `None` when the reference cannot be resolved
    fn describe(&self, handle: &TypeHandle) -> Option<TypeDescriptor>;

    /// All types declared in a package, in a stable order
    fn package_types(&self, package: &str) -> Vec<TypeHandle>;
}

/// In-memory introspector populated by registration
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<TypeHandle, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any previous one for the same type
    pub fn register(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.types.insert(descriptor.handle().clone(), descriptor);
        self
    }

    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn get(&self, handle: &TypeHandle) -> Option<&TypeDescriptor> {
        self.types.get(handle)
    }

    pub fn handles(&self) -> impl Iterator<Item = &TypeHandle> {
        self.types.keys()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Introspector for TypeRegistry {
    fn describe(&self, handle: &TypeHandle) -> Option<TypeDescriptor> {
        self.types.get(handle).cloned()
    }

    fn package_types(&self, package: &str) -> Vec<TypeHandle> {
        self.types
            .values()
            .filter(|d| d.package() == Some(package))
            .map(|d| d.handle().clone())
            .collect()
    }
}
