//! JSON type manifests
//!
//! A manifest describes types as plain data so that any front end (a source
//! scanner, a build script, a hand-written file) can feed the builder. It
//! loads into a [`TypeRegistry`].
//!
//! ```json
//! {
//!   "types": [
//!     {
//!       "name": "com.acme.Car",
//!       "kind": "class",
//!       "supertypes": ["com.acme.Vehicule"],
//!       "fields": [{ "name": "wheels", "type": "Collection<com.acme.Wheel>" }],
//!       "methods": [{ "name": "drive", "parameters": [{ "name": "driver", "type": "com.acme.Driver" }] }]
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::descriptor::{
    FieldDescriptor, MethodDescriptor, ParameterDescriptor, TypeDescriptor, TypeHandle, TypeRef,
    TypeRegistry,
};
use super::error::{DiagramError, DiagramResult};
use super::types::{TypeKind, Visibility};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub types: Vec<TypeEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeEntry {
    pub name: String,
    pub kind: TypeKind,
    pub package: Option<String>,
    pub supertypes: Vec<String>,
    pub stereotypes: Vec<String>,
    /// Enum constant names
    pub constants: Vec<String>,
    pub fields: Vec<FieldEntry>,
    pub methods: Vec<MethodEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub generics: Vec<String>,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub visibility: Option<Visibility>,
    pub annotations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub generics: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodEntry {
    pub name: String,
    pub parameters: Vec<ParameterEntry>,
    pub returns: Option<String>,
    pub return_generics: Vec<String>,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub visibility: Option<Visibility>,
    pub annotations: Vec<String>,
}

/// Split `Base<A, B>` into its base and top-level arguments
///
/// An argument that is parameterized itself becomes
/// [`TypeRef::Parameterized`]: it is shown in the attribute type but never
/// resolved, so it contributes no association.
pub fn parse_type_expression(text: &str) -> DiagramResult<(TypeRef, Vec<TypeRef>)> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DiagramError::manifest("type must not be blank"));
    }
    let Some(open) = text.find('<') else {
        if text.contains('>') {
            return Err(DiagramError::manifest(format!("unbalanced generics in '{text}'")));
        }
        return Ok((TypeRef::parse(text), Vec::new()));
    };
    let inner = text[open + 1..]
        .strip_suffix('>')
        .ok_or_else(|| DiagramError::manifest(format!("unbalanced generics in '{text}'")))?;
    let arguments = split_arguments(inner)
        .ok_or_else(|| DiagramError::manifest(format!("unbalanced generics in '{text}'")))?
        .into_iter()
        .map(parse_argument)
        .collect::<DiagramResult<Vec<_>>>()?;
    Ok((TypeRef::parse(&text[..open]), arguments))
}

/// Comma-separated arguments at nesting depth zero, `None` when unbalanced
fn split_arguments(inner: &str) -> Option<Vec<&str>> {
    let mut arguments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                arguments.push(inner[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    arguments.push(inner[start..].trim());
    Some(arguments.into_iter().filter(|arg| !arg.is_empty()).collect())
}

fn parse_argument(text: &str) -> DiagramResult<TypeRef> {
    if !text.contains('<') {
        return Ok(TypeRef::parse(text));
    }
    let (base, generics) = parse_type_expression(text)?;
    Ok(TypeRef::parameterized(&base, &generics))
}

fn with_generics(
    base: (TypeRef, Vec<TypeRef>),
    explicit: &[String],
) -> DiagramResult<(TypeRef, Vec<TypeRef>)> {
    let (ty, mut generics) = base;
    for argument in explicit {
        generics.push(parse_argument(argument.trim())?);
    }
    Ok((ty, generics))
}

impl FieldEntry {
    fn to_descriptor(&self) -> DiagramResult<FieldDescriptor> {
        let (ty, generics) = with_generics(parse_type_expression(&self.type_name)?, &self.generics)?;
        let mut field = FieldDescriptor::new(&self.name, ty).with_generics(generics);
        field.is_static = self.is_static;
        if let Some(visibility) = self.visibility {
            field.visibility = visibility;
        }
        field.annotations = self.annotations.clone();
        Ok(field)
    }
}

impl ParameterEntry {
    fn to_descriptor(&self) -> DiagramResult<ParameterDescriptor> {
        let (ty, generics) = with_generics(parse_type_expression(&self.type_name)?, &self.generics)?;
        Ok(ParameterDescriptor::new(&self.name, ty).with_generics(generics))
    }
}

impl MethodEntry {
    fn to_descriptor(&self) -> DiagramResult<MethodDescriptor> {
        let mut method = MethodDescriptor::new(&self.name);
        for parameter in &self.parameters {
            method = method.with_parameter(parameter.to_descriptor()?);
        }
        if let Some(returns) = self.returns.as_deref() {
            let (ty, generics) =
                with_generics(parse_type_expression(returns)?, &self.return_generics)?;
            method = method.returning(ty).with_return_generics(generics);
        }
        method.is_static = self.is_static;
        if let Some(visibility) = self.visibility {
            method.visibility = visibility;
        }
        method.annotations = self.annotations.clone();
        Ok(method)
    }
}

impl TypeEntry {
    pub fn to_descriptor(&self) -> DiagramResult<TypeDescriptor> {
        if self.name.trim().is_empty() {
            return Err(DiagramError::manifest("type name must not be blank"));
        }
        let mut descriptor = TypeDescriptor::new(self.name.trim(), self.kind);
        if let Some(package) = &self.package {
            descriptor = descriptor.in_package(package.as_str());
        }
        for supertype in &self.supertypes {
            descriptor = descriptor.with_supertype(TypeHandle::new(supertype.trim()));
        }
        for stereotype in &self.stereotypes {
            descriptor = descriptor.with_stereotype(stereotype.as_str());
        }
        if !self.constants.is_empty() && !self.kind.is_enum() {
            return Err(DiagramError::manifest(format!(
                "type '{}' declares constants but is not an enum",
                self.name
            )));
        }
        for constant in &self.constants {
            descriptor = descriptor.with_constant(constant.as_str());
        }
        for field in &self.fields {
            descriptor = descriptor.with_field(field.to_descriptor()?);
        }
        for method in &self.methods {
            descriptor = descriptor.with_method(method.to_descriptor()?);
        }
        Ok(descriptor)
    }
}

impl Manifest {
    pub fn from_json_str(json: &str) -> DiagramResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> DiagramResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Convert every entry; a type may only be described once
    pub fn into_registry(self) -> DiagramResult<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        for entry in &self.types {
            let descriptor = entry.to_descriptor()?;
            if registry.get(descriptor.handle()).is_some() {
                return Err(DiagramError::manifest(format!(
                    "type '{}' is described twice",
                    descriptor.qualified_name()
                )));
            }
            trace!(type_name = %descriptor.qualified_name(), kind = %descriptor.kind(), "Registered type");
            registry.register(descriptor);
        }
        debug!(type_count = registry.len(), "Loaded manifest");
        Ok(registry)
    }
}

/// Read a manifest file into a registry
pub fn load_manifest(path: impl AsRef<Path>) -> DiagramResult<TypeRegistry> {
    Manifest::from_path(path)?.into_registry()
}

/// Parse manifest JSON into a registry
pub fn parse_manifest(json: &str) -> DiagramResult<TypeRegistry> {
    Manifest::from_json_str(json)?.into_registry()
}
