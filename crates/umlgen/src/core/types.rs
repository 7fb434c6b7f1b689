//! Core type definitions for diagram building
//!
//! Small value enums shared by descriptors, the diagram model and the
//! renderer: type kinds, member visibility, cardinalities, association
//! kinds and package styles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a modeled type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Concrete class: `class`
    #[default]
    Class,
    /// Abstract class: `abstract class`
    Abstract,
    /// Interface: `interface`
    Interface,
    /// Enumeration: `enum`
    Enum,
}

impl TypeKind {
    /// Returns true for enumerations
    pub fn is_enum(&self) -> bool {
        matches!(self, TypeKind::Enum)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Class => write!(f, "class"),
            TypeKind::Abstract => write!(f, "abstract class"),
            TypeKind::Interface => write!(f, "interface"),
            TypeKind::Enum => write!(f, "enum"),
        }
    }
}

/// Visibility of a declared member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

/// Cardinality at one end of an association
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, PartialOrd, Ord)]
pub enum Cardinality {
    /// No cardinality marker
    #[default]
    None,
    /// Many: `"*"`
    Many,
}

impl Cardinality {
    /// The marker written on the association line, if any
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            Cardinality::None => None,
            Cardinality::Many => Some("*"),
        }
    }

    /// Many wins over none
    pub fn upgrade(self, other: Cardinality) -> Cardinality {
        self.max(other)
    }
}

/// Kind of an association edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssociationKind {
    /// Supertype to subtype: `<|--`
    Inheritance,
    /// Ownership from one end: `-->`
    Directed,
    /// Ownership from both ends: `<->`
    Bidirected,
    /// Weak dependency inferred from a method signature, drawn as `-->`
    Use,
    /// Plain undirected link: `-`
    Link,
}

impl AssociationKind {
    /// The fixed marker used on the association line
    pub fn symbol(&self) -> &'static str {
        match self {
            AssociationKind::Inheritance => "<|--",
            AssociationKind::Directed | AssociationKind::Use => "-->",
            AssociationKind::Bidirected => "<->",
            AssociationKind::Link => "-",
        }
    }

    /// Returns true for field-based (ownership) edges
    pub fn is_ownership(&self) -> bool {
        matches!(self, AssociationKind::Directed | AssociationKind::Bidirected)
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Visual style of a package block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageStyle {
    Node,
    Rectangle,
    #[default]
    Folder,
    Frame,
    Cloud,
    Database,
}

impl fmt::Display for PackageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageStyle::Node => write!(f, "Node"),
            PackageStyle::Rectangle => write!(f, "Rectangle"),
            PackageStyle::Folder => write!(f, "Folder"),
            PackageStyle::Frame => write!(f, "Frame"),
            PackageStyle::Cloud => write!(f, "Cloud"),
            PackageStyle::Database => write!(f, "Database"),
        }
    }
}
