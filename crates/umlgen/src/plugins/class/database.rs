//! Class diagram database
//!
//! The canonical intermediate representation handed to the renderer: type
//! blocks with their attributes and methods, associations, package groups and
//! pass-through header, footer, title and option text. Names are already
//! resolved, so rendering needs nothing else.

use anyhow::Result;
use tracing::{debug, trace};

use crate::core::{
    require_not_blank, AssociationKind, Cardinality, Database, DiagramError, DiagramResult, Link,
    PackageStyle, TypeKind,
};

/// An attribute line in a type body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub type_name: Option<String>,
    pub link: Option<Link>,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            link: None,
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }
}

/// A method line in a type body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    /// Parameter type names, in declaration order
    pub parameters: Vec<String>,
    pub return_type: Option<String>,
    pub link: Option<Link>,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
            link: None,
        }
    }

    pub fn with_parameter(mut self, type_name: impl Into<String>) -> Self {
        self.parameters.push(type_name.into());
        self
    }

    pub fn with_return_type(mut self, type_name: impl Into<String>) -> Self {
        self.return_type = Some(type_name.into());
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }
}

/// A type block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramType {
    pub name: String,
    pub kind: TypeKind,
    pub stereotypes: Vec<String>,
    pub link: Option<Link>,
    pub background_color: Option<String>,
    pub attributes: Vec<Attribute>,
    pub methods: Vec<Operation>,
}

impl DiagramType {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            stereotypes: Vec::new(),
            link: None,
            background_color: None,
            attributes: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_stereotype(mut self, stereotype: impl Into<String>) -> Self {
        self.stereotypes.push(stereotype.into());
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn add_method(&mut self, method: Operation) {
        self.methods.push(method);
    }

    /// A body is only written when there is something to list
    pub fn has_content(&self) -> bool {
        !self.attributes.is_empty() || !self.methods.is_empty()
    }

    pub fn validate(&self) -> DiagramResult<()> {
        require_not_blank(&self.name, "Class name")
    }
}

/// An association line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub from: String,
    pub to: String,
    pub kind: AssociationKind,
    pub label: Option<String>,
    pub from_cardinality: Cardinality,
    pub to_cardinality: Cardinality,
}

impl Association {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: AssociationKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            label: None,
            from_cardinality: Cardinality::None,
            to_cardinality: Cardinality::None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_cardinalities(mut self, from: Cardinality, to: Cardinality) -> Self {
        self.from_cardinality = from;
        self.to_cardinality = to;
        self
    }

    pub fn validate(&self) -> DiagramResult<()> {
        require_not_blank(&self.from, "Association origin name")?;
        require_not_blank(&self.to, "Association destination name")
    }

    /// Emission order: endpoint names concatenated, then kind and label
    pub fn sort_key(&self) -> (String, AssociationKind, Option<&str>, Cardinality, Cardinality) {
        (
            format!("{}{}", self.from, self.to),
            self.kind,
            self.label.as_deref(),
            self.from_cardinality,
            self.to_cardinality,
        )
    }
}

/// One type listed inside a package block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMember {
    pub name: String,
    pub kind: TypeKind,
}

/// A package grouping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub style: PackageStyle,
    pub color: Option<String>,
    pub members: Vec<PackageMember>,
}

impl Package {
    pub fn new(name: impl Into<String>, style: PackageStyle) -> Self {
        Self {
            name: name.into(),
            style,
            color: None,
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, name: impl Into<String>, kind: TypeKind) -> Self {
        self.members.push(PackageMember {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn validate(&self) -> DiagramResult<()> {
        require_not_blank(&self.name, "Package name")?;
        if self.members.is_empty() {
            return Err(DiagramError::configuration(format!(
                "Package '{}' must not be empty",
                self.name
            )));
        }
        self.members
            .iter()
            .try_for_each(|m| require_not_blank(&m.name, "Class name"))
    }
}

/// Class diagram database
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramModel {
    header: Option<String>,
    footer: Option<String>,
    title: Option<String>,
    start_options: Vec<String>,
    end_options: Vec<String>,
    packages: Vec<Package>,
    types: Vec<DiagramType>,
    associations: Vec<Association>,
}

impl DiagramModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_header(&mut self, header: Option<String>) {
        self.header = header;
    }

    pub fn set_footer(&mut self, footer: Option<String>) {
        self.footer = footer;
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn set_start_options(&mut self, options: Vec<String>) {
        self.start_options = options;
    }

    pub fn set_end_options(&mut self, options: Vec<String>) {
        self.end_options = options;
    }

    pub fn add_type(&mut self, diagram_type: DiagramType) -> DiagramResult<()> {
        diagram_type.validate()?;
        trace!(type_name = %diagram_type.name, kind = %diagram_type.kind, "Adding type to model");
        self.types.push(diagram_type);
        debug!(type_count = self.types.len(), "Type added");
        Ok(())
    }

    pub fn add_association(&mut self, association: Association) -> DiagramResult<()> {
        association.validate()?;
        trace!(
            from = %association.from,
            to = %association.to,
            kind = ?association.kind,
            label = ?association.label,
            "Adding association to model"
        );
        self.associations.push(association);
        Ok(())
    }

    pub fn add_package(&mut self, package: Package) -> DiagramResult<()> {
        package.validate()?;
        trace!(package = %package.name, members = package.members.len(), "Adding package to model");
        self.packages.push(package);
        Ok(())
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn footer(&self) -> Option<&str> {
        self.footer.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn start_options(&self) -> &[String] {
        &self.start_options
    }

    pub fn end_options(&self) -> &[String] {
        &self.end_options
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn types(&self) -> &[DiagramType] {
        &self.types
    }

    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    pub fn get_type(&self, name: &str) -> Option<&DiagramType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Associations in emission order
    pub fn sorted_associations(&self) -> Vec<&Association> {
        let mut sorted: Vec<&Association> = self.associations.iter().collect();
        sorted.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        sorted
    }

    /// Associations between two names, in either direction
    pub fn associations_between(&self, a: &str, b: &str) -> Vec<&Association> {
        self.associations
            .iter()
            .filter(|assoc| {
                (assoc.from == a && assoc.to == b) || (assoc.from == b && assoc.to == a)
            })
            .collect()
    }
}

impl Database for DiagramModel {
    type Node = DiagramType;
    type Edge = Association;

    fn add_node(&mut self, node: Self::Node) -> Result<()> {
        Ok(self.add_type(node)?)
    }

    fn add_edge(&mut self, edge: Self::Edge) -> Result<()> {
        Ok(self.add_association(edge)?)
    }

    fn get_node(&self, name: &str) -> Option<&Self::Node> {
        self.get_type(name)
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.types.iter()
    }

    fn edges(&self) -> impl Iterator<Item = &Self::Edge> {
        self.associations.iter()
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn node_count(&self) -> usize {
        self.types.len()
    }

    fn edge_count(&self) -> usize {
        self.associations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_empty_type() {
        let t = DiagramType::new("Wheel", TypeKind::Class);
        assert_eq!(t.name, "Wheel");
        assert!(!t.has_content());
        assert!(t.link.is_none());
    }

    #[test]
    fn test_add_attributes_and_methods() {
        let mut car = DiagramType::new("Car", TypeKind::Class);
        car.add_attribute(Attribute::new("brand").with_type("String"));
        car.add_method(Operation::new("drive").with_parameter("Driver"));
        assert!(car.has_content());
        assert_eq!(car.attributes[0].type_name.as_deref(), Some("String"));
        assert_eq!(car.methods[0].parameters, vec!["Driver".to_string()]);
    }

    #[test]
    fn test_blank_type_name_rejected() {
        let mut model = DiagramModel::new();
        let err = model.add_type(DiagramType::new("  ", TypeKind::Class)).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(model.node_count(), 0);
    }

    #[test]
    fn test_blank_association_endpoint_rejected() {
        let mut model = DiagramModel::new();
        let err = model
            .add_association(Association::new("Car", "", AssociationKind::Directed))
            .unwrap_err();
        assert!(err.to_string().contains("Association destination name"));
    }

    #[test]
    fn test_empty_package_rejected() {
        let mut model = DiagramModel::new();
        let err = model
            .add_package(Package::new("com.acme", PackageStyle::Folder))
            .unwrap_err();
        assert!(err.to_string().contains("Package 'com.acme' must not be empty"));
    }

    #[test]
    fn test_sorted_associations() {
        let mut model = DiagramModel::new();
        model
            .add_association(Association::new("Price", "Devise", AssociationKind::Directed))
            .unwrap();
        model
            .add_association(Association::new("Car", "Wheel", AssociationKind::Directed))
            .unwrap();
        model
            .add_association(Association::new("Car", "Price", AssociationKind::Directed))
            .unwrap();
        let order: Vec<_> = model
            .sorted_associations()
            .iter()
            .map(|a| format!("{}{}", a.from, a.to))
            .collect();
        assert_eq!(order, vec!["CarPrice", "CarWheel", "PriceDevise"]);
    }

    #[test]
    fn test_database_trait() {
        let mut model = DiagramModel::new();
        model.add_node(DiagramType::new("Car", TypeKind::Class)).unwrap();
        model
            .add_edge(Association::new("Car", "Car", AssociationKind::Directed))
            .unwrap();
        assert!(model.get_node("Car").is_some());
        assert_eq!(model.nodes().count(), 1);
        assert_eq!(model.edge_count(), 1);
        model.clear();
        assert_eq!(model.node_count(), 0);
        assert_eq!(model.edge_count(), 0);
    }
}
