//! Diagram configuration
//!
//! [`DiagramOptions`] is the serializable part (JSON files, CLI flags).
//! [`DiagramConfig`] adds what only code can provide: member predicates and
//! name and link resolvers.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{
    DefaultResolver, DiagramError, DiagramResult, FieldDescriptor, LinkResolver, MemberFilter,
    MethodDescriptor, NameResolver, PackageStyle, TypeDescriptor,
};

/// Order in which type blocks are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeOrder {
    /// Display name, then qualified name
    #[default]
    Name,
    /// Explicit types, then package types, then discovered types
    Declaration,
}

/// Serializable diagram options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramOptions {
    /// Qualified names of types drawn explicitly
    pub types: Vec<String>,
    /// Packages whose every type is drawn
    pub packages: Vec<String>,
    /// Full-match patterns over `declaringType.memberName`
    pub excludes: Vec<String>,
    /// Pull in reachable resolvable types
    pub expand_dependencies: bool,
    pub hide_self_links: bool,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub title: Option<String>,
    pub start_options: Vec<String>,
    pub end_options: Vec<String>,
    pub package_style: PackageStyle,
    pub package_color: Option<String>,
    pub type_order: TypeOrder,
    /// Background color by qualified type name
    pub colors: BTreeMap<String, String>,
    pub line_separator: String,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            types: Vec::new(),
            packages: Vec::new(),
            excludes: Vec::new(),
            expand_dependencies: false,
            hide_self_links: true,
            header: None,
            footer: None,
            title: None,
            start_options: Vec::new(),
            end_options: Vec::new(),
            package_style: PackageStyle::default(),
            package_color: None,
            type_order: TypeOrder::default(),
            colors: BTreeMap::new(),
            line_separator: "\n".to_string(),
        }
    }
}

impl DiagramOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> DiagramResult<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_path(path: impl AsRef<Path>) -> DiagramResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> DiagramResult<()> {
        if self.line_separator.is_empty() {
            return Err(DiagramError::configuration("line separator must not be empty"));
        }
        if let Some(blank) = self.types.iter().find(|t| t.trim().is_empty()) {
            return Err(DiagramError::configuration(format!(
                "type name '{blank}' must not be blank"
            )));
        }
        if self.packages.iter().any(|p| p.trim().is_empty()) {
            return Err(DiagramError::configuration("package name must not be blank"));
        }
        Ok(())
    }

    pub fn with_type(mut self, qualified_name: impl Into<String>) -> Self {
        self.types.push(qualified_name.into());
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.packages.push(package.into());
        self
    }

    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excludes.push(pattern.into());
        self
    }

    pub fn with_dependencies(mut self) -> Self {
        self.expand_dependencies = true;
        self
    }

    pub fn show_self_links(mut self) -> Self {
        self.hide_self_links = false;
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_color(mut self, qualified_name: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.insert(qualified_name.into(), color.into());
        self
    }

    /// Header and footer, the parts hide directives are read from
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.header.as_deref().into_iter().chain(self.footer.as_deref())
    }
}

/// Full configuration for one diagram build
pub struct DiagramConfig {
    options: DiagramOptions,
    filter: MemberFilter,
    names: Box<dyn NameResolver>,
    links: Box<dyn LinkResolver>,
}

impl std::fmt::Debug for DiagramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramConfig")
            .field("options", &self.options)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            options: DiagramOptions::default(),
            filter: MemberFilter::new(),
            names: Box::new(DefaultResolver),
            links: Box::new(DefaultResolver),
        }
    }
}

impl DiagramConfig {
    /// Validate options and compile their exclusion patterns
    pub fn from_options(options: DiagramOptions) -> DiagramResult<Self> {
        options.validate()?;
        let mut filter = MemberFilter::new();
        for pattern in &options.excludes {
            filter.exclude(pattern)?;
        }
        Ok(Self {
            options,
            filter,
            ..Self::default()
        })
    }

    pub fn with_field_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&TypeDescriptor, &FieldDescriptor) -> bool + Send + Sync + 'static,
    {
        self.filter.add_field_predicate(predicate);
        self
    }

    pub fn with_method_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&TypeDescriptor, &MethodDescriptor) -> bool + Send + Sync + 'static,
    {
        self.filter.add_method_predicate(predicate);
        self
    }

    pub fn with_name_resolver(mut self, resolver: impl NameResolver + 'static) -> Self {
        self.names = Box::new(resolver);
        self
    }

    pub fn with_link_resolver(mut self, resolver: impl LinkResolver + 'static) -> Self {
        self.links = Box::new(resolver);
        self
    }

    /// Add an exclusion pattern after construction
    pub fn exclude(mut self, pattern: &str) -> DiagramResult<Self> {
        self.filter.exclude(pattern)?;
        self.options.excludes.push(pattern.to_string());
        Ok(self)
    }

    pub fn options(&self) -> &DiagramOptions {
        &self.options
    }

    pub fn filter(&self) -> &MemberFilter {
        &self.filter
    }

    pub fn names(&self) -> &dyn NameResolver {
        self.names.as_ref()
    }

    pub fn links(&self) -> &dyn LinkResolver {
        self.links.as_ref()
    }
}
