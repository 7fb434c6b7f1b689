//! Name and link resolution strategies
//!
//! Callers plug in how a type, field or method is named in the diagram and
//! which hyperlink decorates it. The defaults keep descriptor names and add
//! no links.

use super::descriptor::{FieldDescriptor, MethodDescriptor, TypeDescriptor};

/// Where a link decoration is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkContext {
    Class,
    Field,
    Method,
}

/// Hyperlink decoration for a type or member
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub url: Option<String>,
    pub label: Option<String>,
    pub tooltip: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl Link {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Render the decoration, or `None` when nothing is renderable
    ///
    /// Types use `[[...]]` and ignore the label; members use `[[[...]]]`.
    /// A label alone never renders.
    pub fn render(&self, context: LinkContext) -> Option<String> {
        let url = present(&self.url);
        let tooltip = present(&self.tooltip);
        let label = present(&self.label);

        let rendered = match context {
            LinkContext::Class => match (url, tooltip) {
                (Some(url), Some(tooltip)) => format!("[[{url}{{{tooltip}}}]]"),
                (None, Some(tooltip)) => format!("[[{{{tooltip}}}]]"),
                (Some(url), None) => format!("[[{url}]]"),
                (None, None) => return None,
            },
            LinkContext::Field | LinkContext::Method => match (url, tooltip, label) {
                (Some(url), Some(tooltip), Some(label)) => {
                    format!("[[[{url}{{{tooltip}}} {label}]]]")
                }
                (Some(url), Some(tooltip), None) => format!("[[[{url}{{{tooltip}}}]]]"),
                (Some(url), None, Some(label)) => format!("[[[{url} {label}]]]"),
                (Some(url), None, None) => format!("[[[{url}]]]"),
                (None, Some(tooltip), _) => format!("[[[{{{tooltip}}}]]]"),
                (None, None, _) => return None,
            },
        };
        Some(rendered)
    }
}

/// Display names used in the diagram
pub trait NameResolver: Send + Sync {
    fn type_name(&self, descriptor: &TypeDescriptor) -> String {
        descriptor.name().to_string()
    }

    fn field_name(&self, _owner: &TypeDescriptor, field: &FieldDescriptor) -> String {
        field.name.clone()
    }

    fn method_name(&self, _owner: &TypeDescriptor, method: &MethodDescriptor) -> String {
        method.name.clone()
    }
}

/// Hyperlink decorations used in the diagram
pub trait LinkResolver: Send + Sync {
    fn type_link(&self, _descriptor: &TypeDescriptor) -> Option<Link> {
        None
    }

    fn field_link(&self, _owner: &TypeDescriptor, _field: &FieldDescriptor) -> Option<Link> {
        None
    }

    fn method_link(&self, _owner: &TypeDescriptor, _method: &MethodDescriptor) -> Option<Link> {
        None
    }
}

/// Identity naming and no links
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResolver;

impl NameResolver for DefaultResolver {}

impl LinkResolver for DefaultResolver {}

/// Prefixes every type name with a fixed string
#[derive(Debug, Clone, Default)]
pub struct PrefixNameResolver {
    pub type_prefix: String,
}

impl NameResolver for PrefixNameResolver {
    fn type_name(&self, descriptor: &TypeDescriptor) -> String {
        format!("{}{}", self.type_prefix, descriptor.name())
    }
}

/// Links every type to `<base_url><qualified path>.html`
#[derive(Debug, Clone)]
pub struct DocLinkResolver {
    pub base_url: String,
}

impl LinkResolver for DocLinkResolver {
    fn type_link(&self, descriptor: &TypeDescriptor) -> Option<Link> {
        let path = descriptor.qualified_name().replace('.', "/");
        Some(Link::new(format!("{}{}.html", self.base_url, path)))
    }

    fn field_link(&self, owner: &TypeDescriptor, field: &FieldDescriptor) -> Option<Link> {
        let path = owner.qualified_name().replace('.', "/");
        Some(Link::new(format!("{}{}.html#{}", self.base_url, path, field.name)))
    }

    fn method_link(&self, owner: &TypeDescriptor, method: &MethodDescriptor) -> Option<Link> {
        let path = owner.qualified_name().replace('.', "/");
        Some(Link::new(format!("{}{}.html#{}", self.base_url, path, method.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(url: Option<&str>, label: Option<&str>, tooltip: Option<&str>) -> Link {
        Link {
            url: url.map(str::to_string),
            label: label.map(str::to_string),
            tooltip: tooltip.map(str::to_string),
        }
    }

    #[test]
    fn test_class_link_rendering() {
        let url = Some("http://x/Car");
        assert_eq!(link(None, None, None).render(LinkContext::Class), None);
        assert_eq!(
            link(url, None, None).render(LinkContext::Class).as_deref(),
            Some("[[http://x/Car]]")
        );
        assert_eq!(link(None, Some("lbl"), None).render(LinkContext::Class), None);
        assert_eq!(
            link(url, Some("lbl"), Some("tip")).render(LinkContext::Class).as_deref(),
            Some("[[http://x/Car{tip}]]")
        );
        assert_eq!(
            link(None, Some("lbl"), Some("tip")).render(LinkContext::Class).as_deref(),
            Some("[[{tip}]]")
        );
    }

    #[test]
    fn test_member_link_rendering() {
        let url = Some("http://x/Car");
        let ctx = LinkContext::Field;
        assert_eq!(link(None, None, None).render(ctx), None);
        assert_eq!(link(url, None, None).render(ctx).as_deref(), Some("[[[http://x/Car]]]"));
        assert_eq!(link(None, Some("lbl"), None).render(ctx), None);
        assert_eq!(link(None, None, Some("tip")).render(ctx).as_deref(), Some("[[[{tip}]]]"));
        assert_eq!(
            link(url, Some("lbl"), None).render(ctx).as_deref(),
            Some("[[[http://x/Car lbl]]]")
        );
        assert_eq!(
            link(url, None, Some("tip")).render(ctx).as_deref(),
            Some("[[[http://x/Car{tip}]]]")
        );
        assert_eq!(
            link(url, Some("lbl"), Some("tip")).render(LinkContext::Method).as_deref(),
            Some("[[[http://x/Car{tip} lbl]]]")
        );
        assert_eq!(
            link(None, Some("lbl"), Some("tip")).render(ctx).as_deref(),
            Some("[[[{tip}]]]")
        );
    }

    #[test]
    fn test_blank_parts_are_absent() {
        assert_eq!(link(Some("  "), None, None).render(LinkContext::Class), None);
    }

    #[test]
    fn test_default_resolver_is_identity() {
        let desc = TypeDescriptor::class("com.acme.Car");
        assert_eq!(DefaultResolver.type_name(&desc), "Car");
        assert!(DefaultResolver.type_link(&desc).is_none());
    }

    #[test]
    fn test_doc_link_resolver() {
        let desc = TypeDescriptor::class("com.acme.Car");
        let resolver = DocLinkResolver {
            base_url: "https://docs/".to_string(),
        };
        let link = resolver.type_link(&desc).unwrap();
        assert_eq!(link.url.as_deref(), Some("https://docs/com/acme/Car.html"));
    }
}
