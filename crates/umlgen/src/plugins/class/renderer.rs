//! PlantUML class diagram renderer
//!
//! Serializes a [`DiagramModel`] to PlantUML text. Output is byte-for-byte
//! deterministic for a given model and line separator.

use anyhow::Result;
use tracing::{debug, span, Level};

use super::database::{Association, DiagramModel, DiagramType, Package};
use crate::core::{DiagramResult, LinkContext, Renderer};

pub const START_MARKER: &str = "@startuml";
pub const END_MARKER: &str = "@enduml";

/// Line buffer joined with a fixed separator
struct Output<'a> {
    text: String,
    separator: &'a str,
}

impl<'a> Output<'a> {
    fn new(separator: &'a str) -> Self {
        Self {
            text: String::new(),
            separator,
        }
    }

    fn line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push_str(self.separator);
    }

    fn blank(&mut self) {
        self.text.push_str(self.separator);
    }

    fn finish(mut self) -> String {
        self.text.push_str(self.separator);
        self.text.push_str(END_MARKER);
        self.text
    }
}

fn color_tag(color: &str) -> Option<String> {
    let color = color.trim();
    if color.is_empty() {
        None
    } else if color.starts_with('#') {
        Some(color.to_string())
    } else {
        Some(format!("#{color}"))
    }
}

/// PlantUML renderer
#[derive(Debug, Clone)]
pub struct PlantUmlRenderer {
    line_separator: String,
}

impl Default for PlantUmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlantUmlRenderer {
    pub fn new() -> Self {
        Self {
            line_separator: "\n".to_string(),
        }
    }

    pub fn with_line_separator(separator: impl Into<String>) -> Self {
        Self {
            line_separator: separator.into(),
        }
    }

    /// Render a model, failing fast on blank names
    pub fn render_model(&self, model: &DiagramModel) -> DiagramResult<String> {
        let render_span = span!(
            Level::INFO,
            "render",
            types = model.types().len(),
            associations = model.associations().len(),
            packages = model.packages().len()
        );
        let _enter = render_span.enter();

        let mut out = Output::new(&self.line_separator);
        out.line(START_MARKER);
        out.blank();

        if !model.start_options().is_empty() {
            for option in model.start_options() {
                out.line(option);
            }
            out.blank();
        }

        if let Some(header) = model.header().filter(|h| !h.trim().is_empty()) {
            out.line(header);
            out.blank();
        }

        for package in model.packages() {
            self.write_package(&mut out, package)?;
        }

        if let Some(title) = model.title().filter(|t| !t.trim().is_empty()) {
            out.line(&format!("title {title}"));
            out.blank();
        }

        for diagram_type in model.types() {
            self.write_type(&mut out, diagram_type)?;
        }

        for association in model.sorted_associations() {
            out.line(&self.association_line(association)?);
        }

        if let Some(footer) = model.footer().filter(|f| !f.trim().is_empty()) {
            out.blank();
            out.line(footer);
        }

        for option in model.end_options() {
            out.line(option);
        }

        let text = out.finish();
        debug!(output_len = text.len(), "Rendered diagram");
        Ok(text)
    }

    fn write_package(&self, out: &mut Output<'_>, package: &Package) -> DiagramResult<()> {
        package.validate()?;
        let mut head = format!("package {} <<{}>>", package.name, package.style);
        if let Some(tag) = package.color.as_deref().and_then(color_tag) {
            head.push(' ');
            head.push_str(&tag);
        }
        head.push_str(" {");
        out.line(&head);
        for member in &package.members {
            out.line(&format!("  {} \"{}\"", member.kind, member.name));
        }
        out.line("}");
        out.blank();
        Ok(())
    }

    fn write_type(&self, out: &mut Output<'_>, diagram_type: &DiagramType) -> DiagramResult<()> {
        diagram_type.validate()?;

        let mut head = format!("{} \"{}\"", diagram_type.kind, diagram_type.name);
        if !diagram_type.stereotypes.is_empty() {
            head.push_str(&format!(" <<{}>>", diagram_type.stereotypes.join(", ")));
        }
        if let Some(link) = diagram_type
            .link
            .as_ref()
            .and_then(|l| l.render(LinkContext::Class))
        {
            head.push(' ');
            head.push_str(&link);
        }
        if let Some(tag) = diagram_type.background_color.as_deref().and_then(color_tag) {
            head.push(' ');
            head.push_str(&tag);
        }

        if !diagram_type.has_content() {
            out.line(&head);
            out.blank();
            return Ok(());
        }

        head.push_str(" {");
        out.line(&head);
        for attribute in &diagram_type.attributes {
            let mut line = format!("  {}", attribute.name);
            if let Some(type_name) = &attribute.type_name {
                line.push_str(" : ");
                line.push_str(type_name);
            }
            if let Some(link) = attribute.link.as_ref().and_then(|l| l.render(LinkContext::Field)) {
                line.push(' ');
                line.push_str(&link);
            }
            out.line(&line);
        }
        for method in &diagram_type.methods {
            let mut line = format!("  {}({})", method.name, method.parameters.join(", "));
            if let Some(return_type) = &method.return_type {
                line.push_str(" : ");
                line.push_str(return_type);
            }
            if let Some(link) = method.link.as_ref().and_then(|l| l.render(LinkContext::Method)) {
                line.push(' ');
                line.push_str(&link);
            }
            out.line(&line);
        }
        out.line("}");
        out.blank();
        Ok(())
    }

    fn association_line(&self, association: &Association) -> DiagramResult<String> {
        association.validate()?;

        let mut line = format!("\"{}\"", association.from);
        if let Some(marker) = association.from_cardinality.marker() {
            line.push_str(&format!(" \"{marker}\""));
        }
        line.push(' ');
        line.push_str(association.kind.symbol());
        line.push(' ');
        if let Some(marker) = association.to_cardinality.marker() {
            line.push_str(&format!("\"{marker}\" "));
        }
        line.push_str(&format!("\"{}\"", association.to));
        if let Some(label) = association.label.as_deref().filter(|l| !l.trim().is_empty()) {
            line.push_str(" : ");
            line.push_str(label);
        }
        Ok(line)
    }
}

impl Renderer<DiagramModel> for PlantUmlRenderer {
    fn render(&self, database: &DiagramModel) -> Result<String> {
        Ok(self.render_model(database)?)
    }

    fn name(&self) -> &'static str {
        "plantuml"
    }
}
