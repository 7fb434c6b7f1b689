//! Hide and show directives found in header and footer text
//!
//! `hide fields`, `hide methods` and `hide members` suppress a category for
//! every type; `show <Type> fields|methods` exempts one type again. A hidden
//! category is left out of the type body and of association inference.

use std::collections::HashSet;

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Fields,
    Methods,
}

const FIELDS: &[Category] = &[Category::Fields];
const METHODS: &[Category] = &[Category::Methods];
const MEMBERS: &[Category] = &[Category::Fields, Category::Methods];

impl Category {
    fn parse(word: &str) -> Option<&'static [Category]> {
        match word {
            "fields" | "field" | "attributes" | "attribute" => Some(FIELDS),
            "methods" | "method" => Some(METHODS),
            "members" | "member" => Some(MEMBERS),
            _ => None,
        }
    }
}

/// Directives read from one diagram part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PartDirectives {
    hide_fields: bool,
    hide_methods: bool,
    shown_fields: HashSet<String>,
    shown_methods: HashSet<String>,
}

impl PartDirectives {
    fn parse(part: &str) -> Self {
        let mut directives = Self::default();
        for line in part.lines() {
            directives.read_line(line);
        }
        directives
    }

    fn read_line(&mut self, line: &str) {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["hide", what] => {
                for category in Category::parse(what).unwrap_or_default() {
                    match category {
                        Category::Fields => self.hide_fields = true,
                        Category::Methods => self.hide_methods = true,
                    }
                }
            }
            ["show", name, what] => {
                let name = name.trim_matches('"');
                for category in Category::parse(what).unwrap_or_default() {
                    let shown = match category {
                        Category::Fields => &mut self.shown_fields,
                        Category::Methods => &mut self.shown_methods,
                    };
                    shown.insert(name.to_string());
                }
            }
            _ => return,
        }
        trace!(line, "Read hide directive");
    }

    fn hides_fields(&self, type_name: &str) -> bool {
        self.hide_fields && !self.shown_fields.contains(type_name)
    }

    fn hides_methods(&self, type_name: &str) -> bool {
        self.hide_methods && !self.shown_methods.contains(type_name)
    }
}

/// Hide directives collected from free-form diagram parts
///
/// Each part is read on its own: a `show` only exempts a type from the
/// `hide` of the same part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HideDirectives {
    parts: Vec<PartDirectives>,
}

impl HideDirectives {
    pub fn parse<'a>(parts: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            parts: parts.into_iter().map(PartDirectives::parse).collect(),
        }
    }

    pub fn fields_visible(&self, type_name: &str) -> bool {
        !self.parts.iter().any(|part| part.hides_fields(type_name))
    }

    pub fn methods_visible(&self, type_name: &str) -> bool {
        !self.parts.iter().any(|part| part.hides_methods(type_name))
    }

    pub fn is_empty(&self) -> bool {
        self.parts
            .iter()
            .all(|part| !part.hide_fields && !part.hide_methods)
    }
}
