//! Bracket templates: `"[qty] x [item.name]"`.
//!
//! Every `[...]` holds a plain dot path. Rendering walks the matches left to
//! right and, for each one, emits the literal text since the previous match
//! followed by the formatted value. Text after the last match is dropped:
//! `"Total: [price] USD"` renders as `"Total: 10"`.

use std::sync::LazyLock;

use regex::Regex;

use crate::access::Introspect;
use crate::model::Value;
use crate::Result;
use super::{ensure_not_blank, property_value, resolve};

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?]").expect("bracket pattern compiles"));

// ============================================================================
// Formatters
// ============================================================================

/// Turns a resolved value into template text.
pub trait ElementFormatter {
    fn format(&self, value: &Value) -> String;
}

impl<F> ElementFormatter for F
where
    F: Fn(&Value) -> String,
{
    fn format(&self, value: &Value) -> String {
        self(value)
    }
}

/// Null becomes the placeholder, anything else its natural string form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NullPlaceholder(pub String);

impl NullPlaceholder {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self(placeholder.into())
    }
}

impl ElementFormatter for NullPlaceholder {
    fn format(&self, value: &Value) -> String {
        if value.is_null() {
            self.0.clone()
        } else {
            value.to_string()
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render `template` against `root`. A null root renders as `""`.
pub fn render(root: &Value, template: &str, formatter: &dyn ElementFormatter) -> Result<String> {
    if root.is_null() {
        return Ok(String::new());
    }
    expand(template, formatter, |path| resolve(root, path))
}

/// Render `template` starting at an object.
pub fn render_object(
    obj: &dyn Introspect,
    template: &str,
    formatter: &dyn ElementFormatter,
) -> Result<String> {
    expand(template, formatter, |path| property_value(obj, path))
}

/// Render with a [`NullPlaceholder`] formatter.
pub fn render_with_placeholder(root: &Value, template: &str, null_placeholder: &str) -> Result<String> {
    render(root, template, &NullPlaceholder::new(null_placeholder))
}

fn expand(
    template: &str,
    formatter: &dyn ElementFormatter,
    lookup: impl Fn(&str) -> Result<Value>,
) -> Result<String> {
    ensure_not_blank(template, "template")?;
    if !template.contains('[') && !template.contains(']') {
        return Ok(formatter.format(&lookup(template)?));
    }

    let mut rendered = String::with_capacity(template.len());
    let mut literal_start = 0;
    for found in BRACKETED.find_iter(template) {
        rendered.push_str(&template[literal_start..found.start()]);
        let path = &template[found.start() + 1..found.end() - 1];
        rendered.push_str(&formatter.format(&lookup(path)?));
        literal_start = found.end();
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::map_of;
    use crate::Error;

    fn invoice() -> Value {
        map_of([
            ("price", Value::Int(10)),
            ("tax", Value::Int(2)),
            ("note", Value::Null),
            ("customer", map_of([("name", "Ada")])),
        ])
    }

    #[test]
    fn test_render_pairs() {
        let rendered = render(&invoice(), "[price]-[tax]", &NullPlaceholder::default()).unwrap();
        assert_eq!(rendered, "10-2");
    }

    #[test]
    fn test_leading_literal_kept() {
        let rendered = render_with_placeholder(&invoice(), "Total: [price]", "").unwrap();
        assert_eq!(rendered, "Total: 10");
    }

    #[test]
    fn test_trailing_literal_dropped() {
        // Only text in front of a bracket is emitted.
        let rendered = render_with_placeholder(&invoice(), "Total: [price] USD", "").unwrap();
        assert_eq!(rendered, "Total: 10");
    }

    #[test]
    fn test_adjacent_brackets() {
        let rendered = render_with_placeholder(&invoice(), "[price][tax]", "").unwrap();
        assert_eq!(rendered, "102");
    }

    #[test]
    fn test_null_placeholder() {
        let rendered = render_with_placeholder(&invoice(), "[customer.name]: [note]", "n/a").unwrap();
        assert_eq!(rendered, "Ada: n/a");
    }

    #[test]
    fn test_closure_formatter() {
        let shout = |v: &Value| v.to_string().to_uppercase();
        let rendered = render(&invoice(), "[customer.name]!", &shout).unwrap();
        assert_eq!(rendered, "ADA");
    }

    #[test]
    fn test_plain_path_is_formatted() {
        let rendered = render_with_placeholder(&invoice(), "note", "-").unwrap();
        assert_eq!(rendered, "-");
    }

    #[test]
    fn test_null_root_renders_empty() {
        assert_eq!(render_with_placeholder(&Value::Null, "[a]", "x").unwrap(), "");
    }

    #[test]
    fn test_blank_template_and_blank_bracket() {
        assert!(matches!(render_with_placeholder(&invoice(), " ", ""), Err(Error::InvalidArgument(_))));
        assert!(matches!(render_with_placeholder(&invoice(), "[]", ""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_closing_bracket_only_renders_nothing() {
        assert_eq!(render_with_placeholder(&invoice(), "price]", "").unwrap(), "");
    }
}
