//! Representation engine: `to_string` from representation declarations.
//!
//! Rendering is best-effort. A property that fails to resolve is logged and
//! shown as `<null>`; it never aborts the sibling properties.

use std::fmt::Write;

use tracing::warn;

use crate::access::Introspect;
use crate::config::representation_config_of;
use crate::model::{ReprStyle, Value};
use crate::path::property_value;

/// Text shown for a null property.
pub const NULL_TEXT: &str = "<null>";

/// Render `obj` with its declared representation, or return
/// `default_if_no_properties` when it declares no properties.
pub fn to_string(obj: &dyn Introspect, default_if_no_properties: &str) -> String {
    let config = representation_config_of(obj.type_info());
    if config.is_empty() {
        return default_if_no_properties.to_owned();
    }

    let fields: Vec<(&str, String)> = config
        .properties()
        .iter()
        .filter(|p| !p.is_empty())
        .map(|property| {
            let value = property_value(obj, property).unwrap_or_else(|err| {
                warn!(property, type_name = obj.type_info().name(), error = %err, "representation property failed to resolve");
                Value::Null
            });
            (*property, field_text(&value))
        })
        .collect();

    render(obj, config.style(), &fields)
}

/// `qualified::Name@address`, the fallback for objects without a
/// representation declaration.
pub fn default_string(obj: &dyn Introspect) -> String {
    format!("{}@{:x}", obj.type_info().name(), address(obj))
}

fn address(obj: &dyn Introspect) -> usize {
    (obj as *const dyn Introspect).cast::<()>() as usize
}

fn field_text(value: &Value) -> String {
    if value.is_null() {
        NULL_TEXT.to_owned()
    } else {
        value.to_string()
    }
}

fn render(obj: &dyn Introspect, style: ReprStyle, fields: &[(&str, String)]) -> String {
    match style {
        ReprStyle::Default => format!("{}[{}]", default_string(obj), named(fields)),
        ReprStyle::MultiLine => {
            let mut out = format!("{}[", default_string(obj));
            for (name, text) in fields {
                let _ = write!(out, "\n  {name}={text}");
            }
            out.push_str("\n]");
            out
        }
        ReprStyle::NoFieldNames => format!("{}[{}]", default_string(obj), unnamed(fields)),
        ReprStyle::ShortPrefix => format!("{}[{}]", obj.type_info().short_name(), named(fields)),
        ReprStyle::Simple => unnamed(fields),
    }
}

fn named(fields: &[(&str, String)]) -> String {
    fields
        .iter()
        .map(|(name, text)| format!("{name}={text}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn unnamed(fields: &[(&str, String)]) -> String {
    fields
        .iter()
        .map(|(_, text)| text.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
