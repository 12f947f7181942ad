//! Template renderer and rendering functionality for shellforge.
//! Wraps MiniJinja with the helper set profile templates rely on: line
//! indentation, JSON serialization, joins, default fallbacks, case
//! conversion and generalized conditional branching.

use crate::error::{Error, Result};
use minijinja::value::{Value as TemplateValue, ValueKind};
use minijinja::{Environment, UndefinedBehavior};
use std::path::Path;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;

    /// Loads a template file from disk and renders it.
    ///
    /// # Errors
    /// * `Error::TemplateError` if the file does not exist or cannot be read
    /// * `Error::RenderError` if rendering fails
    fn render_file(&self, path: &Path, context: &serde_json::Value) -> Result<String> {
        let template = std::fs::read_to_string(path).map_err(|e| Error::TemplateError {
            message: format!("cannot read template file {}: {}", path.display(), e),
        })?;
        self.render(&template, context)
    }
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a new renderer with permissive undefined handling and the
    /// shellforge helper set registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Lenient);

        env.add_filter("indent", indent_filter);
        env.add_filter("to_json", to_json_filter);
        env.add_filter("join_with", join_with_filter);
        env.add_filter("default_to", default_to_filter);
        env.add_filter("lowercase", lowercase_filter);
        env.add_filter("uppercase", uppercase_filter);
        env.add_filter("kebab_case", kebab_case_filter);
        env.add_filter("camel_case", camel_case_filter);
        env.add_filter("pascal_case", pascal_case_filter);
        env.add_function("cond", cond_fn);

        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        let mut env = self.env.clone();
        env.add_template("temp", template).map_err(|e| Error::RenderError {
            message: e.to_string(),
        })?;

        let tmpl = env.get_template("temp").map_err(|e| Error::RenderError {
            message: e.to_string(),
        })?;

        tmpl.render(context).map_err(|e| Error::RenderError { message: e.to_string() })
    }
}

/// Indents every non-blank line of `text` by `count` spaces.
/// Non-string input degrades to an empty string.
fn indent_filter(text: TemplateValue, count: u64) -> String {
    let Some(text) = text.as_str() else {
        return String::new();
    };
    let indentation = " ".repeat(count as usize);
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{}{}", indentation, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serializes a value as JSON with a configurable indent (default 2).
/// Serialization failures degrade to `{}`.
fn to_json_filter(value: TemplateValue, indent: Option<u64>) -> String {
    let json = match serde_json::to_value(&value) {
        Ok(json) => json,
        Err(_) => return "{}".to_string(),
    };
    let indent = indent.unwrap_or(2) as usize;
    if indent == 0 {
        return serde_json::to_string(&json).unwrap_or_else(|_| "{}".to_string());
    }
    let pad = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(pad.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    match serde::Serialize::serialize(&json, &mut serializer) {
        Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| "{}".to_string()),
        Err(_) => "{}".to_string(),
    }
}

/// Joins a sequence with a separator. Non-sequence input degrades to an
/// empty string.
fn join_with_filter(value: TemplateValue, separator: String) -> String {
    if value.kind() != ValueKind::Seq {
        return String::new();
    }
    let Ok(iter) = value.try_iter() else {
        return String::new();
    };
    iter.map(|item| match item.as_str() {
        Some(s) => s.to_string(),
        None => item.to_string(),
    })
    .collect::<Vec<_>>()
    .join(&separator)
}

/// Returns `fallback` when the value is falsy (undefined, none, false, zero
/// or empty), otherwise the value itself.
fn default_to_filter(value: TemplateValue, fallback: TemplateValue) -> TemplateValue {
    if value.is_true() {
        value
    } else {
        fallback
    }
}

fn lowercase_filter(value: TemplateValue) -> String {
    value.as_str().map(|s| s.to_lowercase()).unwrap_or_default()
}

fn uppercase_filter(value: TemplateValue) -> String {
    value.as_str().map(|s| s.to_uppercase()).unwrap_or_default()
}

fn kebab_case_filter(value: TemplateValue) -> String {
    value.as_str().map(cruet::to_kebab_case).unwrap_or_default()
}

fn camel_case_filter(value: TemplateValue) -> String {
    value.as_str().map(cruet::to_camel_case).unwrap_or_default()
}

fn pascal_case_filter(value: TemplateValue) -> String {
    value.as_str().map(cruet::to_pascal_case).unwrap_or_default()
}

fn as_number(value: &TemplateValue) -> Option<f64> {
    serde_json::to_value(value).ok().and_then(|json| json.as_f64())
}

/// Generalized conditional over relational and logical operators, used as
/// `{% if cond(a, "<=", b) %}`. The strict `===`/`!==` spellings are kept
/// for compatibility with descriptors written for the original helper set.
/// Unknown operators evaluate to false.
fn cond_fn(a: TemplateValue, operator: String, b: TemplateValue) -> bool {
    match operator.as_str() {
        "==" | "===" => a == b,
        "!=" | "!==" => a != b,
        "<" | "<=" | ">" | ">=" => {
            let (Some(lhs), Some(rhs)) = (as_number(&a), as_number(&b)) else {
                return false;
            };
            match operator.as_str() {
                "<" => lhs < rhs,
                "<=" => lhs <= rhs,
                ">" => lhs > rhs,
                _ => lhs >= rhs,
            }
        }
        "&&" => a.is_true() && b.is_true(),
        "||" => a.is_true() || b.is_true(),
        _ => false,
    }
}
