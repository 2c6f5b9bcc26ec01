//! Output formatting for scope comparisons.
//!
//! Renders a [`ScopeComparison`] for the terminal (colored), as plain text,
//! or as JSON. Rendering may pair up updated entries by an identity key (the
//! before/after view) and may hide elements excluded by a [`Filter`]; both
//! are presentation concerns and never change the comparison itself.

use crate::comparison::{extract_changed_pairs, ScopeComparison};
use crate::error::OutputError;
use crate::filter::Filter;
use crate::value::Value;
use colored::Colorize;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored terminal output with ANSI escape codes
    Terminal,
    /// JSON representation of the comparison
    Json,
    /// Plain text, no colors (suitable for piping)
    Plain,
}

/// Options for controlling output formatting.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// Also render the common partition
    pub show_common: bool,
    /// Pair updated entries by this attribute and render before/after lines
    pub pair_by: Option<String>,
    /// Maximum length for displayed values (truncate if longer)
    pub max_value_length: usize,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            show_common: false,
            pair_by: None,
            max_value_length: 80,
        }
    }
}

/// Formats a scope comparison according to the format and options.
///
/// A filter, when given, hides matching elements from the rendered element
/// lists (terminal and plain formats only; JSON always carries the full
/// comparison).
pub fn format_comparison(
    comparison: &ScopeComparison,
    format: &OutputFormat,
    options: &OutputOptions,
    filter: Option<&Filter>,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Terminal => Ok(format_text(comparison, options, filter, true)),
        OutputFormat::Plain => Ok(format_text(comparison, options, filter, false)),
        OutputFormat::Json => format_json(comparison),
    }
}

fn format_json(comparison: &ScopeComparison) -> Result<String, OutputError> {
    serde_json::to_string_pretty(&comparison.to_raw())
        .map_err(|source| OutputError::JsonSerializationError { source })
}

fn format_text(
    comparison: &ScopeComparison,
    options: &OutputOptions,
    filter: Option<&Filter>,
    colorize: bool,
) -> String {
    let mut out = String::new();

    let header = format!("# {}", comparison.scope);
    push_line(&mut out, if colorize { header.bold().to_string() } else { header });

    let mut only_in_a = comparison.result.only_in_a.clone();
    let mut only_in_b = comparison.result.only_in_b.clone();
    let mut pairs = Vec::new();

    if let Some(key) = &options.pair_by {
        if let (Some(Value::Collection(a)), Some(Value::Collection(b))) =
            (&mut only_in_a, &mut only_in_b)
        {
            pairs = extract_changed_pairs(a, b, key);
        }
    }

    let only_in_a = only_in_a.filter(|value| !is_rendered_empty(value));
    let only_in_b = only_in_b.filter(|value| !is_rendered_empty(value));

    if let Some(value) = &only_in_a {
        let label = format!("Only in '{}':", comparison.name_a);
        push_line(&mut out, if colorize { label.red().to_string() } else { label });
        render_value(&mut out, value, comparison, options, filter, 1);
    }

    if let Some(value) = &only_in_b {
        let label = format!("Only in '{}':", comparison.name_b);
        push_line(&mut out, if colorize { label.green().to_string() } else { label });
        render_value(&mut out, value, comparison, options, filter, 1);
    }

    if !pairs.is_empty() {
        let label = "In both with different attributes:".to_string();
        push_line(&mut out, if colorize { label.yellow().to_string() } else { label });
        for (before, after) in &pairs {
            push_line(
                &mut out,
                format!("  * {}", summarize_element(before, options.max_value_length)),
            );
            push_line(
                &mut out,
                format!("    -> {}", summarize_element(after, options.max_value_length)),
            );
        }
    }

    if options.show_common {
        if let Some(value) = &comparison.result.common {
            push_line(&mut out, "Common:".to_string());
            render_value(&mut out, value, comparison, options, filter, 1);
        }
    }

    if only_in_a.is_none() && only_in_b.is_none() && pairs.is_empty() {
        push_line(&mut out, "  No differences.".to_string());
    }

    out
}

/// A partition may become empty for display purposes after pairing moved all
/// of its elements into the before/after view.
fn is_rendered_empty(value: &Value) -> bool {
    match value {
        Value::Collection(collection) => collection.is_empty(),
        Value::Record(record) => record.is_empty(),
        _ => false,
    }
}

fn render_value(
    out: &mut String,
    value: &Value,
    comparison: &ScopeComparison,
    options: &OutputOptions,
    filter: Option<&Filter>,
    depth: usize,
) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Collection(collection) => {
            let base_path = format!("/{}", comparison.scope);
            let visible = match filter {
                Some(filter) => filter.reject_elements(collection, &base_path, "name"),
                None => collection.clone(),
            };
            for element in visible.elements() {
                push_line(
                    out,
                    format!(
                        "{}* {}",
                        indent,
                        summarize_element(element, options.max_value_length)
                    ),
                );
            }
        }
        Value::Record(record) => {
            for (name, attribute) in record.attributes() {
                match attribute {
                    Value::Collection(collection) => {
                        push_line(out, format!("{}{}:", indent, name));
                        let base_path = format!("/{}/{}", comparison.scope, name);
                        let visible = match filter {
                            Some(filter) => filter.reject_elements(collection, &base_path, "name"),
                            None => collection.clone(),
                        };
                        for element in visible.elements() {
                            push_line(
                                out,
                                format!(
                                    "{}  * {}",
                                    indent,
                                    summarize_element(element, options.max_value_length)
                                ),
                            );
                        }
                    }
                    other => push_line(
                        out,
                        format!(
                            "{}{}: {}",
                            indent,
                            name,
                            display_value(other, options.max_value_length)
                        ),
                    ),
                }
            }
        }
        other => push_line(
            out,
            format!("{}{}", indent, other.preview(options.max_value_length)),
        ),
    }
}

/// One-line summary of a collection element: its name attribute followed by
/// the remaining attributes.
fn summarize_element(element: &Value, max_len: usize) -> String {
    let record = match element.as_record() {
        Some(record) => record,
        None => return element.preview(max_len),
    };

    let name = record
        .get("name")
        .and_then(|value| value.as_display_string());

    let rest: Vec<String> = record
        .attributes()
        .iter()
        .filter(|(key, _)| key.as_str() != "name")
        .map(|(key, value)| format!("{}: {}", key, display_value(value, max_len)))
        .collect();

    match (name, rest.is_empty()) {
        (Some(name), true) => name,
        (Some(name), false) => format!("{} ({})", name, rest.join(", ")),
        (None, _) => element.preview(max_len),
    }
}

/// Scalars render without quoting; containers fall back to the shape preview.
fn display_value(value: &Value, max_len: usize) -> String {
    match value.as_display_string() {
        Some(s) if s.chars().count() > max_len => {
            let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{}...", truncated)
        }
        Some(s) => s,
        None => value.preview(max_len),
    }
}

fn push_line(out: &mut String, line: String) {
    out.push_str(&line);
    out.push('\n');
}
