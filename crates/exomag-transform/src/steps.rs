//! Transformation steps and their interpreter.
//!
//! A mapping's pipeline is a chain of [`Step`]s folded left-to-right over a
//! single [`Value`]: the step closest to the raw source values runs first.
//! Representing the steps as a tagged enum keeps the mapping table plain
//! data instead of opaque closures.
//!
//! # Missing vs. malformed
//!
//! Missing data is never an error: an empty link list, an absent nested
//! field, or an `Empty` value produced upstream degrades to an empty output
//! (`Age` degrades to the `-1` sentinel). Only *present but malformed* data
//! errors, and only in the steps that assume well-formedness
//! ([`Step::FormatTemplate`], [`Step::FormatDate`], [`Step::Age`]). A step
//! applied to a value of the wrong shape entirely is a mapping-table defect
//! and fails the run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use exomag_model::{Record, Value};

use crate::datetime::{calendar_age, format_german_date, parse_iso_date};
use crate::error::TransformError;
use crate::hpo::extract_hpo_terms;

/// Unit reported by the [`Step::Age`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeUnit {
    Years,
    Months,
}

/// What a [`Step::DictLookup`] yields for keys absent from its table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupFallback {
    /// Unmapped keys pass through unchanged.
    PassThrough,
    /// Unmapped keys map to a fixed literal.
    Literal(String),
}

/// One transformation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// Ignore the input and yield the closed-over constant.
    Constant(String),

    /// First element of a list; empty list degrades to `Empty`.
    One,

    /// Run the inner chain over every list element, stringify each result,
    /// and join with the separator.
    Concat { sep: String, inner: Vec<Step> },

    /// Join a list of strings with the separator, no per-item transform.
    Join(String),

    /// Calendar difference between a `[birthdate, reference]` date pair.
    /// Either side empty yields the `-1` sentinel.
    Age(AgeUnit),

    /// Project one field out of a nested sub-record; a missing field
    /// degrades to an empty string.
    Select(String),

    /// Leftmost match of the pattern (single match, never global); the
    /// numbered capture group is taken, group 0 being the whole match.
    Regex { pattern: String, group: usize },

    /// Translate through a lookup table, with the configured fallback for
    /// unmapped keys.
    DictLookup {
        table: BTreeMap<String, String>,
        fallback: LookupFallback,
    },

    /// Extract `HP:`/`HPO:` identifiers from free text, comma-joined.
    CleanHpo,

    /// Substitute `{name}` placeholders from a nested sub-record's fields.
    /// An unsatisfied placeholder fails the run.
    FormatTemplate(String),

    /// Reformat a `YYYY-MM-DD` date as `DD.MM.YYYY`.
    FormatDate,
}

impl Step {
    /// Whole-match regex step (capture group 0).
    pub fn regex(pattern: impl Into<String>) -> Self {
        Step::Regex {
            pattern: pattern.into(),
            group: 0,
        }
    }

    /// Lookup step from literal pairs.
    pub fn lookup<K, V>(pairs: impl IntoIterator<Item = (K, V)>, fallback: LookupFallback) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Step::DictLookup {
            table: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            fallback,
        }
    }

    /// Step name used in shape-error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Step::Constant(_) => "constant",
            Step::One => "one",
            Step::Concat { .. } => "concat",
            Step::Join(_) => "join",
            Step::Age(_) => "age",
            Step::Select(_) => "select",
            Step::Regex { .. } => "regex",
            Step::DictLookup { .. } => "lookup",
            Step::CleanHpo => "clean-hpo",
            Step::FormatTemplate(_) => "template",
            Step::FormatDate => "format-date",
        }
    }

    /// Apply this step to the current value.
    pub fn eval(&self, value: Value) -> Result<Value, TransformError> {
        match self {
            Step::Constant(text) => Ok(Value::text(text.clone())),

            Step::One => match value {
                Value::List(items) => Ok(items.into_iter().next().unwrap_or(Value::Empty)),
                Value::Empty => Ok(Value::Empty),
                other => Err(self.shape_error("list", &other)),
            },

            Step::Concat { sep, inner } => match value {
                Value::List(items) => {
                    let mut parts = Vec::with_capacity(items.len());
                    for item in items {
                        let result = eval_chain(inner, item)?;
                        parts.push(self.scalar_text(result)?);
                    }
                    Ok(Value::text(parts.join(sep)))
                }
                Value::Empty => Ok(Value::text("")),
                other => Err(self.shape_error("list", &other)),
            },

            Step::Join(sep) => match value {
                Value::List(items) => {
                    let mut parts = Vec::with_capacity(items.len());
                    for item in items {
                        parts.push(self.scalar_text(item)?);
                    }
                    Ok(Value::text(parts.join(sep)))
                }
                Value::Empty => Ok(Value::text("")),
                other => Err(self.shape_error("list", &other)),
            },

            Step::Age(unit) => {
                let items = match value {
                    Value::List(items) => items,
                    other => return Err(self.shape_error("date pair", &other)),
                };
                let [birth, reference] = items.as_slice() else {
                    return Err(TransformError::Shape {
                        step: self.name(),
                        expected: "two-element date pair",
                        found: "list",
                    });
                };
                let birth = self.optional_text(birth)?;
                let reference = self.optional_text(reference)?;
                if birth.is_empty() || reference.is_empty() {
                    return Ok(Value::Int(-1));
                }
                let age = calendar_age(parse_iso_date(birth)?, parse_iso_date(reference)?);
                Ok(Value::Int(match unit {
                    AgeUnit::Years => age.years,
                    AgeUnit::Months => age.months,
                }))
            }

            Step::Select(field) => match value {
                Value::Record(record) => Ok(record
                    .get(field)
                    .cloned()
                    .unwrap_or_else(|| Value::text(""))),
                Value::Empty => Ok(Value::Empty),
                other => Err(self.shape_error("record", &other)),
            },

            Step::Regex { pattern, group } => match value {
                Value::Text(text) => {
                    let matcher = regex::Regex::new(pattern)?;
                    let captured = matcher
                        .captures(&text)
                        .and_then(|caps| caps.get(*group))
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default();
                    Ok(Value::Text(captured))
                }
                Value::Empty => Ok(Value::text("")),
                other => Err(self.shape_error("text", &other)),
            },

            Step::DictLookup { table, fallback } => match value {
                Value::Text(key) => {
                    let mapped = match table.get(&key) {
                        Some(hit) => hit.clone(),
                        None => match fallback {
                            LookupFallback::PassThrough => key,
                            LookupFallback::Literal(default) => default.clone(),
                        },
                    };
                    Ok(Value::Text(mapped))
                }
                Value::Empty => Ok(Value::Empty),
                other => Err(self.shape_error("text", &other)),
            },

            Step::CleanHpo => match value {
                Value::Text(text) => Ok(Value::Text(extract_hpo_terms(&text))),
                Value::Empty => Ok(Value::text("")),
                other => Err(self.shape_error("text", &other)),
            },

            Step::FormatTemplate(template) => match value {
                Value::Record(record) => Ok(Value::Text(render_template(template, &record)?)),
                Value::Empty => Ok(Value::text("")),
                other => Err(self.shape_error("record", &other)),
            },

            Step::FormatDate => match value {
                Value::Text(text) => {
                    if text.is_empty() {
                        Ok(Value::text(""))
                    } else {
                        Ok(Value::Text(format_german_date(parse_iso_date(&text)?)))
                    }
                }
                Value::Empty => Ok(Value::text("")),
                other => Err(self.shape_error("text", &other)),
            },
        }
    }

    fn shape_error(&self, expected: &'static str, found: &Value) -> TransformError {
        TransformError::Shape {
            step: self.name(),
            expected,
            found: found.shape(),
        }
    }

    /// Stringify a scalar produced inside a list-mapping step.
    fn scalar_text(&self, value: Value) -> Result<String, TransformError> {
        match value {
            Value::Text(text) => Ok(text),
            Value::Int(number) => Ok(number.to_string()),
            Value::Empty => Ok(String::new()),
            other => Err(self.shape_error("scalar", &other)),
        }
    }

    fn optional_text<'v>(&self, value: &'v Value) -> Result<&'v str, TransformError> {
        match value {
            Value::Text(text) => Ok(text),
            Value::Empty => Ok(""),
            other => Err(self.shape_error("text", other)),
        }
    }
}

/// Fold a step chain over a value, first step innermost.
pub fn eval_chain(steps: &[Step], value: Value) -> Result<Value, TransformError> {
    let mut current = value;
    for step in steps {
        current = step.eval(current)?;
    }
    Ok(current)
}

/// `{name}` placeholder substitution against a sub-record's fields.
/// `{{` and `}}` escape literal braces.
fn render_template(template: &str, record: &Record) -> Result<String, TransformError> {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                output.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                output.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(inner) => name.push(inner),
                        None => {
                            return Err(TransformError::Template { placeholder: name });
                        }
                    }
                }
                let value = record.get(&name).ok_or_else(|| TransformError::Template {
                    placeholder: name.clone(),
                })?;
                match value {
                    Value::Text(text) => output.push_str(text),
                    Value::Int(number) => output.push_str(&number.to_string()),
                    Value::Empty => {}
                    other => {
                        return Err(TransformError::Shape {
                            step: "template",
                            expected: "scalar placeholder value",
                            found: other.shape(),
                        });
                    }
                }
            }
            other => output.push(other),
        }
    }

    Ok(output)
}
