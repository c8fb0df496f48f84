//! Per-element validation rules
//!
//! An [`ElementRule`] validates a single value: one tuple position, one
//! object field, or one array element. Rules nest, so a position can require
//! an object whose fields are themselves rule-checked, recursively.

use indexmap::IndexMap;
use serde_json::{Value, json};

use crate::issue::{Issue, Path};

/// Shape accepted by a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// Any value at all, including null.
    Any,
    /// A boolean.
    Boolean,
    /// A number without a fractional part.
    Integer,
    /// Any number.
    Number,
    /// A string.
    String,
    /// A string drawn from a fixed set of variants.
    Enumeration(Vec<String>),
    /// An object with per-field rules. Fields not named by any rule pass
    /// through untouched.
    Object(IndexMap<String, ElementRule>),
    /// An array whose elements all match one rule.
    Array(Box<ElementRule>),
}

impl RuleKind {
    fn expected(&self) -> String {
        match self {
            RuleKind::Any => "any value".to_string(),
            RuleKind::Boolean => "boolean".to_string(),
            RuleKind::Integer => "integer".to_string(),
            RuleKind::Number => "number".to_string(),
            RuleKind::String => "string".to_string(),
            RuleKind::Enumeration(variants) => format!("one of {}", render_variants(variants)),
            RuleKind::Object(_) => "object".to_string(),
            RuleKind::Array(_) => "array".to_string(),
        }
    }
}

/// Validation rule for one value.
///
/// Built through the shape constructors ([`string`](ElementRule::string),
/// [`object`](ElementRule::object), ...) and refined with the
/// [`optional`](ElementRule::optional) and [`nullable`](ElementRule::nullable)
/// modifiers. Optional governs absence, nullable governs explicit null; the
/// two are independent.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRule {
    kind: RuleKind,
    optional: bool,
    nullable: bool,
}

impl ElementRule {
    fn with_kind(kind: RuleKind) -> Self {
        Self {
            kind,
            optional: false,
            nullable: false,
        }
    }

    /// Accept any value.
    pub fn any() -> Self {
        Self::with_kind(RuleKind::Any)
    }

    /// Accept a boolean.
    pub fn boolean() -> Self {
        Self::with_kind(RuleKind::Boolean)
    }

    /// Accept a number without a fractional part.
    pub fn integer() -> Self {
        Self::with_kind(RuleKind::Integer)
    }

    /// Accept any number.
    pub fn number() -> Self {
        Self::with_kind(RuleKind::Number)
    }

    /// Accept a string.
    pub fn string() -> Self {
        Self::with_kind(RuleKind::String)
    }

    /// Accept one of a fixed set of string variants.
    pub fn enumeration<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind(RuleKind::Enumeration(
            variants.into_iter().map(Into::into).collect(),
        ))
    }

    /// Accept an object with the given field rules.
    pub fn object<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, ElementRule)>,
        S: Into<String>,
    {
        Self::with_kind(RuleKind::Object(
            fields.into_iter().map(|(name, rule)| (name.into(), rule)).collect(),
        ))
    }

    /// Accept an array whose elements all match `item`.
    pub fn array(item: ElementRule) -> Self {
        Self::with_kind(RuleKind::Array(Box::new(item)))
    }

    /// Allow the value to be absent entirely.
    ///
    /// For a tuple position this means the sequence may simply end before
    /// reaching it; for an object field, that the key may be missing. An
    /// explicit null is not absence and stays invalid unless the rule is
    /// also [`nullable`](ElementRule::nullable).
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Allow an explicit null as a valid value.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// The shape this rule accepts.
    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Whether the value may be absent.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether an explicit null is accepted.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Validate `value` at `path`, appending any failures to `issues`.
    pub(crate) fn check(&self, value: &Value, path: &Path, issues: &mut Vec<Issue>) {
        if value.is_null() {
            if !self.nullable && !matches!(self.kind, RuleKind::Any) {
                issues.push(mismatch(path, &self.kind, value));
            }
            return;
        }

        match &self.kind {
            RuleKind::Any => {}
            RuleKind::Boolean if value.is_boolean() => {}
            RuleKind::Integer if value.is_i64() || value.is_u64() => {}
            RuleKind::Number if value.is_number() => {}
            RuleKind::String if value.is_string() => {}
            RuleKind::Enumeration(variants) => match value.as_str() {
                Some(text) if variants.iter().any(|variant| variant == text) => {}
                Some(text) => issues.push(Issue::new(
                    path.clone(),
                    format!("\"{}\" is not one of {}", text, render_variants(variants)),
                )),
                None => issues.push(mismatch(path, &self.kind, value)),
            },
            RuleKind::Object(fields) => {
                let Some(map) = value.as_object() else {
                    issues.push(mismatch(path, &self.kind, value));
                    return;
                };
                for (name, rule) in fields {
                    match map.get(name) {
                        Some(field) => rule.check(field, &path.key(name), issues),
                        None if rule.optional => {}
                        None => issues.push(Issue::new(
                            path.key(name),
                            "required field is missing".to_string(),
                        )),
                    }
                }
            }
            RuleKind::Array(item) => {
                let Some(elements) = value.as_array() else {
                    issues.push(mismatch(path, &self.kind, value));
                    return;
                };
                for (index, element) in elements.iter().enumerate() {
                    item.check(element, &path.index(index), issues);
                }
            }
            _ => issues.push(mismatch(path, &self.kind, value)),
        }
    }

    /// JSON-Schema-style description of this rule, for discovery listings.
    pub fn describe(&self) -> Value {
        let schema = match &self.kind {
            RuleKind::Any => json!({}),
            RuleKind::Boolean => json!({ "type": "boolean" }),
            RuleKind::Integer => json!({ "type": "integer" }),
            RuleKind::Number => json!({ "type": "number" }),
            RuleKind::String => json!({ "type": "string" }),
            RuleKind::Enumeration(variants) => json!({ "enum": variants }),
            RuleKind::Object(fields) => {
                let properties: serde_json::Map<String, Value> = fields
                    .iter()
                    .map(|(name, rule)| (name.clone(), rule.describe()))
                    .collect();
                let required: Vec<&str> = fields
                    .iter()
                    .filter(|(_, rule)| !rule.optional)
                    .map(|(name, _)| name.as_str())
                    .collect();
                json!({ "type": "object", "properties": properties, "required": required })
            }
            RuleKind::Array(item) => json!({ "type": "array", "items": item.describe() }),
        };

        if self.nullable {
            json!({ "anyOf": [schema, { "type": "null" }] })
        } else {
            schema
        }
    }
}

fn mismatch(path: &Path, kind: &RuleKind, value: &Value) -> Issue {
    Issue::new(
        path.clone(),
        format!("expected {}, found {}", kind.expected(), kind_of(value)),
    )
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn render_variants(variants: &[String]) -> String {
    let quoted: Vec<String> = variants
        .iter()
        .map(|variant| format!("\"{}\"", variant))
        .collect();
    format!("[{}]", quoted.join(", "))
}
