//! Ordered-tuple schemas
//!
//! A [`TupleSchema`] validates a whole positional sequence: a fixed run of
//! element rules, optionally followed by a variadic `rest` rule matching any
//! number of trailing extras.

use serde_json::{Value, json};

use crate::issue::{Issue, Issues, Path};
use crate::rule::ElementRule;

/// Schema for an ordered sequence of independently validated values.
///
/// Arity is part of the contract: without a `rest` rule the sequence may not
/// run past the fixed elements, and it must reach at least the last
/// non-optional one. Optional positions are only ever absent from the tail;
/// a sequence cannot skip position 1 and supply position 2.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleSchema {
    elements: Vec<ElementRule>,
    rest: Option<ElementRule>,
}

impl TupleSchema {
    /// Schema with the given positional element rules.
    pub fn new(elements: Vec<ElementRule>) -> Self {
        Self {
            elements,
            rest: None,
        }
    }

    /// Schema accepting an empty sequence only.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Accept any number of trailing extras, each validated against `rest`.
    pub fn with_rest(mut self, rest: ElementRule) -> Self {
        self.rest = Some(rest);
        self
    }

    /// Number of fixed positions.
    pub fn arity(&self) -> usize {
        self.elements.len()
    }

    /// Number of positions that must be supplied: everything up to and
    /// including the last non-optional element.
    pub fn required_arity(&self) -> usize {
        self.elements
            .iter()
            .rposition(|rule| !rule.is_optional())
            .map_or(0, |last| last + 1)
    }

    /// Whether the schema accepts trailing extras.
    pub fn has_rest(&self) -> bool {
        self.rest.is_some()
    }

    /// Validate `values` against the schema.
    ///
    /// On success the validated sequence comes back unchanged: absent
    /// optional tail positions stay absent (the result is simply shorter)
    /// and an explicit null for a nullable position is preserved. On failure
    /// every issue found is reported, not just the first.
    pub fn parse(&self, values: &[Value]) -> Result<Vec<Value>, Issues> {
        let mut issues = Vec::new();
        let required = self.required_arity();

        if values.len() < required {
            issues.push(Issue::new(
                Path::root(),
                format!(
                    "expected at least {} value(s), found {}",
                    required,
                    values.len()
                ),
            ));
        }

        for (index, value) in values.iter().enumerate() {
            match self.elements.get(index) {
                Some(rule) => rule.check(value, &Path::root().index(index), &mut issues),
                None => match &self.rest {
                    Some(rule) => rule.check(value, &Path::root().index(index), &mut issues),
                    None => {
                        issues.push(Issue::new(
                            Path::root(),
                            format!(
                                "expected at most {} value(s), found {}",
                                self.elements.len(),
                                values.len()
                            ),
                        ));
                        break;
                    }
                },
            }
        }

        if issues.is_empty() {
            Ok(values.to_vec())
        } else {
            Err(Issues::new(issues))
        }
    }

    /// JSON-Schema-style description of the tuple, for discovery listings.
    ///
    /// Fixed positions become `prefixItems`, the required arity becomes
    /// `minItems`, and the tail is either the `rest` rule under `items` or
    /// `"items": false` plus `maxItems` for closed tuples.
    pub fn describe(&self) -> Value {
        let prefix: Vec<Value> = self.elements.iter().map(ElementRule::describe).collect();
        let mut schema = json!({
            "type": "array",
            "prefixItems": prefix,
            "minItems": self.required_arity(),
        });

        match &self.rest {
            Some(rule) => {
                schema["items"] = rule.describe();
            }
            None => {
                schema["items"] = Value::Bool(false);
                schema["maxItems"] = json!(self.elements.len());
            }
        }

        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_schema_accepts_empty_sequence_only() {
        let schema = TupleSchema::empty();
        assert_eq!(schema.parse(&[]).unwrap(), Vec::<Value>::new());

        let issues = schema.parse(&[json!(1)]).unwrap_err();
        assert_eq!(issues.to_string(), "$: expected at most 0 value(s), found 1");
    }

    #[test]
    fn required_arity_stops_at_last_required_element() {
        let schema = TupleSchema::new(vec![
            ElementRule::string(),
            ElementRule::integer().optional(),
            ElementRule::boolean().optional(),
        ]);
        assert_eq!(schema.arity(), 3);
        assert_eq!(schema.required_arity(), 1);

        // An optional before a required position does not lower the bar.
        let schema = TupleSchema::new(vec![
            ElementRule::string().optional(),
            ElementRule::integer(),
        ]);
        assert_eq!(schema.required_arity(), 2);
    }

    #[test]
    fn too_few_values_is_reported_at_the_root() {
        let schema = TupleSchema::new(vec![ElementRule::string(), ElementRule::integer()]);
        let issues = schema.parse(&[json!("a")]).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues.to_string(),
            "$: expected at least 2 value(s), found 1"
        );
    }

    #[test]
    fn absent_optional_tail_stays_absent() {
        let schema = TupleSchema::new(vec![
            ElementRule::string(),
            ElementRule::integer().optional(),
        ]);
        let parsed = schema.parse(&[json!("a")]).unwrap();
        assert_eq!(parsed, vec![json!("a")]);
    }

    #[test]
    fn explicit_null_is_preserved_for_nullable_positions() {
        let schema = TupleSchema::new(vec![ElementRule::string().nullable()]);
        let parsed = schema.parse(&[Value::Null]).unwrap();
        assert_eq!(parsed, vec![Value::Null]);
    }

    #[test]
    fn null_is_not_absence() {
        let schema = TupleSchema::new(vec![ElementRule::string().optional()]);
        let issues = schema.parse(&[Value::Null]).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues.iter().next().unwrap().path.to_string(), "$[0]");
    }

    #[test]
    fn extras_without_rest_are_rejected_once() {
        let schema = TupleSchema::new(vec![ElementRule::string()]);
        let issues = schema.parse(&[json!("a"), json!(1), json!(2)]).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues.to_string(), "$: expected at most 1 value(s), found 3");
    }

    #[test]
    fn rest_validates_every_extra() {
        let schema =
            TupleSchema::new(vec![ElementRule::string()]).with_rest(ElementRule::integer());

        assert!(schema.parse(&[json!("tag")]).is_ok());
        assert!(schema.parse(&[json!("tag"), json!(1), json!(2), json!(3)]).is_ok());

        let issues = schema
            .parse(&[json!("tag"), json!(1), json!("not an integer")])
            .unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues.iter().next().unwrap().path.to_string(), "$[2]");
    }

    #[test]
    fn all_issues_are_collected_in_order() {
        let schema = TupleSchema::new(vec![
            ElementRule::string(),
            ElementRule::object([("id", ElementRule::integer())]),
        ]);

        let issues = schema.parse(&[json!(1), json!({"id": "x"})]).unwrap_err();
        let paths: Vec<String> = issues.iter().map(|issue| issue.path.to_string()).collect();
        assert_eq!(paths, vec!["$[0]", "$[1].id"]);
    }

    #[test]
    fn describe_renders_a_closed_tuple() {
        let schema = TupleSchema::new(vec![
            ElementRule::string(),
            ElementRule::integer().optional(),
        ]);
        assert_eq!(
            schema.describe(),
            json!({
                "type": "array",
                "prefixItems": [{"type": "string"}, {"type": "integer"}],
                "minItems": 1,
                "items": false,
                "maxItems": 2,
            })
        );
    }

    #[test]
    fn describe_renders_a_variadic_tail() {
        let schema = TupleSchema::new(vec![ElementRule::string()])
            .with_rest(ElementRule::number());
        assert_eq!(
            schema.describe(),
            json!({
                "type": "array",
                "prefixItems": [{"type": "string"}],
                "minItems": 1,
                "items": {"type": "number"},
            })
        );
    }
}
