//! Declarative payload schemas.
//!
//! A [`Schema`] describes the structural constraints of one JSON object shape:
//! which keys may appear, which must appear, and per-field type and bound
//! checks. Validation is pure; it never mutates the payload.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Offending key (`""` when the payload itself is the problem).
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All constraints a payload failed, in schema declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summary(.0))]
pub struct ValidationErrors(pub Vec<FieldViolation>);

fn summary(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    String {
        min_len: Option<usize>,
        max_len: Option<usize>,
    },
    Number {
        integer: bool,
        min: Option<f64>,
        max: Option<f64>,
    },
    Boolean,
}

/// Constraint for one field. Fields are optional unless [`FieldRule::required`] is set.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    kind: Kind,
    required: bool,
}

impl FieldRule {
    pub fn string() -> Self {
        Self {
            kind: Kind::String {
                min_len: None,
                max_len: None,
            },
            required: false,
        }
    }

    pub fn number() -> Self {
        Self {
            kind: Kind::Number {
                integer: false,
                min: None,
                max: None,
            },
            required: false,
        }
    }

    pub fn integer() -> Self {
        Self {
            kind: Kind::Number {
                integer: true,
                min: None,
                max: None,
            },
            required: false,
        }
    }

    pub fn boolean() -> Self {
        Self {
            kind: Kind::Boolean,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Minimum length in UTF-16 code units, so an astral-plane character counts
    /// as two. No effect on non-string rules.
    pub fn min_len(mut self, n: usize) -> Self {
        if let Kind::String { min_len, .. } = &mut self.kind {
            *min_len = Some(n);
        }
        self
    }

    /// Maximum length in UTF-16 code units. No effect on non-string rules.
    pub fn max_len(mut self, n: usize) -> Self {
        if let Kind::String { max_len, .. } = &mut self.kind {
            *max_len = Some(n);
        }
        self
    }

    /// Inclusive lower bound. No effect on non-number rules.
    pub fn min(mut self, n: f64) -> Self {
        if let Kind::Number { min, .. } = &mut self.kind {
            *min = Some(n);
        }
        self
    }

    /// Inclusive upper bound. No effect on non-number rules.
    pub fn max(mut self, n: f64) -> Self {
        if let Kind::Number { max, .. } = &mut self.kind {
            *max = Some(n);
        }
        self
    }

    fn check(&self, field: &str, value: &Value) -> Option<FieldViolation> {
        match (&self.kind, value) {
            (Kind::String { min_len, max_len }, Value::String(s)) => {
                let len = s.encode_utf16().count();
                if let Some(min) = min_len.filter(|m| len < *m) {
                    return Some(FieldViolation::new(
                        field,
                        format!("\"{field}\" length must be at least {min} characters long"),
                    ));
                }
                if let Some(max) = max_len.filter(|m| len > *m) {
                    return Some(FieldViolation::new(
                        field,
                        format!("\"{field}\" length must be less than or equal to {max} characters long"),
                    ));
                }
                None
            }
            (Kind::String { .. }, _) => Some(FieldViolation::new(
                field,
                format!("\"{field}\" must be a string"),
            )),
            (Kind::Number { integer, min, max }, Value::Number(n)) => {
                let Some(v) = n.as_f64() else {
                    return Some(FieldViolation::new(field, format!("\"{field}\" must be a number")));
                };
                if *integer && v.fract() != 0.0 {
                    return Some(FieldViolation::new(
                        field,
                        format!("\"{field}\" must be an integer"),
                    ));
                }
                if let Some(min) = min.filter(|m| v < *m) {
                    return Some(FieldViolation::new(
                        field,
                        format!("\"{field}\" must be greater than or equal to {min}"),
                    ));
                }
                if let Some(max) = max.filter(|m| v > *m) {
                    return Some(FieldViolation::new(
                        field,
                        format!("\"{field}\" must be less than or equal to {max}"),
                    ));
                }
                None
            }
            (Kind::Number { .. }, _) => Some(FieldViolation::new(
                field,
                format!("\"{field}\" must be a number"),
            )),
            (Kind::Boolean, Value::Bool(_)) => None,
            (Kind::Boolean, _) => Some(FieldViolation::new(
                field,
                format!("\"{field}\" must be a boolean"),
            )),
        }
    }
}

/// Object schema: ordered field rules plus an unknown-key policy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: Vec<(&'static str, FieldRule)>,
    allow_unknown: bool,
}

impl Schema {
    /// Empty object schema. Unknown keys are rejected until [`Schema::allow_unknown`].
    pub fn object() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, rule: FieldRule) -> Self {
        self.fields.push((name, rule));
        self
    }

    pub fn allow_unknown(mut self) -> Self {
        self.allow_unknown = true;
        self
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, r)| r)
    }

    /// Check `payload` against every rule.
    pub fn validate(&self, payload: &Value) -> Result<(), ValidationErrors> {
        let Value::Object(map) = payload else {
            return Err(ValidationErrors(vec![FieldViolation::new(
                "",
                "payload must be an object",
            )]));
        };

        let mut violations = self.check_fields(map);
        if !self.allow_unknown {
            violations.extend(
                map.keys()
                    .filter(|k| self.rule(k).is_none())
                    .map(|k| FieldViolation::new(k.as_str(), format!("\"{k}\" is not allowed"))),
            );
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(violations))
        }
    }

    fn check_fields(&self, map: &Map<String, Value>) -> Vec<FieldViolation> {
        self.fields
            .iter()
            .filter_map(|(name, rule)| match map.get(*name) {
                None if rule.required => {
                    Some(FieldViolation::new(*name, format!("\"{name}\" is required")))
                }
                None => None,
                Some(value) => rule.check(name, value),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content_schema() -> Schema {
        Schema::object().field("content", FieldRule::string().min_len(3))
    }

    #[test]
    fn optional_field_may_be_absent() {
        assert!(content_schema().validate(&json!({})).is_ok());
    }

    #[test]
    fn short_string_fails_min_len() {
        let err = content_schema().validate(&json!({ "content": "hi" })).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].field, "content");
        assert!(err.to_string().contains("at least 3"));
    }

    #[test]
    fn string_at_bound_passes() {
        assert!(content_schema().validate(&json!({ "content": "abc" })).is_ok());
        assert!(content_schema().validate(&json!({ "content": "hello" })).is_ok());
    }

    #[test]
    fn length_counts_utf16_units() {
        assert!(content_schema().validate(&json!({ "content": "😀a" })).is_ok());
        assert!(content_schema().validate(&json!({ "content": "éa" })).is_err());

        let short = Schema::object().field("code", FieldRule::string().max_len(3));
        assert!(short.validate(&json!({ "code": "😀😀" })).is_err());
        assert!(short.validate(&json!({ "code": "😀a" })).is_ok());
    }

    #[test]
    fn wrong_type_and_null_are_rejected() {
        assert!(content_schema().validate(&json!({ "content": 42 })).is_err());
        assert!(content_schema().validate(&json!({ "content": null })).is_err());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = content_schema().validate(&json!(["content"])).unwrap_err();
        assert_eq!(err.violations()[0].field, "");
    }

    #[test]
    fn unknown_keys_are_rejected_unless_allowed() {
        let payload = json!({ "content": "hello", "extra": true });
        let err = content_schema().validate(&payload).unwrap_err();
        assert_eq!(err.violations()[0].field, "extra");

        assert!(content_schema().allow_unknown().validate(&payload).is_ok());
    }

    #[test]
    fn required_field_missing_is_reported() {
        let schema = Schema::object().field("name", FieldRule::string().required());
        let err = schema.validate(&json!({})).unwrap_err();
        assert_eq!(err.violations()[0].message, "\"name\" is required");
    }

    #[test]
    fn integer_bounds() {
        let schema = Schema::object().field("price", FieldRule::integer().min(0.0));
        assert!(schema.validate(&json!({ "price": 0 })).is_ok());
        assert!(schema.validate(&json!({ "price": -1 })).is_err());
        assert!(schema.validate(&json!({ "price": 1.5 })).is_err());
    }

    #[test]
    fn number_bounds_accept_fractions() {
        let schema = Schema::object().field("ratio", FieldRule::number().min(0.0).max(1.0));
        assert!(schema.validate(&json!({ "ratio": 0.25 })).is_ok());
        assert!(schema.validate(&json!({ "ratio": 1 })).is_ok());

        let err = schema.validate(&json!({ "ratio": 1.5 })).unwrap_err();
        assert_eq!(err.violations()[0].message, "\"ratio\" must be less than or equal to 1");
        assert!(schema.validate(&json!({ "ratio": "half" })).is_err());
    }

    #[test]
    fn violations_follow_declaration_order() {
        let schema = Schema::object()
            .field("a", FieldRule::string().required())
            .field("b", FieldRule::boolean().required());
        let err = schema.validate(&json!({})).unwrap_err();
        let fields: Vec<_> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["a", "b"]);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a string passes the min-length rule iff it has at least 3 UTF-16 units.
            #[test]
            fn min_len_matches_utf16_length(s in "\\PC{0,8}") {
                let ok = content_schema().validate(&json!({ "content": s.clone() })).is_ok();
                prop_assert_eq!(ok, s.encode_utf16().count() >= 3);
            }
        }
    }
}
