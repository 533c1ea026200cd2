//! Validation System - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! Errors block rendering; warnings are recorded only.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::config::LocalePolicy;
use crate::format::parse_date_time;
use crate::i18n::Locale;
use crate::schema::{post_schema, FieldKind, PostSchema, TEMPLATE_ID, TEMPLATE_VERSION};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub field: Option<String>,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
    pub template_id: String,
    pub template_version: String,
}

impl ValidationResult {
    fn from_violations(violations: Vec<ValidationViolation>) -> Self {
        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        Self {
            valid,
            violations,
            template_id: TEMPLATE_ID.to_string(),
            template_version: TEMPLATE_VERSION.to_string(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    /// `rule(field): message` for every violation, joined with `; `.
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(|v| match &v.field {
                Some(field) => format!("{}({}): {}", v.rule, field, v.message),
                None => format!("{}: {}", v.rule, v.message),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, candidate: &Map<String, Value>, schema: &PostSchema) -> Vec<ValidationViolation>;
}

impl ValidationViolation {
    fn error(rule: &str, field: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            field: Some(field.to_string()),
            severity: ViolationSeverity::Error,
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    fn downgraded(mut self) -> Self {
        self.severity = ViolationSeverity::Warning;
        self
    }

    fn expected(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }
}

/// The string value of a field, when it is one.
fn string_field<'a>(candidate: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    candidate.get(name).and_then(Value::as_str)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// --- Concrete Rules ---

pub struct RequiredRule;

impl ValidationRule for RequiredRule {
    fn name(&self) -> &'static str { "required" }

    fn validate(&self, candidate: &Map<String, Value>, schema: &PostSchema) -> Vec<ValidationViolation> {
        schema
            .required()
            .filter(|f| candidate.get(f.name).map_or(true, Value::is_null))
            .map(|f| ValidationViolation::error(self.name(), f.name, "Required field is missing"))
            .collect()
    }
}

/// Every declared field is a string. `null` on an optional field means absent.
pub struct TypeRule;

impl ValidationRule for TypeRule {
    fn name(&self) -> &'static str { "type" }

    fn validate(&self, candidate: &Map<String, Value>, schema: &PostSchema) -> Vec<ValidationViolation> {
        schema
            .fields
            .iter()
            .filter_map(|f| candidate.get(f.name).map(|v| (f, v)))
            .filter(|(_, v)| !v.is_null() && !v.is_string())
            .map(|(f, v)| {
                ValidationViolation::error(self.name(), f.name, "Field must be a string")
                    .expected("string", json_type(v))
            })
            .collect()
    }
}

pub struct NonEmptyRule;

impl ValidationRule for NonEmptyRule {
    fn name(&self) -> &'static str { "non_empty" }

    fn validate(&self, candidate: &Map<String, Value>, _schema: &PostSchema) -> Vec<ValidationViolation> {
        ["content", "title", "image"]
            .into_iter()
            .filter(|name| string_field(candidate, name).is_some_and(|s| s.trim().is_empty()))
            .map(|name| ValidationViolation::error(self.name(), name, "Field must not be blank"))
            .collect()
    }
}

/// Unparseable dates are recorded, not blocking: the card shows `Invalid Date`.
pub struct DateTimeRule;

impl ValidationRule for DateTimeRule {
    fn name(&self) -> &'static str { "date_time" }

    fn validate(&self, candidate: &Map<String, Value>, schema: &PostSchema) -> Vec<ValidationViolation> {
        schema
            .fields
            .iter()
            .filter(|f| f.kind == FieldKind::DateTime)
            .filter_map(|f| string_field(candidate, f.name).map(|s| (f, s)))
            .filter(|(_, s)| parse_date_time(s).is_none())
            .map(|(f, s)| {
                ValidationViolation::error(self.name(), f.name, "Not an ISO-8601 date-time")
                    .expected("ISO-8601 date-time", s)
                    .downgraded()
            })
            .collect()
    }
}

/// Absolute URI, or a relative reference such as a bundled asset path.
pub struct ImageReferenceRule;

impl ImageReferenceRule {
    fn is_reference(s: &str) -> bool {
        if s.trim().is_empty() || s.chars().any(char::is_whitespace) {
            return false;
        }
        if Url::parse(s).is_ok() {
            return true;
        }
        Url::parse("http://localhost/").and_then(|base| base.join(s)).is_ok()
    }
}

impl ValidationRule for ImageReferenceRule {
    fn name(&self) -> &'static str { "image_reference" }

    fn validate(&self, candidate: &Map<String, Value>, schema: &PostSchema) -> Vec<ValidationViolation> {
        schema
            .fields
            .iter()
            .filter(|f| f.kind == FieldKind::Image)
            .filter_map(|f| string_field(candidate, f.name).map(|s| (f, s)))
            // blank values are reported by `non_empty`
            .filter(|(_, s)| !s.trim().is_empty() && !Self::is_reference(s))
            .map(|(f, s)| {
                ValidationViolation::error(self.name(), f.name, "Not a URI or asset reference")
                    .expected("URI reference", s)
            })
            .collect()
    }
}

/// `views`: digit groups split by `,`, at most one `.` after the last `,`,
/// optional `k`/`m` suffix.
pub struct NumericRule;

impl NumericRule {
    pub fn is_numeric_like(s: &str) -> bool {
        let body = s.strip_suffix(['k', 'K', 'm', 'M']).unwrap_or(s);
        let (whole, fraction) = body.split_once('.').unwrap_or((body, "0"));
        let digits = |group: &str| !group.is_empty() && group.chars().all(|c| c.is_ascii_digit());
        whole.split(',').all(digits) && digits(fraction)
    }
}

impl ValidationRule for NumericRule {
    fn name(&self) -> &'static str { "numeric" }

    fn validate(&self, candidate: &Map<String, Value>, _schema: &PostSchema) -> Vec<ValidationViolation> {
        match string_field(candidate, "views") {
            Some(s) if !Self::is_numeric_like(s) => vec![
                ValidationViolation::error(self.name(), "views", "Not a numeric-looking string")
                    .expected("digits, e.g. 300 or 1,200", s),
            ],
            _ => vec![],
        }
    }
}

/// Supplied locales must be in the translation dictionary.
/// Empty string counts as not supplied.
pub struct LocaleRule {
    pub policy: LocalePolicy,
}

impl ValidationRule for LocaleRule {
    fn name(&self) -> &'static str { "locale" }

    fn validate(&self, candidate: &Map<String, Value>, _schema: &PostSchema) -> Vec<ValidationViolation> {
        let Some(code) = string_field(candidate, "locale") else {
            return vec![];
        };
        if code.is_empty() || Locale::parse(code).is_some() {
            return vec![];
        }
        let mut violation = ValidationViolation::error(self.name(), "locale", "Unsupported locale")
            .expected("one of: en, es", code);
        if self.policy == LocalePolicy::Fallback {
            violation = violation.downgraded();
            violation.message = format!("Unsupported locale, rendering in {}", Locale::default());
        }
        vec![violation]
    }
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule + Send + Sync>>,
    policy: LocalePolicy,
}

impl Validator {
    pub fn new() -> Self {
        Self::with_policy(LocalePolicy::default())
    }

    pub fn with_policy(policy: LocalePolicy) -> Self {
        Self {
            rules: vec![
                Box::new(RequiredRule),
                Box::new(TypeRule),
                Box::new(NonEmptyRule),
                Box::new(DateTimeRule),
                Box::new(ImageReferenceRule),
                Box::new(NumericRule),
                Box::new(LocaleRule { policy }),
            ],
            policy,
        }
    }

    pub fn policy(&self) -> LocalePolicy {
        self.policy
    }

    pub fn check(&self, candidate: &Value) -> ValidationResult {
        let Some(object) = candidate.as_object() else {
            return ValidationResult::from_violations(vec![ValidationViolation {
                rule: "object".to_string(),
                field: None,
                severity: ViolationSeverity::Error,
                message: "Variables must be an object".to_string(),
                expected: Some("object".to_string()),
                actual: Some(json_type(candidate).to_string()),
            }]);
        };

        let schema = post_schema();
        let violations = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(object, schema))
            .collect();

        ValidationResult::from_violations(violations)
    }

    pub fn validate(&self, candidate: &Value) -> bool {
        self.check(candidate).valid
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>())
            .field("policy", &self.policy)
            .finish()
    }
}

/// Check a candidate with the default (rejecting) policy.
pub fn validate(candidate: &Value) -> bool {
    Validator::new().validate(candidate)
}
