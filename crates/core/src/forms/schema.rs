//! Field schemas and per-field validation.
//!
//! A [`FieldSchema`] declares a field's kind, whether it is required, its ordered constraints and,
//! for enumerated selects, where its options come from. [`validate_field`] evaluates a value
//! against a schema: the first failing constraint's message is the reported error.

use super::value::{FieldKind, FieldName, FieldValue};
use crate::error::{HealthError, HealthResult};
use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied predicate for [`Rule::Custom`].
pub type Predicate = Arc<dyn Fn(&FieldValue) -> bool + Send + Sync>;

/// A single check applied to a non-empty value of the right kind.
///
/// Rules that do not apply to the value's kind (a length rule on a number) hold trivially.
#[derive(Clone)]
pub enum Rule {
    /// Minimum length in characters.
    MinLength(usize),
    /// Maximum length in characters.
    MaxLength(usize),
    /// Whole-value regular expression match.
    Pattern(Regex),
    Min(f64),
    Max(f64),
    /// Text must be one of the listed values.
    OneOf(Vec<String>),
    /// At least 8 characters with a lowercase letter, an uppercase letter, a digit and a
    /// character that is none of those.
    PasswordStrength,
    /// Inclusive date bounds.
    DateRange { earliest: NaiveDate, latest: NaiveDate },
    Custom(Predicate),
}

impl Rule {
    pub fn holds(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Rule::MinLength(n), FieldValue::Text(s)) => s.chars().count() >= *n,
            (Rule::MaxLength(n), FieldValue::Text(s)) => s.chars().count() <= *n,
            (Rule::Pattern(re), FieldValue::Text(s)) => re.is_match(s),
            (Rule::Min(min), FieldValue::Number(n)) => n >= min,
            (Rule::Max(max), FieldValue::Number(n)) => n <= max,
            (Rule::OneOf(options), FieldValue::Text(s)) => options.iter().any(|o| o == s),
            (Rule::PasswordStrength, FieldValue::Text(s)) => is_strong_password(s),
            (Rule::DateRange { earliest, latest }, FieldValue::Date(d)) => {
                d >= earliest && d <= latest
            }
            (Rule::Custom(predicate), v) => predicate(v),
            _ => true,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::MinLength(n) => write!(f, "MinLength({n})"),
            Rule::MaxLength(n) => write!(f, "MaxLength({n})"),
            Rule::Pattern(re) => write!(f, "Pattern({})", re.as_str()),
            Rule::Min(n) => write!(f, "Min({n})"),
            Rule::Max(n) => write!(f, "Max({n})"),
            Rule::OneOf(options) => write!(f, "OneOf({options:?})"),
            Rule::PasswordStrength => f.write_str("PasswordStrength"),
            Rule::DateRange { earliest, latest } => write!(f, "DateRange({earliest}..={latest})"),
            Rule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn is_strong_password(s: &str) -> bool {
    let mut lower = false;
    let mut upper = false;
    let mut digit = false;
    let mut other = false;
    for c in s.chars() {
        match c {
            'a'..='z' => lower = true,
            'A'..='Z' => upper = true,
            '0'..='9' => digit = true,
            '\n' | '\r' => return false,
            _ => other = true,
        }
    }
    s.chars().count() >= 8 && lower && upper && digit && other
}

/// A rule paired with the message reported when it fails.
#[derive(Clone, Debug)]
pub struct Constraint {
    pub rule: Rule,
    pub message: String,
}

/// Options of dependent selects keyed by the parent's value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionMap(BTreeMap<String, Vec<String>>);

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from static `(parent, options)` rows.
    pub fn from_rows(rows: &[(&str, &[&str])]) -> Self {
        rows.iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    pub fn insert(&mut self, parent: impl Into<String>, options: Vec<String>) {
        self.0.insert(parent.into(), options);
    }

    /// Options for a parent value. A known parent with no entry has no children.
    pub fn get(&self, parent: &str) -> &[String] {
        self.0.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Every option reachable from any parent value.
    pub fn all_options(&self) -> impl Iterator<Item = &str> {
        self.0.values().flatten().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for OptionMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Where an enumerated field's options come from.
#[derive(Clone, Debug)]
pub enum OptionSource {
    Static(Vec<String>),
    /// Options follow the current value of `parent`.
    Dependent { parent: FieldName, map: OptionMap },
}

/// Declaration of one field.
#[derive(Clone, Debug)]
pub struct FieldSchema {
    pub name: FieldName,
    pub kind: FieldKind,
    pub required: bool,
    pub required_message: String,
    pub constraints: Vec<Constraint>,
    pub options: Option<OptionSource>,
    pub default: FieldValue,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = FieldName::new(name);
        Self {
            required_message: format!("{name} is required"),
            name,
            kind,
            required: false,
            constraints: Vec::new(),
            options: None,
            default: FieldValue::Empty,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = true;
        self.required_message = message.into();
        self
    }

    pub fn rule(mut self, rule: Rule, message: impl Into<String>) -> Self {
        self.constraints.push(Constraint {
            rule,
            message: message.into(),
        });
        self
    }

    pub fn min_length(self, n: usize, message: impl Into<String>) -> Self {
        self.rule(Rule::MinLength(n), message)
    }

    pub fn max_length(self, n: usize, message: impl Into<String>) -> Self {
        self.rule(Rule::MaxLength(n), message)
    }

    pub fn min(self, n: f64, message: impl Into<String>) -> Self {
        self.rule(Rule::Min(n), message)
    }

    pub fn max(self, n: f64, message: impl Into<String>) -> Self {
        self.rule(Rule::Max(n), message)
    }

    /// Adds a whole-value pattern constraint.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::InvalidPattern`] if `pattern` does not compile.
    pub fn pattern(self, pattern: &str, message: impl Into<String>) -> HealthResult<Self> {
        let re = Regex::new(pattern).map_err(|source| HealthError::InvalidPattern {
            field: self.name.to_string(),
            source,
        })?;
        Ok(self.rule(Rule::Pattern(re), message))
    }

    /// Declares a static option list and enforces membership.
    pub fn one_of(mut self, options: &[&str], message: impl Into<String>) -> Self {
        let options: Vec<String> = options.iter().map(|o| (*o).to_owned()).collect();
        self.options = Some(OptionSource::Static(options.clone()));
        self.rule(Rule::OneOf(options), message)
    }

    /// Declares the field's options as following `parent`'s value.
    pub fn depends_on(mut self, parent: impl Into<String>, map: OptionMap) -> Self {
        self.options = Some(OptionSource::Dependent {
            parent: FieldName::new(parent),
            map,
        });
        self
    }

    pub fn default_value(mut self, value: FieldValue) -> Self {
        self.default = value;
        self
    }

    /// Parent field when this field is a dependent select.
    pub fn parent(&self) -> Option<&FieldName> {
        match &self.options {
            Some(OptionSource::Dependent { parent, .. }) => Some(parent),
            _ => None,
        }
    }
}

/// Validate a value against a field schema.
///
/// Empty values report the required message for required fields and pass otherwise. Values of
/// the wrong kind fail before any constraint runs. Constraints run in declaration order and the
/// first failure wins.
pub fn validate_field(schema: &FieldSchema, value: &FieldValue) -> Result<(), String> {
    if value.is_empty() {
        return if schema.required {
            Err(schema.required_message.clone())
        } else {
            Ok(())
        };
    }

    if value.kind() != Some(schema.kind) {
        return Err(format!("{} must be {}", schema.name, schema.kind.describe()));
    }

    match schema.constraints.iter().find(|c| !c.rule.holds(value)) {
        Some(failed) => Err(failed.message.clone()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mobile() -> FieldSchema {
        FieldSchema::text("mobile")
            .required("enter a mobile number")
            .pattern(r"^1[3-9][0-9]{9}$", "invalid mobile number")
            .expect("valid pattern")
    }

    #[test]
    fn required_empty_reports_required_message() {
        let err = validate_field(&mobile(), &FieldValue::Empty).expect_err("required");
        assert_eq!(err, "enter a mobile number");
    }

    #[test]
    fn optional_empty_passes_without_constraints() {
        let schema = FieldSchema::text("mobile")
            .pattern(r"^1[3-9][0-9]{9}$", "invalid mobile number")
            .expect("valid pattern");
        assert!(validate_field(&schema, &FieldValue::Empty).is_ok());
        assert!(validate_field(&schema, &FieldValue::text("")).is_ok());
    }

    #[test]
    fn first_failing_constraint_wins() {
        let schema = FieldSchema::text("address")
            .min_length(5, "too short")
            .max_length(3, "too long");
        let err = validate_field(&schema, &FieldValue::text("abc")).expect_err("fails");
        assert_eq!(err, "too short");
        let err = validate_field(&schema, &FieldValue::text("abcdef")).expect_err("fails");
        assert_eq!(err, "too long");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let schema = FieldSchema::text("address").min_length(5, "too short");
        assert!(validate_field(&schema, &FieldValue::text("朝阳区三里")).is_ok());
        assert!(validate_field(&schema, &FieldValue::text("朝阳区")).is_err());
    }

    #[test]
    fn wrong_kind_fails_before_constraints() {
        let schema = FieldSchema::number("height").min(50.0, "too short");
        let err = validate_field(&schema, &FieldValue::text("tall")).expect_err("kind");
        assert!(err.contains("must be a number"));
    }

    #[test]
    fn numeric_bounds_are_inclusive() {
        let schema = FieldSchema::number("height")
            .min(50.0, "too short")
            .max(250.0, "too tall");
        assert!(validate_field(&schema, &FieldValue::Number(50.0)).is_ok());
        assert!(validate_field(&schema, &FieldValue::Number(250.0)).is_ok());
        assert_eq!(
            validate_field(&schema, &FieldValue::Number(49.9)),
            Err("too short".to_string())
        );
        assert_eq!(
            validate_field(&schema, &FieldValue::Number(250.1)),
            Err("too tall".to_string())
        );
    }

    #[test]
    fn password_strength_requires_all_classes() {
        assert!(is_strong_password("Abcdefg1!"));
        assert!(!is_strong_password("abcdefgh"));
        assert!(!is_strong_password("Abcdefgh1"));
        assert!(!is_strong_password("Abc1!"));
        assert!(!is_strong_password("ABCDEFG1!"));
    }

    #[test]
    fn custom_predicate_is_applied() {
        let schema = FieldSchema::text("code").rule(
            Rule::Custom(Arc::new(|v| v.as_text().is_some_and(|s| s.len() == 6))),
            "code must have 6 characters",
        );
        assert!(validate_field(&schema, &FieldValue::text("123456")).is_ok());
        assert!(validate_field(&schema, &FieldValue::text("12345")).is_err());
    }

    #[test]
    fn invalid_pattern_is_a_schema_error() {
        let err = FieldSchema::text("broken")
            .pattern("(unclosed", "never")
            .expect_err("should reject");
        assert!(matches!(err, HealthError::InvalidPattern { field, .. } if field == "broken"));
    }

    #[test]
    fn option_map_unknown_parent_has_no_children() {
        let mut map = OptionMap::new();
        map.insert("北京市", vec!["朝阳区".to_string()]);
        assert_eq!(map.get("北京市"), ["朝阳区".to_string()]);
        assert!(map.get("东城区").is_empty());
    }
}
