//! Form state and the cascade resolver.
//!
//! [`FormState::apply`] is the single state transition for user input: it stores the value,
//! re-validates the field and clears every dependent field in the same step, so no observer ever
//! sees a child holding a value that is inconsistent with its parent.

use super::graph::{FieldValues, FormSchema};
use super::schema::{validate_field, OptionSource};
use super::value::{FieldName, FieldValue};
use crate::error::{HealthError, HealthResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-field state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldState {
    pub value: FieldValue,
    pub touched: bool,
    pub error: Option<String>,
}

/// Options currently offered by an enumerated field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldOptions {
    pub options: Vec<String>,
    /// True when the field depends on a parent that has no value yet. This is not an error.
    pub disabled: bool,
}

impl FieldOptions {
    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }
}

/// A validated submission: every non-empty field, plus required fields.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Payload(FieldValues);

impl Payload {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldName> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_values(self) -> FieldValues {
        self.0
    }
}

/// Field name to error message, for every field that failed.
#[derive(Clone, Debug, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(BTreeMap<FieldName, String>);

impl ValidationErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Mapping from field name to its state.
#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    fields: BTreeMap<FieldName, FieldState>,
}

impl FormState {
    /// Fresh state: declared defaults, nothing touched, no errors.
    pub fn initial(schema: &FormSchema) -> Self {
        let fields = schema
            .fields()
            .iter()
            .map(|f| {
                (
                    f.name.clone(),
                    FieldState {
                        value: f.default.clone(),
                        ..FieldState::default()
                    },
                )
            })
            .collect();
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).map(|f| &f.value)
    }

    pub fn values(&self) -> FieldValues {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect()
    }

    /// Options `name` offers given the current value of its parent.
    ///
    /// Returns `Ok(None)` for free-input fields.
    pub fn options_for(&self, schema: &FormSchema, name: &str) -> HealthResult<Option<FieldOptions>> {
        let field = schema
            .field(name)
            .ok_or_else(|| HealthError::UnknownField(name.to_string()))?;

        let options = match &field.options {
            None => return Ok(None),
            Some(OptionSource::Static(options)) => FieldOptions {
                options: options.clone(),
                disabled: false,
            },
            Some(OptionSource::Dependent { parent, map }) => {
                match self.value(parent.as_str()).and_then(FieldValue::as_text) {
                    Some(parent_value) if !parent_value.is_empty() => FieldOptions {
                        options: map.get(parent_value).to_vec(),
                        disabled: false,
                    },
                    _ => FieldOptions {
                        options: Vec::new(),
                        disabled: true,
                    },
                }
            }
        };
        Ok(Some(options))
    }

    /// Set `name` to `value`, returning the next state.
    ///
    /// - The field is marked touched and re-validated.
    /// - A dependent select given a value outside its current option set is stored empty with
    ///   no error, as if nothing had been chosen. Fixed-list fields are validated like any other
    ///   field, so an unlisted value keeps its `OneOf` error.
    /// - If the stored value differs from the previous one, every descendant field in the
    ///   dependency graph is cleared (value and error) in the same transition.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::UnknownField`] if the schema has no field called `name`.
    pub fn apply(&self, schema: &FormSchema, name: &str, value: FieldValue) -> HealthResult<Self> {
        let field = schema
            .field(name)
            .ok_or_else(|| HealthError::UnknownField(name.to_string()))?;

        // Only dependent selects drop stale values; fixed lists report them through `OneOf`.
        let not_offered = match (&field.options, value.as_text()) {
            (Some(OptionSource::Dependent { .. }), Some(text)) if !text.is_empty() => self
                .options_for(schema, name)?
                .is_some_and(|options| !options.contains(text)),
            _ => false,
        };
        let (value, error) = if not_offered {
            tracing::debug!(field = name, "value not offered; field reset");
            (FieldValue::Empty, None)
        } else {
            let error = validate_field(field, &value).err();
            (value, error)
        };

        let changed = self.value(name) != Some(&value);
        let mut next = self.clone();
        next.fields.insert(
            field.name.clone(),
            FieldState {
                value,
                touched: true,
                error,
            },
        );

        if changed {
            for child in schema.descendants(name) {
                tracing::debug!(parent = name, child = %child, "cascade reset");
                next.fields.insert(child, FieldState::default());
            }
        }

        Ok(next)
    }

    /// Validate every field, then the cross-field rules.
    ///
    /// Cross-field rules only run once every per-field constraint passes; their errors land on
    /// the rule's target field.
    pub fn validate_all(&self, schema: &FormSchema) -> Result<Payload, ValidationErrors> {
        let mut errors = BTreeMap::new();
        for field in schema.fields() {
            let value = self.value(field.name.as_str()).unwrap_or(&FieldValue::Empty);
            if let Err(message) = validate_field(field, value) {
                errors.insert(field.name.clone(), message);
            }
        }
        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        let values = self.values();
        for rule in schema.cross_checks() {
            if !rule.holds(&values) {
                errors
                    .entry(rule.target().clone())
                    .or_insert_with(|| rule.message().to_string());
            }
        }
        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        let payload = schema
            .fields()
            .iter()
            .filter_map(|f| {
                let value = values.get(&f.name)?;
                (f.required || !value.is_empty()).then(|| (f.name.clone(), value.clone()))
            })
            .collect();
        Ok(Payload(payload))
    }

    fn record_errors(&mut self, errors: &ValidationErrors) {
        for (name, state) in self.fields.iter_mut() {
            state.touched = true;
            state.error = errors.get(name.as_str()).map(str::to_string);
        }
    }
}

/// A form instance: a shared schema plus the state it exclusively owns.
#[derive(Clone, Debug)]
pub struct Form {
    schema: Arc<FormSchema>,
    state: FormState,
}

impl Form {
    pub fn new(schema: Arc<FormSchema>) -> Self {
        let state = FormState::initial(&schema);
        Self { schema, state }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.state.value(name)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.state.field(name).and_then(|f| f.error.as_deref())
    }

    pub fn set_field_value(&mut self, name: &str, value: FieldValue) -> HealthResult<&FieldState> {
        self.state = self.state.apply(&self.schema, name, value)?;
        self.state
            .field(name)
            .ok_or_else(|| HealthError::UnknownField(name.to_string()))
    }

    /// Coerce raw input to the field's kind and set it.
    pub fn set_raw(&mut self, name: &str, raw: &str) -> HealthResult<&FieldState> {
        let kind = self
            .schema
            .field(name)
            .map(|f| f.kind)
            .ok_or_else(|| HealthError::UnknownField(name.to_string()))?;
        self.set_field_value(name, FieldValue::coerce(kind, raw))
    }

    pub fn options_for(&self, name: &str) -> HealthResult<Option<FieldOptions>> {
        self.state.options_for(&self.schema, name)
    }

    /// Validate the whole form, recording each field's outcome on its state.
    pub fn validate_all(&mut self) -> Result<Payload, ValidationErrors> {
        let outcome = self.state.validate_all(&self.schema);
        match &outcome {
            Ok(_) => self.state.record_errors(&ValidationErrors::default()),
            Err(errors) => self.state.record_errors(errors),
        }
        outcome
    }

    /// Restore declared defaults.
    pub fn reset(&mut self) {
        self.state = FormState::initial(&self.schema);
    }
}
