//! Form schemas: field declarations plus the dependency graph between them.
//!
//! Dependency edges come from two places: dependent selects (whose options follow a parent
//! field) and explicit [`FormSchemaBuilder::depends`] declarations for fields that must be
//! cleared when another field changes. The combined graph is checked at build time to be a
//! forest: every field has at most one parent and there are no cycles.

use super::schema::{FieldSchema, OptionSource};
use super::value::{FieldName, FieldValue};
use crate::error::{HealthError, HealthResult};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Snapshot of field values handed to cross-field predicates and submission collaborators.
pub type FieldValues = BTreeMap<FieldName, FieldValue>;

/// Children cleared whenever `parent` changes value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyEdge {
    pub parent: FieldName,
    pub children: Vec<FieldName>,
}

/// A multi-field invariant checked after every per-field constraint has passed.
///
/// The error is attached to `target`.
#[derive(Clone)]
pub enum CrossFieldRule {
    /// `target` must hold the same value as `source`.
    MustMatch {
        target: FieldName,
        source: FieldName,
        message: String,
    },
    Custom {
        target: FieldName,
        predicate: Arc<dyn Fn(&FieldValues) -> bool + Send + Sync>,
        message: String,
    },
}

impl CrossFieldRule {
    pub fn must_match(
        target: impl Into<String>,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CrossFieldRule::MustMatch {
            target: FieldName::new(target),
            source: FieldName::new(source),
            message: message.into(),
        }
    }

    pub fn target(&self) -> &FieldName {
        match self {
            CrossFieldRule::MustMatch { target, .. } | CrossFieldRule::Custom { target, .. } => {
                target
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CrossFieldRule::MustMatch { message, .. } | CrossFieldRule::Custom { message, .. } => {
                message
            }
        }
    }

    pub fn holds(&self, values: &FieldValues) -> bool {
        match self {
            CrossFieldRule::MustMatch { target, source, .. } => {
                values.get(target) == values.get(source)
            }
            CrossFieldRule::Custom { predicate, .. } => predicate(values),
        }
    }

    fn referenced_fields(&self) -> Vec<&FieldName> {
        match self {
            CrossFieldRule::MustMatch { target, source, .. } => vec![target, source],
            CrossFieldRule::Custom { target, .. } => vec![target],
        }
    }
}

impl fmt::Debug for CrossFieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossFieldRule::MustMatch { target, source, .. } => {
                write!(f, "MustMatch({target} == {source})")
            }
            CrossFieldRule::Custom { target, .. } => write!(f, "Custom({target})"),
        }
    }
}

/// A validated form declaration.
#[derive(Clone, Debug)]
pub struct FormSchema {
    name: String,
    fields: Vec<FieldSchema>,
    index: HashMap<FieldName, usize>,
    parents: HashMap<FieldName, FieldName>,
    edges: Vec<DependencyEdge>,
    cross_checks: Vec<CrossFieldRule>,
}

impl FormSchema {
    pub fn builder(name: impl Into<String>) -> FormSchemaBuilder {
        FormSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            explicit_edges: Vec::new(),
            cross_checks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn parent_of(&self, name: &str) -> Option<&FieldName> {
        self.parents.get(name)
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Direct children of `name`.
    pub fn children(&self, name: &str) -> &[FieldName] {
        self.edges
            .iter()
            .find(|e| e.parent.as_str() == name)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// Every field below `name`, nearest first.
    pub fn descendants(&self, name: &str) -> Vec<FieldName> {
        let mut out: Vec<FieldName> = self.children(name).to_vec();
        let mut i = 0;
        while i < out.len() {
            let grandchildren = self.children(out[i].as_str()).to_vec();
            out.extend(grandchildren);
            i += 1;
        }
        out
    }

    pub fn cross_checks(&self) -> &[CrossFieldRule] {
        &self.cross_checks
    }
}

/// Builder for [`FormSchema`]; all structural checks run in [`FormSchemaBuilder::build`].
pub struct FormSchemaBuilder {
    name: String,
    fields: Vec<FieldSchema>,
    explicit_edges: Vec<(FieldName, FieldName)>,
    cross_checks: Vec<CrossFieldRule>,
}

impl FormSchemaBuilder {
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Clear each of `children` whenever `parent` changes.
    pub fn depends(mut self, parent: &str, children: &[&str]) -> Self {
        for child in children {
            self.explicit_edges
                .push((FieldName::from(parent), FieldName::from(*child)));
        }
        self
    }

    pub fn cross_check(mut self, rule: CrossFieldRule) -> Self {
        self.cross_checks.push(rule);
        self
    }

    /// Validate the declaration and build the schema.
    ///
    /// # Errors
    ///
    /// Returns a [`HealthError`] if:
    /// - a field name is declared twice,
    /// - a default value does not match its field's kind,
    /// - an edge or cross-field rule names an unknown field,
    /// - a field would have two parents, or the edges form a cycle,
    /// - a dependent option map is keyed by a value its parent can never hold.
    pub fn build(self) -> HealthResult<FormSchema> {
        let mut index = HashMap::new();
        for (i, field) in self.fields.iter().enumerate() {
            if index.insert(field.name.clone(), i).is_some() {
                return Err(HealthError::DuplicateField(field.name.to_string()));
            }
            if let Some(kind) = field.default.kind() {
                if kind != field.kind {
                    return Err(HealthError::DefaultKindMismatch {
                        field: field.name.to_string(),
                    });
                }
            }
        }

        let option_edges = self
            .fields
            .iter()
            .filter_map(|f| f.parent().map(|p| (p.clone(), f.name.clone())));

        let mut parents: HashMap<FieldName, FieldName> = HashMap::new();
        for (parent, child) in option_edges.chain(self.explicit_edges.iter().cloned()) {
            for name in [&parent, &child] {
                if !index.contains_key(name) {
                    return Err(HealthError::UnknownField(name.to_string()));
                }
            }
            if parent == child {
                return Err(HealthError::DependencyCycle(child.to_string()));
            }
            if let Some(existing) = parents.get(&child) {
                if *existing != parent {
                    return Err(HealthError::MultipleParents {
                        child: child.to_string(),
                        existing: existing.to_string(),
                        parent: parent.to_string(),
                    });
                }
                continue;
            }
            parents.insert(child, parent);
        }

        for start in parents.keys() {
            let mut seen = HashSet::new();
            let mut cursor = Some(start);
            while let Some(name) = cursor {
                if !seen.insert(name) {
                    return Err(HealthError::DependencyCycle(name.to_string()));
                }
                cursor = parents.get(name);
            }
        }

        for field in &self.fields {
            let Some(OptionSource::Dependent { parent, map }) = &field.options else {
                continue;
            };
            let parent_schema = &self.fields[index[parent]];
            let universe: Option<HashSet<&str>> = match &parent_schema.options {
                Some(OptionSource::Static(options)) => {
                    Some(options.iter().map(String::as_str).collect())
                }
                Some(OptionSource::Dependent {
                    map: parent_map, ..
                }) => Some(parent_map.all_options().collect()),
                None => None,
            };
            if let Some(universe) = universe {
                if let Some(key) = map.keys().find(|k| !universe.contains(k)) {
                    return Err(HealthError::UnknownParentKey {
                        field: field.name.to_string(),
                        key: key.to_string(),
                    });
                }
            }
        }

        for rule in &self.cross_checks {
            for name in rule.referenced_fields() {
                if !index.contains_key(name) {
                    return Err(HealthError::UnknownField(name.to_string()));
                }
            }
        }

        // Edges grouped by parent, parents and children both in declaration order.
        let mut edges: Vec<DependencyEdge> = Vec::new();
        for field in &self.fields {
            let children: Vec<FieldName> = self
                .fields
                .iter()
                .filter(|f| parents.get(&f.name) == Some(&field.name))
                .map(|f| f.name.clone())
                .collect();
            if !children.is_empty() {
                edges.push(DependencyEdge {
                    parent: field.name.clone(),
                    children,
                });
            }
        }

        Ok(FormSchema {
            name: self.name,
            fields: self.fields,
            index,
            parents,
            edges,
            cross_checks: self.cross_checks,
        })
    }
}
