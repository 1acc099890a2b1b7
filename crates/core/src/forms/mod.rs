//! Dependent field graph: schemas, validation and the cascade-on-change form state.

pub mod attachments;
pub mod catalogue;
pub mod graph;
pub mod schema;
pub mod state;
pub mod value;

pub use attachments::{Attachment, AttachmentError, AttachmentList};
pub use catalogue::{FormCatalogue, FormKind};
pub use graph::{CrossFieldRule, DependencyEdge, FieldValues, FormSchema, FormSchemaBuilder};
pub use schema::{validate_field, Constraint, FieldSchema, OptionMap, OptionSource, Predicate, Rule};
pub use state::{FieldOptions, FieldState, Form, FormState, Payload, ValidationErrors};
pub use value::{FieldKind, FieldName, FieldValue};
