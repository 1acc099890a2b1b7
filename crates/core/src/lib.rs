//! # Healthdesk Core
//!
//! State and interaction logic for the health dashboard:
//! - [`forms`]: the dependent field graph. Field schemas, per-field and cross-field validation,
//!   and cascade resets when a parent select changes (province → city → district).
//! - [`regions`]: the body diagram. Pointer resolution to regions and the region tagging
//!   session that turns tag and note edits into immutable symptom records.
//! - [`submission`]: the asynchronous collaborator contract for validated payloads.
//! - [`metrics`] and [`repositories`]: wearable aggregates and in-memory repositories (family
//!   roster, wearable feed, doctor directory, shop catalogue).
//!
//! **No presentation concerns**: rendering, routing and transport belong to the host.

pub mod config;
pub mod constants;
pub mod error;
pub mod forms;
pub mod locations;
pub mod metrics;
pub mod regions;
pub mod repositories;
pub mod submission;

pub use config::CoreConfig;
pub use error::{HealthError, HealthResult};
pub use forms::{FieldValue, Form, FormCatalogue, FormKind, FormSchema, Payload, ValidationErrors};
pub use locations::LocationTree;
pub use regions::{Point, Region, RegionCatalogue, SymptomRecord, SymptomSelector};
pub use submission::{
    FormController, MockSubmitter, Notice, NoticeLevel, Notifier, RecordForwarder,
    SubmissionError, SubmissionGate, SubmitOutcome, Submitter, TracingNotifier,
};

pub use healthdesk_types::{NonEmptyText, Percent};
pub use healthdesk_uuid::RecordId;
