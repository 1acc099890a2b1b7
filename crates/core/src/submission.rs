//! Submission collaborator contract.
//!
//! A validated payload is handed to a [`Submitter`] and awaited once. Success or failure is
//! reported through a [`Notifier`]; there is no retry and a failed submission leaves the form
//! exactly as it was so the user can submit again. A [`SubmissionGate`] keeps at most one
//! submission in flight.

use crate::forms::{Form, FormState, Payload, ValidationErrors};
use crate::regions::SymptomRecord;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Failure reported by the submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("submission service unavailable")]
    Unavailable,
}

/// External collaborator that accepts validated payloads.
pub trait Submitter<P: ?Sized>: Send + Sync {
    fn submit(&self, payload: &P) -> impl Future<Output = Result<(), SubmissionError>> + Send;
}

/// Fixed-delay collaborator with no transport.
#[derive(Debug)]
pub struct MockSubmitter {
    delay: Duration,
    failure: Option<SubmissionError>,
    calls: AtomicUsize,
}

impl MockSubmitter {
    /// A collaborator that succeeds after `delay`.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A collaborator that fails with `error` after `delay`.
    pub fn failing(delay: Duration, error: SubmissionError) -> Self {
        Self {
            delay,
            failure: Some(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of submissions received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<P: ?Sized + Sync> Submitter<P> for MockSubmitter {
    fn submit(&self, _payload: &P) -> impl Future<Output = Result<(), SubmissionError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay;
        let failure = self.failure.clone();
        async move {
            tokio::time::sleep(delay).await;
            match failure {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }
}

// ============================================================================
// GATE
// ============================================================================

/// The `submitting` flag. Clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct SubmissionGate {
    submitting: Arc<AtomicBool>,
}

impl SubmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate. Returns `None` while another submission holds it.
    pub fn try_begin(&self) -> Option<SubmissionTicket> {
        self.submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionTicket {
                submitting: Arc::clone(&self.submitting),
            })
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }
}

/// Holds the gate until dropped.
#[derive(Debug)]
pub struct SubmissionTicket {
    submitting: Arc<AtomicBool>,
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        self.submitting.store(false, Ordering::Release);
    }
}

// ============================================================================
// NOTIFICATIONS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient user-facing notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Side channel for submission outcomes.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Emits notices as `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => tracing::info!(title = %notice.title, "{}", notice.message),
            NoticeLevel::Error => tracing::error!(title = %notice.title, "{}", notice.message),
        }
    }
}

// ============================================================================
// CONTROLLERS
// ============================================================================

/// What a submit attempt did.
#[derive(Debug, PartialEq)]
pub enum SubmitOutcome<P> {
    /// The collaborator accepted the payload.
    Submitted(P),
    /// Validation failed; errors are recorded on the form.
    Invalid(ValidationErrors),
    /// Another submission is in flight; nothing was sent.
    Busy,
    /// The collaborator reported failure.
    Failed(SubmissionError),
}

impl<P> SubmitOutcome<P> {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }
}

async fn send_once<P, S>(
    submitter: &S,
    notifier: &dyn Notifier,
    payload: P,
    label: &str,
) -> SubmitOutcome<P>
where
    P: Sync,
    S: Submitter<P>,
{
    tracing::info!(label, "submitting");
    match submitter.submit(&payload).await {
        Ok(()) => {
            notifier.notify(Notice::success("Saved", format!("{label} submitted")));
            SubmitOutcome::Submitted(payload)
        }
        Err(err) => {
            notifier.notify(Notice::error("Submission failed", err.to_string()));
            SubmitOutcome::Failed(err)
        }
    }
}

/// Owns a form and submits it through a collaborator.
pub struct FormController<S> {
    form: Form,
    submitter: S,
    notifier: Arc<dyn Notifier>,
    gate: SubmissionGate,
}

impl<S: Submitter<Payload>> FormController<S> {
    pub fn new(form: Form, submitter: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            form,
            submitter,
            notifier,
            gate: SubmissionGate::new(),
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn state(&self) -> &FormState {
        self.form.state()
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    /// Handle to the `submitting` flag, for disabling the submit control.
    pub fn gate(&self) -> &SubmissionGate {
        &self.gate
    }

    /// Validate and submit once.
    pub async fn submit(&mut self) -> SubmitOutcome<Payload> {
        let Some(_ticket) = self.gate.try_begin() else {
            tracing::debug!(form = self.form.schema().name(), "submit ignored while in flight");
            return SubmitOutcome::Busy;
        };

        let payload = match self.form.validate_all() {
            Ok(payload) => payload,
            Err(errors) => {
                tracing::debug!(
                    form = self.form.schema().name(),
                    failed = errors.len(),
                    "submit blocked by validation"
                );
                return SubmitOutcome::Invalid(errors);
            }
        };

        let label = self.form.schema().name().to_string();
        send_once(&self.submitter, self.notifier.as_ref(), payload, &label).await
    }
}

/// Forwards committed symptom records to a collaborator.
pub struct RecordForwarder<S> {
    submitter: S,
    notifier: Arc<dyn Notifier>,
    gate: SubmissionGate,
}

impl<S: Submitter<SymptomRecord>> RecordForwarder<S> {
    pub fn new(submitter: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            submitter,
            notifier,
            gate: SubmissionGate::new(),
        }
    }

    pub fn gate(&self) -> &SubmissionGate {
        &self.gate
    }

    pub async fn forward(&self, record: &SymptomRecord) -> SubmitOutcome<SymptomRecord> {
        let Some(_ticket) = self.gate.try_begin() else {
            return SubmitOutcome::Busy;
        };
        send_once(
            &self.submitter,
            self.notifier.as_ref(),
            record.clone(),
            "symptom record",
        )
        .await
    }
}
