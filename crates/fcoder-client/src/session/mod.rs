//! Form sessions.
//!
//! A session holds one mounted form's transient state: field values,
//! which inputs the user has touched, the errors currently shown and
//! whether a submit is in flight. Sessions are cheap to clone; clones
//! share state, so a UI can hand one to each input handler.
//!
//! Field edits validate synchronously. `submit` validates the whole
//! form and, only if that passes, calls the backend. The call is raced
//! against the session's [`FormLifetime`]: once the form is unmounted a
//! late response is dropped without touching state.

mod lifetime;
mod login;
mod signup;

pub use lifetime::FormLifetime;
pub use login::{LoginField, LoginSession};
pub use signup::{Registered, SignupField, SignupSession};

use fcoder_validate::lookup::clear_field;
use fcoder_validate::{get_field_error, ValidationError, ValidationResult};
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::error::ClientError;

/// A field name that the form does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownField(pub String);

/// How a submit ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<T> {
    /// The backend accepted the request.
    Success(T),
    /// Local validation failed; nothing was sent.
    Rejected(Vec<ValidationError>),
    /// The request was sent and failed, or never reached the backend.
    Failed(Vec<ValidationError>),
    /// Another submit is still in flight.
    Busy,
    /// The form was closed before the response arrived.
    Abandoned,
}

impl<T> SubmitOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Errors the form shows after this outcome, if any.
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            Self::Rejected(errors) | Self::Failed(errors) => errors,
            _ => &[],
        }
    }

    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }
}

/// State shared by every clone of a session.
#[derive(Debug)]
pub(crate) struct FormState<D> {
    pub data: D,
    pub touched: HashSet<&'static str>,
    pub errors: Vec<ValidationError>,
    pub busy: bool,
}

impl<D> FormState<D> {
    fn new(data: D) -> Self {
        Self {
            data,
            touched: HashSet::new(),
            errors: Vec::new(),
            busy: false,
        }
    }

    /// Mark `field` touched and report whether it already was.
    pub fn touch(&mut self, field: &'static str) -> bool {
        !self.touched.insert(field)
    }

    /// Replace the errors for `field` with the ones `result` holds for it.
    pub fn revalidate(&mut self, field: &str, result: &ValidationResult) {
        clear_field(&mut self.errors, field);
        self.errors.extend(result.errors_for(field).cloned());
    }
}

/// Cloneable handle to a session's [`FormState`].
#[derive(Debug)]
pub(crate) struct Shared<D> {
    inner: Arc<Mutex<FormState<D>>>,
}

impl<D> Clone for Shared<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: Default> Default for Shared<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

impl<D> Shared<D> {
    fn new(data: D) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FormState::new(data))),
        }
    }

    /// A panic while holding the lock leaves plain data behind, so a
    /// poisoned lock is still usable.
    pub fn lock(&self) -> MutexGuard<'_, FormState<D>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn errors(&self) -> Vec<ValidationError> {
        self.lock().errors.clone()
    }

    pub fn field_error(&self, field: &str) -> Option<String> {
        get_field_error(&self.lock().errors, field).map(str::to_owned)
    }

    pub fn is_busy(&self) -> bool {
        self.lock().busy
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.lock().touched.contains(field)
    }

    /// Store the outcome of a completed request and clear the busy flag.
    pub fn finish(&self, errors: Vec<ValidationError>) {
        let mut state = self.lock();
        state.busy = false;
        state.errors = errors;
    }

    /// Clear the busy flag without touching errors.
    pub fn release(&self) {
        self.lock().busy = false;
    }
}

/// Await `call` unless `lifetime` ends first.
pub(crate) async fn race<F: Future>(lifetime: &FormLifetime, call: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = lifetime.ended() => None,
        output = call => Some(output),
    }
}

/// The single general error shown for a request that never completed.
pub(crate) fn transport_failure(err: &ClientError) -> Vec<ValidationError> {
    tracing::warn!(error = %err, "form submit failed");
    vec![ValidationError::general(err.user_message())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcoder_validate::messages;

    #[test]
    fn touch_reports_previous_state() {
        let mut state = FormState::new(());
        assert!(!state.touch("email"));
        assert!(state.touch("email"));
    }

    #[test]
    fn revalidate_replaces_only_that_field() {
        let mut state = FormState::new(());
        state.errors = vec![
            ValidationError::new("email", "old"),
            ValidationError::new("phone", "keep"),
        ];

        state.revalidate("email", &ValidationResult::invalid("email", "new"));
        assert_eq!(
            state.errors,
            vec![
                ValidationError::new("phone", "keep"),
                ValidationError::new("email", "new"),
            ]
        );

        state.revalidate("email", &ValidationResult::valid());
        assert_eq!(state.errors, vec![ValidationError::new("phone", "keep")]);
    }

    #[test]
    fn outcome_accessors() {
        let outcome: SubmitOutcome<()> =
            SubmitOutcome::Failed(vec![ValidationError::general(messages::NETWORK_ERROR)]);
        assert_eq!(outcome.errors().len(), 1);
        assert!(!outcome.is_success());
        assert_eq!(SubmitOutcome::Success(7).success(), Some(7));
        assert!(SubmitOutcome::<()>::Busy.errors().is_empty());
    }

    #[test]
    fn transport_failure_is_general() {
        let errors = transport_failure(&ClientError::Timeout);
        assert_eq!(errors, vec![ValidationError::general(messages::NETWORK_ERROR)]);
    }

    #[tokio::test]
    async fn race_prefers_ended_lifetime() {
        let lifetime = FormLifetime::new();
        assert_eq!(race(&lifetime, async { 1 }).await, Some(1));

        lifetime.end();
        assert_eq!(race(&lifetime, async { 1 }).await, None);
    }
}
