//! Tracking client seam
//!
//! A [`TrackingClient`] turns [`InitOptions`] into a [`Session`]; a session
//! accepts watched models and metric mappings. The logger treats both as a
//! black box and hands their errors back unchanged.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::options::InitOptions;

/// Metric name to value. Values are usually numbers but may be any JSON.
pub type Metrics = BTreeMap<String, Value>;

/// One run of the tracking service.
pub trait Session {
    /// What `watch` accepts.
    type Model: ?Sized;

    /// Error raised by the session's calls.
    type Error;

    /// Identifier of the run, used to resume it later.
    fn id(&self) -> &str;

    /// Register a model for parameter/gradient tracking.
    ///
    /// # Errors
    ///
    /// Whatever the client raises.
    fn watch(&mut self, model: &Self::Model) -> Result<(), Self::Error>;

    /// Record a metrics mapping against the current step.
    ///
    /// # Errors
    ///
    /// Whatever the client raises.
    fn log(&mut self, metrics: &Metrics) -> Result<(), Self::Error>;
}

/// Entry point of a tracking backend.
pub trait TrackingClient {
    /// Session type created by this client.
    type Session: Session;

    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Whether the backend can be used in this environment.
    fn is_available(&self) -> bool {
        true
    }

    /// Create (or resume) a session from `options`.
    ///
    /// # Errors
    ///
    /// Whatever the client raises.
    fn init(
        &self,
        options: &InitOptions,
    ) -> Result<Self::Session, <Self::Session as Session>::Error>;
}

/// Error type of a client's sessions.
pub type SessionError<C> = <<C as TrackingClient>::Session as Session>::Error;

/// Model type accepted by a client's sessions.
pub type SessionModel<C> = <<C as TrackingClient>::Session as Session>::Model;
