//! The participant-facing model contract and its adapter.
//!
//! A submission is anything implementing [`Submission`]: a single factory
//! operation returning a boxed [`Model`]. The model capability set is
//! exactly {fit, predict}; structural conformance is enforced by the
//! compiler, so a submission that lacks either operation does not build
//! in the first place.
//!
//! [`ModelAdapter`] is the only place harness code calls into participant
//! code. It converts panics at that boundary into typed errors so the
//! runners can fail with a message instead of unwinding.

mod baseline;

pub use baseline::{builtin, Baseline, MajorityClass, MeanValue, NearestCentroid};

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::data::{Column, Frame};

/// Error type participant models return from `fit`/`predict`.
pub type ModelFailure = Box<dyn std::error::Error + Send + Sync>;

// =============================================================================
// Capability contract
// =============================================================================

/// The model capability set relied upon by the harness.
///
/// `fit` receives the training features and labels; `predict` must return
/// one value per input row, in input order. Everything else about the
/// model is opaque.
pub trait Model {
    fn fit(&mut self, features: &Frame, labels: &Column) -> Result<(), ModelFailure>;

    fn predict(&self, features: &Frame) -> Result<Column, ModelFailure>;
}

/// A unit of participant-supplied code: a factory producing a fresh
/// [`Model`] for each evaluation run.
pub trait Submission {
    fn build(&self) -> Result<Box<dyn Model>, ModelFailure>;
}

// =============================================================================
// Errors
// =============================================================================

/// A submission could not be resolved to a usable model.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("submission factory failed: {0}")]
    Factory(#[source] ModelFailure),

    #[error("submission factory panicked: {0}")]
    FactoryPanicked(String),

    #[error("unknown builtin submission `{0}` (expected one of: majority_class, mean_value, nearest_centroid)")]
    UnknownSubmission(String),
}

/// Participant code failed during the fit/predict cycle.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model fit failed: {0}")]
    Fit(#[source] ModelFailure),

    #[error("model fit panicked: {0}")]
    FitPanicked(String),

    #[error("model predict failed: {0}")]
    Predict(#[source] ModelFailure),

    #[error("model predict panicked: {0}")]
    PredictPanicked(String),
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

// =============================================================================
// ModelAdapter
// =============================================================================

/// Wraps a resolved model behind the panic boundary.
pub struct ModelAdapter {
    model: Box<dyn Model>,
}

impl ModelAdapter {
    /// Invoke the submission's factory and wrap the resulting model.
    ///
    /// A factory that returns an error or panics yields an
    /// [`AdapterError`]; nothing else is instantiated.
    pub fn instantiate(submission: &dyn Submission) -> Result<Self, AdapterError> {
        let built = catch_unwind(AssertUnwindSafe(|| submission.build()))
            .map_err(|payload| AdapterError::FactoryPanicked(panic_message(payload)))?;
        let model = built.map_err(AdapterError::Factory)?;
        Ok(Self { model })
    }

    /// Fit the wrapped model on the training split.
    pub fn fit(&mut self, features: &Frame, labels: &Column) -> Result<(), ModelError> {
        let model = &mut self.model;
        catch_unwind(AssertUnwindSafe(move || model.fit(features, labels)))
            .map_err(|payload| ModelError::FitPanicked(panic_message(payload)))?
            .map_err(ModelError::Fit)
    }

    /// Predict one value per row of `features`, in row order.
    pub fn predict(&self, features: &Frame) -> Result<Column, ModelError> {
        catch_unwind(AssertUnwindSafe(|| self.model.predict(features)))
            .map_err(|payload| ModelError::PredictPanicked(panic_message(payload)))?
            .map_err(ModelError::Predict)
    }
}

// =============================================================================
// Tests
// =============================================================================
