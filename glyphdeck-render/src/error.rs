//! Configuration errors raised at render-step bind time.
//!
//! These are fail-fast, caller-setup errors: there is no retry path and no
//! runtime/transient class in this core. Resource release, by contrast, is
//! always infallible and idempotent.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StepError {
    /// The step was attached to a renderer that is not the composite kind
    /// it requires. A programming-usage error, not a runtime condition.
    #[error("render step requires a {expected} renderer")]
    IncompatibleRenderer { expected: &'static str },

    /// The target surface lacks the entity-layer capability the step
    /// renders from.
    #[error("surface has no entity layer attached")]
    MissingEntityLayer,
}
