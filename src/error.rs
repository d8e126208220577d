//! Error taxonomy for the bridge.
//!
//! Every variant is handled locally at a component boundary: the policy is
//! log-and-degrade, never unwind into the UI event loop. The enum exists so
//! internal seams can return `Result` and so embedders inspecting a logged
//! failure get a typed cause.

use thiserror::Error;

use crate::runtime::HandlerFault;

/// Failures the bridge components can report.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Malformed payload shape (non-array top level, non-object record).
    #[error("invalid payload: {0}")]
    Validation(String),

    /// Operation referenced an unknown model or signal name.
    #[error("not found: {0}")]
    NotFound(String),

    /// A file watch could not be established or maintained, or a reload
    /// produced no root objects.
    #[error("resource failure: {0}")]
    Resource(String),

    /// A fault raised inside a managed-runtime handler, caught and cleared
    /// at the `emit` boundary.
    #[error("handler fault: {0}")]
    Boundary(#[from] HandlerFault),
}
