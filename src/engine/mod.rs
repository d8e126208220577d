//! UI engine seam.
//!
//! The actual declarative toolkit is an external collaborator; the bridge
//! only needs the handful of operations the live-reload protocol drives.
//!
//! - [`arena`] - ownership arena for UI tree roots with deferred deletion
//! - [`headless`] - in-process engine for tests and unbound embedders

pub mod arena;
pub mod headless;

pub use arena::RootArena;
pub use headless::HeadlessEngine;

use std::path::Path;

use crate::error::BridgeError;
use crate::types::RootHandle;

/// Operations the bridge requires of a UI engine.
pub trait UiEngine {
    /// Handles of every current UI tree root.
    fn roots(&self) -> Vec<RootHandle>;

    /// Schedule a root for deferred destruction. Must not destroy
    /// synchronously: other work in the same dispatch turn may still
    /// reference the root.
    fn schedule_destroy(&mut self, root: RootHandle);

    /// Drop any cached compiled form of loaded UI definitions so the next
    /// load re-parses from source.
    fn clear_cache(&mut self);

    /// Load the UI definition at `path`, returning the number of root
    /// objects it produced. Zero roots is a soft failure the caller decides
    /// how to treat.
    fn load(&mut self, path: &Path) -> Result<usize, BridgeError>;

    /// Destroy everything scheduled via `schedule_destroy`. Drained once
    /// per event-loop turn. Returns the number of roots destroyed.
    fn drain_deferred(&mut self) -> usize;
}
