//! # quill-bridge
//!
//! Bridge between a managed, garbage-collected application runtime and a
//! native declarative UI engine. The managed side drives UI state and
//! receives UI-originated events; the UI side binds tabular data and is
//! rebuilt live when its definition file changes on disk.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! the reactive store and [notify](https://github.com/notify-rs/notify) for
//! filesystem watching.
//!
//! ## Architecture
//!
//! ```text
//! managed runtime → Bridge → { CallbackRegistry | ModelRegistry | Store }
//! UI engine       → CallbackRegistry (events), ← TableSource (data)
//! filesystem      → ReloadWatcher → UiEngine (five-step reload)
//! ```
//!
//! Everything runs on a single cooperative UI-thread event loop; the one
//! deliberate exception is `emit`, which may arrive on a toolkit-owned
//! worker thread and attaches it to the managed runtime on demand.
//!
//! ## Modules
//!
//! - [`types`] - value union and opaque handles (FieldId, RootHandle, ...)
//! - [`runtime`] - managed-runtime seam (call contexts, invocation, faults)
//! - [`events`] - callback registry and the pin table behind it
//! - [`model`] - dynamic table model with stable field identity
//! - [`engine`] - UI engine seam, root ownership arena, headless engine
//! - [`store`] - reactive key→value store the UI observes
//! - [`watch`] - debounced live-reload watcher
//! - [`bridge`] - the composition root tying it all together

pub mod bridge;
pub mod engine;
pub mod error;
pub mod events;
pub mod model;
pub mod runtime;
pub mod store;
pub mod types;
pub mod watch;

// Re-export commonly used items
pub use types::{FieldId, PinHandle, RootHandle, Value};

pub use bridge::Bridge;
pub use engine::{HeadlessEngine, RootArena, UiEngine};
pub use error::BridgeError;
pub use events::{pins::PinTable, CallbackRegistry};
pub use model::{FieldTable, ModelRegistry, TableModel, TableSource};
pub use runtime::{AttachError, HandlerFault, LocalHandler, LocalRuntime, ManagedRuntime};
pub use store::Store;
pub use watch::{Debounce, ReloadWatcher, WatchPhase, RELOAD_DEBOUNCE};
