//! Managed-runtime boundary.
//!
//! The bridge drives UI on behalf of a garbage-collected application runtime.
//! `ManagedRuntime` is the seam to that runtime: it knows whether the calling
//! thread holds a call context, can attach a thread on demand, and can invoke
//! a managed callback object with text arguments.
//!
//! A real binding implements this over the host runtime's FFI (thread-local
//! call contexts, global references, exception clearing). `LocalRuntime` is
//! the in-process implementation used by tests and by embedders that want
//! plain Rust closures as handlers.

use std::collections::HashSet;
use std::rc::Rc;
use std::thread::{self, ThreadId};

use thiserror::Error;

// =============================================================================
// Faults
// =============================================================================

/// Description of a fault raised inside a managed-runtime handler.
///
/// By the time an implementation returns this, the fault must already be
/// cleared on the runtime side; the registry only logs it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HandlerFault(pub String);

impl HandlerFault {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Failure to attach the calling thread to the managed runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to attach thread: {0}")]
pub struct AttachError(pub String);

// =============================================================================
// ManagedRuntime
// =============================================================================

/// Seam to the garbage-collected runtime embedding the bridge.
pub trait ManagedRuntime {
    /// Opaque reference to a managed-side callback object.
    ///
    /// Holding the reference is what pins it: an implementation's `Ref`
    /// keeps the underlying object reachable until dropped.
    type Ref;

    /// Whether the calling thread already holds a call context.
    fn has_call_context(&self) -> bool;

    /// Attach the calling thread to the runtime.
    ///
    /// Idempotent: attaching an already-attached thread is a no-op, never
    /// an error. Attachment is never reversed. The toolkit delivers events
    /// from long-lived worker threads of its own, and detaching between
    /// deliveries would thrash the runtime.
    fn attach_current_thread(&mut self) -> Result<(), AttachError>;

    /// Invoke the single callback entry point of a handler.
    ///
    /// `Err` means the handler raised a fault; the implementation clears it
    /// before returning so nothing is left pending on the runtime side.
    fn invoke(&mut self, handler: &Self::Ref, args: &[String]) -> Result<(), HandlerFault>;
}

// =============================================================================
// LocalRuntime
// =============================================================================

/// Handler shape for [`LocalRuntime`]: a plain closure over text arguments.
pub type LocalHandler = Rc<dyn Fn(&[String]) -> Result<(), HandlerFault>>;

/// In-process runtime whose handlers are Rust closures.
///
/// Thread attachment is modeled as a set of thread ids; the constructing
/// thread is pre-attached, mirroring a host runtime where the main thread
/// owns the call context from startup.
pub struct LocalRuntime {
    attached: HashSet<ThreadId>,
}

impl LocalRuntime {
    pub fn new() -> Self {
        let mut attached = HashSet::new();
        attached.insert(thread::current().id());
        Self { attached }
    }

    /// Wrap a closure as a handler reference.
    pub fn handler(f: impl Fn(&[String]) -> Result<(), HandlerFault> + 'static) -> LocalHandler {
        Rc::new(f)
    }
}

impl Default for LocalRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ManagedRuntime for LocalRuntime {
    type Ref = LocalHandler;

    fn has_call_context(&self) -> bool {
        self.attached.contains(&thread::current().id())
    }

    fn attach_current_thread(&mut self) -> Result<(), AttachError> {
        // Ids are never removed from this set.
        self.attached.insert(thread::current().id());
        Ok(())
    }

    fn invoke(&mut self, handler: &Self::Ref, args: &[String]) -> Result<(), HandlerFault> {
        handler(args)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn constructing_thread_is_attached() {
        let rt = LocalRuntime::new();
        assert!(rt.has_call_context());
    }

    #[test]
    fn attach_is_idempotent() {
        let mut rt = LocalRuntime::new();
        assert!(rt.attach_current_thread().is_ok());
        assert!(rt.attach_current_thread().is_ok());
        assert!(rt.has_call_context());
    }

    #[test]
    fn invoke_passes_args() {
        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let seen2 = seen.clone();
        let handler = LocalRuntime::handler(move |args| {
            seen2.borrow_mut().extend(args.iter().cloned());
            Ok(())
        });

        let mut rt = LocalRuntime::new();
        rt.invoke(&handler, &["a".into(), "b".into()]).unwrap();
        assert_eq!(*seen.borrow(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn invoke_surfaces_fault() {
        let handler = LocalRuntime::handler(|_| Err(HandlerFault::new("boom")));
        let mut rt = LocalRuntime::new();
        let err = rt.invoke(&handler, &[]).unwrap_err();
        assert_eq!(err.0, "boom");
    }
}
