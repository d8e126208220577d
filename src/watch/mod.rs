//! Live-reload watcher.
//!
//! Monitors one UI-definition file and, on change, tears the UI tree down
//! and rebuilds it from source while the reactive store's independent
//! lifetime preserves externally-held state.
//!
//! Filesystem notifications arrive on the `notify` backend thread and are
//! queued through an mpsc channel; all watcher state is mutated only from
//! the UI-thread event loop when [`ReloadWatcher::tick`] drains the queue.
//! Rapid change bursts are coalesced by a trailing-edge [`Debounce`] so
//! quiescence produces exactly one reload.

pub mod debounce;

pub use debounce::{Debounce, RELOAD_DEBOUNCE};

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Instant;

use log::{debug, info, warn};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::engine::UiEngine;
use crate::error::BridgeError;

// =============================================================================
// Phases
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchPhase {
    /// No path is being monitored.
    Idle,
    /// Monitoring a path, no reload scheduled.
    Watching,
    /// A change arrived; the debounce window is open.
    ReloadPending,
    /// The reload protocol is executing.
    Reloading,
}

// =============================================================================
// Reload Watcher
// =============================================================================

pub struct ReloadWatcher {
    backend: Option<RecommendedWatcher>,
    events: Option<Receiver<notify::Result<notify::Event>>>,
    path: Option<PathBuf>,
    auto_reload: bool,
    debounce: Debounce,
    phase: WatchPhase,
}

impl ReloadWatcher {
    /// Auto-reload starts enabled, matching development-mode defaults.
    pub fn new() -> Self {
        Self {
            backend: None,
            events: None,
            path: None,
            auto_reload: true,
            debounce: Debounce::new(RELOAD_DEBOUNCE),
            phase: WatchPhase::Idle,
        }
    }

    /// Begin monitoring `path`. Idempotent when already watching it;
    /// re-pointing to a different path drops the old watch. Failure is
    /// logged and non-fatal: the previous state is preserved.
    pub fn watch(&mut self, path: &Path) -> Result<(), BridgeError> {
        if self.path.as_deref() == Some(path) && self.backend.is_some() {
            debug!("already watching {}", path.display());
            return Ok(());
        }

        if self.backend.is_none() {
            let (tx, rx) = channel();
            let backend = notify::recommended_watcher(tx).map_err(|err| {
                let msg = format!("cannot create file watcher: {err}");
                warn!("{msg}");
                BridgeError::Resource(msg)
            })?;
            self.backend = Some(backend);
            self.events = Some(rx);
        }
        let Some(backend) = self.backend.as_mut() else {
            return Ok(());
        };

        // Arm the new watch before releasing any old one, so a failure
        // leaves the previous watch intact.
        if let Err(err) = backend.watch(path, RecursiveMode::NonRecursive) {
            let msg = format!("cannot watch {}: {err}", path.display());
            warn!("{msg}");
            return Err(BridgeError::Resource(msg));
        }

        if let Some(old) = self.path.take() {
            let _ = backend.unwatch(&old);
        }

        info!("watching {}", path.display());
        self.path = Some(path.to_path_buf());
        self.phase = WatchPhase::Watching;
        Ok(())
    }

    /// Stop monitoring `path`. No-op if it is not the watched path.
    pub fn unwatch(&mut self, path: &Path) {
        if self.path.as_deref() != Some(path) {
            debug!("not watching {}", path.display());
            return;
        }
        if let Some(backend) = self.backend.as_mut() {
            let _ = backend.unwatch(path);
        }
        info!("stopped watching {}", path.display());
        self.path = None;
        self.debounce.cancel();
        self.phase = WatchPhase::Idle;
    }

    pub fn set_auto_reload(&mut self, enabled: bool) {
        self.auto_reload = enabled;
        info!("auto-reload {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn is_auto_reload_enabled(&self) -> bool {
        self.auto_reload
    }

    pub fn phase(&self) -> WatchPhase {
        self.phase
    }

    pub fn watched_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// One event-loop turn: drain queued filesystem notifications, then
    /// fire the reload if the debounce window has closed. Returns true if
    /// a reload ran and produced at least one root.
    pub fn tick<E: UiEngine>(&mut self, engine: &mut E, now: Instant) -> bool {
        let changes = self.drain_notifications();
        for _ in 0..changes {
            self.note_change(now);
        }

        if self.debounce.fire_due(now) {
            return self.reload(engine);
        }
        false
    }

    /// Pull everything queued by the backend thread.
    ///
    /// The backend holds exactly one watch, so every event on the channel
    /// concerns the watched file; matching reported paths would only trip
    /// over backend-specific canonicalization.
    fn drain_notifications(&mut self) -> usize {
        let Some(rx) = self.events.as_ref() else {
            return 0;
        };
        if self.path.is_none() {
            // Drain and discard so a later watch() starts clean.
            while rx.try_recv().is_ok() {}
            return 0;
        }

        let mut changes = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                Ok(_) => changes += 1,
                Err(err) => warn!("watch backend error: {err}"),
            }
        }
        changes
    }

    /// Handle one change notification at `now`.
    ///
    /// Ignored while auto-reload is disabled. Otherwise the watch is
    /// defensively re-armed (some backends deregister after one event,
    /// and rename-replace saves orphan the original inode) and the
    /// debounce window restarts, cancelling any pending reload.
    pub(crate) fn note_change(&mut self, now: Instant) {
        let Some(path) = self.path.clone() else {
            return;
        };
        debug!("change notification for {}", path.display());

        if !self.auto_reload {
            debug!("auto-reload disabled, ignoring change");
            return;
        }

        if let Some(backend) = self.backend.as_mut() {
            if let Err(err) = backend.watch(&path, RecursiveMode::NonRecursive) {
                warn!("could not re-arm watch on {}: {err}", path.display());
            }
        }

        self.debounce.poke(now);
        self.phase = WatchPhase::ReloadPending;
    }

    /// The five-step reload protocol. Each step is logged; a reload that
    /// yields zero roots is a failure that leaves auto-reload enablement
    /// unchanged and the watcher armed for the next organic change.
    fn reload<E: UiEngine>(&mut self, engine: &mut E) -> bool {
        let Some(path) = self.path.clone() else {
            return false;
        };
        self.phase = WatchPhase::Reloading;
        info!("reloading {}", path.display());

        // [1/5] State survival: nothing to save or restore. The reactive
        // store outlives the UI tree; the watcher only has to not touch it.
        info!("[1/5] external state preserved (store lifetime is independent)");

        // [2/5] Teardown: destruction is deferred, not synchronous.
        let roots = engine.roots();
        info!("[2/5] scheduling {} old root(s) for destruction", roots.len());
        for root in roots {
            engine.schedule_destroy(root);
        }

        // [3/5] Cache invalidation: force a re-parse from source.
        info!("[3/5] clearing component cache");
        engine.clear_cache();

        // [4/5] Reload from the watched path.
        info!("[4/5] loading {}", path.display());
        let loaded = engine.load(&path);

        // [5/5] Verification.
        let ok = match loaded {
            Ok(0) => {
                warn!("[5/5] reload produced no roots; check {} for errors", path.display());
                false
            }
            Ok(n) => {
                info!("[5/5] reload complete ({n} root(s))");
                true
            }
            Err(err) => {
                warn!("[5/5] reload failed: {err}");
                false
            }
        };

        self.phase = WatchPhase::Watching;
        ok
    }
}

impl Default for ReloadWatcher {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
