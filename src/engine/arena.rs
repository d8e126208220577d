//! Root arena - explicit ownership of UI tree roots.
//!
//! Roots are owned here and addressed by opaque handles; nothing holds a
//! parent/child ownership graph. Destruction is deferred: a root scheduled
//! for destruction stays alive until the deletion queue is drained at the
//! end of the event-loop turn, because other in-flight work in the same
//! turn may still reference it.
//!
//! Slots are recycled through a free-index pool.

use crate::types::RootHandle;

/// Ownership arena keyed by opaque handles, with a deferred-deletion queue.
pub struct RootArena<T> {
    slots: Vec<Option<T>>,
    free: Vec<u32>,
    deferred: Vec<RootHandle>,
}

impl<T> RootArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            deferred: Vec::new(),
        }
    }

    /// Take ownership of a root, returning its handle.
    pub fn insert(&mut self, root: T) -> RootHandle {
        match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = Some(root);
                RootHandle(index)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Some(root));
                RootHandle(index)
            }
        }
    }

    /// Borrow a live root.
    pub fn get(&self, handle: RootHandle) -> Option<&T> {
        self.slots
            .get(handle.0 as usize)
            .and_then(|slot| slot.as_ref())
    }

    /// Whether a handle refers to a live root.
    pub fn contains(&self, handle: RootHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Handles of all live roots.
    pub fn handles(&self) -> Vec<RootHandle> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| RootHandle(index as u32))
            .collect()
    }

    /// Schedule a root for destruction at the next drain.
    ///
    /// The root stays alive and reachable until then. Dead or already
    /// scheduled handles are ignored.
    pub fn defer_destroy(&mut self, handle: RootHandle) {
        if self.contains(handle) && !self.deferred.contains(&handle) {
            self.deferred.push(handle);
        }
    }

    /// Destroy everything scheduled so far. Called once per event-loop
    /// turn. Returns the number of roots destroyed.
    pub fn drain_deferred(&mut self) -> usize {
        let scheduled = std::mem::take(&mut self.deferred);
        let mut destroyed = 0;
        for handle in scheduled {
            if let Some(slot) = self.slots.get_mut(handle.0 as usize) {
                if slot.take().is_some() {
                    self.free.push(handle.0);
                    destroyed += 1;
                }
            }
        }
        destroyed
    }

    /// Number of live roots (scheduled-but-not-drained roots count).
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for RootArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
