//! Pin table - reference-counted handle table for managed references.
//!
//! Pinning a managed reference means taking ownership of it here so the
//! garbage collector on the other side of the boundary cannot reclaim the
//! object while the UI may still call it. The table is the sole owner of
//! every pinned reference; dropping an entry is what releases the pin.
//!
//! Slots are recycled through a free-index pool so handles stay small.

use crate::types::PinHandle;

struct Entry<T> {
    value: T,
    refs: u32,
}

/// Reference-counted table of pinned values keyed by opaque handles.
pub struct PinTable<T> {
    slots: Vec<Option<Entry<T>>>,
    free: Vec<u32>,
}

impl<T> PinTable<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Pin a value, taking ownership. Returns the handle identifying it.
    pub fn pin(&mut self, value: T) -> PinHandle {
        let entry = Entry { value, refs: 1 };
        match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = Some(entry);
                PinHandle(index)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Some(entry));
                PinHandle(index)
            }
        }
    }

    /// Take an additional reference on an existing pin.
    ///
    /// Returns false if the handle is no longer live.
    pub fn retain(&mut self, handle: PinHandle) -> bool {
        match self.entry_mut(handle) {
            Some(entry) => {
                entry.refs += 1;
                true
            }
            None => false,
        }
    }

    /// Release one reference. The value is dropped (unpinned) when the
    /// last reference goes. Returns true if the handle was live.
    pub fn unpin(&mut self, handle: PinHandle) -> bool {
        let Some(entry) = self.entry_mut(handle) else {
            return false;
        };
        entry.refs -= 1;
        if entry.refs == 0 {
            self.slots[handle.0 as usize] = None;
            self.free.push(handle.0);
        }
        true
    }

    /// Borrow the pinned value, if the handle is live.
    pub fn get(&self, handle: PinHandle) -> Option<&T> {
        self.slots
            .get(handle.0 as usize)
            .and_then(|slot| slot.as_ref())
            .map(|entry| &entry.value)
    }

    /// Check whether a handle is live.
    pub fn contains(&self, handle: PinHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live pins.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry_mut(&mut self, handle: PinHandle) -> Option<&mut Entry<T>> {
        self.slots
            .get_mut(handle.0 as usize)
            .and_then(|slot| slot.as_mut())
    }
}

impl<T> Default for PinTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
