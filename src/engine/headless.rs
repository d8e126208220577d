//! Headless UI engine.
//!
//! A minimal [`UiEngine`] for tests, demos, and embedders that have not
//! wired a real toolkit binding yet. It treats a UI definition file as one
//! document: loading a readable, non-empty file produces exactly one root;
//! an empty file produces zero roots, which the watcher treats as a failed
//! reload. Loaded sources are cached until `clear_cache` so the reload
//! protocol's cache-invalidation step has something real to invalidate.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::BridgeError;
use crate::types::RootHandle;

use super::arena::RootArena;
use super::UiEngine;

/// A loaded UI tree root: the definition path plus its source text.
#[derive(Debug, Clone)]
pub struct RootDoc {
    pub path: PathBuf,
    pub source: String,
}

pub struct HeadlessEngine {
    roots: RootArena<RootDoc>,
    cache: HashMap<PathBuf, String>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self {
            roots: RootArena::new(),
            cache: HashMap::new(),
        }
    }

    /// Borrow a live root document.
    pub fn root(&self, handle: RootHandle) -> Option<&RootDoc> {
        self.roots.get(handle)
    }

    /// Number of live roots.
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Whether a compiled form of `path` is cached.
    pub fn is_cached(&self, path: &Path) -> bool {
        self.cache.contains_key(path)
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UiEngine for HeadlessEngine {
    fn roots(&self) -> Vec<RootHandle> {
        self.roots.handles()
    }

    fn schedule_destroy(&mut self, root: RootHandle) {
        self.roots.defer_destroy(root);
    }

    fn clear_cache(&mut self) {
        let dropped = self.cache.len();
        self.cache.clear();
        debug!("component cache cleared ({dropped} cached document(s) dropped)");
    }

    fn load(&mut self, path: &Path) -> Result<usize, BridgeError> {
        let source = match self.cache.get(path) {
            Some(cached) => {
                debug!("loading {} from cache", path.display());
                cached.clone()
            }
            None => {
                let read = fs::read_to_string(path).map_err(|err| {
                    BridgeError::Resource(format!("cannot read {}: {err}", path.display()))
                })?;
                self.cache.insert(path.to_path_buf(), read.clone());
                read
            }
        };

        if source.trim().is_empty() {
            warn!("{} contains no root objects", path.display());
            return Ok(0);
        }

        self.roots.insert(RootDoc {
            path: path.to_path_buf(),
            source,
        });
        debug!("loaded {} (1 root)", path.display());
        Ok(1)
    }

    fn drain_deferred(&mut self) -> usize {
        self.roots.drain_deferred()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_doc(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn load_nonempty_yields_one_root() {
        let file = temp_doc("Window { }");
        let mut engine = HeadlessEngine::new();
        assert_eq!(engine.load(file.path()).unwrap(), 1);
        assert_eq!(engine.root_count(), 1);
    }

    #[test]
    fn load_empty_yields_zero_roots() {
        let file = temp_doc("  \n");
        let mut engine = HeadlessEngine::new();
        assert_eq!(engine.load(file.path()).unwrap(), 0);
        assert_eq!(engine.root_count(), 0);
    }

    #[test]
    fn load_missing_is_resource_error() {
        let mut engine = HeadlessEngine::new();
        let err = engine.load(Path::new("/no/such/file.ui")).unwrap_err();
        assert!(matches!(err, BridgeError::Resource(_)));
    }

    #[test]
    fn stale_cache_until_cleared() {
        let mut file = temp_doc("Window { }");
        let mut engine = HeadlessEngine::new();
        engine.load(file.path()).unwrap();
        assert!(engine.is_cached(file.path()));

        // Rewrite the file; a load without invalidation sees the cached form.
        file.write_all(b"\nButton { }").unwrap();
        file.flush().unwrap();
        engine.load(file.path()).unwrap();
        assert_eq!(
            engine.root(engine.roots()[1]).unwrap().source,
            "Window { }"
        );

        engine.clear_cache();
        assert!(!engine.is_cached(file.path()));
        engine.load(file.path()).unwrap();
        assert_eq!(
            engine.root(engine.roots()[2]).unwrap().source,
            "Window { }\nButton { }"
        );
    }

    #[test]
    fn teardown_is_deferred() {
        let file = temp_doc("Window { }");
        let mut engine = HeadlessEngine::new();
        engine.load(file.path()).unwrap();

        let roots = engine.roots();
        for root in roots {
            engine.schedule_destroy(root);
        }
        assert_eq!(engine.root_count(), 1);
        assert_eq!(engine.drain_deferred(), 1);
        assert_eq!(engine.root_count(), 0);
    }
}
