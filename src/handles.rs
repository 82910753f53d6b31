// Transient resource handles
//
// A handle is a process-local URL that resolves to an in-memory payload
// until it is explicitly revoked. Nothing here is reclaimed implicitly:
// whoever creates a handle owns the matching revoke.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::HANDLE_SCHEME;

/// Opaque URL naming a live payload, e.g. `blob:filmshelf/<uuid>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandleUrl(String);

impl HandleUrl {
    fn generate() -> Self {
        HandleUrl(format!("{}{}", HANDLE_SCHEME, Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandleUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    Movie,
    Cover,
}

struct LiveHandle {
    kind: HandleKind,
    payload: Arc<[u8]>,
}

/// Table of live handles.
#[derive(Default)]
pub struct HandleRegistry {
    live: HashMap<HandleUrl, LiveHandle>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a payload and return a fresh URL for it. Cannot fail.
    pub fn create(&mut self, kind: HandleKind, payload: impl Into<Arc<[u8]>>) -> HandleUrl {
        let url = HandleUrl::generate();
        let payload = payload.into();
        log::debug!("Created {:?} handle {} ({} bytes)", kind, url, payload.len());
        self.live.insert(url.clone(), LiveHandle { kind, payload });
        url
    }

    /// Release a handle. Returns false (and does nothing) if it was
    /// already revoked or never issued here.
    pub fn revoke(&mut self, url: &HandleUrl) -> bool {
        match self.live.remove(url) {
            Some(handle) => {
                log::debug!("Revoked {:?} handle {}", handle.kind, url);
                true
            }
            None => false,
        }
    }

    /// Revoke everything still live. Returns how many were released.
    pub fn revoke_all(&mut self) -> usize {
        let count = self.live.len();
        self.live.clear();
        count
    }

    pub fn resolve(&self, url: &HandleUrl) -> Option<Arc<[u8]>> {
        self.live.get(url).map(|h| Arc::clone(&h.payload))
    }

    #[cfg(test)]
    pub fn is_live(&self, url: &HandleUrl) -> bool {
        self.live.contains_key(url)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[cfg(test)]
    pub fn live_count_of(&self, kind: HandleKind) -> usize {
        self.live.values().filter(|h| h.kind == kind).count()
    }
}
