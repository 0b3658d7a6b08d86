//! Host registry.
//!
//! Maps every presented [`RouteViewId`] to the [`RouteHost`] holding its
//! rendered content. The router's stack refers to hosts by [`HostKey`], the
//! identity of one host instance, and resolves them back through the
//! registry during dismissal.

use crate::error::NavigationError;
use crate::presenter::{PresentationMode, PresentedFlag};
use crate::surface::FrameHandle;
use crate::{debug_log, Content, RouteViewId};
use std::collections::HashMap;
use std::fmt;

/// Identity of one host instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostKey(u64);

impl fmt::Display for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host:{}", self.0)
    }
}

/// How a host occupies the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// Owns a frame of its own.
    Frame,
    /// Shares the frame of the `anchor` host.
    Overlay {
        anchor: HostKey,
        mode: PresentationMode,
    },
}

impl HostKind {
    /// Check if the host shares another host's frame.
    pub fn is_overlay(&self) -> bool {
        matches!(self, HostKind::Overlay { .. })
    }

    /// The anchor of an overlay host.
    pub fn anchor(&self) -> Option<HostKey> {
        match self {
            HostKind::Overlay { anchor, .. } => Some(*anchor),
            HostKind::Frame => None,
        }
    }
}

/// One presented destination.
///
/// For a frame host `content` is what the frame shows. For an overlay host
/// it is the combined content the presenter produced.
#[derive(Debug)]
pub struct RouteHost<T: 'static> {
    key: HostKey,
    id: RouteViewId,
    content: Content<T>,
    frame: FrameHandle,
    presented: PresentedFlag,
    kind: HostKind,
}

impl<T: 'static> RouteHost<T> {
    /// Create a host. The key comes from [`HostRegistry::allocate_key`].
    pub fn new(
        key: HostKey,
        id: RouteViewId,
        content: Content<T>,
        frame: FrameHandle,
        presented: PresentedFlag,
        kind: HostKind,
    ) -> Self {
        Self {
            key,
            id,
            content,
            frame,
            presented,
            kind,
        }
    }

    pub fn key(&self) -> HostKey {
        self.key
    }

    pub fn id(&self) -> RouteViewId {
        self.id
    }

    pub fn content(&self) -> &Content<T> {
        &self.content
    }

    /// The frame showing this host, shared with the anchor for overlays.
    pub fn frame(&self) -> FrameHandle {
        self.frame
    }

    pub fn presented(&self) -> &PresentedFlag {
        &self.presented
    }

    pub fn kind(&self) -> HostKind {
        self.kind
    }
}

/// Identifier to host map with a secondary index by [`HostKey`].
#[derive(Debug)]
pub struct HostRegistry<T: 'static> {
    hosts: HashMap<RouteViewId, RouteHost<T>>,
    by_key: HashMap<HostKey, RouteViewId>,
    next_key: u64,
}

impl<T: 'static> HostRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            hosts: HashMap::new(),
            by_key: HashMap::new(),
            next_key: 0,
        }
    }

    /// Reserve the key for a host about to be built.
    pub fn allocate_key(&mut self) -> HostKey {
        self.next_key += 1;
        HostKey(self.next_key)
    }

    /// Insert `host` under its identifier.
    ///
    /// Fails if the identifier is taken, or if another frame host already
    /// shows in the same frame. Overlay hosts share their anchor's frame and
    /// are exempt from the frame check.
    pub fn register(&mut self, host: RouteHost<T>) -> Result<(), NavigationError> {
        let id = host.id;
        if self.hosts.contains_key(&id) {
            return Err(NavigationError::DuplicateHost { id, existing: id });
        }
        if host.kind == HostKind::Frame {
            if let Some(existing) = self
                .hosts
                .values()
                .find(|h| h.kind == HostKind::Frame && h.frame == host.frame)
            {
                return Err(NavigationError::DuplicateHost {
                    id,
                    existing: existing.id,
                });
            }
        }
        self.by_key.insert(host.key, id);
        self.hosts.insert(id, host);
        Ok(())
    }

    /// Host registered under `id`.
    ///
    /// The registry does not track frame liveness; run
    /// [`garbage_collect`](Self::garbage_collect) first to drop hosts whose
    /// frame was torn down.
    pub fn lookup(&self, id: RouteViewId) -> Option<&RouteHost<T>> {
        self.hosts.get(&id)
    }

    /// Host with the given identity.
    pub fn by_key(&self, key: HostKey) -> Option<&RouteHost<T>> {
        self.by_key.get(&key).and_then(|id| self.hosts.get(id))
    }

    /// Identifier of the host with the given identity.
    pub fn id_of(&self, key: HostKey) -> Option<RouteViewId> {
        self.by_key.get(&key).copied()
    }

    /// Check if `id` is registered.
    pub fn contains(&self, id: RouteViewId) -> bool {
        self.hosts.contains_key(&id)
    }

    /// Remove and return the host with the given identity.
    pub fn remove(&mut self, key: HostKey) -> Option<RouteHost<T>> {
        let id = self.by_key.remove(&key)?;
        self.hosts.remove(&id)
    }

    /// Remove every host whose frame fails `is_live`.
    ///
    /// Returns the collected hosts so the caller can unlink them.
    pub fn garbage_collect(&mut self, is_live: impl Fn(FrameHandle) -> bool) -> Vec<RouteHost<T>> {
        let dead: Vec<HostKey> = self
            .hosts
            .values()
            .filter(|h| !is_live(h.frame))
            .map(|h| h.key)
            .collect();

        let collected: Vec<RouteHost<T>> = dead.into_iter().filter_map(|key| self.remove(key)).collect();
        if !collected.is_empty() {
            debug_log!("Garbage-collected {} route host(s)", collected.len());
        }
        collected
    }

    /// Remove every host.
    pub fn clear(&mut self) -> Vec<RouteHost<T>> {
        self.by_key.clear();
        self.hosts.drain().map(|(_, host)| host).collect()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl<T: 'static> Default for HostRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
