//! Dismissal.
//!
//! Unwinding walks the stack from the top and removes presentations until
//! the addressed one is reached. What happens at the target depends on the
//! [`DismissKind`]: `UpTo` keeps it and makes it active again, `Including`
//! removes it as well.
//!
//! # Handing off to the parent
//!
//! A child router cannot remove the presentation it is displayed in; only
//! its parent can. When a dismissal empties a child router, or addresses a
//! presentation that only an ancestor knows, the child clears the
//! presented flag of its embedding presentation and hands the request to
//! its parent in two phases:
//!
//! 1. [`Router::begin_dismiss`] records the request on the parent.
//! 2. [`Router::complete_dismiss`] carries it out: the parent reconciles,
//!    which closes the embedding presentation, then dismisses the target if
//!    it is still in its hierarchy.
//!
//! With [`Handoff::Immediate`](crate::Handoff::Immediate) the second phase
//! runs right after the first. With [`Handoff::Deferred`](crate::Handoff::Deferred)
//! it waits for the caller, so an overlay's closing transition can finish
//! before the parent's stack changes underneath it.

use crate::registry::{HostKind, RouteHost};
use crate::router::{release, RouterState};
use crate::surface::FrameHandle;
use crate::{
    debug_log, error_log, warn_log, DismissResult, Handoff, NavigationError, RouteViewId, Router,
};
use std::fmt;

/// Whether the addressed presentation survives its dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissKind {
    /// Remove everything above the target.
    UpTo,
    /// Remove the target and everything above it.
    Including,
}

impl fmt::Display for DismissKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DismissKind::UpTo => write!(f, "up to"),
            DismissKind::Including => write!(f, "up to and including"),
        }
    }
}

/// A dismissal handed over by a child router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingDismiss {
    pub(crate) id: RouteViewId,
    pub(crate) kind: DismissKind,
}

/// Result of unwinding the local stack.
enum Unwound {
    /// Target reached; the stack is not empty.
    Top(Option<RouteViewId>),
    /// The target was the last presentation.
    Emptied,
}

impl<T: Clone + 'static> Router<T> {
    /// Remove every presentation above `id` and make `id` active again.
    ///
    /// Unwinding a second time is a no-op. If `id` belongs to an ancestor
    /// router, this router is emptied and the request handed to its parent.
    pub fn dismiss_up_to(&self, id: RouteViewId) -> DismissResult {
        self.reconcile();
        self.unwind(id, DismissKind::UpTo)
    }

    /// Remove `id` and every presentation above it.
    ///
    /// Removing the root of a child router closes the presentation the
    /// child is displayed in.
    pub fn dismiss_up_to_including(&self, id: RouteViewId) -> DismissResult {
        self.reconcile();
        self.unwind(id, DismissKind::Including)
    }

    /// Dismiss with an explicit kind.
    pub fn dismiss(&self, id: RouteViewId, kind: DismissKind) -> DismissResult {
        self.reconcile();
        self.unwind(id, kind)
    }

    /// First phase of a handoff from a child router: record the request.
    ///
    /// Returns the result when the router completes the handoff right away,
    /// or `None` if it is left pending.
    pub fn begin_dismiss(&self, id: RouteViewId, kind: DismissKind) -> Option<DismissResult> {
        self.inner
            .state
            .borrow_mut()
            .pending
            .push(PendingDismiss { id, kind });
        debug_log!("[{}] handoff received: dismiss {} {}", self.label(), kind, id);

        match self.inner.config.handoff {
            Handoff::Immediate => Some(self.complete_dismiss(id)),
            Handoff::Deferred => None,
        }
    }

    /// Second phase of a handoff: carry out the pending request for `id`.
    ///
    /// Returns [`DismissResult::NotFound`] if no request for `id` is pending.
    pub fn complete_dismiss(&self, id: RouteViewId) -> DismissResult {
        let request = {
            let mut state = self.inner.state.borrow_mut();
            let position = state.pending.iter().position(|request| request.id == id);
            position.map(|position| state.pending.remove(position))
        };
        let Some(request) = request else {
            debug_log!("[{}] no pending dismissal for {}", self.label(), id);
            return DismissResult::NotFound { id };
        };

        debug_log!("[{}] completing handoff: dismiss {} {}", self.label(), request.kind, id);
        self.reconcile();
        if self.is_stacked(id) || self.ancestor_knows(id) {
            self.unwind(id, request.kind)
        } else {
            debug_log!(
                "[{}] {} already gone, closing the child presentation was enough",
                self.label(),
                id
            );
            DismissResult::Dismissed { top: self.top_id() }
        }
    }

    /// Complete every pending handoff, oldest first.
    pub fn complete_pending_dismissals(&self) -> Vec<DismissResult> {
        let ids = self.pending_dismissals();
        ids.into_iter().map(|id| self.complete_dismiss(id)).collect()
    }

    /// Unwind without reconciling first.
    pub(crate) fn unwind(&self, id: RouteViewId, kind: DismissKind) -> DismissResult {
        if self.is_stacked(id) {
            let (outcome, removed) = self.inner.state.borrow_mut().unwind(id, kind);
            debug_log!(
                "[{}] dismissed {} {}, removed {} host(s)",
                self.label(),
                kind,
                id,
                removed.len()
            );
            release(removed);

            match outcome {
                Unwound::Top(top) => DismissResult::Dismissed { top },
                Unwound::Emptied if self.is_child() => self.hand_off(id, kind),
                Unwound::Emptied => {
                    warn_log!(
                        "[{}] dismissed the root {}; there is no parent router to hand off to",
                        self.label(),
                        id
                    );
                    DismissResult::Dismissed { top: None }
                }
            }
        } else if self.ancestor_knows(id) {
            let removed = self.inner.state.borrow_mut().pop_all();
            debug_log!(
                "[{}] {} belongs to an ancestor, removed {} local host(s)",
                self.label(),
                id,
                removed.len()
            );
            release(removed);
            self.hand_off(id, kind)
        } else {
            warn_log!(
                "[{}] cannot dismiss {} {}: {}",
                self.label(),
                kind,
                id,
                NavigationError::RouteNotFound { id }
            );
            DismissResult::NotFound { id }
        }
    }

    /// Close the embedding presentation and pass the request to the parent.
    fn hand_off(&self, id: RouteViewId, kind: DismissKind) -> DismissResult {
        let link = self.inner.state.borrow().parent.clone();
        let Some(link) = link else {
            return DismissResult::NotFound { id };
        };

        link.context.set_presented(false);
        match link.router.upgrade() {
            Some(parent) => {
                debug_log!(
                    "[{}] handing dismissal of {} to [{}]",
                    self.label(),
                    id,
                    parent.label()
                );
                parent.begin_dismiss(id, kind);
                DismissResult::Delegated { target: id }
            }
            None => {
                warn_log!(
                    "[{}] parent router dropped before dismissal of {} could be handed off",
                    self.label(),
                    id
                );
                DismissResult::Dismissed { top: None }
            }
        }
    }

    /// Check if any ancestor router has `id` on its stack.
    fn ancestor_knows(&self, id: RouteViewId) -> bool {
        let mut next = self.parent();
        while let Some(router) = next {
            if router.is_stacked(id) {
                return true;
            }
            next = router.parent();
        }
        false
    }
}

impl<T: Clone + 'static> RouterState<T> {
    /// Remove hosts from the top until `id` is reached.
    ///
    /// `id` must be on the stack.
    fn unwind(&mut self, id: RouteViewId, kind: DismissKind) -> (Unwound, Vec<RouteHost<T>>) {
        let mut removed = Vec::new();
        let mut touched = Vec::new();

        let outcome = loop {
            let Some(&top) = self.stack.last() else {
                break Unwound::Emptied;
            };
            let Some(top_id) = self.registry.id_of(top) else {
                error_log!("[{}] stack entry {} has no registered host", self.label, top);
                self.stack.pop();
                continue;
            };

            if top_id == id && kind == DismissKind::UpTo {
                break Unwound::Top(Some(id));
            }

            self.stack.pop();
            if let Some(host) = self.registry.remove(top) {
                self.take_down(&host, &mut touched);
                removed.push(host);
            }

            if top_id == id {
                break if self.stack.is_empty() {
                    Unwound::Emptied
                } else {
                    Unwound::Top(self.stack.last().and_then(|key| self.registry.id_of(*key)))
                };
            }
        };

        for frame in touched {
            self.refresh_frame(frame);
        }
        let top_frame = self
            .stack
            .last()
            .and_then(|key| self.registry.by_key(*key))
            .map(RouteHost::frame);
        if let Some(frame) = top_frame {
            self.refresh_frame(frame);
        }
        (outcome, removed)
    }

    /// Remove every host, top first.
    fn pop_all(&mut self) -> Vec<RouteHost<T>> {
        let mut removed = Vec::new();
        let mut touched = Vec::new();
        while let Some(top) = self.stack.pop() {
            if let Some(host) = self.registry.remove(top) {
                self.take_down(&host, &mut touched);
                removed.push(host);
            }
        }
        removed
    }

    /// Remove a host's traces from the surface. Overlay frames are only
    /// collected into `touched`; the caller redraws them once.
    fn take_down(&mut self, host: &RouteHost<T>, touched: &mut Vec<FrameHandle>) {
        match host.kind() {
            HostKind::Frame => {
                if self.surface.is_frame_live(host.frame()) {
                    self.surface.remove_frame(host.frame());
                }
            }
            HostKind::Overlay { .. } => {
                if !touched.contains(&host.frame()) {
                    touched.push(host.frame());
                }
            }
        }
    }
}
