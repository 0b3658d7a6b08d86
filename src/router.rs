//! The router.
//!
//! A [`Router`] owns a stack of presented destinations for one navigation
//! scope and the display surface they are shown on. Destinations enter the
//! stack through [`navigate`](Router::navigate) and leave it through the
//! dismissal operations in [`dismiss`](crate::dismiss), through their
//! [`PresentedFlag`] going false, or through the surface tearing their frame
//! down.
//!
//! # Stack and registry
//!
//! Every presentation gets a fresh [`RouteViewId`] and a [`RouteHost`] in the
//! registry. The stack lists hosts bottom to top; the bottom is the router's
//! root. `Push` presentations own a frame of the surface. `ReplaceParent`
//! and `Sibling` presentations are stacked and addressable like any other,
//! but draw into the frame of their anchor host.
//!
//! # Re-entrancy
//!
//! The router is single-threaded and hands out cheap clones of itself. No
//! internal borrow is held while routes render, presenters combine, child
//! routers are built or a parent router is called, so all of those may call
//! back into the router.
//!
//! # Example
//!
//! ```
//! use route_stack::{view_fn, Content, Router, StackSurface};
//!
//! let surface = StackSurface::new();
//! let router = Router::new(surface.clone());
//!
//! let root = router.replace_root_with(view_fn(|| Content::view("inbox"))).unwrap();
//! let detail = router.push(view_fn(|| Content::view("message"))).unwrap();
//!
//! assert_eq!(router.stack_ids(), vec![root, detail]);
//! assert_eq!(surface.visible_top(), vec!["message"]);
//!
//! router.dismiss_up_to(root);
//! assert!(!router.is_presenting(detail));
//! assert_eq!(surface.visible_top(), vec!["inbox"]);
//! ```

use crate::dismiss::{DismissKind, PendingDismiss};
use crate::presenter::ChildRouterFactory;
use crate::registry::{HostKey, HostKind, HostRegistry, RouteHost};
use crate::surface::{DisplaySurface, FrameHandle};
use crate::{
    debug_log, error_log, info_log, trace_log, warn_log, AnyRoute, Content, DestinationPresenter,
    IdGenerator, NavigationError, PresentationContext, PresentationMode, PresentedFlag, Presenter,
    PushPresenter, Route, RouteScope, RouteViewId,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

// ============================================================================
// Configuration
// ============================================================================

/// How a child router hands a dismissal over to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Handoff {
    /// The parent completes the dismissal as soon as it is handed over.
    #[default]
    Immediate,
    /// The parent records the dismissal and waits for
    /// [`Router::complete_dismiss`], typically called by the display surface
    /// once the closing transition of the child's overlay has finished.
    Deferred,
}

/// Router settings. Child routers inherit them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Name used in log messages.
    pub label: String,
    /// Handoff policy for dismissals arriving from child routers.
    pub handoff: Handoff,
}

impl RouterConfig {
    fn child(&self) -> Self {
        Self {
            label: format!("{}/child", self.label),
            handoff: self.handoff,
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            label: "router".to_string(),
            handoff: Handoff::default(),
        }
    }
}

/// Builder for [`Router`].
///
/// # Example
///
/// ```
/// use route_stack::{Handoff, Router, StackSurface};
///
/// let router = Router::<&str>::builder(StackSurface::new())
///     .label("settings")
///     .handoff(Handoff::Deferred)
///     .build();
///
/// assert_eq!(router.label(), "settings");
/// assert_eq!(router.config().handoff, Handoff::Deferred);
/// ```
#[must_use]
pub struct RouterBuilder<T: 'static> {
    surface: Box<dyn DisplaySurface<T>>,
    config: RouterConfig,
    ids: Option<Rc<IdGenerator>>,
}

impl<T: 'static> RouterBuilder<T> {
    /// Set the label used in log messages.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = label.into();
        self
    }

    /// Set the handoff policy.
    pub fn handoff(mut self, handoff: Handoff) -> Self {
        self.config.handoff = handoff;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an identifier generator, e.g. between independent root routers
    /// whose identifiers must not collide.
    pub fn generator(mut self, ids: Rc<IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Build the router. Its stack is empty until the first navigation.
    pub fn build(self) -> Router<T> {
        let ids = self.ids.unwrap_or_default();
        Router::from_parts(self.config, ids, self.surface, None)
    }
}

// ============================================================================
// Router
// ============================================================================

/// Handle to a router. Clones refer to the same router.
pub struct Router<T: 'static> {
    pub(crate) inner: Rc<RouterInner<T>>,
}

/// Non-owning handle to a router.
pub struct WeakRouter<T: 'static> {
    inner: Weak<RouterInner<T>>,
}

pub(crate) struct RouterInner<T: 'static> {
    pub(crate) config: RouterConfig,
    pub(crate) ids: Rc<IdGenerator>,
    pub(crate) state: RefCell<RouterState<T>>,
}

/// Link from a child router to the router that embedded it.
pub(crate) struct ParentLink<T: 'static> {
    pub(crate) router: WeakRouter<T>,
    /// The presentation the child is displayed in.
    pub(crate) context: PresentationContext<T>,
}

impl<T: Clone + 'static> Clone for ParentLink<T> {
    fn clone(&self) -> Self {
        Self {
            router: self.router.clone(),
            context: self.context.clone(),
        }
    }
}

pub(crate) struct RouterState<T: 'static> {
    pub(crate) label: String,
    pub(crate) registry: HostRegistry<T>,
    pub(crate) stack: Vec<HostKey>,
    pub(crate) surface: Box<dyn DisplaySurface<T>>,
    pub(crate) parent: Option<ParentLink<T>>,
    pub(crate) pending: Vec<PendingDismiss>,
}

impl<T: 'static> Router<T> {
    /// Start building a router that draws into `surface`.
    pub fn builder<S>(surface: S) -> RouterBuilder<T>
    where
        S: DisplaySurface<T> + 'static,
    {
        RouterBuilder {
            surface: Box::new(surface),
            config: RouterConfig::default(),
            ids: None,
        }
    }

    /// Create a router with the default configuration.
    pub fn new<S>(surface: S) -> Self
    where
        S: DisplaySurface<T> + 'static,
    {
        Self::builder(surface).build()
    }

    pub(crate) fn from_parts(
        config: RouterConfig,
        ids: Rc<IdGenerator>,
        surface: Box<dyn DisplaySurface<T>>,
        parent: Option<ParentLink<T>>,
    ) -> Self {
        let state = RouterState {
            label: config.label.clone(),
            registry: HostRegistry::new(),
            stack: Vec::new(),
            surface,
            parent,
            pending: Vec::new(),
        };
        Self {
            inner: Rc::new(RouterInner {
                config,
                ids,
                state: RefCell::new(state),
            }),
        }
    }

    /// Label used in log messages.
    pub fn label(&self) -> &str {
        &self.inner.config.label
    }

    pub fn config(&self) -> &RouterConfig {
        &self.inner.config
    }

    /// The identifier generator, shared by every router in this tree.
    pub fn generator(&self) -> &Rc<IdGenerator> {
        &self.inner.ids
    }

    pub fn downgrade(&self) -> WeakRouter<T> {
        WeakRouter {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Check if both handles refer to the same router.
    pub fn ptr_eq(&self, other: &Router<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Identifiers on the stack, bottom first.
    pub fn stack_ids(&self) -> Vec<RouteViewId> {
        let state = self.inner.state.borrow();
        state
            .stack
            .iter()
            .filter_map(|key| state.registry.id_of(*key))
            .collect()
    }

    /// Identifier of the root destination.
    pub fn root_id(&self) -> Option<RouteViewId> {
        let state = self.inner.state.borrow();
        state.stack.first().and_then(|key| state.registry.id_of(*key))
    }

    /// Identifier of the most recent presentation.
    pub fn top_id(&self) -> Option<RouteViewId> {
        let state = self.inner.state.borrow();
        state.stack.last().and_then(|key| state.registry.id_of(*key))
    }

    /// Number of stacked presentations.
    pub fn depth(&self) -> usize {
        self.inner.state.borrow().stack.len()
    }

    /// The router that embedded this one, if it is still alive.
    pub fn parent(&self) -> Option<Router<T>> {
        let state = self.inner.state.borrow();
        state.parent.as_ref().and_then(|link| link.router.upgrade())
    }

    /// Check if this router was created by a presentation's child router
    /// factory.
    pub fn is_child(&self) -> bool {
        self.inner.state.borrow().parent.is_some()
    }

    /// Identifiers with a dismissal handed over from a child router and not
    /// yet completed.
    pub fn pending_dismissals(&self) -> Vec<RouteViewId> {
        let state = self.inner.state.borrow();
        state.pending.iter().map(|request| request.id).collect()
    }

    pub(crate) fn is_stacked(&self, id: RouteViewId) -> bool {
        self.inner.state.borrow().is_stacked(id)
    }
}

impl<T: Clone + 'static> Router<T> {
    // ------------------------------------------------------------------------
    // Presenting
    // ------------------------------------------------------------------------

    /// Present `route` rendered with `dependency`.
    ///
    /// `source` is the identifier of the presentation this one is anchored
    /// to; overlay modes fall back to the top of the stack if it is absent
    /// or unknown. Returns the identifier of the new presentation.
    ///
    /// # Errors
    ///
    /// [`NavigationError::DuplicateHost`] if the host cannot be registered.
    /// The stack is left as it was.
    pub fn navigate<R, P>(
        &self,
        route: R,
        dependency: R::Dependency,
        presenter: &P,
        source: Option<RouteViewId>,
    ) -> Result<RouteViewId, NavigationError>
    where
        R: Route<T>,
        P: Presenter<T> + ?Sized,
    {
        self.navigate_any(AnyRoute::new(route, dependency), presenter, source)
    }

    /// [`navigate`](Self::navigate) with a type-erased route.
    ///
    /// # Errors
    ///
    /// See [`navigate`](Self::navigate).
    pub fn navigate_any<P>(
        &self,
        route: AnyRoute<T>,
        presenter: &P,
        source: Option<RouteViewId>,
    ) -> Result<RouteViewId, NavigationError>
    where
        P: Presenter<T> + ?Sized,
    {
        self.reconcile();

        let id = self.inner.ids.next();
        let mode = presenter.mode();
        match mode {
            PresentationMode::Push => {
                self.present_push(id, &route, presenter)?;
            }
            PresentationMode::ReplaceParent | PresentationMode::Sibling => {
                self.present_overlay(id, &route, presenter, source)?;
            }
        }

        info_log!(
            "[{}] {} '{}' as {} via {} (depth {})",
            self.label(),
            mode,
            route.name(),
            id,
            presenter.name(),
            self.depth()
        );
        Ok(id)
    }

    /// Push a dependency-free route.
    ///
    /// # Errors
    ///
    /// See [`navigate`](Self::navigate).
    pub fn push<R>(&self, route: R) -> Result<RouteViewId, NavigationError>
    where
        R: Route<T, Dependency = ()>,
    {
        self.navigate(route, (), &PushPresenter, None)
    }

    /// Drop every presentation, then present `route` as the new root.
    ///
    /// Pending dismissals from child routers are discarded.
    ///
    /// # Errors
    ///
    /// See [`navigate`](Self::navigate).
    pub fn replace_root<R, P>(
        &self,
        route: R,
        dependency: R::Dependency,
        presenter: &P,
    ) -> Result<RouteViewId, NavigationError>
    where
        R: Route<T>,
        P: Presenter<T> + ?Sized,
    {
        self.replace_root_any(AnyRoute::new(route, dependency), presenter)
    }

    /// [`replace_root`](Self::replace_root) with a dependency-free route and
    /// the push presenter.
    ///
    /// # Errors
    ///
    /// See [`navigate`](Self::navigate).
    pub fn replace_root_with<R>(&self, route: R) -> Result<RouteViewId, NavigationError>
    where
        R: Route<T, Dependency = ()>,
    {
        self.replace_root(route, (), &PushPresenter)
    }

    /// [`replace_root`](Self::replace_root) with a type-erased route.
    ///
    /// # Errors
    ///
    /// See [`navigate`](Self::navigate).
    pub fn replace_root_any<P>(
        &self,
        route: AnyRoute<T>,
        presenter: &P,
    ) -> Result<RouteViewId, NavigationError>
    where
        P: Presenter<T> + ?Sized,
    {
        let removed = {
            let mut state = self.inner.state.borrow_mut();
            state.stack.clear();
            state.pending.clear();
            state.surface.clear();
            state.registry.clear()
        };
        debug_log!("[{}] replacing root, dropped {} host(s)", self.label(), removed.len());
        release(removed);

        self.navigate_any(route, presenter, None)
    }

    /// Check if `id` is registered and on the stack.
    pub fn is_presenting(&self, id: RouteViewId) -> bool {
        self.reconcile();
        self.is_stacked(id)
    }

    /// The is-presented flag of a stacked presentation.
    ///
    /// `None` once the presentation is gone, including when the surface tore
    /// its frame down. Setting the flag to false dismisses the presentation
    /// on the next reconcile.
    pub fn presented_flag(&self, id: RouteViewId) -> Option<PresentedFlag> {
        self.reconcile();
        let state = self.inner.state.borrow();
        state.registry.lookup(id).map(|host| host.presented().clone())
    }

    /// Bring the stack up to date with the outside world.
    ///
    /// Hosts whose frame the surface tore down are garbage-collected, and
    /// presentations whose [`PresentedFlag`] went false are dismissed. Every
    /// operation reconciles first; call this directly after flipping a flag
    /// to have the display updated right away.
    pub fn reconcile(&self) {
        let collected = self.inner.state.borrow_mut().collect_garbage();
        if !collected.is_empty() {
            debug_log!(
                "[{}] {} host(s) torn down by the display surface",
                self.label(),
                collected.len()
            );
        }
        release(collected);

        loop {
            let next = self.inner.state.borrow().first_dismissed();
            let Some((key, id, kind)) = next else {
                break;
            };

            if kind.is_overlay() {
                let removed = self.inner.state.borrow_mut().evict_overlay(key);
                debug_log!(
                    "[{}] overlay {} closed, evicted {} host(s)",
                    self.label(),
                    id,
                    removed.len()
                );
                release(removed);
            } else {
                debug_log!("[{}] {} closed through its presented flag", self.label(), id);
                self.unwind(id, DismissKind::Including);
            }

            if self.inner.state.borrow().stack.contains(&key) {
                error_log!("[{}] failed to evict {}; stopping reconcile", self.label(), id);
                break;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// Render `route` wrapped in the ambient values of presentation `id`.
    fn render_scoped(&self, id: RouteViewId, route: &AnyRoute<T>) -> Content<T> {
        let scope = RouteScope::new(id, self.downgrade(), route.dependency());
        Content::scoped(scope, route.render())
    }

    fn present_push<P>(
        &self,
        id: RouteViewId,
        route: &AnyRoute<T>,
        presenter: &P,
    ) -> Result<HostKey, NavigationError>
    where
        P: Presenter<T> + ?Sized,
    {
        let presented = PresentedFlag::new();
        let context = PresentationContext::new(
            Content::Empty,
            self.render_scoped(id, route),
            presented.clone(),
            self.child_factory(route.clone()),
        );
        let content = presenter.combine(&context);

        let mut state = self.inner.state.borrow_mut();
        let frame = state.surface.show_as_new_frame(content.clone());
        let key = state.registry.allocate_key();
        let host = RouteHost::new(key, id, content, frame, presented, HostKind::Frame);
        if let Err(error) = state.registry.register(host) {
            error_log!("[{}] {}", state.label, error);
            state.surface.remove_frame(frame);
            return Err(error);
        }
        state.stack.push(key);
        Ok(key)
    }

    fn present_overlay<P>(
        &self,
        id: RouteViewId,
        route: &AnyRoute<T>,
        presenter: &P,
        source: Option<RouteViewId>,
    ) -> Result<(), NavigationError>
    where
        P: Presenter<T> + ?Sized,
    {
        let mode = presenter.mode();
        let anchored = self.inner.state.borrow().resolve_anchor(source);
        let anchor = match anchored {
            Some(anchor) => anchor,
            None => {
                warn_log!(
                    "[{}] presenting '{}' for {} without an anchor; eligible view not found, \
                     showing it as a new frame first",
                    self.label(),
                    route.name(),
                    presenter.name()
                );
                let fallback = self.inner.ids.next();
                self.present_push(fallback, route, &DestinationPresenter::new(PresentationMode::Push))?
            }
        };

        let anchor_host = self.inner.state.borrow().anchor_snapshot(anchor);
        let Some((anchor_content, frame)) = anchor_host else {
            error_log!("[{}] anchor {} vanished while presenting {}", self.label(), anchor, id);
            return Err(NavigationError::RouteNotFound { id });
        };
        trace_log!("[{}] anchoring {} {} on {} in {}", self.label(), mode, id, anchor, frame);

        let parent = match mode {
            PresentationMode::ReplaceParent => anchor_content,
            _ => Content::Empty,
        };
        let presented = PresentedFlag::new();
        let context = PresentationContext::new(
            parent,
            self.render_scoped(id, route),
            presented.clone(),
            self.child_factory(route.clone()),
        );
        let content = presenter.combine(&context);

        let mut state = self.inner.state.borrow_mut();
        let key = state.registry.allocate_key();
        let host = RouteHost::new(
            key,
            id,
            content,
            frame,
            presented,
            HostKind::Overlay { anchor, mode },
        );
        if let Err(error) = state.registry.register(host) {
            error_log!("[{}] {}", state.label, error);
            return Err(error);
        }
        state.stack.push(key);
        state.refresh_frame(frame);
        Ok(())
    }

    /// Factory for child routers rooted at `route`.
    fn child_factory(&self, route: AnyRoute<T>) -> ChildRouterFactory<T> {
        let weak = self.downgrade();
        Rc::new(move |context: &PresentationContext<T>| {
            let parent = weak.upgrade()?;
            Some(parent.spawn_child(&route, context))
        })
    }

    fn spawn_child(&self, route: &AnyRoute<T>, context: &PresentationContext<T>) -> Router<T> {
        let surface = self.inner.state.borrow_mut().surface.spawn_child();
        let link = ParentLink {
            router: self.downgrade(),
            context: context.clone(),
        };
        let child = Router::from_parts(
            self.inner.config.child(),
            Rc::clone(&self.inner.ids),
            surface,
            Some(link),
        );
        info_log!("[{}] created child router for '{}'", child.label(), route.name());

        if let Err(error) = child.replace_root_any(route.clone(), &PushPresenter) {
            error_log!("[{}] child router has no root: {}", child.label(), error);
        }
        child
    }
}

/// Mark hosts that left the stack as no longer presented.
///
/// Called with no borrow held; flipping a flag wakes its waiters.
pub(crate) fn release<T: 'static>(hosts: Vec<RouteHost<T>>) {
    for host in &hosts {
        host.presented().set(false);
    }
}

// ============================================================================
// RouterState
// ============================================================================

impl<T: 'static> RouterState<T> {
    pub(crate) fn is_stacked(&self, id: RouteViewId) -> bool {
        self.registry
            .lookup(id)
            .is_some_and(|host| self.stack.contains(&host.key()))
    }

    fn resolve_anchor(&self, source: Option<RouteViewId>) -> Option<HostKey> {
        if let Some(source) = source.and_then(RouteViewId::into_option) {
            match self.registry.lookup(source) {
                Some(host) if self.stack.contains(&host.key()) => return Some(host.key()),
                _ => {
                    warn_log!(
                        "[{}] trying to present on top of nonexisting source {}",
                        self.label,
                        source
                    );
                }
            }
        }
        self.stack.last().copied()
    }

    /// Remove hosts whose frame is no longer live.
    fn collect_garbage(&mut self) -> Vec<RouteHost<T>> {
        let surface = &self.surface;
        let collected = self
            .registry
            .garbage_collect(|frame| surface.is_frame_live(frame));
        if !collected.is_empty() {
            let registry = &self.registry;
            self.stack.retain(|key| registry.id_of(*key).is_some());
        }
        collected
    }

    /// Topmost host whose presented flag went false.
    fn first_dismissed(&self) -> Option<(HostKey, RouteViewId, HostKind)> {
        self.stack.iter().rev().find_map(|key| {
            let host = self.registry.by_key(*key)?;
            (!host.presented().get()).then(|| (host.key(), host.id(), host.kind()))
        })
    }

    /// Remove an overlay host and every overlay anchored on it, then
    /// redraw their frame.
    fn evict_overlay(&mut self, key: HostKey) -> Vec<RouteHost<T>>
    where
        T: Clone,
    {
        let Some(frame) = self.registry.by_key(key).map(RouteHost::frame) else {
            return Vec::new();
        };

        let mut doomed = vec![key];
        let mut i = 0;
        while i < doomed.len() {
            let anchor = doomed[i];
            for candidate in &self.stack {
                let anchored = self
                    .registry
                    .by_key(*candidate)
                    .and_then(|host| host.kind().anchor())
                    == Some(anchor);
                if anchored && !doomed.contains(candidate) {
                    doomed.push(*candidate);
                }
            }
            i += 1;
        }

        self.stack.retain(|candidate| !doomed.contains(candidate));
        let removed = doomed
            .into_iter()
            .filter_map(|doomed| self.registry.remove(doomed))
            .collect();
        self.refresh_frame(frame);
        removed
    }

    fn anchor_snapshot(&self, anchor: HostKey) -> Option<(Content<T>, FrameHandle)>
    where
        T: Clone,
    {
        self.registry
            .by_key(anchor)
            .map(|host| (host.content().clone(), host.frame()))
    }

    /// Redraw `frame` from the stack.
    ///
    /// The frame shows what [`compose`](Self::compose) builds for its frame
    /// host.
    pub(crate) fn refresh_frame(&mut self, frame: FrameHandle)
    where
        T: Clone,
    {
        if !self.surface.is_frame_live(frame) {
            return;
        }

        let frame_host = self.stack.iter().copied().find(|key| {
            self.registry
                .by_key(*key)
                .is_some_and(|host| host.frame() == frame && host.kind() == HostKind::Frame)
        });
        let Some(frame_host) = frame_host else {
            return;
        };
        let (content, overlay) = self.compose(frame_host);
        trace_log!("[{}] redrawing {}", self.label, frame);
        if self.surface.current_top_frame() == Some(frame) {
            self.surface.replace_active_frame(content);
        } else {
            self.surface.update_frame(frame, content);
        }
        match overlay {
            Some(overlay) => self.surface.attach_overlay(frame, overlay),
            None => self.surface.detach_overlay(frame),
        }
    }

    /// Content and overlay of host `key` with every stacked presentation
    /// anchored on it, in presentation order.
    ///
    /// A `ReplaceParent` presentation supersedes the host's content. A
    /// `Sibling` presentation becomes the overlay, carrying whatever is
    /// anchored on it in turn, so sheets presented from a sheet nest inside
    /// it.
    fn compose(&self, key: HostKey) -> (Content<T>, Option<Content<T>>)
    where
        T: Clone,
    {
        let Some(host) = self.registry.by_key(key) else {
            return (Content::Empty, None);
        };
        let mut content = host.content().clone();
        let mut overlay = None;

        for candidate in &self.stack {
            let Some(nested) = self.registry.by_key(*candidate) else {
                continue;
            };
            let HostKind::Overlay { anchor, mode } = nested.kind() else {
                continue;
            };
            if anchor != key {
                continue;
            }

            let (nested_content, nested_overlay) = self.compose(*candidate);
            match mode {
                PresentationMode::Sibling => {
                    let layer = match nested_overlay {
                        Some(inner) => {
                            Content::overlay(nested_content, inner, nested.presented().clone())
                        }
                        None => nested_content,
                    };
                    overlay = Some(layer);
                }
                _ => {
                    content = nested_content;
                    if nested_overlay.is_some() {
                        overlay = nested_overlay;
                    }
                }
            }
        }
        (content, overlay)
    }
}

// ============================================================================
// Handles
// ============================================================================

impl<T: 'static> WeakRouter<T> {
    /// A handle that never upgrades.
    pub fn new() -> Self {
        Self { inner: Weak::new() }
    }

    pub fn upgrade(&self) -> Option<Router<T>> {
        self.inner.upgrade().map(|inner| Router { inner })
    }
}

impl<T: 'static> Clone for Router<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Clone for WeakRouter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for WeakRouter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for Router<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Router");
        debug.field("label", &self.label());
        if let Ok(state) = self.inner.state.try_borrow() {
            debug
                .field("depth", &state.stack.len())
                .field("child", &state.parent.is_some());
        }
        debug.finish_non_exhaustive()
    }
}

impl<T: 'static> fmt::Debug for WeakRouter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakRouter")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{view_fn, ReplaceParentPresenter, SiblingPresenter, StackSurface};

    fn router() -> (Router<&'static str>, StackSurface<&'static str>) {
        let surface = StackSurface::new();
        (Router::new(surface.clone()), surface)
    }

    #[test]
    fn test_push_registers_and_shows_frame() {
        let (router, surface) = router();
        let root = router.replace_root_with(view_fn(|| Content::view("root"))).unwrap();
        let next = router.push(view_fn(|| Content::view("next"))).unwrap();

        assert!(root < next);
        assert_eq!(router.depth(), 2);
        assert_eq!(router.root_id(), Some(root));
        assert_eq!(router.top_id(), Some(next));
        assert_eq!(surface.frame_count(), 2);
        assert_eq!(surface.visible_top(), vec!["next"]);
    }

    #[test]
    fn test_rendered_content_is_scoped() {
        let (router, surface) = router();
        let root = router
            .navigate(
                crate::route_fn(|n: &u32| Content::view(if *n == 1 { "one" } else { "other" })),
                1,
                &PushPresenter,
                None,
            )
            .unwrap();

        let content = surface.top_content().unwrap();
        let scope = content.scope().unwrap();
        assert_eq!(scope.id(), root);
        assert_eq!(scope.dependency::<u32>(), Some(&1));
        assert!(scope.router().unwrap().ptr_eq(&router));
    }

    #[test]
    fn test_replace_parent_updates_anchor_frame() {
        let (router, surface) = router();
        let root = router.replace_root_with(view_fn(|| Content::view("root"))).unwrap();
        let alert = router
            .navigate(view_fn(|| Content::view("alert")), (), &ReplaceParentPresenter, Some(root))
            .unwrap();

        assert_eq!(surface.frame_count(), 1);
        assert_eq!(surface.visible_top(), vec!["root", "alert"]);
        assert_eq!(router.stack_ids(), vec![root, alert]);
    }

    #[test]
    fn test_sibling_attaches_overlay() {
        let (router, surface) = router();
        let root = router.replace_root_with(view_fn(|| Content::view("root"))).unwrap();
        router
            .navigate(view_fn(|| Content::view("sheet")), (), &SiblingPresenter::new(false), None)
            .unwrap();

        let frame = surface.current_top_frame().unwrap();
        assert_eq!(surface.content_of(frame).unwrap().visible(), vec![&"root"]);
        assert_eq!(surface.overlay_of(frame).unwrap().visible(), vec![&"sheet"]);
        assert_eq!(router.root_id(), Some(root));
    }

    #[test]
    fn test_overlay_without_anchor_synthesizes_one() {
        let (router, surface) = router();
        let sheet = router
            .navigate(view_fn(|| Content::view("sheet")), (), &SiblingPresenter::new(false), None)
            .unwrap();

        assert_eq!(router.depth(), 2);
        assert_eq!(router.top_id(), Some(sheet));
        assert_ne!(router.root_id(), Some(sheet));
        assert_eq!(surface.frame_count(), 1);
    }

    #[test]
    fn test_unknown_source_falls_back_to_top() {
        let (router, surface) = router();
        router.replace_root_with(view_fn(|| Content::view("root"))).unwrap();
        router.push(view_fn(|| Content::view("top"))).unwrap();
        let stranger = router.generator().next();

        router
            .navigate(view_fn(|| Content::view("alert")), (), &ReplaceParentPresenter, Some(stranger))
            .unwrap();

        assert_eq!(surface.visible_top(), vec!["top", "alert"]);
    }

    #[test]
    fn test_replace_root_clears_everything() {
        let (router, surface) = router();
        let old = router.replace_root_with(view_fn(|| Content::view("old"))).unwrap();
        router.push(view_fn(|| Content::view("deeper"))).unwrap();
        let flag = router.presented_flag(old).unwrap();

        let new = router.replace_root_with(view_fn(|| Content::view("new"))).unwrap();

        assert!(!flag.get());
        assert_eq!(router.stack_ids(), vec![new]);
        assert_eq!(surface.frame_count(), 1);
        assert_eq!(surface.visible_top(), vec!["new"]);
    }

    #[test]
    fn test_garbage_collection_after_tear_down() {
        let (router, surface) = router();
        let root = router.replace_root_with(view_fn(|| Content::view("root"))).unwrap();
        let top = router.push(view_fn(|| Content::view("top"))).unwrap();

        surface.tear_down_top();

        assert!(!router.is_presenting(top));
        assert_eq!(router.stack_ids(), vec![root]);
    }

    #[test]
    fn test_builder_config() {
        let ids = Rc::new(IdGenerator::new());
        ids.next();
        let router: Router<&str> = Router::builder(StackSurface::new())
            .label("main")
            .generator(Rc::clone(&ids))
            .build();

        assert_eq!(router.label(), "main");
        assert_eq!(router.config().handoff, Handoff::Immediate);
        assert!(Rc::ptr_eq(router.generator(), &ids));
        assert!(!router.is_child());
        assert!(router.root_id().is_none());
    }

    #[test]
    fn test_weak_router() {
        let (router, _) = router();
        let weak = router.downgrade();
        assert!(weak.upgrade().is_some());
        drop(router);
        assert!(weak.upgrade().is_none());
        assert!(WeakRouter::<&str>::new().upgrade().is_none());
    }
}
