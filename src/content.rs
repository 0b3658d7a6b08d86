//! Rendered content and its ambient values.
//!
//! The engine never draws anything itself. Destinations render into a
//! [`Content`] tree whose leaves are a caller-chosen type `T` (a widget
//! handle, a view description, or just a string in tests). The engine adds
//! structure around those leaves:
//!
//! - [`Content::Scoped`] wraps a destination with its [`RouteScope`] so that
//!   link elements inside it can navigate relative to it. The scope carries
//!   the presenting router, the [`RouteViewId`] and the dependency.
//! - [`Content::Overlay`] puts one piece of content above another, visible
//!   only while its [`PresentedFlag`] is set.
//! - [`Content::Router`] embeds a child router, which draws into its own
//!   display surface.

use crate::presenter::PresentedFlag;
use crate::router::{Router, WeakRouter};
use crate::RouteViewId;
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Content produced by rendering a destination or combining presentations.
pub enum Content<T: 'static> {
    /// Nothing.
    Empty,
    /// A caller-provided leaf.
    View(T),
    /// Content annotated with the ambient values of the route that produced it.
    Scoped {
        /// Router, identifier and dependency of the presenting route.
        scope: RouteScope<T>,
        /// The rendered destination.
        content: Box<Content<T>>,
    },
    /// `overlay` shown above `base` while `presented` is set.
    Overlay {
        /// Structural base, always visible.
        base: Box<Content<T>>,
        /// Content floating above the base.
        overlay: Box<Content<T>>,
        /// Visibility of `overlay`.
        presented: PresentedFlag,
    },
    /// A nested router scoped to a destination.
    Router(Router<T>),
}

impl<T: 'static> Content<T> {
    /// Wrap a leaf.
    pub fn view(view: T) -> Self {
        Self::View(view)
    }

    /// Build an overlay of `overlay` above `base`, gated by `presented`.
    pub fn overlay(base: Content<T>, overlay: Content<T>, presented: PresentedFlag) -> Self {
        Self::Overlay {
            base: Box::new(base),
            overlay: Box::new(overlay),
            presented,
        }
    }

    /// Embed a child router.
    pub fn router(router: Router<T>) -> Self {
        Self::Router(router)
    }

    pub(crate) fn scoped(scope: RouteScope<T>, content: Content<T>) -> Self {
        Self::Scoped {
            scope,
            content: Box::new(content),
        }
    }

    /// Check if this is [`Content::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Leaves currently visible, base first.
    ///
    /// Overlays contribute their leaves only while presented. Embedded
    /// routers contribute nothing; they display on their own surface.
    pub fn visible(&self) -> Vec<&T> {
        let mut out = Vec::new();
        self.collect_visible(&mut out);
        out
    }

    fn collect_visible<'a>(&'a self, out: &mut Vec<&'a T>) {
        match self {
            Self::Empty | Self::Router(_) => {}
            Self::View(view) => out.push(view),
            Self::Scoped { content, .. } => content.collect_visible(out),
            Self::Overlay {
                base,
                overlay,
                presented,
            } => {
                base.collect_visible(out);
                if presented.get() {
                    overlay.collect_visible(out);
                }
            }
        }
    }

    /// The outermost [`RouteScope`] of this content, if any.
    ///
    /// For an overlay this is the scope of the base.
    pub fn scope(&self) -> Option<&RouteScope<T>> {
        match self {
            Self::Scoped { scope, .. } => Some(scope),
            Self::Overlay { base, .. } => base.scope(),
            _ => None,
        }
    }

    /// The first child router embedded anywhere in this content.
    pub fn child_router(&self) -> Option<Router<T>> {
        match self {
            Self::Router(router) => Some(router.clone()),
            Self::Scoped { content, .. } => content.child_router(),
            Self::Overlay { base, overlay, .. } => {
                overlay.child_router().or_else(|| base.child_router())
            }
            Self::Empty | Self::View(_) => None,
        }
    }
}

impl<T: Clone + 'static> Clone for Content<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::View(view) => Self::View(view.clone()),
            Self::Scoped { scope, content } => Self::Scoped {
                scope: scope.clone(),
                content: content.clone(),
            },
            Self::Overlay {
                base,
                overlay,
                presented,
            } => Self::Overlay {
                base: base.clone(),
                overlay: overlay.clone(),
                presented: presented.clone(),
            },
            Self::Router(router) => Self::Router(router.clone()),
        }
    }
}

impl<T: 'static> Default for Content<T> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Content<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Content::Empty"),
            Self::View(view) => f.debug_tuple("Content::View").field(view).finish(),
            Self::Scoped { scope, content } => f
                .debug_struct("Content::Scoped")
                .field("id", &scope.id())
                .field("content", content)
                .finish(),
            Self::Overlay {
                base,
                overlay,
                presented,
            } => f
                .debug_struct("Content::Overlay")
                .field("base", base)
                .field("overlay", overlay)
                .field("presented", &presented.get())
                .finish(),
            Self::Router(router) => f
                .debug_tuple("Content::Router")
                .field(&router.label())
                .finish(),
        }
    }
}

// ============================================================================
// RouteScope
// ============================================================================

/// Ambient values attached to every rendered destination.
///
/// Holds a weak handle to the presenting router, so content that outlives
/// its router sees [`router`](Self::router) return `None` instead of keeping
/// the router alive.
pub struct RouteScope<T: 'static> {
    id: RouteViewId,
    router: WeakRouter<T>,
    dependency: Rc<dyn Any>,
}

impl<T: 'static> RouteScope<T> {
    pub(crate) fn new(id: RouteViewId, router: WeakRouter<T>, dependency: Rc<dyn Any>) -> Self {
        Self {
            id,
            router,
            dependency,
        }
    }

    /// Identifier of the destination this scope belongs to.
    pub fn id(&self) -> RouteViewId {
        self.id
    }

    /// The router that presented the destination, if it is still alive.
    pub fn router(&self) -> Option<Router<T>> {
        self.router.upgrade()
    }

    /// The dependency the destination was rendered with, if it has type `D`.
    pub fn dependency<D: 'static>(&self) -> Option<&D> {
        self.dependency.downcast_ref::<D>()
    }
}

impl<T: 'static> Clone for RouteScope<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            router: self.router.clone(),
            dependency: Rc::clone(&self.dependency),
        }
    }
}

impl<T: 'static> fmt::Debug for RouteScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteScope")
            .field("id", &self.id)
            .field("router_alive", &self.router.upgrade().is_some())
            .finish_non_exhaustive()
    }
}
