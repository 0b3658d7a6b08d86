//! Presenter policies.
//!
//! A [`Presenter`] decides how a destination enters the presentation
//! hierarchy. Its [`PresentationMode`] tells the router what to do with the
//! stack, and [`Presenter::combine`] turns a [`PresentationContext`] into the
//! content that is finally displayed.
//!
//! | Presenter | Mode | Result |
//! |-----------|------|--------|
//! | [`PushPresenter`] | `Push` | the destination, on a new frame |
//! | [`DestinationPresenter`] | any | the destination only |
//! | [`ReplaceParentPresenter`] | `ReplaceParent` | destination over the parent, in the parent's frame |
//! | [`SiblingPresenter`] | `Sibling` | destination (or a child router) as an overlay on the anchor |
//! | [`presenter_fn`] | any | whatever the closure builds |
//!
//! # Is-presented flag
//!
//! Every presentation gets a [`PresentedFlag`]. Display surfaces and users
//! flip it to `false` to ask for the presentation to go away; the router
//! notices on its next reconcile. Async code can await
//! [`PresentedFlag::dismissed`] instead of polling.

use crate::{Content, Router};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// How a presentation is inserted into the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PresentationMode {
    /// Drill in: a new host on top of the stack.
    #[default]
    Push,
    /// The destination supersedes the anchor's displayed content in place.
    ReplaceParent,
    /// The destination floats above the anchor, which stays the base.
    Sibling,
}

impl PresentationMode {
    /// Check if this mode shares the anchor's frame instead of adding one.
    pub fn is_overlay(self) -> bool {
        !matches!(self, Self::Push)
    }
}

impl fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::ReplaceParent => write!(f, "replace-parent"),
            Self::Sibling => write!(f, "sibling"),
        }
    }
}

// ============================================================================
// PresentedFlag
// ============================================================================

/// Shared, mutable "is presented" state of one presentation.
///
/// Clones share the same state. Starts out `true`.
#[derive(Clone)]
pub struct PresentedFlag {
    state: Rc<FlagState>,
}

struct FlagState {
    presented: Cell<bool>,
    waiters: RefCell<Vec<Waker>>,
}

impl PresentedFlag {
    /// Create a flag in the presented state.
    pub fn new() -> Self {
        Self {
            state: Rc::new(FlagState {
                presented: Cell::new(true),
                waiters: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Current value.
    pub fn get(&self) -> bool {
        self.state.presented.get()
    }

    /// Set the value. Going from `true` to `false` wakes every pending
    /// [`dismissed`](Self::dismissed) future.
    pub fn set(&self, presented: bool) {
        let was = self.state.presented.replace(presented);
        if was && !presented {
            let waiters = std::mem::take(&mut *self.state.waiters.borrow_mut());
            for waker in waiters {
                waker.wake();
            }
        }
    }

    /// Shorthand for `set(false)`.
    pub fn dismiss(&self) {
        self.set(false);
    }

    /// A future that completes once the flag is `false`.
    pub fn dismissed(&self) -> Dismissed {
        Dismissed { flag: self.clone() }
    }

    /// Check if both handles share the same state.
    pub fn ptr_eq(&self, other: &PresentedFlag) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Default for PresentedFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PresentedFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PresentedFlag").field(&self.get()).finish()
    }
}

/// Future returned by [`PresentedFlag::dismissed`].
#[must_use = "futures do nothing unless polled"]
pub struct Dismissed {
    flag: PresentedFlag,
}

impl Future for Dismissed {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.flag.get() {
            let mut waiters = self.flag.state.waiters.borrow_mut();
            if !waiters.iter().any(|w| w.will_wake(cx.waker())) {
                waiters.push(cx.waker().clone());
            }
            Poll::Pending
        } else {
            Poll::Ready(())
        }
    }
}

impl fmt::Debug for Dismissed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dismissed")
            .field("presented", &self.flag.get())
            .finish()
    }
}

// ============================================================================
// PresentationContext
// ============================================================================

/// Builds a child router scoped to the destination of a presentation.
///
/// Returns `None` if the presenting router has been dropped.
pub type ChildRouterFactory<T> = Rc<dyn Fn(&PresentationContext<T>) -> Option<Router<T>>>;

/// Everything a [`Presenter`] needs to build the displayed content.
pub struct PresentationContext<T: 'static> {
    parent: Content<T>,
    destination: Content<T>,
    presented: PresentedFlag,
    make_router: ChildRouterFactory<T>,
}

impl<T: 'static> PresentationContext<T> {
    /// Create a context.
    pub fn new(
        parent: Content<T>,
        destination: Content<T>,
        presented: PresentedFlag,
        make_router: ChildRouterFactory<T>,
    ) -> Self {
        Self {
            parent,
            destination,
            presented,
            make_router,
        }
    }

    /// Content of the anchor the destination is presented on.
    ///
    /// Empty for `Push` and `Sibling` presentations.
    pub fn parent(&self) -> &Content<T> {
        &self.parent
    }

    /// The rendered destination.
    pub fn destination(&self) -> &Content<T> {
        &self.destination
    }

    /// Current value of the is-presented flag.
    pub fn is_presented(&self) -> bool {
        self.presented.get()
    }

    /// Set the is-presented flag.
    pub fn set_presented(&self, presented: bool) {
        self.presented.set(presented);
    }

    /// The is-presented flag itself.
    pub fn presented_flag(&self) -> &PresentedFlag {
        &self.presented
    }

    /// Build a child router rooted at the destination, linked to the
    /// presenting router through this context.
    pub fn make_child_router(&self) -> Option<Router<T>> {
        (self.make_router)(self)
    }
}

impl<T: Clone + 'static> Clone for PresentationContext<T> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone(),
            destination: self.destination.clone(),
            presented: self.presented.clone(),
            make_router: Rc::clone(&self.make_router),
        }
    }
}

impl<T: 'static> fmt::Debug for PresentationContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationContext")
            .field("presented", &self.presented.get())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Presenter trait
// ============================================================================

/// Strategy deciding how a destination is presented.
///
/// # Example
///
/// ```
/// use route_stack::{Content, PresentationContext, PresentationMode, Presenter};
///
/// /// Shows the destination above the parent with no way to hide it.
/// struct Banner;
///
/// impl Presenter<&'static str> for Banner {
///     fn mode(&self) -> PresentationMode {
///         PresentationMode::ReplaceParent
///     }
///
///     fn combine(&self, context: &PresentationContext<&'static str>) -> Content<&'static str> {
///         Content::overlay(
///             context.parent().clone(),
///             context.destination().clone(),
///             Default::default(),
///         )
///     }
/// }
/// ```
pub trait Presenter<T: 'static> {
    /// Stack behaviour of this presenter.
    fn mode(&self) -> PresentationMode;

    /// Build the content to display.
    fn combine(&self, context: &PresentationContext<T>) -> Content<T>;

    /// Presenter name for debugging and log messages.
    fn name(&self) -> &'static str {
        "Presenter"
    }
}

impl<T: 'static, P: Presenter<T> + ?Sized> Presenter<T> for Rc<P> {
    fn mode(&self) -> PresentationMode {
        (**self).mode()
    }

    fn combine(&self, context: &PresentationContext<T>) -> Content<T> {
        (**self).combine(context)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Pushes the destination as a new frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct PushPresenter;

impl<T: Clone + 'static> Presenter<T> for PushPresenter {
    fn mode(&self) -> PresentationMode {
        PresentationMode::Push
    }

    fn combine(&self, context: &PresentationContext<T>) -> Content<T> {
        context.destination().clone()
    }

    fn name(&self) -> &'static str {
        "PushPresenter"
    }
}

/// Presents the destination only, with a configurable mode.
///
/// With [`PresentationMode::ReplaceParent`] the destination takes over the
/// anchor's frame entirely until its flag goes false.
#[derive(Debug, Clone, Copy, Default)]
pub struct DestinationPresenter {
    mode: PresentationMode,
}

impl DestinationPresenter {
    /// Create a destination presenter with the given mode.
    pub fn new(mode: PresentationMode) -> Self {
        Self { mode }
    }
}

impl<T: Clone + 'static> Presenter<T> for DestinationPresenter {
    fn mode(&self) -> PresentationMode {
        self.mode
    }

    fn combine(&self, context: &PresentationContext<T>) -> Content<T> {
        context.destination().clone()
    }

    fn name(&self) -> &'static str {
        "DestinationPresenter"
    }
}

/// Shows the destination above the parent's content, in the parent's frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaceParentPresenter;

impl<T: Clone + 'static> Presenter<T> for ReplaceParentPresenter {
    fn mode(&self) -> PresentationMode {
        PresentationMode::ReplaceParent
    }

    fn combine(&self, context: &PresentationContext<T>) -> Content<T> {
        Content::overlay(
            context.parent().clone(),
            context.destination().clone(),
            context.presented_flag().clone(),
        )
    }

    fn name(&self) -> &'static str {
        "ReplaceParentPresenter"
    }
}

/// Shows the destination as an overlay anchored to the parent's frame,
/// in the manner of a sheet.
///
/// When `provides_router` is set, the overlay hosts a child router rooted at
/// the destination, so navigation inside the sheet stays inside the sheet.
#[derive(Debug, Clone, Copy)]
pub struct SiblingPresenter {
    provides_router: bool,
}

impl SiblingPresenter {
    /// Create a sibling presenter.
    pub fn new(provides_router: bool) -> Self {
        Self { provides_router }
    }

    /// Check if the overlay hosts a child router.
    pub fn provides_router(&self) -> bool {
        self.provides_router
    }
}

impl Default for SiblingPresenter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<T: Clone + 'static> Presenter<T> for SiblingPresenter {
    fn mode(&self) -> PresentationMode {
        PresentationMode::Sibling
    }

    fn combine(&self, context: &PresentationContext<T>) -> Content<T> {
        let overlay = if self.provides_router {
            context
                .make_child_router()
                .map_or_else(|| context.destination().clone(), Content::router)
        } else {
            context.destination().clone()
        };
        Content::overlay(
            context.parent().clone(),
            overlay,
            context.presented_flag().clone(),
        )
    }

    fn name(&self) -> &'static str {
        "SiblingPresenter"
    }
}

// ============================================================================
// presenter_fn helper
// ============================================================================

/// Create a presenter from a mode and a closure.
///
/// ```
/// use route_stack::{presenter_fn, PresentationContext, PresentationMode, Presenter};
///
/// let presenter = presenter_fn(
///     PresentationMode::ReplaceParent,
///     |context: &PresentationContext<&'static str>| context.destination().clone(),
/// );
/// assert_eq!(Presenter::<&str>::mode(&presenter), PresentationMode::ReplaceParent);
/// ```
pub fn presenter_fn<T, F>(mode: PresentationMode, f: F) -> FnPresenter<F>
where
    T: 'static,
    F: Fn(&PresentationContext<T>) -> Content<T>,
{
    FnPresenter { mode, f }
}

/// Presenter created from a function or closure.
pub struct FnPresenter<F> {
    mode: PresentationMode,
    f: F,
}

impl<T, F> Presenter<T> for FnPresenter<F>
where
    T: 'static,
    F: Fn(&PresentationContext<T>) -> Content<T>,
{
    fn mode(&self) -> PresentationMode {
        self.mode
    }

    fn combine(&self, context: &PresentationContext<T>) -> Content<T> {
        (self.f)(context)
    }

    fn name(&self) -> &'static str {
        "FnPresenter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(parent: &'static str, destination: &'static str) -> PresentationContext<&'static str> {
        PresentationContext::new(
            Content::view(parent),
            Content::view(destination),
            PresentedFlag::new(),
            Rc::new(|_: &PresentationContext<&'static str>| None),
        )
    }

    struct NoopWake;

    impl std::task::Wake for NoopWake {
        fn wake(self: std::sync::Arc<Self>) {}
    }

    fn noop_waker() -> Waker {
        Waker::from(std::sync::Arc::new(NoopWake))
    }

    #[test]
    fn test_mode_is_overlay() {
        assert!(!PresentationMode::Push.is_overlay());
        assert!(PresentationMode::ReplaceParent.is_overlay());
        assert!(PresentationMode::Sibling.is_overlay());
        assert_eq!(PresentationMode::default(), PresentationMode::Push);
    }

    #[test]
    fn test_flag_starts_presented_and_shares_state() {
        let flag = PresentedFlag::new();
        let copy = flag.clone();
        assert!(flag.get());

        copy.dismiss();
        assert!(!flag.get());
        assert!(flag.ptr_eq(&copy));
        assert!(!flag.ptr_eq(&PresentedFlag::new()));
    }

    #[test]
    fn test_dismissed_future_polls_flag() {
        let flag = PresentedFlag::new();
        let mut future = flag.dismissed();
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);

        assert!(Pin::new(&mut future).poll(&mut cx).is_pending());
        flag.set(false);
        assert!(Pin::new(&mut future).poll(&mut cx).is_ready());
    }

    #[test]
    fn test_push_presenter_returns_destination() {
        let ctx = context("parent", "destination");
        let content = PushPresenter.combine(&ctx);
        assert_eq!(content.visible(), vec![&"destination"]);
        assert_eq!(Presenter::<&str>::mode(&PushPresenter), PresentationMode::Push);
    }

    #[test]
    fn test_replace_parent_presenter_overlays_parent() {
        let ctx = context("parent", "destination");
        let content = ReplaceParentPresenter.combine(&ctx);
        assert_eq!(content.visible(), vec![&"parent", &"destination"]);

        ctx.set_presented(false);
        assert_eq!(content.visible(), vec![&"parent"]);
    }

    #[test]
    fn test_sibling_presenter_falls_back_to_destination() {
        // The factory yields no router, so the destination is shown directly.
        let ctx = context("parent", "sheet");
        let content = SiblingPresenter::new(true).combine(&ctx);
        assert_eq!(content.visible(), vec![&"parent", &"sheet"]);
        assert!(content.child_router().is_none());
    }

    #[test]
    fn test_destination_presenter_mode() {
        let presenter = DestinationPresenter::new(PresentationMode::Sibling);
        assert_eq!(Presenter::<&str>::mode(&presenter), PresentationMode::Sibling);
        let ctx = context("parent", "destination");
        assert_eq!(presenter.combine(&ctx).visible(), vec![&"destination"]);
    }

    #[test]
    fn test_presenter_fn() {
        let presenter = presenter_fn(PresentationMode::Sibling, |ctx: &PresentationContext<&'static str>| {
            ctx.parent().clone()
        });
        let ctx = context("parent", "destination");
        assert_eq!(presenter.combine(&ctx).visible(), vec![&"parent"]);
        assert_eq!(Presenter::<&str>::name(&presenter), "FnPresenter");
    }
}
