//! Test utilities for router tests
//!
//! Provides fixtures and presenters shared by the integration tests.

#![allow(dead_code)]

use route_stack::*;

pub type Leaf = &'static str;

/// Route logs to the test output; set `RUST_LOG=debug` to see them.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A router over a fresh in-memory surface.
pub fn setup() -> (Router<Leaf>, StackSurface<Leaf>) {
    init_logging();
    let surface = StackSurface::new();
    let router = Router::builder(surface.clone()).label("test").build();
    (router, surface)
}

/// Like [`setup`], with an explicit handoff policy.
pub fn setup_with(handoff: Handoff) -> (Router<Leaf>, StackSurface<Leaf>) {
    init_logging();
    let surface = StackSurface::new();
    let router = Router::builder(surface.clone())
        .label("test")
        .handoff(handoff)
        .build();
    (router, surface)
}

/// A dependency-free page showing `name`.
pub fn page(name: Leaf) -> impl Route<Leaf, Dependency = ()> {
    view_fn(move || Content::view(name))
}

/// A router with a root page already presented.
pub fn with_root(name: Leaf) -> (Router<Leaf>, StackSurface<Leaf>, RouteViewId) {
    let (router, surface) = setup();
    let root = router
        .replace_root_with(page(name))
        .expect("root presented");
    (router, surface, root)
}

/// Presenter embedding a child router rooted at the destination.
///
/// `ReplaceParent` keeps the parent as the base; `Sibling` floats the
/// child router above the anchor.
pub fn child_router_presenter(mode: PresentationMode) -> impl Presenter<Leaf> {
    presenter_fn(mode, |context: &PresentationContext<Leaf>| {
        let child = context
            .make_child_router()
            .map_or_else(|| context.destination().clone(), Content::router);
        Content::overlay(
            context.parent().clone(),
            child,
            context.presented_flag().clone(),
        )
    })
}

/// The child router embedded in the overlay of `frame`, or in its content.
pub fn child_of(surface: &StackSurface<Leaf>, frame: FrameHandle) -> Router<Leaf> {
    surface
        .overlay_of(frame)
        .and_then(|overlay| overlay.child_router())
        .or_else(|| surface.content_of(frame).and_then(|c| c.child_router()))
        .expect("child router embedded in frame")
}

/// Visible leaves of the topmost frame of `surface`.
pub fn visible(surface: &StackSurface<Leaf>) -> Vec<Leaf> {
    surface.visible_top()
}
