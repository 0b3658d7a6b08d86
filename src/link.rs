//! Navigation links.
//!
//! A [`RouterLink`] is the caller-facing element that starts a navigation
//! from inside rendered content. It navigates through the router found in
//! the [`RouteScope`] it is activated from, anchored at that scope's
//! presentation.
//!
//! ```
//! use route_stack::{view_fn, Content, Router, RouterLink, StackSurface};
//!
//! let surface = StackSurface::new();
//! let router = Router::new(surface.clone());
//! router.replace_root_with(view_fn(|| Content::view("list"))).unwrap();
//!
//! let link = RouterLink::new(view_fn(|| Content::view("detail")), ());
//! let scope = surface.top_content().unwrap().scope().cloned().unwrap();
//!
//! let id = link.activate(&scope).unwrap();
//! assert_eq!(router.top_id(), Some(id));
//! ```

use crate::{
    error_log, AnyRoute, Content, NavigationError, Presenter, PushPresenter, Route, RouteScope,
    RouteViewId,
};
use std::fmt;
use std::rc::Rc;

/// A destination plus the presenter to show it with.
pub struct RouterLink<T: 'static> {
    route: AnyRoute<T>,
    presenter: Rc<dyn Presenter<T>>,
    label: Content<T>,
}

impl<T: Clone + 'static> RouterLink<T> {
    /// Create a link that pushes `route`.
    pub fn new<R>(route: R, dependency: R::Dependency) -> Self
    where
        R: Route<T>,
    {
        Self::from_any(AnyRoute::new(route, dependency))
    }

    /// Create a link from a type-erased route.
    pub fn from_any(route: AnyRoute<T>) -> Self {
        Self {
            route,
            presenter: Rc::new(PushPresenter),
            label: Content::Empty,
        }
    }

    /// Present with `presenter` instead of pushing.
    #[must_use]
    pub fn presenter(mut self, presenter: impl Presenter<T> + 'static) -> Self {
        self.presenter = Rc::new(presenter);
        self
    }

    /// Set the content the link displays.
    #[must_use]
    pub fn label(mut self, label: Content<T>) -> Self {
        self.label = label;
        self
    }

    /// The content the link displays.
    pub fn content(&self) -> &Content<T> {
        &self.label
    }

    /// Navigate from `scope`.
    ///
    /// # Errors
    ///
    /// [`NavigationError::RouterUnavailable`] if the scope's router has been
    /// dropped, or any error from [`Router::navigate`](crate::Router::navigate).
    pub fn activate(&self, scope: &RouteScope<T>) -> Result<RouteViewId, NavigationError> {
        let Some(router) = scope.router() else {
            error_log!(
                "RouterLink to '{}' activated from {} without a live router",
                self.route.name(),
                scope.id()
            );
            return Err(NavigationError::RouterUnavailable);
        };
        router.navigate_any(self.route.clone(), &*self.presenter, Some(scope.id()))
    }

    /// Navigate from the scope of `content`, e.g. the content a link was
    /// rendered into.
    ///
    /// # Errors
    ///
    /// [`NavigationError::RouterUnavailable`] if `content` carries no scope
    /// or its router has been dropped.
    pub fn activate_in(&self, content: &Content<T>) -> Result<RouteViewId, NavigationError> {
        match content.scope() {
            Some(scope) => self.activate(scope),
            None => {
                error_log!("RouterLink to '{}' activated outside of any route", self.route.name());
                Err(NavigationError::RouterUnavailable)
            }
        }
    }
}

impl<T: 'static> Clone for RouterLink<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            route: self.route.clone(),
            presenter: Rc::clone(&self.presenter),
            label: self.label.clone(),
        }
    }
}

impl<T: 'static> fmt::Debug for RouterLink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterLink")
            .field("route", &self.route.name())
            .field("presenter", &self.presenter.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{view_fn, PresentationMode, Router, SiblingPresenter, StackSurface, WeakRouter};

    #[test]
    fn test_activate_pushes_from_scope() {
        let surface = StackSurface::new();
        let router = Router::new(surface.clone());
        let root = router.replace_root_with(view_fn(|| Content::view("root"))).unwrap();

        let link = RouterLink::new(view_fn(|| Content::view("next")), ()).label(Content::view("Open"));
        let id = link.activate_in(&surface.top_content().unwrap()).unwrap();

        assert_eq!(router.stack_ids(), vec![root, id]);
        assert_eq!(link.content().visible(), vec![&"Open"]);
    }

    #[test]
    fn test_activate_with_sibling_presenter_anchors_on_scope() {
        let surface = StackSurface::new();
        let router = Router::new(surface.clone());
        router.replace_root_with(view_fn(|| Content::view("root"))).unwrap();
        let root_scope = surface.top_content().unwrap().scope().cloned().unwrap();
        router.push(view_fn(|| Content::view("top"))).unwrap();

        let link = RouterLink::new(view_fn(|| Content::view("sheet")), ())
            .presenter(SiblingPresenter::new(false));
        link.activate(&root_scope).unwrap();

        let root_frame = surface.frames()[0];
        assert_eq!(surface.overlay_of(root_frame).unwrap().visible(), vec![&"sheet"]);
        assert_eq!(surface.visible_top(), vec!["top"]);
        assert_eq!(
            Presenter::<&str>::mode(&SiblingPresenter::new(false)),
            PresentationMode::Sibling
        );
    }

    #[test]
    fn test_activate_without_router() {
        let scope = RouteScope::new(RouteViewId::NONE, WeakRouter::new(), Rc::new(()));
        let link = RouterLink::new(view_fn(|| Content::view("nowhere")), ());

        assert_eq!(link.activate(&scope), Err(NavigationError::RouterUnavailable));
        assert_eq!(
            link.activate_in(&Content::view("bare")),
            Err(NavigationError::RouterUnavailable)
        );
    }
}
