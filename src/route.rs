//! Destinations.
//!
//! A [`Route`] is anything that can render [`Content`] from a dependency
//! value. Rendering happens exactly once per navigation call; the engine
//! keeps the rendered content, not the route.
//!
//! Three ways to describe a destination:
//!
//! | Approach | When to use |
//! |----------|-------------|
//! | Implement [`Route`] | Named destination types with their own dependency type |
//! | [`route_fn`] / [`view_fn`] | One-off destinations from a closure |
//! | [`AnyRoute`] | A route and its dependency erased into one value (links, child routers) |
//!
//! # Example
//!
//! ```
//! use route_stack::{route_fn, Content, Route};
//!
//! struct Profile;
//!
//! impl Route<String> for Profile {
//!     type Dependency = u32;
//!
//!     fn render(&self, user_id: &u32) -> Content<String> {
//!         Content::view(format!("profile {user_id}"))
//!     }
//! }
//!
//! let greeting = route_fn(|name: &String| Content::view(format!("hello {name}")));
//! assert_eq!(
//!     greeting.render(&"ada".to_string()).visible(),
//!     vec![&"hello ada".to_string()]
//! );
//! assert_eq!(Profile.render(&7).visible(), vec![&"profile 7".to_string()]);
//! ```

use crate::Content;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// A destination that renders content from a dependency.
pub trait Route<T: 'static>: 'static {
    /// Value the route needs to render. Use `()` for independent routes.
    type Dependency: 'static;

    /// Render the destination.
    fn render(&self, dependency: &Self::Dependency) -> Content<T>;

    /// Route name for debugging and log messages.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

// ============================================================================
// route_fn helper
// ============================================================================

/// Create a route from a closure taking the dependency.
pub fn route_fn<T, D, F>(f: F) -> FnRoute<F, D>
where
    T: 'static,
    F: Fn(&D) -> Content<T> + 'static,
{
    FnRoute {
        f,
        _dependency: PhantomData,
    }
}

/// Create a dependency-free route from a closure.
pub fn view_fn<T, F>(f: F) -> impl Route<T, Dependency = ()>
where
    T: 'static,
    F: Fn() -> Content<T> + 'static,
{
    route_fn(move |_: &()| f())
}

/// Route created from a function or closure.
pub struct FnRoute<F, D> {
    f: F,
    _dependency: PhantomData<fn(&D)>,
}

impl<T, D, F> Route<T> for FnRoute<F, D>
where
    T: 'static,
    D: 'static,
    F: Fn(&D) -> Content<T> + 'static,
{
    type Dependency = D;

    fn render(&self, dependency: &D) -> Content<T> {
        (self.f)(dependency)
    }

    fn name(&self) -> &'static str {
        "FnRoute"
    }
}

impl<F: Clone, D> Clone for FnRoute<F, D> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _dependency: PhantomData,
        }
    }
}

// ============================================================================
// AnyRoute
// ============================================================================

/// A route bundled with its dependency, with both types erased.
///
/// This is what the router stores when it needs to render a destination
/// again later, e.g. as the root of a child router.
pub struct AnyRoute<T: 'static> {
    render: Rc<dyn Fn() -> Content<T>>,
    dependency: Rc<dyn Any>,
    name: &'static str,
}

impl<T: 'static> AnyRoute<T> {
    /// Erase `route` together with the `dependency` it renders from.
    pub fn new<R>(route: R, dependency: R::Dependency) -> Self
    where
        R: Route<T>,
    {
        Self::from_rc(Rc::new(route), Rc::new(dependency))
    }

    pub(crate) fn from_rc<R>(route: Rc<R>, dependency: Rc<R::Dependency>) -> Self
    where
        R: Route<T>,
    {
        let name = route.name();
        let erased: Rc<dyn Any> = Rc::clone(&dependency) as Rc<dyn Any>;
        Self {
            render: Rc::new(move || route.render(&dependency)),
            dependency: erased,
            name,
        }
    }

    /// Render the destination.
    pub fn render(&self) -> Content<T> {
        (self.render)()
    }

    /// Name of the erased route.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn dependency(&self) -> Rc<dyn Any> {
        Rc::clone(&self.dependency)
    }
}

impl<T: 'static> Clone for AnyRoute<T> {
    fn clone(&self) -> Self {
        Self {
            render: Rc::clone(&self.render),
            dependency: Rc::clone(&self.dependency),
            name: self.name,
        }
    }
}

impl<T: 'static> fmt::Debug for AnyRoute<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyRoute")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
