//! Route view identifiers.
//!
//! Every presented destination is addressed by a [`RouteViewId`]. Identifiers
//! are minted by an [`IdGenerator`], which is owned by the root router and
//! shared with every child router created beneath it, so identifiers are
//! unique across a whole router tree and can be passed between routers
//! during dismissal delegation.
//!
//! # Examples
//!
//! ```
//! use route_stack::{IdGenerator, RouteViewId};
//!
//! let ids = IdGenerator::new();
//! let first = ids.next();
//! let second = ids.next();
//!
//! assert!(first < second);
//! assert_ne!(first, RouteViewId::NONE);
//! assert!(RouteViewId::NONE.is_none());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identifier of a presented destination.
///
/// Identifiers are totally ordered by creation time. [`RouteViewId::NONE`]
/// is the reserved "no identifier" value and never compares equal to a
/// generated identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteViewId(u64);

impl RouteViewId {
    /// The sentinel identifier.
    pub const NONE: RouteViewId = RouteViewId(0);

    /// Check if this is the sentinel identifier
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Check if this is a generated identifier
    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Turn the sentinel into `None`.
    pub fn into_option(self) -> Option<RouteViewId> {
        if self.is_none() {
            None
        } else {
            Some(self)
        }
    }
}

impl Default for RouteViewId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for RouteViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "#none")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Issues strictly increasing [`RouteViewId`]s.
///
/// The counter starts after the sentinel, so `next()` never returns
/// [`RouteViewId::NONE`]. Routers take the generator by `Rc` instead of
/// reaching for process-global state.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Create a generator whose first identifier follows the sentinel.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Mint the next identifier.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> RouteViewId {
        RouteViewId(self.next.fetch_add(1, Ordering::SeqCst))
    }

    /// Peek at the identifier the next call to [`next`](Self::next) returns.
    pub fn peek(&self) -> RouteViewId {
        RouteViewId(self.next.load(Ordering::SeqCst))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
