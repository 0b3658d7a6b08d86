//! Error handling for the router.
//!
//! - [`NavigationError`] is returned by the presenting operations
//!   ([`Router::navigate`](crate::Router::navigate) and friends) when a
//!   presentation cannot be registered.
//! - [`DismissResult`] is the outcome of every dismissal. Dismissal never
//!   fails: an unknown target is reported and leaves the hierarchy alone.
//!
//! # Examples
//!
//! ```
//! use route_stack::{DismissResult, IdGenerator};
//!
//! let id = IdGenerator::new().next();
//! let result = DismissResult::Delegated { target: id };
//! assert!(result.is_delegated());
//! assert!(!result.is_not_found());
//! ```

use crate::RouteViewId;
use std::fmt;

// ============================================================================
// Navigation Errors
// ============================================================================

/// Errors returned by presenting operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The identifier, or the display frame, is already claimed by a host.
    DuplicateHost {
        id: RouteViewId,
        /// Identifier of the host already holding the slot.
        existing: RouteViewId,
    },

    /// No router in the hierarchy knows the identifier.
    RouteNotFound { id: RouteViewId },

    /// The router a link or scope refers to has been dropped.
    RouterUnavailable,
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::DuplicateHost { id, existing } if id == existing => {
                write!(f, "Route host {} is already registered", id)
            }
            NavigationError::DuplicateHost { id, existing } => {
                write!(
                    f,
                    "Route host {} shares its display frame with registered host {}",
                    id, existing
                )
            }
            NavigationError::RouteNotFound { id } => {
                write!(f, "Route not found: {}", id)
            }
            NavigationError::RouterUnavailable => {
                write!(f, "Router is no longer available")
            }
        }
    }
}

impl std::error::Error for NavigationError {}

// ============================================================================
// Dismissal Results
// ============================================================================

/// Outcome of a dismissal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissResult {
    /// Handled by this router. `top` is the new top of its stack.
    Dismissed { top: Option<RouteViewId> },
    /// Handed off to the parent router.
    Delegated { target: RouteViewId },
    /// No router in the hierarchy knows the identifier; nothing changed.
    NotFound { id: RouteViewId },
}

impl DismissResult {
    /// Check if the dismissal was handled locally
    pub fn is_dismissed(&self) -> bool {
        matches!(self, DismissResult::Dismissed { .. })
    }

    /// Check if the dismissal was handed to the parent
    pub fn is_delegated(&self) -> bool {
        matches!(self, DismissResult::Delegated { .. })
    }

    /// Check if the target was unknown
    pub fn is_not_found(&self) -> bool {
        matches!(self, DismissResult::NotFound { .. })
    }

    /// New top of the stack, if the dismissal was handled locally
    pub fn top(&self) -> Option<RouteViewId> {
        match self {
            DismissResult::Dismissed { top } => *top,
            _ => None,
        }
    }

    /// The diagnostic error for an unknown target.
    pub fn as_error(&self) -> Option<NavigationError> {
        match self {
            DismissResult::NotFound { id } => Some(NavigationError::RouteNotFound { id: *id }),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
