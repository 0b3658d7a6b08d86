//! # route-stack
//!
//! A presentation stack engine for tree-structured UI:
//!
//! - **Presenter modes** - push a destination, let it replace its parent's
//!   content in place, or float it above its parent as a sibling overlay
//! - **Stable identifiers** - every presentation is addressed by a
//!   [`RouteViewId`] for as long as it is on screen
//! - **Dismissal** - unwind the stack up to, or up to and including, any
//!   presented identifier
//! - **Child routers** - overlays can host their own router; dismissals
//!   that leave a child router are handed to its parent
//! - **Surface agnostic** - the engine drives a [`DisplaySurface`] and never
//!   draws anything itself
//!
//! # Quick Start
//!
//! ```
//! use route_stack::*;
//!
//! let surface = StackSurface::new();
//! let router = Router::new(surface.clone());
//!
//! let inbox = router.replace_root_with(view_fn(|| Content::view("inbox"))).unwrap();
//! let message = router.push(view_fn(|| Content::view("message"))).unwrap();
//!
//! // A sheet over the message, hosting its own router.
//! let sheet = router
//!     .navigate(
//!         route_fn(|_recipient: &String| Content::view("compose")),
//!         "ada".to_string(),
//!         &SiblingPresenter::default(),
//!         Some(message),
//!     )
//!     .unwrap();
//! assert!(router.is_presenting(sheet));
//!
//! router.dismiss_up_to(inbox);
//! assert_eq!(router.stack_ids(), vec![inbox]);
//! assert_eq!(surface.visible_top(), vec!["inbox"]);
//! ```
//!
//! # Presenters
//!
//! ```
//! use route_stack::*;
//!
//! let surface = StackSurface::new();
//! let router = Router::new(surface.clone());
//! let root = router.replace_root_with(view_fn(|| Content::view("list"))).unwrap();
//!
//! let alert = router
//!     .navigate(view_fn(|| Content::view("alert")), (), &ReplaceParentPresenter, Some(root))
//!     .unwrap();
//! assert_eq!(surface.visible_top(), vec!["list", "alert"]);
//!
//! // Flipping the presented flag closes the alert.
//! router.presented_flag(alert).unwrap().dismiss();
//! assert!(!router.is_presenting(alert));
//! assert_eq!(surface.visible_top(), vec!["list"]);
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)

#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Core modules
pub mod content;
pub mod id;
pub mod presenter;
pub mod registry;
pub mod route;
pub mod router;
pub mod surface;

// Dismissal and parent handoff
pub mod dismiss;

// Error handling
pub mod error;

// Other modules
pub mod link;

// Re-export main types for convenient access
pub use content::{Content, RouteScope};
pub use dismiss::DismissKind;
pub use error::{DismissResult, NavigationError};
pub use id::{IdGenerator, RouteViewId};
pub use link::RouterLink;
pub use presenter::{
    presenter_fn, ChildRouterFactory, DestinationPresenter, Dismissed, FnPresenter,
    PresentationContext, PresentationMode, PresentedFlag, Presenter, PushPresenter,
    ReplaceParentPresenter, SiblingPresenter,
};
pub use registry::{HostKey, HostKind, HostRegistry, RouteHost};
pub use route::{route_fn, view_fn, AnyRoute, FnRoute, Route};
pub use router::{Handoff, Router, RouterBuilder, RouterConfig, WeakRouter};
pub use surface::{DisplaySurface, FrameHandle, StackSurface};
