//! Display surfaces.
//!
//! The router never touches UI primitives directly. It drives a
//! [`DisplaySurface`]: an ordered set of frames (pushed views), each of
//! which may carry one attached overlay (a sheet, popover or modal).
//!
//! # Liveness
//!
//! Frames are addressed by [`FrameHandle`]s made of a slot and an epoch.
//! Each slot's epoch advances whenever its frame is torn down, so a handle
//! stays valid only while the frame it was issued for is on screen. Hosts
//! whose handle is no longer live are garbage-collected by the router; this
//! is how dismissals performed by the platform (a back swipe, a sheet
//! dragged away) reach the router without a dismissal call.
//!
//! [`StackSurface`] is an in-memory implementation used for headless
//! embedding and tests.

use crate::{trace_log, Content};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Handle to one frame of a display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle {
    /// Position of the frame, bottom first.
    pub slot: usize,
    /// Generation of the slot when the frame was shown.
    pub epoch: u64,
}

impl FrameHandle {
    /// Create a handle.
    pub fn new(slot: usize, epoch: u64) -> Self {
        Self { slot, epoch }
    }
}

impl fmt::Display for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame {}@{}", self.slot, self.epoch)
    }
}

/// Display primitives the router drives.
///
/// Implementations must not call back into the router that owns them.
pub trait DisplaySurface<T: 'static> {
    /// Show `content` on a new frame above all others and return its handle.
    fn show_as_new_frame(&mut self, content: Content<T>) -> FrameHandle;

    /// Replace the content of the topmost frame.
    fn replace_active_frame(&mut self, content: Content<T>);

    /// Replace the content of a specific frame.
    fn update_frame(&mut self, frame: FrameHandle, content: Content<T>);

    /// Tear down `frame` and every frame above it.
    fn remove_frame(&mut self, frame: FrameHandle);

    /// Attach `content` as the overlay of `anchor`, replacing any previous one.
    fn attach_overlay(&mut self, anchor: FrameHandle, content: Content<T>);

    /// Remove the overlay of `anchor`, if any.
    fn detach_overlay(&mut self, anchor: FrameHandle);

    /// Handle of the topmost frame.
    fn current_top_frame(&self) -> Option<FrameHandle>;

    /// Check if `frame` still refers to a frame on screen.
    fn is_frame_live(&self, frame: FrameHandle) -> bool;

    /// Tear down every frame.
    fn clear(&mut self);

    /// Create the surface a child router draws into.
    fn spawn_child(&mut self) -> Box<dyn DisplaySurface<T>>;
}

// ============================================================================
// StackSurface
// ============================================================================

/// In-memory display surface.
///
/// Clones share the same frames, so a test can keep a handle to the surface
/// it gave to a router and inspect what the router displayed.
///
/// # Example
///
/// ```
/// use route_stack::{Content, DisplaySurface, StackSurface};
///
/// let mut surface = StackSurface::new();
/// let root = surface.show_as_new_frame(Content::view("root"));
/// let detail = surface.show_as_new_frame(Content::view("detail"));
///
/// assert_eq!(surface.frame_count(), 2);
/// assert_eq!(surface.current_top_frame(), Some(detail));
///
/// surface.tear_down_top();
/// assert!(!surface.is_frame_live(detail));
/// assert!(surface.is_frame_live(root));
/// ```
pub struct StackSurface<T: 'static> {
    state: Rc<RefCell<StackState<T>>>,
}

struct StackState<T: 'static> {
    frames: Vec<Frame<T>>,
    /// Current epoch per slot.
    epochs: Vec<u64>,
    children: Vec<StackSurface<T>>,
}

struct Frame<T: 'static> {
    handle: FrameHandle,
    content: Content<T>,
    overlay: Option<Content<T>>,
}

impl<T: 'static> StackSurface<T> {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(StackState {
                frames: Vec::new(),
                epochs: Vec::new(),
                children: Vec::new(),
            })),
        }
    }

    /// Number of frames on screen.
    pub fn frame_count(&self) -> usize {
        self.state.borrow().frames.len()
    }

    /// Handles of all frames, bottom first.
    pub fn frames(&self) -> Vec<FrameHandle> {
        self.state.borrow().frames.iter().map(|f| f.handle).collect()
    }

    /// Simulate the platform tearing down the topmost frame, e.g. a back
    /// gesture. The router learns about it through garbage collection.
    pub fn tear_down_top(&self) -> Option<FrameHandle> {
        let mut state = self.state.borrow_mut();
        let frame = state.frames.pop()?;
        state.bump(frame.handle.slot);
        Some(frame.handle)
    }

    /// Surfaces spawned for child routers, in creation order.
    pub fn children(&self) -> Vec<StackSurface<T>> {
        self.state.borrow().children.clone()
    }

    fn index_of(state: &StackState<T>, frame: FrameHandle) -> Option<usize> {
        state
            .frames
            .get(frame.slot)
            .filter(|f| f.handle == frame)
            .map(|_| frame.slot)
    }
}

impl<T: Clone + 'static> StackSurface<T> {
    /// Content of the topmost frame, without its overlay.
    pub fn top_content(&self) -> Option<Content<T>> {
        self.state.borrow().frames.last().map(|f| f.content.clone())
    }

    /// Content of `frame`, without its overlay.
    pub fn content_of(&self, frame: FrameHandle) -> Option<Content<T>> {
        let state = self.state.borrow();
        Self::index_of(&state, frame).map(|i| state.frames[i].content.clone())
    }

    /// Overlay attached to `frame`.
    pub fn overlay_of(&self, frame: FrameHandle) -> Option<Content<T>> {
        let state = self.state.borrow();
        Self::index_of(&state, frame).and_then(|i| state.frames[i].overlay.clone())
    }

    /// Visible leaves of the topmost frame, overlay included.
    pub fn visible_top(&self) -> Vec<T> {
        let state = self.state.borrow();
        let Some(frame) = state.frames.last() else {
            return Vec::new();
        };
        let mut out: Vec<T> = frame.content.visible().into_iter().cloned().collect();
        if let Some(overlay) = &frame.overlay {
            out.extend(overlay.visible().into_iter().cloned());
        }
        out
    }
}

impl<T: 'static> StackState<T> {
    fn bump(&mut self, slot: usize) {
        if let Some(epoch) = self.epochs.get_mut(slot) {
            *epoch += 1;
        }
    }
}

impl<T: 'static> DisplaySurface<T> for StackSurface<T> {
    fn show_as_new_frame(&mut self, content: Content<T>) -> FrameHandle {
        let mut state = self.state.borrow_mut();
        let slot = state.frames.len();
        if state.epochs.len() <= slot {
            state.epochs.resize(slot + 1, 0);
        }
        state.epochs[slot] += 1;
        let handle = FrameHandle::new(slot, state.epochs[slot]);
        trace_log!("StackSurface: show {}", handle);
        state.frames.push(Frame {
            handle,
            content,
            overlay: None,
        });
        handle
    }

    fn replace_active_frame(&mut self, content: Content<T>) {
        if let Some(frame) = self.state.borrow_mut().frames.last_mut() {
            trace_log!("StackSurface: replace active {}", frame.handle);
            frame.content = content;
        }
    }

    fn update_frame(&mut self, frame: FrameHandle, content: Content<T>) {
        let mut state = self.state.borrow_mut();
        if let Some(i) = Self::index_of(&state, frame) {
            trace_log!("StackSurface: update {}", frame);
            state.frames[i].content = content;
        }
    }

    fn remove_frame(&mut self, frame: FrameHandle) {
        let mut state = self.state.borrow_mut();
        if let Some(i) = Self::index_of(&state, frame) {
            trace_log!("StackSurface: remove {} and {} above", frame, state.frames.len() - i - 1);
            while state.frames.len() > i {
                if let Some(removed) = state.frames.pop() {
                    state.bump(removed.handle.slot);
                }
            }
        }
    }

    fn attach_overlay(&mut self, anchor: FrameHandle, content: Content<T>) {
        let mut state = self.state.borrow_mut();
        if let Some(i) = Self::index_of(&state, anchor) {
            trace_log!("StackSurface: attach overlay to {}", anchor);
            state.frames[i].overlay = Some(content);
        }
    }

    fn detach_overlay(&mut self, anchor: FrameHandle) {
        let mut state = self.state.borrow_mut();
        if let Some(i) = Self::index_of(&state, anchor) {
            trace_log!("StackSurface: detach overlay from {}", anchor);
            state.frames[i].overlay = None;
        }
    }

    fn current_top_frame(&self) -> Option<FrameHandle> {
        self.state.borrow().frames.last().map(|f| f.handle)
    }

    fn is_frame_live(&self, frame: FrameHandle) -> bool {
        Self::index_of(&self.state.borrow(), frame).is_some()
    }

    fn clear(&mut self) {
        let mut state = self.state.borrow_mut();
        while let Some(removed) = state.frames.pop() {
            state.bump(removed.handle.slot);
        }
    }

    fn spawn_child(&mut self) -> Box<dyn DisplaySurface<T>> {
        let child = StackSurface::new();
        self.state.borrow_mut().children.push(child.clone());
        Box::new(child)
    }
}

impl<T: 'static> Clone for StackSurface<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: 'static> Default for StackSurface<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for StackSurface<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("StackSurface")
            .field(
                "frames",
                &state.frames.iter().map(|frame| frame.handle).collect::<Vec<_>>(),
            )
            .field("children", &state.children.len())
            .finish()
    }
}
