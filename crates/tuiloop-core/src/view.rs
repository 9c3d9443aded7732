#![forbid(unsafe_code)]

//! Contracts for the view-tree collaborators the run loop drives.
//!
//! The core never owns view-tree elements. It holds shared handles to nodes
//! that are waiting for an update, and a weak handle to the focused element.
//! Everything else (tree construction, diffing, layout, painting) lives behind
//! these traits.
//!
//! All handles are `Rc`-based: view-tree work happens exclusively on the main
//! sequencing point, so nothing here is `Send`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ahash::AHashMap;

use crate::error::ViewError;
use crate::event::Direction;
use crate::geometry::{Point, Size};

/// Shared handle to a view-tree node.
pub type NodeRef = Rc<RefCell<dyn ViewNode>>;

/// Shared handle to a focusable element.
pub type FocusRef = Rc<RefCell<dyn Focusable>>;

/// Non-owning handle to a focusable element.
pub type WeakFocus = Weak<RefCell<dyn Focusable>>;

/// Sink for "this node is dirty" notifications.
///
/// Implemented by the runtime's update scheduler and handed to every
/// collaborator callback, so elements can request a re-render without
/// reaching for global state.
pub trait Invalidate {
    fn invalidate(&mut self, node: &NodeRef);
}

/// A node of the external view tree.
pub trait ViewNode {
    /// Re-evaluate the node's declarative description and apply it in place.
    ///
    /// Failures are the node's concern; the scheduler logs and moves on.
    fn update(&mut self, cx: &mut dyn Invalidate) -> Result<(), ViewError>;
}

/// An element that can hold focus and receive forwarded input.
pub trait Focusable {
    /// Deliver one input character.
    fn handle_event(&mut self, c: char, cx: &mut dyn Invalidate);

    /// Focus is about to move away from this element.
    fn resign_focus(&mut self, cx: &mut dyn Invalidate);

    /// This element just became the focused element.
    fn become_focus(&mut self, cx: &mut dyn Invalidate);

    /// Resolve the neighbouring focusable element in `direction`, measured
    /// from `origin` inside this element.
    fn neighbor(&self, direction: Direction, origin: Point) -> Option<FocusRef>;

    /// Offset inside the element that directional queries start from.
    fn focus_origin(&self) -> Point {
        Point::ORIGIN
    }
}

/// The window's root drawable layer.
pub trait Surface {
    /// Lay the tree out for a window of `size`.
    fn layout(&mut self, size: Size);

    /// First render pass.
    fn draw(&mut self) -> Result<(), ViewError>;

    /// Every render pass after the first.
    fn update(&mut self) -> Result<(), ViewError>;

    /// Drop anything computed for the previous window size.
    fn invalidate_size_cache(&mut self);

    /// The first selectable element of the freshly built tree.
    fn first_focusable(&self) -> Option<FocusRef>;
}

/// Identity of a node handle (address of the shared allocation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeKey(usize);

impl NodeKey {
    fn of(node: &NodeRef) -> Self {
        Self(Rc::as_ptr(node) as *const () as usize)
    }
}

/// Deduplicated set of dirty nodes accumulated between update cycles.
///
/// Identity is by handle, not by value: two clones of the same `Rc` are the
/// same node. Iteration order is unspecified.
#[derive(Default)]
pub struct InvalidationSet {
    nodes: AHashMap<NodeKey, NodeRef>,
}

impl InvalidationSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Returns `false` if it was already pending.
    pub fn insert(&mut self, node: &NodeRef) -> bool {
        let key = NodeKey::of(node);
        if self.nodes.contains_key(&key) {
            return false;
        }
        self.nodes.insert(key, Rc::clone(node));
        true
    }

    #[must_use]
    pub fn contains(&self, node: &NodeRef) -> bool {
        self.nodes.contains_key(&NodeKey::of(node))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Snapshot and clear. The set is empty afterwards.
    pub fn drain(&mut self) -> Vec<NodeRef> {
        self.nodes.drain().map(|(_, node)| node).collect()
    }
}

impl std::fmt::Debug for InvalidationSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvalidationSet")
            .field("len", &self.nodes.len())
            .finish()
    }
}
