//! Hit-test routing of mouse events over a console tree.
//!
//! Consoles form a tree; routing flattens the visible, mouse-enabled nodes
//! depth-first pre-order and walks the list in reverse so the visually
//! topmost console (painted last) gets first refusal. A single "lock"
//! reference on the tracker records who owns mouse delivery; every
//! transition away from a holder fires its `lost_mouse` hook exactly once.

use glyphdeck_core::Rect;

use crate::input::mouse::{MouseState, MouseTracker};

/// Arena index of a console in a `ConsoleTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConsoleId(usize);

/// Immutable per-delivery snapshot handed to `process_mouse`/`lost_mouse`.
#[derive(Debug, Clone)]
pub struct MouseConsoleState {
    pub console: ConsoleId,
    pub mouse: MouseState,
    /// Whether the cursor is inside the console's bounds.
    pub is_over: bool,
}

/// A console participating in mouse routing.
pub trait MouseTarget {
    fn is_visible(&self) -> bool;
    fn wants_mouse(&self) -> bool;
    /// Request to monopolize delivery while focused.
    fn exclusive_mouse(&self) -> bool;
    /// Absolute screen bounds, in pixels.
    fn bounds(&self) -> Rect;
    /// Handle the event; return true when consumed.
    fn process_mouse(&mut self, state: &MouseConsoleState) -> bool;
    /// The console stopped being the delivery target.
    fn lost_mouse(&mut self, state: &MouseConsoleState);
}

struct Node {
    target: Box<dyn MouseTarget>,
    children: Vec<ConsoleId>,
}

/// Slab-style console tree. Removal leaves holes so `ConsoleId`s stay
/// stable; a stale id held by a tracker simply stops resolving.
#[derive(Default)]
pub struct ConsoleTree {
    nodes: Vec<Option<Node>>,
    roots: Vec<ConsoleId>,
}

impl ConsoleTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, target: Box<dyn MouseTarget>) -> ConsoleId {
        let id = ConsoleId(self.nodes.len());
        self.nodes.push(Some(Node {
            target,
            children: Vec::new(),
        }));
        id
    }

    pub fn insert_root(&mut self, target: Box<dyn MouseTarget>) -> ConsoleId {
        let id = self.alloc(target);
        self.roots.push(id);
        id
    }

    /// Append a child; children keep append order, which is also their
    /// paint order (later = on top).
    pub fn insert_child(&mut self, parent: ConsoleId, target: Box<dyn MouseTarget>) -> ConsoleId {
        let id = self.alloc(target);
        if let Some(Some(node)) = self.nodes.get_mut(parent.0) {
            node.children.push(id);
        } else {
            tracing::warn!(parent = parent.0, "insert_child under unknown parent, added as root");
            self.roots.push(id);
        }
        id
    }

    /// Remove a console and its whole subtree.
    pub fn remove(&mut self, id: ConsoleId) {
        let children = match self.nodes.get_mut(id.0).and_then(Option::take) {
            Some(node) => node.children,
            None => return,
        };
        self.roots.retain(|r| *r != id);
        for node in self.nodes.iter_mut().flatten() {
            node.children.retain(|c| *c != id);
        }
        for child in children {
            self.remove(child);
        }
    }

    pub fn contains(&self, id: ConsoleId) -> bool {
        matches!(self.nodes.get(id.0), Some(Some(_)))
    }

    pub fn get(&self, id: ConsoleId) -> Option<&dyn MouseTarget> {
        self.nodes.get(id.0)?.as_ref().map(|n| &*n.target)
    }

    pub fn get_mut(&mut self, id: ConsoleId) -> Option<&mut (dyn MouseTarget + 'static)> {
        self.nodes
            .get_mut(id.0)?
            .as_mut()
            .map(|n| n.target.as_mut())
    }

    /// Depth-first pre-order flatten of interactive consoles.
    ///
    /// An invisible console hides its subtree (visibility is hierarchical);
    /// a mouse-disabled console is skipped itself but its children still
    /// participate.
    pub fn flatten_interactive(&self) -> Vec<ConsoleId> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.flatten_into(*root, &mut out);
        }
        out
    }

    fn flatten_into(&self, id: ConsoleId, out: &mut Vec<ConsoleId>) {
        let Some(Some(node)) = self.nodes.get(id.0) else {
            return;
        };
        if !node.target.is_visible() {
            return;
        }
        if node.target.wants_mouse() {
            out.push(id);
        }
        for child in &node.children {
            self.flatten_into(*child, out);
        }
    }
}

// ════════════════════════════════════════════════════════════════════
// Routing
// ════════════════════════════════════════════════════════════════════

impl MouseTracker {
    fn snapshot_for(&self, tree: &ConsoleTree, id: ConsoleId) -> MouseConsoleState {
        let is_over = tree
            .get(id)
            .map(|t| t.bounds().contains(self.state().position))
            .unwrap_or(false);
        MouseConsoleState {
            console: id,
            mouse: *self.state(),
            is_over,
        }
    }

    /// Route this frame's mouse state. Invoked once per frame after
    /// `update`, with the currently focused console (if any).
    ///
    /// Three mutually exclusive branches, in priority order: an existing
    /// exclusive lock holder, a focused console requesting exclusivity,
    /// then topmost-first hit-testing.
    pub fn process(&mut self, tree: &mut ConsoleTree, focused: Option<ConsoleId>) {
        // A removed console drops the lock silently; there is nobody left
        // to notify.
        if let Some(lock) = self.lock {
            if !tree.contains(lock) {
                tracing::debug!(lock = ?lock, "lock holder removed from tree, lock dropped");
                self.lock = None;
            }
        }

        // (a) A locked exclusive console owns delivery outright.
        if let Some(lock) = self.lock {
            if tree.get(lock).is_some_and(|t| t.exclusive_mouse()) {
                let state = self.snapshot_for(tree, lock);
                if let Some(target) = tree.get_mut(lock) {
                    target.process_mouse(&state);
                }
                return;
            }
        }

        // (b) A focused console asking for exclusivity takes the lock.
        if let Some(focus) = focused {
            let wants_exclusive = tree.get(focus).is_some_and(|t| t.exclusive_mouse());
            if wants_exclusive {
                if let Some(prev) = self.lock {
                    if prev != focus {
                        let state = self.snapshot_for(tree, prev);
                        if let Some(target) = tree.get_mut(prev) {
                            target.lost_mouse(&state);
                        }
                    }
                }
                tracing::debug!(console = ?focus, "exclusive mouse lock taken");
                self.lock = Some(focus);
                let state = self.snapshot_for(tree, focus);
                if let Some(target) = tree.get_mut(focus) {
                    target.process_mouse(&state);
                }
                return;
            }
        }

        // (c) Hit-test, topmost first (reverse pre-order).
        let flattened = tree.flatten_interactive();
        for id in flattened.into_iter().rev() {
            let state = self.snapshot_for(tree, id);
            let accepted = tree
                .get_mut(id)
                .map(|t| t.process_mouse(&state))
                .unwrap_or(false);
            if !accepted {
                continue;
            }
            if let Some(prev) = self.lock {
                if prev != id {
                    let lost = self.snapshot_for(tree, prev);
                    if let Some(target) = tree.get_mut(prev) {
                        target.lost_mouse(&lost);
                    }
                }
            }
            self.lock = Some(id);
            tracing::trace!(console = ?id, "mouse delivered");
            return;
        }

        // Nobody accepted: the previous holder transitions to no-target.
        // Clearing here keeps the lost-mouse notification single-shot.
        if let Some(prev) = self.lock.take() {
            let lost = self.snapshot_for(tree, prev);
            if let Some(target) = tree.get_mut(prev) {
                target.lost_mouse(&lost);
            }
            tracing::trace!(console = ?prev, "mouse left all consoles");
        }
    }

    /// Explicitly clear the lock, notifying the holder of the loss.
    pub fn clear_lock(&mut self, tree: &mut ConsoleTree) {
        if let Some(prev) = self.lock.take() {
            let lost = self.snapshot_for(tree, prev);
            if let Some(target) = tree.get_mut(prev) {
                target.lost_mouse(&lost);
            }
        }
    }
}
