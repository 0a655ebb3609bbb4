//! Selection state

use crate::scene::NodeId;

/// Holds at most one selected node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    selected: Option<NodeId>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected nodes, zero or one of them.
    pub fn selected(&self) -> &[NodeId] {
        self.selected.as_slice()
    }

    pub fn current(&self) -> Option<NodeId> {
        self.selected
    }

    /// Replace the whole selection, returning what it held before.
    pub fn replace(&mut self, node: Option<NodeId>) -> Option<NodeId> {
        std::mem::replace(&mut self.selected, node)
    }

    pub fn clear(&mut self) -> Option<NodeId> {
        self.replace(None)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }
}

/// Selection before and after a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChanged {
    pub previous: Option<NodeId>,
    pub current: Option<NodeId>,
}

impl SelectionChanged {
    /// Whether the click altered the selection.
    pub fn is_change(&self) -> bool {
        self.previous != self.current
    }
}
