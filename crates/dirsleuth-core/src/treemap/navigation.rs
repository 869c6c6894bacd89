/// Which directory the treemap is currently showing, with back/forward
/// history and breadcrumbs.
///
/// Every method returns `true` when the current node changed, which is the
/// consumer's cue to request a fresh layout.
use crate::model::{FileTree, NodeIndex};

/// Maximum entries kept in each of the back and forward stacks.
/// The oldest entry is evicted when a stack is full.
pub const MAX_NAV_HISTORY: usize = 50;

#[derive(Debug, Clone)]
pub struct Navigator {
    root: NodeIndex,
    current: NodeIndex,
    back: Vec<NodeIndex>,
    forward: Vec<NodeIndex>,
}

impl Navigator {
    /// Start at the tree's root. `None` for an empty tree.
    pub fn new(tree: &FileTree) -> Option<Self> {
        let root = tree.root?;
        Some(Self {
            root,
            current: root,
            back: Vec::new(),
            forward: Vec::new(),
        })
    }

    pub fn current(&self) -> NodeIndex {
        self.current
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    /// Show `node`. Only directories can be drilled into.
    pub fn drill_down(&mut self, tree: &FileTree, node: NodeIndex) -> bool {
        if node == self.current || !tree.node(node).is_dir {
            return false;
        }
        push_bounded(&mut self.back, self.current);
        self.forward.clear();
        self.current = node;
        true
    }

    /// Show the current node's parent. No-op at the scan root.
    pub fn go_up(&mut self, tree: &FileTree) -> bool {
        if self.current == self.root {
            return false;
        }
        match tree.node(self.current).parent {
            Some(parent) => {
                push_bounded(&mut self.back, self.current);
                self.forward.clear();
                self.current = parent;
                true
            }
            None => false,
        }
    }

    pub fn go_back(&mut self) -> bool {
        match self.back.pop() {
            Some(prev) => {
                push_bounded(&mut self.forward, self.current);
                self.current = prev;
                true
            }
            None => false,
        }
    }

    pub fn go_forward(&mut self) -> bool {
        match self.forward.pop() {
            Some(next) => {
                push_bounded(&mut self.back, self.current);
                self.current = next;
                true
            }
            None => false,
        }
    }

    /// Jump back to the scan root and forget all history.
    pub fn reset(&mut self) -> bool {
        let changed = self.current != self.root;
        self.current = self.root;
        self.back.clear();
        self.forward.clear();
        changed
    }

    /// Path from the scan root down to the current node, inclusive.
    pub fn breadcrumbs(&self, tree: &FileTree) -> Vec<NodeIndex> {
        let mut trail = vec![self.current];
        let mut cursor = self.current;
        while cursor != self.root {
            match tree.node(cursor).parent {
                Some(parent) => {
                    trail.push(parent);
                    cursor = parent;
                }
                None => break,
            }
        }
        trail.reverse();
        trail
    }
}

fn push_bounded(stack: &mut Vec<NodeIndex>, node: NodeIndex) {
    if stack.len() >= MAX_NAV_HISTORY {
        stack.remove(0);
    }
    stack.push(node);
}
