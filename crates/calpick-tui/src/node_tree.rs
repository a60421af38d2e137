/// Host-side tree of widget nodes.
///
/// Widgets mount nodes here to describe themselves to assistive tooling
/// (role and label) and to take part in keyboard focus. It plays the part a
/// DOM plays for a browser widget: the calendar owns the nodes it creates,
/// other widgets may only read them or patch their labels.
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Group,
    Dialog,
    Application,
    Button,
    Heading,
    Grid,
    GridCell,
    FocusRegion,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
    pub role: Role,
    pub label: Option<String>,
    pub focusable: bool,
}

/// Description of a node to be created
#[derive(Debug, Clone)]
pub struct NodeSpec {
    kind: NodeKind,
    role: Role,
    label: Option<String>,
    focusable: bool,
}

impl NodeSpec {
    pub fn element(role: Role) -> Self {
        Self {
            kind: NodeKind::Element,
            role,
            label: None,
            focusable: false,
        }
    }

    pub fn text() -> Self {
        Self {
            kind: NodeKind::Text,
            role: Role::Text,
            label: None,
            focusable: false,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }
}

#[derive(Debug, Default)]
struct TreeInner {
    nodes: HashMap<NodeId, Node>,
    next_id: u64,
    focused: Option<NodeId>,
}

/// Shared handle to the node tree
#[derive(Clone, Default)]
pub struct NodeTree {
    inner: Arc<RwLock<TreeInner>>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, TreeInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TreeInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a node. A parent that no longer exists leaves the node
    /// detached rather than failing.
    pub fn create(&self, parent: Option<NodeId>, spec: NodeSpec) -> NodeId {
        let mut inner = self.write();
        inner.next_id += 1;
        let id = NodeId(inner.next_id);
        let parent = parent.filter(|p| inner.nodes.contains_key(p));
        if let Some(p) = parent {
            if let Some(parent_node) = inner.nodes.get_mut(&p) {
                parent_node.children.push(id);
            }
        }
        inner.nodes.insert(
            id,
            Node {
                id,
                parent,
                children: Vec::new(),
                kind: spec.kind,
                role: spec.role,
                label: spec.label,
                focusable: spec.focusable,
            },
        );
        id
    }

    /// Remove a node and everything below it. Focus inside the removed
    /// subtree is lost.
    pub fn remove(&self, id: NodeId) {
        let mut inner = self.write();
        let Some(node) = inner.nodes.get(&id) else {
            return;
        };
        if let Some(parent) = node.parent {
            if let Some(parent_node) = inner.nodes.get_mut(&parent) {
                parent_node.children.retain(|c| *c != id);
            }
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(removed) = inner.nodes.remove(&current) {
                stack.extend(removed.children);
            }
            if inner.focused == Some(current) {
                inner.focused = None;
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<Node> {
        self.read().nodes.get(&id).cloned()
    }

    pub fn exists(&self, id: NodeId) -> bool {
        self.read().nodes.contains_key(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.read().nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.read()
            .nodes
            .get(&id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn label(&self, id: NodeId) -> Option<String> {
        self.read().nodes.get(&id).and_then(|n| n.label.clone())
    }

    /// Returns false when the node does not exist
    pub fn set_label(&self, id: NodeId, label: impl Into<String>) -> bool {
        match self.write().nodes.get_mut(&id) {
            Some(node) => {
                node.label = Some(label.into());
                true
            }
            None => false,
        }
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.read().focused
    }

    /// Move focus to `id`. Only existing, focusable nodes accept focus.
    pub fn focus(&self, id: NodeId) -> bool {
        let mut inner = self.write();
        match inner.nodes.get(&id) {
            Some(node) if node.focusable => {
                inner.focused = Some(id);
                true
            }
            _ => false,
        }
    }

    pub fn blur(&self) {
        self.write().focused = None;
    }

    /// Whether `node` is `ancestor` itself or sits somewhere below it
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let inner = self.read();
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = inner.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    /// Whether focus currently sits inside `root`
    pub fn has_focus_within(&self, root: NodeId) -> bool {
        match self.focused() {
            Some(focused) => self.contains(root, focused),
            None => false,
        }
    }

    /// First node below `root` (depth first, in creation order) matching
    /// `pred`. `root` itself is not considered.
    pub fn find_descendant(&self, root: NodeId, pred: impl Fn(&Node) -> bool) -> Option<NodeId> {
        let inner = self.read();
        let mut stack: Vec<NodeId> = inner
            .nodes
            .get(&root)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            let Some(node) = inner.nodes.get(&id) else {
                continue;
            };
            if pred(node) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    pub fn len(&self) -> usize {
        self.read().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_contains() {
        let tree = NodeTree::new();
        let root = tree.create(None, NodeSpec::element(Role::Dialog));
        let child = tree.create(Some(root), NodeSpec::element(Role::Button).focusable());
        let outside = tree.create(None, NodeSpec::element(Role::Group));
        assert!(tree.contains(root, child));
        assert!(tree.contains(root, root));
        assert!(!tree.contains(root, outside));
        assert_eq!(tree.parent(child), Some(root));
        assert_eq!(tree.children(root), vec![child]);
    }

    #[test]
    fn test_focus_requires_focusable_node() {
        let tree = NodeTree::new();
        let plain = tree.create(None, NodeSpec::element(Role::Group));
        let button = tree.create(None, NodeSpec::element(Role::Button).focusable());
        assert!(!tree.focus(plain));
        assert_eq!(tree.focused(), None);
        assert!(tree.focus(button));
        assert_eq!(tree.focused(), Some(button));
    }

    #[test]
    fn test_removing_subtree_drops_focus() {
        let tree = NodeTree::new();
        let root = tree.create(None, NodeSpec::element(Role::Grid));
        let cell = tree.create(Some(root), NodeSpec::element(Role::GridCell).focusable());
        let text = tree.create(Some(cell), NodeSpec::text());
        tree.focus(cell);
        tree.remove(root);
        assert_eq!(tree.focused(), None);
        assert!(!tree.exists(text));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_remove_detaches_from_parent() {
        let tree = NodeTree::new();
        let root = tree.create(None, NodeSpec::element(Role::Group));
        let a = tree.create(Some(root), NodeSpec::element(Role::Button));
        let b = tree.create(Some(root), NodeSpec::element(Role::Button));
        tree.remove(a);
        assert_eq!(tree.children(root), vec![b]);
    }

    #[test]
    fn test_find_descendant_depth_first() {
        let tree = NodeTree::new();
        let root = tree.create(None, NodeSpec::element(Role::Application));
        let header = tree.create(Some(root), NodeSpec::element(Role::Group));
        let deep = tree.create(Some(header), NodeSpec::element(Role::FocusRegion).focusable());
        let shallow = tree.create(Some(root), NodeSpec::element(Role::FocusRegion));
        let found = tree.find_descendant(root, |n| n.role == Role::FocusRegion);
        assert_eq!(found, Some(deep));
        assert_ne!(found, Some(shallow));
        assert_eq!(tree.find_descendant(root, |n| n.id == root), None);
    }

    #[test]
    fn test_labels() {
        let tree = NodeTree::new();
        let cell = tree.create(None, NodeSpec::element(Role::GridCell).label("Choose"));
        assert_eq!(tree.label(cell).as_deref(), Some("Choose"));
        assert!(tree.set_label(cell, "Friday"));
        assert_eq!(tree.label(cell).as_deref(), Some("Friday"));
        tree.remove(cell);
        assert!(!tree.set_label(cell, "gone"));
    }

    #[test]
    fn test_create_under_missing_parent_is_detached() {
        let tree = NodeTree::new();
        let root = tree.create(None, NodeSpec::element(Role::Group));
        tree.remove(root);
        let orphan = tree.create(Some(root), NodeSpec::element(Role::Button));
        assert_eq!(tree.parent(orphan), None);
    }
}
