//! The device tree arena and its traversal queries.
//!
//! # Ownership model
//!
//! Every [`DeviceNode`] lives in the tree's arena.  A node's `children` list is
//! the only ownership edge of the hierarchy; `parent` is a plain [`NodeId`]
//! used for upward lookups and never for iteration bounds.  Attachment is
//! checked at the moment it happens, so a cycle can never be built.
//!
//! Traversal iterators borrow the tree immutably, so the borrow checker
//! rejects any attempt to attach children while a traversal is running.

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::trace;

use super::flags::{DeviceCaps, DeviceState};
use super::mode::DisplayMode;
use super::node::{DeviceNode, NodeId, NodeKind};

/// Structural violations of the device tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The handle was not issued by this tree.
    #[error("node {0} does not belong to this tree")]
    UnknownNode(NodeId),

    /// A node was attached to itself.
    #[error("node {0} cannot be attached to itself")]
    SelfAttachment(NodeId),

    /// The synthetic root, or another root-kind node, was attached below
    /// another node.
    #[error("the root node cannot be attached as a child")]
    RootAttachment,

    /// A root-kind node other than the synthetic root is stored in the arena.
    #[error("node {0} is a second root")]
    ExtraRoot(NodeId),

    /// The node already has a parent.
    #[error("node {child} is already attached to {parent}")]
    AlreadyAttached { child: NodeId, parent: NodeId },

    /// The child is an ancestor of the requested parent.
    #[error("node {child} is an ancestor of {parent}; attaching it would create a cycle")]
    AncestorCycle { parent: NodeId, child: NodeId },

    /// A parent back-reference is not mirrored by the parent's child list.
    #[error("node {child} names {parent} as parent but is listed {count} times among its children")]
    ParentChildMismatch {
        parent: NodeId,
        child: NodeId,
        count: usize,
    },

    /// A child list entry whose back-reference points elsewhere.
    #[error("node {parent} lists {child} as a child but the child's parent is {actual:?}")]
    ChildParentMismatch {
        parent: NodeId,
        child: NodeId,
        actual: Option<NodeId>,
    },

    /// A non-root node was left without a parent after the build pass.
    #[error("node {0} was inserted but never attached")]
    Detached(NodeId),

    /// Walking up from a node reached the node again.
    #[error("node {0} is its own ancestor")]
    Cycle(NodeId),
}

/// Hierarchy of display devices rooted at a synthetic `ROOT` node.
///
/// Built once per enumeration pass and replaced as a whole on the next one.
#[derive(Debug)]
pub struct DeviceTree {
    nodes: Vec<DeviceNode>,
}

impl Default for DeviceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceTree {
    /// Device name carried by the synthetic root.
    pub const ROOT_NAME: &'static str = "ROOT";

    /// Creates a tree that contains only the synthetic root.
    pub fn new() -> Self {
        let mut root = DeviceNode::new(NodeKind::Root, Self::ROOT_NAME);
        root.id = NodeId::ROOT;
        Self { nodes: vec![root] }
    }

    /// Handle of the synthetic root.
    pub fn root_id(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn root(&self) -> &DeviceNode {
        &self.nodes[NodeId::ROOT.0]
    }

    /// Number of nodes stored, the root and detached nodes included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Moves `node` into the arena.  The node is detached until passed to
    /// [`DeviceTree::add_child`].
    pub fn insert(&mut self, mut node: DeviceNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.id = id;
        node.parent = None;
        node.children.clear();
        self.nodes.push(node);
        id
    }

    /// Appends `child` to `parent`'s children and points `child` back at
    /// `parent`.
    ///
    /// # Panics
    ///
    /// Panics on any attachment [`DeviceTree::try_add_child`] rejects: a node
    /// attached to itself or to one of its descendants, the root attached as a
    /// child, a node attached twice, or a foreign handle.  These are
    /// programming errors in the code building the tree.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        if let Err(err) = self.try_add_child(parent, child) {
            panic!("invalid device tree attachment: {err}");
        }
    }

    /// Checked form of [`DeviceTree::add_child`].
    ///
    /// # Errors
    ///
    /// Returns the [`TreeError`] describing why the attachment would break the
    /// tree.  The tree is left untouched on error.
    pub fn try_add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.get(parent).ok_or(TreeError::UnknownNode(parent))?;
        let child_node = self.get(child).ok_or(TreeError::UnknownNode(child))?;

        if child == parent {
            return Err(TreeError::SelfAttachment(child));
        }
        if child == NodeId::ROOT || child_node.kind() == NodeKind::Root {
            return Err(TreeError::RootAttachment);
        }
        if let Some(existing) = child_node.parent {
            return Err(TreeError::AlreadyAttached {
                child,
                parent: existing,
            });
        }
        if self.ancestors(parent).any(|ancestor| ancestor.id == child) {
            return Err(TreeError::AncestorCycle { parent, child });
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        trace!(%parent, %child, "attached device node");
        Ok(())
    }

    pub fn get(&self, id: NodeId) -> Option<&DeviceNode> {
        self.nodes.get(id.0)
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    pub fn node(&self, id: NodeId) -> &DeviceNode {
        &self.nodes[id.0]
    }

    /// Mutable access for appending modes.  Identity and links stay read-only.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    pub fn node_mut(&mut self, id: NodeId) -> &mut DeviceNode {
        &mut self.nodes[id.0]
    }

    /// Children of `id` in insertion order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Walks parent back-references from `id` (exclusive) up to the top.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.node(id).parent,
        }
    }

    /// Every node below `id`, depth-first, pre-order, children visited in
    /// insertion order.  `id` itself is not yielded.
    ///
    /// Each call starts a fresh traversal over the current tree state.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: self.node(id).children.iter().rev().copied().collect(),
        }
    }

    /// The descendants of `id` whose kind is `kind`, in [`DeviceTree::descendants`]
    /// order.
    pub fn all_descendants_of_kind(
        &self,
        id: NodeId,
        kind: NodeKind,
    ) -> impl Iterator<Item = &DeviceNode> + '_ {
        self.descendants(id).filter(move |node| node.kind() == kind)
    }

    /// The descendants of `id` accepted by `predicate`, in
    /// [`DeviceTree::descendants`] order.
    pub fn descendants_matching<'a, P>(
        &'a self,
        id: NodeId,
        mut predicate: P,
    ) -> impl Iterator<Item = &'a DeviceNode> + 'a
    where
        P: FnMut(&DeviceNode) -> bool + 'a,
    {
        self.descendants(id).filter(move |node| predicate(*node))
    }

    /// All monitors of the tree in traversal order.
    pub fn monitors(&self) -> impl Iterator<Item = &DeviceNode> + '_ {
        self.all_descendants_of_kind(NodeId::ROOT, NodeKind::Monitor)
    }

    /// First node, in traversal order, carrying `device_name`.
    pub fn find_by_name(&self, device_name: &str) -> Option<&DeviceNode> {
        std::iter::once(self.root())
            .chain(self.descendants(NodeId::ROOT))
            .find(|node| node.device_name() == device_name)
    }

    /// Verifies the structural invariants of the whole arena.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_integrity(&self) -> Result<(), TreeError> {
        for node in &self.nodes {
            if node.kind() == NodeKind::Root && node.id != NodeId::ROOT {
                return Err(TreeError::ExtraRoot(node.id));
            }
            match node.parent {
                None if node.id != NodeId::ROOT => return Err(TreeError::Detached(node.id)),
                None => {}
                Some(parent) => {
                    let siblings = &self.get(parent).ok_or(TreeError::UnknownNode(parent))?.children;
                    let count = siblings.iter().filter(|&&id| id == node.id).count();
                    if count != 1 {
                        return Err(TreeError::ParentChildMismatch {
                            parent,
                            child: node.id,
                            count,
                        });
                    }
                }
            }

            for &child in &node.children {
                let actual = self.get(child).ok_or(TreeError::UnknownNode(child))?.parent;
                if actual != Some(node.id) {
                    return Err(TreeError::ChildParentMismatch {
                        parent: node.id,
                        child,
                        actual,
                    });
                }
            }

            // Bounded walk: a chain longer than the arena must have looped.
            let mut steps = 0;
            for ancestor in self.ancestors(node.id) {
                steps += 1;
                if ancestor.id == node.id || steps > self.nodes.len() {
                    return Err(TreeError::Cycle(node.id));
                }
            }
        }
        Ok(())
    }

    /// Borrowed nested view of the hierarchy, used for serialization.
    pub fn snapshot(&self) -> NodeSnapshot<'_> {
        self.snapshot_of(NodeId::ROOT)
    }

    fn snapshot_of(&self, id: NodeId) -> NodeSnapshot<'_> {
        let node = self.node(id);
        NodeSnapshot {
            kind: node.kind(),
            device_name: node.device_name(),
            device_string: node.device_string(),
            device_id: node.device_id(),
            device_key: node.device_key(),
            capabilities: node.capabilities(),
            state: node.state(),
            current_mode: node.current_mode(),
            display_modes: node.display_modes().as_slice(),
            children: node
                .children
                .iter()
                .map(|&child| self.snapshot_of(child))
                .collect(),
        }
    }
}

impl Serialize for DeviceTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshot().serialize(serializer)
    }
}

/// Nested, borrowed view of a node and everything below it.
#[derive(Debug, Serialize)]
pub struct NodeSnapshot<'a> {
    pub kind: NodeKind,
    pub device_name: &'a str,
    pub device_string: &'a str,
    pub device_id: &'a str,
    pub device_key: &'a str,
    pub capabilities: DeviceCaps,
    pub state: DeviceState,
    pub current_mode: Option<&'a DisplayMode>,
    pub display_modes: &'a [DisplayMode],
    pub children: Vec<NodeSnapshot<'a>>,
}

/// Iterator returned by [`DeviceTree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a DeviceTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a DeviceNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.get(self.next?)?;
        self.next = node.parent;
        Some(node)
    }
}

/// Iterator returned by [`DeviceTree::descendants`].
///
/// Keeps an explicit stack of pending siblings (pushed in reverse), so the
/// node popped next is always the first unvisited child of the node yielded
/// last, or failing that its next sibling.
pub struct Descendants<'a> {
    tree: &'a DeviceTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a DeviceNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.node(id);
        self.stack.extend(node.children.iter().rev().copied());
        Some(node)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
