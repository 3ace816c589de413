use derive_more::Display;
use snafu::{ResultExt, Snafu, ensure};

use crate::node::{NodeKind, NodeValue, ValueError};

/// Handle to a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("#{_0}")]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Slot {
    value: NodeValue,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena holding a directory/file tree.
///
/// Every node has at most one parent. Nodes created with [`Tree::create`]
/// start detached and only become part of the tree once appended under a
/// directory reachable from the root.
///
/// # Panics
///
/// Accessors taking a [`NodeId`] (`value`, `kind`, `slug`, `parent`,
/// `children` and everything built on them) panic on an id this tree never
/// issued. Use [`Tree::contains`] to check ids of unknown origin first.
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Slot>,
    root: NodeId,
}

impl Tree {
    pub fn new(root: impl Into<NodeValue>) -> Self {
        Self {
            slots: vec![Slot {
                value: root.into(),
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Adds a detached node to the arena.
    pub fn create(&mut self, value: impl Into<NodeValue>) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            value: value.into(),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check(parent)?;
        self.check(child)?;
        ensure!(
            self.slot(parent).value.is_directory(),
            NotADirectorySnafu { node: parent }
        );
        ensure!(
            child != self.root && self.slot(child).parent.is_none(),
            AlreadyAttachedSnafu { node: child }
        );
        ensure!(
            !self.inclusive_ancestors(parent).contains(&child),
            CycleSnafu { parent, child }
        );

        self.slots[child.0].parent = Some(parent);
        self.slots[parent.0].children.push(child);
        Ok(())
    }

    /// Removes `node` from its parent's children; it stays in the arena.
    pub fn detach(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.check(node)?;
        ensure!(node != self.root, DetachRootSnafu);

        if let Some(parent) = self.slots[node.0].parent.take() {
            self.slots[parent.0].children.retain(|child| *child != node);
        }
        Ok(())
    }

    pub fn value(&self, node: NodeId) -> &NodeValue {
        &self.slot(node).value
    }

    pub fn kind(&self, node: NodeId) -> NodeKind {
        self.value(node).kind()
    }

    pub fn slug(&self, node: NodeId) -> &str {
        self.value(node).slug()
    }

    /// Replaces a node's value wholesale, validated as a value of the same kind.
    pub fn set_value(
        &mut self,
        node: NodeId,
        value: impl Into<NodeValue>,
    ) -> Result<(), TreeError> {
        self.check(node)?;
        let value = value.into();
        value
            .validate_as(self.kind(node))
            .context(InvalidValueSnafu { node })?;
        self.slots[node.0].value = value;
        Ok(())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node).parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.slot(node).children
    }

    pub fn has_children(&self, node: NodeId) -> bool {
        !self.children(node).is_empty()
    }

    pub fn child_by_slug(&self, node: NodeId, slug: &str) -> Option<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .find(|child| self.slug(*child) == slug)
    }

    /// `node` and all its descendants in document order.
    pub fn sub_nodes(&self, node: NodeId) -> Vec<NodeId> {
        let mut ordered = Vec::new();
        let mut pending = vec![node];

        while let Some(current) = pending.pop() {
            ordered.push(current);
            pending.extend(self.children(current).iter().rev());
        }

        ordered
    }

    /// `node` followed by each of its ancestors, ending with the topmost one.
    pub fn inclusive_ancestors(&self, node: NodeId) -> Vec<NodeId> {
        std::iter::successors(Some(node), |current| self.parent(*current)).collect()
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.sub_nodes(self.root).len()
    }

    /// True when `node` was issued by this tree.
    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.slots.len()
    }

    fn slot(&self, node: NodeId) -> &Slot {
        &self.slots[node.0]
    }

    fn check(&self, node: NodeId) -> Result<(), TreeError> {
        ensure!(self.contains(node), UnknownNodeSnafu { node });
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum TreeError {
    #[snafu(display("Node {} does not belong to this tree", node))]
    UnknownNodeError { node: NodeId },
    #[snafu(display("Node {} is not a directory and cannot have children", node))]
    NotADirectoryError { node: NodeId },
    #[snafu(display("Node {} already has a parent", node))]
    AlreadyAttachedError { node: NodeId },
    #[snafu(display("Appending {} under {} would create a cycle", child, parent))]
    CycleError { parent: NodeId, child: NodeId },
    #[snafu(display("The root node cannot be detached"))]
    DetachRootError,
    #[snafu(display("Invalid value for node {}", node))]
    InvalidValueError { node: NodeId, source: ValueError },
}
