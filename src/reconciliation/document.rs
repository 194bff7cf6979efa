use std::{fmt::Display, ops::Range};

use crate::reconciliation::document_error::DocumentError;

/// Stable key of a node in a `Document`. Keys of removed nodes are never
/// handed out again, so a stale key can't reach a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// Role of a node in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    /// Ordinary text that no reconciliation is working on.
    Plain,
    /// Hosts a reconciliation: an `InlineEdit` followed by an `Unprocessed`.
    Placeholder,
    /// Holds the `Addition` and `Unchanged` spans of the live diff.
    InlineEdit,
    Addition,
    Unchanged,
    /// The part of the original selection the rewrite hasn't reached yet.
    Unprocessed,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Editable text document stored as an arena of nodes.
///
/// Nodes refer to each other through `NodeId`s, leaves hold the text and the
/// text of a subtree is the concatenation of its leaves in order. Every
/// mutation is visible to the very next read. All offsets count characters.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
}

impl Document {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut document = Document {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        };

        document.root = document.allocate(Node {
            kind: NodeKind::Root,
            text: String::new(),
            parent: None,
            children: Vec::new(),
        });

        if !text.is_empty() {
            let plain = document.allocate(Node {
                kind: NodeKind::Plain,
                text: text.to_owned(),
                parent: Some(document.root),
                children: Vec::new(),
            });
            document.push_child(document.root, plain);
        }

        document
    }

    #[must_use]
    pub fn root(&self) -> NodeId { self.root }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool { self.node(id).is_ok() }

    /// The whole document's text.
    #[must_use]
    pub fn text(&self) -> String { self.text_content(self.root).unwrap_or_default() }

    pub fn kind(&self, id: NodeId) -> Result<NodeKind, DocumentError> { Ok(self.node(id)?.kind) }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, DocumentError> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], DocumentError> {
        Ok(&self.node(id)?.children)
    }

    /// Text of the subtree rooted at `id`.
    pub fn text_content(&self, id: NodeId) -> Result<String, DocumentError> {
        let mut text = String::new();

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current)?;
            if node.children.is_empty() {
                text.push_str(&node.text);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }

        Ok(text)
    }

    /// Descendants of `id` with one of the given kinds, in document order.
    pub fn children_of_kind(
        &self,
        id: NodeId,
        kinds: &[NodeKind],
    ) -> Result<Vec<NodeId>, DocumentError> {
        let mut result = Vec::new();

        let mut stack: Vec<NodeId> = self.node(id)?.children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let node = self.node(current)?;
            if kinds.contains(&node.kind) {
                result.push(current);
            }
            stack.extend(node.children.iter().rev());
        }

        Ok(result)
    }

    pub fn append_child(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        text: impl Into<String>,
    ) -> Result<NodeId, DocumentError> {
        let position = self.node(parent)?.children.len();
        self.insert_child(parent, position, kind, text)
    }

    /// Inserts a new node among the children of `parent`. Positions past the
    /// end append.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        position: usize,
        kind: NodeKind,
        text: impl Into<String>,
    ) -> Result<NodeId, DocumentError> {
        self.node(parent)?;

        let child = self.allocate(Node {
            kind,
            text: text.into(),
            parent: Some(parent),
            children: Vec::new(),
        });

        let children = &mut self.node_mut(parent)?.children;
        children.insert(position.min(children.len()), child);

        Ok(child)
    }

    /// Removes every descendant of `id`.
    pub fn clear_children(&mut self, id: NodeId) -> Result<(), DocumentError> {
        let children = std::mem::take(&mut self.node_mut(id)?.children);
        for child in children {
            self.free_subtree(child);
        }

        Ok(())
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), DocumentError> {
        self.node_mut(id)?.text = text.into();
        Ok(())
    }

    /// Swaps the subtree rooted at `id` for a single new node in the same
    /// position and returns the new node's key.
    pub fn replace_with(
        &mut self,
        id: NodeId,
        kind: NodeKind,
        text: impl Into<String>,
    ) -> Result<NodeId, DocumentError> {
        let parent = self.node(id)?.parent.ok_or(DocumentError::Detached(id))?;
        let position = self
            .node(parent)?
            .children
            .iter()
            .position(|child| *child == id)
            .ok_or(DocumentError::UnknownNode(id))?;

        let replacement = self.allocate(Node {
            kind,
            text: text.into(),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.node_mut(parent)?.children[position] = replacement;
        self.free_subtree(id);

        Ok(replacement)
    }

    /// Replaces the subtree rooted at `id` with plain text.
    pub fn replace_with_text(
        &mut self,
        id: NodeId,
        text: impl Into<String>,
    ) -> Result<NodeId, DocumentError> {
        self.replace_with(id, NodeKind::Plain, text)
    }

    /// Makes the characters in `range` a single plain node directly under the
    /// root, splitting and joining plain nodes as needed, and returns it. An
    /// empty range gets an empty node at that offset.
    ///
    /// Fails if the range touches a node other than plain text, e.g. a
    /// reconciliation in progress. Plain nodes may have been split by then,
    /// which leaves the text unchanged.
    pub fn isolate(&mut self, range: Range<usize>) -> Result<NodeId, DocumentError> {
        let length = self.text().chars().count();
        if range.start > range.end || range.end > length {
            return Err(DocumentError::OutOfBounds {
                start: range.start,
                end: range.end,
                length,
            });
        }

        let first = self.split_root_at(range.start, &range)?;
        let last = self.split_root_at(range.end, &range)?;

        let root = self.root;
        let selected = self.node(root)?.children[first..last].to_vec();
        let Some((&head, rest)) = selected.split_first() else {
            return self.insert_child(root, first, NodeKind::Plain, String::new());
        };

        let mut text = String::new();
        for &id in &selected {
            let node = self.node(id)?;
            if node.kind != NodeKind::Plain {
                return Err(DocumentError::RegionBusy {
                    start: range.start,
                    end: range.end,
                });
            }
            text.push_str(&node.text);
        }

        self.node_mut(root)?
            .children
            .retain(|child| !rest.contains(child));
        for &id in rest {
            self.free_subtree(id);
        }
        self.set_text(head, text)?;

        Ok(head)
    }

    /// Splits the root's child straddling `offset` so that a child boundary
    /// falls on it, and returns the index of the first child starting at or
    /// after `offset`.
    fn split_root_at(&mut self, offset: usize, range: &Range<usize>) -> Result<usize, DocumentError> {
        let root = self.root;
        let children = self.node(root)?.children.clone();

        let mut position = 0;
        for (index, &child) in children.iter().enumerate() {
            if position >= offset {
                return Ok(index);
            }

            let length = self.text_content(child)?.chars().count();
            if position + length > offset {
                let node = self.node(child)?;
                if node.kind != NodeKind::Plain {
                    return Err(DocumentError::RegionBusy {
                        start: range.start,
                        end: range.end,
                    });
                }

                let split = node
                    .text
                    .char_indices()
                    .nth(offset - position)
                    .map_or(node.text.len(), |(byte_index, _)| byte_index);
                let tail = node.text[split..].to_owned();
                self.node_mut(child)?.text.truncate(split);
                self.insert_child(root, index + 1, NodeKind::Plain, tail)?;

                return Ok(index + 1);
            }

            position += length;
        }

        Ok(children.len())
    }

    fn node(&self, id: NodeId) -> Result<&Node, DocumentError> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(DocumentError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DocumentError> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(DocumentError::UnknownNode(id))
    }

    fn push_child(&mut self, parent: NodeId, child: NodeId) {
        if let Ok(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);

            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });

        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Releases a subtree that has already been unlinked from its parent.
    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index)
                .filter(|slot| slot.generation == current.generation)
            else {
                continue;
            };

            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
            }
        }
    }
}
