//! In-memory document for testing and headless use.

use crate::dom::Dom;
use crate::error::{DomError, DomResult};
use crate::event::{EventKind, SyntheticEvent};
use kurbo::{Point, Rect};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Handle to a node of a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One delivered event, as recorded by [`MemoryDom::dispatched`].
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRecord {
    pub kind: EventKind,
    pub target: NodeId,
    pub client: Point,
    pub handled: bool,
}

type Listener = Rc<dyn Fn(&SyntheticEvent)>;

/// CSS properties a node takes from its parent when it sets none itself.
const INHERITED: &[&str] = &["cursor", "pointer-events", "visibility"];

#[derive(Debug, Clone, Default)]
struct NodeData {
    tag: String,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    rect: Rect,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

struct Tree {
    nodes: Vec<NodeData>,
    root: NodeId,
    body: NodeId,
    listeners: HashMap<(NodeId, EventKind), Vec<Listener>>,
    log: Vec<DispatchRecord>,
}

impl Tree {
    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(data);
        NodeId(self.nodes.len() - 1)
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
    }

    fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let mut data = self.node(id).clone();
        let children = std::mem::take(&mut data.children);
        data.parent = None;
        let copy = self.push(data);
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.node_mut(child_copy).parent = Some(copy);
            self.node_mut(copy).children.push(child_copy);
        }
        copy
    }

    fn is_connected(&self, mut id: NodeId) -> bool {
        loop {
            if id == self.root {
                return true;
            }
            match self.node(id).parent {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    fn preorder(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        for child in &self.node(id).children {
            self.preorder(*child, out);
        }
    }
}

/// A tiny DOM: elements with attributes, inline styles, layout rectangles
/// and event listeners. Cloning the handle shares the document.
#[derive(Clone)]
pub struct MemoryDom {
    tree: Rc<RefCell<Tree>>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Create a document holding an `html` root with an empty `body`.
    pub fn new() -> Self {
        let mut tree = Tree {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            listeners: HashMap::new(),
            log: Vec::new(),
        };
        let root = tree.push(NodeData {
            tag: "html".to_string(),
            ..Default::default()
        });
        let body = tree.push(NodeData {
            tag: "body".to_string(),
            parent: Some(root),
            ..Default::default()
        });
        tree.node_mut(root).children.push(body);
        tree.root = root;
        tree.body = body;
        Self {
            tree: Rc::new(RefCell::new(tree)),
        }
    }

    pub fn root(&self) -> NodeId {
        self.tree.borrow().root
    }

    pub fn body(&self) -> NodeId {
        self.tree.borrow().body
    }

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.tree.borrow_mut().push(NodeData {
            tag: tag.to_string(),
            ..Default::default()
        })
    }

    pub fn append_child(&self, parent: &NodeId, child: &NodeId) {
        let mut tree = self.tree.borrow_mut();
        tree.detach(*child);
        tree.node_mut(*child).parent = Some(*parent);
        tree.node_mut(*parent).children.push(*child);
    }

    pub fn tag(&self, node: &NodeId) -> String {
        self.tree.borrow().node(*node).tag.clone()
    }

    pub fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        self.tree
            .borrow_mut()
            .node_mut(*node)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.tree.borrow().node(*node).attributes.get(name).cloned()
    }

    pub fn style(&self, node: &NodeId, name: &str) -> Option<String> {
        self.tree.borrow().node(*node).style.get(name).cloned()
    }

    pub fn set_rect(&self, node: &NodeId, rect: Rect) {
        self.tree.borrow_mut().node_mut(*node).rect = rect;
    }

    /// Register a listener for `kind` on `node`. Events bubble, so listeners
    /// also see events dispatched at descendants.
    pub fn add_listener(&self, node: &NodeId, kind: EventKind, listener: impl Fn(&SyntheticEvent) + 'static) {
        self.tree
            .borrow_mut()
            .listeners
            .entry((*node, kind))
            .or_default()
            .push(Rc::new(listener));
    }

    /// Register a listener that suppresses default handling of `kind`.
    pub fn suppress(&self, node: &NodeId, kind: EventKind) {
        self.add_listener(node, kind, |e| e.prevent_default());
    }

    /// Every event delivered so far, in order.
    pub fn dispatched(&self) -> Vec<DispatchRecord> {
        self.tree.borrow().log.clone()
    }

    /// Kinds of every event delivered so far, in order.
    pub fn dispatched_kinds(&self) -> Vec<EventKind> {
        self.tree.borrow().log.iter().map(|r| r.kind).collect()
    }

    pub fn clear_dispatched(&self) {
        self.tree.borrow_mut().log.clear();
    }

    /// Elements currently attached directly to `body`.
    pub fn body_children(&self) -> Vec<NodeId> {
        let body = self.body();
        self.children(&body)
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.tree.borrow().node(*node).parent
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.tree.borrow().node(*node).children.clone()
    }

    fn has_attribute(&self, node: &NodeId, name: &str) -> bool {
        self.tree.borrow().node(*node).attributes.contains_key(name)
    }

    fn remove_attribute(&self, node: &NodeId, name: &str) {
        self.tree.borrow_mut().node_mut(*node).attributes.remove(name);
    }

    fn element_from_point(&self, point: Point) -> Option<NodeId> {
        let tree = self.tree.borrow();
        let mut order = Vec::new();
        tree.preorder(tree.root, &mut order);
        order.into_iter().rev().find(|id| {
            let node = tree.node(*id);
            node.rect.contains(point)
                && node.style.get("pointer-events").map(String::as_str) != Some("none")
        })
    }

    fn computed_style(&self, node: &NodeId) -> Vec<(String, String)> {
        self.tree
            .borrow()
            .node(*node)
            .style
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn computed_property(&self, node: &NodeId, name: &str) -> Option<String> {
        if !INHERITED.contains(&name) {
            return self.style(node, name);
        }
        let tree = self.tree.borrow();
        let mut current = Some(*node);
        while let Some(id) = current {
            let data = tree.node(id);
            if let Some(value) = data.style.get(name) {
                return Some(value.clone());
            }
            current = data.parent;
        }
        None
    }

    fn set_style(&self, node: &NodeId, name: &str, value: &str) {
        self.tree
            .borrow_mut()
            .node_mut(*node)
            .style
            .insert(name.to_string(), value.to_string());
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        self.tree.borrow().node(*node).rect
    }

    fn deep_clone(&self, node: &NodeId) -> DomResult<NodeId> {
        let mut tree = self
            .tree
            .try_borrow_mut()
            .map_err(|e| DomError::Clone(e.to_string()))?;
        Ok(tree.clone_subtree(*node))
    }

    fn append_to_body(&self, node: &NodeId) -> DomResult<()> {
        let body = self.body();
        self.append_child(&body, node);
        Ok(())
    }

    fn detach(&self, node: &NodeId) {
        self.tree.borrow_mut().detach(*node);
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.tree.borrow().is_connected(*node)
    }

    fn dispatch(&self, target: &NodeId, event: &SyntheticEvent) -> bool {
        // Collect the bubbling path first so listeners may mutate the tree.
        let listeners: Vec<Listener> = {
            let tree = self.tree.borrow();
            let mut path = Vec::new();
            let mut current = Some(*target);
            while let Some(id) = current {
                path.push(id);
                current = tree.node(id).parent;
            }
            path.iter()
                .filter_map(|id| tree.listeners.get(&(*id, event.kind)))
                .flatten()
                .cloned()
                .collect()
        };

        for listener in listeners {
            listener(event);
        }

        let handled = event.default_prevented();
        self.tree.borrow_mut().log.push(DispatchRecord {
            kind: event.kind,
            target: *target,
            client: event.client,
            handled,
        });
        handled
    }
}
