//! Arena document.

use std::fmt;
use std::sync::Arc;

use chemhover_protocols::{Depiction, DomError};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

use super::event::{
    MutationObserver, MutationRecord, PointerAction, PointerBinding, PointerEvent,
};
use super::html::{escape_attr, escape_text, is_void, style_value};

/// Document shared between the walker, the trigger and the scheduler.
///
/// Lock it only for synchronous reads and writes; never hold the guard across
/// an `.await`.
pub type SharedDocument = Arc<Mutex<Document>>;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Element with its lower-case tag name.
    Element(String),
    Text(String),
    Comment(String),
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    pointer: PointerBinding,
    depiction: Option<Depiction>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: Vec::new(),
            style: Vec::new(),
            pointer: PointerBinding::default(),
            depiction: None,
        }
    }
}

/// A page: a tree of nodes rooted at `<body>`.
///
/// Nodes are never freed; a removed node simply has no parent. Child-list
/// changes under the body are reported to every [`MutationObserver`].
pub struct Document {
    nodes: Vec<Node>,
    body: NodeId,
    observers: Vec<mpsc::UnboundedSender<Vec<MutationRecord>>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Element("body".to_string()))],
            body: NodeId(0),
            observers: Vec::new(),
        }
    }

    pub fn into_shared(self) -> SharedDocument {
        Arc::new(Mutex::new(self))
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.0).ok_or(DomError::NodeNotFound(id.0))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::NodeNotFound(id.0))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    // ---- creation ----

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(tag.to_ascii_lowercase()))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Comment(text.into()))
    }

    // ---- reads ----

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).ok().map(|n| &n.kind)
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.tag_name(id).is_some()
    }

    /// Character data of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Concatenated text of the node and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Ok(node) = self.node(id) else { return };
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for &child in &node.children {
                    self.collect_text(child, out);
                }
            }
            NodeKind::Comment(_) => {}
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Whether the node is reachable from the body.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.body {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// The node and its ancestors, innermost first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.contains(id).then_some(id), move |&n| self.parent(n))
    }

    /// The node and its descendants in tree order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev());
        }
        out
    }

    /// Whether user input can edit text at this node: inside a `textarea`,
    /// an `input`, or a `contenteditable` element.
    pub fn is_editable(&self, id: NodeId) -> bool {
        self.ancestors(id).any(|n| {
            matches!(self.tag_name(n), Some("textarea") | Some("input"))
                || self
                    .attribute(n, "contenteditable")
                    .is_some_and(|v| !v.eq_ignore_ascii_case("false"))
        })
    }

    // ---- attributes and style ----

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .ok()?
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> Result<(), DomError> {
        let value = value.into();
        let node = self.node_mut(id)?;
        match node.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => node.attributes.push((name.to_string(), value)),
        }
        Ok(())
    }

    pub fn id(&self, id: NodeId) -> Option<&str> {
        self.attribute(id, "id")
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.node(id)
            .ok()?
            .style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_style(&mut self, id: NodeId, property: &str, value: impl Into<String>) -> Result<(), DomError> {
        let value = value.into();
        let node = self.node_mut(id)?;
        match node.style.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value,
            None => node.style.push((property.to_string(), value)),
        }
        Ok(())
    }

    /// First connected element carrying `id`, in tree order.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|&n| self.is_element(n) && self.id(n) == Some(id))
    }

    // ---- character data (not reported to observers) ----

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        let node = self.node_mut(id)?;
        match &mut node.kind {
            NodeKind::Text(current) => {
                *current = text.into();
                Ok(())
            }
            _ => Err(DomError::NotText(id.0)),
        }
    }

    // ---- tree writes ----

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.node(parent)?;
        self.node(child)?;
        if !self.is_element(parent) || child == self.body || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::InvalidHierarchy {
                parent: parent.0,
                child: child.0,
            });
        }
        Ok(())
    }

    /// Unlink `child` from its current parent, reporting the removal.
    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else { return };
        self.nodes[parent.0].children.retain(|&c| c != child);
        self.nodes[child.0].parent = None;
        self.emit(MutationRecord {
            target: parent,
            added: Vec::new(),
            removed: vec![child],
        });
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        self.emit(MutationRecord {
            target: parent,
            added: vec![child],
            removed: Vec::new(),
        });
        Ok(())
    }

    /// Put `new` where `old` is and unlink `old`, as one change.
    pub fn replace_child(&mut self, old: NodeId, new: NodeId) -> Result<(), DomError> {
        self.node(old)?;
        let parent = self.parent(old).ok_or(DomError::Detached(old.0))?;
        if new == old {
            return Ok(());
        }
        self.check_insert(parent, new)?;
        self.detach(new);

        let siblings = &mut self.nodes[parent.0].children;
        let Some(position) = siblings.iter().position(|&c| c == old) else {
            return Err(DomError::Detached(old.0));
        };
        siblings[position] = new;
        self.nodes[old.0].parent = None;
        self.nodes[new.0].parent = Some(parent);
        self.emit(MutationRecord {
            target: parent,
            added: vec![new],
            removed: vec![old],
        });
        Ok(())
    }

    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        self.node(id)?;
        if self.parent(id).is_none() {
            return Err(DomError::Detached(id.0));
        }
        self.detach(id);
        Ok(())
    }

    // ---- render surfaces ----

    pub fn set_depiction(&mut self, id: NodeId, depiction: Depiction) -> Result<(), DomError> {
        self.node_mut(id)?.depiction = Some(depiction);
        Ok(())
    }

    pub fn depiction(&self, id: NodeId) -> Option<&Depiction> {
        self.node(id).ok()?.depiction.as_ref()
    }

    // ---- pointer events ----

    pub fn set_pointer_binding(&mut self, id: NodeId, binding: PointerBinding) -> Result<(), DomError> {
        self.node_mut(id)?.pointer = binding;
        Ok(())
    }

    pub fn pointer_binding(&self, id: NodeId) -> PointerBinding {
        self.node(id).map(|n| n.pointer).unwrap_or_default()
    }

    /// Deliver a pointer event to `target`, bubbling through its ancestors.
    ///
    /// Returns how many handlers ran.
    pub fn dispatch_pointer(&mut self, target: NodeId, event: PointerEvent) -> usize {
        let path: Vec<NodeId> = self.ancestors(target).collect();
        let mut handled = 0;
        for node in path {
            let binding = self.pointer_binding(node);
            let action = match event {
                PointerEvent::Over { .. } => binding.over,
                PointerEvent::Out => binding.out,
            };
            let Some(action) = action else { continue };
            if self.apply_pointer_action(action, event).is_ok() {
                handled += 1;
            }
        }
        handled
    }

    fn apply_pointer_action(&mut self, action: PointerAction, event: PointerEvent) -> Result<(), DomError> {
        match action {
            PointerAction::ShowAt(node) => {
                self.set_style(node, "display", "block")?;
                if let PointerEvent::Over { x, y } = event {
                    self.set_style(node, "left", format!("{}px", x))?;
                    self.set_style(node, "top", format!("{}px", y))?;
                }
            }
            PointerAction::Hide(node) => self.set_style(node, "display", "none")?,
        }
        Ok(())
    }

    // ---- observation ----

    pub fn observe(&mut self) -> MutationObserver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(tx);
        MutationObserver::new(rx)
    }

    fn emit(&mut self, record: MutationRecord) {
        if self.observers.is_empty() || !self.is_connected(record.target) {
            return;
        }
        trace!(
            "mutation on {}: +{:?} -{:?}",
            record.target, record.added, record.removed
        );
        self.observers.retain(|tx| tx.send(vec![record.clone()]).is_ok());
    }

    // ---- serialization ----

    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_html(child, &mut out);
        }
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Ok(node) = self.node(id) else { return };
        match &node.kind {
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Element(tag) => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in &node.attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
                }
                if !node.style.is_empty() {
                    let style = style_value(node.style.iter().map(|(k, v)| (k.as_str(), v.as_str())));
                    out.push_str(&format!(" style=\"{}\"", escape_attr(&style)));
                }
                out.push('>');
                if is_void(tag) {
                    return;
                }
                for &child in &node.children {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
