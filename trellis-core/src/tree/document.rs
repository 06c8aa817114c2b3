use std::collections::HashMap;

use flume::{Receiver, Sender};

use super::{markup, Display, NodeKind, RowEvent, TreeAdapter};
use crate::error::Result;

const DOCUMENT_TAG: &str = "#document";

// -----------------------------------------------------------------------------
//   - Node reference -
// -----------------------------------------------------------------------------
/// A handle to a node in a [`Document`].
///
/// Handles to removed nodes go stale: they are never handed out again for
/// a different node, and every operation on a stale handle is a no-op.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
pub(super) enum NodeData {
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug)]
pub(super) struct Element {
    pub(super) tag: String,
    pub(super) attributes: Vec<(String, String)>,
    pub(super) display: Display,
    pub(super) children: Vec<NodeRef>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    parent: Option<NodeRef>,
    data: Option<NodeData>,
}

// -----------------------------------------------------------------------------
//   - Document -
// -----------------------------------------------------------------------------
/// An in-memory node tree.
///
/// ```
/// use trellis_core::tree::{Document, TreeAdapter};
///
/// let doc = Document::parse(r#"<div id="main"><p>hello</p></div>"#).unwrap();
/// let main = doc.resolve("#main").unwrap();
/// assert_eq!(doc.inner_markup(&main), "<p>hello</p>");
/// ```
#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeRef,
    observers: HashMap<NodeRef, Vec<Sender<RowEvent<NodeRef>>>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            slots: vec![],
            free: vec![],
            root: NodeRef {
                index: 0,
                generation: 0,
            },
            observers: HashMap::new(),
        };
        doc.root = doc.create_element(DOCUMENT_TAG);
        doc
    }

    pub fn parse(src: &str) -> Result<Self> {
        let mut doc = Self::new();
        let root = doc.root;
        markup::parse_into(&mut doc, &root, src)?;
        Ok(doc)
    }

    /// The document node. Everything parsed from markup hangs off of it.
    pub fn root(&self) -> NodeRef {
        self.root
    }

    /// Number of live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.data.is_some()).count()
    }

    pub fn create_element(&mut self, tag: &str) -> NodeRef {
        self.alloc(NodeData::Element(Element {
            tag: tag.to_ascii_lowercase(),
            attributes: vec![],
            display: Display::Show,
            children: vec![],
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeRef {
        self.alloc(NodeData::Text(text.to_string()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeRef {
        self.alloc(NodeData::Comment(text.to_string()))
    }

    pub fn tag(&self, node: &NodeRef) -> Option<&str> {
        match self.data(node)? {
            NodeData::Element(el) => Some(&el.tag),
            _ => None,
        }
    }

    pub fn parent(&self, node: &NodeRef) -> Option<NodeRef> {
        self.slot(node)?.parent
    }

    pub fn is_live(&self, node: &NodeRef) -> bool {
        self.data(node).is_some()
    }

    /// The markup of a node including the node itself.
    pub fn markup(&self, node: &NodeRef) -> String {
        let mut output = String::new();
        markup::write_node(self, node, &mut output);
        output
    }

    /// The markup of the children of a node.
    pub fn inner_markup(&self, node: &NodeRef) -> String {
        let mut output = String::new();
        for child in self.children(node) {
            markup::write_node(self, &child, &mut output);
        }
        output
    }

    /// The concatenated text of every text node under `node`.
    pub fn text_content(&self, node: &NodeRef) -> String {
        match self.data(node) {
            Some(NodeData::Text(text)) => text.clone(),
            Some(NodeData::Element(el)) => el
                .children
                .iter()
                .map(|child| self.text_content(child))
                .collect(),
            _ => String::new(),
        }
    }

    /// Receive a [`RowEvent`] every time a row is created under `node`.
    pub fn subscribe(&mut self, node: &NodeRef) -> Receiver<RowEvent<NodeRef>> {
        let (tx, rx) = flume::unbounded();
        self.observers.entry(*node).or_default().push(tx);
        rx
    }

    /// Stop sending row events for `node`.
    pub fn unsubscribe(&mut self, node: &NodeRef) {
        self.observers.remove(node);
    }

    /// Every element under `node` in document order, `node` included.
    fn descendants(&self, node: &NodeRef, out: &mut Vec<NodeRef>) {
        if let Some(NodeData::Element(el)) = self.data(node) {
            out.push(*node);
            for child in &el.children {
                self.descendants(child, out);
            }
        }
    }

    pub(super) fn data(&self, node: &NodeRef) -> Option<&NodeData> {
        self.slot(node)?.data.as_ref()
    }

    fn element(&self, node: &NodeRef) -> Option<&Element> {
        match self.data(node)? {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: &NodeRef) -> Option<&mut Element> {
        match self.slot_mut(node)?.data.as_mut()? {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    fn slot(&self, node: &NodeRef) -> Option<&Slot> {
        self.slots
            .get(node.index as usize)
            .filter(|slot| slot.generation == node.generation && slot.data.is_some())
    }

    fn slot_mut(&mut self, node: &NodeRef) -> Option<&mut Slot> {
        self.slots
            .get_mut(node.index as usize)
            .filter(|slot| slot.generation == node.generation && slot.data.is_some())
    }

    fn alloc(&mut self, data: NodeData) -> NodeRef {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation += 1;
                slot.parent = None;
                slot.data = Some(data);
                NodeRef {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    parent: None,
                    data: Some(data),
                });
                NodeRef {
                    index,
                    generation: 0,
                }
            }
        }
    }

    fn release(&mut self, node: &NodeRef) {
        let Some(slot) = self.slot_mut(node) else { return };
        let data = slot.data.take();
        slot.parent = None;
        self.free.push(node.index);
        self.observers.remove(node);

        if let Some(NodeData::Element(el)) = data {
            for child in &el.children {
                self.release(child);
            }
        }
    }
}

impl TreeAdapter for Document {
    type Node = NodeRef;

    fn resolve(&self, selector: &str) -> Option<NodeRef> {
        let mut elements = vec![];
        self.descendants(&self.root, &mut elements);

        let matches = |el: &Element| match selector.strip_prefix('#') {
            Some(id) => el.attributes.iter().any(|(k, v)| k == "id" && v == id),
            None => el.tag.eq_ignore_ascii_case(selector),
        };

        elements
            .into_iter()
            .filter(|node| *node != self.root)
            .find(|node| self.element(node).map(matches).unwrap_or(false))
    }

    fn kind(&self, node: &NodeRef) -> NodeKind {
        match self.data(node) {
            Some(NodeData::Element(_)) => NodeKind::Element,
            Some(NodeData::Text(_)) => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    fn children(&self, node: &NodeRef) -> Vec<NodeRef> {
        self.element(node)
            .map(|el| el.children.clone())
            .unwrap_or_default()
    }

    fn text(&self, node: &NodeRef) -> Option<String> {
        match self.data(node)? {
            NodeData::Text(text) => Some(text.clone()),
            _ => None,
        }
    }

    fn set_text(&mut self, node: &NodeRef, text: &str) {
        if let Some(NodeData::Text(current)) = self.slot_mut(node).and_then(|s| s.data.as_mut()) {
            *current = text.to_string();
        }
    }

    fn attributes(&self, node: &NodeRef) -> Vec<(String, String)> {
        self.element(node)
            .map(|el| el.attributes.clone())
            .unwrap_or_default()
    }

    fn attribute(&self, node: &NodeRef, name: &str) -> Option<String> {
        self.element(node)?
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn set_attribute(&mut self, node: &NodeRef, name: &str, value: &str) {
        let Some(el) = self.element_mut(node) else { return };
        match el.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, current)) => *current = value.to_string(),
            None => el.attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attribute(&mut self, node: &NodeRef, name: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attributes.retain(|(k, _)| k != name);
        }
    }

    fn display(&self, node: &NodeRef) -> Display {
        self.element(node)
            .map(|el| el.display)
            .unwrap_or_default()
    }

    fn set_display(&mut self, node: &NodeRef, display: Display) {
        if let Some(el) = self.element_mut(node) {
            el.display = display;
        }
    }

    fn clone_node(&mut self, node: &NodeRef) -> NodeRef {
        let data = match self.data(node) {
            Some(NodeData::Text(text)) => NodeData::Text(text.clone()),
            Some(NodeData::Comment(text)) => NodeData::Comment(text.clone()),
            Some(NodeData::Element(el)) => NodeData::Element(Element {
                tag: el.tag.clone(),
                attributes: el.attributes.clone(),
                display: el.display,
                children: vec![],
            }),
            None => NodeData::Comment(String::new()),
        };

        let clone = self.alloc(data);
        for child in self.children(node) {
            let child = self.clone_node(&child);
            self.append_child(&clone, &child);
        }
        clone
    }

    fn append_child(&mut self, parent: &NodeRef, child: &NodeRef) {
        if self.element(parent).is_none() || self.slot(child).is_none() {
            return;
        }
        self.detach(child);
        if let Some(el) = self.element_mut(parent) {
            el.children.push(*child);
        }
        if let Some(slot) = self.slot_mut(child) {
            slot.parent = Some(*parent);
        }
    }

    fn replace_child(&mut self, parent: &NodeRef, new: &NodeRef, old: &NodeRef) {
        if self.parent(old) != Some(*parent) || self.slot(new).is_none() {
            return;
        }
        self.detach(new);
        if let Some(el) = self.element_mut(parent) {
            if let Some(position) = el.children.iter().position(|c| c == old) {
                el.children[position] = *new;
            }
        }
        if let Some(slot) = self.slot_mut(new) {
            slot.parent = Some(*parent);
        }
        if let Some(slot) = self.slot_mut(old) {
            slot.parent = None;
        }
        self.release(old);
    }

    fn detach(&mut self, node: &NodeRef) {
        let Some(parent) = self.parent(node) else { return };
        if let Some(el) = self.element_mut(&parent) {
            el.children.retain(|c| c != node);
        }
        if let Some(slot) = self.slot_mut(node) {
            slot.parent = None;
        }
    }

    fn remove(&mut self, node: &NodeRef) {
        self.detach(node);
        self.release(node);
    }

    fn dispatch(&mut self, node: &NodeRef, event: RowEvent<NodeRef>) {
        if let Some(observers) = self.observers.get_mut(node) {
            observers.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}
