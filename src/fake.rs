//! In-memory [`Dom`] backed by a node arena.
//!
//! Used by tests and headless runs. Nodes are never freed; detached nodes keep
//! their handle and state so they can be re-attached. Beyond the page tree the
//! fake records host side effects (observations, stored values, notices,
//! scroll requests) so tests can assert on them.

use std::collections::{BTreeMap, BTreeSet};

use crate::dom::{Dom, DomError, Location, NodeId, ObserverKind, Rect, Selector};

#[cfg(test)]
#[path = "fake_test.rs"]
mod fake_test;

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    html: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    rect: Rect,
    scroll_width: f64,
    hidden: bool,
}

/// A scriptable page for exercising the interactivity layer without a browser.
#[derive(Debug, Clone)]
pub struct FakeDom {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    focused: Option<NodeId>,
    /// `None` models storage being unavailable (private mode, quota, policy).
    storage: Option<BTreeMap<String, String>>,
    pub prefers_dark: bool,
    pub viewport_width: f64,
    pub location: Location,
    pub year: i32,
    pub observed: BTreeSet<(ObserverKind, NodeId)>,
    pub notices: Vec<String>,
    pub scrolled_to: Vec<NodeId>,
    pub form_resets: Vec<NodeId>,
}

impl Default for FakeDom {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDom {
    /// An empty document with `<html>` and `<body>`.
    #[must_use]
    pub fn new() -> Self {
        let root = Node { tag: "html".into(), ..Node::default() };
        let body = Node { tag: "body".into(), parent: Some(NodeId(0)), ..Node::default() };
        let mut dom = Self {
            nodes: vec![root, body],
            root: NodeId(0),
            body: NodeId(1),
            focused: None,
            storage: Some(BTreeMap::new()),
            prefers_dark: false,
            viewport_width: 1280.0,
            location: Location::new("/index.html", ""),
            year: 2025,
            observed: BTreeSet::new(),
            notices: Vec::new(),
            scrolled_to: Vec::new(),
            form_resets: Vec::new(),
        };
        dom.nodes[0].children.push(NodeId(1));
        dom
    }

    // --- Building ---

    /// Create an element and attach it under `parent`.
    pub fn element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.alloc(tag);
        self.attach(parent, id);
        id
    }

    /// Create an element with the given classes under `parent`.
    pub fn element_with_classes(&mut self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        let id = self.element(parent, tag);
        if let Some(node) = self.node_mut(id) {
            node.classes = classes.iter().map(|c| (*c).to_owned()).collect();
        }
        id
    }

    /// Set an attribute while building a fixture.
    pub fn with_attribute(&mut self, node: NodeId, name: &str, value: &str) -> NodeId {
        if let Some(n) = self.node_mut(node) {
            n.attributes.insert(name.to_owned(), value.to_owned());
        }
        node
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(n) = self.node_mut(node) {
            n.rect = rect;
        }
    }

    pub fn set_scroll_width(&mut self, node: NodeId, width: f64) {
        if let Some(n) = self.node_mut(node) {
            n.scroll_width = width;
        }
    }

    /// Mark `node` as not rendered (`display: none` or similar).
    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(n) = self.node_mut(node) {
            n.hidden = hidden;
        }
    }

    pub fn set_focus(&mut self, node: Option<NodeId>) {
        self.focused = node;
    }

    /// Make local storage unavailable; reads return nothing and writes fail.
    pub fn disable_storage(&mut self) {
        self.storage = None;
    }

    // --- Inspection ---

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.node(node).and_then(|n| n.style.get(property).cloned())
    }

    #[must_use]
    pub fn html(&self, node: NodeId) -> String {
        self.node(node).map(|n| n.html.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    /// Whether `node` is reachable from the document root.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    #[must_use]
    pub fn stored(&self, key: &str) -> Option<String> {
        self.storage.as_ref().and_then(|s| s.get(key).cloned())
    }

    #[must_use]
    pub fn is_observed(&self, kind: ObserverKind, node: NodeId) -> bool {
        self.observed.contains(&(kind, node))
    }

    // --- Internals ---

    fn alloc(&mut self, tag: &str) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Node { tag: tag.to_ascii_lowercase(), ..Node::default() });
        id
    }

    fn index(id: NodeId) -> usize {
        id.0 as usize
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(Self::index(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(Self::index(id))
    }

    fn checked_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.node_mut(id).ok_or(DomError::UnknownNode(id))
    }

    fn unlink(&mut self, child: NodeId) {
        if let Some(parent) = self.parent(child) {
            if let Some(p) = self.node_mut(parent) {
                p.children.retain(|c| *c != child);
            }
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = None;
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.unlink(child);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn collect_descendants(&self, root: NodeId, out: &mut Vec<NodeId>) {
        if let Some(node) = self.node(root) {
            for child in &node.children {
                out.push(*child);
                self.collect_descendants(*child, out);
            }
        }
    }

    fn matches(&self, id: NodeId, selector: Selector<'_>) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        match selector {
            Selector::Id(want) => node.attributes.get("id").is_some_and(|v| v == want),
            Selector::Class(want) => node.classes.iter().any(|c| c == want),
            Selector::Tag(want) => node.tag == want,
            Selector::Attr(want) => node.attributes.contains_key(want),
        }
    }
}

impl Dom for FakeDom {
    fn find(&self, selector: Selector<'_>) -> Option<NodeId> {
        self.find_all(selector).into_iter().next()
    }

    fn find_all(&self, selector: Selector<'_>) -> Vec<NodeId> {
        self.find_within(self.root, selector)
    }

    fn find_within(&self, root: NodeId, selector: Selector<'_>) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.matches(*id, selector))
            .collect()
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(root, &mut out);
        out
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.node(node).map(|n| n.tag.clone()).unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node).and_then(|n| n.attributes.get(name).cloned())
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.node(node).map(|n| n.text.clone())
    }

    fn is_rendered(&self, node: NodeId) -> bool {
        if !self.is_attached(node) {
            return false;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if self.node(id).is_some_and(|n| n.hidden) {
                return false;
            }
            current = self.parent(id);
        }
        true
    }

    fn rect(&self, node: NodeId) -> Rect {
        self.node(node).map(|n| n.rect).unwrap_or_default()
    }

    fn scroll_width(&self, node: NodeId) -> f64 {
        self.node(node).map_or(0.0, |n| n.scroll_width)
    }

    fn active_element(&self) -> Option<NodeId> {
        self.focused
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn location(&self) -> Location {
        self.location.clone()
    }

    fn current_year(&self) -> i32 {
        self.year
    }

    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    fn load(&self, key: &str) -> Option<String> {
        self.stored(key)
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        Ok(self.alloc(tag))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.checked_mut(parent)?;
        self.checked_mut(child)?;
        self.attach(parent, child);
        Ok(())
    }

    fn detach(&mut self, node: NodeId) -> Result<(), DomError> {
        self.checked_mut(node)?;
        self.unlink(node);
        Ok(())
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        let n = self.checked_mut(node)?;
        if !n.classes.iter().any(|c| c == class) {
            n.classes.push(class.to_owned());
        }
        Ok(())
    }

    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        self.checked_mut(node)?.classes.retain(|c| c != class);
        Ok(())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.checked_mut(node)?
            .attributes
            .insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DomError> {
        self.checked_mut(node)?.attributes.remove(name);
        Ok(())
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<(), DomError> {
        let n = self.checked_mut(node)?;
        if value.is_empty() {
            n.style.remove(property);
        } else {
            n.style.insert(property.to_owned(), value.to_owned());
        }
        Ok(())
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), DomError> {
        self.checked_mut(node)?.text = text.to_owned();
        Ok(())
    }

    fn set_html(&mut self, node: NodeId, html: &str) -> Result<(), DomError> {
        self.checked_mut(node)?.html = html.to_owned();
        Ok(())
    }

    fn clear_children(&mut self, node: NodeId) -> Result<(), DomError> {
        let children = std::mem::take(&mut self.checked_mut(node)?.children);
        for child in children {
            if let Some(c) = self.node_mut(child) {
                c.parent = None;
            }
        }
        Ok(())
    }

    fn focus(&mut self, node: NodeId) -> Result<(), DomError> {
        self.checked_mut(node)?;
        self.focused = Some(node);
        Ok(())
    }

    fn scroll_into_view(&mut self, node: NodeId) -> Result<(), DomError> {
        self.checked_mut(node)?;
        self.scrolled_to.push(node);
        Ok(())
    }

    fn observe(&mut self, kind: ObserverKind, node: NodeId) -> Result<(), DomError> {
        self.checked_mut(node)?;
        self.observed.insert((kind, node));
        Ok(())
    }

    fn unobserve(&mut self, kind: ObserverKind, node: NodeId) -> Result<(), DomError> {
        self.observed.remove(&(kind, node));
        Ok(())
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), DomError> {
        let storage = self.storage.as_mut().ok_or(DomError::StorageUnavailable)?;
        storage.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn reset_form(&mut self, node: NodeId) -> Result<(), DomError> {
        self.checked_mut(node)?;
        self.form_resets.push(node);
        Ok(())
    }

    fn notify(&mut self, message: &str) -> Result<(), DomError> {
        self.notices.push(message.to_owned());
        Ok(())
    }
}
