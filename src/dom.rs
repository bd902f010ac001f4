//! Capability interface over the page: lookup, geometry, mutation, observation.
//!
//! DESIGN
//! ======
//! Feature modules never touch `web-sys` directly. They read the page through
//! the query half of [`Dom`] and describe changes as
//! [`Command`](crate::command::Command)s, which the runtime applies through the
//! mutation half. Elements are referred to by opaque [`NodeId`] handles that
//! the host keeps stable for the page's lifetime.

use crate::consts::{REVEAL_THRESHOLD, SCROLL_SPY_THRESHOLD};

#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

/// Opaque handle to an element owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// A simple selector understood by every host.
///
/// Compound selectors are composed by callers (e.g. filter `find_within`
/// results), which keeps in-memory hosts trivial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// `#id`
    Id(&'a str),
    /// `.class`
    Class(&'a str),
    /// `tag` (lowercase)
    Tag(&'a str),
    /// `[attr]`
    Attr(&'a str),
}

impl Selector<'_> {
    /// CSS text for this selector.
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Id(id) => format!("#{id}"),
            Self::Class(class) => format!(".{class}"),
            Self::Tag(tag) => (*tag).to_owned(),
            Self::Attr(attr) => format!("[{attr}]"),
        }
    }
}

/// Viewport-relative element box, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Path and fragment of the current page URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// e.g. `/portfolio/experience.html`
    pub pathname: String,
    /// e.g. `#about`, or empty.
    pub hash: String,
}

impl Location {
    #[must_use]
    pub fn new(pathname: impl Into<String>, hash: impl Into<String>) -> Self {
        Self { pathname: pathname.into(), hash: hash.into() }
    }
}

/// Which visibility observer an element is registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObserverKind {
    /// Reveal-on-scroll targets.
    Reveal,
    /// Home-page sections driving the active nav link.
    ScrollSpy,
}

impl ObserverKind {
    /// Intersection ratio at which this observer fires.
    #[must_use]
    pub fn threshold(self) -> f64 {
        match self {
            Self::Reveal => REVEAL_THRESHOLD,
            Self::ScrollSpy => SCROLL_SPY_THRESHOLD,
        }
    }
}

/// One entry of a visibility-change batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub node: NodeId,
    pub is_intersecting: bool,
    pub ratio: f64,
    /// Top of the element's box relative to the viewport.
    pub top: f64,
}

/// Errors reported by host mutations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DomError {
    #[error("host call failed: {0}")]
    Js(String),
    #[error("local storage unavailable")]
    StorageUnavailable,
    #[error("unknown node: {0:?}")]
    UnknownNode(NodeId),
}

/// Everything the interactivity layer needs from the page.
///
/// Queries only see elements attached to the document; nodes created with
/// [`Dom::create_element`] stay invisible to them until appended.
pub trait Dom {
    // --- Lookup ---

    /// First attached element matching `selector`, in document order.
    fn find(&self, selector: Selector<'_>) -> Option<NodeId>;

    /// All attached elements matching `selector`, in document order.
    fn find_all(&self, selector: Selector<'_>) -> Vec<NodeId>;

    /// Descendants of `root` (excluding `root`) matching `selector`.
    fn find_within(&self, root: NodeId, selector: Selector<'_>) -> Vec<NodeId>;

    /// All descendants of `root`, in document order.
    fn descendants(&self, root: NodeId) -> Vec<NodeId>;

    /// Direct element children of `node`.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn body(&self) -> Option<NodeId>;

    // --- Element state ---

    /// Lowercase tag name.
    fn tag_name(&self, node: NodeId) -> String;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn text(&self, node: NodeId) -> Option<String>;

    /// Whether the element takes part in layout (has an offset parent).
    fn is_rendered(&self, node: NodeId) -> bool;

    fn rect(&self, node: NodeId) -> Rect;

    fn scroll_width(&self, node: NodeId) -> f64;

    fn active_element(&self) -> Option<NodeId>;

    // --- Environment ---

    fn viewport_width(&self) -> f64;

    fn location(&self) -> Location;

    fn current_year(&self) -> i32;

    /// Whether the OS/browser asks for a dark color scheme.
    fn prefers_dark(&self) -> bool;

    /// Read a value from origin-scoped local storage.
    fn load(&self, key: &str) -> Option<String>;

    // --- Mutation ---

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError>;

    /// Append `child` to `parent`, moving it if already attached elsewhere.
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError>;

    /// Remove `node` from its parent; the handle stays valid.
    fn detach(&mut self, node: NodeId) -> Result<(), DomError>;

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError>;

    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError>;

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DomError>;

    /// Set an inline style property; an empty value removes it.
    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<(), DomError>;

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), DomError>;

    fn set_html(&mut self, node: NodeId, html: &str) -> Result<(), DomError>;

    fn clear_children(&mut self, node: NodeId) -> Result<(), DomError>;

    fn focus(&mut self, node: NodeId) -> Result<(), DomError>;

    /// Smoothly scroll `node` to the top of the viewport.
    fn scroll_into_view(&mut self, node: NodeId) -> Result<(), DomError>;

    fn observe(&mut self, kind: ObserverKind, node: NodeId) -> Result<(), DomError>;

    fn unobserve(&mut self, kind: ObserverKind, node: NodeId) -> Result<(), DomError>;

    /// Write a value to origin-scoped local storage.
    fn store(&mut self, key: &str, value: &str) -> Result<(), DomError>;

    fn reset_form(&mut self, node: NodeId) -> Result<(), DomError>;

    /// Show a blocking notice to the user.
    fn notify(&mut self, message: &str) -> Result<(), DomError>;
}
