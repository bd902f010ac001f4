//! Navigation menu: construction, mobile flyout, active link, scroll-spy.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages ship a `.nav` container that is either empty, holds bare anchors, or
//! already holds a structured `.nav-list`. [`mount`] normalizes all three into
//! one `ul.nav-list`, injects the mobile toggle, and returns a [`NavState`]
//! that the remaining handlers drive through commands.
//!
//! The mobile menu is a two-state machine. Opening attaches a full-viewport
//! overlay and pins the list under the header with explicit geometry; closing
//! detaches the overlay and clears that geometry so the stylesheet takes over.

use crate::app::Event;
use crate::command::{Command, Effects, Task};
use crate::config::SiteConfig;
use crate::consts::{
    LINK_ACTIVATION_DELAY_MS, MENU_FALLBACK_WIDTH_PX, MENU_HEADER_OFFSET_PX, MENU_MAX_WIDTH_PX,
    MENU_VIEWPORT_PADDING_PX, NAV_BREAKPOINT_PX,
};
use crate::dom::{Dom, DomError, Intersection, Location, NodeId, ObserverKind, Selector};
use crate::reveal::crossed;

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

const NAV_CLASS: &str = "nav";
const HEADER_CLASS: &str = "site-header";
const LIST_CLASS: &str = "nav-list";
const TOGGLE_CLASS: &str = "nav-toggle";
const OVERLAY_CLASS: &str = "nav-overlay";
const OPEN_CLASS: &str = "open";
const ACTIVE_CLASS: &str = "active";
const HOME_FILE: &str = "index.html";

/// Inline properties set on the flyout while open.
const MENU_STYLE_PROPERTIES: [&str; 6] = ["position", "top", "left", "right", "width", "max-width"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub node: NodeId,
    pub href: String,
}

/// A home-page section tracked by the scroll-spy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpySection {
    pub node: NodeId,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub nav: NodeId,
    pub header: Option<NodeId>,
    pub toggle: NodeId,
    pub list: NodeId,
    /// Dismissal overlay; attached to the body only while open.
    pub overlay: NodeId,
    pub links: Vec<NavLink>,
    pub is_open: bool,
    pub active_href: Option<String>,
    /// Empty unless this page is the home page.
    pub sections: Vec<SpySection>,
}

// =============================================================
// Construction
// =============================================================

/// Build (or adopt) the menu, inject the toggle, and compute the initial
/// active link. Returns `None` when the page has no `.nav` container.
///
/// Running this twice leaves a single `.nav-list` and a single toggle.
///
/// # Errors
///
/// Propagates host failures while creating or moving elements.
pub fn mount<D: Dom>(
    dom: &mut D,
    config: &SiteConfig,
    theme_button: Option<NodeId>,
) -> Result<Option<(NavState, Effects)>, DomError> {
    let Some(nav) = dom.find(Selector::Class(NAV_CLASS)) else {
        log::debug!("nav: no .{NAV_CLASS} container; skipping");
        return Ok(None);
    };
    let header = dom.find(Selector::Class(HEADER_CLASS));

    let toggle = match dom.find(Selector::Class(TOGGLE_CLASS)) {
        Some(toggle) => toggle,
        None => create_toggle(dom, header.unwrap_or(nav), config)?,
    };

    let list = match dom.find_within(nav, Selector::Class(LIST_CLASS)).first() {
        Some(&list) => list,
        None => build_list(dom, nav, config)?,
    };

    if let (Some(header), Some(button)) = (header, theme_button) {
        dom.append_child(header, button)?;
        dom.set_attribute(button, "tabindex", "0")?;
    }

    let overlay = dom.create_element("div")?;
    dom.add_class(overlay, OVERLAY_CLASS)?;

    let links = dom
        .find_within(nav, Selector::Tag("a"))
        .into_iter()
        .map(|node| NavLink { node, href: dom.attribute(node, "href").unwrap_or_default() })
        .collect::<Vec<_>>();

    let location = dom.location();
    let sections = if is_home(&location.pathname) { spy_sections(dom) } else { Vec::new() };

    let mut state = NavState {
        nav,
        header,
        toggle,
        list,
        overlay,
        links,
        is_open: false,
        active_href: None,
        sections,
    };

    let mut effects = Effects::new();
    for section in &state.sections {
        effects.push(Command::Observe { kind: ObserverKind::ScrollSpy, node: section.node });
    }
    let target = initial_target(&location, &state.links);
    effects.extend(set_active(&mut state, &target));
    log::debug!("nav: mounted with {} links, {} spy sections", state.links.len(), state.sections.len());
    Ok(Some((state, effects)))
}

fn create_toggle<D: Dom>(dom: &mut D, host: NodeId, config: &SiteConfig) -> Result<NodeId, DomError> {
    let button = dom.create_element("button")?;
    dom.add_class(button, TOGGLE_CLASS)?;
    dom.set_attribute(button, "type", "button")?;
    dom.set_attribute(button, "aria-expanded", "false")?;
    dom.set_attribute(button, "aria-label", &config.labels.nav_toggle)?;
    dom.set_text(button, "☰")?;
    dom.append_child(host, button)?;
    Ok(button)
}

/// Wrap bare anchors into a list, or synthesize one from the nav table.
fn build_list<D: Dom>(dom: &mut D, nav: NodeId, config: &SiteConfig) -> Result<NodeId, DomError> {
    let list = dom.create_element("ul")?;
    dom.add_class(list, LIST_CLASS)?;

    let anchors: Vec<NodeId> = dom
        .children(nav)
        .into_iter()
        .filter(|&child| dom.tag_name(child) == "a")
        .collect();

    if anchors.is_empty() {
        for item in &config.nav_items {
            let anchor = dom.create_element("a")?;
            dom.set_attribute(anchor, "href", &item.href)?;
            dom.set_attribute(anchor, "role", "link")?;
            dom.set_text(anchor, &item.label)?;
            let li = dom.create_element("li")?;
            dom.append_child(li, anchor)?;
            dom.append_child(list, li)?;
        }
    } else {
        for anchor in anchors {
            let li = dom.create_element("li")?;
            dom.append_child(li, anchor)?;
            dom.append_child(list, li)?;
        }
    }

    dom.append_child(nav, list)?;
    Ok(list)
}

fn spy_sections<D: Dom>(dom: &D) -> Vec<SpySection> {
    dom.find_all(Selector::Tag("main"))
        .into_iter()
        .flat_map(|main| dom.find_within(main, Selector::Tag("section")))
        .filter_map(|node| {
            let id = dom.attribute(node, "id")?;
            (!id.is_empty()).then_some(SpySection { node, id })
        })
        .collect()
}

// =============================================================
// Mobile menu
// =============================================================

/// Explicit flyout placement, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuGeometry {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub max_width: f64,
}

impl MenuGeometry {
    /// Anchor the menu's right edge to the toggle, below the header, clamped
    /// inside the viewport padding.
    #[must_use]
    pub fn compute(viewport_width: f64, toggle_right: f64, header_bottom: f64, content_width: f64) -> Self {
        let pad = MENU_VIEWPORT_PADDING_PX;
        let max_width = MENU_MAX_WIDTH_PX.min(viewport_width - pad * 2.0).max(0.0);
        let natural = if content_width > 0.0 { content_width } else { MENU_FALLBACK_WIDTH_PX };
        let width = natural.min(max_width);

        let mut left = (toggle_right - width).round();
        if left < pad {
            left = pad;
        }
        if left + width > viewport_width - pad {
            left = viewport_width - width - pad;
        }

        Self { top: header_bottom.round() + MENU_HEADER_OFFSET_PX, left, width, max_width }
    }
}

fn position<D: Dom>(dom: &D, state: &NavState) -> Vec<Command> {
    let header_bottom = dom.rect(state.header.unwrap_or(state.nav)).bottom();
    let geometry = MenuGeometry::compute(
        dom.viewport_width(),
        dom.rect(state.toggle).right(),
        header_bottom,
        dom.scroll_width(state.list),
    );
    let node = state.list;
    vec![
        Command::SetStyle { node, property: "position", value: "fixed".into() },
        Command::SetStyle { node, property: "top", value: format!("{}px", geometry.top) },
        Command::SetStyle { node, property: "left", value: format!("{}px", geometry.left) },
        Command::SetStyle { node, property: "right", value: "auto".into() },
        Command::SetStyle { node, property: "width", value: format!("{}px", geometry.width) },
        Command::SetStyle { node, property: "max-width", value: format!("{}px", geometry.max_width) },
    ]
}

fn reset_position(state: &NavState) -> Vec<Command> {
    MENU_STYLE_PROPERTIES
        .iter()
        .map(|&property| Command::SetStyle { node: state.list, property, value: String::new() })
        .collect()
}

/// closed → open. No-op when already open.
pub fn open<D: Dom>(dom: &D, state: &mut NavState) -> Effects {
    if state.is_open {
        return Effects::new();
    }
    state.is_open = true;
    let mut effects = Effects::new();
    effects.push(Command::AddClass { node: state.nav, class: OPEN_CLASS });
    effects.push(Command::SetAttribute { node: state.toggle, name: "aria-expanded", value: "true".into() });
    if let Some(body) = dom.body() {
        effects.push(Command::Append { parent: body, child: state.overlay });
    }
    effects.commands.extend(position(dom, state));
    effects
}

/// open → closed. No-op when already closed.
pub fn close(state: &mut NavState) -> Effects {
    if !state.is_open {
        return Effects::new();
    }
    state.is_open = false;
    let mut effects = Effects::new();
    effects.push(Command::RemoveClass { node: state.nav, class: OPEN_CLASS });
    effects.push(Command::SetAttribute { node: state.toggle, name: "aria-expanded", value: "false".into() });
    effects.push(Command::Detach { node: state.overlay });
    effects.commands.extend(reset_position(state));
    effects
}

/// Toggle button click.
pub fn toggle<D: Dom>(dom: &D, state: &mut NavState) -> Effects {
    if state.is_open { close(state) } else { open(dom, state) }
}

/// Viewport resize: wide forces closed, narrow-and-open repositions.
pub fn on_resize<D: Dom>(dom: &D, state: &mut NavState, width: f64) -> Effects {
    if width > NAV_BREAKPOINT_PX {
        close(state)
    } else if state.is_open {
        Effects::from_commands(position(dom, state))
    } else {
        Effects::new()
    }
}

/// A menu link was clicked: close, scroll same-page targets, and re-evaluate
/// the active link shortly after.
pub fn on_link_click<D: Dom>(dom: &D, state: &mut NavState, link: NodeId) -> Effects {
    let mut effects = close(state);
    let Some(href) = state.links.iter().find(|l| l.node == link).map(|l| l.href.clone()) else {
        return effects;
    };
    if let Some(id) = href.strip_prefix('#').filter(|id| !id.is_empty()) {
        effects.push(Command::PreventDefault);
        if let Some(target) = dom.find(Selector::Id(id)) {
            effects.push(Command::ScrollIntoView { node: target });
        }
    }
    effects.after(LINK_ACTIVATION_DELAY_MS, Task::Dispatch(Event::LinkActivationDue { href }));
    effects
}

// =============================================================
// Active link
// =============================================================

/// Filename part of an href: hash and directories stripped, empty → `index.html`.
#[must_use]
pub fn file_name(href: &str) -> &str {
    let path = href.split('#').next().unwrap_or_default();
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => HOME_FILE,
    }
}

/// Whether `pathname` addresses the home page.
#[must_use]
pub fn is_home(pathname: &str) -> bool {
    pathname.is_empty() || pathname.ends_with('/') || pathname.ends_with(HOME_FILE)
}

/// Index of the link matching `target`: exact href, then bare hash, then
/// filename. First match wins.
#[must_use]
pub fn resolve_active(links: &[NavLink], target: &str) -> Option<usize> {
    if let Some(i) = links.iter().position(|l| l.href == target) {
        return Some(i);
    }
    if let Some(pos) = target.find('#').filter(|&pos| pos + 1 < target.len()) {
        let hash = &target[pos..];
        if let Some(i) = links.iter().position(|l| l.href == hash) {
            return Some(i);
        }
    }
    let name = file_name(target);
    links.iter().position(|l| file_name(&l.href) == name)
}

/// Activation target on load: the location hash on the home page, otherwise
/// the current filename, falling back to the home page.
#[must_use]
pub fn initial_target(location: &Location, links: &[NavLink]) -> String {
    let current = file_name(&location.pathname);
    if current == HOME_FILE && location.hash.len() > 1 {
        return location.hash.clone();
    }
    if resolve_active(links, current).is_some() {
        current.to_owned()
    } else {
        HOME_FILE.to_owned()
    }
}

fn mark_active(state: &mut NavState, active: Option<usize>) -> Effects {
    state.active_href = active.map(|i| state.links[i].href.clone());
    let mut effects = Effects::new();
    for (i, link) in state.links.iter().enumerate() {
        let node = link.node;
        if Some(i) == active {
            effects.push(Command::AddClass { node, class: ACTIVE_CLASS });
            effects.push(Command::SetAttribute { node, name: "aria-current", value: "page".into() });
        } else {
            effects.push(Command::RemoveClass { node, class: ACTIVE_CLASS });
            effects.push(Command::RemoveAttribute { node, name: "aria-current" });
        }
    }
    effects
}

/// Highlight the link matching `target` (path-like or `#hash`), clearing all
/// others.
pub fn set_active(state: &mut NavState, target: &str) -> Effects {
    let active = resolve_active(&state.links, target);
    mark_active(state, active)
}

/// Scroll-spy batch: the last crossing section in the batch takes the active
/// link; a section without a matching link clears the highlight.
pub fn on_spy(state: &mut NavState, entries: &[Intersection]) -> Effects {
    let threshold = ObserverKind::ScrollSpy.threshold();
    let Some(section) = entries
        .iter()
        .rev()
        .filter(|e| crossed(e, threshold))
        .find_map(|e| state.sections.iter().find(|s| s.node == e.node))
    else {
        return Effects::new();
    };
    let hash = format!("#{}", section.id);
    let active = state.links.iter().position(|l| l.href == hash);
    mark_active(state, active)
}
