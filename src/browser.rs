//! `web-sys` host: the real-page [`Dom`], event wiring, and the WASM entry.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`start`] runs once when the module loads. It installs the panic hook and
//! console logger, reads the optional embedded config, boots a
//! [`Runtime<WebDom>`], then attaches listeners that translate browser events
//! into [`Event`]s. Each timer the runtime arms becomes a `gloo-timers`
//! timeout that advances the runtime clock to `Date.now()`.
//!
//! The runtime is shared as `Rc<RefCell<..>>` between listeners, observer
//! callbacks, and timeouts. A callback that finds it already borrowed drops
//! its event with a debug log instead of panicking.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use js_sys::{Array, Date, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{
    Document, Element, EventTarget, HtmlElement, HtmlFormElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use crate::app::{Event, Key};
use crate::config::{CONFIG_ELEMENT_ID, SiteConfig};
use crate::dom::{Dom, DomError, Intersection, Location, NodeId, ObserverKind, Rect, Selector};
use crate::runtime::{Outcome, Runtime};

/// Expando property carrying an element's [`NodeId`].
const NODE_ID_PROPERTY: &str = "__folioNodeId";

type Shared = Rc<RefCell<Runtime<WebDom>>>;

fn js_error(value: &JsValue) -> DomError {
    DomError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

// =============================================================
// WebDom
// =============================================================

/// [`Dom`] over the live document.
///
/// Elements get a [`NodeId`] the first time a query returns them; the id is
/// stored on the element itself so later lookups are constant time.
pub struct WebDom {
    window: Window,
    document: Document,
    nodes: RefCell<Vec<Element>>,
    observers: BTreeMap<ObserverKind, IntersectionObserver>,
}

impl WebDom {
    #[must_use]
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document, nodes: RefCell::new(Vec::new()), observers: BTreeMap::new() }
    }

    /// Register the observer backing `kind`.
    pub fn set_observer(&mut self, kind: ObserverKind, observer: IntersectionObserver) {
        self.observers.insert(kind, observer);
    }

    /// The element behind `id`, if it was handed out by this host.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<Element> {
        self.nodes.borrow().get(id.0 as usize).cloned()
    }

    /// Handle for `element`, registering it on first sight.
    pub fn id_of(&self, element: &Element) -> NodeId {
        if let Some(id) = Self::stored_id(element) {
            if self.nodes.borrow().get(id.0 as usize).is_some_and(|known| known == element) {
                return id;
            }
        }
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(u32::try_from(nodes.len()).unwrap_or(u32::MAX));
        nodes.push(element.clone());
        let tag = JsValue::from_str(&id.0.to_string());
        if let Err(e) = Reflect::set(element, &JsValue::from_str(NODE_ID_PROPERTY), &tag) {
            log::debug!("browser: could not tag element: {e:?}");
        }
        id
    }

    fn stored_id(element: &Element) -> Option<NodeId> {
        let value = match Reflect::get(element, &JsValue::from_str(NODE_ID_PROPERTY)) {
            Ok(value) => value,
            Err(_) => return None,
        };
        match value.as_string()?.parse::<u32>() {
            Ok(raw) => Some(NodeId(raw)),
            Err(_) => None,
        }
    }

    fn get(&self, id: NodeId) -> Result<Element, DomError> {
        self.element(id).ok_or(DomError::UnknownNode(id))
    }

    fn html(&self, id: NodeId) -> Result<HtmlElement, DomError> {
        self.get(id)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| DomError::Js(format!("{id:?} is not an HTML element")))
    }

    fn collect(&self, list: &web_sys::NodeList) -> Vec<NodeId> {
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| match node.dyn_into::<Element>() {
                Ok(element) => Some(self.id_of(&element)),
                Err(_) => None,
            })
            .collect()
    }

    fn select_all(&self, root: Option<&Element>, css: &str) -> Vec<NodeId> {
        let list = match root {
            Some(root) => root.query_selector_all(css),
            None => self.document.query_selector_all(css),
        };
        match list {
            Ok(list) => self.collect(&list),
            Err(e) => {
                log::debug!("browser: bad selector '{css}': {e:?}");
                Vec::new()
            }
        }
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        match self.window.local_storage() {
            Ok(storage) => storage,
            Err(_) => None,
        }
    }

    fn observer(&self, kind: ObserverKind) -> Result<&IntersectionObserver, DomError> {
        self.observers
            .get(&kind)
            .ok_or_else(|| DomError::Js(format!("no {kind:?} observer")))
    }
}

impl Dom for WebDom {
    fn find(&self, selector: Selector<'_>) -> Option<NodeId> {
        match self.document.query_selector(&selector.to_css()) {
            Ok(Some(element)) => Some(self.id_of(&element)),
            _ => None,
        }
    }

    fn find_all(&self, selector: Selector<'_>) -> Vec<NodeId> {
        self.select_all(None, &selector.to_css())
    }

    fn find_within(&self, root: NodeId, selector: Selector<'_>) -> Vec<NodeId> {
        match self.element(root) {
            Some(root) => self.select_all(Some(&root), &selector.to_css()),
            None => Vec::new(),
        }
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        match self.element(root) {
            Some(root) => self.select_all(Some(&root), "*"),
            None => Vec::new(),
        }
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        let Some(element) = self.element(node) else {
            return Vec::new();
        };
        let children = element.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .map(|child| self.id_of(&child))
            .collect()
    }

    fn body(&self) -> Option<NodeId> {
        self.document.body().map(|body| self.id_of(&body))
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.element(node)
            .map(|e| e.tag_name().to_ascii_lowercase())
            .unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|e| e.class_list().contains(class))
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.element(node)?.text_content()
    }

    fn is_rendered(&self, node: NodeId) -> bool {
        match self.element(node).map(|e| e.dyn_into::<HtmlElement>()) {
            Some(Ok(html)) => html.offset_parent().is_some(),
            _ => false,
        }
    }

    fn rect(&self, node: NodeId) -> Rect {
        self.element(node).map_or_else(Rect::default, |e| {
            let r = e.get_bounding_client_rect();
            Rect::new(r.left(), r.top(), r.width(), r.height())
        })
    }

    fn scroll_width(&self, node: NodeId) -> f64 {
        self.element(node).map_or(0.0, |e| f64::from(e.scroll_width()))
    }

    fn active_element(&self) -> Option<NodeId> {
        self.document.active_element().map(|e| self.id_of(&e))
    }

    fn viewport_width(&self) -> f64 {
        match self.window.inner_width() {
            Ok(width) => width.as_f64().unwrap_or_default(),
            Err(_) => 0.0,
        }
    }

    fn location(&self) -> Location {
        let location = self.window.location();
        Location::new(location.pathname().unwrap_or_default(), location.hash().unwrap_or_default())
    }

    fn current_year(&self) -> i32 {
        i32::try_from(Date::new_0().get_full_year()).unwrap_or_default()
    }

    fn prefers_dark(&self) -> bool {
        match self.window.match_media("(prefers-color-scheme: dark)") {
            Ok(Some(query)) => query.matches(),
            _ => false,
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        match self.storage()?.get_item(key) {
            Ok(value) => value,
            Err(_) => None,
        }
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        let element = self.document.create_element(tag).map_err(|e| js_error(&e))?;
        Ok(self.id_of(&element))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let (parent, child) = (self.get(parent)?, self.get(child)?);
        parent.append_child(&child).map_err(|e| js_error(&e))?;
        Ok(())
    }

    fn detach(&mut self, node: NodeId) -> Result<(), DomError> {
        self.get(node)?.remove();
        Ok(())
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        self.get(node)?.class_list().add_1(class).map_err(|e| js_error(&e))
    }

    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        self.get(node)?.class_list().remove_1(class).map_err(|e| js_error(&e))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.get(node)?.set_attribute(name, value).map_err(|e| js_error(&e))
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DomError> {
        self.get(node)?.remove_attribute(name).map_err(|e| js_error(&e))
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<(), DomError> {
        let style = self.html(node)?.style();
        if value.is_empty() {
            style.remove_property(property).map_err(|e| js_error(&e))?;
            Ok(())
        } else {
            style.set_property(property, value).map_err(|e| js_error(&e))
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), DomError> {
        self.get(node)?.set_text_content(Some(text));
        Ok(())
    }

    fn set_html(&mut self, node: NodeId, html: &str) -> Result<(), DomError> {
        self.get(node)?.set_inner_html(html);
        Ok(())
    }

    fn clear_children(&mut self, node: NodeId) -> Result<(), DomError> {
        let element = self.get(node)?;
        while let Some(child) = element.first_child() {
            element.remove_child(&child).map_err(|e| js_error(&e))?;
        }
        Ok(())
    }

    fn focus(&mut self, node: NodeId) -> Result<(), DomError> {
        self.html(node)?.focus().map_err(|e| js_error(&e))
    }

    fn scroll_into_view(&mut self, node: NodeId) -> Result<(), DomError> {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        self.get(node)?.scroll_into_view_with_scroll_into_view_options(&options);
        Ok(())
    }

    fn observe(&mut self, kind: ObserverKind, node: NodeId) -> Result<(), DomError> {
        let element = self.get(node)?;
        self.observer(kind)?.observe(&element);
        Ok(())
    }

    fn unobserve(&mut self, kind: ObserverKind, node: NodeId) -> Result<(), DomError> {
        let element = self.get(node)?;
        self.observer(kind)?.unobserve(&element);
        Ok(())
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), DomError> {
        let storage = self.storage().ok_or(DomError::StorageUnavailable)?;
        storage.set_item(key, value).map_err(|_| DomError::StorageUnavailable)
    }

    fn reset_form(&mut self, node: NodeId) -> Result<(), DomError> {
        let form = self
            .get(node)?
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| DomError::Js(format!("{node:?} is not a form")))?;
        form.reset();
        Ok(())
    }

    fn notify(&mut self, message: &str) -> Result<(), DomError> {
        self.window.alert_with_message(message).map_err(|e| js_error(&e))
    }
}

// =============================================================
// Entry and wiring
// =============================================================

/// WASM entry point.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Warn };
    if let Err(e) = console_log::init_with_level(level) {
        log::debug!("browser: logger already installed: {e}");
    }

    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let config = load_config(&document);
    let dom = WebDom::new(window.clone(), document.clone());
    let shared: Shared = Rc::new(RefCell::new(Runtime::starting_at(dom, config, Date::now())));

    for kind in [ObserverKind::Reveal, ObserverKind::ScrollSpy] {
        match create_observer(&shared, kind) {
            Ok(observer) => shared.borrow_mut().dom_mut().set_observer(kind, observer),
            Err(e) => log::warn!("browser: {kind:?} observer unavailable: {e}"),
        }
    }

    let outcome = shared.borrow_mut().boot();
    arm_timers(&shared, &outcome);
    wire(&shared, &window, &document);
}

fn load_config(document: &Document) -> SiteConfig {
    let Some(raw) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        return SiteConfig::default();
    };
    match SiteConfig::from_json(&raw) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("browser: ignoring #{CONFIG_ELEMENT_ID}: {e}");
            SiteConfig::default()
        }
    }
}

fn create_observer(shared: &Shared, kind: ObserverKind) -> Result<IntersectionObserver, DomError> {
    let shared_for_cb = Rc::clone(shared);
    let callback = Closure::wrap(Box::new(move |entries: Array, _observer: IntersectionObserver| {
        dispatch(&shared_for_cb, |dom| {
            let entries = entries
                .iter()
                .filter_map(|value| match value.dyn_into::<IntersectionObserverEntry>() {
                    Ok(entry) => Some(Intersection {
                        node: dom.id_of(&entry.target()),
                        is_intersecting: entry.is_intersecting(),
                        ratio: entry.intersection_ratio(),
                        top: entry.bounding_client_rect().top(),
                    }),
                    Err(_) => None,
                })
                .collect();
            Some(Event::Intersected { kind, entries })
        });
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(kind.threshold()));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
        .map_err(|e| js_error(&e))?;
    callback.forget();
    Ok(observer)
}

/// Run one event through the runtime and arm whatever timers it produced.
fn dispatch(shared: &Shared, make: impl FnOnce(&WebDom) -> Option<Event>) -> Outcome {
    let outcome = match shared.try_borrow_mut() {
        Ok(mut runtime) => {
            let mut outcome = runtime.advance_to(Date::now());
            if let Some(event) = make(runtime.dom()) {
                let handled = runtime.handle(event);
                outcome.prevent_default = handled.prevent_default;
                outcome.timers.extend(handled.timers);
            }
            outcome
        }
        Err(_) => {
            log::debug!("browser: runtime busy; event dropped");
            return Outcome::default();
        }
    };
    arm_timers(shared, &outcome);
    outcome
}

fn arm_timers(shared: &Shared, outcome: &Outcome) {
    for &delay in &outcome.timers {
        let shared = Rc::clone(shared);
        Timeout::new(delay, move || tick(&shared)).forget();
    }
}

fn tick(shared: &Shared) {
    let outcome = match shared.try_borrow_mut() {
        Ok(mut runtime) => runtime.advance_to(Date::now()),
        Err(_) => {
            log::debug!("browser: runtime busy; retrying timer");
            let retry = Rc::clone(shared);
            Timeout::new(0, move || tick(&retry)).forget();
            return;
        }
    };
    arm_timers(shared, &outcome);
}

/// Attach `make` to `kind` events on `target`.
fn listen<F>(shared: &Shared, target: &EventTarget, kind: &str, make: F)
where
    F: Fn(&WebDom, &web_sys::Event) -> Option<Event> + 'static,
{
    let shared = Rc::clone(shared);
    let callback = Closure::wrap(Box::new(move |event: web_sys::Event| {
        let outcome = dispatch(&shared, |dom| make(dom, &event));
        if outcome.prevent_default {
            event.prevent_default();
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    if let Err(e) = target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref()) {
        log::warn!("browser: could not listen for {kind}: {e:?}");
    }
    callback.forget();
}

/// Attach `make` to `kind` events on the element behind each id.
fn listen_each<F>(shared: &Shared, nodes: &[NodeId], kind: &str, make: F)
where
    F: Fn(NodeId, &web_sys::Event) -> Option<Event> + Clone + 'static,
{
    for &node in nodes {
        let Some(element) = shared.borrow().dom().element(node) else {
            continue;
        };
        let make = make.clone();
        listen(shared, &element, kind, move |_, event| make(node, event));
    }
}

fn key_of(event: &web_sys::Event) -> Option<(Key, bool)> {
    event
        .dyn_ref::<KeyboardEvent>()
        .map(|k| (Key::from(k.key().as_str()), k.shift_key()))
}

fn wire(shared: &Shared, window: &Window, document: &Document) {
    let state = shared.borrow().state().clone();

    if let Some(button) = state.theme.button {
        listen_each(shared, &[button], "click", |_, _| Some(Event::ThemeToggled));
    }

    if let Some(nav) = &state.nav {
        listen_each(shared, &[nav.toggle], "click", |_, _| Some(Event::NavToggled));
        listen_each(shared, &[nav.overlay], "click", |_, _| Some(Event::OverlayClicked));
        let links: Vec<NodeId> = nav.links.iter().map(|l| l.node).collect();
        listen_each(shared, &links, "click", |link, _| Some(Event::NavLinkClicked { link }));
    }

    listen_each(shared, &state.page.anchors, "click", |anchor, _| Some(Event::AnchorClicked { anchor }));
    listen_each(shared, &state.page.case_triggers, "click", |trigger, _| {
        Some(Event::CaseOpenClicked { trigger })
    });
    listen_each(shared, &state.page.project_cards, "keydown", |card, event| {
        key_of(event).map(|(key, _)| Event::ProjectKeyDown { card, key })
    });
    if let Some(form) = state.page.contact_form {
        listen_each(shared, &[form], "submit", |_, _| Some(Event::ContactSubmitted));
    }

    listen(shared, window, "resize", |dom, _| Some(Event::Resized { width: dom.viewport_width() }));
    listen(shared, document, "click", |dom, event| {
        match event.target()?.dyn_into::<Element>() {
            Ok(target) => Some(Event::DocumentClicked { target: dom.id_of(&target) }),
            Err(_) => None,
        }
    });
    listen(shared, document, "keydown", |_, event| {
        key_of(event).map(|(key, shift)| Event::KeyDown { key, shift })
    });
}
