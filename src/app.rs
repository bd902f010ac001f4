//! Application core: per-feature state, the event set, mount and dispatch.
//!
//! ARCHITECTURE
//! ============
//! [`AppState`] holds one slice per feature. Optional features (nav, modal)
//! are `None` when the page lacks their markup, and every event routed to a
//! missing feature is dropped. [`mount`] runs once at page load; [`update`]
//! dispatches one [`Event`] to the feature that owns it and returns the
//! resulting [`Effects`]. Neither mutates the page outside of mount's
//! structural setup; the runtime applies what they return.

use crate::command::Effects;
use crate::config::SiteConfig;
use crate::dom::{Dom, Intersection, NodeId, ObserverKind};
use crate::modal::{self, ModalState};
use crate::nav::{self, NavState};
use crate::page::{self, PageState};
use crate::reveal::{self, RevealState};
use crate::theme::{self, ThemeState};

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

/// Keys the handlers care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Escape,
    Enter,
    Other,
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        match key {
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            _ => Self::Other,
        }
    }
}

/// Everything that can happen to the page after load.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Theme button clicked.
    ThemeToggled,
    /// A visibility observer delivered a batch.
    Intersected { kind: ObserverKind, entries: Vec<Intersection> },
    /// A staggered reveal timer fired.
    RevealDue { node: NodeId },
    /// Mobile menu toggle clicked.
    NavToggled,
    /// Dismissal overlay behind the open menu clicked.
    OverlayClicked,
    NavLinkClicked { link: NodeId },
    /// Deferred re-evaluation of the active link after a menu click.
    LinkActivationDue { href: String },
    Resized { width: f64 },
    CaseOpenClicked { trigger: NodeId },
    ProjectKeyDown { card: NodeId, key: Key },
    /// Any click on the document, with its target.
    DocumentClicked { target: NodeId },
    /// Document-level keydown.
    KeyDown { key: Key, shift: bool },
    /// The dialog became visible; capture the focus trap.
    ModalShown,
    AnchorClicked { anchor: NodeId },
    ContactSubmitted,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub theme: ThemeState,
    pub reveal: RevealState,
    pub nav: Option<NavState>,
    pub modal: Option<ModalState>,
    pub page: PageState,
}

/// Page-load initialization of every feature.
///
/// Each feature mounts independently: a missing element or a failing host
/// call in one leaves the others intact.
pub fn mount<D: Dom>(dom: &mut D, config: &SiteConfig) -> (AppState, Effects) {
    let mut effects = Effects::new();

    let (theme, theme_effects) = theme::mount(&*dom, config);
    effects.extend(theme_effects);

    let nav = match nav::mount(dom, config, theme.button) {
        Ok(Some((state, nav_effects))) => {
            effects.extend(nav_effects);
            Some(state)
        }
        Ok(None) => None,
        Err(e) => {
            log::warn!("nav: setup failed: {e}");
            None
        }
    };

    let (reveal, reveal_effects) = reveal::mount(&*dom);
    effects.extend(reveal_effects);

    let modal = modal::mount(&*dom);

    let menu_links: Vec<NodeId> = nav
        .as_ref()
        .map(|n| n.links.iter().map(|l| l.node).collect())
        .unwrap_or_default();
    let (page, page_effects) = page::mount(&*dom, &menu_links);
    effects.extend(page_effects);

    log::info!(
        "folio: mounted (theme {}, nav {}, modal {})",
        theme.mode.as_str(),
        if nav.is_some() { "on" } else { "off" },
        if modal.is_some() { "on" } else { "off" },
    );
    (AppState { theme, reveal, nav, modal, page }, effects)
}

/// Route one event to the feature that owns it.
pub fn update<D: Dom>(state: &mut AppState, dom: &D, config: &SiteConfig, event: Event) -> Effects {
    match event {
        Event::ThemeToggled => theme::toggle(dom, &mut state.theme, &config.storage_key),
        Event::Intersected { kind: ObserverKind::Reveal, entries } => {
            reveal::on_intersections(&mut state.reveal, &entries)
        }
        Event::Intersected { kind: ObserverKind::ScrollSpy, entries } => {
            with_nav(state, |nav| nav::on_spy(nav, &entries))
        }
        Event::RevealDue { node } => reveal::reveal(dom, &mut state.reveal, node),
        Event::NavToggled => with_nav(state, |nav| nav::toggle(dom, nav)),
        Event::OverlayClicked => with_nav(state, nav::close),
        Event::NavLinkClicked { link } => with_nav(state, |nav| nav::on_link_click(dom, nav, link)),
        Event::LinkActivationDue { href } => with_nav(state, |nav| nav::set_active(nav, &href)),
        Event::Resized { width } => with_nav(state, |nav| nav::on_resize(dom, nav, width)),
        Event::CaseOpenClicked { trigger } => open_case(state, dom, config, trigger),
        Event::ProjectKeyDown { card, key: Key::Enter } => open_case(state, dom, config, card),
        Event::ProjectKeyDown { .. } => Effects::new(),
        Event::DocumentClicked { target } => {
            with_modal(state, |modal| modal::on_document_click(dom, modal, target))
        }
        Event::KeyDown { key, shift } => with_modal(state, |modal| modal::on_key(dom, modal, key, shift)),
        Event::ModalShown => with_modal(state, |modal| {
            modal::install_trap(dom, modal);
            Effects::new()
        }),
        Event::AnchorClicked { anchor } => page::on_anchor_click(dom, anchor),
        Event::ContactSubmitted => page::on_contact_submit(&state.page, config),
    }
}

fn with_nav(state: &mut AppState, f: impl FnOnce(&mut NavState) -> Effects) -> Effects {
    state.nav.as_mut().map_or_else(Effects::new, f)
}

fn with_modal(state: &mut AppState, f: impl FnOnce(&mut ModalState) -> Effects) -> Effects {
    state.modal.as_mut().map_or_else(Effects::new, f)
}

fn open_case<D: Dom>(state: &mut AppState, dom: &D, config: &SiteConfig, opener: NodeId) -> Effects {
    let Some(id) = page::project_id(dom, opener) else {
        return Effects::new();
    };
    with_modal(state, |modal| modal::open(dom, modal, config, &id))
}
