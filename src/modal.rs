//! Case-study dialog with a keyboard focus trap.
//!
//! The dialog is a two-state machine driven by `aria-hidden` on
//! `#case-modal`. Opening fills the title, meta line and bullet points from
//! the configured case study, locks body scroll, and defers focusing the
//! close control. The trap's cycle bounds are captured once the dialog is
//! displayed (a zero-delay `ModalShown` dispatch), since hidden elements are
//! not focusable while `aria-hidden="true"` styles still apply.
//!
//! At most one trap exists. Re-opening while open releases and reinstalls it
//! but keeps the element that had focus before the first open, so closing
//! always returns focus to where the user started.

use crate::app::{Event, Key};
use crate::command::{Command, Effects, Task};
use crate::config::SiteConfig;
use crate::consts::MODAL_FOCUS_DELAY_MS;
use crate::dom::{Dom, NodeId, Selector};

#[cfg(test)]
#[path = "modal_test.rs"]
mod modal_test;

const DIALOG_ID: &str = "case-modal";
const TITLE_ID: &str = "modal-title";
const META_ID: &str = "modal-meta";
const POINTS_ID: &str = "modal-points";
const CLOSE_CLASS: &str = "modal-close";
const NO_SCROLL_CLASS: &str = "no-scroll";
const DISMISS_ATTR: &str = "data-dismiss";

/// Tags that are focusable without a `tabindex`.
const FOCUSABLE_TAGS: [&str; 4] = ["button", "textarea", "input", "select"];

/// Focus bookkeeping for one open period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusTrap {
    /// Element to refocus on close. Looked up, not owned.
    pub previously_focused: Option<NodeId>,
    /// First and last focusable elements; `None` until captured or when the
    /// dialog has nothing focusable.
    pub bounds: Option<(NodeId, NodeId)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalState {
    pub dialog: NodeId,
    pub body: Option<NodeId>,
    pub title: Option<NodeId>,
    pub meta: Option<NodeId>,
    pub points: Option<NodeId>,
    pub close: Option<NodeId>,
    pub is_open: bool,
    pub trap: Option<FocusTrap>,
}

/// Locate the dialog and its parts. `None` when the page has no dialog.
pub fn mount<D: Dom>(dom: &D) -> Option<ModalState> {
    let Some(dialog) = dom.find(Selector::Id(DIALOG_ID)) else {
        log::debug!("modal: no #{DIALOG_ID}; case studies disabled");
        return None;
    };
    Some(ModalState {
        dialog,
        body: dom.body(),
        title: dom.find(Selector::Id(TITLE_ID)),
        meta: dom.find(Selector::Id(META_ID)),
        points: dom.find(Selector::Id(POINTS_ID)),
        close: dom.find_within(dialog, Selector::Class(CLOSE_CLASS)).first().copied(),
        is_open: false,
        trap: None,
    })
}

/// Show the case study registered under `id`. Unknown ids are ignored.
pub fn open<D: Dom>(dom: &D, state: &mut ModalState, config: &SiteConfig, id: &str) -> Effects {
    let Some(study) = config.case_study(id) else {
        log::debug!("modal: no case study for '{id}'");
        return Effects::new();
    };

    let previously_focused = match state.trap.take() {
        Some(trap) => trap.previously_focused,
        None => dom.active_element(),
    };
    state.trap = Some(FocusTrap { previously_focused, bounds: None });
    state.is_open = true;

    let mut effects = Effects::new();
    if let Some(node) = state.title {
        effects.push(Command::SetText { node, text: study.title.clone() });
    }
    if let Some(node) = state.meta {
        effects.push(Command::SetText { node, text: study.meta.clone() });
    }
    if let Some(list) = state.points {
        effects.push(Command::ClearChildren { node: list });
        for point in &study.points {
            effects.push(Command::AppendItem { list, text: point.clone() });
        }
    }
    effects.push(Command::SetAttribute { node: state.dialog, name: "aria-hidden", value: "false".into() });
    if let Some(body) = state.body {
        effects.push(Command::AddClass { node: body, class: NO_SCROLL_CLASS });
    }
    if let Some(close) = state.close {
        effects.after(MODAL_FOCUS_DELAY_MS, Task::Apply(Command::Focus { node: close }));
    }
    effects.after(0, Task::Dispatch(Event::ModalShown));
    log::debug!("modal: opened '{id}'");
    effects
}

/// Capture the trap bounds from the now-visible dialog.
pub fn install_trap<D: Dom>(dom: &D, state: &mut ModalState) {
    if !state.is_open {
        return;
    }
    let focusable = focusable_within(dom, state.dialog);
    let bounds = match (focusable.first(), focusable.last()) {
        (Some(&first), Some(&last)) => Some((first, last)),
        _ => None,
    };
    if let Some(trap) = state.trap.as_mut() {
        trap.bounds = bounds;
    }
}

/// Hide the dialog, unlock scroll, release the trap, restore focus.
pub fn close(state: &mut ModalState) -> Effects {
    if !state.is_open {
        return Effects::new();
    }
    state.is_open = false;
    let mut effects = Effects::new();
    effects.push(Command::SetAttribute { node: state.dialog, name: "aria-hidden", value: "true".into() });
    if let Some(body) = state.body {
        effects.push(Command::RemoveClass { node: body, class: NO_SCROLL_CLASS });
    }
    if let Some(node) = state.trap.take().and_then(|t| t.previously_focused) {
        effects.push(Command::Focus { node });
    }
    effects
}

/// Any click on the page: dismiss controls close the dialog.
pub fn on_document_click<D: Dom>(dom: &D, state: &mut ModalState, target: NodeId) -> Effects {
    let dismisses = dom.attribute(target, DISMISS_ATTR).as_deref() == Some("modal")
        || dom.has_class(target, CLOSE_CLASS);
    if dismisses { close(state) } else { Effects::new() }
}

/// Document keydown: Escape closes, Tab wraps within the trap.
pub fn on_key<D: Dom>(dom: &D, state: &mut ModalState, key: Key, shift: bool) -> Effects {
    match key {
        Key::Escape => close(state),
        Key::Tab => cycle(dom, state, shift),
        Key::Enter | Key::Other => Effects::new(),
    }
}

fn cycle<D: Dom>(dom: &D, state: &ModalState, shift: bool) -> Effects {
    let Some((first, last)) = state.trap.and_then(|t| t.bounds) else {
        return Effects::new();
    };
    let active = dom.active_element();
    let wrap_to = if shift && active == Some(first) {
        last
    } else if !shift && active == Some(last) {
        first
    } else {
        return Effects::new();
    };
    Effects::from_commands(vec![Command::PreventDefault, Command::Focus { node: wrap_to }])
}

/// Keyboard-reachable descendants of `root`, in document order.
pub fn focusable_within<D: Dom>(dom: &D, root: NodeId) -> Vec<NodeId> {
    dom.descendants(root)
        .into_iter()
        .filter(|&node| is_focusable(dom, node))
        .collect()
}

fn is_focusable<D: Dom>(dom: &D, node: NodeId) -> bool {
    let tag = dom.tag_name(node);
    let candidate = (tag == "a" && dom.attribute(node, "href").is_some())
        || FOCUSABLE_TAGS.contains(&tag.as_str())
        || dom.attribute(node, "tabindex").is_some_and(|t| t.trim() != "-1");
    candidate && dom.attribute(node, "disabled").is_none() && dom.is_rendered(node)
}
