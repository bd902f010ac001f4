//! Small page behaviors: year stamp, hero entrance, in-page anchors, the
//! contact form stub, and the hooks that open case studies.

use crate::command::{Command, Effects, Task};
use crate::config::SiteConfig;
use crate::consts::HERO_ENTRANCE_DELAY_MS;
use crate::dom::{Dom, NodeId, Selector};

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

const YEAR_ID: &str = "year";
const HERO_CLASS: &str = "hero";
const CONTACT_FORM_CLASS: &str = "contact-form";
const CASE_TRIGGER_CLASS: &str = "open-case";
const PROJECT_CLASS: &str = "project";
const PROJECT_ID_ATTR: &str = "data-projid";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageState {
    /// Same-page anchors (`href="#id"`) outside the nav menu.
    pub anchors: Vec<NodeId>,
    /// `.open-case` buttons.
    pub case_triggers: Vec<NodeId>,
    /// `.project` cards opening their case study on Enter.
    pub project_cards: Vec<NodeId>,
    pub contact_form: Option<NodeId>,
}

/// Stamp the year, arm the hero entrance, and collect interactive elements.
///
/// `menu_links` are excluded from the anchor set; the nav handles them.
pub fn mount<D: Dom>(dom: &D, menu_links: &[NodeId]) -> (PageState, Effects) {
    let mut effects = Effects::new();
    if let Some(node) = dom.find(Selector::Id(YEAR_ID)) {
        effects.push(Command::SetText { node, text: dom.current_year().to_string() });
    }
    if let Some(hero) = dom.find(Selector::Class(HERO_CLASS)) {
        effects.after(HERO_ENTRANCE_DELAY_MS, Task::Apply(Command::AddClass { node: hero, class: "show" }));
    }

    let anchors = dom
        .find_all(Selector::Tag("a"))
        .into_iter()
        .filter(|node| !menu_links.contains(node))
        .filter(|&node| hash_target(dom, node).is_some())
        .collect();

    let state = PageState {
        anchors,
        case_triggers: dom.find_all(Selector::Class(CASE_TRIGGER_CLASS)),
        project_cards: dom.find_all(Selector::Class(PROJECT_CLASS)),
        contact_form: dom.find(Selector::Class(CONTACT_FORM_CLASS)),
    };
    log::debug!(
        "page: {} anchors, {} case triggers, contact form {}",
        state.anchors.len(),
        state.case_triggers.len(),
        if state.contact_form.is_some() { "present" } else { "absent" },
    );
    (state, effects)
}

/// The id an anchor points at, for `href="#id"` with a non-empty id.
fn hash_target<D: Dom>(dom: &D, anchor: NodeId) -> Option<String> {
    let href = dom.attribute(anchor, "href")?;
    let id = href.strip_prefix('#')?;
    (!id.is_empty()).then(|| id.to_owned())
}

/// Smooth-scroll to the anchor's target instead of jumping.
pub fn on_anchor_click<D: Dom>(dom: &D, anchor: NodeId) -> Effects {
    let Some(id) = hash_target(dom, anchor) else {
        return Effects::new();
    };
    let mut effects = Effects::new();
    effects.push(Command::PreventDefault);
    match dom.find(Selector::Id(&id)) {
        Some(node) => effects.push(Command::ScrollIntoView { node }),
        None => log::debug!("page: anchor target #{id} not found"),
    }
    effects
}

/// Demo submit: acknowledge and clear. Always succeeds.
pub fn on_contact_submit(state: &PageState, config: &SiteConfig) -> Effects {
    let Some(form) = state.contact_form else {
        return Effects::new();
    };
    Effects::from_commands(vec![
        Command::PreventDefault,
        Command::Notify { message: config.labels.contact_ack.clone() },
        Command::ResetForm { node: form },
    ])
}

/// Project id carried by an opener (`.open-case` button or `.project` card).
pub fn project_id<D: Dom>(dom: &D, opener: NodeId) -> Option<String> {
    dom.attribute(opener, PROJECT_ID_ATTR).filter(|id| !id.is_empty())
}
