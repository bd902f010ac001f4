//! Staggered reveal of marked elements as they scroll into view.
//!
//! Targets are observed once at load. When a batch of visibility entries
//! arrives, the crossing targets are sorted top-to-bottom and each gets a
//! `RevealDue` timer offset by [`REVEAL_STAGGER_MS`] from the previous one,
//! producing a cascading entrance. A target is unobserved as soon as its
//! reveal is scheduled, and the reveal itself is idempotent.

use std::collections::BTreeSet;

use crate::app::Event;
use crate::command::{Command, Effects, Task};
use crate::consts::{DEFAULT_FILL_LEVEL, RATIO_EPSILON, REVEAL_STAGGER_MS};
use crate::dom::{Dom, Intersection, NodeId, ObserverKind, Selector};

#[cfg(test)]
#[path = "reveal_test.rs"]
mod reveal_test;

/// Classes marking an element for reveal-on-scroll.
pub const REVEAL_CLASSES: [&str; 4] = ["fade-in", "card", "profile-card", "project"];

const SHOWN_CLASS: &str = "show";
const FILL_CLASS: &str = "fill";
const LEVEL_ATTR: &str = "data-level";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealState {
    /// Observed targets in document order.
    pub targets: Vec<NodeId>,
    /// Targets whose reveal timer has been armed.
    pub scheduled: BTreeSet<NodeId>,
    /// Targets already shown.
    pub revealed: BTreeSet<NodeId>,
}

/// Collect the marked elements and start observing them.
pub fn mount<D: Dom>(dom: &D) -> (RevealState, Effects) {
    let targets: Vec<NodeId> = dom
        .body()
        .map(|body| dom.descendants(body))
        .unwrap_or_default()
        .into_iter()
        .filter(|&node| REVEAL_CLASSES.iter().any(|class| dom.has_class(node, class)))
        .collect();

    let commands = targets
        .iter()
        .map(|&node| Command::Observe { kind: ObserverKind::Reveal, node })
        .collect();
    log::debug!("reveal: observing {} targets", targets.len());
    (RevealState { targets, ..RevealState::default() }, Effects::from_commands(commands))
}

/// Whether `entry` counts as having crossed `threshold`.
#[must_use]
pub fn crossed(entry: &Intersection, threshold: f64) -> bool {
    entry.is_intersecting && entry.ratio + RATIO_EPSILON >= threshold
}

/// Schedule staggered reveals for the entries of one observation batch.
pub fn on_intersections(state: &mut RevealState, entries: &[Intersection]) -> Effects {
    let threshold = ObserverKind::Reveal.threshold();
    let mut visible: Vec<&Intersection> = entries
        .iter()
        .filter(|e| crossed(e, threshold))
        .filter(|e| state.targets.contains(&e.node))
        .filter(|e| !state.scheduled.contains(&e.node))
        .collect();
    visible.sort_by(|a, b| a.top.total_cmp(&b.top));

    let mut effects = Effects::new();
    let mut delay_ms: u32 = 0;
    for entry in visible {
        if !state.scheduled.insert(entry.node) {
            continue;
        }
        effects.push(Command::Unobserve { kind: ObserverKind::Reveal, node: entry.node });
        effects.after(delay_ms, Task::Dispatch(Event::RevealDue { node: entry.node }));
        delay_ms = delay_ms.saturating_add(REVEAL_STAGGER_MS);
    }
    effects
}

/// Show `node` and fill its progress bars. No-op after the first call.
pub fn reveal<D: Dom>(dom: &D, state: &mut RevealState, node: NodeId) -> Effects {
    if !state.revealed.insert(node) {
        return Effects::new();
    }
    let mut effects = Effects::new();
    effects.push(Command::AddClass { node, class: SHOWN_CLASS });
    for fill in dom.find_within(node, Selector::Class(FILL_CLASS)) {
        let level = fill_level(dom.attribute(fill, LEVEL_ATTR).as_deref());
        effects.push(Command::SetStyle { node: fill, property: "width", value: format!("{level}%") });
    }
    effects
}

/// Target fill percentage from a `data-level` value.
///
/// Accepts surrounding whitespace and an optional trailing `%`. Parsed values
/// are clamped to `0..=100`; missing or non-numeric values use the default.
#[must_use]
pub fn fill_level(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .map(|s| s.strip_suffix('%').unwrap_or(s).trim())
        .and_then(|s| match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => None,
        })
        .map_or(DEFAULT_FILL_LEVEL, |v| v.clamp(0.0, 100.0))
}
