//! Side-effect commands returned by handlers, and timers that defer work.
//!
//! Handlers never mutate the page. They return [`Effects`]: commands to apply
//! now plus [`Timer`]s whose [`Task`] runs after a delay. The runtime applies
//! commands through [`apply`] and places timers on its
//! [`Schedule`](crate::schedule::Schedule).

use crate::app::Event;
use crate::dom::{Dom, DomError, NodeId, ObserverKind};

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;

/// A single page mutation or host request.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddClass { node: NodeId, class: &'static str },
    RemoveClass { node: NodeId, class: &'static str },
    SetAttribute { node: NodeId, name: &'static str, value: String },
    RemoveAttribute { node: NodeId, name: &'static str },
    /// An empty `value` clears the inline property.
    SetStyle { node: NodeId, property: &'static str, value: String },
    SetText { node: NodeId, text: String },
    SetHtml { node: NodeId, html: &'static str },
    ClearChildren { node: NodeId },
    /// Append a new `<li>` carrying `text` to `list`.
    AppendItem { list: NodeId, text: String },
    Append { parent: NodeId, child: NodeId },
    Detach { node: NodeId },
    Focus { node: NodeId },
    ScrollIntoView { node: NodeId },
    Observe { kind: ObserverKind, node: NodeId },
    Unobserve { kind: ObserverKind, node: NodeId },
    Store { key: String, value: String },
    ResetForm { node: NodeId },
    Notify { message: String },
    /// Suppress the default browser action of the event being handled.
    PreventDefault,
}

/// Deferred work.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Apply a command verbatim when the timer fires.
    Apply(Command),
    /// Re-enter dispatch with an event, so the handler sees state as of firing.
    Dispatch(Event),
}

/// A task to run `delay_ms` after the timer was created.
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    pub delay_ms: u32,
    pub task: Task,
}

/// Output of a handler: commands to apply immediately and timers to arm.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    pub commands: Vec<Command>,
    pub timers: Vec<Timer>,
}

impl Effects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Effects consisting of the given commands only.
    #[must_use]
    pub fn from_commands(commands: Vec<Command>) -> Self {
        Self { commands, timers: Vec::new() }
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn after(&mut self, delay_ms: u32, task: Task) {
        self.timers.push(Timer { delay_ms, task });
    }

    pub fn extend(&mut self, other: Effects) {
        self.commands.extend(other.commands);
        self.timers.extend(other.timers);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.timers.is_empty()
    }

    /// Whether the default browser action should be suppressed.
    #[must_use]
    pub fn prevents_default(&self) -> bool {
        self.commands.contains(&Command::PreventDefault)
    }
}

/// Apply one command to the page.
///
/// `PreventDefault` is a no-op here; the host reads it from the effects.
///
/// # Errors
///
/// Returns the host's error when the underlying call fails.
pub fn apply<D: Dom>(dom: &mut D, command: &Command) -> Result<(), DomError> {
    match command {
        Command::AddClass { node, class } => dom.add_class(*node, class),
        Command::RemoveClass { node, class } => dom.remove_class(*node, class),
        Command::SetAttribute { node, name, value } => dom.set_attribute(*node, name, value),
        Command::RemoveAttribute { node, name } => dom.remove_attribute(*node, name),
        Command::SetStyle { node, property, value } => dom.set_style(*node, property, value),
        Command::SetText { node, text } => dom.set_text(*node, text),
        Command::SetHtml { node, html } => dom.set_html(*node, html),
        Command::ClearChildren { node } => dom.clear_children(*node),
        Command::AppendItem { list, text } => {
            let item = dom.create_element("li")?;
            dom.set_text(item, text)?;
            dom.append_child(*list, item)
        }
        Command::Append { parent, child } => dom.append_child(*parent, *child),
        Command::Detach { node } => dom.detach(*node),
        Command::Focus { node } => dom.focus(*node),
        Command::ScrollIntoView { node } => dom.scroll_into_view(*node),
        Command::Observe { kind, node } => dom.observe(*kind, *node),
        Command::Unobserve { kind, node } => dom.unobserve(*kind, *node),
        Command::Store { key, value } => dom.store(key, value),
        Command::ResetForm { node } => dom.reset_form(*node),
        Command::Notify { message } => dom.notify(message),
        Command::PreventDefault => Ok(()),
    }
}
