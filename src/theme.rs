//! Light/dark theme initialization and toggle.
//!
//! Reads the stored preference from local storage (falling back to the
//! `prefers-color-scheme` signal) and applies the `dark` class to `<body>`.
//! Toggle persists the new mode and re-applies the body class and the button
//! icon.
//!
//! TRADE-OFFS
//! ==========
//! Persistence is best-effort: when storage is unavailable the write fails,
//! the failure is logged by the runtime, and the mode lives in memory only
//! until the next page load.

use crate::command::{Command, Effects};
use crate::config::SiteConfig;
use crate::dom::{Dom, NodeId, Selector};

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

const DARK_CLASS: &str = "dark";
const BUTTON_CLASS: &str = "theme-btn";

/// Sun icon, shown while dark mode is active.
const ICON_SUN: &str = r##"<svg viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><circle cx="12" cy="12" r="4" fill="#fff"/><path d="M12 2v2M12 20v2M4.93 4.93l1.414 1.414M17.657 17.657l1.414 1.414M2 12h2M20 12h2M4.93 19.07l1.414-1.414M17.657 6.343l1.414-1.414" stroke="#fff" stroke-width="1.2" stroke-linecap="round" stroke-linejoin="round"/></svg>"##;

/// Moon icon, shown while light mode is active.
const ICON_MOON: &str = r##"<svg viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M21 12.79A9 9 0 1111.21 3 7 7 0 0021 12.79z" fill="#ff4d89"/></svg>"##;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Parse a stored value; anything but `light`/`dark` is unrecognized.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeState {
    pub mode: ThemeMode,
    /// The `.theme-btn` control, when the page has one.
    pub button: Option<NodeId>,
}

/// Effective mode: stored preference, else the OS signal, else light.
#[must_use]
pub fn resolve(stored: Option<&str>, prefers_dark: bool) -> ThemeMode {
    if let Some(mode) = stored.and_then(ThemeMode::parse) {
        return mode;
    }
    if prefers_dark { ThemeMode::Dark } else { ThemeMode::Light }
}

/// Read the preference from the page's storage and environment.
pub fn read_preference<D: Dom>(dom: &D, key: &str) -> ThemeMode {
    let stored = dom.load(key);
    resolve(stored.as_deref(), dom.prefers_dark())
}

/// Resolve the initial mode, apply it, and make the button accessible.
pub fn mount<D: Dom>(dom: &D, config: &SiteConfig) -> (ThemeState, Effects) {
    let mode = read_preference(dom, &config.storage_key);
    let button = dom.find(Selector::Class(BUTTON_CLASS));
    let state = ThemeState { mode, button };

    let mut effects = Effects::from_commands(apply(dom, &state));
    match button {
        Some(node) => {
            effects.push(Command::SetAttribute { node, name: "aria-label", value: config.labels.theme_toggle.clone() });
            effects.push(Command::SetAttribute { node, name: "role", value: "button".into() });
            effects.push(Command::SetAttribute { node, name: "tabindex", value: "0".into() });
        }
        None => log::debug!("theme: no .{BUTTON_CLASS}; toggle disabled"),
    }
    (state, effects)
}

/// Commands that render `state.mode` onto the body and the button.
pub fn apply<D: Dom>(dom: &D, state: &ThemeState) -> Vec<Command> {
    let dark = state.mode.is_dark();
    let mut commands = Vec::new();
    if let Some(body) = dom.body() {
        commands.push(if dark {
            Command::AddClass { node: body, class: DARK_CLASS }
        } else {
            Command::RemoveClass { node: body, class: DARK_CLASS }
        });
    }
    if let Some(node) = state.button {
        commands.push(Command::SetHtml { node, html: if dark { ICON_SUN } else { ICON_MOON } });
        commands.push(Command::SetAttribute { node, name: "aria-pressed", value: dark.to_string() });
    }
    commands
}

/// Flip the mode, persist it, and re-apply visuals.
pub fn toggle<D: Dom>(dom: &D, state: &mut ThemeState, key: &str) -> Effects {
    state.mode = state.mode.toggled();
    log::debug!("theme: switched to {}", state.mode.as_str());
    let mut effects = Effects::new();
    effects.push(Command::Store { key: key.to_owned(), value: state.mode.as_str().to_owned() });
    effects.commands.extend(apply(dom, state));
    effects
}
