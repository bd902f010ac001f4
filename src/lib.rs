//! Client-side interactivity for a static portfolio site.
//!
//! This crate is compiled to WebAssembly and attached to server-rendered HTML
//! pages. It owns theme switching, reveal-on-scroll animation, the navigation
//! menu (mobile flyout, active link, scroll-spy), the case-study modal with its
//! focus trap, and a handful of small page behaviors. All logic runs against
//! the [`dom::Dom`] capability trait, so it is tested natively with the
//! in-memory `fake::FakeDom` (feature `fake`, always on for unit tests); the
//! `browser` feature supplies the `web-sys` host.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`app`] | `AppState`, the `Event` set, page-load mount and event dispatch |
//! | [`runtime`] | Applies effects to a `Dom` and runs due timers |
//! | [`command`] | Side-effect commands, timers, and their application |
//! | [`schedule`] | Pending timers ordered by due time |
//! | [`dom`] | The `Dom` capability trait and its value types |
//! | `fake` | In-memory `Dom` used by tests (feature `fake`) |
//! | [`config`] | Site tables (nav items, case studies) and labels |
//! | [`theme`] | Light/dark mode resolution, toggle, persistence |
//! | [`reveal`] | Staggered reveal of elements entering the viewport |
//! | [`nav`] | Menu construction, mobile toggle, active link, scroll-spy |
//! | [`modal`] | Case-study dialog and focus trap |
//! | [`page`] | Year stamp, hero entrance, smooth anchors, contact stub |
//! | [`consts`] | Timing, threshold, and geometry constants |

pub mod app;
pub mod command;
pub mod config;
pub mod consts;
pub mod dom;
#[cfg(any(test, feature = "fake"))]
pub mod fake;
pub mod modal;
pub mod nav;
pub mod page;
pub mod reveal;
pub mod runtime;
pub mod schedule;
pub mod theme;

#[cfg(feature = "browser")]
pub mod browser;

#[cfg(test)]
#[path = "fixture_test.rs"]
mod fixture_test;
