use super::*;
use crate::app::Key;
use crate::dom::{Intersection, Location, NodeId, ObserverKind};
use crate::fake::FakeDom;
use crate::fixture_test::{Fixture, NavMarkup, Options, page_with, portfolio_page};

const SECTIONS: &[(&str, &str)] = &[("Home", "#home"), ("About", "#about"), ("Projects", "#projects")];

fn boot(page: Fixture) -> (Runtime<FakeDom>, Fixture) {
    let mut rt = Runtime::new(page.dom.clone(), SiteConfig::default());
    rt.boot();
    (rt, page)
}

fn entry(node: NodeId, top: f64) -> Intersection {
    Intersection { node, is_intersecting: true, ratio: 0.5, top }
}

fn link(rt: &Runtime<FakeDom>, href: &str) -> NodeId {
    let nav = rt.state().nav.as_ref().unwrap();
    nav.links.iter().find(|l| l.href == href).map(|l| l.node).unwrap()
}

fn active_href(rt: &Runtime<FakeDom>) -> Option<String> {
    rt.state().nav.as_ref().and_then(|n| n.active_href.clone())
}

// =============================================================
// Boot
// =============================================================

#[test]
fn boot_applies_structure_and_arms_hero() {
    let (mut rt, page) = boot(portfolio_page());

    assert_eq!(rt.dom().find_all(crate::dom::Selector::Class("nav-list")).len(), 1);
    assert!(!rt.dom().has_class(page.hero, "show"));
    assert_eq!(rt.pending_timers(), 1);

    rt.advance(259.0);
    assert!(!rt.dom().has_class(page.hero, "show"));
    rt.advance(1.0);
    assert!(rt.dom().has_class(page.hero, "show"));
    assert_eq!(rt.pending_timers(), 0);
}

#[test]
fn boot_on_empty_document_is_quiet() {
    let mut rt = Runtime::new(FakeDom::new(), SiteConfig::default());
    let outcome = rt.boot();
    assert!(outcome.timers.is_empty());
    assert!(!rt.handle(Event::NavToggled).prevent_default);
    assert!(rt.handle(Event::KeyDown { key: Key::Escape, shift: false }).timers.is_empty());
}

#[test]
fn boot_marks_current_page_link() {
    let mut page = page_with(Options::default());
    page.dom.location = Location::new("/experience.html", "");
    let (rt, _) = boot(page);

    let current = link(&rt, "experience.html");
    assert_eq!(active_href(&rt).as_deref(), Some("experience.html"));
    assert_eq!(rt.dom().attribute(current, "aria-current").as_deref(), Some("page"));
    let marked = rt
        .state()
        .nav
        .as_ref()
        .unwrap()
        .links
        .iter()
        .filter(|l| rt.dom().has_class(l.node, "active"))
        .count();
    assert_eq!(marked, 1);
}

// =============================================================
// Clock
// =============================================================

#[test]
fn clock_never_moves_backwards() {
    let mut rt = Runtime::starting_at(FakeDom::new(), SiteConfig::default(), 1000.0);
    rt.advance_to(500.0);
    assert_eq!(rt.now_ms().total_cmp(&1000.0), std::cmp::Ordering::Equal);
    rt.advance(25.0);
    assert_eq!(rt.now_ms().total_cmp(&1025.0), std::cmp::Ordering::Equal);
}

// =============================================================
// Reveal
// =============================================================

#[test]
fn reveal_cascade_runs_top_to_bottom() {
    let (mut rt, page) = boot(portfolio_page());
    let [intro, skills, project] = [page.reveal[0], page.reveal[1], page.reveal[2]];

    let outcome = rt.handle(Event::Intersected {
        kind: ObserverKind::Reveal,
        entries: vec![entry(project, 500.0), entry(skills, 300.0), entry(intro, 100.0)],
    });
    assert_eq!(outcome.timers, vec![0, 90, 180]);

    assert!(rt.dom().has_class(intro, "show"));
    assert!(!rt.dom().has_class(skills, "show"));
    assert!(!rt.dom().is_observed(ObserverKind::Reveal, skills));

    rt.advance(90.0);
    assert!(rt.dom().has_class(skills, "show"));
    assert_eq!(rt.dom().style(page.fills[1], "width").as_deref(), Some("80%"));
    assert!(!rt.dom().has_class(project, "show"));

    rt.advance(90.0);
    assert!(rt.dom().has_class(project, "show"));
}

// =============================================================
// Modal
// =============================================================

#[test]
fn modal_focuses_close_after_delay_and_traps_tab() {
    let (mut rt, page) = boot(portfolio_page());
    let parts = page.modal.unwrap();
    rt.dom_mut().set_focus(Some(page.open_landing));

    rt.handle(Event::CaseOpenClicked { trigger: page.open_landing });
    assert_eq!(rt.dom().text(parts.title).as_deref(), Some("Landing Page Brand — Studi Kasus"));
    assert_eq!(rt.dom().active_element(), Some(page.open_landing));

    rt.advance(50.0);
    assert_eq!(rt.dom().active_element(), Some(parts.close));

    let shift_tab = rt.handle(Event::KeyDown { key: Key::Tab, shift: true });
    assert!(shift_tab.prevent_default);
    assert_eq!(rt.dom().active_element(), Some(parts.link));

    rt.handle(Event::KeyDown { key: Key::Escape, shift: false });
    assert_eq!(rt.dom().attribute(parts.dialog, "aria-hidden").as_deref(), Some("true"));
    assert!(!rt.dom().has_class(page.body, "no-scroll"));
    assert_eq!(rt.dom().active_element(), Some(page.open_landing));
}

#[test]
fn backdrop_click_closes_modal() {
    let (mut rt, page) = boot(portfolio_page());
    let parts = page.modal.unwrap();
    rt.handle(Event::CaseOpenClicked { trigger: page.open_landing });
    rt.handle(Event::DocumentClicked { target: parts.backdrop });
    assert!(rt.state().modal.as_ref().is_some_and(|m| !m.is_open));
}

// =============================================================
// Navigation
// =============================================================

#[test]
fn open_menu_then_wide_resize_removes_overlay() {
    let mut page = portfolio_page();
    page.dom.viewport_width = 375.0;
    let (mut rt, page) = boot(page);

    rt.handle(Event::NavToggled);
    assert_eq!(rt.dom().find_all(crate::dom::Selector::Class("nav-overlay")).len(), 1);

    rt.dom_mut().viewport_width = 1024.0;
    rt.handle(Event::Resized { width: 1024.0 });
    assert!(!rt.dom().has_class(page.nav.unwrap(), "open"));
    assert!(rt.dom().find(crate::dom::Selector::Class("nav-overlay")).is_none());
}

#[test]
fn link_activation_is_deferred() {
    let (mut rt, _) = boot(portfolio_page());
    let skills = link(&rt, "skills.html");

    rt.handle(Event::NavLinkClicked { link: skills });
    assert_eq!(active_href(&rt).as_deref(), Some("index.html"));
    rt.advance(60.0);
    assert_eq!(active_href(&rt).as_deref(), Some("skills.html"));
    assert!(rt.dom().has_class(skills, "active"));
}

#[test]
fn most_recent_activation_wins_over_scroll_spy() {
    let page = page_with(Options { nav: NavMarkup::Anchors(SECTIONS), ..Options::default() });
    let (about, projects) = (page.sections[1], page.sections[2]);
    let (mut rt, page) = boot(page);

    let outcome = rt.handle(Event::NavLinkClicked { link: link(&rt, "#projects") });
    assert!(outcome.prevent_default);
    assert_eq!(rt.dom().scrolled_to, vec![projects]);

    // The smooth scroll passes the about section first.
    rt.advance(30.0);
    rt.handle(Event::Intersected { kind: ObserverKind::ScrollSpy, entries: vec![entry(about, 0.0)] });
    assert_eq!(active_href(&rt).as_deref(), Some("#about"));

    rt.advance(30.0);
    assert_eq!(active_href(&rt).as_deref(), Some("#projects"));

    // A later spy batch takes over again.
    rt.handle(Event::Intersected { kind: ObserverKind::ScrollSpy, entries: vec![entry(page.sections[0], 0.0)] });
    assert_eq!(active_href(&rt).as_deref(), Some("#home"));
}

// =============================================================
// Theme and page
// =============================================================

#[test]
fn theme_toggle_twice_round_trips_and_persists() {
    let mut page = portfolio_page();
    page.dom.prefers_dark = true;
    let (mut rt, page) = boot(page);
    assert!(rt.dom().has_class(page.body, "dark"));

    rt.handle(Event::ThemeToggled);
    rt.handle(Event::ThemeToggled);
    assert!(rt.dom().has_class(page.body, "dark"));
    assert_eq!(rt.dom().stored("theme").as_deref(), Some("dark"));
}

#[test]
fn theme_toggle_without_storage_still_switches() {
    let mut page = portfolio_page();
    page.dom.disable_storage();
    let (mut rt, page) = boot(page);

    rt.handle(Event::ThemeToggled);
    assert!(rt.dom().has_class(page.body, "dark"));
    assert_eq!(rt.dom().stored("theme"), None);
}

#[test]
fn contact_submit_is_acknowledged() {
    let (mut rt, page) = boot(portfolio_page());
    let outcome = rt.handle(Event::ContactSubmitted);
    assert!(outcome.prevent_default);
    assert_eq!(rt.dom().notices.len(), 1);
    assert_eq!(rt.dom().form_resets, vec![page.contact_form]);
}
