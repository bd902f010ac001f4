use super::*;
use crate::fake::FakeDom;
use crate::fixture_test::{Options, page_with, portfolio_page, run};

// =============================================================
// ThemeMode
// =============================================================

#[test]
fn parse_accepts_known_values_only() {
    assert_eq!(ThemeMode::parse("dark"), Some(ThemeMode::Dark));
    assert_eq!(ThemeMode::parse(" light "), Some(ThemeMode::Light));
    assert_eq!(ThemeMode::parse("DARK"), None);
    assert_eq!(ThemeMode::parse(""), None);
}

#[test]
fn toggled_flips_and_round_trips() {
    assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
    assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
}

#[test]
fn default_mode_is_light() {
    assert_eq!(ThemeMode::default(), ThemeMode::Light);
}

// =============================================================
// resolve
// =============================================================

#[test]
fn stored_preference_wins_over_os_signal() {
    assert_eq!(resolve(Some("light"), true), ThemeMode::Light);
    assert_eq!(resolve(Some("dark"), false), ThemeMode::Dark);
}

#[test]
fn os_signal_used_when_nothing_stored() {
    assert_eq!(resolve(None, true), ThemeMode::Dark);
    assert_eq!(resolve(None, false), ThemeMode::Light);
}

#[test]
fn unrecognized_stored_value_falls_through_to_os_signal() {
    assert_eq!(resolve(Some("sepia"), true), ThemeMode::Dark);
    assert_eq!(resolve(Some("sepia"), false), ThemeMode::Light);
}

// =============================================================
// mount / toggle
// =============================================================

#[test]
fn mount_applies_os_dark_preference() {
    let mut page = portfolio_page();
    page.dom.prefers_dark = true;
    let (state, effects) = mount(&page.dom, &SiteConfig::default());
    run(&mut page.dom, &effects);

    assert_eq!(state.mode, ThemeMode::Dark);
    assert!(page.dom.has_class(page.body, "dark"));
    let button = page.theme_button.unwrap();
    assert_eq!(page.dom.attribute(button, "aria-pressed").as_deref(), Some("true"));
    assert!(page.dom.html(button).contains("<circle"));
}

#[test]
fn mount_makes_button_accessible() {
    let mut page = portfolio_page();
    let (_, effects) = mount(&page.dom, &SiteConfig::default());
    run(&mut page.dom, &effects);

    let button = page.theme_button.unwrap();
    assert_eq!(page.dom.attribute(button, "role").as_deref(), Some("button"));
    assert_eq!(page.dom.attribute(button, "tabindex").as_deref(), Some("0"));
    assert_eq!(page.dom.attribute(button, "aria-label").as_deref(), Some("Toggle tema gelap / terang"));
    assert_eq!(page.dom.attribute(button, "aria-pressed").as_deref(), Some("false"));
}

#[test]
fn mount_without_button_still_applies_body_class() {
    let mut page = page_with(Options { theme_button: false, ..Options::default() });
    page.dom.store("theme", "dark").unwrap();
    let (state, effects) = mount(&page.dom, &SiteConfig::default());
    run(&mut page.dom, &effects);

    assert_eq!(state.button, None);
    assert!(page.dom.has_class(page.body, "dark"));
}

#[test]
fn toggle_twice_returns_to_original_and_persists_final_mode() {
    let mut page = portfolio_page();
    let config = SiteConfig::default();
    let (mut state, effects) = mount(&page.dom, &config);
    run(&mut page.dom, &effects);
    let original = state.mode;

    let first = toggle(&page.dom, &mut state, &config.storage_key);
    run(&mut page.dom, &first);
    assert_eq!(state.mode, original.toggled());
    assert_eq!(page.dom.stored("theme").as_deref(), Some(state.mode.as_str()));
    assert!(page.dom.has_class(page.body, "dark"));

    let second = toggle(&page.dom, &mut state, &config.storage_key);
    run(&mut page.dom, &second);
    assert_eq!(state.mode, original);
    assert_eq!(page.dom.stored("theme").as_deref(), Some(original.as_str()));
    assert!(!page.dom.has_class(page.body, "dark"));
}

#[test]
fn toggle_without_storage_keeps_in_memory_mode() {
    let mut page = portfolio_page();
    page.dom.disable_storage();
    let config = SiteConfig::default();
    let (mut state, _) = mount(&page.dom, &config);

    let effects = toggle(&page.dom, &mut state, &config.storage_key);
    run(&mut page.dom, &effects);
    assert_eq!(state.mode, ThemeMode::Dark);
    assert!(page.dom.has_class(page.body, "dark"));
    assert_eq!(page.dom.stored("theme"), None);
}

#[test]
fn read_preference_uses_configured_key() {
    let mut dom = FakeDom::new();
    dom.store("folio-theme", "dark").unwrap();
    assert_eq!(read_preference(&dom, "folio-theme"), ThemeMode::Dark);
    assert_eq!(read_preference(&dom, "theme"), ThemeMode::Light);
}
