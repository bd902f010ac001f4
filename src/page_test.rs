use super::*;
use crate::command::Timer;
use crate::fixture_test::{portfolio_page, run};
use crate::fake::FakeDom;

#[test]
fn mount_stamps_current_year() {
    let mut page = portfolio_page();
    page.dom.year = 2031;
    let (_, effects) = mount(&page.dom, &[]);
    run(&mut page.dom, &effects);
    assert_eq!(page.dom.text(page.year).as_deref(), Some("2031"));
}

#[test]
fn mount_arms_hero_entrance() {
    let page = portfolio_page();
    let (_, effects) = mount(&page.dom, &[]);
    assert_eq!(
        effects.timers,
        vec![Timer { delay_ms: 260, task: Task::Apply(Command::AddClass { node: page.hero, class: "show" }) }]
    );
}

#[test]
fn mount_collects_interactive_elements() {
    let page = portfolio_page();
    let (state, _) = mount(&page.dom, &[]);
    assert_eq!(state.anchors, vec![page.about_anchor]);
    assert_eq!(state.case_triggers, vec![page.open_landing, page.open_unknown]);
    assert_eq!(state.project_cards, vec![page.project]);
    assert_eq!(state.contact_form, Some(page.contact_form));
}

#[test]
fn mount_skips_menu_links_and_bare_hash() {
    let mut page = portfolio_page();
    let bare = page.dom.element(page.hero, "a");
    page.dom.with_attribute(bare, "href", "#");
    let (state, _) = mount(&page.dom, &[page.about_anchor]);
    assert!(state.anchors.is_empty());
}

#[test]
fn mount_on_empty_document_does_nothing() {
    let dom = FakeDom::new();
    let (state, effects) = mount(&dom, &[]);
    assert!(effects.is_empty());
    assert_eq!(state, PageState::default());
}

#[test]
fn anchor_click_scrolls_to_target() {
    let mut page = portfolio_page();
    let effects = on_anchor_click(&page.dom, page.about_anchor);
    assert!(effects.prevents_default());
    run(&mut page.dom, &effects);
    assert_eq!(page.dom.scrolled_to, vec![page.sections[1]]);
}

#[test]
fn anchor_click_with_missing_target_still_prevents_jump() {
    let mut page = portfolio_page();
    let stray = page.dom.element(page.hero, "a");
    page.dom.with_attribute(stray, "href", "#nowhere");
    let effects = on_anchor_click(&page.dom, stray);
    assert_eq!(effects.commands, vec![Command::PreventDefault]);
}

#[test]
fn contact_submit_acknowledges_and_resets() {
    let mut page = portfolio_page();
    let (state, _) = mount(&page.dom, &[]);
    let effects = on_contact_submit(&state, &SiteConfig::default());
    assert!(effects.prevents_default());
    run(&mut page.dom, &effects);
    assert_eq!(page.dom.notices, vec!["Terima kasih! Pesan Anda telah dikirim (demo).".to_owned()]);
    assert_eq!(page.dom.form_resets, vec![page.contact_form]);
}

#[test]
fn project_id_reads_opener_attribute() {
    let mut page = portfolio_page();
    assert_eq!(project_id(&page.dom, page.open_landing).as_deref(), Some("proj-landing"));
    assert_eq!(project_id(&page.dom, page.project).as_deref(), Some("proj-landing"));
    page.dom.with_attribute(page.open_unknown, "data-projid", "");
    assert_eq!(project_id(&page.dom, page.open_unknown), None);
    assert_eq!(project_id(&page.dom, page.hero), None);
}
