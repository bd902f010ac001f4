//! Shared page fixture for unit tests.
//!
//! Builds a portfolio page on [`FakeDom`] resembling the real markup: a header
//! with nav and theme button, reveal targets with skill bars, home-page
//! sections, project cards, the case-study modal, and the contact form.

use crate::command::{Effects, apply};
use crate::dom::{Dom, NodeId, Rect};
use crate::fake::FakeDom;

/// How the `.nav` container is populated before the builder runs.
#[derive(Debug, Clone, Copy)]
pub(crate) enum NavMarkup {
    Absent,
    Empty,
    Anchors(&'static [(&'static str, &'static str)]),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Options {
    pub theme_button: bool,
    pub nav: NavMarkup,
    pub modal: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { theme_button: true, nav: NavMarkup::Empty, modal: true }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ModalParts {
    pub dialog: NodeId,
    pub backdrop: NodeId,
    pub close: NodeId,
    pub title: NodeId,
    pub meta: NodeId,
    pub points: NodeId,
    pub link: NodeId,
}

#[derive(Debug, Clone)]
pub(crate) struct Fixture {
    pub dom: FakeDom,
    pub body: NodeId,
    pub header: NodeId,
    pub nav: Option<NodeId>,
    pub theme_button: Option<NodeId>,
    pub hero: NodeId,
    pub sections: Vec<NodeId>,
    /// Reveal targets in document order: about intro, skills card, project card.
    pub reveal: Vec<NodeId>,
    /// `.fill` bars inside the skills card: one with `data-level="90"`, one without.
    pub fills: Vec<NodeId>,
    pub project: NodeId,
    pub open_landing: NodeId,
    pub open_unknown: NodeId,
    pub about_anchor: NodeId,
    pub contact_form: NodeId,
    pub year: NodeId,
    pub modal: Option<ModalParts>,
}

pub(crate) fn portfolio_page() -> Fixture {
    page_with(Options::default())
}

#[allow(clippy::too_many_lines)]
pub(crate) fn page_with(options: Options) -> Fixture {
    let mut dom = FakeDom::new();
    let body = dom.body().unwrap_or(dom.root());

    let header = dom.element_with_classes(body, "header", &["site-header"]);
    dom.set_rect(header, Rect::new(0.0, 0.0, 1280.0, 64.0));
    dom.element_with_classes(header, "a", &["logo"]);

    let nav = match options.nav {
        NavMarkup::Absent => None,
        NavMarkup::Empty => Some(dom.element_with_classes(header, "nav", &["nav"])),
        NavMarkup::Anchors(items) => {
            let nav = dom.element_with_classes(header, "nav", &["nav"]);
            for (label, href) in items {
                let a = dom.element(nav, "a");
                dom.with_attribute(a, "href", href);
                dom.set_text(a, label).unwrap_or_default();
            }
            Some(nav)
        }
    };

    let theme_button = options
        .theme_button
        .then(|| dom.element_with_classes(header, "button", &["theme-btn"]));

    let main = dom.element(body, "main");

    let hero = dom.element_with_classes(main, "section", &["hero"]);
    dom.with_attribute(hero, "id", "home");
    dom.set_rect(hero, Rect::new(0.0, 64.0, 1280.0, 500.0));

    let about = dom.element(main, "section");
    dom.with_attribute(about, "id", "about");
    let intro = dom.element_with_classes(about, "div", &["fade-in"]);
    dom.set_rect(intro, Rect::new(0.0, 600.0, 1280.0, 200.0));
    let skills = dom.element_with_classes(about, "div", &["card", "fade-in"]);
    dom.set_rect(skills, Rect::new(0.0, 820.0, 600.0, 300.0));
    let bar_a = dom.element(skills, "div");
    let fill_a = dom.element_with_classes(bar_a, "span", &["fill"]);
    dom.with_attribute(fill_a, "data-level", "90");
    let bar_b = dom.element(skills, "div");
    let fill_b = dom.element_with_classes(bar_b, "span", &["fill"]);

    let projects = dom.element(main, "section");
    dom.with_attribute(projects, "id", "projects");
    let project = dom.element_with_classes(projects, "article", &["project"]);
    dom.with_attribute(project, "data-projid", "proj-landing");
    dom.with_attribute(project, "tabindex", "0");
    dom.set_rect(project, Rect::new(0.0, 1200.0, 600.0, 300.0));
    let open_landing = dom.element_with_classes(project, "button", &["open-case"]);
    dom.with_attribute(open_landing, "data-projid", "proj-landing");
    let open_unknown = dom.element_with_classes(projects, "button", &["open-case"]);
    dom.with_attribute(open_unknown, "data-projid", "proj-unknown");

    let about_anchor = dom.element(hero, "a");
    dom.with_attribute(about_anchor, "href", "#about");

    let contact = dom.element(main, "section");
    dom.with_attribute(contact, "id", "contact");
    let contact_form = dom.element_with_classes(contact, "form", &["contact-form"]);

    let footer = dom.element(body, "footer");
    let year = dom.element(footer, "span");
    dom.with_attribute(year, "id", "year");

    let modal = options.modal.then(|| build_modal(&mut dom, body));

    Fixture {
        dom,
        body,
        header,
        nav,
        theme_button,
        hero,
        sections: vec![hero, about, projects, contact],
        reveal: vec![intro, skills, project],
        fills: vec![fill_a, fill_b],
        project,
        open_landing,
        open_unknown,
        about_anchor,
        contact_form,
        year,
        modal,
    }
}

fn build_modal(dom: &mut FakeDom, body: NodeId) -> ModalParts {
    let dialog = dom.element_with_classes(body, "div", &["modal"]);
    dom.with_attribute(dialog, "id", "case-modal");
    dom.with_attribute(dialog, "aria-hidden", "true");
    let backdrop = dom.element_with_classes(dialog, "div", &["modal-backdrop"]);
    dom.with_attribute(backdrop, "data-dismiss", "modal");
    let panel = dom.element_with_classes(dialog, "div", &["modal-panel"]);
    let close = dom.element_with_classes(panel, "button", &["modal-close"]);
    let title = dom.element(panel, "h3");
    dom.with_attribute(title, "id", "modal-title");
    let meta = dom.element(panel, "p");
    dom.with_attribute(meta, "id", "modal-meta");
    let points = dom.element(panel, "ul");
    dom.with_attribute(points, "id", "modal-points");
    let link = dom.element(panel, "a");
    dom.with_attribute(link, "href", "projects.html");
    let disabled = dom.element(panel, "button");
    dom.with_attribute(disabled, "disabled", "");
    let hidden = dom.element(panel, "button");
    dom.set_hidden(hidden, true);
    let skipped = dom.element(panel, "div");
    dom.with_attribute(skipped, "tabindex", "-1");
    ModalParts { dialog, backdrop, close, title, meta, points, link }
}

/// Apply the immediate commands of `effects`; timers are ignored.
pub(crate) fn run(dom: &mut FakeDom, effects: &Effects) {
    for command in &effects.commands {
        apply(dom, command).unwrap_or_default();
    }
}
