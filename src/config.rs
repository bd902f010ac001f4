//! Site tables and labels.
//!
//! The built-in [`SiteConfig::default`] carries the portfolio's navigation
//! items and case studies. A page may override any field by embedding
//! `<script type="application/json" id="site-config">` JSON, parsed with
//! [`SiteConfig::from_json`].

use std::collections::BTreeMap;

use serde::Deserialize;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Element id of the optional embedded JSON override.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

pub const DEFAULT_STORAGE_KEY: &str = "theme";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A navigation entry synthesized when the page ships no menu anchors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub href: String,
}

impl NavItem {
    fn new(label: &str, href: &str) -> Self {
        Self { label: label.to_owned(), href: href.to_owned() }
    }
}

/// Content shown in the modal for one project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaseStudy {
    pub title: String,
    pub meta: String,
    #[serde(default)]
    pub points: Vec<String>,
}

impl CaseStudy {
    fn new(title: &str, meta: &str, points: &[&str]) -> Self {
        Self {
            title: title.to_owned(),
            meta: meta.to_owned(),
            points: points.iter().map(|p| (*p).to_owned()).collect(),
        }
    }
}

/// Accessible labels and user-facing strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub theme_toggle: String,
    pub nav_toggle: String,
    pub contact_ack: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            theme_toggle: "Toggle tema gelap / terang".into(),
            nav_toggle: "Buka menu navigasi".into(),
            contact_ack: "Terima kasih! Pesan Anda telah dikirim (demo).".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Local storage key holding the theme preference.
    pub storage_key: String,
    pub nav_items: Vec<NavItem>,
    /// Case studies keyed by project identifier (`data-projid`).
    pub case_studies: BTreeMap<String, CaseStudy>,
    pub labels: Labels,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let nav_items = vec![
            NavItem::new("Home", "index.html"),
            NavItem::new("Pendidikan", "education.html"),
            NavItem::new("Pengalaman", "experience.html"),
            NavItem::new("Keahlian", "skills.html"),
            NavItem::new("Proyek", "projects.html"),
        ];

        let mut case_studies = BTreeMap::new();
        case_studies.insert(
            "proj-app-dashboard".to_owned(),
            CaseStudy::new("Comming Soon", "Mahrini - 2025", &["-"]),
        );
        case_studies.insert(
            "proj-landing".to_owned(),
            CaseStudy::new(
                "Landing Page Brand — Studi Kasus",
                "Frontend • HTML/CSS/JS • 2022",
                &["A/B test hero variants", "Optimisasi LCP dan CLS", "Hasil: +12% konversi"],
            ),
        );
        case_studies.insert(
            "proj-ecom".to_owned(),
            CaseStudy::new(
                "E-commerce Performance — Studi Kasus",
                "Frontend • Next.js • 2024",
                &[
                    "Image optimization & preloading",
                    "Server-side rendering untuk catalog",
                    "Hasil: skor Lighthouse naik 22 points",
                ],
            ),
        );

        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            nav_items,
            case_studies,
            labels: Labels::default(),
        }
    }
}

impl SiteConfig {
    /// Parse an override document. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// `Parse` for malformed JSON, `Invalid` when a field fails validation.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Look up a case study by project identifier.
    #[must_use]
    pub fn case_study(&self, id: &str) -> Option<&CaseStudy> {
        self.case_studies.get(id)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".into()));
        }
        if let Some(item) = self.nav_items.iter().find(|i| i.href.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("nav item '{}' has an empty href", item.label)));
        }
        if let Some((id, _)) = self.case_studies.iter().find(|(_, c)| c.title.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("case study '{id}' has an empty title")));
        }
        Ok(())
    }
}
