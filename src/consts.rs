//! Shared timing, threshold, and geometry constants.

// ── Reveal ──────────────────────────────────────────────────────

/// Intersection ratio at which a marked element is revealed.
pub const REVEAL_THRESHOLD: f64 = 0.12;

/// Delay between consecutive reveals within one observation batch.
pub const REVEAL_STAGGER_MS: u32 = 90;

/// Fill percentage used when `data-level` is missing or unparseable.
pub const DEFAULT_FILL_LEVEL: f64 = 80.0;

/// Float slack when comparing a reported ratio against its threshold.
pub const RATIO_EPSILON: f64 = 1e-6;

// ── Navigation ──────────────────────────────────────────────────

/// Viewports wider than this (CSS px) use the desktop menu.
pub const NAV_BREAKPOINT_PX: f64 = 780.0;

/// Minimum distance between the flyout menu and the viewport edges.
pub const MENU_VIEWPORT_PADDING_PX: f64 = 12.0;

/// Upper bound on the flyout menu width.
pub const MENU_MAX_WIDTH_PX: f64 = 320.0;

/// Flyout width used when the list reports no scroll width.
pub const MENU_FALLBACK_WIDTH_PX: f64 = 220.0;

/// Gap between the header's bottom edge and the flyout menu.
pub const MENU_HEADER_OFFSET_PX: f64 = 8.0;

/// Delay before a clicked link is re-evaluated as the active link.
pub const LINK_ACTIVATION_DELAY_MS: u32 = 60;

/// Intersection ratio at which a section takes over the active link.
pub const SCROLL_SPY_THRESHOLD: f64 = 0.45;

// ── Modal ───────────────────────────────────────────────────────

/// Delay before focus moves to the dismiss control after opening.
pub const MODAL_FOCUS_DELAY_MS: u32 = 50;

// ── Page ────────────────────────────────────────────────────────

/// Delay before the hero block plays its entrance.
pub const HERO_ENTRANCE_DELAY_MS: u32 = 260;
