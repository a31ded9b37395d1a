//! Centralized theme and styling for the TUI
//!
//! Colors, pre-built styles and layout constants for every screen live here
//! so the form, the overlays and the banner stay visually consistent.
//!
//! # Usage
//! ```rust
//! use regform::theme::{Colors, Styles, Theme};
//! use regform::types::ValidationState;
//! use ratatui::style::Style;
//!
//! let style = Style::default().fg(Colors::PRIMARY);
//! let title_style = Styles::title();
//! let invalid = Theme::field_state_style(ValidationState::Invalid);
//! ```

use ratatui::style::{Color, Modifier, Style};

use crate::controller::Politeness;
use crate::types::ValidationState;

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Core color palette for the application
pub struct Colors;

impl Colors {
    // -------------------------------------------------------------------------
    // Base Colors
    // -------------------------------------------------------------------------

    /// Overlay background
    pub const BG_PRIMARY: Color = Color::Rgb(20, 20, 30);

    /// Gauge background
    pub const BG_GAUGE: Color = Color::Rgb(40, 40, 50);

    pub const FG_PRIMARY: Color = Color::White;

    pub const FG_SECONDARY: Color = Color::Gray;

    pub const FG_MUTED: Color = Color::DarkGray;

    // -------------------------------------------------------------------------
    // Accent Colors
    // -------------------------------------------------------------------------

    /// NHS blue, used for borders, titles and the inactive banner
    pub const PRIMARY: Color = Color::Rgb(0, 94, 184);

    /// Focus highlight
    pub const SECONDARY: Color = Color::Yellow;

    // -------------------------------------------------------------------------
    // Semantic Colors
    // -------------------------------------------------------------------------

    pub const SUCCESS: Color = Color::Green;

    pub const WARNING: Color = Color::Yellow;

    pub const ERROR: Color = Color::Red;

    pub const INFO: Color = Color::LightBlue;

    // -------------------------------------------------------------------------
    // UI Element Colors
    // -------------------------------------------------------------------------

    pub const BORDER_ACTIVE: Color = Color::Cyan;

    pub const BORDER_INACTIVE: Color = Color::DarkGray;

    pub const SELECTED_BG: Color = Color::Yellow;

    pub const SELECTED_FG: Color = Color::Black;

    pub const NAV_HINT: Color = Color::DarkGray;

    pub const PROGRESS: Color = Color::Green;

    // -------------------------------------------------------------------------
    // Registration Banner
    // -------------------------------------------------------------------------

    /// Banner while required fields are outstanding
    pub const BANNER_INACTIVE: Color = Color::Rgb(0, 94, 184);

    /// Banner once every required field validates
    pub const BANNER_ACTIVE: Color = Color::Rgb(0, 150, 57);
}

// =============================================================================
// PRE-BUILT STYLES
// =============================================================================

/// Pre-built styles for common UI patterns
pub struct Styles;

impl Styles {
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    /// Main title style
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Section header style
    pub fn header() -> Style {
        Style::default()
            .fg(Colors::BORDER_ACTIVE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_active() -> Style {
        Style::default().fg(Colors::BORDER_ACTIVE)
    }

    pub fn border_inactive() -> Style {
        Style::default().fg(Colors::BORDER_INACTIVE)
    }

    pub fn panel_bg() -> Style {
        Style::default().bg(Colors::BG_PRIMARY)
    }

    /// Focused field row
    pub fn focused() -> Style {
        Style::default()
            .fg(Colors::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected option inside a choice field
    pub fn selected() -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Colors::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Colors::SUCCESS)
    }

    pub fn error() -> Style {
        Style::default().fg(Colors::ERROR)
    }

    pub fn progress() -> Style {
        Style::default().fg(Colors::PROGRESS).bg(Colors::BG_GAUGE)
    }

    /// Key in the nav bar and help overlay
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Colors::BORDER_ACTIVE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn nav_hint() -> Style {
        Style::default().fg(Colors::NAV_HINT)
    }
}

// =============================================================================
// THEME CONTEXT
// =============================================================================

/// Semantic style lookups
pub struct Theme;

impl Theme {
    /// Value style for a field in the given validation state
    pub fn field_state_style(state: ValidationState) -> Style {
        match state {
            ValidationState::Empty => Styles::text_muted(),
            ValidationState::Valid => Styles::success(),
            ValidationState::Invalid => Styles::error(),
        }
    }

    /// Marker drawn before a field label
    pub fn field_state_marker(state: ValidationState) -> &'static str {
        match state {
            ValidationState::Empty => "○",
            ValidationState::Valid => "✓",
            ValidationState::Invalid => "✗",
        }
    }

    /// Status line style for an announcement
    pub fn announcement_style(politeness: Politeness) -> Style {
        match politeness {
            Politeness::Polite => Style::default().fg(Colors::INFO),
            Politeness::Assertive => Style::default()
                .fg(Colors::WARNING)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Banner style, green once the form is ready
    pub fn banner_style(ready: bool) -> Style {
        let bg = if ready {
            Colors::BANNER_ACTIVE
        } else {
            Colors::BANNER_INACTIVE
        };
        Style::default()
            .fg(Colors::FG_PRIMARY)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }
}

// =============================================================================
// UI CONSTANTS
// =============================================================================

/// UI dimension and layout constants
pub struct UiConstants;

impl UiConstants {
    /// Overlay width as a share of the screen
    pub const DIALOG_WIDTH_PCT: u16 = 60;

    pub const DIALOG_MAX_WIDTH: u16 = 80;

    pub const DIALOG_MIN_WIDTH: u16 = 40;

    pub const NAV_BAR_HEIGHT: u16 = 1;

    /// Title, subtitle and gauge
    pub const HEADER_HEIGHT: u16 = 5;

    /// Header without the subtitle on compact terminals
    pub const HEADER_HEIGHT_COMPACT: u16 = 4;

    pub const BANNER_HEIGHT: u16 = 1;

    pub const STATUS_BAR_HEIGHT: u16 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_state_styles_differ() {
        let empty = Theme::field_state_style(ValidationState::Empty);
        let valid = Theme::field_state_style(ValidationState::Valid);
        let invalid = Theme::field_state_style(ValidationState::Invalid);
        assert_ne!(empty, valid);
        assert_ne!(valid, invalid);
        assert_eq!(Theme::field_state_marker(ValidationState::Valid), "✓");
    }

    #[test]
    fn test_banner_turns_green_when_ready() {
        assert_eq!(Theme::banner_style(true).bg, Some(Colors::BANNER_ACTIVE));
        assert_eq!(Theme::banner_style(false).bg, Some(Colors::BANNER_INACTIVE));
    }

    #[test]
    fn test_assertive_announcements_are_bold() {
        let style = Theme::announcement_style(Politeness::Assertive);
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }
}
