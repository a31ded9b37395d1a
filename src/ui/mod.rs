//! User interface rendering module
//!
//! - `header` - Header, progress gauge, banner, status and nav bars, overlays
//! - `screens` - Form step, review and success screens

mod header;
pub mod screens;

use crate::app::{AppMode, AppState, SizeClass};
use crate::components::keybindings::KeybindingContext;
use crate::controller::FormController;
use crate::i18n::Translator;
use crate::rules::REQUIRED_MESSAGE;
use crate::storage::KeyValueStore;
use crate::theme::UiConstants;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
};

pub use header::HeaderRenderer;

/// Everything a frame is drawn from
pub struct RenderContext<'a, S: KeyValueStore> {
    pub state: &'a AppState,
    pub form: &'a FormController<S>,
    pub translator: &'a Translator,
    pub keybindings: &'a KeybindingContext,
}

impl<S: KeyValueStore> RenderContext<'_, S> {
    /// Text alignment for the active language
    pub fn alignment(&self) -> Alignment {
        if self.translator.is_rtl() {
            Alignment::Right
        } else {
            Alignment::Left
        }
    }

    /// Translated label of a field
    pub fn label(&self, name: &str) -> String {
        self.translator.t(&format!("fields.{name}"), &[])
    }

    /// Translated label of a choice option
    pub fn option_label(&self, value: &str) -> String {
        self.translator.t_or(&format!("options.{value}"), value)
    }

    /// Translated inline message for a field
    pub fn field_message(&self, name: &str, message: &str) -> String {
        if message == REQUIRED_MESSAGE {
            self.translator.t_or("errors.required", message)
        } else {
            self.translator.t_or(&format!("errors.{name}"), message)
        }
    }
}

/// UI renderer for the application
///
/// This is the main entry point for UI rendering. It lays out the screen and
/// delegates to the header and screen renderers.
pub struct UiRenderer {
    header: HeaderRenderer,
}

impl Default for UiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl UiRenderer {
    pub fn new() -> Self {
        Self {
            header: HeaderRenderer::new(),
        }
    }

    /// Render the complete UI
    pub fn render<S: KeyValueStore>(&self, f: &mut Frame, ctx: &RenderContext<'_, S>) {
        let state = ctx.state;
        let header_height = if state.size_class == SizeClass::Compact {
            UiConstants::HEADER_HEIGHT_COMPACT
        } else {
            UiConstants::HEADER_HEIGHT
        };
        // The banner is gone once the form has been submitted
        let banner_height = if state.mode == AppMode::Complete {
            0
        } else {
            UiConstants::BANNER_HEIGHT
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header_height),
                Constraint::Length(banner_height),
                Constraint::Min(1),
                Constraint::Length(UiConstants::STATUS_BAR_HEIGHT),
                Constraint::Length(UiConstants::NAV_BAR_HEIGHT),
            ])
            .split(f.area());

        self.header.render_header(f, chunks[0], ctx);
        if banner_height > 0 {
            header::render_banner(f, chunks[1], ctx);
        }

        match state.mode {
            AppMode::Form => screens::render_form_step(f, chunks[2], ctx),
            AppMode::Review | AppMode::Submitting => screens::render_review(f, chunks[2], ctx),
            AppMode::Complete => screens::render_success(f, chunks[2], ctx),
        }

        header::render_status_bar(f, chunks[3], ctx);
        header::render_nav_bar(f, chunks[4], ctx);

        if state.debug_visible {
            header::render_debug_overlay(f, ctx);
        }
        // Help goes on top of everything
        if state.help_visible {
            header::render_help_overlay(f, ctx);
        }
    }
}
