//! Help overlay component
//!
//! Displays context-sensitive help in a centered floating panel.

use super::keybindings::{HelpSection, KeybindingContext};
use crate::app::AppMode;
use crate::theme::{Colors, Styles, UiConstants};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

const FOOTER: &str = "Press Esc or Alt+H to close";

/// Help overlay component
pub struct HelpOverlay {
    content: Vec<Line<'static>>,
}

impl HelpOverlay {
    /// Create a new help overlay for the given mode
    pub fn new(mode: &AppMode, keybinding_ctx: &KeybindingContext) -> Self {
        let sections = keybinding_ctx.get_help_content(mode);
        Self {
            content: Self::build_content(&sections, mode),
        }
    }

    /// Build the help content from sections
    fn build_content(sections: &[HelpSection], mode: &AppMode) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();

        lines.push(Line::from(vec![
            Span::styled("Current: ", Style::default().fg(Colors::FG_MUTED)),
            Span::styled(mode.name().to_string(), Style::default().fg(Colors::SECONDARY)),
        ]));
        lines.push(Line::from(""));

        for section in sections {
            lines.push(Line::from(vec![Span::styled(
                format!("  {}  ", section.title),
                Style::default()
                    .fg(Colors::SUCCESS)
                    .add_modifier(Modifier::BOLD),
            )]));

            for (key, description) in &section.items {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(format!("{:<12}", key), Styles::key_hint()),
                    Span::styled(description.clone(), Styles::text()),
                ]));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![Span::styled(FOOTER, Styles::text_muted())]));
        lines
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.content
    }

    /// Render the help overlay centered over `parent`
    pub fn render(&self, f: &mut Frame, parent: Rect) {
        let area = centered_rect(parent, self.content.len() as u16 + 2);
        f.render_widget(Clear, area);

        let block = Block::default()
            .title(" Help ")
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Styles::border_active())
            .style(Styles::panel_bg());
        let help = Paragraph::new(self.content.clone())
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(help, area);
    }
}

/// Rectangle for an overlay of the given height, centered and clamped to
/// the dialog width limits
pub fn centered_rect(parent: Rect, height: u16) -> Rect {
    let width = (parent.width * UiConstants::DIALOG_WIDTH_PCT / 100)
        .clamp(UiConstants::DIALOG_MIN_WIDTH, UiConstants::DIALOG_MAX_WIDTH)
        .min(parent.width);
    let height = height.min(parent.height);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(parent);
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::keybindings::KeyAction;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_content_lists_every_section() {
        let ctx = KeybindingContext::new();
        let overlay = HelpOverlay::new(&AppMode::Form, &ctx);
        let text: Vec<String> = overlay.lines().iter().map(|l| l.to_string()).collect();
        assert!(text.iter().any(|l| l.contains("Navigation")));
        assert!(text.iter().any(|l| l.contains("Ctrl+Right")));
        assert_eq!(text.last().map(String::as_str), Some(FOOTER));
    }

    #[test]
    fn test_footer_names_keys_that_close_from_text_fields() {
        let ctx = KeybindingContext::new();
        let alt_h = KeyEvent::new(KeyCode::Char('h'), KeyModifiers::ALT);
        assert_eq!(ctx.action_for(&AppMode::Form, &alt_h), Some(KeyAction::Help));
        assert!(FOOTER.contains("Alt+H"));
        assert!(FOOTER.contains("Esc"));
        assert!(!FOOTER.contains('?'));
    }

    #[test]
    fn test_centered_rect_fits_parent() {
        let parent = Rect::new(0, 0, 50, 10);
        let area = centered_rect(parent, 30);
        assert!(area.width <= parent.width);
        assert_eq!(area.height, 10);

        let wide = centered_rect(Rect::new(0, 0, 200, 60), 20);
        assert_eq!(wide.width, UiConstants::DIALOG_MAX_WIDTH);
        assert_eq!(wide.x, (200 - UiConstants::DIALOG_MAX_WIDTH) / 2);
    }
}
