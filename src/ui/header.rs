//! Header and common widget rendering
//!
//! This module contains the title header with its progress gauge, the
//! registration banner, the status and nav bars, and the overlays.

use super::RenderContext;
use crate::app::{AppMode, SizeClass};
use crate::components::help_overlay::{HelpOverlay, centered_rect};
use crate::controller::Politeness;
use crate::steps::Step;
use crate::storage::KeyValueStore;
use crate::theme::{Colors, Styles, Theme};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph},
};

/// Header renderer with the organisation badge
pub struct HeaderRenderer {
    badge: Span<'static>,
}

impl Default for HeaderRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderRenderer {
    pub fn new() -> Self {
        Self {
            badge: Span::styled(
                " NHS ",
                Style::default()
                    .fg(Colors::FG_PRIMARY)
                    .bg(Colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
        }
    }

    /// Render the title, the subtitle (not on compact terminals) and the
    /// step gauge
    pub fn render_header<S: KeyValueStore>(
        &self,
        f: &mut Frame,
        area: Rect,
        ctx: &RenderContext<'_, S>,
    ) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let compact = ctx.state.size_class == SizeClass::Compact;
        let text_rows = if compact { 1 } else { 2 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(text_rows), Constraint::Min(0)])
            .split(area);

        let title = Line::from(vec![
            self.badge.clone(),
            Span::raw(" "),
            Span::styled(ctx.translator.t("header.title", &[]), Styles::title()),
        ]);
        let mut lines = vec![title];
        if !compact {
            lines.push(Line::from(Span::styled(
                ctx.translator.t("header.subtitle", &[]),
                Styles::text_secondary(),
            )));
        }
        let header = Paragraph::new(lines).alignment(ctx.alignment());
        f.render_widget(header, chunks[0]);

        render_step_gauge(f, chunks[1], ctx);
    }
}

/// Gauge showing `Step k of 5` under the step title
fn render_step_gauge<S: KeyValueStore>(f: &mut Frame, area: Rect, ctx: &RenderContext<'_, S>) {
    let step = ctx.form.current_step();
    let (title, percent) = match ctx.state.mode {
        AppMode::Complete => (ctx.translator.t("success.title", &[]), 100),
        _ => (
            ctx.translator.t(step.title_key(), &[]),
            step.progress_percent(),
        ),
    };
    let current = step.number().to_string();
    let total = Step::TOTAL.to_string();
    let label = ctx.translator.t(
        "header.progress",
        &[("current", current.as_str()), ("total", total.as_str())],
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border_inactive())
                .title(Span::styled(format!(" {title} "), Styles::header())),
        )
        .gauge_style(Styles::progress())
        .label(Span::styled(label, Style::default().fg(Colors::FG_PRIMARY)))
        .percent(percent);
    f.render_widget(gauge, area);
}

/// Render the registration banner: `completed/total`, green once ready
pub fn render_banner<S: KeyValueStore>(f: &mut Frame, area: Rect, ctx: &RenderContext<'_, S>) {
    let completion = ctx.state.completion;
    let completed = completion.completed.to_string();
    let total = completion.total.to_string();
    let progress = ctx.translator.t(
        "banner.progress",
        &[("completed", completed.as_str()), ("total", total.as_str())],
    );

    let focused = ctx.state.mode == AppMode::Form
        && ctx.state.focus == banner_index(ctx);
    let marker = if focused { "▶ " } else { "" };
    let text = if ctx.state.size_class == SizeClass::Compact {
        format!("{marker}{progress}")
    } else {
        format!(
            "{marker}{}  {progress}",
            ctx.translator.t("banner.register", &[])
        )
    };

    let mut style = Theme::banner_style(completion.is_ready());
    if focused {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    let banner = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center);
    f.render_widget(banner, area);
}

/// Focus index of the banner on the current step
pub fn banner_index<S: KeyValueStore>(ctx: &RenderContext<'_, S>) -> usize {
    ctx.form.steps().fields(ctx.form.current_step()).len()
}

/// Render the status line
pub fn render_status_bar<S: KeyValueStore>(
    f: &mut Frame,
    area: Rect,
    ctx: &RenderContext<'_, S>,
) {
    let Some(status) = &ctx.state.status else {
        return;
    };
    let style = Theme::announcement_style(if status.urgent {
        Politeness::Assertive
    } else {
        Politeness::Polite
    });
    let line = Paragraph::new(Span::styled(status.message.clone(), style))
        .alignment(ctx.alignment());
    f.render_widget(line, area);
}

/// Render the navigation bar
pub fn render_nav_bar<S: KeyValueStore>(f: &mut Frame, area: Rect, ctx: &RenderContext<'_, S>) {
    let items = ctx.keybindings.get_nav_items(&ctx.state.mode);
    let mut spans = Vec::with_capacity(items.len() * 3);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", Styles::nav_hint()));
        }
        spans.push(Span::styled(item.key_display.clone(), Styles::key_hint()));
        spans.push(Span::styled(format!(" {}", item.action_label), Styles::nav_hint()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the help overlay
pub fn render_help_overlay<S: KeyValueStore>(f: &mut Frame, ctx: &RenderContext<'_, S>) {
    let help_overlay = HelpOverlay::new(&ctx.state.mode, ctx.keybindings);
    help_overlay.render(f, f.area());
}

/// Render the diagnostic overlay in the top right corner
pub fn render_debug_overlay<S: KeyValueStore>(f: &mut Frame, ctx: &RenderContext<'_, S>) {
    let state = ctx.state;
    let (width, height) = state.terminal_size;
    let rows = [
        ("step", ctx.form.current_step().to_string()),
        ("phase", format!("{:?}", ctx.form.phase())),
        ("language", ctx.translator.language().to_string()),
        ("size", format!("{} ({}x{})", state.size_class, width, height)),
        ("draft", if state.draft_stored { "stored" } else { "none" }.to_string()),
        (
            "fields",
            format!("{}/{}", state.completion.completed, state.completion.total),
        ),
    ];
    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(key, value)| {
            Line::from(vec![
                Span::styled(format!("{key:<9}"), Styles::text_muted()),
                Span::styled(value, Styles::text()),
            ])
        })
        .collect();

    let screen = f.area();
    let box_width = 30.min(screen.width);
    let box_height = (lines.len() as u16 + 2).min(screen.height);
    let area = Rect::new(
        screen.x + screen.width - box_width,
        screen.y,
        box_width,
        box_height,
    );
    f.render_widget(Clear, area);
    let debug = Paragraph::new(lines).block(
        Block::default()
            .title(" Debug ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Colors::WARNING))
            .style(Styles::panel_bg()),
    );
    f.render_widget(debug, area);
}

/// Centered one-line notice over the content area
pub fn render_notice(f: &mut Frame, area: Rect, text: &str) {
    let rect = centered_rect(area, 3);
    f.render_widget(Clear, rect);
    let notice = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .style(Styles::header())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border_active()),
        );
    f.render_widget(notice, rect);
}
