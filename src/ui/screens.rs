//! Form screens
//!
//! - step screen: one row per field with a state marker, the value and the
//!   inline message; wide terminals also get a step list
//! - review screen: every answer grouped by step
//! - success screen: shown once submission completes

use super::RenderContext;
use super::header::{banner_index, render_notice};
use crate::app::{AppMode, SizeClass};
use crate::rules::{CHECKED_VALUE, DATE_OF_BIRTH_FIELDS};
use crate::steps::Step;
use crate::storage::KeyValueStore;
use crate::theme::{Colors, Styles, Theme};
use crate::types::FieldKind;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

// ============================================================================
// Step Screen
// ============================================================================

/// Render the fields of the current step
pub fn render_form_step<S: KeyValueStore>(f: &mut Frame, area: Rect, ctx: &RenderContext<'_, S>) {
    let (form_area, side_area) = if ctx.state.size_class == SizeClass::Wide {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    let step = ctx.form.current_step();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .title(Span::styled(
            format!(" {} ", ctx.translator.t(step.title_key(), &[])),
            Styles::title(),
        ))
        .padding(Padding::horizontal(1));
    let inner = block.inner(form_area);
    f.render_widget(block, form_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let description_key = format!("form.step{}.description", step.number());
    let description = Paragraph::new(ctx.translator.t(&description_key, &[]))
        .style(Styles::text_secondary())
        .alignment(ctx.alignment())
        .wrap(Wrap { trim: true });
    f.render_widget(description, chunks[0]);

    let items: Vec<ListItem> = ctx
        .form
        .steps()
        .fields(step)
        .iter()
        .enumerate()
        .map(|(index, name)| field_item(ctx, name, index == ctx.state.focus))
        .collect();

    let mut list_state = ListState::default();
    if ctx.state.focus < banner_index(ctx) {
        list_state.select(Some(ctx.state.focus));
    }
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");
    f.render_stateful_widget(list, chunks[1], &mut list_state);

    if let Some(side) = side_area {
        render_step_list(f, side, ctx);
    }
}

/// One field as a list item: label line, value line, optional message line
fn field_item<'a, S: KeyValueStore>(
    ctx: &RenderContext<'_, S>,
    name: &str,
    focused: bool,
) -> ListItem<'a> {
    let Some(rule) = ctx.form.rules().get(name) else {
        return ListItem::new(Line::from(name.to_string()));
    };
    let state = ctx.form.validation_state(name);
    let marker = Span::styled(
        format!("{} ", Theme::field_state_marker(state)),
        Theme::field_state_style(state),
    );
    let label_style = if focused {
        Styles::focused()
    } else {
        Styles::text()
    };
    let required = if rule.required { " *" } else { "" };
    let align = ctx.alignment();

    let mut lines = Vec::with_capacity(3);
    match rule.kind {
        FieldKind::Checkbox => {
            let tick = if ctx.form.is_checked(name) { "[x] " } else { "[ ] " };
            lines.push(
                Line::from(vec![
                    marker,
                    Span::styled(tick, Theme::field_state_style(state)),
                    Span::styled(format!("{}{required}", ctx.label(name)), label_style),
                ])
                .alignment(align),
            );
        }
        FieldKind::Text => {
            lines.push(
                Line::from(vec![
                    marker,
                    Span::styled(format!("{}{required}", ctx.label(name)), label_style),
                ])
                .alignment(align),
            );
            let cursor = if focused { "▏" } else { "" };
            lines.push(
                Line::from(vec![
                    Span::raw("    "),
                    Span::styled(
                        format!("{}{cursor}", ctx.form.value(name)),
                        Style::default()
                            .fg(Colors::FG_PRIMARY)
                            .add_modifier(Modifier::UNDERLINED),
                    ),
                ])
                .alignment(align),
            );
        }
        FieldKind::Choice => {
            lines.push(
                Line::from(vec![
                    marker,
                    Span::styled(format!("{}{required}", ctx.label(name)), label_style),
                ])
                .alignment(align),
            );
            lines.push(choice_line(ctx, name, rule.options()).alignment(align));
        }
    }

    if let Some(message) = ctx.form.message(name) {
        lines.push(
            Line::from(Span::styled(
                format!("    {}", ctx.field_message(name, message)),
                Styles::error(),
            ))
            .alignment(align),
        );
    }

    ListItem::new(lines)
}

/// Options of a choice field. Only wide terminals have room for every
/// option; narrower ones show the selection and its position.
fn choice_line<'a, S: KeyValueStore>(
    ctx: &RenderContext<'_, S>,
    name: &str,
    options: &[&str],
) -> Line<'a> {
    let selected = ctx.form.value(name);
    if ctx.state.size_class != SizeClass::Wide {
        let position = options.iter().position(|option| *option == selected);
        let (text, counter) = match position {
            Some(index) => (
                ctx.option_label(selected),
                format!("  {}/{}", index + 1, options.len()),
            ),
            None => (ctx.translator.t("options.none", &[]), String::new()),
        };
        return Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("< {text} >"), Styles::focused()),
            Span::styled(counter, Styles::text_muted()),
        ]);
    }

    let mut spans = vec![Span::raw("    ")];
    for option in options {
        let (bullet, style) = if *option == selected {
            ("(•) ", Styles::selected())
        } else {
            ("( ) ", Styles::text_secondary())
        };
        spans.push(Span::styled(
            format!("{bullet}{}", ctx.option_label(option)),
            style,
        ));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

/// Step list with completion ticks, for wide terminals
fn render_step_list<S: KeyValueStore>(f: &mut Frame, area: Rect, ctx: &RenderContext<'_, S>) {
    let current = ctx.form.current_step();
    let lines: Vec<Line> = Step::all()
        .iter()
        .map(|step| {
            let done = ctx.form.step_complete(*step);
            let style = if *step == current {
                Styles::focused()
            } else if done {
                Styles::success()
            } else {
                Styles::text_secondary()
            };
            let tick = if done { "✓" } else { " " };
            let title = ctx.translator.t(step.title_key(), &[]);
            Line::from(Span::styled(
                format!("{tick} {}. {title}", step.number()),
                style,
            ))
        })
        .collect();

    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border_inactive())
            .padding(Padding::horizontal(1)),
    );
    f.render_widget(list, area);
}

// ============================================================================
// Review Screen
// ============================================================================

/// Render every answer grouped by step, with the submit hint
pub fn render_review<S: KeyValueStore>(f: &mut Frame, area: Rect, ctx: &RenderContext<'_, S>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .title(Span::styled(
            format!(" {} ", ctx.translator.t(Step::Review.title_key(), &[])),
            Styles::title(),
        ))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let align = ctx.alignment();
    let mut lines = vec![
        Line::from(Span::styled(
            ctx.translator.t("form.step5.description", &[]),
            Styles::text_secondary(),
        ))
        .alignment(align),
        Line::from(""),
    ];

    for step in Step::all().iter().filter(|step| !step.is_last()) {
        lines.push(
            Line::from(Span::styled(
                ctx.translator.t(step.title_key(), &[]),
                Styles::header(),
            ))
            .alignment(align),
        );
        let mut date_shown = false;
        for name in ctx.form.steps().fields(*step) {
            if DATE_OF_BIRTH_FIELDS.contains(name) {
                if !date_shown {
                    let label = ctx.translator.t("review.dateOfBirth", &[]);
                    lines.push(answer_line(ctx, &label, date_of_birth(ctx)));
                    date_shown = true;
                }
                continue;
            }
            lines.push(answer_line(ctx, &ctx.label(name), answer_text(ctx, name)));
        }
        lines.push(Line::from(""));
    }

    let footer = if ctx.state.mode == AppMode::Submitting {
        ctx.translator.t("navigation.submitting", &[])
    } else {
        format!("Enter: {}", ctx.translator.t("navigation.submit", &[]))
    };
    lines.push(Line::from(Span::styled(footer, Styles::focused())).alignment(align));

    let review = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(review, inner);

    if ctx.state.mode == AppMode::Submitting {
        render_notice(f, area, &ctx.translator.t("navigation.submitting", &[]));
    }
}

fn answer_line<'a, S: KeyValueStore>(
    ctx: &RenderContext<'_, S>,
    label: &str,
    answer: Option<String>,
) -> Line<'a> {
    let value = match answer {
        Some(text) => Span::styled(text, Styles::text()),
        None => Span::styled(ctx.translator.t("review.empty", &[]), Styles::text_muted()),
    };
    Line::from(vec![
        Span::styled(format!("  {label}: "), Styles::text_secondary()),
        value,
    ])
    .alignment(ctx.alignment())
}

/// Display text of an answer, `None` when unanswered
fn answer_text<S: KeyValueStore>(ctx: &RenderContext<'_, S>, name: &str) -> Option<String> {
    let value = ctx.form.value(name).trim();
    if value.is_empty() {
        return None;
    }
    match ctx.form.rules().get(name).map(|rule| rule.kind) {
        Some(FieldKind::Checkbox) => (value == CHECKED_VALUE).then(|| "✓".to_string()),
        Some(FieldKind::Choice) => Some(ctx.option_label(value)),
        _ => Some(value.to_string()),
    }
}

/// `dd/mm/yyyy` once all three parts are valid
fn date_of_birth<S: KeyValueStore>(ctx: &RenderContext<'_, S>) -> Option<String> {
    if !ctx.form.date_group_complete() {
        return None;
    }
    let [day, month, year] = DATE_OF_BIRTH_FIELDS.map(|name| ctx.form.value(name).trim());
    Some(format!("{day:0>2}/{month:0>2}/{year}"))
}

// ============================================================================
// Success Screen
// ============================================================================

/// Render the thank-you message shown after submission
pub fn render_success<S: KeyValueStore>(f: &mut Frame, area: Rect, ctx: &RenderContext<'_, S>) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            ctx.translator.t("success.title", &[]),
            Style::default()
                .fg(Colors::SUCCESS)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(ctx.translator.t("success.body", &[])),
        Line::from(""),
        Line::from(Span::styled(
            ctx.translator.t("success.footer", &[]),
            Styles::text_secondary(),
        )),
    ];

    let success = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Colors::SUCCESS)),
        );
    f.render_widget(success, area);
}
