//! Application module
//!
//! Contains the terminal front end: event handling and the main loop.
//!
//! # Module Structure
//! - `state` - View state types (AppState, AppMode, SizeClass)
//! - Main module - App struct and event loop

mod state;

pub use state::{AppMode, AppState, SizeClass, StatusLine};

use crate::components::keybindings::{KeyAction, KeybindingContext};
use crate::controller::{FormController, FormTask, Phase};
use crate::error::{NavigationError, RegFormError, Result};
use crate::i18n::{self, Translator};
use crate::steps::Step;
use crate::storage::KeyValueStore;
use crate::types::FieldKind;
use crate::ui::{RenderContext, UiRenderer};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const RESIZE_KEY: &str = "resize";

/// Main application struct
pub struct App<S: KeyValueStore> {
    state: AppState,
    form: FormController<S>,
    translator: Translator,
    ui_renderer: UiRenderer,
    /// Keybinding context for dispatch and navigation hints
    keybinding_context: KeybindingContext,
}

impl<S: KeyValueStore> App<S> {
    /// Create a new application instance
    pub fn new(form: FormController<S>, translator: Translator, debug_visible: bool) -> Self {
        info!("Creating new App instance");
        let mut app = Self {
            state: AppState {
                debug_visible,
                ..AppState::default()
            },
            form,
            translator,
            ui_renderer: UiRenderer::new(),
            keybinding_context: KeybindingContext::new(),
        };
        app.refresh();
        app
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn form(&self) -> &FormController<S> {
        &self.form
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Reload the stored draft onto the form
    pub fn restore_draft(&mut self) -> bool {
        let restored = self.form.restore();
        if restored {
            self.state.focus = 0;
            self.set_status(StatusLine::info(self.translator.t("draft.restored", &[])));
        }
        self.refresh();
        restored
    }

    /// Open the form on a step, as requested by launch parameters
    pub fn open_step(&mut self, step: Step) {
        match self.form.go_to_step(step.number()) {
            Ok(step) => {
                debug!("Opened on step {}", step);
                self.state.focus = 0;
            }
            Err(e) => warn!("Cannot open step {}: {}", step, e),
        }
        self.refresh();
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Starting main application loop");
        let size = terminal
            .size()
            .map_err(|e| RegFormError::terminal(format!("Failed to read terminal size: {e}")))?;
        self.state.apply_size(size.width, size.height);

        let mut last_tick = Instant::now();
        loop {
            let now = Instant::now();
            self.tick(now.duration_since(last_tick));
            last_tick = now;

            terminal
                .draw(|f| self.render(f))
                .map_err(|e| RegFormError::terminal(format!("Failed to draw: {e}")))?;

            if crossterm::event::poll(Duration::from_millis(50))?
                && self.handle_event(crossterm::event::read()?)?
            {
                break; // Exit requested
            }
        }

        info!("Main loop finished");
        Ok(())
    }

    /// Draw one frame
    pub fn render(&self, f: &mut Frame) {
        let ctx = RenderContext {
            state: &self.state,
            form: &self.form,
            translator: &self.translator,
            keybindings: &self.keybinding_context,
        };
        self.ui_renderer.render(f, &ctx);
    }

    /// Advance time: run due form tasks and any throttled resize
    pub fn tick(&mut self, elapsed: Duration) {
        let ran = self.form.tick(elapsed);
        if ran.contains(&FormTask::CompleteSubmission) {
            self.set_status(StatusLine::urgent(self.translator.t("success.title", &[])));
        }
        self.apply_pending_resize();
        if !ran.is_empty() {
            self.refresh();
        }
    }

    /// Handle one terminal event. Returns `true` when the app should exit.
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) => return self.handle_key_event(key_event),
            Event::Resize(width, height) => {
                self.state.pending_resize = Some((width, height));
                self.apply_pending_resize();
            }
            Event::FocusGained => {
                debug!("Terminal regained focus");
                self.refresh();
            }
            _ => {}
        }
        Ok(false)
    }

    fn apply_pending_resize(&mut self) {
        let Some((width, height)) = self.state.pending_resize else {
            return;
        };
        let limit = self.form.timings().resize_throttle;
        if self.form.throttle(RESIZE_KEY, limit) {
            debug!("Terminal resized to {}x{}", width, height);
            self.state.apply_size(width, height);
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<bool> {
        if key_event.kind != KeyEventKind::Press {
            return Ok(false);
        }

        let action = self
            .keybinding_context
            .action_for(&self.state.mode, &key_event);

        // Help overlay - ?, Alt+H or Esc dismisses it
        if self.state.help_visible {
            match action {
                Some(KeyAction::Help | KeyAction::Dismiss) => self.state.help_visible = false,
                Some(KeyAction::Quit) => return Ok(self.request_quit()),
                _ => {}
            }
            return Ok(false);
        }

        if self.edit_focused_text(&key_event) {
            self.state.quit_armed = false;
            self.refresh();
            return Ok(false);
        }

        let Some(action) = action else {
            return Ok(false);
        };
        if action != KeyAction::Quit {
            self.state.quit_armed = false;
        }

        match action {
            KeyAction::Quit => return Ok(self.request_quit()),
            KeyAction::Help => self.state.help_visible = true,
            KeyAction::Dismiss => {}
            KeyAction::Debug => self.state.debug_visible = !self.state.debug_visible,
            KeyAction::Language => self.cycle_language(),
            KeyAction::FocusNext => self.move_focus(1),
            KeyAction::FocusPrevious => self.move_focus(-1),
            KeyAction::CycleNext => self.cycle_choice(1),
            KeyAction::CyclePrevious => self.cycle_choice(-1),
            KeyAction::Toggle => {
                if self.banner_focused() {
                    self.activate_banner();
                } else {
                    self.toggle_focused();
                }
            }
            KeyAction::Activate => {
                if self.banner_focused() {
                    self.activate_banner();
                } else {
                    self.move_focus(1);
                }
            }
            KeyAction::Submit => self.submit(),
            KeyAction::NextStep => {
                let result = self.form.advance();
                self.after_navigation(result);
            }
            KeyAction::PreviousStep => {
                let result = self.form.retreat();
                self.after_navigation(result);
            }
            KeyAction::JumpToStep(number) => {
                let result = self.form.go_to_step(number);
                self.after_navigation(result);
            }
            KeyAction::Reset => {
                self.form.reset();
                self.state.focus = 0;
                self.set_status(StatusLine::urgent(self.translator.t("status.reset", &[])));
            }
        }

        self.refresh();
        Ok(false)
    }

    /// Typing and Backspace go to a focused text field
    fn edit_focused_text(&mut self, key_event: &KeyEvent) -> bool {
        if self.state.mode != AppMode::Form
            || key_event
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        let Some(name) = self.focused_field() else {
            return false;
        };
        if self.field_kind(name) != Some(FieldKind::Text) {
            return false;
        }

        let mut value = self.form.value(name).to_string();
        match key_event.code {
            KeyCode::Char(c) => value.push(c),
            KeyCode::Backspace => {
                value.pop();
            }
            _ => return false,
        }
        self.form.set_text(name, &value)
    }

    /// Quit at once unless a draft is stored, in which case the first
    /// request only warns
    fn request_quit(&mut self) -> bool {
        if self.form.save_pending() {
            self.form.save_now();
        }
        let warn_first = self.form.phase() == Phase::Editing && self.form.has_unsaved_data();
        if warn_first && !self.state.quit_armed {
            self.state.quit_armed = true;
            self.state.help_visible = false;
            self.set_status(StatusLine::urgent(self.translator.t("status.quitWarning", &[])));
            return false;
        }
        info!("Quit requested");
        true
    }

    fn after_navigation(&mut self, result: std::result::Result<Step, NavigationError>) {
        match result {
            Ok(step) => {
                self.state.focus = 0;
                let current = step.number().to_string();
                let total = Step::TOTAL.to_string();
                let message = self.translator.t(
                    "header.progress",
                    &[("current", current.as_str()), ("total", total.as_str())],
                );
                self.set_status(StatusLine::info(message));
            }
            Err(NavigationError::Incomplete { invalid_fields, .. }) => {
                self.focus_field(invalid_fields.first().map(String::as_str));
                let message = self.translator.t("errors.stepIncomplete", &[]);
                self.set_status(StatusLine::urgent(message));
            }
            Err(e) => debug!("Navigation ignored: {}", e),
        }
    }

    fn submit(&mut self) {
        match self.form.submit() {
            Ok(()) => {
                let message = self.translator.t("navigation.submitting", &[]);
                self.set_status(StatusLine::info(message));
            }
            Err(NavigationError::Incomplete { invalid_fields, .. }) => {
                self.focus_field(invalid_fields.first().map(String::as_str));
                let message = self.translator.t("errors.submitIncomplete", &[]);
                self.set_status(StatusLine::urgent(message));
            }
            Err(e) => debug!("Submit ignored: {}", e),
        }
    }

    /// Enter or Space on the banner advances once every field validates
    fn activate_banner(&mut self) {
        if !self.form.is_ready() {
            return;
        }
        if self.form.current_step().is_last() {
            self.submit();
        } else {
            let result = self.form.advance();
            self.after_navigation(result);
        }
    }

    fn cycle_language(&mut self) {
        let languages = i18n::available_languages();
        let current = self.translator.language();
        let next = languages
            .iter()
            .position(|language| *language == current)
            .map_or(i18n::FALLBACK_LANGUAGE, |i| {
                languages[(i + 1) % languages.len()]
            });

        if let Err(e) = self.translator.set_language(next) {
            warn!("Language switch failed: {}", e);
        }
        let language = self.translator.language();
        i18n::save_language(self.form.drafts_mut().store_mut(), language);
        let message = self
            .translator
            .t("language.changed", &[("language", language.native_name())]);
        self.set_status(StatusLine::info(message));
    }

    // ---- focus ----

    fn step_fields(&self) -> &'static [&'static str] {
        self.form.steps().fields(self.form.current_step())
    }

    fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.form.rules().get(name).map(|rule| rule.kind)
    }

    /// Field under focus, `None` when the banner is focused
    pub fn focused_field(&self) -> Option<&'static str> {
        self.step_fields().get(self.state.focus).copied()
    }

    fn banner_focused(&self) -> bool {
        self.state.mode == AppMode::Form && self.focused_field().is_none()
    }

    /// Move focus through the fields and the banner, wrapping around
    fn move_focus(&mut self, delta: isize) {
        let slots = self.step_fields().len() + 1;
        let focus = self.state.focus as isize + delta;
        self.state.focus = focus.rem_euclid(slots as isize) as usize;
    }

    fn focus_field(&mut self, name: Option<&str>) {
        self.state.focus = name
            .and_then(|name| self.step_fields().iter().position(|field| *field == name))
            .unwrap_or(0);
    }

    fn cycle_choice(&mut self, delta: isize) {
        let Some(name) = self.focused_field() else {
            return;
        };
        let Some(rule) = self.form.rules().get(name) else {
            return;
        };
        let options = rule.options();
        if options.is_empty() {
            return;
        }
        // Arrow keys follow the reading direction
        let delta = if self.translator.is_rtl() { -delta } else { delta };

        let len = options.len() as isize;
        let next = match options.iter().position(|o| *o == self.form.value(name)) {
            Some(current) => (current as isize + delta).rem_euclid(len),
            None if delta > 0 => 0,
            None => len - 1,
        };
        self.form.select_choice(name, options[next as usize]);
    }

    fn toggle_focused(&mut self) {
        let Some(name) = self.focused_field() else {
            return;
        };
        if self.field_kind(name) == Some(FieldKind::Checkbox) {
            self.form.toggle_checked(name);
        }
    }

    // ---- bookkeeping ----

    fn set_status(&mut self, status: StatusLine) {
        self.state.status = Some(status);
    }

    /// Recompute everything derived from the form: mode, completion and
    /// whether a draft is stored
    fn refresh(&mut self) {
        for announcement in self.form.take_announcements() {
            debug!(
                "Announcement ({:?}): {}",
                announcement.politeness, announcement.message
            );
        }
        self.state.mode = AppMode::for_form(self.form.current_step(), self.form.phase());
        self.state.completion = self.form.completion_status();
        self.state.draft_stored = self.form.has_unsaved_data();
        if self.state.focus > self.step_fields().len() {
            self.state.focus = 0;
        }
    }
}
