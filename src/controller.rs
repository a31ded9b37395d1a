//! Form controller
//!
//! [`FormController`] owns the live [`FormState`] and is the only thing that
//! mutates it. Every input goes through here: the value is stored, its
//! validation state is recomputed on the spot, and the slower side effects
//! (showing the inline message, writing the draft) are queued on the
//! [`Scheduler`] and run when the owner calls [`FormController::tick`].
//!
//! Text fields surface their message after the validation debounce and save
//! after the save debounce. Choices and checkboxes surface and save at once.
//! Navigation always saves at once.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::NavigationError;
use crate::form_state::FormState;
use crate::rules::{CHECKED_VALUE, DATE_OF_BIRTH_FIELDS, RuleTable, ValidationOutcome};
use crate::scheduler::Scheduler;
use crate::steps::{Step, StepModel};
use crate::storage::{DraftStore, KeyValueStore};
use crate::types::{FieldKind, ValidationState};

const SAVE_KEY: &str = "save";
const SUBMIT_KEY: &str = "submit";

/// Work the controller defers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTask {
    /// Show or hide a field's inline message
    SurfaceField(String),
    /// Write the draft
    SaveDraft,
    /// Finish a submission once the artificial delay has passed
    CompleteSubmission,
}

/// Where the form is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Editing,
    /// Submission accepted, waiting out the delay. Input is ignored.
    Submitting,
    /// Done. Input is ignored until reset.
    Submitted,
}

/// Urgency of a status announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Politeness {
    Polite,
    Assertive,
}

/// A status line for the user, in the order it was raised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub politeness: Politeness,
    pub message: String,
}

impl Announcement {
    fn polite(message: impl Into<String>) -> Self {
        Self {
            politeness: Politeness::Polite,
            message: message.into(),
        }
    }

    fn assertive(message: impl Into<String>) -> Self {
        Self {
            politeness: Politeness::Assertive,
            message: message.into(),
        }
    }
}

/// Required fields that currently validate, out of all required fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionStatus {
    pub completed: usize,
    pub total: usize,
}

impl CompletionStatus {
    pub fn is_ready(self) -> bool {
        self.completed == self.total
    }

    pub fn percent(self) -> u16 {
        if self.total == 0 {
            return 100;
        }
        (self.completed * 100 / self.total) as u16
    }
}

/// Delays applied to deferred work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub validation_debounce: Duration,
    pub save_debounce: Duration,
    pub submit_delay: Duration,
    pub resize_throttle: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            validation_debounce: Duration::from_millis(300),
            save_debounce: Duration::from_millis(500),
            submit_delay: Duration::from_millis(2000),
            resize_throttle: Duration::from_millis(250),
        }
    }
}

/// Multi-step form controller over a key-value store
#[derive(Debug)]
pub struct FormController<S: KeyValueStore> {
    state: FormState,
    rules: RuleTable,
    steps: StepModel,
    drafts: DraftStore<S>,
    scheduler: Scheduler<FormTask>,
    timings: Timings,
    /// Inline messages currently shown, by field
    messages: BTreeMap<String, String>,
    announcements: Vec<Announcement>,
    phase: Phase,
    submitted: Option<BTreeMap<String, String>>,
    /// A draft with answers is on disk, as of the last save or clear
    draft_stored: bool,
}

impl<S: KeyValueStore> FormController<S> {
    pub fn new(store: S, rules: RuleTable, timings: Timings) -> Self {
        let drafts = DraftStore::new(store);
        let draft_stored = drafts.has_unsaved_data();
        Self {
            state: FormState::new(),
            rules,
            steps: StepModel::standard(),
            drafts,
            scheduler: Scheduler::new(),
            timings,
            messages: BTreeMap::new(),
            announcements: Vec::new(),
            phase: Phase::Editing,
            submitted: None,
            draft_stored,
        }
    }

    // ---- accessors ----

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn current_step(&self) -> Step {
        self.state.current_step
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn steps(&self) -> &StepModel {
        &self.steps
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn drafts(&self) -> &DraftStore<S> {
        &self.drafts
    }

    pub fn drafts_mut(&mut self) -> &mut DraftStore<S> {
        &mut self.drafts
    }

    pub fn value(&self, name: &str) -> &str {
        self.state.value(name)
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.state.field(name).is_some_and(|field| field.checked)
    }

    pub fn validation_state(&self, name: &str) -> ValidationState {
        self.state
            .field(name)
            .map_or(ValidationState::Empty, |field| field.validation_state)
    }

    /// Inline message currently shown for a field
    pub fn message(&self, name: &str) -> Option<&str> {
        self.messages.get(name).map(String::as_str)
    }

    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }

    /// Drain pending announcements, oldest first
    pub fn take_announcements(&mut self) -> Vec<Announcement> {
        std::mem::take(&mut self.announcements)
    }

    /// Answers of the last completed submission
    pub fn submitted_answers(&self) -> Option<&BTreeMap<String, String>> {
        self.submitted.as_ref()
    }

    pub fn is_locked(&self) -> bool {
        self.phase != Phase::Editing
    }

    // ---- input ----

    /// Type into a text field
    pub fn set_text(&mut self, name: &str, value: &str) -> bool {
        if !self.accepts_input(name, FieldKind::Text) {
            return false;
        }
        let field = self.state.field_mut(name);
        field.value = value.to_string();
        field.checked = false;
        self.recompute(name);

        self.scheduler.schedule_debounced(
            surface_key(name),
            self.timings.validation_debounce,
            FormTask::SurfaceField(name.to_string()),
        );
        self.scheduler
            .schedule_debounced(SAVE_KEY, self.timings.save_debounce, FormTask::SaveDraft);
        true
    }

    /// Pick one option of a grouped choice. Picking replaces any earlier pick.
    pub fn select_choice(&mut self, name: &str, option: &str) -> bool {
        if !self.accepts_input(name, FieldKind::Choice) {
            return false;
        }
        let field = self.state.field_mut(name);
        field.value = option.to_string();
        field.checked = !option.is_empty();
        self.discrete_changed(name);
        true
    }

    pub fn set_checked(&mut self, name: &str, checked: bool) -> bool {
        if !self.accepts_input(name, FieldKind::Checkbox) {
            return false;
        }
        let field = self.state.field_mut(name);
        field.checked = checked;
        field.value = if checked { CHECKED_VALUE.to_string() } else { String::new() };
        self.discrete_changed(name);
        true
    }

    /// Set a field by name whatever its kind. A checkbox is checked by
    /// [`CHECKED_VALUE`] and cleared by anything else.
    pub fn set_value(&mut self, name: &str, value: &str) -> bool {
        match self.rules.get(name).map(|rule| rule.kind) {
            Some(FieldKind::Text) => self.set_text(name, value),
            Some(FieldKind::Choice) => self.select_choice(name, value),
            Some(FieldKind::Checkbox) => self.set_checked(name, value == CHECKED_VALUE),
            None => {
                debug!("Ignoring value for unknown field '{}'", name);
                false
            }
        }
    }

    pub fn toggle_checked(&mut self, name: &str) -> bool {
        let checked = self.is_checked(name);
        self.set_checked(name, !checked)
    }

    fn accepts_input(&self, name: &str, kind: FieldKind) -> bool {
        if self.is_locked() {
            debug!("Ignoring input for '{}' while {:?}", name, self.phase);
            return false;
        }
        match self.rules.get(name) {
            Some(rule) if rule.kind == kind => true,
            Some(rule) => {
                warn!("Field '{}' is {:?}, not {:?}", name, rule.kind, kind);
                false
            }
            None => {
                debug!("Ignoring input for unknown field '{}'", name);
                false
            }
        }
    }

    fn discrete_changed(&mut self, name: &str) {
        self.recompute(name);
        self.surface(name);
        self.save_now();
    }

    // ---- validation ----

    fn outcome(&self, name: &str) -> ValidationOutcome {
        self.rules.validate(name, self.state.value(name))
    }

    /// Refresh the stored validation state from the current value
    fn recompute(&mut self, name: &str) -> ValidationOutcome {
        let outcome = self.outcome(name);
        let Some(kind) = self.rules.get(name).map(|rule| rule.kind) else {
            return outcome;
        };
        let state = outcome.state_for(kind, self.state.value(name));
        self.state.field_mut(name).validation_state = state;
        if outcome.valid {
            self.messages.remove(name);
        }
        outcome
    }

    /// Show or clear the inline message for a field
    fn surface(&mut self, name: &str) -> ValidationOutcome {
        let outcome = self.recompute(name);
        if outcome.valid {
            self.messages.remove(name);
        } else {
            self.announcements.push(Announcement::assertive(format!(
                "Error in {}: {}",
                name, outcome.message
            )));
            self.messages.insert(name.to_string(), outcome.message.clone());
        }
        outcome
    }

    /// Validate one field now and surface the result
    pub fn validate_field(&mut self, name: &str) -> ValidationOutcome {
        self.surface(name)
    }

    /// Validate every required field of a step, surfacing each failure.
    /// Returns the names of the fields that failed.
    pub fn validate_step(&mut self, step: Step) -> Vec<String> {
        self.steps
            .required_fields(step)
            .iter()
            .filter(|name| !self.surface(name).valid)
            .map(|name| name.to_string())
            .collect()
    }

    /// All three date-of-birth parts are present and within range
    pub fn date_group_complete(&self) -> bool {
        let [day, month, year] = DATE_OF_BIRTH_FIELDS.map(|name| self.state.value(name));
        self.rules.validate_date_group(day, month, year)
    }

    // ---- navigation ----

    fn ensure_unlocked(&self) -> Result<(), NavigationError> {
        if self.is_locked() {
            Err(NavigationError::Locked)
        } else {
            Ok(())
        }
    }

    /// Move forward one step if the current step's required fields validate
    pub fn advance(&mut self) -> Result<Step, NavigationError> {
        self.ensure_unlocked()?;
        let step = self.state.current_step;
        let Some(next) = step.next() else {
            return Err(NavigationError::AtLastStep);
        };

        let invalid_fields = self.validate_step(step);
        if !invalid_fields.is_empty() {
            info!("Step {} blocked by {:?}", step, invalid_fields);
            self.announcements.push(Announcement::assertive(
                "Please complete all required fields before continuing",
            ));
            return Err(NavigationError::Incomplete {
                step,
                invalid_fields,
            });
        }

        self.enter_step(next);
        Ok(next)
    }

    /// Move back one step. Never validates.
    pub fn retreat(&mut self) -> Result<Step, NavigationError> {
        self.ensure_unlocked()?;
        let previous = self
            .state
            .current_step
            .previous()
            .ok_or(NavigationError::AtFirstStep)?;
        self.enter_step(previous);
        Ok(previous)
    }

    /// Jump straight to a step by number, without validation
    pub fn go_to_step(&mut self, number: u8) -> Result<Step, NavigationError> {
        self.ensure_unlocked()?;
        let step = Step::from_number(number).ok_or(NavigationError::OutOfRange(number))?;
        self.enter_step(step);
        Ok(step)
    }

    fn enter_step(&mut self, step: Step) {
        debug!("Step {} -> {}", self.state.current_step, step);
        self.state.current_step = step;
        self.save_now();
        self.announcements.push(Announcement::polite(format!(
            "Step {} of {}",
            step,
            Step::TOTAL
        )));
    }

    /// Start submission from the final step, once the final step's own
    /// required fields validate.
    pub fn submit(&mut self) -> Result<(), NavigationError> {
        self.ensure_unlocked()?;
        let step = self.state.current_step;
        if !step.is_last() {
            return Err(NavigationError::NotOnFinalStep);
        }

        let invalid_fields = self.validate_step(step);
        if !invalid_fields.is_empty() {
            self.announcements.push(Announcement::assertive(
                "Please complete all required fields before submitting",
            ));
            return Err(NavigationError::Incomplete {
                step,
                invalid_fields,
            });
        }

        info!("Submitting registration");
        self.phase = Phase::Submitting;
        self.scheduler
            .schedule_after(SUBMIT_KEY, self.timings.submit_delay, FormTask::CompleteSubmission);
        self.announcements.push(Announcement::polite("Submitting..."));
        Ok(())
    }

    fn complete_submission(&mut self) {
        let answers = self.state.answers();
        info!("Registration submitted with {} answers", answers.len());
        self.scheduler.cancel_all();
        self.clear_draft();
        self.phase = Phase::Submitted;
        self.submitted = Some(answers);
        self.announcements.push(Announcement::assertive(
            "Form submitted successfully! Thank you for your participation.",
        ));
    }

    /// Clear every answer and the stored draft, and return to the first step
    pub fn reset(&mut self) {
        info!("Resetting form");
        self.scheduler.cancel_all();
        self.state = FormState::new();
        self.messages.clear();
        self.phase = Phase::Editing;
        self.submitted = None;
        self.clear_draft();
        self.announcements.push(Announcement::assertive("Form reset"));
    }

    // ---- completion ----

    /// Recomputed from the current values on every call
    pub fn completion_status(&self) -> CompletionStatus {
        let mut total = 0;
        let mut completed = 0;
        for name in self.steps.all_required() {
            total += 1;
            if self.outcome(name).valid {
                completed += 1;
            }
        }
        CompletionStatus { completed, total }
    }

    pub fn is_ready(&self) -> bool {
        self.completion_status().is_ready()
    }

    /// Every required field of `step` validates. Nothing is surfaced.
    pub fn step_complete(&self, step: Step) -> bool {
        self.steps
            .required_fields(step)
            .iter()
            .all(|name| self.outcome(name).valid)
    }

    /// Required fields that do not validate, in step order. Nothing is
    /// surfaced.
    pub fn incomplete_fields(&self) -> Vec<&'static str> {
        self.steps
            .all_required()
            .filter(|name| !self.outcome(name).valid)
            .collect()
    }

    // ---- persistence ----

    /// Replay the stored draft onto the form. Returns `false` when there is
    /// nothing usable to restore.
    pub fn restore(&mut self) -> bool {
        let Some(draft) = self.drafts.load() else {
            return false;
        };

        self.state = FormState::new();
        self.state.current_step = draft.current_step;
        self.state.timestamp = draft.timestamp;

        for (name, stored) in &draft.fields {
            let Some(rule) = self.rules.get(name) else {
                debug!("Skipping stored field '{}' with no rule", name);
                continue;
            };
            let field = self.state.field_mut(name);
            match rule.kind {
                FieldKind::Checkbox => {
                    field.checked = stored.checked;
                    field.value = if stored.checked {
                        CHECKED_VALUE.to_string()
                    } else {
                        String::new()
                    };
                }
                FieldKind::Choice | FieldKind::Text => {
                    field.value = stored.value.clone();
                    field.checked = stored.checked;
                }
            }
            self.recompute(name);
            let restored = self.validation_state(name);
            if restored != stored.validation_state {
                debug!(
                    "Stored state of '{}' was {}, recomputed {}",
                    name, stored.validation_state, restored
                );
            }
        }

        info!(
            "Restored draft at step {} with {} fields",
            self.state.current_step,
            self.state.fields.len()
        );
        true
    }

    /// Write the draft immediately. Nothing is written once submission has
    /// completed.
    pub fn save_now(&mut self) -> bool {
        if self.phase == Phase::Submitted {
            return false;
        }
        self.state.touch();
        let saved = self.drafts.save(&self.state);
        if saved {
            self.draft_stored = !self.state.fields.is_empty();
        }
        saved
    }

    fn clear_draft(&mut self) {
        if self.drafts.clear() {
            self.draft_stored = false;
        }
    }

    /// A draft with answers was stored and not cleared since. Tracked
    /// in memory, the store is only read at construction.
    pub fn has_unsaved_data(&self) -> bool {
        self.draft_stored
    }

    /// A save is queued but has not run yet
    pub fn save_pending(&self) -> bool {
        self.scheduler.is_pending(SAVE_KEY)
    }

    // ---- time ----

    /// Advance virtual time and run whatever fell due. Returns the tasks run.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<FormTask> {
        let due = self.scheduler.advance(elapsed);
        for task in &due {
            match task {
                FormTask::SurfaceField(name) => {
                    self.surface(name);
                }
                FormTask::SaveDraft => {
                    self.save_now();
                }
                FormTask::CompleteSubmission => self.complete_submission(),
            }
        }
        due
    }

    /// Admit a call under `key` at most once per `limit`
    pub fn throttle(&mut self, key: &str, limit: Duration) -> bool {
        self.scheduler.throttle(key, limit)
    }
}

fn surface_key(name: &str) -> String {
    format!("validate:{name}")
}
