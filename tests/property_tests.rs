//! Property-Based Tests for regform
//!
//! Uses proptest for testing invariants of the form:
//! - Completion counts exactly the required fields that validate
//! - Navigation only blocks going forward
//! - Drafts survive a save/load cycle
//! - Debounced work runs once, after the last trigger

use proptest::prelude::*;
use std::time::Duration;

use regform::controller::{FormController, Timings};
use regform::rules::RuleTable;
use regform::scheduler::Scheduler;
use regform::steps::{Step, StepModel};
use regform::storage::{DraftStore, MemoryStore};
use regform::{FieldState, FormState, NavigationError, ValidationState};

/// A valid answer for every required field, in step order
const VALID_ANSWERS: [(&str, &str); 18] = [
    ("canAttendAllDates", "yes"),
    ("isEligible", "yes"),
    ("firstName", "Mary"),
    ("lastName", "Seacole"),
    ("email", "mary@example.org"),
    ("phone", "020 7946 0000"),
    ("addressLine1", "1 Hospital Lane"),
    ("city", "Bristol"),
    ("postCode", "BS1 5TR"),
    ("gender", "female"),
    ("birthDay", "23"),
    ("birthMonth", "11"),
    ("birthYear", "1965"),
    ("ethnicity", "mixed-multiple"),
    ("healthConditions", "no"),
    ("nhsSatisfaction", "quite-satisfied"),
    ("education", "level-3"),
    ("dataConsent", "yes"),
];

fn form() -> FormController<MemoryStore> {
    FormController::new(
        MemoryStore::new(),
        RuleTable::with_current_year(2026),
        Timings::default(),
    )
}

/// Form with the fields flagged `true` answered validly and the rest empty
fn filled_form(answered: &[bool]) -> FormController<MemoryStore> {
    let mut form = form();
    for ((name, value), answered) in VALID_ANSWERS.iter().zip(answered) {
        if *answered {
            assert!(form.set_value(name, value));
        }
    }
    form
}

fn step_strategy() -> impl Strategy<Value = Step> {
    (1..=Step::TOTAL).prop_map(|n| Step::from_number(n).expect("in range"))
}

// =============================================================================
// Completion
// =============================================================================

/// The answer table covers exactly the required fields
#[test]
fn answer_table_matches_required_fields() {
    let required: Vec<&str> = StepModel::standard().all_required().collect();
    let answered: Vec<&str> = VALID_ANSWERS.iter().map(|(name, _)| *name).collect();
    assert_eq!(required, answered);
}

proptest! {
    /// Completion counts the answered fields; ready iff all are answered
    #[test]
    fn completion_counts_valid_fields(answered in prop::collection::vec(any::<bool>(), 18)) {
        let form = filled_form(&answered);
        let status = form.completion_status();
        let expected = answered.iter().filter(|a| **a).count();

        prop_assert_eq!(status.total, 18);
        prop_assert_eq!(status.completed, expected);
        prop_assert_eq!(status.is_ready(), expected == 18);
        prop_assert_eq!(form.incomplete_fields().len(), 18 - expected);
    }

    /// Invalidating one valid field lowers the count by exactly one
    #[test]
    fn clearing_one_field_decrements_completion(index in 0usize..18) {
        let mut form = filled_form(&[true; 18]);
        prop_assert!(form.is_ready());

        let (name, _) = VALID_ANSWERS[index];
        prop_assert!(form.set_value(name, ""));
        let status = form.completion_status();
        prop_assert_eq!(status.completed, 17);
        prop_assert!(!status.is_ready());
        prop_assert_eq!(form.incomplete_fields(), vec![name]);
    }
}

// =============================================================================
// Navigation
// =============================================================================

proptest! {
    /// Going back never validates and always lands one step earlier
    #[test]
    fn retreat_is_unconditional(step in step_strategy()) {
        let mut form = form();
        form.go_to_step(step.number()).unwrap();

        match step.previous() {
            Some(previous) => prop_assert_eq!(form.retreat(), Ok(previous)),
            None => prop_assert_eq!(form.retreat(), Err(NavigationError::AtFirstStep)),
        }
    }

    /// Advancing from an empty step 1-4 is refused and leaves the step alone
    #[test]
    fn advance_blocked_on_empty_form(step in step_strategy()) {
        let mut form = form();
        form.go_to_step(step.number()).unwrap();

        let result = form.advance();
        prop_assert_eq!(form.current_step(), step);
        if step.is_last() {
            prop_assert_eq!(result, Err(NavigationError::AtLastStep));
        } else {
            let blocked = matches!(result, Err(NavigationError::Incomplete { step: s, .. }) if s == step);
            prop_assert!(blocked);
        }
    }

    /// Advancing from a complete form always reaches the next step
    #[test]
    fn advance_allowed_on_complete_form(step in step_strategy()) {
        let mut form = filled_form(&[true; 18]);
        form.go_to_step(step.number()).unwrap();

        match step.next() {
            Some(next) => prop_assert_eq!(form.advance(), Ok(next)),
            None => prop_assert_eq!(form.advance(), Err(NavigationError::AtLastStep)),
        }
    }

    /// Jumps outside 1..=5 are rejected without moving
    #[test]
    fn out_of_range_jump_rejected(number in prop_oneof![Just(0u8), 6u8..=u8::MAX]) {
        let mut form = form();
        prop_assert_eq!(form.go_to_step(number), Err(NavigationError::OutOfRange(number)));
        prop_assert_eq!(form.current_step(), Step::FIRST);
    }
}

// =============================================================================
// Persistence
// =============================================================================

fn field_state_strategy() -> impl Strategy<Value = FieldState> {
    (
        ".{0,40}",
        any::<bool>(),
        prop_oneof![
            Just(ValidationState::Empty),
            Just(ValidationState::Valid),
            Just(ValidationState::Invalid),
        ],
    )
        .prop_map(|(value, checked, validation_state)| FieldState {
            value,
            checked,
            validation_state,
        })
}

proptest! {
    /// Whatever is saved is loaded back unchanged, including odd text
    #[test]
    fn draft_survives_save_and_load(
        step in step_strategy(),
        fields in prop::collection::btree_map("[a-zA-Z]{1,12}", field_state_strategy(), 0..10),
        timestamp in any::<i64>(),
    ) {
        let state = FormState { current_step: step, fields, timestamp };
        let mut drafts = DraftStore::new(MemoryStore::new());

        prop_assert!(drafts.save(&state));
        prop_assert_eq!(drafts.load(), Some(state));
    }
}

// =============================================================================
// Scheduler
// =============================================================================

proptest! {
    /// A burst of triggers closer together than the delay runs the last task
    /// once, exactly one delay after the last trigger
    #[test]
    fn debounce_runs_last_task_once(gaps in prop::collection::vec(0u64..300, 1..20)) {
        let delay = Duration::from_millis(300);
        let mut scheduler = Scheduler::new();

        for (i, gap) in gaps.iter().enumerate() {
            prop_assert!(scheduler.advance(Duration::from_millis(*gap)).is_empty());
            scheduler.schedule_debounced("save", delay, i);
        }

        prop_assert!(scheduler.advance(delay - Duration::from_millis(1)).is_empty());
        prop_assert_eq!(scheduler.advance(Duration::from_millis(1)), vec![gaps.len() - 1]);
        prop_assert!(scheduler.advance(delay * 10).is_empty());
    }

    /// A throttle admits one call per window
    #[test]
    fn throttle_admits_once_per_window(calls in prop::collection::vec(0u64..100, 1..50)) {
        let limit = Duration::from_millis(250);
        let mut scheduler: Scheduler<()> = Scheduler::new();
        let mut window_end: Option<Duration> = None;

        for gap in calls {
            scheduler.advance(Duration::from_millis(gap));
            let now = scheduler.now();
            let expected = window_end.is_none_or(|end| now >= end);
            prop_assert_eq!(scheduler.throttle("resize", limit), expected);
            if expected {
                window_end = Some(now + limit);
            }
        }
    }
}
