//! Integration tests for regform
//!
//! These tests drive the form end to end over a real directory:
//! - Answers survive a restart through the draft file
//! - Submission clears the draft and locks the form
//! - The language preference is remembered
//! - Unreadable drafts are discarded, never fatal

use std::fs;
use std::time::Duration;
use tempfile::TempDir;

use regform::commands;
use regform::controller::{FormController, Phase, Timings};
use regform::i18n::{self, Translator};
use regform::rules::RuleTable;
use regform::steps::Step;
use regform::storage::{DRAFT_KEY, FileStore, KeyValueStore};
use regform::{Language, NavigationError, ValidationState};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn open(dir: &TempDir) -> FormController<FileStore> {
    FormController::new(
        FileStore::new(dir.path()),
        RuleTable::with_current_year(2026),
        Timings::default(),
    )
}

fn answer_step_one(form: &mut FormController<FileStore>) {
    assert!(form.set_checked("canAttendAllDates", true));
    assert!(form.set_checked("isEligible", true));
}

fn answer_step_two(form: &mut FormController<FileStore>) {
    for (name, value) in [
        ("firstName", "Florence"),
        ("lastName", "Nightingale"),
        ("email", "florence@example.co.uk"),
        ("phone", "+44 7700 900123"),
        ("addressLine1", "10 South Street"),
        ("city", "Derby"),
        ("postCode", "DE1 1AA"),
    ] {
        assert!(form.set_text(name, value), "{name} rejected");
    }
}

fn answer_step_three(form: &mut FormController<FileStore>) {
    for (name, value) in [("birthDay", "12"), ("birthMonth", "5"), ("birthYear", "1980")] {
        assert!(form.set_text(name, value));
    }
    for (name, value) in [
        ("gender", "female"),
        ("ethnicity", "white-british"),
        ("healthConditions", "limited-little"),
        ("nhsSatisfaction", "very-satisfied"),
        ("education", "level-4-above"),
    ] {
        assert!(form.select_choice(name, value));
    }
}

#[test]
fn test_draft_survives_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut form = open(&dir);
        answer_step_one(&mut form);
        assert_eq!(form.advance(), Ok(Step::ContactDetails));
        form.set_text("firstName", "Florence");
        form.set_text("email", "florence@");
        // Typing is saved after the debounce
        form.tick(ms(500));
    }
    assert!(dir.path().join(format!("{DRAFT_KEY}.json")).exists());

    let mut form = open(&dir);
    assert!(form.restore());
    assert_eq!(form.current_step(), Step::ContactDetails);
    assert!(form.is_checked("canAttendAllDates"));
    assert_eq!(form.value("firstName"), "Florence");
    assert_eq!(form.validation_state("firstName"), ValidationState::Valid);
    assert_eq!(form.validation_state("email"), ValidationState::Invalid);
    assert_eq!(form.validation_state("lastName"), ValidationState::Empty);
    assert_eq!(form.completion_status().completed, 3);
}

#[test]
fn test_unsaved_typing_is_lost_without_tick() {
    let dir = TempDir::new().unwrap();
    {
        let mut form = open(&dir);
        answer_step_one(&mut form);
        form.set_text("firstName", "Florence");
        form.tick(ms(499));
        assert!(form.save_pending());
    }
    let mut form = open(&dir);
    assert!(form.restore());
    assert!(form.is_checked("isEligible"));
    assert_eq!(form.value("firstName"), "");
}

#[test]
fn test_full_registration_flow() {
    let dir = TempDir::new().unwrap();
    let mut form = open(&dir);

    assert!(matches!(
        form.advance(),
        Err(NavigationError::Incomplete { step: Step::Eligibility, .. })
    ));
    answer_step_one(&mut form);
    assert_eq!(form.advance(), Ok(Step::ContactDetails));

    answer_step_two(&mut form);
    assert_eq!(form.advance(), Ok(Step::AboutYou));

    answer_step_three(&mut form);
    assert!(form.date_group_complete());
    assert_eq!(form.advance(), Ok(Step::Consent));

    assert!(form.set_checked("dataConsent", true));
    assert_eq!(form.advance(), Ok(Step::Review));
    assert!(form.is_ready());

    form.submit().unwrap();
    assert_eq!(form.phase(), Phase::Submitting);
    assert!(!form.set_text("firstName", "Changed"));
    assert_eq!(form.retreat(), Err(NavigationError::Locked));

    form.tick(ms(2000));
    assert_eq!(form.phase(), Phase::Submitted);
    assert!(!form.has_unsaved_data());
    assert!(!dir.path().join(format!("{DRAFT_KEY}.json")).exists());

    let answers = form.submitted_answers().unwrap();
    assert_eq!(answers["firstName"], "Florence");
    assert_eq!(answers["dataConsent"], "yes");
    assert!(!answers.contains_key("addressLine2"));

    // Nothing is written back after completion
    assert!(!form.save_now());
    assert!(!open(&dir).restore());
}

#[test]
fn test_submit_after_jump_checks_final_step_only() {
    let dir = TempDir::new().unwrap();
    let mut form = open(&dir);
    answer_step_one(&mut form);
    answer_step_three(&mut form);
    assert!(!form.is_ready());

    assert_eq!(form.go_to_step(5), Ok(Step::Review));
    form.submit().unwrap();
    assert_eq!(form.phase(), Phase::Submitting);

    form.tick(ms(2000));
    assert_eq!(form.phase(), Phase::Submitted);
    assert!(!dir.path().join(format!("{DRAFT_KEY}.json")).exists());
    let answers = form.submitted_answers().unwrap();
    assert_eq!(answers["gender"], "female");
    assert!(!answers.contains_key("firstName"));
}

#[test]
fn test_reset_removes_draft_file() {
    let dir = TempDir::new().unwrap();
    let mut form = open(&dir);
    answer_step_one(&mut form);
    assert!(form.has_unsaved_data());

    form.reset();
    assert!(!form.has_unsaved_data());
    assert_eq!(form.current_step(), Step::Eligibility);
    assert_eq!(form.completion_status().completed, 0);
    assert!(commands::draft_status(FileStore::new(dir.path()), RuleTable::standard()).is_none());
}

#[test]
fn test_corrupt_draft_is_discarded() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(format!("{DRAFT_KEY}.json")), "{\"currentStep\": 3, ").unwrap();

    let mut form = open(&dir);
    assert!(!form.restore());
    assert_eq!(form.current_step(), Step::Eligibility);

    // The next save replaces the bad record
    answer_step_one(&mut form);
    assert!(open(&dir).restore());
}

#[test]
fn test_out_of_range_stored_step_restores_first_step() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path());
    store
        .set(
            DRAFT_KEY,
            r#"{"currentStep": 9, "fields": {"city": {"value": "York", "checked": false, "validationState": "invalid"}, "shoeSize": {"value": "9"}}, "timestamp": 0}"#,
        )
        .unwrap();

    let mut form = open(&dir);
    assert!(form.restore());
    assert_eq!(form.current_step(), Step::Eligibility);
    assert_eq!(form.validation_state("city"), ValidationState::Valid);
    assert_eq!(form.value("shoeSize"), "");
}

#[test]
fn test_language_preference_persists() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path());
    assert_eq!(
        i18n::detect_language(None, &store, Some("en_GB.UTF-8")),
        Language::English
    );

    assert!(i18n::save_language(&mut store, Language::Arabic));
    let store = FileStore::new(dir.path());
    let language = i18n::detect_language(None, &store, Some("en_GB.UTF-8"));
    assert_eq!(language, Language::Arabic);

    let translator = Translator::new(language);
    assert!(translator.is_rtl());
    // An explicit parameter still wins
    assert_eq!(
        i18n::detect_language(Some("fr"), &store, None),
        Language::French
    );
}

#[test]
fn test_check_command_on_saved_draft() {
    let dir = TempDir::new().unwrap();
    let mut form = open(&dir);
    answer_step_one(&mut form);
    answer_step_two(&mut form);
    form.tick(ms(500));

    let draft = dir.path().join(format!("{DRAFT_KEY}.json"));
    let summary = commands::check_draft_file(&draft, RuleTable::with_current_year(2026)).unwrap();
    assert_eq!(summary.completion.completed, 9);
    assert_eq!(summary.incomplete.len(), 9);
    assert!(summary.incomplete.iter().all(|(step, _)| step.number() >= 3));
}
