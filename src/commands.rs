//! Headless commands
//!
//! `status`, `check` and `reset` work on a stored draft without starting the
//! terminal UI. They reuse [`FormController`], so a draft is judged by the
//! same rules the form applies.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::controller::{CompletionStatus, FormController, Timings};
use crate::rules::RuleTable;
use crate::steps::Step;
use crate::storage::{DRAFT_KEY, KeyValueStore, MemoryStore};

/// What a stored draft contains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftSummary {
    pub step: Step,
    pub completion: CompletionStatus,
    /// Required fields that do not validate, with the step showing them
    pub incomplete: Vec<(Step, &'static str)>,
}

impl DraftSummary {
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_empty()
    }
}

fn summarize<S: KeyValueStore>(form: &FormController<S>) -> DraftSummary {
    let incomplete = form
        .incomplete_fields()
        .into_iter()
        .map(|name| (form.steps().step_of(name).unwrap_or(Step::FIRST), name))
        .collect();
    DraftSummary {
        step: form.current_step(),
        completion: form.completion_status(),
        incomplete,
    }
}

/// Summary of the draft in `store`, `None` when nothing usable is stored
pub fn draft_status<S: KeyValueStore>(store: S, rules: RuleTable) -> Option<DraftSummary> {
    let mut form = FormController::new(store, rules, Timings::default());
    form.restore().then(|| summarize(&form))
}

/// Judge a draft document, as written by the form
pub fn check_draft(raw: &str, rules: RuleTable) -> Result<DraftSummary> {
    let mut store = MemoryStore::new();
    store.set(DRAFT_KEY, raw)?;
    draft_status(store, rules).context("Not a readable draft")
}

/// Judge a draft file
pub fn check_draft_file(path: &Path, rules: RuleTable) -> Result<DraftSummary> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft file {:?}", path))?;
    check_draft(&raw, rules).with_context(|| format!("Cannot check {:?}", path))
}

/// Delete the draft in `store`. Returns whether one was stored.
pub fn reset_draft<S: KeyValueStore>(store: S) -> Result<bool> {
    let mut form = FormController::new(store, RuleTable::standard(), Timings::default());
    let existed = form.drafts().load().is_some();
    if !form.drafts_mut().clear() {
        anyhow::bail!("Failed to delete the stored draft");
    }
    info!("Draft reset (existed: {})", existed);
    Ok(existed)
}

/// Human-readable report of a summary
pub fn format_summary(summary: &DraftSummary) -> String {
    let mut out = format!(
        "Step {} of {}, {}/{} required fields complete",
        summary.step,
        Step::TOTAL,
        summary.completion.completed,
        summary.completion.total
    );
    if summary.is_complete() {
        out.push_str("\n✓ Ready to submit");
    } else {
        for (step, name) in &summary.incomplete {
            out.push_str(&format!("\n✗ {name} (step {step})"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileStore;
    use tempfile::TempDir;

    const PARTIAL_DRAFT: &str = r#"{
        "currentStep": 2,
        "fields": {
            "canAttendAllDates": {"value": "yes", "checked": true, "validationState": "valid"},
            "isEligible": {"value": "yes", "checked": true, "validationState": "valid"},
            "firstName": {"value": "Ada", "checked": false, "validationState": "valid"},
            "email": {"value": "not-an-email", "checked": false, "validationState": "valid"}
        },
        "timestamp": 1760000000000
    }"#;

    fn rules() -> RuleTable {
        RuleTable::with_current_year(2026)
    }

    #[test]
    fn test_check_partial_draft() {
        let summary = check_draft(PARTIAL_DRAFT, rules()).unwrap();
        assert_eq!(summary.step, Step::ContactDetails);
        assert_eq!(summary.completion.completed, 3);
        assert_eq!(summary.completion.total, 18);
        assert!(!summary.is_complete());
        // Stored states are not trusted: the bad email is re-validated
        assert_eq!(summary.incomplete[0], (Step::ContactDetails, "lastName"));
        assert!(summary.incomplete.contains(&(Step::ContactDetails, "email")));
        assert!(summary.incomplete.contains(&(Step::Consent, "dataConsent")));
    }

    #[test]
    fn test_check_rejects_garbage() {
        assert!(check_draft("{not json", rules()).is_err());
        assert!(check_draft_file(Path::new("/no/such/draft.json"), rules()).is_err());
    }

    #[test]
    fn test_status_and_reset_on_file_store() {
        let temp_dir = TempDir::new().unwrap();
        assert!(draft_status(FileStore::new(temp_dir.path()), rules()).is_none());

        let mut store = FileStore::new(temp_dir.path());
        store.set(DRAFT_KEY, PARTIAL_DRAFT).unwrap();
        let summary = draft_status(FileStore::new(temp_dir.path()), rules()).unwrap();
        assert_eq!(summary.step, Step::ContactDetails);

        assert!(reset_draft(FileStore::new(temp_dir.path())).unwrap());
        assert!(!reset_draft(FileStore::new(temp_dir.path())).unwrap());
        assert!(draft_status(FileStore::new(temp_dir.path()), rules()).is_none());
    }

    #[test]
    fn test_format_summary() {
        let summary = check_draft(PARTIAL_DRAFT, rules()).unwrap();
        let text = format_summary(&summary);
        assert!(text.starts_with("Step 2 of 5, 3/18 required fields complete"));
        assert!(text.contains("✗ email (step 2)"));
        assert!(!text.contains("Ready to submit"));
    }
}
