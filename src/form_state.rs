//! Serializable form state
//!
//! [`FormState`] is the whole draft: the current step plus every field's
//! value, checked flag and validation state. It is written to storage as one
//! JSON record and read back as one record.
//!
//! ```json
//! {
//!   "currentStep": 2,
//!   "fields": {
//!     "firstName": { "value": "Ada", "checked": false, "validationState": "valid" }
//!   },
//!   "timestamp": 1760000000000
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::steps::Step;
use crate::types::ValidationState;

/// Stored state of one field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldState {
    pub value: String,
    pub checked: bool,
    pub validation_state: ValidationState,
}

/// The complete draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    /// Unknown or out-of-range stored steps restore as the first step
    #[serde(default, deserialize_with = "deserialize_step_lenient")]
    pub current_step: Step,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldState>,
    /// Epoch milliseconds of the last save
    #[serde(default)]
    pub timestamp: i64,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// Empty draft on the first step
    pub fn new() -> Self {
        Self {
            current_step: Step::FIRST,
            fields: BTreeMap::new(),
            timestamp: 0,
        }
    }

    /// State of a field, if it has ever been touched
    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.get(name)
    }

    /// Current value of a field, empty when untouched
    pub fn value(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", |field| field.value.as_str())
    }

    pub fn field_mut(&mut self, name: &str) -> &mut FieldState {
        self.fields.entry(name.to_string()).or_default()
    }

    /// True when no field holds a value or a check
    pub fn is_blank(&self) -> bool {
        self.fields
            .values()
            .all(|field| field.value.is_empty() && !field.checked)
    }

    /// Stamp the state with the current wall-clock time
    pub fn touch(&mut self) {
        self.timestamp = chrono::Utc::now().timestamp_millis();
    }

    /// Non-empty answers keyed by field name, as a submission payload
    pub fn answers(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter(|(_, field)| !field.value.is_empty())
            .map(|(name, field)| (name.clone(), field.value.clone()))
            .collect()
    }
}

fn deserialize_step_lenient<'de, D>(deserializer: D) -> Result<Step, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let step = raw
        .as_ref()
        .and_then(serde_json::Value::as_u64)
        .and_then(|n| u8::try_from(n).ok())
        .and_then(Step::from_number)
        .unwrap_or(Step::FIRST);
    Ok(step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_blank() {
        let state = FormState::new();
        assert_eq!(state.current_step, Step::Eligibility);
        assert!(state.is_blank());
        assert_eq!(state.value("firstName"), "");
    }

    #[test]
    fn test_serialized_layout() {
        let mut state = FormState::new();
        state.current_step = Step::ContactDetails;
        state.timestamp = 42;
        *state.field_mut("firstName") = FieldState {
            value: "Ada".into(),
            checked: false,
            validation_state: ValidationState::Valid,
        };

        let json: serde_json::Value = serde_json::to_value(&state).unwrap();
        assert_eq!(json["currentStep"], 2);
        assert_eq!(json["timestamp"], 42);
        assert_eq!(json["fields"]["firstName"]["value"], "Ada");
        assert_eq!(json["fields"]["firstName"]["checked"], false);
        assert_eq!(json["fields"]["firstName"]["validationState"], "valid");
    }

    #[test]
    fn test_out_of_range_step_restores_to_first() {
        let state: FormState =
            serde_json::from_str(r#"{"currentStep": 9, "fields": {}, "timestamp": 1}"#).unwrap();
        assert_eq!(state.current_step, Step::Eligibility);

        let state: FormState = serde_json::from_str(r#"{"currentStep": "x"}"#).unwrap();
        assert_eq!(state.current_step, Step::Eligibility);
    }

    #[test]
    fn test_missing_keys_default() {
        let state: FormState =
            serde_json::from_str(r#"{"currentStep": 3, "fields": {"city": {"value": "Leeds"}}}"#)
                .unwrap();
        assert_eq!(state.current_step, Step::AboutYou);
        let city = state.field("city").unwrap();
        assert_eq!(city.value, "Leeds");
        assert!(!city.checked);
        assert_eq!(city.validation_state, ValidationState::Empty);
        assert_eq!(state.timestamp, 0);
    }

    #[test]
    fn test_answers_skip_empty_values() {
        let mut state = FormState::new();
        state.field_mut("email").value = "a@b.co".into();
        state.field_mut("addressLine2");
        let answers = state.answers();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers["email"], "a@b.co");
    }
}
