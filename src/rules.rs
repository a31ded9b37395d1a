//! Field rule table
//!
//! Every field of the form is described by a [`FieldRule`]: whether it is
//! required, which declarative [`Validator`] its value must pass, and the
//! message shown when it does not. Rules are plain data, so they can be
//! evaluated without any UI.
//!
//! # Evaluation order
//!
//! 1. Required check: a required field whose value is empty after trimming
//!    fails with [`REQUIRED_MESSAGE`].
//! 2. Predicate: a non-empty value the validator rejects fails with the
//!    rule's own message.
//!
//! The age rule uses calendar years only: anyone born in
//! `current_year - 16` or earlier passes, whatever their birthday.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;
use strum::VariantNames;

use crate::types::{Education, Ethnicity, FieldKind, Gender, HealthConditions, Satisfaction, ValidationState};

/// Message for a required field left blank
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Value a checkbox carries while checked
pub const CHECKED_VALUE: &str = "yes";

/// Minimum age in whole calendar years
pub const MINIMUM_AGE_YEARS: i32 = 16;

/// Earliest accepted birth year
pub const EARLIEST_BIRTH_YEAR: i32 = 1900;

/// Names of the three date-of-birth parts, in day/month/year order
pub const DATE_OF_BIRTH_FIELDS: [&str; 3] = ["birthDay", "birthMonth", "birthYear"];

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
});

static UK_MOBILE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+44\s?7[0-9]{3}|\(?07[0-9]{3}\)?)\s?[0-9]{3}\s?[0-9]{3}$")
        .expect("Invalid UK mobile regex")
});

static LOOSE_PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s+()-]{10,15}$").expect("Invalid phone regex"));

static UK_POSTCODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z]{1,2}[0-9][A-Z0-9]?\s?[0-9][A-Z]{2}$").expect("Invalid postcode regex")
});

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("Invalid name regex"));

/// Text patterns with a fixed meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Person or place name: at least two characters, letters, spaces, `-` and `'`
    Name,
    /// `local@domain.tld`
    Email,
    /// UK mobile number, or any 10 to 15 characters of digits and phone punctuation
    UkPhone,
    /// UK postcode, spaces ignored, case-insensitive
    UkPostcode,
    /// Anything with a non-whitespace character
    NonBlank,
}

impl PatternKind {
    fn matches(self, value: &str) -> bool {
        match self {
            Self::Name => value.trim().chars().count() >= 2 && NAME_REGEX.is_match(value),
            Self::Email => EMAIL_REGEX.is_match(value),
            Self::UkPhone => {
                UK_MOBILE_REGEX.is_match(&strip_whitespace(value)) || LOOSE_PHONE_REGEX.is_match(value)
            }
            Self::UkPostcode => UK_POSTCODE_REGEX.is_match(&strip_whitespace(value)),
            Self::NonBlank => !value.trim().is_empty(),
        }
    }
}

/// Declarative value predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    /// Accepts every value
    Any,
    /// Exactly this value
    Equals(&'static str),
    /// One of a closed set of option values
    OneOf(&'static [&'static str]),
    /// Leading integer within `min..=max`
    NumericRange { min: i64, max: i64 },
    /// Leading integer between [`EARLIEST_BIRTH_YEAR`] and `current_year - MINIMUM_AGE_YEARS`
    BirthYear,
    /// Text pattern
    Pattern(PatternKind),
}

impl Validator {
    /// Evaluate the predicate. `current_year` only matters for [`Validator::BirthYear`].
    pub fn accepts(&self, value: &str, current_year: i32) -> bool {
        match self {
            Self::Any => true,
            Self::Equals(expected) => value == *expected,
            Self::OneOf(options) => options.iter().any(|option| *option == value),
            Self::NumericRange { min, max } => {
                parse_leading_int(value).is_some_and(|n| (*min..=*max).contains(&n))
            }
            Self::BirthYear => {
                let latest = i64::from(current_year) - i64::from(MINIMUM_AGE_YEARS);
                parse_leading_int(value)
                    .is_some_and(|year| (i64::from(EARLIEST_BIRTH_YEAR)..=latest).contains(&year))
            }
            Self::Pattern(kind) => kind.matches(value),
        }
    }
}

/// Rule for one named field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub validator: Validator,
    pub message: &'static str,
}

impl FieldRule {
    const fn new(
        name: &'static str,
        kind: FieldKind,
        validator: Validator,
        message: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            required: true,
            validator,
            message,
        }
    }

    const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Option values of a choice field, empty for other kinds
    pub fn options(&self) -> &'static [&'static str] {
        match (&self.kind, &self.validator) {
            (FieldKind::Choice, Validator::OneOf(options)) => *options,
            _ => &[],
        }
    }
}

/// Result of validating one value against its rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub valid: bool,
    /// Empty when valid
    pub message: String,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }

    /// Persisted state for the value this outcome was computed from.
    ///
    /// Only text fields can be `Empty`. Checkboxes and choices are always
    /// judged, so an unticked required box is `Invalid`.
    pub fn state_for(&self, kind: FieldKind, value: &str) -> ValidationState {
        match kind {
            FieldKind::Text if value.is_empty() => ValidationState::Empty,
            _ if self.valid => ValidationState::Valid,
            _ => ValidationState::Invalid,
        }
    }
}

/// The form's rule table
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<FieldRule>,
    current_year: i32,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleTable {
    /// Registration form rules, evaluated against the local calendar year
    pub fn standard() -> Self {
        Self::with_current_year(chrono::Local::now().year())
    }

    /// Registration form rules with a fixed "current year"
    pub fn with_current_year(current_year: i32) -> Self {
        use FieldKind::{Checkbox, Choice, Text};

        let rules = vec![
            // Step 1
            FieldRule::new(
                "canAttendAllDates",
                Checkbox,
                Validator::Equals(CHECKED_VALUE),
                "You must confirm you can attend all dates",
            ),
            FieldRule::new(
                "isEligible",
                Checkbox,
                Validator::Equals(CHECKED_VALUE),
                "You must confirm you are eligible to attend",
            ),
            // Step 2
            FieldRule::new(
                "firstName",
                Text,
                Validator::Pattern(PatternKind::Name),
                "Please enter a valid first name",
            ),
            FieldRule::new(
                "lastName",
                Text,
                Validator::Pattern(PatternKind::Name),
                "Please enter a valid last name",
            ),
            FieldRule::new(
                "email",
                Text,
                Validator::Pattern(PatternKind::Email),
                "Please enter a valid email address",
            ),
            FieldRule::new(
                "phone",
                Text,
                Validator::Pattern(PatternKind::UkPhone),
                "Please enter a valid phone number",
            ),
            FieldRule::new(
                "addressLine1",
                Text,
                Validator::Pattern(PatternKind::NonBlank),
                "Please enter your address",
            ),
            FieldRule::new("addressLine2", Text, Validator::Any, "").optional(),
            FieldRule::new(
                "city",
                Text,
                Validator::Pattern(PatternKind::Name),
                "Please enter a valid city name",
            ),
            FieldRule::new(
                "postCode",
                Text,
                Validator::Pattern(PatternKind::UkPostcode),
                "Please enter a valid UK postcode",
            ),
            // Step 3
            FieldRule::new(
                "gender",
                Choice,
                Validator::OneOf(Gender::VARIANTS),
                "Please select your gender",
            ),
            FieldRule::new(
                "birthDay",
                Text,
                Validator::NumericRange { min: 1, max: 31 },
                "Please enter a valid day (1-31)",
            ),
            FieldRule::new(
                "birthMonth",
                Text,
                Validator::NumericRange { min: 1, max: 12 },
                "Please enter a valid month (1-12)",
            ),
            FieldRule::new(
                "birthYear",
                Text,
                Validator::BirthYear,
                "Please enter a valid birth year (must be 16+ years old)",
            ),
            FieldRule::new(
                "ethnicity",
                Choice,
                Validator::OneOf(Ethnicity::VARIANTS),
                "Please select your ethnic group",
            ),
            FieldRule::new(
                "healthConditions",
                Choice,
                Validator::OneOf(HealthConditions::VARIANTS),
                "Please select your health condition status",
            ),
            FieldRule::new(
                "nhsSatisfaction",
                Choice,
                Validator::OneOf(Satisfaction::VARIANTS),
                "Please select your NHS satisfaction level",
            ),
            FieldRule::new(
                "education",
                Choice,
                Validator::OneOf(Education::VARIANTS),
                "Please select your education level",
            ),
            // Step 4
            FieldRule::new(
                "dataConsent",
                Checkbox,
                Validator::Equals(CHECKED_VALUE),
                "You must consent to data usage to participate",
            ),
        ];

        Self {
            rules,
            current_year,
        }
    }

    /// Year the age rule is evaluated against
    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Look up a rule by field name
    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// All rules in form order
    pub fn iter(&self) -> impl Iterator<Item = &FieldRule> {
        self.rules.iter()
    }

    /// Validate a raw value. Fields without a rule are always valid.
    ///
    /// Choice values go through [`RuleTable::validate_choice`] as a
    /// selection of zero or one option.
    pub fn validate(&self, name: &str, raw: &str) -> ValidationOutcome {
        let Some(rule) = self.get(name) else {
            return ValidationOutcome::valid();
        };

        if rule.kind == FieldKind::Choice {
            let selected = if raw.is_empty() {
                &[][..]
            } else {
                std::slice::from_ref(&raw)
            };
            return self.validate_choice(name, selected);
        }

        if rule.required && raw.trim().is_empty() {
            return ValidationOutcome::invalid(REQUIRED_MESSAGE);
        }

        if !raw.is_empty() && !rule.validator.accepts(raw, self.current_year) {
            return ValidationOutcome::invalid(rule.message);
        }

        ValidationOutcome::valid()
    }

    /// Validate a grouped choice: exactly one option must be selected and pass.
    pub fn validate_choice(&self, name: &str, selected: &[&str]) -> ValidationOutcome {
        let Some(rule) = self.get(name) else {
            return ValidationOutcome::valid();
        };

        match selected {
            [] if rule.required => ValidationOutcome::invalid(REQUIRED_MESSAGE),
            [] => ValidationOutcome::valid(),
            [only] => {
                if rule.validator.accepts(only, self.current_year) {
                    ValidationOutcome::valid()
                } else {
                    ValidationOutcome::invalid(rule.message)
                }
            }
            _ => ValidationOutcome::invalid(rule.message),
        }
    }

    /// Date-of-birth parts are valid as a group only when each part is
    /// present and within its own range.
    pub fn validate_date_group(&self, day: &str, month: &str, year: &str) -> bool {
        DATE_OF_BIRTH_FIELDS
            .iter()
            .zip([day, month, year])
            .all(|(name, value)| !value.trim().is_empty() && self.validate(name, value).valid)
    }
}

/// Parse a leading base-10 integer the way a lenient form parser does:
/// leading whitespace and a sign are allowed, trailing garbage is ignored.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    let magnitude: i64 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RuleTable {
        RuleTable::with_current_year(2026)
    }

    #[test]
    fn test_required_fields_reject_blank() {
        let rules = table();
        for rule in rules.iter().filter(|r| r.required) {
            let outcome = rules.validate(rule.name, "");
            assert!(!outcome.valid, "{} accepted an empty value", rule.name);
            assert_eq!(outcome.message, REQUIRED_MESSAGE);

            let outcome = rules.validate(rule.name, "   ");
            assert_eq!(outcome.message, REQUIRED_MESSAGE);
        }
    }

    #[test]
    fn test_predicate_failure_uses_rule_message() {
        let rules = table();
        let cases = [
            ("firstName", "J"),
            ("email", "not-an-email"),
            ("phone", "12"),
            ("postCode", "12345"),
            ("gender", "robot"),
            ("birthDay", "32"),
            ("birthMonth", "0"),
            ("birthYear", "1899"),
            ("isEligible", "no"),
            ("education", "level-9"),
        ];
        for (name, value) in cases {
            let outcome = rules.validate(name, value);
            let rule = rules.get(name).unwrap();
            assert!(!outcome.valid, "{name}={value} should fail");
            assert_eq!(outcome.message, rule.message);
            assert_ne!(outcome.message, REQUIRED_MESSAGE);
        }
    }

    #[test]
    fn test_valid_values() {
        let rules = table();
        let cases = [
            ("firstName", "Mary-Jane"),
            ("lastName", "O'Brien"),
            ("email", "mary@example.co.uk"),
            ("phone", "07123 456 789"),
            ("phone", "+44 7123 456789"),
            ("phone", "(01632) 960-001"),
            ("addressLine1", "1 High Street"),
            ("city", "Newcastle upon Tyne"),
            ("postCode", "sw1a 1aa"),
            ("postCode", "M1 1AE"),
            ("gender", "non-binary"),
            ("birthDay", "09"),
            ("birthYear", "2010"),
            ("dataConsent", "yes"),
        ];
        for (name, value) in cases {
            assert!(rules.validate(name, value).valid, "{name}={value} should pass");
        }
    }

    #[test]
    fn test_optional_field_accepts_blank() {
        let rules = table();
        assert!(rules.validate("addressLine2", "").valid);
        assert!(rules.validate("addressLine2", "Flat 3").valid);
    }

    #[test]
    fn test_unknown_field_is_valid() {
        assert!(table().validate("favouriteColour", "").valid);
    }

    #[test]
    fn test_birth_year_boundary_uses_calendar_year() {
        let rules = table();
        assert!(rules.validate("birthYear", "2010").valid);
        assert!(!rules.validate("birthYear", "2011").valid);
        assert!(rules.validate("birthYear", "1900").valid);
        assert!(!rules.validate("birthYear", "1899").valid);
    }

    #[test]
    fn test_numeric_parse_is_lenient() {
        assert_eq!(parse_leading_int(" 12abc"), Some(12));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert!(table().validate("birthDay", "15th").valid);
    }

    #[test]
    fn test_date_group() {
        let rules = table();
        assert!(rules.validate_date_group("15", "6", "2006"));
        assert!(rules.validate_date_group("29", "2", "2004"));
        assert!(!rules.validate_date_group("32", "6", "2006"));
        assert!(!rules.validate_date_group("15", "13", "2006"));
        assert!(!rules.validate_date_group("15", "6", "2016"));
        assert!(!rules.validate_date_group("", "6", "2006"));
    }

    #[test]
    fn test_choice_group_requires_exactly_one() {
        let rules = table();
        assert_eq!(
            rules.validate_choice("gender", &[]).message,
            REQUIRED_MESSAGE
        );
        assert!(rules.validate_choice("gender", &["female"]).valid);
        let outcome = rules.validate_choice("gender", &["female", "male"]);
        assert!(!outcome.valid);
        assert_eq!(outcome.message, "Please select your gender");
        assert!(!rules.validate_choice("gender", &["unknown"]).valid);
    }

    #[test]
    fn test_choice_options_exposed() {
        let rules = table();
        assert_eq!(rules.get("healthConditions").unwrap().options().len(), 3);
        assert!(rules.get("email").unwrap().options().is_empty());
    }

    #[test]
    fn test_state_for_value() {
        let ok = ValidationOutcome::valid();
        let bad = ValidationOutcome::invalid("nope");
        assert_eq!(ok.state_for(FieldKind::Text, ""), ValidationState::Empty);
        assert_eq!(bad.state_for(FieldKind::Text, ""), ValidationState::Empty);
        assert_eq!(ok.state_for(FieldKind::Text, "x"), ValidationState::Valid);
        assert_eq!(bad.state_for(FieldKind::Text, "x"), ValidationState::Invalid);
    }

    #[test]
    fn test_unanswered_checkbox_and_choice_are_judged() {
        let ok = ValidationOutcome::valid();
        let bad = ValidationOutcome::invalid(REQUIRED_MESSAGE);
        for kind in [FieldKind::Checkbox, FieldKind::Choice] {
            assert_eq!(bad.state_for(kind, ""), ValidationState::Invalid);
            assert_eq!(ok.state_for(kind, ""), ValidationState::Valid);
        }
    }

    #[test]
    fn test_validate_routes_choices_through_selection() {
        let rules = table();
        assert_eq!(rules.validate("gender", ""), rules.validate_choice("gender", &[]));
        assert!(rules.validate("gender", "non-binary").valid);
        assert_eq!(
            rules.validate("gender", "unknown").message,
            "Please select your gender"
        );
    }
}
