//! Step model
//!
//! The form is a fixed sequence of five steps. Each step owns the subset of
//! required fields that must validate before it can be left forward.
//!
//! ```text
//! Eligibility -> ContactDetails -> AboutYou -> Consent -> Review
//! ```
//!
//! Going back never requires validation. Submission is only reachable from
//! `Review`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One screen of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Step {
    Eligibility = 1,
    ContactDetails = 2,
    AboutYou = 3,
    Consent = 4,
    Review = 5,
}

impl Step {
    /// Total number of steps
    pub const TOTAL: u8 = 5;

    pub const FIRST: Self = Self::Eligibility;
    pub const LAST: Self = Self::Review;

    /// 1-based step number
    #[inline]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Step for a 1-based number, `None` outside `1..=TOTAL`
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Eligibility),
            2 => Some(Self::ContactDetails),
            3 => Some(Self::AboutYou),
            4 => Some(Self::Consent),
            5 => Some(Self::Review),
            _ => None,
        }
    }

    pub const fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub const fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    #[inline]
    pub const fn is_last(self) -> bool {
        matches!(self, Self::Review)
    }

    /// Translation key of the step title
    pub const fn title_key(self) -> &'static str {
        match self {
            Self::Eligibility => "form.step1.title",
            Self::ContactDetails => "form.step2.title",
            Self::AboutYou => "form.step3.title",
            Self::Consent => "form.step4.title",
            Self::Review => "form.step5.title",
        }
    }

    /// Progress through the form as a whole percentage
    pub const fn progress_percent(self) -> u16 {
        self.number() as u16 * 100 / Self::TOTAL as u16
    }

    pub const fn all() -> &'static [Self] {
        &[
            Self::Eligibility,
            Self::ContactDetails,
            Self::AboutYou,
            Self::Consent,
            Self::Review,
        ]
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::from_number(number)
            .ok_or_else(|| format!("step must be between 1 and {}, got {}", Self::TOTAL, number))
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.number()
    }
}

/// A step and the fields it needs before moving on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    pub step: Step,
    pub required_fields: &'static [&'static str],
    /// Every field shown on this step, required or not, in display order
    pub fields: &'static [&'static str],
}

/// Ordered step definitions
#[derive(Debug, Clone)]
pub struct StepModel {
    definitions: Vec<StepDefinition>,
}

impl Default for StepModel {
    fn default() -> Self {
        Self::standard()
    }
}

impl StepModel {
    /// The registration form's five steps
    pub fn standard() -> Self {
        Self {
            definitions: vec![
                StepDefinition {
                    step: Step::Eligibility,
                    required_fields: &["canAttendAllDates", "isEligible"],
                    fields: &["canAttendAllDates", "isEligible"],
                },
                StepDefinition {
                    step: Step::ContactDetails,
                    required_fields: &[
                        "firstName",
                        "lastName",
                        "email",
                        "phone",
                        "addressLine1",
                        "city",
                        "postCode",
                    ],
                    fields: &[
                        "firstName",
                        "lastName",
                        "email",
                        "phone",
                        "addressLine1",
                        "addressLine2",
                        "city",
                        "postCode",
                    ],
                },
                StepDefinition {
                    step: Step::AboutYou,
                    required_fields: &[
                        "gender",
                        "birthDay",
                        "birthMonth",
                        "birthYear",
                        "ethnicity",
                        "healthConditions",
                        "nhsSatisfaction",
                        "education",
                    ],
                    fields: &[
                        "gender",
                        "birthDay",
                        "birthMonth",
                        "birthYear",
                        "ethnicity",
                        "healthConditions",
                        "nhsSatisfaction",
                        "education",
                    ],
                },
                StepDefinition {
                    step: Step::Consent,
                    required_fields: &["dataConsent"],
                    fields: &["dataConsent"],
                },
                StepDefinition {
                    step: Step::Review,
                    required_fields: &[],
                    fields: &[],
                },
            ],
        }
    }

    pub fn definition(&self, step: Step) -> &StepDefinition {
        // One definition per step, stored in step order
        &self.definitions[usize::from(step.number() - 1)]
    }

    pub fn required_fields(&self, step: Step) -> &'static [&'static str] {
        self.definition(step).required_fields
    }

    pub fn fields(&self, step: Step) -> &'static [&'static str] {
        self.definition(step).fields
    }

    /// Union of required fields across all steps, in step order
    pub fn all_required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.definitions
            .iter()
            .flat_map(|definition| definition.required_fields.iter().copied())
    }

    /// Step that shows a field
    pub fn step_of(&self, field: &str) -> Option<Step> {
        self.definitions
            .iter()
            .find(|definition| definition.fields.iter().any(|name| *name == field))
            .map(|definition| definition.step)
    }
}
