//! Type-safe value sets for the registration form
//!
//! Choice fields accept a closed set of option values. Each set is an enum
//! whose strum names are the exact wire values stored in drafts, so the rule
//! table reads its membership lists straight from `VARIANTS`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, VariantNames};

/// How a field is entered, which decides how its raw value is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Free text, validated after a quiet period
    Text,
    /// Grouped choice: exactly one option of a fixed set
    Choice,
    /// Single confirmation box; its value is `"yes"` when checked
    Checkbox,
}

impl FieldKind {
    /// Discrete controls validate and persist immediately
    pub const fn is_discrete(self) -> bool {
        matches!(self, Self::Choice | Self::Checkbox)
    }
}

/// Per-field validation state as persisted in drafts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValidationState {
    #[default]
    Empty,
    Valid,
    Invalid,
}

/// Gender options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, VariantNames)]
pub enum Gender {
    #[strum(serialize = "male")]
    Male,
    #[strum(serialize = "female")]
    Female,
    #[strum(serialize = "non-binary")]
    NonBinary,
}

/// Ethnic group options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, VariantNames)]
pub enum Ethnicity {
    #[strum(serialize = "asian-british")]
    AsianBritish,
    #[strum(serialize = "black-british")]
    BlackBritish,
    #[strum(serialize = "mixed-multiple")]
    MixedMultiple,
    #[strum(serialize = "white-british")]
    WhiteBritish,
    #[strum(serialize = "white-irish")]
    WhiteIrish,
    #[strum(serialize = "white-other")]
    WhiteOther,
    #[strum(serialize = "other")]
    Other,
}

/// Whether day-to-day activities are limited by a health condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, VariantNames)]
pub enum HealthConditions {
    #[strum(serialize = "limited-little")]
    LimitedLittle,
    #[strum(serialize = "limited-lot")]
    LimitedLot,
    #[strum(serialize = "no")]
    No,
}

/// Satisfaction with the health service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, VariantNames)]
pub enum Satisfaction {
    #[strum(serialize = "very-dissatisfied")]
    VeryDissatisfied,
    #[strum(serialize = "quite-dissatisfied")]
    QuiteDissatisfied,
    #[strum(serialize = "neither")]
    Neither,
    #[strum(serialize = "quite-satisfied")]
    QuiteSatisfied,
    #[strum(serialize = "very-satisfied")]
    VerySatisfied,
}

/// Highest level of education
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, VariantNames)]
pub enum Education {
    #[strum(serialize = "no-qualifications")]
    NoQualifications,
    #[strum(serialize = "level-1")]
    Level1,
    #[strum(serialize = "level-2")]
    Level2,
    #[strum(serialize = "level-3")]
    Level3,
    #[strum(serialize = "level-4-above")]
    Level4Above,
    #[strum(serialize = "apprenticeship")]
    Apprenticeship,
}

/// Supported UI languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter, VariantNames)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    #[strum(serialize = "en")]
    English,
    #[serde(rename = "es")]
    #[strum(serialize = "es")]
    Spanish,
    #[serde(rename = "fr")]
    #[strum(serialize = "fr")]
    French,
    #[serde(rename = "ar")]
    #[strum(serialize = "ar")]
    Arabic,
    #[serde(rename = "zh")]
    #[strum(serialize = "zh")]
    Chinese,
    #[serde(rename = "ur")]
    #[strum(serialize = "ur")]
    Urdu,
    #[serde(rename = "pl")]
    #[strum(serialize = "pl")]
    Polish,
}

impl Language {
    /// Language code as used in `?lang=` and the saved preference
    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::Arabic => "ar",
            Self::Chinese => "zh",
            Self::Urdu => "ur",
            Self::Polish => "pl",
        }
    }

    /// Right-to-left scripts
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Arabic | Self::Urdu)
    }

    /// Name of the language in itself, for the language picker
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Spanish => "Español",
            Self::French => "Français",
            Self::Arabic => "العربية",
            Self::Chinese => "中文",
            Self::Urdu => "اردو",
            Self::Polish => "Polski",
        }
    }
}
