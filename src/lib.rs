//! regform Library
//!
//! This library provides a multi-step participant registration form for the
//! terminal: field rules, the form controller with draft persistence, and the
//! ratatui front end.

pub mod app;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod form_state;
pub mod i18n;
pub mod logging;
pub mod params;
pub mod rules;
pub mod scheduler;
pub mod steps;
pub mod storage;
pub mod theme;
pub mod types;
pub mod ui;

// Re-export main types for convenience
pub use config::Settings;
pub use controller::{CompletionStatus, FormController, Phase, Timings};
pub use error::{NavigationError, RegFormError};
pub use form_state::{FieldState, FormState};
pub use i18n::Translator;
pub use params::LaunchParams;
pub use rules::{RuleTable, ValidationOutcome};
pub use steps::{Step, StepModel};
pub use storage::{DraftStore, FileStore, KeyValueStore, MemoryStore};
pub use types::{FieldKind, Language, ValidationState};
