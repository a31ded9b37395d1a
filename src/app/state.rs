//! Application state definitions
//!
//! Contains the view state of the terminal front end. Form answers are not
//! here: they belong to [`crate::controller::FormController`].

use strum::Display;

use crate::controller::{CompletionStatus, Phase};
use crate::steps::Step;

/// Screen the application is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppMode {
    /// Steps 1-4, editing fields
    Form,
    /// Step 5, reviewing answers before submitting
    Review,
    /// Submission accepted, waiting for it to complete
    Submitting,
    /// Success screen
    Complete,
}

impl AppMode {
    /// Mode for the form's current step and lifecycle phase
    pub fn for_form(step: Step, phase: Phase) -> Self {
        match phase {
            Phase::Submitting => Self::Submitting,
            Phase::Submitted => Self::Complete,
            Phase::Editing if step.is_last() => Self::Review,
            Phase::Editing => Self::Form,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Form => "Form",
            Self::Review => "Review",
            Self::Submitting => "Submitting",
            Self::Complete => "Complete",
        }
    }
}

/// Terminal width class, used to pick a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SizeClass {
    /// Up to 79 columns
    Compact,
    /// 80 to 119 columns
    #[default]
    Regular,
    /// 120 columns or more
    Wide,
}

impl SizeClass {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=79 => Self::Compact,
            80..=119 => Self::Regular,
            _ => Self::Wide,
        }
    }
}

/// A line for the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub message: String,
    /// Drawn in the warning style
    pub urgent: bool,
}

impl StatusLine {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            urgent: false,
        }
    }

    pub fn urgent(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            urgent: true,
        }
    }
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current application mode
    pub mode: AppMode,
    /// Focused row of the current step; one past the last field is the banner
    pub focus: usize,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Whether the diagnostic overlay is visible
    pub debug_visible: bool,
    /// Status message for user feedback
    pub status: Option<StatusLine>,
    /// Completion as of the last refresh
    pub completion: CompletionStatus,
    /// Whether a draft with answers is stored
    pub draft_stored: bool,
    pub size_class: SizeClass,
    pub terminal_size: (u16, u16),
    /// Latest resize not yet applied because of throttling
    pub pending_resize: Option<(u16, u16)>,
    /// A first quit request was made while a draft is stored
    pub quit_armed: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Form,
            focus: 0,
            help_visible: false,
            debug_visible: false,
            status: None,
            completion: CompletionStatus {
                completed: 0,
                total: 0,
            },
            draft_stored: false,
            size_class: SizeClass::default(),
            terminal_size: (80, 24),
            pending_resize: None,
            quit_armed: false,
        }
    }
}

impl AppState {
    /// Record a terminal size and reclassify it
    pub fn apply_size(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        self.size_class = SizeClass::from_width(width);
        self.pending_resize = None;
    }
}
