//! Keybinding system for context-aware keyboard shortcuts
//!
//! Provides a registry of keybindings that change based on the current
//! application mode. The registry resolves key events to actions and feeds
//! the nav bar and the help overlay.

use crate::app::AppMode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    FocusNext,
    FocusPrevious,
    CycleNext,
    CyclePrevious,
    Toggle,
    /// Enter: advance from the banner, or move to the next field
    Activate,
    Submit,
    NextStep,
    PreviousStep,
    JumpToStep(u8),
    Reset,
    Language,
    Debug,
    Help,
    Dismiss,
    Quit,
}

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub display: String,
    pub description: String,
}

impl Keybinding {
    /// Create a new keybinding with no modifiers
    pub fn new(key: KeyCode, action: KeyAction, display: &str, description: &str) -> Self {
        Self::with_modifiers(key, KeyModifiers::NONE, action, display, description)
    }

    /// Create a keybinding with modifiers
    pub fn with_modifiers(
        key: KeyCode,
        modifiers: KeyModifiers,
        action: KeyAction,
        display: &str,
        description: &str,
    ) -> Self {
        Self {
            key,
            modifiers,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    /// Whether the event triggers this binding. Shift is ignored, since
    /// terminals disagree on reporting it for symbols like `?`.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let wanted = self.modifiers.difference(KeyModifiers::SHIFT);
        let got = event.modifiers.difference(KeyModifiers::SHIFT);
        let code = match event.code {
            KeyCode::Char(c) if !got.is_empty() => KeyCode::Char(c.to_ascii_lowercase()),
            code => code,
        };
        self.key == code && wanted == got
    }
}

/// Context-aware keybinding registry
pub struct KeybindingContext {
    /// Mode-specific keybindings
    mode_bindings: HashMap<AppMode, Vec<Keybinding>>,
    /// Global keybindings (available in all modes)
    global_bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    /// Create a new keybinding context with default bindings
    pub fn new() -> Self {
        let mut ctx = Self {
            mode_bindings: HashMap::new(),
            global_bindings: Vec::new(),
        };
        ctx.register_defaults();
        ctx
    }

    /// Register default keybindings for all modes
    fn register_defaults(&mut self) {
        self.global_bindings = vec![
            Keybinding::new(KeyCode::Char('?'), KeyAction::Help, "?", "Help"),
            Keybinding::with_modifiers(
                KeyCode::Char('h'),
                KeyModifiers::ALT,
                KeyAction::Help,
                "Alt+H",
                "Help",
            ),
            Keybinding::with_modifiers(
                KeyCode::Char('l'),
                KeyModifiers::ALT,
                KeyAction::Language,
                "Alt+L",
                "Change language",
            ),
            Keybinding::with_modifiers(
                KeyCode::Char('d'),
                KeyModifiers::ALT,
                KeyAction::Debug,
                "Alt+D",
                "Diagnostics",
            ),
            Keybinding::new(KeyCode::Esc, KeyAction::Dismiss, "Esc", "Close overlay"),
            Keybinding::with_modifiers(
                KeyCode::Char('q'),
                KeyModifiers::CONTROL,
                KeyAction::Quit,
                "Ctrl+Q",
                "Quit",
            ),
            Keybinding::with_modifiers(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                KeyAction::Quit,
                "Ctrl+C",
                "Quit",
            ),
        ];

        let step_bindings = || {
            let mut bindings = vec![
                Keybinding::with_modifiers(
                    KeyCode::Right,
                    KeyModifiers::CONTROL,
                    KeyAction::NextStep,
                    "Ctrl+Right",
                    "Next step",
                ),
                Keybinding::with_modifiers(
                    KeyCode::Left,
                    KeyModifiers::CONTROL,
                    KeyAction::PreviousStep,
                    "Ctrl+Left",
                    "Previous step",
                ),
            ];
            for number in 1..=crate::steps::Step::TOTAL {
                let digit = char::from(b'0' + number);
                bindings.push(Keybinding::with_modifiers(
                    KeyCode::Char(digit),
                    KeyModifiers::ALT,
                    KeyAction::JumpToStep(number),
                    &format!("Alt+{digit}"),
                    &format!("Go to step {number}"),
                ));
            }
            bindings.push(Keybinding::with_modifiers(
                KeyCode::Char('r'),
                KeyModifiers::ALT,
                KeyAction::Reset,
                "Alt+R",
                "Reset form",
            ));
            bindings
        };

        // Form steps
        let mut form = vec![
            Keybinding::new(KeyCode::Up, KeyAction::FocusPrevious, "Up", "Previous field"),
            Keybinding::new(KeyCode::Down, KeyAction::FocusNext, "Down", "Next field"),
            Keybinding::new(KeyCode::Tab, KeyAction::FocusNext, "Tab", "Next field"),
            Keybinding::new(KeyCode::BackTab, KeyAction::FocusPrevious, "S-Tab", "Previous field"),
            Keybinding::new(KeyCode::Left, KeyAction::CyclePrevious, "Left", "Previous option"),
            Keybinding::new(KeyCode::Right, KeyAction::CycleNext, "Right", "Next option"),
            Keybinding::new(KeyCode::Char(' '), KeyAction::Toggle, "Space", "Tick / untick"),
            Keybinding::new(KeyCode::Enter, KeyAction::Activate, "Enter", "Continue"),
        ];
        form.extend(step_bindings());
        self.mode_bindings.insert(AppMode::Form, form);

        // Review
        let mut review = vec![Keybinding::new(
            KeyCode::Enter,
            KeyAction::Submit,
            "Enter",
            "Submit",
        )];
        review.extend(step_bindings());
        self.mode_bindings.insert(AppMode::Review, review);

        // Submitting: nothing but the global keys
        self.mode_bindings.insert(AppMode::Submitting, Vec::new());

        // Complete
        self.mode_bindings.insert(
            AppMode::Complete,
            vec![Keybinding::with_modifiers(
                KeyCode::Char('r'),
                KeyModifiers::ALT,
                KeyAction::Reset,
                "Alt+R",
                "Start again",
            )],
        );
    }

    /// Get keybindings for a specific mode (includes global bindings)
    pub fn get_bindings(&self, mode: &AppMode) -> Vec<&Keybinding> {
        let mut bindings: Vec<&Keybinding> = Vec::new();

        if let Some(mode_bindings) = self.mode_bindings.get(mode) {
            bindings.extend(mode_bindings.iter());
        }
        bindings.extend(self.global_bindings.iter());

        bindings
    }

    /// Resolve a key event to an action in the given mode
    pub fn action_for(&self, mode: &AppMode, event: &KeyEvent) -> Option<KeyAction> {
        self.get_bindings(mode)
            .into_iter()
            .find(|binding| binding.matches(event))
            .map(|binding| binding.action)
    }

    /// Get navigation bar items for display
    pub fn get_nav_items(&self, mode: &AppMode) -> Vec<NavBarItem> {
        let bindings = self.get_bindings(mode);

        let priority_actions = match mode {
            AppMode::Form => vec![
                KeyAction::FocusPrevious,
                KeyAction::FocusNext,
                KeyAction::CycleNext,
                KeyAction::Toggle,
                KeyAction::NextStep,
                KeyAction::PreviousStep,
                KeyAction::Help,
                KeyAction::Quit,
            ],
            AppMode::Review => vec![
                KeyAction::Submit,
                KeyAction::PreviousStep,
                KeyAction::Help,
                KeyAction::Quit,
            ],
            AppMode::Submitting => vec![KeyAction::Quit],
            AppMode::Complete => vec![KeyAction::Reset, KeyAction::Quit],
        };

        // Combine paired keys into single items for cleaner display
        let mut items: Vec<NavBarItem> = Vec::new();
        let mut has_focus = false;

        for action in priority_actions {
            match action {
                KeyAction::FocusNext | KeyAction::FocusPrevious => {
                    if !has_focus {
                        items.push(NavBarItem {
                            key_display: "Up/Dn".to_string(),
                            action_label: "Field".to_string(),
                        });
                        has_focus = true;
                    }
                }
                KeyAction::CycleNext => items.push(NavBarItem {
                    key_display: "Lt/Rt".to_string(),
                    action_label: "Option".to_string(),
                }),
                _ => {
                    if let Some(binding) = bindings.iter().find(|b| b.action == action) {
                        items.push(NavBarItem {
                            key_display: binding.display.clone(),
                            action_label: binding.description.clone(),
                        });
                    }
                }
            }
        }

        items
    }

    /// Get full help content for a mode (for help overlay)
    pub fn get_help_content(&self, mode: &AppMode) -> Vec<HelpSection> {
        let section = |title: &str, filter: fn(KeyAction) -> bool| {
            let items: Vec<(String, String)> = self
                .get_bindings(mode)
                .into_iter()
                .filter(|b| filter(b.action))
                .map(|b| (b.display.clone(), b.description.clone()))
                .collect();
            (!items.is_empty()).then(|| HelpSection {
                title: title.to_string(),
                items,
            })
        };

        [
            section("Navigation", |action| {
                matches!(
                    action,
                    KeyAction::FocusNext
                        | KeyAction::FocusPrevious
                        | KeyAction::NextStep
                        | KeyAction::PreviousStep
                        | KeyAction::JumpToStep(_)
                )
            }),
            section("Answering", |action| {
                matches!(
                    action,
                    KeyAction::CycleNext
                        | KeyAction::CyclePrevious
                        | KeyAction::Toggle
                        | KeyAction::Activate
                        | KeyAction::Submit
                        | KeyAction::Reset
                )
            }),
            section("General", |action| {
                matches!(
                    action,
                    KeyAction::Help
                        | KeyAction::Language
                        | KeyAction::Debug
                        | KeyAction::Dismiss
                        | KeyAction::Quit
                )
            }),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Navigation bar item for display
#[derive(Debug, Clone)]
pub struct NavBarItem {
    pub key_display: String,
    pub action_label: String,
}

/// Help section for the help overlay
#[derive(Debug, Clone)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_step_navigation_keys() {
        let ctx = KeybindingContext::new();
        assert_eq!(
            ctx.action_for(&AppMode::Form, &key(KeyCode::Right, KeyModifiers::CONTROL)),
            Some(KeyAction::NextStep)
        );
        assert_eq!(
            ctx.action_for(&AppMode::Form, &key(KeyCode::Right, KeyModifiers::NONE)),
            Some(KeyAction::CycleNext)
        );
        assert_eq!(
            ctx.action_for(&AppMode::Review, &key(KeyCode::Char('3'), KeyModifiers::ALT)),
            Some(KeyAction::JumpToStep(3))
        );
    }

    #[test]
    fn test_shift_is_ignored_for_symbols() {
        let ctx = KeybindingContext::new();
        assert_eq!(
            ctx.action_for(&AppMode::Form, &key(KeyCode::Char('?'), KeyModifiers::SHIFT)),
            Some(KeyAction::Help)
        );
        assert_eq!(
            ctx.action_for(
                &AppMode::Form,
                &key(KeyCode::Char('H'), KeyModifiers::ALT | KeyModifiers::SHIFT)
            ),
            Some(KeyAction::Help)
        );
    }

    #[test]
    fn test_submitting_only_allows_global_keys() {
        let ctx = KeybindingContext::new();
        assert_eq!(
            ctx.action_for(&AppMode::Submitting, &key(KeyCode::Enter, KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            ctx.action_for(
                &AppMode::Submitting,
                &key(KeyCode::Char('c'), KeyModifiers::CONTROL)
            ),
            Some(KeyAction::Quit)
        );
    }

    #[test]
    fn test_nav_items_combine_focus_keys() {
        let ctx = KeybindingContext::new();
        let items = ctx.get_nav_items(&AppMode::Form);
        assert_eq!(
            items.iter().filter(|i| i.action_label == "Field").count(),
            1
        );
        assert!(items.iter().any(|i| i.key_display == "Ctrl+Right"));
    }

    #[test]
    fn test_help_sections() {
        let ctx = KeybindingContext::new();
        let titles: Vec<String> = ctx
            .get_help_content(&AppMode::Form)
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, ["Navigation", "Answering", "General"]);

        let titles: Vec<String> = ctx
            .get_help_content(&AppMode::Submitting)
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, ["General"]);
    }
}
