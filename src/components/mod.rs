//! Reusable UI components
//!
//! - `keybindings` - Context-aware key registry, nav bar items and help content
//! - `help_overlay` - Floating help panel

pub mod help_overlay;
pub mod keybindings;
