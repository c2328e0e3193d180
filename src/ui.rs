//! HUD boundary: panels and buttons owned by the host's widget layer
//!
//! The simulation asks for panels to be shown and buttons toggled through
//! `UiCommand`s. `UiState` mirrors what the widget layer should currently
//! display and maps button clicks back into commands.

use std::collections::{HashMap, HashSet};

use crate::sim::{AbilityKey, Command};

/// Upgrade shop shown between levels
pub const SHOP_PANEL: &str = "shopHUD";
pub const ABILITY_PANEL: &str = "abilityHUD";
pub const NEXT_LEVEL_BUTTON: &str = "nextLevel";
pub const ABILITY_BUTTONS: [&str; 2] = ["ability1", "ability2"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiCommand {
    ShowPanel(&'static str),
    HidePanel(&'static str),
    EnableButton(&'static str),
    DisableButton(&'static str),
}

/// Current visibility of panels and buttons
#[derive(Debug, Clone)]
pub struct UiState {
    visible_panels: HashSet<&'static str>,
    enabled: HashMap<&'static str, bool>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        let mut state = Self {
            visible_panels: HashSet::new(),
            enabled: HashMap::new(),
        };
        state.visible_panels.insert(ABILITY_PANEL);
        state.enabled.insert(NEXT_LEVEL_BUTTON, false);
        for button in ABILITY_BUTTONS {
            state.enabled.insert(button, true);
        }
        state
    }

    pub fn apply(&mut self, command: UiCommand) {
        log::trace!("ui {:?}", command);
        match command {
            UiCommand::ShowPanel(panel) => {
                self.visible_panels.insert(panel);
            }
            UiCommand::HidePanel(panel) => {
                self.visible_panels.remove(panel);
            }
            UiCommand::EnableButton(button) => {
                self.enabled.insert(button, true);
            }
            UiCommand::DisableButton(button) => {
                self.enabled.insert(button, false);
            }
        }
    }

    pub fn is_visible(&self, panel: &str) -> bool {
        self.visible_panels.contains(panel)
    }

    pub fn is_enabled(&self, button: &str) -> bool {
        self.enabled.get(button).copied().unwrap_or(false)
    }

    /// Translate a click on an enabled button into a command
    pub fn click(&self, button: &str) -> Option<Command> {
        if !self.is_enabled(button) {
            return None;
        }
        match button {
            b if b == ABILITY_BUTTONS[0] => Some(Command::Ability(AbilityKey::Q)),
            b if b == ABILITY_BUTTONS[1] => Some(Command::Ability(AbilityKey::W)),
            NEXT_LEVEL_BUTTON => Some(Command::Advance),
            _ => None,
        }
    }
}
