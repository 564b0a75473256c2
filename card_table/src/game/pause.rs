//! Pause menu state and its usage counters.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scene::EntityId;

/// Entries of the pause menu other than resume and exit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum MenuOption {
    Options,
    Sound,
    Graphics,
}

impl MenuOption {
    pub const ALL: [Self; 3] = [Self::Options, Self::Sound, Self::Graphics];
}

impl fmt::Display for MenuOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Options => "options",
            Self::Sound => "sound",
            Self::Graphics => "graphics",
        };
        write!(f, "{repr}")
    }
}

/// How often each menu entry was used.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PauseCounters {
    pub resume: u32,
    pub options: u32,
    pub sound: u32,
    pub graphics: u32,
}

#[derive(Debug)]
pub struct PauseMenu {
    pub panel: EntityId,
    pub counters: PauseCounters,
    open: bool,
}

impl PauseMenu {
    #[must_use]
    pub fn new(panel: EntityId) -> Self {
        Self {
            panel,
            counters: PauseCounters::default(),
            open: false,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns `false` if the menu was already open.
    pub fn open(&mut self) -> bool {
        !std::mem::replace(&mut self.open, true)
    }

    /// Close the menu, counting a resume. Returns `false` if it was closed.
    pub fn resume(&mut self) -> bool {
        if !std::mem::replace(&mut self.open, false) {
            return false;
        }
        self.counters.resume += 1;
        true
    }

    /// Count a menu entry. Entries only register while the menu is open.
    pub fn select(&mut self, option: MenuOption) -> bool {
        if !self.open {
            return false;
        }
        match option {
            MenuOption::Options => self.counters.options += 1,
            MenuOption::Sound => self.counters.sound += 1,
            MenuOption::Graphics => self.counters.graphics += 1,
        }
        true
    }
}
