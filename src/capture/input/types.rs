use chrono::{DateTime, Utc};

/// Category of a counted input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputCategory {
    /// Mouse button press
    Mouse,
    /// Keyboard key press
    Keyboard,
}

impl InputCategory {
    pub const ALL: [InputCategory; 2] = [InputCategory::Mouse, InputCategory::Keyboard];
}

impl std::fmt::Display for InputCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputCategory::Mouse => write!(f, "mouse"),
            InputCategory::Keyboard => write!(f, "keyboard"),
        }
    }
}

/// Point-in-time copy of both counters, owned by a single sync attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub mouse_clicks: u64,
    pub keyboard_presses: u64,
    pub taken_at: DateTime<Utc>,
}

impl CounterSnapshot {
    pub fn get(&self, category: InputCategory) -> u64 {
        match category {
            InputCategory::Mouse => self.mouse_clicks,
            InputCategory::Keyboard => self.keyboard_presses,
        }
    }

    /// Nothing to sync
    pub fn is_empty(&self) -> bool {
        self.mouse_clicks == 0 && self.keyboard_presses == 0
    }
}

/// Per-category result of a conditional reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetResult {
    pub mouse: bool,
    pub keyboard: bool,
}

impl ResetResult {
    pub fn get(&self, category: InputCategory) -> bool {
        match category {
            InputCategory::Mouse => self.mouse,
            InputCategory::Keyboard => self.keyboard,
        }
    }

    pub fn any(&self) -> bool {
        self.mouse || self.keyboard
    }
}
