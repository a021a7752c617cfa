//! Button identifiers for the peripheral's joystick and keys
//!
//! The set is fixed by the hardware: a five-way joystick hat plus four side
//! keys. Wire names match the peripheral's pin map.

/// Number of physical buttons
pub const BUTTON_COUNT: usize = 9;

/// Identifier for one physical button or joystick direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Up,
    Down,
    Left,
    Right,
    /// Joystick center press
    Press,
    Key1,
    Key2,
    Key3,
    Key4,
}

impl ButtonId {
    /// All buttons, in stable index order
    pub const ALL: [ButtonId; BUTTON_COUNT] = [
        ButtonId::Up,
        ButtonId::Down,
        ButtonId::Left,
        ButtonId::Right,
        ButtonId::Press,
        ButtonId::Key1,
        ButtonId::Key2,
        ButtonId::Key3,
        ButtonId::Key4,
    ];

    /// Wire name used in `BTN:<name>:...` messages
    pub fn as_str(self) -> &'static str {
        match self {
            ButtonId::Up => "up",
            ButtonId::Down => "down",
            ButtonId::Left => "left",
            ButtonId::Right => "right",
            ButtonId::Press => "press",
            ButtonId::Key1 => "key1",
            ButtonId::Key2 => "key2",
            ButtonId::Key3 => "key3",
            ButtonId::Key4 => "key4",
        }
    }

    /// Parse a wire name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "up" => Some(ButtonId::Up),
            "down" => Some(ButtonId::Down),
            "left" => Some(ButtonId::Left),
            "right" => Some(ButtonId::Right),
            "press" => Some(ButtonId::Press),
            "key1" => Some(ButtonId::Key1),
            "key2" => Some(ButtonId::Key2),
            "key3" => Some(ButtonId::Key3),
            "key4" => Some(ButtonId::Key4),
            _ => None,
        }
    }

    /// Stable index for per-button state tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns true for joystick hat directions (including center press)
    pub fn is_joystick(self) -> bool {
        matches!(
            self,
            ButtonId::Up | ButtonId::Down | ButtonId::Left | ButtonId::Right | ButtonId::Press
        )
    }
}
