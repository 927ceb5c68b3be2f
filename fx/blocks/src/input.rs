//! The four buttons.

/// A button, numbered by its pin on the button port.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Button {
    Right = 0,
    Rotate = 1,
    Left = 2,
    Down = 3,
}

impl Button {
    /// Order in which held buttons are considered during play. Only the first
    /// held one acts on a given poll.
    pub const PRIORITY: [Button; 4] =
        [Button::Left, Button::Down, Button::Right, Button::Rotate];

    fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// The set of buttons held down at one instant.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Buttons(u8);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);

    /// Decodes a sample of the button port, where a pressed button pulls its
    /// pin low. Bits above 3 are ignored.
    pub fn from_port(levels: u8) -> Self {
        Buttons(!levels & 0xF)
    }

    #[cfg(test)]
    pub(crate) fn with(self, button: Button) -> Self {
        Buttons(self.0 | button.mask())
    }

    pub fn contains(self, button: Button) -> bool {
        self.0 & button.mask() != 0
    }

    /// The highest-priority button held, if any.
    pub fn first(self) -> Option<Button> {
        Button::PRIORITY.iter().copied().find(|&b| self.contains(b))
    }
}

#[cfg(test)]
impl From<Button> for Buttons {
    fn from(button: Button) -> Self {
        Buttons::NONE.with(button)
    }
}
