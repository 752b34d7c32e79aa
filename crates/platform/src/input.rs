//! Button input abstraction

use core::fmt;
use core::str::FromStr;

/// The four buttons along the edge of Inky Impression boards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Top button
    A,
    /// Second button
    B,
    /// Third button
    C,
    /// Bottom button
    D,
}

impl Button {
    /// All buttons, top to bottom
    pub const ALL: [Button; 4] = [Button::A, Button::B, Button::C, Button::D];

    /// Single-letter label
    pub const fn label(&self) -> &'static str {
        match self {
            Button::A => "A",
            Button::B => "B",
            Button::C => "C",
            Button::D => "D",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Button {
    type Err = UnknownButton;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Button::ALL
            .into_iter()
            .find(|b| b.label().eq_ignore_ascii_case(s))
            .ok_or(UnknownButton)
    }
}

/// Button name other than A, B, C or D
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown button (expected A, B, C or D)")]
pub struct UnknownButton;

/// Callback invoked on the render thread when a button is pressed
pub type ButtonHandler = Box<dyn FnMut(Button) + Send + 'static>;

/// Input device trait for button sources
pub trait InputDevice {
    /// Wait for the next button press
    fn wait_for_event(&mut self) -> impl core::future::Future<Output = Button>;

    /// Poll for a press (non-blocking)
    fn poll_event(&mut self) -> Option<Button>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_labels_parse() {
        for button in Button::ALL {
            assert_eq!(button.label().parse::<Button>(), Ok(button));
        }
        assert_eq!("c".parse::<Button>(), Ok(Button::C));
        assert_eq!("E".parse::<Button>(), Err(UnknownButton));
    }
}
